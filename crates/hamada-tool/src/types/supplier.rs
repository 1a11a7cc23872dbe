//! Supplier registry records

use serde::{Deserialize, Serialize};

/// One row of the supplier registry CSV
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    #[serde(rename = "Company_Name", default)]
    pub company_name: String,
    #[serde(rename = "Contact_Person", default)]
    pub contact_person: String,
    #[serde(rename = "Email", default)]
    pub email: String,
    #[serde(rename = "Phone", default)]
    pub phone: String,
    #[serde(rename = "Address", default)]
    pub address: String,
    #[serde(rename = "Country", default)]
    pub country: String,
    #[serde(rename = "Specialization", default)]
    pub specialization: String,
    /// Blank or malformed years read as `None`
    #[serde(
        rename = "Established_Year",
        default,
        deserialize_with = "csv::invalid_option"
    )]
    pub established_year: Option<i32>,
    /// Comma separated material categories, e.g. `piping, valves`
    #[serde(rename = "Material_Categories", default)]
    pub material_categories: String,
}

impl Supplier {
    /// Column order of the registry file
    pub const HEADERS: [&'static str; 9] = [
        "Company_Name",
        "Contact_Person",
        "Email",
        "Phone",
        "Address",
        "Country",
        "Specialization",
        "Established_Year",
        "Material_Categories",
    ];

    /// Whether any requested material appears in this supplier's categories
    pub fn supplies_any(&self, materials: &[String]) -> bool {
        let categories = self.material_categories.to_lowercase();
        materials
            .iter()
            .any(|m| categories.contains(&m.to_lowercase()))
    }

    /// Individual material categories, trimmed
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.material_categories
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

/// Partial update applied to an existing supplier
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupplierPatch {
    #[serde(rename = "Contact_Person")]
    pub contact_person: Option<String>,
    #[serde(rename = "Email")]
    pub email: Option<String>,
    #[serde(rename = "Phone")]
    pub phone: Option<String>,
    #[serde(rename = "Address")]
    pub address: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Specialization")]
    pub specialization: Option<String>,
    #[serde(rename = "Established_Year")]
    pub established_year: Option<i32>,
    #[serde(rename = "Material_Categories")]
    pub material_categories: Option<String>,
}

impl SupplierPatch {
    /// Overwrite only the fields that are set
    pub fn apply(self, supplier: &mut Supplier) {
        if let Some(v) = self.contact_person {
            supplier.contact_person = v;
        }
        if let Some(v) = self.email {
            supplier.email = v;
        }
        if let Some(v) = self.phone {
            supplier.phone = v;
        }
        if let Some(v) = self.address {
            supplier.address = v;
        }
        if let Some(v) = self.country {
            supplier.country = v;
        }
        if let Some(v) = self.specialization {
            supplier.specialization = v;
        }
        if let Some(v) = self.established_year {
            supplier.established_year = Some(v);
        }
        if let Some(v) = self.material_categories {
            supplier.material_categories = v;
        }
    }
}

/// Regional quota check
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ComplianceStatus {
    pub current: usize,
    pub required: usize,
    pub compliant: bool,
}

impl ComplianceStatus {
    pub fn new(current: usize, required: usize) -> Self {
        Self {
            current,
            required,
            compliant: current >= required,
        }
    }
}

/// Regional compliance for the three tracked regions
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionalCompliance {
    pub chinese: ComplianceStatus,
    pub emirati: ComplianceStatus,
    pub european: ComplianceStatus,
}

/// Registry-wide statistics
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SupplierStatistics {
    pub total_suppliers: usize,
    pub total_countries: usize,
    pub chinese_suppliers: usize,
    pub emirati_suppliers: usize,
    pub european_suppliers: usize,
    /// Suppliers established in 2020 or later
    pub recent_suppliers: usize,
    pub regional_compliance: RegionalCompliance,
    /// Lowercased category to number of suppliers covering it, sorted by name
    pub material_coverage: Vec<(String, usize)>,
}
