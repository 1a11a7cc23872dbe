//! CSV-backed supplier registry

use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{ComplianceStatus, RegionalCompliance, Supplier, SupplierPatch, SupplierStatistics};

/// European countries counted toward the European quota
pub const EUROPEAN_COUNTRIES: &[&str] = &[
    "Germany",
    "France",
    "Austria",
    "Denmark",
    "Finland",
    "Italy",
    "Netherlands",
    "Norway",
    "United Kingdom",
    "Belgium",
];

/// Suppliers needed per region to be considered compliant
pub const REGIONAL_REQUIREMENT: usize = 10;

/// Supplier registry stored as a single CSV file
#[derive(Debug, Clone)]
pub struct SupplierStore {
    path: PathBuf,
}

impl SupplierStore {
    /// Open the registry, creating the directory and a header-only file if needed
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }

        let store = Self { path };
        if !store.path.exists() {
            store.save(&[])?;
            tracing::info!("Created empty supplier registry at {}", store.path.display());
        }
        Ok(store)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All suppliers; a missing file reads as an empty registry
    pub fn load(&self) -> Result<Vec<Supplier>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(&self.path)?;

        let suppliers = reader
            .deserialize()
            .collect::<std::result::Result<Vec<Supplier>, _>>()?;
        tracing::debug!("Loaded {} suppliers", suppliers.len());
        Ok(suppliers)
    }

    /// Rewrite the whole file
    pub fn save(&self, suppliers: &[Supplier]) -> Result<()> {
        fs::write(&self.path, export_csv(suppliers)?)?;
        Ok(())
    }

    /// Append a supplier; company names are unique
    pub fn add(&self, supplier: Supplier) -> Result<()> {
        if supplier.company_name.trim().is_empty() {
            return Err(Error::validation("Company_Name is required"));
        }

        let mut suppliers = self.load()?;
        if suppliers.iter().any(|s| s.company_name == supplier.company_name) {
            return Err(Error::Conflict(format!(
                "Supplier '{}' already exists",
                supplier.company_name
            )));
        }

        tracing::info!("Adding supplier {}", supplier.company_name);
        suppliers.push(supplier);
        self.save(&suppliers)
    }

    /// Apply a partial update and return the updated record
    pub fn update(&self, company_name: &str, patch: SupplierPatch) -> Result<Supplier> {
        let mut suppliers = self.load()?;
        let supplier = suppliers
            .iter_mut()
            .find(|s| s.company_name == company_name)
            .ok_or_else(|| Error::not_found(format!("Supplier '{}'", company_name)))?;

        patch.apply(supplier);
        let updated = supplier.clone();
        self.save(&suppliers)?;
        Ok(updated)
    }

    pub fn delete(&self, company_name: &str) -> Result<()> {
        let mut suppliers = self.load()?;
        let before = suppliers.len();
        suppliers.retain(|s| s.company_name != company_name);

        if suppliers.len() == before {
            return Err(Error::not_found(format!("Supplier '{}'", company_name)));
        }

        tracing::info!("Deleted supplier {}", company_name);
        self.save(&suppliers)
    }
}

/// Suppliers covering any of `materials` whose country is not excluded.
/// An empty material list matches everyone.
pub fn filter_suppliers(
    suppliers: &[Supplier],
    materials: &[String],
    exclude_origins: &[String],
) -> Vec<Supplier> {
    suppliers
        .iter()
        .filter(|s| materials.is_empty() || s.supplies_any(materials))
        .filter(|s| !exclude_origins.iter().any(|origin| *origin == s.country))
        .cloned()
        .collect()
}

pub fn suppliers_by_country(suppliers: &[Supplier], country: &str) -> Vec<Supplier> {
    suppliers
        .iter()
        .filter(|s| s.country == country)
        .cloned()
        .collect()
}

pub fn suppliers_by_material(suppliers: &[Supplier], material: &str) -> Vec<Supplier> {
    suppliers
        .iter()
        .filter(|s| s.supplies_any(std::slice::from_ref(&material.to_string())))
        .cloned()
        .collect()
}

/// Case-insensitive match on company name or specialization
pub fn search_suppliers(suppliers: &[Supplier], term: &str) -> Vec<Supplier> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return suppliers.to_vec();
    }

    suppliers
        .iter()
        .filter(|s| {
            s.company_name.to_lowercase().contains(&term)
                || s.specialization.to_lowercase().contains(&term)
        })
        .cloned()
        .collect()
}

pub fn statistics(suppliers: &[Supplier]) -> SupplierStatistics {
    let countries: HashSet<&str> = suppliers
        .iter()
        .map(|s| s.country.as_str())
        .filter(|c| !c.is_empty())
        .collect();

    let count_country = |country: &str| suppliers.iter().filter(|s| s.country == country).count();
    let chinese = count_country("China");
    let emirati = count_country("UAE");
    let european = suppliers
        .iter()
        .filter(|s| EUROPEAN_COUNTRIES.contains(&s.country.as_str()))
        .count();

    let mut coverage: BTreeMap<String, usize> = BTreeMap::new();
    for supplier in suppliers {
        let unique: HashSet<String> = supplier.categories().map(str::to_lowercase).collect();
        for category in unique {
            *coverage.entry(category).or_default() += 1;
        }
    }

    SupplierStatistics {
        total_suppliers: suppliers.len(),
        total_countries: countries.len(),
        chinese_suppliers: chinese,
        emirati_suppliers: emirati,
        european_suppliers: european,
        recent_suppliers: suppliers
            .iter()
            .filter(|s| s.established_year.is_some_and(|y| y >= 2020))
            .count(),
        regional_compliance: RegionalCompliance {
            chinese: ComplianceStatus::new(chinese, REGIONAL_REQUIREMENT),
            emirati: ComplianceStatus::new(emirati, REGIONAL_REQUIREMENT),
            european: ComplianceStatus::new(european, REGIONAL_REQUIREMENT),
        },
        material_coverage: coverage.into_iter().collect(),
    }
}

/// Suppliers as CSV text, header row always present
pub fn export_csv(suppliers: &[Supplier]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());

    writer.write_record(Supplier::HEADERS)?;
    for supplier in suppliers {
        writer.serialize(supplier)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| Error::internal(format!("Failed to flush CSV: {}", e)))?;
    String::from_utf8(bytes).map_err(|e| Error::internal(e.to_string()))
}
