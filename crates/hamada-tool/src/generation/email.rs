//! Quotation request drafting
//!
//! Every draft is the same fixed template filled from the supplier record and
//! the project details.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::BTreeMap;

use super::DEFAULT_SIGNATURE;
use crate::error::{Error, Result};
use crate::types::{EmailDraft, EmailIssue, EmailValidation, ProjectDetails, Supplier};

static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
        .expect("Should compile: EMAIL_PATTERN")
});

/// What every quotation must contain
const QUOTATION_CONTENTS: &[&str] = &[
    "Detailed technical specifications",
    "Unit prices and total costs",
    "Delivery schedule and lead times",
    "Payment terms",
    "Validity period of the quotation",
    "Compliance certificates and quality documentation",
    "Country of origin for all materials",
];

/// Days assumed since the original request when none is given
pub const DEFAULT_FOLLOW_UP_DAYS: u32 = 7;

/// Template-based email composer
#[derive(Debug, Clone)]
pub struct EmailGenerator {
    signature: String,
}

impl Default for EmailGenerator {
    fn default() -> Self {
        Self::new(DEFAULT_SIGNATURE)
    }
}

impl EmailGenerator {
    pub fn new(signature: impl Into<String>) -> Self {
        Self {
            signature: signature.into(),
        }
    }

    pub fn signature(&self) -> &str {
        &self.signature
    }

    /// One draft per supplier, in supplier order
    pub fn generate_emails(&self, suppliers: &[Supplier], details: &ProjectDetails) -> Vec<EmailDraft> {
        let drafts: Vec<EmailDraft> = suppliers
            .iter()
            .map(|supplier| self.generate_single(supplier, details))
            .collect();
        tracing::info!(
            "Generated {} quotation emails for {}",
            drafts.len(),
            details.project_name
        );
        drafts
    }

    fn generate_single(&self, supplier: &Supplier, details: &ProjectDetails) -> EmailDraft {
        let mut subject = format!("Request for Quotation - {}", details.project_name);
        if !details.tender_reference.is_empty() {
            subject.push_str(&format!(" (Ref: {})", details.tender_reference));
        }

        EmailDraft {
            company_name: supplier.company_name.clone(),
            contact_person: supplier.contact_person.clone(),
            email: supplier.email.clone(),
            country: supplier.country.clone(),
            materials: supplier.material_categories.clone(),
            subject,
            email_body: self.compose_body(supplier, details),
        }
    }

    fn compose_body(&self, supplier: &Supplier, details: &ProjectDetails) -> String {
        let deadline = details
            .quote_deadline
            .as_ref()
            .map(|d| d.long_form())
            .unwrap_or_default();

        let mut lines = vec![
            greeting(&supplier.contact_person),
            String::new(),
            "I hope this email finds you well.".to_string(),
            String::new(),
            format!(
                "We are pleased to invite {} to submit a quotation for the following project:",
                supplier.company_name
            ),
            String::new(),
            format!("**Project:** {}", details.project_name),
        ];

        if !details.tender_reference.is_empty() {
            lines.push(format!("**Reference:** {}", details.tender_reference));
        }
        lines.push(format!("**Quote Deadline:** {}", deadline));
        lines.push(String::new());

        lines.push("**Requirements and Specifications:**".to_string());
        lines.extend(
            details
                .requirements
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(|line| format!("\u{2022} {}", line)),
        );
        lines.push(String::new());

        if !details.additional_notes.is_empty() {
            lines.push("**Additional Information:**".to_string());
            lines.push(details.additional_notes.clone());
            lines.push(String::new());
        }

        if details.include_note && !details.exclude_origins.is_empty() {
            lines.push(format!(
                "**Please note:** For this project, we are specifically seeking suppliers from origins other than {}.",
                details.exclude_origins.join(", ")
            ));
            lines.push(String::new());
        }

        lines.push("**Please include in your quotation:**".to_string());
        lines.extend(QUOTATION_CONTENTS.iter().map(|item| format!("\u{2022} {}", item)));
        lines.push(String::new());

        lines.push(
            "We look forward to receiving your competitive quotation by the specified deadline. \
             Should you have any questions or require clarification, please do not hesitate to contact us."
                .to_string(),
        );
        lines.push(String::new());
        lines.push("Thank you for your time and consideration.".to_string());
        lines.push(String::new());
        lines.push(String::new());
        lines.push(self.signature.clone());

        lines.join("\n")
    }

    /// Human-readable summary of a generation run
    pub fn bulk_summary(&self, emails: &[EmailDraft], details: &ProjectDetails) -> String {
        let mut by_country: BTreeMap<&str, usize> = BTreeMap::new();
        for email in emails {
            *by_country.entry(email.country.as_str()).or_default() += 1;
        }

        let deadline = details
            .quote_deadline
            .as_ref()
            .map(|d| d.to_string())
            .unwrap_or_else(|| "Not specified".to_string());

        let mut lines = vec![
            format!("**Email Generation Summary for {}**", details.project_name),
            String::new(),
            format!("\u{2022} Total emails generated: {}", emails.len()),
            format!("\u{2022} Quote deadline: {}", deadline),
            format!("\u{2022} Countries covered: {}", by_country.len()),
            String::new(),
        ];

        if !details.exclude_origins.is_empty() {
            lines.push(format!(
                "\u{2022} Excluded origins: {}",
                details.exclude_origins.join(", ")
            ));
            lines.push(String::new());
        }

        lines.push("**Distribution by Country:**".to_string());
        for (country, count) in by_country {
            lines.push(format!("  - {}: {} suppliers", country, count));
        }

        lines.join("\n")
    }

    /// Drafts as CSV with a header row
    pub fn export_emails_csv(&self, emails: &[EmailDraft]) -> Result<String> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        for email in emails {
            writer.serialize(email)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::internal(format!("Failed to flush CSV: {}", e)))?;
        String::from_utf8(bytes).map_err(|e| Error::internal(e.to_string()))
    }

    /// Check every supplier's address
    pub fn validate_email_addresses(&self, suppliers: &[Supplier]) -> Vec<EmailValidation> {
        suppliers
            .iter()
            .map(|supplier| {
                let email = supplier.email.trim();
                let issue = if email.is_empty() {
                    EmailIssue::Missing
                } else if EMAIL_PATTERN.is_match(email) {
                    EmailIssue::Valid
                } else {
                    EmailIssue::InvalidFormat
                };
                EmailValidation {
                    company_name: supplier.company_name.clone(),
                    email: email.to_string(),
                    is_valid: issue == EmailIssue::Valid,
                    issue,
                }
            })
            .collect()
    }

    /// Reminder body for a supplier that has not answered
    pub fn follow_up_email(&self, original: &EmailDraft, days_since_sent: u32) -> String {
        let lines = [
            greeting(&original.contact_person),
            String::new(),
            "I hope this email finds you well.".to_string(),
            String::new(),
            format!(
                "We sent a request for quotation to {} {} days ago and have not yet received a response.",
                original.company_name, days_since_sent
            ),
            String::new(),
            "We understand that you may be busy, but we would greatly appreciate your quotation \
             for our project. The information is valuable to our procurement process."
                .to_string(),
            String::new(),
            "If you need additional time or have any questions regarding the requirements, please \
             let us know. We are happy to extend the deadline or provide clarification as needed."
                .to_string(),
            String::new(),
            "If you are unable to provide a quotation for this project, please let us know so we \
             can update our records accordingly."
                .to_string(),
            String::new(),
            "Thank you for your time and consideration. We look forward to hearing from you soon."
                .to_string(),
            String::new(),
            String::new(),
            self.signature.clone(),
        ];
        lines.join("\n")
    }
}

fn greeting(contact_person: &str) -> String {
    let contact = contact_person.trim();
    if contact.is_empty() || contact.eq_ignore_ascii_case("nan") {
        "Dear Sir/Madam,".to_string()
    } else {
        format!("Dear {},", contact)
    }
}
