//! Quotation email types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Quote deadline as entered: either a calendar date or free text
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum QuoteDeadline {
    Date(NaiveDate),
    Text(String),
}

impl QuoteDeadline {
    /// Long form used in email bodies, e.g. `January 15, 2025`
    pub fn long_form(&self) -> String {
        match self {
            Self::Date(date) => date.format("%B %d, %Y").to_string(),
            Self::Text(text) => text.clone(),
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Self::Date(date) => Some(*date),
            Self::Text(_) => None,
        }
    }
}

impl fmt::Display for QuoteDeadline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Date(date) => write!(f, "{}", date),
            Self::Text(text) => f.write_str(text),
        }
    }
}

/// What the quotation request is about
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectDetails {
    pub project_name: String,
    #[serde(default)]
    pub tender_reference: String,
    #[serde(default)]
    pub quote_deadline: Option<QuoteDeadline>,
    /// Free text, one requirement per line
    #[serde(default)]
    pub requirements: String,
    #[serde(default)]
    pub additional_notes: String,
    #[serde(default)]
    pub exclude_origins: Vec<String>,
    /// Mention the excluded origins in the email body
    #[serde(default)]
    pub include_note: bool,
}

/// A generated quotation request for one supplier
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct EmailDraft {
    pub company_name: String,
    pub contact_person: String,
    pub email: String,
    pub country: String,
    pub materials: String,
    pub subject: String,
    pub email_body: String,
}

/// Outcome of checking one supplier address
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum EmailIssue {
    Valid,
    Missing,
    #[serde(rename = "Invalid format")]
    InvalidFormat,
}

/// Address check for one supplier
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmailValidation {
    #[serde(rename = "Company_Name")]
    pub company_name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "Is_Valid")]
    pub is_valid: bool,
    #[serde(rename = "Issue")]
    pub issue: EmailIssue,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline_accepts_date_or_text() {
        let date: QuoteDeadline = serde_json::from_str("\"2025-01-15\"").unwrap();
        assert_eq!(date.long_form(), "January 15, 2025");
        assert_eq!(date.to_string(), "2025-01-15");

        let text: QuoteDeadline = serde_json::from_str("\"end of next week\"").unwrap();
        assert_eq!(text, QuoteDeadline::Text("end of next week".into()));
        assert!(text.as_date().is_none());
    }
}
