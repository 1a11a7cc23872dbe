//! Terms and conditions, and consent records

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;

use crate::error::{Error, Result};
use crate::types::TermsAcceptance;

pub const TERMS_VERSION: &str = "1.0";
pub const TERMS_LAST_UPDATED: &str = "2024-12-19";

/// One numbered section of the terms
#[derive(Debug, Clone, Serialize)]
pub struct TermsSection {
    pub title: &'static str,
    pub summary: &'static str,
}

const SECTIONS: &[TermsSection] = &[
    TermsSection {
        title: "Service Description",
        summary: "Hamada Tool reads tender documents, manages a supplier registry, drafts \
                  quotation emails and tracks deadlines for oil & gas procurement.",
    },
    TermsSection {
        title: "Data Collection and Usage",
        summary: "Processed documents, generated emails, supplier searches, deadline \
                  calculations and order updates are logged to improve the service.",
    },
    TermsSection {
        title: "User Responsibilities",
        summary: "Only upload documents you are authorised to share and verify generated \
                  emails before sending them.",
    },
    TermsSection {
        title: "Service Availability and Support",
        summary: "The service is provided as is. Support is available by email and phone.",
    },
    TermsSection {
        title: "Limitation of Liability",
        summary: "Extracted fields and calculated deadlines must be checked against the \
                  source tender.",
    },
    TermsSection {
        title: "Privacy and Data Protection",
        summary: "You may request access to, correction of, export of or deletion of your data.",
    },
    TermsSection {
        title: "Changes to Terms",
        summary: "New versions require renewed acceptance. Previous versions are archived.",
    },
    TermsSection {
        title: "Contact Information",
        summary: "support@hamadatool.com, +20100 0266 344",
    },
];

/// The published terms document
#[derive(Debug, Clone, Serialize)]
pub struct TermsConditions {
    pub version: &'static str,
    pub last_updated: &'static str,
    pub sections: &'static [TermsSection],
}

impl Default for TermsConditions {
    fn default() -> Self {
        Self {
            version: TERMS_VERSION,
            last_updated: TERMS_LAST_UPDATED,
            sections: SECTIONS,
        }
    }
}

impl TermsConditions {
    /// Build the consent record; refused unless data collection is accepted
    pub fn accept(
        &self,
        user_id: &str,
        data_collection_consent: bool,
        now: DateTime<Utc>,
    ) -> Result<TermsAcceptance> {
        if !data_collection_consent {
            return Err(Error::TermsNotAccepted(
                "Data collection consent is required to use the service".to_string(),
            ));
        }
        if user_id.trim().is_empty() {
            return Err(Error::validation("user_id is required"));
        }

        Ok(TermsAcceptance {
            user_id: user_id.trim().to_string(),
            terms_version: self.version.to_string(),
            acceptance_timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
            data_collection_consent,
        })
    }
}
