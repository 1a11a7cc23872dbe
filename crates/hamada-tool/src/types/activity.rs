//! Activity log records

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Kinds of user activity recorded in the activity log
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    DocumentProcessed,
    EmailGenerated,
    SupplierSearched,
    DeadlineCalculated,
    OrderTracked,
    TermsAccepted,
}

impl ActivityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DocumentProcessed => "document_processed",
            Self::EmailGenerated => "email_generated",
            Self::SupplierSearched => "supplier_searched",
            Self::DeadlineCalculated => "deadline_calculated",
            Self::OrderTracked => "order_tracked",
            Self::TermsAccepted => "terms_accepted",
        }
    }
}

impl fmt::Display for ActivityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActivityType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "document_processed" => Ok(Self::DocumentProcessed),
            "email_generated" => Ok(Self::EmailGenerated),
            "supplier_searched" => Ok(Self::SupplierSearched),
            "deadline_calculated" => Ok(Self::DeadlineCalculated),
            "order_tracked" => Ok(Self::OrderTracked),
            "terms_accepted" => Ok(Self::TermsAccepted),
            other => Err(format!("unknown activity type: {}", other)),
        }
    }
}

/// Totals over the activity log
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct UsageStatistics {
    pub total_activities: u64,
    /// Activity type to count
    pub activity_breakdown: BTreeMap<String, u64>,
    /// Timestamp of the most recent activity
    pub last_activity: Option<String>,
}

/// A stored consent record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TermsAcceptance {
    pub user_id: String,
    pub terms_version: String,
    /// UTC, RFC 3339
    pub acceptance_timestamp: String,
    pub data_collection_consent: bool,
}
