//! Processed order records

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle of a quotation round
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OrderStatus {
    #[serde(rename = "Pending Response")]
    PendingResponse,
    #[serde(rename = "Quotes Received")]
    QuotesReceived,
    #[serde(rename = "Under Review")]
    UnderReview,
    #[serde(rename = "Follow Up Required")]
    FollowUpRequired,
    #[serde(rename = "Follow Up Completed")]
    FollowUpCompleted,
    #[serde(rename = "Completed")]
    Completed,
    #[serde(rename = "Cancelled")]
    Cancelled,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PendingResponse => "Pending Response",
            Self::QuotesReceived => "Quotes Received",
            Self::UnderReview => "Under Review",
            Self::FollowUpRequired => "Follow Up Required",
            Self::FollowUpCompleted => "Follow Up Completed",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// Orders still waiting on suppliers
    pub fn is_pending(&self) -> bool {
        matches!(self, Self::PendingResponse | Self::FollowUpRequired)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the processed orders CSV
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    #[serde(rename = "Order_ID")]
    pub order_id: String,
    #[serde(rename = "Project_Name", default)]
    pub project_name: String,
    #[serde(rename = "Tender_Reference", default)]
    pub tender_reference: String,
    /// `%Y-%m-%d %H:%M:%S`
    #[serde(rename = "Date_Processed", default)]
    pub date_processed: String,
    /// Comma separated
    #[serde(rename = "Materials", default)]
    pub materials: String,
    #[serde(rename = "Total_Suppliers", default)]
    pub total_suppliers: u32,
    #[serde(rename = "Emails_Sent", default)]
    pub emails_sent: u32,
    #[serde(rename = "Supplier_Categories", default)]
    pub supplier_categories: String,
    #[serde(rename = "Status")]
    pub status: OrderStatus,
    #[serde(rename = "Follow_Up_Date", default)]
    pub follow_up_date: String,
    #[serde(rename = "Notes", default)]
    pub notes: String,
}

impl Order {
    pub const HEADERS: [&'static str; 11] = [
        "Order_ID",
        "Project_Name",
        "Tender_Reference",
        "Date_Processed",
        "Materials",
        "Total_Suppliers",
        "Emails_Sent",
        "Supplier_Categories",
        "Status",
        "Follow_Up_Date",
        "Notes",
    ];

    /// Individual materials, trimmed
    pub fn material_list(&self) -> impl Iterator<Item = &str> {
        self.materials
            .split(',')
            .map(str::trim)
            .filter(|m| !m.is_empty())
    }
}

/// Input for recording a quotation round
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NewOrder {
    pub project_name: String,
    #[serde(default)]
    pub tender_reference: String,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub total_suppliers: u32,
    #[serde(default)]
    pub emails_sent: u32,
    #[serde(default)]
    pub supplier_categories: String,
    #[serde(default)]
    pub follow_up_date: String,
    #[serde(default)]
    pub notes: String,
}

/// Aggregate view over all orders
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderStatistics {
    pub total_orders: usize,
    pub pending_orders: usize,
    pub total_suppliers_contacted: u64,
    pub total_emails_generated: u64,
    /// Status to count, in status order
    pub status_distribution: Vec<(OrderStatus, usize)>,
    /// Most requested materials, highest count first
    pub top_materials: Vec<(String, usize)>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_names() {
        let json = serde_json::to_string(&OrderStatus::FollowUpRequired).unwrap();
        assert_eq!(json, "\"Follow Up Required\"");

        let parsed: OrderStatus = serde_json::from_str("\"Quotes Received\"").unwrap();
        assert_eq!(parsed, OrderStatus::QuotesReceived);
        assert!(!parsed.is_pending());
        assert!(OrderStatus::PendingResponse.is_pending());
    }
}
