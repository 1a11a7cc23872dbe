//! Processed order tracking, stored as CSV

use chrono::NaiveDateTime;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{EmailDraft, NewOrder, Order, OrderStatistics, OrderStatus};

/// Material names recognised when summarising who was contacted
const CATEGORY_KEYWORDS: &[&str] = &[
    "piping",
    "pipes",
    "valves",
    "flanges",
    "fittings",
    "bolts",
    "gaskets",
    "finned tubes",
];

/// How many materials the statistics report
const TOP_MATERIALS: usize = 10;

/// Order log backed by one CSV file
#[derive(Debug, Clone)]
pub struct OrderTracker {
    path: PathBuf,
}

impl OrderTracker {
    /// Open the tracker; the file is created on first write
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Every order, oldest first
    pub fn orders(&self) -> Result<Vec<Order>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&self.path)?;
        let orders = reader
            .deserialize()
            .collect::<std::result::Result<Vec<Order>, _>>()?;
        Ok(orders)
    }

    fn save(&self, orders: &[Order]) -> Result<()> {
        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(Vec::new());
        writer.write_record(Order::HEADERS)?;
        for order in orders {
            writer.serialize(order)?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::internal(format!("Failed to flush CSV: {}", e)))?;
        fs::write(&self.path, bytes)?;
        Ok(())
    }

    /// Record a new quotation round as `Pending Response`
    pub fn add_processed_order(&self, new_order: NewOrder, now: NaiveDateTime) -> Result<Order> {
        let mut orders = self.orders()?;

        let base_id = format!("ORD-{}", now.format("%Y%m%d-%H%M%S"));
        let mut order_id = base_id.clone();
        let mut suffix = 1;
        while orders.iter().any(|o| o.order_id == order_id) {
            suffix += 1;
            order_id = format!("{}-{}", base_id, suffix);
        }

        let order = Order {
            order_id,
            project_name: new_order.project_name,
            tender_reference: new_order.tender_reference,
            date_processed: now.format("%Y-%m-%d %H:%M:%S").to_string(),
            materials: new_order.materials.join(", "),
            total_suppliers: new_order.total_suppliers,
            emails_sent: new_order.emails_sent,
            supplier_categories: new_order.supplier_categories,
            status: OrderStatus::PendingResponse,
            follow_up_date: new_order.follow_up_date,
            notes: new_order.notes,
        };

        tracing::info!("Recorded order {} for {}", order.order_id, order.project_name);
        orders.push(order.clone());
        self.save(&orders)?;
        Ok(order)
    }

    /// Orders still waiting on suppliers
    pub fn pending_orders(&self) -> Result<Vec<Order>> {
        Ok(self
            .orders()?
            .into_iter()
            .filter(|o| o.status.is_pending())
            .collect())
    }

    /// Change the status; empty `notes` leaves the existing notes alone
    pub fn update_status(&self, order_id: &str, status: OrderStatus, notes: &str) -> Result<Order> {
        let mut orders = self.orders()?;
        let order = orders
            .iter_mut()
            .find(|o| o.order_id == order_id)
            .ok_or_else(|| Error::not_found(format!("Order '{}'", order_id)))?;

        order.status = status;
        if !notes.is_empty() {
            order.notes = notes.to_string();
        }
        let updated = order.clone();

        self.save(&orders)?;
        tracing::info!("Order {} is now {}", order_id, status);
        Ok(updated)
    }

    pub fn statistics(&self) -> Result<OrderStatistics> {
        let orders = self.orders()?;

        let mut status_counts: BTreeMap<OrderStatus, usize> = BTreeMap::new();
        let mut material_counts: HashMap<String, usize> = HashMap::new();
        for order in &orders {
            *status_counts.entry(order.status).or_default() += 1;
            for material in order.material_list() {
                *material_counts.entry(material.to_string()).or_default() += 1;
            }
        }

        let mut top_materials: Vec<(String, usize)> = material_counts.into_iter().collect();
        top_materials.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        top_materials.truncate(TOP_MATERIALS);

        Ok(OrderStatistics {
            total_orders: orders.len(),
            pending_orders: orders.iter().filter(|o| o.status.is_pending()).count(),
            total_suppliers_contacted: orders.iter().map(|o| u64::from(o.total_suppliers)).sum(),
            total_emails_generated: orders.iter().map(|o| u64::from(o.emails_sent)).sum(),
            status_distribution: status_counts.into_iter().collect(),
            top_materials,
        })
    }
}

/// Summarise contacted suppliers per country, e.g.
/// `Chinese: 2 suppliers (piping, valves); Germany: 1 suppliers`
pub fn categorize_suppliers(emails: &[EmailDraft]) -> String {
    // country -> (count, materials), kept in first-seen order
    let mut categories: Vec<(&str, usize, BTreeSet<&'static str>)> = Vec::new();

    for email in emails {
        let country = if email.country.is_empty() {
            "Unknown"
        } else {
            email.country.as_str()
        };

        let index = match categories.iter().position(|(c, _, _)| *c == country) {
            Some(index) => index,
            None => {
                categories.push((country, 0, BTreeSet::new()));
                categories.len() - 1
            }
        };
        let entry = &mut categories[index];
        entry.1 += 1;

        let materials = email.materials.to_lowercase();
        for keyword in CATEGORY_KEYWORDS {
            if materials.contains(keyword) {
                entry.2.insert(*keyword);
            }
        }
    }

    categories
        .into_iter()
        .map(|(country, count, materials)| {
            let name = match country.to_lowercase().as_str() {
                "china" => "Chinese",
                "uae" => "Emirati",
                _ => country,
            };
            if materials.is_empty() {
                format!("{}: {} suppliers", name, count)
            } else {
                let list: Vec<&str> = materials.into_iter().collect();
                format!("{}: {} suppliers ({})", name, count, list.join(", "))
            }
        })
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tempfile::TempDir;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2025, 1, 8)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    fn new_order(project: &str, materials: &[&str]) -> NewOrder {
        NewOrder {
            project_name: project.to_string(),
            tender_reference: "RFQ-1".to_string(),
            materials: materials.iter().map(|m| m.to_string()).collect(),
            total_suppliers: 3,
            emails_sent: 3,
            supplier_categories: "Germany: 3 suppliers".to_string(),
            follow_up_date: "2025-01-21".to_string(),
            notes: "Generated for materials: valves".to_string(),
        }
    }

    fn draft(country: &str, materials: &str) -> EmailDraft {
        EmailDraft {
            country: country.to_string(),
            materials: materials.to_string(),
            ..Default::default()
        }
    }

    #[test]
    fn test_add_assigns_timestamp_ids() {
        let dir = TempDir::new().unwrap();
        let tracker = OrderTracker::open(dir.path().join("orders.csv")).unwrap();

        let first = tracker.add_processed_order(new_order("Alpha", &["valves"]), at(9, 30, 0)).unwrap();
        let second = tracker.add_processed_order(new_order("Beta", &["piping"]), at(9, 30, 0)).unwrap();

        assert_eq!(first.order_id, "ORD-20250108-093000");
        assert_eq!(second.order_id, "ORD-20250108-093000-2");
        assert_eq!(first.status, OrderStatus::PendingResponse);
        assert_eq!(first.date_processed, "2025-01-08 09:30:00");
        assert_eq!(tracker.orders().unwrap().len(), 2);
    }

    #[test]
    fn test_update_status_and_pending() {
        let dir = TempDir::new().unwrap();
        let tracker = OrderTracker::open(dir.path().join("orders.csv")).unwrap();
        let order = tracker.add_processed_order(new_order("Alpha", &["valves"]), at(10, 0, 0)).unwrap();

        let updated = tracker.update_status(&order.order_id, OrderStatus::QuotesReceived, "").unwrap();
        assert_eq!(updated.notes, "Generated for materials: valves");
        assert!(tracker.pending_orders().unwrap().is_empty());

        let updated = tracker
            .update_status(&order.order_id, OrderStatus::FollowUpRequired, "Chase Gulf Valves")
            .unwrap();
        assert_eq!(updated.notes, "Chase Gulf Valves");
        assert_eq!(tracker.pending_orders().unwrap().len(), 1);

        assert!(matches!(
            tracker.update_status("ORD-missing", OrderStatus::Completed, "").unwrap_err(),
            Error::NotFound(_)
        ));
    }

    #[test]
    fn test_statistics() {
        let dir = TempDir::new().unwrap();
        let tracker = OrderTracker::open(dir.path().join("orders.csv")).unwrap();
        tracker.add_processed_order(new_order("A", &["valves", "piping"]), at(8, 0, 0)).unwrap();
        tracker.add_processed_order(new_order("B", &["valves"]), at(8, 0, 1)).unwrap();
        let c = tracker.add_processed_order(new_order("C", &["bolts"]), at(8, 0, 2)).unwrap();
        tracker.update_status(&c.order_id, OrderStatus::Completed, "").unwrap();

        let stats = tracker.statistics().unwrap();
        assert_eq!(stats.total_orders, 3);
        assert_eq!(stats.pending_orders, 2);
        assert_eq!(stats.total_suppliers_contacted, 9);
        assert_eq!(stats.total_emails_generated, 9);
        assert_eq!(
            stats.status_distribution,
            vec![(OrderStatus::PendingResponse, 2), (OrderStatus::Completed, 1)]
        );
        assert_eq!(stats.top_materials[0], ("valves".to_string(), 2));
        assert_eq!(stats.top_materials.len(), 3);
    }

    #[test]
    fn test_categorize_suppliers() {
        let emails = vec![
            draft("China", "Valves, Piping"),
            draft("Germany", "Flanges"),
            draft("China", "fittings"),
            draft("UAE", ""),
        ];
        assert_eq!(
            categorize_suppliers(&emails),
            "Chinese: 2 suppliers (fittings, piping, valves); Germany: 1 suppliers (flanges); Emirati: 1 suppliers"
        );
        assert_eq!(categorize_suppliers(&[]), "");
    }
}
