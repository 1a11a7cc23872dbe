//! SQLite activity log and record mirror
//!
//! Holds the append-only activity and consent logs plus flat copies of
//! suppliers, processed documents, generated emails and tracked orders.

use chrono::{SecondsFormat, Utc};
use parking_lot::Mutex;
use rusqlite::{params, Connection};
use serde_json::{json, Value};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::config::ActivityConfig;
use crate::error::{Error, Result};
use crate::types::{
    ActivityType, EmailDraft, FileInfo, Order, ProjectDetails, Supplier, TenderExtraction,
    TermsAcceptance, UsageStatistics,
};

/// SQLite-backed activity database
pub struct ActivityDb {
    conn: Arc<Mutex<Connection>>,
    enabled: bool,
    tool_version: String,
}

impl ActivityDb {
    /// Create or open the database at the given path
    pub fn new<P: AsRef<Path>>(path: P, config: &ActivityConfig) -> Result<Self> {
        if let Some(dir) = path.as_ref().parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)?;
        }
        let conn = Connection::open(path)
            .map_err(|e| Error::database(format!("Failed to open database: {}", e)))?;
        Self::with_connection(conn, config)
    }

    /// Create an in-memory database (for testing)
    #[cfg(test)]
    pub fn in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| Error::database(format!("Failed to open in-memory database: {}", e)))?;
        Self::with_connection(conn, &ActivityConfig::default())
    }

    fn with_connection(conn: Connection, config: &ActivityConfig) -> Result<Self> {
        let db = Self {
            conn: Arc::new(Mutex::new(conn)),
            enabled: config.enabled,
            tool_version: config.tool_version.clone(),
        };
        db.migrate()?;
        Ok(db)
    }

    fn migrate(&self) -> Result<()> {
        let conn = self.conn.lock();

        conn.execute_batch(
            r#"
            PRAGMA journal_mode=WAL;
            PRAGMA synchronous=NORMAL;
            "#,
        )
        .map_err(|e| Error::database(format!("Failed to set pragmas: {}", e)))?;

        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS user_activities (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                activity_type TEXT NOT NULL,
                data TEXT NOT NULL,
                user_id TEXT NOT NULL DEFAULT 'anonymous',
                timestamp TEXT NOT NULL,
                tool_version TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_user_activities_type ON user_activities(activity_type);
            CREATE INDEX IF NOT EXISTS idx_user_activities_timestamp ON user_activities(timestamp);

            CREATE TABLE IF NOT EXISTS terms_acceptance (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id TEXT NOT NULL,
                terms_version TEXT NOT NULL,
                acceptance_timestamp TEXT NOT NULL,
                data_collection_consent INTEGER NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_terms_acceptance_timestamp ON terms_acceptance(acceptance_timestamp);

            CREATE TABLE IF NOT EXISTS supplier_data (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                company_name TEXT NOT NULL UNIQUE,
                contact_person TEXT,
                email TEXT,
                phone TEXT,
                address TEXT,
                country TEXT,
                specialization TEXT,
                established_year INTEGER,
                material_categories TEXT,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_supplier_data_company ON supplier_data(company_name);

            CREATE TABLE IF NOT EXISTS processed_documents (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                filename TEXT NOT NULL,
                file_type TEXT NOT NULL,
                file_size INTEGER NOT NULL,
                project_name TEXT,
                tender_reference TEXT,
                deadline TEXT,
                materials TEXT NOT NULL,
                specifications TEXT NOT NULL,
                processed_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_processed_documents_processed_at ON processed_documents(processed_at);

            CREATE TABLE IF NOT EXISTS generated_emails (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                project_name TEXT NOT NULL,
                tender_reference TEXT,
                company_name TEXT NOT NULL,
                email TEXT,
                country TEXT,
                subject TEXT NOT NULL,
                email_body TEXT NOT NULL,
                generated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_generated_emails_generated_at ON generated_emails(generated_at);

            CREATE TABLE IF NOT EXISTS order_tracking (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                order_id TEXT NOT NULL UNIQUE,
                project_name TEXT NOT NULL,
                tender_reference TEXT,
                status TEXT NOT NULL,
                materials TEXT,
                supplier_emails TEXT NOT NULL,
                follow_up_date TEXT,
                notes TEXT,
                updated_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_order_tracking_order_id ON order_tracking(order_id);
            "#,
        )
        .map_err(|e| Error::database(format!("Failed to run migrations: {}", e)))?;

        tracing::info!("Activity database migrations complete");
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    // ==================== Activity Log ====================

    /// Append an activity row; a no-op when activity logging is disabled
    pub fn log_activity(&self, activity_type: ActivityType, data: Value, user_id: Option<&str>) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO user_activities (activity_type, data, user_id, timestamp, tool_version)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                activity_type.as_str(),
                data.to_string(),
                user_id.unwrap_or("anonymous"),
                now_iso(),
                self.tool_version,
            ],
        )?;

        tracing::debug!("Logged activity {}", activity_type);
        Ok(())
    }

    pub fn log_document_processing(&self, file_info: &FileInfo, extraction: &TenderExtraction) -> Result<()> {
        self.log_activity(
            ActivityType::DocumentProcessed,
            json!({
                "file_info": file_info,
                "processing_results": {
                    "project_name": extraction.project_name,
                    "tender_reference": extraction.tender_reference,
                    "text_length": extraction.text.len(),
                },
                "extracted_deadlines": extraction.deadline.map(|d| vec![d.to_string()]).unwrap_or_default(),
                "extracted_materials": extraction.materials,
                "extracted_specifications": extraction.specifications,
            }),
            None,
        )
    }

    pub fn log_email_generation(&self, details: &ProjectDetails, supplier_count: usize) -> Result<()> {
        self.log_activity(
            ActivityType::EmailGenerated,
            json!({
                "email_data": details,
                "supplier_count": supplier_count,
                "project_name": details.project_name,
                "tender_reference": details.tender_reference,
            }),
            None,
        )
    }

    pub fn log_supplier_search(&self, criteria: Value, results_count: usize) -> Result<()> {
        let materials = criteria.get("materials").cloned().unwrap_or_else(|| json!([]));
        self.log_activity(
            ActivityType::SupplierSearched,
            json!({
                "search_criteria": criteria,
                "results_count": results_count,
                "materials_searched": materials,
            }),
            None,
        )
    }

    pub fn log_deadline_calculation(&self, client_deadline: &str, supplier_deadline: &str, buffer_days: i64) -> Result<()> {
        self.log_activity(
            ActivityType::DeadlineCalculated,
            json!({
                "client_deadline": client_deadline,
                "supplier_deadline": supplier_deadline,
                "buffer_days": buffer_days,
            }),
            None,
        )
    }

    pub fn log_order_tracking(&self, order: &Order) -> Result<()> {
        self.log_activity(
            ActivityType::OrderTracked,
            json!({
                "order_data": order,
                "order_status": order.status,
            }),
            None,
        )
    }

    // ==================== Consent ====================

    /// Persist a consent record and log the acceptance
    pub fn record_terms_acceptance(&self, acceptance: &TermsAcceptance) -> Result<()> {
        {
            let conn = self.conn.lock();
            conn.execute(
                "INSERT INTO terms_acceptance (user_id, terms_version, acceptance_timestamp, data_collection_consent)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    acceptance.user_id,
                    acceptance.terms_version,
                    acceptance.acceptance_timestamp,
                    acceptance.data_collection_consent,
                ],
            )?;
        }

        self.log_activity(
            ActivityType::TermsAccepted,
            json!({
                "terms_version": acceptance.terms_version,
                "acceptance_timestamp": acceptance.acceptance_timestamp,
                "data_collection_consent": acceptance.data_collection_consent,
            }),
            Some(acceptance.user_id.as_str()),
        )
    }

    /// Number of stored consent records
    pub fn terms_acceptance_count(&self) -> Result<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row("SELECT COUNT(*) FROM terms_acceptance", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    // ==================== Record Mirror ====================

    pub fn record_processed_document(&self, file_info: &FileInfo, extraction: &TenderExtraction) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            "INSERT INTO processed_documents (
                filename, file_type, file_size, project_name, tender_reference,
                deadline, materials, specifications, processed_at
             ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                file_info.filename,
                file_info.file_type.display_name(),
                file_info.size as i64,
                extraction.project_name,
                extraction.tender_reference,
                extraction.deadline.map(|d| d.to_string()),
                serde_json::to_string(&extraction.materials)?,
                serde_json::to_string(&extraction.specifications)?,
                now_iso(),
            ],
        )?;
        Ok(())
    }

    /// Store every draft of one generation run in a single transaction
    pub fn record_generated_emails(&self, details: &ProjectDetails, emails: &[EmailDraft]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction()?;
        let generated_at = now_iso();
        {
            let mut stmt = tx.prepare(
                "INSERT INTO generated_emails (
                    project_name, tender_reference, company_name, email, country,
                    subject, email_body, generated_at
                 ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for email in emails {
                stmt.execute(params![
                    details.project_name,
                    details.tender_reference,
                    email.company_name,
                    email.email,
                    email.country,
                    email.subject,
                    email.email_body,
                    generated_at,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    pub fn upsert_order_tracking(&self, order: &Order, supplier_emails: &[String]) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            r#"
            INSERT INTO order_tracking (
                order_id, project_name, tender_reference, status, materials,
                supplier_emails, follow_up_date, notes, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            ON CONFLICT(order_id) DO UPDATE SET
                status = excluded.status,
                notes = excluded.notes,
                follow_up_date = excluded.follow_up_date,
                supplier_emails = CASE
                    WHEN excluded.supplier_emails = '[]' THEN order_tracking.supplier_emails
                    ELSE excluded.supplier_emails
                END,
                updated_at = excluded.updated_at
            "#,
            params![
                order.order_id,
                order.project_name,
                order.tender_reference,
                order.status.as_str(),
                order.materials,
                serde_json::to_string(supplier_emails)?,
                order.follow_up_date,
                order.notes,
                now_iso(),
            ],
        )?;
        Ok(())
    }

    /// Status of a mirrored order
    pub fn order_status(&self, order_id: &str) -> Result<Option<String>> {
        use rusqlite::OptionalExtension;

        let conn = self.conn.lock();
        let status = conn
            .query_row(
                "SELECT status FROM order_tracking WHERE order_id = ?1",
                params![order_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(status)
    }

    pub fn upsert_supplier(&self, supplier: &Supplier) -> Result<()> {
        let conn = self.conn.lock();
        conn.execute(
            r#"
            INSERT INTO supplier_data (
                company_name, contact_person, email, phone, address, country,
                specialization, established_year, material_categories, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(company_name) DO UPDATE SET
                contact_person = excluded.contact_person,
                email = excluded.email,
                phone = excluded.phone,
                address = excluded.address,
                country = excluded.country,
                specialization = excluded.specialization,
                established_year = excluded.established_year,
                material_categories = excluded.material_categories,
                updated_at = excluded.updated_at
            "#,
            params![
                supplier.company_name,
                supplier.contact_person,
                supplier.email,
                supplier.phone,
                supplier.address,
                supplier.country,
                supplier.specialization,
                supplier.established_year,
                supplier.material_categories,
                now_iso(),
            ],
        )?;
        Ok(())
    }

    /// Remove a mirrored supplier, returning whether a row existed
    pub fn delete_supplier(&self, company_name: &str) -> Result<bool> {
        let conn = self.conn.lock();
        let deleted = conn.execute(
            "DELETE FROM supplier_data WHERE company_name = ?1",
            params![company_name],
        )?;
        Ok(deleted > 0)
    }

    /// Row count of a mirror table
    pub fn table_count(&self, table: MirrorTable) -> Result<u64> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            &format!("SELECT COUNT(*) FROM {}", table.name()),
            [],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    // ==================== Statistics ====================

    pub fn usage_statistics(&self) -> Result<UsageStatistics> {
        let conn = self.conn.lock();

        let mut stmt = conn.prepare(
            "SELECT activity_type, COUNT(*) FROM user_activities GROUP BY activity_type",
        )?;
        let breakdown = stmt
            .query_map([], |row| Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)? as u64)))?
            .collect::<rusqlite::Result<BTreeMap<String, u64>>>()?;

        let last_activity = conn
            .query_row(
                "SELECT timestamp FROM user_activities ORDER BY id DESC LIMIT 1",
                [],
                |row| row.get::<_, String>(0),
            )
            .ok();

        Ok(UsageStatistics {
            total_activities: breakdown.values().sum(),
            activity_breakdown: breakdown,
            last_activity,
        })
    }
}

/// Tables holding flat copies of records
#[derive(Debug, Clone, Copy)]
pub enum MirrorTable {
    SupplierData,
    ProcessedDocuments,
    GeneratedEmails,
    OrderTracking,
}

impl MirrorTable {
    fn name(&self) -> &'static str {
        match self {
            Self::SupplierData => "supplier_data",
            Self::ProcessedDocuments => "processed_documents",
            Self::GeneratedEmails => "generated_emails",
            Self::OrderTracking => "order_tracking",
        }
    }
}

fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{FileType, OrderStatus};

    fn order(id: &str, status: OrderStatus) -> Order {
        Order {
            order_id: id.to_string(),
            project_name: "West Delta".to_string(),
            tender_reference: "WDG-1".to_string(),
            date_processed: "2025-01-08 09:00:00".to_string(),
            materials: "valves".to_string(),
            total_suppliers: 2,
            emails_sent: 2,
            supplier_categories: String::new(),
            status,
            follow_up_date: "2025-01-21".to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn test_log_and_usage_statistics() {
        let db = ActivityDb::in_memory().unwrap();
        db.log_deadline_calculation("2025-01-20", "2025-01-18", 2).unwrap();
        db.log_supplier_search(json!({"materials": ["valves"]}), 4).unwrap();
        db.log_supplier_search(json!({"search": "pipe"}), 1).unwrap();

        let stats = db.usage_statistics().unwrap();
        assert_eq!(stats.total_activities, 3);
        assert_eq!(stats.activity_breakdown["supplier_searched"], 2);
        assert_eq!(stats.activity_breakdown["deadline_calculated"], 1);
        assert!(stats.last_activity.is_some());
    }

    #[test]
    fn test_disabled_logging_is_a_no_op() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = ActivityConfig {
            enabled: false,
            ..Default::default()
        };
        let db = ActivityDb::new(dir.path().join("activity.db"), &config).unwrap();

        db.log_deadline_calculation("2025-01-20", "2025-01-18", 2).unwrap();
        assert_eq!(db.usage_statistics().unwrap().total_activities, 0);
        assert!(db.usage_statistics().unwrap().last_activity.is_none());
    }

    #[test]
    fn test_terms_acceptance_writes_consent_and_activity() {
        let db = ActivityDb::in_memory().unwrap();
        let acceptance = TermsAcceptance {
            user_id: "eng-42".to_string(),
            terms_version: "1.0".to_string(),
            acceptance_timestamp: "2025-01-08T09:00:00Z".to_string(),
            data_collection_consent: true,
        };
        db.record_terms_acceptance(&acceptance).unwrap();

        assert_eq!(db.terms_acceptance_count().unwrap(), 1);
        let stats = db.usage_statistics().unwrap();
        assert_eq!(stats.activity_breakdown["terms_accepted"], 1);
    }

    #[test]
    fn test_document_and_email_mirrors() {
        let db = ActivityDb::in_memory().unwrap();
        let info = FileInfo {
            filename: "tender.txt".to_string(),
            file_type: FileType::Txt,
            size: 120,
        };
        let extraction = TenderExtraction {
            materials: vec!["valves".to_string()],
            ..Default::default()
        };
        db.record_processed_document(&info, &extraction).unwrap();
        db.log_document_processing(&info, &extraction).unwrap();

        let details = ProjectDetails {
            project_name: "West Delta".to_string(),
            ..Default::default()
        };
        let drafts = vec![EmailDraft::default(), EmailDraft::default()];
        db.record_generated_emails(&details, &drafts).unwrap();

        assert_eq!(db.table_count(MirrorTable::ProcessedDocuments).unwrap(), 1);
        assert_eq!(db.table_count(MirrorTable::GeneratedEmails).unwrap(), 2);
    }

    #[test]
    fn test_order_upsert_keeps_supplier_emails() {
        let db = ActivityDb::in_memory().unwrap();
        let emails = vec!["a@x.com".to_string(), "b@y.com".to_string()];

        db.upsert_order_tracking(&order("ORD-1", OrderStatus::PendingResponse), &emails)
            .unwrap();
        db.upsert_order_tracking(&order("ORD-1", OrderStatus::Completed), &[])
            .unwrap();

        assert_eq!(db.table_count(MirrorTable::OrderTracking).unwrap(), 1);
        assert_eq!(db.order_status("ORD-1").unwrap().as_deref(), Some("Completed"));
        assert_eq!(db.order_status("ORD-2").unwrap(), None);
    }

    #[test]
    fn test_supplier_mirror() {
        let db = ActivityDb::in_memory().unwrap();
        let mut supplier = Supplier {
            company_name: "Gulf Valves".to_string(),
            ..Default::default()
        };
        db.upsert_supplier(&supplier).unwrap();
        supplier.country = "UAE".to_string();
        db.upsert_supplier(&supplier).unwrap();

        assert_eq!(db.table_count(MirrorTable::SupplierData).unwrap(), 1);
        assert!(db.delete_supplier("Gulf Valves").unwrap());
        assert!(!db.delete_supplier("Gulf Valves").unwrap());
    }
}
