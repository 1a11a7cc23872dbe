//! Application state for the tender processing server

use chrono::{Local, NaiveDate, NaiveDateTime};
use parking_lot::Mutex;
use std::sync::Arc;

use crate::config::HamadaConfig;
use crate::error::Result;
use crate::generation::EmailGenerator;
use crate::scheduling::DeadlineCalculator;
use crate::storage::{ActivityDb, OrderTracker, SupplierStore};
use crate::terms::TermsConditions;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: HamadaConfig,
    /// Held across read-modify-write of the registry file
    suppliers: Mutex<SupplierStore>,
    /// Held across read-modify-write of the orders file
    orders: Mutex<OrderTracker>,
    activity: ActivityDb,
    generator: EmailGenerator,
    deadlines: DeadlineCalculator,
    terms: TermsConditions,
}

impl AppState {
    /// Open the stores named in the configuration
    pub fn new(config: HamadaConfig) -> Result<Self> {
        tracing::info!("Initializing Hamada Tool state...");

        let suppliers = SupplierStore::open(&config.storage.suppliers_csv)?;
        tracing::info!("Supplier registry: {}", suppliers.path().display());

        let orders = OrderTracker::open(&config.storage.orders_csv)?;
        tracing::info!("Order log: {}", orders.path().display());

        let activity = ActivityDb::new(&config.storage.database_path, &config.activity)?;
        tracing::info!(
            "Activity database: {} (logging {})",
            config.storage.database_path.display(),
            if activity.is_enabled() { "enabled" } else { "disabled" }
        );

        let generator = EmailGenerator::new(config.email.signature.clone());
        let deadlines = DeadlineCalculator::new(config.deadlines.buffer_days);

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                suppliers: Mutex::new(suppliers),
                orders: Mutex::new(orders),
                activity,
                generator,
                deadlines,
                terms: TermsConditions::default(),
            }),
        })
    }

    pub fn config(&self) -> &HamadaConfig {
        &self.inner.config
    }

    pub fn suppliers(&self) -> &Mutex<SupplierStore> {
        &self.inner.suppliers
    }

    pub fn orders(&self) -> &Mutex<OrderTracker> {
        &self.inner.orders
    }

    pub fn activity(&self) -> &ActivityDb {
        &self.inner.activity
    }

    pub fn generator(&self) -> &EmailGenerator {
        &self.inner.generator
    }

    pub fn deadlines(&self) -> &DeadlineCalculator {
        &self.inner.deadlines
    }

    pub fn terms(&self) -> &TermsConditions {
        &self.inner.terms
    }

    /// Run a logging call; failures are reported but never fail the request
    pub fn log<F>(&self, f: F)
    where
        F: FnOnce(&ActivityDb) -> Result<()>,
    {
        if let Err(e) = f(&self.inner.activity) {
            tracing::warn!("Failed to record activity: {}", e);
        }
    }

    /// Local calendar date
    pub fn today(&self) -> NaiveDate {
        Local::now().date_naive()
    }

    /// Local wall-clock time
    pub fn now(&self) -> NaiveDateTime {
        Local::now().naive_local()
    }
}
