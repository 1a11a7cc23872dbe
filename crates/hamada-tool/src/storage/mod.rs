//! Persistence: CSV registries and the SQLite activity log

pub mod database;
pub mod orders;
pub mod suppliers;

pub use database::{ActivityDb, MirrorTable};
pub use orders::{categorize_suppliers, OrderTracker};
pub use suppliers::{
    filter_suppliers, search_suppliers, statistics as supplier_statistics, suppliers_by_country,
    suppliers_by_material, SupplierStore, EUROPEAN_COUNTRIES, REGIONAL_REQUIREMENT,
};
