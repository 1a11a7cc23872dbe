//! hamada-tool: tender processing service for oil & gas procurement
//!
//! Reads tender documents and pulls out materials, deadlines and references,
//! keeps a CSV supplier registry, drafts quotation emails, tracks the orders
//! they create and logs activity to SQLite.

pub mod config;
pub mod error;
pub mod generation;
pub mod ingestion;
pub mod scheduling;
pub mod server;
pub mod storage;
pub mod terms;
pub mod types;

pub use config::HamadaConfig;
pub use error::{Error, Result};
pub use generation::EmailGenerator;
pub use ingestion::{FileParser, TenderExtractor};
pub use scheduling::DeadlineCalculator;
pub use types::{
    document::{FileType, TenderExtraction},
    email::{EmailDraft, ProjectDetails},
    order::{Order, OrderStatus},
    supplier::Supplier,
};
