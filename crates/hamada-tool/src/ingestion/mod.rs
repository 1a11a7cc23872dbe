//! Document ingestion: text extraction and field extraction

pub mod extractor;
pub mod parser;

pub use extractor::{TenderExtractor, MATERIAL_KEYWORDS};
pub use parser::FileParser;
