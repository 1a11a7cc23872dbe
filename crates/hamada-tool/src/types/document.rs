//! Tender document types

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Supported tender document formats
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileType {
    /// PDF document
    Pdf,
    /// Microsoft Word document (.docx, .doc)
    Docx,
    /// Excel spreadsheet (.xlsx, .xls)
    Xlsx,
    /// Plain text file
    Txt,
    /// Anything else
    Unknown,
}

impl FileType {
    /// Detect file type from extension
    pub fn from_extension(ext: &str) -> Self {
        match ext.to_lowercase().as_str() {
            "pdf" => Self::Pdf,
            "docx" | "doc" => Self::Docx,
            "xlsx" | "xls" => Self::Xlsx,
            "txt" => Self::Txt,
            _ => Self::Unknown,
        }
    }

    /// Detect file type from the extension of a filename
    pub fn from_filename(filename: &str) -> Self {
        Self::from_extension(extension_of(filename))
    }

    /// Check if this is a supported file type
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::Unknown)
    }

    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Pdf => "PDF",
            Self::Docx => "Word Document",
            Self::Xlsx => "Excel Spreadsheet",
            Self::Txt => "Text File",
            Self::Unknown => "Unknown",
        }
    }
}

/// Text after the last dot, or the whole name when there is none
pub fn extension_of(filename: &str) -> &str {
    filename.rsplit('.').next().unwrap_or("")
}

/// Fields scraped from a tender document
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct TenderExtraction {
    /// Full extracted text
    pub text: String,
    /// Material categories mentioned in the document
    pub materials: Vec<String>,
    /// Client deadline, if one was found
    pub deadline: Option<NaiveDate>,
    /// Lines that look like technical specifications
    pub specifications: Vec<String>,
    /// Project name (title-cased)
    pub project_name: String,
    /// Tender reference (upper-cased)
    pub tender_reference: String,
    /// Supplier deadline derived from `deadline`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub supplier_deadline: Option<NaiveDate>,
}

/// Metadata about an uploaded document, for the activity log
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfo {
    /// Original filename
    pub filename: String,
    /// Detected format
    pub file_type: FileType,
    /// Size in bytes
    pub size: u64,
}
