//! Shared data types for newsletter runs

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::schedule::Mode;
use crate::sectors::{Edition, Sector};

/// One generated HTML file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ManifestFile {
    pub edition: Edition,
    pub filename: String,
    pub path: PathBuf,
    /// Size in bytes
    pub size: u64,
}

/// Record written next to the HTML files of each run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunManifest {
    /// `{sector}_{%Y%m%d_%H%M}` of the generation time
    pub run_id: String,
    pub sector: Sector,
    pub sector_name: String,
    pub mode: Mode,
    pub display_date: DateTime<FixedOffset>,
    pub cutoff_date: DateTime<FixedOffset>,
    pub timezone: String,
    pub files_generated: usize,
    pub files: Vec<ManifestFile>,
    pub tokens_used: u64,
    pub cost_estimate: f64,
    pub generated_at: DateTime<FixedOffset>,
    /// True when the model output did not contain both editions
    #[serde(default)]
    pub used_fallback: bool,
}

/// HTML produced for one edition, ready to be written
#[derive(Debug, Clone, PartialEq)]
pub struct EditionHtml {
    pub edition: Edition,
    pub html: String,
}

/// Result of a successful generation
#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub manifest: RunManifest,
    pub run_dir: PathBuf,
    pub message: String,
}
