//! Filesystem storage for generated runs and uploaded past issues
//!
//! Layout under the configured directories:
//! - `runs/<sector>/<YYYY-MM-DD>/` holds edition HTML plus a manifest
//! - `past_issues/<sector>/<YYYY-MM-DD>/<edition>.txt`

pub mod past_issues;
pub mod runs;

pub use past_issues::PastIssueStore;
pub use runs::{NewRun, RunStore};

use chrono::NaiveDate;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Accept only canonical `YYYY-MM-DD` dates as path components
pub fn validate_date_component(date: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d")
        .ok()
        .filter(|parsed| parsed.format("%Y-%m-%d").to_string() == date)
        .ok_or_else(|| Error::validation(format!("Invalid date '{}', expected YYYY-MM-DD", date)))
}

/// Reduce a user-supplied name to a safe ASCII file name.
///
/// Path separators and whitespace become underscores, other characters
/// outside `[A-Za-z0-9_.-]` are dropped, and leading or trailing dots and
/// underscores are trimmed.
pub fn secure_filename(name: &str) -> String {
    let joined = name
        .replace(['/', '\\'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("_");

    joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect::<String>()
        .trim_matches(|c| c == '.' || c == '_')
        .to_string()
}

/// Date-named subdirectories of `dir`, oldest first
fn dated_dirs(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut dirs = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        let is_dated = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| validate_date_component(n).is_ok());
        if path.is_dir() && is_dated {
            dirs.push(path);
        }
    }
    dirs.sort();
    Ok(dirs)
}

/// Remove the oldest dated directories so at most `keep` remain.
///
/// `current` is the directory just written and always survives, even when
/// it is older than everything else.
fn prune_dated_dirs(dir: &Path, keep: usize, current: &Path) -> Result<usize> {
    let others: Vec<PathBuf> = dated_dirs(dir)?
        .into_iter()
        .filter(|d| d != current)
        .collect();
    let excess = others.len().saturating_sub(keep.saturating_sub(1));
    for old in &others[..excess] {
        fs::remove_dir_all(old)?;
        tracing::info!("Pruned {}", old.display());
    }
    Ok(excess)
}
