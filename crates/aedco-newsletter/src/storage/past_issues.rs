//! Uploaded past issues used to avoid repeating stories

use std::fs;
use std::path::{Path, PathBuf};

use super::{dated_dirs, prune_dated_dirs, secure_filename, validate_date_component};
use crate::error::{Error, Result};
use crate::sectors::Sector;

/// How many of the newest issue dates go into a prompt
const PROMPT_ISSUE_DATES: usize = 5;

/// Past issue text files under `past_issues/<sector>/<date>/`
#[derive(Debug, Clone)]
pub struct PastIssueStore {
    root: PathBuf,
    max_per_sector: usize,
}

impl PastIssueStore {
    pub fn new(root: impl Into<PathBuf>, max_per_sector: usize) -> Self {
        Self {
            root: root.into(),
            max_per_sector,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Store an uploaded issue as `<edition>.txt`, returning its path
    pub fn save(&self, sector: Sector, edition: &str, date: &str, content: &[u8]) -> Result<PathBuf> {
        validate_date_component(date)?;
        let filename = secure_filename(&format!("{}.txt", edition.trim()));
        if filename.is_empty() || filename == "txt" {
            return Err(Error::validation(format!("Invalid edition name '{}'", edition)));
        }

        let dir = self.root.join(sector.key()).join(date);
        fs::create_dir_all(&dir)?;
        let path = dir.join(filename);
        fs::write(&path, content)?;
        tracing::info!("Stored past issue {} ({} bytes)", path.display(), content.len());

        prune_dated_dirs(&self.root.join(sector.key()), self.max_per_sector, &dir)?;
        Ok(path)
    }

    /// Recent issues formatted for the prompt; empty when there are none
    pub fn load(&self, sector: Sector) -> Result<String> {
        let mut dirs = dated_dirs(&self.root.join(sector.key()))?;
        dirs.reverse();

        let mut issues = Vec::new();
        for dir in dirs.into_iter().take(PROMPT_ISSUE_DATES) {
            let date = dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();

            let mut files: Vec<PathBuf> = fs::read_dir(&dir)?
                .filter_map(|entry| entry.ok().map(|e| e.path()))
                .filter(|p| p.is_file() && p.extension().is_some_and(|ext| ext == "txt"))
                .collect();
            files.sort();

            for file in files {
                let stem = file
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_default();
                let content = String::from_utf8_lossy(&fs::read(&file)?).into_owned();
                issues.push(format!("--- {} ({}) ---\n{}\n", stem, date, content));
            }
        }

        if issues.is_empty() {
            return Ok(String::new());
        }
        Ok(format!("\n--- PAST_ISSUES_START ---\n{}", issues.join("\n")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let dir = TempDir::new().unwrap();
        let store = PastIssueStore::new(dir.path(), 50);
        assert_eq!(store.load(Sector::OilGas).unwrap(), "");

        let path = store
            .save(Sector::OilGas, "Egyptian Clients", "2025-01-06", b"Pipeline tender")
            .unwrap();
        assert_eq!(
            path,
            dir.path().join("oil_gas/2025-01-06/Egyptian_Clients.txt")
        );
        store.save(Sector::OilGas, "Principals", "2025-01-06", b"Refinery upgrade").unwrap();

        assert_eq!(
            store.load(Sector::OilGas).unwrap(),
            "\n--- PAST_ISSUES_START ---\n\
             --- Egyptian_Clients (2025-01-06) ---\nPipeline tender\n\n\
             --- Principals (2025-01-06) ---\nRefinery upgrade\n"
        );
        assert_eq!(store.load(Sector::Electricity).unwrap(), "");
    }

    #[test]
    fn test_load_uses_five_newest_dates() {
        let dir = TempDir::new().unwrap();
        let store = PastIssueStore::new(dir.path(), 50);
        for day in 1..=7 {
            let date = format!("2025-01-0{}", day);
            store.save(Sector::Electricity, "Principals", &date, date.as_bytes()).unwrap();
        }

        let text = store.load(Sector::Electricity).unwrap();
        assert!(text.contains("(2025-01-07)"));
        assert!(text.contains("(2025-01-03)"));
        assert!(!text.contains("(2025-01-02)"));
        assert!(text.find("2025-01-07").unwrap() < text.find("2025-01-03").unwrap());
    }

    #[test]
    fn test_save_rejects_bad_input_and_prunes() {
        let dir = TempDir::new().unwrap();
        let store = PastIssueStore::new(dir.path(), 2);

        assert!(matches!(
            store.save(Sector::OilGas, "Principals", "../x", b"x"),
            Err(Error::Validation(_))
        ));
        assert!(matches!(
            store.save(Sector::OilGas, "../", "2025-01-01", b"x"),
            Err(Error::Validation(_))
        ));

        for date in ["2025-01-01", "2025-01-02", "2025-01-03"] {
            store.save(Sector::OilGas, "Principals", date, b"x").unwrap();
        }
        assert!(!dir.path().join("oil_gas/2025-01-01").exists());
        assert!(dir.path().join("oil_gas/2025-01-03").exists());
    }

    #[test]
    fn test_saving_an_older_issue_keeps_it() {
        let dir = TempDir::new().unwrap();
        let store = PastIssueStore::new(dir.path(), 2);
        store.save(Sector::OilGas, "Principals", "2025-03-01", b"March").unwrap();
        store.save(Sector::OilGas, "Principals", "2025-03-02", b"March").unwrap();

        let path = store
            .save(Sector::OilGas, "Principals", "2025-01-01", b"January")
            .unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"January");
        assert!(!dir.path().join("oil_gas/2025-03-01").exists());
        assert!(dir.path().join("oil_gas/2025-03-02").exists());
    }
}
