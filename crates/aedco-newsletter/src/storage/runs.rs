//! Generated newsletter runs

use chrono::DateTime;
use chrono_tz::Tz;
use std::fs;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use super::{prune_dated_dirs, validate_date_component};
use crate::error::{Error, Result};
use crate::providers::{estimate_cost, Usage};
use crate::schedule::{Mode, ScheduleDates};
use crate::sectors::Sector;
use crate::types::{EditionHtml, ManifestFile, RunManifest};

const MANIFEST_SUFFIX: &str = "_manifest.json";

/// Everything needed to persist one run
#[derive(Debug, Clone)]
pub struct NewRun<'a> {
    pub sector: Sector,
    pub mode: Mode,
    pub dates: ScheduleDates,
    pub editions: &'a [EditionHtml],
    pub usage: Usage,
    pub generated_at: DateTime<Tz>,
    pub used_fallback: bool,
}

/// Run directories under `runs/<sector>/<date>/`
#[derive(Debug, Clone)]
pub struct RunStore {
    root: PathBuf,
    max_runs_per_sector: usize,
}

impl RunStore {
    pub fn new(root: impl Into<PathBuf>, max_runs_per_sector: usize) -> Self {
        Self {
            root: root.into(),
            max_runs_per_sector,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory for a run; `date` must be `YYYY-MM-DD`
    pub fn run_dir(&self, sector: Sector, date: &str) -> Result<PathBuf> {
        validate_date_component(date)?;
        Ok(self.root.join(sector.key()).join(date))
    }

    /// Write the edition files and manifest, then prune old runs
    pub fn save_run(&self, run: NewRun<'_>) -> Result<(RunManifest, PathBuf)> {
        let display = run.dates.display;
        let run_id = format!("{}_{}", run.sector.key(), display.format("%Y%m%d_%H%M"));
        let run_dir = self
            .root
            .join(run.sector.key())
            .join(display.format("%Y-%m-%d").to_string());
        fs::create_dir_all(&run_dir)?;

        let mut files = Vec::with_capacity(run.editions.len());
        for edition in run.editions {
            let filename = format!(
                "{}-{}-Newsletter-{}-FINAL.html",
                edition.edition,
                run.sector.compact_name(),
                display.format("%d-%b-%Y")
            );
            let path = run_dir.join(&filename);
            fs::write(&path, &edition.html)?;
            files.push(ManifestFile {
                edition: edition.edition,
                filename,
                path,
                size: edition.html.len() as u64,
            });
        }

        let manifest = RunManifest {
            run_id,
            sector: run.sector,
            sector_name: run.sector.name().to_string(),
            mode: run.mode,
            display_date: display.fixed_offset(),
            cutoff_date: run.dates.cutoff.fixed_offset(),
            timezone: display.timezone().name().to_string(),
            files_generated: files.len(),
            files,
            tokens_used: run.usage.total_tokens,
            cost_estimate: estimate_cost(&run.usage),
            generated_at: run.generated_at.fixed_offset(),
            used_fallback: run.used_fallback,
        };

        let manifest_path = run_dir.join(format!("{}{}", manifest.run_id, MANIFEST_SUFFIX));
        fs::write(&manifest_path, serde_json::to_vec_pretty(&manifest)?)?;
        tracing::info!(
            "Saved run {} ({} files) to {}",
            manifest.run_id,
            manifest.files_generated,
            run_dir.display()
        );

        prune_dated_dirs(&self.root.join(run.sector.key()), self.max_runs_per_sector, &run_dir)?;
        Ok((manifest, run_dir))
    }

    /// Read the manifest of a run
    pub fn load_manifest(&self, sector: Sector, date: &str) -> Result<RunManifest> {
        let run_dir = self.existing_run_dir(sector, date)?;

        let mut manifests: Vec<PathBuf> = fs::read_dir(&run_dir)?
            .filter_map(|entry| entry.ok().map(|e| e.path()))
            .filter(|path| {
                path.is_file()
                    && path
                        .file_name()
                        .and_then(|n| n.to_str())
                        .is_some_and(|n| n.ends_with(MANIFEST_SUFFIX))
            })
            .collect();
        manifests.sort();

        let path = manifests
            .into_iter()
            .next()
            .ok_or_else(|| Error::not_found(format!("Manifest for {} {}", sector, date)))?;
        Ok(serde_json::from_slice(&fs::read(path)?)?)
    }

    /// Package every file of a run into an in-memory ZIP
    pub fn zip_run(&self, sector: Sector, date: &str) -> Result<Vec<u8>> {
        let run_dir = self.existing_run_dir(sector, date)?;

        let mut files = Vec::new();
        collect_files(&run_dir, &mut files)?;
        files.sort();

        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default();
        for path in &files {
            let relative = path
                .strip_prefix(&run_dir)
                .map_err(|e| Error::internal(format!("Bad run path: {}", e)))?;
            let name = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            writer.start_file(name, options)?;
            writer.write_all(&fs::read(path)?)?;
        }

        let cursor = writer.finish()?;
        tracing::debug!("Zipped {} files from {}", files.len(), run_dir.display());
        Ok(cursor.into_inner())
    }

    fn existing_run_dir(&self, sector: Sector, date: &str) -> Result<PathBuf> {
        let run_dir = self.run_dir(sector, date)?;
        if !run_dir.is_dir() {
            return Err(Error::not_found(format!("Run {} {}", sector, date)));
        }
        Ok(run_dir)
    }
}

fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_dir() {
            collect_files(&path, files)?;
        } else if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}
