//! Newsletter generation pipeline

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use parking_lot::Mutex;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::{BrandConfig, NewsletterConfig};
use crate::error::{Error, Result};
use crate::extraction::extract_html_documents;
use crate::prompt::{assemble, load_sector_prompt, GenerationContext, SYSTEM_MESSAGE};
use crate::providers::LlmProvider;
use crate::schedule::{calculate_dates, Mode};
use crate::sectors::Sector;
use crate::storage::{NewRun, PastIssueStore, RunStore};
use crate::types::{GenerationOutcome, RunManifest};

/// Produces both editions of a sector newsletter and stores the run
pub struct NewsletterGenerator {
    provider: Arc<dyn LlmProvider>,
    /// Held across write-then-prune of a sector's run directories
    runs: Arc<Mutex<RunStore>>,
    past_issues: Arc<Mutex<PastIssueStore>>,
    prompts_dir: PathBuf,
    brand: BrandConfig,
    tz: Tz,
}

impl NewsletterGenerator {
    pub fn new(config: &NewsletterConfig, provider: Arc<dyn LlmProvider>) -> Result<Self> {
        let storage = &config.storage;
        Ok(Self {
            provider,
            runs: Arc::new(Mutex::new(RunStore::new(
                &storage.runs_dir,
                storage.max_runs_per_sector,
            ))),
            past_issues: Arc::new(Mutex::new(PastIssueStore::new(
                &storage.past_issues_dir,
                storage.max_past_issues_per_sector,
            ))),
            prompts_dir: storage.prompts_dir.clone(),
            brand: config.brand.clone(),
            tz: config.tz()?,
        })
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    /// Past issues for a sector formatted for the prompt
    pub async fn load_past_issues(&self, sector: Sector) -> Result<String> {
        let store = Arc::clone(&self.past_issues);
        blocking(move || store.lock().load(sector)).await
    }

    /// Store an uploaded past issue
    pub async fn save_past_issue(
        &self,
        sector: Sector,
        edition: String,
        date: String,
        content: Vec<u8>,
    ) -> Result<PathBuf> {
        let store = Arc::clone(&self.past_issues);
        blocking(move || store.lock().save(sector, &edition, &date, &content)).await
    }

    /// Manifest of the run stored for `date`
    pub async fn load_manifest(&self, sector: Sector, date: String) -> Result<RunManifest> {
        let store = Arc::clone(&self.runs);
        blocking(move || store.lock().load_manifest(sector, &date)).await
    }

    /// ZIP archive of the run stored for `date`
    pub async fn zip_run(&self, sector: Sector, date: String) -> Result<Vec<u8>> {
        let store = Arc::clone(&self.runs);
        blocking(move || store.lock().zip_run(sector, &date)).await
    }

    pub fn timezone(&self) -> Tz {
        self.tz
    }

    /// Current time in the scheduling timezone
    pub fn now(&self) -> DateTime<Tz> {
        Utc::now().with_timezone(&self.tz)
    }

    /// Run the full pipeline for one sector
    pub async fn generate(
        &self,
        sector: Sector,
        mode: Mode,
        now: DateTime<Tz>,
    ) -> Result<GenerationOutcome> {
        let dates = calculate_dates(now, mode);
        tracing::info!(
            "Generating {} newsletter ({} mode) for {}",
            sector.name(),
            mode,
            dates.display.format("%Y-%m-%d %H:%M")
        );

        let prompts_dir = self.prompts_dir.clone();
        let sector_prompt = blocking(move || load_sector_prompt(&prompts_dir, sector)).await?;
        let past_issues = self.load_past_issues(sector).await?;
        let context = GenerationContext {
            sector,
            mode,
            dates,
            brand: &self.brand,
        };
        let user_prompt = assemble(&sector_prompt, &context, &past_issues);
        tracing::debug!(
            "Prompt for {}: {} bytes, past issues {} bytes",
            sector,
            user_prompt.len(),
            past_issues.len()
        );

        let completion = self.provider.complete(SYSTEM_MESSAGE, &user_prompt).await?;
        let extracted = extract_html_documents(&completion.content, sector, dates.display);

        let runs = Arc::clone(&self.runs);
        let usage = completion.usage;
        let generated_at = self.now();
        let (manifest, run_dir) = blocking(move || {
            runs.lock().save_run(NewRun {
                sector,
                mode,
                dates,
                editions: &extracted.editions,
                usage,
                generated_at,
                used_fallback: extracted.used_fallback,
            })
        })
        .await?;

        let message = format!(
            "Successfully generated {} HTML newsletters for {}",
            manifest.files_generated,
            sector.name()
        );
        tracing::info!("{}", message);

        Ok(GenerationOutcome {
            manifest,
            run_dir,
            message,
        })
    }
}

/// Filesystem work runs on the blocking pool, off the request executor
async fn blocking<T, F>(f: F) -> Result<T>
where
    F: FnOnce() -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| Error::internal(format!("Storage task failed: {}", e)))?
}
