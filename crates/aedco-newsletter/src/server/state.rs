//! Application state for the newsletter server

use std::sync::Arc;

use crate::config::NewsletterConfig;
use crate::error::Result;
use crate::generator::NewsletterGenerator;
use crate::providers::{LlmProvider, OpenAiClient};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: NewsletterConfig,
    generator: NewsletterGenerator,
}

impl AppState {
    /// State backed by the OpenAI API
    pub fn new(config: NewsletterConfig) -> Result<Self> {
        let provider = OpenAiClient::new(&config.openai)?;
        tracing::info!(
            "LLM provider: openai ({}) at {}",
            config.openai.model,
            config.openai.base_url
        );
        Self::with_provider(config, Arc::new(provider))
    }

    /// State with an explicit LLM provider
    pub fn with_provider(config: NewsletterConfig, provider: Arc<dyn LlmProvider>) -> Result<Self> {
        tracing::info!("Initializing newsletter state...");
        let generator = NewsletterGenerator::new(&config, provider)?;
        tracing::info!("Prompts: {}", config.storage.prompts_dir.display());
        tracing::info!("Runs: {}", config.storage.runs_dir.display());
        tracing::info!("Past issues: {}", config.storage.past_issues_dir.display());

        Ok(Self {
            inner: Arc::new(AppStateInner { config, generator }),
        })
    }

    pub fn config(&self) -> &NewsletterConfig {
        &self.inner.config
    }

    pub fn generator(&self) -> &NewsletterGenerator {
        &self.inner.generator
    }
}
