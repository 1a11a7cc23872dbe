//! Configuration for the newsletter platform

use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};

/// Main newsletter configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsletterConfig {
    /// Deployment environment
    #[serde(default)]
    pub environment: Environment,
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Hosted LLM settings
    #[serde(default)]
    pub openai: OpenAiConfig,
    /// Prompt, past issue and run directories
    #[serde(default)]
    pub storage: StorageConfig,
    /// Branding passed to the model
    #[serde(default)]
    pub brand: BrandConfig,
    /// IANA timezone used for scheduling
    #[serde(default = "default_timezone")]
    pub timezone: String,
}

fn default_timezone() -> String {
    "Africa/Cairo".to_string()
}

impl Default for NewsletterConfig {
    fn default() -> Self {
        Self {
            environment: Environment::default(),
            server: ServerConfig::default(),
            openai: OpenAiConfig::default(),
            storage: StorageConfig::default(),
            brand: BrandConfig::default(),
            timezone: default_timezone(),
        }
    }
}

impl NewsletterConfig {
    /// Load configuration from an optional TOML file, then apply environment
    /// overrides. `AEDCO_ENV` selects a preset before the `OPENAI_*` values
    /// are read.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env()?;
        config.validate()?;
        Ok(config)
    }

    /// Read a TOML configuration file
    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!("Failed to read {}: {}", path.display(), e))
        })?;
        toml::from_str(&raw)
            .map_err(|e| Error::Config(format!("Invalid config {}: {}", path.display(), e)))
    }

    /// Defaults adjusted for one environment
    pub fn for_environment(environment: Environment) -> Self {
        let mut config = Self::default();
        config.apply_preset(environment);
        config
    }

    /// Switch environment and apply its preset values
    pub fn apply_preset(&mut self, environment: Environment) {
        self.environment = environment;
        match environment {
            Environment::Development => self.openai.temperature = 0.3,
            Environment::Production => self.openai.temperature = 0.1,
            Environment::Testing => self.openai.api_key = "test-key".to_string(),
        }
    }

    fn apply_env(&mut self) -> Result<()> {
        if let Ok(env) = std::env::var("AEDCO_ENV") {
            self.apply_preset(env.parse()?);
        }
        if let Ok(key) = std::env::var("OPENAI_API_KEY") {
            self.openai.api_key = key;
        }
        if let Ok(model) = std::env::var("OPENAI_MODEL") {
            self.openai.model = model;
        }
        if let Ok(url) = std::env::var("OPENAI_BASE_URL") {
            self.openai.base_url = url;
        }
        if let Ok(host) = std::env::var("AEDCO_HOST") {
            self.server.host = host;
        }
        if let Ok(port) = std::env::var("AEDCO_PORT") {
            match port.parse() {
                Ok(port) => self.server.port = port,
                Err(_) => tracing::warn!("Ignoring invalid AEDCO_PORT={}", port),
            }
        }
        if let Ok(dir) = std::env::var("AEDCO_BASE_DIR") {
            self.storage = StorageConfig {
                max_past_issues_per_sector: self.storage.max_past_issues_per_sector,
                max_runs_per_sector: self.storage.max_runs_per_sector,
                ..StorageConfig::rooted_at(PathBuf::from(dir))
            };
        }
        Ok(())
    }

    /// Reject settings the server cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.environment == Environment::Production && self.openai.api_key.trim().is_empty() {
            return Err(Error::Config(
                "OPENAI_API_KEY is required in production".to_string(),
            ));
        }
        if self.storage.max_past_issues_per_sector == 0 || self.storage.max_runs_per_sector == 0 {
            return Err(Error::Config(
                "max_past_issues_per_sector and max_runs_per_sector must be at least 1".to_string(),
            ));
        }
        self.tz()?;
        Ok(())
    }

    /// Parsed scheduling timezone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| Error::Config(format!("Invalid timezone '{}': {}", self.timezone, e)))
    }
}

/// Deployment environment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Production,
    Testing,
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "production" | "prod" => Ok(Self::Production),
            "testing" | "test" => Ok(Self::Testing),
            other => Err(Error::Config(format!("Unknown environment '{}'", other))),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
        };
        f.write_str(name)
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 5000,
            enable_cors: true,
            max_upload_size: 16 * 1024 * 1024,
        }
    }
}

/// OpenAI chat completions settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub model: String,
    /// API root without the `/v1` path
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    /// Retries after the first attempt
    pub max_retries: u32,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            model: "gpt-4".to_string(),
            base_url: "https://api.openai.com".to_string(),
            temperature: 0.2,
            max_tokens: 8000,
            max_retries: 3,
            timeout_secs: 300,
        }
    }
}

/// Filesystem layout
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Holds `<SectorName>.txt` prompt files
    pub prompts_dir: PathBuf,
    /// `past_issues/<sector>/<date>/<edition>.txt`
    pub past_issues_dir: PathBuf,
    /// `runs/<sector>/<date>/`
    pub runs_dir: PathBuf,
    pub max_past_issues_per_sector: usize,
    pub max_runs_per_sector: usize,
}

impl StorageConfig {
    /// Place every directory under one base directory
    pub fn rooted_at(base: PathBuf) -> Self {
        Self {
            prompts_dir: base.join("prompts"),
            past_issues_dir: base.join("past_issues"),
            runs_dir: base.join("runs"),
            max_past_issues_per_sector: 50,
            max_runs_per_sector: 100,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::rooted_at(PathBuf::from("."))
    }
}

/// Brand details included in the generation context
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrandConfig {
    pub name: String,
    pub full_name: String,
    pub logo: String,
}

impl Default for BrandConfig {
    fn default() -> Self {
        Self {
            name: "AEDCO".to_string(),
            full_name: "Arab Engineering & Distribution Company".to_string(),
            logo: "/assets/aedco-logo-blue.png".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = NewsletterConfig::default();
        assert_eq!(config.openai.model, "gpt-4");
        assert_eq!(config.openai.temperature, 0.2);
        assert_eq!(config.openai.max_tokens, 8000);
        assert_eq!(config.server.max_upload_size, 16 * 1024 * 1024);
        assert_eq!(config.storage.max_runs_per_sector, 100);
        assert_eq!(config.tz().unwrap(), chrono_tz::Africa::Cairo);
    }

    #[test]
    fn test_presets() {
        assert_eq!(
            NewsletterConfig::for_environment(Environment::Development).openai.temperature,
            0.3
        );
        let testing = NewsletterConfig::for_environment(Environment::Testing);
        assert_eq!(testing.openai.api_key, "test-key");
        assert!(testing.validate().is_ok());

        let production = NewsletterConfig::for_environment(Environment::Production);
        assert_eq!(production.openai.temperature, 0.1);
        assert!(matches!(production.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config: NewsletterConfig = toml::from_str(
            r#"
            environment = "testing"

            [openai]
            model = "gpt-4o"

            [storage]
            runs_dir = "/srv/aedco/runs"
            "#,
        )
        .unwrap();

        assert_eq!(config.environment, Environment::Testing);
        assert_eq!(config.openai.model, "gpt-4o");
        assert_eq!(config.openai.max_tokens, 8000);
        assert_eq!(config.storage.runs_dir, PathBuf::from("/srv/aedco/runs"));
        assert_eq!(config.storage.max_past_issues_per_sector, 50);
        assert_eq!(config.timezone, "Africa/Cairo");
    }

    #[test]
    fn test_zero_retention_is_rejected() {
        let mut config = NewsletterConfig::for_environment(Environment::Testing);
        config.storage.max_runs_per_sector = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));

        let mut config = NewsletterConfig::for_environment(Environment::Testing);
        config.storage.max_past_issues_per_sector = 0;
        assert!(matches!(config.validate(), Err(Error::Config(_))));
    }

    #[test]
    fn test_environment_names() {
        assert_eq!("Production".parse::<Environment>().unwrap(), Environment::Production);
        assert!("staging".parse::<Environment>().is_err());
    }
}
