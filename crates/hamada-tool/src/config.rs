//! Configuration for the tender processing service

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Main Hamada Tool configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HamadaConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,
    /// Where the CSV files and the activity database live
    #[serde(default)]
    pub storage: StorageConfig,
    /// Deadline arithmetic settings
    #[serde(default)]
    pub deadlines: DeadlineConfig,
    /// Activity logging settings
    #[serde(default)]
    pub activity: ActivityConfig,
    /// Quotation email settings
    #[serde(default)]
    pub email: EmailConfig,
}

impl HamadaConfig {
    /// Load configuration from an optional TOML file, then apply
    /// `HAMADA_*` environment overrides.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_env();
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

    fn apply_env(&mut self) {
        if let Ok(host) = std::env::var("HAMADA_HOST") {
            self.server.host = host;
        }
        if let Some(port) = env_parse::<u16>("HAMADA_PORT") {
            self.server.port = port;
        }
        if let Ok(dir) = std::env::var("HAMADA_DATA_DIR") {
            self.storage = StorageConfig::rooted_at(PathBuf::from(dir));
        }
        if let Some(days) = env_parse::<i64>("HAMADA_BUFFER_DAYS") {
            self.deadlines.buffer_days = days;
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.parse() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid {}={}", key, raw);
            None
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address
    pub host: String,
    /// Port number
    pub port: u16,
    /// Enable CORS
    pub enable_cors: bool,
    /// Maximum upload size in bytes (default: 50MB)
    pub max_upload_size: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8501,
            enable_cors: true,
            max_upload_size: 50 * 1024 * 1024,
        }
    }
}

/// File locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Supplier registry CSV
    pub suppliers_csv: PathBuf,
    /// Processed orders CSV
    pub orders_csv: PathBuf,
    /// SQLite activity database
    pub database_path: PathBuf,
}

impl StorageConfig {
    /// Place every file under one data directory
    pub fn rooted_at(dir: PathBuf) -> Self {
        Self {
            suppliers_csv: dir.join("oil_gas_suppliers_consolidated.csv"),
            orders_csv: dir.join("processed_orders.csv"),
            database_path: dir.join("activity.db"),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::rooted_at(PathBuf::from("data"))
    }
}

/// Deadline arithmetic settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeadlineConfig {
    /// Days subtracted from the client deadline to get the supplier deadline
    pub buffer_days: i64,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self { buffer_days: 2 }
    }
}

/// Activity logging settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityConfig {
    /// Write activity rows at all
    pub enabled: bool,
    /// Version string stamped on every activity row
    pub tool_version: String,
}

impl Default for ActivityConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            tool_version: "hamada_tool_v1.0".to_string(),
        }
    }
}

/// Quotation email settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailConfig {
    /// Signature block appended to every draft
    pub signature: String,
}

impl Default for EmailConfig {
    fn default() -> Self {
        Self {
            signature: crate::generation::DEFAULT_SIGNATURE.to_string(),
        }
    }
}
