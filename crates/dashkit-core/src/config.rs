//! Configuration loading.
//!
//! TOML file, then `DASHKIT_*` environment overrides, then validation.
//!
//! ```toml
//! [storage]
//! path = "dashkit.db"
//!
//! [records]
//! id_strategy = "timestamp"
//! write_policy = "last_write_wins"
//! seed_samples = true
//!
//! [logging]
//! level = "info"
//! format = "text"
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::value::StrDeserializer;
use serde::de::IntoDeserializer;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::db::{Database, DbResult};
use crate::store::{IdStrategy, WritePolicy};

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read configuration file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashkitConfig {
    pub storage: StorageConfig,
    pub records: RecordsConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// SQLite file; in-memory storage when absent
    pub path: Option<PathBuf>,
}

impl StorageConfig {
    /// Open the configured SQLite backend.
    pub fn open(&self) -> DbResult<Database> {
        match &self.path {
            Some(path) => Database::open(path),
            None => Database::open_in_memory(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecordsConfig {
    pub id_strategy: IdStrategy,
    pub write_policy: WritePolicy,
    /// Install sample records on first open; otherwise start empty
    pub seed_samples: bool,
}

impl Default for RecordsConfig {
    fn default() -> Self {
        Self {
            id_strategy: IdStrategy::Timestamp,
            write_policy: WritePolicy::LastWriteWins,
            seed_samples: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Text,
        }
    }
}

const LOG_LEVELS: &[&str] = &["trace", "debug", "info", "warn", "error"];

impl DashkitConfig {
    /// Parse TOML, apply overrides from `lookup`, validate.
    pub fn from_toml_str<F>(contents: &str, lookup: F) -> ConfigResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config: DashkitConfig = toml::from_str(contents)?;
        config.apply_overrides(lookup)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `DASHKIT_*` overrides.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> ConfigResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(path) = lookup("DASHKIT_STORAGE_PATH") {
            self.storage.path = (!path.is_empty()).then(|| PathBuf::from(path));
        }
        if let Some(raw) = lookup("DASHKIT_ID_STRATEGY") {
            self.records.id_strategy = parse_enum("DASHKIT_ID_STRATEGY", &raw)?;
        }
        if let Some(raw) = lookup("DASHKIT_WRITE_POLICY") {
            self.records.write_policy = parse_enum("DASHKIT_WRITE_POLICY", &raw)?;
        }
        if let Some(raw) = lookup("DASHKIT_SEED_SAMPLES") {
            self.records.seed_samples = match raw.to_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(ConfigError::Invalid(format!(
                        "DASHKIT_SEED_SAMPLES must be a boolean, got {:?}",
                        raw
                    )))
                }
            };
        }
        if let Some(level) = lookup("DASHKIT_LOG_LEVEL") {
            self.logging.level = level;
        }
        if let Some(raw) = lookup("DASHKIT_LOG_FORMAT") {
            self.logging.format = parse_enum("DASHKIT_LOG_FORMAT", &raw)?;
        }
        Ok(())
    }

    pub fn validate(&self) -> ConfigResult<()> {
        let level = self.logging.level.to_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(ConfigError::Invalid(format!(
                "logging.level must be one of {:?}, got {:?}",
                LOG_LEVELS, self.logging.level
            )));
        }
        if let Some(path) = &self.storage.path {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Invalid("storage.path is empty".into()));
            }
        }
        Ok(())
    }
}

/// Load configuration from a TOML file with process environment overrides.
pub fn load_config(path: impl AsRef<Path>) -> ConfigResult<DashkitConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    DashkitConfig::from_toml_str(&contents, |key| std::env::var(key).ok())
}

/// Parse a snake_case enum value the same way the TOML file would.
fn parse_enum<T: serde::de::DeserializeOwned>(name: &str, raw: &str) -> ConfigResult<T> {
    let deserializer: StrDeserializer<'_, serde::de::value::Error> = raw.into_deserializer();
    T::deserialize(deserializer).map_err(|e| ConfigError::Invalid(format!("{}: {}", name, e)))
}
