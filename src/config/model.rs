// src/config/model.rs

use serde::Deserialize;
use std::{collections::HashSet, path::PathBuf, time::Duration};
use thiserror::Error;

/// Top-level runtime config, mirrored from `default.toml`.
/// Every table is optional; missing keys fall back to the built-in fixture layout.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub logging:  LoggingConfig,
    pub database: DatabaseConfig,
    pub fixtures: FixturesConfig,
    pub scripts:  ScriptsConfig,
    pub report:   ReportConfig,
}

/// Mirror of the `[logging]` table
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]            pub enable: bool,
    #[serde(default)]            pub file:   Option<String>,
    #[serde(default = "default_level")] pub level: String,
}
fn default_level() -> String { "INFO".into() }

impl Default for LoggingConfig {
    fn default() -> Self {
        Self { enable: false, file: None, level: default_level() }
    }
}

/// Mirror of the `[database]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub path:           PathBuf,
    pub purge_on_start: bool,
    /// humantime string, e.g. `"1s"` or `"250ms"`
    pub busy_timeout:   String,
    pub journal_mode:   String,
    pub synchronous:    String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path:           PathBuf::from("fraud_test.db"),
            purge_on_start: false,
            busy_timeout:   "1s".into(),
            journal_mode:   "WAL".into(),
            synchronous:    "NORMAL".into(),
        }
    }
}

impl DatabaseConfig {
    pub fn busy_timeout(&self) -> Result<Duration, ConfigError> {
        humantime::parse_duration(&self.busy_timeout)
            .map_err(|e| ConfigError::InvalidDuration(self.busy_timeout.clone(), e))
    }
}

/// One CSV fixture: the table it becomes and the file it comes from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DataSource {
    pub table: String,
    pub path:  PathBuf,
}

impl DataSource {
    pub fn new(table: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self { table: table.into(), path: path.into() }
    }
}

/// Mirror of the `[fixtures]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FixturesConfig {
    pub sources: Vec<DataSource>,
}

impl Default for FixturesConfig {
    fn default() -> Self {
        Self {
            sources: vec![
                DataSource::new("customers", "data/customers.csv"),
                DataSource::new("transactions", "data/transactions.csv"),
            ],
        }
    }
}

/// Mirror of the `[scripts]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScriptsConfig {
    /// Glob relative to the project root. `*` does not cross directories.
    pub pattern: String,
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self { pattern: "sql/*.sql".into() }
    }
}

/// Mirror of the `[report]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    pub path: Option<PathBuf>,
}

/// All the ways config loading can go wrong
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid duration '{0}': {1}")]
    InvalidDuration(String, #[source] humantime::DurationError),

    #[error("table '{0}' is listed more than once in [fixtures]")]
    DuplicateTable(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl Config {
    /// Checks the fields serde cannot: durations and table uniqueness.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.database.busy_timeout()?;

        let mut seen = HashSet::new();
        for src in &self.fixtures.sources {
            if !seen.insert(src.table.as_str()) {
                return Err(ConfigError::DuplicateTable(src.table.clone()));
            }
        }
        Ok(())
    }
}
