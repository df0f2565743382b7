// src/report.rs
//! Pass/fail record of one harness run, optionally persisted as JSON.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, fs, path::{Path, PathBuf}, time::Duration};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result of one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckOutcome {
    pub name:       String,
    pub passed:     bool,
    pub detail:     String,
    pub elapsed_ms: u64,
}

impl CheckOutcome {
    /// Build an outcome from a check's result; `describe` renders the success value.
    pub fn from_result<T, E: Display>(
        name: &str,
        result: &Result<T, E>,
        elapsed: Duration,
        describe: impl FnOnce(&T) -> String,
    ) -> Self {
        let (passed, detail) = match result {
            Ok(v) => (true, describe(v)),
            Err(e) => (false, e.to_string()),
        };
        Self {
            name: name.to_owned(),
            passed,
            detail,
            elapsed_ms: elapsed.as_millis() as u64,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub started_at:  DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub database:    PathBuf,
    pub outcomes:    Vec<CheckOutcome>,
}

impl RunReport {
    pub fn passed(&self) -> bool {
        self.outcomes.iter().all(|o| o.passed)
    }

    pub fn failures(&self) -> impl Iterator<Item = &CheckOutcome> {
        self.outcomes.iter().filter(|o| !o.passed)
    }

    pub fn outcome(&self, name: &str) -> Option<&CheckOutcome> {
        self.outcomes.iter().find(|o| o.name == name)
    }

    /// Write pretty JSON to `path`, creating parent directories as needed.
    pub fn write_json(&self, path: &Path) -> Result<(), ReportError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        log::info!("Run report written to {}", path.display());
        Ok(())
    }
}
