// src/db/scripts.rs
//! Executes every SQL script matched by a glob against the loaded database.
//!
//! A failing script does not stop the pass: every match is attempted and all
//! failures are reported together.

use std::{fmt, fs, path::{Path, PathBuf}};
use log::Level;
use rusqlite::Connection;
use thiserror::Error;
use crate::check_log;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptFailure {
    pub path:    PathBuf,
    pub message: String,
}

impl fmt::Display for ScriptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SQL execution failed for {}: {}", self.path.display(), self.message)
    }
}

#[derive(Debug, Error)]
pub enum ScriptError {
    #[error("invalid script pattern '{pattern}': {source}")]
    Pattern { pattern: String, #[source] source: glob::PatternError },

    #[error("{}", render_failures(.failures))]
    Failed { executed: Vec<PathBuf>, failures: Vec<ScriptFailure> },
}

fn render_failures(failures: &[ScriptFailure]) -> String {
    failures.iter().map(ToString::to_string).collect::<Vec<_>>().join("\n")
}

/// Scripts that ran cleanly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptRun {
    pub executed: Vec<PathBuf>,
}

/// Run every file matching `pattern` (relative to `root`) as one batch each.
pub fn run_scripts(conn: &Connection, root: &Path, pattern: &str) -> Result<ScriptRun, ScriptError> {
    let root = glob::Pattern::escape(&root.to_string_lossy());
    let full = Path::new(&root).join(pattern).to_string_lossy().into_owned();
    let paths = glob::glob(&full).map_err(|source| ScriptError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let mut executed = Vec::new();
    let mut failures = Vec::new();

    for entry in paths {
        let path = match entry {
            Ok(path) if path.is_file() => path,
            Ok(_) => continue,
            Err(e) => {
                failures.push(ScriptFailure { path: e.path().to_path_buf(), message: e.error().to_string() });
                continue;
            }
        };

        match execute_script(conn, &path) {
            Ok(()) => {
                check_log!(Level::Debug, "scripts", "Executed {}", path.display());
                executed.push(path);
            }
            Err(message) => {
                let failure = ScriptFailure { path, message };
                check_log!(Level::Error, "scripts", "{}", failure);
                failures.push(failure);
            }
        }
    }

    check_log!(
        Level::Info,
        "scripts",
        "{} script(s) executed, {} failed",
        executed.len(),
        failures.len()
    );

    if failures.is_empty() {
        Ok(ScriptRun { executed })
    } else {
        Err(ScriptError::Failed { executed, failures })
    }
}

fn execute_script(conn: &Connection, path: &Path) -> Result<(), String> {
    let script = fs::read_to_string(path).map_err(|e| e.to_string())?;
    conn.execute_batch(&script).map_err(|e| e.to_string())
}
