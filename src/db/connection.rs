// src/db/connection.rs
//! Opening and initialising SQLite with runtime parameters.

use std::{fs, path::{Path, PathBuf}};
use rusqlite::Connection;
use thiserror::Error;
use crate::config::model::{ConfigError, DatabaseConfig};

#[derive(Debug, Error)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),

    #[error("could not remove stale database {}: {source}", path.display())]
    Purge { path: PathBuf, #[source] source: std::io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub fn db_path(root: &Path, cfg: &DatabaseConfig) -> PathBuf {
    root.join(&cfg.path)
}

pub fn open_db_connection(path: &Path, cfg: &DatabaseConfig) -> Result<Connection, DbError> {
    let conn = Connection::open(path)?;
    conn.busy_timeout(cfg.busy_timeout()?)?;
    // journal_mode answers with the mode actually in effect.
    let mode: String = conn.pragma_update_and_check(None, "journal_mode", cfg.journal_mode.as_str(), |r| r.get(0))?;
    log::debug!("journal_mode={} for {}", mode, path.display());
    conn.pragma_update(None, "synchronous", cfg.synchronous.as_str())?;
    Ok(conn)
}

/// Open the scratch database under `root`, deleting it first when
/// `purge_on_start` is set.
pub fn init_database(root: &Path, cfg: &DatabaseConfig) -> Result<Connection, DbError> {
    let path = db_path(root, cfg);

    if cfg.purge_on_start {
        purge(&path)?;
    }

    let conn = open_db_connection(&path, cfg)?;
    log::info!("Database ready at {}", path.display());
    Ok(conn)
}

/// Remove the database file together with its WAL sidecars.
fn purge(path: &Path) -> Result<(), DbError> {
    let mut targets = vec![path.to_path_buf()];
    for suffix in ["-wal", "-shm"] {
        let mut name = path.as_os_str().to_owned();
        name.push(suffix);
        targets.push(PathBuf::from(name));
    }

    for target in targets.into_iter().filter(|p| p.exists()) {
        fs::remove_file(&target).map_err(|source| DbError::Purge { path: target.clone(), source })?;
        log::debug!("Purged {}", target.display());
    }
    Ok(())
}
