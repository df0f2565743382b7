// src/db/fixtures.rs
//! CSV fixtures → freshly created tables.
//!
//! Each source file's header row names the columns of its table. The table is
//! dropped and recreated on every load, so repeated runs against the same
//! database file never accumulate rows. All sources load inside one
//! transaction that is committed once at the end.

use std::path::{Path, PathBuf};
use log::Level;
use rusqlite::{params_from_iter, types::Value, Connection};
use thiserror::Error;
use crate::check_log;
use crate::config::model::DataSource;

#[derive(Debug, Error)]
pub enum FixtureError {
    #[error("{} not found!", .0.display())]
    MissingFixture(PathBuf),

    #[error("{} has no header row", .0.display())]
    MissingHeader(PathBuf),

    #[error("insert into {table} failed: line {line} has {found} values, expected {expected}")]
    ArityMismatch { table: String, line: u64, expected: usize, found: usize },

    #[error("CSV error in {}: {source}", path.display())]
    Csv { path: PathBuf, #[source] source: csv::Error },

    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// What one source turned into.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableLoad {
    pub table:   String,
    pub columns: Vec<String>,
    pub rows:    usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadSummary {
    pub tables: Vec<TableLoad>,
}

impl LoadSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|t| t.rows).sum()
    }

    pub fn rows_for(&self, table: &str) -> Option<usize> {
        self.tables.iter().find(|t| t.table == table).map(|t| t.rows)
    }
}

/// Load every source (paths relative to `root`) and commit once.
///
/// All paths are checked up front: a missing file fails the load before any
/// table is dropped or created.
pub fn load_fixtures(
    conn: &mut Connection,
    root: &Path,
    sources: &[DataSource],
) -> Result<LoadSummary, FixtureError> {
    let resolved: Vec<(&str, PathBuf)> = sources
        .iter()
        .map(|s| (s.table.as_str(), root.join(&s.path)))
        .collect();

    if let Some((_, missing)) = resolved.iter().find(|(_, path)| !path.exists()) {
        check_log!(Level::Error, "loader", "Fixture {} not found", missing.display());
        return Err(FixtureError::MissingFixture(missing.clone()));
    }

    let tx = conn.transaction()?;
    let mut summary = LoadSummary::default();
    for (table, path) in &resolved {
        let load = load_table(&tx, table, path)?;
        check_log!(
            Level::Info,
            "loader",
            "Loaded {} row(s) into {} ({} columns) from {}",
            load.rows,
            load.table,
            load.columns.len(),
            path.display()
        );
        summary.tables.push(load);
    }
    tx.commit()?;

    check_log!(Level::Debug, "loader", "Committed {} row(s) across {} table(s)", summary.total_rows(), summary.tables.len());
    Ok(summary)
}

fn load_table(conn: &Connection, table: &str, path: &Path) -> Result<TableLoad, FixtureError> {
    let csv_err = |source: csv::Error| FixtureError::Csv { path: path.to_path_buf(), source };

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)
        .map_err(csv_err)?;

    let columns: Vec<String> = reader
        .headers()
        .map_err(csv_err)?
        .iter()
        .map(str::to_owned)
        .collect();
    if columns.is_empty() {
        return Err(FixtureError::MissingHeader(path.to_path_buf()));
    }

    // Header tokens are used verbatim, so a header may carry type names too.
    conn.execute(&format!("DROP TABLE IF EXISTS {table}"), [])?;
    conn.execute(&format!("CREATE TABLE {table} ({})", columns.join(",")), [])?;

    let placeholders = vec!["?"; columns.len()].join(",");
    let mut stmt = conn.prepare(&format!("INSERT INTO {table} VALUES ({placeholders})"))?;

    let mut rows = 0;
    for record in reader.records() {
        let record = record.map_err(csv_err)?;
        if record.len() != columns.len() {
            return Err(FixtureError::ArityMismatch {
                table: table.to_owned(),
                line: record.position().map_or(0, |p| p.line()),
                expected: columns.len(),
                found: record.len(),
            });
        }
        stmt.execute(params_from_iter(record.iter().map(infer_value)))?;
        rows += 1;
    }

    Ok(TableLoad { table: table.to_owned(), columns, rows })
}

/// Bind a field as a number only when nothing is lost; everything else stays text.
///
/// INTEGER needs the canonical spelling (`7`, not `007` or `+7`). REAL needs a
/// plain decimal (`-0.50`) whose digits fit in an f64.
pub fn infer_value(field: &str) -> Value {
    if let Ok(i) = field.parse::<i64>() {
        if i.to_string() == field {
            return Value::Integer(i);
        }
    }
    if is_exact_decimal(field) {
        if let Ok(f) = field.parse::<f64>() {
            return Value::Real(f);
        }
    }
    Value::Text(field.to_owned())
}

/// `-?D.D` with no leading zero in the integer part and at most
/// `f64::DIGITS` significant digits.
fn is_exact_decimal(field: &str) -> bool {
    let unsigned = field.strip_prefix('-').unwrap_or(field);
    let Some((int, frac)) = unsigned.split_once('.') else {
        return false;
    };
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !digits(int) || !digits(frac) || (int.len() > 1 && int.starts_with('0')) {
        return false;
    }
    let significant = format!("{int}{frac}").trim_start_matches('0').len();
    significant <= f64::DIGITS as usize
}
