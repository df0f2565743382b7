// src/db/integrity.rs
//! Business-rule assertions over the loaded fixtures.

use log::Level;
use rusqlite::Connection;
use thiserror::Error;
use crate::check_log;

const NEGATIVE_AMOUNTS_SQL: &str = "SELECT COUNT(*) FROM transactions WHERE amount < 0;";

#[derive(Debug, Error)]
pub enum IntegrityError {
    #[error("{0} transactions have negative amounts!")]
    NegativeAmounts(i64),

    #[error("SQLite error: {0}")]
    Sql(#[from] rusqlite::Error),
}

/// Every `transactions.amount` must be zero or more.
pub fn check_no_negative_amounts(conn: &Connection) -> Result<(), IntegrityError> {
    let count: i64 = conn.query_row(NEGATIVE_AMOUNTS_SQL, [], |r| r.get(0))?;
    if count != 0 {
        check_log!(Level::Error, "integrity", "{} negative amount(s) in transactions", count);
        return Err(IntegrityError::NegativeAmounts(count));
    }
    check_log!(Level::Debug, "integrity", "No negative amounts in transactions");
    Ok(())
}
