// src/db/mod.rs
//! Public façade for DB helpers: the connection plus the three checks that run on it.

pub mod connection;
pub mod fixtures;
pub mod scripts;
pub mod integrity;

pub use connection::{db_path, init_database, open_db_connection, DbError};
pub use fixtures::{load_fixtures, FixtureError, LoadSummary};
pub use scripts::{run_scripts, ScriptError, ScriptFailure, ScriptRun};
pub use integrity::{check_no_negative_amounts, IntegrityError};
