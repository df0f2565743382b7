// src/harness.rs
//! The shared test fixture: one connection, three independently invocable checks.
//!
//! The connection is opened once in [`Harness::open`] and closed when the
//! harness is dropped. Checks run against whatever state earlier checks left
//! behind; a failed load does not stop the later checks from running.

use std::{path::PathBuf, time::Instant};
use chrono::Utc;
use log::Level;
use rusqlite::Connection;
use crate::check_log;
use crate::config::Config;
use crate::db::{
    check_no_negative_amounts, db_path, init_database, load_fixtures, run_scripts, DbError,
    FixtureError, IntegrityError, LoadSummary, ScriptError, ScriptRun,
};
use crate::report::{CheckOutcome, RunReport};

pub const LOAD_DATA: &str = "load_data";
pub const SQL_SCRIPTS_RUN: &str = "sql_scripts_run";
pub const NO_NEGATIVE_AMOUNTS: &str = "no_negative_amounts";

pub struct Harness {
    root:   PathBuf,
    config: Config,
    conn:   Connection,
}

impl Harness {
    /// Open the scratch database for the project rooted at `root`.
    pub fn open(root: impl Into<PathBuf>, config: Config) -> Result<Self, DbError> {
        let root = root.into();
        let conn = init_database(&root, &config.database)?;
        Ok(Self { root, config, conn })
    }

    pub fn database_path(&self) -> PathBuf {
        db_path(&self.root, &self.config.database)
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Drop, recreate and fill one table per configured CSV source.
    pub fn load_data(&mut self) -> Result<LoadSummary, FixtureError> {
        load_fixtures(&mut self.conn, &self.root, &self.config.fixtures.sources)
    }

    /// Execute every configured SQL script, collecting all failures.
    pub fn run_sql_scripts(&self) -> Result<ScriptRun, ScriptError> {
        run_scripts(&self.conn, &self.root, &self.config.scripts.pattern)
    }

    pub fn check_no_negative_amounts(&self) -> Result<(), IntegrityError> {
        check_no_negative_amounts(&self.conn)
    }

    /// Run the three checks in order and record each outcome.
    pub fn run_all(&mut self) -> RunReport {
        let started_at = Utc::now();
        let mut outcomes = Vec::with_capacity(3);

        let t = Instant::now();
        let res = self.load_data();
        outcomes.push(CheckOutcome::from_result(LOAD_DATA, &res, t.elapsed(), |s| {
            format!("loaded {} row(s) into {} table(s)", s.total_rows(), s.tables.len())
        }));

        let t = Instant::now();
        let res = self.run_sql_scripts();
        outcomes.push(CheckOutcome::from_result(SQL_SCRIPTS_RUN, &res, t.elapsed(), |r| {
            format!("executed {} script(s)", r.executed.len())
        }));

        let t = Instant::now();
        let res = self.check_no_negative_amounts();
        outcomes.push(CheckOutcome::from_result(NO_NEGATIVE_AMOUNTS, &res, t.elapsed(), |_| {
            "no negative amounts".to_owned()
        }));

        for o in &outcomes {
            let (level, label) =
                if o.passed { (Level::Info, "PASS") } else { (Level::Error, "FAIL") };
            check_log!(level, "harness", "{} {}: {}", label, o.name, o.detail);
        }

        RunReport {
            started_at,
            finished_at: Utc::now(),
            database: self.database_path(),
            outcomes,
        }
    }
}
