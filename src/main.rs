// src/main.rs

//! Fixture-check entry-point.
//!
//! 1. Load `default.toml` from the project root (built-in defaults if absent)
//! 2. Set up structured logging
//! 3. Open the scratch SQLite database
//! 4. Load CSV fixtures, run every SQL script, check the integrity rule
//! 5. Optionally write the JSON run report; exit non-zero on any failure

// ───── std / 3rd-party imports ──────────────────────────────────────────────
use anyhow::Context;
use chrono::Local;
use fern::Dispatch;
use log::LevelFilter;
use std::{
    path::{Path, PathBuf},
    process::{self, ExitCode},
    thread,
};

// ───── local imports ────────────────────────────────────────────────────────
use fixture_check::config::{load_or_default, Config};
use fixture_check::config::model::LoggingConfig;
use fixture_check::Harness;

const CONFIG_FILE: &str = "default.toml";

// ───── helpers ──────────────────────────────────────────────────────────────

/// Print an error with context and terminate the process.
macro_rules! fatal {
    ($ctx:expr, $($arg:tt)+) => {{
        eprintln!(
            "[{}][ERROR][{}] {}",
            chrono::Local::now().to_rfc3339(),
            $ctx,
            format!($($arg)+)
        );
        std::process::exit(2);
    }};
}

/// Directory the fixture paths are resolved against.
fn project_root() -> anyhow::Result<PathBuf> {
    std::env::current_dir().context("cannot determine working directory")
}

fn load_config(root: &Path) -> anyhow::Result<Config> {
    let path = root.join(CONFIG_FILE);
    load_or_default(&path).with_context(|| format!("loading {}", path.display()))
}

/// Configure global logging as requested in `[logging]`.
fn setup_logging(root: &Path, logging: &LoggingConfig) -> Result<(), fern::InitError> {
    let level = match logging.level.to_uppercase().as_str() {
        "ERROR" => LevelFilter::Error,
        "WARN" => LevelFilter::Warn,
        "DEBUG" => LevelFilter::Debug,
        "TRACE" => LevelFilter::Trace,
        _ => LevelFilter::Info,
    };

    let log_path = logging
        .enable
        .then(|| root.join(logging.file.as_deref().unwrap_or("fixture-check.log")));

    let mut dispatch = Dispatch::new()
        .format(|out, msg, record| {
            out.finish(format_args!(
                "[{}][{:5}][{}][pid={}][tid={:?}] {}",
                Local::now().to_rfc3339(),
                record.level(),
                record.target(),
                process::id(),
                thread::current().id(),
                msg
            ))
        })
        .level(level)
        .chain(std::io::stdout());

    if let Some(path) = log_path {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }

    dispatch.apply()?;
    Ok(())
}

// ───── run ──────────────────────────────────────────────────────────────────

fn run() -> anyhow::Result<bool> {
    // 1 ─ Context
    let root = project_root()?;
    let config = load_config(&root)?;

    // 2 ─ Logging
    setup_logging(&root, &config.logging).context("logging setup failed")?;
    log::info!("Fixture check started in {}", root.display());

    // 3 ─ Database
    let report_path = config.report.path.clone();
    let mut harness = Harness::open(&root, config).context("opening database")?;

    // 4 ─ Checks
    let report = harness.run_all();
    drop(harness);

    // 5 ─ Report
    if let Some(path) = report_path {
        report
            .write_json(&root.join(path))
            .context("writing run report")?;
    }

    let failed = report.failures().count();
    if failed == 0 {
        log::info!("All {} check(s) passed", report.outcomes.len());
    } else {
        log::error!("{} of {} check(s) failed", failed, report.outcomes.len());
    }
    Ok(report.passed())
}

fn main() -> ExitCode {
    match run() {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(e) => fatal!("main", "{:#}", e),
    }
}
