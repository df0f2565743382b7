// src/config/loader.rs

//! # Configuration Loader
//!
//! Reads `default.toml` and deserializes it into a validated `Config`.

use crate::check_log;
use crate::config::model::{Config, ConfigError};
use log::Level;
use std::{fs, path::Path};

/// Load, parse and validate the configuration at `path`.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    check_log!(Level::Debug, "config", "Reading config from {:?}", path);
    let txt = fs::read_to_string(path)?;
    let cfg = parse(&txt)?;
    check_log!(Level::Info, "config", "Loaded config from {:?}", path);
    Ok(cfg)
}

/// Like [`load`], but a missing file yields the built-in defaults.
pub fn load_or_default(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        check_log!(Level::Info, "config", "No config at {:?}, using defaults", path);
        return Ok(Config::default());
    }
    load(path)
}

/// Parse a TOML document into a validated `Config`.
pub fn parse(txt: &str) -> Result<Config, ConfigError> {
    let cfg: Config = toml::from_str(txt)?;
    cfg.validate()?;
    Ok(cfg)
}
