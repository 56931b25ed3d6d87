//! Configuration structures for the VWAP calculator.

use crate::error::{Error, Result};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Milliseconds per minute.
pub const MS_PER_MINUTE: u64 = 60_000;

/// Main configuration for a calculation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Windowing configuration.
    pub window: WindowConfig,
    /// Per-run settings.
    pub run: RunConfig,
}

impl Config {
    /// Load a configuration from a JSON file. Missing sections fall back to defaults.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let config: Config = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check that the configuration can drive a run.
    pub fn validate(&self) -> Result<()> {
        self.window.window_size_ms().map(|_| ())
    }
}

/// Time window configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window length in minutes.
    pub window_minutes: u64,
}

impl WindowConfig {
    /// Window length in milliseconds.
    pub fn window_size_ms(&self) -> Result<u64> {
        match self.window_minutes.checked_mul(MS_PER_MINUTE) {
            Some(0) => Err(Error::invalid_configuration("time window is missing")),
            Some(ms) => Ok(ms),
            None => Err(Error::invalid_configuration(format!(
                "time window of {} minutes is too large",
                self.window_minutes
            ))),
        }
    }
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self { window_minutes: 60 }
    }
}

/// Settings resolved once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Processing date that time-of-day stamps are anchored to (None = today).
    pub anchor_date: Option<NaiveDate>,
    /// Directory the output listing is written to.
    pub output_dir: PathBuf,
}

impl RunConfig {
    /// The anchor date for this run, falling back to today's local date.
    pub fn resolve_anchor_date(&self) -> NaiveDate {
        self.anchor_date.unwrap_or_else(|| Local::now().date_naive())
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            anchor_date: None,
            output_dir: PathBuf::from("."),
        }
    }
}
