use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::state::{ensure_quickwin_home, quickwin_home};

/// Eight hours of focused work.
pub const DEFAULT_WORKING_MINUTES: i64 = 480;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub storage: StorageSection,
    pub schedule: ScheduleSection,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSection {
    /// Task file. Relative paths resolve against the quickwin home.
    pub path: PathBuf,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScheduleSection {
    /// Budget used by `schedule --all-day`.
    pub working_minutes: i64,
    /// IANA zone for entering and printing deadlines.
    pub timezone: String,
}

impl Default for StorageSection {
    fn default() -> Self {
        Self {
            path: PathBuf::from("tasks.json"),
        }
    }
}

impl Default for ScheduleSection {
    fn default() -> Self {
        Self {
            working_minutes: DEFAULT_WORKING_MINUTES,
            timezone: "America/Chicago".to_string(),
        }
    }
}

impl Config {
    pub fn parse(s: &str) -> Result<Self> {
        toml::from_str(s).context("parse config.toml")
    }

    /// Absolute task file location.
    pub fn tasks_path(&self) -> Result<PathBuf> {
        if self.storage.path.is_absolute() {
            return Ok(self.storage.path.clone());
        }
        Ok(quickwin_home()?.join(&self.storage.path))
    }
}

pub fn config_path() -> Result<PathBuf> {
    Ok(quickwin_home()?.join("config.toml"))
}

pub fn load_config() -> Result<Config> {
    let p = config_path()?;
    if !p.exists() {
        tracing::debug!(path = %p.display(), "no config file; using defaults");
        return Ok(Config::default());
    }
    let s = fs::read_to_string(&p).with_context(|| format!("read {}", p.display()))?;
    Config::parse(&s).with_context(|| format!("in {}", p.display()))
}

pub fn save_config(cfg: &Config) -> Result<PathBuf> {
    ensure_quickwin_home()?;
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(p)
}
