use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$QUICKWIN_HOME`, else `$HOME/.quickwin`.
pub fn quickwin_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("QUICKWIN_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set (or set QUICKWIN_HOME)")?;
    Ok(PathBuf::from(home).join(".quickwin"))
}

pub fn ensure_quickwin_home() -> Result<PathBuf> {
    let dir = quickwin_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

