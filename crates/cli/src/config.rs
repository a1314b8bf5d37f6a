// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Project configuration management.
//!
//! Configuration is stored in `.metalink/config.toml` and includes:
//! - `database`: Optional path to the SQLite store (default `.metalink/meta.db`)
//! - `[mail]`: Addressing, message templates and the outbox spool path

use ml_core::Templates;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

const WORK_DIR_NAME: &str = ".metalink";
const CONFIG_FILE_NAME: &str = "config.toml";
const DB_FILE_NAME: &str = "meta.db";
const OUTBOX_FILE_NAME: &str = "outbox.jsonl";

/// Project configuration stored in `.metalink/config.toml`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Optional path for the database (relative to project root or absolute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database: Option<String>,
    /// Notification settings.
    #[serde(default)]
    pub mail: MailConfig,
}

/// Notification settings.
///
/// Template keys sit directly in the `[mail]` table next to `outbox`;
/// any key left out keeps its built-in default.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MailConfig {
    /// Spool file for outbound messages (relative to project root or absolute).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outbox: Option<String>,
    #[serde(flatten)]
    pub templates: Templates,
}

impl Config {
    /// Loads configuration from the given `.metalink/` directory.
    pub fn load(work_dir: &Path) -> Result<Self> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = fs::read_to_string(&config_path)
            .map_err(|e| Error::Config(format!("failed to read config: {}", e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse config: {}", e)))?;
        Ok(config)
    }

    /// Saves configuration to the given `.metalink/` directory.
    pub fn save(&self, work_dir: &Path) -> Result<()> {
        let config_path = work_dir.join(CONFIG_FILE_NAME);
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(&config_path, content)?;
        Ok(())
    }
}

/// Find the .metalink directory by walking up from `start`.
pub fn find_work_dir(start: &Path) -> Result<PathBuf> {
    let mut current = start.to_path_buf();
    loop {
        let work_dir = current.join(WORK_DIR_NAME);
        if work_dir.is_dir() {
            return Ok(work_dir);
        }
        if !current.pop() {
            return Err(Error::NotInitialized);
        }
    }
}

/// Get the database path from config.
pub fn get_db_path(work_dir: &Path, config: &Config) -> PathBuf {
    resolve(work_dir, config.database.as_deref(), DB_FILE_NAME)
}

/// Get the outbox spool path from config.
pub fn get_outbox_path(work_dir: &Path, config: &Config) -> PathBuf {
    resolve(work_dir, config.mail.outbox.as_deref(), OUTBOX_FILE_NAME)
}

/// Configured paths are relative to the project root (the parent of
/// `.metalink/`); unset paths default to a file inside `.metalink/`.
fn resolve(work_dir: &Path, configured: Option<&str>, default_name: &str) -> PathBuf {
    match configured {
        Some(path) if Path::new(path).is_absolute() => PathBuf::from(path),
        Some(path) => work_dir.parent().unwrap_or(work_dir).join(path),
        None => work_dir.join(default_name),
    }
}

/// Initialize a new .metalink directory at the given path.
pub fn init_work_dir(path: &Path, config: &Config) -> Result<PathBuf> {
    let work_dir = path.join(WORK_DIR_NAME);

    if work_dir.exists() {
        return Err(Error::AlreadyInitialized(work_dir.display().to_string()));
    }

    fs::create_dir_all(&work_dir)?;
    config.save(&work_dir)?;

    Ok(work_dir)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
