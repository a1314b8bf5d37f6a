// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ml_core::Database;

use crate::config::{get_db_path, init_work_dir, Config};
use crate::error::Result;

pub fn run(base: &Path, domain: Option<String>, sender: Option<String>) -> Result<()> {
    let mut config = Config::default();
    if let Some(domain) = domain {
        config.mail.templates.domain = domain;
    }
    if let Some(sender) = sender {
        config.mail.templates.sender = sender;
    }

    let work_dir = init_work_dir(base, &config)?;

    // Opening creates the schema
    Database::open(&get_db_path(&work_dir, &config))?;

    println!("Initialized metalink at {}", work_dir.display());
    println!("Mail domain: {}", config.mail.templates.domain);
    Ok(())
}

#[cfg(test)]
#[path = "init_tests.rs"]
mod tests;
