// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

pub mod catalog;
pub mod create;
pub mod init;
pub mod list;
pub mod requests;
pub mod review;
pub mod update;

use std::path::{Path, PathBuf};

use ml_core::{deliver, Database, Mailer, NotificationMessage, OutboxMailer};

use crate::config::{find_work_dir, get_db_path, get_outbox_path, Config};
use crate::error::Result;

/// An opened project: its configuration, store and outbox.
pub struct Context {
    pub db: Database,
    pub config: Config,
    pub work_dir: PathBuf,
}

impl Context {
    pub fn mailer(&self) -> OutboxMailer {
        OutboxMailer::new(get_outbox_path(&self.work_dir, &self.config))
    }
}

/// Helper to open the project containing `base`.
pub fn open_context(base: &Path) -> Result<Context> {
    let work_dir = find_work_dir(base)?;
    let config = Config::load(&work_dir)?;
    let db = Database::open(&get_db_path(&work_dir, &config))?;
    Ok(Context {
        db,
        config,
        work_dir,
    })
}

/// Send messages produced by a committed workflow.
///
/// The outcome has already been printed by the caller, so a failed
/// delivery only changes the exit status.
pub fn send_notifications(mailer: &dyn Mailer, messages: &[NotificationMessage]) -> Result<()> {
    let report = deliver(mailer, messages);
    if report.delivered > 0 {
        println!("Queued {} notification(s)", report.delivered);
    }
    report.into_result()?;
    Ok(())
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
