// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Mail delivery seam.
//!
//! Workflows hand their messages to a [`Mailer`] only after the database
//! transaction has committed. A failed delivery is reported, never rolled
//! back.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashSet;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

use crate::error::{Error, Result};
use crate::notify::NotificationMessage;

/// A message that could not be delivered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryFailure {
    pub recipient: String,
    pub reason: String,
}

/// Outcome of delivering one batch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryReport {
    /// Number of messages handed off successfully.
    pub delivered: usize,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub failed: Vec<DeliveryFailure>,
}

impl DeliveryReport {
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    /// Returns the delivered count, or [`Error::NotificationDelivery`]
    /// naming each failed recipient.
    pub fn into_result(self) -> Result<usize> {
        if self.failed.is_empty() {
            return Ok(self.delivered);
        }
        Err(Error::NotificationDelivery {
            failed: self
                .failed
                .into_iter()
                .map(|f| format!("{} ({})", f.recipient, f.reason))
                .collect(),
        })
    }
}

/// Accepts a batch of messages and attempts to deliver all of them.
pub trait Mailer {
    fn send_mass(&self, messages: &[NotificationMessage]) -> DeliveryReport;
}

/// Spools messages as JSON lines for an external sender to pick up.
///
/// Each message is appended and synced on its own, so a failure part way
/// through leaves the earlier messages spooled.
#[derive(Debug, Clone)]
pub struct OutboxMailer {
    path: PathBuf,
}

impl OutboxMailer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        OutboxMailer { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads every spooled message. A missing spool is empty.
    pub fn read_all(&self) -> Result<Vec<NotificationMessage>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut messages = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            messages.push(serde_json::from_str(&line)?);
        }
        Ok(messages)
    }

    fn append(&self, message: &NotificationMessage) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        let json = serde_json::to_string(message)?;
        writeln!(file, "{json}")?;
        file.sync_all()?;
        Ok(())
    }
}

impl Mailer for OutboxMailer {
    fn send_mass(&self, messages: &[NotificationMessage]) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for message in messages {
            match self.append(message) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(recipient = %message.recipient, error = %e, "failed to spool message");
                    report.failed.push(DeliveryFailure {
                        recipient: message.recipient.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }
        report
    }
}

/// Keeps sent messages in memory. Recipients marked as failing are
/// reported as undeliverable.
#[derive(Debug, Default)]
pub struct MemoryMailer {
    sent: RefCell<Vec<NotificationMessage>>,
    failing: HashSet<String>,
}

impl MemoryMailer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every message to `address` fail (builder pattern).
    pub fn failing_for(mut self, address: &str) -> Self {
        self.failing.insert(address.to_string());
        self
    }

    /// Returns the messages delivered so far.
    pub fn sent(&self) -> Vec<NotificationMessage> {
        self.sent.borrow().clone()
    }
}

impl Mailer for MemoryMailer {
    fn send_mass(&self, messages: &[NotificationMessage]) -> DeliveryReport {
        let mut report = DeliveryReport::default();
        for message in messages {
            if self.failing.contains(&message.recipient) {
                report.failed.push(DeliveryFailure {
                    recipient: message.recipient.clone(),
                    reason: "mailbox unavailable".to_string(),
                });
            } else {
                self.sent.borrow_mut().push(message.clone());
                report.delivered += 1;
            }
        }
        report
    }
}

#[cfg(test)]
#[path = "mail_tests.rs"]
mod tests;
