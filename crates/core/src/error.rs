// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Error types for ml-core operations.

use thiserror::Error;

/// All possible errors that can occur in ml-core operations.
///
/// Unknown child courses and unrecognized decision values are deliberately
/// absent: both are recovered where they occur (skip / abstain).
#[derive(Debug, Error)]
pub enum Error {
    #[error("meta course not found: {0}")]
    MetaCourseNotFound(String),

    #[error("course link not found: {0}")]
    LinkNotFound(i64),

    #[error("{user} may not {action}\n  hint: {hint}")]
    NotPermitted {
        user: String,
        action: String,
        hint: String,
    },

    #[error("course link {0} was changed by someone else\n  hint: reload and try again")]
    StaleLink(i64),

    #[error("invalid link status: '{0}'\n  hint: valid statuses are: enabled, pending, disabled")]
    InvalidStatus(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("failed to deliver {} notification(s): {}", failed.len(), failed.join(", "))]
    NotificationDelivery { failed: Vec<String> },

    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("corrupted data: {0}")]
    CorruptedData(String),
}

impl Error {
    /// Returns true for errors raised after state was already committed.
    pub fn is_delivery(&self) -> bool {
        matches!(self, Error::NotificationDelivery { .. })
    }
}

/// A specialized Result type for ml-core operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
