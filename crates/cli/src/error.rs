// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use thiserror::Error;

/// All possible errors that can occur in the metalink CLI.
///
/// Workflow errors come from [`ml_core::Error`] unchanged; the rest are
/// about locating the project and the acting instructor.
#[derive(Debug, Error)]
pub enum Error {
    #[error("not initialized: run 'metalink init' first")]
    NotInitialized,

    #[error("already initialized at {0}")]
    AlreadyInitialized(String),

    #[error("no acting user\n  hint: pass --user <name> or set METALINK_USER")]
    MissingIdentity,

    #[error("invalid user name '{0}'\n  hint: user names cannot contain whitespace or '@'")]
    InvalidIdentity(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] ml_core::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl Error {
    /// Returns true if state was committed before the error occurred.
    pub fn is_delivery(&self) -> bool {
        matches!(self, Error::Core(e) if e.is_delivery())
    }
}

/// A specialized Result type for metalink operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
