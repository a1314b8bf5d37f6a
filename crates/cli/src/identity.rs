// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Acting instructor identity.
//!
//! The identity comes from the invoking environment (`--user` or
//! `METALINK_USER`), standing in for the identity header a web front end
//! would receive from single sign-on. It is checked once here and then
//! passed explicitly to every workflow.

use crate::error::{Error, Result};

/// Validates the supplied identity and returns it trimmed.
pub fn require_user(user: Option<&str>) -> Result<String> {
    let user = user.map(str::trim).unwrap_or_default();
    if user.is_empty() {
        return Err(Error::MissingIdentity);
    }
    if user.contains('@') || user.chars().any(char::is_whitespace) {
        return Err(Error::InvalidIdentity(user.to_string()));
    }
    Ok(user.to_string())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use yare::parameterized;

    #[parameterized(
        plain = { "alice", "alice" },
        padded = { "  sean_s ", "sean_s" },
    )]
    fn valid_identity(input: &str, expected: &str) {
        assert_eq!(require_user(Some(input)).unwrap(), expected);
    }

    #[parameterized(
        none = { None },
        empty = { Some("") },
        blank = { Some("   ") },
    )]
    fn missing_identity(input: Option<&str>) {
        assert!(matches!(require_user(input), Err(Error::MissingIdentity)));
    }

    #[parameterized(
        email = { "alice@ucmail.uc.edu" },
        space = { "alice smith" },
    )]
    fn invalid_identity(input: &str) {
        assert!(matches!(
            require_user(Some(input)),
            Err(Error::InvalidIdentity(_))
        ));
    }
}
