// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Academic term codes and the most-recent-term resolver.
//!
//! Child course ids begin with a term code: two characters of year, one
//! season letter and one session character (e.g. `23F1` in `23F100`).
//! Seasons rank `F` (fall) above `U` above `S`; any other letter ranks
//! below all three.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

/// Number of leading course-id characters that form the term code.
const CODE_LEN: usize = 4;
/// Number of leading term-code characters shown in a meta course name.
const LABEL_LEN: usize = 3;

/// A term code taken from the front of a child course id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TermCode(String);

impl TermCode {
    /// Starting value for a fold; every real term outranks it.
    pub const SENTINEL: &'static str = "00ZZ";

    /// Returns the sentinel term code.
    pub fn sentinel() -> Self {
        TermCode(Self::SENTINEL.to_string())
    }

    /// Extracts the term code from a child course id.
    ///
    /// Ids shorter than four characters yield a shorter code, which still
    /// compares by whatever year and season characters it has.
    pub fn from_course_id(course_id: &str) -> Self {
        TermCode(prefix(course_id, CODE_LEN).to_string())
    }

    /// Returns the full code.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns the two-character year key.
    pub fn year(&self) -> &str {
        prefix(&self.0, 2)
    }

    /// Returns the season letter, if present.
    pub fn season(&self) -> Option<char> {
        self.0.chars().nth(2)
    }

    /// Returns the season rank: `F` > `U` > `S` > anything else.
    pub fn season_rank(&self) -> u8 {
        match self.season() {
            Some('F') => 3,
            Some('U') => 2,
            Some('S') => 1,
            _ => 0,
        }
    }

    /// Returns the year + season label used in meta course names (e.g. `23F`).
    pub fn label(&self) -> &str {
        prefix(&self.0, LABEL_LEN)
    }

    /// Returns true if this is the untouched fold sentinel.
    pub fn is_sentinel(&self) -> bool {
        self.0 == Self::SENTINEL
    }

    /// Compares by year, then by season rank. The session character is
    /// ignored, so `23F1` and `23F2` compare equal.
    pub fn rank_cmp(&self, other: &TermCode) -> Ordering {
        self.year()
            .cmp(other.year())
            .then_with(|| self.season_rank().cmp(&other.season_rank()))
    }
}

impl fmt::Display for TermCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Returns whichever of `current` and `candidate` is more recent.
///
/// The candidate wins only when it strictly outranks the current value;
/// ties keep `current`.
pub fn resolve_term(current: TermCode, candidate: TermCode) -> TermCode {
    if candidate.rank_cmp(&current) == Ordering::Greater {
        candidate
    } else {
        current
    }
}

/// Folds term codes of accepted links into the most recent one.
///
/// When several links share the winning year and season, the first one
/// folded is retained; only the session character can differ between them.
#[derive(Debug, Clone)]
pub struct TermResolver {
    current: TermCode,
}

impl TermResolver {
    /// Starts a fold at the sentinel.
    pub fn new() -> Self {
        TermResolver {
            current: TermCode::sentinel(),
        }
    }

    /// Folds in the term of one child course id.
    pub fn observe(&mut self, course_id: &str) {
        let current = std::mem::replace(&mut self.current, TermCode::sentinel());
        self.current = resolve_term(current, TermCode::from_course_id(course_id));
    }

    /// Returns the resolved term (the sentinel if nothing was observed).
    pub fn current(&self) -> &TermCode {
        &self.current
    }

    /// Consumes the resolver, returning the resolved term.
    pub fn finish(self) -> TermCode {
        self.current
    }
}

impl Default for TermResolver {
    fn default() -> Self {
        Self::new()
    }
}

/// Returns the first `n` characters of `s` without splitting a character.
fn prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}

#[cfg(test)]
#[path = "term_tests.rs"]
mod tests;
