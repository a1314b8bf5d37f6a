// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! The meta course record.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::term::TermCode;

/// An aggregate course record linking one or more child course sections.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetaCourse {
    /// Database-assigned sequence number.
    pub pk: i64,
    /// External identifier (format: `meta_{instructor}_{pk}`).
    pub meta_course_id: String,
    /// Display name, `(Meta {term}) {base} ({section})` once composed.
    pub name: String,
    /// Owning instructor.
    pub instructor: String,
    /// When the meta course was created.
    pub created_at: DateTime<Utc>,
}

impl MetaCourse {
    /// Creates an unsaved meta course named `{base_name} ({section})`.
    ///
    /// The identifier is a placeholder until the record has a sequence
    /// number; see [`MetaCourse::assign_pk`].
    pub fn new(instructor: &str, base_name: &str, section: &str) -> Self {
        MetaCourse {
            pk: 0, // Will be set by database
            meta_course_id: format!("meta_{instructor}_temp"),
            name: format!("{} ({})", base_name.trim(), section.trim()),
            instructor: instructor.to_string(),
            created_at: Utc::now(),
        }
    }

    /// Records the sequence number and derives the durable identifier.
    pub fn assign_pk(&mut self, pk: i64) {
        self.pk = pk;
        self.meta_course_id = format!("meta_{}_{}", self.instructor, pk);
    }

    /// Prepends the term label to the display name.
    pub fn prefix_term(&mut self, term: &TermCode) {
        self.name = format!("(Meta {}) {}", term.label(), self.name);
    }
}
