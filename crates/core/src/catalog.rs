// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Course catalog ownership lookup.
//!
//! The catalog itself belongs to the registrar feed; the workflows only
//! need to know who teaches a given child course.

use std::collections::BTreeMap;

use crate::error::Result;

/// Resolves child course ids to their instructor-owner.
pub trait OwnerLookup {
    /// Returns the instructor who owns `course_id`, or `None` if the course
    /// is not in the catalog.
    fn lookup_owner(&self, course_id: &str) -> Result<Option<String>>;

    /// Returns true if `instructor` teaches `course_id`.
    fn is_taught_by(&self, course_id: &str, instructor: &str) -> Result<bool> {
        Ok(self.lookup_owner(course_id)?.as_deref() == Some(instructor))
    }
}

/// Course id to instructor map, for fixtures and small imports.
impl OwnerLookup for BTreeMap<String, String> {
    fn lookup_owner(&self, course_id: &str) -> Result<Option<String>> {
        Ok(self.get(course_id).cloned())
    }
}
