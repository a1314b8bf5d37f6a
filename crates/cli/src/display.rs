// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use ml_core::{CourseLink, IncomingRequest, MetaCourse};

/// Format a meta course header line.
///
/// Format: `#{pk} {meta_course_id}: {name}`
pub fn format_meta_line(meta: &MetaCourse) -> String {
    format!("#{} {}: {}", meta.pk, meta.meta_course_id, meta.name)
}

/// Format a link line for the requestor's view.
///
/// Format: `[{id}] {course} {status}`, followed by the owner for links
/// to someone else's course.
pub fn format_link_line(link: &CourseLink) -> String {
    let mut line = format!("[{}] {} {}", link.id, link.child_course, link.status);
    if link.is_foreign() {
        line.push_str(&format!(" (owner: {})", link.owner));
    }
    line
}

/// Format a request awaiting the owner's decision.
pub fn format_incoming_line(request: &IncomingRequest) -> String {
    format!(
        "[{}] {} for {}, requested by {}",
        request.link.id, request.link.child_course, request.meta_name, request.link.requestor
    )
}

#[cfg(test)]
#[path = "display_tests.rs"]
mod tests;
