// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use ml_core::LinkStatus;

#[test]
fn meta_line_shows_number_id_and_name() {
    let mut meta = MetaCourse::new("alice", "Algebra", "A");
    meta.assign_pk(7);
    meta.name = "(Meta 23F) Algebra (A)".to_string();

    assert_eq!(
        format_meta_line(&meta),
        "#7 meta_alice_7: (Meta 23F) Algebra (A)"
    );
}

#[test]
fn own_link_omits_owner() {
    let mut link = CourseLink::new(1, "23F100", "alice", "alice");
    link.id = 3;

    assert_eq!(format_link_line(&link), "[3] 23F100 enabled");
}

#[test]
fn foreign_link_names_owner() {
    let mut link = CourseLink::new(1, "23F200", "alice", "bob");
    link.id = 4;
    assert_eq!(format_link_line(&link), "[4] 23F200 pending (owner: bob)");

    link.status = LinkStatus::Disabled;
    assert_eq!(format_link_line(&link), "[4] 23F200 disabled (owner: bob)");
}

#[test]
fn incoming_line_names_meta_course_and_requestor() {
    let mut link = CourseLink::new(1, "23F200", "alice", "bob");
    link.id = 4;
    let request = IncomingRequest {
        link,
        meta_name: "(Meta 23F) Algebra (A)".to_string(),
    };

    assert_eq!(
        format_incoming_line(&request),
        "[4] 23F200 for (Meta 23F) Algebra (A), requested by alice"
    );
}
