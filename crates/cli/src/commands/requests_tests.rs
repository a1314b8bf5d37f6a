// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use ml_core::{Composer, CreateRequest, Templates};

/// Alice links her own 23F100 and asks bob for 23F200 and carol for 24S300.
fn seeded_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.add_catalog_course("23F100", "alice").unwrap();
    db.add_catalog_course("23F200", "bob").unwrap();
    db.add_catalog_course("24S300", "carol").unwrap();
    let request = CreateRequest {
        base_name: "Algebra".to_string(),
        section: "A".to_string(),
        own_courses: vec!["23F100".to_string()],
        foreign_courses: vec!["23F200".to_string(), "24S300".to_string()],
    };
    Composer::new(&db, &db, &Templates::default())
        .create_meta_course("alice", &request)
        .unwrap();
    db
}

#[test]
fn nothing_pending() {
    let db = seeded_db();
    let overview = status_overview(&db, "dave").unwrap();

    assert_eq!(render_text(&overview), ["No pending requests"]);
}

#[test]
fn incoming_section_for_owner() {
    let db = seeded_db();
    let overview = status_overview(&db, "bob").unwrap();

    assert_eq!(
        render_text(&overview),
        [
            "Awaiting your decision:",
            "  [2] 23F200 for (Meta 24S) Algebra (A), requested by alice",
        ]
    );
}

#[test]
fn outgoing_section_groups_by_meta_course() {
    let db = seeded_db();
    let overview = status_overview(&db, "alice").unwrap();

    assert_eq!(
        render_text(&overview),
        [
            "Waiting on others:",
            "  (Meta 24S) Algebra (A)",
            "    [2] 23F200 pending (owner: bob)",
            "    [3] 24S300 pending (owner: carol)",
        ]
    );
}

#[test]
fn both_sections_when_user_is_owner_and_requestor() {
    let db = seeded_db();
    db.add_catalog_course("23F400", "dave").unwrap();
    let request = CreateRequest {
        base_name: "Geometry".to_string(),
        section: "B".to_string(),
        own_courses: Vec::new(),
        foreign_courses: vec!["23F400".to_string()],
    };
    Composer::new(&db, &db, &Templates::default())
        .create_meta_course("bob", &request)
        .unwrap();

    let lines = render_text(&status_overview(&db, "bob").unwrap());

    assert_eq!(lines[0], "Awaiting your decision:");
    assert_eq!(lines[2], "Waiting on others:");
    assert_eq!(lines[3], "  (Meta 23F) Geometry (B)");
    assert_eq!(lines[4], "    [4] 23F400 pending (owner: dave)");
}

#[test]
fn json_output_succeeds() {
    let db = seeded_db();
    run_impl(&db, "bob", OutputFormat::Json).unwrap();
    run_impl(&db, "bob", OutputFormat::Text).unwrap();
}
