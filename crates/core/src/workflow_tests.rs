// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use crate::mail::MemoryMailer;

fn seeded_db() -> Database {
    let db = Database::open_in_memory().unwrap();
    db.add_catalog_course("23F100", "alice").unwrap();
    db.add_catalog_course("22S150", "alice").unwrap();
    db.add_catalog_course("23F200", "bob").unwrap();
    db.add_catalog_course("23F201", "bob").unwrap();
    db.add_catalog_course("24S300", "carol").unwrap();
    db
}

fn request(own: &[&str], foreign: &[&str]) -> CreateRequest {
    CreateRequest {
        base_name: "Algebra".into(),
        section: "A".into(),
        own_courses: own.iter().map(|s| s.to_string()).collect(),
        foreign_courses: foreign.iter().map(|s| s.to_string()).collect(),
    }
}

fn decisions(items: &[(i64, &str)]) -> Vec<(i64, String)> {
    items.iter().map(|(id, d)| (*id, d.to_string())).collect()
}

#[test]
fn create_meta_course_end_to_end() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);

    let composed = composer
        .create_meta_course("alice", &request(&["23F100"], &["23F200"]))
        .unwrap();

    assert_eq!(composed.meta.name, "(Meta 23F) Algebra (A)");
    assert_eq!(
        composed.meta.meta_course_id,
        format!("meta_alice_{}", composed.meta.pk)
    );
    assert_eq!(composed.links.len(), 2);
    assert_eq!(composed.links[0].child_course, "23F100");
    assert_eq!(composed.links[0].status, LinkStatus::Enabled);
    assert_eq!(composed.links[1].child_course, "23F200");
    assert_eq!(composed.links[1].status, LinkStatus::Pending);
    assert_eq!(composed.messages.len(), 1);
    assert_eq!(composed.messages[0].recipient, "bob@ucmail.uc.edu");

    let stored = db.get_meta_course(composed.meta.pk).unwrap();
    assert_eq!(stored, composed.meta);
    assert_eq!(db.links_of(stored.pk).unwrap().len(), 2);
}

#[test]
fn pending_links_count_toward_term() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);

    let composed = composer
        .create_meta_course("alice", &request(&["22S150"], &["24S300"]))
        .unwrap();

    assert_eq!(composed.term.as_str(), "24S3");
    assert!(composed.meta.name.starts_with("(Meta 24S) "));
}

#[test]
fn unknown_and_unowned_courses_are_skipped() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);

    let composed = composer
        .create_meta_course("alice", &request(&["23F100", "23F200", "99X999"], &["98X000", ""]))
        .unwrap();

    assert_eq!(composed.links.len(), 1);
    assert_eq!(composed.links[0].child_course, "23F100");
    assert!(composed.messages.is_empty());
}

#[test]
fn one_request_per_foreign_owner() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);

    let composed = composer
        .create_meta_course("alice", &request(&[], &["23F200", "23F201", "24S300"]))
        .unwrap();

    assert_eq!(composed.links.len(), 3);
    let recipients: Vec<&str> = composed
        .messages
        .iter()
        .map(|m| m.recipient.as_str())
        .collect();
    assert_eq!(recipients, ["bob@ucmail.uc.edu", "carol@ucmail.uc.edu"]);
}

#[test]
fn course_specific_request_template_still_sends_one_per_owner() {
    let db = seeded_db();
    let templates = Templates {
        request_body: "Please review {course}. {help_desk}".into(),
        ..Templates::default()
    };
    let composer = Composer::new(&db, &db, &templates);

    let composed = composer
        .create_meta_course("alice", &request(&[], &["23F200", "23F201"]))
        .unwrap();

    assert_eq!(composed.links.len(), 2);
    assert_eq!(composed.messages.len(), 1);
    assert_eq!(composed.messages[0].recipient, "bob@ucmail.uc.edu");
    assert!(composed.messages[0].body.starts_with("Please review 23F200."));
}

#[test]
fn duplicate_child_courses_link_once() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);

    let composed = composer
        .create_meta_course("alice", &request(&["23F100", " 23F100 "], &["23F100"]))
        .unwrap();

    assert_eq!(composed.links.len(), 1);
}

#[test]
fn meta_course_without_links_gets_sentinel_label() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);

    let composed = composer
        .create_meta_course("alice", &request(&[], &[]))
        .unwrap();

    assert!(composed.term.is_sentinel());
    assert_eq!(composed.meta.name, "(Meta 00Z) Algebra (A)");
}

#[test]
fn invalid_request_persists_nothing() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);

    let mut bad = request(&["23F100"], &[]);
    bad.section = "  ".into();
    assert!(matches!(
        composer.create_meta_course("alice", &bad),
        Err(Error::InvalidInput(_))
    ));
    assert!(matches!(
        composer.create_meta_course("", &request(&["23F100"], &[])),
        Err(Error::InvalidInput(_))
    ));
    assert!(db.meta_courses_of("alice").unwrap().is_empty());
}

/// Catalog backed by the store that fails when asked about one course.
struct FlakyCatalog<'a> {
    db: &'a Database,
    broken: &'static str,
}

impl OwnerLookup for FlakyCatalog<'_> {
    fn lookup_owner(&self, course_id: &str) -> Result<Option<String>> {
        if course_id == self.broken {
            return Err(Error::InvalidInput(format!("catalog unavailable for {course_id}")));
        }
        self.db.lookup_owner(course_id)
    }

    fn is_taught_by(&self, course_id: &str, instructor: &str) -> Result<bool> {
        self.db.is_taught_by(course_id, instructor)
    }
}

#[test]
fn failure_after_writes_rolls_back_everything() {
    let db = seeded_db();
    let templates = Templates::default();
    let catalog = FlakyCatalog {
        db: &db,
        broken: "24S300",
    };
    let composer = Composer::new(&db, &catalog, &templates);

    let result =
        composer.create_meta_course("alice", &request(&["23F100"], &["23F200", "24S300"]));

    assert!(result.is_err());
    assert!(db.meta_courses_of("alice").unwrap().is_empty());
    assert!(db.links_of(1).unwrap().is_empty());
    assert!(db
        .links_by_owner("bob", LinkStatus::Pending)
        .unwrap()
        .is_empty());
}

#[test]
fn review_approve_and_deny() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&[], &["23F200", "23F201"]))
        .unwrap();
    let (first, second) = (composed.links[0].id, composed.links[1].id);

    let reviewed = composer
        .review_requests("bob", &decisions(&[(first, "approve"), (second, "deny")]))
        .unwrap();

    assert_eq!(reviewed.links[0].status, LinkStatus::Enabled);
    assert_eq!(reviewed.links[1].status, LinkStatus::Disabled);
    assert_eq!(reviewed.messages.len(), 2);
    assert!(reviewed
        .messages
        .iter()
        .all(|m| m.recipient == "alice@ucmail.uc.edu"));
    assert!(reviewed.messages[0].body.contains("23F200 has been approved"));
    assert!(reviewed.messages[1].body.contains("23F201 has been denied"));

    assert_eq!(db.get_link(first).unwrap().status, LinkStatus::Enabled);
    assert_eq!(db.get_link(second).unwrap().status, LinkStatus::Disabled);
    assert_eq!(db.get_link(first).unwrap().version, 1);
}

#[test]
fn review_abstain_and_garbage_leave_pending() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&[], &["23F200", "23F201"]))
        .unwrap();
    let (first, second) = (composed.links[0].id, composed.links[1].id);

    let reviewed = composer
        .review_requests("bob", &decisions(&[(first, ""), (second, "5")]))
        .unwrap();

    assert!(reviewed.messages.is_empty());
    for id in [first, second] {
        let link = db.get_link(id).unwrap();
        assert_eq!(link.status, LinkStatus::Pending);
        assert_eq!(link.version, 0);
    }
}

#[test]
fn review_of_foreign_link_is_rejected_atomically() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&[], &["23F200", "24S300"]))
        .unwrap();
    let (bobs, carols) = (composed.links[0].id, composed.links[1].id);

    let result = composer.review_requests("bob", &decisions(&[(bobs, "approve"), (carols, "approve")]));

    assert!(matches!(result, Err(Error::NotPermitted { .. })));
    assert_eq!(db.get_link(bobs).unwrap().status, LinkStatus::Pending);
}

#[test]
fn denied_link_cannot_be_revived() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&[], &["23F200"]))
        .unwrap();
    let id = composed.links[0].id;

    composer.review_requests("bob", &decisions(&[(id, "deny")])).unwrap();
    let again = composer.review_requests("bob", &decisions(&[(id, "approve")])).unwrap();

    assert!(again.messages.is_empty());
    assert_eq!(db.get_link(id).unwrap().status, LinkStatus::Disabled);
}

#[test]
fn update_links_retires_and_adds() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&["23F100"], &[]))
        .unwrap();
    let pk = composed.meta.pk;
    let own = composed.links[0].id;

    let updated = composer
        .update_links(
            "alice",
            &[own],
            &[(pk, "22S150".into()), (pk, "23F200".into()), (pk, "23F201".into())],
        )
        .unwrap();

    assert_eq!(updated.retired.len(), 1);
    assert_eq!(db.get_link(own).unwrap().status, LinkStatus::Disabled);
    assert_eq!(updated.added.len(), 3);
    assert_eq!(updated.added[0].status, LinkStatus::Enabled);
    assert_eq!(updated.added[1].status, LinkStatus::Pending);
    assert_eq!(updated.messages.len(), 1);
    assert_eq!(updated.messages[0].recipient, "bob@ucmail.uc.edu");
    // Adding links does not re-derive the name.
    assert_eq!(db.get_meta_course(pk).unwrap().name, "(Meta 23F) Algebra (A)");
}

#[test]
fn update_links_ignores_pending_retirement() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&[], &["23F200"]))
        .unwrap();
    let id = composed.links[0].id;

    let updated = composer.update_links("alice", &[id], &[]).unwrap();

    assert!(updated.retired.is_empty());
    assert_eq!(db.get_link(id).unwrap().status, LinkStatus::Pending);
}

#[test]
fn repeated_ids_are_handled_once() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&["23F100"], &["23F200"]))
        .unwrap();
    let own = composed.links[0].id;
    let foreign = composed.links[1].id;

    let reviewed = composer
        .review_requests("bob", &decisions(&[(foreign, "deny"), (foreign, "approve")]))
        .unwrap();
    assert_eq!(reviewed.links.len(), 1);
    assert_eq!(db.get_link(foreign).unwrap().status, LinkStatus::Disabled);
    assert_eq!(reviewed.messages.len(), 1);

    let updated = composer.update_links("alice", &[own, own], &[]).unwrap();
    assert_eq!(updated.retired.len(), 1);
    assert_eq!(db.get_link(own).unwrap().status, LinkStatus::Disabled);
}

#[test]
fn update_links_on_someone_elses_meta_course_is_rejected() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&["23F100"], &[]))
        .unwrap();

    let add = composer.update_links("bob", &[], &[(composed.meta.pk, "23F200".into())]);
    assert!(matches!(add, Err(Error::NotPermitted { .. })));

    let retire = composer.update_links("bob", &[composed.links[0].id], &[]);
    assert!(matches!(retire, Err(Error::NotPermitted { .. })));
    assert_eq!(db.links_of(composed.meta.pk).unwrap().len(), 1);
}

#[test]
fn concurrent_status_change_is_detected() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&[], &["23F200"]))
        .unwrap();
    let link = composed.links[0].clone();

    // Someone else changes the link after it was read.
    let mut concurrent = link.clone();
    concurrent.status = LinkStatus::Disabled;
    db.update_link_status(&concurrent).unwrap();

    let (approved, _) = crate::link::apply_decision(link, Decision::Approve);
    assert!(matches!(
        db.update_link_status(&approved),
        Err(Error::StaleLink(_))
    ));
    assert_eq!(db.get_link(approved.id).unwrap().status, LinkStatus::Disabled);
}

#[test]
fn status_overview_groups_outgoing_by_meta_course() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let first = composer
        .create_meta_course("alice", &request(&[], &["23F200", "24S300"]))
        .unwrap();
    let mut other = request(&[], &["23F201"]);
    other.base_name = "Geometry".into();
    composer.create_meta_course("alice", &other).unwrap();

    let alice = status_overview(&db, "alice").unwrap();
    assert!(alice.incoming.is_empty());
    assert_eq!(alice.outgoing.len(), 2);
    assert_eq!(alice.outgoing[0].meta_name, first.meta.name);
    assert_eq!(alice.outgoing[0].links.len(), 2);

    let bob = status_overview(&db, "bob").unwrap();
    assert_eq!(bob.incoming.len(), 2);
    assert!(bob.outgoing.is_empty());
}

#[test]
fn deliver_reports_failures_without_touching_state() {
    let db = seeded_db();
    let templates = Templates::default();
    let composer = Composer::new(&db, &db, &templates);
    let composed = composer
        .create_meta_course("alice", &request(&["23F100"], &["23F200", "24S300"]))
        .unwrap();

    let mailer = MemoryMailer::new().failing_for("carol@ucmail.uc.edu");
    let report = deliver(&mailer, &composed.messages);

    assert_eq!(report.delivered, 1);
    assert_eq!(mailer.sent()[0].recipient, "bob@ucmail.uc.edu");
    assert!(report.into_result().unwrap_err().is_delivery());
    assert_eq!(db.links_of(composed.meta.pk).unwrap().len(), 3);
}

#[test]
fn deliver_skips_empty_batch() {
    let mailer = MemoryMailer::new();
    let report = deliver(&mailer, &[]);
    assert_eq!(report, DeliveryReport::default());
    assert!(mailer.sent().is_empty());
}
