// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Meta course workflows.
//!
//! Each entry point takes the acting instructor explicitly, runs all of its
//! writes in one transaction and returns the messages to send. Nothing is
//! sent here: callers pass the returned messages to [`deliver`] once the
//! workflow has returned, i.e. after commit.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use crate::catalog::OwnerLookup;
use crate::course::MetaCourse;
use crate::db::Database;
use crate::error::{Error, Result};
use crate::link::{apply_decision, create_link, retire_link, CourseLink, Decision, LinkStatus};
use crate::mail::{DeliveryReport, Mailer};
use crate::notify::{NotificationBatcher, NotificationMessage, Templates};
use crate::term::{TermCode, TermResolver};

/// A request to compose a new meta course.
#[derive(Debug, Clone, Default)]
pub struct CreateRequest {
    /// Owner-chosen base name.
    pub base_name: String,
    /// Section label appended in parentheses.
    pub section: String,
    /// Child courses the acting instructor teaches.
    pub own_courses: Vec<String>,
    /// Child courses taught by other instructors. Blank entries are ignored.
    pub foreign_courses: Vec<String>,
}

/// Result of [`Composer::create_meta_course`].
#[derive(Debug, Clone)]
pub struct Composed {
    pub meta: MetaCourse,
    pub links: Vec<CourseLink>,
    pub term: TermCode,
    pub messages: Vec<NotificationMessage>,
}

/// Result of [`Composer::review_requests`].
#[derive(Debug, Clone)]
pub struct Reviewed {
    /// Every reviewed link, changed or not, in request order.
    pub links: Vec<CourseLink>,
    pub messages: Vec<NotificationMessage>,
}

/// Result of [`Composer::update_links`].
#[derive(Debug, Clone)]
pub struct Updated {
    pub retired: Vec<CourseLink>,
    pub added: Vec<CourseLink>,
    pub messages: Vec<NotificationMessage>,
}

/// A pending request waiting on the acting instructor.
#[derive(Debug, Clone, Serialize)]
pub struct IncomingRequest {
    pub link: CourseLink,
    pub meta_name: String,
}

/// The acting instructor's own pending requests for one meta course.
#[derive(Debug, Clone, Serialize)]
pub struct OutgoingGroup {
    pub meta_name: String,
    pub links: Vec<CourseLink>,
}

/// Everything pending for one instructor, in both directions.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StatusOverview {
    pub incoming: Vec<IncomingRequest>,
    pub outgoing: Vec<OutgoingGroup>,
}

/// Runs the linking workflows against a store and a catalog.
pub struct Composer<'a> {
    db: &'a Database,
    catalog: &'a dyn OwnerLookup,
    templates: &'a Templates,
}

impl<'a> Composer<'a> {
    pub fn new(db: &'a Database, catalog: &'a dyn OwnerLookup, templates: &'a Templates) -> Self {
        Composer {
            db,
            catalog,
            templates,
        }
    }

    /// Creates a meta course owned by `user` and links the requested
    /// child courses.
    ///
    /// Own courses the catalog does not list under `user`, and foreign
    /// courses missing from the catalog, are skipped. Each foreign owner
    /// receives one approval request however many of their courses were
    /// asked for. The name is prefixed with the most recent term among
    /// all created links, pending ones included.
    pub fn create_meta_course(&self, user: &str, request: &CreateRequest) -> Result<Composed> {
        require_identity(user)?;
        if request.base_name.trim().is_empty() {
            return Err(Error::InvalidInput("meta course name cannot be empty".into()));
        }
        if request.section.trim().is_empty() {
            return Err(Error::InvalidInput("section cannot be empty".into()));
        }

        let composed = self.db.transaction(|db| {
            let mut meta = MetaCourse::new(user, &request.base_name, &request.section);
            let pk = db.create_meta_course(&meta)?;
            meta.assign_pk(pk);

            let mut resolver = TermResolver::new();
            let mut batcher = NotificationBatcher::new();
            let mut links = Vec::new();
            let mut seen = HashSet::new();

            for course in non_blank(&request.own_courses) {
                if !seen.insert(course) {
                    debug!(course, "duplicate child course, skipping");
                    continue;
                }
                if !self.catalog.is_taught_by(course, user)? {
                    warn!(course, user, "course not taught by requestor, skipping link");
                    continue;
                }
                let mut link = CourseLink::new(pk, course, user, user);
                link.id = db.create_link(&link)?;
                resolver.observe(course);
                links.push(link);
            }

            for course in non_blank(&request.foreign_courses) {
                if !seen.insert(course) {
                    debug!(course, "duplicate child course, skipping");
                    continue;
                }
                let Some((mut link, notice)) = create_link(&meta, course, user, self.catalog)?
                else {
                    continue;
                };
                link.id = db.create_link(&link)?;
                resolver.observe(course);
                if let Some(notice) = notice {
                    batcher.add_first(notice.recipient(), self.templates.render(&notice));
                }
                links.push(link);
            }

            let term = resolver.finish();
            if term.is_sentinel() {
                warn!(meta = %meta.meta_course_id, "meta course created without any linked course");
            }
            meta.prefix_term(&term);
            db.update_meta_course(&meta)?;

            Ok(Composed {
                meta,
                links,
                term,
                messages: batcher.flatten(),
            })
        })?;

        info!(
            meta = %composed.meta.meta_course_id,
            links = composed.links.len(),
            notifications = composed.messages.len(),
            "created meta course"
        );
        Ok(composed)
    }

    /// Applies `user`'s decisions to pending requests for their courses.
    ///
    /// Decisions are parsed leniently (see [`Decision::parse`]); only the
    /// first decision for a link counts. Every referenced link must be
    /// owned by `user`; otherwise nothing is changed. Each approval or denial notifies the requestor, and a
    /// requestor with several decisions receives one message per decision.
    pub fn review_requests(&self, user: &str, decisions: &[(i64, String)]) -> Result<Reviewed> {
        require_identity(user)?;

        let reviewed = self.db.transaction(|db| {
            let mut pending = Vec::with_capacity(decisions.len());
            let mut seen = HashSet::new();
            for (id, raw) in decisions {
                if !seen.insert(*id) {
                    warn!(link = id, "link listed twice, keeping the first decision");
                    continue;
                }
                let link = db.get_link(*id)?;
                if link.owner != user {
                    return Err(Error::NotPermitted {
                        user: user.to_string(),
                        action: format!("review link {id}"),
                        hint: format!("course {} belongs to {}", link.child_course, link.owner),
                    });
                }
                pending.push((link, Decision::parse(raw)));
            }

            let mut batcher = NotificationBatcher::new();
            let mut links = Vec::with_capacity(pending.len());
            for (link, decision) in pending {
                let before = link.status;
                let (mut link, notice) = apply_decision(link, decision);
                if link.status != before {
                    link.version = db.update_link_status(&link)?;
                }
                if let Some(notice) = notice {
                    batcher.add(notice.recipient(), self.templates.render(&notice));
                }
                links.push(link);
            }

            Ok(Reviewed {
                links,
                messages: batcher.flatten(),
            })
        })?;

        info!(
            user,
            reviewed = reviewed.links.len(),
            notifications = reviewed.messages.len(),
            "reviewed link requests"
        );
        Ok(reviewed)
    }

    /// Retires links `user` requested and adds new links to meta courses
    /// `user` owns.
    ///
    /// Retiring touches only enabled links. Added links follow the same
    /// ownership rule as creation; the meta course name is left as is.
    pub fn update_links(&self, user: &str, retire: &[i64], add: &[(i64, String)]) -> Result<Updated> {
        require_identity(user)?;

        let updated = self.db.transaction(|db| {
            let mut to_retire = Vec::with_capacity(retire.len());
            let mut seen = HashSet::new();
            for id in retire {
                if !seen.insert(*id) {
                    continue;
                }
                let link = db.get_link(*id)?;
                if link.requestor != user {
                    return Err(Error::NotPermitted {
                        user: user.to_string(),
                        action: format!("remove link {id}"),
                        hint: format!("only {} can remove it", link.requestor),
                    });
                }
                to_retire.push(link);
            }

            let mut metas: HashMap<i64, MetaCourse> = HashMap::new();
            for (pk, _) in add {
                if metas.contains_key(pk) {
                    continue;
                }
                let meta = db.get_meta_course(*pk)?;
                if meta.instructor != user {
                    return Err(Error::NotPermitted {
                        user: user.to_string(),
                        action: format!("add links to {}", meta.meta_course_id),
                        hint: format!("the meta course belongs to {}", meta.instructor),
                    });
                }
                metas.insert(*pk, meta);
            }

            let mut retired = Vec::new();
            for link in to_retire {
                let before = link.status;
                let mut link = retire_link(link);
                if link.status != before {
                    link.version = db.update_link_status(&link)?;
                    retired.push(link);
                }
            }

            let mut batcher = NotificationBatcher::new();
            let mut added = Vec::new();
            for (pk, course) in add {
                let course = course.trim();
                if course.is_empty() {
                    continue;
                }
                let Some(meta) = metas.get(pk) else {
                    continue;
                };
                let Some((mut link, notice)) = create_link(meta, course, user, self.catalog)?
                else {
                    continue;
                };
                link.id = db.create_link(&link)?;
                if let Some(notice) = notice {
                    batcher.add_first(notice.recipient(), self.templates.render(&notice));
                }
                added.push(link);
            }

            Ok(Updated {
                retired,
                added,
                messages: batcher.flatten(),
            })
        })?;

        info!(
            user,
            retired = updated.retired.len(),
            added = updated.added.len(),
            "updated meta course links"
        );
        Ok(updated)
    }
}

/// Collects what is pending for `user`: requests awaiting their decision
/// and their own requests awaiting others, grouped by meta course name.
pub fn status_overview(db: &Database, user: &str) -> Result<StatusOverview> {
    let mut names: HashMap<i64, String> = HashMap::new();
    let mut name_of = |pk: i64| -> Result<String> {
        if let Some(name) = names.get(&pk) {
            return Ok(name.clone());
        }
        let name = db.get_meta_course(pk)?.name;
        names.insert(pk, name.clone());
        Ok(name)
    };

    let mut incoming = Vec::new();
    for link in db.links_by_owner(user, LinkStatus::Pending)? {
        let meta_name = name_of(link.meta_course_pk)?;
        incoming.push(IncomingRequest { link, meta_name });
    }

    let mut outgoing: Vec<OutgoingGroup> = Vec::new();
    for link in db.links_by_requestor(user, LinkStatus::Pending)? {
        let meta_name = name_of(link.meta_course_pk)?;
        match outgoing.iter_mut().find(|g| g.meta_name == meta_name) {
            Some(group) => group.links.push(link),
            None => outgoing.push(OutgoingGroup {
                meta_name,
                links: vec![link],
            }),
        }
    }

    Ok(StatusOverview { incoming, outgoing })
}

/// Hands committed messages to the mailer. An empty batch is not sent.
pub fn deliver(mailer: &dyn Mailer, messages: &[NotificationMessage]) -> DeliveryReport {
    if messages.is_empty() {
        return DeliveryReport::default();
    }
    let report = mailer.send_mass(messages);
    if report.is_success() {
        info!(delivered = report.delivered, "sent notifications");
    } else {
        warn!(
            delivered = report.delivered,
            failed = report.failed.len(),
            "some notifications were not delivered"
        );
    }
    report
}

fn require_identity(user: &str) -> Result<()> {
    if user.trim().is_empty() {
        return Err(Error::InvalidInput("acting user cannot be empty".into()));
    }
    Ok(())
}

fn non_blank(courses: &[String]) -> impl Iterator<Item = &str> {
    courses.iter().map(|c| c.trim()).filter(|c| !c.is_empty())
}

#[cfg(test)]
#[path = "workflow_tests.rs"]
mod tests;
