// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Course links and their approval lifecycle.
//!
//! A link starts `Enabled` when the requestor owns the child course and
//! `Pending` otherwise. The only legal moves are `Pending -> Enabled`,
//! `Pending -> Disabled` and `Enabled -> Disabled`; `Disabled` is terminal.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{debug, warn};

use crate::catalog::OwnerLookup;
use crate::course::MetaCourse;
use crate::error::{Error, Result};

/// Approval status of a course link.
///
/// Stored as the integer codes 0 (enabled), 1 (pending) and 2 (disabled).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkStatus {
    /// Active; the child course contributes to the meta course.
    Enabled,
    /// Awaiting approval from the child course owner.
    Pending,
    /// Denied by the owner or retired by the requestor. Terminal.
    Disabled,
}

impl LinkStatus {
    /// Returns the string representation used in display.
    pub fn as_str(&self) -> &'static str {
        match self {
            LinkStatus::Enabled => "enabled",
            LinkStatus::Pending => "pending",
            LinkStatus::Disabled => "disabled",
        }
    }

    /// Returns the integer code used in storage.
    pub fn code(&self) -> i64 {
        match self {
            LinkStatus::Enabled => 0,
            LinkStatus::Pending => 1,
            LinkStatus::Disabled => 2,
        }
    }

    /// Parses a storage code.
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(LinkStatus::Enabled),
            1 => Some(LinkStatus::Pending),
            2 => Some(LinkStatus::Disabled),
            _ => None,
        }
    }

    /// Check if a transition from this status to target is legal.
    pub fn can_transition_to(&self, target: LinkStatus) -> bool {
        matches!(
            (self, target),
            (LinkStatus::Pending, LinkStatus::Enabled)
                | (LinkStatus::Pending, LinkStatus::Disabled)
                | (LinkStatus::Enabled, LinkStatus::Disabled)
        )
    }
}

impl fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for LinkStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "enabled" | "0" => Ok(LinkStatus::Enabled),
            "pending" | "1" => Ok(LinkStatus::Pending),
            "disabled" | "denied" | "2" => Ok(LinkStatus::Disabled),
            _ => Err(Error::InvalidStatus(s.to_string())),
        }
    }
}

/// An owner's answer to a pending link request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    Approve,
    Deny,
    /// Leave the request pending.
    Abstain,
}

impl Decision {
    /// Parses a submitted decision leniently.
    ///
    /// Accepts the words `approve`/`deny`/`abstain` (and their past tenses),
    /// the status names and their storage codes. Blank input abstains.
    /// Anything else also abstains, with a warning.
    pub fn parse(raw: &str) -> Decision {
        match raw.trim().to_lowercase().as_str() {
            "approve" | "approved" | "enabled" | "0" => Decision::Approve,
            "deny" | "denied" | "disabled" | "2" => Decision::Deny,
            "" | "abstain" | "pending" | "1" => Decision::Abstain,
            other => {
                warn!(value = other, "unrecognized decision, leaving link pending");
                Decision::Abstain
            }
        }
    }
}

/// Inclusion of one child course in one meta course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CourseLink {
    /// Database-assigned identifier.
    pub id: i64,
    /// The meta course this link belongs to.
    pub meta_course_pk: i64,
    /// The linked child course id.
    pub child_course: String,
    /// Instructor who proposed the link.
    pub requestor: String,
    /// Instructor who owns the child course.
    pub owner: String,
    /// Approval status.
    pub status: LinkStatus,
    /// Bumped on every status change; guards concurrent updates.
    pub version: i64,
    /// When the link was created.
    pub created_at: DateTime<Utc>,
    /// When the status last changed.
    pub updated_at: DateTime<Utc>,
}

impl CourseLink {
    /// Creates an unsaved link, `Enabled` if requestor and owner coincide
    /// and `Pending` otherwise.
    pub fn new(meta_course_pk: i64, child_course: &str, requestor: &str, owner: &str) -> Self {
        let now = Utc::now();
        let status = if requestor == owner {
            LinkStatus::Enabled
        } else {
            LinkStatus::Pending
        };
        CourseLink {
            id: 0, // Will be set by database
            meta_course_pk,
            child_course: child_course.to_string(),
            requestor: requestor.to_string(),
            owner: owner.to_string(),
            status,
            version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    /// Returns true if the child course belongs to someone other than the requestor.
    pub fn is_foreign(&self) -> bool {
        self.requestor != self.owner
    }

    /// Moves to `target` if the status table allows it; otherwise the link
    /// is left untouched and false is returned.
    fn transition(&mut self, target: LinkStatus) -> bool {
        if !self.status.can_transition_to(target) {
            return false;
        }
        self.status = target;
        self.updated_at = Utc::now();
        true
    }
}

/// What a link transition asks to tell someone about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Notice {
    /// A requestor wants to use the owner's course.
    ApprovalRequested { owner: String, course: String },
    /// The owner approved the requestor's link.
    Approved { requestor: String, course: String },
    /// The owner denied the requestor's link.
    Denied { requestor: String, course: String },
}

impl Notice {
    /// Identity of the instructor to notify.
    pub fn recipient(&self) -> &str {
        match self {
            Notice::ApprovalRequested { owner, .. } => owner,
            Notice::Approved { requestor, .. } | Notice::Denied { requestor, .. } => requestor,
        }
    }

    /// The child course the notice is about.
    pub fn course(&self) -> &str {
        match self {
            Notice::ApprovalRequested { course, .. }
            | Notice::Approved { course, .. }
            | Notice::Denied { course, .. } => course,
        }
    }
}

/// Creates a link from `meta` to `child_course` on behalf of `requestor`.
///
/// Returns `None` when the catalog does not know the child course; the
/// caller skips such requests. A foreign-owned course yields a `Pending`
/// link and one approval request addressed to its owner.
pub fn create_link(
    meta: &MetaCourse,
    child_course: &str,
    requestor: &str,
    catalog: &dyn OwnerLookup,
) -> Result<Option<(CourseLink, Option<Notice>)>> {
    let Some(owner) = catalog.lookup_owner(child_course)? else {
        warn!(course = child_course, "unknown child course, skipping link");
        return Ok(None);
    };

    let link = CourseLink::new(meta.pk, child_course, requestor, &owner);
    let notice = link.is_foreign().then(|| Notice::ApprovalRequested {
        owner: owner.clone(),
        course: child_course.to_string(),
    });
    debug!(
        course = child_course,
        owner = owner.as_str(),
        status = %link.status,
        "created link"
    );
    Ok(Some((link, notice)))
}

/// Applies an owner's decision to a pending link.
///
/// Approving or denying notifies the requestor. Abstaining, or deciding on
/// a link that is no longer pending, leaves the link unchanged.
pub fn apply_decision(mut link: CourseLink, decision: Decision) -> (CourseLink, Option<Notice>) {
    if link.status != LinkStatus::Pending {
        if decision != Decision::Abstain {
            warn!(
                link = link.id,
                status = %link.status,
                "ignoring decision on link that is not pending"
            );
        }
        return (link, None);
    }

    let (target, notice) = match decision {
        Decision::Approve => (
            LinkStatus::Enabled,
            Notice::Approved {
                requestor: link.requestor.clone(),
                course: link.child_course.clone(),
            },
        ),
        Decision::Deny => (
            LinkStatus::Disabled,
            Notice::Denied {
                requestor: link.requestor.clone(),
                course: link.child_course.clone(),
            },
        ),
        Decision::Abstain => return (link, None),
    };
    if !link.transition(target) {
        return (link, None);
    }
    debug!(link = link.id, status = %link.status, "applied decision");
    (link, Some(notice))
}

/// Retires an enabled link. Other statuses are left unchanged.
pub fn retire_link(mut link: CourseLink) -> CourseLink {
    if link.status != LinkStatus::Enabled || !link.transition(LinkStatus::Disabled) {
        warn!(link = link.id, status = %link.status, "only enabled links can be retired");
    }
    link
}

#[cfg(test)]
#[path = "link_tests.rs"]
mod tests;
