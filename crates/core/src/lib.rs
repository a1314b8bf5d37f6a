// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! ml-core: meta course linking workflows
//!
//! This crate lets an instructor compose a meta course out of their own
//! course sections and sections owned by other instructors. Foreign
//! sections go through an approval lifecycle; the owners and requestors
//! involved are notified through a pluggable [`Mailer`].
//!
//! # Main Components
//!
//! - [`term`] - term codes and the most-recent-term resolver
//! - [`link`] - course links and their approval state machine
//! - [`workflow`] - the [`Composer`] tying links, terms and notifications together
//! - [`notify`] - message templates and per-recipient batching
//! - [`Database`] - SQLite-backed storage for meta courses, links and the catalog

pub mod catalog;
pub mod course;
pub mod db;
pub mod error;
pub mod link;
pub mod mail;
pub mod notify;
pub mod term;
pub mod workflow;

pub use catalog::OwnerLookup;
pub use course::MetaCourse;
pub use db::Database;
pub use error::{Error, Result};
pub use link::{apply_decision, create_link, retire_link, CourseLink, Decision, LinkStatus, Notice};
pub use mail::{DeliveryFailure, DeliveryReport, Mailer, MemoryMailer, OutboxMailer};
pub use notify::{NotificationBatcher, NotificationMessage, Templates};
pub use term::{resolve_term, TermCode, TermResolver};
pub use workflow::{
    deliver, status_overview, Composed, Composer, CreateRequest, IncomingRequest, OutgoingGroup,
    Reviewed, StatusOverview, Updated,
};
