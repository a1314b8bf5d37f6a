// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `add` and `remove`: editing the links of an existing meta course.

use std::collections::HashSet;
use std::path::Path;

use ml_core::{Composer, CourseLink, Database, Mailer, Templates};

use crate::display::format_link_line;
use crate::error::Result;

use super::{open_context, send_notifications};

pub fn add(base: &Path, user: &str, meta: i64, courses: &[String]) -> Result<()> {
    let ctx = open_context(base)?;
    add_impl(&ctx.db, &ctx.config.mail.templates, &ctx.mailer(), user, meta, courses)
}

pub(crate) fn add_impl(
    db: &Database,
    templates: &Templates,
    mailer: &dyn Mailer,
    user: &str,
    meta: i64,
    courses: &[String],
) -> Result<()> {
    let additions: Vec<(i64, String)> = courses.iter().map(|c| (meta, c.clone())).collect();
    let updated = Composer::new(db, db, templates).update_links(user, &[], &additions)?;

    if updated.added.is_empty() {
        println!("No courses added");
    }
    for link in &updated.added {
        println!("Added {}", format_link_line(link));
    }

    send_notifications(mailer, &updated.messages)
}

pub fn remove(base: &Path, user: &str, links: &[i64]) -> Result<()> {
    let ctx = open_context(base)?;
    remove_impl(&ctx.db, &ctx.config.mail.templates, user, links)
}

pub(crate) fn remove_impl(
    db: &Database,
    templates: &Templates,
    user: &str,
    links: &[i64],
) -> Result<()> {
    let updated = Composer::new(db, db, templates).update_links(user, links, &[])?;

    for link in &updated.retired {
        println!("Removed {}", format_link_line(link));
    }
    let skipped = unchanged_count(links, &updated.retired);
    if skipped > 0 {
        println!("{} link(s) were not enabled and were left unchanged", skipped);
    }
    Ok(())
}

/// Distinct requested ids that were not retired.
fn unchanged_count(requested: &[i64], retired: &[CourseLink]) -> usize {
    let retired: HashSet<i64> = retired.iter().map(|l| l.id).collect();
    requested
        .iter()
        .collect::<HashSet<_>>()
        .into_iter()
        .filter(|id| !retired.contains(*id))
        .count()
}

#[cfg(test)]
#[path = "update_tests.rs"]
mod tests;
