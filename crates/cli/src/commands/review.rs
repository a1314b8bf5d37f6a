// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ml_core::{Composer, Database, Mailer, Templates};

use crate::display::format_link_line;
use crate::error::Result;

use super::{open_context, send_notifications};

pub fn run(base: &Path, user: &str, decisions: &[(i64, String)]) -> Result<()> {
    let ctx = open_context(base)?;
    run_impl(&ctx.db, &ctx.config.mail.templates, &ctx.mailer(), user, decisions)
}

pub(crate) fn run_impl(
    db: &Database,
    templates: &Templates,
    mailer: &dyn Mailer,
    user: &str,
    decisions: &[(i64, String)],
) -> Result<()> {
    let reviewed = Composer::new(db, db, templates).review_requests(user, decisions)?;

    for link in &reviewed.links {
        println!("{}", format_link_line(link));
    }

    send_notifications(mailer, &reviewed.messages)
}

#[cfg(test)]
#[path = "review_tests.rs"]
mod tests;
