// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ml_core::{Composer, CreateRequest, Database, Mailer, Templates};

use crate::display::{format_link_line, format_meta_line};
use crate::error::Result;

use super::{open_context, send_notifications};

pub fn run(base: &Path, user: &str, request: CreateRequest) -> Result<()> {
    let ctx = open_context(base)?;
    run_impl(&ctx.db, &ctx.config.mail.templates, &ctx.mailer(), user, &request)
}

pub(crate) fn run_impl(
    db: &Database,
    templates: &Templates,
    mailer: &dyn Mailer,
    user: &str,
    request: &CreateRequest,
) -> Result<()> {
    let composed = Composer::new(db, db, templates).create_meta_course(user, request)?;

    println!("Created {}", format_meta_line(&composed.meta));
    if composed.links.is_empty() {
        println!("  no courses linked");
    }
    for link in &composed.links {
        println!("  {}", format_link_line(link));
    }

    send_notifications(mailer, &composed.messages)
}

#[cfg(test)]
#[path = "create_tests.rs"]
mod tests;
