// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ml_core::{status_overview, Database, StatusOverview};

use crate::cli::OutputFormat;
use crate::display::{format_incoming_line, format_link_line};
use crate::error::Result;

use super::open_context;

pub fn run(base: &Path, user: &str, output: OutputFormat) -> Result<()> {
    let ctx = open_context(base)?;
    run_impl(&ctx.db, user, output)
}

pub(crate) fn run_impl(db: &Database, user: &str, output: OutputFormat) -> Result<()> {
    let overview = status_overview(db, user)?;

    if output == OutputFormat::Json {
        println!("{}", serde_json::to_string_pretty(&overview)?);
        return Ok(());
    }

    for line in render_text(&overview) {
        println!("{}", line);
    }
    Ok(())
}

/// Text lines for an overview: incoming requests first, then outgoing
/// ones grouped by meta course.
pub(crate) fn render_text(overview: &StatusOverview) -> Vec<String> {
    if overview.incoming.is_empty() && overview.outgoing.is_empty() {
        return vec!["No pending requests".to_string()];
    }

    let mut lines = Vec::new();
    if !overview.incoming.is_empty() {
        lines.push("Awaiting your decision:".to_string());
        for request in &overview.incoming {
            lines.push(format!("  {}", format_incoming_line(request)));
        }
    }
    if !overview.outgoing.is_empty() {
        lines.push("Waiting on others:".to_string());
        for group in &overview.outgoing {
            lines.push(format!("  {}", group.meta_name));
            for link in &group.links {
                lines.push(format!("    {}", format_link_line(link)));
            }
        }
    }
    lines
}

#[cfg(test)]
#[path = "requests_tests.rs"]
mod tests;
