// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use serde::Serialize;

use ml_core::{CourseLink, Database, MetaCourse};

use crate::cli::OutputFormat;
use crate::display::{format_link_line, format_meta_line};
use crate::error::Result;

use super::open_context;

/// JSON representation of one meta course with its links.
#[derive(Serialize)]
pub(crate) struct MetaCourseJson {
    #[serde(flatten)]
    pub meta: MetaCourse,
    pub links: Vec<CourseLink>,
}

/// JSON output structure for the list command.
#[derive(Serialize)]
pub(crate) struct ListOutputJson {
    pub meta_courses: Vec<MetaCourseJson>,
}

pub fn run(base: &Path, user: &str, output: OutputFormat) -> Result<()> {
    let ctx = open_context(base)?;
    run_impl(&ctx.db, user, output)
}

pub(crate) fn run_impl(db: &Database, user: &str, output: OutputFormat) -> Result<()> {
    let listing = collect(db, user)?;

    match output {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&listing)?);
        }
        OutputFormat::Text => {
            if listing.meta_courses.is_empty() {
                println!("No meta courses");
            }
            for entry in &listing.meta_courses {
                println!("{}", format_meta_line(&entry.meta));
                for link in &entry.links {
                    println!("  {}", format_link_line(link));
                }
            }
        }
    }
    Ok(())
}

/// Gathers `user`'s meta courses, oldest first, each with its links.
pub(crate) fn collect(db: &Database, user: &str) -> Result<ListOutputJson> {
    let mut meta_courses = Vec::new();
    for meta in db.meta_courses_of(user)? {
        let links = db.links_of(meta.pk)?;
        meta_courses.push(MetaCourseJson { meta, links });
    }
    Ok(ListOutputJson { meta_courses })
}

#[cfg(test)]
#[path = "list_tests.rs"]
mod tests;
