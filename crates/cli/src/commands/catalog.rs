// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use std::path::Path;

use ml_core::Database;

use crate::error::Result;

use super::open_context;

pub fn add(base: &Path, course: &str, instructor: &str) -> Result<()> {
    let ctx = open_context(base)?;
    add_impl(&ctx.db, course, instructor)
}

pub(crate) fn add_impl(db: &Database, course: &str, instructor: &str) -> Result<()> {
    db.add_catalog_course(course.trim(), instructor.trim())?;
    println!("{} teaches {}", instructor.trim(), course.trim());
    Ok(())
}

pub fn list(base: &Path, instructor: &str) -> Result<()> {
    let ctx = open_context(base)?;
    list_impl(&ctx.db, instructor)
}

pub(crate) fn list_impl(db: &Database, instructor: &str) -> Result<()> {
    let courses = db.courses_taught_by(instructor)?;
    if courses.is_empty() {
        println!("No courses for {}", instructor);
        return Ok(());
    }
    for course in courses {
        println!("{}", course);
    }
    Ok(())
}

#[cfg(test)]
#[path = "catalog_tests.rs"]
mod tests;
