// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! SQLite-backed store for meta courses, course links and the catalog.
//!
//! The [`Database`] struct provides all data access operations. Workflows
//! group their writes with [`Database::transaction`].

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::Path;

use crate::catalog::OwnerLookup;
use crate::course::MetaCourse;
use crate::error::{Error, Result};
use crate::link::{CourseLink, LinkStatus};

/// SQL schema for the meta course database.
pub const SCHEMA: &str = r#"
-- Meta courses; meta_course_id is derived from instructor and pk
CREATE TABLE IF NOT EXISTS meta_courses (
    pk INTEGER PRIMARY KEY AUTOINCREMENT,
    meta_course_id TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    instructor TEXT NOT NULL,
    created_at TEXT NOT NULL
);

-- Child course links; status is 0 enabled, 1 pending, 2 disabled
CREATE TABLE IF NOT EXISTS course_links (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    meta_course_pk INTEGER NOT NULL,
    child_course TEXT NOT NULL,
    requestor TEXT NOT NULL,
    owner TEXT NOT NULL,
    status INTEGER NOT NULL DEFAULT 1,
    version INTEGER NOT NULL DEFAULT 0,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    FOREIGN KEY (meta_course_pk) REFERENCES meta_courses(pk),
    CHECK (status IN (0, 1, 2))
);

-- Course catalog (registrar feed)
CREATE TABLE IF NOT EXISTS instructor_courses (
    course_id TEXT NOT NULL,
    instructor TEXT NOT NULL,
    PRIMARY KEY (course_id, instructor)
);

-- Indexes
CREATE INDEX IF NOT EXISTS idx_meta_instructor ON meta_courses(instructor);
CREATE INDEX IF NOT EXISTS idx_links_meta ON course_links(meta_course_pk);
CREATE INDEX IF NOT EXISTS idx_links_requestor ON course_links(requestor, status);
CREATE INDEX IF NOT EXISTS idx_links_owner ON course_links(owner, status);
CREATE INDEX IF NOT EXISTS idx_catalog_instructor ON instructor_courses(instructor);
"#;

const LINK_COLUMNS: &str = "id, meta_course_pk, child_course, requestor, owner, status, version,
                            created_at, updated_at";

const META_COLUMNS: &str = "pk, meta_course_id, name, instructor, created_at";

/// Parse an RFC3339 timestamp from the database.
fn parse_timestamp(
    value: &str,
    column: &str,
) -> std::result::Result<DateTime<Utc>, rusqlite::Error> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(Error::CorruptedData(format!(
                    "invalid timestamp '{value}' in column '{column}'"
                ))),
            )
        })
}

/// Parse a link status code from the database.
fn parse_status(code: i64) -> std::result::Result<LinkStatus, rusqlite::Error> {
    LinkStatus::from_code(code).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Integer,
            Box::new(Error::CorruptedData(format!(
                "invalid value '{code}' in column 'status'"
            ))),
        )
    })
}

fn row_to_link(row: &Row<'_>) -> std::result::Result<CourseLink, rusqlite::Error> {
    let created_str: String = row.get(7)?;
    let updated_str: String = row.get(8)?;
    Ok(CourseLink {
        id: row.get(0)?,
        meta_course_pk: row.get(1)?,
        child_course: row.get(2)?,
        requestor: row.get(3)?,
        owner: row.get(4)?,
        status: parse_status(row.get(5)?)?,
        version: row.get(6)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
        updated_at: parse_timestamp(&updated_str, "updated_at")?,
    })
}

fn row_to_meta(row: &Row<'_>) -> std::result::Result<MetaCourse, rusqlite::Error> {
    let created_str: String = row.get(4)?;
    Ok(MetaCourse {
        pk: row.get(0)?,
        meta_course_id: row.get(1)?,
        name: row.get(2)?,
        instructor: row.get(3)?,
        created_at: parse_timestamp(&created_str, "created_at")?,
    })
}

/// Run schema creation and all migrations on a database connection.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)?;
    migrate_add_link_version(conn)?;
    Ok(())
}

/// Migration: Add the optimistic-concurrency version column to course links.
fn migrate_add_link_version(conn: &Connection) -> Result<()> {
    let has_version: bool = conn
        .query_row(
            "SELECT COUNT(*) > 0 FROM pragma_table_info('course_links') WHERE name = 'version'",
            [],
            |row| row.get(0),
        )
        .unwrap_or(false);

    if !has_version {
        conn.execute(
            "ALTER TABLE course_links ADD COLUMN version INTEGER NOT NULL DEFAULT 0",
            [],
        )?;
    }
    Ok(())
}

/// SQLite database connection with meta course operations.
pub struct Database {
    /// The underlying SQLite connection.
    pub conn: Connection,
}

impl Database {
    /// Open a database connection at the given path, creating and migrating if needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open(path)?;
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA busy_timeout = 5000;",
        )?;

        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        let db = Database { conn };
        run_migrations(&db.conn)?;
        Ok(db)
    }

    /// Runs `f` inside one transaction, committing only if it succeeds.
    ///
    /// Statements issued through `self` inside `f` belong to the
    /// transaction; an error (or panic) rolls all of them back.
    pub fn transaction<T>(&self, f: impl FnOnce(&Database) -> Result<T>) -> Result<T> {
        let tx = self.conn.unchecked_transaction()?;
        let value = f(self)?;
        tx.commit()?;
        Ok(value)
    }

    // ── Meta courses ────────────────────────────────────────────────────────

    /// Insert a meta course, returning its sequence number.
    pub fn create_meta_course(&self, meta: &MetaCourse) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO meta_courses (meta_course_id, name, instructor, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                meta.meta_course_id,
                meta.name,
                meta.instructor,
                meta.created_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Persist a meta course's identifier and name.
    pub fn update_meta_course(&self, meta: &MetaCourse) -> Result<()> {
        let affected = self.conn.execute(
            "UPDATE meta_courses SET meta_course_id = ?1, name = ?2 WHERE pk = ?3",
            params![meta.meta_course_id, meta.name, meta.pk],
        )?;

        if affected == 0 {
            return Err(Error::MetaCourseNotFound(meta.pk.to_string()));
        }
        Ok(())
    }

    /// Get a meta course by sequence number.
    pub fn get_meta_course(&self, pk: i64) -> Result<MetaCourse> {
        let sql = format!("SELECT {META_COLUMNS} FROM meta_courses WHERE pk = ?1");
        let meta = self
            .conn
            .query_row(&sql, params![pk], row_to_meta)
            .optional()?;
        meta.ok_or_else(|| Error::MetaCourseNotFound(pk.to_string()))
    }

    /// List the meta courses owned by an instructor, oldest first.
    pub fn meta_courses_of(&self, instructor: &str) -> Result<Vec<MetaCourse>> {
        let sql = format!(
            "SELECT {META_COLUMNS} FROM meta_courses WHERE instructor = ?1 ORDER BY pk"
        );
        let mut stmt = self.conn.prepare(&sql)?;
        let metas = stmt
            .query_map(params![instructor], row_to_meta)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(metas)
    }

    // ── Course links ────────────────────────────────────────────────────────

    /// Insert a course link, returning its identifier.
    pub fn create_link(&self, link: &CourseLink) -> Result<i64> {
        self.conn.execute(
            "INSERT INTO course_links (meta_course_pk, child_course, requestor, owner, status,
             version, created_at, updated_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                link.meta_course_pk,
                link.child_course,
                link.requestor,
                link.owner,
                link.status.code(),
                link.version,
                link.created_at.to_rfc3339(),
                link.updated_at.to_rfc3339(),
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Get a course link by ID.
    pub fn get_link(&self, id: i64) -> Result<CourseLink> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM course_links WHERE id = ?1");
        let link = self
            .conn
            .query_row(&sql, params![id], row_to_link)
            .optional()?;
        link.ok_or(Error::LinkNotFound(id))
    }

    /// Write a link's status if nobody changed it since it was read.
    ///
    /// The update only applies while the stored version still equals
    /// `link.version`; on success the new version is returned.
    pub fn update_link_status(&self, link: &CourseLink) -> Result<i64> {
        let affected = self.conn.execute(
            "UPDATE course_links SET status = ?1, updated_at = ?2, version = version + 1
             WHERE id = ?3 AND version = ?4",
            params![
                link.status.code(),
                link.updated_at.to_rfc3339(),
                link.id,
                link.version,
            ],
        )?;

        if affected == 0 {
            // Distinguish a missing row from a concurrent update.
            self.get_link(link.id)?;
            return Err(Error::StaleLink(link.id));
        }
        Ok(link.version + 1)
    }

    /// List the links of one meta course.
    pub fn links_of(&self, meta_course_pk: i64) -> Result<Vec<CourseLink>> {
        self.query_links("meta_course_pk = ?1", params![meta_course_pk])
    }

    /// List links proposed by `requestor` with the given status.
    pub fn links_by_requestor(&self, requestor: &str, status: LinkStatus) -> Result<Vec<CourseLink>> {
        self.query_links(
            "requestor = ?1 AND status = ?2",
            params![requestor, status.code()],
        )
    }

    /// List links to courses owned by `owner` with the given status.
    pub fn links_by_owner(&self, owner: &str, status: LinkStatus) -> Result<Vec<CourseLink>> {
        self.query_links("owner = ?1 AND status = ?2", params![owner, status.code()])
    }

    fn query_links(&self, filter: &str, params: &[&dyn rusqlite::ToSql]) -> Result<Vec<CourseLink>> {
        let sql = format!("SELECT {LINK_COLUMNS} FROM course_links WHERE {filter} ORDER BY id");
        let mut stmt = self.conn.prepare(&sql)?;
        let links = stmt
            .query_map(params, row_to_link)?
            .collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(links)
    }

    // ── Catalog ─────────────────────────────────────────────────────────────

    /// Record that `instructor` teaches `course_id`.
    pub fn add_catalog_course(&self, course_id: &str, instructor: &str) -> Result<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO instructor_courses (course_id, instructor) VALUES (?1, ?2)",
            params![course_id, instructor],
        )?;
        Ok(())
    }

    /// List the course ids an instructor teaches, sorted.
    pub fn courses_taught_by(&self, instructor: &str) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT course_id FROM instructor_courses WHERE instructor = ?1 ORDER BY course_id",
        )?;
        let courses = stmt
            .query_map(params![instructor], |row| row.get(0))?
            .collect::<std::result::Result<Vec<String>, _>>()?;
        Ok(courses)
    }
}

impl OwnerLookup for Database {
    /// Co-taught courses resolve to the alphabetically first instructor.
    fn lookup_owner(&self, course_id: &str) -> Result<Option<String>> {
        let owner = self
            .conn
            .query_row(
                "SELECT instructor FROM instructor_courses WHERE course_id = ?1
                 ORDER BY instructor LIMIT 1",
                params![course_id],
                |row| row.get(0),
            )
            .optional()?;
        Ok(owner)
    }

    fn is_taught_by(&self, course_id: &str, instructor: &str) -> Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM instructor_courses WHERE course_id = ?1 AND instructor = ?2",
            params![course_id, instructor],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }
}

#[cfg(test)]
#[path = "db_tests.rs"]
mod tests;
