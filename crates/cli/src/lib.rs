// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! metalink - compose meta courses from the command line.
//!
//! This crate provides the `metalink` CLI on top of [`ml_core`]. A project
//! lives in a `.metalink/` directory holding the configuration, the SQLite
//! store and the notification outbox.
//!
//! # Main Components
//!
//! - [`Cli`] - command-line definition
//! - [`Config`] - project configuration (store path, mail settings)
//! - [`run`] - dispatches a parsed command
//!
//! ```rust,ignore
//! use clap::Parser;
//!
//! let cli = metalink::Cli::parse_from(["metalink", "-u", "alice", "list"]);
//! metalink::run(cli)?;
//! ```

mod cli;
mod commands;
mod display;
mod identity;

pub mod config;
pub mod error;

pub use cli::{CatalogCommand, Cli, Command, OutputFormat};
pub use config::{find_work_dir, get_db_path, get_outbox_path, init_work_dir, Config};
pub use error::{Error, Result};

use std::path::PathBuf;

use ml_core::CreateRequest;
use tracing::debug;

use identity::require_user;

/// Execute a parsed command line. This is the main entry point for library
/// users and provides a testable way to run commands without process
/// execution.
pub fn run(cli: Cli) -> Result<()> {
    let base = match cli.directory {
        Some(dir) => PathBuf::from(dir),
        None => std::env::current_dir()?,
    };
    let user = cli.user.as_deref();
    debug!(base = %base.display(), "running command");

    match cli.command {
        Command::Init { domain, sender } => commands::init::run(&base, domain, sender),
        Command::Catalog(CatalogCommand::Add { course, instructor }) => {
            commands::catalog::add(&base, &course, &instructor)
        }
        Command::Catalog(CatalogCommand::List { instructor }) => {
            let instructor = match instructor {
                Some(name) => name,
                None => require_user(user)?,
            };
            commands::catalog::list(&base, &instructor)
        }
        Command::Create {
            name,
            section,
            courses,
            foreign,
        } => {
            let user = require_user(user)?;
            let request = CreateRequest {
                base_name: name,
                section,
                own_courses: courses,
                foreign_courses: foreign,
            };
            commands::create::run(&base, &user, request)
        }
        Command::List { output } => commands::list::run(&base, &require_user(user)?, output),
        Command::Requests { output } => {
            commands::requests::run(&base, &require_user(user)?, output)
        }
        Command::Review { decisions } => {
            commands::review::run(&base, &require_user(user)?, &decisions)
        }
        Command::Add { meta, courses } => {
            commands::update::add(&base, &require_user(user)?, meta, &courses)
        }
        Command::Remove { links } => commands::update::remove(&base, &require_user(user)?, &links),
    }
}

#[cfg(test)]
#[path = "lib_tests.rs"]
mod tests;
