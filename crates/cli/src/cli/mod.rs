// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

use clap::{Parser, Subcommand, ValueEnum};

/// Parse a string that must not be empty or whitespace-only.
fn non_empty_string(s: &str) -> Result<String, String> {
    if s.trim().is_empty() {
        Err("cannot be empty".to_string())
    } else {
        Ok(s.to_string())
    }
}

/// Parse a `<link>=<decision>` pair. The decision may be empty.
pub fn parse_decision_arg(s: &str) -> Result<(i64, String), String> {
    let (id, decision) = s
        .split_once('=')
        .ok_or_else(|| format!("expected <link>=<decision>, got '{s}'"))?;
    let id = id
        .trim()
        .parse::<i64>()
        .map_err(|_| format!("invalid link id '{}'", id.trim()))?;
    Ok((id, decision.to_string()))
}

/// Output format for commands supporting structured output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

#[derive(Parser)]
#[command(name = "metalink")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Compose meta courses from your own and other instructors' course sections")]
pub struct Cli {
    /// Run as if metalink was started in <path>
    #[arg(short = 'C', long = "directory", global = true, value_name = "path")]
    pub directory: Option<String>,

    /// Acting instructor
    #[arg(short, long, global = true, env = "METALINK_USER", value_name = "name")]
    pub user: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Initialize a metalink project in the current directory
    Init {
        /// Institutional mail domain appended to user names
        #[arg(long)]
        domain: Option<String>,

        /// From address for notifications
        #[arg(long)]
        sender: Option<String>,
    },

    /// Manage the course catalog
    #[command(subcommand)]
    Catalog(CatalogCommand),

    /// Create a meta course
    #[command(after_help = "\
Examples:
  metalink create Algebra -s A --course 23F100 --foreign 23F200
      Link your own 23F100 and ask the owner of 23F200 for approval")]
    Create {
        /// Base name of the meta course
        #[arg(value_parser = non_empty_string)]
        name: String,

        /// Section label, shown in parentheses after the name
        #[arg(short, long, value_parser = non_empty_string)]
        section: String,

        /// A course you teach (repeatable)
        #[arg(short, long = "course", value_name = "id")]
        courses: Vec<String>,

        /// A course taught by someone else (repeatable)
        #[arg(short, long = "foreign", value_name = "id")]
        foreign: Vec<String>,
    },

    /// List your meta courses and their links
    List {
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Show pending requests, incoming and outgoing
    Requests {
        #[arg(short, long, value_enum, default_value_t)]
        output: OutputFormat,
    },

    /// Approve or deny requests for your courses
    #[command(after_help = "\
Decisions: approve, deny, or empty to leave the request pending.

Examples:
  metalink review 3=approve 4=deny 5=")]
    Review {
        /// <link>=<decision> pairs
        #[arg(required = true, value_parser = parse_decision_arg, value_name = "link=decision")]
        decisions: Vec<(i64, String)>,
    },

    /// Add courses to one of your meta courses
    Add {
        /// Meta course number (see `metalink list`)
        meta: i64,

        /// Course ids to link
        #[arg(required = true)]
        courses: Vec<String>,
    },

    /// Remove enabled links from your meta courses
    Remove {
        /// Link ids
        #[arg(required = true)]
        links: Vec<i64>,
    },
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// Record that an instructor teaches a course
    Add {
        #[arg(value_parser = non_empty_string)]
        course: String,
        #[arg(value_parser = non_empty_string)]
        instructor: String,
    },

    /// List courses taught by an instructor (default: you)
    List {
        #[arg(short, long)]
        instructor: Option<String>,
    },
}

#[cfg(test)]
#[path = "mod_tests.rs"]
mod tests;
