// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

// Allow unused items: test helpers are shared across multiple test binaries,
// and not every test file uses every helper.
#![allow(dead_code)]
#![allow(unused_imports)]

use assert_cmd::cargo::cargo_bin_cmd;
use assert_cmd::Command;

pub use predicates::prelude::*;
pub use tempfile::TempDir;

/// The binary with no acting user inherited from the environment.
pub fn metalink() -> Command {
    let mut cmd = cargo_bin_cmd!("metalink");
    cmd.env_remove("METALINK_USER").env("RUST_LOG", "off");
    cmd
}

/// The binary acting as `user`.
pub fn metalink_as(user: &str) -> Command {
    let mut cmd = metalink();
    cmd.env("METALINK_USER", user);
    cmd
}

/// Helper to create an initialized temp directory with a small catalog.
///
/// alice teaches 23F100 and 23S101, bob teaches 23F200 and 23F201,
/// carol teaches 24S300.
pub fn init_temp() -> TempDir {
    let temp = TempDir::new().unwrap();
    metalink()
        .args(["init", "--domain", "example.edu"])
        .current_dir(temp.path())
        .assert()
        .success();
    for (course, instructor) in [
        ("23F100", "alice"),
        ("23S101", "alice"),
        ("23F200", "bob"),
        ("23F201", "bob"),
        ("24S300", "carol"),
    ] {
        metalink()
            .args(["catalog", "add", course, instructor])
            .current_dir(temp.path())
            .assert()
            .success();
    }
    temp
}

/// Reads the spooled notifications as JSON values.
pub fn outbox(temp: &TempDir) -> Vec<serde_json::Value> {
    let path = temp.path().join(".metalink/outbox.jsonl");
    let Ok(content) = std::fs::read_to_string(path) else {
        return Vec::new();
    };
    content
        .lines()
        .filter(|l| !l.trim().is_empty())
        .map(|l| serde_json::from_str(l).unwrap())
        .collect()
}

/// Runs `list -o json` as `user`.
pub fn list_json(temp: &TempDir, user: &str) -> serde_json::Value {
    let output = metalink_as(user)
        .args(["list", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    assert!(output.status.success());
    serde_json::from_slice(&output.stdout).unwrap()
}

/// Link ids of `user`'s pending requests awaiting decision, in order.
pub fn incoming_ids(temp: &TempDir, user: &str) -> Vec<i64> {
    let output = metalink_as(user)
        .args(["requests", "-o", "json"])
        .current_dir(temp.path())
        .output()
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    value["incoming"]
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["link"]["id"].as_i64().unwrap())
        .collect()
}
