// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

mod common;
use common::*;

#[test]
fn creates_work_dir() {
    let temp = TempDir::new().unwrap();

    metalink()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized metalink"))
        .stdout(predicate::str::contains("ucmail.uc.edu"));

    assert!(temp.path().join(".metalink/config.toml").exists());
    assert!(temp.path().join(".metalink/meta.db").exists());
}

#[test]
fn fails_if_already_initialized() {
    let temp = TempDir::new().unwrap();
    metalink()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .success();

    metalink()
        .arg("init")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn directory_flag_targets_another_path() {
    let temp = TempDir::new().unwrap();
    let project = temp.path().join("project");
    std::fs::create_dir_all(&project).unwrap();

    metalink()
        .arg("-C")
        .arg(&project)
        .arg("init")
        .assert()
        .success();

    assert!(project.join(".metalink/config.toml").exists());
}

#[test]
fn commands_fail_outside_a_project() {
    let temp = TempDir::new().unwrap();

    metalink_as("alice")
        .arg("list")
        .current_dir(temp.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("metalink init"));
}

#[test]
fn catalog_lists_the_users_courses() {
    let temp = init_temp();

    metalink_as("alice")
        .args(["catalog", "list"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("23F100"))
        .stdout(predicate::str::contains("23S101"))
        .stdout(predicate::str::contains("23F200").not());

    metalink()
        .args(["catalog", "list", "-i", "bob"])
        .current_dir(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("23F200"));
}
