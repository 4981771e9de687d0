//! Build pipeline integration tests.
//!
//! The dependency installer is stubbed with `true`/`false` through the
//! settings file, so these tests only run on Unix.

use predicates::prelude::*;

mod common;

use common::{PluginProject, zip_entries};

#[test]
fn build_produces_a_zip_named_after_plugin_and_version() {
  if cfg!(windows) {
    return;
  }

  let project = PluginProject::sample();
  project.stub_installer("");

  project
    .wppack_cmd()
    .arg("build")
    .assert()
    .success()
    .stdout(predicate::str::contains("sample"))
    .stdout(predicate::str::contains("2.4.0"));

  assert!(project.dist_path().join("sample-2.4.0.zip").is_file());
}

#[test]
fn archive_is_rooted_at_the_plugin_name_and_excludes_ignored_paths() {
  if cfg!(windows) {
    return;
  }

  let project = PluginProject::sample();
  project.stub_installer("");

  project.wppack_cmd().arg("build").assert().success();

  let entries = zip_entries(&project.dist_path().join("sample-2.4.0.zip"));
  assert!(entries.iter().all(|e| e.starts_with("sample/")));
  assert!(entries.contains(&"sample/sample.php".to_string()));
  assert!(entries.contains(&"sample/src/Loader.php".to_string()));
  assert!(entries.contains(&"sample/readme.txt".to_string()));

  // Scenario D: nothing under tests/, and no manifest or VCS clutter.
  assert!(!entries.iter().any(|e| e.starts_with("sample/tests")));
  assert!(!entries.iter().any(|e| e.contains("composer.json")));
  assert!(!entries.iter().any(|e| e.contains(".gitignore")));
  assert!(!entries.iter().any(|e| e.contains("builder.env")));
}

#[test]
fn build_removes_the_staged_tree() {
  if cfg!(windows) {
    return;
  }

  let project = PluginProject::sample();
  project.stub_installer("");

  project.wppack_cmd().arg("build").assert().success();

  assert!(!project.dist_path().join("sample").exists());
}

#[test]
fn build_unpacked_keeps_the_staged_tree_and_writes_no_zip() {
  if cfg!(windows) {
    return;
  }

  let project = PluginProject::sample();
  project.stub_installer("");

  project.wppack_cmd().arg("build:unpacked").assert().success();

  let staged = project.dist_path().join("sample");
  assert!(staged.join("sample.php").is_file());
  assert!(!staged.join("tests").exists());
  assert!(!project.dist_path().join("sample-2.4.0.zip").exists());
}

#[test]
fn custom_destination_relocates_the_archive() {
  if cfg!(windows) {
    return;
  }

  let project = PluginProject::sample();
  project.stub_installer("destination: out/packages\n");

  project.wppack_cmd().arg("build").assert().success();

  assert!(project.path().join("out/packages/sample-2.4.0.zip").is_file());
  assert!(!project.dist_path().exists());
}

#[test]
fn custom_ignore_entries_are_pruned() {
  if cfg!(windows) {
    return;
  }

  let project = PluginProject::sample();
  project.write_file("notes.txt", "internal\n");
  project.stub_installer("ignore:\n  - notes.txt\n");

  project.wppack_cmd().arg("build").assert().success();

  let entries = zip_entries(&project.dist_path().join("sample-2.4.0.zip"));
  assert!(!entries.iter().any(|e| e.contains("notes.txt")));
}

#[test]
fn failing_installer_aborts_the_build_with_its_output() {
  if cfg!(windows) {
    return;
  }

  let project = PluginProject::sample();
  project.write_file("builder.env", "composer_path: \"false\"\n");

  project
    .wppack_cmd()
    .arg("build")
    .assert()
    .failure()
    .stderr(predicate::str::contains("dependency installer exited"));

  assert!(!project.dist_path().join("sample-2.4.0.zip").exists());
}

#[test]
fn stale_staged_tree_is_cleaned_before_rebuilding() {
  if cfg!(windows) {
    return;
  }

  let project = PluginProject::sample();
  project.stub_installer("");
  // Leftover from an interrupted earlier run.
  project.write_file("dist/sample/stale.php", "<?php\n");

  project.wppack_cmd().arg("build").assert().success();

  let entries = zip_entries(&project.dist_path().join("sample-2.4.0.zip"));
  assert!(!entries.iter().any(|e| e.contains("stale.php")));
}
