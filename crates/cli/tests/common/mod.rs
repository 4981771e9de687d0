//! Shared test helpers for CLI integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

/// A throwaway plugin project directory.
///
/// Mimics the layout the builder expects: `composer.json`, a main plugin
/// file with a `Version:` header, a readme with a stable tag, and some
/// development clutter that must not end up in packages.
pub struct PluginProject {
  pub temp: TempDir,
}

impl PluginProject {
  /// Plugin `acme/sample` at version 2.4.0.
  pub fn sample() -> Self {
    let project = Self {
      temp: TempDir::new().unwrap(),
    };

    project.write_file("composer.json", r#"{"name": "acme/sample"}"#);
    project.write_file(
      "sample.php",
      concat!(
        "<?php\n",
        "/**\n",
        " * Plugin Name: Sample\n",
        " * Version: 2.4.0\n",
        " */\n",
        "define('SAMPLE_VERSION', '2.4.0');\n",
      ),
    );
    project.write_file("readme.txt", "=== Sample ===\nStable tag: 2.4.0\n");
    project.write_file("src/Loader.php", "<?php\nclass Loader {}\n");
    project.write_file("tests/unit/SampleTest.php", "<?php\n");
    project.write_file(".gitignore", "vendor/\n");

    project
  }

  pub fn path(&self) -> &Path {
    self.temp.path()
  }

  /// Write a file relative to the project root.
  pub fn write_file(&self, relative_path: &str, content: &str) {
    let path = self.temp.path().join(relative_path);
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(&path, content).unwrap();
  }

  pub fn read_file(&self, relative_path: &str) -> String {
    std::fs::read_to_string(self.temp.path().join(relative_path)).unwrap()
  }

  /// Write `builder.env` pointing the installer at a no-op command, plus
  /// any extra settings lines.
  pub fn stub_installer(&self, extra_settings: &str) {
    self.write_file("builder.env", &format!("composer_path: \"true\"\n{}", extra_settings));
  }

  /// Get a Command for the wppack binary, running inside the project.
  pub fn wppack_cmd(&self) -> Command {
    let mut cmd: Command = cargo_bin_cmd!("wppack");
    cmd.current_dir(self.temp.path());
    cmd
  }

  pub fn dist_path(&self) -> PathBuf {
    self.temp.path().join("dist")
  }
}

/// Entry names of a ZIP archive, in archive order.
pub fn zip_entries(zip_path: &Path) -> Vec<String> {
  let file = std::fs::File::open(zip_path).unwrap();
  let mut archive = zip::ZipArchive::new(file).unwrap();
  (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_string()).collect()
}
