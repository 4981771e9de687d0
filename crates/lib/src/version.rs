//! Version rewriting across plugin files.
//!
//! A plugin's version is declared in several places with different syntaxes:
//! the `Version:` header of the main plugin file, the `Stable tag:` line of
//! `readme.txt`, the `dist.url` of `composer.json`, and `define('NAME', '...')`
//! statements in constant files. This module rewrites each of them in place
//! with single-pass regex substitutions over whole-file content, preserving
//! every byte outside the matched span.
//!
//! Rewrite policy is uniform: a mandatory field that cannot be found is a
//! hard error, while configured constant files that do not exist are skipped.
//! The readme's `Stable tag:` is only ever rewritten for stable versions; a
//! stable tag must never point at a pre-release build.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{NoExpand, Regex};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info};

use crate::project::{self, COMPOSER_FILE};

/// Readme file carrying the `Stable tag:` line.
pub const README_FILE: &str = "readme.txt";

static STABLE_VERSION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[0-9]+\.[0-9]+\.[0-9]+$").unwrap());

static STABLE_TAG_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^Stable tag: .*$").unwrap());

static VERSION_HEADER_LINE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?m)^\s*\*\s*Version:\s*.+$").unwrap());

/// Errors raised by version rewriting.
#[derive(Debug, Error)]
pub enum VersionError {
  #[error("invalid version string '{0}'")]
  Invalid(String),

  #[error("file not found: {0}")]
  FileMissing(PathBuf),

  #[error("no '{field}' line found in {path}")]
  FieldNotFound {
    field: &'static str,
    path: PathBuf,
  },

  #[error("failed to rewrite {path}: {source}")]
  Io {
    path: PathBuf,
    source: io::Error,
  },

  #[error(transparent)]
  Identity(#[from] crate::project::IdentityError),
}

/// True iff the version is a stable `MAJOR.MINOR.PATCH`, with no suffix.
pub fn is_stable(version: &str) -> bool {
  STABLE_VERSION.is_match(version)
}

/// Rewrite the `Version:` header line of the main plugin file.
///
/// The first ` * Version: ...` line is replaced; a plugin file without one
/// is malformed and rejected.
pub fn update_plugin_file(project_path: &Path, plugin_file: &str, new_version: &str) -> Result<(), VersionError> {
  let path = project_path.join(plugin_file);
  let replacement = format!(" * Version: {}", new_version);

  replace_required(&path, &VERSION_HEADER_LINE, &replacement, "Version:")?;
  info!(file = %path.display(), version = %new_version, "updated plugin header version");

  Ok(())
}

/// Rewrite the `Stable tag:` line of `readme.txt`.
///
/// Callers must only invoke this for stable versions; the tag itself is a
/// mandatory field of the readme.
pub fn update_stable_tag(project_path: &Path, new_version: &str) -> Result<(), VersionError> {
  let path = project_path.join(README_FILE);
  let replacement = format!("Stable tag: {}", new_version);

  replace_required(&path, &STABLE_TAG_LINE, &replacement, "Stable tag:")?;
  info!(file = %path.display(), version = %new_version, "updated readme stable tag");

  Ok(())
}

/// Subset of `composer.json` consulted for the dist URL rewrite.
#[derive(Debug, Deserialize)]
struct ComposerDist {
  dist: Option<DistSection>,
}

#[derive(Debug, Deserialize)]
struct DistSection {
  url: Option<String>,
}

/// Substitute the version inside the composer manifest's `dist.url`.
///
/// The old version is re-derived from the main plugin file, so this must run
/// before [`update_plugin_file`] overwrites it. A manifest without a
/// `dist.url` is left untouched.
pub fn update_dist_url(project_path: &Path, plugin_file: &str, new_version: &str) -> Result<(), VersionError> {
  let path = project_path.join(COMPOSER_FILE);
  let content = read(&path)?;

  let manifest: ComposerDist = match serde_json::from_str(content.trim()) {
    Ok(manifest) => manifest,
    // Dist URL substitution is best-effort; identity resolution owns
    // manifest validation.
    Err(_) => return Ok(()),
  };

  let Some(url) = manifest.dist.and_then(|d| d.url) else {
    return Ok(());
  };

  let old_version = project::read_version(&project_path.join(plugin_file))?;
  let updated_url = url.replace(&old_version, new_version);
  if updated_url == url {
    return Ok(());
  }

  let updated = content.replace(&url, &updated_url);
  write(&path, &updated)?;
  debug!(url = %updated_url, "updated composer dist url");

  Ok(())
}

/// Rewrite a `define('{constant}', '<version>');` statement in one file.
///
/// Files that do not exist are silently skipped: constant files are optional
/// per-project configuration. An existing file without the statement is left
/// unchanged.
pub fn update_constant(
  project_path: &Path,
  file_name: &str,
  constant_name: &str,
  new_version: &str,
) -> Result<(), VersionError> {
  let path = project_path.join(file_name);
  if !path.exists() {
    debug!(file = %path.display(), "constant file absent, skipping");
    return Ok(());
  }

  let pattern = format!(
    r"define\('{}', '[0-9]+\.[0-9]+\.[0-9]+[0-9a-zA-Z.\-]*'\);",
    regex::escape(constant_name)
  );
  // Constant names are identifiers; the escaped pattern always compiles.
  let statement = Regex::new(&pattern).unwrap();
  let replacement = format!("define('{}', '{}');", constant_name, new_version);

  let content = read(&path)?;
  match statement.replace(&content, NoExpand(&replacement)) {
    std::borrow::Cow::Borrowed(_) => Ok(()),
    std::borrow::Cow::Owned(updated) => {
      write(&path, &updated)?;
      info!(file = %path.display(), constant = %constant_name, "updated version constant");
      Ok(())
    }
  }
}

fn replace_required(path: &Path, pattern: &Regex, replacement: &str, field: &'static str) -> Result<(), VersionError> {
  let content = read(path)?;

  if !pattern.is_match(&content) {
    return Err(VersionError::FieldNotFound {
      field,
      path: path.to_path_buf(),
    });
  }

  let updated = pattern.replace(&content, NoExpand(replacement));
  write(path, &updated)
}

fn read(path: &Path) -> Result<String, VersionError> {
  match fs::read_to_string(path) {
    Ok(content) => Ok(content),
    Err(e) if e.kind() == io::ErrorKind::NotFound => Err(VersionError::FileMissing(path.to_path_buf())),
    Err(e) => Err(VersionError::Io {
      path: path.to_path_buf(),
      source: e,
    }),
  }
}

fn write(path: &Path, content: &str) -> Result<(), VersionError> {
  fs::write(path, content).map_err(|e| VersionError::Io {
    path: path.to_path_buf(),
    source: e,
  })
}
