//! Plugin identity resolution.
//!
//! A plugin is identified by three values derived from its source tree:
//! the canonical name (from the `name` field of `composer.json`, last
//! `/`-separated segment for namespaced packages), the main plugin file
//! (`<name>.php` unless overridden), and the current version (the `Version:`
//! field of the main file's header comment block).
//!
//! Resolution is read-only and happens once per invocation; the resulting
//! [`ProjectIdentity`] is immutable afterward.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::{Regex, RegexBuilder};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Composer manifest file name, expected at the project root.
pub const COMPOSER_FILE: &str = "composer.json";

/// `Version:` header field, case-insensitive, value limited to the
/// characters a WordPress version header may carry.
static VERSION_FIELD: LazyLock<Regex> = LazyLock::new(|| {
  RegexBuilder::new(r"Version:\s*([0-9a-z.\-]*)")
    .case_insensitive(true)
    .build()
    .unwrap()
});

/// Recognized version grammar: `MAJOR.MINOR.PATCH` with an optional
/// `-` pre-release suffix of label/number segments.
static VERSION_GRAMMAR: LazyLock<Regex> = LazyLock::new(|| {
  RegexBuilder::new(r"^[0-9]+\.[0-9]+\.[0-9]+(-[0-9a-z.\-]+)?$")
    .case_insensitive(true)
    .build()
    .unwrap()
});

/// Errors raised while resolving a plugin's identity.
#[derive(Debug, Error)]
pub enum IdentityError {
  #[error("composer.json not found in {0}")]
  ManifestNotFound(PathBuf),

  #[error("failed to read {path}: {source}")]
  ManifestUnreadable {
    path: PathBuf,
    source: io::Error,
  },

  #[error("malformed composer.json: {0}")]
  ManifestParse(#[from] serde_json::Error),

  #[error("composer.json has no 'name' field")]
  NameMissing,

  #[error("plugin main file not found: {0}")]
  MainFileMissing(PathBuf),

  #[error("no 'Version:' field found in {0}")]
  VersionFieldMissing(PathBuf),

  #[error("unrecognized version string '{0}'")]
  VersionInvalid(String),
}

/// The subset of `composer.json` this tool consumes.
#[derive(Debug, Deserialize)]
struct ComposerManifest {
  name: Option<String>,
}

/// Immutable plugin identity, resolved once per invocation.
#[derive(Debug, Clone)]
pub struct ProjectIdentity {
  /// Canonical plugin name, e.g. `sample` for package `acme/sample`.
  pub name: String,
  /// Absolute path to the main plugin file.
  pub main_file: PathBuf,
  /// Version currently declared in the main file.
  pub version: String,
}

impl ProjectIdentity {
  /// Resolve the identity of the plugin rooted at `project_path`.
  ///
  /// `main_file_override` replaces the default `<name>.php` main file name
  /// when a project keeps its plugin header elsewhere.
  pub fn resolve(project_path: &Path, main_file_override: Option<&str>) -> Result<Self, IdentityError> {
    let name = resolve_name(project_path)?;

    let main_file = match main_file_override {
      Some(file) => project_path.join(file),
      None => project_path.join(format!("{}.php", name)),
    };

    let version = read_version(&main_file)?;
    if !VERSION_GRAMMAR.is_match(&version) {
      return Err(IdentityError::VersionInvalid(version));
    }

    debug!(name = %name, version = %version, "resolved plugin identity");

    Ok(Self { name, main_file, version })
  }
}

/// Whether a version string matches the recognized grammar.
pub fn is_valid_version(version: &str) -> bool {
  VERSION_GRAMMAR.is_match(version)
}

/// Canonical plugin name from the composer manifest.
///
/// Namespaced package identifiers (`vendor/plugin-x`) resolve to the segment
/// after the last `/`; unnamespaced identifiers are used as-is.
pub fn resolve_name(project_path: &Path) -> Result<String, IdentityError> {
  let manifest_path = project_path.join(COMPOSER_FILE);

  let content = match fs::read_to_string(&manifest_path) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(IdentityError::ManifestNotFound(project_path.to_path_buf()));
    }
    Err(e) => {
      return Err(IdentityError::ManifestUnreadable {
        path: manifest_path,
        source: e,
      });
    }
  };

  let manifest: ComposerManifest = serde_json::from_str(content.trim())?;
  let package_name = manifest.name.ok_or(IdentityError::NameMissing)?;

  let name = match package_name.rsplit('/').next() {
    Some(segment) if !segment.is_empty() => segment.to_string(),
    _ => package_name,
  };

  Ok(name)
}

/// Current version declared in a plugin file's `Version:` header field.
pub fn read_version(plugin_file: &Path) -> Result<String, IdentityError> {
  let content = match fs::read_to_string(plugin_file) {
    Ok(content) => content,
    Err(e) if e.kind() == io::ErrorKind::NotFound => {
      return Err(IdentityError::MainFileMissing(plugin_file.to_path_buf()));
    }
    Err(e) => {
      return Err(IdentityError::ManifestUnreadable {
        path: plugin_file.to_path_buf(),
        source: e,
      });
    }
  };

  let version = VERSION_FIELD
    .captures(content.trim())
    .map(|c| c[1].to_string())
    .filter(|v| !v.is_empty())
    .ok_or_else(|| IdentityError::VersionFieldMissing(plugin_file.to_path_buf()))?;

  Ok(version)
}
