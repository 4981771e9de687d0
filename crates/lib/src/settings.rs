//! Project settings file.
//!
//! Projects customize the builder through an optional `builder.env` file at
//! the project root. The file is YAML; the name is kept for compatibility
//! with existing plugin repositories. Every key is optional and maps to one
//! of the per-project overrides that used to require subclassing in older
//! builder generations.
//!
//! ```yaml
//! destination: ../packages
//! plugin_file: loader.php
//! composer_path: composer
//! version_constant: SAMPLE_PLUGIN_VERSION
//! version_constant_files:
//!   - defines.php
//!   - includes/constants.php
//! ignore:
//!   - docs
//!   - Makefile
//! ```

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Settings file name, expected at the project root.
pub const SETTINGS_FILE: &str = "builder.env";

/// Errors raised while loading the settings file.
#[derive(Debug, Error)]
pub enum SettingsError {
  #[error("failed to read {path}: {source}")]
  Read {
    path: PathBuf,
    source: io::Error,
  },

  #[error("malformed settings file {path}: {source}")]
  Parse {
    path: PathBuf,
    source: serde_yaml::Error,
  },
}

/// Per-project builder overrides.
///
/// Unknown keys are rejected so a typo surfaces as a configuration error
/// instead of silently ignored settings.
#[derive(Debug, Default, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Settings {
  /// Staging and output directory, absolute or relative to the project root.
  pub destination: Option<PathBuf>,

  /// Main plugin file name when it differs from `<plugin-name>.php`.
  pub plugin_file: Option<String>,

  /// Dependency installer executable (default `composer`).
  pub composer_path: Option<String>,

  /// Constant name whose `define('...', '...')` statement tracks the version.
  pub version_constant: Option<String>,

  /// Additional files carrying the version constant, relative to the root.
  #[serde(default)]
  pub version_constant_files: Vec<String>,

  /// Extra ignore entries appended to the built-in list.
  #[serde(default)]
  pub ignore: Vec<String>,
}

impl Settings {
  /// Load settings from `<project>/builder.env`.
  ///
  /// A missing file yields the defaults; an unreadable or malformed file is
  /// an error.
  pub fn load(project_path: &Path) -> Result<Self, SettingsError> {
    let path = project_path.join(SETTINGS_FILE);

    let content = match fs::read_to_string(&path) {
      Ok(content) => content,
      Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
      Err(e) => return Err(SettingsError::Read { path, source: e }),
    };

    let settings: Settings = serde_yaml::from_str(&content).map_err(|e| SettingsError::Parse {
      path: path.clone(),
      source: e,
    })?;

    debug!(path = %path.display(), "loaded builder settings");

    Ok(settings)
  }
}
