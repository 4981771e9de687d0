//! Build orchestration.
//!
//! [`PackageBuilder`] sequences the leaf modules into the three public
//! operations: `build` (stage, install, prune, pack), `build:unpacked`
//! (stage, install, prune), and `set_version` (rewrite version strings
//! across the project files). Configuration and identity are resolved once
//! at construction and read-only afterwards.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::archive;
use crate::error::BuildError;
use crate::ignore::IgnoreList;
use crate::project::{self, ProjectIdentity};
use crate::settings::Settings;
use crate::stage;
use crate::version;

/// Default staging/output directory name inside the project root.
pub const DIST_DIR_NAME: &str = "dist";

/// Resolved build configuration: project defaults merged with the settings
/// file. Read-only for all components during a run.
#[derive(Debug, Clone)]
pub struct BuildConfig {
  /// Project root being packaged.
  pub source_path: PathBuf,
  /// Staging and output directory.
  pub dist_path: PathBuf,
  /// Main plugin file name override.
  pub plugin_file: Option<String>,
  /// Dependency installer executable.
  pub composer_path: String,
  /// Constant name tracking the version in PHP `define()` statements.
  pub version_constant: Option<String>,
  /// Extra files carrying the version constant.
  pub version_constant_files: Vec<String>,
  /// Resolved ignore list (defaults plus project additions).
  pub ignore: IgnoreList,
}

impl BuildConfig {
  /// Merge project defaults with loaded settings.
  pub fn from_settings(source_path: PathBuf, settings: Settings) -> Self {
    let dist_path = match settings.destination {
      Some(destination) if destination.is_absolute() => destination,
      Some(destination) => source_path.join(destination),
      None => source_path.join(DIST_DIR_NAME),
    };

    Self {
      source_path,
      dist_path,
      plugin_file: settings.plugin_file,
      composer_path: settings.composer_path.unwrap_or_else(|| "composer".to_string()),
      version_constant: settings.version_constant,
      version_constant_files: settings.version_constant_files,
      ignore: IgnoreList::resolve(&settings.ignore),
    }
  }
}

/// Orchestrates the build pipeline for one plugin project.
#[derive(Debug)]
pub struct PackageBuilder {
  config: BuildConfig,
  identity: ProjectIdentity,
}

impl PackageBuilder {
  /// Resolve settings and identity for the project at `source_path`.
  pub fn from_project(source_path: &Path) -> Result<Self, BuildError> {
    let settings = Settings::load(source_path)?;
    let config = BuildConfig::from_settings(source_path.to_path_buf(), settings);
    let identity = ProjectIdentity::resolve(&config.source_path, config.plugin_file.as_deref())?;

    Ok(Self { config, identity })
  }

  pub fn identity(&self) -> &ProjectIdentity {
    &self.identity
  }

  pub fn config(&self) -> &BuildConfig {
    &self.config
  }

  /// `<name>-<version>.zip`
  pub fn zip_file_name(&self) -> String {
    format!("{}-{}.zip", self.identity.name, self.identity.version)
  }

  /// Staging subtree for this plugin: `<dist>/<name>`.
  pub fn staged_path(&self) -> PathBuf {
    self.config.dist_path.join(&self.identity.name)
  }

  /// Destination archive path: `<dist>/<name>-<version>.zip`.
  pub fn archive_path(&self) -> PathBuf {
    self.config.dist_path.join(self.zip_file_name())
  }

  /// Main plugin file name relative to the project root.
  fn main_file_name(&self) -> String {
    match &self.config.plugin_file {
      Some(file) => file.clone(),
      None => format!("{}.php", self.identity.name),
    }
  }

  /// Stage, install dependencies, and prune, leaving the staged tree in
  /// place. Returns the staged tree path.
  pub fn build_unpacked(&self) -> Result<PathBuf, BuildError> {
    let staged = self.staged_path();

    stage::prepare_clean_dist_dir(&self.config.dist_path, &self.identity.name, &self.zip_file_name())?;
    stage::mirror_tree(&self.config.source_path, &staged)?;
    stage::install_dependencies(&staged, &self.config.composer_path)?;
    stage::prune_ignored(&staged, &self.config.ignore)?;

    info!(staged = %staged.display(), "staged tree ready");

    Ok(staged)
  }

  /// Full build: stage, install, prune, pack, then delete the staged tree.
  /// Returns the archive path.
  pub fn build(&self) -> Result<PathBuf, BuildError> {
    let staged = self.build_unpacked()?;
    let zip_path = self.archive_path();

    archive::pack(&staged, &self.identity.name, &zip_path)?;
    archive::cleanup_staged(&staged)?;

    info!(archive = %zip_path.display(), "build finished");

    Ok(zip_path)
  }

  /// Rewrite the project's version strings to `new_version`.
  ///
  /// The composer dist URL is rewritten first because it needs the old
  /// version from the main file; the readme's stable tag is only touched
  /// for stable target versions.
  pub fn set_version(&self, new_version: &str) -> Result<(), BuildError> {
    if !project::is_valid_version(new_version) {
      return Err(version::VersionError::Invalid(new_version.to_string()).into());
    }

    let root = &self.config.source_path;
    let main_file = self.main_file_name();

    version::update_dist_url(root, &main_file, new_version)?;

    if version::is_stable(new_version) {
      version::update_stable_tag(root, new_version)?;
    }

    version::update_plugin_file(root, &main_file, new_version)?;

    if let Some(constant) = &self.config.version_constant {
      version::update_constant(root, &main_file, constant, new_version)?;
      for file in &self.config.version_constant_files {
        version::update_constant(root, file, constant, new_version)?;
      }
    }

    info!(version = %new_version, "version rewritten");

    Ok(())
  }
}
