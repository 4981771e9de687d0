//! Staging of the distributable tree.
//!
//! A build stages a clean copy of the plugin source under
//! `<dist>/<plugin-name>`, runs the dependency installer inside it, then
//! prunes every ignored path. Staging is destructive towards previous
//! staged trees of the same plugin: there is no incremental reuse, so a
//! partial tree left by a crashed run is simply removed on the next build.
//!
//! Symlinks and other special files are skipped during the mirror; plugin
//! packages are expected to consist of regular files and directories.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::ignore::IgnoreList;

/// Arguments passed to the dependency installer: production-only
/// dependencies, optimized autoloader, non-interactive, no suggestions.
const INSTALLER_ARGS: [&str; 5] = [
  "update",
  "--no-dev",
  "--optimize-autoloader",
  "--no-interaction",
  "--no-suggest",
];

/// Errors raised while staging.
#[derive(Debug, Error)]
pub enum StageError {
  #[error("failed to read source {path}: {source}")]
  Source {
    path: PathBuf,
    source: io::Error,
  },

  #[error("failed to write {path}: {source}")]
  Destination {
    path: PathBuf,
    source: io::Error,
  },

  #[error("failed to run dependency installer '{command}': {source}")]
  InstallSpawn {
    command: String,
    source: io::Error,
  },

  #[error("dependency installer exited with {status}\n--- stdout ---\n{stdout}\n--- stderr ---\n{stderr}")]
  InstallFailed {
    status: String,
    stdout: String,
    stderr: String,
  },
}

/// Prepare a clean dist directory for a fresh build.
///
/// Creates `dist_path` if missing, and removes any stale staged subtree and
/// archive left over from a previous build of the same plugin version.
pub fn prepare_clean_dist_dir(dist_path: &Path, staged_name: &str, zip_name: &str) -> Result<(), StageError> {
  if dist_path.exists() {
    remove_if_present(&dist_path.join(staged_name))?;
    remove_if_present(&dist_path.join(zip_name))?;
    return Ok(());
  }

  fs::create_dir_all(dist_path).map_err(|e| StageError::Destination {
    path: dist_path.to_path_buf(),
    source: e,
  })
}

/// Mirror the source tree into the staging destination.
///
/// Relative structure and file permissions are preserved. The destination
/// subtree itself is never descended into: the default dist directory lives
/// inside the source tree, and mirroring it into itself would recurse.
pub fn mirror_tree(source: &Path, destination: &Path) -> Result<(), StageError> {
  info!(source = %source.display(), destination = %destination.display(), "mirroring source tree");

  fs::create_dir_all(destination).map_err(|e| StageError::Destination {
    path: destination.to_path_buf(),
    source: e,
  })?;

  let walker = WalkDir::new(source)
    .min_depth(1)
    .into_iter()
    .filter_entry(|entry| !entry.path().starts_with(destination));

  for entry in walker {
    let entry = entry.map_err(|e| {
      let path = e.path().unwrap_or(source).to_path_buf();
      StageError::Source {
        path,
        source: e.into(),
      }
    })?;

    // min_depth(1) guarantees a strict prefix.
    let Ok(relative) = entry.path().strip_prefix(source) else {
      continue;
    };
    let target = destination.join(relative);

    let file_type = entry.file_type();
    if file_type.is_dir() {
      fs::create_dir_all(&target).map_err(|e| StageError::Destination {
        path: target.clone(),
        source: e,
      })?;
    } else if file_type.is_file() {
      fs::copy(entry.path(), &target).map_err(|e| StageError::Destination {
        path: target.clone(),
        source: e,
      })?;
    } else {
      debug!(path = %entry.path().display(), "skipping non-regular file");
    }
  }

  Ok(())
}

/// Run the dependency installer inside the staged subtree.
///
/// Blocks until the installer exits, capturing stdout and stderr in full.
/// A non-zero exit is fatal and carries the captured output for diagnostics.
pub fn install_dependencies(staged_path: &Path, installer: &str) -> Result<(), StageError> {
  info!(installer = %installer, dir = %staged_path.display(), "installing production dependencies");

  let output = Command::new(installer)
    .args(INSTALLER_ARGS)
    .current_dir(staged_path)
    .output()
    .map_err(|e| StageError::InstallSpawn {
      command: installer.to_string(),
      source: e,
    })?;

  if !output.status.success() {
    return Err(StageError::InstallFailed {
      status: output.status.to_string(),
      stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
      stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
    });
  }

  debug!("dependency installer finished");

  Ok(())
}

/// Remove every ignored path from the staged subtree.
///
/// Runs after dependency installation so the installer still sees
/// `composer.json` and friends while the package does not. Entries that do
/// not exist in the tree are not errors.
pub fn prune_ignored(staged_path: &Path, ignore: &IgnoreList) -> Result<(), StageError> {
  for entry in ignore.entries() {
    let path = staged_path.join(entry);
    remove_if_present(&path)?;
  }

  Ok(())
}

fn remove_if_present(path: &Path) -> Result<(), StageError> {
  let metadata = match fs::symlink_metadata(path) {
    Ok(metadata) => metadata,
    Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(()),
    Err(e) => {
      return Err(StageError::Destination {
        path: path.to_path_buf(),
        source: e,
      });
    }
  };

  let result = if metadata.is_dir() {
    fs::remove_dir_all(path)
  } else {
    fs::remove_file(path)
  };

  result.map_err(|e| StageError::Destination {
    path: path.to_path_buf(),
    source: e,
  })?;
  debug!(path = %path.display(), "removed");

  Ok(())
}
