//! Packing a staged tree into a ZIP archive.
//!
//! The archive's internal root entry is the plugin name, so extracting
//! `sample-2.4.0.zip` yields a single `sample/` folder. An existing archive
//! at the destination is overwritten. The staged tree is left in place on
//! failure so diagnostics can inspect it.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{debug, info};
use walkdir::WalkDir;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::result::ZipError;
use zip::write::SimpleFileOptions;

/// Errors raised while writing an archive.
#[derive(Debug, Error)]
pub enum ArchiveError {
  #[error("failed to create archive {path}: {source}")]
  Create {
    path: PathBuf,
    source: io::Error,
  },

  #[error("failed to read staged tree at {path}: {source}")]
  Read {
    path: PathBuf,
    source: io::Error,
  },

  #[error("failed to write archive {path}: {source}")]
  Write {
    path: PathBuf,
    source: ZipError,
  },
}

/// Pack the staged tree into a deflate-compressed ZIP at `zip_path`.
///
/// Every entry is stored under `root_name/`, preserving the staged tree's
/// relative structure and Unix permissions.
pub fn pack(staged_path: &Path, root_name: &str, zip_path: &Path) -> Result<(), ArchiveError> {
  info!(archive = %zip_path.display(), "packing staged tree");

  let file = File::create(zip_path).map_err(|e| ArchiveError::Create {
    path: zip_path.to_path_buf(),
    source: e,
  })?;
  let mut zip = ZipWriter::new(file);

  let write_err = |e: ZipError| ArchiveError::Write {
    path: zip_path.to_path_buf(),
    source: e,
  };

  for entry in WalkDir::new(staged_path).min_depth(1) {
    let entry = entry.map_err(|e| {
      let path = e.path().unwrap_or(staged_path).to_path_buf();
      ArchiveError::Read {
        path,
        source: e.into(),
      }
    })?;

    let Ok(relative) = entry.path().strip_prefix(staged_path) else {
      continue;
    };
    let entry_name = format!("{}/{}", root_name, zip_entry_name(relative));

    let mut options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    #[cfg(unix)]
    {
      use std::os::unix::fs::PermissionsExt;
      if let Ok(metadata) = entry.metadata() {
        options = options.unix_permissions(metadata.permissions().mode());
      }
    }

    if entry.file_type().is_dir() {
      zip.add_directory(entry_name.as_str(), options).map_err(write_err)?;
    } else if entry.file_type().is_file() {
      zip.start_file(entry_name.as_str(), options).map_err(write_err)?;

      let mut source = File::open(entry.path()).map_err(|e| ArchiveError::Read {
        path: entry.path().to_path_buf(),
        source: e,
      })?;
      io::copy(&mut source, &mut zip).map_err(|e| ArchiveError::Write {
        path: zip_path.to_path_buf(),
        source: ZipError::Io(e),
      })?;
    } else {
      debug!(path = %entry.path().display(), "skipping non-regular file");
    }
  }

  zip.finish().map_err(write_err)?;

  Ok(())
}

/// Delete the staged tree after a successful pack.
pub fn cleanup_staged(staged_path: &Path) -> Result<(), ArchiveError> {
  fs::remove_dir_all(staged_path).map_err(|e| ArchiveError::Read {
    path: staged_path.to_path_buf(),
    source: e,
  })
}

/// Archive entry name for a relative path, always `/`-separated.
fn zip_entry_name(relative: &Path) -> String {
  let parts: Vec<String> = relative
    .components()
    .map(|c| c.as_os_str().to_string_lossy().into_owned())
    .collect();
  parts.join("/")
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::io::Read;
  use tempfile::TempDir;

  fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
      fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
  }

  fn entry_names(zip_path: &Path) -> Vec<String> {
    let file = File::open(zip_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    (0..archive.len()).map(|i| archive.by_index(i).unwrap().name().to_string()).collect()
  }

  #[test]
  fn archive_is_rooted_at_the_plugin_name() {
    let staged = TempDir::new().unwrap();
    write(staged.path(), "sample.php", "<?php\n");
    write(staged.path(), "src/Loader.php", "<?php\n");

    let out = TempDir::new().unwrap();
    let zip_path = out.path().join("sample-2.4.0.zip");
    pack(staged.path(), "sample", &zip_path).unwrap();

    let names = entry_names(&zip_path);
    assert!(names.contains(&"sample/sample.php".to_string()));
    assert!(names.contains(&"sample/src/Loader.php".to_string()));
    assert!(names.iter().all(|n| n.starts_with("sample/")));
  }

  #[test]
  fn archived_content_round_trips() {
    let staged = TempDir::new().unwrap();
    write(staged.path(), "sample.php", "<?php // payload\n");

    let out = TempDir::new().unwrap();
    let zip_path = out.path().join("sample.zip");
    pack(staged.path(), "sample", &zip_path).unwrap();

    let file = File::open(&zip_path).unwrap();
    let mut archive = zip::ZipArchive::new(file).unwrap();
    let mut entry = archive.by_name("sample/sample.php").unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();

    assert_eq!(content, "<?php // payload\n");
  }

  #[test]
  fn existing_archive_is_overwritten() {
    let staged = TempDir::new().unwrap();
    write(staged.path(), "sample.php", "<?php\n");

    let out = TempDir::new().unwrap();
    let zip_path = out.path().join("sample.zip");
    fs::write(&zip_path, "not a zip").unwrap();

    pack(staged.path(), "sample", &zip_path).unwrap();

    assert!(entry_names(&zip_path).contains(&"sample/sample.php".to_string()));
  }

  #[test]
  fn missing_destination_directory_is_an_error() {
    let staged = TempDir::new().unwrap();
    write(staged.path(), "sample.php", "<?php\n");

    let out = TempDir::new().unwrap();
    let zip_path = out.path().join("missing/sample.zip");

    let err = pack(staged.path(), "sample", &zip_path).unwrap_err();
    assert!(matches!(err, ArchiveError::Create { .. }));
    // The staged tree survives a failed pack.
    assert!(staged.path().join("sample.php").is_file());
  }

  #[test]
  fn cleanup_removes_the_staged_tree() {
    let staged = TempDir::new().unwrap();
    let tree = staged.path().join("sample");
    write(&tree, "sample.php", "<?php\n");

    cleanup_staged(&tree).unwrap();

    assert!(!tree.exists());
  }
}
