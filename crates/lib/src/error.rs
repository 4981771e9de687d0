//! Error taxonomy for the build pipeline.
//!
//! Every step owns its error type; [`BuildError`] aggregates them for the
//! orchestrator. Propagation is strict: any failure aborts the current
//! operation, nothing is retried.

use thiserror::Error;

use crate::archive::ArchiveError;
use crate::project::IdentityError;
use crate::settings::SettingsError;
use crate::stage::StageError;
use crate::version::VersionError;

/// Any fatal error raised while building or rewriting versions.
#[derive(Debug, Error)]
pub enum BuildError {
  #[error(transparent)]
  Identity(#[from] IdentityError),

  #[error(transparent)]
  Settings(#[from] SettingsError),

  #[error(transparent)]
  Stage(#[from] StageError),

  #[error(transparent)]
  Archive(#[from] ArchiveError),

  #[error(transparent)]
  Version(#[from] VersionError),
}
