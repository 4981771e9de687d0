//! wppack-lib: packaging and version management for WordPress plugins.
//!
//! The pipeline stages a clean copy of a plugin's source tree, runs the
//! dependency installer inside it, prunes ignored paths, and packs the
//! result into a ZIP named `<plugin>-<version>.zip`. A separate rewrite
//! engine keeps the version string consistent across the plugin header,
//! readme stable tag, composer dist URL, and PHP version constants.
//!
//! Single-threaded and synchronous by design; concurrent builds against the
//! same source or dist directory are unsupported.

pub mod archive;
pub mod builder;
pub mod error;
pub mod ignore;
pub mod project;
pub mod settings;
pub mod stage;
pub mod version;

pub use builder::{BuildConfig, PackageBuilder};
pub use error::BuildError;
pub use ignore::IgnoreList;
pub use project::ProjectIdentity;
pub use settings::Settings;

/// Result type for build operations.
pub type Result<T> = std::result::Result<T, BuildError>;
