//! Implementation of the `wppack version` command.
//!
//! With no argument, reports the plugin's current identity. With a version
//! argument, rewrites the version across the project's files.

use anyhow::{Context, Result};
use wppack_lib::PackageBuilder;

use crate::output;

pub fn cmd_version(new_version: Option<&str>) -> Result<()> {
  let project = std::env::current_dir().context("failed to determine working directory")?;
  let builder = PackageBuilder::from_project(&project)
    .with_context(|| format!("failed to resolve plugin project in {}", project.display()))?;

  let identity = builder.identity();

  let Some(new_version) = new_version else {
    output::print_stat("Plugin Name", &identity.name);
    output::print_stat("Plugin Version", &identity.version);
    return Ok(());
  };

  builder
    .set_version(new_version)
    .with_context(|| format!("failed to set version {}", new_version))?;

  output::print_success(&format!(
    "Version updated: {} -> {}",
    identity.version, new_version
  ));

  Ok(())
}
