//! Implementation of the `wppack build` and `wppack build:unpacked` commands.

use anyhow::{Context, Result};
use tracing::info;
use wppack_lib::PackageBuilder;

use crate::output;

/// Stage the plugin, install dependencies, prune, and pack into a ZIP.
pub fn cmd_build() -> Result<()> {
  let builder = builder_for_cwd()?;
  output::print_title(builder.identity());

  let zip_path = builder.build().context("build failed")?;
  info!(archive = %zip_path.display(), "build complete");

  output::print_success(&format!("Package written to {}", zip_path.display()));

  Ok(())
}

/// Stage the plugin without packing; the staged tree is kept.
pub fn cmd_build_unpacked() -> Result<()> {
  let builder = builder_for_cwd()?;
  output::print_title(builder.identity());

  let staged_path = builder.build_unpacked().context("build failed")?;

  output::print_success(&format!("Staged tree ready at {}", staged_path.display()));

  Ok(())
}

fn builder_for_cwd() -> Result<PackageBuilder> {
  let project = std::env::current_dir().context("failed to determine working directory")?;
  let builder = PackageBuilder::from_project(&project)
    .with_context(|| format!("failed to resolve plugin project in {}", project.display()))?;

  Ok(builder)
}
