//! wppack - WordPress plugin package builder.

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod cmd;
mod output;

/// wppack - package a WordPress plugin into a distributable ZIP
#[derive(Parser)]
#[command(name = "wppack")]
#[command(author, version, about, long_about = None)]
struct Cli {
  /// Enable verbose output
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Build the plugin distribution files, packing them into a ZIP file
  Build,

  /// Build the plugin distribution files without packing them
  #[command(name = "build:unpacked")]
  BuildUnpacked,

  /// Report the plugin version, or rewrite it across the project files
  Version {
    /// New version to set (e.g. 3.0.0 or 3.0.0-beta.1)
    value: Option<String>,
  },
}

fn main() {
  let cli = Cli::parse();

  let default_filter = if cli.verbose { "debug" } else { "warn" };
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)))
    .without_time()
    .init();

  let result = match &cli.command {
    Commands::Build => cmd::cmd_build(),
    Commands::BuildUnpacked => cmd::cmd_build_unpacked(),
    Commands::Version { value } => cmd::cmd_version(value.as_deref()),
  };

  if let Err(e) = result {
    output::print_error(&format!("{:#}", e));
    std::process::exit(1);
  }
}
