//! CLI output formatting utilities.
//!
//! Consistent formatting for terminal output: colored status lines and the
//! build title banner. Colors degrade gracefully when the stream is not a
//! terminal.

use owo_colors::{OwoColorize, Stream};
use wppack_lib::ProjectIdentity;

pub mod symbols {
  pub const SUCCESS: &str = "✓";
  pub const ERROR: &str = "✗";
}

const TITLE_SEPARATOR: &str = "######################################################################";
const OUTPUT_SEPARATOR: &str = "----------------------------------------------------------------------";

/// Banner printed before a build, naming the plugin and its version.
pub fn print_title(identity: &ProjectIdentity) {
  println!("{}", TITLE_SEPARATOR.if_supports_color(Stream::Stdout, |s| s.dimmed()));
  println!("WordPress Plugin Builder");
  println!();
  print_stat("Plugin Name", &identity.name);
  print_stat("Plugin Version", &identity.version);
  println!("{}", OUTPUT_SEPARATOR.if_supports_color(Stream::Stdout, |s| s.dimmed()));
}

pub fn print_success(message: &str) {
  println!(
    "{} {}",
    symbols::SUCCESS.if_supports_color(Stream::Stdout, |s| s.green()),
    message
  );
}

pub fn print_error(message: &str) {
  eprintln!(
    "{} {}",
    symbols::ERROR.if_supports_color(Stream::Stderr, |s| s.red()),
    message.if_supports_color(Stream::Stderr, |s| s.red())
  );
}

pub fn print_stat(label: &str, value: &str) {
  println!(
    "  {}: {}",
    label.if_supports_color(Stream::Stdout, |s| s.dimmed()),
    value
  );
}
