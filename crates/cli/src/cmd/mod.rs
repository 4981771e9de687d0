mod build;
mod version;

pub use build::{cmd_build, cmd_build_unpacked};
pub use version::cmd_version;
