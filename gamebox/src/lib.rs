//! Gamebox - DOS game packages
//!
//! This library opens gamebox folders, discovers the documentation,
//! executables and drives bundled inside them, assigns each game a stable
//! identifier, and edits the package's configuration file, launch target,
//! cover art and metadata record.

pub mod config;
pub mod error;
pub mod package;

pub use config::GameboxConfig;
pub use error::{GameboxError, GameboxResult};
pub use package::Gamebox;
