//! Common types and utilities shared across CLI commands.

use std::path::{Path, PathBuf};

use clap::ValueEnum;
use gamebox::package::VolumeType;
use gamebox::{Gamebox, GameboxConfig};
use tracing::debug;

use crate::error::CliError;

/// Volume kind selection for CLI arguments.
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum VolumeKind {
    /// Hard disk folders (*.harddisk)
    Hdd,
    /// CD-ROM folders and disc images (*.cdrom, .iso, .cue)
    Cd,
    /// Floppy folders and disk images (*.floppy, .img)
    Floppy,
}

impl From<VolumeKind> for VolumeType {
    fn from(kind: VolumeKind) -> Self {
        match kind {
            VolumeKind::Hdd => VolumeType::HardDisk,
            VolumeKind::Cd => VolumeType::CdRom,
            VolumeKind::Floppy => VolumeType::Floppy,
        }
    }
}

/// Load discovery rules from `--config`, the user config file, or defaults.
pub fn load_config(path: Option<&Path>) -> Result<GameboxConfig, CliError> {
    match path {
        Some(path) => {
            debug!(path = %path.display(), "Loading discovery rules");
            Ok(GameboxConfig::load(path)?)
        }
        None => Ok(GameboxConfig::load_or_default()?),
    }
}

/// Open a gamebox with the configured discovery rules.
pub fn open_gamebox(path: &Path, config_path: Option<&Path>) -> Result<Gamebox, CliError> {
    let config = load_config(config_path)?;
    Ok(Gamebox::open_with_config(path, config)?)
}

/// Print a list of paths relative to the gamebox root.
pub fn print_paths(root: &Path, paths: &[PathBuf]) {
    for path in paths {
        println!("  {}", display_relative(root, path));
    }
}

/// Render `path` relative to `root` when it lives inside it.
pub fn display_relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root)
        .unwrap_or(path)
        .display()
        .to_string()
}
