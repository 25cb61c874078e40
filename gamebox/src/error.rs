//! Error types for gamebox operations.

use std::io;
use std::path::PathBuf;

/// Result type for gamebox operations.
pub type GameboxResult<T> = Result<T, GameboxError>;

/// Errors that can occur while opening or modifying a gamebox.
///
/// Discovery (documentation, executables, volumes) never produces these;
/// scan failures are absorbed and yield empty results. Only explicit
/// mutations and opening a package report errors.
#[derive(Debug)]
pub enum GameboxError {
    /// The path is not a usable gamebox.
    InvalidPackage { path: PathBuf, reason: String },

    /// Failed to read a file or directory.
    ReadFailed { path: PathBuf, source: io::Error },

    /// Failed to write a file or directory.
    WriteFailed { path: PathBuf, source: io::Error },

    /// Failed to delete a file.
    RemoveFailed { path: PathBuf, source: io::Error },

    /// Failed to copy a file into the gamebox.
    CopyFailed {
        source: PathBuf,
        target: PathBuf,
        error: io::Error,
    },

    /// Symlink operation failed.
    SymlinkFailed {
        link: PathBuf,
        target: PathBuf,
        reason: String,
    },

    /// The game info record could not be parsed.
    MetadataParseFailed { path: PathBuf, reason: String },

    /// A game info value cannot be stored.
    InvalidValue { key: String, reason: String },

    /// Cover art could not be decoded or encoded.
    IconFailed { path: PathBuf, reason: String },

    /// Invalid configuration.
    InvalidConfig(String),
}

impl GameboxError {
    pub(crate) fn invalid_package(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::InvalidPackage {
            path: path.into(),
            reason: reason.into(),
        }
    }
}

impl std::fmt::Display for GameboxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPackage { path, reason } => {
                write!(f, "{} is not a valid gamebox: {}", path.display(), reason)
            }
            Self::ReadFailed { path, source } => {
                write!(f, "failed to read {}: {}", path.display(), source)
            }
            Self::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path.display(), source)
            }
            Self::RemoveFailed { path, source } => {
                write!(f, "failed to remove {}: {}", path.display(), source)
            }
            Self::CopyFailed {
                source,
                target,
                error,
            } => {
                write!(
                    f,
                    "failed to copy {} to {}: {}",
                    source.display(),
                    target.display(),
                    error
                )
            }
            Self::SymlinkFailed {
                link,
                target,
                reason,
            } => {
                write!(
                    f,
                    "symlink operation failed ({} -> {}): {}",
                    link.display(),
                    target.display(),
                    reason
                )
            }
            Self::MetadataParseFailed { path, reason } => {
                write!(f, "failed to parse game info {}: {}", path.display(), reason)
            }
            Self::InvalidValue { key, reason } => {
                write!(f, "cannot store game info '{}': {}", key, reason)
            }
            Self::IconFailed { path, reason } => {
                write!(f, "cover art error for {}: {}", path.display(), reason)
            }
            Self::InvalidConfig(msg) => write!(f, "invalid configuration: {}", msg),
        }
    }
}

impl std::error::Error for GameboxError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ReadFailed { source, .. } => Some(source),
            Self::WriteFailed { source, .. } => Some(source),
            Self::RemoveFailed { source, .. } => Some(source),
            Self::CopyFailed { error, .. } => Some(error),
            _ => None,
        }
    }
}
