//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use std::fmt;
use std::path::PathBuf;
use std::process;

use gamebox::config::ConfigError;
use gamebox::GameboxError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration file error
    Config(ConfigError),
    /// Gamebox operation failed
    Gamebox(GameboxError),
    /// Failed to read or write an image file
    Image {
        path: PathBuf,
        error: image::ImageError,
    },
    /// A requested value is not present
    NotFound(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        // Print additional help for specific errors
        if let CliError::Gamebox(GameboxError::InvalidPackage { .. }) = self {
            eprintln!();
            eprintln!("A gamebox is a folder whose name ends in .boxer, for example:");
            eprintln!("  \"Commander Keen 4.boxer\"");
            eprintln!("Create an empty one with: gamebox create <path>");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(e) => write!(f, "Configuration error: {}", e),
            CliError::Gamebox(e) => write!(f, "{}", e),
            CliError::Image { path, error } => {
                write!(f, "Failed to process image '{}': {}", path.display(), error)
            }
            CliError::NotFound(msg) => write!(f, "{}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Config(e) => Some(e),
            CliError::Gamebox(e) => Some(e),
            CliError::Image { error, .. } => Some(error),
            _ => None,
        }
    }
}

impl From<GameboxError> for CliError {
    fn from(e: GameboxError) -> Self {
        CliError::Gamebox(e)
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        CliError::Config(e)
    }
}
