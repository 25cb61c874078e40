//! Gamebox CLI - Command-line interface
//!
//! This binary provides a command-line interface to the gamebox library.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::common::VolumeKind;
use commands::edit::{ConfigAction, CoverAction, TargetAction};
use commands::{edit, inspect};
use error::CliError;

#[derive(Parser)]
#[command(name = "gamebox")]
#[command(about = "Inspect and edit DOS gamebox packages", long_about = None)]
#[command(version)]
struct Cli {
    /// Discovery rules file (defaults to <config dir>/gamebox/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log discovery and file operations to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create an empty gamebox
    Create {
        /// Path of the new gamebox (must end in .boxer)
        path: PathBuf,
    },

    /// Show a summary of a gamebox (read-only)
    Info {
        /// Path to the gamebox
        gamebox: PathBuf,
    },

    /// List documentation files
    Docs {
        /// Path to the gamebox
        gamebox: PathBuf,
    },

    /// List DOS executables
    Exes {
        /// Path to the gamebox
        gamebox: PathBuf,
    },

    /// List bundled drive volumes
    Volumes {
        /// Path to the gamebox
        gamebox: PathBuf,

        /// Only list volumes of this kind
        #[arg(long, value_enum)]
        kind: Option<VolumeKind>,
    },

    /// Print the game identifier, assigning one if needed
    Identifier {
        /// Path to the gamebox
        gamebox: PathBuf,
    },

    /// Show or change the target program
    Target {
        /// Path to the gamebox
        gamebox: PathBuf,

        #[command(subcommand)]
        action: Option<TargetAction>,
    },

    /// Show or change the DOSBox configuration file
    #[command(name = "config")]
    Configuration {
        /// Path to the gamebox
        gamebox: PathBuf,

        #[command(subcommand)]
        action: Option<ConfigAction>,
    },

    /// Change or export cover art
    Cover {
        /// Path to the gamebox
        gamebox: PathBuf,

        #[command(subcommand)]
        action: CoverAction,
    },

    /// Print game info (one key, or the whole record)
    Get {
        /// Path to the gamebox
        gamebox: PathBuf,

        /// Key to print
        key: Option<String>,
    },

    /// Store a game info value
    Set {
        /// Path to the gamebox
        gamebox: PathBuf,

        /// Key to set
        key: String,

        /// Value (true/false and numbers are stored as such)
        value: String,
    },

    /// Delete a game info value
    Unset {
        /// Path to the gamebox
        gamebox: PathBuf,

        /// Key to delete
        key: String,
    },
}

/// Install the stderr log subscriber.
///
/// `RUST_LOG` wins when set; otherwise `--verbose` selects debug output and
/// the default is warnings only.
fn init_logging(verbose: bool) -> Result<(), CliError> {
    let default_level = if verbose { "gamebox=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| CliError::LoggingInit(e.to_string()))
}

fn run(cli: Cli) -> Result<(), CliError> {
    let config = cli.config.as_deref();

    match cli.command {
        Commands::Create { path } => inspect::create(&path, config),
        Commands::Info { gamebox } => inspect::info(&gamebox, config),
        Commands::Docs { gamebox } => inspect::docs(&gamebox, config),
        Commands::Exes { gamebox } => inspect::exes(&gamebox, config),
        Commands::Volumes { gamebox, kind } => inspect::volumes(&gamebox, config, kind),
        Commands::Identifier { gamebox } => inspect::identifier(&gamebox, config),
        Commands::Target { gamebox, action } => edit::target(&gamebox, config, action),
        Commands::Configuration { gamebox, action } => {
            edit::configuration(&gamebox, config, action)
        }
        Commands::Cover { gamebox, action } => edit::cover(&gamebox, config, action),
        Commands::Get { gamebox, key } => edit::get(&gamebox, config, key),
        Commands::Set {
            gamebox,
            key,
            value,
        } => edit::set(&gamebox, config, key, value),
        Commands::Unset { gamebox, key } => edit::unset(&gamebox, config, key),
    }
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = init_logging(cli.verbose) {
        e.exit();
    }

    if let Err(e) = run(cli) {
        e.exit();
    }
}
