//! Commands that modify a gamebox.

use std::path::{Path, PathBuf};

use clap::Subcommand;
use gamebox::package::GameInfoValue;
use gamebox::GameboxError;

use super::common::{display_relative, open_gamebox};
use crate::error::CliError;

/// Target executable subcommands.
#[derive(Debug, Subcommand)]
pub enum TargetAction {
    /// Point the gamebox at a program (absolute, or relative to the gamebox)
    Set { program: PathBuf },
    /// Remove the target program
    Clear,
}

/// Configuration file subcommands.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Copy a DOSBox configuration file into the gamebox
    Set { file: PathBuf },
    /// Delete the stored configuration file
    Clear,
    /// Print where the configuration file is stored
    Path,
}

/// Cover art subcommands.
#[derive(Debug, Subcommand)]
pub enum CoverAction {
    /// Use an image as the gamebox's cover art
    Set { image: PathBuf },
    /// Remove custom cover art
    Clear,
    /// Save the current cover art as PNG
    Export { output: PathBuf },
}

/// Show or change the target program.
pub fn target(path: &Path, config: Option<&Path>, action: Option<TargetAction>) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;
    let root = gamebox.game_path().to_path_buf();

    match action {
        None => match gamebox.target_path() {
            Some(target) => println!("{}", display_relative(&root, &target)),
            None => return Err(CliError::NotFound("No target program set".to_string())),
        },
        Some(TargetAction::Set { program }) => {
            gamebox.set_target_path(Some(&program))?;
            if let Some(target) = gamebox.target_path() {
                println!("Target set to {}", display_relative(&root, &target));
            }
        }
        Some(TargetAction::Clear) => {
            gamebox.set_target_path(None)?;
            println!("Target cleared");
        }
    }
    Ok(())
}

/// Show or change the configuration file.
pub fn configuration(path: &Path, config: Option<&Path>, action: Option<ConfigAction>) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;

    match action {
        None => match gamebox.configuration_file() {
            Some(file) => {
                let text = std::fs::read_to_string(&file).map_err(|e| {
                    CliError::Gamebox(GameboxError::ReadFailed {
                        path: file.clone(),
                        source: e,
                    })
                })?;
                print!("{}", text);
            }
            None => {
                return Err(CliError::NotFound(
                    "No configuration file stored".to_string(),
                ))
            }
        },
        Some(ConfigAction::Set { file }) => {
            gamebox.set_configuration_file(Some(&file))?;
            println!("Stored configuration from {}", file.display());
        }
        Some(ConfigAction::Clear) => {
            gamebox.set_configuration_file(None)?;
            println!("Configuration removed");
        }
        Some(ConfigAction::Path) => {
            println!("{}", gamebox.configuration_file_path().display());
        }
    }
    Ok(())
}

/// Change or export cover art.
pub fn cover(path: &Path, config: Option<&Path>, action: CoverAction) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;

    match action {
        CoverAction::Set { image } => {
            let art = image::open(&image).map_err(|error| CliError::Image {
                path: image.clone(),
                error,
            })?;
            gamebox.set_cover_art(Some(&art))?;
            println!("Cover art set from {}", image.display());
        }
        CoverAction::Clear => {
            gamebox.set_cover_art(None)?;
            println!("Cover art removed");
        }
        CoverAction::Export { output } => {
            let art = gamebox
                .cover_art()?
                .ok_or_else(|| CliError::NotFound("Gamebox has no cover art".to_string()))?;
            art.save_with_format(&output, image::ImageFormat::Png)
                .map_err(|error| CliError::Image {
                    path: output.clone(),
                    error,
                })?;
            println!("Cover art saved to {}", output.display());
        }
    }
    Ok(())
}

/// Print one game info value, or the whole record without a key.
pub fn get(path: &Path, config: Option<&Path>, key: Option<String>) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;

    match key {
        Some(key) => {
            let value = gamebox
                .game_info(&key)
                .ok_or_else(|| CliError::NotFound(format!("No key '{}' in game info", key)))?;
            println!("{}", value);
        }
        None => {
            for (key, value) in gamebox.game_info_record().entries() {
                println!("{} = {}", key, value);
            }
        }
    }
    Ok(())
}

/// Store a game info value.
pub fn set(path: &Path, config: Option<&Path>, key: String, value: String) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;
    let value = GameInfoValue::parse_literal(&value);
    gamebox.set_game_info(key.clone(), value.clone())?;
    println!("{} = {}", key, value);
    Ok(())
}

/// Delete a game info value.
pub fn unset(path: &Path, config: Option<&Path>, key: String) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;
    match gamebox.remove_game_info(&key)? {
        Some(_) => {
            println!("Removed {}", key);
            Ok(())
        }
        None => Err(CliError::NotFound(format!("No key '{}' in game info", key))),
    }
}
