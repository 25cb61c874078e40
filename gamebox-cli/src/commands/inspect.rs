//! Read-only commands: summary, listings and identifier.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use gamebox::package::{VolumeType, GAME_IDENTIFIER_KEY};
use gamebox::Gamebox;

use super::common::{display_relative, load_config, open_gamebox, print_paths, VolumeKind};
use crate::error::CliError;

/// Print a summary of a gamebox without modifying it.
pub fn info(path: &Path, config: Option<&Path>) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;
    let root = gamebox.game_path().to_path_buf();

    println!("{}", gamebox.game_name());
    println!("  Path:          {}", root.display());
    // Read-only: an unassigned identifier is reported, not generated
    match gamebox
        .game_info(GAME_IDENTIFIER_KEY)
        .and_then(|v| v.as_str().map(str::to_string))
    {
        Some(id) => {
            println!("  Identifier:    {}", id);
            println!("  Identifier by: {}", gamebox.game_identifier_type());
        }
        None => println!("  Identifier:    (unassigned)"),
    }

    match gamebox.target_path() {
        Some(target) => println!("  Target:        {}", display_relative(&root, &target)),
        None => println!("  Target:        (none)"),
    }
    match gamebox.configuration_file() {
        Some(_) => println!("  Configuration: present"),
        None => println!("  Configuration: (none)"),
    }

    if let Some(folder) = gamebox.documentation_folder() {
        println!("  Manuals in:    {}", display_relative(&root, &folder));
    }

    println!("  Executables:   {}", gamebox.executables().len());
    println!("  Documentation: {}", gamebox.documentation().len());
    for volume_type in VolumeType::ALL {
        let count = gamebox.volumes(&HashSet::from([volume_type])).len();
        if count > 0 {
            println!("  {} volumes: {}", volume_type, count);
        }
    }

    Ok(())
}

/// List documentation files.
pub fn docs(path: &Path, config: Option<&Path>) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;
    list(&mut gamebox, "documentation files", Gamebox::documentation);
    Ok(())
}

/// List executables.
pub fn exes(path: &Path, config: Option<&Path>) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;
    list(&mut gamebox, "executables", Gamebox::executables);
    Ok(())
}

fn list(gamebox: &mut Gamebox, label: &str, scan: fn(&mut Gamebox) -> &[PathBuf]) {
    let root = gamebox.game_path().to_path_buf();
    let paths = scan(gamebox).to_vec();

    if paths.is_empty() {
        println!("No {} found.", label);
        return;
    }

    println!("{} {}:", paths.len(), label);
    print_paths(&root, &paths);
}

/// List bundled drive volumes, optionally of one kind.
pub fn volumes(path: &Path, config: Option<&Path>, kind: Option<VolumeKind>) -> Result<(), CliError> {
    let gamebox = open_gamebox(path, config)?;
    let root = gamebox.game_path();

    let types: Vec<VolumeType> = match kind {
        Some(kind) => vec![kind.into()],
        None => VolumeType::ALL.to_vec(),
    };

    let mut any = false;
    for volume_type in types {
        let paths = gamebox.volumes(&HashSet::from([volume_type]));
        if paths.is_empty() {
            continue;
        }
        any = true;
        println!("{}:", volume_type);
        print_paths(root, &paths);
    }

    if !any {
        println!("No volumes found.");
    }
    Ok(())
}

/// Print the game identifier, assigning one if needed.
pub fn identifier(path: &Path, config: Option<&Path>) -> Result<(), CliError> {
    let mut gamebox = open_gamebox(path, config)?;
    println!("{}", gamebox.game_identifier()?);
    Ok(())
}

/// Create an empty gamebox.
pub fn create(path: &Path, config: Option<&Path>) -> Result<(), CliError> {
    let config = load_config(config)?;
    let gamebox = Gamebox::create_with_config(path, config)?;
    println!("Created {}", gamebox.game_path().display());
    Ok(())
}
