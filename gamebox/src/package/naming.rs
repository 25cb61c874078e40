//! Centralized gamebox naming conventions.
//!
//! This module is the single source of truth for every fixed name inside a
//! gamebox:
//! - Configuration file (`DOSBox Preferences.conf`)
//! - Game info record (`Game Info.json`)
//! - Target executable symlink (`DOSBox Target`)
//! - Documentation folder (`Documentation`)
//!
//! Other modules should use these functions rather than joining names directly.

use std::path::{Path, PathBuf};

/// The gameInfo key under which the game's identifier is stored.
pub const GAME_IDENTIFIER_KEY: &str = "gameIdentifier";

/// The gameInfo key under which the identifier's type is stored.
pub const GAME_IDENTIFIER_TYPE_KEY: &str = "gameIdentifierType";

/// Filename of the symlink pointing at the target executable.
pub const TARGET_SYMLINK_NAME: &str = "DOSBox Target";

/// Filename of the emulator configuration file, without extension.
pub const CONFIGURATION_FILE_NAME: &str = "DOSBox Preferences";

/// Extension of the emulator configuration file.
pub const CONFIGURATION_FILE_EXTENSION: &str = "conf";

/// Filename of the game info record, without extension.
pub const GAME_INFO_FILE_NAME: &str = "Game Info";

/// Extension of the game info record.
pub const GAME_INFO_FILE_EXTENSION: &str = "json";

/// Name of the documentation folder.
pub const DOCUMENTATION_FOLDER_NAME: &str = "Documentation";

/// Path of the configuration file inside a gamebox.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gamebox::package::configuration_file_path;
///
/// assert_eq!(
///     configuration_file_path(Path::new("/games/Doom.boxer")),
///     Path::new("/games/Doom.boxer/DOSBox Preferences.conf")
/// );
/// ```
pub fn configuration_file_path(root: &Path) -> PathBuf {
    root.join(format!(
        "{}.{}",
        CONFIGURATION_FILE_NAME, CONFIGURATION_FILE_EXTENSION
    ))
}

/// Path of the game info record inside a gamebox.
pub fn game_info_path(root: &Path) -> PathBuf {
    root.join(format!("{}.{}", GAME_INFO_FILE_NAME, GAME_INFO_FILE_EXTENSION))
}

/// Path of the target symlink inside a gamebox.
pub fn target_symlink_path(root: &Path) -> PathBuf {
    root.join(TARGET_SYMLINK_NAME)
}

/// Path of the documentation folder inside a gamebox.
pub fn documentation_folder_path(root: &Path) -> PathBuf {
    root.join(DOCUMENTATION_FOLDER_NAME)
}

/// Display name of a gamebox: its folder name minus the package extension.
///
/// The extension is stripped case-insensitively and only when it matches
/// `package_extension`; other dots in the name are kept.
///
/// # Examples
///
/// ```
/// use std::path::Path;
/// use gamebox::package::game_name;
///
/// assert_eq!(game_name(Path::new("/games/Commander Keen 4.boxer"), "boxer"), "Commander Keen 4");
/// assert_eq!(game_name(Path::new("/games/Doom v1.9.BOXER"), "boxer"), "Doom v1.9");
/// assert_eq!(game_name(Path::new("/games/Doom v1.9"), "boxer"), "Doom v1.9");
/// ```
pub fn game_name(root: &Path, package_extension: &str) -> String {
    let file_name = root
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    match root.extension() {
        Some(ext) if ext.to_string_lossy().eq_ignore_ascii_case(package_extension) => root
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or(file_name),
        _ => file_name,
    }
}

/// Whether `path` has the given package extension (case-insensitive).
pub fn has_package_extension(path: &Path, package_extension: &str) -> bool {
    path.extension()
        .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case(package_extension))
}

/// Whether a file name belongs to the gamebox's own bookkeeping files.
///
/// These never show up in documentation or executable listings.
pub(crate) fn is_reserved_name(name: &str) -> bool {
    name == TARGET_SYMLINK_NAME
        || name == format!("{}.{}", CONFIGURATION_FILE_NAME, CONFIGURATION_FILE_EXTENSION)
        || name == format!("{}.{}", GAME_INFO_FILE_NAME, GAME_INFO_FILE_EXTENSION)
}
