//! Gamebox package types and discovery.
//!
//! This module provides the data structures for reading and editing gamebox
//! packages: folders that bundle a DOS game with its drives, documentation,
//! emulator configuration and metadata.
//!
//! # Overview
//!
//! - **Gamebox**: an opened package with cached discovery results
//! - **GameInfo**: the persisted key/value record inside the package
//! - **GameIdentifier**: executable digest or generated UUID naming the game
//! - **VolumeType**: hard disk, CD-ROM and floppy drives bundled in the package
//! - **IconStore**: cover art kept as the package folder's icon
//!
//! # Layout
//!
//! ```text
//! Commander Keen 4.boxer/
//! ├── C.harddisk/              hard disk volume
//! │   └── KEEN/KEEN4E.EXE
//! ├── Documentation/
//! ├── DOSBox Preferences.conf  emulator configuration
//! ├── DOSBox Target -> C.harddisk/KEEN/KEEN4E.EXE
//! └── Game Info.json           game info record
//! ```

mod cover_art;
mod discovery;
mod gamebox;
mod identifier;
mod info;
mod naming;
mod target;
mod volume;

// Core types
pub use self::gamebox::Gamebox;
pub use identifier::{executables_digest, GameIdentifier, GameIdentifierType};
pub use info::{GameInfo, GameInfoValue};
pub use volume::{scan_volumes, Volume, VolumeType};

// Discovery and cover art
pub use cover_art::{fit_cover_art, DesktopEntryIconStore, IconStore, MAX_COVER_ART_SIZE};
pub use discovery::{scan_files, FileFilter};

// Naming conventions
pub use naming::{
    configuration_file_path, documentation_folder_path, game_info_path, game_name,
    has_package_extension, target_symlink_path, CONFIGURATION_FILE_EXTENSION,
    CONFIGURATION_FILE_NAME, DOCUMENTATION_FOLDER_NAME, GAME_IDENTIFIER_KEY,
    GAME_IDENTIFIER_TYPE_KEY, GAME_INFO_FILE_EXTENSION, GAME_INFO_FILE_NAME, TARGET_SYMLINK_NAME,
};
