//! The gamebox package type.
//!
//! [`Gamebox`] wraps a gamebox directory and exposes typed views of its
//! contents. Discovery results are cached on first access and only re-read
//! after [`Gamebox::refresh`]; changes made on disk by other processes are not
//! noticed until then.

use std::collections::HashSet;
use std::env;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Component, Path, PathBuf};

use image::DynamicImage;

use super::cover_art::{DesktopEntryIconStore, IconStore};
use super::discovery::{scan_files, FileFilter};
use super::identifier::{GameIdentifier, GameIdentifierType};
use super::info::{GameInfo, GameInfoValue};
use super::naming::{self, GAME_IDENTIFIER_KEY, GAME_IDENTIFIER_TYPE_KEY};
use super::target;
use super::volume::{scan_volumes, VolumeType};
use crate::config::GameboxConfig;
use crate::error::{GameboxError, GameboxResult};

/// A gamebox on disk.
///
/// Holds the gamebox root plus lazily filled caches for documentation,
/// executables and the game info record.
///
/// # Example
///
/// ```no_run
/// use gamebox::Gamebox;
///
/// let mut gamebox = Gamebox::open("/games/Commander Keen 4.boxer")?;
///
/// println!("{}", gamebox.game_name());
/// for exe in gamebox.executables() {
///     println!("  {}", exe.display());
/// }
/// println!("id: {}", gamebox.game_identifier()?);
/// # Ok::<(), gamebox::GameboxError>(())
/// ```
pub struct Gamebox {
    root: PathBuf,
    config: GameboxConfig,
    documentation_filter: FileFilter,
    executable_filter: FileFilter,
    icon_store: Box<dyn IconStore>,
    documentation: Option<Vec<PathBuf>>,
    executables: Option<Vec<PathBuf>>,
    game_info: Option<GameInfo>,
}

impl Gamebox {
    /// Open the gamebox at `path` with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`GameboxError::InvalidPackage`] if the path does not exist, is
    /// not a directory, or lacks the `.boxer` extension.
    pub fn open(path: impl AsRef<Path>) -> GameboxResult<Self> {
        Self::open_with_config(path, GameboxConfig::default())
    }

    /// Open the gamebox at `path` using custom discovery rules.
    pub fn open_with_config(path: impl AsRef<Path>, config: GameboxConfig) -> GameboxResult<Self> {
        let root = absolute(path.as_ref())?;

        let metadata = fs::metadata(&root).map_err(|e| {
            let reason = if e.kind() == io::ErrorKind::NotFound {
                "path does not exist".to_string()
            } else {
                e.to_string()
            };
            GameboxError::invalid_package(&root, reason)
        })?;

        if !metadata.is_dir() {
            return Err(GameboxError::invalid_package(&root, "not a directory"));
        }

        if !naming::has_package_extension(&root, &config.package_extension) {
            return Err(GameboxError::invalid_package(
                &root,
                format!("missing .{} extension", config.package_extension),
            ));
        }

        let documentation_filter = FileFilter::new(
            &config.documentation_extensions,
            &config.documentation_exclusions,
        )?;
        let executable_filter =
            FileFilter::new(&config.executable_extensions, &config.executable_exclusions)?;

        tracing::debug!(path = %root.display(), "Opened gamebox");

        Ok(Self {
            root,
            config,
            documentation_filter,
            executable_filter,
            icon_store: Box::new(DesktopEntryIconStore::new()),
            documentation: None,
            executables: None,
            game_info: None,
        })
    }

    /// Create an empty gamebox at `path` and open it.
    ///
    /// # Errors
    ///
    /// Fails if something already exists at `path`, if the name lacks the
    /// package extension, or if the directory cannot be created.
    pub fn create(path: impl AsRef<Path>) -> GameboxResult<Self> {
        Self::create_with_config(path, GameboxConfig::default())
    }

    /// Create an empty gamebox at `path` using custom discovery rules.
    pub fn create_with_config(path: impl AsRef<Path>, config: GameboxConfig) -> GameboxResult<Self> {
        let root = absolute(path.as_ref())?;

        if root.symlink_metadata().is_ok() {
            return Err(GameboxError::invalid_package(&root, "path already exists"));
        }
        if !naming::has_package_extension(&root, &config.package_extension) {
            return Err(GameboxError::invalid_package(
                &root,
                format!("missing .{} extension", config.package_extension),
            ));
        }

        fs::create_dir_all(&root).map_err(|e| GameboxError::WriteFailed {
            path: root.clone(),
            source: e,
        })?;

        tracing::info!(path = %root.display(), "Created gamebox");
        Self::open_with_config(root, config)
    }

    /// Replace the icon store used for cover art (builder pattern).
    pub fn with_icon_store(mut self, store: impl IconStore + 'static) -> Self {
        self.icon_store = Box::new(store);
        self
    }

    /// The gamebox root, which is also the DOS game's base folder.
    pub fn game_path(&self) -> &Path {
        &self.root
    }

    /// Display name: the folder name minus the package extension.
    pub fn game_name(&self) -> String {
        naming::game_name(&self.root, &self.config.package_extension)
    }

    /// The documentation folder, if the gamebox has one.
    ///
    /// Documentation discovery searches the whole gamebox; this is only the
    /// conventional place to keep manuals.
    pub fn documentation_folder(&self) -> Option<PathBuf> {
        let path = naming::documentation_folder_path(&self.root);
        path.is_dir().then_some(path)
    }

    /// Discovery rules in effect.
    pub fn config(&self) -> &GameboxConfig {
        &self.config
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    /// Documentation files inside the gamebox, sorted by path.
    pub fn documentation(&mut self) -> &[PathBuf] {
        if self.documentation.is_none() {
            let found = scan_files(&self.root, &self.documentation_filter);
            tracing::debug!(path = %self.root.display(), count = found.len(), "Scanned documentation");
            self.documentation = Some(found);
        }
        self.documentation.as_deref().unwrap_or_default()
    }

    /// DOS executables inside the gamebox, sorted by path.
    pub fn executables(&mut self) -> &[PathBuf] {
        if self.executables.is_none() {
            let found = scan_files(&self.root, &self.executable_filter);
            tracing::debug!(path = %self.root.display(), count = found.len(), "Scanned executables");
            self.executables = Some(found);
        }
        self.executables.as_deref().unwrap_or_default()
    }

    /// Bundled drive volumes of the requested types, sorted by path.
    pub fn volumes(&self, types: &HashSet<VolumeType>) -> Vec<PathBuf> {
        scan_volumes(&self.root, types)
            .into_iter()
            .map(|v| v.path)
            .collect()
    }

    /// Bundled hard disk volumes.
    pub fn hdd_volumes(&self) -> Vec<PathBuf> {
        self.volumes(&HashSet::from([VolumeType::HardDisk]))
    }

    /// Bundled CD-ROM volumes.
    pub fn cd_volumes(&self) -> Vec<PathBuf> {
        self.volumes(&HashSet::from([VolumeType::CdRom]))
    }

    /// Bundled floppy volumes.
    pub fn floppy_volumes(&self) -> Vec<PathBuf> {
        self.volumes(&HashSet::from([VolumeType::Floppy]))
    }

    /// Clear cached documentation, executables and game info.
    ///
    /// The next access re-reads the disk.
    pub fn refresh(&mut self) {
        self.documentation = None;
        self.executables = None;
        self.game_info = None;
        tracing::debug!(path = %self.root.display(), "Cleared gamebox caches");
    }

    // =========================================================================
    // Game info
    // =========================================================================

    fn info(&mut self) -> &mut GameInfo {
        let root = &self.root;
        self.game_info.get_or_insert_with(|| {
            let path = naming::game_info_path(root);
            GameInfo::load(&path).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Ignoring unreadable game info");
                GameInfo::empty(path)
            })
        })
    }

    /// The whole game info record.
    pub fn game_info_record(&mut self) -> &GameInfo {
        self.info()
    }

    /// Look up a game info value.
    pub fn game_info(&mut self, key: &str) -> Option<GameInfoValue> {
        self.info().get(key).cloned()
    }

    /// Store a game info value. The record is written immediately.
    pub fn set_game_info(
        &mut self,
        key: impl Into<String>,
        value: impl Into<GameInfoValue>,
    ) -> GameboxResult<()> {
        self.info().set(key, value)
    }

    /// Delete a game info value. The record is written immediately.
    pub fn remove_game_info(&mut self, key: &str) -> GameboxResult<Option<GameInfoValue>> {
        self.info().remove(key)
    }

    /// The unique identifier of this game.
    ///
    /// A persisted identifier is returned as is. Otherwise one is computed
    /// from the executables (or generated, if there are none) and persisted
    /// together with its type before returning.
    ///
    /// # Errors
    ///
    /// Returns an error if an executable cannot be read or the record cannot
    /// be written.
    pub fn game_identifier(&mut self) -> GameboxResult<String> {
        if let Some(existing) = self
            .info()
            .get(GAME_IDENTIFIER_KEY)
            .and_then(|v| v.as_str())
            .filter(|v| !v.is_empty())
        {
            return Ok(existing.to_string());
        }

        let executables = self.executables().to_vec();
        let identifier = GameIdentifier::for_executables(&executables)?;

        self.info().set_many([
            (
                GAME_IDENTIFIER_KEY,
                GameInfoValue::String(identifier.value.clone()),
            ),
            (
                GAME_IDENTIFIER_TYPE_KEY,
                GameInfoValue::Integer(identifier.identifier_type.as_i64()),
            ),
        ])?;

        tracing::info!(
            path = %self.root.display(),
            identifier = %identifier.value,
            kind = %identifier.identifier_type,
            "Assigned game identifier"
        );

        Ok(identifier.value)
    }

    /// How the persisted identifier was produced.
    ///
    /// [`GameIdentifierType::None`] until an identifier has been assigned.
    pub fn game_identifier_type(&mut self) -> GameIdentifierType {
        self.info()
            .get(GAME_IDENTIFIER_TYPE_KEY)
            .and_then(|v| v.as_i64())
            .and_then(GameIdentifierType::from_i64)
            .unwrap_or(GameIdentifierType::None)
    }

    // =========================================================================
    // Configuration file
    // =========================================================================

    /// Where the configuration file lives, whether or not it exists.
    pub fn configuration_file_path(&self) -> PathBuf {
        naming::configuration_file_path(&self.root)
    }

    /// The configuration file, if one is stored.
    pub fn configuration_file(&self) -> Option<PathBuf> {
        let path = self.configuration_file_path();
        path.is_file().then_some(path)
    }

    /// Copy `source` into the gamebox as its configuration file.
    ///
    /// Any existing configuration is overwritten. `None` deletes the stored
    /// configuration.
    pub fn set_configuration_file(&mut self, source: Option<&Path>) -> GameboxResult<()> {
        let destination = self.configuration_file_path();

        let Some(source) = source else {
            return match fs::remove_file(&destination) {
                Ok(()) => {
                    tracing::info!(path = %destination.display(), "Removed configuration file");
                    Ok(())
                }
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(GameboxError::RemoveFailed {
                    path: destination,
                    source: e,
                }),
            };
        };

        if is_same_file(source, &destination) {
            return Ok(());
        }

        fs::copy(source, &destination).map_err(|e| GameboxError::CopyFailed {
            source: source.to_path_buf(),
            target: destination.clone(),
            error: e,
        })?;

        tracing::info!(
            source = %source.display(),
            path = %destination.display(),
            "Stored configuration file"
        );
        Ok(())
    }

    // =========================================================================
    // Target executable
    // =========================================================================

    /// The default program for this gamebox, if one is set.
    pub fn target_path(&self) -> Option<PathBuf> {
        target::read_target(&self.root)
    }

    /// Set the default program, or clear it with `None`.
    pub fn set_target_path(&mut self, target: Option<&Path>) -> GameboxResult<()> {
        target::write_target(&self.root, target)
    }

    // =========================================================================
    // Cover art
    // =========================================================================

    /// The custom cover art, if any.
    pub fn cover_art(&self) -> GameboxResult<Option<DynamicImage>> {
        self.icon_store.get_icon(&self.root)
    }

    /// Set the cover art, or remove it with `None`.
    pub fn set_cover_art(&mut self, art: Option<&DynamicImage>) -> GameboxResult<()> {
        self.icon_store.set_icon(&self.root, art)?;
        tracing::info!(
            path = %self.root.display(),
            cleared = art.is_none(),
            "Updated cover art"
        );
        Ok(())
    }
}

impl fmt::Debug for Gamebox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gamebox")
            .field("root", &self.root)
            .field("config", &self.config)
            .field("documentation", &self.documentation)
            .field("executables", &self.executables)
            .field("game_info", &self.game_info)
            .finish_non_exhaustive()
    }
}

/// Make `path` absolute and resolve `.` and `..` lexically.
///
/// Symlinks are kept, so a linked gamebox is opened under the name it was
/// given.
fn absolute(path: &Path) -> GameboxResult<PathBuf> {
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(path))
            .map_err(|e| GameboxError::invalid_package(path, e.to_string()))?
    };

    let mut normalized = PathBuf::new();
    for component in joined.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                normalized.pop();
            }
            other => normalized.push(other.as_os_str()),
        }
    }
    Ok(normalized)
}

fn is_same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}
