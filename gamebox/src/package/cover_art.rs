//! Cover art stored as the gamebox's folder icon.
//!
//! Cover art is not a regular file the game knows about: it is whatever icon
//! the desktop shows for the gamebox folder. [`IconStore`] abstracts the
//! platform's icon association so other mechanisms can be plugged in;
//! [`DesktopEntryIconStore`] implements the freedesktop convention of a
//! `.directory` file whose `Icon=` key names an image.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat};
use ini::Ini;

use crate::error::{GameboxError, GameboxResult};

/// Largest edge, in pixels, of stored cover art.
pub const MAX_COVER_ART_SIZE: u32 = 512;

/// Read and write the icon associated with a folder.
pub trait IconStore {
    /// The icon currently associated with `folder`, if any.
    fn get_icon(&self, folder: &Path) -> GameboxResult<Option<DynamicImage>>;

    /// Associate `icon` with `folder`, or remove the association for `None`.
    fn set_icon(&self, folder: &Path, icon: Option<&DynamicImage>) -> GameboxResult<()>;
}

/// Desktop entry file that carries folder metadata.
const DESKTOP_ENTRY_FILE: &str = ".directory";
const DESKTOP_ENTRY_SECTION: &str = "Desktop Entry";
const ICON_KEY: &str = "Icon";
/// Image written next to the desktop entry.
const ICON_FILE: &str = ".gamebox-icon.png";

/// Folder icons via freedesktop `.directory` entries.
///
/// Other keys in an existing `.directory` file are preserved.
#[derive(Debug, Clone, Copy, Default)]
pub struct DesktopEntryIconStore;

impl DesktopEntryIconStore {
    pub fn new() -> Self {
        Self
    }

    fn load_entry(path: &Path) -> GameboxResult<Option<Ini>> {
        if !path.exists() {
            return Ok(None);
        }
        Ini::load_from_file(path)
            .map(Some)
            .map_err(|e| GameboxError::IconFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    fn icon_reference(folder: &Path) -> GameboxResult<Option<PathBuf>> {
        let entry_path = folder.join(DESKTOP_ENTRY_FILE);
        let Some(entry) = Self::load_entry(&entry_path)? else {
            return Ok(None);
        };

        let icon = entry
            .section(Some(DESKTOP_ENTRY_SECTION))
            .and_then(|s| s.get(ICON_KEY))
            .map(str::trim)
            .filter(|v| !v.is_empty());

        Ok(icon.map(|icon| {
            let icon = Path::new(icon);
            if icon.is_absolute() {
                icon.to_path_buf()
            } else {
                folder.join(icon)
            }
        }))
    }

    fn clear(folder: &Path) -> GameboxResult<()> {
        let entry_path = folder.join(DESKTOP_ENTRY_FILE);
        if let Some(mut entry) = Self::load_entry(&entry_path)? {
            if let Some(section) = entry.section_mut(Some(DESKTOP_ENTRY_SECTION)) {
                section.remove(ICON_KEY);
            }

            let now_empty = entry.iter().all(|(_, props)| props.iter().next().is_none());
            if now_empty {
                remove_if_present(&entry_path)?;
            } else {
                entry
                    .write_to_file(&entry_path)
                    .map_err(|e| GameboxError::WriteFailed {
                        path: entry_path.clone(),
                        source: e,
                    })?;
            }
        }

        remove_if_present(&folder.join(ICON_FILE))
    }
}

impl IconStore for DesktopEntryIconStore {
    fn get_icon(&self, folder: &Path) -> GameboxResult<Option<DynamicImage>> {
        let Some(icon_path) = Self::icon_reference(folder)? else {
            return Ok(None);
        };

        if !icon_path.is_file() {
            tracing::debug!(icon = %icon_path.display(), "Folder icon is missing");
            return Ok(None);
        }

        image::open(&icon_path)
            .map(Some)
            .map_err(|e| GameboxError::IconFailed {
                path: icon_path,
                reason: e.to_string(),
            })
    }

    fn set_icon(&self, folder: &Path, icon: Option<&DynamicImage>) -> GameboxResult<()> {
        let Some(icon) = icon else {
            return Self::clear(folder);
        };

        let icon_path = folder.join(ICON_FILE);
        fit_cover_art(icon)
            .save_with_format(&icon_path, ImageFormat::Png)
            .map_err(|e| GameboxError::IconFailed {
                path: icon_path.clone(),
                reason: e.to_string(),
            })?;

        let entry_path = folder.join(DESKTOP_ENTRY_FILE);
        let mut entry = Self::load_entry(&entry_path)?.unwrap_or_else(Ini::new);
        entry
            .with_section(Some(DESKTOP_ENTRY_SECTION))
            .set(ICON_KEY, format!("./{}", ICON_FILE));
        entry
            .write_to_file(&entry_path)
            .map_err(|e| GameboxError::WriteFailed {
                path: entry_path,
                source: e,
            })?;

        Ok(())
    }
}

/// Downscale cover art so neither edge exceeds [`MAX_COVER_ART_SIZE`].
///
/// Aspect ratio is preserved and smaller images are left alone.
pub fn fit_cover_art(image: &DynamicImage) -> DynamicImage {
    if image.width() <= MAX_COVER_ART_SIZE && image.height() <= MAX_COVER_ART_SIZE {
        return image.clone();
    }
    image.resize(MAX_COVER_ART_SIZE, MAX_COVER_ART_SIZE, FilterType::Lanczos3)
}

fn remove_if_present(path: &Path) -> GameboxResult<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(GameboxError::RemoveFailed {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}
