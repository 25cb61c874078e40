//! Target executable symlink management.
//!
//! The program a gamebox launches by default is recorded as a symlink named
//! `DOSBox Target` at the gamebox root. Targets inside the gamebox are linked
//! relatively so the gamebox can be moved or copied without breaking them.

use std::fs;
#[cfg(unix)]
use std::os::unix::fs::symlink;
use std::path::{Path, PathBuf};

use super::naming::target_symlink_path;
use crate::error::{GameboxError, GameboxResult};

/// Name the replacement link is created under before it is renamed into place.
const STAGING_LINK_NAME: &str = ".DOSBox Target.new";

/// Resolve the target symlink of the gamebox at `root`.
///
/// Returns `None` when no symlink exists, when the entry at that location is
/// not a symlink, or when the symlink no longer points at anything.
pub fn read_target(root: &Path) -> Option<PathBuf> {
    let link_path = target_symlink_path(root);

    let destination = match fs::read_link(&link_path) {
        Ok(destination) => destination,
        Err(_) => return None,
    };

    let resolved = if destination.is_absolute() {
        destination
    } else {
        root.join(destination)
    };

    if resolved.exists() {
        Some(resolved)
    } else {
        tracing::debug!(
            link = %link_path.display(),
            target = %resolved.display(),
            "Target symlink is dangling"
        );
        None
    }
}

/// Point the target symlink of the gamebox at `root` to `target`.
///
/// Any previous target symlink is replaced. `None` removes the symlink.
/// Relative `target` paths are taken relative to `root`.
///
/// The new link is created under a staging name and renamed over the old
/// one, so a failure leaves the previous target in place.
///
/// # Errors
///
/// Returns an error if:
/// - The target does not exist
/// - A real file or directory occupies the symlink location
/// - Creating or renaming the new symlink fails
pub fn write_target(root: &Path, target: Option<&Path>) -> GameboxResult<()> {
    let link_path = target_symlink_path(root);

    let target = match target {
        Some(t) if t.is_absolute() => Some(t.to_path_buf()),
        Some(t) => Some(root.join(t)),
        None => None,
    };

    if let Some(target) = &target {
        if !target.exists() {
            return Err(GameboxError::SymlinkFailed {
                link: link_path,
                target: target.clone(),
                reason: "target does not exist".to_string(),
            });
        }
    }

    let has_link = ensure_replaceable(&link_path, target.as_deref())?;

    let Some(target) = target else {
        if has_link {
            fs::remove_file(&link_path).map_err(|e| GameboxError::RemoveFailed {
                path: link_path.clone(),
                source: e,
            })?;
            tracing::info!(link = %link_path.display(), "Removed target symlink");
        }
        return Ok(());
    };

    let destination = match target.strip_prefix(root) {
        Ok(relative) if !relative.as_os_str().is_empty() => relative.to_path_buf(),
        _ => target.clone(),
    };

    let staging_path = root.join(STAGING_LINK_NAME);
    let link_failed = |reason: String| GameboxError::SymlinkFailed {
        link: link_path.clone(),
        target: target.clone(),
        reason,
    };

    if ensure_replaceable(&staging_path, Some(target.as_path()))? {
        fs::remove_file(&staging_path).map_err(|e| GameboxError::RemoveFailed {
            path: staging_path.clone(),
            source: e,
        })?;
    }

    create_link(&destination, &staging_path).map_err(|e| link_failed(e.to_string()))?;

    if let Err(e) = fs::rename(&staging_path, &link_path) {
        let _ = fs::remove_file(&staging_path);
        return Err(link_failed(e.to_string()));
    }

    tracing::info!(
        link = %link_path.display(),
        target = %target.display(),
        "Updated target symlink"
    );

    Ok(())
}

/// Check that `link_path` is free or holds a symlink.
///
/// Returns whether a symlink is present. Anything that is not a symlink is
/// refused.
fn ensure_replaceable(link_path: &Path, target: Option<&Path>) -> GameboxResult<bool> {
    // symlink_metadata so dangling links are still found
    let metadata = match link_path.symlink_metadata() {
        Ok(metadata) => metadata,
        Err(_) => return Ok(false),
    };

    if !metadata.file_type().is_symlink() {
        return Err(GameboxError::SymlinkFailed {
            link: link_path.to_path_buf(),
            target: target.map(Path::to_path_buf).unwrap_or_default(),
            reason: "a file or directory already exists at the symlink location".to_string(),
        });
    }

    Ok(true)
}

#[cfg(unix)]
fn create_link(destination: &Path, link_path: &Path) -> std::io::Result<()> {
    symlink(destination, link_path)
}

#[cfg(windows)]
fn create_link(destination: &Path, link_path: &Path) -> std::io::Result<()> {
    let parent = link_path.parent().unwrap_or(Path::new("."));
    if parent.join(destination).is_dir() {
        std::os::windows::fs::symlink_dir(destination, link_path)
    } else {
        std::os::windows::fs::symlink_file(destination, link_path)
    }
}
