//! Best-effort file discovery inside a gamebox.
//!
//! Scans never fail: unreadable directories and entries are logged and
//! skipped, so callers see fewer results rather than an error.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};
use walkdir::{DirEntry, WalkDir};

use super::naming::is_reserved_name;
use crate::error::{GameboxError, GameboxResult};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: false,
    require_literal_separator: false,
    require_literal_leading_dot: false,
};

/// Selects files by extension and rejects names matching exclusion globs.
#[derive(Debug, Clone)]
pub struct FileFilter {
    extensions: Vec<String>,
    exclusions: Vec<Pattern>,
}

impl FileFilter {
    /// Build a filter from extension and glob lists.
    ///
    /// # Errors
    ///
    /// Returns [`GameboxError::InvalidConfig`] if a glob does not compile.
    pub fn new(extensions: &[String], exclusions: &[String]) -> GameboxResult<Self> {
        let exclusions = exclusions
            .iter()
            .map(|p| {
                Pattern::new(p).map_err(|e| {
                    GameboxError::InvalidConfig(format!("bad exclusion pattern '{}': {}", p, e))
                })
            })
            .collect::<GameboxResult<Vec<_>>>()?;

        Ok(Self {
            extensions: extensions.iter().map(|e| e.to_lowercase()).collect(),
            exclusions,
        })
    }

    /// Whether a file path passes the filter.
    ///
    /// Only the file name is considered.
    pub fn matches(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().map(|n| n.to_string_lossy()) else {
            return false;
        };

        if is_reserved_name(&name) {
            return false;
        }

        let has_extension = path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .is_some_and(|e| self.extensions.contains(&e));
        if !has_extension {
            return false;
        }

        !self
            .exclusions
            .iter()
            .any(|p| p.matches_with(&name, MATCH_OPTIONS))
    }
}

/// Recursively collect every regular file under `root` accepted by `filter`.
///
/// Symlinks are not followed, so the target symlink and any links out of the
/// gamebox are never reported. Hidden files and folders are skipped. Results
/// are sorted by path.
pub fn scan_files(root: &Path, filter: &FileFilter) -> Vec<PathBuf> {
    let mut found = Vec::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| e.depth() == 0 || !is_hidden(e));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                tracing::debug!(root = %root.display(), error = %e, "Skipping unreadable entry");
                continue;
            }
        };

        if entry.file_type().is_file() && filter.matches(entry.path()) {
            found.push(entry.into_path());
        }
    }

    found.sort();
    found
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry.file_name().to_string_lossy().starts_with('.')
}
