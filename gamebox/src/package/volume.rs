//! Drive volumes bundled inside a gamebox.
//!
//! A volume is a top-level entry of the gamebox that gets mounted as an extra
//! DOS drive. Folders are tagged by extension (`C.harddisk`, `Disc 1.cdrom`,
//! `Boot.floppy`); disc and floppy images are recognized by their image
//! format.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The kinds of drive a volume can be mounted as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum VolumeType {
    HardDisk,
    CdRom,
    Floppy,
}

const HARD_DISK_FOLDER_EXTENSIONS: &[&str] = &["harddisk"];
const CD_ROM_FOLDER_EXTENSIONS: &[&str] = &["cdrom"];
const CD_ROM_IMAGE_EXTENSIONS: &[&str] = &["iso", "cue", "cdr", "toast"];
const FLOPPY_FOLDER_EXTENSIONS: &[&str] = &["floppy"];
const FLOPPY_IMAGE_EXTENSIONS: &[&str] = &["img", "ima", "vfd"];

impl VolumeType {
    /// All volume types.
    pub const ALL: [VolumeType; 3] = [VolumeType::HardDisk, VolumeType::CdRom, VolumeType::Floppy];

    /// Classify a volume candidate.
    ///
    /// `is_dir` selects between the folder and image extension tables, so a
    /// folder named `disc.iso` is not treated as a disc image.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::Path;
    /// use gamebox::package::VolumeType;
    ///
    /// assert_eq!(VolumeType::classify(Path::new("C.harddisk"), true), Some(VolumeType::HardDisk));
    /// assert_eq!(VolumeType::classify(Path::new("Disc 1.ISO"), false), Some(VolumeType::CdRom));
    /// assert_eq!(VolumeType::classify(Path::new("KEEN4.EXE"), false), None);
    /// ```
    pub fn classify(path: &Path, is_dir: bool) -> Option<Self> {
        let ext = path.extension()?.to_string_lossy().to_lowercase();
        let ext = ext.as_str();

        if is_dir {
            if HARD_DISK_FOLDER_EXTENSIONS.contains(&ext) {
                Some(Self::HardDisk)
            } else if CD_ROM_FOLDER_EXTENSIONS.contains(&ext) {
                Some(Self::CdRom)
            } else if FLOPPY_FOLDER_EXTENSIONS.contains(&ext) {
                Some(Self::Floppy)
            } else {
                None
            }
        } else if CD_ROM_IMAGE_EXTENSIONS.contains(&ext) {
            Some(Self::CdRom)
        } else if FLOPPY_IMAGE_EXTENSIONS.contains(&ext) {
            Some(Self::Floppy)
        } else {
            None
        }
    }
}

impl fmt::Display for VolumeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HardDisk => write!(f, "hard disk"),
            Self::CdRom => write!(f, "CD-ROM"),
            Self::Floppy => write!(f, "floppy"),
        }
    }
}

/// A discovered volume.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Volume {
    pub path: PathBuf,
    pub volume_type: VolumeType,
}

/// Scan the top level of `root` for volumes of the requested types.
///
/// Results are sorted by path. Read errors yield an empty list.
pub fn scan_volumes(root: &Path, types: &HashSet<VolumeType>) -> Vec<Volume> {
    if types.is_empty() {
        return Vec::new();
    }

    let entries = match fs::read_dir(root) {
        Ok(entries) => entries,
        Err(e) => {
            tracing::debug!(path = %root.display(), error = %e, "Failed to scan for volumes");
            return Vec::new();
        }
    };

    let mut volumes: Vec<Volume> = entries
        .flatten()
        .filter_map(|entry| {
            let path = entry.path();
            // Follows symlinks so aliased drive folders still count
            let is_dir = path.is_dir();
            VolumeType::classify(&path, is_dir)
                .filter(|t| types.contains(t))
                .map(|volume_type| Volume { path, volume_type })
        })
        .collect();

    volumes.sort_by(|a, b| a.path.cmp(&b.path));
    volumes
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn all_types() -> HashSet<VolumeType> {
        VolumeType::ALL.into_iter().collect()
    }

    #[test]
    fn test_classify_folders() {
        assert_eq!(
            VolumeType::classify(Path::new("D.CDROM"), true),
            Some(VolumeType::CdRom)
        );
        assert_eq!(
            VolumeType::classify(Path::new("A.floppy"), true),
            Some(VolumeType::Floppy)
        );
        assert_eq!(VolumeType::classify(Path::new("Saves"), true), None);
        // Image extensions only count for files
        assert_eq!(VolumeType::classify(Path::new("odd.iso"), true), None);
        assert_eq!(VolumeType::classify(Path::new("odd.harddisk"), false), None);
    }

    #[test]
    fn test_classify_images() {
        assert_eq!(
            VolumeType::classify(Path::new("game.cue"), false),
            Some(VolumeType::CdRom)
        );
        assert_eq!(
            VolumeType::classify(Path::new("disk1.IMA"), false),
            Some(VolumeType::Floppy)
        );
    }

    #[test]
    fn test_scan_volumes_filters_and_sorts() {
        let temp = TempDir::new().unwrap();
        let root = temp.path();
        fs::create_dir(root.join("D.harddisk")).unwrap();
        fs::create_dir(root.join("C.harddisk")).unwrap();
        fs::create_dir(root.join("Disc.cdrom")).unwrap();
        fs::write(root.join("Disc 2.iso"), b"").unwrap();
        fs::write(root.join("Boot.img"), b"").unwrap();
        fs::write(root.join("KEEN4.EXE"), b"").unwrap();

        let all = scan_volumes(root, &all_types());
        assert_eq!(all.len(), 5);

        let hdd = scan_volumes(root, &HashSet::from([VolumeType::HardDisk]));
        let names: Vec<_> = hdd
            .iter()
            .map(|v| v.path.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["C.harddisk", "D.harddisk"]);

        let cd = scan_volumes(root, &HashSet::from([VolumeType::CdRom]));
        assert_eq!(cd.len(), 2);
        assert!(cd.iter().all(|v| v.volume_type == VolumeType::CdRom));
    }

    #[test]
    fn test_scan_volumes_missing_root() {
        let volumes = scan_volumes(Path::new("/nonexistent/Keen.boxer"), &all_types());
        assert!(volumes.is_empty());
    }

    #[test]
    fn test_scan_volumes_no_types() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("C.harddisk")).unwrap();
        assert!(scan_volumes(temp.path(), &HashSet::new()).is_empty());
    }
}
