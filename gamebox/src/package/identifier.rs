//! Game identifier computation.
//!
//! A gamebox is identified either by a digest of its executables, so that two
//! copies of the same game share an identity, or by a random UUID when it has
//! no executables to hash.

use std::fmt;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use sha1::{Digest, Sha1};
use uuid::Uuid;

use crate::error::{GameboxError, GameboxResult};

/// Buffer size for reading executables during digest calculation (64KB).
const BUFFER_SIZE: usize = 64 * 1024;

/// The kinds of game identifier a gamebox can have.
///
/// The discriminants are persisted in the game info record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum GameIdentifierType {
    /// No identifier.
    None = 0,
    /// Random UUID, used for gameboxes without executables.
    Uuid = 1,
    /// Digest of every executable in the gamebox.
    ExecutableDigest = 2,
}

impl GameIdentifierType {
    /// Persisted numeric value.
    pub fn as_i64(self) -> i64 {
        self as i64
    }

    /// Decode a persisted numeric value.
    pub fn from_i64(value: i64) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::Uuid),
            2 => Some(Self::ExecutableDigest),
            _ => None,
        }
    }
}

impl fmt::Display for GameIdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => write!(f, "none"),
            Self::Uuid => write!(f, "uuid"),
            Self::ExecutableDigest => write!(f, "executable-digest"),
        }
    }
}

/// A game identifier together with how it was produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameIdentifier {
    pub value: String,
    pub identifier_type: GameIdentifierType,
}

impl GameIdentifier {
    /// Generate a fresh random identifier.
    pub fn generate_uuid() -> Self {
        Self {
            value: Uuid::new_v4().to_string(),
            identifier_type: GameIdentifierType::Uuid,
        }
    }

    /// Compute an identifier for a set of executables.
    ///
    /// With no executables this falls back to [`GameIdentifier::generate_uuid`].
    pub fn for_executables(executables: &[PathBuf]) -> GameboxResult<Self> {
        if executables.is_empty() {
            return Ok(Self::generate_uuid());
        }

        Ok(Self {
            value: executables_digest(executables)?,
            identifier_type: GameIdentifierType::ExecutableDigest,
        })
    }
}

/// Calculate the SHA-1 digest of a set of executables.
///
/// The contents of each file are fed to a single hasher in path-sorted order,
/// so the result does not depend on the order the paths were discovered in.
///
/// # Returns
///
/// The lowercase hexadecimal digest.
///
/// # Errors
///
/// Returns an error if any file cannot be read.
pub fn executables_digest(executables: &[PathBuf]) -> GameboxResult<String> {
    let mut sorted: Vec<&PathBuf> = executables.iter().collect();
    sorted.sort();

    let mut hasher = Sha1::new();
    let mut buffer = vec![0u8; BUFFER_SIZE];

    for path in sorted {
        hash_file(&mut hasher, path, &mut buffer)?;
    }

    Ok(format!("{:x}", hasher.finalize()))
}

fn hash_file(hasher: &mut Sha1, path: &Path, buffer: &mut [u8]) -> GameboxResult<()> {
    let mut file = File::open(path).map_err(|e| GameboxError::ReadFailed {
        path: path.to_path_buf(),
        source: e,
    })?;

    loop {
        let bytes_read = file.read(buffer).map_err(|e| GameboxError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        if bytes_read == 0 {
            break;
        }

        hasher.update(&buffer[..bytes_read]);
    }

    Ok(())
}
