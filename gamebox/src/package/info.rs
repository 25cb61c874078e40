//! The persisted game info record.
//!
//! Every gamebox carries a flat key/value record (`Game Info.json`) describing
//! the game: its identifier, the identifier's type, and anything else a front
//! end wants to remember. Values are scalars only.

use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{GameboxError, GameboxResult};

/// A scalar value stored in the game info record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GameInfoValue {
    Bool(bool),
    Integer(i64),
    Float(f64),
    String(String),
}

impl GameInfoValue {
    /// The value as a string slice, if it is a string.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// The value as an integer, if it is one.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Integer(n) => Some(*n),
            _ => None,
        }
    }

    /// Parse a command-line style literal.
    ///
    /// `true`/`false` become booleans, whole numbers integers, other numbers
    /// floats; anything else is kept as a string.
    ///
    /// ```
    /// use gamebox::package::GameInfoValue;
    ///
    /// assert_eq!(GameInfoValue::parse_literal("42"), GameInfoValue::Integer(42));
    /// assert_eq!(GameInfoValue::parse_literal("true"), GameInfoValue::Bool(true));
    /// assert_eq!(GameInfoValue::parse_literal("Keen"), GameInfoValue::String("Keen".into()));
    /// ```
    pub fn parse_literal(text: &str) -> Self {
        match text {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        if let Ok(n) = text.parse::<i64>() {
            return Self::Integer(n);
        }
        if let Ok(f) = text.parse::<f64>() {
            if f.is_finite() {
                return Self::Float(f);
            }
        }
        Self::String(text.to_string())
    }
}

impl fmt::Display for GameInfoValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{}", b),
            Self::Integer(n) => write!(f, "{}", n),
            Self::Float(x) => write!(f, "{}", x),
            Self::String(s) => f.write_str(s),
        }
    }
}

impl From<&str> for GameInfoValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for GameInfoValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for GameInfoValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<f64> for GameInfoValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for GameInfoValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

/// The game info record, bound to its sidecar file.
///
/// Mutations write through to disk immediately; there is no separate save
/// step.
#[derive(Debug, Clone)]
pub struct GameInfo {
    path: PathBuf,
    entries: BTreeMap<String, GameInfoValue>,
}

impl GameInfo {
    /// Load the record at `path`.
    ///
    /// A missing file yields an empty record. A file that is not a JSON object
    /// is reported as [`GameboxError::MetadataParseFailed`]. Individual
    /// entries that are not scalars (`null`, arrays, objects) are skipped with
    /// a warning so one bad value cannot cost the rest of the record.
    pub fn load(path: impl Into<PathBuf>) -> GameboxResult<Self> {
        let path = path.into();
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::empty(path)),
            Err(e) => {
                return Err(GameboxError::ReadFailed {
                    path: path.clone(),
                    source: e,
                })
            }
        };
        if text.trim().is_empty() {
            return Ok(Self::empty(path));
        }

        let raw: serde_json::Map<String, serde_json::Value> = serde_json::from_str(&text)
            .map_err(|e| GameboxError::MetadataParseFailed {
                path: path.clone(),
                reason: e.to_string(),
            })?;

        let mut entries = BTreeMap::new();
        for (key, value) in raw {
            match serde_json::from_value::<GameInfoValue>(value) {
                Ok(value) => {
                    entries.insert(key, value);
                }
                Err(_) => {
                    tracing::warn!(path = %path.display(), key = %key, "Skipping non-scalar game info value");
                }
            }
        }

        Ok(Self { path, entries })
    }

    /// An empty record that will be written to `path` on first change.
    pub fn empty(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&GameInfoValue> {
        self.entries.get(key)
    }

    /// All entries, ordered by key.
    pub fn entries(&self) -> &BTreeMap<String, GameInfoValue> {
        &self.entries
    }

    /// Number of entries in the record.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the record has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Set a value and flush the record.
    ///
    /// The record in memory only changes once the file has been written.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<GameInfoValue>) -> GameboxResult<()> {
        self.set_many([(key, value)])
    }

    /// Set several values with a single flush.
    ///
    /// # Errors
    ///
    /// Returns [`GameboxError::InvalidValue`] for non-finite floats, which
    /// JSON cannot represent, and a write error if the record cannot be
    /// saved. Either way the record is left as it was.
    pub fn set_many<I, K, V>(&mut self, values: I) -> GameboxResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<GameInfoValue>,
    {
        let mut updated = self.entries.clone();
        for (key, value) in values {
            let key = key.into();
            let value = value.into();
            if let GameInfoValue::Float(x) = value {
                if !x.is_finite() {
                    return Err(GameboxError::InvalidValue {
                        key,
                        reason: format!("{} cannot be stored", x),
                    });
                }
            }
            updated.insert(key, value);
        }

        write_entries(&self.path, &updated)?;
        self.entries = updated;
        Ok(())
    }

    /// Remove a value and flush the record.
    ///
    /// Returns the removed value, if any. Nothing is written when the key
    /// was absent.
    pub fn remove(&mut self, key: &str) -> GameboxResult<Option<GameInfoValue>> {
        if !self.entries.contains_key(key) {
            return Ok(None);
        }

        let mut updated = self.entries.clone();
        let removed = updated.remove(key);
        write_entries(&self.path, &updated)?;
        self.entries = updated;
        Ok(removed)
    }
}

fn write_entries(path: &Path, entries: &BTreeMap<String, GameInfoValue>) -> GameboxResult<()> {
    let text = serde_json::to_string_pretty(entries).map_err(|e| {
        GameboxError::MetadataParseFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        }
    })?;

    // Sibling temp file, then rename over the record
    let temp_path = path.with_extension("json.tmp");
    if let Err(e) = fs::write(&temp_path, text) {
        let _ = fs::remove_file(&temp_path);
        return Err(GameboxError::WriteFailed {
            path: temp_path,
            source: e,
        });
    }
    if let Err(e) = fs::rename(&temp_path, path) {
        let _ = fs::remove_file(&temp_path);
        return Err(GameboxError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        });
    }

    tracing::trace!(path = %path.display(), entries = entries.len(), "Saved game info");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_is_empty() {
        let temp = TempDir::new().unwrap();
        let info = GameInfo::load(temp.path().join("Game Info.json")).unwrap();
        assert!(info.is_empty());
    }

    #[test]
    fn test_set_writes_through() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Game Info.json");

        let mut info = GameInfo::load(&path).unwrap();
        info.set("publisher", "id Software").unwrap();
        info.set("year", 1991i64).unwrap();

        let reloaded = GameInfo::load(&path).unwrap();
        assert_eq!(
            reloaded.get("publisher"),
            Some(&GameInfoValue::String("id Software".to_string()))
        );
        assert_eq!(reloaded.get("year").and_then(|v| v.as_i64()), Some(1991));
        assert!(!temp.path().join("Game Info.json.tmp").exists());
    }

    #[test]
    fn test_remove() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Game Info.json");

        let mut info = GameInfo::load(&path).unwrap();
        info.set("key", "value").unwrap();
        assert_eq!(info.remove("key").unwrap(), Some(GameInfoValue::from("value")));
        assert_eq!(info.remove("key").unwrap(), None);

        let reloaded = GameInfo::load(&path).unwrap();
        assert!(reloaded.get("key").is_none());
    }

    #[test]
    fn test_scalar_types_survive_reload() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Game Info.json");

        let mut info = GameInfo::load(&path).unwrap();
        info.set_many([
            ("flag", GameInfoValue::Bool(true)),
            ("count", GameInfoValue::Integer(-3)),
            ("ratio", GameInfoValue::Float(1.5)),
            ("name", GameInfoValue::from("Keen")),
        ])
        .unwrap();

        let reloaded = GameInfo::load(&path).unwrap();
        assert_eq!(reloaded.get("flag"), Some(&GameInfoValue::Bool(true)));
        assert_eq!(reloaded.get("count"), Some(&GameInfoValue::Integer(-3)));
        assert_eq!(reloaded.get("ratio"), Some(&GameInfoValue::Float(1.5)));
        assert_eq!(reloaded.get("name").and_then(|v| v.as_str()), Some("Keen"));
    }

    #[test]
    fn test_corrupt_record_is_an_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Game Info.json");
        fs::write(&path, "{ not json").unwrap();

        let result = GameInfo::load(&path);
        assert!(matches!(
            result,
            Err(GameboxError::MetadataParseFailed { .. })
        ));
    }

    #[test]
    fn test_non_finite_float_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Game Info.json");

        let mut info = GameInfo::load(&path).unwrap();
        info.set("gameIdentifier", "abc").unwrap();

        let result = info.set_many([
            ("rating", GameInfoValue::Integer(5)),
            ("ratio", GameInfoValue::Float(f64::NAN)),
        ]);
        assert!(matches!(result, Err(GameboxError::InvalidValue { .. })));
        assert!(info.set("ratio", f64::INFINITY).is_err());
        assert!(info.get("rating").is_none());
        assert!(info.get("ratio").is_none());

        let reloaded = GameInfo::load(&path).unwrap();
        assert_eq!(reloaded.get("gameIdentifier").and_then(|v| v.as_str()), Some("abc"));
        assert_eq!(reloaded.len(), 1);
    }

    #[test]
    fn test_non_scalar_entries_are_skipped_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Game Info.json");
        fs::write(
            &path,
            r#"{"gameIdentifier": "abc", "ratio": null, "tags": ["dos"], "year": 1991}"#,
        )
        .unwrap();

        let info = GameInfo::load(&path).unwrap();
        assert_eq!(info.get("gameIdentifier").and_then(|v| v.as_str()), Some("abc"));
        assert_eq!(info.get("year").and_then(|v| v.as_i64()), Some(1991));
        assert!(info.get("ratio").is_none());
        assert!(info.get("tags").is_none());
    }

    #[test]
    fn test_failed_write_leaves_record_unchanged() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("Game Info.json");

        let mut info = GameInfo::load(&path).unwrap();
        info.set("publisher", "id Software").unwrap();

        // A non-empty directory in place of the record makes the rename fail
        fs::remove_file(&path).unwrap();
        fs::create_dir(&path).unwrap();
        fs::write(path.join("blocker"), b"").unwrap();

        assert!(matches!(
            info.set("year", 1991i64),
            Err(GameboxError::WriteFailed { .. })
        ));
        assert!(info.get("year").is_none());
        assert!(matches!(
            info.remove("publisher"),
            Err(GameboxError::WriteFailed { .. })
        ));
        assert_eq!(info.get("publisher").and_then(|v| v.as_str()), Some("id Software"));
        assert!(!temp.path().join("Game Info.json.tmp").exists());
    }

    #[test]
    fn test_parse_literal() {
        assert_eq!(GameInfoValue::parse_literal("false"), GameInfoValue::Bool(false));
        assert_eq!(GameInfoValue::parse_literal("-7"), GameInfoValue::Integer(-7));
        assert_eq!(GameInfoValue::parse_literal("2.5"), GameInfoValue::Float(2.5));
        assert_eq!(
            GameInfoValue::parse_literal("1.0.0"),
            GameInfoValue::String("1.0.0".to_string())
        );
        assert_eq!(
            GameInfoValue::parse_literal("nan"),
            GameInfoValue::String("nan".to_string())
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(GameInfoValue::from("x").to_string(), "x");
        assert_eq!(GameInfoValue::Integer(2).to_string(), "2");
        assert_eq!(GameInfoValue::Bool(true).to_string(), "true");
    }
}
