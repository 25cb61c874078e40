//! Discovery rules for gamebox packages.
//!
//! [`GameboxConfig`] decides which directories count as gameboxes and which
//! files inside them are reported as documentation or executables. Defaults
//! cover the usual DOS conventions; an optional INI file can override them:
//!
//! ```ini
//! [package]
//! extension = boxer
//!
//! [documentation]
//! extensions = txt, pdf, html
//! exclusions = install*, license*
//!
//! [executables]
//! extensions = exe, com, bat
//! exclusions = setup*, dos4gw.exe
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

/// Errors raised while loading a configuration file.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or parsed.
    #[error("failed to load config {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// A key holds a value we cannot use.
    #[error("invalid value for [{section}] {key}: {reason}")]
    InvalidValue {
        section: String,
        key: String,
        reason: String,
    },
}

/// Default gamebox folder extension.
pub const DEFAULT_PACKAGE_EXTENSION: &str = "boxer";

const DEFAULT_DOCUMENTATION_EXTENSIONS: &[&str] = &[
    "txt", "text", "doc", "docx", "rtf", "pdf", "htm", "html", "md", "me", "1st", "nfo", "diz",
    "jpg", "jpeg", "png", "gif",
];

const DEFAULT_DOCUMENTATION_EXCLUSIONS: &[&str] = &[
    "install*",
    "setup*",
    "order*",
    "vendor*",
    "license*",
    "copying*",
    "dosbox*",
    "file_id.diz",
];

const DEFAULT_EXECUTABLE_EXTENSIONS: &[&str] = &["exe", "com", "bat"];

const DEFAULT_EXECUTABLE_EXCLUSIONS: &[&str] = &[
    "install*",
    "setup*",
    "uninst*",
    "unins000.exe",
    "dos4gw.exe",
    "dos32a.exe",
    "pmodew.exe",
    "cwsdpmi.exe",
    "pkunzip.exe",
    "pkzip.exe",
    "unzip.exe",
    "lha.exe",
    "arj.exe",
    "autoexec.bat",
];

fn owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}

/// Configuration for gamebox discovery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameboxConfig {
    /// Folder extension that marks a directory as a gamebox.
    ///
    /// Compared case-insensitively, without the leading dot.
    pub package_extension: String,

    /// File extensions recognized as documentation.
    pub documentation_extensions: Vec<String>,

    /// Filename globs excluded from documentation results.
    pub documentation_exclusions: Vec<String>,

    /// File extensions recognized as DOS executables.
    pub executable_extensions: Vec<String>,

    /// Filename globs excluded from executable results.
    ///
    /// Installers, uninstallers, DOS extenders and archivers are never useful
    /// launch targets.
    pub executable_exclusions: Vec<String>,
}

impl Default for GameboxConfig {
    fn default() -> Self {
        Self {
            package_extension: DEFAULT_PACKAGE_EXTENSION.to_string(),
            documentation_extensions: owned(DEFAULT_DOCUMENTATION_EXTENSIONS),
            documentation_exclusions: owned(DEFAULT_DOCUMENTATION_EXCLUSIONS),
            executable_extensions: owned(DEFAULT_EXECUTABLE_EXTENSIONS),
            executable_exclusions: owned(DEFAULT_EXECUTABLE_EXCLUSIONS),
        }
    }
}

impl GameboxConfig {
    /// Default location of the user configuration file.
    ///
    /// `<config dir>/gamebox/config.ini`, or `None` when the platform has no
    /// configuration directory.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("gamebox").join("config.ini"))
    }

    /// Load configuration from an INI file, starting from the defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|e| ConfigError::Load {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Self::from_ini(&ini)
    }

    /// Load the user configuration if present, otherwise return the defaults.
    pub fn load_or_default() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(section) = ini.section(Some("package")) {
            if let Some(v) = section.get("extension") {
                let v = v.trim().trim_start_matches('.');
                if v.is_empty() {
                    return Err(ConfigError::InvalidValue {
                        section: "package".to_string(),
                        key: "extension".to_string(),
                        reason: "must not be empty".to_string(),
                    });
                }
                config.package_extension = v.to_lowercase();
            }
        }

        if let Some(section) = ini.section(Some("documentation")) {
            if let Some(v) = section.get("extensions") {
                config.documentation_extensions = parse_extensions(v);
            }
            if let Some(v) = section.get("exclusions") {
                config.documentation_exclusions = parse_list(v);
            }
        }

        if let Some(section) = ini.section(Some("executables")) {
            if let Some(v) = section.get("extensions") {
                config.executable_extensions = parse_extensions(v);
            }
            if let Some(v) = section.get("exclusions") {
                config.executable_exclusions = parse_list(v);
            }
        }

        for pattern in config
            .documentation_exclusions
            .iter()
            .chain(config.executable_exclusions.iter())
        {
            if let Err(e) = glob::Pattern::new(pattern) {
                return Err(ConfigError::InvalidValue {
                    section: "exclusions".to_string(),
                    key: pattern.clone(),
                    reason: e.to_string(),
                });
            }
        }

        Ok(config)
    }

    /// Set the package folder extension.
    pub fn with_package_extension(mut self, extension: impl Into<String>) -> Self {
        self.package_extension = extension
            .into()
            .trim_start_matches('.')
            .to_lowercase();
        self
    }

    /// Add a documentation file extension.
    pub fn with_documentation_extension(mut self, extension: impl Into<String>) -> Self {
        self.documentation_extensions
            .push(extension.into().to_lowercase());
        self
    }

    /// Add a documentation exclusion glob.
    pub fn with_documentation_exclusion(mut self, pattern: impl Into<String>) -> Self {
        self.documentation_exclusions.push(pattern.into());
        self
    }

    /// Add an executable exclusion glob.
    pub fn with_executable_exclusion(mut self, pattern: impl Into<String>) -> Self {
        self.executable_exclusions.push(pattern.into());
        self
    }

    /// Replace the executable exclusion globs.
    pub fn with_executable_exclusions(mut self, patterns: Vec<String>) -> Self {
        self.executable_exclusions = patterns;
        self
    }
}

fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_extensions(value: &str) -> Vec<String> {
    parse_list(value)
        .into_iter()
        .map(|v| v.trim_start_matches('.').to_lowercase())
        .collect()
}
