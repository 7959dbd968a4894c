//! Formatting configuration.
//!
//! `defaults/phpini.default.toml` is embedded into the binary so that docs and runtime
//! behavior stay in sync. Callers layer user-specific files on top of those defaults via
//! [`Loader`] before deserializing into [`PhpIniConfig`]. The binary layers the per-user file
//! from [`user_config_path`] when it exists, then any `--config` file.
//!
//! The knobs only affect lines the library writes itself (appended declarations and
//! declarations that are commented out for the first time). Lines read from a file keep
//! their own layout.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::ini::LineEnding;

const DEFAULT_TOML: &str = include_str!("../defaults/phpini.default.toml");

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct PhpIniConfig {
    pub format: FormatConfig,
}

/// How new and re-commented lines are written.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FormatConfig {
    pub setting_separator: String,
    pub extension_separator: String,
    pub comment_marker: String,
    pub line_ending: LineEndingPolicy,
}

impl Default for FormatConfig {
    fn default() -> Self {
        FormatConfig {
            setting_separator: " = ".to_string(),
            extension_separator: "=".to_string(),
            comment_marker: ";".to_string(),
            line_ending: LineEndingPolicy::Auto,
        }
    }
}

/// Terminator used for lines added to a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineEndingPolicy {
    /// Follow the first terminator found in the source, `\n` if there is none.
    #[default]
    Auto,
    Lf,
    Crlf,
}

impl LineEndingPolicy {
    /// Resolve the policy against the terminator detected in a source file.
    pub fn resolve(self, detected: Option<LineEnding>) -> LineEnding {
        match self {
            LineEndingPolicy::Auto => detected.unwrap_or(LineEnding::Lf),
            LineEndingPolicy::Lf => LineEnding::Lf,
            LineEndingPolicy::Crlf => LineEnding::CrLf,
        }
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<PhpIniConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Per-user configuration file: `phpini/config.toml` under the platform config directory.
///
/// `%APPDATA%` on Windows, `$XDG_CONFIG_HOME` or `~/.config` elsewhere. `None` when the
/// environment names no such directory.
pub fn user_config_path() -> Option<PathBuf> {
    user_config_dir().map(|dir| dir.join("phpini").join("config.toml"))
}

#[cfg(windows)]
fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("APPDATA").map(PathBuf::from)
}

#[cfg(not(windows))]
fn user_config_dir() -> Option<PathBuf> {
    std::env::var_os("XDG_CONFIG_HOME")
        .filter(|dir| !dir.is_empty())
        .map(PathBuf::from)
        .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
}
