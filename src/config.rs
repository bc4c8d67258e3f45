use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::changelog::DEFAULT_UNRELEASED_MARKER;
use crate::error::{GitPlusError, Result};

/// Environment variable holding an explicit configuration file path.
pub const CONFIG_ENV: &str = "GITPLUS_CONFIG";

/// File name looked up in the repository root.
pub const CONFIG_FILE_NAME: &str = "gitplus.toml";

/// Represents the complete configuration for gitplus.
///
/// Every section is optional; missing keys fall back to the defaults below.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub files: FilesConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,

    #[serde(default)]
    pub message: MessageConfig,
}

fn default_version_file() -> String {
    "VERSION".to_string()
}

fn default_changelog_file() -> String {
    "CHANGELOG.md".to_string()
}

fn default_note_file() -> String {
    "LAST_COMMIT".to_string()
}

/// Repository-relative names of the files gitplus reads and writes.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FilesConfig {
    #[serde(default = "default_version_file")]
    pub version: String,

    #[serde(default = "default_changelog_file")]
    pub changelog: String,

    /// Commit note used as the message when it changed and no CLI text is given
    #[serde(default = "default_note_file")]
    pub note: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        FilesConfig {
            version: default_version_file(),
            changelog: default_changelog_file(),
            note: default_note_file(),
        }
    }
}

fn default_unreleased_marker() -> String {
    DEFAULT_UNRELEASED_MARKER.to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_unreleased_marker")]
    pub unreleased_marker: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            unreleased_marker: default_unreleased_marker(),
        }
    }
}

fn default_timestamp_format() -> String {
    "%Y-%m-%d %H:%M:%S".to_string()
}

/// Formatting of generated commit messages.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct MessageConfig {
    /// `chrono` strftime pattern for the local timestamp
    #[serde(default = "default_timestamp_format")]
    pub timestamp_format: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        MessageConfig {
            timestamp_format: default_timestamp_format(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Path given in the `GITPLUS_CONFIG` environment variable
/// 2. `gitplus.toml` in the repository root
/// 3. `.gitplus.toml` in the user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `repo_root` - Working directory of the repository
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If a file exists but cannot be read or parsed
pub fn load_config(repo_root: &Path) -> Result<Config> {
    let explicit = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
    match resolve_config_path(explicit, repo_root) {
        Some(path) => load_config_file(&path),
        None => Ok(Config::default()),
    }
}

fn resolve_config_path(explicit: Option<PathBuf>, repo_root: &Path) -> Option<PathBuf> {
    if explicit.is_some() {
        return explicit;
    }

    let local = repo_root.join(CONFIG_FILE_NAME);
    if local.exists() {
        return Some(local);
    }

    dirs::config_dir()
        .map(|dir| dir.join(format!(".{}", CONFIG_FILE_NAME)))
        .filter(|path| path.exists())
}

/// Reads and parses a single configuration file.
pub fn load_config_file(path: &Path) -> Result<Config> {
    let config_str = fs::read_to_string(path).map_err(|e| {
        GitPlusError::config(format!("cannot read {}: {}", path.display(), e))
    })?;

    toml::from_str(&config_str)
        .map_err(|e| GitPlusError::config(format!("cannot parse {}: {}", path.display(), e)))
}
