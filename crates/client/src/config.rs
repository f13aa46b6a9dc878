//! Connection settings for a controller, stored as JSON.
//!
//! ```json
//! {
//!   "url": "http://192.168.1.10",
//!   "username": "admin",
//!   "password": "secret",
//!   "createHeader": true
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Config file location relative to the user's home directory.
pub const DEFAULT_CONFIG_FILE: &str = ".hc2-tools/config.json";

/// Errors from reading or writing the config file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Config file not found: {}", path.display())]
    Missing { path: PathBuf },

    #[error("Config path is a directory: {}", path.display())]
    IsDirectory { path: PathBuf },

    #[error("Config file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config file is not valid JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// How to reach and authenticate against a controller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hc2Config {
    /// Base URL, e.g. `http://192.168.1.10`. `/api` is appended per request.
    #[serde(rename = "url", default)]
    pub base_url: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    /// Add a header to downloaded scenes that lack one.
    #[serde(rename = "createHeader", default = "default_create_header")]
    pub create_header: bool,
}

fn default_create_header() -> bool {
    true
}

impl Default for Hc2Config {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            username: String::new(),
            password: String::new(),
            create_header: default_create_header(),
        }
    }
}

impl Hc2Config {
    /// `~/.hc2-tools/config.json`, or `None` if no home directory is known.
    pub fn default_path() -> Option<PathBuf> {
        directories::BaseDirs::new().map(|dirs| dirs.home_dir().join(DEFAULT_CONFIG_FILE))
    }

    /// Read a config file. Keys absent from the file take their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let metadata = std::fs::metadata(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => ConfigError::Missing {
                path: path.to_path_buf(),
            },
            _ => ConfigError::Io(e),
        })?;
        if metadata.is_dir() {
            return Err(ConfigError::IsDirectory {
                path: path.to_path_buf(),
            });
        }

        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write the config as indented JSON, creating parent directories.
    /// Returns the number of bytes written.
    pub fn write(&self, path: &Path) -> Result<usize, ConfigError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, &json)?;
        tracing::debug!(path = %path.display(), bytes = json.len(), "Wrote config file");
        Ok(json.len())
    }

    /// `true` when URL, user and password are all set.
    pub fn is_complete(&self) -> bool {
        !self.base_url.is_empty() && !self.username.is_empty() && !self.password.is_empty()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
