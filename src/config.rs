//! Configuration file parser for ~/.config/summanews/config.toml.
//!
//! The file is optional. It can move the database, pin the CLI to one
//! user's namespace, or turn off per-key write serialization.
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

/// Top-level store configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// SQLite file holding the key-value records.
    /// `None` means `store.db` next to the config file.
    pub database_path: Option<PathBuf>,

    /// Pin every operation to this user's namespace instead of reading the
    /// stored session.
    pub user_id: Option<String>,

    /// Serialize read-modify-write cycles per storage key. Turning this off
    /// lets concurrent writers of one record overwrite each other.
    pub serialize_writes: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: None,
            user_id: None,
            serialize_writes: true,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&str; 3] = ["database_path", "user_id", "serialize_writes"];

    /// Load configuration from a TOML file.
    ///
    /// A missing or blank file yields the defaults. Unknown keys are logged
    /// and ignored; a key with the wrong type is an error.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match Self::read_capped(path)? {
            Some(content) if !content.trim().is_empty() => content,
            _ => {
                tracing::debug!(path = %path.display(), "No store config, using defaults");
                return Ok(Self::default());
            }
        };

        Self::warn_unknown_keys(&content);

        let config: Config = toml::from_str(&content)?;
        tracing::info!(
            path = %path.display(),
            pinned_user = config.user_id.is_some(),
            serialize_writes = config.serialize_writes,
            "Loaded configuration"
        );
        Ok(config)
    }

    /// File contents, or `None` if the file does not exist.
    fn read_capped(path: &Path) -> Result<Option<String>, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        match std::fs::read_to_string(path) {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(ConfigError::Io(e)),
        }
    }

    fn warn_unknown_keys(content: &str) {
        let Ok(raw) = content.parse::<toml::Table>() else {
            return;
        };
        for key in raw.keys().filter(|k| !Self::KNOWN_KEYS.contains(&k.as_str())) {
            tracing::warn!(key = %key, "Unknown key in config file, ignoring");
        }
    }

    /// Database location, falling back to `store.db` inside `config_dir`.
    pub fn database_path_in(&self, config_dir: &Path) -> PathBuf {
        self.database_path
            .clone()
            .unwrap_or_else(|| config_dir.join("store.db"))
    }
}
