//! core::config
//!
//! Configuration schema and loading.
//!
//! # Overview
//!
//! The bot has a single configuration file. Every key is optional; accessor
//! methods on [`Config`] apply the defaults.
//!
//! # Precedence
//!
//! Configuration values are resolved in this order (later overrides earlier):
//! 1. Default values
//! 2. Config file
//! 3. CLI flags (not handled here)
//!
//! # Config Locations
//!
//! Searched in order:
//! 1. An explicit path (from `--config`), which must exist
//! 2. `$TOXBOT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/toxbot/config.toml`
//! 4. `~/.toxbot/config.toml` (canonical write location)
//!
//! # Example
//!
//! ```no_run
//! use toxbot::core::config::Config;
//!
//! let config = Config::load(None).unwrap();
//! println!("Prefix: {}", config.prefix());
//! println!("Masters: {}", config.masterkeys_path().display());
//! ```

pub mod schema;

pub use schema::{ConfigFile, FilesConfig};

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default command prefix.
pub const DEFAULT_PREFIX: char = '.';

/// Default maximum message length (the messenger's protocol limit).
pub const DEFAULT_MAX_MESSAGE_LENGTH: usize = 1372;

/// Default bot name for public groups.
pub const DEFAULT_BOT_NAME: &str = "bot";

/// Errors from configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file '{path}': {message}")]
    ParseError { path: PathBuf, message: String },

    #[error("failed to write config file '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("config file not found: {0}")]
    NotFound(PathBuf),

    #[error("invalid config value: {0}")]
    InvalidValue(String),

    #[error("home directory not found")]
    NoHomeDir,
}

/// Loaded configuration.
///
/// Accessor methods apply defaults for keys the file leaves unset.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Parsed file contents
    pub file: ConfigFile,
    /// Path the file was loaded from (if any)
    path: Option<PathBuf>,
}

impl Config {
    /// Wrap already-parsed file contents.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if validation fails.
    pub fn from_file(file: ConfigFile) -> Result<Self, ConfigError> {
        file.validate()?;
        Ok(Self { file, path: None })
    }

    /// Load configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit path is missing, or if a config file
    /// exists but cannot be read, parsed or validated. A missing default
    /// config file is not an error (defaults are used).
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let path = match explicit {
            Some(p) if !p.exists() => return Err(ConfigError::NotFound(p.to_path_buf())),
            Some(p) => Some(p.to_path_buf()),
            None => Self::find_default(),
        };

        let file = match &path {
            Some(p) => Self::read_config(p)?,
            None => ConfigFile::default(),
        };
        file.validate()?;

        Ok(Self { file, path })
    }

    /// Find the first existing default config location.
    fn find_default() -> Option<PathBuf> {
        // 1. Check $TOXBOT_CONFIG
        if let Ok(path) = std::env::var("TOXBOT_CONFIG") {
            let path = PathBuf::from(path);
            if path.exists() {
                return Some(path);
            }
        }

        // 2. Check $XDG_CONFIG_HOME/toxbot/config.toml
        if let Ok(xdg_home) = std::env::var("XDG_CONFIG_HOME") {
            let path = PathBuf::from(xdg_home).join("toxbot/config.toml");
            if path.exists() {
                return Some(path);
            }
        }

        // 3. Check ~/.toxbot/config.toml
        dirs::home_dir()
            .map(|home| home.join(".toxbot/config.toml"))
            .filter(|path| path.exists())
    }

    /// Read and parse a config file.
    fn read_config(path: &Path) -> Result<ConfigFile, ConfigError> {
        let contents = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        toml::from_str(&contents).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })
    }

    /// Get the canonical path for the config file.
    ///
    /// Returns `~/.toxbot/config.toml`.
    pub fn default_path() -> Result<PathBuf, ConfigError> {
        let home = dirs::home_dir().ok_or(ConfigError::NoHomeDir)?;
        Ok(home.join(".toxbot/config.toml"))
    }

    /// Write a config file atomically.
    ///
    /// Creates parent directories if needed. Writes to a temp file in the
    /// same directory, then renames it over the target.
    pub fn write_atomic(path: &Path, file: &ConfigFile) -> Result<(), ConfigError> {
        file.validate()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| ConfigError::WriteError {
                path: path.to_path_buf(),
                source: e,
            })?;
        }

        let contents =
            toml::to_string_pretty(file).map_err(|e| ConfigError::InvalidValue(e.to_string()))?;

        let temp_path = path.with_extension("toml.tmp");
        let mut out = fs::File::create(&temp_path).map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        out.write_all(contents.as_bytes())
            .map_err(|e| ConfigError::WriteError {
                path: temp_path.clone(),
                source: e,
            })?;

        out.sync_all().map_err(|e| ConfigError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;

        fs::rename(&temp_path, path).map_err(|e| ConfigError::WriteError {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(())
    }

    /// A config file populated with every default, for `config init`.
    pub fn defaults_file() -> ConfigFile {
        ConfigFile {
            prefix: Some(DEFAULT_PREFIX.to_string()),
            max_message_length: Some(DEFAULT_MAX_MESSAGE_LENGTH),
            aliases: Some(vec!["invite".to_string()]),
            bot_name: Some(DEFAULT_BOT_NAME.to_string()),
            public_chat_id: None,
            default_group: Some(0),
            purge_days: Some(365),
            files: Some(FilesConfig {
                masterkeys: Some("masterkeys".to_string()),
                blockedkeys: Some("blockedkeys".to_string()),
                help_file: Some("commands.txt".to_string()),
                chat_ids_file: Some("group_chat_ids".to_string()),
            }),
        }
    }

    // =========================================================================
    // Accessor methods with defaults
    // =========================================================================

    /// Get the command prefix.
    ///
    /// Defaults to `.` if not configured.
    pub fn prefix(&self) -> char {
        self.file
            .prefix
            .as_deref()
            .and_then(|p| p.chars().next())
            .unwrap_or(DEFAULT_PREFIX)
    }

    /// Get the maximum message length in bytes.
    ///
    /// Defaults to 1372 if not configured.
    pub fn max_message_length(&self) -> usize {
        self.file
            .max_message_length
            .unwrap_or(DEFAULT_MAX_MESSAGE_LENGTH)
    }

    /// Get the bare command aliases.
    ///
    /// Defaults to `["invite"]` if not configured.
    pub fn aliases(&self) -> Vec<String> {
        self.file
            .aliases
            .clone()
            .unwrap_or_else(|| vec!["invite".to_string()])
    }

    /// Get the name used when joining public groups.
    pub fn bot_name(&self) -> &str {
        self.file.bot_name.as_deref().unwrap_or(DEFAULT_BOT_NAME)
    }

    /// Get the well-known public group chat id, if configured.
    pub fn public_chat_id(&self) -> Option<&str> {
        self.file.public_chat_id.as_deref()
    }

    /// Get the initial default group.
    pub fn default_group(&self) -> u32 {
        self.file.default_group.unwrap_or(0)
    }

    /// Get the initial purge threshold in days.
    pub fn purge_days(&self) -> u64 {
        self.file.purge_days.unwrap_or(365)
    }

    fn file_path(&self, pick: fn(&FilesConfig) -> Option<&String>, default: &str) -> PathBuf {
        self.file
            .files
            .as_ref()
            .and_then(pick)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(default))
    }

    /// Path of the master key list.
    pub fn masterkeys_path(&self) -> PathBuf {
        self.file_path(|f| f.masterkeys.as_ref(), "masterkeys")
    }

    /// Path of the blocked key list.
    pub fn blockedkeys_path(&self) -> PathBuf {
        self.file_path(|f| f.blockedkeys.as_ref(), "blockedkeys")
    }

    /// Path of the extended help file.
    pub fn help_file_path(&self) -> PathBuf {
        self.file_path(|f| f.help_file.as_ref(), "commands.txt")
    }

    /// Path written by the `save` command.
    pub fn chat_ids_path(&self) -> PathBuf {
        self.file_path(|f| f.chat_ids_file.as_ref(), "group_chat_ids")
    }

    /// Get the path the config was loaded from.
    pub fn loaded_from(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn defaults_without_file() {
        let config = Config::default();
        assert_eq!(config.prefix(), '.');
        assert_eq!(config.max_message_length(), 1372);
        assert_eq!(config.aliases(), vec!["invite".to_string()]);
        assert_eq!(config.bot_name(), "bot");
        assert!(config.public_chat_id().is_none());
        assert_eq!(config.masterkeys_path(), PathBuf::from("masterkeys"));
        assert_eq!(config.chat_ids_path(), PathBuf::from("group_chat_ids"));
    }

    #[test]
    fn load_explicit_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(
            &path,
            r#"
            prefix = "!"
            max_message_length = 200

            [files]
            help_file = "help.txt"
            "#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.prefix(), '!');
        assert_eq!(config.max_message_length(), 200);
        assert_eq!(config.help_file_path(), PathBuf::from("help.txt"));
        assert_eq!(config.loaded_from(), Some(path.as_path()));
    }

    #[test]
    fn explicit_missing_path_is_error() {
        let temp = TempDir::new().unwrap();
        let result = Config::load(Some(&temp.path().join("nope.toml")));
        assert!(matches!(result, Err(ConfigError::NotFound(_))));
    }

    #[test]
    fn unknown_fields_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "prefix = \".\"\nunknown_field = true\n").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::ParseError { .. })));
    }

    #[test]
    fn invalid_value_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "prefix = \"ab\"\n").unwrap();

        let result = Config::load(Some(&path));
        assert!(matches!(result, Err(ConfigError::InvalidValue(_))));
    }

    #[test]
    fn write_atomic_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested/config.toml");

        Config::write_atomic(&path, &Config::defaults_file()).unwrap();
        assert!(path.exists());
        assert!(!path.with_extension("toml.tmp").exists());

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded.file, Config::defaults_file());
    }
}
