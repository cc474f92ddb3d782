//! core::config::schema
//!
//! Configuration schema types.
//!
//! # Location
//!
//! Searched in order:
//! 1. `--config <path>` on the command line
//! 2. `$TOXBOT_CONFIG` if set
//! 3. `$XDG_CONFIG_HOME/toxbot/config.toml`
//! 4. `~/.toxbot/config.toml` (canonical write location)
//!
//! # Validation
//!
//! Config values are validated after parsing so that a bad prefix or an
//! impossible message length is reported at startup rather than on the
//! first inbound message.

use serde::{Deserialize, Serialize};

use super::ConfigError;
use crate::core::types::{PublicKey, CHAT_ID_SIZE};

/// Smallest accepted `max_message_length`; a command needs a prefix and a
/// name character.
pub const MIN_MESSAGE_LENGTH: usize = 2;

/// Largest accepted `max_message_length`.
pub const MAX_MESSAGE_LENGTH_LIMIT: usize = 65_535;

/// Longest accepted bot name in bytes.
pub const MAX_NAME_LENGTH: usize = 127;

/// Bot configuration file.
///
/// # Example
///
/// ```toml
/// prefix = "."
/// max_message_length = 1372
/// aliases = ["invite"]
/// bot_name = "bot"
/// default_group = 0
/// purge_days = 365
///
/// [files]
/// masterkeys = "masterkeys"
/// blockedkeys = "blockedkeys"
/// help_file = "commands.txt"
/// chat_ids_file = "group_chat_ids"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigFile {
    /// Command prefix character
    pub prefix: Option<String>,

    /// Maximum accepted message length in bytes
    pub max_message_length: Option<usize>,

    /// Command names accepted without the prefix
    pub aliases: Option<Vec<String>>,

    /// Name used when joining public groups
    pub bot_name: Option<String>,

    /// Chat id of the well-known public group (64 hex characters)
    pub public_chat_id: Option<String>,

    /// Group targeted by `invite` without a number
    pub default_group: Option<u32>,

    /// Inactivity purge threshold in days
    pub purge_days: Option<u64>,

    /// Data file locations
    pub files: Option<FilesConfig>,
}

impl ConfigFile {
    /// Validate the configuration values.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if any value is invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if let Some(prefix) = &self.prefix {
            let mut chars = prefix.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) if c.is_ascii_graphic() && c != '"' && c != '\\' => {}
                _ => {
                    return Err(ConfigError::InvalidValue(format!(
                        "invalid prefix '{}', must be a single printable ASCII character",
                        prefix
                    )))
                }
            }
        }

        if let Some(len) = self.max_message_length {
            if !(MIN_MESSAGE_LENGTH..=MAX_MESSAGE_LENGTH_LIMIT).contains(&len) {
                return Err(ConfigError::InvalidValue(format!(
                    "max_message_length must be between {} and {}",
                    MIN_MESSAGE_LENGTH, MAX_MESSAGE_LENGTH_LIMIT
                )));
            }
        }

        if let Some(aliases) = &self.aliases {
            for alias in aliases {
                if alias.is_empty() || alias.contains(char::is_whitespace) {
                    return Err(ConfigError::InvalidValue(format!(
                        "invalid alias '{}', must be a single word",
                        alias
                    )));
                }
            }
        }

        if let Some(name) = &self.bot_name {
            if name.is_empty() || name.len() > MAX_NAME_LENGTH {
                return Err(ConfigError::InvalidValue(format!(
                    "bot_name must be 1 to {} bytes",
                    MAX_NAME_LENGTH
                )));
            }
        }

        if let Some(chat_id) = &self.public_chat_id {
            if chat_id.len() != CHAT_ID_SIZE * 2 || PublicKey::from_hex(chat_id).is_err() {
                return Err(ConfigError::InvalidValue(format!(
                    "public_chat_id must be {} hex characters",
                    CHAT_ID_SIZE * 2
                )));
            }
        }

        if self.purge_days == Some(0) {
            return Err(ConfigError::InvalidValue(
                "purge_days must be greater than 0".to_string(),
            ));
        }

        Ok(())
    }
}

/// Data file locations. Relative paths resolve against the working directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default, deny_unknown_fields)]
pub struct FilesConfig {
    /// Privileged key list
    pub masterkeys: Option<String>,

    /// Blocked key list
    pub blockedkeys: Option<String>,

    /// Extended help dumped by `help admin`
    pub help_file: Option<String>,

    /// Output of the `save` command
    pub chat_ids_file: Option<String>,
}
