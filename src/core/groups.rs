//! core::groups
//!
//! Table of conferences the bot created or was invited into.
//!
//! # Design
//!
//! The messenger knows which conferences exist; this table holds what the
//! bot layers on top of them: the conference kind, an optional join password
//! and the last known title. Entries are keyed by [`GroupNumber`].
//!
//! # Invariants
//!
//! - At most [`MAX_GROUPS`] entries are tracked
//! - A group number appears at most once
//! - A stored password is shorter than [`MAX_PASSWORD_SIZE`] bytes

use thiserror::Error;

use super::types::GroupNumber;

/// Maximum number of tracked conferences.
pub const MAX_GROUPS: usize = 256;

/// Passwords must be strictly shorter than this many bytes.
pub const MAX_PASSWORD_SIZE: usize = 32;

/// Errors from group table operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum GroupError {
    #[error("group {0} is already tracked")]
    AlreadyTracked(GroupNumber),

    #[error("group table is full ({MAX_GROUPS} groups)")]
    Full,

    #[error("group {0} is not tracked")]
    NotTracked(GroupNumber),

    #[error("password too long")]
    PasswordTooLong,
}

/// Conference kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKind {
    /// Text-only conference.
    Text,
    /// Audio/video conference.
    Audio,
}

impl GroupKind {
    /// Interpret the type argument of the `group` command.
    ///
    /// `audio` in any case selects an audio conference; every other word
    /// selects text.
    pub fn from_arg(arg: &str) -> Self {
        if arg.eq_ignore_ascii_case("audio") {
            GroupKind::Audio
        } else {
            GroupKind::Text
        }
    }
}

impl std::fmt::Display for GroupKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GroupKind::Text => write!(f, "Text"),
            GroupKind::Audio => write!(f, "Audio"),
        }
    }
}

/// A tracked conference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupChat {
    /// Messenger conference number.
    pub number: GroupNumber,
    /// Conference kind.
    pub kind: GroupKind,
    /// Join password, if the group is protected.
    password: Option<String>,
    /// Last known title (empty if none).
    pub title: String,
}

impl GroupChat {
    /// Whether joining requires a password.
    pub fn has_password(&self) -> bool {
        self.password.is_some()
    }

    /// Check a password offered with an invite request.
    ///
    /// Unprotected groups accept anything, including no password.
    pub fn accepts(&self, offered: Option<&str>) -> bool {
        match (&self.password, offered) {
            (None, _) => true,
            (Some(expected), Some(offered)) => expected == offered,
            (Some(_), None) => false,
        }
    }

    /// Title for display, `None` when unset.
    pub fn display_title(&self) -> &str {
        if self.title.is_empty() {
            "None"
        } else {
            &self.title
        }
    }
}

/// Validate a password before it is stored.
pub fn check_password(password: &str) -> Result<(), GroupError> {
    if password.len() >= MAX_PASSWORD_SIZE {
        return Err(GroupError::PasswordTooLong);
    }
    Ok(())
}

/// The tracked conference table.
#[derive(Debug, Clone, Default)]
pub struct GroupTable {
    chats: Vec<GroupChat>,
}

impl GroupTable {
    /// Create an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Start tracking a conference.
    ///
    /// # Errors
    ///
    /// Fails if the number is already tracked, the table is full, or the
    /// password is too long.
    pub fn add(
        &mut self,
        number: GroupNumber,
        kind: GroupKind,
        password: Option<&str>,
    ) -> Result<&GroupChat, GroupError> {
        if self.get(number).is_some() {
            return Err(GroupError::AlreadyTracked(number));
        }
        if self.chats.len() >= MAX_GROUPS {
            return Err(GroupError::Full);
        }
        if let Some(p) = password {
            check_password(p)?;
        }
        self.chats.push(GroupChat {
            number,
            kind,
            password: password.map(str::to_string),
            title: String::new(),
        });
        Ok(&self.chats[self.chats.len() - 1])
    }

    /// Look up a tracked conference.
    pub fn get(&self, number: GroupNumber) -> Option<&GroupChat> {
        self.chats.iter().find(|c| c.number == number)
    }

    fn get_mut(&mut self, number: GroupNumber) -> Result<&mut GroupChat, GroupError> {
        self.chats
            .iter_mut()
            .find(|c| c.number == number)
            .ok_or(GroupError::NotTracked(number))
    }

    /// Stop tracking a conference. Untracked numbers are ignored.
    pub fn remove(&mut self, number: GroupNumber) {
        self.chats.retain(|c| c.number != number);
    }

    /// Set or clear a group's password.
    pub fn set_password(
        &mut self,
        number: GroupNumber,
        password: Option<&str>,
    ) -> Result<(), GroupError> {
        if let Some(p) = password {
            check_password(p)?;
        }
        self.get_mut(number)?.password = password.map(str::to_string);
        Ok(())
    }

    /// Record a group's title.
    pub fn set_title(&mut self, number: GroupNumber, title: &str) -> Result<(), GroupError> {
        self.get_mut(number)?.title = title.to_string();
        Ok(())
    }

    /// Number of tracked conferences.
    pub fn len(&self) -> usize {
        self.chats.len()
    }

    /// Whether no conference is tracked.
    pub fn is_empty(&self) -> bool {
        self.chats.is_empty()
    }

    /// Iterate over tracked conferences in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &GroupChat> {
        self.chats.iter()
    }
}
