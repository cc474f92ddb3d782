//! transport::traits
//!
//! Messenger trait definition.
//!
//! # Design
//!
//! The `Messenger` trait is the bot's only view of the peer-to-peer
//! messaging library: contact messages, conferences, public groups and the
//! bot's own profile. Command handlers talk to it exclusively, so they can be
//! exercised against [`super::MemoryMessenger`] without a network.
//!
//! The trait is synchronous. Dispatch runs to completion on the thread that
//! received the message, and a slow messenger call stalls later commands.
//!
//! Failures carry the library's numeric error code so handlers can report
//! `"<message> (error <code>)"` to the sender.
//!
//! # Example
//!
//! ```
//! use toxbot::core::groups::GroupKind;
//! use toxbot::core::types::FriendNumber;
//! use toxbot::transport::{MemoryMessenger, Messenger};
//!
//! let mut messenger = MemoryMessenger::new();
//! let friend = messenger.add_friend("alice", true);
//! let group = messenger.conference_new(GroupKind::Text).unwrap();
//! messenger.conference_invite(friend, group).unwrap();
//! messenger.send_message(friend, "done").unwrap();
//!
//! assert_eq!(messenger.sent_to(friend), vec!["done".to_string()]);
//! ```

use thiserror::Error;

use crate::core::groups::GroupKind;
use crate::core::types::{FriendNumber, GroupNumber, PublicKey, ToxId};

/// Public group chat ids share the 32-byte key format.
pub type ChatId = PublicKey;

/// Error code for an unknown conference or group.
pub const ERR_NOT_FOUND: i32 = 1;

/// Error code for a failed send (unknown or offline contact).
pub const ERR_SEND: i32 = 2;

/// Error code for joining a public group twice.
pub const ERR_ALREADY_JOINED: i32 = 6;

/// A failed messenger call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{operation} failed (error {code})")]
pub struct MessengerError {
    /// The library call that failed.
    pub operation: &'static str,
    /// The library's error code.
    pub code: i32,
}

impl MessengerError {
    /// Create an error for a library call.
    pub fn new(operation: &'static str, code: i32) -> Self {
        Self { operation, code }
    }
}

/// Presence status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UserStatus {
    /// Available.
    #[default]
    Online,
    /// Away from keyboard.
    Away,
    /// Do not disturb.
    Busy,
}

impl UserStatus {
    /// Parse a status word, ignoring case.
    pub fn parse(word: &str) -> Option<Self> {
        match word.to_ascii_lowercase().as_str() {
            "online" => Some(UserStatus::Online),
            "away" => Some(UserStatus::Away),
            "busy" => Some(UserStatus::Busy),
            _ => None,
        }
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Online => write!(f, "online"),
            UserStatus::Away => write!(f, "away"),
            UserStatus::Busy => write!(f, "busy"),
        }
    }
}

/// A conference as the library reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConferenceInfo {
    /// Conference number.
    pub number: GroupNumber,
    /// Conference kind.
    pub kind: GroupKind,
    /// Number of peers, including the bot.
    pub peers: usize,
}

/// A joined public group as the library reports it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicGroup {
    /// Group number.
    pub number: GroupNumber,
    /// Group name.
    pub name: String,
    /// Chat id, if the library could report it.
    pub chat_id: Option<ChatId>,
}

/// Operations the bot needs from the messaging library.
pub trait Messenger {
    // ---- contacts ------------------------------------------------------

    /// Send a normal text message to a contact.
    fn send_message(&mut self, friend: FriendNumber, text: &str) -> Result<(), MessengerError>;

    /// A contact's display name (empty if unknown).
    fn friend_name(&self, friend: FriendNumber) -> String;

    /// Number of contacts.
    fn friend_count(&self) -> usize;

    /// Number of contacts currently online.
    fn online_friend_count(&self) -> usize;

    // ---- self profile --------------------------------------------------

    /// The bot's own address.
    fn self_address(&self) -> ToxId;

    /// Set the bot's display name.
    fn set_name(&mut self, name: &str) -> Result<(), MessengerError>;

    /// Set the bot's presence status.
    fn set_status(&mut self, status: UserStatus) -> Result<(), MessengerError>;

    /// Set the bot's status message.
    fn set_status_message(&mut self, text: &str) -> Result<(), MessengerError>;

    /// Persist the library's profile data.
    fn save(&mut self) -> Result<(), MessengerError>;

    // ---- conferences ---------------------------------------------------

    /// Create a conference.
    fn conference_new(&mut self, kind: GroupKind) -> Result<GroupNumber, MessengerError>;

    /// Leave and delete a conference.
    fn conference_delete(&mut self, group: GroupNumber) -> Result<(), MessengerError>;

    /// Invite a contact into a conference.
    fn conference_invite(
        &mut self,
        friend: FriendNumber,
        group: GroupNumber,
    ) -> Result<(), MessengerError>;

    /// Send a message into a conference.
    fn conference_send(&mut self, group: GroupNumber, text: &str) -> Result<(), MessengerError>;

    /// Set a conference title.
    fn conference_set_title(
        &mut self,
        group: GroupNumber,
        title: &str,
    ) -> Result<(), MessengerError>;

    /// All conferences the bot is in.
    fn conferences(&self) -> Vec<ConferenceInfo>;

    // ---- public groups -------------------------------------------------

    /// All joined public groups.
    fn public_groups(&self) -> Vec<PublicGroup>;

    /// Join a public group by chat id, announcing `name`.
    fn join_public_group(
        &mut self,
        chat_id: &ChatId,
        name: &str,
    ) -> Result<GroupNumber, MessengerError>;

    /// Whether a public group connection is up.
    fn group_is_connected(&self, group: GroupNumber) -> bool;

    /// Reconnect to a public group.
    fn group_reconnect(&mut self, group: GroupNumber) -> Result<(), MessengerError>;

    /// Disconnect from a public group.
    fn group_disconnect(&mut self, group: GroupNumber) -> Result<(), MessengerError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = MessengerError::new("conference_invite", 2);
        assert_eq!(err.to_string(), "conference_invite failed (error 2)");
    }

    #[test]
    fn status_parse_ignores_case() {
        assert_eq!(UserStatus::parse("AWAY"), Some(UserStatus::Away));
        assert_eq!(UserStatus::parse("Busy"), Some(UserStatus::Busy));
        assert_eq!(UserStatus::parse("online"), Some(UserStatus::Online));
        assert_eq!(UserStatus::parse("sleeping"), None);
    }
}
