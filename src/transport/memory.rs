//! transport::memory
//!
//! In-memory messenger for deterministic testing and the console front-end.
//!
//! # Design
//!
//! `MemoryMessenger` keeps contacts, conferences and public groups in plain
//! collections. Every message sent to a contact lands in an outbox that tests
//! (and the console) read back. A single operation can be configured to fail
//! with a chosen library error code to exercise error paths.
//!
//! # Example
//!
//! ```
//! use toxbot::transport::memory::{FailOn, MemoryMessenger};
//! use toxbot::transport::Messenger;
//! use toxbot::core::groups::GroupKind;
//!
//! let mut messenger = MemoryMessenger::new().fail_on(FailOn::ConferenceNew(3));
//! let err = messenger.conference_new(GroupKind::Text).unwrap_err();
//! assert_eq!(err.code, 3);
//! ```

use std::collections::BTreeMap;

use super::traits::{
    ChatId, ConferenceInfo, Messenger, MessengerError, PublicGroup, UserStatus,
    ERR_ALREADY_JOINED, ERR_NOT_FOUND, ERR_SEND,
};
use crate::core::groups::GroupKind;
use crate::core::types::{FriendNumber, GroupNumber, PublicKey, ToxId};

/// Which operation should fail, and with which code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailOn {
    SendMessage(i32),
    SetName(i32),
    SetStatus(i32),
    SetStatusMessage(i32),
    Save(i32),
    ConferenceNew(i32),
    ConferenceDelete(i32),
    ConferenceInvite(i32),
    ConferenceSend(i32),
    ConferenceSetTitle(i32),
    JoinPublicGroup(i32),
    GroupReconnect(i32),
    GroupDisconnect(i32),
}

impl FailOn {
    fn matches(&self, operation: &str) -> Option<i32> {
        let (name, code) = match *self {
            FailOn::SendMessage(c) => ("send_message", c),
            FailOn::SetName(c) => ("set_name", c),
            FailOn::SetStatus(c) => ("set_status", c),
            FailOn::SetStatusMessage(c) => ("set_status_message", c),
            FailOn::Save(c) => ("save", c),
            FailOn::ConferenceNew(c) => ("conference_new", c),
            FailOn::ConferenceDelete(c) => ("conference_delete", c),
            FailOn::ConferenceInvite(c) => ("conference_invite", c),
            FailOn::ConferenceSend(c) => ("conference_send", c),
            FailOn::ConferenceSetTitle(c) => ("conference_set_title", c),
            FailOn::JoinPublicGroup(c) => ("join_public_group", c),
            FailOn::GroupReconnect(c) => ("group_reconnect", c),
            FailOn::GroupDisconnect(c) => ("group_disconnect", c),
        };
        (name == operation).then_some(code)
    }
}

/// Recorded state-changing operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    SetName(String),
    SetStatus(UserStatus),
    SetStatusMessage(String),
    Save,
    ConferenceNew(GroupNumber, GroupKind),
    ConferenceDelete(GroupNumber),
    ConferenceInvite(FriendNumber, GroupNumber),
    ConferenceSend(GroupNumber, String),
    ConferenceSetTitle(GroupNumber, String),
    JoinPublicGroup(GroupNumber, String),
    GroupReconnect(GroupNumber),
    GroupDisconnect(GroupNumber),
}

#[derive(Debug, Clone)]
struct Contact {
    name: String,
    online: bool,
}

#[derive(Debug, Clone)]
struct Conference {
    kind: GroupKind,
    peers: Vec<FriendNumber>,
}

#[derive(Debug, Clone)]
struct Joined {
    name: String,
    chat_id: ChatId,
    connected: bool,
}

/// In-memory messenger.
#[derive(Debug, Clone)]
pub struct MemoryMessenger {
    address: ToxId,
    name: String,
    status: UserStatus,
    status_message: String,
    contacts: BTreeMap<FriendNumber, Contact>,
    conferences: BTreeMap<GroupNumber, Conference>,
    next_conference: u32,
    public_groups: BTreeMap<GroupNumber, Joined>,
    next_public_group: u32,
    outbox: Vec<(FriendNumber, String)>,
    operations: Vec<Operation>,
    fail_on: Option<FailOn>,
}

impl MemoryMessenger {
    /// Create a messenger with a fixed all-zero identity and no contacts.
    pub fn new() -> Self {
        Self::with_address(ToxId::from_key(PublicKey::new([0; 32]), 0))
    }

    /// Create a messenger with the given identity.
    pub fn with_address(address: ToxId) -> Self {
        Self {
            address,
            name: String::new(),
            status: UserStatus::Online,
            status_message: String::new(),
            contacts: BTreeMap::new(),
            conferences: BTreeMap::new(),
            next_conference: 0,
            public_groups: BTreeMap::new(),
            next_public_group: 0,
            outbox: Vec::new(),
            operations: Vec::new(),
            fail_on: None,
        }
    }

    /// Configure an operation to fail.
    pub fn fail_on(mut self, fail_on: FailOn) -> Self {
        self.fail_on = Some(fail_on);
        self
    }

    /// Clear the failure configuration.
    pub fn clear_fail_on(&mut self) {
        self.fail_on = None;
    }

    /// Add a contact and return its number.
    pub fn add_friend(&mut self, name: &str, online: bool) -> FriendNumber {
        let number = FriendNumber(self.contacts.len() as u32);
        self.contacts.insert(
            number,
            Contact {
                name: name.to_string(),
                online,
            },
        );
        number
    }

    /// Add an existing contact under a given number.
    pub fn add_friend_as(&mut self, number: FriendNumber, name: &str, online: bool) {
        self.contacts.insert(
            number,
            Contact {
                name: name.to_string(),
                online,
            },
        );
    }

    /// Messages sent to one contact, in order.
    pub fn sent_to(&self, friend: FriendNumber) -> Vec<String> {
        self.outbox
            .iter()
            .filter(|(to, _)| *to == friend)
            .map(|(_, text)| text.clone())
            .collect()
    }

    /// Drain the outbox.
    pub fn take_outbox(&mut self) -> Vec<(FriendNumber, String)> {
        std::mem::take(&mut self.outbox)
    }

    /// Recorded state-changing operations.
    pub fn operations(&self) -> &[Operation] {
        &self.operations
    }

    /// The bot's current display name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The bot's current presence status.
    pub fn status(&self) -> UserStatus {
        self.status
    }

    /// The bot's current status message.
    pub fn status_message(&self) -> &str {
        &self.status_message
    }

    /// Peers of a conference, excluding the bot.
    pub fn conference_peers(&self, group: GroupNumber) -> Vec<FriendNumber> {
        self.conferences
            .get(&group)
            .map(|c| c.peers.clone())
            .unwrap_or_default()
    }

    /// Mark a public group as disconnected, as a network drop would.
    pub fn drop_connection(&mut self, group: GroupNumber) {
        if let Some(joined) = self.public_groups.get_mut(&group) {
            joined.connected = false;
        }
    }

    fn check(&self, operation: &'static str) -> Result<(), MessengerError> {
        match self.fail_on.and_then(|f| f.matches(operation)) {
            Some(code) => Err(MessengerError::new(operation, code)),
            None => Ok(()),
        }
    }

    fn conference_mut(
        &mut self,
        operation: &'static str,
        group: GroupNumber,
    ) -> Result<&mut Conference, MessengerError> {
        self.conferences
            .get_mut(&group)
            .ok_or(MessengerError::new(operation, ERR_NOT_FOUND))
    }

    fn joined_mut(
        &mut self,
        operation: &'static str,
        group: GroupNumber,
    ) -> Result<&mut Joined, MessengerError> {
        self.public_groups
            .get_mut(&group)
            .ok_or(MessengerError::new(operation, ERR_NOT_FOUND))
    }
}

impl Default for MemoryMessenger {
    fn default() -> Self {
        Self::new()
    }
}

impl Messenger for MemoryMessenger {
    fn send_message(&mut self, friend: FriendNumber, text: &str) -> Result<(), MessengerError> {
        self.check("send_message")?;
        if !self.contacts.contains_key(&friend) {
            return Err(MessengerError::new("send_message", ERR_SEND));
        }
        self.outbox.push((friend, text.to_string()));
        Ok(())
    }

    fn friend_name(&self, friend: FriendNumber) -> String {
        self.contacts
            .get(&friend)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    fn friend_count(&self) -> usize {
        self.contacts.len()
    }

    fn online_friend_count(&self) -> usize {
        self.contacts.values().filter(|c| c.online).count()
    }

    fn self_address(&self) -> ToxId {
        self.address
    }

    fn set_name(&mut self, name: &str) -> Result<(), MessengerError> {
        self.check("set_name")?;
        self.name = name.to_string();
        self.operations.push(Operation::SetName(name.to_string()));
        Ok(())
    }

    fn set_status(&mut self, status: UserStatus) -> Result<(), MessengerError> {
        self.check("set_status")?;
        self.status = status;
        self.operations.push(Operation::SetStatus(status));
        Ok(())
    }

    fn set_status_message(&mut self, text: &str) -> Result<(), MessengerError> {
        self.check("set_status_message")?;
        self.status_message = text.to_string();
        self.operations
            .push(Operation::SetStatusMessage(text.to_string()));
        Ok(())
    }

    fn save(&mut self) -> Result<(), MessengerError> {
        self.check("save")?;
        self.operations.push(Operation::Save);
        Ok(())
    }

    fn conference_new(&mut self, kind: GroupKind) -> Result<GroupNumber, MessengerError> {
        self.check("conference_new")?;
        let number = GroupNumber(self.next_conference);
        self.next_conference += 1;
        self.conferences.insert(
            number,
            Conference {
                kind,
                peers: Vec::new(),
            },
        );
        self.operations.push(Operation::ConferenceNew(number, kind));
        Ok(number)
    }

    fn conference_delete(&mut self, group: GroupNumber) -> Result<(), MessengerError> {
        self.check("conference_delete")?;
        self.conferences
            .remove(&group)
            .ok_or(MessengerError::new("conference_delete", ERR_NOT_FOUND))?;
        self.operations.push(Operation::ConferenceDelete(group));
        Ok(())
    }

    fn conference_invite(
        &mut self,
        friend: FriendNumber,
        group: GroupNumber,
    ) -> Result<(), MessengerError> {
        self.check("conference_invite")?;
        if !self.contacts.contains_key(&friend) {
            return Err(MessengerError::new("conference_invite", ERR_SEND));
        }
        let conference = self.conference_mut("conference_invite", group)?;
        if !conference.peers.contains(&friend) {
            conference.peers.push(friend);
        }
        self.operations
            .push(Operation::ConferenceInvite(friend, group));
        Ok(())
    }

    fn conference_send(&mut self, group: GroupNumber, text: &str) -> Result<(), MessengerError> {
        self.check("conference_send")?;
        self.conference_mut("conference_send", group)?;
        self.operations
            .push(Operation::ConferenceSend(group, text.to_string()));
        Ok(())
    }

    fn conference_set_title(
        &mut self,
        group: GroupNumber,
        title: &str,
    ) -> Result<(), MessengerError> {
        self.check("conference_set_title")?;
        self.conference_mut("conference_set_title", group)?;
        self.operations
            .push(Operation::ConferenceSetTitle(group, title.to_string()));
        Ok(())
    }

    fn conferences(&self) -> Vec<ConferenceInfo> {
        self.conferences
            .iter()
            .map(|(number, c)| ConferenceInfo {
                number: *number,
                kind: c.kind,
                peers: c.peers.len() + 1,
            })
            .collect()
    }

    fn public_groups(&self) -> Vec<PublicGroup> {
        self.public_groups
            .iter()
            .map(|(number, g)| PublicGroup {
                number: *number,
                name: g.name.clone(),
                chat_id: Some(g.chat_id),
            })
            .collect()
    }

    fn join_public_group(
        &mut self,
        chat_id: &ChatId,
        name: &str,
    ) -> Result<GroupNumber, MessengerError> {
        self.check("join_public_group")?;
        if self.public_groups.values().any(|g| g.chat_id == *chat_id) {
            return Err(MessengerError::new("join_public_group", ERR_ALREADY_JOINED));
        }
        let number = GroupNumber(self.next_public_group);
        self.next_public_group += 1;
        self.public_groups.insert(
            number,
            Joined {
                name: name.to_string(),
                chat_id: *chat_id,
                connected: true,
            },
        );
        self.operations
            .push(Operation::JoinPublicGroup(number, name.to_string()));
        Ok(number)
    }

    fn group_is_connected(&self, group: GroupNumber) -> bool {
        self.public_groups
            .get(&group)
            .map(|g| g.connected)
            .unwrap_or(false)
    }

    fn group_reconnect(&mut self, group: GroupNumber) -> Result<(), MessengerError> {
        self.check("group_reconnect")?;
        self.joined_mut("group_reconnect", group)?.connected = true;
        self.operations.push(Operation::GroupReconnect(group));
        Ok(())
    }

    fn group_disconnect(&mut self, group: GroupNumber) -> Result<(), MessengerError> {
        self.check("group_disconnect")?;
        self.joined_mut("group_disconnect", group)?.connected = false;
        self.operations.push(Operation::GroupDisconnect(group));
        Ok(())
    }
}
