//! handlers
//!
//! Command implementations and the built-in command table.
//!
//! # Modules
//!
//! - [`general`] - Commands anyone may run
//! - [`admin`] - Privileged profile and group administration
//! - [`maintenance`] - Privileged public group upkeep
//!
//! # Design
//!
//! Every handler has the [`Handler`] signature: it gets the session, the
//! sender and the arguments after the command name. Handlers send their own
//! success replies. Failures are returned as [`HandlerError`] and the
//! dispatcher replies with their text. A handler that returns an error must
//! not have sent anything to the sender, so every failure costs exactly one
//! reply.

pub mod admin;
pub mod general;
pub mod maintenance;

use crate::core::config::Config;
use crate::core::keylist::KeyList;
use crate::core::state::BotState;
use crate::core::types::{GroupNumber, Sender};
use crate::interp::{Arg, CommandEntry, Handler, HandlerError, Registry};
use crate::transport::Messenger;
use crate::ui::output::{self, Verbosity};

/// Everything a handler may touch.
pub struct Session<'a> {
    /// The messaging library.
    pub messenger: &'a mut dyn Messenger,
    /// Mutable bot state.
    pub state: &'a mut BotState,
    /// The privileged key list.
    pub masters: &'a mut KeyList,
    /// Loaded configuration.
    pub config: &'a Config,
    /// Log verbosity.
    pub verbosity: Verbosity,
}

impl Session<'_> {
    /// Send a reply to the sender. Send failures are logged, not returned.
    pub fn reply(&mut self, sender: &Sender, text: &str) {
        if let Err(e) = self.messenger.send_message(sender.friend, text) {
            output::log_error(
                e.code,
                format!("failed to reply to friend {}", sender.friend),
            );
        }
    }

    /// Send a notification to the operator, or log it if there is none.
    pub fn notify_operator(&mut self, text: &str) {
        match self.state.operator {
            Some(friend) => {
                if let Err(e) = self.messenger.send_message(friend, text) {
                    output::log_error(e.code, format!("failed to notify friend {}", friend));
                }
            }
            None => output::log(format!("no operator set: {}", text), self.verbosity),
        }
    }

    /// Display name of the sender, for log lines.
    pub fn name_of(&self, sender: &Sender) -> String {
        self.messenger.friend_name(sender.friend)
    }

    /// Persist the profile after a change; failures are logged.
    pub fn save_profile(&mut self) {
        if let Err(e) = self.messenger.save() {
            output::log_error(e.code, "failed to save profile");
        }
    }

    /// Log an event at normal verbosity.
    pub fn log(&self, message: impl std::fmt::Display) {
        output::log(message, self.verbosity);
    }
}

/// Argument `index` as text.
pub(crate) fn arg(args: &[Arg], index: usize) -> Option<&str> {
    args.get(index).map(Arg::as_str)
}

/// Parse a group number argument, replying `message` when it is not one.
pub(crate) fn group_arg(text: &str, message: &str) -> Result<GroupNumber, HandlerError> {
    GroupNumber::parse(text).map_err(|_| HandlerError::usage(message))
}

/// The compiled-in command table, unsorted.
pub fn builtin_entries() -> Vec<CommandEntry<Handler>> {
    vec![
        CommandEntry::new("default", admin::cmd_default as Handler, true, "default <n>"),
        CommandEntry::new(
            "group",
            general::cmd_group as Handler,
            false,
            "group <text|audio> [password]",
        ),
        CommandEntry::new(
            "gmessage",
            admin::cmd_gmessage as Handler,
            true,
            "gmessage <n> \"<message>\"",
        ),
        CommandEntry::new("help", general::cmd_help as Handler, false, "help [admin]"),
        CommandEntry::new("id", general::cmd_id as Handler, false, "id"),
        CommandEntry::new("info", general::cmd_info as Handler, false, "info"),
        CommandEntry::new("invite", general::cmd_invite as Handler, false, "invite [n] [password]"),
        CommandEntry::new("leave", admin::cmd_leave as Handler, true, "leave <n>"),
        CommandEntry::new("master", admin::cmd_master as Handler, true, "master <tox id>"),
        CommandEntry::new("name", admin::cmd_name as Handler, true, "name <name>"),
        CommandEntry::new("passwd", admin::cmd_passwd as Handler, true, "passwd <n> [password]"),
        CommandEntry::new("purge", admin::cmd_purge as Handler, true, "purge <days>"),
        CommandEntry::new(
            "status",
            admin::cmd_status as Handler,
            true,
            "status <online|away|busy>",
        ),
        CommandEntry::new(
            "statusmessage",
            admin::cmd_statusmessage as Handler,
            true,
            "statusmessage \"<message>\"",
        ),
        CommandEntry::new("title", admin::cmd_title as Handler, true, "title <n> \"<title>\""),
        CommandEntry::new("init", general::cmd_init as Handler, false, "init"),
        CommandEntry::new("join", general::cmd_join as Handler, false, "join [chat id]"),
        CommandEntry::new("save", maintenance::cmd_save as Handler, true, "save"),
        CommandEntry::new("rejoin", maintenance::cmd_rejoin as Handler, true, "rejoin <n>"),
        CommandEntry::new("exit", maintenance::cmd_exit as Handler, true, "exit <n>"),
        CommandEntry::new("list", general::cmd_list as Handler, false, "list"),
    ]
}

/// The built-in registry.
///
/// # Panics
///
/// Panics if the compiled-in table has a duplicate name.
pub fn builtin_registry() -> Registry<Handler> {
    Registry::new(builtin_entries())
        .unwrap_or_else(|e| panic!("built-in command table is invalid: {}", e))
}

#[cfg(test)]
pub(crate) mod harness {
    use super::*;
    use crate::core::types::{FriendNumber, PublicKey};
    use crate::interp::tokenize::tokenize;
    use crate::transport::MemoryMessenger;

    /// A session's worth of owned state for handler tests.
    pub struct Harness {
        pub messenger: MemoryMessenger,
        pub state: BotState,
        pub masters: KeyList,
        pub config: Config,
        pub sender: Sender,
    }

    impl Harness {
        pub fn new() -> Self {
            let mut messenger = MemoryMessenger::new();
            let friend = messenger.add_friend("alice", true);
            let mut state = BotState::new();
            state.operator = Some(friend);
            Self {
                messenger,
                state,
                masters: KeyList::new(),
                config: Config::default(),
                sender: Sender::new(friend, PublicKey::new([1; 32])),
            }
        }

        pub fn friend(&self) -> FriendNumber {
            self.sender.friend
        }

        /// Run a handler on a full command line (command name included).
        pub fn run(&mut self, handler: Handler, line: &str) -> Result<(), HandlerError> {
            let args = tokenize(line, 1372).unwrap();
            let mut session = Session {
                messenger: &mut self.messenger,
                state: &mut self.state,
                masters: &mut self.masters,
                config: &self.config,
                verbosity: Verbosity::Quiet,
            };
            handler(&mut session, &self.sender, args.rest())
        }

        /// Drain the replies sent so far.
        pub fn replies(&mut self) -> Vec<String> {
            self.messenger
                .take_outbox()
                .into_iter()
                .map(|(_, text)| text)
                .collect()
        }
    }
}
