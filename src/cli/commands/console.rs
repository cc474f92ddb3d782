//! console command - Feed stdin lines through the interpreter
//!
//! Each input line is treated as a friend message from one sender. The bot
//! runs against the in-memory messenger, so replies are collected from its
//! outbox and printed instead of being sent anywhere.

use std::io::{self, BufRead};

use anyhow::{bail, Context as _, Result};

use super::Context;
use crate::core::keylist::KeyList;
use crate::core::state::BotState;
use crate::core::types::{FriendNumber, PublicKey, Sender, ToxId, PUBLIC_KEY_SIZE};
use crate::handlers::Session;
use crate::interp::{DispatchSettings, Dispatcher, Outcome};
use crate::transport::MemoryMessenger;
use crate::ui::output;

/// Key used when `--as` is not given.
pub const CONSOLE_KEY: PublicKey = PublicKey::new([0x01; PUBLIC_KEY_SIZE]);

/// Contact name of the console sender.
const CONSOLE_NAME: &str = "console";

/// Parse a `--as` value: a bare public key or a full address.
pub fn parse_sender_key(text: &str) -> Result<PublicKey> {
    let text = text.trim();
    if text.len() == ToxId::HEX_LEN {
        return Ok(ToxId::from_hex(text)?.public_key());
    }
    if text.len() == PUBLIC_KEY_SIZE * 2 {
        return Ok(PublicKey::from_hex(text)?);
    }
    bail!(
        "sender must be {} or {} hex characters, got {}",
        PUBLIC_KEY_SIZE * 2,
        ToxId::HEX_LEN,
        text.len()
    )
}

/// What happened to one fed line.
#[derive(Debug)]
pub enum Delivery {
    /// The sender is on the block list; the line never reached the dispatcher.
    Blocked,
    /// The dispatcher handled the line.
    Handled {
        outcome: Outcome,
        replies: Vec<(FriendNumber, String)>,
    },
}

/// A bot instance wired to the in-memory messenger.
pub struct Console<'a> {
    ctx: &'a Context,
    dispatcher: Dispatcher,
    messenger: MemoryMessenger,
    state: BotState,
    masters: KeyList,
    blocked: KeyList,
}

impl<'a> Console<'a> {
    /// Build a bot from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a key list file exists but cannot be read.
    pub fn new(ctx: &'a Context) -> Result<Self> {
        let config = &ctx.config;
        let masters = KeyList::load(&config.masterkeys_path())
            .context("Failed to load master key list")?;
        let blocked = KeyList::load(&config.blockedkeys_path())
            .context("Failed to load blocked key list")?;
        output::debug(
            format!("{} masters, {} blocked", masters.len(), blocked.len()),
            ctx.verbosity,
        );

        Ok(Self {
            ctx,
            dispatcher: Dispatcher::builtin(DispatchSettings::from_config(config)),
            messenger: MemoryMessenger::new(),
            state: BotState::from_config(config),
            masters,
            blocked,
        })
    }

    /// Register the sender as an online contact.
    pub fn connect(&mut self, friend: FriendNumber, key: PublicKey, master: bool) -> Sender {
        self.messenger.add_friend_as(friend, CONSOLE_NAME, true);
        if master {
            self.masters.insert(key);
        }
        Sender::new(friend, key)
    }

    /// The interpreter, for inspecting how a line parses.
    pub fn dispatcher(&self) -> &Dispatcher {
        &self.dispatcher
    }

    /// Feed one line from `sender`.
    pub fn feed(&mut self, sender: &Sender, line: &str) -> Delivery {
        if self.blocked.contains(&sender.key) {
            output::log(
                format!("dropped message from blocked friend {}", sender.friend),
                self.ctx.verbosity,
            );
            return Delivery::Blocked;
        }

        let mut session = Session {
            messenger: &mut self.messenger,
            state: &mut self.state,
            masters: &mut self.masters,
            config: &self.ctx.config,
            verbosity: self.ctx.verbosity,
        };
        let outcome = self.dispatcher.execute(&mut session, sender, line);
        Delivery::Handled {
            outcome,
            replies: self.messenger.take_outbox(),
        }
    }
}

/// Print replies; those addressed to someone other than the sender are
/// marked with the recipient.
pub fn print_replies(sender: &Sender, replies: &[(FriendNumber, String)]) {
    for (friend, text) in replies {
        if *friend == sender.friend {
            output::reply(text);
        } else {
            output::reply(format!("-> {}: {}", friend, text));
        }
    }
}

/// Run the interactive console.
pub fn run(ctx: &Context, sender: Option<&str>, friend: u32, master: bool) -> Result<()> {
    let key = match sender {
        Some(text) => parse_sender_key(text)?,
        None => CONSOLE_KEY,
    };

    let mut console = Console::new(ctx)?;
    let sender = console.connect(FriendNumber(friend), key, master);
    output::log(
        format!("console ready as friend {} ({})", sender.friend, sender.key),
        ctx.verbosity,
    );

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("Failed to read from stdin")?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if let Delivery::Handled { replies, .. } = console.feed(&sender, line) {
            print_replies(&sender, &replies);
        }
    }

    output::debug("stdin closed", ctx.verbosity);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::{Config, ConfigFile, FilesConfig};
    use crate::interp::dispatch::INVALID_COMMAND_REPLY;
    use crate::ui::output::Verbosity;
    use tempfile::TempDir;

    fn context(temp: &TempDir) -> Context {
        let path = |name: &str| Some(temp.path().join(name).display().to_string());
        let file = ConfigFile {
            files: Some(FilesConfig {
                masterkeys: path("masterkeys"),
                blockedkeys: path("blockedkeys"),
                help_file: path("commands.txt"),
                chat_ids_file: path("group_chat_ids"),
            }),
            ..Default::default()
        };
        Context {
            config: Config::from_file(file).unwrap(),
            verbosity: Verbosity::Quiet,
        }
    }

    fn texts(delivery: Delivery) -> Vec<String> {
        match delivery {
            Delivery::Handled { replies, .. } => replies.into_iter().map(|(_, t)| t).collect(),
            Delivery::Blocked => panic!("line was blocked"),
        }
    }

    #[test]
    fn sender_key_forms() {
        let key = PublicKey::new([9; 32]);
        assert_eq!(parse_sender_key(&key.to_string()).unwrap(), key);
        let id = ToxId::from_key(key, 7);
        assert_eq!(parse_sender_key(&id.to_string()).unwrap(), key);
        assert!(parse_sender_key("abc").is_err());
    }

    #[test]
    fn feeds_lines_to_dispatcher() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let mut console = Console::new(&ctx).unwrap();
        let sender = console.connect(FriendNumber(0), CONSOLE_KEY, false);

        assert_eq!(texts(console.feed(&sender, ".nosuch")), vec![INVALID_COMMAND_REPLY]);
        assert_eq!(texts(console.feed(&sender, "hello there")), vec![INVALID_COMMAND_REPLY]);
        assert_eq!(texts(console.feed(&sender, ".id")).len(), 1);
    }

    #[test]
    fn master_flag_grants_privilege() {
        let temp = TempDir::new().unwrap();
        let ctx = context(&temp);
        let mut console = Console::new(&ctx).unwrap();
        let sender = console.connect(FriendNumber(0), CONSOLE_KEY, true);

        assert_eq!(texts(console.feed(&sender, ".purge 30")), vec!["Purge time set to 30 days"]);
    }

    #[test]
    fn blocked_sender_is_dropped() {
        let temp = TempDir::new().unwrap();
        std::fs::write(temp.path().join("blockedkeys"), format!("{}\n", CONSOLE_KEY)).unwrap();
        let ctx = context(&temp);
        let mut console = Console::new(&ctx).unwrap();
        let sender = console.connect(FriendNumber(0), CONSOLE_KEY, true);

        assert!(matches!(console.feed(&sender, ".help"), Delivery::Blocked));
    }
}
