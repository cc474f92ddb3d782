//! interp::dispatch
//!
//! Line to outcome: length check, prefix check, tokenize, resolve, gate,
//! invoke.
//!
//! # Outcomes
//!
//! | outcome          | reply to sender                                      |
//! |------------------|------------------------------------------------------|
//! | `Dispatched(Ok)` | whatever the handler sent                            |
//! | `Dispatched(Err)`| the handler error's message                          |
//! | `NotFound`       | `Invalid command. Type help for a list of commands`  |
//! | `MalformedInput` | `Invalid command. Type help for a list of commands`  |
//! | `Unauthorized`   | `You do not have permission to use this command.`    |
//!
//! Every non-success outcome produces exactly one reply, sent by the
//! dispatcher itself.
//!
//! # Example
//!
//! ```
//! use toxbot::core::config::Config;
//! use toxbot::core::keylist::KeyList;
//! use toxbot::core::state::BotState;
//! use toxbot::core::types::{PublicKey, Sender};
//! use toxbot::handlers::Session;
//! use toxbot::interp::{DispatchSettings, Dispatcher, Outcome};
//! use toxbot::transport::MemoryMessenger;
//! use toxbot::ui::output::Verbosity;
//!
//! let mut messenger = MemoryMessenger::new();
//! let friend = messenger.add_friend("alice", true);
//! let mut state = BotState::new();
//! let mut masters = KeyList::new();
//! let config = Config::default();
//! let mut session = Session {
//!     messenger: &mut messenger,
//!     state: &mut state,
//!     masters: &mut masters,
//!     config: &config,
//!     verbosity: Verbosity::Quiet,
//! };
//!
//! let mut dispatcher = Dispatcher::builtin(DispatchSettings::default());
//! let sender = Sender::new(friend, PublicKey::new([7; 32]));
//!
//! assert_eq!(dispatcher.execute(&mut session, &sender, ".nosuch"), Outcome::NotFound);
//! assert_eq!(
//!     messenger.sent_to(friend),
//!     vec!["Invalid command. Type help for a list of commands".to_string()]
//! );
//! ```

use thiserror::Error;

use super::gate::{gate, GateResult};
use super::registry::Registry;
use super::resolve::{lookup, ResolverCache};
use super::tokenize::{tokenize, Arg, Args};
use crate::core::config::{Config, DEFAULT_MAX_MESSAGE_LENGTH, DEFAULT_PREFIX};
use crate::core::types::Sender;
use crate::handlers::{self, Session};
use crate::transport::MessengerError;
use crate::ui::output;

/// Reply for unknown commands and malformed lines.
pub const INVALID_COMMAND_REPLY: &str = "Invalid command. Type help for a list of commands";

/// Reply for privileged commands from unprivileged senders.
pub const NO_PERMISSION_REPLY: &str = "You do not have permission to use this command.";

/// Shortest accepted line in bytes.
pub const MIN_LINE_LENGTH: usize = 2;

/// Longest command line echoed into the log.
const LOG_LINE_LIMIT: usize = 64;

/// A failed command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HandlerError {
    /// Bad or missing arguments; the text is replied verbatim.
    #[error("{0}")]
    Usage(String),

    /// A messenger or storage call failed.
    #[error("{message} (error {code})")]
    Failed { message: String, code: i32 },
}

impl HandlerError {
    /// A usage error.
    pub fn usage(text: impl Into<String>) -> Self {
        HandlerError::Usage(text.into())
    }

    /// A failure carrying a messenger error code.
    pub fn failed(message: impl Into<String>, err: &MessengerError) -> Self {
        HandlerError::Failed {
            message: message.into(),
            code: err.code,
        }
    }
}

/// Command handler signature.
pub type Handler = fn(&mut Session<'_>, &Sender, &[Arg]) -> Result<(), HandlerError>;

/// The result of interpreting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A handler ran.
    Dispatched(Result<(), HandlerError>),
    /// No command has that name.
    NotFound,
    /// The command needs privilege the sender lacks.
    Unauthorized,
    /// The line is not a command.
    MalformedInput,
}

impl Outcome {
    /// The reply the dispatcher sends for this outcome, if any.
    pub fn reply(&self) -> Option<String> {
        match self {
            Outcome::Dispatched(Ok(())) => None,
            Outcome::Dispatched(Err(e)) => Some(e.to_string()),
            Outcome::NotFound | Outcome::MalformedInput => Some(INVALID_COMMAND_REPLY.to_string()),
            Outcome::Unauthorized => Some(NO_PERMISSION_REPLY.to_string()),
        }
    }

    /// Whether a handler ran and succeeded.
    pub fn is_success(&self) -> bool {
        matches!(self, Outcome::Dispatched(Ok(())))
    }

    /// Short machine-readable name.
    pub fn label(&self) -> &'static str {
        match self {
            Outcome::Dispatched(Ok(())) => "dispatched",
            Outcome::Dispatched(Err(_)) => "handler-error",
            Outcome::NotFound => "not-found",
            Outcome::Unauthorized => "unauthorized",
            Outcome::MalformedInput => "malformed-input",
        }
    }
}

/// Line-level settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchSettings {
    /// Command prefix.
    pub prefix: char,
    /// Lines this long or longer are rejected.
    pub max_message_length: usize,
    /// Command names accepted as a whole line without the prefix.
    pub aliases: Vec<String>,
}

impl DispatchSettings {
    /// Settings from a loaded configuration.
    pub fn from_config(config: &Config) -> Self {
        Self {
            prefix: config.prefix(),
            max_message_length: config.max_message_length(),
            aliases: config.aliases(),
        }
    }
}

impl Default for DispatchSettings {
    fn default() -> Self {
        Self {
            prefix: DEFAULT_PREFIX,
            max_message_length: DEFAULT_MAX_MESSAGE_LENGTH,
            aliases: vec!["invite".to_string()],
        }
    }
}

/// The command interpreter.
pub struct Dispatcher {
    registry: Registry<Handler>,
    cache: ResolverCache,
    settings: DispatchSettings,
}

impl Dispatcher {
    /// Create a dispatcher over a registry.
    pub fn new(registry: Registry<Handler>, settings: DispatchSettings) -> Self {
        let cache = ResolverCache::for_registry(&registry);
        Self {
            registry,
            cache,
            settings,
        }
    }

    /// Create a dispatcher over the built-in command table.
    pub fn builtin(settings: DispatchSettings) -> Self {
        Self::new(handlers::builtin_registry(), settings)
    }

    /// The command table.
    pub fn registry(&self) -> &Registry<Handler> {
        &self.registry
    }

    /// The resolver cache.
    pub fn cache(&self) -> ResolverCache {
        self.cache
    }

    /// The line-level settings.
    pub fn settings(&self) -> &DispatchSettings {
        &self.settings
    }

    /// Split a line into arguments, or `None` if it is not a command.
    pub fn parse(&self, line: &str) -> Option<Args> {
        let max = self.settings.max_message_length;
        if line.len() < MIN_LINE_LENGTH || line.len() >= max {
            return None;
        }

        let args = if let Some(rest) = line.strip_prefix(self.settings.prefix) {
            tokenize(rest, max).ok()?
        } else if self.settings.aliases.iter().any(|a| a == line) {
            Args::from_words(&[line])
        } else {
            return None;
        };

        if args.is_empty() {
            None
        } else {
            Some(args)
        }
    }

    /// Interpret one line from `sender` and reply on failure.
    pub fn execute(&mut self, session: &mut Session<'_>, sender: &Sender, line: &str) -> Outcome {
        let outcome = self.interpret(session, sender, line);

        if let Some(reply) = outcome.reply() {
            session.reply(sender, &reply);
        }
        output::debug(
            format!("friend {}: {}", sender.friend, outcome.label()),
            session.verbosity,
        );
        outcome
    }

    fn interpret(&mut self, session: &mut Session<'_>, sender: &Sender, line: &str) -> Outcome {
        let args = match self.parse(line) {
            Some(args) => args,
            None => return Outcome::MalformedInput,
        };
        let name = args.command().unwrap_or_default();

        output::log(
            format!(
                "run cmd from {}: {}",
                sender.friend,
                output::shorten(line, LOG_LINE_LIMIT)
            ),
            session.verbosity,
        );

        let entry = match lookup(&self.registry, &mut self.cache, name) {
            Some(entry) => entry,
            None => {
                output::log(
                    format!("not found: {}", output::shorten(name, LOG_LINE_LIMIT)),
                    session.verbosity,
                );
                return Outcome::NotFound;
            }
        };
        output::debug(
            format!("resolved {} at {}", entry.name, self.cache.index()),
            session.verbosity,
        );

        match gate(entry, &*session.masters, sender) {
            GateResult::Denied => {
                output::log(
                    format!("ignored command from {}: {}", sender.friend, entry.name),
                    session.verbosity,
                );
                Outcome::Unauthorized
            }
            GateResult::Allowed { privileged } => {
                if privileged {
                    session.state.operator = Some(sender.friend);
                }
                Outcome::Dispatched((entry.handler)(session, sender, args.rest()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keylist::KeyList;
    use crate::core::state::BotState;
    use crate::core::types::{FriendNumber, PublicKey};
    use crate::interp::registry::CommandEntry;
    use crate::transport::MemoryMessenger;
    use crate::ui::output::Verbosity;

    fn ok_handler(
        session: &mut Session<'_>,
        sender: &Sender,
        args: &[Arg],
    ) -> Result<(), HandlerError> {
        let words: Vec<_> = args.iter().map(Arg::as_str).collect();
        session.reply(sender, &format!("ok {}", words.join("|")));
        Ok(())
    }

    fn failing_handler(_: &mut Session<'_>, _: &Sender, _: &[Arg]) -> Result<(), HandlerError> {
        Err(HandlerError::Failed {
            message: "Invite failed".to_string(),
            code: 2,
        })
    }

    fn dispatcher() -> Dispatcher {
        let registry = Registry::new(vec![
            CommandEntry::new("echo", ok_handler as Handler, false, ""),
            CommandEntry::new("invite", ok_handler as Handler, false, ""),
            CommandEntry::new("fail", failing_handler as Handler, false, ""),
            CommandEntry::new("secret", ok_handler as Handler, true, ""),
        ])
        .unwrap();
        Dispatcher::new(
            registry,
            DispatchSettings {
                prefix: '.',
                max_message_length: 32,
                aliases: vec!["invite".to_string()],
            },
        )
    }

    struct Fixture {
        messenger: MemoryMessenger,
        state: BotState,
        masters: KeyList,
        config: Config,
        friend: FriendNumber,
    }

    impl Fixture {
        fn new() -> Self {
            let mut messenger = MemoryMessenger::new();
            let friend = messenger.add_friend("alice", true);
            Self {
                messenger,
                state: BotState::new(),
                masters: KeyList::from_lines(&["AA".repeat(32)]),
                config: Config::default(),
                friend,
            }
        }

        fn run(&mut self, dispatcher: &mut Dispatcher, key: u8, line: &str) -> Outcome {
            let sender = Sender::new(self.friend, PublicKey::new([key; 32]));
            let mut session = Session {
                messenger: &mut self.messenger,
                state: &mut self.state,
                masters: &mut self.masters,
                config: &self.config,
                verbosity: Verbosity::Quiet,
            };
            dispatcher.execute(&mut session, &sender, line)
        }

        fn replies(&mut self) -> Vec<String> {
            self.messenger
                .take_outbox()
                .into_iter()
                .map(|(_, text)| text)
                .collect()
        }
    }

    mod lines {
        use super::*;

        #[test]
        fn prefix_only_is_malformed() {
            let mut f = Fixture::new();
            assert_eq!(f.run(&mut dispatcher(), 1, "."), Outcome::MalformedInput);
            assert_eq!(f.replies(), vec![INVALID_COMMAND_REPLY]);
        }

        #[test]
        fn at_max_length_is_malformed() {
            let mut f = Fixture::new();
            let line = format!(".echo {}", "x".repeat(32 - 6));
            assert_eq!(line.len(), 32);
            assert_eq!(f.run(&mut dispatcher(), 1, &line), Outcome::MalformedInput);
        }

        #[test]
        fn just_under_max_length_is_dispatched() {
            let mut f = Fixture::new();
            let line = format!(".echo {}", "x".repeat(31 - 6));
            assert_eq!(f.run(&mut dispatcher(), 1, &line), Outcome::Dispatched(Ok(())));
        }

        #[test]
        fn missing_prefix_is_malformed() {
            let mut f = Fixture::new();
            assert_eq!(f.run(&mut dispatcher(), 1, "echo hi"), Outcome::MalformedInput);
        }

        #[test]
        fn blank_after_prefix_is_malformed() {
            let mut f = Fixture::new();
            assert_eq!(f.run(&mut dispatcher(), 1, ".   "), Outcome::MalformedInput);
        }

        #[test]
        fn bare_alias_dispatches_without_args() {
            let mut f = Fixture::new();
            assert_eq!(f.run(&mut dispatcher(), 1, "invite"), Outcome::Dispatched(Ok(())));
            assert_eq!(f.replies(), vec!["ok "]);
        }

        #[test]
        fn alias_must_match_whole_line() {
            let mut f = Fixture::new();
            assert_eq!(f.run(&mut dispatcher(), 1, "invite 0"), Outcome::MalformedInput);
        }
    }

    mod resolution {
        use super::*;

        #[test]
        fn unknown_name_not_found() {
            let mut f = Fixture::new();
            assert_eq!(f.run(&mut dispatcher(), 1, ".nosuch"), Outcome::NotFound);
            assert_eq!(f.replies(), vec![INVALID_COMMAND_REPLY]);
        }

        #[test]
        fn args_passed_without_command() {
            let mut f = Fixture::new();
            f.run(&mut dispatcher(), 1, r#".echo a "b c" d\ e"#);
            assert_eq!(f.replies(), vec!["ok a|b c|d e"]);
        }

        #[test]
        fn repeated_lookup_keeps_cache() {
            let mut f = Fixture::new();
            let mut d = dispatcher();
            f.run(&mut d, 1, ".echo");
            let first = d.cache();
            f.run(&mut d, 1, ".echo");
            assert_eq!(d.cache(), first);
            assert_eq!(d.registry().get(first.index()).unwrap().name, "echo");
        }
    }

    mod privilege {
        use super::*;

        #[test]
        fn unprivileged_sender_rejected() {
            let mut f = Fixture::new();
            assert_eq!(f.run(&mut dispatcher(), 1, ".secret"), Outcome::Unauthorized);
            assert_eq!(f.replies(), vec![NO_PERMISSION_REPLY]);
            assert_eq!(f.state.operator, None);
        }

        #[test]
        fn privileged_sender_becomes_operator() {
            let mut f = Fixture::new();
            assert_eq!(
                f.run(&mut dispatcher(), 0xAA, ".secret"),
                Outcome::Dispatched(Ok(()))
            );
            assert_eq!(f.state.operator, Some(f.friend));
        }

        #[test]
        fn open_command_does_not_set_operator() {
            let mut f = Fixture::new();
            f.run(&mut dispatcher(), 0xAA, ".echo");
            assert_eq!(f.state.operator, None);
        }
    }

    mod replies {
        use super::*;

        #[test]
        fn handler_error_replied_once() {
            let mut f = Fixture::new();
            let outcome = f.run(&mut dispatcher(), 1, ".fail");
            assert!(!outcome.is_success());
            assert_eq!(f.replies(), vec!["Invite failed (error 2)"]);
        }

        #[test]
        fn usage_error_replied_verbatim() {
            assert_eq!(
                Outcome::Dispatched(Err(HandlerError::usage("Invalid password."))).reply(),
                Some("Invalid password.".to_string())
            );
        }

        #[test]
        fn labels() {
            assert_eq!(Outcome::NotFound.label(), "not-found");
            assert_eq!(Outcome::Dispatched(Ok(())).label(), "dispatched");
        }
    }
}
