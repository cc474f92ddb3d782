//! cli::commands
//!
//! Command dispatch and handlers.
//!
//! # Architecture
//!
//! Each command handler:
//! 1. Validates command-specific arguments
//! 2. Builds a bot over the in-memory messenger where it needs one
//! 3. Formats and displays output
//!
//! Bot commands themselves live in [`crate::handlers`]; nothing here
//! interprets message lines directly.

mod completion;
mod config_cmd;
mod console;
mod exec;
mod list;

pub use completion::completion;
pub use console::{Console, Delivery};
pub use exec::{ExecReport, Reply};

use crate::cli::args::{Command, ConfigAction};
use crate::core::config::Config;
use crate::ui::output::Verbosity;
use anyhow::Result;

/// Shared state for CLI commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Loaded configuration
    pub config: Config,
    /// Output verbosity from the global flags
    pub verbosity: Verbosity,
}

/// Dispatch a command to its handler.
pub fn dispatch(command: Command, ctx: &Context) -> Result<()> {
    match command {
        Command::Run {
            sender,
            friend,
            master,
        } => console::run(ctx, sender.as_deref(), friend, master),
        Command::Exec {
            line,
            sender,
            master,
            json,
        } => exec::exec(ctx, &line, sender.as_deref(), master, json),
        Command::Commands => list::commands(ctx),
        Command::Config { action } => match action {
            ConfigAction::Show => config_cmd::show(ctx),
            ConfigAction::Init { path, force } => config_cmd::init(ctx, path.as_deref(), force),
        },
        Command::Completion { shell } => completion::completion(shell),
    }
}
