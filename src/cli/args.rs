//! cli::args
//!
//! Command-line argument definitions using clap derive.
//!
//! # Global Flags
//!
//! These flags are available on all commands:
//! - `--help` / `-h`: Show help
//! - `--version`: Show version
//! - `--config <path>`: Use this config file instead of the default search
//! - `--debug`: Enable debug logging
//! - `--quiet` / `-q`: Replies only, no log lines

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// toxbot - Command interpreter for a messenger bot
#[derive(Parser, Debug)]
#[command(name = "toxbot")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to the config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Replies only, no log lines
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Parser::parse()
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read lines from stdin and dispatch each as a friend message
    Run {
        /// Sender public key or address (hex)
        #[arg(long = "as", value_name = "KEY")]
        sender: Option<String>,

        /// Friend number of the sender
        #[arg(long, default_value_t = 0)]
        friend: u32,

        /// Treat the sender as a master
        #[arg(long)]
        master: bool,
    },

    /// Dispatch a single line and print the replies
    Exec {
        /// The message line, prefix included
        line: String,

        /// Sender public key or address (hex)
        #[arg(long = "as", value_name = "KEY")]
        sender: Option<String>,

        /// Treat the sender as a master
        #[arg(long)]
        master: bool,

        /// Print a JSON report instead of plain replies
        #[arg(long)]
        json: bool,
    },

    /// List the registered commands
    Commands,

    /// Inspect or create the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completion scripts
    Completion {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Print the effective configuration as TOML
    Show,

    /// Write a config file populated with the defaults
    Init {
        /// Where to write (defaults to ~/.toxbot/config.toml)
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Supported shells for completion
#[derive(clap::ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parse_exec_with_flags() {
        let cli = Cli::try_parse_from([
            "toxbot", "--quiet", "exec", ".help", "--master", "--json",
        ])
        .unwrap();
        assert!(cli.quiet);
        match cli.command {
            Command::Exec {
                line,
                sender,
                master,
                json,
            } => {
                assert_eq!(line, ".help");
                assert!(sender.is_none());
                assert!(master);
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn parse_run_sender() {
        let key = "ab".repeat(32);
        let cli = Cli::try_parse_from(["toxbot", "run", "--as", &key, "--friend", "3"]).unwrap();
        match cli.command {
            Command::Run { sender, friend, .. } => {
                assert_eq!(sender.as_deref(), Some(key.as_str()));
                assert_eq!(friend, 3);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn global_config_after_subcommand() {
        let cli = Cli::try_parse_from(["toxbot", "commands", "--config", "/tmp/x.toml"]).unwrap();
        assert_eq!(cli.config, Some(PathBuf::from("/tmp/x.toml")));
    }

    #[test]
    fn exec_requires_line() {
        assert!(Cli::try_parse_from(["toxbot", "exec"]).is_err());
    }
}
