//! exec command - Dispatch a single line

use anyhow::Result;
use serde::Serialize;

use super::console::{parse_sender_key, print_replies, Console, Delivery, CONSOLE_KEY};
use super::Context;
use crate::core::types::FriendNumber;
use crate::interp::Arg;

/// JSON report printed by `exec --json`.
#[derive(Debug, Serialize)]
pub struct ExecReport {
    /// The input line.
    pub line: String,
    /// Outcome label, or `blocked`.
    pub outcome: String,
    /// Parsed arguments, command name first; empty when the line is not a
    /// command.
    pub args: Vec<Arg>,
    /// Replies in send order.
    pub replies: Vec<Reply>,
}

/// One message the bot sent.
#[derive(Debug, Serialize)]
pub struct Reply {
    pub friend: u32,
    pub text: String,
}

/// Dispatch `line` once and report what the bot did.
pub fn exec(
    ctx: &Context,
    line: &str,
    sender: Option<&str>,
    master: bool,
    json: bool,
) -> Result<()> {
    let key = match sender {
        Some(text) => parse_sender_key(text)?,
        None => CONSOLE_KEY,
    };

    let mut console = Console::new(ctx)?;
    let sender = console.connect(FriendNumber(0), key, master);
    let args: Vec<Arg> = console
        .dispatcher()
        .parse(line)
        .map(|a| a.iter().cloned().collect())
        .unwrap_or_default();

    let (outcome, replies) = match console.feed(&sender, line) {
        Delivery::Blocked => ("blocked".to_string(), Vec::new()),
        Delivery::Handled { outcome, replies } => (outcome.label().to_string(), replies),
    };

    if json {
        let report = ExecReport {
            line: line.to_string(),
            outcome,
            args,
            replies: replies
                .into_iter()
                .map(|(friend, text)| Reply {
                    friend: friend.0,
                    text,
                })
                .collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_replies(&sender, &replies);
    }

    Ok(())
}
