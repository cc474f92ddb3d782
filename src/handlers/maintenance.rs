//! handlers::maintenance
//!
//! Public group upkeep: saving chat ids, reconnecting and disconnecting.
//!
//! `rejoin` and `exit` report to the operator contact rather than the
//! sender. Since the dispatcher makes every privileged sender the operator,
//! that is normally the same contact.

use std::fs;

use super::{arg, Session};
use crate::core::types::{GroupNumber, Sender};
use crate::interp::{Arg, HandlerError};
use crate::ui::output;

/// Upper bound on public groups listed by `save`.
const MAX_SAVED_GROUPS: usize = 64;

/// `save`: write the chat ids of joined public groups, one per line.
///
/// Nothing is sent until the file is written, so a failed save produces
/// only the dispatcher's error reply.
pub fn cmd_save(
    session: &mut Session<'_>,
    sender: &Sender,
    _args: &[Arg],
) -> Result<(), HandlerError> {
    let groups = session.messenger.public_groups();
    session.log(format!("public groups: {}", groups.len()));
    if groups.is_empty() {
        session.reply(sender, "no connected group");
        return Ok(());
    }

    let mut notices = vec![format!("found: {}", groups.len())];
    let mut contents = String::new();
    for group in groups.iter().take(MAX_SAVED_GROUPS) {
        match group.chat_id {
            Some(chat_id) => {
                contents.push_str(&chat_id.to_string());
                contents.push('\n');
            }
            None => {
                notices.push(format!("{} unable to get chat_id", group.number));
                break;
            }
        }
    }
    if groups.len() > MAX_SAVED_GROUPS {
        notices.push(format!(
            "group limit reached: {}/{}",
            MAX_SAVED_GROUPS,
            groups.len()
        ));
    }

    let path = session.config.chat_ids_path();
    if let Err(e) = fs::write(&path, contents) {
        output::error(format!("failed to write '{}': {}", path.display(), e));
        return Err(HandlerError::Failed {
            message: "Warning: save failed".to_string(),
            code: e.raw_os_error().unwrap_or(-1),
        });
    }
    session.log(format!("saved chat ids to {}", path.display()));

    for notice in &notices {
        session.reply(sender, notice);
    }
    session.reply(sender, "ok");
    Ok(())
}

/// Parse the group argument, or tell the operator the usage.
fn target(session: &mut Session<'_>, args: &[Arg], usage: &str) -> Option<GroupNumber> {
    match arg(args, 0).map(GroupNumber::parse) {
        Some(Ok(number)) => Some(number),
        _ => {
            session.notify_operator(usage);
            None
        }
    }
}

fn report_connection(session: &mut Session<'_>, number: GroupNumber) {
    if session.messenger.group_is_connected(number) {
        session.log(format!("group {} reports connected", number));
        session.notify_operator("connected?");
    } else {
        session.notify_operator("not connected");
    }
}

/// `rejoin <n>`
pub fn cmd_rejoin(
    session: &mut Session<'_>,
    _sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let number = match target(session, args, ".rejoin number") {
        Some(n) => n,
        None => return Ok(()),
    };
    session.log(format!("group number: {}", number));
    report_connection(session, number);

    match session.messenger.group_reconnect(number) {
        Ok(()) => session.notify_operator("reconnect ok"),
        Err(e) => {
            output::log_error(e.code, format!("failed to reconnect group {}", number));
            session.notify_operator("reconnect failed");
        }
    }
    Ok(())
}

/// `exit <n>`
pub fn cmd_exit(
    session: &mut Session<'_>,
    _sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let number = match target(session, args, ".exit number") {
        Some(n) => n,
        None => return Ok(()),
    };
    report_connection(session, number);

    match session.messenger.group_disconnect(number) {
        Ok(()) => {
            session.log(format!("disconnected from group {}", number));
            session.notify_operator("ok");
        }
        Err(e) => {
            output::log_error(e.code, format!("failed to disconnect group {}", number));
            session.notify_operator("failed");
        }
    }
    Ok(())
}
