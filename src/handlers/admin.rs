//! handlers::admin
//!
//! Privileged commands: profile settings and conference administration.
//!
//! The dispatcher has already checked privilege by the time these run.

use super::{arg, group_arg, Session};
use crate::core::config::schema::MAX_NAME_LENGTH;
use crate::core::groups::check_password;
use crate::core::state::SECONDS_IN_DAY;
use crate::core::types::{Sender, ToxId};
use crate::interp::{Arg, HandlerError};
use crate::transport::UserStatus;
use crate::ui::output;

/// `default <n>`
pub fn cmd_default(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let text = arg(args, 0).ok_or_else(|| HandlerError::usage("Error: Room number required"))?;
    let number = group_arg(text, "Error: Invalid room number")?;

    session.state.default_group = number;
    session.reply(sender, &format!("Default room number set to {}", number));
    let name = session.name_of(sender);
    session.log(format!("Default room number set to {} by {}", number, name));
    Ok(())
}

/// `gmessage <n> "<message>"`
pub fn cmd_gmessage(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let text = arg(args, 0).ok_or_else(|| HandlerError::usage("Error: Group number required"))?;
    let message = args
        .get(1)
        .ok_or_else(|| HandlerError::usage("Error: Message required"))?;
    let number = group_arg(text, "Error: Invalid group number")?;
    if session.state.groups.get(number).is_none() {
        return Err(HandlerError::usage("Error: Invalid group number"));
    }
    if !message.is_quoted() {
        return Err(HandlerError::usage(
            "Error: Message must be enclosed in quotes",
        ));
    }

    session
        .messenger
        .conference_send(number, message.as_str())
        .map_err(|e| HandlerError::failed("Error: Failed to send message.", &e))?;

    session.reply(sender, "Message sent.");
    let name = session.name_of(sender);
    session.log(format!(
        "<{}> message to group {}: {}",
        name,
        number,
        output::shorten(message.as_str(), 64)
    ));
    Ok(())
}

/// `leave <n>`
pub fn cmd_leave(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let text = arg(args, 0).ok_or_else(|| HandlerError::usage("Error: Group number required"))?;
    let number = group_arg(text, "Error: Invalid group number")?;

    session
        .messenger
        .conference_delete(number)
        .map_err(|_| HandlerError::usage("Error: Invalid group number"))?;
    session.state.groups.remove(number);

    let name = session.name_of(sender);
    session.log(format!("Left group {} ({})", number, name));
    session.reply(sender, &format!("Left group {}", number));
    Ok(())
}

/// `master <tox id>`
pub fn cmd_master(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let text = arg(args, 0).ok_or_else(|| HandlerError::usage("Error: Tox ID required"))?;
    if text.len() != ToxId::HEX_LEN {
        return Err(HandlerError::usage("Error: Invalid Tox ID"));
    }
    let id = ToxId::from_hex(text).map_err(|_| HandlerError::usage("Error: Invalid Tox ID"))?;

    if let Err(e) = session.masters.append(&id) {
        output::error(&e);
        return Err(HandlerError::usage("Error: could not find masterkeys file"));
    }

    let name = session.name_of(sender);
    session.log(format!("{} added master: {}", name, id));
    session.reply(sender, "ID added to masterkeys list");
    Ok(())
}

/// `name <name>`: sets the bot's name without a reply.
pub fn cmd_name(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let new_name = arg(args, 0).ok_or_else(|| HandlerError::usage("Error: Name required"))?;
    if new_name.len() > MAX_NAME_LENGTH {
        return Err(HandlerError::usage("Error: Name is too long"));
    }

    session
        .messenger
        .set_name(new_name)
        .map_err(|e| HandlerError::failed("Error: Failed to set name", &e))?;

    let name = session.name_of(sender);
    session.log(format!("{} set name to {}", name, new_name));
    session.save_profile();
    Ok(())
}

/// `passwd <n> [password]`: one argument clears the password.
pub fn cmd_passwd(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let text = arg(args, 0).ok_or_else(|| HandlerError::usage("Error: group number required"))?;
    let number = group_arg(text, "Error: Invalid group number")?;
    if session.state.groups.get(number).is_none() {
        return Err(HandlerError::usage("Error: Invalid group number"));
    }
    let name = session.name_of(sender);

    let password = match arg(args, 1) {
        None => {
            let _ = session.state.groups.set_password(number, None);
            session.reply(sender, "No password set");
            session.log(format!("No password set for group {} by {}", number, name));
            return Ok(());
        }
        Some(p) => p,
    };

    check_password(password).map_err(|_| HandlerError::usage("Password too long"))?;
    session
        .state
        .groups
        .set_password(number, Some(password))
        .map_err(|_| HandlerError::usage("Error: Invalid group number"))?;

    session.reply(sender, "Password set");
    session.log(format!("Password for group {} set by {}", number, name));
    Ok(())
}

/// `purge <days>`
pub fn cmd_purge(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let days = arg(args, 0)
        .and_then(|t| t.parse::<u64>().ok())
        .filter(|d| *d > 0)
        .ok_or_else(|| HandlerError::usage("Error: number > 0 required"))?;

    session.state.inactive_limit = days.saturating_mul(SECONDS_IN_DAY);
    session.reply(sender, &format!("Purge time set to {} days", days));
    let name = session.name_of(sender);
    session.log(format!("Purge time set to {} days by {}", days, name));
    Ok(())
}

/// `status <online|away|busy>`: sets presence without a reply.
pub fn cmd_status(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let text = arg(args, 0).ok_or_else(|| HandlerError::usage("Error: status required"))?;
    let status = UserStatus::parse(text).ok_or_else(|| {
        HandlerError::usage("Invalid status. Valid statuses are: online, busy and away.")
    })?;

    session
        .messenger
        .set_status(status)
        .map_err(|e| HandlerError::failed("Error: Failed to set status", &e))?;

    let name = session.name_of(sender);
    session.log(format!("{} set status to {}", name, status));
    session.save_profile();
    Ok(())
}

/// `statusmessage "<message>"`: sets the status text without a reply.
pub fn cmd_statusmessage(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let message = args
        .first()
        .ok_or_else(|| HandlerError::usage("Error: message required"))?;
    if !message.is_quoted() {
        return Err(HandlerError::usage(
            "Error: message must be enclosed in quotes",
        ));
    }

    session
        .messenger
        .set_status_message(message.as_str())
        .map_err(|e| HandlerError::failed("Error: Failed to set status message", &e))?;

    let name = session.name_of(sender);
    session.log(format!("{} set status message to \"{}\"", name, message.as_str()));
    session.save_profile();
    Ok(())
}

/// `title <n> "<title>"`
pub fn cmd_title(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let (text, title) = match args {
        [number, title, ..] => (number.as_str(), title),
        _ => return Err(HandlerError::usage("Error: Two arguments are required")),
    };
    if !title.is_quoted() {
        return Err(HandlerError::usage(
            "Error: title must be enclosed in quotes",
        ));
    }
    let number = group_arg(text, "Error: Invalid group number")?;
    let name = session.name_of(sender);

    if let Err(e) = session.messenger.conference_set_title(number, title.as_str()) {
        output::log_error(
            e.code,
            format!(
                "{} failed to set the title '{}' for group {}",
                name,
                title.as_str(),
                number
            ),
        );
        return Err(HandlerError::failed(
            "Failed to set title. This may be caused by an invalid group number or an empty room",
            &e,
        ));
    }
    // Conferences the bot joined by invite are not tracked.
    let _ = session.state.groups.set_title(number, title.as_str());

    session.reply(sender, "Group title set");
    session.log(format!("{} set group {} title to {}", name, number, title.as_str()));
    Ok(())
}
