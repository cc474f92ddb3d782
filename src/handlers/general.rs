//! handlers::general
//!
//! Commands open to every contact.

use std::fs;

use super::{arg, group_arg, Session};
use crate::core::groups::{check_password, GroupKind};
use crate::core::types::{PublicKey, Sender};
use crate::interp::{Arg, HandlerError};
use crate::transport::traits::ERR_ALREADY_JOINED;
use crate::transport::ChatId;

/// Lines sent by `help` with no arguments.
pub const HELP_LINES: &[&str] = &[
    ".info : Print my current status and list active group chats",
    ".id : Print my Tox ID",
    ".invite : Request invite to default group chat",
    ".invite <n> <p> : Request invite to group chat n (with password p if protected)",
    ".group <type> <pass> : Creates a new groupchat with type: text | audio (optional password)",
];

/// Extra `help` line for privileged senders.
pub const HELP_MASTER_LINE: &str = "For a list of master commands see the commands.txt file";

/// Shortest chat id argument `join` will try.
const MIN_CHAT_ID_ARG: usize = 32;

/// `help [admin]`
pub fn cmd_help(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    match args {
        [] => {
            for line in HELP_LINES {
                session.reply(sender, line);
            }
            if session.masters.contains(&sender.key) {
                session.reply(sender, HELP_MASTER_LINE);
            }
        }
        [topic] if topic.as_str() == "admin" => {
            let path = session.config.help_file_path();
            if !path.exists() {
                let file = path
                    .file_name()
                    .map(|f| f.to_string_lossy().into_owned())
                    .unwrap_or_default();
                return Err(HandlerError::usage(format!("not found {} file", file)));
            }
            match fs::read_to_string(&path) {
                Ok(contents) => {
                    for line in contents.lines().filter(|l| !l.trim().is_empty()) {
                        session.reply(sender, line);
                    }
                }
                Err(e) => session.log(format!(
                    "failed to read '{}': {}",
                    path.display(),
                    e
                )),
            }
        }
        _ => session.reply(sender, "send: .help"),
    }
    Ok(())
}

/// `id`
pub fn cmd_id(
    session: &mut Session<'_>,
    sender: &Sender,
    _args: &[Arg],
) -> Result<(), HandlerError> {
    let address = session.messenger.self_address().to_string();
    session.reply(sender, &address);
    Ok(())
}

/// `info`: uptime, contacts, purge threshold, conferences, public groups.
pub fn cmd_info(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let uptime = session.state.uptime(chrono::Utc::now());
    session.reply(sender, &format!("Uptime: {}", uptime));

    let friends = format!(
        "Friends: {} ({} online)",
        session.messenger.friend_count(),
        session.messenger.online_friend_count()
    );
    session.reply(sender, &friends);

    let purge = format!(
        "Inactive friends are purged after {} days",
        session.state.inactive_days()
    );
    session.reply(sender, &purge);

    let conferences = session.messenger.conferences();
    if conferences.is_empty() {
        session.reply(sender, "No active groupchats");
        return Ok(());
    }
    for conference in conferences {
        let title = session
            .state
            .groups
            .get(conference.number)
            .map(|g| g.display_title().to_string())
            .unwrap_or_else(|| "None".to_string());
        let line = format!(
            "Group {} | {} | peers: {} | Title: {}",
            conference.number, conference.kind, conference.peers, title
        );
        session.reply(sender, &line);
    }
    cmd_list(session, sender, args)
}

/// Join a public group, treating "already joined" as success.
fn join(session: &mut Session<'_>, chat_id: &ChatId) -> bool {
    let name = session.config.bot_name().to_string();
    match session.messenger.join_public_group(chat_id, &name) {
        Ok(group) => {
            session.log(format!("joined public group {}", group));
            true
        }
        Err(e) if e.code == ERR_ALREADY_JOINED => true,
        Err(e) => {
            crate::ui::output::log_error(e.code, format!("failed to join {}", chat_id));
            false
        }
    }
}

/// `init`: join the configured public group.
pub fn cmd_init(
    session: &mut Session<'_>,
    sender: &Sender,
    _args: &[Arg],
) -> Result<(), HandlerError> {
    let joined = match session.config.public_chat_id().map(PublicKey::from_hex) {
        Some(Ok(chat_id)) => join(session, &chat_id),
        Some(Err(_)) | None => {
            session.log("no public chat id configured");
            false
        }
    };
    session.reply(sender, if joined { "ok" } else { "failed" });
    Ok(())
}

/// `join [chat id]`
pub fn cmd_join(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let text = match arg(args, 0) {
        Some(t) => t.to_string(),
        None => session.config.public_chat_id().unwrap_or_default().to_string(),
    };
    if text.len() < MIN_CHAT_ID_ARG {
        return Err(HandlerError::usage("wrong chat_id"));
    }
    let joined = match PublicKey::from_hex(&text) {
        Ok(chat_id) => join(session, &chat_id),
        Err(_) => false,
    };
    session.reply(sender, if joined { "ok" } else { "failed" });
    Ok(())
}

/// `list`: joined public groups with their chat ids.
pub fn cmd_list(
    session: &mut Session<'_>,
    sender: &Sender,
    _args: &[Arg],
) -> Result<(), HandlerError> {
    let groups = session.messenger.public_groups();
    if groups.is_empty() {
        session.reply(sender, "no connected group");
        return Ok(());
    }
    session.reply(sender, &format!("connected public groups: {}", groups.len()));
    for group in groups {
        match group.chat_id {
            Some(chat_id) => {
                let line = format!("{} {} {}", group.number, group.name, chat_id);
                session.reply(sender, &line);
            }
            None => {
                let line = format!("{} {} unable to get chat_id", group.number, group.name);
                session.reply(sender, &line);
                break;
            }
        }
    }
    Ok(())
}

/// `invite [n] [password]`
pub fn cmd_invite(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let number = match arg(args, 0) {
        Some(text) => group_arg(text, "Error: Invalid group number")?,
        None => session.state.default_group,
    };
    let name = session.name_of(sender);

    let chat = session
        .state
        .groups
        .get(number)
        .ok_or_else(|| HandlerError::usage("Group doesn't exist."))?;
    if !chat.accepts(arg(args, 1)) {
        crate::ui::output::log_error(
            -1,
            format!("Failed to invite {} to group {} (invalid password)", name, number),
        );
        return Err(HandlerError::usage("Invalid password."));
    }

    if let Err(e) = session.messenger.conference_invite(sender.friend, number) {
        crate::ui::output::log_error(
            e.code,
            format!("Failed to invite {} to group {}", name, number),
        );
        return Err(HandlerError::failed("Invite failed", &e));
    }
    session.reply(sender, "ok");
    session.log(format!("Invited {} to group {}", name, number));
    Ok(())
}

/// `group <text|audio> [password]`
pub fn cmd_group(
    session: &mut Session<'_>,
    sender: &Sender,
    args: &[Arg],
) -> Result<(), HandlerError> {
    let kind = match arg(args, 0) {
        Some(text) => GroupKind::from_arg(text),
        None => {
            return Err(HandlerError::usage(
                "Please specify the group type: audio or text",
            ))
        }
    };
    let password = arg(args, 1);
    let name = session.name_of(sender);

    if password.map(check_password).transpose().is_err() {
        crate::ui::output::log_error(
            -1,
            format!("Group chat creation by {} failed: Password too long", name),
        );
        return Err(HandlerError::usage(
            "Group chat instance failed to initialize: Password too long",
        ));
    }

    let number = session.messenger.conference_new(kind).map_err(|e| {
        crate::ui::output::log_error(
            e.code,
            format!("Group chat creation by {} failed to initialize", name),
        );
        HandlerError::failed("Group chat instance failed to initialize.", &e)
    })?;

    if let Err(e) = session.state.groups.add(number, kind, password) {
        crate::ui::output::log_error(-1, format!("Group chat creation by {} failed: {}", name, e));
        if let Err(e) = session.messenger.conference_delete(number) {
            crate::ui::output::log_error(e.code, format!("failed to delete group {}", number));
        }
        return Err(HandlerError::usage("Group chat creation failed"));
    }

    let protected = if password.is_some() {
        " (Password protected)"
    } else {
        ""
    };
    session.log(format!("Group chat {} created by {}{}", number, name, protected));
    session.reply(sender, &format!("Group chat {} created{}", number, protected));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{GroupNumber, ToxId};
    use crate::handlers::harness::Harness;
    use crate::transport::memory::FailOn;
    use crate::transport::Messenger;

    mod group {
        use super::*;

        #[test]
        fn creates_text_group() {
            let mut h = Harness::new();
            h.run(cmd_group, "group text").unwrap();
            assert_eq!(h.replies(), vec!["Group chat 0 created"]);
            let chat = h.state.groups.get(GroupNumber(0)).unwrap();
            assert_eq!(chat.kind, GroupKind::Text);
            assert!(!chat.has_password());
        }

        #[test]
        fn audio_is_case_insensitive() {
            let mut h = Harness::new();
            h.run(cmd_group, "group AUDIO").unwrap();
            assert_eq!(
                h.state.groups.get(GroupNumber(0)).unwrap().kind,
                GroupKind::Audio
            );
        }

        #[test]
        fn password_protected() {
            let mut h = Harness::new();
            h.run(cmd_group, r#"group text "secret""#).unwrap();
            assert_eq!(h.replies(), vec!["Group chat 0 created (Password protected)"]);
            assert!(h.state.groups.get(GroupNumber(0)).unwrap().accepts(Some("secret")));
        }

        #[test]
        fn missing_type() {
            let mut h = Harness::new();
            let err = h.run(cmd_group, "group").unwrap_err();
            assert_eq!(err.to_string(), "Please specify the group type: audio or text");
            assert!(h.messenger.conferences().is_empty());
        }

        #[test]
        fn long_password_creates_nothing() {
            let mut h = Harness::new();
            let line = format!("group text {}", "p".repeat(32));
            let err = h.run(cmd_group, &line).unwrap_err();
            assert_eq!(
                err.to_string(),
                "Group chat instance failed to initialize: Password too long"
            );
            assert!(h.messenger.conferences().is_empty());
            assert!(h.state.groups.is_empty());
        }

        #[test]
        fn messenger_failure_has_code() {
            let mut h = Harness::new();
            h.messenger = h.messenger.clone().fail_on(FailOn::ConferenceNew(1));
            let err = h.run(cmd_group, "group text").unwrap_err();
            assert_eq!(
                err.to_string(),
                "Group chat instance failed to initialize. (error 1)"
            );
        }
    }

    mod invite {
        use super::*;

        fn with_group(password: Option<&str>) -> Harness {
            let mut h = Harness::new();
            let n = h.messenger.conference_new(GroupKind::Text).unwrap();
            h.state.groups.add(n, GroupKind::Text, password).unwrap();
            h
        }

        #[test]
        fn default_group() {
            let mut h = with_group(None);
            h.run(cmd_invite, "invite").unwrap();
            assert_eq!(h.replies(), vec!["ok"]);
            assert_eq!(h.messenger.conference_peers(GroupNumber(0)), vec![h.friend()]);
        }

        #[test]
        fn unknown_group() {
            let mut h = with_group(None);
            let err = h.run(cmd_invite, "invite 5").unwrap_err();
            assert_eq!(err.to_string(), "Group doesn't exist.");
        }

        #[test]
        fn invalid_number() {
            let mut h = with_group(None);
            let err = h.run(cmd_invite, "invite abc").unwrap_err();
            assert_eq!(err.to_string(), "Error: Invalid group number");
        }

        #[test]
        fn wrong_password() {
            let mut h = with_group(Some("secret"));
            let err = h.run(cmd_invite, "invite 0 wrong").unwrap_err();
            assert_eq!(err.to_string(), "Invalid password.");
            assert!(h.messenger.conference_peers(GroupNumber(0)).is_empty());
        }

        #[test]
        fn missing_password() {
            let mut h = with_group(Some("secret"));
            assert!(h.run(cmd_invite, "invite 0").is_err());
        }

        #[test]
        fn right_password() {
            let mut h = with_group(Some("secret"));
            h.run(cmd_invite, "invite 0 secret").unwrap();
            assert_eq!(h.replies(), vec!["ok"]);
        }

        #[test]
        fn messenger_failure() {
            let mut h = with_group(None);
            h.messenger = h.messenger.clone().fail_on(FailOn::ConferenceInvite(2));
            let err = h.run(cmd_invite, "invite 0").unwrap_err();
            assert_eq!(err.to_string(), "Invite failed (error 2)");
        }
    }

    mod help {
        use super::*;
        use tempfile::TempDir;

        #[test]
        fn plain_help() {
            let mut h = Harness::new();
            h.run(cmd_help, "help").unwrap();
            assert_eq!(h.replies(), HELP_LINES);
        }

        #[test]
        fn master_gets_extra_line() {
            let mut h = Harness::new();
            h.masters = crate::core::keylist::KeyList::from_lines(&["01".repeat(32)]);
            h.run(cmd_help, "help").unwrap();
            assert_eq!(h.replies().last().unwrap(), HELP_MASTER_LINE);
        }

        #[test]
        fn admin_without_file() {
            let temp = TempDir::new().unwrap();
            let mut h = Harness::new();
            h.config.file.files = Some(crate::core::config::FilesConfig {
                help_file: Some(temp.path().join("commands.txt").display().to_string()),
                ..Default::default()
            });
            let err = h.run(cmd_help, "help admin").unwrap_err();
            assert_eq!(err.to_string(), "not found commands.txt file");
        }

        #[test]
        fn admin_dumps_file() {
            let temp = TempDir::new().unwrap();
            let path = temp.path().join("commands.txt");
            fs::write(&path, ".name <name>\n\n.purge <days>\n").unwrap();
            let mut h = Harness::new();
            h.config.file.files = Some(crate::core::config::FilesConfig {
                help_file: Some(path.display().to_string()),
                ..Default::default()
            });
            h.run(cmd_help, "help admin").unwrap();
            assert_eq!(h.replies(), vec![".name <name>", ".purge <days>"]);
        }

        #[test]
        fn other_topic() {
            let mut h = Harness::new();
            h.run(cmd_help, "help me").unwrap();
            assert_eq!(h.replies(), vec!["send: .help"]);
        }
    }

    mod status {
        use super::*;

        #[test]
        fn id_prints_address() {
            let address = ToxId::from_key(PublicKey::new([0xAB; 32]), 7);
            let mut h = Harness::new();
            h.messenger = crate::transport::MemoryMessenger::with_address(address);
            h.messenger.add_friend("alice", true);
            h.run(cmd_id, "id").unwrap();
            assert_eq!(h.replies(), vec![address.to_string()]);
        }

        #[test]
        fn info_without_groups() {
            let mut h = Harness::new();
            h.run(cmd_info, "info").unwrap();
            let replies = h.replies();
            assert!(replies[0].starts_with("Uptime: 0 days, 0 hours"));
            assert_eq!(replies[1], "Friends: 1 (1 online)");
            assert_eq!(replies[2], "Inactive friends are purged after 365 days");
            assert_eq!(replies[3], "No active groupchats");
            assert_eq!(replies.len(), 4);
        }

        #[test]
        fn info_lists_groups_and_public_groups() {
            let mut h = Harness::new();
            h.run(cmd_group, "group audio").unwrap();
            h.state.groups.set_title(GroupNumber(0), "lobby").unwrap();
            h.messenger
                .join_public_group(&PublicKey::new([0x5C; 32]), "bot")
                .unwrap();
            h.replies();

            h.run(cmd_info, "info").unwrap();
            let replies = h.replies();
            assert_eq!(replies[3], "Group 0 | Audio | peers: 1 | Title: lobby");
            assert_eq!(replies[4], "connected public groups: 1");
            assert_eq!(replies[5], format!("0 bot {}", "5C".repeat(32)));
        }

        #[test]
        fn list_empty() {
            let mut h = Harness::new();
            h.run(cmd_list, "list").unwrap();
            assert_eq!(h.replies(), vec!["no connected group"]);
        }
    }

    mod public {
        use super::*;

        #[test]
        fn join_short_id() {
            let mut h = Harness::new();
            let err = h.run(cmd_join, "join 1234").unwrap_err();
            assert_eq!(err.to_string(), "wrong chat_id");
        }

        #[test]
        fn join_explicit_id() {
            let mut h = Harness::new();
            let line = format!("join {}", "AB".repeat(32));
            h.run(cmd_join, &line).unwrap();
            assert_eq!(h.replies(), vec!["ok"]);
            assert_eq!(h.messenger.public_groups().len(), 1);

            h.run(cmd_join, &line).unwrap();
            assert_eq!(h.replies(), vec!["ok"]);
            assert_eq!(h.messenger.public_groups().len(), 1);
        }

        #[test]
        fn join_bad_hex() {
            let mut h = Harness::new();
            let line = format!("join {}", "ZZ".repeat(32));
            h.run(cmd_join, &line).unwrap();
            assert_eq!(h.replies(), vec!["failed"]);
        }

        #[test]
        fn init_without_config() {
            let mut h = Harness::new();
            h.run(cmd_init, "init").unwrap();
            assert_eq!(h.replies(), vec!["failed"]);
        }

        #[test]
        fn init_with_config() {
            let mut h = Harness::new();
            h.config.file.public_chat_id = Some("5C".repeat(32));
            h.run(cmd_init, "init").unwrap();
            assert_eq!(h.replies(), vec!["ok"]);
            assert_eq!(h.messenger.public_groups()[0].name, "bot");
        }
    }
}
