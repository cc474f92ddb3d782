//! Property-based tests for the interpreter.
//!
//! These tests use proptest to verify invariants hold across
//! randomly generated lines and command tables.

use std::collections::BTreeSet;

use proptest::prelude::*;

use toxbot::core::config::Config;
use toxbot::core::keylist::KeyList;
use toxbot::core::state::BotState;
use toxbot::core::types::{PublicKey, Sender};
use toxbot::handlers::Session;
use toxbot::interp::registry::{CommandEntry, Registry};
use toxbot::interp::resolve::{lookup, ResolverCache};
use toxbot::interp::tokenize::tokenize;
use toxbot::interp::{DispatchSettings, Dispatcher, MAX_NUM_ARGS};
use toxbot::transport::MemoryMessenger;
use toxbot::ui::output::Verbosity;

/// Strategy for lines built from words, quotes, escapes and spaces.
fn line_chars() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop_oneof![
            4 => prop::char::range('a', 'z'),
            2 => Just(' '),
            1 => Just('"'),
            1 => Just('\\'),
            1 => prop::char::range('0', '9'),
            1 => Just('é'),
        ],
        0..80,
    )
    .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for unquoted, unescaped lines.
fn plain_line() -> impl Strategy<Value = String> {
    prop::collection::vec(prop_oneof![4 => prop::char::range('a', 'z'), 1 => Just(' ')], 0..60)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Strategy for a set of distinct command names.
fn command_names() -> impl Strategy<Value = BTreeSet<String>> {
    prop::collection::btree_set("[a-z]{1,6}", 1..=32)
}

fn registry_of(names: &BTreeSet<String>) -> Registry<()> {
    // Reverse so construction has to sort.
    let entries = names
        .iter()
        .rev()
        .map(|n| CommandEntry::new(n.clone(), (), false, ""))
        .collect();
    Registry::new(entries).unwrap()
}

proptest! {
    /// No line yields more than four arguments or an argument over capacity.
    #[test]
    fn tokenizer_respects_bounds(line in line_chars(), capacity in 1usize..24) {
        if let Ok(args) = tokenize(&line, capacity) {
            prop_assert!(args.len() <= MAX_NUM_ARGS);
            for arg in args.iter() {
                prop_assert!(arg.as_str().len() <= capacity);
            }
        }
    }

    /// Without quotes or escapes, tokenizing is splitting on spaces.
    #[test]
    fn plain_lines_split_on_spaces(line in plain_line()) {
        let args = tokenize(&line, 1372).unwrap();
        let expected: Vec<&str> = line
            .split(' ')
            .filter(|w| !w.is_empty())
            .take(MAX_NUM_ARGS)
            .collect();
        let got: Vec<&str> = args.iter().map(|a| a.as_str()).collect();
        prop_assert_eq!(got, expected);
    }

    /// Tokenizing the same line twice gives the same result.
    #[test]
    fn tokenizer_is_deterministic(line in line_chars()) {
        prop_assert_eq!(tokenize(&line, 16), tokenize(&line, 16));
    }

    /// The cached search finds exactly what a plain search finds, from any
    /// starting cache and carrying the cache across queries.
    #[test]
    fn lookup_matches_oracle(
        names in command_names(),
        seed in 0usize..40,
        queries in prop::collection::vec("[a-z]{0,6}", 1..20),
    ) {
        let registry = registry_of(&names);
        let mut cache = ResolverCache::at(seed);
        for query in &queries {
            let found = lookup(&registry, &mut cache, query).map(|e| e.name.clone());
            let expected = registry.find(query).map(|e| e.name.clone());
            prop_assert_eq!(found, expected);
            prop_assert!(cache.index() < registry.len());
        }
    }

    /// Every registered name is found regardless of the cache seed.
    #[test]
    fn every_name_resolves(names in command_names(), seed in 0usize..40) {
        let registry = registry_of(&names);
        for name in &names {
            let mut cache = ResolverCache::at(seed);
            let entry = lookup(&registry, &mut cache, name);
            prop_assert_eq!(entry.map(|e| e.name.as_str()), Some(name.as_str()));
        }
    }

    /// Arbitrary lines never panic the dispatcher, and every line that does
    /// not succeed produces exactly one reply.
    #[test]
    fn dispatcher_replies_once_on_failure(line in line_chars(), privileged in any::<bool>()) {
        let mut messenger = MemoryMessenger::new();
        let friend = messenger.add_friend("fuzz", true);
        let key = PublicKey::new([3; 32]);
        let mut masters = if privileged {
            KeyList::from_lines(&[key.to_string()])
        } else {
            KeyList::new()
        };
        let mut state = BotState::new();
        let config = Config::default();
        let sender = Sender::new(friend, key);
        let mut dispatcher = Dispatcher::builtin(DispatchSettings::default());

        let line = format!(".{}", line);
        let outcome = {
            let mut session = Session {
                messenger: &mut messenger,
                state: &mut state,
                masters: &mut masters,
                config: &config,
                verbosity: Verbosity::Quiet,
            };
            dispatcher.execute(&mut session, &sender, &line)
        };

        if !outcome.is_success() {
            let sent = messenger.sent_to(friend);
            prop_assert_eq!(sent.len(), 1, "replies: {:?}", sent);
            prop_assert_eq!(sent.first().cloned(), outcome.reply());
        }
    }
}
