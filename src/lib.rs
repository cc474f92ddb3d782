//! toxbot - Command interpreter for a peer-to-peer messenger bot
//!
//! A contact sends the bot a line of text. If the line is a command it is
//! split into a bounded argument list, resolved against a sorted command
//! table, checked against the master key list and handed to the command's
//! handler. Every failure is reported back to the sender as text.
//!
//! # Architecture
//!
//! The codebase is layered, leaves first:
//!
//! - [`core`] - Domain types, configuration, key lists and bot state
//! - [`transport`] - The messenger seam and an in-memory implementation
//! - [`interp`] - Tokenizer, registry, resolver, privilege gate, dispatcher
//! - [`handlers`] - The built-in commands
//! - [`cli`] - Console front-end (parses args, feeds lines to the dispatcher)
//! - [`ui`] - Output and logging
//!
//! # Invariants
//!
//! 1. A line yields at most four arguments, each within the message bound
//! 2. The command table is sorted and free of duplicates after construction
//! 3. Privileged handlers never run for a sender missing from the master list
//! 4. Malformed or unauthorized input never aborts the process

pub mod cli;
pub mod core;
pub mod handlers;
pub mod interp;
pub mod transport;
pub mod ui;
