//! core
//!
//! Core domain types, state, and configuration for toxbot.
//!
//! # Modules
//!
//! - [`types`] - Strong types: PublicKey, ToxId, FriendNumber, GroupNumber
//! - [`groups`] - Tracked conference table with passwords and titles
//! - [`keylist`] - Master and blocked key lists
//! - [`state`] - Mutable bot state shared by handlers
//! - [`config`] - Configuration schema and loading
//!
//! # Design Principles
//!
//! - Strong typing prevents invalid states at compile time
//! - Schemas are strict and self-describing
//! - Nothing here talks to the messenger

pub mod config;
pub mod groups;
pub mod keylist;
pub mod state;
pub mod types;
