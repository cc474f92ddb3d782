//! core::state
//!
//! Mutable bot state shared by command handlers.
//!
//! The dispatcher itself is stateless per call; everything that survives
//! between commands (apart from the resolver cache) lives here.

use chrono::{DateTime, Utc};

use super::config::Config;
use super::groups::GroupTable;
use super::types::{FriendNumber, GroupNumber};

/// Seconds in a day.
pub const SECONDS_IN_DAY: u64 = 86_400;

/// Default inactivity purge threshold: one year.
pub const DEFAULT_INACTIVE_LIMIT: u64 = 365 * SECONDS_IN_DAY;

/// Bot state.
#[derive(Debug, Clone)]
pub struct BotState {
    /// When the bot started.
    pub start_time: DateTime<Utc>,
    /// Group that `invite` targets when no number is given.
    pub default_group: GroupNumber,
    /// Contacts inactive for longer than this many seconds are purged.
    pub inactive_limit: u64,
    /// Last privileged sender; receives maintenance notifications.
    pub operator: Option<FriendNumber>,
    /// Conferences the bot tracks.
    pub groups: GroupTable,
}

impl BotState {
    /// Fresh state starting now.
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Fresh state with an explicit start time.
    pub fn starting_at(start_time: DateTime<Utc>) -> Self {
        Self {
            start_time,
            default_group: GroupNumber(0),
            inactive_limit: DEFAULT_INACTIVE_LIMIT,
            operator: None,
            groups: GroupTable::new(),
        }
    }

    /// Fresh state with the configured default group and purge threshold.
    pub fn from_config(config: &Config) -> Self {
        Self {
            default_group: GroupNumber(config.default_group()),
            inactive_limit: config.purge_days().saturating_mul(SECONDS_IN_DAY),
            ..Self::new()
        }
    }

    /// Purge threshold in whole days.
    pub fn inactive_days(&self) -> u64 {
        self.inactive_limit / SECONDS_IN_DAY
    }

    /// Uptime at `now`, rendered the way `info` reports it.
    pub fn uptime(&self, now: DateTime<Utc>) -> String {
        let secs = (now - self.start_time).num_seconds().max(0) as u64;
        elapsed_str(secs)
    }
}

impl Default for BotState {
    fn default() -> Self {
        Self::new()
    }
}

/// Render a duration as days, hours, minutes and seconds.
///
/// # Example
///
/// ```
/// use toxbot::core::state::elapsed_str;
///
/// assert_eq!(elapsed_str(90_061), "1 days, 1 hours, 1 minutes, 1 seconds");
/// ```
pub fn elapsed_str(secs: u64) -> String {
    let days = secs / SECONDS_IN_DAY;
    let hours = secs % SECONDS_IN_DAY / 3600;
    let minutes = secs % 3600 / 60;
    let seconds = secs % 60;
    format!(
        "{} days, {} hours, {} minutes, {} seconds",
        days, hours, minutes, seconds
    )
}
