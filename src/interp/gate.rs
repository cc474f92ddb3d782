//! interp::gate
//!
//! Privilege gating for resolved commands.
//!
//! # Design
//!
//! The dispatcher does not know where privilege comes from. It asks an
//! [`Authority`] whether a sender's key is privileged; the master key list is
//! the production authority. Unprivileged commands pass without consulting
//! the authority at all.
//!
//! # Invariants
//!
//! - A privileged entry is never allowed for a sender the authority rejects
//! - Gating is deterministic for a given authority and sender

use super::registry::CommandEntry;
use crate::core::keylist::KeyList;
use crate::core::types::{PublicKey, Sender};

/// Source of the "is this sender privileged" predicate.
pub trait Authority {
    /// Whether a key may run privileged commands.
    fn is_privileged(&self, key: &PublicKey) -> bool;
}

impl Authority for KeyList {
    fn is_privileged(&self, key: &PublicKey) -> bool {
        self.contains(key)
    }
}

impl<F> Authority for F
where
    F: Fn(&PublicKey) -> bool,
{
    fn is_privileged(&self, key: &PublicKey) -> bool {
        self(key)
    }
}

/// Result of gating.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateResult {
    /// The command may run. `privileged` is true when the entry required it.
    Allowed { privileged: bool },
    /// The sender lacks the privilege the entry requires.
    Denied,
}

/// Decide whether `sender` may run `entry`.
pub fn gate<H>(entry: &CommandEntry<H>, authority: &dyn Authority, sender: &Sender) -> GateResult {
    if !entry.requires_privilege {
        return GateResult::Allowed { privileged: false };
    }
    if authority.is_privileged(&sender.key) {
        GateResult::Allowed { privileged: true }
    } else {
        GateResult::Denied
    }
}
