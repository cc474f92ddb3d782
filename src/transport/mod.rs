//! transport
//!
//! The messenger seam.
//!
//! # Modules
//!
//! - [`traits`] - The `Messenger` trait and its error type
//! - [`memory`] - In-memory implementation
//!
//! # Design
//!
//! Handlers depend on `dyn Messenger` only. The binding to the real
//! peer-to-peer library lives outside this crate.

pub mod memory;
pub mod traits;

pub use memory::MemoryMessenger;
pub use traits::{ChatId, ConferenceInfo, Messenger, MessengerError, PublicGroup, UserStatus};
