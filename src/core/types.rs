//! core::types
//!
//! Strong types for core domain concepts.
//!
//! # Types
//!
//! - [`PublicKey`] - A peer's 32-byte long-term public key
//! - [`ToxId`] - A full 38-byte messenger address (key, nospam, checksum)
//! - [`FriendNumber`] - The messenger's handle for a contact
//! - [`GroupNumber`] - The messenger's handle for a conference
//! - [`Sender`] - The identity that submitted an input line
//!
//! # Validation
//!
//! Keys and addresses are parsed from hex at construction time. Invalid
//! values cannot be represented.
//!
//! # Examples
//!
//! ```
//! use toxbot::core::types::{PublicKey, ToxId};
//!
//! let key = PublicKey::from_hex(&"AB".repeat(32)).unwrap();
//! assert_eq!(key.to_string(), "AB".repeat(32));
//!
//! assert!(ToxId::from_hex("not-hex").is_err());
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Size of a public key in bytes.
pub const PUBLIC_KEY_SIZE: usize = 32;

/// Size of a full address in bytes (public key + nospam + checksum).
pub const ADDRESS_SIZE: usize = PUBLIC_KEY_SIZE + 6;

/// Size of a public group chat id in bytes.
pub const CHAT_ID_SIZE: usize = 32;

/// Errors from type validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid public key: {0}")]
    InvalidPublicKey(String),

    #[error("invalid address: {0}")]
    InvalidAddress(String),

    #[error("invalid group number: {0}")]
    InvalidGroupNumber(String),
}

fn decode_exact<const N: usize>(text: &str) -> Result<[u8; N], String> {
    if text.len() != N * 2 {
        return Err(format!("expected {} hex characters, got {}", N * 2, text.len()));
    }
    let mut out = [0u8; N];
    hex::decode_to_slice(text, &mut out).map_err(|e| e.to_string())?;
    Ok(out)
}

/// A peer's long-term public key.
///
/// Rendered as 64 uppercase hex characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PublicKey([u8; PUBLIC_KEY_SIZE]);

impl PublicKey {
    /// Create a key from raw bytes.
    pub const fn new(bytes: [u8; PUBLIC_KEY_SIZE]) -> Self {
        Self(bytes)
    }

    /// Parse a key from 64 hex characters (either case).
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidPublicKey` on wrong length or non-hex input.
    pub fn from_hex(text: &str) -> Result<Self, TypeError> {
        decode_exact::<PUBLIC_KEY_SIZE>(text.trim())
            .map(Self)
            .map_err(TypeError::InvalidPublicKey)
    }

    /// Get the raw key bytes.
    pub fn as_bytes(&self) -> &[u8; PUBLIC_KEY_SIZE] {
        &self.0
    }
}

impl TryFrom<String> for PublicKey {
    type Error = TypeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::from_hex(&s)
    }
}

impl From<PublicKey> for String {
    fn from(key: PublicKey) -> Self {
        key.to_string()
    }
}

impl std::fmt::Display for PublicKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

/// A full messenger address: public key, 4-byte nospam and 2-byte checksum.
///
/// Rendered as 76 uppercase hex characters. This is what users paste when
/// adding a contact and what the `id` command prints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ToxId([u8; ADDRESS_SIZE]);

impl ToxId {
    /// Number of hex characters in a rendered address.
    pub const HEX_LEN: usize = ADDRESS_SIZE * 2;

    /// Create an address from raw bytes.
    pub const fn new(bytes: [u8; ADDRESS_SIZE]) -> Self {
        Self(bytes)
    }

    /// Build an address for a key with the given nospam value.
    ///
    /// The checksum is the XOR of the key and nospam taken two bytes at a time.
    pub fn from_key(key: PublicKey, nospam: u32) -> Self {
        let mut bytes = [0u8; ADDRESS_SIZE];
        bytes[..PUBLIC_KEY_SIZE].copy_from_slice(key.as_bytes());
        bytes[PUBLIC_KEY_SIZE..PUBLIC_KEY_SIZE + 4].copy_from_slice(&nospam.to_be_bytes());
        let mut checksum = [0u8; 2];
        for (i, b) in bytes[..ADDRESS_SIZE - 2].iter().enumerate() {
            checksum[i % 2] ^= b;
        }
        bytes[ADDRESS_SIZE - 2..].copy_from_slice(&checksum);
        Self(bytes)
    }

    /// Parse an address from 76 hex characters.
    ///
    /// # Errors
    ///
    /// Returns `TypeError::InvalidAddress` on wrong length or non-hex input.
    pub fn from_hex(text: &str) -> Result<Self, TypeError> {
        decode_exact::<ADDRESS_SIZE>(text.trim())
            .map(Self)
            .map_err(TypeError::InvalidAddress)
    }

    /// The public key part of the address.
    pub fn public_key(&self) -> PublicKey {
        let mut key = [0u8; PUBLIC_KEY_SIZE];
        key.copy_from_slice(&self.0[..PUBLIC_KEY_SIZE]);
        PublicKey(key)
    }
}

impl std::fmt::Display for ToxId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", hex::encode_upper(self.0))
    }
}

/// The messenger's handle for a contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FriendNumber(pub u32);

impl std::fmt::Display for FriendNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The messenger's handle for a conference or public group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupNumber(pub u32);

impl GroupNumber {
    /// Parse a group number typed by a user.
    ///
    /// Only plain non-negative decimal numbers are accepted.
    ///
    /// # Example
    ///
    /// ```
    /// use toxbot::core::types::GroupNumber;
    ///
    /// assert_eq!(GroupNumber::parse("0").unwrap(), GroupNumber(0));
    /// assert_eq!(GroupNumber::parse("12").unwrap(), GroupNumber(12));
    /// assert!(GroupNumber::parse("-1").is_err());
    /// assert!(GroupNumber::parse("abc").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, TypeError> {
        if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(TypeError::InvalidGroupNumber(text.to_string()));
        }
        text.parse::<u32>()
            .map(GroupNumber)
            .map_err(|_| TypeError::InvalidGroupNumber(text.to_string()))
    }
}

impl std::fmt::Display for GroupNumber {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The remote identity that submitted an input line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Sender {
    /// Contact handle, used to address replies.
    pub friend: FriendNumber,
    /// Long-term key, used for privilege and block checks.
    pub key: PublicKey,
}

impl Sender {
    /// Create a sender.
    pub fn new(friend: FriendNumber, key: PublicKey) -> Self {
        Self { friend, key }
    }
}
