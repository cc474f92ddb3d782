//! core::keylist
//!
//! Line-oriented key list files (the master list and the block list).
//!
//! # Format
//!
//! One entry per line, either a 64-character public key or a 76-character
//! address, in hex of either case. Blank lines and lines starting with `#`
//! are skipped. A peer matches an entry when the first 32 bytes of the entry
//! equal the peer's public key, so an address and its bare key match the
//! same peer.
//!
//! # Example
//!
//! ```
//! use toxbot::core::keylist::KeyList;
//! use toxbot::core::types::PublicKey;
//!
//! let key = PublicKey::new([7; 32]);
//! let list = KeyList::from_lines(&[key.to_string()]);
//! assert!(list.contains(&key));
//! ```

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use fs2::FileExt;
use thiserror::Error;

use super::types::{PublicKey, ToxId, PUBLIC_KEY_SIZE};

/// Errors from key list operations.
#[derive(Debug, Error)]
pub enum KeyListError {
    #[error("failed to read key list '{path}': {source}")]
    ReadError {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write key list '{path}': {source}")]
    WriteError {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// An in-memory view of a key list, optionally backed by a file.
#[derive(Debug, Clone, Default)]
pub struct KeyList {
    keys: Vec<PublicKey>,
    path: Option<PathBuf>,
}

impl KeyList {
    /// An empty list with no backing file.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an in-memory list from entry lines.
    ///
    /// Lines that are not a valid key or address are skipped.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        Self {
            keys: lines.iter().filter_map(|l| parse_entry(l.as_ref())).collect(),
            path: None,
        }
    }

    /// Load a list from a file.
    ///
    /// A missing file is an empty list, so a fresh install has no masters
    /// and blocks nobody.
    ///
    /// # Errors
    ///
    /// Returns `KeyListError::ReadError` if the file exists but cannot be read.
    pub fn load(path: &Path) -> Result<Self, KeyListError> {
        let keys = if path.exists() {
            let contents = fs::read_to_string(path).map_err(|e| KeyListError::ReadError {
                path: path.to_path_buf(),
                source: e,
            })?;
            contents.lines().filter_map(parse_entry).collect()
        } else {
            Vec::new()
        };

        Ok(Self {
            keys,
            path: Some(path.to_path_buf()),
        })
    }

    /// Check whether a peer's key is on the list.
    pub fn contains(&self, key: &PublicKey) -> bool {
        self.keys.iter().any(|k| k == key)
    }

    /// Append an address to the list.
    ///
    /// The line is written to the backing file (under an exclusive lock)
    /// before the in-memory view changes.
    ///
    /// # Errors
    ///
    /// Returns `KeyListError::WriteError` if the backing file cannot be
    /// opened, locked or written.
    pub fn append(&mut self, id: &ToxId) -> Result<(), KeyListError> {
        if let Some(path) = &self.path {
            let write_err = |e| KeyListError::WriteError {
                path: path.clone(),
                source: e,
            };
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(write_err)?;
            file.lock_exclusive().map_err(write_err)?;
            let written = writeln!(file, "{}", id).and_then(|_| file.sync_all());
            // Unlock errors are irrelevant once the data is synced; the lock
            // is released on close regardless.
            let _ = file.unlock();
            written.map_err(write_err)?;
        }
        self.keys.push(id.public_key());
        Ok(())
    }

    /// Add a key to the in-memory view only.
    pub fn insert(&mut self, key: PublicKey) {
        if !self.contains(&key) {
            self.keys.push(key);
        }
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the list has no entries.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// The backing file, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

/// Parse one list line into the public key it names.
fn parse_entry(line: &str) -> Option<PublicKey> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return None;
    }
    match line.len() {
        n if n == PUBLIC_KEY_SIZE * 2 => PublicKey::from_hex(line).ok(),
        ToxId::HEX_LEN => ToxId::from_hex(line).ok().map(|id| id.public_key()),
        _ => None,
    }
}
