//! interp::registry
//!
//! The command table.
//!
//! # Invariants
//!
//! - Entries are sorted ascending by byte-wise name comparison
//! - Names are unique
//! - The table is never empty
//! - The table is immutable once built
//!
//! The registry is generic over the handler type so the search machinery can
//! be tested without a live session.

use thiserror::Error;

/// Errors from building a registry.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    #[error("duplicate command name: {0}")]
    DuplicateName(String),

    #[error("registry has no commands")]
    Empty,
}

/// One command: its name, handler, privilege requirement and usage line.
#[derive(Debug, Clone)]
pub struct CommandEntry<H> {
    /// Name typed after the prefix.
    pub name: String,
    /// Function invoked on a match.
    pub handler: H,
    /// Whether only privileged senders may run it.
    pub requires_privilege: bool,
    /// One-line usage shown by `help`.
    pub usage: &'static str,
}

impl<H> CommandEntry<H> {
    /// Create an entry.
    pub fn new(
        name: impl Into<String>,
        handler: H,
        requires_privilege: bool,
        usage: &'static str,
    ) -> Self {
        Self {
            name: name.into(),
            handler,
            requires_privilege,
            usage,
        }
    }
}

/// Sorted, duplicate-free command table.
#[derive(Debug, Clone)]
pub struct Registry<H> {
    entries: Vec<CommandEntry<H>>,
}

impl<H> Registry<H> {
    /// Sort the entries and check them.
    ///
    /// # Errors
    ///
    /// Returns `RegistryError::Empty` for an empty table and
    /// `RegistryError::DuplicateName` if two entries share a name.
    pub fn new(mut entries: Vec<CommandEntry<H>>) -> Result<Self, RegistryError> {
        if entries.is_empty() {
            return Err(RegistryError::Empty);
        }
        entries.sort_by(|a, b| a.name.as_bytes().cmp(b.name.as_bytes()));
        if let Some(pair) = entries.windows(2).find(|w| w[0].name == w[1].name) {
            return Err(RegistryError::DuplicateName(pair[0].name.clone()));
        }
        Ok(Self { entries })
    }

    /// Stateless lookup by name.
    pub fn find(&self, name: &str) -> Option<&CommandEntry<H>> {
        self.entries
            .binary_search_by(|e| e.name.as_bytes().cmp(name.as_bytes()))
            .ok()
            .map(|i| &self.entries[i])
    }

    /// Entry at a sorted position.
    pub fn get(&self, index: usize) -> Option<&CommandEntry<H>> {
        self.entries.get(index)
    }

    /// All entries in sorted order.
    pub fn entries(&self) -> &[CommandEntry<H>] {
        &self.entries
    }

    /// Number of entries (always at least one).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always false; present for API symmetry.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(name: &str) -> CommandEntry<()> {
        CommandEntry::new(name, (), false, "")
    }

    #[test]
    fn sorts_by_bytes() {
        let registry =
            Registry::new(vec![entry("title"), entry("Zed"), entry("help"), entry("id")]).unwrap();
        let names: Vec<_> = registry.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "help", "id", "title"]);
    }

    #[test]
    fn duplicate_rejected() {
        let err = Registry::new(vec![entry("a"), entry("b"), entry("a")]).unwrap_err();
        assert_eq!(err, RegistryError::DuplicateName("a".to_string()));
    }

    #[test]
    fn empty_rejected() {
        let err = Registry::<()>::new(Vec::new()).unwrap_err();
        assert_eq!(err, RegistryError::Empty);
    }

    #[test]
    fn find_exact_only() {
        let registry = Registry::new(vec![entry("status"), entry("statusmessage")]).unwrap();
        assert_eq!(registry.find("status").unwrap().name, "status");
        assert_eq!(
            registry.find("statusmessage").unwrap().name,
            "statusmessage"
        );
        assert!(registry.find("stat").is_none());
        assert!(registry.find("STATUS").is_none());
    }
}
