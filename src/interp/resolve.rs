//! interp::resolve
//!
//! Cached binary search over the command registry.
//!
//! # Algorithm
//!
//! Every lookup searches the whole registry (`left = 0`,
//! `right = len - 1`), but the first probe is the index left in the cache by
//! the previous lookup instead of the midpoint. A sender repeating a command
//! hits on the first comparison.
//!
//! After a miss the next probe is computed from the old probe and the
//! remaining bound:
//!
//! - target after probe: `left = probe + 1`, next `(right + probe + 1) / 2`
//! - target before probe: `right = probe - 1`, next `(left + probe - 1) / 2`
//!
//! Both are the midpoint of the narrowed range, so from the second probe on
//! this is an ordinary binary search. The cache records every probe, hit or
//! miss.
//!
//! A target that sorts before entry 0 while the probe sits at 0 would need
//! `right = -1`; the search stops there with no match.
//!
//! # Sharing
//!
//! One cache serves all senders. It is owned by the dispatcher and only
//! touched through `&mut`, so no locking is involved.

use super::registry::{CommandEntry, Registry};

/// Index of the entry most recently probed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolverCache {
    index: usize,
}

impl ResolverCache {
    /// A cache seeded at the middle of the registry.
    pub fn for_registry<H>(registry: &Registry<H>) -> Self {
        Self {
            index: registry.len() / 2,
        }
    }

    /// A cache seeded at an arbitrary index.
    pub fn at(index: usize) -> Self {
        Self { index }
    }

    /// The cached index.
    pub fn index(&self) -> usize {
        self.index
    }
}

/// Look up a command name, starting from the cached probe.
///
/// # Example
///
/// ```
/// use toxbot::interp::registry::{CommandEntry, Registry};
/// use toxbot::interp::resolve::{lookup, ResolverCache};
///
/// let registry = Registry::new(vec![
///     CommandEntry::new("help", (), false, ""),
///     CommandEntry::new("id", (), false, ""),
///     CommandEntry::new("info", (), false, ""),
/// ])
/// .unwrap();
/// let mut cache = ResolverCache::for_registry(&registry);
///
/// assert_eq!(lookup(&registry, &mut cache, "help").map(|e| e.name.as_str()), Some("help"));
/// assert_eq!(cache.index(), 0);
/// assert!(lookup(&registry, &mut cache, "nope").is_none());
/// ```
pub fn lookup<'r, H>(
    registry: &'r Registry<H>,
    cache: &mut ResolverCache,
    name: &str,
) -> Option<&'r CommandEntry<H>> {
    let entries = registry.entries();
    if entries.is_empty() {
        return None;
    }

    let target = name.as_bytes();
    let mut left = 0usize;
    let mut right = entries.len() - 1;
    let mut probe = cache.index.min(right);
    cache.index = probe;

    while left <= right {
        let entry = &entries[probe];
        match target.cmp(entry.name.as_bytes()) {
            std::cmp::Ordering::Equal => return Some(entry),
            std::cmp::Ordering::Greater => {
                left = probe + 1;
                probe = (right + probe + 1) / 2;
            }
            std::cmp::Ordering::Less => {
                if probe == 0 {
                    return None;
                }
                right = probe - 1;
                probe = (left + probe - 1) / 2;
            }
        }
        cache.index = probe;
    }
    None
}
