//! Canonical keys for unordered user pairs.
//!
//! Relationship facts about the same two users originate from different input
//! lines (each side's adjacency list, or a pair line plus a follow list). The
//! canonical key is what lets the shuffle phase bring those records together:
//! the same unordered pair always produces the identical key string, whichever
//! side it was seen from.

use std::fmt;

/// Canonical, order-independent key for an unordered pair of users.
///
/// Rendered as `min(a,b) + "-" + max(a,b)` under lexicographic byte order.
/// Callers must reject self-pairs before constructing a key; `a == b` is a
/// contract violation, not a representable state.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey(String);

impl PairKey {
    pub fn new(a: &str, b: &str) -> Self {
        debug_assert_ne!(a, b, "self-pair passed to PairKey::new");
        if a <= b {
            Self(format!("{a}-{b}"))
        } else {
            Self(format!("{b}-{a}"))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_symmetric() {
        assert_eq!(PairKey::new("alice", "bob"), PairKey::new("bob", "alice"));
    }

    #[test]
    fn key_orders_lexicographically() {
        assert_eq!(PairKey::new("bob", "alice").as_str(), "alice-bob");
        assert_eq!(PairKey::new("alice", "bob").as_str(), "alice-bob");
    }

    #[test]
    fn key_compares_by_canonical_string() {
        let ab = PairKey::new("a", "b");
        let ac = PairKey::new("c", "a");
        assert!(ab < ac);
    }

    #[test]
    fn display_matches_canonical_form() {
        assert_eq!(PairKey::new("x", "w").to_string(), "w-x");
    }
}
