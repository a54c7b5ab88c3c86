//! Core type definitions for forests

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// Source of node identities, shared by every forest in the process so that
/// an identity is never handed out twice.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// Unique, immutable identifier for a forest node
///
/// Identities are allocated from a process-wide counter and never reused,
/// so two forests only share an identity when one is a snapshot of the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    /// Allocate a brand-new identity
    pub(crate) fn fresh() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_unique_and_increasing() {
        let a = NodeId::fresh();
        let b = NodeId::fresh();
        assert_ne!(a, b);
        assert!(a < b);
    }

    #[test]
    fn test_display() {
        let id = NodeId(42);
        assert_eq!(id.as_u64(), 42);
        assert_eq!(format!("{}", id), "#42");
    }
}
