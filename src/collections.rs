//! Insertion-ordered collections with Fx hashing
//!
//! Every index in the crate iterates in insertion order so that entries,
//! keys and traversals are deterministic from run to run.

use rustc_hash::FxBuildHasher;

/// Insertion-ordered map used by all store indexes
pub type IndexedMap<K, V> = indexmap::IndexMap<K, V, FxBuildHasher>;

/// Insertion-ordered set used for value and node sets
pub type IndexedSet<T> = indexmap::IndexSet<T, FxBuildHasher>;
