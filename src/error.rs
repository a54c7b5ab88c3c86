//! Error types shared by every Encyclopedia store
//!
//! All failures are structural: they describe a request that cannot be
//! satisfied by the current contents of a store, never a transient
//! condition. Every mutating operation checks its preconditions before
//! touching any index, so an `Err` always leaves the store unchanged.

use crate::relation::Cardinality;
use thiserror::Error;

/// Errors that can occur during Encyclopedia operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncyclopediaError {
    #[error("Cardinality mismatch: {left} cannot be combined with {right}")]
    CardinalityMismatch { left: Cardinality, right: Cardinality },

    #[error("Ambiguous height for key {key}: found at depths {depths:?}")]
    AmbiguousHeight { key: String, depths: Vec<usize> },

    #[error("Key {key} spans {roots} trees, expected a single branch")]
    MultipleTrees { key: String, roots: usize },

    #[error("Invalid graft: node {0} is a member of the grafted forest")]
    InvalidGraft(String),

    #[error("Key {0} not found")]
    KeyNotFound(String),

    #[error("Store is frozen")]
    Frozen,

    #[error("Invalid cardinality: {0}")]
    InvalidCardinality(String),
}

pub type EncyclopediaResult<T> = Result<T, EncyclopediaError>;

/// Render a key for an error message.
pub(crate) fn describe<K: std::fmt::Debug>(key: &K) -> String {
    format!("{:?}", key)
}
