//! The Encyclopedia algebra
//!
//! Every store in this crate exposes an enumerable sequence of `(key, value)`
//! entries and builds the set-like and compositional operations on top:
//! - union, difference and intersection
//! - functional composition through a [`Morphism`]
//! - inversion for [`Indexed`] stores
//! - negation and absolute value for [`Signed`] stores

pub mod morphism;

pub use morphism::{Morphism, Null, Unity};

use crate::error::{EncyclopediaError, EncyclopediaResult};
use std::fmt;
use std::hash::Hash;

/// Anything that can be stored as a key, value or label.
pub trait Element: Clone + Eq + Hash + fmt::Debug {}

impl<T: Clone + Eq + Hash + fmt::Debug> Element for T {}

/// A single `(key, value)` pair as produced by [`Encyclopedia::entries`].
pub type Entry<K, V> = (K, V);

/// The capability contract shared by all Encyclopedia stores.
///
/// Format adapters and readers talk to stores exclusively through
/// [`entries`](Encyclopedia::entries) and
/// [`extend_entries`](Encyclopedia::extend_entries).
pub trait Encyclopedia: Sized {
    type Key: Element;
    type Value: Element;

    /// All entries in the store's iteration order.
    fn entries(&self) -> Vec<Entry<Self::Key, Self::Value>>;

    /// Distinct keys in iteration order.
    fn keys(&self) -> Vec<Self::Key>;

    /// Values in iteration order.
    fn values(&self) -> Vec<Self::Value> {
        self.entries().into_iter().map(|(_, value)| value).collect()
    }

    /// Number of distinct keys.
    ///
    /// For a forest this counts distinct labels, not nodes: a label carried
    /// by several nodes counts once. `Forest::node_count` gives the number
    /// of nodes.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Store one entry according to the store's assignment policy.
    fn assign(&mut self, key: Self::Key, value: Self::Value) -> EncyclopediaResult<()>;

    /// Remove a key and everything it owns, returning how many entries went away.
    fn remove(&mut self, key: &Self::Key) -> EncyclopediaResult<usize>;

    /// Ingest an entry sequence produced by an adapter.
    ///
    /// A frozen store is rejected before the first entry is consumed.
    fn extend_entries<I>(&mut self, entries: I) -> EncyclopediaResult<usize>
    where
        I: IntoIterator<Item = Entry<Self::Key, Self::Value>>,
    {
        if self.is_frozen() {
            return Err(EncyclopediaError::Frozen);
        }
        let mut count = 0;
        for (key, value) in entries {
            self.assign(key, value)?;
            count += 1;
        }
        Ok(count)
    }

    /// Merge `other` into a copy of `self` under `self`'s policy.
    fn union(&self, other: &Self) -> EncyclopediaResult<Self>;

    /// Copy of `self` without the keys present in `other`.
    fn difference(&self, other: &Self) -> EncyclopediaResult<Self>;

    /// `self - (self - other)`
    fn intersect(&self, other: &Self) -> EncyclopediaResult<Self> {
        let rest = self.difference(other)?;
        self.difference(&rest)
    }

    /// Functional composition: apply `f` to every value, dropping entries
    /// for which it yields nothing.
    fn map_with<M>(&self, f: &M) -> Self
    where
        M: Morphism<Self::Value> + ?Sized;

    fn is_frozen(&self) -> bool;

    fn set_frozen(&mut self, frozen: bool);

    /// Make the store immutable.
    fn freeze(mut self) -> Self {
        self.set_frozen(true);
        self
    }

    /// Make the store mutable again.
    fn melt(mut self) -> Self {
        self.set_frozen(false);
        self
    }
}

/// A store whose values can be turned back into keys.
pub trait Indexed: Encyclopedia {
    type Inverse: Encyclopedia<Key = Self::Value, Value = Self::Key>;

    /// Swap the roles of keys and values.
    fn invert(&self) -> Self::Inverse;
}

/// A store holding negative elements that cancel equally keyed positive ones.
pub trait Signed: Indexed {
    fn negate(&self) -> Self;

    /// Drop all negative elements.
    fn abs(&self) -> Self;

    /// Intersection that stays associative in the presence of negation:
    /// `self - abs(self - other)`.
    fn signed_intersect(&self, other: &Self) -> EncyclopediaResult<Self> {
        let rest = self.difference(other)?;
        self.difference(&rest.abs())
    }
}
