//! Bidirectional relation storage
//!
//! Uses two insertion-ordered hash indexes:
//! - forward: key -> set of values
//! - inverse: value -> set of keys
//!
//! The inverse index is always the exact transpose of the forward index and
//! neither index ever holds an empty set.

use super::cardinality::Cardinality;
use crate::algebra::{Element, Encyclopedia, Entry, Indexed, Morphism};
use crate::collections::{IndexedMap, IndexedSet};
use crate::config::RelationConfig;
use crate::error::{describe, EncyclopediaError, EncyclopediaResult};
use std::fmt;
use std::ops::{Add, BitAnd, Mul, Not, Sub};
use tracing::{debug, trace};

/// A discrete relation between keys and values for any cardinality
///
/// Inversion is available for every cardinality at the cost of storing each
/// pair twice.
#[derive(Debug, Clone)]
pub struct Relation<K, V> {
    /// key -> values
    forward: IndexedMap<K, IndexedSet<V>>,

    /// value -> keys
    inverse: IndexedMap<V, IndexedSet<K>>,

    /// Assignment policy, fixed at construction
    cardinality: Cardinality,

    /// Reject mutation when set
    frozen: bool,
}

impl<K: Element, V: Element> Relation<K, V> {
    /// Create an empty relation with the given cardinality
    pub fn new(cardinality: Cardinality) -> Self {
        Relation {
            forward: IndexedMap::default(),
            inverse: IndexedMap::default(),
            cardinality,
            frozen: false,
        }
    }

    pub fn with_config(config: RelationConfig) -> Self {
        let mut relation = Self::new(config.cardinality);
        relation.frozen = config.frozen;
        relation
    }

    /// M:1 relation, i.e. a dictionary
    pub fn function() -> Self {
        Self::new(Cardinality::ManyToOne)
    }

    /// 1:1 relation
    pub fn isomorphism() -> Self {
        Self::new(Cardinality::OneToOne)
    }

    /// 1:M relation
    pub fn partition() -> Self {
        Self::new(Cardinality::OneToMany)
    }

    /// M:M relation
    pub fn general() -> Self {
        Self::new(Cardinality::ManyToMany)
    }

    /// Build a relation from an entry sequence, applying the cardinality
    /// policy to each entry in order
    pub fn from_entries<I>(cardinality: Cardinality, entries: I) -> Self
    where
        I: IntoIterator<Item = Entry<K, V>>,
    {
        let mut relation = Self::new(cardinality);
        for (key, value) in entries {
            relation.insert_pair(key, value);
        }
        relation
    }

    pub fn cardinality(&self) -> Cardinality {
        self.cardinality
    }

    /// Number of stored (key, value) pairs
    pub fn pair_count(&self) -> usize {
        self.forward.values().map(|values| values.len()).sum()
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.forward.contains_key(key)
    }

    pub fn contains_value(&self, value: &V) -> bool {
        self.inverse.contains_key(value)
    }

    /// Values associated with `key`; `None` stands for the empty set
    pub fn get(&self, key: &K) -> Option<&IndexedSet<V>> {
        self.forward.get(key)
    }

    /// The single value of `key`, for M:1 and 1:1 relations
    ///
    /// For the appending cardinalities this is the earliest stored value.
    pub fn get_one(&self, key: &K) -> Option<&V> {
        self.forward.get(key).and_then(|values| values.first())
    }

    /// Strict lookup failing with `KeyNotFound` for an absent key
    pub fn get_strict(&self, key: &K) -> EncyclopediaResult<&IndexedSet<V>> {
        self.forward
            .get(key)
            .ok_or_else(|| EncyclopediaError::KeyNotFound(describe(key)))
    }

    /// Keys associated with `value` (inverse lookup)
    pub fn keys_of(&self, value: &V) -> Option<&IndexedSet<K>> {
        self.inverse.get(value)
    }

    /// All (key, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&K, &V)> + '_ {
        self.forward
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| (key, value)))
    }

    /// Distinct keys
    pub fn domain(&self) -> impl Iterator<Item = &K> + '_ {
        self.forward.keys()
    }

    /// Distinct values
    pub fn range(&self) -> impl Iterator<Item = &V> + '_ {
        self.inverse.keys()
    }

    /// Assign `value` to `key` under the relation's cardinality
    ///
    /// M:1 and 1:1 replace the key's previous value; 1:M and M:M append.
    /// 1:1 and 1:M additionally detach the value from any other key.
    pub fn set(&mut self, key: K, value: V) -> EncyclopediaResult<()> {
        self.check_mutable()?;
        self.insert_pair(key, value);
        Ok(())
    }

    /// Remove `key` and all its values from both indexes
    pub fn delete(&mut self, key: &K) -> EncyclopediaResult<usize> {
        self.check_mutable()?;
        Ok(self.detach_key(key))
    }

    /// Remove `value` and all its keys from both indexes
    pub fn delete_value(&mut self, value: &V) -> EncyclopediaResult<usize> {
        self.check_mutable()?;
        Ok(self.detach_value(value))
    }

    /// A new relation mapping values back to keys
    pub fn invert(&self) -> Relation<V, K> {
        self.clone().into_inverse()
    }

    /// Swap the indexes in place, consuming the relation
    pub fn into_inverse(self) -> Relation<V, K> {
        Relation {
            forward: self.inverse,
            inverse: self.forward,
            cardinality: self.cardinality.transpose(),
            frozen: self.frozen,
        }
    }

    /// Value-granularity difference: removes only the pairs of `other`,
    /// leaving other values of the same keys in place
    pub fn difference_pairs(&self, other: &Self) -> EncyclopediaResult<Self> {
        self.check_same_cardinality(other.cardinality)?;
        let mut new = self.detached_copy();
        for (key, value) in other.iter() {
            new.detach_pair(key, value);
        }
        Ok(new)
    }

    /// Entity composition `self * other`: each key `x` of `other` maps to
    /// `self[other[x]]`
    ///
    /// Keys whose intermediate value is unknown to `self` are left out. The
    /// cardinalities must be equal or mutual transposes.
    pub fn compose_with<X: Element>(&self, other: &Relation<X, K>) -> EncyclopediaResult<Relation<X, V>> {
        if !other.cardinality.composable(&self.cardinality) {
            debug!(
                "Rejected composition of {} relation with {} relation",
                self.cardinality, other.cardinality
            );
            return Err(EncyclopediaError::CardinalityMismatch {
                left: self.cardinality,
                right: other.cardinality,
            });
        }
        Ok(self.compose_through(other))
    }

    /// Entity composition for any pair of cardinalities; the result takes
    /// the composed cardinality
    pub fn compose_through<X: Element>(&self, other: &Relation<X, K>) -> Relation<X, V> {
        let mut new = Relation::new(Cardinality::compose(other.cardinality, self.cardinality));
        for (key, middles) in &other.forward {
            for middle in middles {
                if let Some(values) = self.forward.get(middle) {
                    for value in values {
                        new.insert_pair(key.clone(), value.clone());
                    }
                }
            }
        }
        new
    }

    /// Functional composition changing the value type
    pub fn map_into<W, F>(&self, f: F) -> Relation<K, W>
    where
        W: Element,
        F: Fn(&V) -> Option<W>,
    {
        let mut new = Relation::new(self.cardinality);
        for (key, value) in self.iter() {
            if let Some(mapped) = f(value) {
                new.insert_pair(key.clone(), mapped);
            }
        }
        new
    }

    /// Check that the inverse index is the exact transpose of the forward index
    pub fn is_consistent(&self) -> bool {
        let forward_pairs = self.pair_count();
        let inverse_pairs: usize = self.inverse.values().map(|keys| keys.len()).sum();
        forward_pairs == inverse_pairs
            && self.forward.values().all(|values| !values.is_empty())
            && self.inverse.values().all(|keys| !keys.is_empty())
            && self.iter().all(|(key, value)| {
                self.inverse
                    .get(value)
                    .map_or(false, |keys| keys.contains(key))
            })
    }

    fn check_mutable(&self) -> EncyclopediaResult<()> {
        if self.frozen {
            debug!("Rejected mutation of frozen {} relation", self.cardinality);
            return Err(EncyclopediaError::Frozen);
        }
        Ok(())
    }

    fn check_same_cardinality(&self, other: Cardinality) -> EncyclopediaResult<()> {
        if self.cardinality != other {
            debug!(
                "Rejected combination of {} relation with {} relation",
                self.cardinality, other
            );
            return Err(EncyclopediaError::CardinalityMismatch {
                left: self.cardinality,
                right: other,
            });
        }
        Ok(())
    }

    /// Copy used as the starting point of algebra results, always mutable
    fn detached_copy(&self) -> Self {
        let mut new = self.clone();
        new.frozen = false;
        new
    }

    fn insert_pair(&mut self, key: K, value: V) {
        if self
            .forward
            .get(&key)
            .map_or(false, |values| values.contains(&value))
        {
            return;
        }
        if self.cardinality.overwrites() && self.forward.contains_key(&key) {
            let replaced = self.detach_key(&key);
            trace!("Overwrote {} value(s) of key {:?}", replaced, key);
        }
        if self.cardinality.exclusive_values() && self.inverse.contains_key(&value) {
            let detached = self.detach_value(&value);
            trace!("Detached value {:?} from {} key(s)", value, detached);
        }
        self.forward
            .entry(key.clone())
            .or_default()
            .insert(value.clone());
        self.inverse.entry(value).or_default().insert(key);
    }

    fn detach_key(&mut self, key: &K) -> usize {
        let Some(values) = self.forward.shift_remove(key) else {
            return 0;
        };
        for value in &values {
            if let Some(keys) = self.inverse.get_mut(value) {
                keys.shift_remove(key);
                if keys.is_empty() {
                    self.inverse.shift_remove(value);
                }
            }
        }
        values.len()
    }

    fn detach_value(&mut self, value: &V) -> usize {
        let Some(keys) = self.inverse.shift_remove(value) else {
            return 0;
        };
        for key in &keys {
            if let Some(values) = self.forward.get_mut(key) {
                values.shift_remove(value);
                if values.is_empty() {
                    self.forward.shift_remove(key);
                }
            }
        }
        keys.len()
    }

    fn detach_pair(&mut self, key: &K, value: &V) {
        let Some(values) = self.forward.get_mut(key) else {
            return;
        };
        if !values.shift_remove(value) {
            return;
        }
        if values.is_empty() {
            self.forward.shift_remove(key);
        }
        if let Some(keys) = self.inverse.get_mut(value) {
            keys.shift_remove(key);
            if keys.is_empty() {
                self.inverse.shift_remove(value);
            }
        }
    }
}

impl<K: Element, V: Element> Default for Relation<K, V> {
    fn default() -> Self {
        Self::general()
    }
}

impl<K: Element, V: Element> Encyclopedia for Relation<K, V> {
    type Key = K;
    type Value = V;

    fn entries(&self) -> Vec<Entry<K, V>> {
        self.iter()
            .map(|(key, value)| (key.clone(), value.clone()))
            .collect()
    }

    fn keys(&self) -> Vec<K> {
        self.forward.keys().cloned().collect()
    }

    fn values(&self) -> Vec<V> {
        self.inverse.keys().cloned().collect()
    }

    fn len(&self) -> usize {
        self.forward.len()
    }

    fn assign(&mut self, key: K, value: V) -> EncyclopediaResult<()> {
        self.set(key, value)
    }

    fn remove(&mut self, key: &K) -> EncyclopediaResult<usize> {
        self.delete(key)
    }

    fn union(&self, other: &Self) -> EncyclopediaResult<Self> {
        self.check_same_cardinality(other.cardinality)?;
        let mut new = self.detached_copy();
        for (key, value) in other.iter() {
            new.insert_pair(key.clone(), value.clone());
        }
        Ok(new)
    }

    fn difference(&self, other: &Self) -> EncyclopediaResult<Self> {
        self.check_same_cardinality(other.cardinality)?;
        let mut new = self.detached_copy();
        for key in other.forward.keys() {
            new.detach_key(key);
        }
        Ok(new)
    }

    fn map_with<M>(&self, f: &M) -> Self
    where
        M: Morphism<V> + ?Sized,
    {
        let mut new = Relation::new(self.cardinality);
        for (key, value) in self.iter() {
            if let Some(mapped) = f.apply(value) {
                new.insert_pair(key.clone(), mapped);
            }
        }
        new
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }
}

impl<K: Element, V: Element> Indexed for Relation<K, V> {
    type Inverse = Relation<V, K>;

    fn invert(&self) -> Relation<V, K> {
        Relation::invert(self)
    }
}

/// A relation over one type acts as a lookup table for functional
/// composition: each value is replaced by its first image.
impl<T: Element> Morphism<T> for Relation<T, T> {
    fn apply(&self, value: &T) -> Option<T> {
        self.get_one(value).cloned()
    }
}

impl<K: Element, V: Element> PartialEq for Relation<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.cardinality == other.cardinality && self.forward == other.forward
    }
}

impl<K: Element, V: Element> Eq for Relation<K, V> {}

impl<K: Element, V: Element> FromIterator<(K, V)> for Relation<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self::from_entries(Cardinality::ManyToMany, iter)
    }
}

impl<K, V> fmt::Display for Relation<K, V>
where
    K: Element + fmt::Display,
    V: Element + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Relation({})", self.cardinality)?;
        for (key, values) in &self.forward {
            let rendered: Vec<String> = values.iter().map(|v| v.to_string()).collect();
            writeln!(f, "  {} -> {}", key, rendered.join(", "))?;
        }
        Ok(())
    }
}

impl<'a, K: Element, V: Element> Add<&'a Relation<K, V>> for &'a Relation<K, V> {
    type Output = EncyclopediaResult<Relation<K, V>>;

    fn add(self, rhs: &'a Relation<K, V>) -> Self::Output {
        self.union(rhs)
    }
}

impl<'a, K: Element, V: Element> Sub<&'a Relation<K, V>> for &'a Relation<K, V> {
    type Output = EncyclopediaResult<Relation<K, V>>;

    fn sub(self, rhs: &'a Relation<K, V>) -> Self::Output {
        self.difference(rhs)
    }
}

impl<'a, K: Element, V: Element> BitAnd<&'a Relation<K, V>> for &'a Relation<K, V> {
    type Output = EncyclopediaResult<Relation<K, V>>;

    fn bitand(self, rhs: &'a Relation<K, V>) -> Self::Output {
        self.intersect(rhs)
    }
}

impl<'a, X: Element, K: Element, V: Element> Mul<&'a Relation<X, K>> for &'a Relation<K, V> {
    type Output = EncyclopediaResult<Relation<X, V>>;

    fn mul(self, rhs: &'a Relation<X, K>) -> Self::Output {
        self.compose_with(rhs)
    }
}

impl<K: Element, V: Element> Not for &Relation<K, V> {
    type Output = Relation<V, K>;

    fn not(self) -> Self::Output {
        self.invert()
    }
}
