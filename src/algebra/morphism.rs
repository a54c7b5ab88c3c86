//! Functional composition
//!
//! A [`Morphism`] maps one stored value to an optional replacement. Closures,
//! the algebra identities and relations all act as morphisms, so a store can
//! be composed with any of them through `map_with`.

/// Per-entry transformation used by functional composition.
///
/// Returning `None` drops the entry from the composed store.
pub trait Morphism<T> {
    fn apply(&self, value: &T) -> Option<T>;
}

impl<T, F> Morphism<T> for F
where
    F: Fn(&T) -> Option<T>,
{
    fn apply(&self, value: &T) -> Option<T> {
        self(value)
    }
}

/// Multiplicative identity: composing with `Unity` returns an equal store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Unity;

impl<T: Clone> Morphism<T> for Unity {
    fn apply(&self, value: &T) -> Option<T> {
        Some(value.clone())
    }
}

/// Annihilator: composing with `Null` empties a store.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Null;

impl<T> Morphism<T> for Null {
    fn apply(&self, _value: &T) -> Option<T> {
        None
    }
}
