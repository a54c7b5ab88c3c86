//! Cardinality-constrained relations
//!
//! A [`Relation`] keeps a forward index (key -> values) and an inverse index
//! (value -> keys) in lock step, so inversion never has to rebuild anything.
//! The [`Cardinality`] chosen at construction decides whether assignment
//! overwrites or appends.

pub mod cardinality;
pub mod store;

pub use cardinality::Cardinality;
pub use store::Relation;
