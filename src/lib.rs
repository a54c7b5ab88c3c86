//! Encyclopedia
//!
//! Algebraic keyed containers: every store exposes an enumerable sequence of
//! `(key, value)` entries and supports union, difference, intersection,
//! functional composition and, where values can act as keys, inversion.
//!
//! # Stores
//!
//! - [`Relation`]: a discrete relation under one of four cardinalities
//!   (`M:1`, `1:1`, `1:M`, `M:M`), with forward and inverse indexes kept in
//!   lock step
//! - [`Forest`]: labeled rooted trees where a key names every node carrying
//!   that label, with grafting, pruning, level queries and structural
//!   union/difference
//! - [`Arboretum`]: a forest whose nodes carry attributes inherited by their
//!   descendants at lookup time
//!
//! # Operators
//!
//! | Operator | Meaning |
//! |---|---|
//! | `&a + &b` | union |
//! | `&a - &b` | difference |
//! | `&a & &b` | intersection |
//! | `&a * &b` | entity composition |
//! | `!&r` | inversion (relations) |
//!
//! ## Example Usage
//!
//! ```rust
//! use encyclopedia::{Arboretum, Encyclopedia, Relation};
//!
//! // A dictionary: the last assignment wins
//! let mut capitals = Relation::function();
//! capitals.set("France", "Paris").unwrap();
//! capitals.set("France", "Lyon").unwrap();
//! capitals.set("France", "Paris").unwrap();
//! assert_eq!(capitals.get_one(&"France"), Some(&"Paris"));
//!
//! // Inversion swaps keys and values
//! let countries = !&capitals;
//! assert_eq!(countries.get_one(&"Paris"), Some(&"France"));
//!
//! // Attributes are inherited at lookup time
//! let mut doc: Arboretum<&str, &str> = Arboretum::new();
//! doc.set("Document", "Section 1").unwrap();
//! doc.set_attribute(&"Section 1", "font", "Helvetica").unwrap();
//! doc.set("Section 1", "Section 1.1").unwrap();
//! assert_eq!(doc.get_attribute(&"Section 1.1", "font"), Some(&"Helvetica"));
//! assert_eq!(doc.len(), 3);
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod algebra;
pub mod arboretum;
pub mod collections;
pub mod config;
pub mod error;
pub mod forest;
pub mod relation;

// Re-export main types for convenience
pub use algebra::{Element, Encyclopedia, Entry, Indexed, Morphism, Null, Signed, Unity};

pub use arboretum::{Arboretum, AttributeOverlay};

pub use config::{EncyclopediaConfig, ForestConfig, RelationConfig};

pub use error::{EncyclopediaError, EncyclopediaResult};

pub use forest::{Forest, NodeGraph, NodeId, Signature, TreeNode};

pub use relation::{Cardinality, Relation};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
