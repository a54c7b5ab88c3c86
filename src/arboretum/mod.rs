//! Forests with inheritable attributes
//!
//! An [`Arboretum`] pairs a [`Forest`](crate::Forest) with an
//! [`AttributeOverlay`]. Attributes set on a node are visible from every
//! descendant, including descendants created later.

pub mod overlay;
pub mod store;

pub use overlay::AttributeOverlay;
pub use store::Arboretum;
