//! Labeled forests
//!
//! A forest is a set of rooted trees. Every node has a unique [`NodeId`] and
//! a label; labels are the forest's keys and may be shared by many nodes.
//! Nodes are never re-parented: grafting copies subtrees with fresh
//! identities, which keeps every forest acyclic.

pub mod graph;
pub mod node;
pub mod signature;
pub mod store;
pub mod types;

pub use graph::NodeGraph;
pub use node::TreeNode;
pub use signature::Signature;
pub use store::Forest;
pub use types::NodeId;
