//! Forest node
//!
//! A node pairs a unique identity with a non-unique label. Its parent is
//! fixed at creation: nodes are never moved, only copied by grafting.

use super::types::NodeId;
use std::hash::{Hash, Hasher};

/// A node in a forest
#[derive(Debug, Clone)]
pub struct TreeNode<L> {
    /// Unique identifier for this node
    id: NodeId,

    /// Label (the node's key), shared with any number of other nodes
    label: L,

    /// Parent node, `None` for a tree root
    parent: Option<NodeId>,

    /// Children in creation order
    children: Vec<NodeId>,
}

impl<L> TreeNode<L> {
    pub(crate) fn new(id: NodeId, label: L, parent: Option<NodeId>) -> Self {
        TreeNode {
            id,
            label,
            parent,
            children: Vec::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn label(&self) -> &L {
        &self.label
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn clear_children(&mut self) {
        self.children.clear();
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|c| *c != child);
    }

    /// Detach from the parent, used when a node becomes the root of a
    /// projection
    pub(crate) fn into_root(mut self) -> Self {
        self.parent = None;
        self
    }

    pub(crate) fn with_label<M>(&self, label: M) -> TreeNode<M> {
        TreeNode {
            id: self.id,
            label,
            parent: self.parent,
            children: self.children.clone(),
        }
    }
}

impl<L> PartialEq for TreeNode<L> {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl<L> Eq for TreeNode<L> {}

impl<L> Hash for TreeNode<L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_root() {
        let id = NodeId::fresh();
        let node = TreeNode::new(id, "Document", None);
        assert_eq!(node.id(), id);
        assert_eq!(node.label(), &"Document");
        assert!(node.is_root());
        assert!(node.is_leaf());
    }

    #[test]
    fn test_children() {
        let parent_id = NodeId::fresh();
        let mut node = TreeNode::new(NodeId::fresh(), "Section", Some(parent_id));
        let a = NodeId::fresh();
        let b = NodeId::fresh();
        node.push_child(a);
        node.push_child(b);
        assert_eq!(node.children(), &[a, b]);
        assert!(!node.is_leaf());

        node.remove_child(a);
        assert_eq!(node.children(), &[b]);

        let root = node.into_root();
        assert!(root.is_root());
    }

    #[test]
    fn test_equality_by_identity() {
        let id = NodeId::fresh();
        let a = TreeNode::new(id, "x", None);
        let b = TreeNode::new(id, "y", None);
        let c = TreeNode::new(NodeId::fresh(), "x", None);
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.with_label(7).label(), &7);
    }
}
