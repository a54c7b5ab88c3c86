//! Node arena for forests
//!
//! Uses insertion-ordered hash indexes:
//! - nodes: NodeId -> TreeNode (the arena)
//! - roots: tree roots in creation order
//! - label_index: label -> nodes carrying it
//!
//! Every mutation keeps the three indexes in agreement: a node is in the
//! arena exactly when it appears under its label, and it is listed as a root
//! exactly when it has no parent.

use super::node::TreeNode;
use super::types::NodeId;
use crate::algebra::Element;
use crate::collections::{IndexedMap, IndexedSet};
use std::collections::VecDeque;

/// Arena of labeled nodes with parent/child links
#[derive(Debug, Clone)]
pub struct NodeGraph<L> {
    nodes: IndexedMap<NodeId, TreeNode<L>>,
    roots: IndexedSet<NodeId>,
    label_index: IndexedMap<L, IndexedSet<NodeId>>,
}

impl<L: Element> NodeGraph<L> {
    pub fn new() -> Self {
        NodeGraph {
            nodes: IndexedMap::default(),
            roots: IndexedSet::default(),
            label_index: IndexedMap::default(),
        }
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode<L>> {
        self.nodes.get(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn label(&self, id: NodeId) -> Option<&L> {
        self.nodes.get(&id).map(|node| node.label())
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent())
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        match self.nodes.get(&id) {
            Some(node) => node.children(),
            None => &[],
        }
    }

    /// Tree roots in creation order
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.roots.iter().copied()
    }

    /// Distinct labels in order of first use
    pub fn labels(&self) -> impl Iterator<Item = &L> + '_ {
        self.label_index.keys()
    }

    pub fn has_label(&self, label: &L) -> bool {
        self.label_index.contains_key(label)
    }

    /// Nodes carrying `label`, in creation order
    pub fn labeled(&self, label: &L) -> Vec<NodeId> {
        self.label_index
            .get(label)
            .map(|ids| ids.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Create a new single-node tree
    pub(crate) fn add_root(&mut self, label: L) -> NodeId {
        let id = NodeId::fresh();
        self.attach(TreeNode::new(id, label, None));
        id
    }

    /// Create a new child under `parent`; `None` if the parent is unknown
    pub(crate) fn add_child(&mut self, parent: NodeId, label: L) -> Option<NodeId> {
        if !self.contains(parent) {
            return None;
        }
        let id = NodeId::fresh();
        self.attach(TreeNode::new(id, label, Some(parent)));
        Some(id)
    }

    /// Deep-copy the subtree of `source` rooted at `root` under `parent`
    /// (or as a new tree), allocating fresh identities.
    ///
    /// Returns `(source id, copy id)` pairs in pre-order.
    pub(crate) fn copy_subtree(
        &mut self,
        source: &NodeGraph<L>,
        root: NodeId,
        parent: Option<NodeId>,
    ) -> Vec<(NodeId, NodeId)> {
        let mut mapping = Vec::new();
        let Some(root_label) = source.label(root) else {
            return mapping;
        };
        let copy = match parent {
            Some(parent) => match self.add_child(parent, root_label.clone()) {
                Some(copy) => copy,
                None => return mapping,
            },
            None => self.add_root(root_label.clone()),
        };
        mapping.push((root, copy));

        let mut stack: Vec<(NodeId, NodeId)> = source
            .children(root)
            .iter()
            .rev()
            .map(|child| (*child, copy))
            .collect();
        while let Some((original, new_parent)) = stack.pop() {
            let Some(label) = source.label(original) else {
                continue;
            };
            let id = NodeId::fresh();
            self.attach(TreeNode::new(id, label.clone(), Some(new_parent)));
            mapping.push((original, id));
            stack.extend(source.children(original).iter().rev().map(|child| (*child, id)));
        }
        mapping
    }

    /// Snapshot of the subtrees rooted at `roots`, each as its own tree.
    ///
    /// Nodes keep their identities, except that a root nested inside an
    /// earlier root's subtree is copied with fresh ones; the `(source, copy)`
    /// pairs of those copies are returned.
    pub(crate) fn project(&self, roots: &[NodeId]) -> (NodeGraph<L>, Vec<(NodeId, NodeId)>) {
        let mut view = NodeGraph::new();
        let mut copies = Vec::new();
        for &root in roots {
            if view.contains(root) {
                copies.extend(view.copy_subtree(self, root, None));
                continue;
            }
            for (position, id) in self.preorder(root).into_iter().enumerate() {
                let Some(node) = self.nodes.get(&id) else {
                    continue;
                };
                let node = if position == 0 {
                    node.clone().into_root()
                } else {
                    node.clone()
                };
                view.insert_snapshot(node);
            }
        }
        (view, copies)
    }

    /// Remove `id` and all of its descendants, returning the removed nodes
    pub(crate) fn remove_subtree(&mut self, id: NodeId) -> Vec<NodeId> {
        if !self.contains(id) {
            return Vec::new();
        }
        match self.parent(id) {
            Some(parent) => {
                if let Some(node) = self.nodes.get_mut(&parent) {
                    node.remove_child(id);
                }
            }
            None => {
                self.roots.shift_remove(&id);
            }
        }

        let removed = self.preorder(id);
        for node_id in &removed {
            if let Some(node) = self.nodes.shift_remove(node_id) {
                self.unindex(node.label(), *node_id);
            }
        }
        removed
    }

    /// Copy of the graph with every label passed through `f`, keeping
    /// identities. Nodes mapped to `None` are dropped with their subtrees.
    pub(crate) fn map_labels<F>(&self, f: F) -> NodeGraph<L>
    where
        F: Fn(&L) -> Option<L>,
    {
        let mut mapped = NodeGraph::new();
        for id in self.preorder_all() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            if let Some(parent) = node.parent() {
                if !mapped.contains(parent) {
                    continue;
                }
            }
            if let Some(label) = f(node.label()) {
                let mut copy = node.with_label(label);
                copy.clear_children();
                mapped.attach(copy);
            }
        }
        mapped
    }

    /// Pre-order walk of the subtree rooted at `start`
    pub fn preorder(&self, start: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        if !self.contains(start) {
            return order;
        }
        let mut stack = vec![start];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Pre-order walk of every tree, roots in creation order
    pub fn preorder_all(&self) -> Vec<NodeId> {
        self.roots
            .iter()
            .flat_map(|root| self.preorder(*root))
            .collect()
    }

    /// `id` followed by its parent, grandparent, ... up to the root
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut chain = Vec::new();
        let mut current = self.contains(id).then_some(id);
        while let Some(node_id) = current {
            chain.push(node_id);
            current = self.parent(node_id);
        }
        chain
    }

    /// Depth of every node, found breadth-first from each root (root = 0)
    pub fn levels(&self) -> IndexedMap<NodeId, usize> {
        let mut levels = IndexedMap::default();
        let mut queue: VecDeque<(NodeId, usize)> =
            self.roots.iter().map(|root| (*root, 0)).collect();
        while let Some((id, depth)) = queue.pop_front() {
            levels.insert(id, depth);
            queue.extend(self.children(id).iter().map(|child| (*child, depth + 1)));
        }
        levels
    }

    /// Nodes without children, in pre-order
    pub fn leaves(&self) -> Vec<NodeId> {
        self.preorder_all()
            .into_iter()
            .filter(|id| self.children(*id).is_empty())
            .collect()
    }

    fn attach(&mut self, node: TreeNode<L>) {
        let id = node.id();
        match node.parent() {
            Some(parent) => {
                if let Some(parent_node) = self.nodes.get_mut(&parent) {
                    parent_node.push_child(id);
                }
            }
            None => {
                self.roots.insert(id);
            }
        }
        self.label_index
            .entry(node.label().clone())
            .or_default()
            .insert(id);
        self.nodes.insert(id, node);
    }

    /// Insert a node copied verbatim from another graph; its parent, if
    /// any, has already been inserted and lists it as a child.
    fn insert_snapshot(&mut self, node: TreeNode<L>) {
        let id = node.id();
        if node.is_root() {
            self.roots.insert(id);
        }
        self.label_index
            .entry(node.label().clone())
            .or_default()
            .insert(id);
        self.nodes.insert(id, node);
    }

    fn unindex(&mut self, label: &L, id: NodeId) {
        if let Some(ids) = self.label_index.get_mut(label) {
            ids.shift_remove(&id);
            if ids.is_empty() {
                self.label_index.shift_remove(label);
            }
        }
    }
}

impl<L: Element> Default for NodeGraph<L> {
    fn default() -> Self {
        Self::new()
    }
}
