//! Node attribute overlay
//!
//! Attributes are recorded on individual nodes and resolved at read time by
//! walking up the ancestor chain, so a node created under an attributed node
//! inherits the value without anything being copied.

use crate::algebra::Element;
use crate::collections::IndexedMap;
use crate::forest::{NodeGraph, NodeId};
use rustc_hash::FxHashMap;

/// node -> (attribute name -> value)
#[derive(Debug, Clone)]
pub struct AttributeOverlay<V> {
    attributes: FxHashMap<NodeId, IndexedMap<String, V>>,
}

impl<V: Clone> AttributeOverlay<V> {
    pub fn new() -> Self {
        AttributeOverlay {
            attributes: FxHashMap::default(),
        }
    }

    /// Number of recorded (node, name) pairs
    pub fn len(&self) -> usize {
        self.attributes.values().map(|names| names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Attributes recorded on `node` itself, without inheritance
    pub fn attributes(&self, node: NodeId) -> Option<&IndexedMap<String, V>> {
        self.attributes.get(&node)
    }

    pub fn get(&self, node: NodeId, name: &str) -> Option<&V> {
        self.attributes.get(&node).and_then(|names| names.get(name))
    }

    /// First value of `name` found on `node` or one of its ancestors
    pub fn resolve<L: Element>(&self, graph: &NodeGraph<L>, node: NodeId, name: &str) -> Option<&V> {
        graph
            .ancestors(node)
            .into_iter()
            .find_map(|id| self.get(id, name))
    }

    pub(crate) fn set(&mut self, node: NodeId, name: String, value: V) {
        self.attributes.entry(node).or_default().insert(name, value);
    }

    pub(crate) fn remove(&mut self, node: NodeId, name: &str) -> Option<V> {
        let names = self.attributes.get_mut(&node)?;
        let removed = names.shift_remove(name);
        if names.is_empty() {
            self.attributes.remove(&node);
        }
        removed
    }

    /// Drop the attributes of nodes no longer present in `graph`
    pub(crate) fn retain_live<L: Element>(&mut self, graph: &NodeGraph<L>) {
        self.attributes.retain(|id, _| graph.contains(*id));
    }

    /// Overlay holding only the attributes of nodes present in `graph`
    pub(crate) fn restricted<L: Element>(&self, graph: &NodeGraph<L>) -> Self {
        let mut overlay = self.clone();
        overlay.retain_live(graph);
        overlay
    }

    /// Copy the attributes of `source` nodes onto their copies
    pub(crate) fn carry(&mut self, source: &AttributeOverlay<V>, mapping: &[(NodeId, NodeId)]) {
        for (original, copy) in mapping {
            if let Some(names) = source.attributes.get(original) {
                self.attributes.insert(*copy, names.clone());
            }
        }
    }
}

impl<V: Clone> Default for AttributeOverlay<V> {
    fn default() -> Self {
        Self::new()
    }
}
