//! Canonical subtree signatures
//!
//! A node's signature combines its label with the sorted signatures of its
//! children, so labeled trees that differ only in node identities or child
//! order get the same signature. Signatures are memoized per node and the
//! memo is dropped whenever the owning forest changes shape.

use super::graph::NodeGraph;
use super::types::NodeId;
use crate::algebra::Element;
use rustc_hash::{FxHashMap, FxHasher};
use std::cell::RefCell;
use std::hash::{Hash, Hasher};

/// Structural fingerprint of a labeled subtree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Signature(u64);

impl Signature {
    fn combine<L: Hash>(label: &L, children: &mut [Signature]) -> Signature {
        children.sort_unstable();
        let mut hasher = FxHasher::default();
        label.hash(&mut hasher);
        children.len().hash(&mut hasher);
        for child in children.iter() {
            child.0.hash(&mut hasher);
        }
        Signature(hasher.finish())
    }
}

/// Per-forest signature memo
#[derive(Debug, Clone)]
pub(crate) struct SignatureCache {
    memo: RefCell<FxHashMap<NodeId, Signature>>,
    enabled: bool,
}

impl SignatureCache {
    pub(crate) fn new(enabled: bool) -> Self {
        SignatureCache {
            memo: RefCell::new(FxHashMap::default()),
            enabled,
        }
    }

    pub(crate) fn enabled(&self) -> bool {
        self.enabled
    }

    /// Signature of the subtree rooted at `root`
    pub(crate) fn signature<L: Element>(&self, graph: &NodeGraph<L>, root: NodeId) -> Signature {
        if self.enabled {
            compute(graph, root, &mut self.memo.borrow_mut())
        } else {
            compute(graph, root, &mut FxHashMap::default())
        }
    }

    /// Forget every memoized signature
    pub(crate) fn invalidate(&mut self) {
        self.memo.get_mut().clear();
    }
}

fn compute<L: Element>(
    graph: &NodeGraph<L>,
    root: NodeId,
    memo: &mut FxHashMap<NodeId, Signature>,
) -> Signature {
    if let Some(signature) = memo.get(&root) {
        return *signature;
    }
    // Reversed pre-order visits every child before its parent
    for id in graph.preorder(root).into_iter().rev() {
        if memo.contains_key(&id) {
            continue;
        }
        let Some(label) = graph.label(id) else {
            continue;
        };
        let mut children: Vec<Signature> = graph
            .children(id)
            .iter()
            .filter_map(|child| memo.get(child).copied())
            .collect();
        memo.insert(id, Signature::combine(label, &mut children));
    }
    memo.get(&root)
        .copied()
        .unwrap_or_else(|| Signature::combine(&(), &mut []))
}

/// Exact structural comparison of two subtrees, used to confirm a
/// signature match. Walks both trees with an explicit stack, pairing
/// children by signature.
pub(crate) fn same_tree<L: Element>(
    (left, left_cache): (&NodeGraph<L>, &SignatureCache),
    a: NodeId,
    (right, right_cache): (&NodeGraph<L>, &SignatureCache),
    b: NodeId,
) -> bool {
    let mut left_memo = FxHashMap::default();
    let mut right_memo = FxHashMap::default();
    let mut pending = vec![(a, b)];

    while let Some((a, b)) = pending.pop() {
        if left.label(a) != right.label(b) {
            return false;
        }
        let left_children = left.children(a);
        let right_children = right.children(b);
        if left_children.len() != right_children.len() {
            return false;
        }

        let left_sorted = sorted_children(left, left_cache, &mut left_memo, left_children);
        let right_sorted = sorted_children(right, right_cache, &mut right_memo, right_children);
        for ((ls, lc), (rs, rc)) in left_sorted.into_iter().zip(right_sorted) {
            if ls != rs {
                return false;
            }
            pending.push((lc, rc));
        }
    }
    true
}

fn sorted_children<L: Element>(
    graph: &NodeGraph<L>,
    cache: &SignatureCache,
    memo: &mut FxHashMap<NodeId, Signature>,
    children: &[NodeId],
) -> Vec<(Signature, NodeId)> {
    let mut signed: Vec<(Signature, NodeId)> = children
        .iter()
        .map(|child| {
            // An unmemoized cache would recompute every subtree per level
            let signature = if cache.enabled() {
                cache.signature(graph, *child)
            } else {
                compute(graph, *child, memo)
            };
            (signature, *child)
        })
        .collect();
    signed.sort_by_key(|(signature, _)| *signature);
    signed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(labels: &[(&'static str, &'static str)], root: &'static str) -> (NodeGraph<&'static str>, NodeId) {
        let mut graph = NodeGraph::new();
        let root_id = graph.add_root(root);
        for (parent, child) in labels {
            let parent_id = graph.labeled(parent)[0];
            graph.add_child(parent_id, *child).unwrap();
        }
        (graph, root_id)
    }

    #[test]
    fn test_child_order_does_not_matter() {
        let (a, ra) = tree(&[("r", "x"), ("r", "y"), ("y", "z")], "r");
        let (b, rb) = tree(&[("r", "y"), ("y", "z"), ("r", "x")], "r");
        let cache_a = SignatureCache::new(true);
        let cache_b = SignatureCache::new(true);

        assert_eq!(cache_a.signature(&a, ra), cache_b.signature(&b, rb));
        assert!(same_tree((&a, &cache_a), ra, (&b, &cache_b), rb));
    }

    #[test]
    fn test_structure_matters() {
        let (a, ra) = tree(&[("r", "x"), ("x", "y")], "r");
        let (b, rb) = tree(&[("r", "x"), ("r", "y")], "r");
        let cache = SignatureCache::new(false);

        assert_ne!(cache.signature(&a, ra), cache.signature(&b, rb));
        assert!(!same_tree((&a, &cache), ra, (&b, &cache), rb));
    }

    #[test]
    fn test_labels_matter() {
        let (a, ra) = tree(&[], "leaf");
        let (b, rb) = tree(&[], "other");
        let cache = SignatureCache::new(true);
        assert_ne!(cache.signature(&a, ra), cache.signature(&b, rb));
    }

    #[test]
    fn test_invalidate_after_growth() {
        let (mut a, ra) = tree(&[("r", "x")], "r");
        let mut cache = SignatureCache::new(true);
        let before = cache.signature(&a, ra);

        let x = a.labeled(&"x")[0];
        a.add_child(x, "y").unwrap();
        assert_eq!(cache.signature(&a, ra), before, "memo is stale until invalidated");

        cache.invalidate();
        assert_ne!(cache.signature(&a, ra), before);
        assert!(cache.enabled());
    }

    fn chain(depth: usize, last: &'static str) -> (NodeGraph<&'static str>, NodeId) {
        let mut graph = NodeGraph::new();
        let root = graph.add_root("link");
        let mut tip = root;
        for _ in 0..depth {
            tip = graph.add_child(tip, "link").unwrap();
        }
        graph.add_child(tip, last).unwrap();
        (graph, root)
    }

    #[test]
    fn test_deep_chains_compare_without_recursion() {
        let (a, ra) = chain(20_000, "end");
        let (b, rb) = chain(20_000, "end");
        let (c, rc) = chain(20_000, "other");

        for enabled in [true, false] {
            let cache_a = SignatureCache::new(enabled);
            let cache_b = SignatureCache::new(enabled);
            let cache_c = SignatureCache::new(enabled);
            assert!(same_tree((&a, &cache_a), ra, (&b, &cache_b), rb));
            assert!(!same_tree((&a, &cache_a), ra, (&c, &cache_c), rc));
        }
    }
}
