//! Forest storage
//!
//! Implements:
//! - sprouting (`set`), planting and grafting of whole forests
//! - cascading prune (`delete`)
//! - copy-on-read projections (`get`, `branch`, `cutting`)
//! - level queries with ambiguity detection
//! - structural union/difference over canonical tree signatures
//! - graft-based composition and label mapping
//!
//! Keys are node labels; a key names every node carrying that label.

use super::graph::NodeGraph;
use super::node::TreeNode;
use super::signature::{same_tree, Signature, SignatureCache};
use super::types::NodeId;
use crate::algebra::{Element, Encyclopedia, Entry, Morphism};
use crate::collections::IndexedSet;
use crate::config::ForestConfig;
use crate::error::{describe, EncyclopediaError, EncyclopediaResult};
use std::collections::BTreeSet;
use std::fmt;
use std::ops::{Add, BitAnd, Mul, Sub};
use tracing::debug;

/// A collection of rooted trees whose labels act as keys
#[derive(Debug, Clone)]
pub struct Forest<L> {
    /// Node arena and label index
    graph: NodeGraph<L>,

    /// Memoized subtree signatures
    signatures: SignatureCache,

    /// Reject mutation when set
    frozen: bool,
}

impl<L: Element> Forest<L> {
    pub fn new() -> Self {
        Self::with_config(ForestConfig::default())
    }

    pub fn with_config(config: ForestConfig) -> Self {
        Forest {
            graph: NodeGraph::new(),
            signatures: SignatureCache::new(config.memoize_signatures),
            frozen: config.frozen,
        }
    }

    /// Read access to the underlying node arena
    pub fn graph(&self) -> &NodeGraph<L> {
        &self.graph
    }

    /// Number of nodes (a key may label many nodes)
    pub fn node_count(&self) -> usize {
        self.graph.len()
    }

    /// Number of trees
    pub fn tree_count(&self) -> usize {
        self.graph.roots().count()
    }

    pub fn contains_key(&self, key: &L) -> bool {
        self.graph.has_label(key)
    }

    pub fn contains_node(&self, id: NodeId) -> bool {
        self.graph.contains(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode<L>> {
        self.graph.node(id)
    }

    pub fn label_of(&self, id: NodeId) -> Option<&L> {
        self.graph.label(id)
    }

    /// Tree roots in creation order
    pub fn roots(&self) -> Vec<NodeId> {
        self.graph.roots().collect()
    }

    /// Nodes labeled `key`, in creation order
    pub fn nodes_labeled(&self, key: &L) -> Vec<NodeId> {
        self.graph.labeled(key)
    }

    /// Add a new single-node tree
    pub fn plant(&mut self, label: L) -> EncyclopediaResult<NodeId> {
        self.check_mutable()?;
        // A new root leaves every existing signature intact
        Ok(self.graph.add_root(label))
    }

    /// Sprout a child labeled `label` under every node labeled `key`
    ///
    /// When no node carries `key`, a root labeled `key` is created first.
    /// Returns the new children.
    pub fn set(&mut self, key: L, label: L) -> EncyclopediaResult<Vec<NodeId>> {
        self.check_mutable()?;
        let mut parents = self.graph.labeled(&key);
        if parents.is_empty() {
            parents.push(self.graph.add_root(key));
        }
        let sprouts = parents
            .iter()
            .filter_map(|parent| self.graph.add_child(*parent, label.clone()))
            .collect();
        self.signatures.invalidate();
        Ok(sprouts)
    }

    /// Attach a fresh copy of every tree of `other` under every node
    /// labeled `key`, returning the number of nodes created
    ///
    /// Fails with `InvalidGraft` when a node labeled `key` belongs to
    /// `other` itself, e.g. when `other` is a projection of this forest.
    pub fn graft(&mut self, key: &L, other: &Forest<L>) -> EncyclopediaResult<usize> {
        self.graft_mapped(key, other).map(|mapping| mapping.len())
    }

    /// Add a fresh copy of every tree of `other` as a new tree, returning
    /// the number of nodes created
    pub fn merge(&mut self, other: &Forest<L>) -> EncyclopediaResult<usize> {
        self.merge_mapped(other).map(|mapping| mapping.len())
    }

    /// Prune every node labeled `key` together with its descendants,
    /// returning the number of nodes removed
    pub fn delete(&mut self, key: &L) -> EncyclopediaResult<usize> {
        self.prune(key).map(|removed| removed.len())
    }

    /// Projection of every node labeled `key` with its descendants, one
    /// tree per match
    ///
    /// The projection shares nothing with `self`. Its nodes keep their
    /// identities, except for matches nested below another match: those
    /// appear both inside the outer tree and as a tree of their own with
    /// fresh identities.
    pub fn get(&self, key: &L) -> Forest<L> {
        self.projection(key).0
    }

    /// Like [`get`](Self::get), failing with `KeyNotFound` for an absent key
    pub fn get_strict(&self, key: &L) -> EncyclopediaResult<Forest<L>> {
        if !self.contains_key(key) {
            return Err(EncyclopediaError::KeyNotFound(describe(key)));
        }
        Ok(self.get(key))
    }

    /// Like [`get`](Self::get), failing with `MultipleTrees` when the
    /// projection holds more than one tree
    ///
    /// A key matched at two depths of one tree counts as two trees.
    pub fn branch(&self, key: &L) -> EncyclopediaResult<Forest<L>> {
        self.branch_mapped(key).map(|(view, _)| view)
    }

    /// All leaf nodes, in pre-order
    pub fn canopy(&self) -> Vec<NodeId> {
        self.graph.leaves()
    }

    /// Leaves reachable from the nodes labeled `key`
    pub fn leaves(&self, key: &L) -> Vec<NodeId> {
        let mut leaves = IndexedSet::default();
        for id in self.matches(key) {
            leaves.extend(
                self.graph
                    .preorder(id)
                    .into_iter()
                    .filter(|node| self.graph.children(*node).is_empty()),
            );
        }
        leaves.into_iter().collect()
    }

    /// Distinct topmost ancestors of the nodes labeled `key`
    pub fn root(&self, key: &L) -> Vec<NodeId> {
        let roots: IndexedSet<NodeId> = self
            .matches(key)
            .into_iter()
            .filter_map(|id| self.graph.ancestors(id).last().copied())
            .collect();
        roots.into_iter().collect()
    }

    /// Direct children of the nodes labeled `key`
    pub fn above(&self, key: &L) -> Vec<NodeId> {
        self.matches(key)
            .into_iter()
            .flat_map(|id| self.graph.children(id).to_vec())
            .collect()
    }

    /// Distinct direct parents of the nodes labeled `key`
    pub fn below(&self, key: &L) -> Vec<NodeId> {
        let parents: IndexedSet<NodeId> = self
            .matches(key)
            .into_iter()
            .filter_map(|id| self.graph.parent(id))
            .collect();
        parents.into_iter().collect()
    }

    /// Distinct depths (root = 0) at which `key` occurs
    pub fn heights(&self, key: &L) -> BTreeSet<usize> {
        self.graph
            .levels()
            .into_iter()
            .filter(|(id, _)| self.graph.label(*id) == Some(key))
            .map(|(_, depth)| depth)
            .collect()
    }

    /// The single depth of `key`
    pub fn height(&self, key: &L) -> EncyclopediaResult<usize> {
        let heights: Vec<usize> = self.heights(key).into_iter().collect();
        match heights.as_slice() {
            [] => Err(EncyclopediaError::KeyNotFound(describe(key))),
            [depth] => Ok(*depth),
            _ => {
                debug!("Key {:?} occurs at depths {:?}", key, heights);
                Err(EncyclopediaError::AmbiguousHeight {
                    key: describe(key),
                    depths: heights,
                })
            }
        }
    }

    /// Depth of the deepest node, `None` for an empty forest
    pub fn max_height(&self) -> Option<usize> {
        self.graph.levels().values().copied().max()
    }

    /// Forest of the subtrees rooted at depth `level`
    pub fn cutting(&self, level: usize) -> Forest<L> {
        let levels = self.graph.levels();
        let roots: Vec<NodeId> = self
            .graph
            .preorder_all()
            .into_iter()
            .filter(|id| levels.get(id) == Some(&level))
            .collect();
        self.derived(self.graph.project(&roots).0)
    }

    /// Pre-order walk with depths, starting at the nodes labeled `key` or at
    /// every root when `key` is `None`
    pub fn climb(&self, key: Option<&L>) -> Vec<(usize, NodeId)> {
        let starts = match key {
            Some(key) => self.graph.labeled(key),
            None => self.roots(),
        };
        let levels = self.graph.levels();
        let mut seen = IndexedSet::default();
        for start in starts {
            for id in self.graph.preorder(start) {
                seen.insert(id);
            }
        }
        seen.into_iter()
            .filter_map(|id| levels.get(&id).map(|depth| (*depth, id)))
            .collect()
    }

    /// `(parent label, child label)` for every edge, in pre-order
    pub fn twigs(&self) -> Vec<(L, L)> {
        let mut twigs = Vec::new();
        for id in self.graph.preorder_all() {
            let Some(parent) = self.graph.label(id) else {
                continue;
            };
            for child in self.graph.children(id) {
                if let Some(label) = self.graph.label(*child) {
                    twigs.push((parent.clone(), label.clone()));
                }
            }
        }
        twigs
    }

    /// Canonical signature of the subtree rooted at `id`
    pub fn signature(&self, id: NodeId) -> Option<Signature> {
        self.contains_node(id)
            .then(|| self.signatures.signature(&self.graph, id))
    }

    /// Copy without duplicate trees; the first of each group is kept
    pub fn unique(&self) -> Forest<L> {
        let mut kept: Vec<NodeId> = Vec::new();
        for root in self.graph.roots() {
            if !kept.iter().any(|k| self.same_trees(*k, self, root)) {
                kept.push(root);
            }
        }
        self.derived(self.graph.project(&kept).0)
    }

    /// `n` copies of every tree, with fresh identities and no dedup
    pub fn replicate(&self, n: usize) -> Forest<L> {
        let mut new = self.derived(NodeGraph::new());
        for _ in 0..n {
            for root in self.graph.roots() {
                new.graph.copy_subtree(&self.graph, root, None);
            }
        }
        new
    }

    /// Structurally identical copy with fresh identities
    pub fn reissue(&self) -> Forest<L> {
        self.replicate(1)
    }

    /// Graft-based composition `self * other`
    ///
    /// For every tree of `other` whose root label is a key of `self`, the
    /// root's child subtrees are grafted onto every node of `self` with
    /// that label.
    pub fn compose(&self, other: &Forest<L>) -> Forest<L> {
        self.compose_mapped(other).0
    }

    pub(crate) fn graft_mapped(
        &mut self,
        key: &L,
        other: &Forest<L>,
    ) -> EncyclopediaResult<Vec<(NodeId, NodeId)>> {
        self.check_mutable()?;
        let mut targets = self.graph.labeled(key);
        if let Some(member) = targets.iter().find(|id| other.graph.contains(**id)) {
            debug!("Rejected graft onto {} labeled {:?}", member, key);
            return Err(EncyclopediaError::InvalidGraft(member.to_string()));
        }
        if targets.is_empty() {
            targets.push(self.graph.add_root(key.clone()));
        }

        let trees = other.roots();
        let mut mapping = Vec::new();
        for target in &targets {
            for tree in &trees {
                mapping.extend(self.graph.copy_subtree(&other.graph, *tree, Some(*target)));
            }
        }
        self.signatures.invalidate();
        debug!(
            "Grafted {} tree(s) onto {} node(s) labeled {:?}, {} node(s) created",
            trees.len(),
            targets.len(),
            key,
            mapping.len()
        );
        Ok(mapping)
    }

    pub(crate) fn merge_mapped(&mut self, other: &Forest<L>) -> EncyclopediaResult<Vec<(NodeId, NodeId)>> {
        self.check_mutable()?;
        let mut mapping = Vec::new();
        for tree in other.roots() {
            mapping.extend(self.graph.copy_subtree(&other.graph, tree, None));
        }
        Ok(mapping)
    }

    /// [`get`](Self::get) together with the `(source, copy)` pairs of the
    /// nested matches copied with fresh identities
    pub(crate) fn projection(&self, key: &L) -> (Forest<L>, Vec<(NodeId, NodeId)>) {
        let (graph, copies) = self.graph.project(&self.matches(key));
        (self.derived(graph), copies)
    }

    pub(crate) fn branch_mapped(&self, key: &L) -> EncyclopediaResult<(Forest<L>, Vec<(NodeId, NodeId)>)> {
        let (view, copies) = self.projection(key);
        let roots = view.tree_count();
        if roots > 1 {
            return Err(EncyclopediaError::MultipleTrees {
                key: describe(key),
                roots,
            });
        }
        Ok((view, copies))
    }

    pub(crate) fn prune(&mut self, key: &L) -> EncyclopediaResult<Vec<NodeId>> {
        self.check_mutable()?;
        let mut removed = Vec::new();
        for id in self.graph.labeled(key) {
            // Nested matches are gone with their outermost match
            if self.graph.contains(id) {
                removed.extend(self.graph.remove_subtree(id));
            }
        }
        if !removed.is_empty() {
            self.signatures.invalidate();
            debug!("Pruned {} node(s) under key {:?}", removed.len(), key);
        }
        Ok(removed)
    }

    pub(crate) fn union_mapped(&self, other: &Forest<L>) -> (Forest<L>, Vec<(NodeId, NodeId)>) {
        let mut new = self.detached_copy();
        let mut mapping = Vec::new();
        let mut skipped = 0;
        for tree in other.graph.roots() {
            if new.holds_tree(other, tree) {
                skipped += 1;
                continue;
            }
            mapping.extend(new.graph.copy_subtree(&other.graph, tree, None));
        }
        if skipped > 0 {
            debug!("Union skipped {} duplicate tree(s)", skipped);
        }
        (new, mapping)
    }

    pub(crate) fn compose_mapped(&self, other: &Forest<L>) -> (Forest<L>, Vec<(NodeId, NodeId)>) {
        let mut new = self.detached_copy();
        let mut mapping = Vec::new();
        for tree in other.graph.roots() {
            let Some(label) = other.graph.label(tree) else {
                continue;
            };
            // Targets come from `self` so freshly grafted copies are not revisited
            for target in self.graph.labeled(label) {
                for branch in other.graph.children(tree) {
                    mapping.extend(new.graph.copy_subtree(&other.graph, *branch, Some(target)));
                }
            }
        }
        new.signatures.invalidate();
        (new, mapping)
    }

    pub(crate) fn relabeled<M>(&self, f: &M) -> Forest<L>
    where
        M: Morphism<L> + ?Sized,
    {
        self.derived(self.graph.map_labels(|label| f.apply(label)))
    }

    /// Nodes labeled `key` in pre-order
    pub(crate) fn matches(&self, key: &L) -> Vec<NodeId> {
        if !self.contains_key(key) {
            return Vec::new();
        }
        self.graph
            .preorder_all()
            .into_iter()
            .filter(|id| self.graph.label(*id) == Some(key))
            .collect()
    }

    /// Whether `self` has a tree equal to the tree of `other` rooted at `tree`
    fn holds_tree(&self, other: &Forest<L>, tree: NodeId) -> bool {
        self.graph
            .roots()
            .any(|root| self.same_trees(root, other, tree))
    }

    fn same_trees(&self, root: NodeId, other: &Forest<L>, tree: NodeId) -> bool {
        self.signatures.signature(&self.graph, root) == other.signatures.signature(&other.graph, tree)
            && same_tree(
                (&self.graph, &self.signatures),
                root,
                (&other.graph, &other.signatures),
                tree,
            )
    }

    fn root_signatures(&self) -> Vec<(Signature, NodeId)> {
        let mut signed: Vec<(Signature, NodeId)> = self
            .graph
            .roots()
            .map(|root| (self.signatures.signature(&self.graph, root), root))
            .collect();
        signed.sort_by_key(|(signature, _)| *signature);
        signed
    }

    fn check_mutable(&self) -> EncyclopediaResult<()> {
        if self.frozen {
            debug!("Rejected mutation of frozen forest");
            return Err(EncyclopediaError::Frozen);
        }
        Ok(())
    }

    /// Copy used as the starting point of algebra results, always mutable
    fn detached_copy(&self) -> Self {
        let mut new = self.clone();
        new.frozen = false;
        new
    }

    /// New mutable forest over `graph` with the same memo setting
    fn derived(&self, graph: NodeGraph<L>) -> Self {
        Forest {
            graph,
            signatures: SignatureCache::new(self.signatures.enabled()),
            frozen: false,
        }
    }
}

impl<L: Element> Default for Forest<L> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L: Element> Encyclopedia for Forest<L> {
    type Key = L;
    type Value = L;

    /// Twigs: one entry per parent/child edge
    fn entries(&self) -> Vec<Entry<L, L>> {
        self.twigs()
    }

    fn keys(&self) -> Vec<L> {
        self.graph.labels().cloned().collect()
    }

    /// Label of every node in pre-order
    fn values(&self) -> Vec<L> {
        self.graph
            .preorder_all()
            .into_iter()
            .filter_map(|id| self.graph.label(id).cloned())
            .collect()
    }

    /// Distinct labels; see [`node_count`](Forest::node_count) for nodes
    fn len(&self) -> usize {
        self.graph.labels().count()
    }

    fn assign(&mut self, key: L, value: L) -> EncyclopediaResult<()> {
        self.set(key, value).map(|_| ())
    }

    fn remove(&mut self, key: &L) -> EncyclopediaResult<usize> {
        self.delete(key)
    }

    /// Trees of `other` not already present in `self` are added as new trees
    fn union(&self, other: &Self) -> EncyclopediaResult<Self> {
        Ok(self.union_mapped(other).0)
    }

    /// Trees of `self` with a structural twin in `other` are dropped
    fn difference(&self, other: &Self) -> EncyclopediaResult<Self> {
        let mut new = self.detached_copy();
        let doomed: Vec<NodeId> = self
            .graph
            .roots()
            .filter(|root| other.holds_tree(self, *root))
            .collect();
        for root in &doomed {
            new.graph.remove_subtree(*root);
        }
        Ok(new)
    }

    fn map_with<M>(&self, f: &M) -> Self
    where
        M: Morphism<L> + ?Sized,
    {
        self.relabeled(f)
    }

    fn is_frozen(&self) -> bool {
        self.frozen
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.frozen = frozen;
    }
}

/// Forests are equal when they hold the same multiset of labeled trees,
/// whatever the node identities and child order
impl<L: Element> PartialEq for Forest<L> {
    fn eq(&self, other: &Self) -> bool {
        let mine = self.root_signatures();
        let theirs = other.root_signatures();
        mine.len() == theirs.len()
            && mine.iter().zip(theirs.iter()).all(|((ls, lr), (rs, rr))| {
                ls == rs
                    && same_tree(
                        (&self.graph, &self.signatures),
                        *lr,
                        (&other.graph, &other.signatures),
                        *rr,
                    )
            })
    }
}

impl<L: Element> Eq for Forest<L> {}

/// Plant one single-node tree per label
impl<L: Element> FromIterator<L> for Forest<L> {
    fn from_iter<I: IntoIterator<Item = L>>(iter: I) -> Self {
        let mut forest = Forest::new();
        for label in iter {
            forest.graph.add_root(label);
        }
        forest
    }
}

impl<L> fmt::Display for Forest<L>
where
    L: Element + fmt::Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Forest({} trees, {} nodes)", self.tree_count(), self.node_count())?;
        for (depth, id) in self.climb(None) {
            if let Some(label) = self.graph.label(id) {
                writeln!(f, "{}{}", "  ".repeat(depth + 1), label)?;
            }
        }
        Ok(())
    }
}

impl<'a, L: Element> Add<&'a Forest<L>> for &'a Forest<L> {
    type Output = EncyclopediaResult<Forest<L>>;

    fn add(self, rhs: &'a Forest<L>) -> Self::Output {
        self.union(rhs)
    }
}

impl<'a, L: Element> Sub<&'a Forest<L>> for &'a Forest<L> {
    type Output = EncyclopediaResult<Forest<L>>;

    fn sub(self, rhs: &'a Forest<L>) -> Self::Output {
        self.difference(rhs)
    }
}

impl<'a, L: Element> BitAnd<&'a Forest<L>> for &'a Forest<L> {
    type Output = EncyclopediaResult<Forest<L>>;

    fn bitand(self, rhs: &'a Forest<L>) -> Self::Output {
        self.intersect(rhs)
    }
}

impl<'a, L: Element> Mul<&'a Forest<L>> for &'a Forest<L> {
    type Output = Forest<L>;

    fn mul(self, rhs: &'a Forest<L>) -> Self::Output {
        self.compose(rhs)
    }
}
