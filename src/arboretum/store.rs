//! Forest with inheritable node attributes

use super::overlay::AttributeOverlay;
use crate::algebra::{Element, Encyclopedia, Entry, Morphism};
use crate::collections::IndexedMap;
use crate::config::ForestConfig;
use crate::error::{describe, EncyclopediaError, EncyclopediaResult};
use crate::forest::{Forest, NodeId};
use std::fmt;
use std::ops::{Add, BitAnd, Deref, Mul, Sub};
use tracing::debug;

/// A [`Forest`] whose nodes carry named attributes
///
/// Read-only forest queries are available through `Deref`; every mutation
/// goes through the arboretum so attributes follow their nodes.
#[derive(Debug, Clone)]
pub struct Arboretum<L, V> {
    forest: Forest<L>,
    overlay: AttributeOverlay<V>,
}

impl<L: Element, V: Clone> Arboretum<L, V> {
    pub fn new() -> Self {
        Self::with_config(ForestConfig::default())
    }

    pub fn with_config(config: ForestConfig) -> Self {
        Arboretum {
            forest: Forest::with_config(config),
            overlay: AttributeOverlay::new(),
        }
    }

    /// Wrap an existing forest with no attributes
    pub fn from_forest(forest: Forest<L>) -> Self {
        Arboretum {
            forest,
            overlay: AttributeOverlay::new(),
        }
    }

    pub fn forest(&self) -> &Forest<L> {
        &self.forest
    }

    pub fn overlay(&self) -> &AttributeOverlay<V> {
        &self.overlay
    }

    /// Drop the attributes and keep the trees
    pub fn into_forest(self) -> Forest<L> {
        self.forest
    }

    /// Record `name = value` on every node currently labeled `key`,
    /// returning the number of nodes touched
    ///
    /// Existing and future descendants inherit the value at lookup time.
    pub fn set_attribute(&mut self, key: &L, name: impl Into<String>, value: V) -> EncyclopediaResult<usize> {
        self.check_mutable()?;
        let name = name.into();
        let nodes = self.forest.nodes_labeled(key);
        for node in &nodes {
            self.overlay.set(*node, name.clone(), value.clone());
        }
        Ok(nodes.len())
    }

    /// Resolve `name` for the nodes labeled `key`
    ///
    /// Each node (in pre-order) is searched from itself up to its root and
    /// the first recorded value wins. `None` when no node resolves `name`.
    pub fn get_attribute(&self, key: &L, name: &str) -> Option<&V> {
        self.forest
            .matches(key)
            .into_iter()
            .find_map(|node| self.attribute_of(node, name))
    }

    /// Resolve `name` for a single node
    pub fn attribute_of(&self, node: NodeId, name: &str) -> Option<&V> {
        self.overlay.resolve(self.forest.graph(), node, name)
    }

    /// Attributes recorded on `node` itself
    pub fn own_attributes(&self, node: NodeId) -> Option<&IndexedMap<String, V>> {
        self.overlay.attributes(node)
    }

    /// Remove `name` from the nodes labeled `key`, returning how many
    /// nodes had it
    pub fn clear_attribute(&mut self, key: &L, name: &str) -> EncyclopediaResult<usize> {
        self.check_mutable()?;
        let cleared = self
            .forest
            .nodes_labeled(key)
            .into_iter()
            .filter(|node| self.overlay.remove(*node, name).is_some())
            .count();
        Ok(cleared)
    }

    pub fn plant(&mut self, label: L) -> EncyclopediaResult<NodeId> {
        self.forest.plant(label)
    }

    /// See [`Forest::set`]
    pub fn set(&mut self, key: L, label: L) -> EncyclopediaResult<Vec<NodeId>> {
        self.forest.set(key, label)
    }

    /// Graft the trees of another arboretum, attributes included
    pub fn graft(&mut self, key: &L, other: &Arboretum<L, V>) -> EncyclopediaResult<usize> {
        let mapping = self.forest.graft_mapped(key, &other.forest)?;
        self.overlay.carry(&other.overlay, &mapping);
        Ok(mapping.len())
    }

    /// Graft the trees of a plain forest
    pub fn graft_forest(&mut self, key: &L, other: &Forest<L>) -> EncyclopediaResult<usize> {
        self.forest.graft(key, other)
    }

    /// Add the trees of another arboretum, attributes included
    pub fn merge(&mut self, other: &Arboretum<L, V>) -> EncyclopediaResult<usize> {
        let mapping = self.forest.merge_mapped(&other.forest)?;
        self.overlay.carry(&other.overlay, &mapping);
        Ok(mapping.len())
    }

    /// Prune every node labeled `key` along with its attributes
    pub fn delete(&mut self, key: &L) -> EncyclopediaResult<usize> {
        let removed = self.forest.prune(key)?;
        if !removed.is_empty() {
            self.overlay.retain_live(self.forest.graph());
            debug!("Dropped attributes of {} pruned node(s)", removed.len());
        }
        Ok(removed.len())
    }

    /// Projection of the nodes labeled `key`, keeping the attributes
    /// recorded on the projected nodes
    /// Projection of every node labeled `key`; nested matches copied as
    /// trees of their own keep their recorded attributes
    pub fn get(&self, key: &L) -> Arboretum<L, V> {
        let (forest, copies) = self.forest.projection(key);
        self.projected(forest, &copies)
    }

    pub fn get_strict(&self, key: &L) -> EncyclopediaResult<Arboretum<L, V>> {
        if !self.forest.contains_key(key) {
            return Err(EncyclopediaError::KeyNotFound(describe(key)));
        }
        Ok(self.get(key))
    }

    pub fn branch(&self, key: &L) -> EncyclopediaResult<Arboretum<L, V>> {
        self.forest
            .branch_mapped(key)
            .map(|(forest, copies)| self.projected(forest, &copies))
    }

    pub fn cutting(&self, level: usize) -> Arboretum<L, V> {
        self.restricted(self.forest.cutting(level))
    }

    pub fn unique(&self) -> Arboretum<L, V> {
        self.restricted(self.forest.unique())
    }

    /// Graft-based composition, carrying the attributes of `other`'s branches
    pub fn compose(&self, other: &Arboretum<L, V>) -> Arboretum<L, V> {
        let (forest, mapping) = self.forest.compose_mapped(&other.forest);
        let mut overlay = self.overlay.clone();
        overlay.carry(&other.overlay, &mapping);
        Arboretum { forest, overlay }
    }

    fn projected(&self, forest: Forest<L>, copies: &[(NodeId, NodeId)]) -> Arboretum<L, V> {
        let mut view = self.restricted(forest);
        view.overlay.carry(&self.overlay, copies);
        view
    }

    fn restricted(&self, forest: Forest<L>) -> Arboretum<L, V> {
        let overlay = self.overlay.restricted(forest.graph());
        Arboretum { forest, overlay }
    }

    fn check_mutable(&self) -> EncyclopediaResult<()> {
        if self.forest.is_frozen() {
            debug!("Rejected attribute change on frozen arboretum");
            return Err(EncyclopediaError::Frozen);
        }
        Ok(())
    }
}

impl<L: Element, V: Clone> Default for Arboretum<L, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<L, V> Deref for Arboretum<L, V> {
    type Target = Forest<L>;

    fn deref(&self) -> &Forest<L> {
        &self.forest
    }
}

impl<L: Element, V: Clone> Encyclopedia for Arboretum<L, V> {
    type Key = L;
    type Value = L;

    fn entries(&self) -> Vec<Entry<L, L>> {
        self.forest.entries()
    }

    fn keys(&self) -> Vec<L> {
        self.forest.keys()
    }

    fn values(&self) -> Vec<L> {
        self.forest.values()
    }

    fn len(&self) -> usize {
        self.forest.len()
    }

    fn assign(&mut self, key: L, value: L) -> EncyclopediaResult<()> {
        self.forest.assign(key, value)
    }

    fn remove(&mut self, key: &L) -> EncyclopediaResult<usize> {
        self.delete(key)
    }

    fn union(&self, other: &Self) -> EncyclopediaResult<Self> {
        let (forest, mapping) = self.forest.union_mapped(&other.forest);
        let mut overlay = self.overlay.clone();
        overlay.carry(&other.overlay, &mapping);
        Ok(Arboretum { forest, overlay })
    }

    fn difference(&self, other: &Self) -> EncyclopediaResult<Self> {
        let forest = self.forest.difference(&other.forest)?;
        Ok(self.restricted(forest))
    }

    /// Relabels nodes; identities and therefore attributes are preserved
    fn map_with<M>(&self, f: &M) -> Self
    where
        M: Morphism<L> + ?Sized,
    {
        self.restricted(self.forest.relabeled(f))
    }

    fn is_frozen(&self) -> bool {
        self.forest.is_frozen()
    }

    fn set_frozen(&mut self, frozen: bool) {
        self.forest.set_frozen(frozen);
    }
}

impl<L, V> fmt::Display for Arboretum<L, V>
where
    L: Element + fmt::Display,
    V: Clone + fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "Arboretum({} trees, {} nodes, {} attributes)",
            self.forest.tree_count(),
            self.forest.node_count(),
            self.overlay.len()
        )?;
        for (depth, id) in self.forest.climb(None) {
            let Some(label) = self.forest.label_of(id) else {
                continue;
            };
            write!(f, "{}{}", "  ".repeat(depth + 1), label)?;
            if let Some(names) = self.overlay.attributes(id) {
                let rendered: Vec<String> = names
                    .iter()
                    .map(|(name, value)| format!("{}={:?}", name, value))
                    .collect();
                write!(f, " [{}]", rendered.join(", "))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl<'a, L: Element, V: Clone> Add<&'a Arboretum<L, V>> for &'a Arboretum<L, V> {
    type Output = EncyclopediaResult<Arboretum<L, V>>;

    fn add(self, rhs: &'a Arboretum<L, V>) -> Self::Output {
        self.union(rhs)
    }
}

impl<'a, L: Element, V: Clone> Sub<&'a Arboretum<L, V>> for &'a Arboretum<L, V> {
    type Output = EncyclopediaResult<Arboretum<L, V>>;

    fn sub(self, rhs: &'a Arboretum<L, V>) -> Self::Output {
        self.difference(rhs)
    }
}

impl<'a, L: Element, V: Clone> BitAnd<&'a Arboretum<L, V>> for &'a Arboretum<L, V> {
    type Output = EncyclopediaResult<Arboretum<L, V>>;

    fn bitand(self, rhs: &'a Arboretum<L, V>) -> Self::Output {
        self.intersect(rhs)
    }
}

impl<'a, L: Element, V: Clone> Mul<&'a Arboretum<L, V>> for &'a Arboretum<L, V> {
    type Output = Arboretum<L, V>;

    fn mul(self, rhs: &'a Arboretum<L, V>) -> Self::Output {
        self.compose(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    type Document = Arboretum<&'static str, &'static str>;

    #[test]
    fn test_attribute_inheritance() {
        let mut doc = Document::new();
        doc.set("Document", "Section 1").unwrap();
        doc.set("Section 1", "Section 1.1").unwrap();
        doc.set_attribute(&"Section 1", "font", "Helvetica").unwrap();
        doc.set("Document", "Section 2").unwrap();
        doc.set("Section 1.1", "Section 1.1.1").unwrap();

        assert_eq!(doc.get_attribute(&"Section 1.1.1", "font"), Some(&"Helvetica"));
        assert_eq!(doc.get_attribute(&"Section 2", "font"), None);
        assert_eq!(doc.get_attribute(&"Document", "font"), None);
        assert_eq!(doc.get_attribute(&"Missing", "font"), None);
    }

    #[test]
    fn test_nearest_ancestor_wins() {
        let mut tree = Document::new();
        tree.set("G01", "G11").unwrap();
        tree.set("G11", "G21").unwrap();
        tree.set("G21", "G31").unwrap();
        tree.set_attribute(&"G11", "color", "red").unwrap();
        tree.set_attribute(&"G01", "shape", "circle").unwrap();
        tree.set_attribute(&"G21", "color", "blue").unwrap();

        assert_eq!(tree.get_attribute(&"G31", "color"), Some(&"blue"));
        assert_eq!(tree.get_attribute(&"G11", "color"), Some(&"red"));
        assert_eq!(tree.get_attribute(&"G31", "shape"), Some(&"circle"));
    }

    #[test]
    fn test_clear_attribute() {
        let mut tree = Document::new();
        tree.set("root", "child").unwrap();
        tree.set_attribute(&"root", "color", "red").unwrap();
        assert_eq!(tree.clear_attribute(&"root", "color").unwrap(), 1);
        assert_eq!(tree.clear_attribute(&"root", "color").unwrap(), 0);
        assert_eq!(tree.get_attribute(&"child", "color"), None);
    }

    #[test]
    fn test_prune_drops_attributes() {
        let mut tree = Document::new();
        tree.set("root", "child").unwrap();
        tree.set("child", "leaf").unwrap();
        tree.set_attribute(&"leaf", "color", "green").unwrap();
        tree.set_attribute(&"root", "color", "red").unwrap();

        assert_eq!(tree.delete(&"child").unwrap(), 2);
        assert_eq!(tree.overlay().len(), 1);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_graft_carries_attributes() {
        let mut target = Document::new();
        target.set("Book", "Chapter").unwrap();

        let mut insert = Document::new();
        insert.set("Figure", "Caption").unwrap();
        insert.set_attribute(&"Figure", "border", "thin").unwrap();

        target.graft(&"Chapter", &insert).unwrap();
        assert_eq!(target.get_attribute(&"Caption", "border"), Some(&"thin"));

        // The copy is independent of later changes to the source
        insert.clear_attribute(&"Figure", "border").unwrap();
        assert_eq!(target.get_attribute(&"Caption", "border"), Some(&"thin"));
    }

    #[test]
    fn test_union_and_projection_keep_attributes() {
        let mut a = Document::new();
        a.set("A", "a1").unwrap();
        a.set_attribute(&"A", "kind", "first").unwrap();
        let mut b = Document::new();
        b.set("B", "b1").unwrap();
        b.set_attribute(&"b1", "kind", "second").unwrap();

        let both = (&a + &b).unwrap();
        assert_eq!(both.tree_count(), 2);
        assert_eq!(both.get_attribute(&"a1", "kind"), Some(&"first"));
        assert_eq!(both.get_attribute(&"b1", "kind"), Some(&"second"));

        let view = both.get(&"a1");
        assert_eq!(view.get_attribute(&"a1", "kind"), None);
        let view = both.get(&"A");
        assert_eq!(view.get_attribute(&"a1", "kind"), Some(&"first"));

        let mut nested = Document::new();
        nested.set("A", "B").unwrap();
        nested.set("B", "A").unwrap();
        nested.set_attribute(&"A", "kind", "outer").unwrap();
        let inner = nested.nodes_labeled(&"A")[1];
        nested.overlay.set(inner, "kind".to_string(), "inner");
        let view = nested.get(&"A");
        assert_eq!(view.tree_count(), 2);
        let copy = view.roots()[1];
        assert_ne!(copy, inner);
        assert_eq!(view.attribute_of(copy, "kind"), Some(&"inner"));
        assert!(nested.branch(&"A").is_err());

        let rest = (&both - &a).unwrap();
        assert_eq!(rest.tree_count(), 1);
        assert_eq!(rest.overlay().len(), 1);
    }

    #[test]
    fn test_map_with_keeps_attributes() {
        let mut tree = Document::new();
        tree.set("root", "child").unwrap();
        tree.set_attribute(&"root", "color", "red").unwrap();

        let renamed = tree.map_with(&|label: &&'static str| {
            Some(if *label == "root" { "trunk" } else { *label })
        });
        assert_eq!(renamed.get_attribute(&"child", "color"), Some(&"red"));
        assert!(renamed.contains_key(&"trunk"));
    }

    #[test]
    fn test_frozen_rejects_attribute_changes() {
        let mut tree = Document::new();
        tree.set("root", "child").unwrap();
        let mut frozen = tree.freeze();
        assert_eq!(
            frozen.set_attribute(&"root", "color", "red"),
            Err(EncyclopediaError::Frozen)
        );
        assert_eq!(frozen.delete(&"root"), Err(EncyclopediaError::Frozen));
    }

    #[test]
    fn test_display() {
        let mut tree = Document::new();
        tree.set("root", "child").unwrap();
        tree.set_attribute(&"child", "color", "red").unwrap();
        assert_eq!(
            tree.to_string(),
            "Arboretum(1 trees, 2 nodes, 1 attributes)\n  root\n    child [color=\"red\"]\n"
        );
    }
}
