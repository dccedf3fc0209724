//! Nodes - a live list of query results
//!
//! Unlike a plain `Vec<NodeId>`, the list acts on the tree its nodes came
//! from: `remove`, `set`, `clear`, `remove_all`, `retain_all`, `remove_if`
//! and `replace_all` edit the tree as well as the list. The `deselect`
//! family only edits the list. Use it to narrow a selection without
//! destroying anything.
//!
//! The list holds ids, so every tree-editing method takes the arena.

use ahash::AHashSet;
use dom::{DomArena, DomError, NodeId, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Nodes {
    ids: Vec<NodeId>,
}

impl Nodes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<NodeId> {
        self.ids.get(index).copied()
    }

    pub fn first(&self) -> Option<NodeId> {
        self.ids.first().copied()
    }

    pub fn last(&self) -> Option<NodeId> {
        self.ids.last().copied()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.ids.iter().copied()
    }

    pub fn as_slice(&self) -> &[NodeId] {
        &self.ids
    }

    /// Add a node to the end of the list. The tree is not touched.
    pub fn push(&mut self, id: NodeId) {
        self.ids.push(id);
    }

    /// Plain copy of the ids. Editing it leaves the tree alone.
    pub fn to_vec(&self) -> Vec<NodeId> {
        self.ids.clone()
    }

    fn check_index(&self, index: usize) -> Result<()> {
        if index < self.ids.len() {
            Ok(())
        } else {
            Err(DomError::IndexOutOfBounds {
                index,
                len: self.ids.len(),
            })
        }
    }

    /// Deep copies of every node. The copies are not attached anywhere.
    pub fn deep_clone(&self, arena: &mut DomArena) -> Result<Nodes> {
        let mut clone = Nodes::with_capacity(self.ids.len());
        for &id in &self.ids {
            clone.ids.push(arena.deep_clone(id)?);
        }
        Ok(clone)
    }

    /// Detach every node from the tree but keep them in the list
    pub fn detach_all(&self, arena: &mut DomArena) -> Result<()> {
        for &id in &self.ids {
            arena.detach(id)?;
        }
        Ok(())
    }

    // Tree-coupled edits

    /// Replace the node at `index` in the list and in the tree.
    ///
    /// Returns the displaced node, now rootless. Fails without touching the
    /// list if the old node has no parent or the replacement would create
    /// a cycle.
    pub fn set(&mut self, arena: &mut DomArena, index: usize, node: NodeId) -> Result<NodeId> {
        self.check_index(index)?;
        let old = self.ids[index];
        arena.replace_with(old, node)?;
        self.ids[index] = node;
        Ok(old)
    }

    /// Remove the node at `index` from the list and from the tree
    pub fn remove(&mut self, arena: &mut DomArena, index: usize) -> Result<NodeId> {
        self.check_index(index)?;
        let old = self.ids[index];
        arena.detach(old)?;
        self.ids.remove(index);
        tracing::trace!(node = old, index, "removed node from list and tree");
        Ok(old)
    }

    /// Remove the first occurrence of `id` from the list and from the tree.
    /// Returns whether the list contained it.
    pub fn remove_node(&mut self, arena: &mut DomArena, id: NodeId) -> Result<bool> {
        match self.ids.iter().position(|&n| n == id) {
            Some(index) => {
                self.remove(arena, index)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Detach every node, then empty the list.
    ///
    /// Fails before touching the tree if any listed node is unknown.
    pub fn clear(&mut self, arena: &mut DomArena) -> Result<()> {
        for &id in &self.ids {
            arena.get(id)?;
        }
        self.detach_all(arena)?;
        self.ids.clear();
        Ok(())
    }

    /// Remove every listed node that is in `ids`, from list and tree
    pub fn remove_all(&mut self, arena: &mut DomArena, ids: &[NodeId]) -> Result<bool> {
        let mut any_removed = false;
        for &id in ids {
            any_removed |= self.remove_node(arena, id)?;
        }
        Ok(any_removed)
    }

    /// Keep only nodes that are in `keep`; the rest leave list and tree
    pub fn retain_all(&mut self, arena: &mut DomArena, keep: &[NodeId]) -> Result<bool> {
        let keep: AHashSet<NodeId> = keep.iter().copied().collect();
        self.remove_if(arena, |_, id| !keep.contains(&id))
    }

    /// Remove every node the predicate picks, from list and tree
    pub fn remove_if<F>(&mut self, arena: &mut DomArena, mut filter: F) -> Result<bool>
    where
        F: FnMut(&DomArena, NodeId) -> bool,
    {
        let mut any_removed = false;
        let mut index = 0;
        while index < self.ids.len() {
            if filter(&*arena, self.ids[index]) {
                self.remove(arena, index)?;
                any_removed = true;
            } else {
                index += 1;
            }
        }
        Ok(any_removed)
    }

    /// Replace each node with the operator's result, in list and tree
    pub fn replace_all<F>(&mut self, arena: &mut DomArena, mut operator: F) -> Result<()>
    where
        F: FnMut(&mut DomArena, NodeId) -> Result<NodeId>,
    {
        for index in 0..self.ids.len() {
            let replacement = operator(&mut *arena, self.ids[index])?;
            self.set(arena, index, replacement)?;
        }
        Ok(())
    }

    // List-only edits

    /// Remove the node at `index` from the list only
    pub fn deselect(&mut self, index: usize) -> Result<NodeId> {
        self.check_index(index)?;
        Ok(self.ids.remove(index))
    }

    /// Remove the first occurrence of `id` from the list only
    pub fn deselect_node(&mut self, id: NodeId) -> bool {
        match self.ids.iter().position(|&n| n == id) {
            Some(index) => {
                self.ids.remove(index);
                true
            }
            None => false,
        }
    }

    /// Empty the list, leaving the tree alone
    pub fn deselect_all(&mut self) {
        self.ids.clear();
    }
}

impl From<Vec<NodeId>> for Nodes {
    fn from(ids: Vec<NodeId>) -> Self {
        Self { ids }
    }
}

impl FromIterator<NodeId> for Nodes {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            ids: iter.into_iter().collect(),
        }
    }
}

impl IntoIterator for Nodes {
    type Item = NodeId;
    type IntoIter = std::vec::IntoIter<NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.into_iter()
    }
}

impl<'a> IntoIterator for &'a Nodes {
    type Item = NodeId;
    type IntoIter = std::iter::Copied<std::slice::Iter<'a, NodeId>>;

    fn into_iter(self) -> Self::IntoIter {
        self.ids.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ul -> [li(a), li(b), li(c)], returns (arena, ul, [li...])
    fn list_fixture() -> (DomArena, NodeId, Vec<NodeId>) {
        let mut arena = DomArena::new();
        let ul = arena.create_element("ul");
        let mut items = Vec::new();
        for value in ["a", "b", "c"] {
            let li = arena.create_element("li");
            let text = arena.create_text(value);
            arena.append_child(li, text).unwrap();
            arena.append_child(ul, li).unwrap();
            items.push(li);
        }
        (arena, ul, items)
    }

    fn texts(arena: &DomArena, parent: NodeId) -> Vec<String> {
        arena
            .child_ids(parent)
            .unwrap()
            .iter()
            .map(|&id| arena.text(id).unwrap())
            .collect()
    }

    #[test]
    fn test_remove_detaches_from_tree() {
        let (mut arena, ul, items) = list_fixture();
        let mut nodes = Nodes::from(items.clone());

        let removed = nodes.remove(&mut arena, 1).unwrap();
        assert_eq!(removed, items[1]);
        assert_eq!(nodes.as_slice(), &[items[0], items[2]]);
        assert_eq!(texts(&arena, ul), vec!["a", "c"]);
        assert_eq!(arena.sibling_index(items[2]), Some(1));
        assert!(nodes.remove(&mut arena, 5).is_err());
    }

    #[test]
    fn test_deselect_keeps_tree() {
        let (mut arena, ul, items) = list_fixture();
        let mut nodes = Nodes::from(items.clone());

        assert_eq!(nodes.deselect(1).unwrap(), items[1]);
        assert_eq!(nodes.len(), 2);
        assert_eq!(texts(&arena, ul), vec!["a", "b", "c"]);
        assert!(arena.descendants(ul).any(|id| id == items[1]));

        assert!(nodes.deselect_node(items[0]));
        assert!(!nodes.deselect_node(items[0]));
        nodes.deselect_all();
        assert!(nodes.is_empty());
        assert_eq!(arena.child_ids(ul).unwrap().len(), 3);

        // removal via the list still works after deselecting others
        let mut nodes = Nodes::from(vec![items[2]]);
        assert!(nodes.remove_node(&mut arena, items[2]).unwrap());
        assert!(!nodes.remove_node(&mut arena, items[2]).unwrap());
        assert_eq!(texts(&arena, ul), vec!["a", "b"]);
    }

    #[test]
    fn test_set_replaces_in_tree() {
        let (mut arena, ul, items) = list_fixture();
        let mut nodes = Nodes::from(items.clone());
        let li = arena.create_element("li");
        let text = arena.create_text("new");
        arena.append_child(li, text).unwrap();

        let old = nodes.set(&mut arena, 0, li).unwrap();
        assert_eq!(old, items[0]);
        assert_eq!(nodes.first(), Some(li));
        assert_eq!(texts(&arena, ul), vec!["new", "b", "c"]);
        assert_eq!(arena.sibling_index(old), None);
    }

    #[test]
    fn test_set_on_rootless_node_leaves_list_alone() {
        let mut arena = DomArena::new();
        let lonely = arena.create_text("x");
        let other = arena.create_text("y");
        let mut nodes = Nodes::from(vec![lonely]);

        assert!(matches!(
            nodes.set(&mut arena, 0, other),
            Err(DomError::NoParent(_))
        ));
        assert_eq!(nodes.as_slice(), &[lonely]);
    }

    #[test]
    fn test_set_with_ancestor_leaves_list_alone() {
        let (mut arena, ul, items) = list_fixture();
        let mut nodes = Nodes::from(vec![items[1]]);

        assert!(matches!(
            nodes.set(&mut arena, 0, ul),
            Err(DomError::HierarchyCycle { .. })
        ));
        assert_eq!(nodes.as_slice(), &[items[1]]);
        assert_eq!(texts(&arena, ul), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_failed_remove_keeps_entry() {
        let mut arena = DomArena::new();
        let mut nodes = Nodes::from(vec![42]);

        assert!(matches!(
            nodes.remove(&mut arena, 0),
            Err(DomError::NodeNotFound(42))
        ));
        assert_eq!(nodes.as_slice(), &[42]);

        assert!(nodes.remove_node(&mut arena, 42).is_err());
        assert!(nodes.remove_if(&mut arena, |_, _| true).is_err());
        assert_eq!(nodes.len(), 1);
    }

    #[test]
    fn test_failed_clear_leaves_tree_and_list() {
        let (mut arena, ul, items) = list_fixture();
        let mut nodes = Nodes::from(vec![items[0], 99]);

        assert!(nodes.clear(&mut arena).is_err());
        assert_eq!(nodes.as_slice(), &[items[0], 99]);
        assert_eq!(texts(&arena, ul), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_clear_detaches_everything() {
        let (mut arena, ul, items) = list_fixture();
        let mut nodes = Nodes::from(vec![items[0], items[2]]);
        nodes.clear(&mut arena).unwrap();

        assert!(nodes.is_empty());
        assert_eq!(texts(&arena, ul), vec!["b"]);
    }

    #[test]
    fn test_detach_all_keeps_list() {
        let (mut arena, ul, items) = list_fixture();
        let nodes = Nodes::from(items.clone());
        nodes.detach_all(&mut arena).unwrap();

        assert_eq!(nodes.len(), 3);
        assert!(arena.child_ids(ul).unwrap().is_empty());
        assert_eq!(arena.text(nodes.get(1).unwrap()).unwrap(), "b");
    }

    #[test]
    fn test_remove_all_and_retain_all() {
        let (mut arena, ul, items) = list_fixture();
        let stranger = arena.create_element("p");

        let mut nodes = Nodes::from(items.clone());
        assert!(nodes.remove_all(&mut arena, &[items[0], stranger]).unwrap());
        assert!(!nodes.remove_all(&mut arena, &[stranger]).unwrap());
        assert_eq!(texts(&arena, ul), vec!["b", "c"]);

        assert!(nodes.retain_all(&mut arena, &[items[2]]).unwrap());
        assert_eq!(nodes.as_slice(), &[items[2]]);
        assert_eq!(texts(&arena, ul), vec!["c"]);
        assert!(!nodes.retain_all(&mut arena, &[items[2]]).unwrap());
    }

    #[test]
    fn test_remove_if() {
        let (mut arena, ul, items) = list_fixture();
        let mut nodes = Nodes::from(items.clone());

        let removed = nodes
            .remove_if(&mut arena, |arena, id| arena.text(id).unwrap() != "b")
            .unwrap();
        assert!(removed);
        assert_eq!(nodes.as_slice(), &[items[1]]);
        assert_eq!(texts(&arena, ul), vec!["b"]);

        assert!(!nodes.remove_if(&mut arena, |_, _| false).unwrap());
    }

    #[test]
    fn test_replace_all_updates_tree() {
        let (mut arena, ul, items) = list_fixture();
        let mut nodes = Nodes::from(items.clone());

        nodes
            .replace_all(&mut arena, |arena, id| {
                let upper = arena.text(id)?.to_uppercase();
                let li = arena.create_element("li");
                let text = arena.create_text(upper);
                arena.append_child(li, text)?;
                Ok(li)
            })
            .unwrap();

        assert_eq!(texts(&arena, ul), vec!["A", "B", "C"]);
        assert!(nodes.iter().all(|id| !items.contains(&id)));
        assert_eq!(nodes.to_vec(), arena.child_ids(ul).unwrap().to_vec());
    }

    #[test]
    fn test_deep_clone_is_disconnected() {
        let (mut arena, ul, items) = list_fixture();
        let nodes = Nodes::from(items.clone());
        let mut copies = nodes.deep_clone(&mut arena).unwrap();

        assert_eq!(copies.len(), 3);
        for (copy, original) in copies.iter().zip(nodes.iter()) {
            assert_ne!(copy, original);
            assert_eq!(arena.text(copy).unwrap(), arena.text(original).unwrap());
            assert_eq!(arena.sibling_index(copy), None);
        }

        // mutating the copies never reaches the original tree
        let first_text = arena.child_ids(copies.get(0).unwrap()).unwrap()[0];
        arena.set_value(first_text, "zzz").unwrap();
        copies.clear(&mut arena).unwrap();
        assert_eq!(texts(&arena, ul), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_iteration() {
        let nodes: Nodes = (0..3).collect();
        let doubled: Vec<NodeId> = (&nodes).into_iter().map(|id| id * 2).collect();
        assert_eq!(doubled, vec![0, 2, 4]);
        assert!(nodes.contains(2));
        assert_eq!(nodes.last(), Some(2));
        assert_eq!(nodes.into_iter().count(), 3);
    }
}
