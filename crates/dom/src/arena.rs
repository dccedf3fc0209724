//! Arena-based DOM tree storage
//!
//! Nodes are stored sequentially and addressed by `NodeId`. A parent owns
//! its children through `children_ids`; `parent_id` is a back-reference used
//! for navigation only. Detaching a node hands the subtree back to the
//! caller as a rootless tree that still lives in the arena.
//!
//! ## Memory Layout
//!
//! ```text
//! Arena: Vec<DomNode>
//!        [Node0][Node1][Node2]...
//!         ↑ 4-byte index, not 8-byte pointer
//! ```
//!
//! Slots are never reused: a detached node keeps its id until the arena is
//! cleared or dropped.
//!
//! All structural edits go through this type so that every node's
//! `sibling_index` matches its position in the parent. There is no internal
//! locking; mutation needs `&mut self`, which keeps a single writer.

use crate::error::{DomError, Result};
use crate::text;
use crate::types::{DomNode, NodeId, NodeType};
use ahash::AHashMap;
use smallvec::SmallVec;

/// Arena allocator for DOM nodes
#[derive(Debug, Clone)]
pub struct DomArena {
    /// All nodes stored sequentially, attached or not
    nodes: Vec<DomNode>,

    /// Root node ID (if set)
    root_id: Option<NodeId>,
}

impl DomArena {
    /// Create a new empty arena
    pub fn new() -> Self {
        Self::with_capacity(1024)
    }

    /// Create arena with specific capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            root_id: None,
        }
    }

    fn next_id(&self) -> NodeId {
        self.nodes.len() as NodeId
    }

    /// Add a node to the arena, returns its ID.
    ///
    /// The node is stored rootless and childless whatever its fields say;
    /// link it with [`DomArena::append_child`] or [`DomArena::insert_child`].
    pub fn add_node(&mut self, mut node: DomNode) -> NodeId {
        let node_id = self.next_id();
        node.node_id = node_id;
        node.parent_id = None;
        node.sibling_index = 0;
        node.children_ids.clear();
        if node.node_name.is_empty() {
            node.node_name = node.node_type.default_name().to_string();
        }
        self.nodes.push(node);
        node_id
    }

    /// Create a detached node of any type with the given value
    pub fn create_node(&mut self, node_type: NodeType, node_value: impl Into<String>) -> NodeId {
        let mut node = DomNode::new(0, node_type, String::new());
        node.node_value = node_value.into();
        self.add_node(node)
    }

    pub fn create_document(&mut self) -> NodeId {
        self.create_node(NodeType::Document, "")
    }

    pub fn create_element(&mut self, tag: impl Into<String>) -> NodeId {
        self.add_node(DomNode::new(0, NodeType::Element, tag.into()))
    }

    pub fn create_text(&mut self, value: impl Into<String>) -> NodeId {
        self.create_node(NodeType::Text, value)
    }

    /// Create a detached leaf. Fails for container types.
    pub fn create_leaf(&mut self, node_type: NodeType, value: impl Into<String>) -> Result<NodeId> {
        if node_type.is_container() {
            return Err(DomError::InvalidNodeType {
                expected: "leaf".to_string(),
                actual: node_type.to_string(),
            });
        }
        Ok(self.create_node(node_type, value))
    }

    /// Get node by ID (immutable)
    pub fn get(&self, node_id: NodeId) -> Result<&DomNode> {
        self.nodes
            .get(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Mutable access stays in the crate: callers must not edit links directly.
    pub(crate) fn get_mut(&mut self, node_id: NodeId) -> Result<&mut DomNode> {
        self.nodes
            .get_mut(node_id as usize)
            .ok_or(DomError::NodeNotFound(node_id))
    }

    /// Set root node
    pub fn set_root(&mut self, node_id: NodeId) -> Result<()> {
        self.get(node_id)?;
        self.root_id = Some(node_id);
        Ok(())
    }

    /// Get root node ID
    pub fn root_id(&self) -> Option<NodeId> {
        self.root_id
    }

    /// Total number of nodes, attached or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get children of a node
    pub fn children(&self, node_id: NodeId) -> Result<Vec<&DomNode>> {
        let node = self.get(node_id)?;
        node.children_ids
            .iter()
            .map(|&child_id| self.get(child_id))
            .collect()
    }

    pub fn child_ids(&self, node_id: NodeId) -> Result<&[NodeId]> {
        Ok(&self.get(node_id)?.children_ids)
    }

    /// Get parent of a node
    pub fn parent(&self, node_id: NodeId) -> Result<Option<&DomNode>> {
        let node = self.get(node_id)?;
        match node.parent_id {
            Some(parent_id) => Ok(Some(self.get(parent_id)?)),
            None => Ok(None),
        }
    }

    /// Position among the parent's children, `None` if rootless or unknown
    pub fn sibling_index(&self, node_id: NodeId) -> Option<usize> {
        let node = self.get(node_id).ok()?;
        node.parent_id.map(|_| node.sibling_index)
    }

    /// Walk up from `node_id`; true if `candidate` is the node or one of its ancestors
    pub fn is_ancestor_or_self(&self, candidate: NodeId, node_id: NodeId) -> bool {
        let mut current = Some(node_id);
        while let Some(id) = current {
            if id == candidate {
                return true;
            }
            current = self.get(id).ok().and_then(|n| n.parent_id);
        }
        false
    }

    /// Pre-order iterator over `start` and everything below it
    pub fn descendants(&self, start: NodeId) -> Descendants<'_> {
        let mut stack = Vec::new();
        if self.get(start).is_ok() {
            stack.push(start);
        }
        Descendants { arena: self, stack }
    }

    /// Traverse tree depth-first (iterative, no recursion)
    pub fn traverse_df<F>(&self, start_id: NodeId, mut visit: F) -> Result<()>
    where
        F: FnMut(&DomNode) -> Result<()>,
    {
        let mut stack = vec![start_id];

        while let Some(node_id) = stack.pop() {
            let node = self.get(node_id)?;
            visit(node)?;

            // Push children in reverse order (so they're visited left-to-right)
            for &child_id in node.children_ids.iter().rev() {
                stack.push(child_id);
            }
        }

        Ok(())
    }

    // Structural operations

    fn reindex_children(&mut self, parent_id: NodeId, from: usize) {
        let children: SmallVec<[NodeId; 8]> = self.nodes[parent_id as usize].children_ids[from..]
            .iter()
            .copied()
            .collect();
        for (offset, child_id) in children.into_iter().enumerate() {
            self.nodes[child_id as usize].sibling_index = from + offset;
        }
    }

    /// Remove the node from its parent. No-op for rootless nodes.
    ///
    /// The node keeps its own value and children.
    pub fn detach(&mut self, node_id: NodeId) -> Result<()> {
        let node = self.get(node_id)?;
        let Some(parent_id) = node.parent_id else {
            return Ok(());
        };
        let index = node.sibling_index;

        self.nodes[parent_id as usize].children_ids.remove(index);
        self.reindex_children(parent_id, index);

        let node = &mut self.nodes[node_id as usize];
        node.parent_id = None;
        node.sibling_index = 0;

        tracing::trace!(node = node_id, parent = parent_id, index, "detached node");
        Ok(())
    }

    /// Insert `child` into `parent` at `index`, detaching it from any
    /// previous parent first.
    ///
    /// `index` is a position in the parent's current child list. When the
    /// child already sits in the same parent before `index`, it lands in the
    /// gap that `index` named.
    pub fn insert_child(&mut self, parent_id: NodeId, index: usize, child_id: NodeId) -> Result<()> {
        let parent = self.get(parent_id)?;
        if !parent.is_container() {
            return Err(DomError::NotAContainer(parent_id));
        }
        let len = parent.children_ids.len();
        if index > len {
            return Err(DomError::IndexOutOfBounds { index, len });
        }
        let child = self.get(child_id)?;
        if self.is_ancestor_or_self(child_id, parent_id) {
            return Err(DomError::HierarchyCycle {
                parent: parent_id,
                child: child_id,
            });
        }

        let mut index = index;
        if child.parent_id == Some(parent_id) && child.sibling_index < index {
            index -= 1;
        }
        self.detach(child_id)?;

        self.nodes[parent_id as usize]
            .children_ids
            .insert(index, child_id);
        self.nodes[child_id as usize].parent_id = Some(parent_id);
        self.reindex_children(parent_id, index);

        tracing::trace!(node = child_id, parent = parent_id, index, "inserted node");
        Ok(())
    }

    /// Insert `child` as the last child of `parent`
    pub fn append_child(&mut self, parent_id: NodeId, child_id: NodeId) -> Result<()> {
        let len = self.get(parent_id)?.children_ids.len();
        self.insert_child(parent_id, len, child_id)
    }

    /// Put `new_id` where `old_id` is; `old_id` becomes rootless.
    ///
    /// Fails if `old_id` has no parent.
    pub fn replace_with(&mut self, old_id: NodeId, new_id: NodeId) -> Result<()> {
        let parent_id = self
            .get(old_id)?
            .parent_id
            .ok_or(DomError::NoParent(old_id))?;
        self.get(new_id)?;
        if old_id == new_id {
            return Ok(());
        }
        if self.is_ancestor_or_self(new_id, parent_id) {
            return Err(DomError::HierarchyCycle {
                parent: parent_id,
                child: new_id,
            });
        }

        // may shift old's position when both share the parent
        self.detach(new_id)?;
        let index = self.nodes[old_id as usize].sibling_index;

        self.nodes[parent_id as usize].children_ids[index] = new_id;
        let new_node = &mut self.nodes[new_id as usize];
        new_node.parent_id = Some(parent_id);
        new_node.sibling_index = index;
        let old_node = &mut self.nodes[old_id as usize];
        old_node.parent_id = None;
        old_node.sibling_index = 0;

        tracing::trace!(old = old_id, new = new_id, parent = parent_id, index, "replaced node");
        Ok(())
    }

    /// Split a text node at a char offset.
    ///
    /// This node keeps `value[..offset]`; a new node of the same type holds
    /// `value[offset..]` and, if this node has a parent, is inserted right
    /// after it. Returns the new node.
    pub fn split_text(&mut self, node_id: NodeId, offset: usize) -> Result<NodeId> {
        let node = self.get(node_id)?;
        if !node.node_type.is_text() {
            return Err(DomError::InvalidNodeType {
                expected: "text".to_string(),
                actual: node.node_type.to_string(),
            });
        }
        let len = text::char_len(&node.node_value);
        let out_of_bounds = DomError::SplitOffsetOutOfBounds { offset, len };
        if offset >= len {
            return Err(out_of_bounds);
        }
        let at = text::byte_offset(&node.node_value, offset).ok_or(out_of_bounds)?;
        let node_type = node.node_type;
        let parent_id = node.parent_id;
        let sibling_index = node.sibling_index;

        let tail = self.nodes[node_id as usize].node_value.split_off(at);
        let tail_id = self.create_node(node_type, tail);
        if let Some(parent_id) = parent_id {
            self.insert_child(parent_id, sibling_index + 1, tail_id)?;
        }

        tracing::trace!(node = node_id, tail = tail_id, offset, "split text node");
        Ok(tail_id)
    }

    /// Deep copy of a node and its subtree. The copy is rootless.
    pub fn deep_clone(&mut self, node_id: NodeId) -> Result<NodeId> {
        self.get(node_id)?;
        let order: Vec<NodeId> = self.descendants(node_id).collect();
        let mut copies: AHashMap<NodeId, NodeId> = AHashMap::with_capacity(order.len());

        // Pre-order: every parent is copied before its children
        for source_id in order {
            let source = &self.nodes[source_id as usize];
            let source_parent = source.parent_id;
            let mut copy = source.clone();
            let copy_id = self.next_id();
            copy.node_id = copy_id;
            copy.parent_id = None;
            copy.sibling_index = 0;
            copy.children_ids.clear();
            self.nodes.push(copy);
            copies.insert(source_id, copy_id);

            if source_id == node_id {
                continue;
            }
            let Some(copy_parent) = source_parent.and_then(|p| copies.get(&p).copied()) else {
                continue;
            };
            let siblings = &mut self.nodes[copy_parent as usize].children_ids;
            siblings.push(copy_id);
            let index = siblings.len() - 1;
            let copy = &mut self.nodes[copy_id as usize];
            copy.parent_id = Some(copy_parent);
            copy.sibling_index = index;
        }

        let clone_id = copies
            .get(&node_id)
            .copied()
            .ok_or(DomError::NodeNotFound(node_id))?;
        tracing::trace!(node = node_id, clone = clone_id, nodes = copies.len(), "cloned subtree");
        Ok(clone_id)
    }

    // Values

    /// Raw value of the node, including all original whitespace
    pub fn core_value(&self, node_id: NodeId) -> Result<&str> {
        Ok(&self.get(node_id)?.node_value)
    }

    /// Replace the raw value of a leaf
    pub fn set_value(&mut self, node_id: NodeId, value: impl Into<String>) -> Result<()> {
        let node = self.get_mut(node_id)?;
        if node.is_container() {
            return Err(DomError::InvalidNodeType {
                expected: "leaf".to_string(),
                actual: node.node_type.to_string(),
            });
        }
        node.node_value = value.into();
        Ok(())
    }

    /// Set an attribute on an element
    pub fn set_attr(
        &mut self,
        node_id: NodeId,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Result<()> {
        let node = self.get_mut(node_id)?;
        if !node.is_element() {
            return Err(DomError::InvalidNodeType {
                expected: "element".to_string(),
                actual: node.node_type.to_string(),
            });
        }
        node.attributes.insert(name.into(), value.into());
        Ok(())
    }

    /// Unnormalised text: a leaf's raw value, or the concatenated text of
    /// every text descendant of a container
    pub fn whole_text(&self, node_id: NodeId) -> Result<String> {
        let node = self.get(node_id)?;
        if node.is_leaf() {
            return Ok(node.node_value.clone());
        }

        let mut text = String::new();
        self.traverse_df(node_id, |node| {
            if node.node_type.is_text() {
                text.push_str(&node.node_value);
            }
            Ok(())
        })?;
        Ok(text)
    }

    /// Display text: whitespace normalised and trimmed
    pub fn text(&self, node_id: NodeId) -> Result<String> {
        Ok(text::normalise_trimmed(&self.whole_text(node_id)?))
    }

    /// True if the node's value is empty or whitespace only
    pub fn is_blank(&self, node_id: NodeId) -> Result<bool> {
        Ok(text::is_blank(&self.get(node_id)?.node_value))
    }

    /// Clear arena (reuse allocation)
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root_id = None;
    }
}

impl Default for DomArena {
    fn default() -> Self {
        Self::new()
    }
}

/// Pre-order (document order) walk from a start node
pub struct Descendants<'a> {
    arena: &'a DomArena,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.stack.pop()?;
        if let Ok(node) = self.arena.get(current) {
            self.stack.extend(node.children_ids.iter().rev().copied());
        }
        Some(current)
    }
}
