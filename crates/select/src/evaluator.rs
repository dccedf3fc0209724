//! Evaluator trait - the predicate protocol queries are built from
//!
//! Containers and leaves expose different things as their "value" (tag and
//! attributes vs. raw text), and most predicates only care about elements.
//! So there are two entry points. The collector only calls
//! [`Evaluator::matches_leaf`] for evaluators that opt in through
//! [`Evaluator::wants_leaf_nodes`]; everything else never sees a leaf.

use dom::{DomArena, DomNode};
use std::fmt;

/// A node predicate.
///
/// `root` is the node the query was launched from, passed through for
/// context-relative predicates. `Display` renders the selector fragment the
/// evaluator stands for, used in logs and errors.
pub trait Evaluator: fmt::Debug + fmt::Display {
    /// Test a container node (element, document or fragment)
    fn matches_element(&self, arena: &DomArena, root: &DomNode, element: &DomNode) -> bool;

    /// Test a leaf node. Element-only evaluators keep the default.
    fn matches_leaf(&self, arena: &DomArena, root: &DomNode, leaf: &DomNode) -> bool {
        let _ = (arena, root, leaf);
        false
    }

    /// Static relative cost, lower runs first in composites.
    ///
    /// Must not depend on the node being tested, so composites can sort once.
    fn cost(&self) -> u32 {
        5
    }

    /// Whether the traversal should offer leaf nodes to this evaluator
    fn wants_leaf_nodes(&self) -> bool {
        false
    }

    /// Dispatch on the node's category
    fn matches(&self, arena: &DomArena, root: &DomNode, node: &DomNode) -> bool {
        if node.is_container() {
            self.matches_element(arena, root, node)
        } else {
            self.matches_leaf(arena, root, node)
        }
    }
}

impl<E: Evaluator + ?Sized> Evaluator for Box<E> {
    fn matches_element(&self, arena: &DomArena, root: &DomNode, element: &DomNode) -> bool {
        (**self).matches_element(arena, root, element)
    }

    fn matches_leaf(&self, arena: &DomArena, root: &DomNode, leaf: &DomNode) -> bool {
        (**self).matches_leaf(arena, root, leaf)
    }

    fn cost(&self) -> u32 {
        (**self).cost()
    }

    fn wants_leaf_nodes(&self) -> bool {
        (**self).wants_leaf_nodes()
    }
}
