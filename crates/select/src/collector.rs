//! Collector - run an evaluator over a subtree
//!
//! Walks `root` and its descendants in document order. Containers are
//! offered to `matches_element`. Leaves are skipped entirely unless the
//! evaluator asks for them, which keeps element-only queries from paying
//! for every text node in the document.

use crate::evaluator::Evaluator;
use crate::nodes::Nodes;
use dom::{DomArena, NodeId, Result};

fn find_matches<'a, E>(
    arena: &'a DomArena,
    root_id: NodeId,
    evaluator: &'a E,
) -> Result<impl Iterator<Item = NodeId> + 'a>
where
    E: Evaluator + ?Sized,
{
    let root = arena.get(root_id)?;
    let wants_leaves = evaluator.wants_leaf_nodes();

    Ok(arena.descendants(root_id).filter(move |&id| {
        let Ok(node) = arena.get(id) else {
            return false;
        };
        if node.is_container() {
            evaluator.matches_element(arena, root, node)
        } else {
            wants_leaves && evaluator.matches_leaf(arena, root, node)
        }
    }))
}

/// All nodes under `root` (inclusive) that match, in document order
pub fn select<E>(arena: &DomArena, root: NodeId, evaluator: &E) -> Result<Nodes>
where
    E: Evaluator + ?Sized,
{
    let nodes: Nodes = find_matches(arena, root, evaluator)?.collect();
    tracing::debug!(selector = %evaluator, root, matches = nodes.len(), "selected nodes");
    Ok(nodes)
}

/// First match under `root` (inclusive), stopping as soon as one is found
pub fn select_first<E>(arena: &DomArena, root: NodeId, evaluator: &E) -> Result<Option<NodeId>>
where
    E: Evaluator + ?Sized,
{
    Ok(find_matches(arena, root, evaluator)?.next())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combinator::And;
    use crate::evaluators::{BlankValue, ContainsText, ContainsValue, NodeClass, NodeTypeMatch, Tag};
    use dom::{DomBuilder, DomNode};
    use std::cell::Cell;
    use std::fmt;

    fn blank_leaves() -> And {
        And::new(vec![
            Box::new(NodeTypeMatch::new(NodeClass::LeafNode)),
            Box::new(BlankValue),
        ])
    }

    #[test]
    fn test_blank_leaves_then_remove() {
        let mut arena = DomArena::new();
        let div = arena.create_element("div");
        let leaves: Vec<NodeId> = ["a", "", "  "]
            .iter()
            .map(|v| arena.create_text(*v))
            .collect();
        for &leaf in &leaves {
            arena.append_child(div, leaf).unwrap();
        }

        let mut found = select(&arena, div, &blank_leaves()).unwrap();
        assert_eq!(found.as_slice(), &[leaves[1], leaves[2]]);

        found.clear(&mut arena).unwrap();
        assert_eq!(arena.child_ids(div).unwrap(), &[leaves[0]]);
        assert_eq!(arena.core_value(leaves[0]).unwrap(), "a");
    }

    #[test]
    fn test_deselect_then_select_again() {
        let mut arena = DomArena::new();
        let div = arena.create_element("div");
        for v in ["x", " "] {
            let t = arena.create_text(v);
            arena.append_child(div, t).unwrap();
        }

        let mut found = select(&arena, div, &blank_leaves()).unwrap();
        let blank = found.deselect(0).unwrap();
        assert!(found.is_empty());

        let again = select(&arena, div, &blank_leaves()).unwrap();
        assert_eq!(again.as_slice(), &[blank]);
    }

    #[test]
    fn test_root_is_included() {
        let snapshot = serde_json::json!({
            "root": {
                "nodeType": 1, "nodeName": "section",
                "children": [
                    { "nodeType": 1, "nodeName": "p", "children": [{ "nodeType": 3, "nodeValue": "One" }] },
                    { "nodeType": 1, "nodeName": "section" }
                ]
            }
        });
        let arena = DomBuilder::new().build(&snapshot).unwrap();
        let root = arena.root_id().unwrap();

        let sections = select(&arena, root, &Tag::new("section")).unwrap();
        assert_eq!(sections.len(), 2);
        assert_eq!(sections.first(), Some(root));

        let p = select_first(&arena, root, &Tag::new("p")).unwrap();
        assert_eq!(p, Some(arena.child_ids(root).unwrap()[0]));
        assert_eq!(select_first(&arena, root, &Tag::new("table")).unwrap(), None);
    }

    #[test]
    fn test_element_only_text_search_vs_leaf_search() {
        let snapshot = serde_json::json!({
            "root": {
                "nodeType": 9,
                "children": [{
                    "nodeType": 1, "nodeName": "p",
                    "children": [{ "nodeType": 3, "nodeValue": "Hello   World" }]
                }]
            }
        });
        let arena = DomBuilder::new().build(&snapshot).unwrap();
        let root = arena.root_id().unwrap();
        let p = arena.child_ids(root).unwrap()[0];
        let text = arena.child_ids(p).unwrap()[0];

        // document and p both contain the text
        let by_text = select(&arena, root, &ContainsText::new("hello world")).unwrap();
        assert_eq!(by_text.as_slice(), &[root, p]);

        let by_value = select(&arena, root, &ContainsValue::new("  HELLO  ")).unwrap();
        assert_eq!(by_value.as_slice(), &[text]);
    }

    /// Counts leaf calls to prove the traversal skips them
    #[derive(Debug, Default)]
    struct LeafCounter {
        wants: bool,
        calls: Cell<usize>,
    }

    impl fmt::Display for LeafCounter {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(":counter")
        }
    }

    impl Evaluator for LeafCounter {
        fn matches_element(&self, _: &DomArena, _: &DomNode, _: &DomNode) -> bool {
            false
        }

        fn matches_leaf(&self, _: &DomArena, _: &DomNode, _: &DomNode) -> bool {
            self.calls.set(self.calls.get() + 1);
            true
        }

        fn wants_leaf_nodes(&self) -> bool {
            self.wants
        }
    }

    #[test]
    fn test_leaves_only_offered_on_request() {
        let mut arena = DomArena::new();
        let div = arena.create_element("div");
        for v in ["a", "b", "c"] {
            let t = arena.create_text(v);
            arena.append_child(div, t).unwrap();
        }

        let skipping = LeafCounter::default();
        assert!(select(&arena, div, &skipping).unwrap().is_empty());
        assert_eq!(skipping.calls.get(), 0);

        let wanting = LeafCounter {
            wants: true,
            ..Default::default()
        };
        assert_eq!(select(&arena, div, &wanting).unwrap().len(), 3);
        assert_eq!(wanting.calls.get(), 3);
    }

    #[test]
    fn test_selection_is_logged_with_selector() {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_test_writer()
            .try_init();

        let mut arena = DomArena::new();
        let div = arena.create_element("div");
        let text = arena.create_text("hello");
        arena.append_child(div, text).unwrap();

        let eval = And::new(vec![
            Box::new(ContainsValue::new("HELLO")),
            Box::new(NodeTypeMatch::new(NodeClass::Text)),
        ]);
        assert_eq!(eval.to_string(), "::text:contains(hello)");
        assert_eq!(select(&arena, div, &eval).unwrap().as_slice(), &[text]);
    }

    #[test]
    fn test_unknown_root() {
        let arena = DomArena::new();
        assert!(select(&arena, 3, &BlankValue).is_err());
    }

    #[test]
    fn test_boxed_evaluator() {
        let mut arena = DomArena::new();
        let div = arena.create_element("div");
        let boxed: Box<dyn Evaluator> = Box::new(Tag::new("div"));
        assert_eq!(select(&arena, div, &boxed).unwrap().len(), 1);
        assert_eq!(select(&arena, div, boxed.as_ref()).unwrap().len(), 1);
    }
}
