//! Composite evaluators
//!
//! Sub-evaluators are sorted by ascending cost once, at construction, so
//! cheap predicates get the first chance to short-circuit.

use crate::evaluator::Evaluator;
use dom::{DomArena, DomNode};
use std::fmt;

type Boxed = Box<dyn Evaluator>;

fn sort_by_cost(mut evaluators: Vec<Boxed>) -> Vec<Boxed> {
    // stable: equal costs keep the caller's order
    evaluators.sort_by_key(|e| e.cost());
    evaluators
}

fn total_cost(evaluators: &[Boxed]) -> u32 {
    evaluators.iter().map(|e| e.cost()).sum()
}

fn write_joined(f: &mut fmt::Formatter<'_>, evaluators: &[Boxed], sep: &str) -> fmt::Result {
    for (i, e) in evaluators.iter().enumerate() {
        if i > 0 {
            f.write_str(sep)?;
        }
        write!(f, "{}", e)?;
    }
    Ok(())
}

/// Matches when every sub-evaluator matches
#[derive(Debug)]
pub struct And {
    evaluators: Vec<Boxed>,
    cost: u32,
    wants_leaf_nodes: bool,
}

impl And {
    pub fn new(evaluators: Vec<Boxed>) -> Self {
        let evaluators = sort_by_cost(evaluators);
        Self {
            cost: total_cost(&evaluators),
            wants_leaf_nodes: evaluators.iter().any(|e| e.wants_leaf_nodes()),
            evaluators,
        }
    }

    /// Sub-evaluators in evaluation order
    pub fn evaluators(&self) -> &[Boxed] {
        &self.evaluators
    }
}

impl Evaluator for And {
    fn matches_element(&self, arena: &DomArena, root: &DomNode, element: &DomNode) -> bool {
        self.evaluators
            .iter()
            .all(|e| e.matches_element(arena, root, element))
    }

    fn matches_leaf(&self, arena: &DomArena, root: &DomNode, leaf: &DomNode) -> bool {
        self.evaluators
            .iter()
            .all(|e| e.matches_leaf(arena, root, leaf))
    }

    fn cost(&self) -> u32 {
        self.cost
    }

    fn wants_leaf_nodes(&self) -> bool {
        self.wants_leaf_nodes
    }
}

impl fmt::Display for And {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.evaluators, "")
    }
}

/// Matches when any sub-evaluator matches
#[derive(Debug)]
pub struct Or {
    evaluators: Vec<Boxed>,
    cost: u32,
    wants_leaf_nodes: bool,
}

impl Or {
    pub fn new(evaluators: Vec<Boxed>) -> Self {
        let evaluators = sort_by_cost(evaluators);
        Self {
            cost: total_cost(&evaluators),
            wants_leaf_nodes: evaluators.iter().any(|e| e.wants_leaf_nodes()),
            evaluators,
        }
    }

    pub fn evaluators(&self) -> &[Boxed] {
        &self.evaluators
    }
}

impl Evaluator for Or {
    fn matches_element(&self, arena: &DomArena, root: &DomNode, element: &DomNode) -> bool {
        self.evaluators
            .iter()
            .any(|e| e.matches_element(arena, root, element))
    }

    fn matches_leaf(&self, arena: &DomArena, root: &DomNode, leaf: &DomNode) -> bool {
        self.evaluators
            .iter()
            .any(|e| e.matches_leaf(arena, root, leaf))
    }

    fn cost(&self) -> u32 {
        self.cost
    }

    fn wants_leaf_nodes(&self) -> bool {
        self.wants_leaf_nodes
    }
}

impl fmt::Display for Or {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_joined(f, &self.evaluators, ", ")
    }
}

/// Negates an evaluator
#[derive(Debug)]
pub struct Not {
    inner: Boxed,
}

impl Not {
    pub fn new(inner: Boxed) -> Self {
        Self { inner }
    }
}

impl Evaluator for Not {
    fn matches_element(&self, arena: &DomArena, root: &DomNode, element: &DomNode) -> bool {
        !self.inner.matches_element(arena, root, element)
    }

    fn matches_leaf(&self, arena: &DomArena, root: &DomNode, leaf: &DomNode) -> bool {
        !self.inner.matches_leaf(arena, root, leaf)
    }

    fn cost(&self) -> u32 {
        1 + self.inner.cost()
    }

    fn wants_leaf_nodes(&self) -> bool {
        self.inner.wants_leaf_nodes()
    }
}

impl fmt::Display for Not {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":not({})", self.inner)
    }
}
