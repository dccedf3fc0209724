//! Structural queries over a `dom` tree
//!
//! Evaluators are predicate objects with a static cost and two entry
//! points, one per node category. The collector walks a subtree and hands
//! each node to the matching entry point; results come back as [`Nodes`],
//! a list whose removal and replacement methods also edit the tree.
//!
//! ```text
//! Evaluator (And/Or/Not of built-ins) → collector::select → Nodes
//!                                                            ↓
//!                                  remove / set / clear  → DomArena
//!                                  deselect              → list only
//! ```
//!
//! Compiling selector text into evaluators is left to the caller.

pub mod collector;
pub mod combinator;
pub mod evaluator;
pub mod evaluators;
pub mod nodes;

pub use collector::{select, select_first};
pub use combinator::{And, Not, Or};
pub use evaluator::Evaluator;
pub use evaluators::*;
pub use nodes::Nodes;
