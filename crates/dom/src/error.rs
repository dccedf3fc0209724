//! Error types for DOM operations
//!
//! Simple, flat error hierarchy. Every variant is a precondition the caller
//! violated or a malformed snapshot; nothing here is retryable.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DomError>;

#[derive(Debug, Error)]
pub enum DomError {
    #[error("Node not found: {0}")]
    NodeNotFound(u32),

    #[error("Invalid node type: expected {expected}, got {actual}")]
    InvalidNodeType { expected: String, actual: String },

    #[error("Node {0} has no parent")]
    NoParent(u32),

    #[error("Node {0} cannot hold children")]
    NotAContainer(u32),

    #[error("Cannot insert node {child} under its own descendant {parent}")]
    HierarchyCycle { parent: u32, child: u32 },

    #[error("Index {index} out of bounds for length {len}")]
    IndexOutOfBounds { index: usize, len: usize },

    #[error("Split offset {offset} out of bounds for text of length {len}")]
    SplitOffsetOutOfBounds { offset: usize, len: usize },

    #[error("Invalid snapshot: {0}")]
    InvalidSnapshot(String),

    #[error("Parse error: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("Maximum tree depth exceeded: {current} > {max}")]
    MaxDepthExceeded { current: usize, max: usize },
}
