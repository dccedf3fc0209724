//! In-memory DOM tree
//!
//! Arena-backed node storage with the structural operations a query layer
//! needs: attach, detach, replace, split and deep clone, with sibling
//! indexes kept in step with every edit.
//!
//! ## Core Design
//!
//! ```text
//! JSON snapshot / tree builder → DomArena (owned) → NodeId (u32) handles
//!                                      ↓
//!                      detach / insert / replace / split / clone
//! ```
//!
//! A tree is meant to be mutated by one thread of control at a time.
//! `DomArena` does no locking of its own; wrap it in a lock if it has to be
//! shared.

pub mod arena;
pub mod builder;
pub mod error;
pub mod text;
pub mod types;

pub use arena::{Descendants, DomArena};
pub use builder::{BuilderConfig, DomBuilder};
pub use error::{DomError, Result};
pub use types::*;
