//! DOM Builder - load a tree from a JSON snapshot
//!
//! Trees normally come from an HTML tree builder. This loader accepts the
//! already-structured JSON shape used by DevTools-style dumps, which is
//! handy for fixtures and for handing trees across process boundaries:
//!
//! ```json
//! {
//!   "root": {
//!     "nodeType": 9,
//!     "nodeName": "#document",
//!     "children": [{
//!       "nodeType": 1,
//!       "nodeName": "p",
//!       "attributes": ["class", "intro"],
//!       "children": [{ "nodeType": 3, "nodeValue": "Hello" }]
//!     }]
//!   }
//! }
//! ```

use crate::arena::DomArena;
use crate::error::{DomError, Result};
use crate::types::*;
use serde_json::Value;

/// Configuration for the snapshot loader
#[derive(Debug, Clone)]
pub struct BuilderConfig {
    pub initial_capacity: usize,
    /// Deepest nesting accepted before the snapshot is rejected
    pub max_depth: usize,
}

impl Default for BuilderConfig {
    fn default() -> Self {
        Self {
            initial_capacity: 1024,
            max_depth: 512,
        }
    }
}

/// Builds a `DomArena` from JSON snapshots
pub struct DomBuilder {
    config: BuilderConfig,
}

impl DomBuilder {
    pub fn new() -> Self {
        Self::with_config(BuilderConfig::default())
    }

    pub fn with_config(config: BuilderConfig) -> Self {
        Self { config }
    }

    /// Parse snapshot text and build an arena
    pub fn build_from_str(&self, snapshot: &str) -> Result<DomArena> {
        let value: Value = serde_json::from_str(snapshot)?;
        self.build(&value)
    }

    /// Build an arena from a snapshot value. The snapshot root becomes the
    /// arena root.
    pub fn build(&self, snapshot: &Value) -> Result<DomArena> {
        let root = snapshot
            .get("root")
            .ok_or_else(|| DomError::InvalidSnapshot("Missing 'root' in snapshot".to_string()))?;

        let mut arena = DomArena::with_capacity(self.config.initial_capacity);
        let root_id = self.parse_node(&mut arena, root, 0)?;
        arena.set_root(root_id)?;

        tracing::debug!(nodes = arena.len(), root = root_id, "built tree from snapshot");
        Ok(arena)
    }

    /// Recursively parse a snapshot node
    fn parse_node(&self, arena: &mut DomArena, raw: &Value, depth: usize) -> Result<NodeId> {
        if depth > self.config.max_depth {
            return Err(DomError::MaxDepthExceeded {
                current: depth,
                max: self.config.max_depth,
            });
        }

        let node_type_val = raw["nodeType"]
            .as_u64()
            .ok_or_else(|| DomError::InvalidSnapshot("Missing nodeType".to_string()))?;

        let node_type = u8::try_from(node_type_val)
            .ok()
            .and_then(NodeType::from_u8)
            .ok_or_else(|| DomError::InvalidNodeType {
                expected: "valid NodeType".to_string(),
                actual: format!("{}", node_type_val),
            })?;

        let node_name = raw["nodeName"].as_str().unwrap_or("").to_string();
        let mut node = DomNode::new(0, node_type, node_name);
        node.node_value = raw["nodeValue"].as_str().unwrap_or("").to_string();

        // Attributes come as a flat [name, value, name, value, ...] list
        if let Some(attrs) = raw["attributes"].as_array() {
            for pair in attrs.chunks_exact(2) {
                if let (Some(key), Some(value)) = (pair[0].as_str(), pair[1].as_str()) {
                    node.attributes.insert(key.to_string(), value.to_string());
                }
            }
        }

        let current_node_id = arena.add_node(node);

        if let Some(children) = raw["children"].as_array() {
            for child in children {
                let child_id = self.parse_node(arena, child, depth + 1)?;
                arena.append_child(current_node_id, child_id)?;
            }
        }

        Ok(current_node_id)
    }
}

impl Default for DomBuilder {
    fn default() -> Self {
        Self::new()
    }
}
