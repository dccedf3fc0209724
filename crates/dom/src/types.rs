//! Core node type definitions
//!
//! Key design principles:
//! 1. Use u32 for indices (4 bytes vs 8 bytes pointer)
//! 2. Parent is a plain index, never an owner
//! 3. Use SmallVec for child lists (most nodes have few children)

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::collections::HashMap;
use std::fmt;

/// Node identifier (index into arena)
/// u32 allows 4 billion nodes, enough for any document
pub type NodeId = u32;

/// Node type, numbered as in the DOM standard
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum NodeType {
    Element = 1,
    Text = 3,
    CdataSection = 4,
    ProcessingInstruction = 7,
    Comment = 8,
    Document = 9,
    DocumentType = 10,
    DocumentFragment = 11,
    /// Script/style payload. Not a DOM constant, kept out of the DOM range.
    Data = 64,
}

impl NodeType {
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(NodeType::Element),
            3 => Some(NodeType::Text),
            4 => Some(NodeType::CdataSection),
            7 => Some(NodeType::ProcessingInstruction),
            8 => Some(NodeType::Comment),
            9 => Some(NodeType::Document),
            10 => Some(NodeType::DocumentType),
            11 => Some(NodeType::DocumentFragment),
            64 => Some(NodeType::Data),
            _ => None,
        }
    }

    /// Containers own children. Everything else is a leaf.
    pub fn is_container(self) -> bool {
        matches!(
            self,
            NodeType::Element | NodeType::Document | NodeType::DocumentFragment
        )
    }

    pub fn is_leaf(self) -> bool {
        !self.is_container()
    }

    /// Leaves whose value is character data that can be split.
    pub fn is_text(self) -> bool {
        matches!(self, NodeType::Text | NodeType::CdataSection)
    }

    /// Name reported by `node_name` for non-element nodes
    pub fn default_name(self) -> &'static str {
        match self {
            NodeType::Element => "",
            NodeType::Text => "#text",
            NodeType::CdataSection => "#cdata",
            NodeType::ProcessingInstruction => "#declaration",
            NodeType::Comment => "#comment",
            NodeType::Document => "#document",
            NodeType::DocumentType => "#doctype",
            NodeType::DocumentFragment => "#document-fragment",
            NodeType::Data => "#data",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NodeType::Element => "element",
            NodeType::Text => "text",
            NodeType::CdataSection => "cdata",
            NodeType::ProcessingInstruction => "processing-instruction",
            NodeType::Comment => "comment",
            NodeType::Document => "document",
            NodeType::DocumentType => "doctype",
            NodeType::DocumentFragment => "document-fragment",
            NodeType::Data => "data",
        };
        f.write_str(name)
    }
}

/// The main tree node structure
///
/// Design philosophy:
/// - Small fixed-size fields first (better packing)
/// - Use indices instead of pointers
/// - `parent_id` is navigation only; ownership is the parent's `children_ids`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DomNode {
    pub node_id: NodeId,
    pub node_type: NodeType,

    // Navigation indices
    pub parent_id: Option<NodeId>,
    /// Position in the parent's `children_ids`. Zero for rootless nodes.
    pub sibling_index: usize,
    pub children_ids: SmallVec<[NodeId; 4]>,

    pub node_name: String,
    /// Raw payload for leaves, empty for containers
    pub node_value: String,
    pub attributes: HashMap<String, String>,
}

impl DomNode {
    /// Create a new detached node
    pub fn new(node_id: NodeId, node_type: NodeType, node_name: String) -> Self {
        Self {
            node_id,
            node_type,
            parent_id: None,
            sibling_index: 0,
            children_ids: SmallVec::new(),
            node_name,
            node_value: String::new(),
            attributes: HashMap::new(),
        }
    }

    /// Get tag name for element nodes
    pub fn tag_name(&self) -> Option<&str> {
        if self.node_type == NodeType::Element {
            Some(&self.node_name)
        } else {
            None
        }
    }

    pub fn is_element(&self) -> bool {
        self.node_type == NodeType::Element
    }

    pub fn is_container(&self) -> bool {
        self.node_type.is_container()
    }

    pub fn is_leaf(&self) -> bool {
        self.node_type.is_leaf()
    }

    pub fn is_text(&self) -> bool {
        self.node_type.is_text()
    }

    pub fn has_parent(&self) -> bool {
        self.parent_id.is_some()
    }

    /// Raw value, unnormalised
    pub fn node_value(&self) -> &str {
        &self.node_value
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(|s| s.as_str())
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attributes.contains_key(name)
    }

    /// Compare everything except identity and position
    pub fn content_eq(&self, other: &DomNode) -> bool {
        self.node_type == other.node_type
            && self.node_name == other.node_name
            && self.node_value == other.node_value
            && self.attributes == other.attributes
    }
}
