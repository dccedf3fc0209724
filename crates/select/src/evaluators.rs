//! Built-in evaluators
//!
//! Value-based evaluators read `node_value`, which is the raw text for
//! leaves and empty for containers. Text comparisons are whitespace
//! normalised and case-folded on both sides.

use crate::evaluator::Evaluator;
use dom::text::fold;
use dom::{DomArena, DomNode, NodeType};
use regex::Regex;
use std::fmt;

/// Node categories a type-match can ask for. Broader classes include the
/// narrower ones (`LeafNode` includes `Text`, `Text` includes `Cdata`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeClass {
    Node,
    LeafNode,
    Text,
    Comment,
    Data,
    Cdata,
}

impl NodeClass {
    pub fn includes(self, node_type: NodeType) -> bool {
        match self {
            NodeClass::Node => true,
            NodeClass::LeafNode => node_type.is_leaf(),
            NodeClass::Text => node_type.is_text(),
            NodeClass::Comment => node_type == NodeType::Comment,
            NodeClass::Data => node_type == NodeType::Data,
            NodeClass::Cdata => node_type == NodeType::CdataSection,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            NodeClass::Node => "node",
            NodeClass::LeafNode => "leafnode",
            NodeClass::Text => "text",
            NodeClass::Comment => "comment",
            NodeClass::Data => "data",
            NodeClass::Cdata => "cdata",
        }
    }

    /// Look up a class by its selector name, case-insensitively
    pub fn from_name(name: &str) -> Option<Self> {
        [
            NodeClass::Node,
            NodeClass::LeafNode,
            NodeClass::Text,
            NodeClass::Comment,
            NodeClass::Data,
            NodeClass::Cdata,
        ]
        .into_iter()
        .find(|class| class.name().eq_ignore_ascii_case(name))
    }
}

/// Matches nodes whose runtime type belongs to a class
#[derive(Debug, Clone)]
pub struct NodeTypeMatch {
    class: NodeClass,
}

impl NodeTypeMatch {
    pub fn new(class: NodeClass) -> Self {
        Self { class }
    }

    fn evaluate(&self, node: &DomNode) -> bool {
        self.class.includes(node.node_type)
    }
}

impl Evaluator for NodeTypeMatch {
    fn matches_element(&self, _arena: &DomArena, _root: &DomNode, element: &DomNode) -> bool {
        self.evaluate(element)
    }

    fn matches_leaf(&self, _arena: &DomArena, _root: &DomNode, leaf: &DomNode) -> bool {
        self.evaluate(leaf)
    }

    fn cost(&self) -> u32 {
        1
    }

    fn wants_leaf_nodes(&self) -> bool {
        true
    }
}

impl fmt::Display for NodeTypeMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "::{}", self.class.name())
    }
}

/// Node value contains the search text. Applies to any node.
#[derive(Debug, Clone)]
pub struct ContainsValue {
    search_text: String,
}

impl ContainsValue {
    pub fn new(search_text: &str) -> Self {
        Self {
            search_text: fold(search_text),
        }
    }

    fn evaluate(&self, node: &DomNode) -> bool {
        fold(&node.node_value).contains(&self.search_text)
    }
}

impl Evaluator for ContainsValue {
    fn matches_element(&self, _arena: &DomArena, _root: &DomNode, element: &DomNode) -> bool {
        self.evaluate(element)
    }

    fn matches_leaf(&self, _arena: &DomArena, _root: &DomNode, leaf: &DomNode) -> bool {
        self.evaluate(leaf)
    }

    fn cost(&self) -> u32 {
        10
    }

    fn wants_leaf_nodes(&self) -> bool {
        true
    }
}

impl fmt::Display for ContainsValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":contains({})", self.search_text)
    }
}

/// Element text (all descendant text, normalised) contains the search text
#[derive(Debug, Clone)]
pub struct ContainsText {
    search_text: String,
}

impl ContainsText {
    pub fn new(search_text: &str) -> Self {
        Self {
            search_text: fold(search_text),
        }
    }
}

impl Evaluator for ContainsText {
    fn matches_element(&self, arena: &DomArena, _root: &DomNode, element: &DomNode) -> bool {
        arena
            .text(element.node_id)
            .map(|text| text.to_lowercase().contains(&self.search_text))
            .unwrap_or(false)
    }

    fn cost(&self) -> u32 {
        6
    }
}

impl fmt::Display for ContainsText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":containsText({})", self.search_text)
    }
}

/// Matches nodes with no value or only whitespace
#[derive(Debug, Clone, Copy, Default)]
pub struct BlankValue;

impl BlankValue {
    fn evaluate(node: &DomNode) -> bool {
        dom::text::is_blank(&node.node_value)
    }
}

impl Evaluator for BlankValue {
    fn matches_element(&self, _arena: &DomArena, _root: &DomNode, element: &DomNode) -> bool {
        Self::evaluate(element)
    }

    fn matches_leaf(&self, _arena: &DomArena, _root: &DomNode, leaf: &DomNode) -> bool {
        Self::evaluate(leaf)
    }

    fn cost(&self) -> u32 {
        4
    }

    fn wants_leaf_nodes(&self) -> bool {
        true
    }
}

impl fmt::Display for BlankValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(":blank")
    }
}

/// Node value has a regex match anywhere (search, not full match).
///
/// The pattern is compiled up front; a bad pattern fails construction and
/// never reaches evaluation.
#[derive(Debug, Clone)]
pub struct MatchesValue {
    pattern: Regex,
}

impl MatchesValue {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    pub fn from_regex(pattern: Regex) -> Self {
        Self { pattern }
    }

    fn evaluate(&self, node: &DomNode) -> bool {
        self.pattern.is_match(&node.node_value)
    }
}

impl Evaluator for MatchesValue {
    fn matches_element(&self, _arena: &DomArena, _root: &DomNode, element: &DomNode) -> bool {
        self.evaluate(element)
    }

    fn matches_leaf(&self, _arena: &DomArena, _root: &DomNode, leaf: &DomNode) -> bool {
        self.evaluate(leaf)
    }

    fn cost(&self) -> u32 {
        8
    }

    fn wants_leaf_nodes(&self) -> bool {
        true
    }
}

impl fmt::Display for MatchesValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":matches({})", self.pattern)
    }
}

/// Element text has a regex match anywhere
#[derive(Debug, Clone)]
pub struct MatchesText {
    pattern: Regex,
}

impl MatchesText {
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self::from_regex(Regex::new(pattern)?))
    }

    pub fn from_regex(pattern: Regex) -> Self {
        Self { pattern }
    }
}

impl Evaluator for MatchesText {
    fn matches_element(&self, arena: &DomArena, _root: &DomNode, element: &DomNode) -> bool {
        arena
            .text(element.node_id)
            .map(|text| self.pattern.is_match(&text))
            .unwrap_or(false)
    }

    fn cost(&self) -> u32 {
        10
    }
}

impl fmt::Display for MatchesText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, ":matchesText({})", self.pattern)
    }
}

/// Element tag name, ASCII case-insensitive
#[derive(Debug, Clone)]
pub struct Tag {
    name: String,
}

impl Tag {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.trim().to_ascii_lowercase(),
        }
    }
}

impl Evaluator for Tag {
    fn matches_element(&self, _arena: &DomArena, _root: &DomNode, element: &DomNode) -> bool {
        element
            .tag_name()
            .is_some_and(|tag| tag.eq_ignore_ascii_case(&self.name))
    }

    fn cost(&self) -> u32 {
        1
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

/// Element has the named attribute
#[derive(Debug, Clone)]
pub struct Attribute {
    key: String,
}

impl Attribute {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.trim().to_ascii_lowercase(),
        }
    }
}

impl Evaluator for Attribute {
    fn matches_element(&self, _arena: &DomArena, _root: &DomNode, element: &DomNode) -> bool {
        element
            .attributes
            .keys()
            .any(|key| key.eq_ignore_ascii_case(&self.key))
    }

    fn cost(&self) -> u32 {
        2
    }
}

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.key)
    }
}
