//! Node types and the arena that owns them.
//!
//! Nodes live in a `Graph` and refer to their children by `NodeId`.
//! There are no parent back-references: during a parse the open-element
//! stack is the only "current path", so no cyclic ownership exists.
//!
//! # Key Types
//!
//! - `Node`: one typed document element with attributes, behaviours,
//!   children and placeholder slots
//! - `Graph`: arena of nodes, forward edges only
//! - `Tree`: a graph plus its root container (the parse result)
//! - `Document`: root-level metadata, independent of any tree

mod document;
mod kind;
mod tree;

pub use document::Document;
pub use kind::NodeKind;
pub use tree::{NodeIter, Stats, Tree};

use std::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::{Attrs, AttrsExt, Bag, Enhancements};
use crate::behaviour::Behaviour;

// =============================================================================
// NodeId
// =============================================================================

/// Index of a node inside its `Graph`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Type alias for children collection.
pub type Children = SmallVec<[NodeId; 8]>;

// =============================================================================
// Node
// =============================================================================

/// A typed document element.
#[derive(Debug)]
pub struct Node {
    /// Tag the node was created from
    pub tag: CompactString,
    /// Node type
    pub kind: NodeKind,
    /// Plain attributes (cascade first, inline markup overriding)
    pub attrs: Attrs,
    /// Enhancement parameters
    pub enhancements: Enhancements,
    /// Attached behaviours, in declaration order
    pub behaviours: Vec<Box<dyn Behaviour>>,
    /// Child nodes
    pub children: Children,
    /// Filled placeholder slots (only for kinds that declare slots)
    pub placeholders: SmallVec<[(CompactString, NodeId); 2]>,
    /// Character data of text-flow nodes
    pub text: String,
    /// Created by the parser to group inline content, not present in markup
    pub implicit: bool,
}

impl Node {
    /// Create an empty node of the given kind
    pub fn new(tag: impl Into<CompactString>, kind: NodeKind) -> Self {
        Self {
            tag: tag.into(),
            kind,
            attrs: Attrs::new(),
            enhancements: Enhancements::new(),
            behaviours: Vec::new(),
            children: Children::new(),
            placeholders: SmallVec::new(),
            text: String::new(),
            implicit: false,
        }
    }

    /// Root container of a parse scope
    pub fn root() -> Self {
        Self::new("#root", NodeKind::Root)
    }

    /// Paragraph synthesized around adjacent inline content
    pub fn implicit_paragraph() -> Self {
        Self {
            implicit: true,
            ..Self::new("p", NodeKind::Paragraph)
        }
    }

    /// Text run created from bare character data
    pub fn text_run(tag: impl Into<CompactString>, content: impl Into<String>) -> Self {
        Self {
            text: content.into(),
            ..Self::new(tag, NodeKind::Text)
        }
    }

    /// Builder: add a preset attribute
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.set_attr(name, value);
        self
    }

    /// Duplicate type and attributes; never children, text, behaviours or slots
    pub fn copy(&self) -> Self {
        Self {
            attrs: self.attrs.clone(),
            enhancements: self.enhancements.clone(),
            ..Self::new(self.tag.clone(), self.kind)
        }
    }

    /// Apply a bag: attributes set over existing ones, enhancements merged
    pub fn apply_bag(&mut self, bag: &Bag) {
        self.attrs.merge_attrs(&bag.attrs);
        self.enhancements.merge(&bag.enhancements);
    }

    /// Get attribute value by name
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get_attr(name)
    }

    /// Get a filled placeholder slot
    pub fn placeholder(&self, name: &str) -> Option<NodeId> {
        self.placeholders
            .iter()
            .find(|(slot, _)| slot == name)
            .map(|(_, id)| *id)
    }

    /// Get the first behaviour with the given name
    pub fn behaviour(&self, name: &str) -> Option<&dyn Behaviour> {
        self.behaviours
            .iter()
            .find(|b| b.name() == name)
            .map(|b| b.as_ref())
    }

    #[inline]
    pub fn is_text_flow(&self) -> bool {
        self.kind.is_text_flow()
    }

    #[inline]
    pub fn supports_placeholder(&self, name: &str) -> bool {
        self.kind.supports_placeholder(name)
    }
}

// =============================================================================
// Graph
// =============================================================================

/// Arena owning every node created during a parse.
#[derive(Debug, Default)]
pub struct Graph {
    nodes: Vec<Node>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a node into the arena, unlinked
    pub fn add(&mut self, node: Node) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Append `child` to `parent`'s children
    pub fn append(&mut self, parent: NodeId, child: NodeId) {
        debug_assert_ne!(parent, child);
        self.nodes[parent.index()].children.push(child);
    }

    /// Fill (or replace) a placeholder slot of `owner`
    pub fn set_placeholder(&mut self, owner: NodeId, name: &str, node: NodeId) {
        let slots = &mut self.nodes[owner.index()].placeholders;
        match slots.iter_mut().find(|(slot, _)| slot == name) {
            Some(entry) => entry.1 = node,
            None => slots.push((name.into(), node)),
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    /// Number of nodes in the arena, reachable or not
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl std::ops::Index<NodeId> for Graph {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }
}

impl std::ops::IndexMut<NodeId> for Graph {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behaviour::{BehaviourFactory, StandardBehaviourFactory};

    #[test]
    fn test_node_copy_drops_children_and_content() {
        let mut graph = Graph::new();
        let mut original = Node::new("div", NodeKind::Block).with_attr("x", "1");
        original.enhancements.set_param("border", "width", "2");
        original.text.push_str("ignored");
        original.behaviours.push(
            StandardBehaviourFactory
                .create("goto", "chapter-1")
                .unwrap(),
        );
        let parent = graph.add(original);
        let child = graph.add(Node::new("span", NodeKind::Text));
        graph.append(parent, child);

        let copy = graph[parent].copy();
        assert_eq!(copy.tag, "div");
        assert_eq!(copy.kind, NodeKind::Block);
        assert_eq!(copy.get_attr("x"), Some("1"));
        assert!(copy.enhancements.get("border").is_some());
        assert!(copy.children.is_empty());
        assert!(copy.text.is_empty());
        assert!(copy.behaviours.is_empty());
    }

    #[test]
    fn test_copy_is_independent() {
        let mut graph = Graph::new();
        let a = graph.add(Node::new("div", NodeKind::Block).with_attr("x", "1"));
        let b = graph.add(graph[a].copy());
        graph[a].attrs.set_attr("x", "9");
        assert_eq!(graph[b].get_attr("x"), Some("1"));
    }

    #[test]
    fn test_set_placeholder_replaces() {
        let mut graph = Graph::new();
        let page = graph.add(Node::new("page", NodeKind::Page));
        let first = graph.add(Node::new("div", NodeKind::Block));
        let second = graph.add(Node::new("div", NodeKind::Block));

        graph.set_placeholder(page, "header", first);
        assert_eq!(graph[page].placeholder("header"), Some(first));
        graph.set_placeholder(page, "header", second);
        assert_eq!(graph[page].placeholder("header"), Some(second));
        assert_eq!(graph[page].placeholders.len(), 1);
        assert_eq!(graph[page].placeholder("footer"), None);
    }

    #[test]
    fn test_implicit_paragraph() {
        let para = Node::implicit_paragraph();
        assert!(para.implicit);
        assert!(para.kind.groups_inline());
        assert!(!para.is_text_flow());

        let run = Node::text_run("text", "hello");
        assert!(run.is_text_flow());
        assert_eq!(run.text, "hello");
        assert!(!run.implicit);
    }
}
