//! Node and enhancement factories
//!
//! Both are shared read-only between a parse and its nested placeholder
//! scopes, and between parallel parses, hence the `Send + Sync` bounds.

use crate::node::{Node, NodeKind};

// =============================================================================
// NodeFactory
// =============================================================================

/// Creates fresh nodes keyed by tag name.
pub trait NodeFactory: Send + Sync {
    /// Create a node for `tag`, or `None` if the tag is not recognized
    fn create(&self, tag: &str) -> Option<Node>;
}

/// Tag table for the built-in node kinds.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNodeFactory;

impl StandardNodeFactory {
    /// Map a tag to its kind without building a node
    pub fn kind_of(tag: &str) -> Option<NodeKind> {
        let kind = match tag {
            "div" | "section" | "block" => NodeKind::Block,
            "p" | "paragraph" => NodeKind::Paragraph,
            "b" | "strong" | "i" | "em" | "u" | "span" | "text" | "a" => NodeKind::Text,
            "br" => NodeKind::LineBreak,
            "page" => NodeKind::Page,
            "table" => NodeKind::Table,
            "row" | "tr" => NodeKind::Row,
            "cell" | "td" => NodeKind::Cell,
            "list" | "ul" | "ol" => NodeKind::List,
            "item" | "li" => NodeKind::ListItem,
            "image" | "img" => NodeKind::Image,
            "spacer" => NodeKind::Spacer,
            _ => return None,
        };
        Some(kind)
    }
}

impl NodeFactory for StandardNodeFactory {
    fn create(&self, tag: &str) -> Option<Node> {
        let node = Node::new(tag, Self::kind_of(tag)?);
        let node = match tag {
            "b" | "strong" => node.with_attr("font-weight", "bold"),
            "i" | "em" => node.with_attr("font-style", "italic"),
            "u" => node.with_attr("text-decoration", "underline"),
            "ol" => node.with_attr("list-style", "decimal"),
            _ => node,
        };
        Some(node)
    }
}

// =============================================================================
// EnhancementFactory
// =============================================================================

/// Knows which names denote enhancements (visual decorations).
///
/// The parser never builds enhancements itself; it only routes
/// `enhancement.param` declarations into the enhancement map of a bag.
pub trait EnhancementFactory: Send + Sync {
    fn is_enhancement(&self, name: &str) -> bool;
}

/// Recognizes `border`, `background`, `shadow` and `rounded`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardEnhancementFactory;

impl StandardEnhancementFactory {
    pub const NAMES: &'static [&'static str] = &["border", "background", "shadow", "rounded"];
}

impl EnhancementFactory for StandardEnhancementFactory {
    fn is_enhancement(&self, name: &str) -> bool {
        Self::NAMES.contains(&name)
    }
}
