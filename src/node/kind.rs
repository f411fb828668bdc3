//! Closed set of node types with capability queries
//!
//! Layout code dispatches on `NodeKind`; the parser only asks the capability
//! questions below (text flow, inline grouping, placeholder slots).

/// Type of a document node, derived from its tag by the node factory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    /// Root container produced by a parse scope
    Root,
    /// Paragraph, explicit (`<p>`) or implicit
    Paragraph,
    /// Inline text run (`b`, `i`, `span`, bare character data, ...)
    Text,
    /// Inline forced line break
    LineBreak,
    /// Generic block container
    Block,
    /// Page with header/footer slots
    Page,
    Table,
    Row,
    Cell,
    List,
    ListItem,
    Image,
    Spacer,
}

impl NodeKind {
    crate::impl_kind_predicates!(
        Root, Paragraph, Text, LineBreak, Block, Page, Table, Row, Cell, List, ListItem, Image,
        Spacer,
    );

    crate::impl_kind_names!(
        Root => "root",
        Paragraph => "paragraph",
        Text => "text",
        LineBreak => "line-break",
        Block => "block",
        Page => "page",
        Table => "table",
        Row => "row",
        Cell => "cell",
        List => "list",
        ListItem => "list-item",
        Image => "image",
        Spacer => "spacer",
    );

    /// Inline nodes that flow inside a paragraph
    pub fn is_text_flow(&self) -> bool {
        matches!(self, Self::Text | Self::LineBreak)
    }

    /// Blocks that take inline children directly, without an implicit paragraph
    pub fn groups_inline(&self) -> bool {
        matches!(self, Self::Paragraph)
    }

    /// Placeholder slot names this kind declares
    pub fn placeholder_slots(&self) -> &'static [&'static str] {
        match self {
            Self::Page | Self::Table => &["header", "footer"],
            Self::List => &["bullet"],
            _ => &[],
        }
    }

    /// Check if this kind declares a slot with the given name
    pub fn supports_placeholder(&self, name: &str) -> bool {
        self.placeholder_slots().contains(&name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generated_predicates() {
        assert!(NodeKind::Root.is_root());
        assert!(NodeKind::LineBreak.is_line_break());
        assert!(NodeKind::ListItem.is_list_item());
        assert!(!NodeKind::Block.is_paragraph());
    }

    #[test]
    fn test_names_are_unique() {
        let mut names: Vec<_> = NodeKind::all().iter().map(|k| k.name()).collect();
        let total = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), total);
        assert_eq!(NodeKind::ListItem.name(), "list-item");
    }

    #[test]
    fn test_capabilities() {
        assert!(NodeKind::Text.is_text_flow());
        assert!(NodeKind::LineBreak.is_text_flow());
        assert!(!NodeKind::Paragraph.is_text_flow());
        assert!(NodeKind::Paragraph.groups_inline());

        assert!(NodeKind::Page.supports_placeholder("header"));
        assert!(NodeKind::Table.supports_placeholder("footer"));
        assert!(NodeKind::List.supports_placeholder("bullet"));
        assert!(!NodeKind::Block.supports_placeholder("header"));
        assert!(!NodeKind::Page.supports_placeholder("bullet"));
    }
}
