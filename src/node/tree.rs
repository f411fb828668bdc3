//! Tree type and related utilities
//!
//! The parse result: a node graph plus its root container, with query and
//! traversal APIs.

use super::{Graph, Node, NodeId, NodeKind};

// =============================================================================
// Tree
// =============================================================================

/// Root container produced by a parse
#[derive(Debug)]
pub struct Tree {
    /// Arena holding every node of the parse
    pub graph: Graph,
    /// Root container node (kind `Root`)
    pub root: NodeId,
}

impl Tree {
    pub fn new(graph: Graph, root: NodeId) -> Self {
        Self { graph, root }
    }

    /// The root container node
    pub fn root_node(&self) -> &Node {
        &self.graph[self.root]
    }

    /// Get a node by id
    pub fn node(&self, id: NodeId) -> &Node {
        &self.graph[id]
    }

    /// Children of a node, resolved
    pub fn children(&self, id: NodeId) -> impl Iterator<Item = &Node> {
        self.graph[id].children.iter().map(|c| &self.graph[*c])
    }

    /// Top-level nodes under the root container
    pub fn top_level(&self) -> impl Iterator<Item = &Node> {
        self.children(self.root)
    }

    /// Content of a filled placeholder slot
    pub fn placeholder(&self, owner: NodeId, name: &str) -> Option<&Node> {
        self.graph[owner].placeholder(name).map(|id| &self.graph[id])
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Query API
    // ─────────────────────────────────────────────────────────────────────────

    /// Find first node matching predicate (depth-first, root included)
    pub fn find<F>(&self, predicate: F) -> Option<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.iter().find(|id| predicate(&self.graph[*id]))
    }

    /// Find all nodes matching predicate
    pub fn find_all<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        self.iter().filter(|id| predicate(&self.graph[*id])).collect()
    }

    /// Iterate over all reachable nodes (depth-first, placeholder subtrees excluded)
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter::new(&self.graph, self.root)
    }

    /// Concatenated character data below a node
    pub fn text_content(&self, id: NodeId) -> String {
        let mut result = String::new();
        self.collect_text(id, &mut result);
        result
    }

    fn collect_text(&self, id: NodeId, buf: &mut String) {
        let node = &self.graph[id];
        buf.push_str(&node.text);
        for child in &node.children {
            self.collect_text(*child, buf);
        }
    }

    /// Collect statistics about the tree, placeholder subtrees included
    pub fn collect_stats(&self) -> Stats {
        let mut stats = Stats::default();
        self.collect_stats_recursive(self.root, &mut stats);
        stats
    }

    fn collect_stats_recursive(&self, id: NodeId, stats: &mut Stats) {
        let node = &self.graph[id];
        stats.node_count += 1;

        match node.kind {
            NodeKind::Text => stats.text_count += 1,
            NodeKind::Paragraph if node.implicit => {
                stats.paragraph_count += 1;
                stats.implicit_paragraph_count += 1;
            }
            NodeKind::Paragraph => stats.paragraph_count += 1,
            _ => {}
        }

        for (_, slot) in &node.placeholders {
            stats.placeholder_count += 1;
            self.collect_stats_recursive(*slot, stats);
        }
        for child in &node.children {
            self.collect_stats_recursive(*child, stats);
        }
    }
}

// =============================================================================
// NodeIter - depth-first traversal
// =============================================================================

/// Depth-first iterator over node ids
pub struct NodeIter<'a> {
    graph: &'a Graph,
    stack: Vec<NodeId>,
}

impl<'a> NodeIter<'a> {
    fn new(graph: &'a Graph, root: NodeId) -> Self {
        Self {
            graph,
            stack: vec![root],
        }
    }
}

impl Iterator for NodeIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Push children in reverse order so they're visited left-to-right
        self.stack.extend(self.graph[id].children.iter().rev().copied());
        Some(id)
    }
}

// =============================================================================
// Stats - tree statistics
// =============================================================================

/// Tree statistics collected from traversal
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Stats {
    /// All nodes, root container included
    pub node_count: usize,
    pub text_count: usize,
    /// Explicit and implicit paragraphs
    pub paragraph_count: usize,
    pub implicit_paragraph_count: usize,
    /// Filled placeholder slots
    pub placeholder_count: usize,
}

impl Stats {
    /// Check if any placeholder slot was filled
    pub fn has_placeholders(&self) -> bool {
        self.placeholder_count > 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Tree {
        let mut graph = Graph::new();
        let root = graph.add(Node::root());
        let page = graph.add(Node::new("page", NodeKind::Page));
        let para = graph.add(Node::implicit_paragraph());
        let run = graph.add(Node::text_run("text", "Hello"));
        let bold = graph.add(Node::text_run("b", " world"));
        let header = graph.add(Node::new("div", NodeKind::Block));
        graph.append(root, page);
        graph.append(page, para);
        graph.append(para, run);
        graph.append(para, bold);
        graph.set_placeholder(page, "header", header);
        Tree::new(graph, root)
    }

    #[test]
    fn test_iter_is_depth_first_without_slots() {
        let tree = sample();
        let tags: Vec<_> = tree.iter().map(|id| tree.node(id).tag.as_str()).collect();
        assert_eq!(tags, vec!["#root", "page", "p", "text", "b"]);
    }

    #[test]
    fn test_find() {
        let tree = sample();
        let bold = tree.find(|n| n.tag == "b").unwrap();
        assert_eq!(tree.node(bold).text, " world");
        assert!(tree.find(|n| n.tag == "missing").is_none());
        assert_eq!(tree.find_all(|n| n.is_text_flow()).len(), 2);
    }

    #[test]
    fn test_text_content_and_slots() {
        let tree = sample();
        let page = tree.find(|n| n.kind == NodeKind::Page).unwrap();
        assert_eq!(tree.text_content(page), "Hello world");
        assert_eq!(tree.placeholder(page, "header").unwrap().tag, "div");
        assert_eq!(tree.top_level().count(), 1);
    }

    #[test]
    fn test_stats() {
        let stats = sample().collect_stats();
        assert_eq!(
            stats,
            Stats {
                node_count: 6,
                text_count: 2,
                paragraph_count: 1,
                implicit_paragraph_count: 1,
                placeholder_count: 1,
            }
        );
        assert!(stats.has_placeholders());
    }
}
