//! Text dump of parsed trees
//!
//! Renders a `Tree` as an indented outline, one node per line:
//!
//! ```text
//! #root
//!   div color="red"
//!     p (implicit)
//!       b font-weight="bold" "Hi"
//!       text " there"
//! ```

use crate::attr::Attrs;
use crate::node::{Graph, NodeId, Tree};

// =============================================================================
// DumpConfig
// =============================================================================

/// Configuration for tree dumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DumpConfig {
    /// Append the arena id (`#3`) to every node
    pub show_ids: bool,
    /// List enhancement parameters as `name.param="value"`
    pub show_enhancements: bool,
    /// List behaviours as `@name="value"`
    pub show_behaviours: bool,
    /// Descend into filled placeholder slots
    pub show_placeholders: bool,
}

impl DumpConfig {
    /// Structure only: tags, attributes, text.
    pub const COMPACT: Self = Self {
        show_ids: false,
        show_enhancements: false,
        show_behaviours: false,
        show_placeholders: false,
    };

    /// Everything attached to a node, placeholder subtrees included.
    pub const VERBOSE: Self = Self {
        show_ids: true,
        show_enhancements: true,
        show_behaviours: true,
        show_placeholders: true,
    };
}

impl Default for DumpConfig {
    fn default() -> Self {
        Self::COMPACT
    }
}

// =============================================================================
// Tree Dumping
// =============================================================================

/// Dump a tree starting at its root container.
pub fn dump_tree(tree: &Tree, config: &DumpConfig) -> String {
    let mut output = String::new();
    dump_node(&tree.graph, tree.root, 0, config, &mut output);
    output
}

/// Dump the subtree below one node.
pub fn dump_subtree(tree: &Tree, id: NodeId, config: &DumpConfig) -> String {
    let mut output = String::new();
    dump_node(&tree.graph, id, 0, config, &mut output);
    output
}

fn dump_node(graph: &Graph, id: NodeId, depth: usize, config: &DumpConfig, output: &mut String) {
    let node = &graph[id];
    push_indent(depth, output);
    output.push_str(&node.tag);

    if config.show_ids {
        output.push(' ');
        output.push_str(&id.to_string());
    }
    if node.implicit {
        output.push_str(" (implicit)");
    }

    render_attrs(&node.attrs, "", output);

    if config.show_enhancements {
        for (enhancement, params) in node.enhancements.iter() {
            render_attrs(params, enhancement, output);
        }
    }

    if config.show_behaviours {
        for behaviour in &node.behaviours {
            output.push_str(" @");
            output.push_str(behaviour.name());
            push_quoted(behaviour.value(), output);
        }
    }

    if !node.text.is_empty() {
        output.push(' ');
        push_quoted_value(&node.text, output);
    }
    output.push('\n');

    if config.show_placeholders {
        for (slot, target) in &node.placeholders {
            push_indent(depth + 1, output);
            output.push('[');
            output.push_str(slot);
            output.push_str("]\n");
            dump_node(graph, *target, depth + 2, config, output);
        }
    }

    for child in &node.children {
        dump_node(graph, *child, depth + 1, config, output);
    }
}

/// Render attributes as ` name="value"`, optionally prefixed `prefix.name`.
fn render_attrs(attrs: &Attrs, prefix: &str, output: &mut String) {
    for (name, value) in attrs {
        output.push(' ');
        if !prefix.is_empty() {
            output.push_str(prefix);
            output.push('.');
        }
        output.push_str(name);
        push_quoted(value, output);
    }
}

fn push_indent(depth: usize, output: &mut String) {
    for _ in 0..depth {
        output.push_str("  ");
    }
}

/// `="value"`
fn push_quoted(value: &str, output: &mut String) {
    output.push('=');
    push_quoted_value(value, output);
}

/// Quote a value, escaping quotes and backslashes.
fn push_quoted_value(value: &str, output: &mut String) {
    output.push('"');
    for c in value.chars() {
        match c {
            '"' => output.push_str("\\\""),
            '\\' => output.push_str("\\\\"),
            '\n' => output.push_str("\\n"),
            _ => output.push(c),
        }
    }
    output.push('"');
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn test_compact_dump() {
        let tree = parse(r#"<pdf><div color="red"><b>Hi</b> there</div></pdf>"#).unwrap().tree;
        let expected = "\
#root
  div color=\"red\"
    p (implicit)
      b font-weight=\"bold\" \"Hi\"
      text \" there\"
";
        assert_eq!(dump_tree(&tree, &DumpConfig::COMPACT), expected);
    }

    #[test]
    fn test_verbose_dump_shows_slots_and_behaviours() {
        let source = r#"<pdf><page border.width="2"><placeholders><header><span goto="top">T</span></header></placeholders></page></pdf>"#;
        let tree = parse(source).unwrap().tree;
        let dump = dump_tree(&tree, &DumpConfig::VERBOSE);

        assert!(dump.contains("page #1 border.width=\"2\""));
        assert!(dump.contains("    [header]\n"));
        assert!(dump.contains("@goto=\"top\" \"T\""));

        let compact = dump_tree(&tree, &DumpConfig::default());
        assert!(!compact.contains("[header]"));
        assert!(!compact.contains("goto"));
    }

    #[test]
    fn test_escaping() {
        let mut output = String::new();
        push_quoted_value(r#"say "hi" \o/"#, &mut output);
        assert_eq!(output, r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn test_dump_subtree() {
        let tree = parse("<pdf><table><row><cell/></row></table></pdf>").unwrap().tree;
        let row = tree.find(|n| n.tag == "row").unwrap();
        assert_eq!(dump_subtree(&tree, row, &DumpConfig::COMPACT), "row\n  cell\n");
    }
}
