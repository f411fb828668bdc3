//! pdfmark - Markup to node-graph parser for PDF documents
//!
//! ## Core Concepts
//!
//! **Scoped parsing**: A document is parsed by a stack-driven state machine.
//! Every placeholder body (`header`, `footer`, `bullet`, ...) is parsed by a
//! nested scope with its own identifier registry and tag path, sharing the
//! reader and the node arena with its parent.
//!
//! **Cascade**: Attribute bags are resolved from the tag path, first from an
//! externally supplied rule set, then from `stylesheet` blocks of enclosing
//! nodes. Inline markup attributes always win.
//!
//! **Text flow**: Bare character data and inline nodes under block nodes are
//! grouped into implicit paragraphs.
//!
//! ## Modules
//! - `parser`: `Parser`, configuration, markup reader
//! - `node`: `Node`, `Graph` arena, `Tree`, `Document` metadata
//! - `cascade`: tag paths, rule sets, the `stylesheet` rule language
//! - `factory` / `behaviour`: pluggable node, enhancement and behaviour factories
//! - `listener`: construction notifications
//! - `dump`: text outlines of parsed trees
//!
//! ## Usage
//!
//! ```
//! use pdfmark::prelude::*;
//!
//! let mut parser = Parser::new();
//! let log = EventLog::new();
//! parser.add_listener(log.clone());
//!
//! let parsed = parser
//!     .parse(r#"<pdf title="Report"><div>Hello <b>world</b></div></pdf>"#, None)
//!     .unwrap();
//!
//! assert_eq!(parsed.document.metadata("title"), Some("Report"));
//! assert_eq!(parsed.tree.text_content(parsed.tree.root), "Hello world");
//! assert_eq!(log.labels().first().map(String::as_str), Some("+div"));
//! ```

// =============================================================================
// Modules
// =============================================================================

/// Helper macros for kind enums
#[macro_use]
mod macros;

/// Attribute lists, enhancements and bags
pub mod attr;

/// Behaviour trait, standard behaviours and their factory
pub mod behaviour;

/// Cascade resolution: tag paths, rule sets, stylesheets, caching
pub mod cascade;

/// Text dump of parsed trees
pub mod dump;

/// Error types
pub mod error;

/// Node and enhancement factories
pub mod factory;

/// Listener protocol
pub mod listener;

/// Node types: Node, Graph, Tree, Document
pub mod node;

/// Parser, configuration and markup reader
pub mod parser;

/// Prelude for common imports
pub mod prelude;

/// Identifier registry
pub mod registry;

// =============================================================================
// Re-exports
// =============================================================================

// Parser
pub use parser::{Parsed, Parser, ParserConfig, parse};

// Node types
pub use node::{Children, Document, Graph, Node, NodeId, NodeKind, Stats, Tree};

// Attributes
pub use attr::{Attrs, AttrsExt, Bag, Enhancements};

// Cascade
pub use cascade::{CachedCascade, CascadeRuleParser, CascadeRuleSet, PathEntry, StyleSheet, TagPath};

// Factories and behaviours
pub use behaviour::{Behaviour, BehaviourFactory};
pub use factory::{EnhancementFactory, NodeFactory};

// Listeners
pub use listener::{EventLog, ListenerResult, ParseListener};

// Error types
pub use error::{BehaviourError, ParseError, ParseResult, StyleSheetError};
