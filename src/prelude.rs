//! Prelude module for common imports.
//!
//! ```
//! use pdfmark::prelude::*;
//! ```

// Parser
pub use crate::parser::{Parsed, Parser, ParserConfig, parse};

// Node types
pub use crate::node::{Children, Document, Graph, Node, NodeId, NodeIter, NodeKind, Stats, Tree};

// Attributes
pub use crate::attr::{Attrs, AttrsExt, Bag, Enhancements};

// Cascade
pub use crate::cascade::{
    CachedCascade, CascadeRuleParser, CascadeRuleSet, PathEntry, Rule, Selector, StyleSheet,
    StyleSheetParser, TagPath,
};

// Factories
pub use crate::factory::{
    EnhancementFactory, NodeFactory, StandardEnhancementFactory, StandardNodeFactory,
};

// Behaviours
pub use crate::behaviour::{
    AnnotationBehaviour, Behaviour, BehaviourFactory, GoToBehaviour, LinkBehaviour,
    StandardBehaviourFactory,
};

// Listeners
pub use crate::listener::{EventKind, EventLog, ListenerResult, ParseEvent, ParseListener};

// Registry
pub use crate::registry::IdentifierRegistry;

// Dump
pub use crate::dump::{DumpConfig, dump_subtree, dump_tree};

// Error
pub use crate::error::{BehaviourError, ParseError, ParseResult, StyleSheetError};
