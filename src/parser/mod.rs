//! Markup parser: turns a markup stream into a node graph.
//!
//! # Example
//!
//! ```
//! use pdfmark::parser::Parser;
//!
//! let mut parser = Parser::new();
//! let parsed = parser.parse(r#"<pdf title="T"><div><b>Hi</b> there</div></pdf>"#, None).unwrap();
//!
//! assert_eq!(parsed.document.metadata("title"), Some("T"));
//! let div = parsed.tree.top_level().next().unwrap();
//! assert_eq!(div.tag, "div");
//! ```

mod config;
mod markup;
mod scope;

pub use config::ParserConfig;
pub use markup::{MarkupEvent, MarkupReader};

use std::io::BufRead;
use std::sync::Arc;

use log::debug;

use crate::behaviour::{BehaviourFactory, StandardBehaviourFactory};
use crate::cascade::{CascadeRuleParser, CascadeRuleSet, StyleSheetParser};
use crate::error::ParseResult;
use crate::factory::{EnhancementFactory, NodeFactory, StandardEnhancementFactory, StandardNodeFactory};
use crate::listener::ParseListener;
use crate::node::{Document, Graph, Tree};

use scope::Session;

/// Result of a top-level parse.
#[derive(Debug)]
pub struct Parsed {
    /// Root attributes
    pub document: Document,
    /// Node graph and its root container
    pub tree: Tree,
}

/// Factories and names shared by every scope of a parse.
#[derive(Clone)]
pub(crate) struct Services {
    pub config: ParserConfig,
    pub nodes: Arc<dyn NodeFactory>,
    pub enhancements: Arc<dyn EnhancementFactory>,
    pub behaviours: Arc<dyn BehaviourFactory>,
    pub stylesheets: Arc<dyn CascadeRuleParser>,
}

impl Default for Services {
    fn default() -> Self {
        Self {
            config: ParserConfig::default(),
            nodes: Arc::new(StandardNodeFactory),
            enhancements: Arc::new(StandardEnhancementFactory),
            behaviours: Arc::new(StandardBehaviourFactory),
            stylesheets: Arc::new(StyleSheetParser),
        }
    }
}

// =============================================================================
// Parser
// =============================================================================

/// Reusable markup parser.
///
/// Holds the pluggable factories and listeners; all per-document state
/// lives in the parse call, so one instance can parse any number of
/// documents in sequence.
#[derive(Default)]
pub struct Parser {
    services: Services,
    listeners: Vec<Box<dyn ParseListener>>,
}

impl Parser {
    /// Parser with the standard factories and rule language
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParserConfig) -> Self {
        let mut parser = Self::new();
        parser.services.config = config;
        parser
    }

    pub fn config(&self) -> &ParserConfig {
        &self.services.config
    }

    pub fn set_config(&mut self, config: ParserConfig) {
        self.services.config = config;
    }

    pub fn set_node_factory(&mut self, factory: impl NodeFactory + 'static) {
        self.services.nodes = Arc::new(factory);
    }

    pub fn set_enhancement_factory(&mut self, factory: impl EnhancementFactory + 'static) {
        self.services.enhancements = Arc::new(factory);
    }

    pub fn set_behaviour_factory(&mut self, factory: impl BehaviourFactory + 'static) {
        self.services.behaviours = Arc::new(factory);
    }

    /// Replace the parser used for `stylesheet` block bodies
    pub fn set_stylesheet_parser(&mut self, parser: impl CascadeRuleParser + 'static) {
        self.services.stylesheets = Arc::new(parser);
    }

    /// Register a listener; listeners are notified in registration order
    pub fn add_listener(&mut self, listener: impl ParseListener + 'static) {
        self.listeners.push(Box::new(listener));
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Entry points
    // ─────────────────────────────────────────────────────────────────────────

    /// Parse a complete document from a string.
    ///
    /// `cascade` holds externally supplied constraints, applied before any
    /// `stylesheet` block of the document.
    pub fn parse(&mut self, source: &str, cascade: Option<&dyn CascadeRuleSet>) -> ParseResult<Parsed> {
        let mut document = Document::new();
        let tree = self.parse_into(&mut document, source, cascade)?;
        Ok(Parsed { document, tree })
    }

    /// Parse into an existing metadata sink; root attributes are added to it.
    pub fn parse_into(
        &mut self,
        document: &mut Document,
        source: &str,
        cascade: Option<&dyn CascadeRuleSet>,
    ) -> ParseResult<Tree> {
        self.run(MarkupReader::from_str(source), document, cascade)
    }

    /// Parse from any buffered byte stream.
    pub fn parse_reader<R: BufRead>(
        &mut self,
        reader: R,
        cascade: Option<&dyn CascadeRuleSet>,
    ) -> ParseResult<Parsed> {
        let mut document = Document::new();
        let tree = self.run(MarkupReader::new(reader), &mut document, cascade)?;
        Ok(Parsed { document, tree })
    }

    /// Parse independent documents in parallel.
    ///
    /// Each document gets its own listener-less parser sharing this one's
    /// factories and configuration; results keep the input order.
    #[cfg(feature = "parallel")]
    pub fn parse_many(&self, sources: &[&str], cascade: Option<&dyn CascadeRuleSet>) -> Vec<ParseResult<Parsed>> {
        use rayon::prelude::*;

        let services = &self.services;
        sources
            .par_iter()
            .map(|source| {
                let mut parser = Parser {
                    services: services.clone(),
                    listeners: Vec::new(),
                };
                parser.parse(source, cascade)
            })
            .collect()
    }

    fn run<R: BufRead>(
        &mut self,
        mut reader: MarkupReader<R>,
        document: &mut Document,
        cascade: Option<&dyn CascadeRuleSet>,
    ) -> ParseResult<Tree> {
        let mut graph = Graph::new();
        let mut session = Session {
            reader: &mut reader,
            graph: &mut graph,
            document,
            listeners: &mut self.listeners,
            services: &self.services,
            cascade,
        };
        let root = scope::parse_document(&mut session)?;
        debug!("parsed document: {} nodes in arena", graph.len());
        Ok(Tree::new(graph, root))
    }
}

impl std::fmt::Debug for Parser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Parser")
            .field("config", &self.services.config)
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

/// Parse a document with a default parser and no external cascade.
pub fn parse(source: &str) -> ParseResult<Parsed> {
    Parser::new().parse(source, None)
}

// =============================================================================
// Tests
// =============================================================================
