//! Parse scopes: the stack-driven state machine behind `Parser`.
//!
//! A `Scope` is one parser instance in the sense of the markup language: the
//! top-level document, or one placeholder body. Each scope owns its identifier
//! registry, tag path and open-node stack; nested scopes share only the
//! `Session` (reader, arena, metadata sink, listeners, factories).
//!
//! # Implicit paragraphs
//!
//! Every open block keeps its own optional implicit paragraph. It is closed
//! (listener-notified) from exactly three places:
//!
//! 1. a non-text-flow element starts as a child of that block
//! 2. the block itself ends
//! 3. the scope terminates (root container's paragraph)

use std::io::BufRead;

use compact_str::CompactString;
use log::{debug, trace, warn};

use super::Services;
use super::markup::{MarkupEvent, MarkupReader};
use crate::attr::{Attrs, AttrsExt, Bag};
use crate::cascade::{CascadeRuleSet, PathEntry, TagPath};
use crate::error::{ParseError, ParseResult};
use crate::listener::ParseListener;
use crate::node::{Document, Graph, Node, NodeId};
use crate::registry::IdentifierRegistry;

// =============================================================================
// Session
// =============================================================================

/// State shared by a top-level scope and all of its nested scopes.
pub(super) struct Session<'s, R> {
    pub reader: &'s mut MarkupReader<R>,
    pub graph: &'s mut Graph,
    pub document: &'s mut Document,
    pub listeners: &'s mut [Box<dyn ParseListener>],
    pub services: &'s Services,
    pub cascade: Option<&'s dyn CascadeRuleSet>,
}

#[derive(Debug, Clone, Copy)]
enum Notify {
    Start,
    End,
    EndPlaceholders,
}

// =============================================================================
// Scope state
// =============================================================================

/// What the next element start means.
#[derive(Debug)]
enum Mode {
    Normal,
    /// Children are placeholder slot names of `owner`
    InPlaceholders { owner: NodeId },
    /// Children are behaviour declarations for `owner`
    InBehaviours {
        owner: NodeId,
        entry: Option<(CompactString, String)>,
    },
}

/// One open node of the scope.
struct OpenNode {
    id: NodeId,
    /// Inline markup bag, re-applied after a late stylesheet merge
    inline: Bag,
    /// Rule sets from `stylesheet` blocks inside this node
    sheets: Vec<Box<dyn CascadeRuleSet>>,
    /// Implicit paragraph currently collecting inline children
    paragraph: Option<NodeId>,
}

impl OpenNode {
    fn new(id: NodeId, inline: Bag) -> Self {
        Self {
            id,
            inline,
            sheets: Vec::new(),
            paragraph: None,
        }
    }
}

/// Whether the scope keeps reading after an element end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Continue,
    Done,
}

pub(super) struct Scope {
    terminator: CompactString,
    registry: IdentifierRegistry,
    path: TagPath,
    /// Open nodes; `open[0]` is the scope's root container
    open: Vec<OpenNode>,
    mode: Mode,
    /// Previous token was character data
    after_text: bool,
}

// =============================================================================
// Entry points
// =============================================================================

/// Parse a whole document: root element, then its body.
/// The root may carry any tag name; the scope terminates at its end tag.
pub(super) fn parse_document<R: BufRead>(s: &mut Session<'_, R>) -> ParseResult<NodeId> {
    let (name, attrs, self_closing) = loop {
        match s.reader.next_event()? {
            MarkupEvent::Start {
                name,
                attrs,
                self_closing,
            } => break (name, attrs, self_closing),
            MarkupEvent::Text(text) if text.trim().is_empty() => continue,
            MarkupEvent::Text(_) => {
                return Err(ParseError::malformed("text before the root element", s.reader.position()));
            }
            MarkupEvent::End { name } => {
                return Err(ParseError::malformed(format!("unexpected </{name}>"), s.reader.position()));
            }
            MarkupEvent::Eof => {
                return Err(ParseError::malformed("no root element", s.reader.position()));
            }
        }
    };
    for (key, value) in attrs {
        s.document.set_metadata(key, value);
    }

    let root = s.graph.add(Node::root());
    let mut scope = Scope::new(name.clone(), root);
    debug!("document scope <{name}> opened");
    scope.path.push(PathEntry::new(name));
    if !self_closing {
        scope.run(s)?;
    }
    scope.finish(s)?;
    debug!("document scope closed, {} nodes", s.graph.len());
    Ok(root)
}

impl Scope {
    fn new(terminator: CompactString, root: NodeId) -> Self {
        Self {
            terminator,
            registry: IdentifierRegistry::new(),
            path: TagPath::new(),
            open: vec![OpenNode::new(root, Bag::new())],
            mode: Mode::Normal,
            after_text: false,
        }
    }

    fn root(&self) -> NodeId {
        self.open[0].id
    }

    fn top(&self) -> NodeId {
        self.open.last().map_or(self.root(), |o| o.id)
    }

    /// Read events until the terminating tag closes the scope.
    fn run<R: BufRead>(&mut self, s: &mut Session<'_, R>) -> ParseResult<()> {
        loop {
            match s.reader.next_event()? {
                MarkupEvent::Start {
                    name,
                    attrs,
                    self_closing,
                } => self.start_element(s, name, attrs, self_closing)?,
                MarkupEvent::End { name } => {
                    if self.end_element(s, &name)? == Step::Done {
                        return Ok(());
                    }
                }
                MarkupEvent::Text(text) => self.characters(s, &text)?,
                MarkupEvent::Eof => {
                    return Err(ParseError::malformed(
                        format!("unexpected end of input, expected </{}>", self.terminator),
                        s.reader.position(),
                    ));
                }
            }
        }
    }

    /// Flush the root container's paragraph. The terminating tag itself
    /// produces no end-of-node event.
    fn finish<R: BufRead>(&mut self, s: &mut Session<'_, R>) -> ParseResult<()> {
        if self.open.len() > 1 {
            // Only reachable if the reader let an element stay open
            return Err(ParseError::malformed(
                format!("<{}> is not closed", s.graph[self.top()].tag),
                s.reader.position(),
            ));
        }
        self.close_paragraph(s, 0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Dispatch
    // ─────────────────────────────────────────────────────────────────────────

    fn start_element<R: BufRead>(
        &mut self,
        s: &mut Session<'_, R>,
        name: CompactString,
        attrs: Attrs,
        self_closing: bool,
    ) -> ParseResult<()> {
        match self.mode {
            Mode::InPlaceholders { owner } => return self.parse_placeholder(s, owner, name, self_closing),
            Mode::InBehaviours { .. } => return self.behaviour_entry_start(s, name, self_closing),
            Mode::Normal => {}
        }

        let services = s.services;
        let config = &services.config;
        if name == config.placeholders_tag {
            let owner = self.top();
            self.mode = Mode::InPlaceholders { owner };
            if self_closing {
                self.end_placeholders(s, owner)?;
            }
            return Ok(());
        }
        if name == config.behaviours_tag {
            if !self_closing {
                self.mode = Mode::InBehaviours {
                    owner: self.top(),
                    entry: None,
                };
            }
            return Ok(());
        }
        if name == config.stylesheet_tag {
            if !self_closing {
                let body = s.reader.read_text_body(&name)?;
                self.apply_stylesheet(s, &body)?;
            }
            return Ok(());
        }
        self.create_node(s, name, attrs, self_closing)
    }

    fn end_element<R: BufRead>(&mut self, s: &mut Session<'_, R>, name: &str) -> ParseResult<Step> {
        match &mut self.mode {
            Mode::InPlaceholders { owner } => {
                let owner = *owner;
                if s.services.config.placeholders_tag != name {
                    return Err(ParseError::malformed(
                        format!("unexpected </{name}> in placeholder block"),
                        s.reader.position(),
                    ));
                }
                self.end_placeholders(s, owner)?;
                return Ok(Step::Continue);
            }
            Mode::InBehaviours { owner, entry } => {
                let owner = *owner;
                match entry.take() {
                    Some((behaviour, value)) if behaviour == name => {
                        self.attach_behaviour(s, owner, &behaviour, &value)?;
                    }
                    None if s.services.config.behaviours_tag == name => self.mode = Mode::Normal,
                    _ => {
                        return Err(ParseError::malformed(
                            format!("unexpected </{name}> in behaviour block"),
                            s.reader.position(),
                        ));
                    }
                }
                return Ok(Step::Continue);
            }
            Mode::Normal => {}
        }

        if self.open.len() == 1 {
            if self.terminator == name {
                return Ok(Step::Done);
            }
            return Err(ParseError::malformed(
                format!("unexpected </{name}>, expected </{}>", self.terminator),
                s.reader.position(),
            ));
        }

        let depth = self.open.len() - 1;
        let node = self.open[depth].id;
        if !s.graph[node].is_text_flow() {
            self.after_text = false;
        }
        // Closes the node's own paragraph, whatever its type
        self.close_paragraph(s, depth)?;
        self.open.pop();
        self.path.pop();
        trace!("end <{name}> {node}");
        self.notify(s, Notify::End, node)?;
        Ok(Step::Continue)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Node creation
    // ─────────────────────────────────────────────────────────────────────────

    fn create_node<R: BufRead>(
        &mut self,
        s: &mut Session<'_, R>,
        name: CompactString,
        attrs: Attrs,
        self_closing: bool,
    ) -> ParseResult<()> {
        let services = s.services;
        let config = &services.config;

        let mut node = match attrs.get_attr(&config.extends_attr) {
            Some(reference) => {
                let source = self.registry.get(reference).ok_or_else(|| ParseError::UnknownIdentifier {
                    id: reference.into(),
                    path: self.describe(&name),
                })?;
                s.graph[source].copy()
            }
            None => services.nodes.create(&name).ok_or_else(|| ParseError::UnknownTag {
                tag: name.clone(),
                path: self.describe(&name),
            })?,
        };

        let text_flow = node.is_text_flow();
        if !text_flow {
            let depth = self.open.len() - 1;
            self.close_paragraph(s, depth)?;
            self.after_text = false;
        }

        let classes = attrs.get_attr(&config.class_attr).unwrap_or_default();
        self.path.push(PathEntry::with_classes(name.clone(), classes));
        node.apply_bag(&self.resolve_cascade(s));

        let id = s.graph.add(node);
        if let Some(declared) = attrs.get_attr(&config.id_attr) {
            self.registry.register(declared, id)?;
        }

        for behaviour in services.behaviours.supported_names() {
            if let Some(value) = attrs.get_attr(behaviour)
                && !value.trim().is_empty()
            {
                self.attach_behaviour(s, id, behaviour, value)?;
            }
        }
        let inline = self.inline_bag(services, &attrs);
        s.graph[id].apply_bag(&inline);

        let parent = if text_flow { self.flow_parent(s)? } else { self.top() };
        s.graph.append(parent, id);
        self.open.push(OpenNode::new(id, inline));
        trace!("start <{name}> {id} under {parent}");
        self.notify(s, Notify::Start, id)?;

        if self_closing {
            self.end_element(s, &name)?;
        }
        Ok(())
    }

    /// Global constraints first, then scoped sheets outermost to innermost.
    fn resolve_cascade<R>(&self, s: &Session<'_, R>) -> Bag {
        let mut bag = s.cascade.map(|c| c.find(&self.path)).unwrap_or_default();
        for sheet in self.open.iter().flat_map(|o| o.sheets.iter()) {
            bag.merge(&sheet.find(&self.path));
        }
        bag
    }

    /// Markup attributes that are neither reserved nor behaviours.
    fn inline_bag(&self, services: &Services, attrs: &Attrs) -> Bag {
        let mut bag = Bag::new();
        for (name, value) in attrs {
            if services.config.is_reserved_attr(name) || services.behaviours.supports(name) {
                continue;
            }
            bag.insert(name, value.as_str(), services.enhancements.as_ref());
        }
        bag
    }

    fn describe(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{} > {name}", self.path)
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Text flow
    // ─────────────────────────────────────────────────────────────────────────

    fn characters<R: BufRead>(&mut self, s: &mut Session<'_, R>, raw: &str) -> ParseResult<()> {
        match &mut self.mode {
            Mode::InBehaviours {
                entry: Some((_, value)),
                ..
            } => {
                value.push_str(raw);
                return Ok(());
            }
            Mode::InBehaviours { .. } | Mode::InPlaceholders { .. } => {
                if !raw.trim().is_empty() {
                    warn!("discarding text {:?} outside of a declaration", raw.trim());
                }
                return Ok(());
            }
            Mode::Normal => {}
        }

        let text = normalize_text(raw, self.after_text);
        if text.is_empty() {
            return Ok(());
        }

        let top = self.top();
        let node = &mut s.graph[top];
        if node.is_text_flow() && node.children.is_empty() {
            node.text.push_str(&text);
        } else {
            // After an inline child, text becomes a sibling run to keep source order
            let parent = if node.is_text_flow() { top } else { self.flow_parent(s)? };
            trace!("text run {text:?} under {parent}");
            let run = s.graph.add(Node::text_run(s.services.config.text_tag.clone(), text));
            s.graph.append(parent, run);
            self.notify(s, Notify::Start, run)?;
            self.notify(s, Notify::End, run)?;
        }
        self.after_text = true;
        Ok(())
    }

    /// Parent for inline content: the top node itself if it takes inline
    /// children, otherwise its implicit paragraph (created on first use).
    fn flow_parent<R: BufRead>(&mut self, s: &mut Session<'_, R>) -> ParseResult<NodeId> {
        let depth = self.open.len() - 1;
        let top = self.open[depth].id;
        let kind = s.graph[top].kind;
        if kind.is_text_flow() || kind.groups_inline() {
            return Ok(top);
        }
        if let Some(paragraph) = self.open[depth].paragraph {
            return Ok(paragraph);
        }
        let paragraph = s.graph.add(Node::implicit_paragraph());
        s.graph.append(top, paragraph);
        self.open[depth].paragraph = Some(paragraph);
        self.notify(s, Notify::Start, paragraph)?;
        Ok(paragraph)
    }

    fn close_paragraph<R: BufRead>(&mut self, s: &mut Session<'_, R>, depth: usize) -> ParseResult<()> {
        match self.open[depth].paragraph.take() {
            Some(paragraph) => self.notify(s, Notify::End, paragraph),
            None => Ok(()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Stylesheets
    // ─────────────────────────────────────────────────────────────────────────

    /// Parse a `stylesheet` body, apply it to the current node and keep it
    /// active for nodes opened inside that node.
    fn apply_stylesheet<R: BufRead>(&mut self, s: &mut Session<'_, R>, body: &str) -> ParseResult<()> {
        let services = s.services;
        let sheet = services.stylesheets.parse(body, services.enhancements.as_ref())?;

        let depth = self.open.len() - 1;
        let current = &mut self.open[depth];
        let node = &mut s.graph[current.id];
        node.apply_bag(&sheet.find(&self.path));
        node.apply_bag(&current.inline);
        current.sheets.push(sheet);
        debug!("stylesheet attached at {}", self.path);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Behaviours
    // ─────────────────────────────────────────────────────────────────────────

    fn behaviour_entry_start<R: BufRead>(
        &mut self,
        s: &mut Session<'_, R>,
        name: CompactString,
        self_closing: bool,
    ) -> ParseResult<()> {
        let Mode::InBehaviours { entry, .. } = &mut self.mode else {
            return Ok(());
        };
        if let Some((open, _)) = entry {
            return Err(ParseError::malformed(
                format!("unexpected <{name}> inside behaviour <{open}>"),
                s.reader.position(),
            ));
        }
        if self_closing {
            debug!("behaviour <{name}/> has no value, skipped");
        } else {
            *entry = Some((name, String::new()));
        }
        Ok(())
    }

    fn attach_behaviour<R: BufRead>(
        &mut self,
        s: &mut Session<'_, R>,
        owner: NodeId,
        name: &str,
        value: &str,
    ) -> ParseResult<()> {
        let value = value.trim();
        if value.is_empty() {
            debug!("behaviour '{name}' has no value, skipped");
            return Ok(());
        }
        let behaviour = s.services.behaviours.create(name, value)?;
        s.graph[owner].behaviours.push(behaviour);
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Placeholders
    // ─────────────────────────────────────────────────────────────────────────

    /// Run a nested scope over the slot body and graft its first top-level
    /// node into `owner`'s slot.
    fn parse_placeholder<R: BufRead>(
        &mut self,
        s: &mut Session<'_, R>,
        owner: NodeId,
        slot: CompactString,
        self_closing: bool,
    ) -> ParseResult<()> {
        if !s.graph[owner].supports_placeholder(&slot) {
            return Err(ParseError::UnsupportedPlaceholder {
                slot,
                tag: s.graph[owner].tag.clone(),
            });
        }
        if self_closing {
            return Ok(());
        }

        let container = s.graph.add(Node::root());
        let mut nested = Scope::new(slot.clone(), container);
        debug!("placeholder scope <{slot}> opened for {owner}");
        nested.run(s)?;
        nested.finish(s)?;

        let children = &s.graph[container].children;
        if children.len() > 1 {
            warn!(
                "placeholder <{slot}> has {} top-level nodes, keeping the first",
                children.len()
            );
        }
        let first = children.first().copied();
        if let Some(first) = first {
            s.graph.set_placeholder(owner, &slot, first);
        }
        debug!("placeholder scope <{slot}> closed");
        Ok(())
    }

    fn end_placeholders<R: BufRead>(&mut self, s: &mut Session<'_, R>, owner: NodeId) -> ParseResult<()> {
        self.mode = Mode::Normal;
        self.notify(s, Notify::EndPlaceholders, owner)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Listeners
    // ─────────────────────────────────────────────────────────────────────────

    fn notify<R>(&self, s: &mut Session<'_, R>, event: Notify, node: NodeId) -> ParseResult<()> {
        let root = self.root();
        let (document, graph) = (&*s.document, &*s.graph);
        for listener in s.listeners.iter_mut() {
            let result = match event {
                Notify::Start => listener.on_start_node(document, graph, root, node),
                Notify::End => listener.on_end_node(document, graph, root, node),
                Notify::EndPlaceholders => listener.on_end_placeholders(document, graph, root, node),
            };
            result.map_err(ParseError::Listener)?;
        }
        Ok(())
    }
}

/// Strip line breaks and tabs; trim leading whitespace unless the text
/// continues a previous run.
fn normalize_text(raw: &str, continuing: bool) -> String {
    let stripped: String = raw.chars().filter(|c| !matches!(c, '\n' | '\r' | '\t')).collect();
    if continuing {
        stripped
    } else {
        stripped.trim_start().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text() {
        assert_eq!(normalize_text("\n   Hello\tworld\n", false), "Helloworld");
        assert_eq!(normalize_text(" there", true), " there");
        assert_eq!(normalize_text(" there", false), "there");
        assert_eq!(normalize_text("\n\t", true), "");
        assert_eq!(normalize_text("  \n  ", false), "");
    }
}
