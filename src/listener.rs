//! Listener notification protocol.
//!
//! Observers are invoked synchronously, in registration order:
//!
//! - `on_start_node`: the node is attributed, cascade-resolved and linked into
//!   its parent; its children are not parsed yet
//! - `on_end_node`: all children (including a trailing implicit paragraph)
//!   are closed; never fired for the scope's own terminating tag
//! - `on_end_placeholders`: a `placeholders` block closed; `node` is the
//!   enclosing node
//!
//! `root` is the root container of the scope that produced the event, which
//! differs from the document root inside placeholder bodies.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::node::{Document, Graph, NodeId};

/// Result of a listener callback; an error aborts the parse.
pub type ListenerResult = Result<(), Box<dyn std::error::Error + Send + Sync>>;

/// Observer of node construction.
#[allow(unused_variables)]
pub trait ParseListener: Send {
    fn on_start_node(&mut self, doc: &Document, graph: &Graph, root: NodeId, node: NodeId) -> ListenerResult {
        Ok(())
    }

    fn on_end_node(&mut self, doc: &Document, graph: &Graph, root: NodeId, node: NodeId) -> ListenerResult {
        Ok(())
    }

    fn on_end_placeholders(&mut self, doc: &Document, graph: &Graph, root: NodeId, node: NodeId) -> ListenerResult {
        Ok(())
    }
}

// =============================================================================
// EventLog
// =============================================================================

/// Kind of a recorded event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    StartNode,
    EndNode,
    EndPlaceholders,
}

/// One recorded listener event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseEvent {
    pub kind: EventKind,
    pub node: NodeId,
    pub root: NodeId,
    /// Tag of the node at the time of the event
    pub tag: String,
}

impl ParseEvent {
    /// Short form used in assertions: `+div`, `-div`, `!page`
    pub fn label(&self) -> String {
        let sign = match self.kind {
            EventKind::StartNode => '+',
            EventKind::EndNode => '-',
            EventKind::EndPlaceholders => '!',
        };
        format!("{sign}{}", self.tag)
    }
}

/// Listener recording every event into a shared buffer.
///
/// Clone it before handing it to a parser to keep a handle on the events.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<ParseEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded events
    pub fn events(&self) -> Vec<ParseEvent> {
        self.events.lock().clone()
    }

    /// Recorded events as `label()` strings
    pub fn labels(&self) -> Vec<String> {
        self.events.lock().iter().map(ParseEvent::label).collect()
    }

    pub fn clear(&self) {
        self.events.lock().clear();
    }

    fn record(&self, kind: EventKind, graph: &Graph, root: NodeId, node: NodeId) -> ListenerResult {
        self.events.lock().push(ParseEvent {
            kind,
            node,
            root,
            tag: graph[node].tag.to_string(),
        });
        Ok(())
    }
}

impl ParseListener for EventLog {
    fn on_start_node(&mut self, _doc: &Document, graph: &Graph, root: NodeId, node: NodeId) -> ListenerResult {
        self.record(EventKind::StartNode, graph, root, node)
    }

    fn on_end_node(&mut self, _doc: &Document, graph: &Graph, root: NodeId, node: NodeId) -> ListenerResult {
        self.record(EventKind::EndNode, graph, root, node)
    }

    fn on_end_placeholders(&mut self, _doc: &Document, graph: &Graph, root: NodeId, node: NodeId) -> ListenerResult {
        self.record(EventKind::EndPlaceholders, graph, root, node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Node, NodeKind};

    #[test]
    fn test_event_log_shares_buffer() {
        let mut graph = Graph::new();
        let root = graph.add(Node::root());
        let div = graph.add(Node::new("div", NodeKind::Block));
        let doc = Document::new();

        let log = EventLog::new();
        let mut handle: Box<dyn ParseListener> = Box::new(log.clone());
        handle.on_start_node(&doc, &graph, root, div).unwrap();
        handle.on_end_placeholders(&doc, &graph, root, div).unwrap();
        handle.on_end_node(&doc, &graph, root, div).unwrap();

        assert_eq!(log.labels(), vec!["+div", "!div", "-div"]);
        assert_eq!(log.events()[0].root, root);
        log.clear();
        assert!(log.events().is_empty());
    }

    #[test]
    fn test_event_log_is_send_sync() {
        static_assertions::assert_impl_all!(EventLog: Send, Sync);
    }
}
