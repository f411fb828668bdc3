//! Identifier registry for one parse scope.
//!
//! Every parse scope (the top-level document, each placeholder body) owns its
//! own registry, so identifiers never leak between scopes.

use compact_str::CompactString;
use rustc_hash::FxHashMap;

use crate::error::{ParseError, ParseResult};
use crate::node::NodeId;

/// Maps declared identifiers to nodes of the current scope.
#[derive(Debug, Default)]
pub struct IdentifierRegistry {
    ids: FxHashMap<CompactString, NodeId>,
}

impl IdentifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `id`; a second declaration in the same scope fails
    pub fn register(&mut self, id: &str, node: NodeId) -> ParseResult<()> {
        if self.ids.contains_key(id) {
            return Err(ParseError::DuplicateIdentifier { id: id.into() });
        }
        self.ids.insert(id.into(), node);
        Ok(())
    }

    /// Look up a declared identifier
    pub fn get(&self, id: &str) -> Option<NodeId> {
        self.ids.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
