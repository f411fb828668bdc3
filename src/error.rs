//! Error types for pdfmark.
//!
//! Every failure aborts the whole parse; no partial graph is usable afterwards.

use compact_str::CompactString;
use thiserror::Error;

/// Errors that can occur while turning markup into a node graph.
#[derive(Debug, Error)]
pub enum ParseError {
    /// Structurally invalid input: unbalanced tags, unreadable stream,
    /// premature end of input
    #[error("malformed markup at byte {position}: {message}")]
    MalformedMarkup {
        /// What went wrong
        message: String,
        /// Byte offset in the source where the reader stopped
        position: u64,
    },

    /// The node factory does not know this element name
    #[error("unknown tag <{tag}> at {path}")]
    UnknownTag {
        /// Offending tag name
        tag: CompactString,
        /// Rendered tag stack at the point of failure
        path: String,
    },

    /// `extends` names an identifier not registered in the current scope
    #[error("unknown identifier '{id}' referenced at {path}")]
    UnknownIdentifier {
        /// Missing identifier
        id: CompactString,
        /// Rendered tag stack at the point of failure
        path: String,
    },

    /// The enclosing node type declares no slot with this name
    #[error("placeholder '{slot}' is not supported by <{tag}>")]
    UnsupportedPlaceholder {
        /// Requested slot name
        slot: CompactString,
        /// Tag of the enclosing node
        tag: CompactString,
    },

    /// The same identifier was declared twice in one scope
    #[error("identifier '{id}' is already declared in this scope")]
    DuplicateIdentifier {
        /// Duplicated identifier
        id: CompactString,
    },

    /// A `stylesheet` body was rejected by the rule parser
    #[error(transparent)]
    StyleSheet(#[from] StyleSheetError),

    /// A behaviour value was rejected by the behaviour factory
    #[error(transparent)]
    Behaviour(#[from] BehaviourError),

    /// A listener callback failed
    #[error("listener failed: {0}")]
    Listener(#[source] Box<dyn std::error::Error + Send + Sync>),
}

/// Result type alias for parse operations.
pub type ParseResult<T> = Result<T, ParseError>;

impl ParseError {
    /// Create a malformed-markup error at a byte position.
    pub fn malformed(message: impl Into<String>, position: u64) -> Self {
        Self::MalformedMarkup {
            message: message.into(),
            position,
        }
    }

    /// Check if this error came from the markup structure itself.
    pub fn is_malformed(&self) -> bool {
        matches!(self, Self::MalformedMarkup { .. })
    }
}

/// Rule-language error reported by a stylesheet parser.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("stylesheet error at line {line}: {message}")]
pub struct StyleSheetError {
    /// 1-based line within the stylesheet body
    pub line: usize,
    /// What went wrong
    pub message: String,
}

impl StyleSheetError {
    pub fn new(line: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            message: message.into(),
        }
    }
}

/// Error from a behaviour factory refusing a (name, value) pair.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("behaviour '{name}': {reason}")]
pub struct BehaviourError {
    /// Behaviour name
    pub name: CompactString,
    /// Why the value was refused
    pub reason: String,
}

impl BehaviourError {
    pub fn new(name: impl Into<CompactString>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
