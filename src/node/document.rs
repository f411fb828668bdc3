//! Document-level metadata
//!
//! Filled from the root element's attributes; outlives any single parse.

use crate::attr::{Attrs, AttrsExt};

// =============================================================================
// Document
// =============================================================================

/// Root-level metadata sink (string key → string value).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    metadata: Attrs,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a metadata entry, replacing an earlier value
    pub fn set_metadata(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.metadata.set_attr(key, value);
    }

    /// Get a metadata value
    pub fn metadata(&self, key: &str) -> Option<&str> {
        self.metadata.get_attr(key)
    }

    /// All metadata entries in the order they were first set
    pub fn metadata_entries(&self) -> &Attrs {
        &self.metadata
    }

    pub fn clear(&mut self) {
        self.metadata.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata() {
        let mut doc = Document::new();
        doc.set_metadata("title", "T");
        doc.set_metadata("author", "A");
        doc.set_metadata("title", "U");

        assert_eq!(doc.metadata("title"), Some("U"));
        assert_eq!(doc.metadata("subject"), None);
        assert_eq!(doc.metadata_entries().len(), 2);

        doc.clear();
        assert!(doc.metadata_entries().is_empty());
    }
}
