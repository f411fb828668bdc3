//! Cascade resolution: tag paths in, attribute bags out.
//!
//! - `TagPath`: the ordered (tag, classes) entries currently open
//! - `CascadeRuleSet`: pre-parsed rules queried per node, never mutated
//! - `CascadeRuleParser`: turns a `stylesheet` block body into a rule set
//!
//! The crate ships a small rule language (`stylesheet`) and a memoizing
//! wrapper (`cache`); any other rule engine plugs in through the traits.

mod cache;
mod stylesheet;

pub use cache::CachedCascade;
pub use stylesheet::{Rule, Selector, StyleSheet, StyleSheetParser};

use std::fmt;

use compact_str::CompactString;
use smallvec::SmallVec;

use crate::attr::Bag;
use crate::error::StyleSheetError;
use crate::factory::EnhancementFactory;

// =============================================================================
// Tag path
// =============================================================================

/// One open element: tag name plus the classes from its `class` attribute.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathEntry {
    pub tag: CompactString,
    pub classes: SmallVec<[CompactString; 2]>,
}

impl PathEntry {
    pub fn new(tag: impl Into<CompactString>) -> Self {
        Self {
            tag: tag.into(),
            classes: SmallVec::new(),
        }
    }

    /// Entry with classes split from a space-separated `class` value
    pub fn with_classes(tag: impl Into<CompactString>, class_attr: &str) -> Self {
        Self {
            tag: tag.into(),
            classes: class_attr.split_whitespace().map(CompactString::from).collect(),
        }
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }
}

impl fmt::Display for PathEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tag)?;
        for class in &self.classes {
            write!(f, ".{class}")?;
        }
        Ok(())
    }
}

/// The ordered sequence of currently open entries, outermost first.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct TagPath {
    entries: SmallVec<[PathEntry; 8]>,
}

impl TagPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: PathEntry) {
        self.entries.push(entry);
    }

    pub fn pop(&mut self) -> Option<PathEntry> {
        self.entries.pop()
    }

    pub fn last(&self) -> Option<&PathEntry> {
        self.entries.last()
    }

    pub fn entries(&self) -> &[PathEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for TagPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.entries.is_empty() {
            return f.write_str("(top)");
        }
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" > ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}

impl<E: Into<PathEntry>> FromIterator<E> for TagPath {
    fn from_iter<I: IntoIterator<Item = E>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<&str> for PathEntry {
    /// `"div.note.wide"` → tag `div`, classes `note`, `wide`
    fn from(text: &str) -> Self {
        let mut parts = text.split('.');
        let tag = parts.next().unwrap_or_default();
        Self {
            tag: tag.into(),
            classes: parts.filter(|c| !c.is_empty()).map(CompactString::from).collect(),
        }
    }
}

// =============================================================================
// Traits
// =============================================================================

/// External set of rules mapping tag paths to bags.
pub trait CascadeRuleSet: Send + Sync {
    /// Merged bag of every rule matching `path` (its last entry is the node)
    fn find(&self, path: &TagPath) -> Bag;
}

/// Parses the body of a `stylesheet` block.
pub trait CascadeRuleParser: Send + Sync {
    fn parse(
        &self,
        body: &str,
        enhancements: &dyn EnhancementFactory,
    ) -> Result<Box<dyn CascadeRuleSet>, StyleSheetError>;
}

impl<C: CascadeRuleSet + ?Sized> CascadeRuleSet for &C {
    fn find(&self, path: &TagPath) -> Bag {
        (**self).find(path)
    }
}

impl<C: CascadeRuleSet + ?Sized> CascadeRuleSet for Box<C> {
    fn find(&self, path: &TagPath) -> Bag {
        (**self).find(path)
    }
}
