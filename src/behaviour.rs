//! Behaviours: named, value-carrying annotations attached to nodes.
//!
//! The parser only constructs them; interpreting a behaviour (emitting a link
//! annotation, an outline destination, ...) is up to a later stage.
//!
//! Two markup forms produce the same objects:
//!
//! ```text
//! <span href="https://example.com">inline attribute</span>
//! <span><behaviours><href>https://example.com</href></behaviours>sub-block</span>
//! ```

use std::fmt::Debug;

use crate::error::BehaviourError;

// =============================================================================
// Behaviour
// =============================================================================

/// A constructed behaviour, immutable once attached.
pub trait Behaviour: Debug + Send + Sync {
    /// Name the behaviour was declared with
    fn name(&self) -> &str;

    /// Declared value
    fn value(&self) -> &str;
}

/// Builds behaviours from (name, value) declarations.
pub trait BehaviourFactory: Send + Sync {
    /// Attribute / sub-block element names recognized as behaviours
    fn supported_names(&self) -> &[&str];

    /// Construct a behaviour; `name` is one of `supported_names()`
    fn create(&self, name: &str, value: &str) -> Result<Box<dyn Behaviour>, BehaviourError>;

    /// Check if a name is a recognized behaviour name
    fn supports(&self, name: &str) -> bool {
        self.supported_names().contains(&name)
    }
}

// =============================================================================
// Standard behaviours
// =============================================================================

/// External hyperlink (`href`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBehaviour {
    pub url: String,
}

/// Jump to a named destination inside the document (`goto`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GoToBehaviour {
    pub destination: String,
}

/// Sticky-note annotation (`annotation`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotationBehaviour {
    pub note: String,
}

impl Behaviour for LinkBehaviour {
    fn name(&self) -> &str {
        "href"
    }

    fn value(&self) -> &str {
        &self.url
    }
}

impl Behaviour for GoToBehaviour {
    fn name(&self) -> &str {
        "goto"
    }

    fn value(&self) -> &str {
        &self.destination
    }
}

impl Behaviour for AnnotationBehaviour {
    fn name(&self) -> &str {
        "annotation"
    }

    fn value(&self) -> &str {
        &self.note
    }
}

/// Factory for `href`, `goto` and `annotation`.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardBehaviourFactory;

impl StandardBehaviourFactory {
    pub const NAMES: &'static [&'static str] = &["href", "goto", "annotation"];
}

impl BehaviourFactory for StandardBehaviourFactory {
    fn supported_names(&self) -> &[&str] {
        Self::NAMES
    }

    fn create(&self, name: &str, value: &str) -> Result<Box<dyn Behaviour>, BehaviourError> {
        let value = value.trim();
        if value.is_empty() {
            return Err(BehaviourError::new(name, "empty value"));
        }
        match name {
            "href" if value.contains(char::is_whitespace) => {
                Err(BehaviourError::new(name, format!("invalid url '{value}'")))
            }
            "href" => Ok(Box::new(LinkBehaviour { url: value.to_string() })),
            "goto" => Ok(Box::new(GoToBehaviour {
                destination: value.to_string(),
            })),
            "annotation" => Ok(Box::new(AnnotationBehaviour {
                note: value.to_string(),
            })),
            other => Err(BehaviourError::new(other, "unsupported behaviour")),
        }
    }
}
