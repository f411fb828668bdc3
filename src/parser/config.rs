//! Parser configuration: reserved names of the markup language.

use compact_str::CompactString;

/// Reserved tag and attribute names.
///
/// The defaults describe the standard language:
///
/// ```text
/// <pdf title="...">                      root (any name), attributes become metadata
///   <stylesheet>div { x: 1 }</stylesheet>
///   <page id="p1" class="wide">
///     <placeholders><header>...</header></placeholders>
///   </page>
///   <page extends="p1"/>
///   <span><behaviours><goto>intro</goto></behaviours>see intro</span>
/// </pdf>
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Declares an identifier
    pub id_attr: CompactString,
    /// Clones a previously declared node
    pub extends_attr: CompactString,
    /// Space-separated classes for cascade matching
    pub class_attr: CompactString,
    /// Block whose body goes to the cascade rule parser
    pub stylesheet_tag: CompactString,
    /// Block whose children fill placeholder slots
    pub placeholders_tag: CompactString,
    /// Block whose children declare behaviours
    pub behaviours_tag: CompactString,
    /// Tag given to text runs created from bare character data
    pub text_tag: CompactString,
}

impl ParserConfig {
    /// Standard names.
    pub const DEFAULT: Self = Self {
        id_attr: CompactString::const_new("id"),
        extends_attr: CompactString::const_new("extends"),
        class_attr: CompactString::const_new("class"),
        stylesheet_tag: CompactString::const_new("stylesheet"),
        placeholders_tag: CompactString::const_new("placeholders"),
        behaviours_tag: CompactString::const_new("behaviours"),
        text_tag: CompactString::const_new("text"),
    };

    pub fn new() -> Self {
        Self::DEFAULT
    }

    /// Set the tag used for bare text runs.
    pub fn with_text_tag(mut self, tag: impl Into<CompactString>) -> Self {
        self.text_tag = tag.into();
        self
    }

    /// Rename the identifier / extends / class attributes.
    pub fn with_identity_attrs(
        mut self,
        id: impl Into<CompactString>,
        extends: impl Into<CompactString>,
        class: impl Into<CompactString>,
    ) -> Self {
        self.id_attr = id.into();
        self.extends_attr = extends.into();
        self.class_attr = class.into();
        self
    }

    /// Check if an attribute name is consumed by the parser itself
    pub fn is_reserved_attr(&self, name: &str) -> bool {
        self.id_attr == name || self.extends_attr == name || self.class_attr == name
    }
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
