//! Attribute system for document nodes
//!
//! - `Attrs`: ordered plain attributes, `Vec<(String, String)>`
//! - `Enhancements`: enhancement name → parameter attrs, mergeable
//! - `Bag`: the pair of both, produced by cascade lookup or inline markup

use compact_str::CompactString;

use crate::factory::EnhancementFactory;

/// Node attributes as simple key-value pairs, in insertion order.
pub type Attrs = Vec<(String, String)>;

/// Extension trait for attribute operations on Attrs
pub trait AttrsExt {
    /// Get an attribute value by name
    fn get_attr(&self, name: &str) -> Option<&str>;

    /// Check if an attribute exists
    fn has_attr(&self, name: &str) -> bool;

    /// Set an attribute value (insert or update)
    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>);

    /// Remove an attribute by name, returning the old value if present
    fn remove_attr(&mut self, name: &str) -> Option<String>;

    /// Set every attribute of `other`, overriding existing values
    fn merge_attrs(&mut self, other: &Attrs);
}

impl AttrsExt for Attrs {
    fn get_attr(&self, name: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn has_attr(&self, name: &str) -> bool {
        self.iter().any(|(k, _)| k == name)
    }

    fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(attr) = self.iter_mut().find(|(k, _)| k == &name) {
            attr.1 = value;
        } else {
            self.push((name, value));
        }
    }

    fn remove_attr(&mut self, name: &str) -> Option<String> {
        self.iter()
            .position(|(k, _)| k == name)
            .map(|pos| self.remove(pos).1)
    }

    fn merge_attrs(&mut self, other: &Attrs) {
        for (name, value) in other {
            self.set_attr(name.as_str(), value.as_str());
        }
    }
}

// =============================================================================
// Enhancements
// =============================================================================

/// Enhancement parameters keyed by enhancement name.
///
/// Merging is parameter-wise: merging `border{width=2}` into
/// `border{width=1, color=red}` yields `border{width=2, color=red}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Enhancements {
    entries: Vec<(CompactString, Attrs)>,
}

impl Enhancements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parameters of one enhancement, if present
    pub fn get(&self, name: &str) -> Option<&Attrs> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, params)| params)
    }

    /// Set one parameter of an enhancement, creating the enhancement if needed
    pub fn set_param(&mut self, name: &str, param: impl Into<String>, value: impl Into<String>) {
        self.entry(name).set_attr(param, value);
    }

    /// Merge another set into this one, `other` winning per parameter
    pub fn merge(&mut self, other: &Enhancements) {
        for (name, params) in &other.entries {
            self.entry(name).merge_attrs(params);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Attrs)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p))
    }

    fn entry(&mut self, name: &str) -> &mut Attrs {
        let pos = match self.entries.iter().position(|(n, _)| n == name) {
            Some(pos) => pos,
            None => {
                self.entries.push((name.into(), Attrs::new()));
                self.entries.len() - 1
            }
        };
        &mut self.entries[pos].1
    }
}

// =============================================================================
// Bag
// =============================================================================

/// Plain attributes plus enhancement parameters, applied to a node as one unit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bag {
    pub attrs: Attrs,
    pub enhancements: Enhancements,
}

impl Bag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a declaration, routing `enhancement.param` names to the
    /// enhancement map when the factory knows the enhancement.
    pub fn insert(&mut self, name: &str, value: impl Into<String>, factory: &dyn EnhancementFactory) {
        match split_enhancement(name, factory) {
            Some((enhancement, param)) => self.enhancements.set_param(enhancement, param, value),
            None => self.attrs.set_attr(name, value),
        }
    }

    /// Merge `other` over this bag
    pub fn merge(&mut self, other: &Bag) {
        self.attrs.merge_attrs(&other.attrs);
        self.enhancements.merge(&other.enhancements);
    }

    pub fn is_empty(&self) -> bool {
        self.attrs.is_empty() && self.enhancements.is_empty()
    }
}

/// Split `border.width` into `("border", "width")` if `border` is a known enhancement.
fn split_enhancement<'a>(name: &'a str, factory: &dyn EnhancementFactory) -> Option<(&'a str, &'a str)> {
    let (enhancement, param) = name.split_once('.')?;
    if param.is_empty() || !factory.is_enhancement(enhancement) {
        return None;
    }
    Some((enhancement, param))
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::factory::StandardEnhancementFactory;

    #[test]
    fn test_attrs_operations() {
        let mut attrs: Attrs = Vec::new();

        attrs.set_attr("color", "red");
        attrs.set_attr("align", "left");
        assert_eq!(attrs.len(), 2);
        assert_eq!(attrs.get_attr("color"), Some("red"));
        assert_eq!(attrs.get_attr("width"), None);
        assert!(attrs.has_attr("align"));

        // Update existing keeps position
        attrs.set_attr("color", "blue");
        assert_eq!(attrs[0], ("color".to_string(), "blue".to_string()));
        assert_eq!(attrs.len(), 2);

        let removed = attrs.remove_attr("color");
        assert_eq!(removed.as_deref(), Some("blue"));
        assert!(!attrs.has_attr("color"));
        assert_eq!(attrs.len(), 1);
    }

    #[test]
    fn test_enhancements_merge_per_param() {
        let mut base = Enhancements::new();
        base.set_param("border", "width", "1");
        base.set_param("border", "color", "red");

        let mut over = Enhancements::new();
        over.set_param("border", "width", "2");
        over.set_param("shadow", "depth", "3");

        base.merge(&over);
        let border = base.get("border").unwrap();
        assert_eq!(border.get_attr("width"), Some("2"));
        assert_eq!(border.get_attr("color"), Some("red"));
        assert_eq!(base.get("shadow").unwrap().get_attr("depth"), Some("3"));
        assert_eq!(base.len(), 2);
    }

    #[test]
    fn test_bag_routes_enhancement_params() {
        let factory = StandardEnhancementFactory;
        let mut bag = Bag::new();
        bag.insert("border.width", "2", &factory);
        bag.insert("font.size", "12", &factory);
        bag.insert("color", "red", &factory);

        assert_eq!(bag.enhancements.get("border").unwrap().get_attr("width"), Some("2"));
        // `font` is not an enhancement, the dotted name stays a plain attribute
        assert_eq!(bag.attrs.get_attr("font.size"), Some("12"));
        assert_eq!(bag.attrs.get_attr("color"), Some("red"));
    }

    #[test]
    fn test_bag_merge_overrides() {
        let factory = StandardEnhancementFactory;
        let mut cascade = Bag::new();
        cascade.insert("x", "1", &factory);
        cascade.insert("y", "1", &factory);

        let mut inline = Bag::new();
        inline.insert("x", "2", &factory);

        cascade.merge(&inline);
        assert_eq!(cascade.attrs.get_attr("x"), Some("2"));
        assert_eq!(cascade.attrs.get_attr("y"), Some("1"));
    }
}
