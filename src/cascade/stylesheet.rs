//! Minimal rule language for `stylesheet` blocks
//!
//! ```text
//! /* comments are ignored */
//! div.note b, em { color: red; border.width: 2 }
//! *              { font-size: 10 }
//! ```
//!
//! Selectors are descendant chains of compounds (`*`, `tag`, `.class`,
//! `tag.class.other`). Matching rules apply in ascending
//! (specificity, source order), so later and more specific rules win.

use compact_str::CompactString;
use smallvec::SmallVec;

use super::{CascadeRuleParser, CascadeRuleSet, PathEntry, TagPath};
use crate::attr::Bag;
use crate::error::StyleSheetError;
use crate::factory::EnhancementFactory;

// =============================================================================
// Selector
// =============================================================================

/// One compound: optional tag (None = any) plus required classes.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Compound {
    tag: Option<CompactString>,
    classes: SmallVec<[CompactString; 2]>,
}

impl Compound {
    fn parse(token: &str) -> Option<Self> {
        let mut parts = token.split('.');
        let tag = match parts.next()? {
            "" | "*" => None,
            tag if is_ident(tag) => Some(CompactString::from(tag)),
            _ => return None,
        };
        let mut classes = SmallVec::new();
        for class in parts {
            if !is_ident(class) {
                return None;
            }
            classes.push(CompactString::from(class));
        }
        if tag.is_none() && classes.is_empty() && token != "*" {
            return None;
        }
        Some(Self { tag, classes })
    }

    fn matches(&self, entry: &PathEntry) -> bool {
        self.tag.as_ref().is_none_or(|t| *t == entry.tag)
            && self.classes.iter().all(|c| entry.has_class(c))
    }
}

fn is_ident(s: &str) -> bool {
    !s.is_empty()
        && s.chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

/// Descendant chain of compounds, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    compounds: SmallVec<[Compound; 4]>,
}

impl Selector {
    /// Parse a selector such as `page div.note b`
    pub fn parse(text: &str) -> Option<Self> {
        let compounds = text
            .split_whitespace()
            .map(Compound::parse)
            .collect::<Option<SmallVec<[Compound; 4]>>>()?;
        if compounds.is_empty() {
            return None;
        }
        Some(Self { compounds })
    }

    /// (class count, tag count); compared lexicographically
    pub fn specificity(&self) -> (usize, usize) {
        self.compounds.iter().fold((0, 0), |(classes, tags), c| {
            (classes + c.classes.len(), tags + usize::from(c.tag.is_some()))
        })
    }

    /// The last compound must match the node itself, earlier ones must match
    /// ancestors in order (not necessarily adjacent).
    pub fn matches(&self, path: &TagPath) -> bool {
        let entries = path.entries();
        let Some((subject, ancestors)) = self.compounds.split_last() else {
            return false;
        };
        let Some((node, mut rest)) = entries.split_last() else {
            return false;
        };
        if !subject.matches(node) {
            return false;
        }
        for compound in ancestors.iter().rev() {
            match rest.iter().rposition(|entry| compound.matches(entry)) {
                Some(pos) => rest = &rest[..pos],
                None => return false,
            }
        }
        true
    }
}

// =============================================================================
// StyleSheet
// =============================================================================

/// One rule: selectors sharing a declaration bag.
#[derive(Debug, Clone)]
pub struct Rule {
    pub selectors: Vec<Selector>,
    pub bag: Bag,
}

impl Rule {
    /// Highest specificity among the selectors matching `path`
    fn match_specificity(&self, path: &TagPath) -> Option<(usize, usize)> {
        self.selectors
            .iter()
            .filter(|s| s.matches(path))
            .map(Selector::specificity)
            .max()
    }
}

/// Parsed rule set, in source order.
#[derive(Debug, Clone, Default)]
pub struct StyleSheet {
    rules: Vec<Rule>,
}

impl StyleSheet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a rule-language source
    pub fn parse(source: &str, enhancements: &dyn EnhancementFactory) -> Result<Self, StyleSheetError> {
        RuleReader::new(source).read_all(enhancements)
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl CascadeRuleSet for StyleSheet {
    fn find(&self, path: &TagPath) -> Bag {
        let mut matched: Vec<((usize, usize), usize)> = self
            .rules
            .iter()
            .enumerate()
            .filter_map(|(order, rule)| rule.match_specificity(path).map(|spec| (spec, order)))
            .collect();
        matched.sort_unstable();

        let mut bag = Bag::new();
        for (_, order) in matched {
            bag.merge(&self.rules[order].bag);
        }
        bag
    }
}

/// `CascadeRuleParser` producing `StyleSheet`s.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyleSheetParser;

impl CascadeRuleParser for StyleSheetParser {
    fn parse(
        &self,
        body: &str,
        enhancements: &dyn EnhancementFactory,
    ) -> Result<Box<dyn CascadeRuleSet>, StyleSheetError> {
        Ok(Box::new(StyleSheet::parse(body, enhancements)?))
    }
}

// =============================================================================
// RuleReader
// =============================================================================

/// Cursor over comment-stripped source, tracking offsets for line numbers.
struct RuleReader {
    text: String,
    pos: usize,
}

impl RuleReader {
    fn new(source: &str) -> Self {
        Self {
            text: strip_comments(source),
            pos: 0,
        }
    }

    fn line_at(&self, offset: usize) -> usize {
        self.text[..offset.min(self.text.len())].matches('\n').count() + 1
    }

    fn error(&self, offset: usize, message: impl Into<String>) -> StyleSheetError {
        StyleSheetError::new(self.line_at(offset), message)
    }

    fn read_all(mut self, enhancements: &dyn EnhancementFactory) -> Result<StyleSheet, StyleSheetError> {
        let mut sheet = StyleSheet::new();
        while let Some(rule) = self.read_rule(enhancements)? {
            sheet.push(rule);
        }
        Ok(sheet)
    }

    fn read_rule(&mut self, enhancements: &dyn EnhancementFactory) -> Result<Option<Rule>, StyleSheetError> {
        let pending = &self.text[self.pos..];
        if pending.trim().is_empty() {
            return Ok(None);
        }
        let start = self.pos + (pending.len() - pending.trim_start().len());
        let rest = &self.text[start..];
        let Some(open) = rest.find('{') else {
            return Err(self.error(start, "expected '{' after selector"));
        };
        let Some(close) = rest[open..].find('}').map(|c| open + c) else {
            return Err(self.error(start + open, "unclosed '{'"));
        };

        let selector_text = &rest[..open];
        let selectors = selector_text
            .split(',')
            .map(|s| {
                Selector::parse(s)
                    .ok_or_else(|| self.error(start, format!("invalid selector '{}'", s.trim())))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut bag = Bag::new();
        let body_start = start + open + 1;
        for decl in rest[open + 1..close].split(';') {
            let decl = decl.trim();
            if decl.is_empty() {
                continue;
            }
            let Some((name, value)) = decl.split_once(':') else {
                return Err(self.error(body_start, format!("expected ':' in '{decl}'")));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(self.error(body_start, "empty property name"));
            }
            bag.insert(name, value.trim(), enhancements);
        }

        self.pos = start + close + 1;
        Ok(Some(Rule { selectors, bag }))
    }
}

/// Replace `/* ... */` comments with spaces, keeping newlines for line numbers.
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;
    while let Some(start) = rest.find("/*") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        let (comment, tail) = match after.find("*/") {
            Some(end) => (&after[..end], &after[end + 2..]),
            None => (after, ""),
        };
        out.extend(comment.chars().filter(|c| *c == '\n'));
        out.push(' ');
        rest = tail;
    }
    out.push_str(rest);
    out
}

// =============================================================================
// Tests
// =============================================================================
