//! Pattern rules for syntax highlighting
//!
//! This module defines the rule types used to classify source text.
//! A `Rule` pairs a regex with one or more capture-group assignments;
//! a `RuleSet` is an ordered list of rules where order decides which
//! category wins on overlapping text. `MultilineRule` covers the
//! syntactic constructs (comments, strings) that can span lines.

use regex::Regex;
use tracing::debug;

use super::category::Category;
use super::markup::{HighlightedSpan, LineMarkup};
use crate::error::{HighlightError, Result};

/// What to do when a highlight lands on text that already has a category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Override {
    /// Leave the range alone if any byte of it is already categorized
    #[default]
    Skip,
    /// Overwrite whatever is there
    Replace,
    /// Fill only the bytes that have no category yet
    Keep,
}

/// One capture group to category assignment
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Highlight {
    /// Capture group index (0 = whole match)
    pub group: usize,
    /// Category to assign
    pub category: Category,
    /// Override policy
    pub override_mode: Override,
    /// Tolerate the group not participating in the match
    pub laxmatch: bool,
}

impl Highlight {
    /// Create a highlight with the default (skip) override policy
    pub fn new(group: usize, category: Category) -> Self {
        Self {
            group,
            category,
            override_mode: Override::Skip,
            laxmatch: false,
        }
    }

    /// Builder: set the override policy
    pub fn override_mode(mut self, mode: Override) -> Self {
        self.override_mode = mode;
        self
    }

    /// Builder: allow the group to be absent from a match
    pub fn lax(mut self) -> Self {
        self.laxmatch = true;
        self
    }
}

/// A single-line pattern rule
///
/// Every non-overlapping match of `pattern` in a line applies each of
/// the rule's highlights, in order.
#[derive(Debug, Clone)]
pub struct Rule {
    /// Name for debugging
    pub name: String,
    /// Compiled regex pattern
    pub pattern: Regex,
    /// Assignments made for each match
    pub highlights: Vec<Highlight>,
}

impl Rule {
    /// Compile a rule with no highlights yet
    pub fn new(name: &str, pattern: &str) -> Result<Self> {
        let pattern = Regex::new(pattern).map_err(|source| HighlightError::InvalidPattern {
            rule: name.to_string(),
            source,
        })?;
        Ok(Self {
            name: name.to_string(),
            pattern,
            highlights: Vec::new(),
        })
    }

    /// Builder: assign `category` to `group` with the default policy
    pub fn highlight(self, group: usize, category: Category) -> Self {
        self.with(Highlight::new(group, category))
    }

    /// Builder: add a fully specified highlight
    pub fn with(mut self, highlight: Highlight) -> Self {
        self.highlights.push(highlight);
        self
    }

    /// Number of capture groups in the pattern (excluding group 0)
    pub fn group_count(&self) -> usize {
        self.pattern.captures_len() - 1
    }

    /// Check every highlight refers to a group the pattern has
    pub fn validate(&self) -> Result<()> {
        let groups = self.group_count();
        match self.highlights.iter().find(|h| h.group > groups) {
            Some(bad) => Err(HighlightError::NoSuchGroup {
                rule: self.name.clone(),
                group: bad.group,
                groups,
            }),
            None => Ok(()),
        }
    }

    /// Apply this rule to a line, writing into `markup`
    ///
    /// Returns the number of assignments that changed the markup.
    pub fn apply(&self, text: &str, markup: &mut LineMarkup) -> usize {
        let mut applied = 0;

        for caps in self.pattern.captures_iter(text) {
            for highlight in &self.highlights {
                match caps.get(highlight.group) {
                    Some(m) => {
                        if markup.assign(m.start(), m.end(), highlight.category, highlight.override_mode) {
                            applied += 1;
                        }
                    }
                    None if highlight.laxmatch => {}
                    None => debug!(
                        rule = %self.name,
                        group = highlight.group,
                        "capture group did not participate in match"
                    ),
                }
            }
        }

        applied
    }
}

/// An ordered sequence of rules
///
/// Order is significant: rules run first to last, so a later rule only
/// wins on text an earlier rule already claimed if its override policy
/// lets it.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule after validating its group references
    pub fn push(&mut self, rule: Rule) -> Result<()> {
        rule.validate()?;
        self.rules.push(rule);
        Ok(())
    }

    /// Append every rule of `other`, keeping its order
    pub fn extend(&mut self, other: &RuleSet) {
        self.rules.extend(other.rules.iter().cloned());
    }

    /// `base` followed by `additional`
    pub fn concat(base: &RuleSet, additional: &RuleSet) -> RuleSet {
        let mut rules = base.clone();
        rules.extend(additional);
        rules
    }

    /// Iterate the rules in evaluation order
    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    /// Number of rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Check if there are no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rule names in evaluation order
    pub fn names(&self) -> Vec<&str> {
        self.rules.iter().map(|r| r.name.as_str()).collect()
    }

    /// Find a rule by name
    pub fn get(&self, name: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.name == name)
    }
}

impl<'a> IntoIterator for &'a RuleSet {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// A multi-line construct rule (block comments, strings)
///
/// These rules track state across lines for constructs that
/// can span multiple lines.
#[derive(Debug, Clone)]
pub struct MultilineRule {
    /// Name for debugging
    pub name: String,
    /// Pattern that starts the construct
    pub start: Regex,
    /// Pattern that ends the construct
    pub end: Regex,
    /// Category for this construct
    pub category: Category,
    /// Escape character (usually backslash)
    pub escape_char: Option<char>,
    /// Unique ID for this multiline state (1-255, 0 = normal)
    pub state_id: u8,
}

impl MultilineRule {
    /// Create a new multiline rule
    pub fn new(
        name: &str,
        start_pattern: &str,
        end_pattern: &str,
        category: Category,
        state_id: u8,
    ) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| HighlightError::InvalidPattern {
                rule: name.to_string(),
                source,
            })
        };
        Ok(Self {
            name: name.to_string(),
            start: compile(start_pattern)?,
            end: compile(end_pattern)?,
            category,
            escape_char: None,
            state_id,
        })
    }

    /// Create a multiline rule with escape support
    pub fn with_escape(
        name: &str,
        start_pattern: &str,
        end_pattern: &str,
        category: Category,
        state_id: u8,
        escape_char: char,
    ) -> Result<Self> {
        let mut rule = Self::new(name, start_pattern, end_pattern, category, state_id)?;
        rule.escape_char = Some(escape_char);
        Ok(rule)
    }

    /// Find start of this construct in text
    ///
    /// When the start pattern has a capture group, the construct opens at
    /// group 1 and the rest of the match is only context. Anchors see the
    /// whole line, so `^` never matches at `start`.
    pub fn find_start(&self, text: &str, start: usize) -> Option<(usize, usize)> {
        if start >= text.len() {
            return None;
        }
        let caps = self.start.captures_at(text, start)?;
        let m = caps.get(1).or_else(|| caps.get(0))?;
        Some((m.start(), m.end()))
    }

    /// Find end of this construct in text, respecting escapes
    pub fn find_end(&self, text: &str, start: usize) -> Option<usize> {
        let search_text = text.get(start..)?;

        let Some(escape_char) = self.escape_char else {
            return self.end.find(search_text).map(|m| start + m.end());
        };

        let mut pos = 0;
        while pos <= search_text.len() {
            let m = self.end.find_at(search_text, pos)?;
            let escapes = search_text[..m.start()]
                .chars()
                .rev()
                .take_while(|&c| c == escape_char)
                .count();
            if escapes % 2 == 0 {
                return Some(start + m.end());
            }
            // Odd number of escapes = escaped
            pos = if m.end() > m.start() { m.end() } else { m.end() + 1 };
        }
        None
    }
}

/// Line state for tracking multi-line constructs
///
/// This is stored per-line to track whether we're inside a
/// multi-line comment, string, etc.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LineState {
    /// 0 = normal, non-zero = inside multiline rule with this ID
    pub multiline_id: u8,
}

impl LineState {
    /// Create state for being inside a multiline construct
    pub fn inside(state_id: u8) -> Self {
        Self { multiline_id: state_id }
    }

    /// Check if we're inside a multiline construct
    pub fn is_inside_multiline(&self) -> bool {
        self.multiline_id != 0
    }

    /// Check if we're in normal (no multiline) state
    pub fn is_normal(&self) -> bool {
        self.multiline_id == 0
    }
}

/// Result of highlighting a single line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HighlightResult {
    /// Categorized spans in this line
    pub spans: Vec<HighlightedSpan>,
    /// State at end of line (for next line)
    pub end_state: LineState,
}

impl HighlightResult {
    /// Category covering a byte position, if any
    pub fn category_at(&self, pos: usize) -> Option<Category> {
        self.spans.iter().find(|s| s.contains(pos)).map(|s| s.category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_apply_groups() {
        let rule = Rule::new("var", r"\b(var)\s+(\w+)")
            .unwrap()
            .highlight(1, Category::Keyword)
            .highlight(2, Category::Variable);
        let text = "var a; var b;";
        let mut markup = LineMarkup::new(text.len());

        assert_eq!(rule.apply(text, &mut markup), 4);
        assert_eq!(markup.category_at(0), Some(Category::Keyword));
        assert_eq!(markup.category_at(4), Some(Category::Variable));
        assert_eq!(markup.category_at(11), Some(Category::Variable));
        assert_eq!(markup.category_at(5), None);
    }

    #[test]
    fn test_rule_optional_group() {
        let rule = Rule::new("fn", r"(\w+)\(\)(?::(\w+))?")
            .unwrap()
            .highlight(1, Category::Function)
            .with(Highlight::new(2, Category::Type).lax());
        let text = "f()";
        let mut markup = LineMarkup::new(text.len());

        assert_eq!(rule.apply(text, &mut markup), 1);
        assert_eq!(markup.category_at(0), Some(Category::Function));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = Rule::new("broken", r"(unclosed").unwrap_err();
        assert!(matches!(err, HighlightError::InvalidPattern { rule, .. } if rule == "broken"));
    }

    #[test]
    fn test_rule_set_rejects_missing_group() {
        let mut rules = RuleSet::new();
        let rule = Rule::new("one_group", r"(a)b").unwrap().highlight(2, Category::Keyword);

        let err = rules.push(rule).unwrap_err();
        assert!(matches!(err, HighlightError::NoSuchGroup { group: 2, groups: 1, .. }));
        assert!(rules.is_empty());
    }

    #[test]
    fn test_rule_set_concat_keeps_order() {
        let mut base = RuleSet::new();
        base.push(Rule::new("a", "a").unwrap().highlight(0, Category::Keyword)).unwrap();
        base.push(Rule::new("b", "b").unwrap().highlight(0, Category::Keyword)).unwrap();
        let mut extra = RuleSet::new();
        extra.push(Rule::new("c", "c").unwrap().highlight(0, Category::Type)).unwrap();

        let all = RuleSet::concat(&base, &extra);
        assert_eq!(all.names(), vec!["a", "b", "c"]);
        assert_eq!(base.len(), 2);
        assert!(all.get("c").is_some());
    }

    #[test]
    fn test_multiline_rule() {
        let rule = MultilineRule::new("block_comment", r"/\*", r"\*/", Category::Comment, 1).unwrap();

        assert_eq!(rule.find_start("/* comment */", 0), Some((0, 2)));
        assert_eq!(rule.find_end("/* comment */", 2), Some(13));
        assert_eq!(rule.find_end("/* open", 2), None);
    }

    #[test]
    fn test_multiline_start_group() {
        let rule = MultilineRule::new("regex", r"(?:^|=)\s*(/)", "/", Category::String, 6).unwrap();

        assert_eq!(rule.find_start("x = /a/", 0), Some((4, 5)));
        assert_eq!(rule.find_start("/a/", 0), Some((0, 1)));
        // `^` is the line start, not the search position
        assert_eq!(rule.find_start("a /b/", 1), None);
    }

    #[test]
    fn test_multiline_with_escape() {
        let rule = MultilineRule::with_escape("string", "\"", "\"", Category::String, 2, '\\').unwrap();

        // Regular end
        assert_eq!(rule.find_end(r#"hello""#, 0), Some(6));
        // Escaped quote
        assert_eq!(rule.find_end(r#"hello\"world""#, 0), Some(13));
        // Escaped backslash before quote
        assert_eq!(rule.find_end(r#"a\\" b"#, 0), Some(4));
    }

    #[test]
    fn test_line_state() {
        let normal = LineState::default();
        assert!(normal.is_normal());
        assert!(!normal.is_inside_multiline());

        let inside = LineState::inside(1);
        assert!(!inside.is_normal());
        assert!(inside.is_inside_multiline());
    }
}
