//! Highlight engines
//!
//! An engine owns two things: the syntactic rules that find comments and
//! strings (which carry state from line to line), and an ordered keyword
//! `RuleSet` that runs over whatever the syntactic pass left behind.

use tracing::trace;

use super::markup::LineMarkup;
use super::rules::{HighlightResult, LineState, MultilineRule, Override, RuleSet};

/// A line-oriented syntax highlighter
pub trait HighlightEngine: Send + Sync {
    /// Engine name (e.g. "ECMAScript")
    fn name(&self) -> &str;

    /// Comment and string constructs, in tie-break order
    fn multiline_rules(&self) -> &[MultilineRule];

    /// Keyword rules, in evaluation order
    fn rules(&self) -> &RuleSet;

    /// Run the keyword rules over a line that already carries markup
    fn fontify_line(&self, text: &str, markup: &mut LineMarkup) -> usize {
        apply_rules(self.rules(), text, markup)
    }

    /// Highlight a single line of text
    ///
    /// Takes the line text and the state from the previous line.
    /// Returns spans and the state for the next line.
    fn highlight_line(&self, text: &str, prev_state: LineState) -> HighlightResult {
        let mut markup = LineMarkup::new(text.len());
        let end_state = syntactic_pass(self.multiline_rules(), text, prev_state, &mut markup);
        self.fontify_line(text, &mut markup);
        HighlightResult {
            spans: markup.spans(),
            end_state,
        }
    }

    /// Highlight consecutive lines starting from normal state
    fn highlight_lines(&self, lines: &[&str]) -> Vec<HighlightResult> {
        let mut state = LineState::default();
        let results: Vec<HighlightResult> = lines
            .iter()
            .map(|line| {
                let result = self.highlight_line(line, state);
                state = result.end_state;
                result
            })
            .collect();
        trace!(engine = self.name(), lines = results.len(), "highlighted lines");
        results
    }
}

/// Apply every rule, in order, to one line
///
/// Returns the number of assignments that changed the markup.
pub fn apply_rules(rules: &RuleSet, text: &str, markup: &mut LineMarkup) -> usize {
    rules.iter().map(|rule| rule.apply(text, markup)).sum()
}

/// Mark comments and strings in a line
///
/// The construct whose opening delimiter comes first wins; ties go to the
/// rule listed first. Returns the state for the next line.
pub fn syntactic_pass(
    rules: &[MultilineRule],
    text: &str,
    prev_state: LineState,
    markup: &mut LineMarkup,
) -> LineState {
    let mut pos = 0;

    if prev_state.is_inside_multiline() {
        // An unknown ID means stale state; treat it as normal
        if let Some(rule) = rules.iter().find(|r| r.state_id == prev_state.multiline_id) {
            match rule.find_end(text, 0) {
                Some(end) => {
                    markup.assign(0, end, rule.category, Override::Replace);
                    pos = end;
                }
                None => {
                    markup.assign(0, text.len(), rule.category, Override::Replace);
                    return prev_state;
                }
            }
        }
    }

    while pos < text.len() {
        let mut best: Option<(usize, usize, &MultilineRule)> = None;
        for rule in rules {
            if let Some((start, end)) = rule.find_start(text, pos) {
                if best.map_or(true, |(best_start, _, _)| start < best_start) {
                    best = Some((start, end, rule));
                }
            }
        }

        let Some((start, open_end, rule)) = best else {
            break;
        };

        match rule.find_end(text, open_end) {
            Some(close) => {
                markup.assign(start, close, rule.category, Override::Replace);
                // Zero-width openers would otherwise stall here
                pos = close.max(start + 1);
            }
            None => {
                // Construct continues on the next line
                markup.assign(start, text.len(), rule.category, Override::Replace);
                return LineState::inside(rule.state_id);
            }
        }
    }

    LineState::default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::category::Category;
    use crate::syntax::rules::Rule;

    struct TestEngine {
        multiline: Vec<MultilineRule>,
        rules: RuleSet,
    }

    impl HighlightEngine for TestEngine {
        fn name(&self) -> &str {
            "Test"
        }

        fn multiline_rules(&self) -> &[MultilineRule] {
            &self.multiline
        }

        fn rules(&self) -> &RuleSet {
            &self.rules
        }
    }

    fn create_test_engine() -> TestEngine {
        let multiline = vec![
            MultilineRule::new("block_comment", r"/\*", r"\*/", Category::Comment, 1).unwrap(),
            MultilineRule::new("line_comment", r"//", r"$", Category::Comment, 2).unwrap(),
            MultilineRule::with_escape("string", "\"", r#""|$"#, Category::String, 3, '\\').unwrap(),
        ];
        let mut rules = RuleSet::new();
        rules
            .push(Rule::new("keyword", r"\b(let|if)\b").unwrap().highlight(1, Category::Keyword))
            .unwrap();
        TestEngine { multiline, rules }
    }

    #[test]
    fn test_simple_highlighting() {
        let engine = create_test_engine();
        let result = engine.highlight_line("let x = 42;", LineState::default());

        assert!(result.end_state.is_normal());
        assert_eq!(result.category_at(0), Some(Category::Keyword));
        assert_eq!(result.category_at(4), None);
    }

    #[test]
    fn test_keywords_not_applied_inside_comments_and_strings() {
        let engine = create_test_engine();
        let text = r#"x = "let"; // if"#;
        let result = engine.highlight_line(text, LineState::default());

        assert_eq!(result.category_at(5), Some(Category::String));
        assert_eq!(result.category_at(11), Some(Category::Comment));
        assert!(!result.spans.iter().any(|s| s.category == Category::Keyword));
    }

    #[test]
    fn test_earliest_opener_wins() {
        let engine = create_test_engine();
        let result = engine.highlight_line(r#""//" /* "x" */"#, LineState::default());

        assert_eq!(result.category_at(1), Some(Category::String));
        assert_eq!(result.category_at(9), Some(Category::Comment));
        assert!(result.end_state.is_normal());
    }

    #[test]
    fn test_multiline_start() {
        let engine = create_test_engine();
        let result = engine.highlight_line("code /* comment", LineState::default());

        assert!(result.end_state.is_inside_multiline());
        assert_eq!(result.end_state.multiline_id, 1);
    }

    #[test]
    fn test_multiline_continue_and_end() {
        let engine = create_test_engine();
        let results = engine.highlight_lines(&["/* start", "let inside", "end */ let"]);

        assert_eq!(results[1].end_state, LineState::inside(1));
        assert_eq!(results[1].category_at(0), Some(Category::Comment));
        assert!(results[2].end_state.is_normal());
        assert_eq!(results[2].category_at(7), Some(Category::Keyword));
    }

    #[test]
    fn test_unterminated_string_ends_at_eol() {
        let engine = create_test_engine();
        let result = engine.highlight_line(r#"s = "open"#, LineState::default());
        assert!(result.end_state.is_normal());

        // A trailing backslash continues the string
        let result = engine.highlight_line(r#"s = "open\"#, LineState::default());
        assert_eq!(result.end_state, LineState::inside(3));
    }

    #[test]
    fn test_fontify_line_respects_existing_markup() {
        let engine = create_test_engine();
        let text = "let x";
        let mut markup = LineMarkup::new(text.len());
        markup.assign(0, 3, Category::Constant, Override::Skip);

        assert_eq!(engine.fontify_line(text, &mut markup), 0);
        assert_eq!(markup.category_at(0), Some(Category::Constant));
    }
}
