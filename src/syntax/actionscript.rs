//! ActionScript highlighting
//!
//! ActionScript reuses the ECMAScript engine's comment/string handling and
//! its first two rule tiers, then layers its own catalog on top. The
//! framework heuristics of tier 3 make no sense for ActionScript and are
//! left out.
//!
//! Known gaps, kept on purpose:
//! - every named function whose parameter list runs straight into `{` gets
//!   a warning, constructors included, even though the return type is only
//!   required in strict mode
//! - namespace-qualified access (`ns::member`) is not classified
//! - names in `package` and `class` headers are not classified
//! - only the generic ECMAScript builtin methods are known
//! - any `: ident` counts as a type annotation, so ternary else-branches
//!   and object-literal values are typed too

use tracing::debug;

use super::category::Category;
use super::ecmascript::{
    word_alternation, EcmaScriptEngine, FontLockLevel, ECMASCRIPT_BUILTIN_METHODS, IDENT,
};
use super::engine::HighlightEngine;
use super::rules::{Highlight, MultilineRule, Override, Rule, RuleSet};
use crate::error::Result;

/// Modifiers and operators ActionScript adds to ECMAScript
pub const ACTIONSCRIPT_KEYWORDS: &[&str] = &[
    "as", "dynamic", "each", "get", "include", "internal", "is", "namespace", "override",
    "set", "use",
];

/// Base tier the ActionScript catalog builds on
pub const BASE_LEVEL: FontLockLevel = FontLockLevel::Two;

/// Type expression: dotted name, optional `.<T>` vector parameter, or `*`
fn type_expr() -> String {
    format!(r"\*|{IDENT}(?:\.{IDENT})*(?:\.<[\w$.*]+>)?")
}

/// The ActionScript rule catalog, in evaluation order
pub fn additional_rules() -> Result<RuleSet> {
    let mut rules = RuleSet::new();
    let type_expr = type_expr();

    // 1. Modifiers, type tests and `include`, but not member names after a dot
    let keywords = format!(r"(?:^|[^.\w$]){}", word_alternation(ACTIONSCRIPT_KEYWORDS));
    rules.push(Rule::new("as_keyword", &keywords)?.highlight(1, Category::Keyword))?;

    // 2. Rest parameter
    rules.push(Rule::new("rest_parameter", r"(\.\.\.)")?.highlight(1, Category::Keyword))?;

    // 3. Types after a single colon, or after a type test or `new`.
    // A vector parameter may already be a basic type, so fill around it.
    let annotation = format!(r"(?:^|[^:]):\s*({type_expr})");
    rules.push(
        Rule::new("type_annotation", &annotation)?
            .with(Highlight::new(1, Category::Type).override_mode(Override::Keep)),
    )?;
    let operand = format!(r"\b(?:as|is|instanceof|new)\s+({IDENT}(?:\.{IDENT})*)");
    rules.push(Rule::new("type_operand", &operand)?.highlight(1, Category::Type))?;

    // 4. Function declarations, accessors and return types.
    // A bare `function get x()` has `get` claimed as the function name by
    // the base heading rule, and `void` is a base keyword, so the accessor
    // and return type groups override.
    let declaration = format!(
        r"\b(function)\s+(?:(get|set)\s+)?({IDENT})\s*\([^)]*\)(?:\s*:\s*({type_expr}))?"
    );
    rules.push(
        Rule::new("function_declaration", &declaration)?
            .highlight(1, Category::Keyword)
            .with(Highlight::new(2, Category::Keyword).override_mode(Override::Replace).lax())
            .highlight(3, Category::Function)
            .with(Highlight::new(4, Category::Type).override_mode(Override::Replace).lax()),
    )?;

    // 5. Named function going straight from `)` to `{` without a return type
    let missing = format!(r"\bfunction\s+(?:(?:get|set)\s+)?{IDENT}\s*\([^)]*\)\s*(\{{)");
    rules.push(Rule::new("missing_return_type", &missing)?.highlight(1, Category::Warning))?;

    // 6. Variable and constant declarations
    let variable = format!(r"\b(var|const)\s+({IDENT})");
    rules.push(
        Rule::new("variable_declaration", &variable)?
            .highlight(1, Category::Keyword)
            .highlight(2, Category::Variable),
    )?;

    // 7. Builtin methods after a member-access dot
    let builtins = format!(r"\.{}", word_alternation(ECMASCRIPT_BUILTIN_METHODS));
    rules.push(Rule::new("builtin_method", &builtins)?.highlight(1, Category::Builtin))?;

    Ok(rules)
}

/// ECMAScript tiers 1-2 followed by the ActionScript catalog
pub struct ActionScriptEngine {
    multiline: Vec<MultilineRule>,
    additional: RuleSet,
    rules: RuleSet,
}

impl ActionScriptEngine {
    /// Compose the ActionScript engine on top of an ECMAScript base
    pub fn new(base: &EcmaScriptEngine) -> Result<Self> {
        let base_rules = base.base_rules(BASE_LEVEL);
        let additional = additional_rules()?;
        let rules = RuleSet::concat(&base_rules, &additional);
        debug!(
            base = base_rules.len(),
            additional = additional.len(),
            "composed ActionScript rule set"
        );
        Ok(Self {
            multiline: base.multiline_rules().to_vec(),
            additional,
            rules,
        })
    }

    /// Rules this engine adds to the base tiers
    pub fn additional_rules(&self) -> &RuleSet {
        &self.additional
    }
}

impl HighlightEngine for ActionScriptEngine {
    fn name(&self) -> &str {
        "ActionScript"
    }

    fn multiline_rules(&self) -> &[MultilineRule] {
        &self.multiline
    }

    fn rules(&self) -> &RuleSet {
        &self.rules
    }
}
