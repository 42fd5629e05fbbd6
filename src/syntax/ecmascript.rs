//! ECMAScript base highlighting engine
//!
//! Generic ECMAScript highlighting organised in three cumulative tiers:
//!
//! 1. function headings and `import`
//! 2. reserved words, basic type names and literal constants
//! 3. framework class-declaration heuristics and `new` operands
//!
//! Derived engines pick the tier they want via
//! [`EcmaScriptEngine::base_rules`] and append their own rules.

use tracing::debug;

use super::category::Category;
use super::engine::HighlightEngine;
use super::rules::{Highlight, MultilineRule, Override, Rule, RuleSet};
use crate::error::Result;

/// Identifier pattern (letters, digits, `_` and `$`)
pub const IDENT: &str = r"[A-Za-z_$][\w$]*";

/// Reserved words highlighted as keywords from tier 2 on
pub const ECMASCRIPT_KEYWORDS: &[&str] = &[
    "abstract", "async", "await", "break", "case", "catch", "class", "const", "continue",
    "debugger", "default", "delete", "do", "else", "enum", "export", "extends", "final",
    "finally", "for", "function", "goto", "if", "implements", "import", "in", "instanceof",
    "interface", "let", "native", "new", "package", "private", "protected", "public",
    "return", "static", "super", "switch", "synchronized", "throw", "throws", "transient",
    "try", "typeof", "var", "void", "volatile", "while", "with", "yield",
];

/// Primitive type names reserved by the language
pub const ECMASCRIPT_BASIC_TYPES: &[&str] = &[
    "boolean", "byte", "char", "double", "float", "int", "long", "short", "void",
];

/// Literal constants and pseudo-variables
pub const ECMASCRIPT_CONSTANTS: &[&str] = &[
    "false", "null", "undefined", "Infinity", "NaN", "true", "arguments", "this",
];

/// Well-known prototype members of the core ECMAScript objects
///
/// Object, Array, String, Number, Date, RegExp and Function members.
/// Derived engines highlight these after a member-access dot.
pub const ECMASCRIPT_BUILTIN_METHODS: &[&str] = &[
    // Object
    "hasOwnProperty", "isPrototypeOf", "propertyIsEnumerable", "toLocaleString",
    "toString", "valueOf",
    // Array
    "concat", "every", "filter", "forEach", "indexOf", "join", "lastIndexOf", "map",
    "pop", "push", "reduce", "reduceRight", "reverse", "shift", "slice", "some", "sort",
    "splice", "unshift",
    // String
    "charAt", "charCodeAt", "fromCharCode", "localeCompare", "match", "replace",
    "search", "split", "substr", "substring", "toLocaleLowerCase", "toLocaleUpperCase",
    "toLowerCase", "toUpperCase",
    // Number
    "toExponential", "toFixed", "toPrecision",
    // Date
    "getDate", "getDay", "getFullYear", "getHours", "getMilliseconds", "getMinutes",
    "getMonth", "getSeconds", "getTime", "getTimezoneOffset", "getUTCDate", "getUTCDay",
    "getUTCFullYear", "getUTCHours", "getUTCMilliseconds", "getUTCMinutes",
    "getUTCMonth", "getUTCSeconds", "setDate", "setFullYear", "setHours",
    "setMilliseconds", "setMinutes", "setMonth", "setSeconds", "setTime", "setUTCDate",
    "setUTCFullYear", "setUTCHours", "setUTCMilliseconds", "setUTCMinutes",
    "setUTCMonth", "setUTCSeconds", "toDateString", "toLocaleDateString",
    "toLocaleTimeString", "toTimeString", "toUTCString",
    // RegExp
    "exec", "test",
    // Function
    "apply", "call",
];

/// Build a `\b(a|b|c)\b` alternation from a word list
pub fn word_alternation(words: &[&str]) -> String {
    let escaped: Vec<String> = words.iter().map(|w| regex::escape(w)).collect();
    format!(r"\b({})\b", escaped.join("|"))
}

/// Highlighting tiers, each including the ones below it
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FontLockLevel {
    One = 1,
    Two = 2,
    Three = 3,
}

impl FontLockLevel {
    /// Parse a level from its number
    pub fn from_number(n: u8) -> Option<Self> {
        match n {
            1 => Some(FontLockLevel::One),
            2 => Some(FontLockLevel::Two),
            3 => Some(FontLockLevel::Three),
            _ => None,
        }
    }

    fn index(self) -> usize {
        self as usize - 1
    }
}

/// The generic ECMAScript highlighter
pub struct EcmaScriptEngine {
    multiline: Vec<MultilineRule>,
    /// Rules each tier adds on top of the previous one
    tiers: [RuleSet; 3],
    /// Cumulative rules for `level`
    active: RuleSet,
    level: FontLockLevel,
}

impl EcmaScriptEngine {
    /// Create the engine at the highest tier
    pub fn new() -> Result<Self> {
        Self::with_level(FontLockLevel::Three)
    }

    /// Create the engine highlighting up to `level`
    pub fn with_level(level: FontLockLevel) -> Result<Self> {
        let tiers = [tier_one()?, tier_two()?, tier_three()?];
        let mut engine = Self {
            multiline: syntactic_rules()?,
            tiers,
            active: RuleSet::new(),
            level,
        };
        engine.active = engine.base_rules(level);
        debug!(level = level as u8, rules = engine.active.len(), "built ECMAScript rule set");
        Ok(engine)
    }

    /// Level this engine highlights at
    pub fn level(&self) -> FontLockLevel {
        self.level
    }

    /// Rules added by one tier alone
    pub fn tier(&self, level: FontLockLevel) -> &RuleSet {
        &self.tiers[level.index()]
    }

    /// Cumulative rules of every tier up to and including `level`
    pub fn base_rules(&self, level: FontLockLevel) -> RuleSet {
        let mut rules = RuleSet::new();
        for tier in &self.tiers[..=level.index()] {
            rules.extend(tier);
        }
        rules
    }
}

impl HighlightEngine for EcmaScriptEngine {
    fn name(&self) -> &str {
        "ECMAScript"
    }

    fn multiline_rules(&self) -> &[MultilineRule] {
        &self.multiline
    }

    fn rules(&self) -> &RuleSet {
        &self.active
    }
}

/// Comments, string literals and regex literals
fn syntactic_rules() -> Result<Vec<MultilineRule>> {
    Ok(vec![
        MultilineRule::new("block_comment", r"/\*", r"\*/", Category::Comment, 1)?,
        MultilineRule::new("line_comment", r"//", r"$", Category::Comment, 2)?,
        // Quoted strings end at the line unless the newline is escaped
        MultilineRule::with_escape("double_string", "\"", r#""|$"#, Category::String, 3, '\\')?,
        MultilineRule::with_escape("single_string", "'", r"'|$", Category::String, 4, '\\')?,
        MultilineRule::with_escape("template_string", "`", "`", Category::String, 5, '\\')?,
        // A slash opens a regex only where an operand is expected; the body
        // always ends on this line, at the closing slash or at the end
        MultilineRule::new(
            "regex_literal",
            r"(?:^|[=(,:;!&|?{}\[+\-*%<>~^])\s*(/)",
            r"^(?:\\.?|\[(?:\\.?|[^\\\]])*\]?|[^\\/\[])*(?:/[A-Za-z]*|$)",
            Category::String,
            6,
        )?,
    ])
}

fn tier_one() -> Result<RuleSet> {
    let mut rules = RuleSet::new();

    rules.push(Rule::new("import", r"\b(import)\b")?.highlight(1, Category::Keyword))?;

    let heading = format!(r"^\s*(?:export\s+)?(?:async\s+)?function\s*\*?\s*({IDENT})");
    rules.push(Rule::new("function_heading", &heading)?.highlight(1, Category::Function))?;

    let property = format!(r"^\s*({IDENT})\s*:\s*function\b");
    rules.push(Rule::new("function_property", &property)?.highlight(1, Category::Function))?;

    let assignment = format!(r"^\s*(?:(?:var|let|const)\s+)?({IDENT}(?:\.{IDENT})*)\s*=\s*function\b");
    rules.push(Rule::new("function_assignment", &assignment)?.highlight(1, Category::Function))?;

    Ok(rules)
}

fn tier_two() -> Result<RuleSet> {
    let mut rules = RuleSet::new();

    let keywords = word_alternation(ECMASCRIPT_KEYWORDS);
    rules.push(Rule::new("keyword", &keywords)?.highlight(1, Category::Keyword))?;

    let types = word_alternation(ECMASCRIPT_BASIC_TYPES);
    rules.push(Rule::new("basic_type", &types)?.highlight(1, Category::Type))?;

    let constants = word_alternation(ECMASCRIPT_CONSTANTS);
    rules.push(Rule::new("constant", &constants)?.highlight(1, Category::Constant))?;

    rules.push(Rule::new("for_each", r"\bfor\s+(each)\b")?.highlight(1, Category::Keyword))?;

    Ok(rules)
}

fn tier_three() -> Result<RuleSet> {
    let mut rules = RuleSet::new();

    // Prototype: Foo = Class.create(...)
    let prototype = format!(r"({IDENT}(?:\.{IDENT})*)\s*=\s*Class\.create\b");
    rules.push(Rule::new("prototype_class", &prototype)?.highlight(1, Category::Type))?;

    // Dojo and Ext name the class in a string literal
    let string_named = Highlight::new(1, Category::Type).override_mode(Override::Replace);
    rules.push(
        Rule::new("dojo_declare", r#"\bdojo\.declare\s*\(\s*["']([\w$.]+)["']"#)?.with(string_named),
    )?;
    rules.push(
        Rule::new("ext_define", r#"\bExt\.(?:define|extend)\s*\(\s*["']?([\w$.]+)"#)?.with(string_named),
    )?;

    let new_class = format!(r"\bnew\s+({IDENT}(?:\.{IDENT})*)");
    rules.push(Rule::new("new_class", &new_class)?.highlight(1, Category::Type))?;

    Ok(rules)
}
