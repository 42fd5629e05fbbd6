//! Syntax highlighting
//!
//! This module provides the rule engine and the two engines built on it:
//! - a generic ECMAScript engine with three cumulative rule tiers
//! - the ActionScript engine, which layers its own catalog on top of the
//!   first two ECMAScript tiers

mod actionscript;
mod category;
mod ecmascript;
mod engine;
mod markup;
mod rules;
mod style;

pub use actionscript::{additional_rules, ActionScriptEngine, ACTIONSCRIPT_KEYWORDS};
pub use category::Category;
pub use ecmascript::{EcmaScriptEngine, FontLockLevel, ECMASCRIPT_BUILTIN_METHODS};
pub use engine::{apply_rules, syntactic_pass, HighlightEngine};
pub use markup::{HighlightedSpan, LineMarkup};
pub use rules::{Highlight, HighlightResult, LineState, MultilineRule, Override, Rule, RuleSet};
pub use style::{Color, Style, Theme};
