//! Semantic highlight categories
//!
//! A category is purely descriptive: it names what a span of text is
//! (keyword, type name, ...) and carries a default visual style. Rules
//! assign categories; the theme decides what they look like.

use super::style::{Color, Style};

/// Semantic categories a rule can assign to a span
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Category {
    /// Comments (`//` and `/* */`)
    Comment,
    /// String and template literals
    String,
    /// Language keywords and modifiers
    Keyword,
    /// Type names (annotations, `as`/`is`/`new` operands)
    Type,
    /// Names of declared functions
    Function,
    /// Names of declared variables and constants
    Variable,
    /// Well-known builtin method names
    Builtin,
    /// Literal constants (`true`, `null`, `NaN`, ...)
    Constant,
    /// Suspicious construct decoration
    Warning,
    /// Plain text
    Default,
}

impl Category {
    /// Every category, in declaration order
    pub const ALL: [Category; 10] = [
        Category::Comment,
        Category::String,
        Category::Keyword,
        Category::Type,
        Category::Function,
        Category::Variable,
        Category::Builtin,
        Category::Constant,
        Category::Warning,
        Category::Default,
    ];

    /// Get the default style for this category
    pub fn default_style(&self) -> Style {
        match self {
            Category::Comment => Style::fg(Color::BrightBlack).with_italic(),
            Category::String => Style::fg(Color::Green),
            Category::Keyword => Style::fg(Color::Magenta).with_bold(),
            Category::Type => Style::fg(Color::Yellow),
            Category::Function => Style::fg(Color::Blue),
            Category::Variable => Style::fg(Color::BrightYellow),
            Category::Builtin => Style::fg(Color::Cyan),
            Category::Constant => Style::fg(Color::BrightRed),
            Category::Warning => Style::fg(Color::BrightWhite).with_bg(Color::Red).with_bold(),
            Category::Default => Style::default(),
        }
    }

    /// Get a human-readable name for this category
    pub fn name(&self) -> &'static str {
        match self {
            Category::Comment => "Comment",
            Category::String => "String",
            Category::Keyword => "Keyword",
            Category::Type => "Type",
            Category::Function => "Function",
            Category::Variable => "Variable",
            Category::Builtin => "Builtin",
            Category::Constant => "Constant",
            Category::Warning => "Warning",
            Category::Default => "Default",
        }
    }

    /// Parse a category from its name, ignoring case (for TOML loading)
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|category| category.name().eq_ignore_ascii_case(name))
    }
}
