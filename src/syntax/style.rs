//! Style types for text rendering
//!
//! This module maps highlight categories onto display attributes.
//! Categories say what a span is; a `Theme` decides how it looks.

use std::collections::HashMap;

use super::category::Category;
use crate::error::{HighlightError, Result};

/// Terminal colors (ANSI 16-color palette for compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// Parse a color name such as `red`, `bright-blue` or `brightblue`
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized: String = name
            .chars()
            .filter(|c| *c != '-' && *c != '_')
            .map(|c| c.to_ascii_lowercase())
            .collect();
        let color = match normalized.as_str() {
            "default" => Color::Default,
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "brightblack" | "gray" | "grey" => Color::BrightBlack,
            "brightred" => Color::BrightRed,
            "brightgreen" => Color::BrightGreen,
            "brightyellow" => Color::BrightYellow,
            "brightblue" => Color::BrightBlue,
            "brightmagenta" => Color::BrightMagenta,
            "brightcyan" => Color::BrightCyan,
            "brightwhite" => Color::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Italic text
    pub italic: bool,
    /// Underlined text
    pub underline: bool,
    /// Reverse video (swap fg/bg)
    pub reverse: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Builder: set italic
    pub fn with_italic(mut self) -> Self {
        self.italic = true;
        self
    }

    /// Builder: set underline
    pub fn with_underline(mut self) -> Self {
        self.underline = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }

    /// Parse a style description such as `"magenta bold"` or
    /// `"white on red underline"`.
    ///
    /// The first bare color is the foreground; a color after `on` is the
    /// background.
    pub fn parse(description: &str) -> Result<Self> {
        let mut style = Style::default();
        let mut words = description.split_whitespace();

        while let Some(word) = words.next() {
            match word.to_ascii_lowercase().as_str() {
                "bold" => style.bold = true,
                "italic" => style.italic = true,
                "underline" => style.underline = true,
                "reverse" => style.reverse = true,
                "on" => {
                    let name = words
                        .next()
                        .ok_or_else(|| HighlightError::UnknownColor(description.to_string()))?;
                    style.bg = Color::from_name(name)
                        .ok_or_else(|| HighlightError::UnknownColor(name.to_string()))?;
                }
                _ => {
                    style.fg = Color::from_name(word)
                        .ok_or_else(|| HighlightError::UnknownColor(word.to_string()))?;
                }
            }
        }

        Ok(style)
    }
}

/// Category to style mapping
#[derive(Debug, Clone, Default)]
pub struct Theme {
    overrides: HashMap<Category, Style>,
}

impl Theme {
    /// Create a theme that uses every category's default style
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the style used for one category
    pub fn set(&mut self, category: Category, style: Style) {
        self.overrides.insert(category, style);
    }

    /// Style for a category
    pub fn style(&self, category: Category) -> Style {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_style())
    }
}
