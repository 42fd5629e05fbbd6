//! Configuration file support
//!
//! Loads settings from `$ASHL_CONFIG`, or `~/.ashl.toml`
//! (`%USERPROFILE%\.ashl.toml` on Windows).
//!
//! Example:
//! ```toml
//! # ashl configuration
//! color = true
//! syntax = true
//!
//! [styles]
//! keyword = "magenta bold"
//! warning = "white on red"
//!
//! [extensions]
//! actionscript = ["as3"]
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use toml::{Table, Value};
use tracing::debug;

use crate::error::{HighlightError, Result};
use crate::syntax::{Category, Style, Theme};

/// Configuration settings
#[derive(Debug, Clone)]
pub struct Config {
    /// Whether to emit ANSI colors
    pub color: bool,
    /// Whether syntax highlighting is enabled at all
    pub syntax: bool,
    /// Per-category style overrides
    pub styles: BTreeMap<Category, Style>,
    /// Extra file extensions per mode name
    pub extensions: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            color: true,
            syntax: true,
            styles: BTreeMap::new(),
            extensions: BTreeMap::new(),
        }
    }
}

impl Config {
    /// Get the config file path
    pub fn config_path() -> Option<PathBuf> {
        if let Some(path) = std::env::var_os("ASHL_CONFIG") {
            return Some(PathBuf::from(path));
        }

        #[cfg(windows)]
        {
            std::env::var("USERPROFILE")
                .ok()
                .map(|home| PathBuf::from(home).join(".ashl.toml"))
        }

        #[cfg(not(windows))]
        {
            std::env::var("HOME")
                .ok()
                .map(|home| PathBuf::from(home).join(".ashl.toml"))
        }
    }

    /// Load configuration from file
    ///
    /// A missing file yields the defaults; a malformed one is an error.
    pub fn load() -> Result<Self> {
        let Some(path) = Self::config_path() else {
            return Ok(Config::default());
        };

        match fs::read_to_string(&path) {
            Ok(contents) => {
                debug!(path = %path.display(), "loading config");
                Self::parse(&contents)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Config::default()),
            Err(e) => Err(e.into()),
        }
    }

    /// Parse config file contents
    pub fn parse(contents: &str) -> Result<Self> {
        let table: Table = contents.parse()?;
        let mut config = Config::default();
        config.apply(&table)?;
        Ok(config)
    }

    /// Apply settings from a parsed table
    fn apply(&mut self, table: &Table) -> Result<()> {
        if let Some(value) = table.get("color") {
            self.color = expect_bool("color", value)?;
        }

        if let Some(value) = table.get("syntax") {
            self.syntax = expect_bool("syntax", value)?;
        }

        if let Some(styles) = table.get("styles") {
            for (name, value) in expect_table("styles", styles)? {
                let category = Category::from_name(name)
                    .ok_or_else(|| HighlightError::UnknownCategory(name.clone()))?;
                let description = value
                    .as_str()
                    .ok_or_else(|| invalid(&format!("styles.{name}"), "a string"))?;
                self.styles.insert(category, Style::parse(description)?);
            }
        }

        if let Some(extensions) = table.get("extensions") {
            for (mode, value) in expect_table("extensions", extensions)? {
                let list = value
                    .as_array()
                    .ok_or_else(|| invalid(&format!("extensions.{mode}"), "an array"))?;
                let exts = list
                    .iter()
                    .map(|v| {
                        v.as_str()
                            .map(str::to_string)
                            .ok_or_else(|| invalid(&format!("extensions.{mode}"), "strings"))
                    })
                    .collect::<Result<Vec<_>>>()?;
                self.extensions.insert(mode.clone(), exts);
            }
        }

        Ok(())
    }

    /// Theme built from the default styles and any overrides
    pub fn theme(&self) -> Theme {
        let mut theme = Theme::new();
        for (&category, &style) in &self.styles {
            theme.set(category, style);
        }
        theme
    }
}

fn invalid(key: &str, expected: &str) -> HighlightError {
    HighlightError::Usage(format!("config key '{key}' must be {expected}"))
}

fn expect_bool(key: &str, value: &Value) -> Result<bool> {
    value.as_bool().ok_or_else(|| invalid(key, "a boolean"))
}

fn expect_table<'a>(key: &str, value: &'a Value) -> Result<&'a Table> {
    value.as_table().ok_or_else(|| invalid(key, "a table"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::Color;

    #[test]
    fn test_parse_config() {
        let contents = r#"
# Comment
color = false
syntax = true

[styles]
keyword = "green bold"
Warning = "black on yellow"

[extensions]
actionscript = ["as3", "asc"]
        "#;

        let config = Config::parse(contents).unwrap();
        assert!(!config.color);
        assert!(config.syntax);
        assert_eq!(config.styles.get(&Category::Keyword), Some(&Style::fg(Color::Green).with_bold()));
        assert_eq!(config.styles[&Category::Warning].bg, Color::Yellow);
        assert_eq!(
            config.extensions.get("actionscript"),
            Some(&vec!["as3".to_string(), "asc".to_string()])
        );
    }

    #[test]
    fn test_empty_config_is_default() {
        let config = Config::parse("").unwrap();
        assert!(config.color);
        assert!(config.syntax);
        assert!(config.styles.is_empty());
        assert!(config.extensions.is_empty());
    }

    #[test]
    fn test_theme_from_config() {
        let config = Config::parse("[styles]\ntype = \"cyan\"\n").unwrap();
        let theme = config.theme();
        assert_eq!(theme.style(Category::Type), Style::fg(Color::Cyan));
        assert_eq!(theme.style(Category::Keyword), Category::Keyword.default_style());
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(Config::parse("color = 1"), Err(HighlightError::Usage(_))));
        assert!(matches!(
            Config::parse("[styles]\nlifetime = \"red\""),
            Err(HighlightError::UnknownCategory(name)) if name == "lifetime"
        ));
        assert!(matches!(
            Config::parse("[styles]\nkeyword = \"mauve\""),
            Err(HighlightError::UnknownColor(_))
        ));
        assert!(Config::parse("[extensions]\nactionscript = \"as3\"").is_err());
    }

    #[test]
    fn test_malformed_toml() {
        assert!(matches!(Config::parse("color = "), Err(HighlightError::Config(_))));
    }
}
