//! Error types for the ActionScript highlighter

use thiserror::Error;

/// Result type alias for highlighter operations
pub type Result<T> = std::result::Result<T, HighlightError>;

/// Highlighter error types
///
/// Rule evaluation itself never fails. Everything here is either a
/// load-time authoring defect in a rule table or an I/O/config problem
/// surfaced by the command line front end.
#[derive(Error, Debug)]
pub enum HighlightError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid pattern in rule '{rule}': {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("Rule '{rule}' highlights group {group} but its pattern has only {groups} group(s)")]
    NoSuchGroup {
        rule: String,
        group: usize,
        groups: usize,
    },

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    #[error("Unknown highlight category: {0}")]
    UnknownCategory(String),

    #[error("Unknown color: {0}")]
    UnknownColor(String),

    #[error("No such mode: {0}")]
    UnknownMode(String),

    #[error("{0}")]
    Usage(String),
}
