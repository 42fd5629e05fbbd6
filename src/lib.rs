//! ActionScript syntax highlighting
//!
//! Highlighting for ActionScript built as a layer over a generic
//! ECMAScript highlighting engine: the ActionScript engine takes the
//! ECMAScript engine's comment/string handling and its first two rule
//! tiers, and appends its own ordered rule catalog.
//!
//! ```no_run
//! use actionscript_mode::syntax::{ActionScriptEngine, EcmaScriptEngine, HighlightEngine, LineState};
//!
//! let base = EcmaScriptEngine::new()?;
//! let engine = ActionScriptEngine::new(&base)?;
//! let result = engine.highlight_line("var score:int = 0;", LineState::default());
//! for span in &result.spans {
//!     println!("{}..{} {}", span.start, span.end, span.category.name());
//! }
//! # Ok::<(), actionscript_mode::HighlightError>(())
//! ```

pub mod config;
pub mod error;
pub mod mode;
pub mod render;
pub mod syntax;

pub use config::Config;
pub use error::{HighlightError, Result};
pub use mode::{Mode, ModeRegistry};
