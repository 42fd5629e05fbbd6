//! Major modes and the mode registry
//!
//! A `Mode` bundles a name, a label, the file extensions it claims, its
//! key bindings and a highlight engine. Modes can be derived from a
//! parent: the child inherits the parent's key bindings and records the
//! parent's name, and supplies its own engine.
//!
//! `ModeRegistry` detects the mode for a file and keeps per-buffer
//! highlight caches.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use tracing::debug;

use crate::config::Config;
use crate::error::{HighlightError, Result};
use crate::syntax::{
    ActionScriptEngine, EcmaScriptEngine, HighlightEngine, HighlightedSpan, LineState,
};

/// Name of the ECMAScript mode
pub const ECMASCRIPT_MODE: &str = "ecmascript";
/// Name of the ActionScript mode
pub const ACTIONSCRIPT_MODE: &str = "actionscript";

/// Characters that re-indent the current line in ECMAScript buffers
const ELECTRIC_CHARS: [(char, &str); 7] = [
    ('{', "electric-brace"),
    ('}', "electric-brace"),
    ('(', "electric-paren"),
    (')', "electric-paren"),
    (';', "electric-semi"),
    (',', "electric-comma"),
    (':', "electric-colon"),
];

/// Key binding table: key to command name
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Keymap {
    bindings: BTreeMap<char, &'static str>,
}

impl Keymap {
    /// Create an empty keymap
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a key binding
    pub fn bind(&mut self, key: char, command: &'static str) {
        self.bindings.insert(key, command);
    }

    /// Remove every binding
    pub fn clear(&mut self) {
        self.bindings.clear();
    }

    /// Look up a command name for a key
    pub fn lookup(&self, key: char) -> Option<&'static str> {
        self.bindings.get(&key).copied()
    }

    /// Get all bindings as (key, command_name) pairs, ordered by key
    pub fn all_bindings(&self) -> Vec<(char, &'static str)> {
        self.bindings.iter().map(|(&k, &c)| (k, c)).collect()
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Check if there are no bindings
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }
}

/// A major mode
pub struct Mode {
    /// Registry name (e.g. "actionscript")
    pub name: String,
    /// Display label (e.g. "ActionScript")
    pub label: String,
    /// Name of the mode this one was derived from
    pub parent: Option<String>,
    /// File extensions claimed by this mode
    pub extensions: Vec<String>,
    /// Key bindings active in this mode
    pub keymap: Keymap,
    /// Highlighter for buffers in this mode
    pub engine: Box<dyn HighlightEngine>,
}

impl Mode {
    /// Create a root mode with no extensions or bindings
    pub fn new(name: &str, label: &str, engine: Box<dyn HighlightEngine>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            parent: None,
            extensions: Vec::new(),
            keymap: Keymap::new(),
            engine,
        }
    }

    /// Derive a mode from `parent`, inheriting its key bindings
    ///
    /// Extensions are not inherited; the child claims its own.
    pub fn derive(parent: &Mode, name: &str, label: &str, engine: Box<dyn HighlightEngine>) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            parent: Some(parent.name.clone()),
            extensions: Vec::new(),
            keymap: parent.keymap.clone(),
            engine,
        }
    }

    /// Add a file extension
    pub fn add_extension(&mut self, ext: &str) {
        let ext = ext.trim_start_matches('.').to_lowercase();
        if !self.extensions.contains(&ext) {
            self.extensions.push(ext);
        }
    }
}

/// The generic ECMAScript mode, highlighting at its top tier
pub fn ecmascript_mode() -> Result<Mode> {
    let mut mode = Mode::new(ECMASCRIPT_MODE, "ECMAScript", Box::new(EcmaScriptEngine::new()?));
    for ext in ["js", "mjs", "cjs"] {
        mode.add_extension(ext);
    }
    for (key, command) in ELECTRIC_CHARS {
        mode.keymap.bind(key, command);
    }
    Ok(mode)
}

/// ActionScript, derived from the ECMAScript mode
///
/// The electric re-indentation bindings are dropped.
pub fn actionscript_mode(parent: &Mode) -> Result<Mode> {
    let base = EcmaScriptEngine::new()?;
    let engine = ActionScriptEngine::new(&base)?;
    let mut mode = Mode::derive(parent, ACTIONSCRIPT_MODE, "ActionScript", Box::new(engine));
    mode.add_extension("as");
    mode.keymap.clear();
    Ok(mode)
}

/// Per-buffer highlighting cache
///
/// Lines `0..line_spans.len()` are valid; everything after is recomputed
/// on the next request.
#[derive(Debug, Default)]
pub struct HighlightCache {
    /// Mode for this buffer (None if no highlighting)
    pub mode: Option<String>,
    /// State at the end of each cached line
    pub line_states: Vec<LineState>,
    /// Cached spans per line
    pub line_spans: Vec<Vec<HighlightedSpan>>,
}

impl HighlightCache {
    /// Create a new empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the mode for this buffer
    pub fn set_mode(&mut self, mode: Option<String>) {
        self.mode = mode;
        self.invalidate_all();
    }

    /// Invalidate cache from a specific line onwards
    pub fn invalidate_from(&mut self, line: usize) {
        self.line_states.truncate(line);
        self.line_spans.truncate(line);
    }

    /// Invalidate entire cache
    pub fn invalidate_all(&mut self) {
        self.invalidate_from(0);
    }

    /// Number of lines with valid cached highlighting
    pub fn valid_lines(&self) -> usize {
        self.line_spans.len()
    }
}

/// Mode lookup plus per-buffer highlight caches
pub struct ModeRegistry {
    /// Registered modes
    modes: HashMap<String, Mode>,
    /// Extension to mode name mapping
    extension_map: HashMap<String, String>,
    /// Per-buffer caches (buffer index -> cache)
    caches: HashMap<usize, HighlightCache>,
    /// Whether syntax highlighting is enabled
    pub enabled: bool,
}

impl ModeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            modes: HashMap::new(),
            extension_map: HashMap::new(),
            caches: HashMap::new(),
            enabled: true,
        }
    }

    /// Create a registry with the ECMAScript and ActionScript modes
    pub fn with_builtin_modes() -> Result<Self> {
        let mut registry = Self::new();
        let ecmascript = ecmascript_mode()?;
        let actionscript = actionscript_mode(&ecmascript)?;
        registry.register(ecmascript);
        registry.register(actionscript);
        Ok(registry)
    }

    /// Apply user configuration: extra extensions and the global toggle
    pub fn apply_config(&mut self, config: &Config) -> Result<()> {
        self.enabled = config.syntax;
        for (mode_name, extensions) in &config.extensions {
            let mode = self
                .modes
                .get_mut(mode_name)
                .ok_or_else(|| HighlightError::UnknownMode(mode_name.clone()))?;
            for ext in extensions {
                mode.add_extension(ext);
            }
            for ext in &mode.extensions {
                self.extension_map.insert(ext.clone(), mode.name.clone());
            }
        }
        Ok(())
    }

    /// Register a mode, replacing any mode of the same name
    pub fn register(&mut self, mode: Mode) {
        debug!(mode = %mode.name, extensions = ?mode.extensions, "registering mode");
        for ext in &mode.extensions {
            self.extension_map.insert(ext.clone(), mode.name.clone());
        }
        self.modes.insert(mode.name.clone(), mode);
    }

    /// Detect mode from filename
    pub fn detect_mode(&self, filename: &Path) -> Option<&str> {
        let ext = filename.extension()?.to_str()?.to_lowercase();
        self.extension_map.get(&ext).map(|s| s.as_str())
    }

    /// Get a mode by name
    pub fn get(&self, name: &str) -> Option<&Mode> {
        self.modes.get(name)
    }

    /// List registered mode names
    pub fn list_modes(&self) -> Vec<&str> {
        let mut names: Vec<_> = self.modes.keys().map(|s| s.as_str()).collect();
        names.sort();
        names
    }

    /// Get or create a cache for a buffer
    pub fn get_cache(&mut self, buffer_idx: usize) -> &mut HighlightCache {
        self.caches.entry(buffer_idx).or_default()
    }

    /// Remove cache for a buffer (when buffer is closed)
    pub fn remove_cache(&mut self, buffer_idx: usize) {
        self.caches.remove(&buffer_idx);
    }

    /// Set mode for a buffer based on filename
    pub fn set_buffer_mode(&mut self, buffer_idx: usize, filename: Option<&Path>) -> Option<&str> {
        let mode_name = filename
            .and_then(|f| self.detect_mode(f))
            .map(|s| s.to_string());
        self.get_cache(buffer_idx).set_mode(mode_name);
        self.caches.get(&buffer_idx).and_then(|c| c.mode.as_deref())
    }

    /// Set mode for a buffer explicitly
    pub fn set_buffer_mode_by_name(&mut self, buffer_idx: usize, name: &str) -> Result<()> {
        if !self.modes.contains_key(name) {
            return Err(HighlightError::UnknownMode(name.to_string()));
        }
        self.get_cache(buffer_idx).set_mode(Some(name.to_string()));
        Ok(())
    }

    /// Invalidate cache from a line onwards
    pub fn invalidate_from(&mut self, buffer_idx: usize, line: usize) {
        if let Some(cache) = self.caches.get_mut(&buffer_idx) {
            cache.invalidate_from(line);
        }
    }

    /// Highlight every line of a buffer, reusing valid cached lines
    ///
    /// Returns one span list per line; all empty when highlighting is off
    /// or the buffer has no mode.
    pub fn highlight_lines(&mut self, buffer_idx: usize, lines: &[&str]) -> Vec<Vec<HighlightedSpan>> {
        let cache = self.caches.entry(buffer_idx).or_default();

        let mode = match (&cache.mode, self.enabled) {
            (Some(name), true) => self.modes.get(name),
            _ => None,
        };
        let Some(mode) = mode else {
            return vec![Vec::new(); lines.len()];
        };

        cache.invalidate_from(lines.len());
        let reused = cache.valid_lines();
        let mut state = reused
            .checked_sub(1)
            .map(|last| cache.line_states[last])
            .unwrap_or_default();

        for line in &lines[reused..] {
            let result = mode.engine.highlight_line(line, state);
            state = result.end_state;
            cache.line_states.push(result.end_state);
            cache.line_spans.push(result.spans);
        }

        debug!(buffer = buffer_idx, reused, total = lines.len(), "highlighted buffer");
        cache.line_spans.clone()
    }
}

impl Default for ModeRegistry {
    fn default() -> Self {
        Self::new()
    }
}
