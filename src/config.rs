//! # Configuration Module
//!
//! Resolves the button-to-line and button-to-key mapping from a JSON (or
//! TOML) document merged over built-in defaults.
//!
//! ## Document Schema
//!
//! ```text
//! { "gpio": { "left": 17, ... },
//!   "pico": { "left": "a", ... } }
//! ```
//!
//! Both sections are optional and keyed by logical button name. Names that
//! are not one of the six logical buttons are ignored.

use serde::Deserialize;
use std::collections::HashMap;
use std::fmt;
use std::fs;
use std::io;
use std::path::Path;
use tracing::{info, warn};

use crate::error::{PicoError, Result};

/// Well-known location of the config file
pub const DEFAULT_CONFIG_PATH: &str = "/usr/local/etc/pico-raspberry.json";

/// Number of logical buttons
pub const BUTTON_COUNT: usize = 6;

/// Default input line per button, indexed by [`LogicalButton`] (BCM numbering)
const DEFAULT_LINES: [u32; BUTTON_COUNT] = [0, 1, 2, 3, 4, 5];

/// Default key identifier per button, indexed by [`LogicalButton`]
const DEFAULT_KEYS: [&str; BUTTON_COUNT] = ["left", "right", "up", "down", "z", "x"];

/// One of the six fixed controls wired to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LogicalButton {
    Left,
    Right,
    Up,
    Down,
    Primary,
    Secondary,
}

impl LogicalButton {
    /// Every logical button, in table order.
    pub const ALL: [LogicalButton; BUTTON_COUNT] = [
        LogicalButton::Left,
        LogicalButton::Right,
        LogicalButton::Up,
        LogicalButton::Down,
        LogicalButton::Primary,
        LogicalButton::Secondary,
    ];

    /// Name used for this button in the config document.
    pub fn name(self) -> &'static str {
        match self {
            LogicalButton::Left => "left",
            LogicalButton::Right => "right",
            LogicalButton::Up => "up",
            LogicalButton::Down => "down",
            LogicalButton::Primary => "primary",
            LogicalButton::Secondary => "secondary",
        }
    }

    /// Look up a button by its config document name.
    ///
    /// Returns `None` for anything outside the fixed set; the match is exact
    /// (`"Left"` is not a button).
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|button| button.name() == name)
    }

    /// Built-in input line for this button.
    pub fn default_line(self) -> u32 {
        DEFAULT_LINES[self.index()]
    }

    /// Built-in key identifier for this button.
    pub fn default_key(self) -> &'static str {
        DEFAULT_KEYS[self.index()]
    }

    fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for LogicalButton {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Resolved input line and key identifier of one logical button
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonMapping {
    /// Input line id (BCM GPIO number on a Raspberry Pi)
    pub line: u32,
    /// Key identifier to press while the button is held
    pub key: String,
}

/// Fully resolved mapping for all six logical buttons.
///
/// Every button always has exactly one line and one key. A `ButtonConfig`
/// owns its mappings outright and cannot be modified once built; resolving a
/// new one never touches the default tables or any earlier instance.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use pico_raspberry::config::{ButtonConfig, LogicalButton};
///
/// let lines = HashMap::from([("left".to_string(), 17)]);
/// let config = ButtonConfig::resolve(&lines, &HashMap::new());
///
/// assert_eq!(config.line(LogicalButton::Left), 17);
/// assert_eq!(config.key(LogicalButton::Primary), "z");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ButtonConfig {
    mappings: [ButtonMapping; BUTTON_COUNT],
}

/// Raw override tables as they appear in the document
#[derive(Debug, Default, Deserialize)]
struct Overrides {
    #[serde(default)]
    gpio: ButtonTable<u32>,
    #[serde(default)]
    pico: ButtonTable<String>,
}

/// One override section; only the six button names are type-checked, any
/// other entry is skipped whatever its value.
#[derive(Debug, Default, Deserialize)]
struct ButtonTable<T> {
    left: Option<T>,
    right: Option<T>,
    up: Option<T>,
    down: Option<T>,
    primary: Option<T>,
    secondary: Option<T>,
}

impl<T> ButtonTable<T> {
    fn into_map(self) -> HashMap<String, T> {
        [
            (LogicalButton::Left, self.left),
            (LogicalButton::Right, self.right),
            (LogicalButton::Up, self.up),
            (LogicalButton::Down, self.down),
            (LogicalButton::Primary, self.primary),
            (LogicalButton::Secondary, self.secondary),
        ]
        .into_iter()
        .filter_map(|(button, value)| value.map(|value| (button.name().to_string(), value)))
        .collect()
    }
}

impl Default for ButtonConfig {
    /// All buttons on their built-in line and key.
    fn default() -> Self {
        Self::resolve(&HashMap::new(), &HashMap::new())
    }
}

impl ButtonConfig {
    /// Merge override tables over the built-in defaults
    ///
    /// # Arguments
    ///
    /// * `lines` - Button name to input line overrides
    /// * `keys` - Button name to key identifier overrides
    ///
    /// # Returns
    ///
    /// * `ButtonConfig` - Every button bound to its override if one was given,
    ///   otherwise to its default. Entries for unknown button names are
    ///   ignored.
    pub fn resolve(lines: &HashMap<String, u32>, keys: &HashMap<String, String>) -> Self {
        let mappings = LogicalButton::ALL.map(|button| ButtonMapping {
            line: lines
                .get(button.name())
                .copied()
                .unwrap_or_else(|| button.default_line()),
            key: keys
                .get(button.name())
                .cloned()
                .unwrap_or_else(|| button.default_key().to_string()),
        });

        Self { mappings }
    }

    /// Parse a JSON config document and resolve it against the defaults
    ///
    /// # Arguments
    ///
    /// * `raw` - Document bytes
    ///
    /// # Errors
    ///
    /// - `Parse`: the bytes are not valid JSON
    /// - `Shape`: the document is not an object, `gpio`/`pico` are not
    ///   objects, or a button entry is not an unsigned integer/string
    ///   respectively (entries for other names are never checked)
    pub fn load_from_document(raw: &[u8]) -> Result<Self> {
        let value: serde_json::Value =
            serde_json::from_slice(raw).map_err(|e| PicoError::Parse(e.to_string()))?;
        let overrides =
            Overrides::deserialize(value).map_err(|e| PicoError::Shape(e.to_string()))?;

        Ok(Self::from_overrides(overrides))
    }

    /// Parse a TOML config document with `[gpio]` and `[pico]` tables
    ///
    /// Same semantics and error kinds as [`ButtonConfig::load_from_document`].
    pub fn load_from_toml(raw: &[u8]) -> Result<Self> {
        let text = std::str::from_utf8(raw).map_err(|e| PicoError::Parse(e.to_string()))?;
        let value: toml::Value = toml::from_str(text).map_err(|e| PicoError::Parse(e.to_string()))?;
        let overrides: Overrides = value
            .try_into()
            .map_err(|e: toml::de::Error| PicoError::Shape(e.to_string()))?;

        Ok(Self::from_overrides(overrides))
    }

    /// Load a config document from disk
    ///
    /// Files ending in `.toml` are parsed as TOML, anything else as JSON.
    ///
    /// # Errors
    ///
    /// - `ConfigNotFound`: nothing exists at `path`
    /// - `Parse` / `Shape`: see [`ButtonConfig::load_from_document`]
    /// - `Io`: any other read failure
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use pico_raspberry::config::{ButtonConfig, DEFAULT_CONFIG_PATH};
    ///
    /// let config = ButtonConfig::load_from_path(DEFAULT_CONFIG_PATH)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read(path).map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => PicoError::ConfigNotFound(path.to_path_buf()),
            _ => PicoError::Io(e),
        })?;

        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            Self::load_from_toml(&raw)
        } else {
            Self::load_from_document(&raw)
        }
    }

    /// Resolved mapping of one button.
    pub fn mapping(&self, button: LogicalButton) -> &ButtonMapping {
        &self.mappings[button.index()]
    }

    /// Resolved input line of one button.
    pub fn line(&self, button: LogicalButton) -> u32 {
        self.mapping(button).line
    }

    /// Resolved key identifier of one button.
    pub fn key(&self, button: LogicalButton) -> &str {
        &self.mapping(button).key
    }

    /// All six buttons with their mappings, in table order.
    pub fn iter(&self) -> impl Iterator<Item = (LogicalButton, &ButtonMapping)> {
        LogicalButton::ALL.into_iter().zip(self.mappings.iter())
    }

    fn from_overrides(overrides: Overrides) -> Self {
        Self::resolve(&overrides.gpio.into_map(), &overrides.pico.into_map())
    }
}

/// Load the config at `path`, falling back to defaults on any failure.
///
/// A successful load is silent. A missing file is reported at `info`,
/// anything else (malformed document, unreadable file) at `warn`. This
/// never fails: a bad config must not keep the buttons from working.
pub fn load_or_default<P: AsRef<Path>>(path: P) -> ButtonConfig {
    let path = path.as_ref();

    match ButtonConfig::load_from_path(path) {
        Ok(config) => config,
        Err(PicoError::ConfigNotFound(_)) => {
            info!("'{}' not found, using default config instead", path.display());
            ButtonConfig::default()
        }
        Err(e @ (PicoError::Parse(_) | PicoError::Shape(_))) => {
            warn!("'{}' malformed, using default config instead: {}", path.display(), e);
            ButtonConfig::default()
        }
        Err(e) => {
            warn!("Failed to load '{}', using default config instead: {}", path.display(), e);
            ButtonConfig::default()
        }
    }
}
