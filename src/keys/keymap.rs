use std::fmt;
use std::str::FromStr;

use evdev::Key;

use crate::error::PicoError;

/// Key identifiers understood in the config, with the evdev key they press.
///
/// The first name listed for a key is its canonical name.
const KEY_NAMES: &[(&str, Key)] = &[
    ("a", Key::KEY_A),
    ("b", Key::KEY_B),
    ("c", Key::KEY_C),
    ("d", Key::KEY_D),
    ("e", Key::KEY_E),
    ("f", Key::KEY_F),
    ("g", Key::KEY_G),
    ("h", Key::KEY_H),
    ("i", Key::KEY_I),
    ("j", Key::KEY_J),
    ("k", Key::KEY_K),
    ("l", Key::KEY_L),
    ("m", Key::KEY_M),
    ("n", Key::KEY_N),
    ("o", Key::KEY_O),
    ("p", Key::KEY_P),
    ("q", Key::KEY_Q),
    ("r", Key::KEY_R),
    ("s", Key::KEY_S),
    ("t", Key::KEY_T),
    ("u", Key::KEY_U),
    ("v", Key::KEY_V),
    ("w", Key::KEY_W),
    ("x", Key::KEY_X),
    ("y", Key::KEY_Y),
    ("z", Key::KEY_Z),
    ("0", Key::KEY_0),
    ("1", Key::KEY_1),
    ("2", Key::KEY_2),
    ("3", Key::KEY_3),
    ("4", Key::KEY_4),
    ("5", Key::KEY_5),
    ("6", Key::KEY_6),
    ("7", Key::KEY_7),
    ("8", Key::KEY_8),
    ("9", Key::KEY_9),
    ("left", Key::KEY_LEFT),
    ("right", Key::KEY_RIGHT),
    ("up", Key::KEY_UP),
    ("down", Key::KEY_DOWN),
    ("enter", Key::KEY_ENTER),
    ("return", Key::KEY_ENTER),
    ("space", Key::KEY_SPACE),
    ("esc", Key::KEY_ESC),
    ("escape", Key::KEY_ESC),
    ("tab", Key::KEY_TAB),
    ("backspace", Key::KEY_BACKSPACE),
    ("shift", Key::KEY_LEFTSHIFT),
    ("right shift", Key::KEY_RIGHTSHIFT),
    ("ctrl", Key::KEY_LEFTCTRL),
    ("control", Key::KEY_LEFTCTRL),
    ("right ctrl", Key::KEY_RIGHTCTRL),
    ("alt", Key::KEY_LEFTALT),
    ("right alt", Key::KEY_RIGHTALT),
    ("f1", Key::KEY_F1),
    ("f2", Key::KEY_F2),
    ("f3", Key::KEY_F3),
    ("f4", Key::KEY_F4),
    ("f5", Key::KEY_F5),
    ("f6", Key::KEY_F6),
    ("f7", Key::KEY_F7),
    ("f8", Key::KEY_F8),
    ("f9", Key::KEY_F9),
    ("f10", Key::KEY_F10),
    ("f11", Key::KEY_F11),
    ("f12", Key::KEY_F12),
    ("minus", Key::KEY_MINUS),
    ("-", Key::KEY_MINUS),
    ("equal", Key::KEY_EQUAL),
    ("=", Key::KEY_EQUAL),
    ("comma", Key::KEY_COMMA),
    (",", Key::KEY_COMMA),
    ("period", Key::KEY_DOT),
    (".", Key::KEY_DOT),
    ("slash", Key::KEY_SLASH),
    ("/", Key::KEY_SLASH),
    ("semicolon", Key::KEY_SEMICOLON),
    (";", Key::KEY_SEMICOLON),
    ("apostrophe", Key::KEY_APOSTROPHE),
    ("'", Key::KEY_APOSTROPHE),
    ("backslash", Key::KEY_BACKSLASH),
    ("\\", Key::KEY_BACKSLASH),
    ("grave", Key::KEY_GRAVE),
    ("`", Key::KEY_GRAVE),
    ("[", Key::KEY_LEFTBRACE),
    ("]", Key::KEY_RIGHTBRACE),
];

/// Key identifier resolved to the key the virtual keyboard presses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyCode(Key);

impl KeyCode {
    /// Underlying evdev key
    pub fn key(&self) -> Key {
        self.0
    }

    /// Canonical config name of this key
    pub fn name(&self) -> &'static str {
        KEY_NAMES
            .iter()
            .find(|(_, key)| *key == self.0)
            .map(|(name, _)| *name)
            .unwrap_or("unknown")
    }

    /// Every key a config may name, without duplicates
    pub fn all() -> impl Iterator<Item = KeyCode> {
        KEY_NAMES
            .iter()
            .enumerate()
            .filter(|(i, (_, key))| !KEY_NAMES[..*i].iter().any(|(_, seen)| seen == key))
            .map(|(_, (_, key))| KeyCode(*key))
    }
}

impl fmt::Display for KeyCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyCode {
    type Err = PicoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        KEY_NAMES
            .iter()
            .find(|(name, _)| *name == wanted)
            .map(|(_, key)| KeyCode(*key))
            .ok_or_else(|| PicoError::UnknownKey(s.to_string()))
    }
}
