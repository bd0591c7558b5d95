//! # Key Injection Module
//!
//! Synthetic key presses delivered to the host input subsystem.
//!
//! This module handles:
//! - Parsing key identifiers from the config into [`KeyCode`]s
//! - The [`KeyInjector`] seam button bindings emit through
//! - A uinput virtual keyboard ([`UinputKeyboard`]) implementing it

mod keymap;
mod uinput;

pub use keymap::KeyCode;
pub use uinput::{UinputKeyboard, DEFAULT_DEVICE_NAME};

use std::io;

/// Performs synthetic press/release of a key.
///
/// Implementations are shared by every button binding and must accept calls
/// from several edge callbacks at once.
#[cfg_attr(test, mockall::automock)]
pub trait KeyInjector: Send + Sync {
    /// Put `key` down
    fn press(&self, key: KeyCode) -> io::Result<()>;

    /// Let `key` up
    fn release(&self, key: KeyCode) -> io::Result<()>;
}
