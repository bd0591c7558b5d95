//! Virtual keyboard backed by Linux uinput.

use std::io;
use std::sync::{Mutex, PoisonError};

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use tracing::info;

use super::{KeyCode, KeyInjector};
use crate::error::{PicoError, Result};

/// Name the virtual keyboard registers under
pub const DEFAULT_DEVICE_NAME: &str = "pico-raspberry virtual keyboard";

const KEY_UP: i32 = 0;
const KEY_DOWN: i32 = 1;

/// Synthetic keyboard created through `/dev/uinput`
///
/// Writes from concurrent edge callbacks are serialised through a mutex;
/// each press or release is a single event followed by `SYN_REPORT`.
pub struct UinputKeyboard {
    device: Mutex<VirtualDevice>,
}

impl std::fmt::Debug for UinputKeyboard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UinputKeyboard").finish_non_exhaustive()
    }
}

impl UinputKeyboard {
    /// Create the virtual keyboard
    ///
    /// The device advertises every key in [`KeyCode::all`].
    ///
    /// # Errors
    ///
    /// Returns `KeyInjection` if `/dev/uinput` is missing or not writable.
    pub fn create(name: &str) -> Result<Self> {
        let mut keys = AttributeSet::<Key>::new();
        for code in KeyCode::all() {
            keys.insert(code.key());
        }

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(name).with_keys(&keys))
            .and_then(|builder| builder.build())
            .map_err(|e| PicoError::KeyInjection(format!("Failed to create uinput device: {}", e)))?;

        info!("Created virtual keyboard '{}'", name);
        Ok(Self {
            device: Mutex::new(device),
        })
    }

    fn emit(&self, key: KeyCode, value: i32) -> io::Result<()> {
        let event = InputEvent::new(EventType::KEY, key.key().code(), value);
        let mut device = self.device.lock().unwrap_or_else(PoisonError::into_inner);
        device.emit(&[event])
    }
}

impl KeyInjector for UinputKeyboard {
    fn press(&self, key: KeyCode) -> io::Result<()> {
        self.emit(key, KEY_DOWN)
    }

    fn release(&self, key: KeyCode) -> io::Result<()> {
        self.emit(key, KEY_UP)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Integration test - needs write access to /dev/uinput
    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_press_and_release_with_real_uinput() {
        let keyboard = UinputKeyboard::create(DEFAULT_DEVICE_NAME).expect("uinput not available");
        let key: KeyCode = "z".parse().unwrap();

        assert!(keyboard.press(key).is_ok());
        assert!(keyboard.release(key).is_ok());
    }
}
