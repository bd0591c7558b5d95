//! # Button Binding Module
//!
//! Turns the edges of one input line into paired key-down/key-up calls.
//!
//! ## State Machine
//!
//! | State | Edge | Next | Emits |
//! |-------|------|------|-------|
//! | Idle | Activated | Pressed | press(key) |
//! | Pressed | Deactivated | Idle | release(key) |
//! | Pressed | Activated | Pressed | nothing (bounce) |
//! | Idle | Deactivated | Idle | nothing |
//!
//! Each binding guards its own state; bindings on different lines never
//! wait on each other's state lock.

use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::{debug, trace, warn};

use crate::error::Result;
use crate::gpio::{Edge, EdgeSource, Subscription};
use crate::keys::{KeyCode, KeyInjector};

/// Logical press state tracked per binding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PressState {
    #[default]
    Idle,
    Pressed,
}

/// Key action emitted by a state transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Pressed,
    Released,
}

impl KeyAction {
    pub fn as_str(self) -> &'static str {
        match self {
            KeyAction::Pressed => "pressed",
            KeyAction::Released => "released",
        }
    }
}

impl fmt::Display for KeyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State shared between the binding and its edge handler
struct BindingCore {
    line: u32,
    key: KeyCode,
    key_id: String,
    state: Mutex<PressState>,
    injector: Arc<dyn KeyInjector>,
}

impl BindingCore {
    /// Apply one edge; `None` when it does not change the press state
    fn handle_edge(&self, edge: Edge) -> Option<KeyAction> {
        // A panicked callback must not wedge the line forever
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);

        let action = match (*state, edge) {
            (PressState::Idle, Edge::Activated) => KeyAction::Pressed,
            (PressState::Pressed, Edge::Deactivated) => KeyAction::Released,
            (current, edge) => {
                trace!(line = self.line, ?current, ?edge, "Ignoring repeated edge");
                return None;
            }
        };

        let result = match action {
            KeyAction::Pressed => {
                *state = PressState::Pressed;
                self.injector.press(self.key)
            }
            KeyAction::Released => {
                *state = PressState::Idle;
                self.injector.release(self.key)
            }
        };

        debug!(line = self.line, action = action.as_str(), key = %self.key_id, "Button {}", action);

        if let Err(e) = result {
            warn!("Failed to inject {} for key '{}' on line {}: {}", action, self.key_id, self.line, e);
        }

        Some(action)
    }
}

/// One physical button bound to one key.
///
/// Lives as long as the process; dropping it releases the input line.
pub struct ButtonBinding {
    core: Arc<BindingCore>,
    subscription: Subscription,
}

impl fmt::Debug for ButtonBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ButtonBinding")
            .field("line", &self.core.line)
            .field("key", &self.core.key_id)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl ButtonBinding {
    /// Bind `line` to `key_id` and start listening for edges
    ///
    /// # Arguments
    ///
    /// * `line` - Input line to claim
    /// * `key_id` - Key identifier to press while the button is held
    /// * `gpio` - Facility delivering the line's edges
    /// * `injector` - Facility performing the key presses
    ///
    /// # Errors
    ///
    /// - `UnknownKey`: `key_id` is not a key the injector can press
    /// - `InvalidLine` / `LineClaim`: the line cannot be subscribed
    pub fn new<G>(line: u32, key_id: &str, gpio: &G, injector: Arc<dyn KeyInjector>) -> Result<Self>
    where
        G: EdgeSource + ?Sized,
    {
        let key: KeyCode = key_id.parse()?;

        let core = Arc::new(BindingCore {
            line,
            key,
            key_id: key_id.to_string(),
            state: Mutex::new(PressState::Idle),
            injector,
        });

        let handler_core = Arc::clone(&core);
        let subscription = gpio.subscribe(
            line,
            Box::new(move |edge| {
                handler_core.handle_edge(edge);
            }),
        )?;

        Ok(Self { core, subscription })
    }

    /// Input line this binding listens to
    pub fn line(&self) -> u32 {
        self.subscription.line()
    }

    /// Key identifier as written in the config
    pub fn key_id(&self) -> &str {
        &self.core.key_id
    }

    /// Key pressed by this binding
    pub fn key(&self) -> KeyCode {
        self.core.key
    }

    /// Current logical press state
    pub fn state(&self) -> PressState {
        *self.core.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
