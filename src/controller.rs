//! # Controller Module
//!
//! Owns the six button bindings for the lifetime of the process.
//!
//! Construction is all-or-nothing: if any button cannot be bound, every line
//! claimed so far is released and no controller is returned.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use crate::binding::ButtonBinding;
use crate::config::{ButtonConfig, LogicalButton};
use crate::error::{PicoError, Result};
use crate::gpio::EdgeSource;
use crate::keys::{KeyCode, KeyInjector};

/// Running state of all physical buttons
#[derive(Debug)]
pub struct Controller {
    bindings: BTreeMap<LogicalButton, ButtonBinding>,
}

impl Controller {
    /// Bind every logical button described by `config`
    ///
    /// The whole config is checked before any line is claimed: every key
    /// identifier must be known and no two buttons may share a line.
    ///
    /// # Arguments
    ///
    /// * `config` - Resolved button mapping
    /// * `gpio` - Facility delivering edge notifications
    /// * `injector` - Facility performing key presses, shared by all bindings
    ///
    /// # Errors
    ///
    /// - `UnknownKey`: a key identifier cannot be pressed
    /// - `DuplicateLine`: two buttons resolve to the same line
    /// - `InvalidLine` / `LineClaim`: a line cannot be subscribed
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::sync::Arc;
    /// use pico_raspberry::config::ButtonConfig;
    /// use pico_raspberry::controller::Controller;
    /// use pico_raspberry::gpio::RppalGpio;
    /// use pico_raspberry::keys::UinputKeyboard;
    ///
    /// let gpio = RppalGpio::open()?;
    /// let keyboard = Arc::new(UinputKeyboard::create("pico-raspberry")?);
    /// let controller = Controller::new(&ButtonConfig::default(), &gpio, keyboard)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new<G>(config: &ButtonConfig, gpio: &G, injector: Arc<dyn KeyInjector>) -> Result<Self>
    where
        G: EdgeSource + ?Sized,
    {
        validate(config)?;

        let mut bindings = BTreeMap::new();
        for (button, mapping) in config.iter() {
            let binding = ButtonBinding::new(mapping.line, &mapping.key, gpio, Arc::clone(&injector))?;
            info!("Bound {} to GPIO {} (key '{}')", button, mapping.line, mapping.key);
            bindings.insert(button, binding);
        }

        Ok(Self { bindings })
    }

    /// Binding of one logical button
    pub fn binding(&self, button: LogicalButton) -> &ButtonBinding {
        &self.bindings[&button]
    }

    /// All bindings, in button order
    pub fn bindings(&self) -> impl Iterator<Item = (LogicalButton, &ButtonBinding)> {
        self.bindings.iter().map(|(button, binding)| (*button, binding))
    }
}

fn validate(config: &ButtonConfig) -> Result<()> {
    let mut lines: BTreeMap<u32, LogicalButton> = BTreeMap::new();

    for (button, mapping) in config.iter() {
        mapping.key.parse::<KeyCode>()?;

        match lines.entry(mapping.line) {
            Entry::Occupied(first) => {
                return Err(PicoError::DuplicateLine {
                    line: mapping.line,
                    first: first.get().name(),
                    second: button.name(),
                });
            }
            Entry::Vacant(slot) => {
                slot.insert(button);
            }
        }
    }

    Ok(())
}
