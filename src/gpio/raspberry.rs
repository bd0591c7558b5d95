//! Raspberry Pi GPIO lines via `rppal`.
//!
//! Buttons are wired between the pin and ground with the internal pull-up
//! enabled, so a press pulls the line low: falling edge = activated, rising
//! edge = deactivated.

use rppal::gpio::{Event, Gpio, Trigger};
use tracing::debug;

use super::{Edge, EdgeHandler, EdgeSource, Subscription};
use crate::error::{PicoError, Result};

/// GPIO facility backed by the Raspberry Pi's GPIO character device
pub struct RppalGpio {
    gpio: Gpio,
}

impl std::fmt::Debug for RppalGpio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RppalGpio").finish_non_exhaustive()
    }
}

impl RppalGpio {
    /// Open the GPIO peripheral
    ///
    /// # Errors
    ///
    /// Returns `Gpio` if the board is not a supported Raspberry Pi or the GPIO
    /// device cannot be opened (usually a permissions problem).
    pub fn open() -> Result<Self> {
        let gpio = Gpio::new().map_err(|e| PicoError::Gpio(e.to_string()))?;
        Ok(Self { gpio })
    }
}

impl EdgeSource for RppalGpio {
    fn subscribe(&self, line: u32, mut handler: EdgeHandler) -> Result<Subscription> {
        let pin_number = u8::try_from(line).map_err(|_| PicoError::InvalidLine(line))?;

        let pin = self.gpio.get(pin_number).map_err(|e| match e {
            rppal::gpio::Error::PinNotAvailable(_) => PicoError::InvalidLine(line),
            other => PicoError::LineClaim {
                line,
                reason: other.to_string(),
            },
        })?;
        let mut pin = pin.into_input_pullup();

        pin.set_async_interrupt(Trigger::Both, None, move |event: Event| {
            if let Some(edge) = edge_from_trigger(event.trigger) {
                handler(edge);
            }
        })
        .map_err(|e| PicoError::LineClaim {
            line,
            reason: e.to_string(),
        })?;

        debug!("Subscribed to GPIO line {}", line);
        Ok(Subscription::new(line, pin))
    }
}

/// Translate an interrupt trigger on an active-low line
fn edge_from_trigger(trigger: Trigger) -> Option<Edge> {
    match trigger {
        Trigger::FallingEdge => Some(Edge::Activated),
        Trigger::RisingEdge => Some(Edge::Deactivated),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_active_low_edges() {
        assert_eq!(edge_from_trigger(Trigger::FallingEdge), Some(Edge::Activated));
        assert_eq!(edge_from_trigger(Trigger::RisingEdge), Some(Edge::Deactivated));
    }

    #[test]
    fn test_non_edge_triggers_are_dropped() {
        assert_eq!(edge_from_trigger(Trigger::Both), None);
        assert_eq!(edge_from_trigger(Trigger::Disabled), None);
    }

    // Integration test - only runs on a Raspberry Pi
    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_subscribe_with_real_hardware() {
        let gpio = RppalGpio::open().expect("GPIO not available");

        let subscription = gpio.subscribe(4, Box::new(|edge| println!("Edge: {:?}", edge)));
        assert!(subscription.is_ok(), "Failed to subscribe: {:?}", subscription.err());

        // A second claim on the same pin must fail while the first is alive
        let second = gpio.subscribe(4, Box::new(|_| {}));
        assert!(second.is_err());
    }

    #[test]
    #[ignore] // Run with: cargo test -- --ignored
    fn test_line_out_of_range_with_real_hardware() {
        let gpio = RppalGpio::open().expect("GPIO not available");
        let result = gpio.subscribe(300, Box::new(|_| {}));
        assert!(matches!(result, Err(PicoError::InvalidLine(300))));
    }
}
