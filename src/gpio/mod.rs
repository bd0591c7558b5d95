//! # GPIO Module
//!
//! Edge notifications from physical input lines.
//!
//! This module handles:
//! - The [`EdgeSource`] seam every button binding subscribes through
//! - Claiming lines on a Raspberry Pi via `rppal` ([`RppalGpio`])
//! - Releasing a line when its [`Subscription`] is dropped

mod raspberry;

pub use raspberry::RppalGpio;

use crate::error::Result;

/// Physical transition of an input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    /// Button physically pressed
    Activated,
    /// Button physically released
    Deactivated,
}

/// Callback invoked for every edge on a subscribed line.
///
/// Edges for one line arrive in order and never overlap; different lines may
/// call their handlers concurrently.
pub type EdgeHandler = Box<dyn FnMut(Edge) + Send + 'static>;

/// Live claim on an input line.
///
/// The line stays claimed and its handler registered for as long as this
/// value lives.
pub struct Subscription {
    line: u32,
    _claim: Box<dyn Send>,
}

impl Subscription {
    /// Wrap whatever keeps the line claimed (a pin handle, a guard...).
    pub fn new<C: Send + 'static>(line: u32, claim: C) -> Self {
        Self {
            line,
            _claim: Box::new(claim),
        }
    }

    /// Line this subscription holds
    pub fn line(&self) -> u32 {
        self.line
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("line", &self.line)
            .finish_non_exhaustive()
    }
}

/// Source of edge notifications for input lines
pub trait EdgeSource {
    /// Claim `line` and deliver both activation and deactivation edges to
    /// `handler` until the returned [`Subscription`] is dropped.
    ///
    /// # Errors
    ///
    /// - `InvalidLine`: the line does not exist on this board
    /// - `LineClaim`: the line is already claimed or cannot be configured
    fn subscribe(&self, line: u32, handler: EdgeHandler) -> Result<Subscription>;
}

#[cfg(test)]
pub mod mocks {
    use super::*;
    use crate::error::PicoError;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    /// Highest line the mock board exposes (matches the Pi's BCM 0-27)
    pub const MOCK_MAX_LINE: u32 = 27;

    type SharedHandler = Arc<Mutex<EdgeHandler>>;

    /// In-memory GPIO board for testing
    ///
    /// A line maps to `Some(handler)` when subscribed through this mock and
    /// to `None` when held by "someone else" (see [`MockGpio::claim_externally`]).
    #[derive(Clone, Default)]
    pub struct MockGpio {
        lines: Arc<Mutex<HashMap<u32, Option<SharedHandler>>>>,
    }

    struct MockClaim {
        line: u32,
        lines: Arc<Mutex<HashMap<u32, Option<SharedHandler>>>>,
    }

    impl Drop for MockClaim {
        fn drop(&mut self) {
            self.lines.lock().unwrap().remove(&self.line);
        }
    }

    impl MockGpio {
        pub fn new() -> Self {
            Self::default()
        }

        /// Mark a line as already in use by another process
        pub fn claim_externally(&self, line: u32) {
            self.lines.lock().unwrap().insert(line, None);
        }

        /// Whether a handler is currently registered for `line`
        pub fn is_subscribed(&self, line: u32) -> bool {
            matches!(self.lines.lock().unwrap().get(&line), Some(Some(_)))
        }

        /// Number of lines with a registered handler
        pub fn subscribed_count(&self) -> usize {
            self.lines.lock().unwrap().values().filter(|h| h.is_some()).count()
        }

        /// Deliver an edge to the handler of `line`
        ///
        /// Returns `false` when nothing is subscribed to the line.
        pub fn fire(&self, line: u32, edge: Edge) -> bool {
            let handler = match self.lines.lock().unwrap().get(&line) {
                Some(Some(handler)) => Arc::clone(handler),
                _ => return false,
            };
            let mut callback = handler.lock().unwrap();
            (*callback)(edge);
            true
        }
    }

    impl EdgeSource for MockGpio {
        fn subscribe(&self, line: u32, handler: EdgeHandler) -> Result<Subscription> {
            if line > MOCK_MAX_LINE {
                return Err(PicoError::InvalidLine(line));
            }

            let mut lines = self.lines.lock().unwrap();
            if lines.contains_key(&line) {
                return Err(PicoError::LineClaim {
                    line,
                    reason: "line already in use".to_string(),
                });
            }
            lines.insert(line, Some(Arc::new(Mutex::new(handler))));

            Ok(Subscription::new(
                line,
                MockClaim {
                    line,
                    lines: Arc::clone(&self.lines),
                },
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::mocks::MockGpio;
    use super::*;
    use crate::error::PicoError;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_mock_delivers_edges_in_order() {
        let gpio = MockGpio::new();
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);

        let _subscription = gpio
            .subscribe(4, Box::new(move |edge| sink.lock().unwrap().push(edge)))
            .unwrap();

        assert!(gpio.fire(4, Edge::Activated));
        assert!(gpio.fire(4, Edge::Deactivated));
        assert!(!gpio.fire(5, Edge::Activated));

        assert_eq!(*seen.lock().unwrap(), vec![Edge::Activated, Edge::Deactivated]);
    }

    #[test]
    fn test_dropping_subscription_releases_line() {
        let gpio = MockGpio::new();

        let subscription = gpio.subscribe(7, Box::new(|_| {})).unwrap();
        assert_eq!(subscription.line(), 7);
        assert!(gpio.is_subscribed(7));

        drop(subscription);
        assert!(!gpio.is_subscribed(7));
        assert!(gpio.subscribe(7, Box::new(|_| {})).is_ok());
    }

    #[test]
    fn test_double_claim_is_rejected() {
        let gpio = MockGpio::new();
        gpio.claim_externally(2);

        let result = gpio.subscribe(2, Box::new(|_| {}));
        assert!(matches!(result, Err(PicoError::LineClaim { line: 2, .. })));
    }

    #[test]
    fn test_line_out_of_range() {
        let gpio = MockGpio::new();
        let result = gpio.subscribe(40, Box::new(|_| {}));
        assert!(matches!(result, Err(PicoError::InvalidLine(40))));
    }
}
