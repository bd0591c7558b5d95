//! # Pico Raspberry
//!
//! Turn GPIO buttons on a Raspberry Pi into keyboard presses for PICO-8.
//!
//! This application binds six buttons (left, right, up, down, primary,
//! secondary) to keys of a virtual uinput keyboard and waits for Ctrl+C.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use pico_raspberry::config::{self, DEFAULT_CONFIG_PATH};
use pico_raspberry::controller::Controller;
use pico_raspberry::gpio::RppalGpio;
use pico_raspberry::keys::{UinputKeyboard, DEFAULT_DEVICE_NAME};
use pico_raspberry::runloop::{run_until, shutdown_signal};

/// Main entry point for Pico Raspberry
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Set up logging with tracing subscriber
///    - Load the button mapping, falling back to defaults on any problem
///    - Open GPIO and create the virtual keyboard
///    - Bind all six buttons (any failure here aborts startup)
///
/// 2. **Run**
///    - Edge callbacks translate presses while the main task waits
///
/// 3. **Graceful Shutdown**
///    - Ctrl+C or SIGTERM ends the wait
///    - Dropping the controller releases every GPIO line
///
/// # Errors
///
/// Returns error if GPIO or uinput cannot be opened, or if a button cannot be
/// bound to its line or key.
///
/// # Examples
///
/// Run with press/release diagnostics:
/// ```bash
/// RUST_LOG=pico_raspberry=debug pico-raspberry
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into())
        )
        .init();

    info!("Pico Raspberry v{} starting...", env!("CARGO_PKG_VERSION"));

    let button_config = config::load_or_default(Path::new(DEFAULT_CONFIG_PATH));

    let gpio = RppalGpio::open().context("Failed to open GPIO")?;
    let keyboard = Arc::new(UinputKeyboard::create(DEFAULT_DEVICE_NAME).context("Failed to create virtual keyboard")?);

    let controller = Controller::new(&button_config, &gpio, keyboard)
        .context("Failed to bind buttons")?;

    run_until(shutdown_signal()).await?;

    drop(controller);
    Ok(())
}
