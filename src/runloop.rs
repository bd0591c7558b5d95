//! # Run Loop Module
//!
//! Parks the main task while edge callbacks do the work, until the process
//! is asked to stop.

use std::future::Future;

use tracing::{info, warn};

use crate::error::Result;

/// Wait until `shutdown` resolves
///
/// Edge callbacks keep running on their own threads while this waits; nothing
/// in flight is interrupted when it returns.
///
/// # Examples
///
/// ```no_run
/// use pico_raspberry::runloop::{run_until, shutdown_signal};
///
/// #[tokio::main]
/// async fn main() -> anyhow::Result<()> {
///     run_until(shutdown_signal()).await?;
///     Ok(())
/// }
/// ```
pub async fn run_until<F>(shutdown: F) -> Result<()>
where
    F: Future<Output = ()>,
{
    info!("Listening for button presses, press Ctrl+C to exit");
    shutdown.await;
    info!("Shutting down...");
    Ok(())
}

/// Resolves on Ctrl+C (SIGINT) or, on Unix, SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to listen for SIGTERM: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
