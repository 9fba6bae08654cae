//! Shutdown state for watch mode.
//!
//! `SHUTDOWN` records whether Ctrl+C was received. Once the actor system has
//! registered its shutdown channel, the handler notifies it instead of
//! exiting so that pending uploads can drain.

use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};

use crossbeam::channel::Sender;

/// Shutdown has been requested (Ctrl+C received)
static SHUTDOWN: AtomicBool = AtomicBool::new(false);

/// Shutdown signal sender for actor system
static SHUTDOWN_TX: OnceLock<Sender<()>> = OnceLock::new();

/// Setup the global Ctrl+C handler. Call once at program start
///
/// The handler behavior depends on whether a receiver has been registered:
/// - Before `register_shutdown()`: exit immediately, nothing to drain
/// - After `register_shutdown()`: notify the coordinator, which stops the
///   watcher and drains queued operations
pub fn setup_shutdown_handler() -> anyhow::Result<()> {
    ctrlc::set_handler(|| {
        let repeated = SHUTDOWN.swap(true, Ordering::SeqCst);

        match SHUTDOWN_TX.get() {
            Some(tx) if !repeated => {
                crate::log!("watch"; "shutting down...");
                let _ = tx.send(());
            }
            // Second Ctrl+C, or nothing to shut down gracefully
            _ => std::process::exit(130),
        }
    })
    .map_err(|e| anyhow::anyhow!("failed to set Ctrl+C handler: {}", e))
}

/// Register the actor system for graceful shutdown
pub fn register_shutdown(shutdown_tx: Sender<()>) {
    let _ = SHUTDOWN_TX.set(shutdown_tx);
}

/// Check if shutdown has been requested
pub fn is_shutdown() -> bool {
    SHUTDOWN.load(Ordering::Relaxed)
}
