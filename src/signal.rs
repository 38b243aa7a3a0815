//! Ctrl+C handling for graceful shutdown.
//!
//! A single `AtomicBool` is shared by the walker, the fingerprinting pool
//! and the deletion loop. Setting it stops each of them at its next check:
//! between directory entries, between read chunks, and before each
//! deletion. A deletion already in progress is never cut short.
//!
//! ```rust,no_run
//! use dupsweep::signal::install_handler;
//! use dupsweep::duplicates::FinderConfig;
//!
//! let handler = install_handler();
//! let config = FinderConfig::default().with_shutdown_flag(handler.get_flag());
//! ```

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, OnceLock};

/// Shared shutdown flag.
#[derive(Debug, Clone, Default)]
pub struct ShutdownHandler {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandler {
    /// Create a new handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if shutdown has been requested.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// Manually request a shutdown.
    pub fn request_shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Get a clone of the shutdown flag for passing to workers.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Reset the shutdown flag to `false`.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C handler and return its flag holder.
///
/// The hook is registered at most once per process. Later calls (for
/// example several `run_app` invocations in one test binary) get the same
/// handler back with its flag reset. If the hook cannot be registered, a
/// handler without a signal hook is returned; it still works for
/// [`ShutdownHandler::request_shutdown`].
pub fn install_handler() -> ShutdownHandler {
    let handler = GLOBAL_HANDLER.get_or_init(|| {
        let handler = ShutdownHandler::new();
        let flag = handler.get_flag();

        let installed = ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);

            // Flush explicitly, stderr may be redirected to a file
            let _ = writeln!(
                std::io::stderr(),
                "\nInterrupted. Stopping after the current file..."
            );
            let _ = std::io::stderr().flush();

            log::info!("Shutdown signal received");
        });

        if let Err(e) = installed {
            log::warn!("Ctrl+C handler not installed: {}", e);
        }
        handler
    });

    handler.reset();
    handler.clone()
}
