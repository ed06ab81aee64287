//! Ctrl+C handling.
//!
//! A single `ctrlc` hook is installed per process. It raises a shared
//! [`AtomicBool`] that the walker and the hash collector poll; both then
//! return an `Interrupted` error and the binary exits with code 130.
//!
//! ```rust,no_run
//! use dups::signal::install_handler;
//! use dups::duplicates::FinderConfig;
//!
//! let handler = install_handler().unwrap();
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
    /// Create a handler with no shutdown requested.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether an interrupt has been received.
    #[must_use]
    pub fn is_shutdown_requested(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    /// The flag to hand to the walker and collector.
    #[must_use]
    pub fn get_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.flag)
    }

    /// Lower the flag.
    pub fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

/// Error type for signal handler installation.
#[derive(Debug, thiserror::Error)]
pub enum SignalError {
    /// Failed to install the Ctrl+C handler.
    #[error("failed to install signal handler: {0}")]
    InstallFailed(#[from] ctrlc::Error),
}

static GLOBAL_HANDLER: OnceLock<ShutdownHandler> = OnceLock::new();

/// Install the process-wide Ctrl+C hook, or reuse the one already installed.
///
/// Repeated calls (for example from several `run_app` invocations in one
/// test binary) return the same handler with its flag lowered.
///
/// # Errors
///
/// Returns [`SignalError::InstallFailed`] if `ctrlc` rejects the hook for a
/// reason other than a previously registered handler.
pub fn install_handler() -> Result<ShutdownHandler, SignalError> {
    let mut install_error = None;

    let handler = GLOBAL_HANDLER.get_or_init(|| {
        let handler = ShutdownHandler::new();
        let flag = handler.get_flag();

        let hook = ctrlc::set_handler(move || {
            flag.store(true, Ordering::SeqCst);
            let _ = writeln!(std::io::stderr(), "\ndups: interrupted, stopping ...");
            let _ = std::io::stderr().flush();
            log::info!("Shutdown signal received");
        });

        match hook {
            Ok(()) => log::debug!("Ctrl+C handler installed"),
            Err(ctrlc::Error::MultipleHandlers) => {
                log::debug!("Ctrl+C handler already registered, using unhooked flag");
            }
            Err(e) => install_error = Some(e),
        }
        handler
    });

    if let Some(e) = install_error {
        return Err(SignalError::InstallFailed(e));
    }

    handler.reset();
    Ok(handler.clone())
}
