//! # Cross-platform termination signal listener.
//!
//! [`ShutdownSignal`] registers its listeners eagerly on construction, so
//! registration errors surface before the listener starts serving, and
//! [`ShutdownSignal::recv`] completes on the first termination signal.
//!
//! ## Signals
//! **Unix platforms:**
//! - `SIGINT` (Ctrl-C in terminal)
//! - `SIGTERM` (default kill signal, used by systemd/Kubernetes)
//!
//! **Windows platforms:**
//! - `Ctrl-C` via [`tokio::signal::ctrl_c`]

#[cfg(unix)]
use tokio::signal::unix::{Signal, SignalKind, signal};

/// Subscription to process termination signals.
///
/// Each instance owns independent signal listeners.
#[derive(Debug)]
pub struct ShutdownSignal {
    #[cfg(unix)]
    sigint: Signal,
    #[cfg(unix)]
    sigterm: Signal,
}

impl ShutdownSignal {
    /// Subscribes to the termination signals.
    ///
    /// Returns `Err` if signal registration fails.
    #[cfg(unix)]
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            sigint: signal(SignalKind::interrupt())?,
            sigterm: signal(SignalKind::terminate())?,
        })
    }

    /// Subscribes to the termination signals.
    #[cfg(not(unix))]
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {})
    }

    /// Waits for the next termination signal.
    #[cfg(unix)]
    pub async fn recv(mut self) {
        tokio::select! {
            _ = self.sigint.recv()  => tracing::info!(signal = "SIGINT", "termination signal received"),
            _ = self.sigterm.recv() => tracing::info!(signal = "SIGTERM", "termination signal received"),
        }
    }

    /// Waits for the next termination signal.
    #[cfg(not(unix))]
    pub async fn recv(self) {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "ctrl-c listener failed; shutdown will not be signalled");
            std::future::pending::<()>().await;
        }
        tracing::info!(signal = "ctrl-c", "termination signal received");
    }
}
