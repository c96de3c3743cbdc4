//! # Coordinator: runs a listener until a termination signal stops it.
//!
//! The [`Coordinator`] drives an externally owned [`Listener`] (typically an
//! HTTP server) and arranges a graceful stop when SIGINT/SIGTERM arrives.
//!
//! ## Sequence
//! ```text
//! listen_and_serve(listener)
//!   ├─► ShutdownSignal::new()            (SIGINT + SIGTERM; error → ServeError::Signal)
//!   └─► serve_until(listener, signal.recv())
//!         ├─► spawn watcher:
//!         │     trigger.await
//!         │     stopping.cancel()
//!         │     listener.shutdown(cfg.shutdown_deadline())   (watcher output)
//!         ├─► listener.serve().await                     (calling task)
//!         └─► stop requested? ─ yes ─► watcher.await ─► outcome   (handshake)
//!                              └ no ──► abort watcher ─► outcome
//! ```
//!
//! ## Outcome
//! | serve      | stop requested | stop result | returned                       |
//! |------------|----------------|-------------|--------------------------------|
//! | `Err(e)`   | any            | any         | `Err(ServeError::Listener)`    |
//! | `Ok(())`   | yes            | `Ok`        | `Err(ServeError::Closed)`      |
//! | `Ok(())`   | yes            | `Err(e)`    | `Err(ServeError::Stop)`        |
//! | `Ok(())`   | yes            | panicked    | `Err(ServeError::StopAborted)` |
//! | `Ok(())`   | no             | -           | `Ok(())`                       |
//!
//! A failed stop is logged and reported, never escalated to a process abort.
//! The watcher never outlives the call: dropping the returned future aborts it.
//! The coordinator does not wait on tracked tasks; call
//! [`Supervisor::wait`](crate::Supervisor::wait) after it returns.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use tokio_util::task::AbortOnDropHandle;

use crate::config::Config;
use crate::core::shutdown::ShutdownSignal;
use crate::error::ServeError;

/// # Resource served until it is asked to stop.
///
/// # Example
/// ```
/// use std::time::Duration;
/// use async_trait::async_trait;
/// use tokio::sync::Notify;
/// use graceful::Listener;
///
/// struct Idle(Notify);
///
/// #[async_trait]
/// impl Listener for Idle {
///     type Error = std::io::Error;
///
///     async fn serve(&self) -> Result<(), Self::Error> {
///         self.0.notified().await;
///         Ok(())
///     }
///
///     async fn shutdown(&self, _deadline: Option<Duration>) -> Result<(), Self::Error> {
///         self.0.notify_one();
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Listener: Send + Sync + 'static {
    /// Error produced by serving or stopping.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Serves until stopped or failed.
    ///
    /// Returns `Ok(())` when the loop ended because of [`Listener::shutdown`]
    /// (or otherwise finished on its own).
    async fn serve(&self) -> Result<(), Self::Error>;

    /// Requests a graceful stop, draining in-flight work.
    ///
    /// `deadline` is `None` for an unbounded drain.
    async fn shutdown(&self, deadline: Option<Duration>) -> Result<(), Self::Error>;
}

/// Sequences a listener's serve loop against termination signals.
#[derive(Clone, Debug, Default)]
pub struct Coordinator {
    cfg: Config,
}

impl Coordinator {
    /// Creates a coordinator with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self { cfg }
    }

    /// Returns the configuration.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Serves `listener` until SIGINT/SIGTERM stops it.
    pub async fn listen_and_serve<L>(&self, listener: Arc<L>) -> Result<(), ServeError<L::Error>>
    where
        L: Listener,
    {
        let signal = ShutdownSignal::new()?;
        self.serve_until(listener, signal.recv()).await
    }

    /// Serves `listener` until `trigger` completes, then stops it gracefully.
    ///
    /// Same sequencing as [`Coordinator::listen_and_serve`], with a caller
    /// supplied stop trigger instead of OS signals.
    pub async fn serve_until<L, S>(
        &self,
        listener: Arc<L>,
        trigger: S,
    ) -> Result<(), ServeError<L::Error>>
    where
        L: Listener,
        S: Future<Output = ()> + Send + 'static,
    {
        let stopping = CancellationToken::new();

        // Dropping the handle aborts the watcher, so leaving this call early
        // releases the listener and the trigger.
        let watcher = {
            let listener = Arc::clone(&listener);
            let stopping = stopping.clone();
            let deadline = self.cfg.shutdown_deadline();
            AbortOnDropHandle::new(tokio::spawn(async move {
                trigger.await;
                stopping.cancel();
                tracing::info!(?deadline, "stopping listener");
                listener.shutdown(deadline).await
            }))
        };

        let served = listener.serve().await;

        if !stopping.is_cancelled() {
            return served.map_err(ServeError::Listener);
        }

        match (served, watcher.await) {
            (Err(e), _) => Err(ServeError::Listener(e)),
            (Ok(()), Ok(Ok(()))) => {
                tracing::info!("listener closed");
                Err(ServeError::Closed)
            }
            (Ok(()), Ok(Err(e))) => {
                tracing::error!(error = %e, "could not shut down listener");
                Err(ServeError::Stop(e))
            }
            (Ok(()), Err(join)) => {
                tracing::error!(error = %join, "listener stop aborted");
                Err(ServeError::StopAborted)
            }
        }
    }
}

/// Serves `listener` with a default [`Coordinator`] until SIGINT/SIGTERM.
pub async fn listen_and_serve<L>(listener: Arc<L>) -> Result<(), ServeError<L::Error>>
where
    L: Listener,
{
    Coordinator::default().listen_and_serve(listener).await
}
