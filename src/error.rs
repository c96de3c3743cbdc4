//! Error types used by the shutdown coordinator and the cleanup registry.
//!
//! - [`ServeError`] — terminal outcome of [`Coordinator::listen_and_serve`](crate::Coordinator::listen_and_serve).
//! - [`CleanupError`] — first finalizer failure reported by [`CleanupRegistry::run`](crate::CleanupRegistry::run).
//!
//! Both provide `as_label` for logs/metrics.

use thiserror::Error;

/// Boxed error returned by finalizers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Terminal outcome of a coordinated listener.
///
/// `Closed` is the sentinel for a listener that stopped because a shutdown was
/// requested and completed cleanly; it is not a real failure.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum ServeError<E>
where
    E: std::error::Error + 'static,
{
    /// Listener stopped after a shutdown request.
    #[error("listener closed")]
    Closed,

    /// The serve loop itself failed.
    #[error("listener failed: {0}")]
    Listener(#[source] E),

    /// The serve loop returned, but the graceful stop reported an error.
    #[error("listener stop failed: {0}")]
    Stop(#[source] E),

    /// The graceful stop did not complete (the stop routine panicked).
    #[error("listener stop aborted")]
    StopAborted,

    /// Subscribing to termination signals failed.
    #[error("signal registration failed: {0}")]
    Signal(#[from] std::io::Error),
}

impl<E> ServeError<E>
where
    E: std::error::Error + 'static,
{
    /// Returns true for the [`ServeError::Closed`] sentinel.
    ///
    /// # Example
    /// ```
    /// use graceful::ServeError;
    ///
    /// let err: ServeError<std::io::Error> = ServeError::Closed;
    /// assert!(err.is_closed());
    /// ```
    pub fn is_closed(&self) -> bool {
        matches!(self, ServeError::Closed)
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ServeError::Closed => "serve_closed",
            ServeError::Listener(_) => "serve_listener_failed",
            ServeError::Stop(_) => "serve_stop_failed",
            ServeError::StopAborted => "serve_stop_aborted",
            ServeError::Signal(_) => "serve_signal_failed",
        }
    }
}

/// # Finalizer failure.
///
/// Finalizers run in registration order; the first failure stops the sequence.
#[derive(Error, Debug)]
#[error("cleanup #{index} failed: {source}")]
pub struct CleanupError {
    /// Registration index of the failing finalizer.
    pub index: usize,
    /// Error returned by the finalizer.
    #[source]
    pub source: BoxError,
}

impl CleanupError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        "cleanup_failed"
    }
}
