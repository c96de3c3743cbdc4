//! # Cleanup registry.
//!
//! [`CleanupRegistry`] is an append-only list of finalizers invoked at teardown.
//!
//! ## Rules
//! - finalizers run once per [`CleanupRegistry::run`], in registration order
//! - `run` does not clear the list; calling it again runs everything again
//! - the first failing finalizer stops the sequence and is returned as [`CleanupError`]
//! - finalizers run outside the internal lock, so they may register more finalizers

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;

use crate::error::{BoxError, CleanupError};

type Finalizer = Arc<dyn Fn() -> Result<(), BoxError> + Send + Sync + 'static>;

/// Ordered list of teardown finalizers.
///
/// # Example
/// ```
/// use graceful::CleanupRegistry;
///
/// let cleanup = CleanupRegistry::new();
/// cleanup.add(|| {
///     // flush buffers, close files...
///     Ok(())
/// });
/// cleanup.run().unwrap();
/// ```
#[derive(Default)]
pub struct CleanupRegistry {
    finalizers: Mutex<Vec<Finalizer>>,
}

impl CleanupRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a finalizer.
    pub fn add<F>(&self, f: F)
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.finalizers.lock().push(Arc::new(f));
    }

    /// Number of registered finalizers.
    pub fn len(&self) -> usize {
        self.finalizers.lock().len()
    }

    /// Returns true if nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.finalizers.lock().is_empty()
    }

    /// Invokes every finalizer in registration order.
    pub fn run(&self) -> Result<(), CleanupError> {
        let finalizers: Vec<Finalizer> = self.finalizers.lock().clone();
        tracing::debug!(count = finalizers.len(), "running cleanup");

        for (index, f) in finalizers.iter().enumerate() {
            if let Err(source) = f() {
                tracing::warn!(index, error = %source, "cleanup failed, skipping the rest");
                return Err(CleanupError { index, source });
            }
        }
        Ok(())
    }
}

impl fmt::Debug for CleanupRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CleanupRegistry")
            .field("len", &self.len())
            .finish()
    }
}
