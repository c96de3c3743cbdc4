//! # Middleware chain wrapped around every task body.
//!
//! A [`Middleware`] transforms a [`TaskBody`] into another `TaskBody`, usually
//! running logic before and after calling `next`. The [`Chain`] keeps the
//! registered middlewares in an ordered sequence and composes them around each
//! launched task.
//!
//! ## Composition rule
//! ```text
//! add(M1); add(M2)           → sequence = [M2, M1]     (add prepends)
//! compose(B) = fold left     → M1.wrap(M2.wrap(B))
//!
//! execution: M1-pre ─► M2-pre ─► B ─► M2-post ─► M1-post
//! ```
//! The first registered middleware is therefore the **outermost** wrapper: it
//! observes control first and last.
//!
//! ## Snapshots
//! A `Chain` is immutable: cloning it shares the layers by reference count, and
//! [`Chain::prepended`] builds a new chain instead of mutating in place. Every
//! launch composes from the clone taken at that moment, so later registrations
//! or clears never affect an already launched task.

use std::fmt;
use std::sync::Arc;

use super::body::TaskBody;

/// Transformer applied around a task body.
///
/// Implementations must call `next.call(ctx)` to run the inner chain; not
/// calling it is legal and suppresses the wrapped body entirely.
///
/// Any `Fn(TaskBody) -> TaskBody` closure is a middleware:
/// ```rust
/// use graceful::{Middleware, TaskBody};
///
/// let timing = |next: TaskBody| {
///     TaskBody::new(move |ctx| async move {
///         let started = std::time::Instant::now();
///         next.call(ctx).await;
///         let _elapsed = started.elapsed();
///     })
/// };
/// let _mw: &dyn Middleware = &timing;
/// ```
pub trait Middleware: Send + Sync + 'static {
    /// Wraps `next`, returning the composed body.
    fn wrap(&self, next: TaskBody) -> TaskBody;
}

impl<F> Middleware for F
where
    F: Fn(TaskBody) -> TaskBody + Send + Sync + 'static,
{
    fn wrap(&self, next: TaskBody) -> TaskBody {
        self(next)
    }
}

/// Ordered middleware sequence (index 0 is applied first, i.e. innermost).
#[derive(Clone, Default)]
pub struct Chain {
    layers: Arc<[Arc<dyn Middleware>]>,
}

impl Chain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a chain with `mw` placed at the front of the sequence.
    ///
    /// The receiver is left untouched, so snapshots held elsewhere keep
    /// their contents.
    pub fn prepended(&self, mw: Arc<dyn Middleware>) -> Self {
        let mut layers = Vec::with_capacity(self.layers.len() + 1);
        layers.push(mw);
        layers.extend(self.layers.iter().cloned());
        Self {
            layers: layers.into(),
        }
    }

    /// Number of registered middlewares.
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Returns true if no middleware is registered.
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    /// Applies every middleware left to right around `body`.
    pub fn compose(&self, body: TaskBody) -> TaskBody {
        self.layers.iter().fold(body, |inner, mw| mw.wrap(inner))
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("len", &self.layers.len())
            .finish()
    }
}
