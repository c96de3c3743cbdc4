//! # Type-erased task body.
//!
//! [`TaskBody`] is the unit the middleware chain operates on: a one-shot async
//! function of the task context ([`CancellationToken`]). Every launched task is
//! converted into a `TaskBody`, wrapped by the middleware chain, and then called
//! exactly once on the spawned tokio task.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use graceful::TaskBody;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let body = TaskBody::new(|ctx: CancellationToken| async move {
//!     assert!(!ctx.is_cancelled());
//! });
//! body.call(CancellationToken::new()).await;
//! # }
//! ```

use std::fmt;
use std::future::Future;

use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

type BoxBody = Box<dyn FnOnce(CancellationToken) -> BoxFuture<'static, ()> + Send + 'static>;

/// One-shot async task body receiving the task context.
pub struct TaskBody {
    f: BoxBody,
}

impl TaskBody {
    /// Creates a body from a closure producing the task future.
    pub fn new<F, Fut>(f: F) -> Self
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        Self {
            f: Box::new(move |ctx| Box::pin(f(ctx))),
        }
    }

    /// Consumes the body and returns its future for the given context.
    ///
    /// Middlewares call this on `next` to continue the chain.
    pub fn call(self, ctx: CancellationToken) -> BoxFuture<'static, ()> {
        (self.f)(ctx)
    }
}

impl fmt::Debug for TaskBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskBody").finish_non_exhaustive()
    }
}
