//! # Task bodies and the middleware chain.
//!
//! - [`TaskBody`] - type-erased one-shot async body receiving a `CancellationToken`
//! - [`Middleware`] - transformer wrapping a body (blanket impl for closures)
//! - [`Chain`] - ordered middleware sequence with a fixed composition rule

mod body;
mod middleware;

pub use body::TaskBody;
pub use middleware::{Chain, Middleware};
