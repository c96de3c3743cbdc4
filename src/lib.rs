//! # graceful
//!
//! **graceful** tracks concurrently launched tokio tasks and coordinates their
//! completion with process shutdown.
//!
//! It provides a supervisor that counts in-flight tasks, wraps each one in an
//! ordered middleware chain and joins them on demand, plus a coordinator that
//! serves a listener until SIGINT/SIGTERM asks it to stop. The goal is
//! visibility and an orderly join, not scheduling: tasks are never cancelled,
//! restarted or pooled.
//!
//! ## Architecture
//! ```text
//!   sup.run(..) / sup.run_context(ctx, ..)
//!            │
//!            ▼
//! ┌──────────────────────────────────────────────────────────┐
//! │  Supervisor                                              │
//! │  - Outstanding (count, acquired before spawn)            │
//! │  - Chain (middlewares, snapshot per launch)              │
//! │  - DebugSlot ("Go routine started in: file:line")        │
//! │  - CleanupRegistry (finalizers, registration order)      │
//! └──────┬───────────────────────────────────────────────────┘
//!        ▼
//!   tokio::spawn( M1 ─► M2 ─► ... ─► body(ctx) ) ─► count -= 1
//!
//!   sup.wait().await   ◄── resolves when count == 0
//!
//! ┌──────────────────────────────────────────────────────────┐
//! │  Coordinator::listen_and_serve(listener)                 │
//! │  - watcher: SIGINT/SIGTERM ─► listener.shutdown(grace)   │
//! │  - caller:  listener.serve()                             │
//! │  - handshake: returns only after the stop has finished   │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Shutdown order
//! The two components are independent; a typical `main` sequences them:
//! 1. `coordinator.listen_and_serve(server).await` (returns `ServeError::Closed` on signal)
//! 2. `sup.wait().await` (drain tracked tasks)
//! 3. `sup.cleanup()` (finalizers)
//!
//! ## Features
//! | Area              | Description                                              | Key types / traits                     |
//! |-------------------|----------------------------------------------------------|----------------------------------------|
//! | **Supervision**   | Tracked launches, join, call-site debug logging.         | [`Supervisor`], [`SupervisorBuilder`]  |
//! | **Middleware**    | Ordered wrappers around every task body.                 | [`Middleware`], [`TaskBody`], [`Chain`]|
//! | **Shutdown**      | Serve a listener until a termination signal stops it.    | [`Coordinator`], [`Listener`]          |
//! | **Cleanup**       | Teardown finalizers in registration order.               | [`CleanupRegistry`]                    |
//! | **Errors**        | Typed outcomes for serving and cleanup.                  | [`ServeError`], [`CleanupError`]       |
//! | **Configuration** | Shutdown grace allowance.                                | [`Config`]                             |
//!
//! ## Optional features
//! - `logging`: exports a built-in [`LogWriter`] debug logger backed by `tracing`.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use tokio_util::sync::CancellationToken;
//! use graceful::{Supervisor, TaskBody};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sup = Supervisor::new();
//!     let finished = Arc::new(AtomicUsize::new(0));
//!
//!     // Count every completed task from a middleware.
//!     let counter = Arc::clone(&finished);
//!     sup.add_middleware(move |next: TaskBody| {
//!         let counter = Arc::clone(&counter);
//!         TaskBody::new(move |ctx| async move {
//!             next.call(ctx).await;
//!             counter.fetch_add(1, Ordering::SeqCst);
//!         })
//!     });
//!
//!     let ctx = CancellationToken::new();
//!     for _ in 0..4 {
//!         sup.run_context(ctx.clone(), |ctx| async move {
//!             if ctx.is_cancelled() {
//!                 return;
//!             }
//!             // do work...
//!         });
//!     }
//!
//!     sup.wait().await;
//!     assert_eq!(finished.load(Ordering::SeqCst), 4);
//! }
//! ```
mod cleanup;
mod config;
mod core;
mod error;
mod tasks;

// ---- Public re-exports ----

pub use cleanup::CleanupRegistry;
pub use config::Config;
pub use self::core::{
    Coordinator, DEBUG_LOG_PREFIX, DebugLogger, Listener, ShutdownSignal, Supervisor,
    SupervisorBuilder, listen_and_serve,
};
pub use error::{BoxError, CleanupError, ServeError};
pub use tasks::{Chain, Middleware, TaskBody};

// Optional: built-in debug logger backed by `tracing`.
// Enable with: `--features logging`
#[cfg(feature = "logging")]
mod logging;
#[cfg(feature = "logging")]
pub use logging::LogWriter;
