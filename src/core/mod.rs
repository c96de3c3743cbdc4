//! Runtime core: tracked launches and shutdown sequencing.
//!
//! The public API from this module is [`Supervisor`] (task tracking and join)
//! and [`Coordinator`] (listener lifecycle against termination signals).
//!
//! Internal modules:
//! - [`supervisor`]: launch path, middleware registration, join;
//! - [`builder`]: pre-configured supervisor construction;
//! - [`outstanding`]: counting join primitive;
//! - [`debug`]: call-site debug logging slot;
//! - [`coordinator`]: serve/stop sequencing with a completion handshake;
//! - [`shutdown`]: cross-platform termination signal handling.

mod builder;
mod coordinator;
mod debug;
mod outstanding;
mod shutdown;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use coordinator::{Coordinator, Listener, listen_and_serve};
pub use debug::{DEBUG_LOG_PREFIX, DebugLogger};
pub use shutdown::ShutdownSignal;
pub use supervisor::Supervisor;
