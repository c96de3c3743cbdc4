//! # Call-site debug logging slot.
//!
//! When a logger is installed, every task launch emits exactly one line naming
//! the source location of the public `run`/`run_context` call:
//! ```text
//! Go routine started in: src/server.rs:42
//! ```
//! The location is captured with `#[track_caller]` at the API boundary and the
//! line is emitted synchronously, before the task is spawned.

use std::fmt;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::RwLock;

/// Prefix of every call-site debug line.
pub const DEBUG_LOG_PREFIX: &str = "Go routine started in: ";

/// Callback receiving call-site debug lines.
pub type DebugLogger = Arc<dyn Fn(&str) + Send + Sync + 'static>;

/// Single optional logger slot.
#[derive(Default)]
pub(crate) struct DebugSlot {
    logger: RwLock<Option<DebugLogger>>,
}

impl DebugSlot {
    pub(crate) fn set(&self, logger: Option<DebugLogger>) {
        *self.logger.write() = logger;
    }

    pub(crate) fn is_enabled(&self) -> bool {
        self.logger.read().is_some()
    }

    /// Emits the launch line for `location` with the logger installed right now.
    pub(crate) fn emit(&self, location: &Location<'_>) {
        // Clone out of the lock so a logger may itself toggle the slot.
        let logger = self.logger.read().clone();
        if let Some(logger) = logger {
            logger(&format_launch(location));
        }
    }
}

impl fmt::Debug for DebugSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DebugSlot")
            .field("enabled", &self.is_enabled())
            .finish()
    }
}

pub(crate) fn format_launch(location: &Location<'_>) -> String {
    format!(
        "{DEBUG_LOG_PREFIX}{}:{}",
        location.file(),
        location.line()
    )
}
