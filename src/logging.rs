//! # Built-in debug logger forwarding to `tracing`.
//!
//! [`LogWriter`] turns call-site debug lines into `tracing` events at `DEBUG`
//! level under the `graceful::launch` target. Useful for development; install
//! your own closure for anything else.
//!
//! ## Example
//! ```no_run
//! # use graceful::{LogWriter, Supervisor};
//! let sup = Supervisor::new();
//! LogWriter::install(&sup);
//! ```

use crate::Supervisor;

/// Debug logger emitting launch lines through `tracing`.
///
/// Enabled via the `logging` feature.
#[derive(Clone, Copy, Debug, Default)]
pub struct LogWriter;

impl LogWriter {
    /// Installs the writer as `sup`'s debug logger.
    pub fn install(sup: &Supervisor) {
        sup.enable_debug_logging(|line| Self.write(line));
    }

    /// Emits one launch line.
    pub fn write(&self, line: &str) {
        tracing::debug!(target: "graceful::launch", "{line}");
    }
}
