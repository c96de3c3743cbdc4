//! # Shutdown coordinator configuration.
//!
//! Provides [`Config`], the settings of a [`Coordinator`](crate::Coordinator).
//!
//! ## Sentinel values
//! - `grace = 0s` → unbounded stop (the listener drains for as long as it needs)

use std::time::Duration;

/// Configuration for the shutdown coordinator.
///
/// ## Field semantics
/// - `grace`: deadline handed to [`Listener::shutdown`](crate::Listener::shutdown) (`0s` = none)
///
/// All fields are public; prefer the accessors over checking sentinels inline.
#[derive(Clone, Debug, Default)]
pub struct Config {
    /// Grace allowance passed to the listener when a termination signal arrives.
    ///
    /// - `Duration::ZERO` = no deadline
    /// - `> 0` = the listener is asked to finish draining within this window
    pub grace: Duration,
}

impl Config {
    /// Returns the stop deadline as an `Option`.
    ///
    /// - `None` → unbounded
    /// - `Some(d)` → deadline passed to the listener
    #[inline]
    pub fn shutdown_deadline(&self) -> Option<Duration> {
        if self.grace == Duration::ZERO {
            None
        } else {
            Some(self.grace)
        }
    }
}
