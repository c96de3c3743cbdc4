//! # Outstanding-task counter (counting join primitive).
//!
//! [`Outstanding`] tracks how many tasks were started but have not completed yet.
//! It is built on a [`tokio::sync::watch`] channel holding the count, so waiters
//! suspend until the value reaches zero instead of polling.
//!
//! ## Rules
//! - [`Outstanding::acquire`] increments synchronously and returns a [`Ticket`]
//! - dropping the `Ticket` decrements exactly once (also on unwind)
//! - the count never goes negative: only tickets decrement
//! - [`Outstanding::wait`] resolves as soon as the observed count is zero
//!
//! ```text
//! acquire() ─► count += 1 ─► Ticket ──(task runs)──► drop(Ticket) ─► count -= 1
//!                                                                       │
//!                                          wait(): watch::wait_for(0) ◄─┘
//! ```

use std::sync::Arc;

use tokio::sync::watch;

/// Shared counter of in-flight tasks.
#[derive(Clone, Debug)]
pub(crate) struct Outstanding {
    tx: Arc<watch::Sender<usize>>,
}

impl Outstanding {
    pub(crate) fn new() -> Self {
        let (tx, _rx) = watch::channel(0usize);
        Self { tx: Arc::new(tx) }
    }

    /// Registers one unit of outstanding work.
    pub(crate) fn acquire(&self) -> Ticket {
        self.tx.send_modify(|n| *n += 1);
        Ticket {
            tx: Arc::clone(&self.tx),
        }
    }

    /// Current number of outstanding tasks.
    pub(crate) fn count(&self) -> usize {
        *self.tx.borrow()
    }

    /// Waits until no task is outstanding.
    pub(crate) async fn wait(&self) {
        let mut rx = self.tx.subscribe();
        // The sender lives as long as `self`, so `wait_for` cannot observe a closed channel.
        let _ = rx.wait_for(|n| *n == 0).await;
    }
}

/// Registration of a single tracked task; releases its slot on drop.
#[derive(Debug)]
pub(crate) struct Ticket {
    tx: Arc<watch::Sender<usize>>,
}

impl Drop for Ticket {
    fn drop(&mut self) {
        self.tx.send_modify(|n| *n = n.saturating_sub(1));
    }
}
