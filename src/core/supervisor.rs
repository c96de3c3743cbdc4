//! # Supervisor: tracked task launches, middleware and orderly join.
//!
//! The [`Supervisor`] owns every piece of state the launch path needs:
//! the outstanding-task counter, the middleware [`Chain`], the debug logger
//! slot and a [`CleanupRegistry`]. Nothing is process-global, so independent
//! supervisors (e.g. one per test) never see each other's tasks.
//!
//! ## Launch path
//! ```text
//! run_context(ctx, task)                      (caller, never blocks)
//!   ├─► outstanding.acquire()          count += 1, before spawning
//!   ├─► debug.emit(call site)          "Go routine started in: file:line"
//!   ├─► chain snapshot ─► compose(TaskBody::new(task))
//!   └─► tokio::spawn ─► composed.call(ctx).await ─► drop(Ticket): count -= 1
//!
//! wait()  ──► resolves when count == 0
//! ```
//!
//! ## Concurrency contract
//! - `add_middleware` / `clear_middlewares` racing with launches is allowed:
//!   each launch composes from one consistent snapshot (pre- or post-mutation).
//! - Debug logger toggling racing with launches is allowed: a launch uses the
//!   logger installed at the moment it checks the slot.
//! - The supervisor never cancels the context it hands to tasks.
//! - A panicking task is aborted by tokio as usual; its slot is still released.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::sync::atomic::{AtomicUsize, Ordering};
//! use graceful::Supervisor;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let sup = Supervisor::new();
//!     let done = Arc::new(AtomicUsize::new(0));
//!
//!     for _ in 0..3 {
//!         let done = Arc::clone(&done);
//!         sup.run(move || async move {
//!             done.fetch_add(1, Ordering::SeqCst);
//!         });
//!     }
//!
//!     sup.wait().await;
//!     assert_eq!(done.load(Ordering::SeqCst), 3);
//! }
//! ```

use std::future::Future;
use std::panic::Location;
use std::sync::Arc;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;

use crate::cleanup::CleanupRegistry;
use crate::core::{
    builder::SupervisorBuilder,
    debug::{DebugLogger, DebugSlot},
    outstanding::Outstanding,
};
use crate::error::{BoxError, CleanupError};
use crate::tasks::{Chain, Middleware, TaskBody};

/// Tracks concurrently launched tasks and joins them on demand.
#[derive(Debug)]
pub struct Supervisor {
    outstanding: Outstanding,
    chain: RwLock<Chain>,
    debug: DebugSlot,
    cleanup: CleanupRegistry,
}

impl Default for Supervisor {
    fn default() -> Self {
        Self::new()
    }
}

impl Supervisor {
    /// Creates a supervisor with no middleware, no debug logger and no finalizers.
    pub fn new() -> Self {
        Self {
            outstanding: Outstanding::new(),
            chain: RwLock::new(Chain::new()),
            debug: DebugSlot::default(),
            cleanup: CleanupRegistry::new(),
        }
    }

    /// Returns a builder for a pre-configured supervisor.
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    /// Launches a tracked task that ignores the context.
    ///
    /// Equivalent to [`Supervisor::run_context`] with a fresh, never-cancelled token.
    ///
    /// # Panics
    /// Panics when called outside of a tokio runtime.
    #[track_caller]
    pub fn run<F, Fut>(&self, task: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.launch(
            Location::caller(),
            CancellationToken::new(),
            TaskBody::new(move |_ctx| task()),
        );
    }

    /// Launches a tracked task receiving `ctx`.
    ///
    /// The count is incremented before the task is spawned, so a concurrent
    /// [`Supervisor::wait`] can never miss it. The task must finish on its own
    /// (or observe `ctx`); `wait` has no timeout.
    ///
    /// # Panics
    /// Panics when called outside of a tokio runtime.
    #[track_caller]
    pub fn run_context<F, Fut>(&self, ctx: CancellationToken, task: F)
    where
        F: FnOnce(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        self.launch(Location::caller(), ctx, TaskBody::new(task));
    }

    fn launch(&self, caller: &'static Location<'static>, ctx: CancellationToken, body: TaskBody) {
        let ticket = self.outstanding.acquire();
        self.debug.emit(caller);

        let chain = self.chain.read().clone();
        let composed = chain.compose(body);

        tokio::spawn(async move {
            composed.call(ctx).await;
            drop(ticket);
        });
    }

    /// Waits until every tracked task has completed.
    ///
    /// May be awaited repeatedly and concurrently with new launches; tasks
    /// registered before the count reaches zero are waited for as well.
    pub async fn wait(&self) {
        self.outstanding.wait().await;
    }

    /// Number of launched tasks that have not completed yet.
    pub fn outstanding(&self) -> usize {
        self.outstanding.count()
    }

    /// Registers a middleware for subsequently launched tasks.
    ///
    /// Middlewares wrap in registration order: the first one registered is the
    /// outermost (runs its pre-logic first and its post-logic last).
    pub fn add_middleware<M>(&self, mw: M)
    where
        M: Middleware,
    {
        self.add_middleware_arc(Arc::new(mw));
    }

    /// Registers an already shared middleware.
    pub fn add_middleware_arc(&self, mw: Arc<dyn Middleware>) {
        let mut chain = self.chain.write();
        *chain = chain.prepended(mw);
    }

    /// Removes every middleware.
    pub fn clear_middlewares(&self) {
        *self.chain.write() = Chain::new();
    }

    /// Installs `logger`; every launch then emits its call site.
    pub fn enable_debug_logging<L>(&self, logger: L)
    where
        L: Fn(&str) + Send + Sync + 'static,
    {
        self.debug.set(Some(Arc::new(logger)));
    }

    /// Installs an already shared debug logger.
    pub fn set_debug_logger(&self, logger: Option<DebugLogger>) {
        self.debug.set(logger);
    }

    /// Removes the debug logger.
    pub fn disable_debug_logging(&self) {
        self.debug.set(None);
    }

    /// Appends a teardown finalizer.
    pub fn add_cleanup<F>(&self, f: F)
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        self.cleanup.add(f);
    }

    /// Runs the registered finalizers in order (see [`CleanupRegistry::run`]).
    pub fn cleanup(&self) -> Result<(), CleanupError> {
        self.cleanup.run()
    }

    /// Returns the cleanup registry.
    pub fn cleanup_registry(&self) -> &CleanupRegistry {
        &self.cleanup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    fn step_asserter() -> (Arc<AtomicUsize>, impl Fn(usize) + Clone + Send + Sync + 'static) {
        let step = Arc::new(AtomicUsize::new(0));
        let s = Arc::clone(&step);
        let assert_step = move |expected: usize| {
            let got = s.fetch_add(1, Ordering::SeqCst);
            assert_eq!(got, expected, "expected step {expected}, got {got}");
        };
        (step, assert_step)
    }

    fn around<A>(assert_step: A, pre: usize, post: usize) -> impl Middleware
    where
        A: Fn(usize) + Clone + Send + Sync + 'static,
    {
        move |next: TaskBody| {
            let assert_step = assert_step.clone();
            TaskBody::new(move |ctx| async move {
                assert_step(pre);
                next.call(ctx).await;
                assert_step(post);
            })
        }
    }

    #[tokio::test]
    async fn test_run_waits_for_completion() {
        let sup = Supervisor::new();
        let executed = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&executed);

        sup.run(move || async move {
            tokio::time::sleep(Duration::from_millis(100)).await;
            flag.store(true, Ordering::SeqCst);
        });

        sup.wait().await;
        assert!(executed.load(Ordering::SeqCst));
        assert_eq!(sup.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_wait_without_tasks_returns_immediately() {
        let sup = Supervisor::new();
        tokio::time::timeout(Duration::from_secs(1), sup.wait())
            .await
            .expect("wait must not block with zero tasks");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_wait_joins_many_tasks() {
        const N: usize = 256;
        let sup = Supervisor::new();
        let flags: Arc<Vec<AtomicBool>> = Arc::new((0..N).map(|_| AtomicBool::new(false)).collect());

        for i in 0..N {
            let flags = Arc::clone(&flags);
            sup.run(move || async move {
                tokio::time::sleep(Duration::from_millis((i % 7) as u64)).await;
                flags[i].store(true, Ordering::SeqCst);
            });
        }

        sup.wait().await;
        assert!(flags.iter().all(|f| f.load(Ordering::SeqCst)));
    }

    #[tokio::test]
    async fn test_run_context_passes_same_context() {
        let sup = Supervisor::new();
        let parent = CancellationToken::new();
        let observed = Arc::new(AtomicBool::new(false));
        let obs = Arc::clone(&observed);

        let (started_tx, started_rx) = tokio::sync::oneshot::channel();
        sup.run_context(parent.clone(), move |ctx| async move {
            let _ = started_tx.send(());
            ctx.cancelled().await;
            obs.store(true, Ordering::SeqCst);
        });

        started_rx.await.unwrap();
        parent.cancel();
        sup.wait().await;
        assert!(observed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_run_gives_uncancelled_context() {
        let sup = Supervisor::new();
        let cancelled = Arc::new(AtomicBool::new(true));
        let c = Arc::clone(&cancelled);

        sup.run_context(CancellationToken::new(), move |ctx| async move {
            c.store(ctx.is_cancelled(), Ordering::SeqCst);
        });
        sup.wait().await;
        assert!(!cancelled.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_debug_logging_reports_call_site_of_run() {
        let sup = Supervisor::new();
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&lines);
        sup.enable_debug_logging(move |m| sink.lock().push(m.to_owned()));

        let line = line!() + 1;
        sup.run(|| async {});
        sup.wait().await;
        sup.disable_debug_logging();

        let lines = lines.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with(crate::DEBUG_LOG_PREFIX));
        assert!(
            lines[0].contains(&format!("supervisor.rs:{line}")),
            "unexpected line {:?}",
            lines[0]
        );
    }

    #[tokio::test]
    async fn test_debug_logging_reports_call_site_of_run_context() {
        let sup = Supervisor::new();
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&lines);
        sup.enable_debug_logging(move |m| sink.lock().push(m.to_owned()));

        let line = line!() + 1;
        sup.run_context(CancellationToken::new(), |_ctx| async {});
        sup.wait().await;

        let lines = lines.lock();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains(&format!("supervisor.rs:{line}")));
    }

    #[tokio::test]
    async fn test_disabled_debug_logging_emits_nothing() {
        let sup = Supervisor::new();
        let calls = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&calls);
        sup.enable_debug_logging(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        sup.disable_debug_logging();

        sup.run(|| async {});
        sup.wait().await;
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_inline_middlewares_order() {
        let sup = Supervisor::new();
        let (step, assert_step) = step_asserter();
        let mw1 = around(assert_step.clone(), 0, 4);
        let mw2 = around(assert_step.clone(), 1, 3);

        let inner = assert_step.clone();
        let body = mw1.wrap(mw2.wrap(TaskBody::new(move |_ctx| async move {
            inner(2);
        })));
        sup.run_context(CancellationToken::new(), move |ctx| body.call(ctx));

        sup.wait().await;
        assert_eq!(step.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_registered_middlewares_first_is_outermost() {
        let sup = Supervisor::new();
        let (step, assert_step) = step_asserter();
        sup.add_middleware(around(assert_step.clone(), 0, 4));
        sup.add_middleware(around(assert_step.clone(), 1, 3));

        let inner = assert_step.clone();
        sup.run_context(CancellationToken::new(), move |_ctx| async move {
            inner(2);
        });

        sup.wait().await;
        sup.clear_middlewares();
        assert_eq!(step.load(Ordering::SeqCst), 5);
    }

    #[tokio::test]
    async fn test_clear_middlewares_runs_unwrapped() {
        let sup = Supervisor::new();
        let wrapped = Arc::new(AtomicUsize::new(0));
        let w = Arc::clone(&wrapped);
        sup.add_middleware(move |next: TaskBody| {
            w.fetch_add(1, Ordering::SeqCst);
            next
        });
        sup.clear_middlewares();

        let ran = Arc::new(AtomicBool::new(false));
        let r = Arc::clone(&ran);
        sup.run(move || async move { r.store(true, Ordering::SeqCst) });
        sup.wait().await;

        assert!(ran.load(Ordering::SeqCst));
        assert_eq!(wrapped.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_middleware_added_after_launch_does_not_wrap() {
        let sup = Supervisor::new();
        let wrapped = Arc::new(AtomicUsize::new(0));
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        sup.run(move || async move {
            let _ = release_rx.await;
        });

        let w = Arc::clone(&wrapped);
        sup.add_middleware(move |next: TaskBody| {
            w.fetch_add(1, Ordering::SeqCst);
            next
        });
        release_tx.send(()).unwrap();
        sup.wait().await;

        assert_eq!(wrapped.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_panicking_task_releases_its_slot() {
        let sup = Supervisor::new();
        sup.run(|| async { panic!("task failure") });

        tokio::time::timeout(Duration::from_secs(1), sup.wait())
            .await
            .expect("a panicked task must not leave the count raised");
        assert_eq!(sup.outstanding(), 0);
    }

    #[tokio::test]
    async fn test_independent_supervisors() {
        let a = Supervisor::new();
        let b = Supervisor::new();
        let (release_tx, release_rx) = tokio::sync::oneshot::channel::<()>();

        a.run(move || async move {
            let _ = release_rx.await;
        });

        assert_eq!(a.outstanding(), 1);
        assert_eq!(b.outstanding(), 0);
        tokio::time::timeout(Duration::from_secs(1), b.wait())
            .await
            .expect("b has nothing to wait for");

        release_tx.send(()).unwrap();
        a.wait().await;
    }

    #[tokio::test]
    async fn test_cleanup_delegates_to_registry() {
        let sup = Supervisor::new();
        let hits = Arc::new(AtomicUsize::new(0));
        let h = Arc::clone(&hits);
        sup.add_cleanup(move || {
            h.fetch_add(1, Ordering::SeqCst);
            Ok(())
        });

        sup.cleanup().unwrap();
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(sup.cleanup_registry().len(), 1);
    }
}
