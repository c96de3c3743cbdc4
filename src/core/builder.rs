use std::sync::Arc;

use super::{debug::DebugLogger, supervisor::Supervisor};
use crate::tasks::Middleware;

/// Builder for constructing a [`Supervisor`] with middleware and logging preinstalled.
///
/// # Example
/// ```rust
/// use graceful::{Supervisor, TaskBody};
///
/// let sup = Supervisor::builder()
///     .with_middleware(|next: TaskBody| next)
///     .with_debug_logger(|line: &str| eprintln!("{line}"))
///     .build();
/// # drop(sup);
/// ```
#[derive(Default)]
pub struct SupervisorBuilder {
    middlewares: Vec<Arc<dyn Middleware>>,
    debug_logger: Option<DebugLogger>,
}

impl SupervisorBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a middleware.
    ///
    /// Calls accumulate in registration order, exactly as
    /// [`Supervisor::add_middleware`]: the first one becomes the outermost wrapper.
    pub fn with_middleware<M>(mut self, mw: M) -> Self
    where
        M: Middleware,
    {
        self.middlewares.push(Arc::new(mw));
        self
    }

    /// Installs the call-site debug logger.
    pub fn with_debug_logger<L>(mut self, logger: L) -> Self
    where
        L: Fn(&str) + Send + Sync + 'static,
    {
        self.debug_logger = Some(Arc::new(logger));
        self
    }

    /// Builds and returns the supervisor.
    pub fn build(self) -> Supervisor {
        let sup = Supervisor::new();
        for mw in self.middlewares {
            sup.add_middleware_arc(mw);
        }
        sup.set_debug_logger(self.debug_logger);
        sup
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tasks::TaskBody;
    use parking_lot::Mutex;

    #[tokio::test]
    async fn test_builder_preserves_registration_order() {
        let journal = Arc::new(Mutex::new(Vec::new()));
        let tag = |name: &'static str| {
            let journal = Arc::clone(&journal);
            move |next: TaskBody| {
                let journal = Arc::clone(&journal);
                TaskBody::new(move |ctx| async move {
                    journal.lock().push(name);
                    next.call(ctx).await;
                })
            }
        };

        let sup = Supervisor::builder()
            .with_middleware(tag("outer"))
            .with_middleware(tag("inner"))
            .build();

        let j = Arc::clone(&journal);
        sup.run(move || async move { j.lock().push("body") });
        sup.wait().await;

        assert_eq!(*journal.lock(), vec!["outer", "inner", "body"]);
    }

    #[tokio::test]
    async fn test_builder_installs_debug_logger() {
        let lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let sink = Arc::clone(&lines);
        let sup = Supervisor::builder()
            .with_debug_logger(move |m: &str| sink.lock().push(m.to_owned()))
            .build();

        sup.run(|| async {});
        sup.wait().await;
        assert_eq!(lines.lock().len(), 1);
        assert!(lines.lock()[0].contains("builder.rs:"));
    }
}
