//! Before/after hooks for a group of tests.
//!
//! # Responsibilities
//! - Define the hook registration surface a test harness provides
//! - Provide `HookSet`, an explicit in-memory harness
//!
//! # Design Decisions
//! - Hooks are `FnOnce`: each runs at most once
//! - Before hooks stop at the first failure (the group cannot run)
//! - After hooks all run; the first failure is reported

use std::future::Future;

use futures_util::future::BoxFuture;
use thiserror::Error;

use crate::http::ServerError;

/// Error type for lifecycle hooks.
#[derive(Debug, Error)]
pub enum HookError {
    #[error(transparent)]
    Server(#[from] ServerError),
}

/// A zero-argument callback whose future completes when the hook is done.
pub type Hook = Box<dyn FnOnce() -> BoxFuture<'static, Result<(), HookError>> + Send>;

/// Box an async closure as a [`Hook`].
pub fn hook<F, Fut>(f: F) -> Hook
where
    F: FnOnce() -> Fut + Send + 'static,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    Box::new(move || Box::pin(f()))
}

/// What a test harness provides to schedule work around a group of tests.
pub trait TestLifecycle {
    /// Run `hook` before the group's tests.
    fn before(&mut self, hook: Hook);

    /// Run `hook` after the group's tests. The group is finished only once
    /// the hook's future completes.
    fn after(&mut self, hook: Hook);
}

/// Hooks for one test group, run explicitly.
#[derive(Default)]
pub struct HookSet {
    before: Vec<Hook>,
    after: Vec<Hook>,
}

impl HookSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run pending before hooks in registration order.
    pub async fn run_before(&mut self) -> Result<(), HookError> {
        for hook in std::mem::take(&mut self.before) {
            hook().await?;
        }
        Ok(())
    }

    /// Run every pending after hook in registration order.
    pub async fn run_after(&mut self) -> Result<(), HookError> {
        let mut first_error = None;
        for hook in std::mem::take(&mut self.after) {
            if let Err(e) = hook().await {
                tracing::warn!(error = %e, "After hook failed");
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    pub fn pending_before(&self) -> usize {
        self.before.len()
    }

    pub fn pending_after(&self) -> usize {
        self.after.len()
    }
}

impl TestLifecycle for HookSet {
    fn before(&mut self, hook: Hook) {
        self.before.push(hook);
    }

    fn after(&mut self, hook: Hook) {
        self.after.push(hook);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, entry: &'static str, fail: bool) -> Hook {
        let log = Arc::clone(log);
        hook(move || async move {
            log.lock().unwrap().push(entry);
            if fail {
                Err(HookError::Server(ServerError::NotListening))
            } else {
                Ok(())
            }
        })
    }

    #[tokio::test]
    async fn test_hooks_run_in_order_once() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = HookSet::new();
        hooks.before(recorder(&log, "before 1", false));
        hooks.before(recorder(&log, "before 2", false));
        hooks.after(recorder(&log, "after 1", false));

        hooks.run_before().await.unwrap();
        hooks.run_before().await.unwrap();
        hooks.run_after().await.unwrap();

        assert_eq!(*log.lock().unwrap(), ["before 1", "before 2", "after 1"]);
        assert_eq!(hooks.pending_before(), 0);
        assert_eq!(hooks.pending_after(), 0);
    }

    #[tokio::test]
    async fn test_before_stops_at_first_failure() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = HookSet::new();
        hooks.before(recorder(&log, "fails", true));
        hooks.before(recorder(&log, "skipped", false));

        assert!(hooks.run_before().await.is_err());
        assert_eq!(*log.lock().unwrap(), ["fails"]);
    }

    #[tokio::test]
    async fn test_after_runs_every_hook() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut hooks = HookSet::new();
        hooks.after(recorder(&log, "fails", true));
        hooks.after(recorder(&log, "still runs", false));

        assert!(hooks.run_after().await.is_err());
        assert_eq!(*log.lock().unwrap(), ["fails", "still runs"]);
    }
}
