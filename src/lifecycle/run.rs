//! A prepared fixture server with its start/stop callbacks.

use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;
use url::Url;

use crate::http::{FixtureServer, ServerError};
use crate::lifecycle::hooks::{hook, Hook, TestLifecycle};

/// A server built by [`FixtureRegistry::run`](crate::FixtureRegistry::run).
///
/// Clones drive the same server.
#[derive(Debug, Clone)]
pub struct FixtureRun {
    server: Arc<Mutex<FixtureServer>>,
}

impl FixtureRun {
    pub fn new(server: FixtureServer) -> Self {
        Self {
            server: Arc::new(Mutex::new(server)),
        }
    }

    /// Listen on the configured port.
    pub async fn start(&self) -> Result<SocketAddr, ServerError> {
        self.server.lock().await.listen(None).await
    }

    /// Stop listening; resolves once the socket is released.
    pub async fn stop(&self) -> Result<(), ServerError> {
        self.server.lock().await.destroy().await
    }

    /// `start` as a lifecycle hook.
    pub fn start_hook(&self) -> Hook {
        let run = self.clone();
        hook(move || async move {
            run.start().await?;
            Ok(())
        })
    }

    /// `stop` as a lifecycle hook.
    pub fn stop_hook(&self) -> Hook {
        let run = self.clone();
        hook(move || async move {
            run.stop().await?;
            Ok(())
        })
    }

    /// Register `start` before and `stop` after the current test group.
    pub fn register<L>(&self, lifecycle: &mut L)
    where
        L: TestLifecycle + ?Sized,
    {
        lifecycle.before(self.start_hook());
        lifecycle.after(self.stop_hook());
    }

    /// The underlying server, e.g. to install more fixtures by hand.
    pub fn server(&self) -> Arc<Mutex<FixtureServer>> {
        Arc::clone(&self.server)
    }

    pub async fn local_addr(&self) -> Option<SocketAddr> {
        self.server.lock().await.local_addr()
    }

    pub async fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        self.server.lock().await.url(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerOptions;
    use crate::lifecycle::HookSet;

    #[tokio::test]
    async fn test_start_stop() {
        let run = FixtureRun::new(FixtureServer::new(ServerOptions::default()));
        assert!(run.local_addr().await.is_none());

        let addr = run.start().await.unwrap();
        assert_eq!(run.local_addr().await, Some(addr));
        assert!(run.server().lock().await.is_listening());

        run.stop().await.unwrap();
        assert!(run.local_addr().await.is_none());
        assert!(matches!(run.stop().await, Err(ServerError::NotListening)));
    }

    #[tokio::test]
    async fn test_register_adds_one_hook_each() {
        let run = FixtureRun::new(FixtureServer::new(ServerOptions::default()));
        let mut hooks = HookSet::new();
        run.register(&mut hooks);
        assert_eq!((hooks.pending_before(), hooks.pending_after()), (1, 1));

        hooks.run_before().await.unwrap();
        assert!(run.local_addr().await.is_some());
        hooks.run_after().await.unwrap();
        assert!(run.local_addr().await.is_none());
    }
}
