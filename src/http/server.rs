//! Fixture server setup and lifecycle.
//!
//! # Responsibilities
//! - Install fixtures as routes on an Axum Router
//! - Bind a listener on the requested or configured port
//! - Serve in a background task until told to stop
//! - Drain and release the socket before reporting the stop
//!
//! # Design Decisions
//! - One router, one listener, one serve task per server; nothing shared
//! - The first fixture installed for a method and route wins
//! - Patterns that differ only in parameter names share one route; a
//!   pattern that still conflicts with an installed one is skipped
//! - `destroy` resolves only once the serve task has exited, so the port
//!   is free again when it returns
//! - Dropping a listening server closes its shutdown channel, which also
//!   stops the serve task

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::net::{Ipv4Addr, SocketAddr};

use axum::body::Body;
use axum::http::{Method, Request};
use axum::routing::{any, on, MethodFilter};
use axum::Router;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower_http::trace::TraceLayer;
use url::Url;

use crate::config::ServerOptions;
use crate::fixture::{Fixture, FixtureMethod};

/// Error type for server lifecycle operations.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Failed to bind the listening socket.
    #[error("failed to bind port {port}: {source}")]
    Bind { port: u16, source: io::Error },

    /// `listen` was called on a server that is already listening.
    #[error("server is already listening on {0}")]
    AlreadyListening(SocketAddr),

    /// `destroy` was called on a server that is not listening.
    #[error("server is not listening")]
    NotListening,

    /// The serve loop stopped with an I/O error.
    #[error("server failed: {0}")]
    Serve(#[source] io::Error),

    /// The serve task panicked or was cancelled.
    #[error("server task failed: {0}")]
    Join(#[source] tokio::task::JoinError),
}

/// Present only while the server is bound to a socket.
struct ListeningHandle {
    addr: SocketAddr,
    shutdown: oneshot::Sender<()>,
    task: JoinHandle<io::Result<()>>,
}

/// Methods already bound on a single route.
#[derive(Debug, Default)]
struct RouteMethods {
    all: bool,
    verbs: HashSet<Method>,
}

impl RouteMethods {
    fn overlaps(&self, method: &FixtureMethod) -> bool {
        match method {
            FixtureMethod::All => self.all || !self.verbs.is_empty(),
            FixtureMethod::Verb(verb) => self.all || self.verbs.contains(verb),
        }
    }

    fn insert(&mut self, method: &FixtureMethod) {
        match method {
            FixtureMethod::All => self.all = true,
            FixtureMethod::Verb(verb) => {
                self.verbs.insert(verb.clone());
            }
        }
    }
}

/// A disposable HTTP server exposing a set of fixtures.
pub struct FixtureServer {
    options: ServerOptions,
    app: Router,
    /// Mirror of the paths handed to `app`, checked before axum sees them.
    matcher: matchit::Router<()>,
    /// Parameter-blind pattern shape → path installed for it.
    shapes: HashMap<String, String>,
    routes: HashMap<String, RouteMethods>,
    fixtures: Vec<String>,
    handle: Option<ListeningHandle>,
}

impl FixtureServer {
    /// Create a server with no routes. It does not listen until [`listen`](Self::listen).
    pub fn new(options: ServerOptions) -> Self {
        Self {
            options,
            app: Router::new(),
            matcher: matchit::Router::new(),
            shapes: HashMap::new(),
            routes: HashMap::new(),
            fixtures: Vec::new(),
            handle: None,
        }
    }

    /// Bind the fixture's handler to its method and route.
    ///
    /// Routes added while listening are served from the next `listen` on.
    pub fn install_fixture(&mut self, fixture: &Fixture) {
        let path = match self.resolve_path(fixture.route()) {
            Ok(path) => path,
            Err(err) => {
                tracing::warn!(
                    fixture = %fixture.name(),
                    route = %fixture.route(),
                    error = %err,
                    "Route conflicts with an earlier fixture, skipping"
                );
                return;
            }
        };

        let installed = self.routes.entry(path.clone()).or_default();
        if installed.overlaps(fixture.method()) {
            tracing::warn!(
                fixture = %fixture.name(),
                method = %fixture.method(),
                route = %fixture.route(),
                "Route already served by an earlier fixture, skipping"
            );
            return;
        }

        let handler = fixture.handler();
        let endpoint = move |request: Request<Body>| handler.respond(request);

        let method_router = match fixture.method() {
            FixtureMethod::All => any(endpoint),
            FixtureMethod::Verb(verb) => match MethodFilter::try_from(verb.clone()) {
                Ok(filter) => on(filter, endpoint),
                Err(_) => {
                    tracing::warn!(
                        fixture = %fixture.name(),
                        method = %verb,
                        "Method cannot be routed, skipping"
                    );
                    return;
                }
            },
        };

        installed.insert(fixture.method());
        self.app = std::mem::take(&mut self.app).route(&path, method_router);
        self.fixtures.push(fixture.name().to_string());

        if let Some(handle) = &self.handle {
            tracing::warn!(
                fixture = %fixture.name(),
                address = %handle.addr,
                "Fixture installed while listening, it is served after the next listen"
            );
        }

        tracing::debug!(
            fixture = %fixture.name(),
            method = %fixture.method(),
            route = %path,
            "Fixture installed"
        );
    }

    /// Path the router knows `route` by, registering it if it is new.
    fn resolve_path(&mut self, route: &str) -> Result<String, matchit::InsertError> {
        let shape = route_shape(route);
        if let Some(path) = self.shapes.get(&shape) {
            return Ok(path.clone());
        }

        self.matcher.insert(route, ())?;
        self.shapes.insert(shape, route.to_string());
        Ok(route.to_string())
    }

    /// Start accepting connections.
    ///
    /// Uses `port` if given, else the configured port, else an ephemeral
    /// one. The socket is bound when this returns.
    pub async fn listen(&mut self, port: Option<u16>) -> Result<SocketAddr, ServerError> {
        if let Some(handle) = &self.handle {
            return Err(ServerError::AlreadyListening(handle.addr));
        }

        let port = port.or(self.options.port).unwrap_or(0);
        let listener = TcpListener::bind((Ipv4Addr::UNSPECIFIED, port))
            .await
            .map_err(|source| ServerError::Bind { port, source })?;
        let addr = listener
            .local_addr()
            .map_err(|source| ServerError::Bind { port, source })?;

        let app = self.app.clone().layer(TraceLayer::new_for_http());
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async move {
                    // A dropped sender also means stop.
                    let _ = shutdown_rx.await;
                })
                .await
        });

        tracing::info!(
            address = %addr,
            fixtures = self.fixtures.len(),
            "Fixture server listening"
        );

        self.handle = Some(ListeningHandle {
            addr,
            shutdown: shutdown_tx,
            task,
        });
        Ok(addr)
    }

    /// Stop listening and release the socket.
    ///
    /// Resolves after open connections have drained and the listener has
    /// been dropped.
    pub async fn destroy(&mut self) -> Result<(), ServerError> {
        let handle = self.handle.take().ok_or(ServerError::NotListening)?;

        let _ = handle.shutdown.send(());
        handle
            .task
            .await
            .map_err(ServerError::Join)?
            .map_err(ServerError::Serve)?;

        tracing::info!(address = %handle.addr, "Fixture server stopped");
        Ok(())
    }

    /// [`destroy`](Self::destroy), then run `callback` once the socket is closed.
    pub async fn destroy_then<F>(&mut self, callback: F) -> Result<(), ServerError>
    where
        F: FnOnce(),
    {
        self.destroy().await?;
        callback();
        Ok(())
    }

    pub fn options(&self) -> &ServerOptions {
        &self.options
    }

    pub fn is_listening(&self) -> bool {
        self.handle.is_some()
    }

    /// Bound address while listening.
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.handle.as_ref().map(|handle| handle.addr)
    }

    /// Names of the fixtures installed, in installation order.
    pub fn fixture_names(&self) -> &[String] {
        &self.fixtures
    }

    /// URL for `path`, on the bound port while listening.
    pub fn url(&self, path: &str) -> Result<Url, url::ParseError> {
        let port = self.local_addr().map(|addr| addr.port()).or(self.options.port);
        self.options.url_on_port(path, port)
    }

    /// The router with every installed fixture, for in-process requests.
    pub fn router(&self) -> Router {
        self.app.clone()
    }
}

impl fmt::Debug for FixtureServer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureServer")
            .field("options", &self.options)
            .field("fixtures", &self.fixtures)
            .field("local_addr", &self.local_addr())
            .finish()
    }
}

/// `route` with every parameter name erased: `/users/{id}` → `/users/{}`.
fn route_shape(route: &str) -> String {
    let mut shape = String::with_capacity(route.len());
    let mut chars = route.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                shape.push_str("{{");
            }
            '{' => {
                let wildcard = chars.peek() == Some(&'*');
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                }
                shape.push_str(if wildcard { "{*}" } else { "{}" });
            }
            c => shape.push(c),
        }
    }

    shape
}
