//! Shared helpers for fixture server integration tests.

use axum::body::Body;
use axum::http::Request;
use fixed_server::{FixtureDefinition, ServerOptions};

/// Options every test uses, on a port unique to that test.
pub fn server_options(port: u16) -> ServerOptions {
    ServerOptions {
        protocol: "http:".to_string(),
        hostname: "127.0.0.1".to_string(),
        port: Some(port),
    }
}

/// HTTP client that never reuses a proxy from the environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}

/// `GET /hello` answering `world`.
#[allow(dead_code)]
pub fn hello_fixture() -> FixtureDefinition {
    FixtureDefinition::new()
        .method("get")
        .route("/hello")
        .response(|_req: Request<Body>| async { "world" })
}
