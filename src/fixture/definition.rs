//! Fixture definitions before and after validation.
//!
//! # Responsibilities
//! - Collect method, route and response for a fixture (`FixtureDefinition`)
//! - Check that all three are present and usable by the router
//! - Freeze the result as an immutable `Fixture`
//!
//! # Design Decisions
//! - Definition fields are optional so incomplete definitions are
//!   representable and rejected at registration, not at compile time
//! - Empty strings count as missing
//! - Handlers are shared via `Arc`; building a server never clones them deeply

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use axum::http::Method;
use axum::routing::MethodFilter;

use crate::fixture::error::{FixtureError, FixtureField};
use crate::fixture::handler::ResponseHandler;

/// HTTP method a fixture answers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureMethod {
    /// Every method (`all`).
    All,
    /// A single verb.
    Verb(Method),
}

impl FromStr for FixtureMethod {
    type Err = ();

    /// Parses a case-insensitive verb token such as `get` or `post`, or `all`.
    fn from_str(token: &str) -> Result<Self, Self::Err> {
        if token.eq_ignore_ascii_case("all") {
            return Ok(FixtureMethod::All);
        }

        let method = Method::from_bytes(token.to_ascii_uppercase().as_bytes()).map_err(|_| ())?;
        // Extension methods parse as `Method` but the router cannot dispatch on them.
        MethodFilter::try_from(method.clone()).map_err(|_| ())?;
        Ok(FixtureMethod::Verb(method))
    }
}

impl fmt::Display for FixtureMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FixtureMethod::All => f.write_str("all"),
            FixtureMethod::Verb(method) => f.write_str(&method.as_str().to_ascii_lowercase()),
        }
    }
}

/// A fixture as supplied by a test author, possibly incomplete.
///
/// ```ignore
/// let hello = FixtureDefinition::new()
///     .method("get")
///     .route("/hello")
///     .response(|_req: Request<Body>| async { "world" });
/// ```
#[derive(Clone, Default)]
pub struct FixtureDefinition {
    method: Option<String>,
    route: Option<String>,
    response: Option<Arc<dyn ResponseHandler>>,
}

impl FixtureDefinition {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    pub fn route(mut self, route: impl Into<String>) -> Self {
        self.route = Some(route.into());
        self
    }

    pub fn response<H: ResponseHandler>(mut self, handler: H) -> Self {
        self.response = Some(Arc::new(handler));
        self
    }

    /// Like [`response`](Self::response), for a handler that is already shared.
    pub fn shared_response(mut self, handler: Arc<dyn ResponseHandler>) -> Self {
        self.response = Some(handler);
        self
    }
}

impl fmt::Debug for FixtureDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FixtureDefinition")
            .field("method", &self.method)
            .field("route", &self.route)
            .field("response", &self.response.as_ref().map(|_| "<handler>"))
            .finish()
    }
}

/// A validated fixture, ready to be installed on a server.
#[derive(Clone)]
pub struct Fixture {
    name: String,
    method: FixtureMethod,
    route: String,
    handler: Arc<dyn ResponseHandler>,
}

impl Fixture {
    /// Validate a definition registered under `name`.
    ///
    /// Presence is checked first (method, route, response, in that order),
    /// then the method token, then the route pattern.
    pub fn from_definition(name: &str, definition: FixtureDefinition) -> Result<Self, FixtureError> {
        let missing = |field| FixtureError::MissingField {
            fixture: name.to_string(),
            field,
        };

        let method = non_empty(definition.method).ok_or_else(|| missing(FixtureField::Method))?;
        let route = non_empty(definition.route).ok_or_else(|| missing(FixtureField::Route))?;
        let handler = definition.response.ok_or_else(|| missing(FixtureField::Response))?;

        let method = method.parse::<FixtureMethod>().map_err(|_| FixtureError::InvalidMethod {
            fixture: name.to_string(),
            method: method.clone(),
        })?;

        check_route(&route).map_err(|reason| FixtureError::InvalidRoute {
            fixture: name.to_string(),
            route: route.clone(),
            reason,
        })?;

        Ok(Self {
            name: name.to_string(),
            method,
            route,
            handler,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn method(&self) -> &FixtureMethod {
        &self.method
    }

    pub fn route(&self) -> &str {
        &self.route
    }

    pub fn handler(&self) -> Arc<dyn ResponseHandler> {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for Fixture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fixture")
            .field("name", &self.name)
            .field("method", &self.method)
            .field("route", &self.route)
            .finish_non_exhaustive()
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Reject route patterns the router would refuse to install.
///
/// Axum 0.8 routes through `matchit`, so a pattern it cannot parse on its
/// own fails here instead of at server construction.
fn check_route(route: &str) -> Result<(), String> {
    if !route.starts_with('/') {
        return Err("routes must start with `/`".into());
    }

    for segment in route.split('/') {
        if segment.starts_with(':') {
            return Err("path parameters are written `{name}`, not `:name`".into());
        }
        if segment.starts_with('*') {
            return Err("wildcards are written `{*name}`, not `*name`".into());
        }
    }

    matchit::Router::new()
        .insert(route, ())
        .map_err(|err| err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;

    fn complete() -> FixtureDefinition {
        FixtureDefinition::new()
            .method("get")
            .route("/hello")
            .response(|_req: Request<Body>| async { "world" })
    }

    #[test]
    fn test_method_parsing() {
        assert_eq!("get".parse::<FixtureMethod>(), Ok(FixtureMethod::Verb(Method::GET)));
        assert_eq!("POST".parse::<FixtureMethod>(), Ok(FixtureMethod::Verb(Method::POST)));
        assert_eq!("All".parse::<FixtureMethod>(), Ok(FixtureMethod::All));
        assert!("purge".parse::<FixtureMethod>().is_err());
        assert!("not a verb".parse::<FixtureMethod>().is_err());
    }

    #[test]
    fn test_method_display_is_lowercase() {
        assert_eq!(FixtureMethod::Verb(Method::DELETE).to_string(), "delete");
        assert_eq!(FixtureMethod::All.to_string(), "all");
    }

    #[test]
    fn test_complete_definition() {
        let fixture = Fixture::from_definition("GET 200 /hello", complete()).unwrap();
        assert_eq!(fixture.name(), "GET 200 /hello");
        assert_eq!(fixture.method(), &FixtureMethod::Verb(Method::GET));
        assert_eq!(fixture.route(), "/hello");
    }

    #[test]
    fn test_missing_fields_are_reported_in_order() {
        let err = Fixture::from_definition("empty", FixtureDefinition::new()).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::MissingField { field: FixtureField::Method, .. }
        ));

        let err = Fixture::from_definition("no route", FixtureDefinition::new().method("get")).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::MissingField { field: FixtureField::Route, .. }
        ));
        assert_eq!(err.to_string(), "fixture \"no route\" did not have a route");
    }

    #[test]
    fn test_empty_strings_count_as_missing() {
        let definition = complete().method("");
        let err = Fixture::from_definition("blank", definition).unwrap_err();
        assert!(matches!(
            err,
            FixtureError::MissingField { field: FixtureField::Method, .. }
        ));
    }

    #[test]
    fn test_route_checks() {
        assert!(check_route("/trips").is_ok());
        assert!(check_route("/users/{id}").is_ok());
        assert!(check_route("/files/{*rest}").is_ok());
        assert!(check_route("trips").is_err());
        assert!(check_route("/users/:id").is_err());
        assert!(check_route("/files/*rest").is_err());

        let err = Fixture::from_definition("legacy", complete().route("/users/:id")).unwrap_err();
        assert!(matches!(err, FixtureError::InvalidRoute { .. }));
    }

    #[test]
    fn test_unbalanced_parameter_is_rejected() {
        assert!(check_route("/users/{id").is_err());

        let err = Fixture::from_definition("bad", complete().route("/users/{id")).unwrap_err();
        match err {
            FixtureError::InvalidRoute { fixture, route, .. } => {
                assert_eq!(fixture, "bad");
                assert_eq!(route, "/users/{id");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_shared_response_handler() {
        let handler: Arc<dyn ResponseHandler> =
            Arc::new(|_req: Request<Body>| async { "shared" });
        let read = FixtureDefinition::new()
            .method("get")
            .route("/a")
            .shared_response(Arc::clone(&handler));
        let write = FixtureDefinition::new()
            .method("post")
            .route("/b")
            .shared_response(Arc::clone(&handler));

        let read = Fixture::from_definition("read", read).unwrap();
        let write = Fixture::from_definition("write", write).unwrap();
        assert!(Arc::ptr_eq(&read.handler(), &handler));
        assert!(Arc::ptr_eq(&write.handler(), &handler));
    }
}
