//! Fixture registration and lookup errors.

use std::fmt;

use thiserror::Error;

/// The three fields every fixture definition must carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixtureField {
    Method,
    Route,
    Response,
}

impl fmt::Display for FixtureField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FixtureField::Method => "method",
            FixtureField::Route => "route",
            FixtureField::Response => "response",
        };
        f.write_str(name)
    }
}

/// Errors raised while registering fixtures or building a server from them.
///
/// Every variant is a caller mistake. None of them are retried.
#[derive(Debug, Error)]
pub enum FixtureError {
    /// A definition lacks one of method, route or response.
    #[error("fixture \"{fixture}\" did not have a {field}")]
    MissingField { fixture: String, field: FixtureField },

    /// A server was requested with a name that was never registered.
    #[error("fixture \"{fixture}\" could not be found")]
    NotFound { fixture: String },

    /// The method token is not an HTTP verb the router can dispatch on.
    #[error("fixture \"{fixture}\" has unsupported method \"{method}\"")]
    InvalidMethod { fixture: String, method: String },

    /// The route pattern would be rejected by the router.
    #[error("fixture \"{fixture}\" has invalid route \"{route}\": {reason}")]
    InvalidRoute {
        fixture: String,
        route: String,
        reason: String,
    },
}

impl FixtureError {
    /// Name of the fixture the error is about.
    pub fn fixture(&self) -> &str {
        match self {
            FixtureError::MissingField { fixture, .. }
            | FixtureError::NotFound { fixture }
            | FixtureError::InvalidMethod { fixture, .. }
            | FixtureError::InvalidRoute { fixture, .. } => fixture,
        }
    }
}
