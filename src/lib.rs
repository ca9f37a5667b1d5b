//! Disposable HTTP fixture servers for test suites.
//!
//! Register named fixtures (method + route + response) on a
//! [`FixtureRegistry`], then build a [`FixtureServer`] exposing a subset of
//! them for one group of tests and tear it down afterwards.

pub mod config;
pub mod fixture;
pub mod http;
pub mod lifecycle;
pub mod observability;

pub use config::{ConfigError, ServerOptions};
pub use fixture::{Fixture, FixtureDefinition, FixtureError, FixtureRegistry, ResponseHandler};
pub use http::{FixtureServer, ServerError, StaticResponse};
pub use lifecycle::{FixtureRun, HookSet, TestLifecycle};
