//! Fixture registration subsystem.
//!
//! # Data Flow
//! ```text
//! FixtureDefinition (method?, route?, response?)
//!     → definition.rs (presence + method + route checks)
//!     → Fixture (validated, immutable)
//!     → registry.rs (name → Fixture, last write wins)
//!
//! On create_server / run:
//!     names → look up every Fixture (fail on unknown name)
//!     → FixtureServer::install_fixture for each, in order
//! ```
//!
//! # Design Decisions
//! - One registry per test file; no global state
//! - Handlers are opaque (`handler.rs`); the registry only stores and binds them
//! - Every failure is a caller error, surfaced immediately

pub mod definition;
pub mod error;
pub mod handler;
pub mod registry;

pub use definition::{Fixture, FixtureDefinition, FixtureMethod};
pub use error::{FixtureError, FixtureField};
pub use handler::ResponseHandler;
pub use registry::{FixtureNames, FixtureRegistry};
