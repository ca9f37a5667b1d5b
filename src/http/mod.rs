//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! Fixture (method, route, handler)
//!     → server.rs (install onto axum Router, bind, serve, drain)
//!     → handler.respond(request)
//!     → response.rs (StaticResponse for file-defined fixtures)
//!     → Send to client
//! ```

pub mod response;
pub mod server;

pub use response::StaticResponse;
pub use server::{FixtureServer, ServerError};
