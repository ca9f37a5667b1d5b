//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! fixture file (TOML/JSON)
//!     → loader.rs (read & deserialize by extension)
//!     → schema.rs (FixtureFile: [server] options + [fixtures] table)
//!     → validation.rs (response status/headers/body checks)
//!     → FixtureDefinition per entry
//!     → FixtureRegistry::add_fixture (same path as code-built fixtures)
//! ```
//!
//! # Design Decisions
//! - Options are immutable once a server is created from them
//! - All option fields have defaults to allow minimal files
//! - Missing fixture fields are left for the registry to reject, so file
//!   fixtures and code fixtures fail the same way

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_fixture_file, ConfigError};
pub use schema::{FixtureFile, FixtureSpec, ResponseSpec, ServerOptions};
pub use validation::ValidationError;
