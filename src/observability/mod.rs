//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! registry / server / hooks produce:
//!     → tracing events (fixture registered, server listening/stopped)
//!     → tower_http TraceLayer spans (one per request served)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, or the test writer under cargo test)
//! ```

pub mod logging;

pub use logging::{init_logging, init_test_logging};
