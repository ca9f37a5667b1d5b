//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber
//! - Honor `RUST_LOG`, falling back to a caller-supplied filter
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Initialization is idempotent: a second call is a no-op, so every test
//!   may call it

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter for the standalone binary.
pub const DEFAULT_FILTER: &str = "fixed_server=info,tower_http=debug";

fn env_filter(default_filter: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| default_filter.into())
}

/// Install a global fmt subscriber writing to stdout.
pub fn init_logging(default_filter: &str) {
    let _ = tracing_subscriber::registry()
        .with(env_filter(default_filter))
        .with(tracing_subscriber::fmt::layer())
        .try_init();
}

/// Install a global fmt subscriber whose output cargo's test harness captures.
pub fn init_test_logging() {
    let _ = tracing_subscriber::registry()
        .with(env_filter("fixed_server=debug"))
        .with(tracing_subscriber::fmt::layer().with_test_writer())
        .try_init();
}
