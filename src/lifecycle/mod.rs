//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Registration (run.rs):
//!     FixtureRegistry::run(names) → FixtureRun { server, start, stop }
//!
//! Test group (hooks.rs):
//!     before hooks → start → FixtureServer::listen
//!     ... test bodies send requests ...
//!     after hooks  → stop  → FixtureServer::destroy (resolves once the port is free)
//!
//! Standalone binary (signals.rs):
//!     Ctrl+C → destroy → exit
//! ```
//!
//! # Design Decisions
//! - The core returns `start`/`stop` callbacks instead of calling a test
//!   runner directly; any harness can drive them
//! - After hooks always all run, so one failing teardown does not leak the
//!   other servers' sockets

pub mod hooks;
pub mod run;
pub mod signals;

pub use hooks::{hook, Hook, HookError, HookSet, TestLifecycle};
pub use run::FixtureRun;
