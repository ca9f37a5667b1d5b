//! Standalone fixture server.
//!
//! Serves fixtures from a TOML or JSON file until Ctrl+C:
//!
//! ```text
//! fixed-server --fixtures fixtures.toml --port 1337 "GET 200 /trips#full"
//! ```
//!
//! With no names, every fixture in the file is served.

use std::path::PathBuf;

use clap::Parser;

use fixed_server::lifecycle::signals::shutdown_signal;
use fixed_server::observability::logging::{init_logging, DEFAULT_FILTER};
use fixed_server::FixtureRegistry;

#[derive(Parser)]
#[command(name = "fixed-server")]
#[command(about = "Serve HTTP fixtures from a file", long_about = None)]
struct Cli {
    /// Fixture file (.toml or .json), relative to the current directory.
    #[arg(short, long)]
    fixtures: PathBuf,

    /// Port to listen on. Overrides the file's `[server] port`.
    #[arg(short, long)]
    port: Option<u16>,

    /// Log filter used when RUST_LOG is not set.
    #[arg(long, default_value = DEFAULT_FILTER)]
    log_filter: String,

    /// Fixtures to serve (default: all).
    names: Vec<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_logging(&cli.log_filter);

    let registry = FixtureRegistry::from_source(&cli.fixtures, None)?;
    let names = if cli.names.is_empty() {
        registry.names()
    } else {
        cli.names
    };

    let mut server = registry.create_server(names)?;
    server.listen(cli.port).await?;

    if let Ok(url) = server.url("/") {
        tracing::info!(
            url = %url,
            fixtures = ?server.fixture_names(),
            "Serving fixtures"
        );
    }

    shutdown_signal().await?;
    server.destroy().await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
