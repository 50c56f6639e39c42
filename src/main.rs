/// Showcase: portfolio project records over HTTP
///
/// Main entry point for the Showcase server. Initializes configuration and starts
/// the HTTP server.

use showcase::{config::Config, server::start_server};

/// Application entry point
///
/// The server provides:
/// - Project API at /projects and /projects/{id}
/// - Health check at /healthz
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration (defaults to 0.0.0.0:3004 and data/showcase.db)
    let config = Config::default();

    start_server(config).await?;

    Ok(())
}
