/// Server setup and initialization
///
/// Wires together the project store, the HTTP routes and middleware.
/// Provides the main application factory function for creating the Axum app.

use crate::{
    api::{classify_errors, create_project_routes, AppState, StatusMapping},
    config::{ApiConfig, Config},
    project::ProjectStore,
};
use anyhow::Result;
use axum::{extract::DefaultBodyLimit, middleware::map_response, routing::get, Router};
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;

/// Create the main Axum application with all routes and middleware
///
/// Opens the database, makes sure the schema exists and builds the router.
pub async fn create_app(config: Config) -> Result<Router> {
    // Ensure the database directory exists
    if let Some(data_dir) = Path::new(&config.database.path).parent() {
        if !data_dir.as_os_str().is_empty() {
            tracing::info!("📁 Ensuring data directory exists: {}", data_dir.display());
            std::fs::create_dir_all(data_dir)
                .map_err(|e| anyhow::anyhow!("Failed to create data directory: {}", e))?;
        }
    }

    tracing::info!("🗄️ Opening project database: {}", config.database.path);
    let store = ProjectStore::connect(&config.database.path)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to open project database: {}", e))?;

    store
        .init_schema()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to initialize project schema: {}", e))?;

    let app = build_router(store, &config.api);

    tracing::info!("✅ Application initialized successfully");

    Ok(app)
}

/// Build the router around an already opened store
pub fn build_router(store: ProjectStore, api: &ApiConfig) -> Router {
    let state = AppState { store };

    let app = Router::new()
        // Health check endpoint
        .route("/healthz", get(health_check))
        // Project API routes
        .merge(create_project_routes().with_state(state))
        .layer(DefaultBodyLimit::max(api.max_body_bytes))
        .layer(CorsLayer::permissive());

    match api.status_mapping() {
        StatusMapping::Classified => {
            tracing::info!("Classifying client errors as 4xx");
            app.layer(map_response(classify_errors))
        }
        StatusMapping::Legacy => app,
    }
}

/// Start the HTTP server with the given configuration
pub async fn start_server(config: Config) -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_target(false)
        .with_thread_ids(true)
        .with_level(true)
        .init();

    tracing::info!("Starting Showcase server...");

    let app = create_app(config.clone()).await?;

    let bind_addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&bind_addr).await?;

    tracing::info!("Server listening on http://{}", bind_addr);

    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

/// Health check endpoint handler
async fn health_check() -> &'static str {
    "ok"
}
