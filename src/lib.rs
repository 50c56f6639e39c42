/// Showcase: portfolio project records over HTTP
///
/// This library provides the project document model, its SQLite store, and the
/// axum routes that expose them.

// Core configuration and setup
pub mod config;

// Project records - document model, validation, and SQLite storage
pub mod project;

// HTTP API layer - REST endpoints, body extraction, and error mapping
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use project::{Project, ProjectStore};
pub use server::{build_router, start_server};
