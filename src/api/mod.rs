/// HTTP API Layer
///
/// REST endpoints for portfolio projects. It handles:
/// - Project create/list/get/update
/// - Multipart and JSON body extraction with the preview image filter
/// - Error kinds and their status code mapping

// Project endpoints (POST/GET/PATCH)
pub mod projects;

// Request body extraction and upload filtering
pub mod upload;

// API error types and status mapping
pub mod error;

// Re-export router builder and shared state
pub use error::{classify_errors, ApiError, StatusMapping};
pub use projects::{create_project_routes, AppState};
