/// Configuration management for the Showcase server
///
/// Handles server binding, the database location, and API behavior.

use crate::api::StatusMapping;
use serde::{Deserialize, Serialize};

/// Main application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Server configuration
    pub server: ServerConfig,
    /// Database configuration
    pub database: DatabaseConfig,
    /// API behavior
    pub api: ApiConfig,
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Server bind address (e.g., "0.0.0.0")
    pub host: String,
    /// Server port number
    pub port: u16,
}

/// Database configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// SQLite database file (default: "data/showcase.db")
    /// Missing parent directories are created at startup
    pub path: String,
}

/// API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Report bad input as 400/415 instead of folding it into 500
    pub classify_errors: bool,
    /// Upper bound on request body size, multipart uploads included
    pub max_body_bytes: usize,
}

impl ApiConfig {
    pub fn status_mapping(&self) -> StatusMapping {
        if self.classify_errors {
            StatusMapping::Classified
        } else {
            StatusMapping::Legacy
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            classify_errors: false,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// 16 MiB
pub const DEFAULT_MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

impl Default for Config {
    /// Default configuration with ENV_VAR support for container deployment
    fn default() -> Self {
        Self {
            server: ServerConfig {
                host: std::env::var("SHOWCASE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: std::env::var("SHOWCASE_PORT")
                    .unwrap_or_else(|_| "3004".to_string())
                    .parse()
                    .unwrap_or(3004),
            },
            database: DatabaseConfig {
                path: std::env::var("SHOWCASE_DATABASE_PATH")
                    .unwrap_or_else(|_| "data/showcase.db".to_string()),
            },
            api: ApiConfig {
                classify_errors: std::env::var("SHOWCASE_CLASSIFY_ERRORS")
                    .map(|value| matches!(value.as_str(), "1" | "true" | "yes"))
                    .unwrap_or(false),
                max_body_bytes: std::env::var("SHOWCASE_MAX_BODY_BYTES")
                    .ok()
                    .and_then(|value| value.parse().ok())
                    .unwrap_or(DEFAULT_MAX_BODY_BYTES),
            },
        }
    }
}
