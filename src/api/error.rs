/// REST API error types
///
/// Every failure a handler can produce is one `ApiError` variant. Responses
/// are rendered with the legacy status mapping, where client mistakes other
/// than bad update keys surface as a bare 500. The classified mapping is
/// attached to each error response and swapped in by `classify_errors` when
/// the server is configured for it.

use crate::project::{StoreError, ValidationError};
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// How error kinds map onto HTTP status codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StatusMapping {
    /// 404 and 400 for bad update keys, 500 for everything else
    #[default]
    Legacy,
    /// Distinguishes bad input (400) and unsupported uploads (415) from store failures
    Classified,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Project not found")]
    NotFound,

    #[error("Invalid updates")]
    InvalidUpdates,

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("File must be an image: {0}")]
    UnsupportedFileType(String),

    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),
}

impl ApiError {
    /// Status code for this error under `mapping`
    pub fn status(&self, mapping: StatusMapping) -> StatusCode {
        match (self, mapping) {
            (ApiError::NotFound, _) => StatusCode::NOT_FOUND,
            (ApiError::InvalidUpdates, _) => StatusCode::BAD_REQUEST,
            (ApiError::InvalidInput(_), StatusMapping::Classified) => StatusCode::BAD_REQUEST,
            (ApiError::UnsupportedFileType(_), StatusMapping::Classified) => {
                StatusCode::UNSUPPORTED_MEDIA_TYPE
            }
            (ApiError::InvalidInput(_), StatusMapping::Legacy)
            | (ApiError::UnsupportedFileType(_), StatusMapping::Legacy)
            | (ApiError::StoreUnavailable(_), _) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message returned to the client under `mapping`, if any
    pub fn public_message(&self, mapping: StatusMapping) -> Option<String> {
        match (self, mapping) {
            (ApiError::InvalidUpdates, _) => Some(self.to_string()),
            (ApiError::InvalidInput(message), StatusMapping::Classified) => Some(message.clone()),
            (ApiError::UnsupportedFileType(_), StatusMapping::Classified) => {
                Some("File must be an image.".to_string())
            }
            _ => None,
        }
    }

    fn log(&self) {
        match self {
            ApiError::NotFound => tracing::debug!("{}", self),
            ApiError::InvalidUpdates | ApiError::InvalidInput(_) | ApiError::UnsupportedFileType(_) => {
                tracing::warn!("Rejected request: {}", self)
            }
            ApiError::StoreUnavailable(_) => tracing::error!("{}", self),
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Validation(_) | StoreError::MalformedId(_) => {
                ApiError::InvalidInput(error.to_string())
            }
            StoreError::Database(_) | StoreError::Document(_) => {
                ApiError::StoreUnavailable(error.to_string())
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(error: ValidationError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

/// Classified rendering carried on legacy error responses
#[derive(Debug, Clone)]
struct ClassifiedError {
    status: StatusCode,
    message: Option<String>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        self.log();

        let classified = ClassifiedError {
            status: self.status(StatusMapping::Classified),
            message: self.public_message(StatusMapping::Classified),
        };

        let mut response = render(
            self.status(StatusMapping::Legacy),
            self.public_message(StatusMapping::Legacy),
        );
        response.extensions_mut().insert(classified);
        response
    }
}

/// Response middleware that re-renders error responses with the classified mapping
pub async fn classify_errors(mut response: Response) -> Response {
    match response.extensions_mut().remove::<ClassifiedError>() {
        Some(classified) => render(classified.status, classified.message),
        None => response,
    }
}

fn render(status: StatusCode, message: Option<String>) -> Response {
    match message {
        Some(message) => (status, Json(json!({ "error": message }))).into_response(),
        None => status.into_response(),
    }
}
