/// Request body extraction for project endpoints
///
/// Accepts either `multipart/form-data` (text fields plus one `preview` image)
/// or a JSON object. Both land in the same `ProjectForm` so handlers never see
/// the wire format.

use crate::{api::error::ApiError, project::types::encode_preview};
use axum::{
    body::Bytes,
    extract::{FromRequest, Multipart, Request},
    http::{header, HeaderMap},
};
use serde_json::{Map, Value};

/// Name of the multipart file field carrying the preview image
pub const PREVIEW_FIELD: &str = "preview";

/// Accepted preview filename suffixes (case-sensitive)
pub const PREVIEW_EXTENSIONS: [&str; 3] = [".png", ".jpg", ".jpeg"];

/// Parsed project request body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectForm {
    /// Text fields by name; repeated multipart fields collapse into arrays
    pub fields: Map<String, Value>,
    /// Bytes of the preview image, when one was attached
    pub preview: Option<Vec<u8>>,
}

/// Whether an upload filename passes the image filter
pub fn is_image_file_name(file_name: &str) -> bool {
    PREVIEW_EXTENSIONS
        .iter()
        .any(|extension| file_name.ends_with(extension))
}

impl ProjectForm {
    /// Names of the submitted text fields
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// The submitted fields as JSON, preview included
    pub fn echo(&self) -> Value {
        let mut echo = self.fields.clone();
        if let Some(preview) = &self.preview {
            echo.insert(
                PREVIEW_FIELD.to_string(),
                Value::String(encode_preview(preview)),
            );
        }
        Value::Object(echo)
    }

    /// Record a multipart text field
    ///
    /// `name[]` always yields an array; a repeated plain name turns into one.
    fn push_text(&mut self, name: &str, text: String) {
        let (key, bracketed) = match name.strip_suffix("[]") {
            Some(key) => (key, true),
            None => (name, false),
        };

        match self.fields.get_mut(key) {
            Some(Value::Array(items)) => items.push(Value::String(text)),
            Some(existing) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, Value::String(text)]);
            }
            None if bracketed => {
                self.fields
                    .insert(key.to_string(), Value::Array(vec![Value::String(text)]));
            }
            None => {
                self.fields.insert(key.to_string(), Value::String(text));
            }
        }
    }

    async fn from_multipart(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| ApiError::InvalidInput(e.body_text()))?
        {
            let name = field.name().unwrap_or_default().to_string();

            match field.file_name().map(str::to_string) {
                Some(file_name) => {
                    if name != PREVIEW_FIELD || form.preview.is_some() {
                        return Err(ApiError::InvalidInput(format!(
                            "Unexpected file field `{}`",
                            name
                        )));
                    }
                    if !is_image_file_name(&file_name) {
                        return Err(ApiError::UnsupportedFileType(file_name));
                    }

                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
                    tracing::debug!("Received preview {} ({} bytes)", file_name, bytes.len());
                    form.preview = Some(bytes.to_vec());
                }
                None => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
                    form.push_text(&name, text);
                }
            }
        }

        Ok(form)
    }

    /// Parse a JSON object body; an empty body is an empty form
    fn from_json(body: &[u8]) -> Result<Self, ApiError> {
        if body.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }

        match serde_json::from_slice(body) {
            Ok(Value::Object(fields)) => Ok(Self {
                fields,
                preview: None,
            }),
            Ok(_) => Err(ApiError::InvalidInput(
                "Request body must be a JSON object".to_string(),
            )),
            Err(e) => Err(ApiError::InvalidInput(format!("Malformed JSON body: {}", e))),
        }
    }
}

fn is_multipart(headers: &HeaderMap) -> bool {
    headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|content_type| {
            content_type
                .trim_start()
                .to_ascii_lowercase()
                .starts_with("multipart/form-data")
        })
}

impl<S> FromRequest<S> for ProjectForm
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        if is_multipart(req.headers()) {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
            Self::from_multipart(multipart).await
        } else {
            let body = Bytes::from_request(req, state)
                .await
                .map_err(|e| ApiError::InvalidInput(e.body_text()))?;
            Self::from_json(&body)
        }
    }
}
