/// Project type definitions
///
/// A project is a portfolio entry: what was built, where the code lives, where
/// it runs, what it was built with, and a preview image. Text fields arrive as
/// loosely typed JSON values and are cast the way a document mapper would.

use base64::{engine::general_purpose::STANDARD, Engine};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Fields a client may change through an update
pub const UPDATABLE_FIELDS: [&str; 5] = ["title", "description", "demo", "code", "tech"];

/// Field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Path `{0}` is required")]
    Required(&'static str),

    #[error("Cast to {expected} failed for path `{field}`")]
    Cast {
        field: &'static str,
        expected: &'static str,
    },
}

/// A stored portfolio project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    /// Store-assigned identifier, immutable after creation
    pub id: Uuid,
    pub title: String,
    pub description: String,
    /// Link to the source code
    pub code: String,
    /// Link to the live demo
    pub demo: String,
    /// Technology tags in the order they were submitted
    #[serde(default)]
    pub tech: Vec<String>,
    /// Raw image bytes, base64 over JSON
    #[serde(serialize_with = "serialize_preview", deserialize_with = "deserialize_preview")]
    pub preview: Vec<u8>,
}

impl Project {
    /// Check the record invariants: non-empty scalars, non-empty tags, a preview
    pub fn validate(&self) -> Result<(), ValidationError> {
        let scalars = [
            ("title", &self.title),
            ("description", &self.description),
            ("code", &self.code),
            ("demo", &self.demo),
        ];
        for (field, value) in scalars {
            if value.trim().is_empty() {
                return Err(ValidationError::Required(field));
            }
        }

        if self.tech.iter().any(|tag| tag.is_empty()) {
            return Err(ValidationError::Required("tech"));
        }

        if self.preview.is_empty() {
            return Err(ValidationError::Required("preview"));
        }

        Ok(())
    }

    /// Assign a single updatable field from a raw request value
    ///
    /// Keys outside `UPDATABLE_FIELDS` are ignored; callers reject them first.
    pub fn apply_field(&mut self, key: &str, value: &Value) -> Result<(), ValidationError> {
        match key {
            "title" => self.title = cast_text("title", value)?,
            "description" => self.description = cast_text("description", value)?,
            "code" => self.code = cast_text("code", value)?,
            "demo" => self.demo = cast_text("demo", value)?,
            "tech" => self.tech = cast_tech(value)?,
            _ => {}
        }
        Ok(())
    }
}

/// Whether `key` may appear in an update body
pub fn is_updatable(key: &str) -> bool {
    UPDATABLE_FIELDS.contains(&key)
}

/// Unvalidated field values for a project that does not exist yet
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub demo: Option<String>,
    pub tech: Option<Vec<String>>,
    pub preview: Option<Vec<u8>>,
}

impl ProjectDraft {
    /// Build a draft from submitted text fields plus an optional preview
    ///
    /// Unknown keys are dropped, matching a strict document schema.
    pub fn from_fields(fields: &Map<String, Value>, preview: Option<Vec<u8>>) -> Result<Self, ValidationError> {
        let mut draft = Self {
            preview,
            ..Self::default()
        };

        for (key, value) in fields {
            match key.as_str() {
                "title" => draft.title = Some(cast_text("title", value)?),
                "description" => draft.description = Some(cast_text("description", value)?),
                "code" => draft.code = Some(cast_text("code", value)?),
                "demo" => draft.demo = Some(cast_text("demo", value)?),
                "tech" => draft.tech = Some(cast_tech(value)?),
                _ => {}
            }
        }

        Ok(draft)
    }

    /// Turn the draft into a validated project with the given id
    pub fn into_project(self, id: Uuid) -> Result<Project, ValidationError> {
        let project = Project {
            id,
            title: self.title.unwrap_or_default(),
            description: self.description.unwrap_or_default(),
            code: self.code.unwrap_or_default(),
            demo: self.demo.unwrap_or_default(),
            tech: self.tech.unwrap_or_default(),
            preview: self.preview.unwrap_or_default(),
        };
        project.validate()?;
        Ok(project)
    }
}

/// Which fields a listing returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Projection {
    #[default]
    Full,
    /// Only `id` and `title`
    TitleOnly,
}

/// Title-only view of a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectTitle {
    pub id: Uuid,
    pub title: String,
}

/// One element of a project listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ProjectView {
    Full(Project),
    TitleOnly(ProjectTitle),
}

/// Encode preview bytes the way they appear in JSON responses
pub fn encode_preview(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

fn serialize_preview<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&encode_preview(bytes))
}

fn deserialize_preview<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
    let encoded = String::deserialize(deserializer)?;
    STANDARD.decode(encoded).map_err(serde::de::Error::custom)
}

fn cast_text(field: &'static str, value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(text) => Ok(text.trim().to_string()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Err(ValidationError::Required(field)),
        Value::Array(_) | Value::Object(_) => Err(ValidationError::Cast {
            field,
            expected: "string",
        }),
    }
}

// A bare scalar becomes a one-tag list
fn cast_tech(value: &Value) -> Result<Vec<String>, ValidationError> {
    match value {
        Value::Array(items) => items.iter().map(cast_tag).collect(),
        other => Ok(vec![cast_tag(other)?]),
    }
}

fn cast_tag(value: &Value) -> Result<String, ValidationError> {
    match value {
        Value::String(tag) => Ok(tag.clone()),
        Value::Number(number) => Ok(number.to_string()),
        Value::Bool(flag) => Ok(flag.to_string()),
        Value::Null => Err(ValidationError::Required("tech")),
        Value::Array(_) | Value::Object(_) => Err(ValidationError::Cast {
            field: "tech",
            expected: "[string]",
        }),
    }
}
