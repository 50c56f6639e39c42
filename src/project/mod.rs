/// Project records
///
/// Defines the project document, its validation rules, and the SQLite store
/// that persists it.

pub mod storage;
pub mod types;

pub use storage::{ProjectStore, StoreError};
pub use types::{Project, ProjectDraft, ProjectTitle, ProjectView, Projection, ValidationError};
