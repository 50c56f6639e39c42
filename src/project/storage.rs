/// SQLite document storage for projects
///
/// Each project is one row: the text fields live in a JSON document column,
/// the preview image in a BLOB next to it. Rows are returned in insertion order.

use crate::project::types::{
    Project, ProjectDraft, ProjectTitle, ProjectView, Projection, ValidationError,
};
use serde::{Deserialize, Serialize};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePool},
    FromRow,
};
use thiserror::Error;
use uuid::Uuid;

/// Errors raised by the project store
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Project validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Malformed project id: {0}")]
    MalformedId(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Project document encoding error: {0}")]
    Document(#[from] serde_json::Error),
}

/// SQLite-backed project store
///
/// Cheap to clone; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct ProjectStore {
    pool: SqlitePool,
}

/// Text fields as persisted in the `document` column
#[derive(Debug, Serialize, Deserialize)]
struct ProjectDocument {
    title: String,
    description: String,
    code: String,
    demo: String,
    #[serde(default)]
    tech: Vec<String>,
}

#[derive(Debug, FromRow)]
struct ProjectRow {
    id: String,
    document: String,
    preview: Vec<u8>,
}

#[derive(Debug, FromRow)]
struct TitleRow {
    id: String,
    title: Option<String>,
}

impl ProjectStore {
    /// Create a store on top of an existing pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the SQLite database file at `path`
    pub async fn connect(path: &str) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePool::connect_with(options).await?;
        Ok(Self::new(pool))
    }

    /// Create the projects table
    ///
    /// Safe to call multiple times (uses IF NOT EXISTS).
    pub async fn init_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS projects (
                id TEXT PRIMARY KEY,
                document JSON NOT NULL,
                preview BLOB NOT NULL,
                created_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP,
                updated_at TIMESTAMP DEFAULT CURRENT_TIMESTAMP
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Validate a draft, assign it a fresh id and insert it
    pub async fn create(&self, draft: ProjectDraft) -> Result<Project, StoreError> {
        let project = draft.into_project(Uuid::new_v4())?;
        self.save(&project).await?;
        tracing::debug!("Inserted project {}", project.id);
        Ok(project)
    }

    /// List every project in insertion order
    pub async fn find_all(&self, projection: Projection) -> Result<Vec<ProjectView>, StoreError> {
        match projection {
            Projection::Full => {
                let rows: Vec<ProjectRow> =
                    sqlx::query_as("SELECT id, document, preview FROM projects ORDER BY rowid")
                        .fetch_all(&self.pool)
                        .await?;

                rows.into_iter()
                    .map(|row| row.into_project().map(ProjectView::Full))
                    .collect()
            }
            Projection::TitleOnly => {
                let rows: Vec<TitleRow> = sqlx::query_as(
                    "SELECT id, json_extract(document, '$.title') AS title FROM projects ORDER BY rowid",
                )
                .fetch_all(&self.pool)
                .await?;

                rows.into_iter()
                    .map(|row| -> Result<ProjectView, StoreError> {
                        Ok(ProjectView::TitleOnly(ProjectTitle {
                            id: parse_id(&row.id)?,
                            title: row.title.unwrap_or_default(),
                        }))
                    })
                    .collect()
            }
        }
    }

    /// Retrieve a project by id
    ///
    /// Fails with `MalformedId` when `id` is not a UUID; returns `None` when
    /// no project has that id.
    pub async fn find_by_id(&self, id: &str) -> Result<Option<Project>, StoreError> {
        let id = parse_id(id)?;

        let row: Option<ProjectRow> =
            sqlx::query_as("SELECT id, document, preview FROM projects WHERE id = ?")
                .bind(id.to_string())
                .fetch_optional(&self.pool)
                .await?;

        row.map(ProjectRow::into_project).transpose()
    }

    /// Persist the current field values of `project`
    ///
    /// Uses UPSERT so the same call covers the first insert and later updates.
    /// No version check: concurrent saves of one id are last-write-wins.
    pub async fn save(&self, project: &Project) -> Result<(), StoreError> {
        project.validate()?;

        let document = serde_json::to_string(&ProjectDocument {
            title: project.title.clone(),
            description: project.description.clone(),
            code: project.code.clone(),
            demo: project.demo.clone(),
            tech: project.tech.clone(),
        })?;

        sqlx::query(
            r#"
            INSERT INTO projects (id, document, preview, updated_at)
            VALUES (?, ?, ?, CURRENT_TIMESTAMP)
            ON CONFLICT(id) DO UPDATE SET
                document = excluded.document,
                preview = excluded.preview,
                updated_at = CURRENT_TIMESTAMP
            "#,
        )
        .bind(project.id.to_string())
        .bind(&document)
        .bind(&project.preview)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Number of stored projects
    pub async fn count(&self) -> Result<i64, StoreError> {
        let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM projects")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

impl ProjectRow {
    fn into_project(self) -> Result<Project, StoreError> {
        let document: ProjectDocument = serde_json::from_str(&self.document)?;
        Ok(Project {
            id: parse_id(&self.id)?,
            title: document.title,
            description: document.description,
            code: document.code,
            demo: document.demo,
            tech: document.tech,
            preview: self.preview,
        })
    }
}

fn parse_id(id: &str) -> Result<Uuid, StoreError> {
    Uuid::parse_str(id).map_err(|_| StoreError::MalformedId(id.to_string()))
}
