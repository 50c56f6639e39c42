/// Project REST API endpoints
///
/// Create, list, fetch and partially update portfolio projects. There is no
/// delete endpoint; records live until removed from the database directly.

use crate::{
    api::{error::ApiError, upload::ProjectForm},
    project::{
        storage::ProjectStore,
        types::{is_updatable, Project, ProjectDraft, ProjectView, Projection},
    },
};
use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    http::{header, StatusCode},
    response::Json,
    routing::{get, patch, post},
    Router,
};
use serde_json::Value;

/// Application state shared by the project handlers
#[derive(Clone)]
pub struct AppState {
    /// Document store for project records
    pub store: ProjectStore,
}

/// Query parameters for listing projects
#[derive(Debug, Default)]
pub struct ListProjectsQuery {
    /// Every `titleOnly` value in the query string; the key may repeat
    pub title_only: Vec<String>,
}

impl ListProjectsQuery {
    /// Collect the flag from raw query pairs, ignoring other keys
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        Self {
            title_only: pairs
                .into_iter()
                .filter(|(key, _)| key == "titleOnly")
                .map(|(_, value)| value)
                .collect(),
        }
    }

    /// Any non-empty value, "false" and "0" included, limits the listing to titles
    pub fn projection(&self) -> Projection {
        if self.title_only.iter().any(|value| !value.is_empty()) {
            Projection::TitleOnly
        } else {
            Projection::Full
        }
    }
}

/// Create project routes
pub fn create_project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", post(create_project))
        .route("/projects", get(list_projects))
        .route("/projects/{id}", get(get_project))
        .route("/projects/{id}", patch(update_project))
}

/// Create a project
///
/// POST /projects
/// Body: multipart with text fields and a `preview` image file
/// Returns: 201 with the submitted fields echoed back; `Location` names the new record
async fn create_project(
    State(state): State<AppState>,
    form: ProjectForm,
) -> Result<(StatusCode, [(header::HeaderName, String); 1], Json<Value>), ApiError> {
    let echo = form.echo();
    let draft = ProjectDraft::from_fields(&form.fields, form.preview)?;

    let project = state.store.create(draft).await?;

    tracing::info!("Created project: {} ({})", project.id, project.title);

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, format!("/projects/{}", project.id))],
        Json(echo),
    ))
}

/// List all projects
///
/// GET /projects?titleOnly=true
/// Returns: [{ "id": "...", "title": "...", ... }] in insertion order
async fn list_projects(
    State(state): State<AppState>,
    query: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<Json<Vec<ProjectView>>, ApiError> {
    let Query(pairs) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;
    let query = ListProjectsQuery::from_pairs(pairs);

    let projects = state.store.find_all(query.projection()).await?;
    Ok(Json(projects))
}

/// Get a project by id
///
/// GET /projects/{id}
async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Project>, ApiError> {
    match state.store.find_by_id(&id).await? {
        Some(project) => Ok(Json(project)),
        None => Err(ApiError::NotFound),
    }
}

/// Partially update a project
///
/// PATCH /projects/{id}
/// Body: any of title, description, demo, code, tech (JSON or multipart),
/// plus an optional `preview` image file when multipart
/// Returns: the full updated project
async fn update_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
    form: ProjectForm,
) -> Result<Json<Project>, ApiError> {
    if !form.keys().all(is_updatable) {
        return Err(ApiError::InvalidUpdates);
    }

    let mut project = state
        .store
        .find_by_id(&id)
        .await?
        .ok_or(ApiError::NotFound)?;

    for (key, value) in &form.fields {
        project.apply_field(key, value)?;
    }

    // A new image replaces the old one even when no text field changed
    if let Some(preview) = form.preview {
        project.preview = preview;
    }

    state.store.save(&project).await?;

    tracing::info!("Updated project: {} ({})", project.id, project.title);

    Ok(Json(project))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(pairs: &[(&str, &str)]) -> ListProjectsQuery {
        ListProjectsQuery::from_pairs(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn missing_or_empty_flag_lists_full_records() {
        assert_eq!(query(&[]).projection(), Projection::Full);
        assert_eq!(query(&[("titleOnly", "")]).projection(), Projection::Full);
        assert_eq!(query(&[("other", "true")]).projection(), Projection::Full);
    }

    #[test]
    fn any_non_empty_flag_lists_titles() {
        for value in ["true", "1", "yes", "false", "0"] {
            assert_eq!(
                query(&[("titleOnly", value)]).projection(),
                Projection::TitleOnly
            );
        }
    }

    #[test]
    fn repeated_flag_lists_titles() {
        let repeated = query(&[("titleOnly", "true"), ("titleOnly", "true")]);
        assert_eq!(repeated.title_only.len(), 2);
        assert_eq!(repeated.projection(), Projection::TitleOnly);

        assert_eq!(
            query(&[("titleOnly", ""), ("titleOnly", "false")]).projection(),
            Projection::TitleOnly
        );
    }
}
