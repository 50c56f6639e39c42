#![allow(dead_code)]

use axum::http::{header, StatusCode};
use axum_test::{
    multipart::{MultipartForm, Part},
    TestResponse, TestServer,
};
use showcase::{config::ApiConfig, project::ProjectStore, server::build_router};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

/// Bytes standing in for an uploaded image
pub const PREVIEW_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot-really-an-image";

/// Creates an in-memory project store with the schema in place
pub async fn create_test_store() -> ProjectStore {
    let options = SqliteConnectOptions::new()
        .filename(":memory:")
        .create_if_missing(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1) // In-memory needs single connection
        .connect_with(options)
        .await
        .expect("Failed to create test pool");

    let store = ProjectStore::new(pool);
    store.init_schema().await.expect("Failed to create schema");
    store
}

pub struct TestServerWithStore {
    pub server: TestServer,
    pub store: ProjectStore,
}

/// Create a TestServer with the legacy status mapping
pub async fn create_test_server() -> TestServerWithStore {
    create_test_server_with_config(ApiConfig::default()).await
}

/// Create a TestServer with custom API configuration
pub async fn create_test_server_with_config(api: ApiConfig) -> TestServerWithStore {
    let store = create_test_store().await;
    let app = build_router(store.clone(), &api);
    let server = TestServer::builder()
        .build(app)
        .expect("Failed to create test server");

    TestServerWithStore { server, store }
}

/// A multipart form with every text field set
pub fn complete_form(title: &str) -> MultipartForm {
    MultipartForm::new()
        .add_text("title", title.to_string())
        .add_text("description", "Live departures on a wall display")
        .add_text("code", "https://example.com/board/code")
        .add_text("demo", "https://example.com/board")
        .add_text("tech", "rust")
        .add_text("tech", "axum")
}

/// A preview file part with the given filename
pub fn preview_part(file_name: &str, bytes: &[u8]) -> Part {
    Part::bytes(bytes.to_vec())
        .file_name(file_name.to_string())
        .mime_type("image/png")
}

/// POST a complete project and return the id from its Location header
pub async fn create_project(server: &TestServer, title: &str) -> String {
    let form = complete_form(title).add_part("preview", preview_part("board.png", PREVIEW_BYTES));
    let response = server.post("/projects").multipart(form).await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    location_id(&response)
}

/// Extract the project id from a `Location: /projects/{id}` header
pub fn location_id(response: &TestResponse) -> String {
    let location = response.header(header::LOCATION);
    location
        .to_str()
        .expect("Location header is not text")
        .trim_start_matches("/projects/")
        .to_string()
}
