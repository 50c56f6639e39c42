mod common;

use common::create_test_store;

use googletest::prelude::*;
use serde_json::{json, Map, Value};
use showcase::project::{ProjectDraft, ProjectView, Projection, StoreError, ValidationError};

fn draft(title: &str) -> ProjectDraft {
    let fields: Map<String, Value> = match json!({
        "title": title,
        "description": "Turns commits into release notes",
        "code": "https://example.com/notes/code",
        "demo": "https://example.com/notes",
        "tech": ["rust", "git"],
    }) {
        Value::Object(map) => map,
        _ => unreachable!(),
    };
    ProjectDraft::from_fields(&fields, Some(b"preview".to_vec())).unwrap()
}

#[tokio::test]
async fn given_valid_draft_when_created_then_can_be_found_by_id() {
    // Given: An empty store
    let store = create_test_store().await;

    // When: Creating a project
    let created = store.create(draft("Release Notes")).await.unwrap();

    // Then: Finding by id returns the same record
    let found = store.find_by_id(&created.id.to_string()).await.unwrap();
    assert_that!(found, some(anything()));
    let found = found.unwrap();
    assert_that!(found, eq(&created));
    assert_that!(found.tech, eq(&vec!["rust".to_string(), "git".to_string()]));
}

#[tokio::test]
async fn given_created_projects_when_created_then_ids_are_unique() {
    let store = create_test_store().await;

    let first = store.create(draft("One")).await.unwrap();
    let second = store.create(draft("Two")).await.unwrap();

    assert_that!(first.id, not(eq(second.id)));
    assert_that!(store.count().await.unwrap(), eq(2));
}

#[tokio::test]
async fn given_draft_without_preview_when_created_then_returns_validation_error() {
    let store = create_test_store().await;
    let mut incomplete = draft("No Preview");
    incomplete.preview = None;

    let result = store.create(incomplete).await;

    assert!(matches!(
        result,
        Err(StoreError::Validation(ValidationError::Required("preview")))
    ));
    assert_that!(store.count().await.unwrap(), eq(0));
}

#[tokio::test]
async fn given_empty_store_when_finding_unknown_id_then_returns_none() {
    let store = create_test_store().await;

    let result = store
        .find_by_id("0b8f7c84-5c6e-4c3a-8d55-3f2b9a1e7d60")
        .await
        .unwrap();

    assert_that!(result, none());
}

#[tokio::test]
async fn given_malformed_id_when_finding_then_returns_malformed_id_error() {
    let store = create_test_store().await;

    let result = store.find_by_id("42").await;

    assert!(matches!(result, Err(StoreError::MalformedId(id)) if id == "42"));
}

#[tokio::test]
async fn given_projects_when_finding_all_then_full_records_in_insertion_order() {
    let store = create_test_store().await;
    let first = store.create(draft("Alpha")).await.unwrap();
    let second = store.create(draft("Beta")).await.unwrap();

    let projects = store.find_all(Projection::Full).await.unwrap();

    assert_that!(projects, len(eq(2)));
    assert_that!(projects[0], eq(&ProjectView::Full(first)));
    assert_that!(projects[1], eq(&ProjectView::Full(second)));
}

#[tokio::test]
async fn given_projects_when_finding_titles_then_only_id_and_title_are_read() {
    let store = create_test_store().await;
    let created = store.create(draft("Gamma")).await.unwrap();

    let projects = store.find_all(Projection::TitleOnly).await.unwrap();

    assert_that!(projects, len(eq(1)));
    match &projects[0] {
        ProjectView::TitleOnly(title) => {
            assert_that!(title.id, eq(created.id));
            assert_that!(title.title, eq("Gamma"));
        }
        other => panic!("expected a title-only view, got {:?}", other),
    }
}

#[tokio::test]
async fn given_existing_project_when_saved_then_changes_persist() {
    // Given: A stored project
    let store = create_test_store().await;
    let mut project = store.create(draft("Before")).await.unwrap();

    // When: Mutating it in memory and saving
    project.apply_field("title", &json!("After")).unwrap();
    project.preview = b"new preview".to_vec();
    store.save(&project).await.unwrap();

    // Then: The stored record reflects the change and no row was added
    let found = store.find_by_id(&project.id.to_string()).await.unwrap().unwrap();
    assert_that!(found.title, eq("After"));
    assert_that!(found.preview, eq(&b"new preview".to_vec()));
    assert_that!(store.count().await.unwrap(), eq(1));
}

#[tokio::test]
async fn given_invalid_mutation_when_saved_then_store_keeps_previous_values() {
    let store = create_test_store().await;
    let mut project = store.create(draft("Stable")).await.unwrap();

    project.description = String::new();
    let result = store.save(&project).await;

    assert!(matches!(
        result,
        Err(StoreError::Validation(ValidationError::Required("description")))
    ));
    let found = store.find_by_id(&project.id.to_string()).await.unwrap().unwrap();
    assert_that!(found.description, eq("Turns commits into release notes"));
}

#[tokio::test]
async fn given_schema_exists_when_initialized_again_then_data_survives() {
    let store = create_test_store().await;
    store.create(draft("Survivor")).await.unwrap();

    store.init_schema().await.unwrap();

    assert_that!(store.count().await.unwrap(), eq(1));
}
