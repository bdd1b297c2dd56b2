//! Integration tests for the hosted record shape: multipart upload, lookup,
//! partial update and the two-phase delete.

mod helpers;

use axum::http::StatusCode;
use axum_test::multipart::{MultipartForm, Part};
use helpers::{
    setup_hosted_app, setup_hosted_app_with_limit, setup_hosted_app_with_rejecting_store,
    setup_local_media_app, TestApp, TEST_FOLDER,
};
use serde_json::{json, Value};

const PNG_BYTES: &[u8] = b"\x89PNG\r\n\x1a\nnot really a png";

fn image_form(filename: &str, data: &[u8]) -> MultipartForm {
    MultipartForm::new().add_part(
        "file",
        Part::bytes(data.to_vec())
            .file_name(filename)
            .mime_type("image/png"),
    )
}

async fn upload(app: &TestApp, filename: &str) -> String {
    let response = app
        .client()
        .post("/")
        .multipart(image_form(filename, PNG_BYTES))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    body["id"].as_str().expect("id in response").to_string()
}

#[tokio::test]
async fn test_upload_then_get_returns_hosted_record() {
    let app = setup_hosted_app();

    let response = app
        .client()
        .post("/")
        .multipart(image_form("cat.png", PNG_BYTES))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);

    let body: Value = response.json();
    assert_eq!(
        body["message"],
        "File uploaded and saved to database successfully"
    );
    let id = body["id"].as_str().unwrap().to_string();
    assert_eq!(id.len(), 24);

    let response = app.client().get(&format!("/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let record: Value = response.json();
    assert_eq!(record["id"], id.as_str());
    assert_eq!(record["name"], "cat.png");
    assert_eq!(record["image"]["publicId"], format!("{}/fake-0", TEST_FOLDER));
    assert_eq!(
        record["image"]["url"],
        format!("https://media.test/{}/fake-0", TEST_FOLDER)
    );

    assert_eq!(
        app.media_host.uploads(),
        vec![("cat.png".to_string(), PNG_BYTES.len())]
    );
}

#[tokio::test]
async fn test_upload_uses_basename_of_client_filename() {
    let app = setup_hosted_app();
    let id = upload(&app, "../../photos/dog.png").await;

    let record: Value = app.client().get(&format!("/{}", id)).await.json();
    assert_eq!(record["name"], "dog.png");
}

#[tokio::test]
async fn test_list_returns_uploads_in_insertion_order() {
    let app = setup_hosted_app();
    let first = upload(&app, "one.png").await;
    let second = upload(&app, "two.png").await;

    let response = app.client().get("/").await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let records: Vec<Value> = response.json();
    let ids: Vec<&str> = records.iter().filter_map(|r| r["id"].as_str()).collect();
    assert_eq!(ids, vec![first.as_str(), second.as_str()]);
}

#[tokio::test]
async fn test_upload_without_file_field_is_bad_request() {
    let app = setup_hosted_app();

    let response = app
        .client()
        .post("/")
        .multipart(MultipartForm::new().add_text("name", "cat"))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let body: Value = response.json();
    assert_eq!(body["error"], "No file uploaded");
    assert!(app.media_host.uploads().is_empty());
}

#[tokio::test]
async fn test_upload_of_empty_file_is_bad_request() {
    let app = setup_hosted_app();

    let response = app
        .client()
        .post("/")
        .multipart(image_form("empty.png", b""))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
    assert!(app.media_host.uploads().is_empty());
}

#[tokio::test]
async fn test_upload_over_size_limit_is_rejected() {
    let app = setup_hosted_app_with_limit(16);

    let response = app
        .client()
        .post("/")
        .multipart(image_form("big.png", &[7u8; 64]))
        .await;
    assert_eq!(response.status_code(), StatusCode::PAYLOAD_TOO_LARGE);
    assert_eq!(
        response.json::<Value>()["error"],
        "File size of 64 bytes exceeds maximum allowed size of 16 bytes"
    );
    assert!(app.media_host.uploads().is_empty());
}

#[tokio::test]
async fn test_failed_media_upload_stores_nothing() {
    let app = setup_hosted_app();
    app.media_host.fail_uploads();

    let response = app
        .client()
        .post("/")
        .multipart(image_form("cat.png", PNG_BYTES))
        .await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(app.store.list_all().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_rejected_insert_removes_uploaded_object() {
    let app = setup_hosted_app_with_rejecting_store();

    let response = app
        .client()
        .post("/")
        .multipart(image_form("cat.png", PNG_BYTES))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let public_id = format!("{}/fake-0", TEST_FOLDER);
    assert!(app.media_host.wait_for_delete(&public_id).await);
}

#[tokio::test]
async fn test_get_unknown_id_is_not_found() {
    let app = setup_hosted_app();

    let response = app.client().get("/000000000000000000000000").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let body: Value = response.json();
    assert_eq!(body["error"], "Failed to find an image: ID 000000000000000000000000");

    let response = app.client().get("/nonexistent-id").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_removes_object_then_record() {
    let app = setup_hosted_app();
    let id = upload(&app, "cat.png").await;

    let response = app.client().delete(&format!("/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);

    let body: Value = response.json();
    assert_eq!(body["message"], format!("Removed an image: ID {}", id));
    assert_eq!(
        app.media_host.deletes(),
        vec![format!("{}/fake-0", TEST_FOLDER)]
    );

    let response = app.client().get(&format!("/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_failed_media_delete_keeps_record() {
    let app = setup_hosted_app();
    let id = upload(&app, "cat.png").await;
    app.media_host.fail_deletes();

    let response = app.client().delete(&format!("/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::INTERNAL_SERVER_ERROR);

    let response = app.client().get(&format!("/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::OK);
}

#[tokio::test]
async fn test_delete_unknown_or_malformed_id() {
    let app = setup_hosted_app();

    let response = app.client().delete("/000000000000000000000000").await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app.client().delete("/not-an-id").await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    assert!(app.media_host.deletes().is_empty());
}

#[tokio::test]
async fn test_update_outcomes() {
    let app = setup_hosted_app();
    let id = upload(&app, "cat.png").await;
    let path = format!("/{}", id);

    let response = app.client().put(&path).json(&json!({})).await;
    assert_eq!(response.status_code(), StatusCode::NOT_MODIFIED);

    let response = app
        .client()
        .put(&path)
        .json(&json!({ "name": "renamed.png" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);
    let body: Value = response.json();
    assert_eq!(body["message"], format!("Updated an image: ID {}.", id));

    let response = app
        .client()
        .put(&path)
        .json(&json!({ "name": "renamed.png" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_MODIFIED);

    let response = app
        .client()
        .put(&path)
        .json(&json!({ "image.url": "https://media.test/elsewhere.png" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::OK);

    let record: Value = app.client().get(&path).await.json();
    assert_eq!(record["name"], "renamed.png");
    assert_eq!(record["image"]["url"], "https://media.test/elsewhere.png");
    assert_eq!(record["image"]["publicId"], format!("{}/fake-0", TEST_FOLDER));
}

#[tokio::test]
async fn test_update_rejects_fields_outside_schema() {
    let app = setup_hosted_app();
    let id = upload(&app, "cat.png").await;
    let path = format!("/{}", id);

    let response = app
        .client()
        .put(&path)
        .json(&json!({ "owner": "someone" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app.client().put(&path).json(&json!({ "name": 42 })).await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let record: Value = app.client().get(&path).await.json();
    assert_eq!(record["name"], "cat.png");
}

#[tokio::test]
async fn test_update_cannot_repoint_media_object() {
    let app = setup_hosted_app();
    let a = upload(&app, "a.png").await;
    let b = upload(&app, "b.png").await;
    let b_public_id = format!("{}/fake-1", TEST_FOLDER);

    let response = app
        .client()
        .put(&format!("/{}", a))
        .json(&json!({ "image.publicId": b_public_id }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app
        .client()
        .put(&format!("/{}", a))
        .json(&json!({ "image": { "publicId": b_public_id, "url": "https://media.test/b" } }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

    let response = app.client().delete(&format!("/{}", a)).await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    assert_eq!(
        app.media_host.deletes(),
        vec![format!("{}/fake-0", TEST_FOLDER)]
    );

    let record: Value = app.client().get(&format!("/{}", b)).await.json();
    assert_eq!(record["image"]["publicId"], b_public_id.as_str());
}

#[tokio::test]
async fn test_update_with_overlapping_paths_is_bad_request() {
    let app = setup_hosted_app();
    let id = upload(&app, "cat.png").await;

    let response = app
        .client()
        .put(&format!("/{}", id))
        .json(&json!({
            "image": { "publicId": format!("{}/fake-0", TEST_FOLDER), "url": "https://media.test/x" },
            "image.url": "https://media.test/y",
        }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_update_unknown_and_malformed_ids() {
    let app = setup_hosted_app();

    let response = app
        .client()
        .put("/000000000000000000000000")
        .json(&json!({ "name": "x" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::NOT_FOUND);

    let response = app
        .client()
        .put("/not-an-id")
        .json(&json!({ "name": "x" }))
        .await;
    assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_local_media_host_serves_uploaded_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let server = setup_local_media_app(dir.path()).await;

    let response = server
        .post("/")
        .multipart(image_form("cat.png", PNG_BYTES))
        .await;
    assert_eq!(response.status_code(), StatusCode::CREATED);
    let id = response.json::<Value>()["id"].as_str().unwrap().to_string();

    let record: Value = server.get(&format!("/{}", id)).await.json();
    let public_id = record["image"]["publicId"].as_str().unwrap().to_string();
    assert!(public_id.starts_with(TEST_FOLDER));
    assert_eq!(
        record["image"]["url"],
        format!("http://localhost/media/{}", public_id)
    );

    let served = server.get(&format!("/media/{}", public_id)).await;
    assert_eq!(served.status_code(), StatusCode::OK);
    assert_eq!(served.as_bytes().as_ref(), PNG_BYTES);

    let response = server.delete(&format!("/{}", id)).await;
    assert_eq!(response.status_code(), StatusCode::ACCEPTED);
    assert!(!dir.path().join(&public_id).exists());
}
