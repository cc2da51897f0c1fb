use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use base64::{Engine, engine::general_purpose::STANDARD};
use http_body_util::BodyExt;
use photo_capture_backend::config::AppConfig;
use photo_capture_backend::services::storage::ImageStore;
use photo_capture_backend::{AppState, create_app};
use serde_json::{Value, json};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

const JPEG_PAYLOAD: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

fn test_state(upload_dir: &Path) -> AppState {
    let config = AppConfig {
        port: 0,
        upload_dir: upload_dir.to_path_buf(),
        ..AppConfig::default()
    };
    AppState {
        store: Arc::new(ImageStore::new(upload_dir.to_path_buf())),
        config,
    }
}

fn save_request(payload: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/save_image")
        .header("Content-Type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

async fn body_json(response: axum::response::Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

#[tokio::test]
async fn test_save_then_fetch_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));
    let expected = STANDARD.decode("/9j/4AAQSkZJRg==").unwrap();

    // Ingest
    let response = app
        .clone()
        .oneshot(save_request(json!({ "image": JPEG_PAYLOAD })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let saved = body_json(response).await;
    assert_eq!(saved["success"], json!(true));
    assert_eq!(saved["size"], json!(expected.len()));
    let filename = saved["filename"].as_str().unwrap().to_string();
    assert!(filename.starts_with("photo_"));
    assert!(filename.ends_with(".jpg"));
    assert_eq!(
        saved["folder"].as_str().unwrap(),
        dir.path().display().to_string()
    );

    // Bytes on disk equal the decoded payload
    assert_eq!(std::fs::read(dir.path().join(&filename)).unwrap(), expected);

    // Retrieval returns the same bytes with the right content type
    let response = app
        .clone()
        .oneshot(get_request(&format!("/image/{filename}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()["content-type"].to_str().unwrap(),
        "image/jpeg"
    );
    assert_eq!(body_bytes(response).await, expected);

    // Structured listing sees exactly this image
    let response = app.oneshot(get_request("/api/images")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["success"], json!(true));
    assert_eq!(listing["count"], json!(1));
    assert_eq!(listing["images"][0]["filename"].as_str().unwrap(), filename);
    assert_eq!(
        listing["images"][0]["url"].as_str().unwrap(),
        format!("/image/{filename}")
    );
}

#[tokio::test]
async fn test_save_rejects_missing_image_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let response = app.oneshot(save_request(json!({}))).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("No image data"));
}

#[tokio::test]
async fn test_save_rejects_empty_image_field() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let response = app
        .oneshot(save_request(json!({ "image": "" })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["success"], json!(false));
}

#[tokio::test]
async fn test_save_rejects_malformed_base64() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let response = app
        .oneshot(save_request(
            json!({ "image": "data:image/png;base64,!!!not-base64!!!" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["success"], json!(false));
    assert!(body["message"].as_str().unwrap().contains("base64"));
}

#[tokio::test]
async fn test_api_images_empty_directory() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let response = app.oneshot(get_request("/api/images")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let listing = body_json(response).await;
    assert_eq!(listing["success"], json!(true));
    assert_eq!(listing["count"], json!(0));
    assert_eq!(listing["images"], json!([]));
}

#[tokio::test]
async fn test_api_images_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(&dir.path().join("never_created")));

    let response = app.oneshot(get_request("/api/images")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["count"], json!(0));
}

#[tokio::test]
async fn test_api_images_filters_and_sorts_descending() {
    let dir = tempfile::tempdir().unwrap();
    for name in ["a.png", "b.JPG", "notes.txt"] {
        std::fs::write(dir.path().join(name), b"x").unwrap();
    }
    let app = create_app(test_state(dir.path()));

    let response = app.oneshot(get_request("/api/images")).await.unwrap();
    let listing = body_json(response).await;
    assert_eq!(listing["count"], json!(2));
    let names: Vec<_> = listing["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["filename"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["b.JPG", "a.png"]);
}

#[tokio::test]
async fn test_get_image_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let response = app
        .oneshot(get_request("/image/photo_19990101_000000.jpg"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["success"], json!(false));
}

#[tokio::test]
async fn test_get_image_rejects_traversal() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("secret.jpg"), b"top secret").unwrap();
    let images = dir.path().join("images");
    std::fs::create_dir_all(&images).unwrap();
    let app = create_app(test_state(&images));

    let response = app
        .oneshot(get_request("/image/..%2Fsecret.jpg"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_images_page_matches_structured_listing() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let response = app
        .clone()
        .oneshot(save_request(json!({ "image": JPEG_PAYLOAD })))
        .await
        .unwrap();
    let filename = body_json(response).await["filename"]
        .as_str()
        .unwrap()
        .to_string();

    let response = app.oneshot(get_request("/images")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(
        response.headers()["content-type"]
            .to_str()
            .unwrap()
            .starts_with("text/html")
    );
    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains(&filename));
}

#[tokio::test]
async fn test_same_second_uploads_overwrite() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let mut filenames = Vec::new();
    for _ in 0..2 {
        let response = app
            .clone()
            .oneshot(save_request(json!({ "image": "aGVsbG8=" })))
            .await
            .unwrap();
        filenames.push(
            body_json(response).await["filename"]
                .as_str()
                .unwrap()
                .to_string(),
        );
    }

    // One file per distinct second-precision name, even when both uploads
    // landed in the same second.
    filenames.sort();
    filenames.dedup();
    let response = app.oneshot(get_request("/api/images")).await.unwrap();
    assert_eq!(body_json(response).await["count"], json!(filenames.len()));
}

#[tokio::test]
async fn test_health_reports_storage() {
    let dir = tempfile::tempdir().unwrap();
    let app = create_app(test_state(dir.path()));

    let response = app.oneshot(get_request("/health")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let health = body_json(response).await;
    assert_eq!(health["status"], json!("ok"));
    assert_eq!(health["storage"], json!("available"));
}
