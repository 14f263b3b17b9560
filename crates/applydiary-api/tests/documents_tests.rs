#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use serde_json::Value;

use applydiary_inference::MockGenerationBackend;
use common::{
    create_test_app, create_test_app_with, empty_request, json_request, multipart_request,
    TestApp,
};

async fn upload(app: &TestApp, token: &str, name: &str, data: &[u8]) -> Value {
    let (status, body) = app
        .send_json(multipart_request(
            "/documents",
            token,
            "file",
            name,
            "text/plain",
            data,
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", body);
    body["data"].clone()
}

#[tokio::test]
async fn test_upload_list_and_download() {
    let app = create_test_app();
    let (token, user_id) = app.register("ada@example.com").await;

    let doc = upload(&app, &token, "cover letter.txt", b"Dear hiring manager").await;
    assert_eq!(doc["fileName"], "cover letter.txt");
    assert_eq!(doc["fileType"], "text/plain");
    assert_eq!(doc["fileSize"], 19);
    assert_eq!(doc["userId"], user_id.as_str());
    let url = doc["url"].as_str().unwrap();
    assert!(url.starts_with("/uploads/") && url.ends_with(".txt"), "{}", url);

    let (status, body) = app
        .send_json(empty_request(Method::GET, "/documents", Some(&token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);

    let response = app
        .send(empty_request(
            Method::GET,
            &format!("/documents/{}/download", doc["id"].as_str().unwrap()),
            Some(&token),
        ))
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[header::CONTENT_TYPE], "text/plain");
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"cover letter.txt\""
    );
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert_eq!(&bytes[..], b"Dear hiring manager");
}

#[tokio::test]
async fn test_path_components_are_stripped() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;
    let doc = upload(&app, &token, "../../etc/passwd", b"x").await;
    assert_eq!(doc["fileName"], "passwd");
    assert_eq!(std::fs::read_dir(app.upload_dir.path()).unwrap().count(), 1);
}

#[tokio::test]
async fn test_missing_file_part() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;

    let (status, body) = app
        .send_json(multipart_request(
            "/documents",
            &token,
            "attachment",
            "cv.txt",
            "text/plain",
            b"cv",
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "File is required");
}

#[tokio::test]
async fn test_non_multipart_body() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;

    let (status, body) = app
        .send_json(json_request(
            Method::POST,
            "/documents",
            Some(&token),
            serde_json::json!({"file": "cv"}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "File is required");
}

#[tokio::test]
async fn test_oversized_upload() {
    let app = create_test_app_with(MockGenerationBackend::new(), |config| {
        config.max_upload_bytes = 16;
    });
    let (token, _) = app.register("ada@example.com").await;

    let (status, body) = app
        .send_json(multipart_request(
            "/documents",
            &token,
            "file",
            "big.txt",
            "text/plain",
            &[b'a'; 17],
        ))
        .await;
    assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
    assert!(body["message"].as_str().unwrap().contains("16 bytes"));
    assert_eq!(std::fs::read_dir(app.upload_dir.path()).unwrap().count(), 0);

    upload(&app, &token, "fits.txt", &[b'a'; 16]).await;
}

#[tokio::test]
async fn test_upload_requires_authentication() {
    let app = create_test_app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/documents")
        .header(header::CONTENT_TYPE, "multipart/form-data; boundary=x")
        .body(Body::from("--x--\r\n"))
        .unwrap();
    let (status, _) = app.send_json(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_delete_hides_document() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;
    let doc = upload(&app, &token, "cv.txt", b"cv").await;
    let id = doc["id"].as_str().unwrap();

    let (status, _) = app
        .send_json(empty_request(
            Method::DELETE,
            &format!("/documents/{}", id),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = app
        .send_json(empty_request(
            Method::GET,
            &format!("/documents/{}/download", id),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Document not found");

    let (status, _) = app
        .send_json(empty_request(
            Method::DELETE,
            &format!("/documents/{}", id),
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app
        .send_json(empty_request(Method::GET, "/documents", Some(&token)))
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn test_other_users_documents_are_invisible() {
    let app = create_test_app();
    let (owner, _) = app.register("ada@example.com").await;
    let (intruder, _) = app.register("eve@example.com").await;
    let doc = upload(&app, &owner, "cv.txt", b"cv").await;
    let id = doc["id"].as_str().unwrap();

    let (_, body) = app
        .send_json(empty_request(Method::GET, "/documents", Some(&intruder)))
        .await;
    assert!(body["data"].as_array().unwrap().is_empty());

    for request in [
        empty_request(Method::GET, &format!("/documents/{}/download", id), Some(&intruder)),
        empty_request(Method::DELETE, &format!("/documents/{}", id), Some(&intruder)),
    ] {
        let (status, body) = app.send_json(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Document not found");
    }
}

#[tokio::test]
async fn test_unbounded_upload_limit_builds_router() {
    let app = create_test_app_with(MockGenerationBackend::new(), |config| {
        config.max_upload_bytes = usize::MAX;
    });
    let (token, _) = app.register("ada@example.com").await;
    upload(&app, &token, "cv.txt", b"cv").await;
}
