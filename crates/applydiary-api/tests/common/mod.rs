//! Shared fixtures for HTTP-level tests.
//!
//! Every test gets its own in-memory store, temp upload directory and mock
//! generation backend, so tests never touch a database or the network.

#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use serde_json::{json, Value};
use tempfile::TempDir;
use tower::ServiceExt;

use applydiary_api::{build_router, AppState, Backends, ServerConfig};
use applydiary_core::GenerationBackend;
use applydiary_crypto::{HashParams, TokenConfig};
use applydiary_db::{FilesystemBackend, MemoryStore};
use applydiary_inference::MockGenerationBackend;

pub const TEST_SECRET: &str = "integration-test-secret";
pub const PASSWORD: &str = "abcdefgh";

pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub generator: MockGenerationBackend,
    pub config: ServerConfig,
    pub upload_dir: TempDir,
}

pub fn test_config(upload_dir: &TempDir) -> ServerConfig {
    ServerConfig {
        token: TokenConfig::with_secret(TEST_SECRET),
        upload_dir: upload_dir.path().to_path_buf(),
        hash_params: HashParams::insecure_fast(),
        ..ServerConfig::default()
    }
}

pub fn create_test_app() -> TestApp {
    create_test_app_with(MockGenerationBackend::new(), |_| {})
}

/// Build an app with a custom generator and config overrides.
pub fn create_test_app_with(
    generator: MockGenerationBackend,
    configure: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    build(Some(generator), configure)
}

/// Build an app with no generation backend configured.
pub fn create_test_app_without_generator() -> TestApp {
    build(None, |_| {})
}

fn build(
    generator: Option<MockGenerationBackend>,
    configure: impl FnOnce(&mut ServerConfig),
) -> TestApp {
    let upload_dir = tempfile::tempdir().unwrap();
    let mut config = test_config(&upload_dir);
    configure(&mut config);

    let store = MemoryStore::new();
    let mock = generator.clone().unwrap_or_default();
    let backend: Option<Arc<dyn GenerationBackend>> = generator
        .map(|g| Arc::new(g) as Arc<dyn GenerationBackend>);

    let state = AppState::new(
        &config,
        Backends {
            repos: store.repositories(),
            blobs: Arc::new(FilesystemBackend::new(upload_dir.path())),
            generator: backend,
        },
    )
    .unwrap();

    TestApp {
        router: build_router(state),
        store,
        generator: mock,
        config,
        upload_dir,
    }
}

impl TestApp {
    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Send and decode the JSON body. An empty body decodes as `Null`.
    pub async fn send_json(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.send(request).await;
        let status = response.status();
        (status, body_json(response).await)
    }

    /// Register a user and return `(token, user_id)`.
    pub async fn register(&self, email: &str) -> (String, String) {
        let (status, body) = self
            .send_json(json_request(
                Method::POST,
                "/auth/register",
                None,
                json!({"email": email, "password": PASSWORD, "name": "Ada"}),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Create an application and return its id.
    pub async fn create_application(&self, token: &str, body: Value) -> String {
        let (status, body) = self
            .send_json(json_request(Method::POST, "/applications", Some(token), body))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

pub async fn body_json(response: Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub fn json_request(method: Method, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

pub fn empty_request(method: Method, uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    builder.body(Body::empty()).unwrap()
}

const BOUNDARY: &str = "applydiary-test-boundary";

/// A single-part `multipart/form-data` upload request.
pub fn multipart_request(
    uri: &str,
    token: &str,
    field: &str,
    file_name: &str,
    content_type: &str,
    data: &[u8],
) -> Request<Body> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
    body.extend_from_slice(
        format!(
            "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n",
            field, file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(format!("Content-Type: {}\r\n\r\n", content_type).as_bytes());
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {}", token))
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

/// Minimal valid application body.
pub fn application_body(company: &str, role: &str) -> Value {
    json!({"company": company, "role": role})
}
