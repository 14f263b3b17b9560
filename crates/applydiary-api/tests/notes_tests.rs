#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::{Method, StatusCode};
use serde_json::json;

use common::{application_body, create_test_app, empty_request, json_request, TestApp};

struct Ctx {
    app: TestApp,
    token: String,
    app_id: String,
}

async fn setup() -> Ctx {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;
    let app_id = app
        .create_application(&token, application_body("Acme", "Engineer"))
        .await;
    Ctx { app, token, app_id }
}

impl Ctx {
    fn notes_uri(&self) -> String {
        format!("/applications/{}/notes", self.app_id)
    }

    async fn add_note(&self, content: &str) -> String {
        let (status, body) = self
            .app
            .send_json(json_request(
                Method::POST,
                &self.notes_uri(),
                Some(&self.token),
                json!({"content": content}),
            ))
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
        body["data"]["id"].as_str().unwrap().to_string()
    }
}

#[tokio::test]
async fn test_note_lifecycle() {
    let ctx = setup().await;
    ctx.add_note("Phone screen booked").await;
    let id = ctx.add_note("  Sent thank-you  ").await;

    let (status, body) = ctx
        .app
        .send_json(empty_request(Method::GET, &ctx.notes_uri(), Some(&ctx.token)))
        .await;
    assert_eq!(status, StatusCode::OK);
    let notes = body["data"].as_array().unwrap();
    assert_eq!(notes.len(), 2);
    assert_eq!(notes[0]["content"], "Sent thank-you");
    assert_eq!(notes[0]["applicationId"], ctx.app_id.as_str());

    let note_uri = format!("{}/{}", ctx.notes_uri(), id);
    let (status, body) = ctx
        .app
        .send_json(json_request(
            Method::PUT,
            &note_uri,
            Some(&ctx.token),
            json!({"content": "Sent thank-you email"}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["content"], "Sent thank-you email");

    let (status, _) = ctx
        .app
        .send_json(empty_request(Method::DELETE, &note_uri, Some(&ctx.token)))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = ctx
        .app
        .send_json(empty_request(Method::DELETE, &note_uri, Some(&ctx.token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not found");

    let (_, body) = ctx
        .app
        .send_json(empty_request(Method::GET, &ctx.notes_uri(), Some(&ctx.token)))
        .await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_blank_content_is_rejected() {
    let ctx = setup().await;
    let (status, body) = ctx
        .app
        .send_json(json_request(
            Method::POST,
            &ctx.notes_uri(),
            Some(&ctx.token),
            json!({"content": "   "}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["field"], "content");
}

#[tokio::test]
async fn test_foreign_parent_reports_application_not_found() {
    let ctx = setup().await;
    let (intruder, _) = ctx.app.register("eve@example.com").await;

    for request in [
        empty_request(Method::GET, &ctx.notes_uri(), Some(&intruder)),
        json_request(
            Method::POST,
            &ctx.notes_uri(),
            Some(&intruder),
            json!({"content": "hi"}),
        ),
    ] {
        let (status, body) = ctx.app.send_json(request).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Application not found");
    }
}

#[tokio::test]
async fn test_foreign_note_reports_note_not_found() {
    let ctx = setup().await;
    let note_id = ctx.add_note("private").await;
    let (intruder, _) = ctx.app.register("eve@example.com").await;
    let note_uri = format!("{}/{}", ctx.notes_uri(), note_id);

    let (status, body) = ctx
        .app
        .send_json(json_request(
            Method::PUT,
            &note_uri,
            Some(&intruder),
            json!({"content": "defaced"}),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not found");

    let (status, _) = ctx
        .app
        .send_json(empty_request(Method::DELETE, &note_uri, Some(&intruder)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_note_addressed_through_wrong_application() {
    let ctx = setup().await;
    let note_id = ctx.add_note("hi").await;
    let other_app = ctx
        .app
        .create_application(&ctx.token, application_body("Globex", "Analyst"))
        .await;

    let (status, body) = ctx
        .app
        .send_json(json_request(
            Method::PUT,
            &format!("/applications/{}/notes/{}", other_app, note_id),
            Some(&ctx.token),
            json!({"content": "moved"}),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Note not found");
}

#[tokio::test]
async fn test_deleted_parent_hides_notes() {
    let ctx = setup().await;
    ctx.add_note("hi").await;

    let (status, _) = ctx
        .app
        .send_json(empty_request(
            Method::DELETE,
            &format!("/applications/{}", ctx.app_id),
            Some(&ctx.token),
        ))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = ctx
        .app
        .send_json(empty_request(Method::GET, &ctx.notes_uri(), Some(&ctx.token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Application not found");
    assert_eq!(ctx.app.store.stored_note_count().await, 1);
}
