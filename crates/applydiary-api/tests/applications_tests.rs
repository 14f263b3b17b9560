#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{application_body, create_test_app, empty_request, json_request, TestApp};

async fn list(app: &TestApp, token: &str, query: &str) -> Vec<Value> {
    let (status, body) = app
        .send_json(empty_request(
            Method::GET,
            &format!("/applications{}", query),
            Some(token),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    body["data"].as_array().unwrap().clone()
}

fn companies(apps: &[Value]) -> Vec<&str> {
    apps.iter().map(|a| a["company"].as_str().unwrap()).collect()
}

#[tokio::test]
async fn test_create_applies_defaults() {
    let app = create_test_app();
    let (token, user_id) = app.register("ada@example.com").await;

    let (status, body) = app
        .send_json(json_request(
            Method::POST,
            "/applications",
            Some(&token),
            json!({"company": "  Acme ", "role": "Engineer"}),
        ))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let data = &body["data"];
    assert_eq!(data["company"], "Acme");
    assert_eq!(data["userId"], user_id.as_str());
    assert_eq!(data["status"], "Draft");
    assert_eq!(data["location"], "remote");
    assert!(data["appliedDate"].is_string());
    assert!(data["deadline"].is_null());
    assert!(data["deletedAt"].is_null());
}

#[tokio::test]
async fn test_create_rejects_invalid_fields() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;

    let (status, body) = app
        .send_json(json_request(
            Method::POST,
            "/applications",
            Some(&token),
            json!({
                "company": "",
                "status": "Hired",
                "resumeUrl": "not a url",
                "appliedDate": "yesterday"
            }),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Invalid request payload");
    let fields: Vec<&str> = body["issues"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["field"].as_str().unwrap())
        .collect();
    for field in ["company", "role", "status", "appliedDate", "resumeUrl"] {
        assert!(fields.contains(&field), "missing issue for {}", field);
    }
    assert!(list(&app, &token, "").await.is_empty());
}

#[tokio::test]
async fn test_requires_authentication() {
    let app = create_test_app();
    let (status, body) = app
        .send_json(empty_request(Method::GET, "/applications", None))
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Authentication required");
}

#[tokio::test]
async fn test_search_matches_company_or_role() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;
    app.create_application(&token, application_body("ACME Corp", "Engineer"))
        .await;
    app.create_application(&token, application_body("Globex", "Acme liaison"))
        .await;
    app.create_application(&token, application_body("Initech", "Analyst"))
        .await;

    let found = list(&app, &token, "?search=acm").await;
    let mut names = companies(&found);
    names.sort();
    assert_eq!(names, vec!["ACME Corp", "Globex"]);

    assert_eq!(list(&app, &token, "?search=%20%20").await.len(), 3);
}

#[tokio::test]
async fn test_status_filter() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;
    app.create_application(
        &token,
        json!({"company": "Acme", "role": "Engineer", "status": "Online Assessment"}),
    )
    .await;
    app.create_application(&token, application_body("Globex", "Engineer"))
        .await;

    let found = list(&app, &token, "?status=Online%20Assessment").await;
    assert_eq!(companies(&found), vec!["Acme"]);
    assert_eq!(list(&app, &token, "?status=").await.len(), 2);

    let (status, body) = app
        .send_json(empty_request(
            Method::GET,
            "/applications?status=Hired",
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["field"], "status");
}

#[tokio::test]
async fn test_sort_orders() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;
    let rows = [
        ("A", "2026-01-01T00:00:00Z", None),
        ("B", "2026-03-01T00:00:00Z", Some("2026-04-10T00:00:00Z")),
        ("C", "2026-02-01T00:00:00Z", Some("2026-05-10T00:00:00Z")),
    ];
    for (company, applied, deadline) in rows {
        app.create_application(
            &token,
            json!({
                "company": company,
                "role": "Engineer",
                "appliedDate": applied,
                "deadline": deadline
            }),
        )
        .await;
    }

    assert_eq!(companies(&list(&app, &token, "").await), vec!["B", "C", "A"]);
    assert_eq!(
        companies(&list(&app, &token, "?sort=deadline").await),
        vec!["C", "B", "A"]
    );
    assert_eq!(
        companies(&list(&app, &token, "?sort=bogus").await),
        vec!["B", "C", "A"]
    );
}

#[tokio::test]
async fn test_update_patches_and_clears() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;
    let id = app
        .create_application(
            &token,
            json!({
                "company": "Acme",
                "role": "Engineer",
                "source": "LinkedIn",
                "deadline": "2026-05-01T00:00:00Z"
            }),
        )
        .await;

    let (status, body) = app
        .send_json(json_request(
            Method::PUT,
            &format!("/applications/{}", id),
            Some(&token),
            json!({"status": "Interview", "deadline": null}),
        ))
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let data = &body["data"];
    assert_eq!(data["status"], "Interview");
    assert!(data["deadline"].is_null());
    assert_eq!(data["source"], "LinkedIn");
    assert_eq!(data["company"], "Acme");

    let (status, body) = app
        .send_json(json_request(
            Method::PUT,
            &format!("/applications/{}", id),
            Some(&token),
            json!({"location": "moon"}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["field"], "location");
}

#[tokio::test]
async fn test_other_users_applications_are_invisible() {
    let app = create_test_app();
    let (owner, _) = app.register("ada@example.com").await;
    let (intruder, _) = app.register("eve@example.com").await;
    let id = app
        .create_application(&owner, application_body("Acme", "Engineer"))
        .await;

    assert!(list(&app, &intruder, "").await.is_empty());

    let (status, body) = app
        .send_json(json_request(
            Method::PUT,
            &format!("/applications/{}", id),
            Some(&intruder),
            json!({"company": "Hijacked"}),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Application not found");

    let (status, _) = app
        .send_json(empty_request(
            Method::DELETE,
            &format!("/applications/{}", id),
            Some(&intruder),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(companies(&list(&app, &owner, "").await), vec!["Acme"]);
}

#[tokio::test]
async fn test_delete_is_soft_and_final() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;
    let id = app
        .create_application(&token, application_body("Acme", "Engineer"))
        .await;
    let uri = format!("/applications/{}", id);

    let (status, body) = app
        .send_json(empty_request(Method::DELETE, &uri, Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_null());

    let (status, _) = app
        .send_json(empty_request(Method::DELETE, &uri, Some(&token)))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = app
        .send_json(json_request(
            Method::PUT,
            &uri,
            Some(&token),
            json!({"company": "Back"}),
        ))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(list(&app, &token, "").await.is_empty());
}

#[tokio::test]
async fn test_malformed_id_is_bad_request() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;
    let (status, body) = app
        .send_json(empty_request(
            Method::DELETE,
            "/applications/not-a-uuid",
            Some(&token),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["field"], "path");
}

#[tokio::test]
async fn test_null_on_required_fields_is_rejected() {
    let app = create_test_app();
    let (token, _) = app.register("ada@example.com").await;

    let (status, body) = app
        .send_json(json_request(
            Method::POST,
            "/applications",
            Some(&token),
            json!({"company": "Acme", "role": "Engineer", "status": null}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["field"], "status");
    assert!(list(&app, &token, "").await.is_empty());

    let id = app
        .create_application(&token, application_body("Acme", "Engineer"))
        .await;
    let (status, body) = app
        .send_json(json_request(
            Method::PUT,
            &format!("/applications/{}", id),
            Some(&token),
            json!({"company": null}),
        ))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["issues"][0]["field"], "company");
    assert_eq!(companies(&list(&app, &token, "").await), vec!["Acme"]);
}
