//! The documents REST API end to end, through the axum router.

mod common;

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::harness;
use method_workflow::adapters::http::{api_router, AuthState, DocumentsAppState};
use method_workflow::adapters::StaticTokenValidator;

fn app() -> Router {
    let h = harness();
    let validator = StaticTokenValidator::new()
        .with_actor("alice-token", "alice")
        .and_then(|v| v.with_actor("rita-token", "rita"))
        .and_then(|v| v.with_actor("ravi-token", "ravi"))
        .and_then(|v| v.with_actor("root-token", "root"))
        .unwrap();
    let auth: AuthState = Arc::new(validator);
    api_router(DocumentsAppState::new(h.engine, h.revisions), auth)
}

async fn call(app: &Router, method: Method, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), 1 << 20).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create(app: &Router, title: &str) -> String {
    let (status, json) = call(
        app,
        Method::POST,
        "/api/documents",
        Some("alice-token"),
        Some(json!({"title": title, "body": "Procedure"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    json["data"]["id"].as_str().unwrap().to_string()
}

async fn approve_all(app: &Router, id: &str) {
    let (status, _) = call(
        app,
        Method::POST,
        &format!("/api/documents/{}/submit", id),
        Some("alice-token"),
        Some(json!({"change_class": "minor"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    for token in ["rita-token", "ravi-token"] {
        let (status, _) = call(
            app,
            Method::POST,
            &format!("/api/documents/{}/approve", id),
            Some(token),
            Some(json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }
}

#[tokio::test]
async fn full_lifecycle_over_http() {
    let app = app();
    let id = create(&app, "Salt Spray Test").await;
    approve_all(&app, &id).await;

    let (status, json) = call(
        &app,
        Method::POST,
        &format!("/api/documents/{}/publish", id),
        Some("root-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["data"]["status"], "published");
    assert_eq!(json["data"]["version"], "0.1");
    assert_eq!(json["data"]["approval_count"], 2);

    let (status, json) = call(
        &app,
        Method::POST,
        &format!("/api/documents/{}/revisions", id),
        Some("alice-token"),
        Some(json!({"change_class": "major"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let revision_id = json["data"]["id"].as_str().unwrap().to_string();

    approve_all(&app, &revision_id).await;
    let (status, json) = call(
        &app,
        Method::POST,
        &format!("/api/documents/{}/publish-revision", revision_id),
        Some("root-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["parent"]["id"], id.as_str());
    assert_eq!(json["data"]["revision"]["workflow_status"], "archived");

    let (status, json) = call(&app, Method::GET, &format!("/api/documents/{}", id), Some("rita-token"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["version_number"], "1.0");
}

#[tokio::test]
async fn refusals_map_to_statuses() {
    let app = app();
    let id = create(&app, "Tensile Test").await;

    // Reviewer cannot edit someone else's document.
    let (status, json) = call(
        &app,
        Method::PUT,
        &format!("/api/documents/{}", id),
        Some("rita-token"),
        Some(json!({"body": "changed"})),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(json["error"], "not_authorized");

    // A draft is not under review.
    let (status, json) = call(
        &app,
        Method::POST,
        &format!("/api/documents/{}/approve", id),
        Some("rita-token"),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "invalid_state");

    let (status, _) = call(
        &app,
        Method::POST,
        &format!("/api/documents/{}/submit", id),
        Some("alice-token"),
        Some(json!({"change_class": "minor"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = call(
        &app,
        Method::POST,
        &format!("/api/documents/{}/reject", id),
        Some("rita-token"),
        Some(json!({"comment": ""})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "missing_comment");

    let (status, json) = call(
        &app,
        Method::POST,
        &format!("/api/documents/{}/publish", id),
        Some("root-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "insufficient_approvals");

    let (status, json) = call(
        &app,
        Method::GET,
        &format!("/api/documents/{}", uuid::Uuid::new_v4()),
        Some("rita-token"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"], "not_found");

    let (status, json) = call(&app, Method::GET, "/api/documents/not-a-uuid", Some("rita-token"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"], "validation");
}

#[tokio::test]
async fn second_revision_conflicts() {
    let app = app();
    let id = create(&app, "Bend Test").await;
    approve_all(&app, &id).await;
    call(&app, Method::POST, &format!("/api/documents/{}/publish", id), Some("root-token"), None).await;

    let uri = format!("/api/documents/{}/revisions", id);
    let (status, _) = call(&app, Method::POST, &uri, Some("alice-token"), Some(json!({"change_class": "minor"}))).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, json) = call(&app, Method::POST, &uri, Some("rita-token"), Some(json!({"change_class": "minor"}))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(json["error"], "revision_exists");
}

#[tokio::test]
async fn requests_without_valid_token_are_unauthorized() {
    let app = app();
    let (status, _) = call(&app, Method::POST, "/api/documents", None, Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = call(&app, Method::POST, "/api/documents", Some("forged"), Some(json!({"title": "x"}))).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
