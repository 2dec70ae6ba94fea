//! End-to-end HTTP API tests.
//!
//! Drives the full router over `tower::ServiceExt::oneshot` against the
//! in-memory store and the recording email provider, asserting status
//! codes, machine-readable error codes, and response bodies.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]

use axum::Router;
use axum::body::Body;
use axum::http::{Method, Request, StatusCode, header};
use ecotrack::providers::RecordingEmailProvider;
use ecotrack::stores::MemoryStore;
use ecotrack::{AppState, build_router};
use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;

const API_TOKEN: &str = "test-token";

fn test_app() -> (Router, Arc<RecordingEmailProvider>) {
    let store = Arc::new(MemoryStore::new());
    let mailer = Arc::new(RecordingEmailProvider::new());
    let state = AppState::new(store.clone(), store, mailer.clone(), API_TOKEN);
    (build_router(state), mailer)
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {API_TOKEN}"));
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_user(app: &Router, user_id: &str) {
    let (status, _) = send(
        app,
        Method::POST,
        "/user/create",
        Some(json!({ "user_id": user_id, "diet": "omnivore" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
}

async fn create_event(app: &Router, max_attendees: i64) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/event/create",
        Some(json!({
            "title": "Tree Planting Day",
            "description": "Plant native trees in the city park",
            "date": "2026-10-03",
            "time": "09:30",
            "address": "City Park, Gate 2",
            "host_user_id": "host",
            "category": "environment",
            "max_attendees": max_attendees,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    body["event"]["event_id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn health_is_open_and_api_requires_token() {
    let (app, _) = test_app();

    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // No token
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/event/get-events")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Wrong token
    let response = app
        .oneshot(
            Request::builder()
                .method(Method::GET)
                .uri("/event/get-events")
                .header(header::AUTHORIZATION, "Bearer wrong-token")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn user_creation_and_duplicate_conflict() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/create",
        Some(json!({
            "user_id": "auth0|alice",
            "diet": "vegetarian",
            "transport": "bicycle",
            "recycling": ["paper", "glass"],
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["user"]["user_id"], "auth0|alice");
    assert_eq!(body["user"]["recycling"], json!(["paper", "glass"]));
    // Never settable on create
    assert_eq!(body["user"]["carbon_emission"], Value::Null);

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/create",
        Some(json!({ "user_id": "auth0|alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "USER_ALREADY_EXISTS");

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/get",
        Some(json!({ "user_id": "auth0|alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["diet"], "vegetarian");
    assert_eq!(body["user"]["transport"], "bicycle");
}

#[tokio::test]
async fn missing_user_yields_machine_readable_not_found() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/get",
        Some(json!({ "user_id": "nobody" })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "USER_NOT_FOUND");
}

#[tokio::test]
async fn empty_user_id_is_rejected() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/user/create",
        Some(json!({ "user_id": "  " })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn registration_flow_issues_ticket_and_sends_email() {
    let (app, mailer) = test_app();
    let event_id = create_event(&app, 10).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/event/register",
        Some(json!({
            "event_id": event_id,
            "user_id": "auth0|alice",
            "email": "alice@example.com",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let ticket_number = body["ticket_number"].as_str().unwrap();
    assert!(ticket_number.starts_with("TKT_"));

    // Delivery happens on a background task after the commit
    let mut sent = Vec::new();
    for _ in 0..50 {
        sent = mailer.sent().unwrap();
        if !sent.is_empty() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "alice@example.com");
    assert!(sent[0].subject.contains("Tree Planting Day"));
    assert!(sent[0].html.contains(ticket_number));
    // PNG magic bytes on the QR attachment
    assert_eq!(&sent[0].qr_png[..4], b"\x89PNG");

    let (status, body) = send(&app, Method::GET, "/event/get-events", None).await;
    assert_eq!(status, StatusCode::OK);
    let events = body["events"].as_array().unwrap();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0]["registrations"][0]["ticket_number"], ticket_number);
}

#[tokio::test]
async fn full_event_rejects_further_registrations() {
    let (app, _) = test_app();
    let event_id = create_event(&app, 1).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/event/register",
        Some(json!({
            "event_id": event_id,
            "user_id": "alice",
            "email": "alice@example.com",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/event/register",
        Some(json!({
            "event_id": event_id,
            "user_id": "bob",
            "email": "bob@example.com",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "EVENT_FULL");
}

#[tokio::test]
async fn duplicate_registration_is_a_conflict() {
    let (app, _) = test_app();
    let event_id = create_event(&app, 5).await;

    let register = json!({
        "event_id": event_id,
        "user_id": "alice",
        "email": "alice@example.com",
    });
    let (status, _) = send(&app, Method::POST, "/event/register", Some(register.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, Method::POST, "/event/register", Some(register)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "ALREADY_REGISTERED");
}

#[tokio::test]
async fn invalid_email_is_rejected_before_any_write() {
    let (app, mailer) = test_app();
    let event_id = create_event(&app, 5).await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/event/register",
        Some(json!({
            "event_id": event_id,
            "user_id": "alice",
            "email": "not-an-address",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(mailer.sent().unwrap().is_empty());

    let (_, body) = send(&app, Method::GET, "/event/get-events", None).await;
    assert!(body["events"][0]["registrations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn registering_for_unknown_event_is_not_found() {
    let (app, _) = test_app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/event/register",
        Some(json!({
            "event_id": "EVT_missing",
            "user_id": "alice",
            "email": "alice@example.com",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "EVENT_NOT_FOUND");
}

#[tokio::test]
async fn friend_request_lifecycle_over_http() {
    let (app, _) = test_app();
    create_user(&app, "alice").await;
    create_user(&app, "bob").await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/friends/send-request",
        Some(json!({ "from_user_id": "alice", "to_user_id": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/friends/list",
        Some(json!({ "user_id": "bob" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["requests_received"], json!(["alice"]));
    assert_eq!(body["friends"], json!([]));

    let (status, _) = send(
        &app,
        Method::POST,
        "/friends/accept-request",
        Some(json!({ "accepting_user_id": "bob", "requesting_user_id": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    for user in ["alice", "bob"] {
        let other = if user == "alice" { "bob" } else { "alice" };
        let (_, body) = send(
            &app,
            Method::POST,
            "/friends/list",
            Some(json!({ "user_id": user })),
        )
        .await;
        assert_eq!(body["friends"], json!([other]));
        assert_eq!(body["requests_sent"], json!([]));
        assert_eq!(body["requests_received"], json!([]));
    }
}

#[tokio::test]
async fn rejected_request_clears_and_accept_then_fails() {
    let (app, _) = test_app();
    create_user(&app, "alice").await;
    create_user(&app, "bob").await;

    send(
        &app,
        Method::POST,
        "/friends/send-request",
        Some(json!({ "from_user_id": "alice", "to_user_id": "bob" })),
    )
    .await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/friends/reject-request",
        Some(json!({ "rejecting_user_id": "bob", "requesting_user_id": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(
        &app,
        Method::POST,
        "/friends/accept-request",
        Some(json!({ "accepting_user_id": "bob", "requesting_user_id": "alice" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "NO_PENDING_REQUEST");
}

#[tokio::test]
async fn leaderboard_lists_only_annotated_users() {
    let (app, _) = test_app();
    create_user(&app, "alice").await;

    // No user has a carbon emission yet
    let (status, body) = send(&app, Method::GET, "/user/leaderboard", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["users"], json!([]));
}
