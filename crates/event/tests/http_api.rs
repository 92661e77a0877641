mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use chrono::{Duration, Utc};
use common::*;
use event::{
    di::Repositories, handler::AppRouter, repository::memory::MemoryStore, state::AppState,
};
use serde_json::{Value, json};
use shared::{abstract_trait::JwtServiceTrait, config::JwtConfig};
use std::sync::Arc;
use tower::ServiceExt;

const IDENTITY_SECRET: &str = "test-identity-secret";

fn app() -> Router {
    let (collaborators, _, _) = collaborators();
    let state = AppState::with_collaborators(
        Repositories::memory(MemoryStore::new()),
        collaborators,
        Arc::new(JwtConfig::new(IDENTITY_SECRET)),
    );
    AppRouter::build(state)
}

fn token(user_id: i32, role: &str) -> String {
    let claims = json!({
        "sub": user_id.to_string(),
        "role": role,
        "name": format!("User {user_id}"),
        "email": format!("user{user_id}@campus.test"),
        "participant_class": "internal",
        "exp": (Utc::now() + Duration::hours(1)).timestamp(),
    });
    JwtConfig::new(IDENTITY_SECRET).sign(&claims).unwrap()
}

async fn call(app: &Router, method: &str, uri: &str, token: Option<&str>, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn event_body() -> Value {
    let start = Utc::now() + Duration::days(10);
    json!({
        "name": "Hackathon Kickoff",
        "description": "Opening ceremony and team formation",
        "kind": "normal",
        "registration_deadline": start - Duration::days(1),
        "start_time": start,
        "end_time": start + Duration::hours(4),
        "registration_limit": 100,
        "tags": ["hackathon"]
    })
}

#[tokio::test]
async fn requests_without_identity_are_unauthorized() {
    let app = app();

    let (status, body) = call(&app, "GET", "/api/events", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");

    let (status, _) = call(&app, "GET", "/api/events", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn publish_register_and_check_in_over_http() {
    let app = app();
    let org = token(10, "organizer");
    let student = token(1, "participant");

    let (status, created) = call(&app, "POST", "/api/events", Some(&org), Some(event_body())).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["data"]["status"], "draft");
    let id = created["data"]["id"].as_i64().unwrap();

    let (status, _) = call(
        &app,
        "POST",
        &format!("/api/events/{id}/registrations"),
        Some(&student),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);

    let (status, published) = call(
        &app,
        "PATCH",
        &format!("/api/events/{id}"),
        Some(&org),
        Some(json!({ "status": "published" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(published["data"]["status"], "published");

    let (status, registered) = call(
        &app,
        "POST",
        &format!("/api/events/{id}/registrations"),
        Some(&student),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["message"], "Registration successful");
    let ticket = registered["data"]["ticket_id"].as_str().unwrap().to_string();

    let (status, duplicate) = call(
        &app,
        "POST",
        &format!("/api/events/{id}/registrations"),
        Some(&student),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(duplicate["status"], "error");

    let (status, mine) = call(&app, "GET", "/api/registrations/me", Some(&student), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["data"].as_array().unwrap().len(), 1);

    let (status, marked) = call(
        &app,
        "POST",
        &format!("/api/events/{id}/attendance"),
        Some(&org),
        Some(json!({ "ticket_id": ticket })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let attended_at = marked["data"]["attended_at"].clone();

    let (status, again) = call(
        &app,
        "POST",
        &format!("/api/events/{id}/attendance"),
        Some(&org),
        Some(json!({ "ticket_id": ticket })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(again["data"]["attended_at"], attended_at);
}

#[tokio::test]
async fn feedback_over_http() {
    let app = app();
    let org = token(10, "organizer");
    let student = token(1, "participant");
    let stranger = token(2, "participant");

    let (_, created) = call(&app, "POST", "/api/events", Some(&org), Some(event_body())).await;
    let id = created["data"]["id"].as_i64().unwrap();
    call(
        &app,
        "PATCH",
        &format!("/api/events/{id}"),
        Some(&org),
        Some(json!({ "status": "published" })),
    )
    .await;
    call(
        &app,
        "POST",
        &format!("/api/events/{id}/registrations"),
        Some(&student),
        Some(json!({})),
    )
    .await;

    let uri = format!("/api/events/{id}/feedback");
    let (status, _) = call(&app, "POST", &uri, Some(&stranger), Some(json!({ "rating": 5 }))).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, submitted) = call(
        &app,
        "POST",
        &uri,
        Some(&student),
        Some(json!({ "rating": 5, "comment": "Loved it" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(submitted["data"]["rating"], 5);

    let (status, duplicate) = call(&app, "POST", &uri, Some(&student), Some(json!({ "rating": 3 }))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(duplicate["status"], "error");

    let (status, listed) = call(&app, "GET", &format!("{uri}?rating=5"), Some(&org), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["data"]["stats"]["total_feedbacks"], 1);
    assert_eq!(listed["data"]["feedbacks"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn frozen_field_edits_are_bad_requests() {
    let app = app();
    let org = token(10, "organizer");

    let (_, created) = call(&app, "POST", "/api/events", Some(&org), Some(event_body())).await;
    let id = created["data"]["id"].as_i64().unwrap();
    call(
        &app,
        "PATCH",
        &format!("/api/events/{id}"),
        Some(&org),
        Some(json!({ "status": "published" })),
    )
    .await;

    let (status, body) = call(
        &app,
        "PATCH",
        &format!("/api/events/{id}"),
        Some(&org),
        Some(json!({ "name": "Renamed", "description": "Fine" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"].as_str().unwrap().contains("name"));

    let (status, _) = call(
        &app,
        "PATCH",
        &format!("/api/events/{id}"),
        Some(&org),
        Some(json!({ "registration_count": 0 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn check_in_body_needs_exactly_one_reference() {
    let app = app();
    let org = token(10, "organizer");

    let (status, body) = call(
        &app,
        "POST",
        "/api/events/1/attendance",
        Some(&org),
        Some(json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
}

#[tokio::test]
async fn metrics_are_exposed() {
    let app = app();

    let (status, _) = call(&app, "GET", "/metrics", None, None).await;
    assert_eq!(status, StatusCode::OK);
}
