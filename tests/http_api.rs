//! End-to-end HTTP tests over in-memory adapters.
//!
//! Each test assembles the full router (auth, rate limiting, handlers) and
//! drives it with `oneshot` requests.

use std::sync::Arc;
use std::time::Duration;

use argon2::Params;
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use secrecy::Secret;
use serde_json::{json, Value};
use tower::ServiceExt;

use taskflow::adapters::auth::{Argon2PasswordHasher, JwtSettings, JwtTokenIssuer};
use taskflow::adapters::cache::InMemoryKeyValueStore;
use taskflow::adapters::clock::ManualClock;
use taskflow::adapters::http::{app_router, AppState, RouteRateLimits, RouterSettings};
use taskflow::adapters::jobs::InMemoryJobQueue;
use taskflow::adapters::memory::{InMemoryTaskRepository, InMemoryUserRepository};
use taskflow::adapters::rate_limiter::{operations, FixedWindowRateLimiter, RateLimitPolicies};
use taskflow::domain::rate_limit::RateLimitPolicy;

// =============================================================================
// Test Infrastructure
// =============================================================================

fn jwt_settings() -> JwtSettings {
    JwtSettings {
        access_secret: Secret::new("integration-access-secret-0123456789".to_string()),
        refresh_secret: Secret::new("integration-refresh-secret-0123456789".to_string()),
        access_ttl: Duration::from_secs(900),
        refresh_ttl: Duration::from_secs(604_800),
        issuer: "taskflow-test".to_string(),
    }
}

fn app_with(policies: RateLimitPolicies) -> Router {
    let clock = ManualClock::new(1_700_000_000_000);
    let store = Arc::new(InMemoryKeyValueStore::new(Arc::new(clock.clone())));
    let limiter = Arc::new(FixedWindowRateLimiter::new(store, Arc::new(clock)));

    let state = AppState {
        users: Arc::new(InMemoryUserRepository::new()),
        tasks: Arc::new(InMemoryTaskRepository::new()),
        hasher: Arc::new(Argon2PasswordHasher::with_params(
            Params::new(256, 1, 1, None).unwrap(),
        )),
        tokens: Arc::new(JwtTokenIssuer::new(jwt_settings())),
        queue: Arc::new(InMemoryJobQueue::new()),
    };

    app_router(
        state,
        RouteRateLimits::new(limiter, policies),
        &RouterSettings::default(),
    )
}

fn app() -> Router {
    app_with(RateLimitPolicies::defaults())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
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

/// Registers an account and returns its access token.
async fn register(app: &Router, email: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": email, "name": "Test User", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);
    body["accessToken"].as_str().unwrap().to_string()
}

async fn create_task(app: &Router, token: &str, body: Value) -> Value {
    let (status, task) = send(app, Method::POST, "/tasks", Some(token), Some(body)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", task);
    task
}

// =============================================================================
// Auth
// =============================================================================

#[tokio::test]
async fn register_login_and_refresh_flow() {
    let app = app();

    let (status, registered) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "ada@example.com", "name": "Ada", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(registered["user"]["email"], "ada@example.com");
    assert!(registered["user"].get("passwordHash").is_none());
    assert_eq!(registered["accessTokenExpiresIn"], 900);

    let (status, session) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "correct-horse" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let access = session["accessToken"].as_str().unwrap();
    let refresh = session["refreshToken"].as_str().unwrap();

    let (status, refreshed) =
        send(&app, Method::GET, "/auth/refresh-token", Some(refresh), None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(refreshed["accessToken"].is_string());

    let (status, _) = send(&app, Method::GET, "/auth/refresh-token", Some(access), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(&app, Method::GET, "/auth/refresh-token", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_conflicts() {
    let app = app();
    register(&app, "dup@example.com").await;

    let (status, body) = send(
        &app,
        Method::POST,
        "/auth/register",
        None,
        Some(json!({ "email": "dup@example.com", "name": "Again", "password": "correct-horse" })),
    )
    .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["code"].is_string());
}

#[tokio::test]
async fn wrong_password_and_unknown_email_look_the_same() {
    let app = app();
    register(&app, "ada@example.com").await;

    let (wrong_status, wrong_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "ada@example.com", "password": "not-the-password" })),
    )
    .await;
    let (unknown_status, unknown_body) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "nobody@example.com", "password": "not-the-password" })),
    )
    .await;

    assert_eq!(wrong_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_body["message"], unknown_body["message"]);
}

#[tokio::test]
async fn malformed_json_is_bad_request() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

// =============================================================================
// Tasks
// =============================================================================

#[tokio::test]
async fn task_crud_round() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let task = create_task(
        &app,
        &token,
        json!({ "title": "Write report", "priority": "HIGH", "dueDate": "2030-01-01T09:00:00Z" }),
    )
    .await;
    assert_eq!(task["status"], "PENDING");
    assert_eq!(task["priority"], "HIGH");
    let id = task["id"].as_str().unwrap().to_string();

    let (status, fetched) = send(&app, Method::GET, &format!("/tasks/{}", id), Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched["title"], "Write report");

    let (status, updated) = send(
        &app,
        Method::PATCH,
        &format!("/tasks/{}", id),
        Some(token.as_str()),
        Some(json!({ "title": "Write final report", "description": null })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "Write final report");
    assert_eq!(updated["priority"], "HIGH");

    let (status, moved) = send(
        &app,
        Method::PATCH,
        &format!("/tasks/{}/status", id),
        Some(token.as_str()),
        Some(json!({ "status": "IN_PROGRESS" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(moved["status"], "IN_PROGRESS");

    let (status, _) = send(&app, Method::DELETE, &format!("/tasks/{}", id), Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&app, Method::GET, &format!("/tasks/{}", id), Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn tasks_are_scoped_to_their_owner() {
    let app = app();
    let ada = register(&app, "ada@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let task = create_task(&app, &ada, json!({ "title": "Private" })).await;
    let uri = format!("/tasks/{}", task["id"].as_str().unwrap());

    let (status, _) = send(&app, Method::GET, &uri, Some(bob.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::DELETE, &uri, Some(bob.as_str()), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, listed) = send(&app, Method::GET, "/tasks", Some(bob.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn task_routes_require_authentication() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/tasks", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let (status, _) = send(&app, Method::GET, "/tasks", Some("not-a-jwt"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn list_paginates_and_filters() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    for i in 0..5 {
        let priority = if i < 2 { "HIGH" } else { "LOW" };
        create_task(
            &app,
            &token,
            json!({ "title": format!("Task {}", i), "priority": priority }),
        )
        .await;
    }

    let (status, page) = send(&app, Method::GET, "/tasks?page=2&limit=2", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["total"], 5);
    assert_eq!(page["page"], 2);
    assert_eq!(page["limit"], 2);
    assert_eq!(page["data"].as_array().unwrap().len(), 2);

    let (_, high) = send(&app, Method::GET, "/tasks?priority=HIGH", Some(token.as_str()), None).await;
    assert_eq!(high["total"], 2);
    assert!(high["data"]
        .as_array()
        .unwrap()
        .iter()
        .all(|task| task["priority"] == "HIGH"));

    let (status, _) = send(&app, Method::GET, "/tasks?limit=0", Some(token.as_str()), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn stats_count_by_status_and_priority() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    create_task(&app, &token, json!({ "title": "A", "priority": "HIGH" })).await;
    create_task(&app, &token, json!({ "title": "B", "status": "COMPLETED" })).await;
    create_task(&app, &token, json!({ "title": "C", "status": "IN_PROGRESS" })).await;

    let (status, stats) = send(&app, Method::GET, "/tasks/stats", Some(token.as_str()), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        stats,
        json!({ "total": 3, "completed": 1, "inProgress": 1, "pending": 1, "highPriority": 1 })
    );
}

#[tokio::test]
async fn batch_complete_then_delete() {
    let app = app();
    let token = register(&app, "ada@example.com").await;

    let a = create_task(&app, &token, json!({ "title": "A" })).await;
    let b = create_task(&app, &token, json!({ "title": "B" })).await;
    let ids = json!([a["id"], b["id"]]);

    let (status, body) = send(
        &app,
        Method::POST,
        "/tasks/batch",
        Some(token.as_str()),
        Some(json!({ "tasks": ids, "action": "complete" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Batch complete completed successfully.");

    let (_, stats) = send(&app, Method::GET, "/tasks/stats", Some(token.as_str()), None).await;
    assert_eq!(stats["completed"], 2);

    let (status, _) = send(
        &app,
        Method::POST,
        "/tasks/batch",
        Some(token.as_str()),
        Some(json!({ "tasks": ids, "action": "delete" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, listed) = send(&app, Method::GET, "/tasks", Some(token.as_str()), None).await;
    assert_eq!(listed["total"], 0);
}

#[tokio::test]
async fn batch_with_foreign_task_is_rejected() {
    let app = app();
    let ada = register(&app, "ada@example.com").await;
    let bob = register(&app, "bob@example.com").await;
    let foreign = create_task(&app, &bob, json!({ "title": "Bob's" })).await;

    let (status, _) = send(
        &app,
        Method::POST,
        "/tasks/batch",
        Some(ada.as_str()),
        Some(json!({ "tasks": [foreign["id"]], "action": "delete" })),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
}

// =============================================================================
// Users
// =============================================================================

#[tokio::test]
async fn users_manage_only_themselves() {
    let app = app();
    let ada = register(&app, "ada@example.com").await;
    let bob = register(&app, "bob@example.com").await;

    let (_, bob_session) = send(
        &app,
        Method::POST,
        "/auth/login",
        None,
        Some(json!({ "email": "bob@example.com", "password": "correct-horse" })),
    )
    .await;
    let bob_id = bob_session["user"]["id"].as_str().unwrap().to_string();
    let uri = format!("/users/{}", bob_id);

    let (status, _) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(ada.as_str()),
        Some(json!({ "name": "Hijacked" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, renamed) = send(
        &app,
        Method::PATCH,
        &uri,
        Some(bob.as_str()),
        Some(json!({ "name": "Robert" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["name"], "Robert");

    let (status, _) = send(&app, Method::DELETE, &uri, Some(bob.as_str()), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

// =============================================================================
// Rate Limiting
// =============================================================================

#[tokio::test]
async fn login_is_throttled_after_the_limit() {
    let app = app_with(
        RateLimitPolicies::none().with(operations::LOGIN, RateLimitPolicy::per_minute(2)),
    );
    let credentials = json!({ "email": "nobody@example.com", "password": "whatever-pass" });

    for _ in 0..2 {
        let (status, _) = send(&app, Method::POST, "/auth/login", None, Some(credentials.clone())).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
    }

    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/login")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(credentials.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(response.headers()["retry-after"], "60");
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["code"], "RATE_LIMIT_EXCEEDED");
}

#[tokio::test]
async fn allowed_responses_carry_limit_headers() {
    let app = app_with(
        RateLimitPolicies::none().with(operations::REGISTER, RateLimitPolicy::per_minute(5)),
    );

    let request = Request::builder()
        .method(Method::POST)
        .uri("/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(
            json!({ "email": "ada@example.com", "name": "Ada", "password": "correct-horse" })
                .to_string(),
        ))
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(response.headers()["x-ratelimit-limit"], "5");
    assert_eq!(response.headers()["x-ratelimit-remaining"], "4");
}

#[tokio::test]
async fn unprotected_operations_are_never_throttled() {
    let app = app_with(RateLimitPolicies::none());
    let token = register(&app, "ada@example.com").await;

    for _ in 0..50 {
        let (status, _) = send(&app, Method::GET, "/tasks", Some(token.as_str()), None).await;
        assert_eq!(status, StatusCode::OK);
    }
}
