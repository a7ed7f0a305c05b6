// tests/test_auth_api.rs


use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::json;
use tower::ServiceExt;

use taskhub::auth::models::AuthResponse;

#[tokio::test]
async fn test_register_and_login_round_trip() {
    let (app, _state) = test_helpers::create_test_app().await;

    // Register
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({
                        "username": "alice",
                        "password": "testpass123",
                        "email": "alice@example.com"
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let registered: AuthResponse = test_helpers::json_body(response).await;
    assert_eq!(registered.user.username, "alice");
    assert!(!registered.token.is_empty());

    // Obtain a token with the same credentials
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/token")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "username": "alice", "password": "testpass123" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let login: AuthResponse = test_helpers::json_body(response).await;
    assert_eq!(login.user.id, registered.user.id);

    // The token opens a protected route
    let response = app
        .clone()
        .oneshot(test_helpers::get("/api/projects", &login.token))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_duplicate_username_rejected() {
    let (app, state) = test_helpers::create_test_app().await;
    test_helpers::register_user(&state, "alice").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/register")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "username": "alice", "password": "testpass123" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let (app, state) = test_helpers::create_test_app().await;
    test_helpers::register_user(&state, "alice").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/token")
                .header("content-type", "application/json")
                .body(Body::from(
                    json!({ "username": "alice", "password": "wrong-password" }).to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_routes_require_a_token() {
    let (app, _state) = test_helpers::create_test_app().await;

    // No Authorization header
    let response = app
        .clone()
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/tasks")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Garbage token
    let response = app
        .clone()
        .oneshot(test_helpers::get("/api/tasks", "garbage"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_scheme_is_accepted_too() {
    let (app, state) = test_helpers::create_test_app().await;
    let (_user, token) = test_helpers::register_user(&state, "alice").await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/api/projects")
                .header("authorization", format!("Token {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health_is_public() {
    let (app, _state) = test_helpers::create_test_app().await;

    let response = app
        .oneshot(
            Request::builder()
                .method("GET")
                .uri("/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}
