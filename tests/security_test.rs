use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use results_api::api;
use results_api::auth::{hash_password, verify_password, JwtKeys};
use results_api::domain::{Caller, Role, UserRepository};
use results_api::infrastructure::{AppState, InMemoryResultRepository, InMemoryUserRepository};
use tower::util::ServiceExt; // for `oneshot`

#[tokio::test]
async fn test_password_hashing() {
    let password = "super_secret_password";
    let hash = hash_password(password).expect("Failed to hash password");

    assert_ne!(password, hash);
    assert!(verify_password(password, &hash).unwrap());
    assert!(!verify_password("wrong_password", &hash).unwrap());
    assert!(verify_password(password, "not-a-phc-string").is_err());
}

#[tokio::test]
async fn test_jwt_creation_and_verification() {
    let keys = JwtKeys::new("test-secret", 1);
    let users = InMemoryUserRepository::new();
    let user = users
        .create("admin@example.com".into(), "x".into(), vec![Role::User, Role::Admin])
        .await
        .unwrap();

    let token = keys.create_jwt(&user).expect("Failed to create JWT");
    assert!(!token.is_empty());

    let claims = keys.decode_jwt(&token).expect("Failed to verify JWT");
    assert_eq!(claims.sub, "admin@example.com");
    assert_eq!(claims.uid, user.id);

    let caller = Caller::from(claims);
    assert!(caller.is_admin());

    let other = JwtKeys::new("other-secret", 1);
    assert!(other.decode_jwt(&token).is_err());
}

#[tokio::test]
async fn test_login_flow() {
    let users = Arc::new(InMemoryUserRepository::new());
    users
        .create(
            "admin@example.com".into(),
            hash_password("admin_password").unwrap(),
            vec![Role::User, Role::Admin],
        )
        .await
        .unwrap();

    let state = AppState::with_repositories(
        Arc::new(InMemoryResultRepository::new()),
        users,
        JwtKeys::new("test-secret", 1),
    );
    let app = Router::new().nest("/api", api::api_router(state.clone()));

    let login = |email: &str, password: &str| {
        Request::builder()
            .uri("/api/v1/login_check")
            .method("POST")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "email": email, "password": password }).to_string(),
            ))
            .unwrap()
    };

    // Success
    let response = app
        .clone()
        .oneshot(login("admin@example.com", "admin_password"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&to_bytes(response.into_body(), usize::MAX).await.unwrap())
            .unwrap();
    let claims = state
        .jwt
        .decode_jwt(body["token"].as_str().unwrap())
        .unwrap();
    assert!(claims.roles.contains(&Role::Admin));

    // Invalid password
    let response = app
        .clone()
        .oneshot(login("admin@example.com", "wrong_password"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    // Non-existent user
    let response = app.oneshot(login("nobody@example.com", "password")).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_malformed_authorization_header() {
    let state = AppState::with_repositories(
        Arc::new(InMemoryResultRepository::new()),
        Arc::new(InMemoryUserRepository::new()),
        JwtKeys::new("test-secret", 1),
    );
    let app = Router::new().nest("/api", api::api_router(state));

    for value in ["Basic abc", "Bearer", "token-without-scheme"] {
        let response = app
            .clone()
            .oneshot(
                Request::builder()
                    .uri("/api/v1/results")
                    .header(header::AUTHORIZATION, value)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED, "{value}");
    }
}
