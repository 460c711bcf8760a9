use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
};
use results_api::config::Config;
use results_api::db;
use results_api::domain::{
    DomainError, ResultRepository, ResultStats, Role, Scope, UserRepository,
};
use results_api::infrastructure::{AppState, SeaOrmResultRepository, SeaOrmUserRepository};
use results_api::models::user;
use results_api::seed;
use results_api::server::build_router;
use sea_orm::{DatabaseConnection, EntityTrait};
use tower::util::ServiceExt; // for `oneshot`

// Helper to create a test database
async fn setup_test_db() -> DatabaseConnection {
    db::init_db("sqlite::memory:")
        .await
        .expect("Failed to init DB")
}

fn test_config() -> Config {
    Config {
        database_url: "sqlite::memory:".to_string(),
        port: 0,
        jwt_secret: "test-secret".to_string(),
        jwt_ttl_hours: 1,
        cors_allowed_origins: vec![],
        seed_demo: false,
    }
}

#[tokio::test]
async fn migrations_are_idempotent() {
    let db = setup_test_db().await;
    // Re-running on the same connection must not fail
    results_api::db::run_migrations(&db).await.unwrap();
}

#[tokio::test]
async fn result_crud_round_trip() {
    let db = setup_test_db().await;
    let users = SeaOrmUserRepository::new(db.clone());
    let results = SeaOrmResultRepository::new(db);

    let owner = users
        .create("owner@example.com".into(), "hash".into(), vec![Role::User])
        .await
        .unwrap();

    let created = results.create(owner.id, 100).await.unwrap();
    assert_eq!(created.value, 100);
    assert_eq!(created.user_id, owner.id);
    assert_eq!(results.find_by_id(created.id).await.unwrap(), Some(created.clone()));

    let updated = results.update_value(created.id, -4).await.unwrap();
    assert_eq!(updated.value, -4);
    assert_eq!(updated.id, created.id);

    results.delete(created.id).await.unwrap();
    assert_eq!(results.find_by_id(created.id).await.unwrap(), None);
    assert!(matches!(results.delete(created.id).await, Err(DomainError::NotFound)));
    assert!(matches!(
        results.update_value(created.id, 1).await,
        Err(DomainError::NotFound)
    ));
}

#[tokio::test]
async fn listing_and_stats_respect_scope() {
    let db = setup_test_db().await;
    let users = SeaOrmUserRepository::new(db.clone());
    let results = SeaOrmResultRepository::new(db);

    let alice = users
        .create("alice@example.com".into(), "hash".into(), vec![Role::User])
        .await
        .unwrap();
    let bob = users
        .create("bob@example.com".into(), "hash".into(), vec![Role::User])
        .await
        .unwrap();

    assert_eq!(results.stats(Scope::All).await.unwrap(), ResultStats::default());

    results.create(alice.id, 3).await.unwrap();
    results.create(bob.id, 10).await.unwrap();
    results.create(alice.id, 6).await.unwrap();

    let mine = results.find_by_owner(alice.id).await.unwrap();
    assert_eq!(mine.iter().map(|r| r.value).collect::<Vec<_>>(), vec![3, 6]);
    assert_eq!(results.find_all().await.unwrap().len(), 3);

    let stats = results.stats(Scope::Owner(alice.id)).await.unwrap();
    assert_eq!(stats.count, 2);
    assert_eq!(stats.min, Some(3));
    assert_eq!(stats.max, Some(6));
    assert_eq!(stats.avg, Some(4.5));

    let stats = results.stats(Scope::All).await.unwrap();
    assert_eq!(stats.count, 3);
    assert_eq!(stats.max, Some(10));
}

#[tokio::test]
async fn deleting_a_user_removes_their_results() {
    let db = setup_test_db().await;
    let users = SeaOrmUserRepository::new(db.clone());
    let results = SeaOrmResultRepository::new(db.clone());

    let alice = users
        .create("alice@example.com".into(), "hash".into(), vec![Role::User])
        .await
        .unwrap();
    let bob = users
        .create("bob@example.com".into(), "hash".into(), vec![Role::User])
        .await
        .unwrap();
    results.create(alice.id, 1).await.unwrap();
    results.create(alice.id, 2).await.unwrap();
    let kept = results.create(bob.id, 3).await.unwrap();

    user::Entity::delete_by_id(alice.id).exec(&db).await.unwrap();

    assert!(results.find_by_owner(alice.id).await.unwrap().is_empty());
    assert_eq!(results.find_all().await.unwrap(), vec![kept]);
}

#[tokio::test]
async fn users_round_trip_roles() {
    let db = setup_test_db().await;
    let users = SeaOrmUserRepository::new(db);

    let admin = users
        .create(
            "admin@example.com".into(),
            "hash".into(),
            vec![Role::User, Role::Admin],
        )
        .await
        .unwrap();

    let found = users.find_by_email("admin@example.com").await.unwrap().unwrap();
    assert_eq!(found.id, admin.id);
    assert_eq!(found.roles, vec![Role::User, Role::Admin]);
    assert!(users.find_by_id(admin.id + 1).await.unwrap().is_none());
}

#[tokio::test]
async fn seeding_is_repeatable() {
    let db = setup_test_db().await;
    seed::seed_demo_data(&db).await.unwrap();
    seed::seed_demo_data(&db).await.unwrap();

    let users = SeaOrmUserRepository::new(db.clone());
    let admin = users
        .find_by_email(seed::DEMO_ADMIN_EMAIL)
        .await
        .unwrap()
        .unwrap();
    assert!(admin.roles.contains(&Role::Admin));

    let demo = users
        .find_by_email(seed::DEMO_USER_EMAIL)
        .await
        .unwrap()
        .unwrap();
    let results = SeaOrmResultRepository::new(db);
    assert_eq!(results.find_by_owner(demo.id).await.unwrap().len(), 3);
}

#[tokio::test]
async fn login_and_crud_over_sqlite() {
    let db = setup_test_db().await;
    seed::seed_demo_data(&db).await.unwrap();
    let app = build_router(AppState::new(db, &test_config()), &[]);

    let login = serde_json::json!({ "email": seed::DEMO_USER_EMAIL, "password": "user" });
    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/login_check")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(login.to_string()))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value =
        serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
    let bearer = format!("Bearer {}", body["token"].as_str().unwrap());

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/v1/results")
                .header(header::AUTHORIZATION, &bearer)
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"value": 12}"#))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap(),
        "/api/v1/results/4"
    );

    let resp = app
        .clone()
        .oneshot(
            Request::builder()
                .uri("/api/v1/results/stats")
                .header(header::AUTHORIZATION, &bearer)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body: serde_json::Value =
        serde_json::from_slice(&to_bytes(resp.into_body(), usize::MAX).await.unwrap()).unwrap();
    assert_eq!(body["stats"]["count"], 4);
    assert_eq!(body["stats"]["max"], 42);
}
