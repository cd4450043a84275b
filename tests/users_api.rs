//! Users API integration tests.

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use demo_services::config::{ServiceConfig, ServiceKind, UsersConfig};

mod common;

fn empty_app() -> axum::Router {
    common::app_with(ServiceConfig {
        service: ServiceKind::Users,
        users: UsersConfig {
            seed_demo_data: false,
            ..UsersConfig::default()
        },
        ..ServiceConfig::default()
    })
}

fn user(n: usize) -> Value {
    json!({"name": format!("User {}", n), "email": format!("user{}@example.com", n), "age": 20 + n})
}

fn ids(body: &Value) -> Vec<u64> {
    body.as_array()
        .unwrap()
        .iter()
        .map(|u| u["id"].as_u64().unwrap())
        .collect()
}

#[tokio::test]
async fn test_root_and_health() {
    let app = common::app(ServiceKind::Users);

    let (status, body) = common::send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["message"].is_string());

    let (status, body) = common::send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["users"], 2);
}

#[tokio::test]
async fn test_demo_users_seeded() {
    let app = common::app(ServiceKind::Users);

    let (_, body) = common::send(&app, Method::GET, "/users/", None).await;
    assert_eq!(ids(&body), vec![1, 2]);

    let (_, body) = common::send(&app, Method::GET, "/users/?active_only=true", None).await;
    assert_eq!(ids(&body), vec![1]);
}

#[tokio::test]
async fn test_crud_flow() {
    let app = empty_app();

    let (status, created) = common::send(
        &app,
        Method::POST,
        "/users/",
        Some(json!({"name": "Alice Johnson", "email": "alice@example.com", "age": 28})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["id"], 1);
    assert_eq!(created["is_active"], true);
    assert!(created["created_at"].is_string());

    let (status, fetched) = common::send(&app, Method::GET, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let (status, updated) = common::send(
        &app,
        Method::PUT,
        "/users/1",
        Some(json!({"name": "Alice Smith", "age": 29})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Alice Smith");
    assert_eq!(updated["age"], 29);
    assert_eq!(updated["email"], "alice@example.com");
    assert_eq!(updated["created_at"], created["created_at"]);

    let (status, deleted) = common::send(&app, Method::DELETE, "/users/1", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["name"], "Alice Smith");

    let (status, body) = common::send(&app, Method::GET, "/users/1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["detail"], "User with id 1 not found");
}

#[tokio::test]
async fn test_ids_are_not_reused() {
    let app = empty_app();
    common::send(&app, Method::POST, "/users", Some(user(1))).await;
    common::send(&app, Method::DELETE, "/users/1", None).await;

    let (_, created) = common::send(&app, Method::POST, "/users", Some(user(2))).await;
    assert_eq!(created["id"], 2);
}

#[tokio::test]
async fn test_missing_ids_are_404() {
    let app = empty_app();
    let requests = [
        (Method::GET, "/users/999", None),
        (Method::PUT, "/users/999", Some(json!({"age": 40}))),
        (Method::DELETE, "/users/999", None),
        (Method::GET, "/users/999/profile", None),
    ];

    for (method, uri, body) in requests {
        let (status, body) = common::send(&app, method.clone(), uri, body).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{} {}", method, uri);
        assert_eq!(body["detail"], "User with id 999 not found");
    }
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = empty_app();
    common::send(&app, Method::POST, "/users", Some(user(1))).await;

    let (status, body) = common::send(
        &app,
        Method::POST,
        "/users",
        Some(json!({"name": "Copy", "email": "USER1@example.com", "age": 33})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"].as_str().unwrap().contains("already registered"));

    let (_, body) = common::send(&app, Method::GET, "/users", None).await;
    assert_eq!(ids(&body), vec![1]);
}

#[tokio::test]
async fn test_invalid_payloads_are_422() {
    let app = empty_app();
    let payloads = [
        json!({"name": "", "email": "a@example.com", "age": 20}),
        json!({"name": "Bob", "email": "not-an-email", "age": 20}),
        json!({"name": "Bob", "email": "b@example.com", "age": 151}),
        json!({"name": "Bob", "email": "b@example.com", "age": -1}),
        json!({"name": "Bob", "age": 20}),
    ];

    for payload in payloads {
        let (status, body) = common::send(&app, Method::POST, "/users", Some(payload.clone())).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", payload);
        assert!(body["detail"].is_array());
    }

    let (_, body) = common::send(&app, Method::GET, "/users", None).await;
    assert_eq!(ids(&body), Vec::<u64>::new());
}

#[tokio::test]
async fn test_pagination_windows() {
    let app = empty_app();
    for n in 1..=12 {
        let (status, _) = common::send(&app, Method::POST, "/users", Some(user(n))).await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (_, body) = common::send(&app, Method::GET, "/users", None).await;
    assert_eq!(ids(&body), (1..=10).collect::<Vec<_>>());

    for (skip, limit) in [(0, 5), (5, 5), (10, 5), (11, 100), (12, 3), (50, 1)] {
        let uri = format!("/users?skip={}&limit={}", skip, limit);
        let (status, body) = common::send(&app, Method::GET, &uri, None).await;
        assert_eq!(status, StatusCode::OK);

        let expected: Vec<u64> = (1..=12u64).skip(skip).take(limit).collect();
        assert_eq!(ids(&body), expected, "{}", uri);
    }
}

#[tokio::test]
async fn test_active_only_filter_applies_before_paging() {
    let app = empty_app();
    for n in 1..=4 {
        common::send(&app, Method::POST, "/users", Some(user(n))).await;
    }
    common::send(&app, Method::PUT, "/users/1", Some(json!({"is_active": false}))).await;
    common::send(&app, Method::PUT, "/users/3", Some(json!({"is_active": false}))).await;

    let (_, body) = common::send(&app, Method::GET, "/users?active_only=true", None).await;
    assert_eq!(ids(&body), vec![2, 4]);

    let (_, body) = common::send(&app, Method::GET, "/users?active_only=true&skip=1&limit=1", None).await;
    assert_eq!(ids(&body), vec![4]);
}

#[tokio::test]
async fn test_bad_query_and_path_values_are_422() {
    let app = empty_app();
    for uri in [
        "/users?limit=0",
        "/users?limit=101",
        "/users?skip=-1",
        "/users?active_only=maybe",
        "/users/abc",
    ] {
        let (status, body) = common::send(&app, Method::GET, uri, None).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY, "{}", uri);
        assert!(body["detail"].is_array(), "{}", uri);
    }
}

#[tokio::test]
async fn test_profile_with_and_without_stats() {
    let app = common::app(ServiceKind::Users);

    let (status, body) = common::send(&app, Method::GET, "/users/1/profile", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user"]["name"], "John Doe");
    assert!(body.get("stats").is_none());

    let (status, body) = common::send(&app, Method::GET, "/users/1/profile?include_stats=true", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stats"]["email_domain"], "example.com");
    assert!(body["stats"]["account_age_days"].as_i64().unwrap() >= 0);
}
