mod common;

use anyhow::Result;
use axum::http::{Method, StatusCode};
use chrono::{Duration, Utc};
use serde_json::json;
use uuid::Uuid;

use common::{test_keys, TestApp};
use kyndkart_api::auth::{Claims, TokenType};

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let app = TestApp::new();
    let (status, body) = app.request(Method::GET, "/health", None, None).await?;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    Ok(())
}

#[tokio::test]
async fn register_then_login_returns_token_pair() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.register("alice", "p@ss1").await?;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"message": "User registered successfully"}));

    let (status, body) = app.login("alice", "p@ss1").await?;
    assert_eq!(status, StatusCode::OK);
    let access = body["access"].as_str().expect("access token");
    let refresh = body["refresh"].as_str().expect("refresh token");
    assert_ne!(access, refresh);

    let claims = test_keys().verify(access, TokenType::Access)?;
    assert_eq!(claims.username, "alice");
    Ok(())
}

#[tokio::test]
async fn duplicate_username_is_rejected_without_second_row() -> Result<()> {
    let app = TestApp::new();
    app.register("bob", "first").await?;

    let (status, body) = app.register("bob", "second").await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"username": ["A user with that username already exists."]}));
    assert_eq!(app.store.user_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn concurrent_registrations_have_one_winner() -> Result<()> {
    let app = TestApp::new();

    let attempts = (0..4).map(|i| {
        let app = &app;
        async move { app.register("bob", &format!("password-{i}")).await }
    });
    let results = futures::future::join_all(attempts).await;

    let mut created = 0;
    let mut rejected = 0;
    for result in results {
        let (status, body) = result?;
        match status {
            StatusCode::CREATED => created += 1,
            StatusCode::BAD_REQUEST => {
                assert!(body.get("username").is_some(), "{body}");
                rejected += 1;
            }
            other => panic!("unexpected status {other}: {body}"),
        }
    }
    assert_eq!((created, rejected), (1, 3));
    assert_eq!(app.store.user_count().await, 1);
    Ok(())
}

#[tokio::test]
async fn wrong_password_and_unknown_user_look_identical() -> Result<()> {
    let app = TestApp::new();
    app.register("carol", "right").await?;

    let wrong = app.login("carol", "wrong").await?;
    let unknown = app.login("nobody", "right").await?;

    assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong, unknown);
    assert_eq!(wrong.1["message"], "Invalid credentials");
    Ok(())
}

#[tokio::test]
async fn login_with_missing_or_blank_fields_is_invalid_credentials() -> Result<()> {
    let app = TestApp::new();
    app.register("alice", "p@ss1").await?;

    let wrong = app.login("alice", "wrong").await?;
    assert_eq!(wrong.0, StatusCode::UNAUTHORIZED);

    for body in [
        json!({"username": "alice"}),
        json!({"username": "alice", "password": ""}),
        json!({"username": "alice", "password": null}),
        json!({}),
    ] {
        let response = app.post("/login/", None, body.clone()).await?;
        assert_eq!(response, wrong, "{body}");
    }
    Ok(())
}

#[tokio::test]
async fn register_validates_fields() -> Result<()> {
    let app = TestApp::new();

    let (status, body) = app.post("/register/", None, json!({"username": "bad name!"})).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("username").is_some());
    assert_eq!(body["password"], json!(["This field is required."]));
    Ok(())
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() -> Result<()> {
    let app = TestApp::new();
    let request = axum::http::Request::builder()
        .method(Method::POST)
        .uri("/register/")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))?;

    let response = tower::ServiceExt::oneshot(app.router.clone(), request).await?;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let (status, body) = app.post("/register/", None, json!(["alice", "p@ss1"])).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body.get("non_field_errors").is_some());
    Ok(())
}

#[tokio::test]
async fn protected_routes_require_a_valid_access_token() -> Result<()> {
    let app = TestApp::new();
    app.register("dave", "pw").await?;
    let (_, tokens) = app.login("dave", "pw").await?;

    // Missing header
    let (status, body) = app.request(Method::GET, "/tasks/", None, None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert!(body.get("message").is_some());

    // Refresh token in place of access token
    let refresh = tokens["refresh"].as_str().unwrap();
    let (status, _) = app.get("/tasks/", refresh).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // Garbage
    let (status, _) = app.get("/tasks/", "not-a-token").await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // The real thing
    let access = tokens["access"].as_str().unwrap();
    let (status, _) = app.get("/tasks/", access).await?;
    assert_eq!(status, StatusCode::OK);
    Ok(())
}

#[tokio::test]
async fn expired_and_tampered_tokens_fail() -> Result<()> {
    let app = TestApp::new();
    let keys = test_keys();
    let now = Utc::now();

    let expired = keys.sign(&Claims {
        sub: Uuid::new_v4(),
        username: "erin".to_string(),
        token_type: TokenType::Access,
        jti: Uuid::new_v4(),
        exp: (now - Duration::seconds(30)).timestamp(),
        iat: (now - Duration::minutes(10)).timestamp(),
    })?;
    let (status, body) = app.get("/tasks/", &expired).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token has expired");

    let foreign = kyndkart_api::auth::TokenKeys::new("someone-else", Duration::minutes(5), Duration::days(1))
        .issue(Uuid::new_v4(), "erin", TokenType::Access)?;
    let (status, _) = app.get("/tasks/", &foreign).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}
