#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use chrono::Duration;
use serde_json::Value;
use tower::ServiceExt;

use kyndkart_api::auth::TokenKeys;
use kyndkart_api::config::AppConfig;
use kyndkart_api::database::MemoryStore;
use kyndkart_api::state::AppState;

pub const TEST_SECRET: &str = "integration-test-secret";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
}

pub fn test_keys() -> TokenKeys {
    TokenKeys::new(TEST_SECRET, Duration::minutes(5), Duration::days(1))
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_keys());
        let router = kyndkart_api::app(state, &AppConfig::development());
        Self { router, store }
    }

    /// Send one request through the router; returns status and parsed JSON body
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> Result<(StatusCode, Value)> {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(serde_json::to_vec(&json)?)
            }
            None => Body::empty(),
        };

        let response = self.router.clone().oneshot(builder.body(body)?).await?;
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await?;
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).with_context(|| {
                format!("non-JSON body: {}", String::from_utf8_lossy(&bytes))
            })?
        };
        Ok((status, json))
    }

    pub async fn get(&self, uri: &str, token: &str) -> Result<(StatusCode, Value)> {
        self.request(Method::GET, uri, Some(token), None).await
    }

    pub async fn post(&self, uri: &str, token: Option<&str>, body: Value) -> Result<(StatusCode, Value)> {
        self.request(Method::POST, uri, token, Some(body)).await
    }

    pub async fn register(&self, username: &str, password: &str) -> Result<(StatusCode, Value)> {
        self.post(
            "/register/",
            None,
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<(StatusCode, Value)> {
        self.post(
            "/login/",
            None,
            serde_json::json!({ "username": username, "password": password }),
        )
        .await
    }

    /// Register + login, returning the access token
    pub async fn signup(&self, username: &str, password: &str) -> Result<String> {
        let (status, body) = self.register(username, password).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {status} {body}");

        let (status, body) = self.login(username, password).await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {status} {body}");

        body["access"]
            .as_str()
            .map(str::to_string)
            .context("login response missing access token")
    }
}
