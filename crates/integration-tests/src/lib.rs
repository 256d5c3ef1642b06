//! Shared harness for the end-to-end tests: the real router and its standard
//! layers wired to an in-memory SQLite store, argon2 hashing and HS256 tokens.

use std::sync::Arc;

use api_adapters::http::middleware::with_standard_layers;
use api_adapters::http::{router, AppState};
use auth_adapters::{Argon2PasswordHasher, JwtTokenIssuer, DEFAULT_TOKEN_TTL_SECS};
use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::Duration;
use serde_json::{json, Value};
use services::{AccountService, AdService};
use storage_adapters::SqliteStore;
use tower::ServiceExt;

pub const TEST_SECRET: &[u8] = b"integration-test-secret";

const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(5);

pub struct TestApp {
    router: Router,
}

impl TestApp {
    pub async fn spawn() -> Self {
        Self::with_page_size(10).await
    }

    pub async fn with_page_size(page_size: u32) -> Self {
        let store = Arc::new(SqliteStore::in_memory().await.expect("open in-memory sqlite"));
        store.migrate().await.expect("create schema");

        // cheap cost parameters keep the suite fast
        let hasher = Arc::new(Argon2PasswordHasher::with_cost(1024, 1, 1).expect("argon2 params"));
        let tokens = Arc::new(issuer(Duration::seconds(DEFAULT_TOKEN_TTL_SECS)));

        let state = AppState {
            accounts: Arc::new(AccountService::new(store.clone(), hasher, tokens.clone())),
            ads: Arc::new(AdService::new(store, page_size)),
            tokens,
        };
        Self { router: with_standard_layers(router(state), REQUEST_TIMEOUT) }
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(body) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(body.to_string())),
            None => builder.body(Body::empty()),
        }
        .expect("build request");

        let response = self.router.clone().oneshot(request).await.expect("route request");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, value)
    }

    pub async fn register(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let body = json!({ "username": username, "password": password });
        self.request(Method::POST, "/user/register", None, Some(body)).await
    }

    pub async fn login(&self, username: &str, password: &str) -> (StatusCode, Value) {
        let body = json!({ "username": username, "password": password });
        self.request(Method::POST, "/user/login", None, Some(body)).await
    }

    /// Registers the user and returns `(user id, token)`.
    pub async fn signed_up(&self, username: &str, password: &str) -> (String, String) {
        let (status, user) = self.register(username, password).await;
        assert_eq!(status, StatusCode::CREATED, "{user}");
        let (status, login) = self.login(username, password).await;
        assert_eq!(status, StatusCode::OK, "{login}");
        (
            user["id"].as_str().expect("user id").to_string(),
            login["token"].as_str().expect("token").to_string(),
        )
    }

    pub async fn add_item(&self, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        self.request(Method::POST, "/item/add", token, Some(body)).await
    }

    pub async fn list(&self, query: &str, token: Option<&str>) -> (StatusCode, Value) {
        let uri = if query.is_empty() {
            "/item/get".to_string()
        } else {
            format!("/item/get?{query}")
        };
        self.request(Method::GET, &uri, token, None).await
    }
}

/// A token issuer sharing the app's secret, for minting tokens in tests.
pub fn issuer(ttl: Duration) -> JwtTokenIssuer {
    JwtTokenIssuer::new(TEST_SECRET, ttl)
}
