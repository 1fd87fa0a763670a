// Shared fixtures for unit and HTTP-level tests

use async_trait::async_trait;
use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use serde_json::Value;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use tower::ServiceExt;

use super::config::AppConfig;
use super::migrations::run_migrations;
use super::state::AppState;
use crate::app::build_router;
use crate::auth::google::{OAuthError, OAuthProvider};
use crate::auth::models::ExternalProfile;

pub const TEST_SECRET: &str = "test-signing-secret-for-unit-tests";
pub const ADMIN_EMAIL: &str = "admin@blog.dev";

/// Fresh in-memory database with the schema applied.
///
/// A single connection that is never recycled, otherwise each pooled
/// connection would see its own empty database.
pub async fn memory_pool() -> SqlitePool {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .expect("valid sqlite url")
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .expect("connect in-memory sqlite");
    run_migrations(&pool, false)
        .await
        .expect("migrations succeed");
    pool
}

/// Development config with a 24h token lifetime and one administrator
pub fn test_config() -> AppConfig {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("JWT_SECRET_KEY", TEST_SECRET),
        ("ADMIN_EMAIL", ADMIN_EMAIL),
        ("FRONTEND_URL", "http://localhost:5173"),
        ("FRONTEND_LOGIN_URL", "http://localhost:5173/login"),
    ]);
    AppConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()))
        .expect("test config is valid")
}

/// OAuth provider that accepts exactly one code
pub struct StubOAuth {
    pub code: String,
    pub profile: ExternalProfile,
}

#[async_trait]
impl OAuthProvider for StubOAuth {
    fn authorization_url(&self, state: &str) -> String {
        format!("https://accounts.example.test/authorize?state={}", state)
    }

    async fn exchange_code(&self, code: &str) -> Result<ExternalProfile, OAuthError> {
        if code == self.code {
            Ok(self.profile.clone())
        } else {
            Err(OAuthError::OAuthFailed("invalid_grant".to_string()))
        }
    }
}

pub async fn test_state(oauth: Option<Arc<dyn OAuthProvider>>) -> Arc<AppState> {
    Arc::new(AppState::new(memory_pool().await, test_config(), oauth))
}

pub fn test_app(state: Arc<AppState>) -> Router {
    build_router(state)
}

/// Send one request through the router. `cookie` is sent as `token=<cookie>`.
pub async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    cookie: Option<&str>,
) -> Response {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = cookie {
        builder = builder.header(header::COOKIE, format!("token={}", token));
    }
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("valid request");

    app.clone().oneshot(request).await.expect("router is infallible")
}

pub async fn body_json(response: Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).unwrap_or(Value::Null)
}

/// All `Set-Cookie` headers on a response
pub fn set_cookies(response: &Response) -> Vec<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok().map(str::to_string))
        .collect()
}

/// Value of the named cookie set by a response, if any
pub fn cookie_value(response: &Response, name: &str) -> Option<String> {
    let prefix = format!("{}=", name);
    set_cookies(response).into_iter().find_map(|c| {
        c.strip_prefix(&prefix)
            .map(|rest| rest.split(';').next().unwrap_or("").to_string())
    })
}

/// Register then log in, returning the session token
pub async fn register_and_login(app: &Router, name: &str, email: &str, password: &str) -> String {
    let response = send(
        app,
        Method::POST,
        "/auth/register",
        Some(serde_json::json!({ "name": name, "email": email, "password": password })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        app,
        Method::POST,
        "/auth/login",
        Some(serde_json::json!({ "email": email, "password": password })),
        None,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    cookie_value(&response, "token").expect("login sets the session cookie")
}
