//! Common test utilities for integration tests.
//!
//! Tests run against the PostgreSQL database in `TEST_DATABASE_URL` and are
//! skipped when it is unset. Tests share one database, so every test creates
//! its own rows and never truncates tables.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use bot_admin_api::{app::create_app, config::Config};
use domain::services::MockBotApi;
use fake::{faker::internet::en::SafeEmail, faker::name::en::Name, Fake};
use serde_json::Value;
use sqlx::{postgres::PgPoolOptions, PgPool};
use std::time::Duration;
use tower::ServiceExt;

/// Connects to the test database and applies migrations, or returns `None`
/// when `TEST_DATABASE_URL` is unset.
pub async fn test_pool() -> Option<PgPool> {
    let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
        eprintln!("TEST_DATABASE_URL not set; skipping database test");
        return None;
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(30))
        .connect(&url)
        .await
        .expect("Failed to connect to test database");

    persistence::db::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    Some(pool)
}

pub fn test_config(overrides: &[(&str, &str)]) -> Config {
    Config::load_for_test(overrides).expect("Test configuration must load")
}

/// Application wired to a recording bot client.
pub fn test_app(pool: PgPool) -> (Router, Arc<MockBotApi>) {
    test_app_with(pool, &[])
}

pub fn test_app_with(pool: PgPool, overrides: &[(&str, &str)]) -> (Router, Arc<MockBotApi>) {
    let bot = Arc::new(MockBotApi::new());
    let app = create_app(test_config(overrides), pool, bot.clone());
    (app, bot)
}

/// Sends a request and returns the status with the parsed JSON body
/// (`Value::Null` for an empty body).
pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.expect("Request failed");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, body)
}

pub fn json_request(method: Method, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub fn delete_request(uri: &str) -> Request<Body> {
    Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// A label unique to this test run, e.g. `menu-3f2a9c1b`.
pub fn unique(prefix: &str) -> String {
    let id = uuid::Uuid::new_v4().simple().to_string();
    format!("{}-{}", prefix, &id[..8])
}

/// A slug unique to this test run, valid as a template type.
pub fn unique_slug(prefix: &str) -> String {
    unique(prefix).replace('-', "_")
}

pub fn fake_name() -> String {
    Name().fake()
}

/// A random, unique email address.
pub fn fake_email() -> String {
    let email: String = SafeEmail().fake();
    format!("{}.{}", uuid::Uuid::new_v4().simple(), email)
}

/// A Telegram id no other test uses.
pub fn unique_telegram_id() -> i64 {
    let id = uuid::Uuid::new_v4().as_u128() as u64;
    (id >> 16) as i64 + 1_000_000
}

pub fn id_of(body: &Value) -> i64 {
    body["id"].as_i64().expect("Response has an id")
}
