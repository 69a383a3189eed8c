//! Per-client rate limiting.
//!
//! Clients are keyed by the first `X-Forwarded-For` hop, then `X-Real-IP`.
//! Requests without either share one bucket.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderMap, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use governor::{
    clock::{Clock, DefaultClock},
    state::keyed::DefaultKeyedStateStore,
    Quota, RateLimiter,
};
use serde_json::json;
use std::num::NonZeroU32;

use crate::app::AppState;

const ANONYMOUS_CLIENT: &str = "anonymous";

type ClientRateLimiter = RateLimiter<String, DefaultKeyedStateStore<String>, DefaultClock>;

pub struct RateLimiterState {
    limiter: ClientRateLimiter,
    rate_limit_per_minute: u32,
}

impl RateLimiterState {
    /// Returns `None` when `rate_limit_per_minute` is 0 (limiting disabled).
    pub fn new(rate_limit_per_minute: u32) -> Option<Self> {
        let per_minute = NonZeroU32::new(rate_limit_per_minute)?;
        Some(Self {
            limiter: RateLimiter::keyed(Quota::per_minute(per_minute)),
            rate_limit_per_minute,
        })
    }

    /// `Err(retry_after_secs)` when the client is over its quota.
    pub fn check(&self, client: &str) -> Result<(), u64> {
        match self.limiter.check_key(&client.to_string()) {
            Ok(()) => Ok(()),
            Err(not_until) => {
                let wait = not_until.wait_time_from(DefaultClock::default().now());
                Err(wait.as_secs().max(1))
            }
        }
    }

    /// Drops buckets that have fully refilled.
    pub fn prune(&self) {
        self.limiter.retain_recent();
        self.limiter.shrink_to_fit();
    }

    pub fn tracked_clients(&self) -> usize {
        self.limiter.len()
    }

    pub fn limit(&self) -> u32 {
        self.rate_limit_per_minute
    }
}

impl std::fmt::Debug for RateLimiterState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimiterState")
            .field("rate_limit_per_minute", &self.rate_limit_per_minute)
            .field("tracked_clients", &self.limiter.len())
            .finish()
    }
}

/// Client key derived from proxy headers.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .or_else(|| headers.get("x-real-ip").and_then(|v| v.to_str().ok()))
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(ANONYMOUS_CLIENT)
        .to_string()
}

pub async fn rate_limit_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    if let Some(limiter) = &state.rate_limiter {
        let client = client_key(req.headers());
        if let Err(retry_after) = limiter.check(&client) {
            tracing::warn!(client = %client, retry_after, "Rate limit exceeded");
            return rate_limited_response(limiter.limit(), retry_after);
        }
    }

    next.run(req).await
}

fn rate_limited_response(limit: u32, retry_after: u64) -> Response {
    let body = json!({
        "error": "rate_limited",
        "message": format!("Rate limit of {} requests/minute exceeded", limit),
        "retry_after": retry_after
    });

    let mut response = (StatusCode::TOO_MANY_REQUESTS, Json(body)).into_response();
    response
        .headers_mut()
        .insert(header::RETRY_AFTER, HeaderValue::from(retry_after));
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_limit_disables() {
        assert!(RateLimiterState::new(0).is_none());
        assert_eq!(RateLimiterState::new(10).unwrap().limit(), 10);
    }

    #[test]
    fn test_exhaustion_is_per_client() {
        let state = RateLimiterState::new(2).unwrap();
        assert!(state.check("10.0.0.1").is_ok());
        assert!(state.check("10.0.0.1").is_ok());
        let retry_after = state.check("10.0.0.1").unwrap_err();
        assert!(retry_after >= 1);

        assert!(state.check("10.0.0.2").is_ok());
        assert_eq!(state.tracked_clients(), 2);
    }

    #[test]
    fn test_client_key() {
        let mut headers = HeaderMap::new();
        assert_eq!(client_key(&headers), ANONYMOUS_CLIENT);

        headers.insert("x-real-ip", HeaderValue::from_static("192.0.2.7"));
        assert_eq!(client_key(&headers), "192.0.2.7");

        headers.insert(
            "x-forwarded-for",
            HeaderValue::from_static("203.0.113.5, 10.0.0.1"),
        );
        assert_eq!(client_key(&headers), "203.0.113.5");
    }

    #[test]
    fn test_rate_limited_response() {
        let response = rate_limited_response(60, 12);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(response.headers().get(header::RETRY_AFTER).unwrap(), "12");
    }
}
