//! Telegram webhook secret check.

use axum::{extract::FromRequestParts, http::request::Parts};
use shared::crypto::secrets_match;

use crate::app::AppState;
use crate::error::ApiError;

pub const SECRET_TOKEN_HEADER: &str = "x-telegram-bot-api-secret-token";

/// Passes when no webhook secret is configured or the request carries the
/// configured value in `X-Telegram-Bot-Api-Secret-Token`.
#[derive(Debug, Clone, Copy)]
pub struct VerifiedWebhook;

#[axum::async_trait]
impl FromRequestParts<AppState> for VerifiedWebhook {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.telegram.webhook_secret() else {
            return Ok(VerifiedWebhook);
        };

        let presented = parts
            .headers
            .get(SECRET_TOKEN_HEADER)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default();

        if secrets_match(presented, expected) {
            Ok(VerifiedWebhook)
        } else {
            tracing::warn!("Webhook request with a wrong secret token");
            Err(ApiError::Unauthorized("Invalid webhook secret token".to_string()))
        }
    }
}
