//! Telegram webhook endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use domain::models::telegram::Update;
use serde::Serialize;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::VerifiedWebhook;
use crate::services::bot::{BotContext, UpdateDispatcher};

#[derive(Debug, Serialize, PartialEq, Eq)]
pub struct WebhookAck {
    pub ok: bool,
}

/// Receive one update from Telegram.
///
/// POST /api/telegram/webhook
///
/// Answers `{"ok": true}` for every well-formed update, including ones whose
/// handling failed; Telegram would otherwise keep redelivering them.
pub async fn receive_update(
    State(state): State<AppState>,
    _verified: VerifiedWebhook,
    payload: Result<Json<Update>, JsonRejection>,
) -> Result<Json<WebhookAck>, ApiError> {
    let Json(update) = payload?;
    let dispatcher = UpdateDispatcher::new(BotContext {
        pool: state.pool.clone(),
        bot: state.bot.clone(),
        media_base_url: state.config.media.public_base_url.clone(),
    });

    match dispatcher.dispatch(&update).await {
        Ok(kind) => {
            tracing::info!(update_id = update.update_id, kind = kind.as_str(), "Update handled");
        }
        Err(e) => {
            tracing::error!(update_id = update.update_id, error = %e, "Update handling failed");
        }
    }

    Ok(Json(WebhookAck { ok: true }))
}
