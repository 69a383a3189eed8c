//! Bot user routes. Bot users are created by the webhook, never here.

use axum::{
    extract::{Path, State},
    Json,
};
use domain::models::{TelegramUser, TelegramUserQuery, UpdateTelegramUserRequest};
use persistence::repositories::{TelegramUserFilter, TelegramUserRepository};
use shared::pagination::{PageRequest, Paginated};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery};

/// GET /api/telegram-users
pub async fn list_telegram_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<TelegramUserQuery>,
) -> Result<Json<Paginated<TelegramUser>>, ApiError> {
    let repo = TelegramUserRepository::new(state.pool.clone());
    let page = PageRequest::new(query.page, query.per_page);
    let filter = TelegramUserFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        is_blocked: query.is_blocked,
    };

    let total = repo.count(&filter).await?;
    let rows = repo
        .list(&filter, query.order.unwrap_or_default(), page)
        .await?;

    Ok(Json(Paginated::new(rows, page, total).map(TelegramUser::from)))
}

/// GET /api/telegram-users/:id
pub async fn get_telegram_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<TelegramUser>, ApiError> {
    let repo = TelegramUserRepository::new(state.pool.clone());
    let user = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Telegram user", id))?;
    Ok(Json(user.into()))
}

/// Block or unblock a bot user. Blocked users get no advertisements.
///
/// PUT /api/telegram-users/:id
pub async fn update_telegram_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateTelegramUserRequest>,
) -> Result<Json<TelegramUser>, ApiError> {
    let repo = TelegramUserRepository::new(state.pool.clone());
    let user = repo
        .set_blocked(id, request.is_blocked)
        .await?
        .ok_or_else(|| ApiError::not_found("Telegram user", id))?;

    info!(telegram_user_id = id, is_blocked = request.is_blocked, "Telegram user updated");
    Ok(Json(user.into()))
}
