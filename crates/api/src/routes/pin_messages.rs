//! Pin message routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::common::dedup_ids;
use domain::models::{
    BulkActionResponse, BulkIdsRequest, MessageResponse, PinMessage, PinMessageQuery,
    PinMessageRequest,
};
use persistence::repositories::{PinMessageFilter, PinMessageRepository};
use shared::pagination::{PageRequest, Paginated};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery};

/// GET /api/pin-messages
pub async fn list_pin_messages(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<PinMessageQuery>,
) -> Result<Json<Paginated<PinMessage>>, ApiError> {
    let repo = PinMessageRepository::new(state.pool.clone());
    let page = PageRequest::new(query.page, query.per_page);
    let filter = PinMessageFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        is_active: query.is_active,
    };

    let total = repo.count(&filter).await?;
    let rows = repo
        .list(&filter, query.order.unwrap_or_default(), page)
        .await?;

    Ok(Json(Paginated::new(rows, page, total).map(PinMessage::from)))
}

/// POST /api/pin-messages
pub async fn create_pin_message(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<PinMessageRequest>,
) -> Result<(StatusCode, Json<PinMessage>), ApiError> {
    let repo = PinMessageRepository::new(state.pool.clone());
    let pin: PinMessage = repo.create(&request).await?.into();

    info!(pin_message_id = pin.id, "Pin message created");
    Ok((StatusCode::CREATED, Json(pin)))
}

/// GET /api/pin-messages/:id
pub async fn get_pin_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<PinMessage>, ApiError> {
    let repo = PinMessageRepository::new(state.pool.clone());
    let pin = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Pin message", id))?;
    Ok(Json(pin.into()))
}

/// PUT /api/pin-messages/:id
pub async fn update_pin_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<PinMessageRequest>,
) -> Result<Json<PinMessage>, ApiError> {
    let repo = PinMessageRepository::new(state.pool.clone());
    let pin = repo
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Pin message", id))?;

    info!(pin_message_id = id, "Pin message updated");
    Ok(Json(pin.into()))
}

/// DELETE /api/pin-messages/:id
pub async fn delete_pin_message(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = PinMessageRepository::new(state.pool.clone());
    if repo.delete(id).await? == 0 {
        return Err(ApiError::not_found("Pin message", id));
    }

    info!(pin_message_id = id, "Pin message deleted");
    Ok(Json(MessageResponse::new("Pin message deleted")))
}

/// POST /api/pin-messages/bulk-delete
pub async fn bulk_delete_pin_messages(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkIdsRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    let repo = PinMessageRepository::new(state.pool.clone());
    let affected = repo.bulk_delete(&dedup_ids(&request.ids)).await?;

    info!(affected, "Pin messages bulk deleted");
    Ok(Json(BulkActionResponse { affected }))
}
