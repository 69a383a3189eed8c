//! Advertisement routes.
//!
//! Writes go through [`AdvertisementService`] so queued deliveries follow
//! every change that affects them.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    Advertisement, AdvertisementQuery, AdvertisementRequest, AdvertisementSend,
    BulkActionResponse, BulkIdsRequest, BulkUpdateAdvertisementsRequest, MessageResponse,
    SendHistoryQuery,
};
use persistence::repositories::{AdvertisementFilter, AdvertisementRepository};
use shared::pagination::{PageRequest, Paginated};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::services::AdvertisementService;

/// List advertisements, excluding soft-deleted ones.
///
/// GET /api/advertisements
pub async fn list_advertisements(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<AdvertisementQuery>,
) -> Result<Json<Paginated<Advertisement>>, ApiError> {
    let repo = AdvertisementRepository::new(state.pool.clone());
    let page = PageRequest::new(query.page, query.per_page);
    let filter = AdvertisementFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        status: query.status,
        store_id: query.store_id,
    };

    let total = repo.count(&filter).await?;
    let rows = repo
        .list(
            &filter,
            query.sort.unwrap_or_default(),
            query.order.unwrap_or_default(),
            page,
        )
        .await?;

    Ok(Json(Paginated::new(rows, page, total).map(Advertisement::from)))
}

/// Create an advertisement. An active one is queued for delivery.
///
/// POST /api/advertisements
pub async fn create_advertisement(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdvertisementRequest>,
) -> Result<(StatusCode, Json<Advertisement>), ApiError> {
    let service = AdvertisementService::new(state.pool.clone());
    let ad = service.create(&request).await?;
    Ok((StatusCode::CREATED, Json(ad)))
}

/// GET /api/advertisements/:id
pub async fn get_advertisement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Advertisement>, ApiError> {
    let repo = AdvertisementRepository::new(state.pool.clone());
    let ad = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Advertisement", id))?;
    Ok(Json(ad.into()))
}

/// Replace an advertisement.
///
/// PUT /api/advertisements/:id
///
/// Changing `status`, `start_date`, `end_date` or `frequency_cap_minutes`
/// drops the queued delivery jobs for it.
pub async fn update_advertisement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<AdvertisementRequest>,
) -> Result<Json<Advertisement>, ApiError> {
    let service = AdvertisementService::new(state.pool.clone());
    Ok(Json(service.update(id, &request).await?))
}

/// Soft-delete an advertisement.
///
/// DELETE /api/advertisements/:id
pub async fn delete_advertisement(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let service = AdvertisementService::new(state.pool.clone());
    service.delete(id).await?;
    Ok(Json(MessageResponse::new("Advertisement deleted")))
}

/// Set the status of several advertisements.
///
/// POST /api/advertisements/bulk-update
pub async fn bulk_update_advertisements(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkUpdateAdvertisementsRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    let service = AdvertisementService::new(state.pool.clone());
    let affected = service
        .bulk_set_status(&request.target.ids, request.status)
        .await?;
    Ok(Json(BulkActionResponse { affected }))
}

/// POST /api/advertisements/bulk-delete
pub async fn bulk_delete_advertisements(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkIdsRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    let service = AdvertisementService::new(state.pool.clone());
    let affected = service.bulk_delete(&request.ids).await?;
    Ok(Json(BulkActionResponse { affected }))
}

/// Delivery log of one advertisement, newest first.
///
/// GET /api/advertisements/:id/sends
pub async fn list_sends(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedQuery(query): ValidatedQuery<SendHistoryQuery>,
) -> Result<Json<Paginated<AdvertisementSend>>, ApiError> {
    let repo = AdvertisementRepository::new(state.pool.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Advertisement", id));
    }

    let page = PageRequest::new(query.page, query.per_page);
    let total = repo.count_sends(id, query.telegram_user_id).await?;
    let rows = repo.send_history(id, query.telegram_user_id, page).await?;

    Ok(Json(
        Paginated::new(rows, page, total).map(AdvertisementSend::from),
    ))
}
