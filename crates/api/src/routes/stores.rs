//! Store management routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::common::dedup_ids;
use domain::models::{
    BulkActionResponse, BulkIdsRequest, BulkUpdateStoresRequest, MessageResponse, Store,
    StoreQuery, StoreRequest,
};
use persistence::repositories::{StoreFilter, StoreRepository};
use shared::pagination::{PageRequest, Paginated};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery};

/// List stores.
///
/// GET /api/stores
pub async fn list_stores(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<StoreQuery>,
) -> Result<Json<Paginated<Store>>, ApiError> {
    let repo = StoreRepository::new(state.pool.clone());
    let page = PageRequest::new(query.page, query.per_page);
    let filter = StoreFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        is_active: query.is_active,
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

    Ok(Json(Paginated::new(rows, page, total).map(Store::from)))
}

/// Create a store.
///
/// POST /api/stores
pub async fn create_store(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<StoreRequest>,
) -> Result<(StatusCode, Json<Store>), ApiError> {
    let repo = StoreRepository::new(state.pool.clone());
    let store: Store = repo.create(&request).await?.into();

    info!(store_id = store.id, name = %store.name, "Store created");
    Ok((StatusCode::CREATED, Json(store)))
}

/// GET /api/stores/:id
pub async fn get_store(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Store>, ApiError> {
    let repo = StoreRepository::new(state.pool.clone());
    let store = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Store", id))?;
    Ok(Json(store.into()))
}

/// Replace a store.
///
/// PUT /api/stores/:id
pub async fn update_store(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<StoreRequest>,
) -> Result<Json<Store>, ApiError> {
    let repo = StoreRepository::new(state.pool.clone());
    let store = repo
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Store", id))?;

    info!(store_id = id, "Store updated");
    Ok(Json(store.into()))
}

/// Delete a store. Its advertisements stay, detached from the store.
///
/// DELETE /api/stores/:id
pub async fn delete_store(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = StoreRepository::new(state.pool.clone());
    if repo.delete(id).await? == 0 {
        return Err(ApiError::not_found("Store", id));
    }

    info!(store_id = id, "Store deleted");
    Ok(Json(MessageResponse::new("Store deleted")))
}

/// Activate or deactivate several stores.
///
/// POST /api/stores/bulk-update
pub async fn bulk_update_stores(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkUpdateStoresRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    let repo = StoreRepository::new(state.pool.clone());
    let affected = repo
        .bulk_set_active(&dedup_ids(&request.target.ids), request.is_active)
        .await?;

    info!(affected, is_active = request.is_active, "Stores bulk updated");
    Ok(Json(BulkActionResponse { affected }))
}

/// POST /api/stores/bulk-delete
pub async fn bulk_delete_stores(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkIdsRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    let repo = StoreRepository::new(state.pool.clone());
    let affected = repo.bulk_delete(&dedup_ids(&request.ids)).await?;

    info!(affected, "Stores bulk deleted");
    Ok(Json(BulkActionResponse { affected }))
}
