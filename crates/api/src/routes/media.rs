//! Media library routes.
//!
//! Uploads arrive as `multipart/form-data` with a single `file` field. The
//! stored files themselves are served by a static file service under
//! `/media-files`.

use axum::{
    extract::{multipart::MultipartError, Multipart, Path, State},
    http::StatusCode,
    Json,
};
use domain::models::common::dedup_ids;
use domain::models::{
    BulkActionResponse, BulkIdsRequest, MediaItem, MediaQuery, MediaResponse, MessageResponse,
};
use persistence::repositories::{MediaFilter, MediaRepository};
use shared::pagination::{PageRequest, Paginated};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery};

const FILE_FIELD: &str = "file";

/// GET /api/media
pub async fn list_media(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<MediaQuery>,
) -> Result<Json<Paginated<MediaResponse>>, ApiError> {
    let repo = MediaRepository::new(state.pool.clone());
    let page = PageRequest::new(query.page, query.per_page);
    let filter = MediaFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        mime_prefix: query.mime_type.filter(|s| !s.trim().is_empty()),
    };

    let total = repo.count(&filter).await?;
    let rows = repo
        .list(&filter, query.order.unwrap_or_default(), page)
        .await?;

    let base_url = &state.config.media.public_base_url;
    Ok(Json(
        Paginated::new(rows, page, total)
            .map(|row| MediaResponse::new(MediaItem::from(row), base_url)),
    ))
}

/// Upload a file into the media library.
///
/// POST /api/media
pub async fn upload_media(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<MediaResponse>), ApiError> {
    let max_bytes = state.config.media.max_upload_bytes;

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        let original_name = field.file_name().unwrap_or("upload").to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await.map_err(multipart_error)?;

        if bytes.is_empty() {
            return Err(ApiError::validation("Uploaded file is empty"));
        }
        if bytes.len() > max_bytes {
            return Err(ApiError::PayloadTooLarge(format!(
                "File exceeds the {} byte upload limit",
                max_bytes
            )));
        }

        let new_media = state
            .storage
            .store(&original_name, content_type.as_deref(), &bytes)
            .await
            .map_err(|e| ApiError::Internal(format!("Failed to store upload: {}", e)))?;

        let repo = MediaRepository::new(state.pool.clone());
        let item: MediaItem = match repo.create(&new_media).await {
            Ok(row) => row.into(),
            Err(e) => {
                state.storage.remove(&new_media.path).await;
                return Err(e.into());
            }
        };

        info!(
            media_id = item.id,
            mime_type = %item.mime_type,
            size_bytes = item.size_bytes,
            "Media uploaded"
        );
        let response = MediaResponse::new(item, &state.config.media.public_base_url);
        return Ok((StatusCode::CREATED, Json(response)));
    }

    Err(ApiError::validation("Multipart field 'file' is required"))
}

/// GET /api/media/:id
pub async fn get_media(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MediaResponse>, ApiError> {
    let repo = MediaRepository::new(state.pool.clone());
    let item: MediaItem = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Media", id))?
        .into();
    Ok(Json(MediaResponse::new(item, &state.config.media.public_base_url)))
}

/// Delete a media item and its file. References from other records are
/// cleared by the database.
///
/// DELETE /api/media/:id
pub async fn delete_media(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = MediaRepository::new(state.pool.clone());
    let removed = repo
        .delete(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Media", id))?;
    state.storage.remove(&removed.path).await;

    info!(media_id = id, "Media deleted");
    Ok(Json(MessageResponse::new("Media deleted")))
}

/// POST /api/media/bulk-delete
pub async fn bulk_delete_media(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkIdsRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    let repo = MediaRepository::new(state.pool.clone());
    let removed = repo.bulk_delete(&dedup_ids(&request.ids)).await?;
    for row in &removed {
        state.storage.remove(&row.path).await;
    }

    info!(affected = removed.len(), "Media bulk deleted");
    Ok(Json(BulkActionResponse {
        affected: removed.len() as u64,
    }))
}

fn multipart_error(err: MultipartError) -> ApiError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        ApiError::PayloadTooLarge(err.body_text())
    } else {
        ApiError::validation(err.body_text())
    }
}
