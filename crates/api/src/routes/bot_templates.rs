//! Bot message template routes.
//!
//! At most one template per `template_type` is active. Creating, updating or
//! activating an active template deactivates its siblings in the same
//! transaction.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::common::dedup_ids;
use domain::models::{
    BotTemplate, BotTemplateQuery, BotTemplateRequest, BulkActionResponse, BulkIdsRequest,
    MessageResponse,
};
use persistence::repositories::{BotTemplateFilter, BotTemplateRepository};
use shared::pagination::{PageRequest, Paginated};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery};

/// GET /api/bot-templates
pub async fn list_bot_templates(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<BotTemplateQuery>,
) -> Result<Json<Paginated<BotTemplate>>, ApiError> {
    let repo = BotTemplateRepository::new(state.pool.clone());
    let page = PageRequest::new(query.page, query.per_page);
    let filter = BotTemplateFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        template_type: query.template_type,
        is_active: query.is_active,
    };

    let total = repo.count(&filter).await?;
    let rows = repo
        .list(&filter, query.order.unwrap_or_default(), page)
        .await?;

    Ok(Json(Paginated::new(rows, page, total).map(BotTemplate::from)))
}

/// POST /api/bot-templates
pub async fn create_bot_template(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BotTemplateRequest>,
) -> Result<(StatusCode, Json<BotTemplate>), ApiError> {
    let repo = BotTemplateRepository::new(state.pool.clone());
    let template: BotTemplate = repo.create(&request).await?.into();

    info!(
        template_id = template.id,
        template_type = %template.template_type,
        is_active = template.is_active,
        "Bot template created"
    );
    Ok((StatusCode::CREATED, Json(template)))
}

/// GET /api/bot-templates/:id
pub async fn get_bot_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BotTemplate>, ApiError> {
    let repo = BotTemplateRepository::new(state.pool.clone());
    let template = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Bot template", id))?;
    Ok(Json(template.into()))
}

/// PUT /api/bot-templates/:id
pub async fn update_bot_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<BotTemplateRequest>,
) -> Result<Json<BotTemplate>, ApiError> {
    let repo = BotTemplateRepository::new(state.pool.clone());
    let template = repo
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Bot template", id))?;

    info!(template_id = id, "Bot template updated");
    Ok(Json(template.into()))
}

/// Make a template the active one of its type.
///
/// POST /api/bot-templates/:id/activate
pub async fn activate_bot_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<BotTemplate>, ApiError> {
    let repo = BotTemplateRepository::new(state.pool.clone());
    let template: BotTemplate = repo
        .activate(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Bot template", id))?
        .into();

    info!(
        template_id = id,
        template_type = %template.template_type,
        "Bot template activated"
    );
    Ok(Json(template))
}

/// DELETE /api/bot-templates/:id
pub async fn delete_bot_template(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = BotTemplateRepository::new(state.pool.clone());
    if repo.delete(id).await? == 0 {
        return Err(ApiError::not_found("Bot template", id));
    }

    info!(template_id = id, "Bot template deleted");
    Ok(Json(MessageResponse::new("Bot template deleted")))
}

/// POST /api/bot-templates/bulk-delete
pub async fn bulk_delete_bot_templates(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkIdsRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    let repo = BotTemplateRepository::new(state.pool.clone());
    let affected = repo.bulk_delete(&dedup_ids(&request.ids)).await?;

    info!(affected, "Bot templates bulk deleted");
    Ok(Json(BulkActionResponse { affected }))
}
