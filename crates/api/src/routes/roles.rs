//! Admin role routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{MessageResponse, Role, RoleQuery, RoleRequest, RoleWithUsage};
use persistence::repositories::RoleRepository;
use shared::pagination::{PageRequest, Paginated};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::services::users::{ensure_role_deletable, ensure_role_renamable};

/// List roles with the number of users holding each.
///
/// GET /api/roles
pub async fn list_roles(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<RoleQuery>,
) -> Result<Json<Paginated<RoleWithUsage>>, ApiError> {
    let repo = RoleRepository::new(state.pool.clone());
    let page = PageRequest::new(query.page, query.per_page);
    let search = query.search.as_deref().map(str::trim).filter(|s| !s.is_empty());

    let total = repo.count(search).await?;
    let rows = repo.list_with_usage(search, page).await?;

    Ok(Json(Paginated::new(rows, page, total).map(RoleWithUsage::from)))
}

/// POST /api/roles
pub async fn create_role(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RoleRequest>,
) -> Result<(StatusCode, Json<Role>), ApiError> {
    let repo = RoleRepository::new(state.pool.clone());
    let role: Role = repo.create(request.name.trim()).await?.into();

    info!(role_id = role.id, name = %role.name, "Role created");
    Ok((StatusCode::CREATED, Json(role)))
}

/// GET /api/roles/:id
pub async fn get_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<Role>, ApiError> {
    let repo = RoleRepository::new(state.pool.clone());
    let role = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Role", id))?;
    Ok(Json(role.into()))
}

/// PUT /api/roles/:id
pub async fn update_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<RoleRequest>,
) -> Result<Json<Role>, ApiError> {
    let repo = RoleRepository::new(state.pool.clone());
    let current: Role = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Role", id))?
        .into();
    ensure_role_renamable(&current, &request.name)?;

    let role = repo
        .rename(id, request.name.trim())
        .await?
        .ok_or_else(|| ApiError::not_found("Role", id))?;

    info!(role_id = id, "Role renamed");
    Ok(Json(role.into()))
}

/// Delete a role. Users holding it simply lose it.
///
/// DELETE /api/roles/:id
pub async fn delete_role(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = RoleRepository::new(state.pool.clone());
    let role: Role = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Role", id))?
        .into();
    ensure_role_deletable(&role)?;

    repo.delete(id).await?;

    info!(role_id = id, name = %role.name, "Role deleted");
    Ok(Json(MessageResponse::new("Role deleted")))
}
