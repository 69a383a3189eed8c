//! Menu button routes.
//!
//! Buttons form a tree. A button with children cannot be deleted, and a
//! button cannot be moved under itself or one of its descendants.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::common::dedup_ids;
use domain::models::{
    BulkActionResponse, BulkIdsRequest, MenuButton, MenuButtonQuery, MenuButtonRequest,
    MenuTreeNode, MessageResponse,
};
use domain::services::{build_tree, ensure_deletable, ensure_valid_parent};
use persistence::repositories::{MenuButtonFilter, MenuButtonRepository};
use shared::pagination::{PageRequest, Paginated};
use tracing::info;

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery};

/// GET /api/menu-buttons
pub async fn list_menu_buttons(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<MenuButtonQuery>,
) -> Result<Json<Paginated<MenuButton>>, ApiError> {
    let repo = MenuButtonRepository::new(state.pool.clone());
    let page = PageRequest::new(query.page, query.per_page);
    let filter = MenuButtonFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        parent_id: query.parent_id,
        root_only: query.root_only.unwrap_or(false),
    };

    let total = repo.count(&filter).await?;
    let rows = repo
        .list(&filter, query.order.unwrap_or_default(), page)
        .await?;

    Ok(Json(Paginated::new(rows, page, total).map(MenuButton::from)))
}

/// Whole menu as a forest, ordered by `sort_order`.
///
/// GET /api/menu-buttons/tree
pub async fn menu_tree(State(state): State<AppState>) -> Result<Json<Vec<MenuTreeNode>>, ApiError> {
    let repo = MenuButtonRepository::new(state.pool.clone());
    let buttons = repo
        .find_all()
        .await?
        .into_iter()
        .map(MenuButton::from)
        .collect();
    Ok(Json(build_tree(buttons)))
}

/// POST /api/menu-buttons
pub async fn create_menu_button(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<MenuButtonRequest>,
) -> Result<(StatusCode, Json<MenuButton>), ApiError> {
    let repo = MenuButtonRepository::new(state.pool.clone());
    if let Some(parent_id) = request.parent_id {
        if repo.find_by_id(parent_id).await?.is_none() {
            return Err(parent_missing(parent_id));
        }
    }

    let button: MenuButton = repo.create(&request).await?.into();

    info!(
        menu_button_id = button.id,
        parent_id = ?button.parent_id,
        label = %button.label,
        "Menu button created"
    );
    Ok((StatusCode::CREATED, Json(button)))
}

/// GET /api/menu-buttons/:id
pub async fn get_menu_button(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MenuButton>, ApiError> {
    let repo = MenuButtonRepository::new(state.pool.clone());
    let button = repo
        .find_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu button", id))?;
    Ok(Json(button.into()))
}

/// Replace a menu button, possibly moving it in the tree.
///
/// PUT /api/menu-buttons/:id
pub async fn update_menu_button(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<MenuButtonRequest>,
) -> Result<Json<MenuButton>, ApiError> {
    let repo = MenuButtonRepository::new(state.pool.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Menu button", id));
    }

    if let Some(parent_id) = request.parent_id {
        let ancestors = if parent_id == id {
            Vec::new()
        } else {
            let chain = repo.ancestor_ids(parent_id).await?;
            if chain.is_empty() {
                return Err(parent_missing(parent_id));
            }
            chain
        };
        ensure_valid_parent(id, Some(parent_id), &ancestors)?;
    }

    let button = repo
        .update(id, &request)
        .await?
        .ok_or_else(|| ApiError::not_found("Menu button", id))?;

    info!(menu_button_id = id, "Menu button updated");
    Ok(Json(button.into()))
}

/// Delete a leaf menu button.
///
/// DELETE /api/menu-buttons/:id
pub async fn delete_menu_button(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let repo = MenuButtonRepository::new(state.pool.clone());
    if repo.find_by_id(id).await?.is_none() {
        return Err(ApiError::not_found("Menu button", id));
    }

    ensure_deletable(id, repo.count_children(id).await?)?;
    repo.delete(id).await?;

    info!(menu_button_id = id, "Menu button deleted");
    Ok(Json(MessageResponse::new("Menu button deleted")))
}

/// Delete several buttons. Refused as a whole when any of them has children.
///
/// POST /api/menu-buttons/bulk-delete
pub async fn bulk_delete_menu_buttons(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkIdsRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    let repo = MenuButtonRepository::new(state.pool.clone());
    let ids = dedup_ids(&request.ids);

    let blocked = repo.ids_with_children(&ids).await?;
    if !blocked.is_empty() {
        let list = blocked
            .iter()
            .map(i64::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        return Err(ApiError::DomainRule(format!(
            "Menu buttons with child buttons cannot be deleted: {}",
            list
        )));
    }

    let affected = repo.bulk_delete(&ids).await?;

    info!(affected, "Menu buttons bulk deleted");
    Ok(Json(BulkActionResponse { affected }))
}

fn parent_missing(parent_id: i64) -> ApiError {
    ApiError::validation(format!("Parent menu button {} does not exist", parent_id))
}
