//! Admin user routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use domain::models::{
    BulkActionResponse, BulkIdsRequest, CreateUserRequest, MessageResponse, UpdateUserRequest,
    User, UserQuery, UserResponse,
};
use persistence::repositories::{UserFilter, UserRepository};
use shared::pagination::{PageRequest, Paginated};

use crate::app::AppState;
use crate::error::ApiError;
use crate::extractors::{ValidatedJson, ValidatedQuery};
use crate::services::UserService;

/// List admin users with their roles.
///
/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<UserQuery>,
) -> Result<Json<Paginated<UserResponse>>, ApiError> {
    let repo = UserRepository::new(state.pool.clone());
    let page = PageRequest::new(query.page, query.per_page);
    let filter = UserFilter {
        search: query.search.filter(|s| !s.trim().is_empty()),
        role_id: query.role_id,
    };

    let total = repo.count(&filter).await?;
    let users: Vec<User> = repo
        .list(&filter, query.order.unwrap_or_default(), page)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let ids: Vec<i64> = users.iter().map(|u| u.id).collect();
    let mut roles = repo.roles_for_users(&ids).await?;

    Ok(Json(Paginated::new(users, page, total).map(|user| {
        UserResponse {
            roles: roles.remove(&user.id).unwrap_or_default(),
            user,
        }
    })))
}

/// POST /api/users
pub async fn create_user(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    let service = UserService::new(state.pool.clone());
    let user = service.create(&request).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// GET /api/users/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<UserResponse>, ApiError> {
    let service = UserService::new(state.pool.clone());
    Ok(Json(service.get(id).await?))
}

/// Replace a user's profile and roles. Omitting `password` keeps it.
///
/// PUT /api/users/:id
pub async fn update_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    ValidatedJson(request): ValidatedJson<UpdateUserRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let service = UserService::new(state.pool.clone());
    Ok(Json(service.update(id, &request).await?))
}

/// DELETE /api/users/:id
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    let service = UserService::new(state.pool.clone());
    service.delete(id).await?;
    Ok(Json(MessageResponse::new("User deleted")))
}

/// POST /api/users/bulk-delete
pub async fn bulk_delete_users(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<BulkIdsRequest>,
) -> Result<Json<BulkActionResponse>, ApiError> {
    let service = UserService::new(state.pool.clone());
    let affected = service.bulk_delete(&request.ids).await?;
    Ok(Json(BulkActionResponse { affected }))
}
