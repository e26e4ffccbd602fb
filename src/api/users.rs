use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::api::validation::{normalize_username, validate_password_len, validate_payload};
use crate::core::security;
use crate::core::state::AppState;
use crate::repositories::{self, users::UserFilter};
use crate::schemas::user::{ListUsersQuery, UserCreate, UserResponse, UserRolesUpdate, UserSummary};
use crate::schemas::DeletedResponse;
use crate::services::teacher_assignments::normalize_ids;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_users).post(create_user))
        .route("/:user_id", get(get_user).delete(delete_user))
        .route("/:user_id/roles", put(replace_roles))
}

async fn create_user(
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<UserCreate>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    validate_payload(&payload)?;
    let username = normalize_username(&payload.username)?;
    validate_password_len(&payload.password)?;

    let mut role_names: Vec<String> =
        payload.roles.iter().map(|name| name.trim().to_lowercase()).collect();
    role_names.sort();
    role_names.dedup();

    let hashed_password = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let role_ids = repositories::roles::ids_by_names(&mut *tx, &role_names)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve roles"))?;
    if role_ids.len() != role_names.len() {
        return Err(ApiError::BadRequest("One or more roles not found".to_string()));
    }

    let user = repositories::users::create(&mut *tx, &username, &hashed_password)
        .await
        .map_err(|e| ApiError::from_write(e, "Failed to create user"))?;
    repositories::roles::grant_many(&mut *tx, user.id, &role_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to grant roles"))?;
    let roles = repositories::roles::for_user(&mut *tx, user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch roles"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;
    tracing::info!(user_id = user.id, created_by = admin.id(), "User created");

    Ok((StatusCode::CREATED, Json(UserResponse::from_db(user, roles))))
}

async fn list_users(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(params): Query<ListUsersQuery>,
) -> Result<Json<PaginatedResponse<UserSummary>>, ApiError> {
    let window = page.window();
    let listing = repositories::users::list(
        state.db(),
        &UserFilter { username: params.username },
        window,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list users"))?;

    Ok(Json(PaginatedResponse::new(listing.map(UserSummary::from_db), window)))
}

async fn get_user(
    Path(user_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = repositories::users::find_by_id(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    let roles = repositories::roles::for_user(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch roles"))?;

    Ok(Json(UserResponse::from_db(user, roles)))
}

/// Replaces every role of the user with `role_ids`.
async fn replace_roles(
    Path(user_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<UserRolesUpdate>,
) -> Result<Json<UserResponse>, ApiError> {
    let role_ids = normalize_ids(&payload.role_ids);

    let mut tx = state
        .db()
        .begin()
        .await
        .map_err(|e| ApiError::internal(e, "Failed to start transaction"))?;

    let user = repositories::users::find_by_id(&mut *tx, user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch user"))?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;

    let found = repositories::roles::count_existing(&mut *tx, &role_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve roles"))?;
    if found != role_ids.len() as i64 {
        return Err(ApiError::BadRequest("One or more roles not found".to_string()));
    }

    repositories::roles::revoke_all(&mut *tx, user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to revoke roles"))?;
    repositories::roles::grant_many(&mut *tx, user.id, &role_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to grant roles"))?;
    let roles = repositories::roles::for_user(&mut *tx, user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch roles"))?;

    tx.commit().await.map_err(|e| ApiError::internal(e, "Failed to commit transaction"))?;

    Ok(Json(UserResponse::from_db(user, roles)))
}

async fn delete_user(
    Path(user_id): Path<i64>,
    CurrentAdmin(admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    if admin.id() == user_id {
        return Err(ApiError::BadRequest("You cannot delete your own account".to_string()));
    }

    let deleted = repositories::users::delete(state.db(), user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete user"))?;
    if !deleted {
        return Err(ApiError::NotFound("User not found".to_string()));
    }

    Ok(Json(DeletedResponse::new(user_id)))
}
