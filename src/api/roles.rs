use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{delete, get},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::repositories::{self, roles::RoleFilter};
use crate::schemas::dictionary::NamedEntityResponse;
use crate::schemas::user::{
    ListRolesQuery, RoleCreate, RolePermissionsResponse, RolePermissionsUpdate, RoleResponse,
};
use crate::schemas::DeletedResponse;
use crate::services::role_permissions;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_roles).post(create_role))
        .route("/:role_id", delete(delete_role))
        .route("/:role_id/permissions", get(list_permissions).put(replace_permissions))
}

async fn create_role(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<RoleCreate>,
) -> Result<(StatusCode, Json<RoleResponse>), ApiError> {
    validate_payload(&payload)?;
    let name = payload.name.trim().to_lowercase();
    if name.is_empty() {
        return Err(ApiError::BadRequest("name must not be empty".to_string()));
    }

    let role = repositories::roles::create(state.db(), &name)
        .await
        .map_err(|e| ApiError::from_write(e, "Failed to create role"))?;

    Ok((StatusCode::CREATED, Json(RoleResponse::from_db(role))))
}

async fn list_roles(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(params): Query<ListRolesQuery>,
) -> Result<Json<PaginatedResponse<RoleResponse>>, ApiError> {
    let window = page.window();
    let listing =
        repositories::roles::list(state.db(), &RoleFilter { name: params.name }, window)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to list roles"))?;

    Ok(Json(PaginatedResponse::new(listing.map(RoleResponse::from_db), window)))
}

async fn delete_role(
    Path(role_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = repositories::roles::delete(state.db(), role_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete role"))?;
    if !deleted {
        return Err(ApiError::NotFound("Role not found".to_string()));
    }

    Ok(Json(DeletedResponse::new(role_id)))
}

async fn list_permissions(
    Path(role_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<RolePermissionsResponse>, ApiError> {
    repositories::roles::find_by_id(state.db(), role_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch role"))?
        .ok_or_else(|| ApiError::NotFound("Role not found".to_string()))?;
    let permissions = repositories::roles::permissions_for_role(state.db(), role_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch role permissions"))?;

    Ok(Json(RolePermissionsResponse {
        role_id,
        permissions: permissions.into_iter().map(NamedEntityResponse::from_db).collect(),
    }))
}

/// Replaces every permission of the role with `permission_ids`.
async fn replace_permissions(
    Path(role_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<RolePermissionsUpdate>,
) -> Result<Json<RolePermissionsResponse>, ApiError> {
    let permissions =
        role_permissions::assign(state.db(), role_id, &payload.permission_ids).await?;

    Ok(Json(RolePermissionsResponse {
        role_id,
        permissions: permissions.into_iter().map(NamedEntityResponse::from_db).collect(),
    }))
}
