use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStaff, CurrentUser};
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::core::state::AppState;
use crate::repositories::{self, results::ResultFilter};
use crate::schemas::result::{ListResultsQuery, ResultResponse};
use crate::schemas::DeletedResponse;
use crate::services::visibility;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_results))
        .route("/:result_id", get(get_result).delete(delete_result))
}

async fn list_results(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(params): Query<ListResultsQuery>,
) -> Result<Json<PaginatedResponse<ResultResponse>>, ApiError> {
    let window = page.window();
    let scope = visibility::resolve_scope(state.db(), &actor)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve visibility"))?;
    let filter = ResultFilter {
        user_id: params.user_id,
        quiz_id: params.quiz_id,
        group_id: params.group_id,
        subject_id: params.subject_id,
        grade: params.grade,
    };

    let listing = repositories::results::list(state.db(), &scope, &filter, window)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list results"))?;

    Ok(Json(PaginatedResponse::new(listing.map(ResultResponse::from_row), window)))
}

async fn get_result(
    Path(result_id): Path<i64>,
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<ResultResponse>, ApiError> {
    let scope = visibility::resolve_scope(state.db(), &actor)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve visibility"))?;

    let row = repositories::results::find_row(state.db(), result_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch result"))?
        .filter(|row| scope.admits(row.group_id, row.subject_id))
        .ok_or_else(|| ApiError::NotFound("Result not found".to_string()))?;

    Ok(Json(ResultResponse::from_row(row)))
}

async fn delete_result(
    Path(result_id): Path<i64>,
    CurrentStaff(actor): CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let scope = visibility::resolve_scope(state.db(), &actor)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve visibility"))?;
    repositories::results::find_row(state.db(), result_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch result"))?
        .filter(|row| scope.admits(row.group_id, row.subject_id))
        .ok_or_else(|| ApiError::NotFound("Result not found".to_string()))?;

    let deleted = repositories::results::delete(state.db(), result_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete result"))?;
    if !deleted {
        return Err(ApiError::NotFound("Result not found".to_string()));
    }

    Ok(Json(DeletedResponse::new(result_id)))
}

#[cfg(test)]
mod tests;
