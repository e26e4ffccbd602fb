//! `/kafedras`: departments, each optionally attached to a faculty.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentAdmin, CurrentUser};
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::api::validation::{required_text, validate_payload};
use crate::core::state::AppState;
use crate::repositories::{self, kafedras::KafedraFilter};
use crate::schemas::dictionary::{KafedraInput, KafedraResponse, ListKafedrasQuery};
use crate::schemas::DeletedResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_kafedras).post(create_kafedra))
        .route("/:kafedra_id", get(get_kafedra).put(update_kafedra).delete(delete_kafedra))
}

fn write_error(err: sqlx::Error, context: &str) -> ApiError {
    match ApiError::from_write(err, context) {
        ApiError::Conflict(_) => {
            ApiError::Conflict("Kafedra with this name already exists".to_string())
        }
        ApiError::BadRequest(_) => ApiError::BadRequest("Faculty not found".to_string()),
        other => other,
    }
}

async fn create_kafedra(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<KafedraInput>,
) -> Result<(StatusCode, Json<KafedraResponse>), ApiError> {
    validate_payload(&payload)?;
    let name = required_text("name", &payload.name)?;

    let kafedra = repositories::kafedras::create(state.db(), &name, payload.faculty_id)
        .await
        .map_err(|e| write_error(e, "Failed to create kafedra"))?;

    Ok((StatusCode::CREATED, Json(KafedraResponse::from_db(kafedra))))
}

async fn list_kafedras(
    CurrentUser(_actor): CurrentUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(params): Query<ListKafedrasQuery>,
) -> Result<Json<PaginatedResponse<KafedraResponse>>, ApiError> {
    let window = page.window();
    let filter = KafedraFilter { name: params.name, faculty_id: params.faculty_id };
    let listing = repositories::kafedras::list(state.db(), &filter, window)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list kafedras"))?;

    Ok(Json(PaginatedResponse::new(listing.map(KafedraResponse::from_db), window)))
}

async fn get_kafedra(
    Path(kafedra_id): Path<i64>,
    CurrentUser(_actor): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<KafedraResponse>, ApiError> {
    let kafedra = repositories::kafedras::find_by_id(state.db(), kafedra_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch kafedra"))?
        .ok_or_else(|| ApiError::NotFound("Kafedra not found".to_string()))?;

    Ok(Json(KafedraResponse::from_db(kafedra)))
}

async fn update_kafedra(
    Path(kafedra_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<KafedraInput>,
) -> Result<Json<KafedraResponse>, ApiError> {
    validate_payload(&payload)?;
    let name = required_text("name", &payload.name)?;

    let kafedra =
        repositories::kafedras::update(state.db(), kafedra_id, &name, payload.faculty_id)
            .await
            .map_err(|e| write_error(e, "Failed to update kafedra"))?
            .ok_or_else(|| ApiError::NotFound("Kafedra not found".to_string()))?;

    Ok(Json(KafedraResponse::from_db(kafedra)))
}

async fn delete_kafedra(
    Path(kafedra_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = repositories::kafedras::delete(state.db(), kafedra_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete kafedra"))?;
    if !deleted {
        return Err(ApiError::NotFound("Kafedra not found".to_string()));
    }

    Ok(Json(DeletedResponse::new(kafedra_id)))
}
