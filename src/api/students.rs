use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::api::validation::{full_name, validate_payload};
use crate::core::state::AppState;
use crate::repositories::{
    self,
    students::{CreateStudent, StudentFilter},
};
use crate::schemas::people::{ListStudentsQuery, StudentCreate, StudentGroupUpdate, StudentResponse};
use crate::schemas::DeletedResponse;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_students).post(create_student))
        .route("/:student_id", get(get_student).delete(delete_student))
        .route("/:student_id/group", put(set_group))
}

async fn create_student(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<StudentCreate>,
) -> Result<(StatusCode, Json<StudentResponse>), ApiError> {
    validate_payload(&payload)?;
    let full_name = full_name(&payload.first_name, &payload.last_name, &payload.third_name);
    let student_id_number = payload
        .student_id_number
        .as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty());

    let student = repositories::students::create(
        state.db(),
        CreateStudent {
            user_id: payload.user_id,
            first_name: payload.first_name.trim(),
            last_name: payload.last_name.trim(),
            third_name: payload.third_name.trim(),
            full_name: &full_name,
            student_id_number,
            group_id: payload.group_id,
        },
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to create student"))?;

    Ok((StatusCode::CREATED, Json(StudentResponse::from_db(student))))
}

async fn list_students(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(params): Query<ListStudentsQuery>,
) -> Result<Json<PaginatedResponse<StudentResponse>>, ApiError> {
    let window = page.window();
    let listing = repositories::students::list(
        state.db(),
        &StudentFilter { full_name: params.full_name, group_id: params.group_id },
        window,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(PaginatedResponse::new(listing.map(StudentResponse::from_db), window)))
}

async fn get_student(
    Path(student_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = repositories::students::find_by_id(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    Ok(Json(StudentResponse::from_db(student)))
}

async fn set_group(
    Path(student_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<StudentGroupUpdate>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = repositories::students::set_group(state.db(), student_id, payload.group_id)
        .await
        .map_err(|e| ApiError::from_write(e, "Failed to update student group"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    Ok(Json(StudentResponse::from_db(student)))
}

async fn delete_student(
    Path(student_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = repositories::students::delete(state.db(), student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete student"))?;
    if !deleted {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    Ok(Json(DeletedResponse::new(student_id)))
}
