use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentAdmin;
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::api::validation::{full_name, validate_payload};
use crate::core::state::AppState;
use crate::repositories::{
    self,
    dictionaries::Dictionary,
    teachers::{CreateTeacher, TeacherFilter, UpdateTeacher},
};
use crate::schemas::dictionary::NamedEntityResponse;
use crate::schemas::people::{
    AssignGroupsRequest, AssignSubjectsRequest, GroupAssignmentResponse, ListTeachersQuery,
    SubjectAssignmentResponse, TeacherCreate, TeacherDetailResponse, TeacherResponse,
    TeacherUpdate,
};
use crate::schemas::DeletedResponse;
use crate::services::teacher_assignments;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_teachers).post(create_teacher))
        .route("/assign-groups", post(assign_groups))
        .route("/assign-subjects", post(assign_subjects))
        .route("/:teacher_id", get(get_teacher).put(update_teacher).delete(delete_teacher))
}

async fn create_teacher(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<TeacherCreate>,
) -> Result<(StatusCode, Json<TeacherResponse>), ApiError> {
    validate_payload(&payload)?;
    let full_name = full_name(&payload.first_name, &payload.last_name, &payload.third_name);

    let teacher = repositories::teachers::create(
        state.db(),
        CreateTeacher {
            user_id: payload.user_id,
            first_name: payload.first_name.trim(),
            last_name: payload.last_name.trim(),
            third_name: payload.third_name.trim(),
            full_name: &full_name,
            kafedra_id: payload.kafedra_id,
        },
    )
    .await
    .map_err(|e| ApiError::from_write(e, "Failed to create teacher"))?;

    Ok((StatusCode::CREATED, Json(TeacherResponse::from_db(teacher))))
}

async fn list_teachers(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(params): Query<ListTeachersQuery>,
) -> Result<Json<PaginatedResponse<TeacherResponse>>, ApiError> {
    let window = page.window();
    let listing = repositories::teachers::list(
        state.db(),
        &TeacherFilter { full_name: params.full_name, kafedra_id: params.kafedra_id },
        window,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to list teachers"))?;

    Ok(Json(PaginatedResponse::new(listing.map(TeacherResponse::from_db), window)))
}

async fn get_teacher(
    Path(teacher_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<TeacherDetailResponse>, ApiError> {
    let teacher = repositories::teachers::find_by_id(state.db(), teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch teacher"))?
        .ok_or_else(|| ApiError::NotFound("Teacher not found".to_string()))?;

    let group_ids = repositories::teachers::assigned_group_ids(state.db(), teacher.user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch teacher groups"))?;
    let subject_ids = repositories::teachers::assigned_subject_ids(state.db(), teacher.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch teacher subjects"))?;

    let groups = repositories::dictionaries::by_ids(state.db(), Dictionary::Groups, &group_ids)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch groups"))?;
    let subjects =
        repositories::dictionaries::by_ids(state.db(), Dictionary::Subjects, &subject_ids)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to fetch subjects"))?;

    Ok(Json(TeacherDetailResponse {
        teacher: TeacherResponse::from_db(teacher),
        groups: groups.into_iter().map(NamedEntityResponse::from_db).collect(),
        subjects: subjects.into_iter().map(NamedEntityResponse::from_db).collect(),
    }))
}

/// Recomposes `full_name`; a name held by another teacher is a conflict.
async fn update_teacher(
    Path(teacher_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<TeacherUpdate>,
) -> Result<Json<TeacherResponse>, ApiError> {
    validate_payload(&payload)?;
    let full_name = full_name(&payload.first_name, &payload.last_name, &payload.third_name);

    let teacher = repositories::teachers::update(
        state.db(),
        teacher_id,
        UpdateTeacher {
            first_name: payload.first_name.trim(),
            last_name: payload.last_name.trim(),
            third_name: payload.third_name.trim(),
            full_name: &full_name,
            kafedra_id: payload.kafedra_id,
        },
    )
    .await
    .map_err(|e| match ApiError::from_write(e, "Failed to update teacher") {
        ApiError::Conflict(_) => ApiError::Conflict("Teacher name already taken".to_string()),
        other => other,
    })?
    .ok_or_else(|| ApiError::NotFound("Teacher not found".to_string()))?;

    Ok(Json(TeacherResponse::from_db(teacher)))
}

async fn delete_teacher(
    Path(teacher_id): Path<i64>,
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = repositories::teachers::delete(state.db(), teacher_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete teacher"))?;
    if !deleted {
        return Err(ApiError::NotFound("Teacher not found".to_string()));
    }

    Ok(Json(DeletedResponse::new(teacher_id)))
}

async fn assign_groups(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<AssignGroupsRequest>,
) -> Result<Json<GroupAssignmentResponse>, ApiError> {
    let group_ids =
        teacher_assignments::assign_groups(state.db(), payload.user_id, &payload.group_ids).await?;

    Ok(Json(GroupAssignmentResponse { user_id: payload.user_id, group_ids }))
}

async fn assign_subjects(
    CurrentAdmin(_admin): CurrentAdmin,
    State(state): State<AppState>,
    Json(payload): Json<AssignSubjectsRequest>,
) -> Result<Json<SubjectAssignmentResponse>, ApiError> {
    let subject_ids =
        teacher_assignments::assign_subjects(state.db(), payload.teacher_id, &payload.subject_ids)
            .await?;

    Ok(Json(SubjectAssignmentResponse { teacher_id: payload.teacher_id, subject_ids }))
}
