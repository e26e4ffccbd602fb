use axum::{
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::{CurrentStaff, CurrentUser};
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::db::models::Quiz;
use crate::repositories::{
    self,
    quizzes::{QuizFilter, UpdateQuiz},
};
use crate::schemas::question::QuestionResponse;
use crate::schemas::quiz::{
    ListQuizzesQuery, QuizCreate, QuizDetailResponse, QuizResponse, QuizUpdate, UploadResponse,
};
use crate::schemas::DeletedResponse;
use crate::services::quiz_composition::{self, NewQuiz};
use crate::services::identity::Actor;
use crate::services::visibility;

/// Loads `quiz_id` when the caller's scope admits it. Hidden quizzes read as missing.
async fn visible_quiz(state: &AppState, actor: &Actor, quiz_id: i64) -> Result<Quiz, ApiError> {
    let scope = visibility::resolve_scope(state.db(), actor)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve visibility"))?;

    repositories::quizzes::find_by_id(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz"))?
        .filter(|quiz| scope.admits(quiz.group_id, quiz.subject_id))
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))
}

pub(super) async fn create_quiz(
    CurrentStaff(_actor): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<QuizCreate>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    validate_payload(&payload)?;

    let quiz = quiz_composition::create(
        state.db(),
        NewQuiz {
            title: payload.title,
            question_number: payload.question_number,
            duration: payload.duration,
            pin: payload.pin,
            is_active: payload.is_active,
            user_id: payload.user_id,
            group_id: payload.group_id,
            subject_id: payload.subject_id,
        },
    )
    .await?;

    Ok((StatusCode::CREATED, Json(QuizResponse::from_db(quiz))))
}

pub(super) async fn list_quizzes(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(params): Query<ListQuizzesQuery>,
) -> Result<Json<PaginatedResponse<QuizResponse>>, ApiError> {
    let window = page.window();
    let scope = visibility::resolve_scope(state.db(), &actor)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to resolve visibility"))?;
    let filter = QuizFilter {
        title: params.title,
        user_id: params.user_id,
        group_id: params.group_id,
        subject_id: params.subject_id,
        is_active: params.is_active,
    };

    let listing = repositories::quizzes::list(state.db(), &scope, &filter, window)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list quizzes"))?;

    Ok(Json(PaginatedResponse::new(listing.map(QuizResponse::from_db), window)))
}

pub(super) async fn get_quiz(
    Path(quiz_id): Path<i64>,
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
) -> Result<Json<QuizDetailResponse>, ApiError> {
    let quiz = visible_quiz(&state, &actor, quiz_id).await?;

    let questions = repositories::questions::linked_to_quiz(state.db(), quiz.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch quiz questions"))?;

    Ok(Json(QuizDetailResponse {
        quiz: QuizResponse::from_db(quiz),
        questions: questions.into_iter().map(QuestionResponse::from_db).collect(),
    }))
}

pub(super) async fn update_quiz(
    Path(quiz_id): Path<i64>,
    CurrentStaff(actor): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<QuizUpdate>,
) -> Result<Json<QuizResponse>, ApiError> {
    validate_payload(&payload)?;
    visible_quiz(&state, &actor, quiz_id).await?;

    let params = UpdateQuiz {
        title: payload.title.map(|title| title.trim().to_string()),
        question_number: payload.question_number,
        duration: payload.duration,
        pin: payload.pin.map(|pin| pin.trim().to_string()),
        is_active: payload.is_active,
        group_id: payload.group_id,
        subject_id: payload.subject_id,
    };
    if params.title.as_deref().is_some_and(str::is_empty) {
        return Err(ApiError::BadRequest("title must not be empty".to_string()));
    }

    let quiz = repositories::quizzes::update(state.db(), quiz_id, params)
        .await
        .map_err(|e| ApiError::from_write(e, "Failed to update quiz"))?
        .ok_or_else(|| ApiError::NotFound("Quiz not found".to_string()))?;

    Ok(Json(QuizResponse::from_db(quiz)))
}

pub(super) async fn delete_quiz(
    Path(quiz_id): Path<i64>,
    CurrentStaff(actor): CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    visible_quiz(&state, &actor, quiz_id).await?;
    let deleted = repositories::quizzes::delete(state.db(), quiz_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete quiz"))?;
    if !deleted {
        return Err(ApiError::NotFound("Quiz not found".to_string()));
    }

    Ok(Json(DeletedResponse::new(quiz_id)))
}

pub(super) async fn repeat_quiz(
    Path(quiz_id): Path<i64>,
    CurrentStaff(actor): CurrentStaff,
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<QuizResponse>), ApiError> {
    visible_quiz(&state, &actor, quiz_id).await?;
    let quiz = quiz_composition::repeat(state.db(), quiz_id).await?;

    Ok((StatusCode::CREATED, Json(QuizResponse::from_db(quiz))))
}

pub(super) async fn upload_image(
    CurrentStaff(_actor): CurrentStaff,
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ApiError> {
    let uploads = state.uploads();
    let max_bytes = uploads.max_bytes();

    let mut file: Option<(String, Vec<u8>)> = None;
    while let Some(mut field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Invalid multipart data".to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let filename = field
            .file_name()
            .map(str::to_string)
            .ok_or_else(|| ApiError::BadRequest("File name is required".to_string()))?;
        // Reject unsupported files before reading the body.
        uploads.accepted_extension(&filename)?;

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .chunk()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read file".to_string()))?
        {
            if bytes.len() as u64 + chunk.len() as u64 > max_bytes {
                return Err(ApiError::BadRequest(format!(
                    "File size exceeds {}MB limit",
                    uploads.max_upload_size_mb()
                )));
            }
            bytes.extend_from_slice(&chunk);
        }
        file = Some((filename, bytes));
    }

    let (filename, bytes) =
        file.ok_or_else(|| ApiError::BadRequest("File is required".to_string()))?;
    let stored = uploads.store(&filename, &bytes).await?;

    Ok(Json(UploadResponse { url: stored.url }))
}
