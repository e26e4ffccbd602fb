use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentStaff;
use crate::api::pagination::{PageQuery, PaginatedResponse};
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::repositories::{
    self,
    questions::{QuestionFields, QuestionFilter},
};
use crate::schemas::question::{ListQuestionsQuery, QuestionInput, QuestionResponse};
use crate::schemas::DeletedResponse;
use crate::services::identity::Actor;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_questions).post(create_question))
        .route(
            "/:question_id",
            get(get_question).put(update_question).delete(delete_question),
        )
}

fn fields<'a>(payload: &'a QuestionInput, actor: &Actor) -> QuestionFields<'a> {
    QuestionFields {
        user_id: Some(payload.user_id.unwrap_or(actor.id())),
        subject_id: payload.subject_id,
        text: payload.text.trim(),
        option_a: payload.option_a.trim(),
        option_b: payload.option_b.trim(),
        option_c: payload.option_c.trim(),
        option_d: payload.option_d.trim(),
        image_url: payload.image_url.as_deref().map(str::trim).filter(|url| !url.is_empty()),
    }
}

async fn create_question(
    CurrentStaff(actor): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<QuestionInput>,
) -> Result<(StatusCode, Json<QuestionResponse>), ApiError> {
    validate_payload(&payload)?;

    let question = repositories::questions::create(state.db(), fields(&payload, &actor))
        .await
        .map_err(|e| ApiError::from_write(e, "Failed to create question"))?;

    Ok((StatusCode::CREATED, Json(QuestionResponse::from_db(question))))
}

async fn list_questions(
    CurrentStaff(_actor): CurrentStaff,
    State(state): State<AppState>,
    Query(page): Query<PageQuery>,
    Query(params): Query<ListQuestionsQuery>,
) -> Result<Json<PaginatedResponse<QuestionResponse>>, ApiError> {
    let window = page.window();
    let filter = QuestionFilter {
        subject_id: params.subject_id,
        user_id: params.user_id,
        text: params.text,
    };
    let listing = repositories::questions::list(state.db(), &filter, window)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list questions"))?;

    Ok(Json(PaginatedResponse::new(listing.map(QuestionResponse::from_db), window)))
}

async fn get_question(
    Path(question_id): Path<i64>,
    CurrentStaff(_actor): CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<QuestionResponse>, ApiError> {
    let question = repositories::questions::find_by_id(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to fetch question"))?
        .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(QuestionResponse::from_db(question)))
}

async fn update_question(
    Path(question_id): Path<i64>,
    CurrentStaff(actor): CurrentStaff,
    State(state): State<AppState>,
    Json(payload): Json<QuestionInput>,
) -> Result<Json<QuestionResponse>, ApiError> {
    validate_payload(&payload)?;

    let question =
        repositories::questions::update(state.db(), question_id, fields(&payload, &actor))
            .await
            .map_err(|e| ApiError::from_write(e, "Failed to update question"))?
            .ok_or_else(|| ApiError::NotFound("Question not found".to_string()))?;

    Ok(Json(QuestionResponse::from_db(question)))
}

async fn delete_question(
    Path(question_id): Path<i64>,
    CurrentStaff(_actor): CurrentStaff,
    State(state): State<AppState>,
) -> Result<Json<DeletedResponse>, ApiError> {
    let deleted = repositories::questions::delete(state.db(), question_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete question"))?;
    if !deleted {
        return Err(ApiError::NotFound("Question not found".to_string()));
    }

    Ok(Json(DeletedResponse::new(question_id)))
}
