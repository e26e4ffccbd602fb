use axum::{extract::State, http::StatusCode, routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::validation::validate_payload;
use crate::core::state::AppState;
use crate::schemas::result::{QuizEndRequest, QuizEndResponse};
use crate::services::grading::{self, SubmittedAnswer};

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/end", post(end_quiz))
}

async fn end_quiz(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Json(payload): Json<QuizEndRequest>,
) -> Result<(StatusCode, Json<QuizEndResponse>), ApiError> {
    validate_payload(&payload)?;

    let answers = payload
        .answers
        .into_iter()
        .map(|input| SubmittedAnswer { question_id: input.question_id, answer: input.answer })
        .collect::<Vec<_>>();
    let result = grading::complete(state.db(), &actor, payload.quiz_id, &answers).await?;

    Ok((StatusCode::CREATED, Json(QuizEndResponse::from_db(result))))
}
