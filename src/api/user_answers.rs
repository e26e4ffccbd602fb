use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::Deserialize;

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::api::pagination::{default_page, PageQuery, PaginatedResponse};
use crate::core::state::AppState;
use crate::db::types::RoleKind;
use crate::repositories::{self, user_answers::UserAnswerFilter};
use crate::schemas::result::{ListUserAnswersQuery, UserAnswerResponse};

const fn default_answers_limit() -> i64 {
    50
}

/// Answers are listed per attempt, so the page is larger than elsewhere.
#[derive(Debug, Clone, Copy, Deserialize)]
struct AnswersPage {
    #[serde(default = "default_page")]
    page: i64,
    #[serde(default = "default_answers_limit")]
    limit: i64,
}

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/", get(list_user_answers))
}

async fn list_user_answers(
    CurrentUser(actor): CurrentUser,
    State(state): State<AppState>,
    Query(page): Query<AnswersPage>,
    Query(params): Query<ListUserAnswersQuery>,
) -> Result<Json<PaginatedResponse<UserAnswerResponse>>, ApiError> {
    let window = PageQuery { page: page.page, limit: page.limit }.window();
    let user_id = if actor.scoping_role() == RoleKind::Student {
        Some(actor.id())
    } else {
        params.user_id
    };
    let filter =
        UserAnswerFilter { user_id, quiz_id: params.quiz_id, question_id: params.question_id };

    let listing = repositories::user_answers::list(state.db(), &filter, window)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list user answers"))?;

    Ok(Json(PaginatedResponse::new(listing.map(UserAnswerResponse::from_row), window)))
}
