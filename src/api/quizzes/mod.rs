mod handlers;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(handlers::create_quiz).get(handlers::list_quizzes))
        .route(
            "/upload",
            // Size is enforced against the configured limit while streaming.
            post(handlers::upload_image).layer(DefaultBodyLimit::disable()),
        )
        .route(
            "/:quiz_id",
            get(handlers::get_quiz).put(handlers::update_quiz).delete(handlers::delete_quiz),
        )
        .route("/:quiz_id/repeat", post(handlers::repeat_quiz))
}

#[cfg(test)]
mod tests;
