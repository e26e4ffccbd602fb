use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Quiz;
use crate::schemas::question::QuestionResponse;

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizCreate {
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub(crate) title: String,
    #[validate(range(min = 0, message = "question_number must be non-negative"))]
    pub(crate) question_number: i32,
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub(crate) duration: i32,
    #[serde(default)]
    pub(crate) pin: Option<String>,
    #[serde(default = "default_true")]
    pub(crate) is_active: bool,
    /// Owner of the quiz; defaults to the caller.
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[serde(default)]
    pub(crate) group_id: Option<i64>,
    #[serde(default)]
    pub(crate) subject_id: Option<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizUpdate {
    #[serde(default)]
    #[validate(length(min = 1, max = 255, message = "title must be 1-255 characters"))]
    pub(crate) title: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0, message = "question_number must be non-negative"))]
    pub(crate) question_number: Option<i32>,
    #[serde(default)]
    #[validate(range(min = 1, message = "duration must be positive"))]
    pub(crate) duration: Option<i32>,
    #[serde(default)]
    #[validate(length(min = 1, message = "pin must not be empty"))]
    pub(crate) pin: Option<String>,
    #[serde(default)]
    pub(crate) is_active: Option<bool>,
    #[serde(default)]
    pub(crate) group_id: Option<i64>,
    #[serde(default)]
    pub(crate) subject_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuizzesQuery {
    #[serde(default)]
    pub(crate) title: Option<String>,
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[serde(default)]
    pub(crate) group_id: Option<i64>,
    #[serde(default)]
    pub(crate) subject_id: Option<i64>,
    #[serde(default)]
    pub(crate) is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizResponse {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) question_number: i32,
    pub(crate) duration: i32,
    pub(crate) pin: String,
    pub(crate) is_active: bool,
    pub(crate) attempt: i32,
    pub(crate) user_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl QuizResponse {
    pub(crate) fn from_db(quiz: Quiz) -> Self {
        Self {
            id: quiz.id,
            title: quiz.title,
            question_number: quiz.question_number,
            duration: quiz.duration,
            pin: quiz.pin,
            is_active: quiz.is_active,
            attempt: quiz.attempt,
            user_id: quiz.user_id,
            group_id: quiz.group_id,
            subject_id: quiz.subject_id,
            created_at: format_primitive(quiz.created_at),
            updated_at: format_primitive(quiz.updated_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizDetailResponse {
    #[serde(flatten)]
    pub(crate) quiz: QuizResponse,
    pub(crate) questions: Vec<QuestionResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UploadResponse {
    pub(crate) url: String,
}
