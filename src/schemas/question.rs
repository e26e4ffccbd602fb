use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Question;

/// Body of question create and update. `option_a` is the correct answer.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuestionInput {
    pub(crate) subject_id: i64,
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub(crate) text: String,
    #[validate(length(min = 1, message = "option_a must not be empty"))]
    pub(crate) option_a: String,
    #[validate(length(min = 1, message = "option_b must not be empty"))]
    pub(crate) option_b: String,
    #[validate(length(min = 1, message = "option_c must not be empty"))]
    pub(crate) option_c: String,
    #[validate(length(min = 1, message = "option_d must not be empty"))]
    pub(crate) option_d: String,
    #[serde(default)]
    pub(crate) image_url: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListQuestionsQuery {
    #[serde(default)]
    pub(crate) subject_id: Option<i64>,
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[serde(default)]
    pub(crate) text: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuestionResponse {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) subject_id: i64,
    pub(crate) text: String,
    pub(crate) option_a: String,
    pub(crate) option_b: String,
    pub(crate) option_c: String,
    pub(crate) option_d: String,
    pub(crate) image_url: Option<String>,
    pub(crate) created_at: String,
}

impl QuestionResponse {
    pub(crate) fn from_db(question: Question) -> Self {
        Self {
            id: question.id,
            user_id: question.user_id,
            subject_id: question.subject_id,
            text: question.text,
            option_a: question.option_a,
            option_b: question.option_b,
            option_c: question.option_c,
            option_d: question.option_d,
            image_url: question.image_url,
            created_at: format_primitive(question.created_at),
        }
    }
}
