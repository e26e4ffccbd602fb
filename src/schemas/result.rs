//! Results, quiz completion and stored answers.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::QuizResult;
use crate::repositories::results::ResultRow;
use crate::repositories::user_answers::UserAnswerRow;

#[derive(Debug, Deserialize)]
pub(crate) struct ListResultsQuery {
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[serde(default)]
    pub(crate) quiz_id: Option<i64>,
    #[serde(default)]
    pub(crate) group_id: Option<i64>,
    #[serde(default)]
    pub(crate) subject_id: Option<i64>,
    #[serde(default)]
    pub(crate) grade: Option<i32>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RefSummary {
    pub(crate) id: i64,
    pub(crate) name: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizRef {
    pub(crate) id: i64,
    pub(crate) title: String,
    pub(crate) attempt: i32,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentRef {
    pub(crate) full_name: String,
    pub(crate) student_id_number: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ResultResponse {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) quiz_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
    pub(crate) correct_answers: i32,
    pub(crate) wrong_answers: i32,
    pub(crate) grade: i32,
    pub(crate) created_at: String,
    pub(crate) user: Option<RefSummary>,
    pub(crate) quiz: Option<QuizRef>,
    pub(crate) subject: Option<RefSummary>,
    pub(crate) group: Option<RefSummary>,
    pub(crate) student: Option<StudentRef>,
}

fn summary(id: Option<i64>, name: Option<String>) -> Option<RefSummary> {
    Some(RefSummary { id: id?, name: name? })
}

impl ResultResponse {
    pub(crate) fn from_row(row: ResultRow) -> Self {
        let quiz = match (row.quiz_id, row.quiz_title, row.quiz_attempt) {
            (Some(id), Some(title), Some(attempt)) => Some(QuizRef { id, title, attempt }),
            _ => None,
        };
        let student = row.student_full_name.map(|full_name| StudentRef {
            full_name,
            student_id_number: row.student_id_number,
        });
        Self {
            id: row.id,
            user_id: row.user_id,
            quiz_id: row.quiz_id,
            group_id: row.group_id,
            subject_id: row.subject_id,
            correct_answers: row.correct_answers,
            wrong_answers: row.wrong_answers,
            grade: row.grade,
            created_at: format_primitive(row.created_at),
            user: summary(row.user_id, row.username),
            quiz,
            subject: summary(row.subject_id, row.subject_name),
            group: summary(row.group_id, row.group_name),
            student,
        }
    }
}

#[derive(Debug, Deserialize, Serialize)]
pub(crate) struct AnswerInput {
    pub(crate) question_id: i64,
    pub(crate) answer: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct QuizEndRequest {
    pub(crate) quiz_id: i64,
    #[validate(length(max = 1000, message = "too many answers"))]
    #[serde(default)]
    pub(crate) answers: Vec<AnswerInput>,
}

#[derive(Debug, Serialize)]
pub(crate) struct QuizEndResponse {
    pub(crate) id: i64,
    pub(crate) quiz_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
    pub(crate) correct_answers: i32,
    pub(crate) wrong_answers: i32,
    pub(crate) grade: i32,
    pub(crate) created_at: String,
}

impl QuizEndResponse {
    pub(crate) fn from_db(result: QuizResult) -> Self {
        Self {
            id: result.id,
            quiz_id: result.quiz_id,
            group_id: result.group_id,
            subject_id: result.subject_id,
            correct_answers: result.correct_answers,
            wrong_answers: result.wrong_answers,
            grade: result.grade,
            created_at: format_primitive(result.created_at),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListUserAnswersQuery {
    #[serde(default)]
    pub(crate) user_id: Option<i64>,
    #[serde(default)]
    pub(crate) quiz_id: Option<i64>,
    #[serde(default)]
    pub(crate) question_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct AnsweredQuestion {
    pub(crate) text: String,
    pub(crate) option_a: Option<String>,
    pub(crate) option_b: Option<String>,
    pub(crate) option_c: Option<String>,
    pub(crate) option_d: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserAnswerResponse {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) quiz_id: Option<i64>,
    pub(crate) question_id: Option<i64>,
    pub(crate) answer: Option<String>,
    pub(crate) correct_answer: Option<String>,
    pub(crate) is_correct: bool,
    pub(crate) created_at: String,
    pub(crate) question: Option<AnsweredQuestion>,
}

impl UserAnswerResponse {
    pub(crate) fn from_row(row: UserAnswerRow) -> Self {
        let question = row.question_text.map(|text| AnsweredQuestion {
            text,
            option_a: row.option_a,
            option_b: row.option_b,
            option_c: row.option_c,
            option_d: row.option_d,
        });
        Self {
            id: row.id,
            user_id: row.user_id,
            quiz_id: row.quiz_id,
            question_id: row.question_id,
            answer: row.answer,
            correct_answer: row.correct_answer,
            is_correct: row.is_correct,
            created_at: format_primitive(row.created_at),
            question,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_end_request_caps_answer_count() {
        let request: QuizEndRequest = serde_json::from_value(serde_json::json!({
            "quiz_id": 1,
            "answers": [{"question_id": 2, "answer": "right"}]
        }))
        .expect("request");
        assert!(request.validate().is_ok());

        let oversized = QuizEndRequest {
            quiz_id: 1,
            answers: (0..1001)
                .map(|id| AnswerInput { question_id: id, answer: "a".to_string() })
                .collect(),
        };
        assert!(oversized.validate().is_err());
    }
}
