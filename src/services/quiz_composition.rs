//! Quiz creation and repetition, including the links they create as a side effect.
//!
//! Both operations run in a single transaction: the quiz row, its question links and the
//! teacher-group association are either all written or none are.

use sqlx::{PgConnection, PgPool};

use crate::core::metrics::{QUIZZES_CREATED, QUIZZES_REPEATED};
use crate::db::models::Quiz;
use crate::repositories::{self, quizzes::CreateQuiz};
use crate::services::access_codes;
use crate::services::ServiceError;

/// Attempt number every repeated quiz gets, whatever the source's attempt was.
pub(crate) const REPEATED_ATTEMPT: i32 = 2;

const FIRST_ATTEMPT: i32 = 1;

#[derive(Debug, Clone)]
pub(crate) struct NewQuiz {
    pub(crate) title: String,
    pub(crate) question_number: i32,
    pub(crate) duration: i32,
    /// Generated when `None` or blank.
    pub(crate) pin: Option<String>,
    pub(crate) is_active: bool,
    pub(crate) user_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
}

pub(crate) async fn create(pool: &PgPool, draft: NewQuiz) -> Result<Quiz, ServiceError> {
    let title = draft.title.trim();
    if title.is_empty() {
        return Err(ServiceError::Validation("title must not be empty".to_string()));
    }
    let pin = match draft.pin.as_deref().map(str::trim) {
        Some(pin) if !pin.is_empty() => pin.to_string(),
        _ => access_codes::generate_access_code(),
    };

    let mut tx = pool.begin().await?;

    let quiz = repositories::quizzes::create(
        &mut *tx,
        CreateQuiz {
            title,
            question_number: draft.question_number,
            duration: draft.duration,
            pin: &pin,
            is_active: draft.is_active,
            attempt: FIRST_ATTEMPT,
            user_id: draft.user_id,
            group_id: draft.group_id,
            subject_id: draft.subject_id,
        },
    )
    .await?;

    let linked = match (quiz.user_id, quiz.subject_id) {
        (Some(user_id), Some(subject_id)) => {
            repositories::quiz_questions::link_owned_questions(
                &mut *tx, quiz.id, user_id, subject_id,
            )
            .await?
        }
        _ => 0,
    };
    ensure_teacher_group(&mut tx, &quiz).await?;

    tx.commit().await?;

    metrics::counter!(QUIZZES_CREATED).increment(1);
    tracing::info!(quiz_id = quiz.id, linked_questions = linked, "Quiz created");
    Ok(quiz)
}

/// Clones `quiz_id` into a new quiz with a fresh access code and the same question links.
pub(crate) async fn repeat(pool: &PgPool, quiz_id: i64) -> Result<Quiz, ServiceError> {
    let mut tx = pool.begin().await?;

    let source = repositories::quizzes::find_by_id(&mut *tx, quiz_id)
        .await?
        .ok_or(ServiceError::NotFound("Quiz not found"))?;

    let pin = access_codes::generate_distinct_from(&source.pin);
    let quiz = repositories::quizzes::create(
        &mut *tx,
        CreateQuiz {
            title: &source.title,
            question_number: source.question_number,
            duration: source.duration,
            pin: &pin,
            is_active: source.is_active,
            attempt: REPEATED_ATTEMPT,
            user_id: source.user_id,
            group_id: source.group_id,
            subject_id: source.subject_id,
        },
    )
    .await?;

    let copied = repositories::quiz_questions::copy_links(&mut *tx, source.id, quiz.id).await?;
    ensure_teacher_group(&mut tx, &quiz).await?;

    tx.commit().await?;

    metrics::counter!(QUIZZES_REPEATED).increment(1);
    tracing::info!(
        source_quiz_id = source.id,
        quiz_id = quiz.id,
        copied_links = copied,
        "Quiz repeated"
    );
    Ok(quiz)
}

async fn ensure_teacher_group(conn: &mut PgConnection, quiz: &Quiz) -> Result<(), sqlx::Error> {
    if let (Some(user_id), Some(group_id)) = (quiz.user_id, quiz.group_id) {
        repositories::teachers::ensure_group_link(&mut *conn, user_id, group_id).await?;
    }
    Ok(())
}
