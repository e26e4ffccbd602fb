use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::services::listing::{push_eq, ListFilter, ListQuery, Listing, PageWindow};

/// A stored answer joined with the question it answers.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct UserAnswerRow {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) quiz_id: Option<i64>,
    pub(crate) question_id: Option<i64>,
    pub(crate) answer: Option<String>,
    pub(crate) correct_answer: Option<String>,
    pub(crate) is_correct: bool,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) question_text: Option<String>,
    pub(crate) option_a: Option<String>,
    pub(crate) option_b: Option<String>,
    pub(crate) option_c: Option<String>,
    pub(crate) option_d: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct UserAnswerFilter {
    pub(crate) user_id: Option<i64>,
    pub(crate) quiz_id: Option<i64>,
    pub(crate) question_id: Option<i64>,
}

impl ListFilter for UserAnswerFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_eq(builder, "ua.user_id", self.user_id);
        push_eq(builder, "ua.quiz_id", self.quiz_id);
        push_eq(builder, "ua.question_id", self.question_id);
    }
}

pub(crate) struct CreateUserAnswer<'a> {
    pub(crate) user_id: i64,
    pub(crate) quiz_id: i64,
    pub(crate) question_id: i64,
    pub(crate) answer: &'a str,
    pub(crate) correct_answer: &'a str,
    pub(crate) is_correct: bool,
}

pub(crate) async fn create(
    executor: impl PgExecutor<'_>,
    params: CreateUserAnswer<'_>,
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "INSERT INTO user_answers (
            user_id, quiz_id, question_id, answer, correct_answer, is_correct
         ) VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING id",
    )
    .bind(params.user_id)
    .bind(params.quiz_id)
    .bind(params.question_id)
    .bind(params.answer)
    .bind(params.correct_answer)
    .bind(params.is_correct)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &UserAnswerFilter,
    window: PageWindow,
) -> Result<Listing<UserAnswerRow>, sqlx::Error> {
    ListQuery {
        select: "SELECT ua.id, ua.user_id, ua.quiz_id, ua.question_id, ua.answer, \
                 ua.correct_answer, ua.is_correct, ua.created_at, \
                 qs.text AS question_text, qs.option_a, qs.option_b, qs.option_c, qs.option_d",
        from: "FROM user_answers ua LEFT JOIN questions qs ON qs.id = ua.question_id",
        order_by: "ua.id",
        visibility: None,
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}
