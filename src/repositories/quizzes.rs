use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::db::models::Quiz;
use crate::services::listing::{push_contains, push_eq, ListFilter, ListQuery, Listing, PageWindow};
use crate::services::visibility::{EntityKind, Scope};

const COLUMNS: &str = "id, title, question_number, duration, pin, is_active, attempt, \
                       user_id, group_id, subject_id, created_at, updated_at";

#[derive(Debug, Default)]
pub(crate) struct QuizFilter {
    pub(crate) title: Option<String>,
    pub(crate) user_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
    pub(crate) is_active: Option<bool>,
}

impl ListFilter for QuizFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_contains(builder, "q.title", self.title.as_deref());
        push_eq(builder, "q.user_id", self.user_id);
        push_eq(builder, "q.group_id", self.group_id);
        push_eq(builder, "q.subject_id", self.subject_id);
        push_eq(builder, "q.is_active", self.is_active);
    }
}

pub(crate) struct CreateQuiz<'a> {
    pub(crate) title: &'a str,
    pub(crate) question_number: i32,
    pub(crate) duration: i32,
    pub(crate) pin: &'a str,
    pub(crate) is_active: bool,
    pub(crate) attempt: i32,
    pub(crate) user_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
}

pub(crate) async fn create(
    executor: impl PgExecutor<'_>,
    params: CreateQuiz<'_>,
) -> Result<Quiz, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "INSERT INTO quizzes (
            title, question_number, duration, pin, is_active, attempt,
            user_id, group_id, subject_id
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
         RETURNING {COLUMNS}"
    ))
    .bind(params.title)
    .bind(params.question_number)
    .bind(params.duration)
    .bind(params.pin)
    .bind(params.is_active)
    .bind(params.attempt)
    .bind(params.user_id)
    .bind(params.group_id)
    .bind(params.subject_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!("SELECT {COLUMNS} FROM quizzes WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Fields left `None` keep their stored value.
#[derive(Debug, Default)]
pub(crate) struct UpdateQuiz {
    pub(crate) title: Option<String>,
    pub(crate) question_number: Option<i32>,
    pub(crate) duration: Option<i32>,
    pub(crate) pin: Option<String>,
    pub(crate) is_active: Option<bool>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
}

pub(crate) async fn update(
    executor: impl PgExecutor<'_>,
    id: i64,
    params: UpdateQuiz,
) -> Result<Option<Quiz>, sqlx::Error> {
    sqlx::query_as::<_, Quiz>(&format!(
        "UPDATE quizzes SET
            title = COALESCE($1, title),
            question_number = COALESCE($2, question_number),
            duration = COALESCE($3, duration),
            pin = COALESCE($4, pin),
            is_active = COALESCE($5, is_active),
            group_id = COALESCE($6, group_id),
            subject_id = COALESCE($7, subject_id),
            updated_at = (NOW() AT TIME ZONE 'utc')
         WHERE id = $8
         RETURNING {COLUMNS}"
    ))
    .bind(params.title)
    .bind(params.question_number)
    .bind(params.duration)
    .bind(params.pin)
    .bind(params.is_active)
    .bind(params.group_id)
    .bind(params.subject_id)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM quizzes WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(
    pool: &PgPool,
    scope: &Scope,
    filter: &QuizFilter,
    window: PageWindow,
) -> Result<Listing<Quiz>, sqlx::Error> {
    ListQuery {
        select: "SELECT q.id, q.title, q.question_number, q.duration, q.pin, q.is_active, \
                 q.attempt, q.user_id, q.group_id, q.subject_id, q.created_at, q.updated_at",
        from: "FROM quizzes q",
        order_by: "q.id",
        visibility: Some((scope, EntityKind::Quiz)),
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}
