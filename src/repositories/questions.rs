use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::db::models::Question;
use crate::services::listing::{push_contains, push_eq, ListFilter, ListQuery, Listing, PageWindow};

const COLUMNS: &str = "id, user_id, subject_id, text, option_a, option_b, option_c, option_d, \
                       image_url, created_at, updated_at";

#[derive(Debug, Default)]
pub(crate) struct QuestionFilter {
    pub(crate) subject_id: Option<i64>,
    pub(crate) user_id: Option<i64>,
    pub(crate) text: Option<String>,
}

impl ListFilter for QuestionFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_eq(builder, "qs.subject_id", self.subject_id);
        push_eq(builder, "qs.user_id", self.user_id);
        push_contains(builder, "qs.text", self.text.as_deref());
    }
}

pub(crate) struct QuestionFields<'a> {
    pub(crate) user_id: Option<i64>,
    pub(crate) subject_id: i64,
    pub(crate) text: &'a str,
    pub(crate) option_a: &'a str,
    pub(crate) option_b: &'a str,
    pub(crate) option_c: &'a str,
    pub(crate) option_d: &'a str,
    pub(crate) image_url: Option<&'a str>,
}

pub(crate) async fn create(
    executor: impl PgExecutor<'_>,
    params: QuestionFields<'_>,
) -> Result<Question, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "INSERT INTO questions (
            user_id, subject_id, text, option_a, option_b, option_c, option_d, image_url
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
         RETURNING {COLUMNS}"
    ))
    .bind(params.user_id)
    .bind(params.subject_id)
    .bind(params.text)
    .bind(params.option_a)
    .bind(params.option_b)
    .bind(params.option_c)
    .bind(params.option_d)
    .bind(params.image_url)
    .fetch_one(executor)
    .await
}

pub(crate) async fn update(
    executor: impl PgExecutor<'_>,
    id: i64,
    params: QuestionFields<'_>,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!(
        "UPDATE questions SET
            user_id = $1,
            subject_id = $2,
            text = $3,
            option_a = $4,
            option_b = $5,
            option_c = $6,
            option_d = $7,
            image_url = $8,
            updated_at = (NOW() AT TIME ZONE 'utc')
         WHERE id = $9
         RETURNING {COLUMNS}"
    ))
    .bind(params.user_id)
    .bind(params.subject_id)
    .bind(params.text)
    .bind(params.option_a)
    .bind(params.option_b)
    .bind(params.option_c)
    .bind(params.option_d)
    .bind(params.image_url)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(&format!("SELECT {COLUMNS} FROM questions WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM questions WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &QuestionFilter,
    window: PageWindow,
) -> Result<Listing<Question>, sqlx::Error> {
    ListQuery {
        select: "SELECT qs.id, qs.user_id, qs.subject_id, qs.text, qs.option_a, qs.option_b, \
                 qs.option_c, qs.option_d, qs.image_url, qs.created_at, qs.updated_at",
        from: "FROM questions qs",
        order_by: "qs.id",
        visibility: None,
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}

/// Questions linked to `quiz_id`, ordered by link id.
pub(crate) async fn linked_to_quiz(
    executor: impl PgExecutor<'_>,
    quiz_id: i64,
) -> Result<Vec<Question>, sqlx::Error> {
    sqlx::query_as::<_, Question>(
        "SELECT qs.id, qs.user_id, qs.subject_id, qs.text, qs.option_a, qs.option_b,
                qs.option_c, qs.option_d, qs.image_url, qs.created_at, qs.updated_at
         FROM quiz_questions qq
         JOIN questions qs ON qs.id = qq.question_id
         WHERE qq.quiz_id = $1
         ORDER BY qq.id",
    )
    .bind(quiz_id)
    .fetch_all(executor)
    .await
}
