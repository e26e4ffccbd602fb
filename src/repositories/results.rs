use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};
use time::PrimitiveDateTime;

use crate::db::models::QuizResult;
use crate::services::listing::{push_eq, ListFilter, ListQuery, Listing, PageWindow};
use crate::services::visibility::{EntityKind, Scope};

const SELECT: &str = "SELECT r.id, r.user_id, r.quiz_id, r.group_id, r.subject_id,
                r.correct_answers, r.wrong_answers, r.grade, r.created_at, r.updated_at,
                u.username,
                qz.title AS quiz_title,
                qz.attempt AS quiz_attempt,
                sb.name AS subject_name,
                g.name AS group_name,
                st.full_name AS student_full_name,
                st.student_id_number";

const FROM: &str = "FROM results r
         LEFT JOIN users u ON u.id = r.user_id
         LEFT JOIN quizzes qz ON qz.id = r.quiz_id
         LEFT JOIN subjects sb ON sb.id = r.subject_id
         LEFT JOIN groups g ON g.id = r.group_id
         LEFT JOIN students st ON st.user_id = r.user_id";

/// A result with the names of everything it points at.
#[derive(Debug, Clone, sqlx::FromRow)]
pub(crate) struct ResultRow {
    pub(crate) id: i64,
    pub(crate) user_id: Option<i64>,
    pub(crate) quiz_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
    pub(crate) correct_answers: i32,
    pub(crate) wrong_answers: i32,
    pub(crate) grade: i32,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
    pub(crate) username: Option<String>,
    pub(crate) quiz_title: Option<String>,
    pub(crate) quiz_attempt: Option<i32>,
    pub(crate) subject_name: Option<String>,
    pub(crate) group_name: Option<String>,
    pub(crate) student_full_name: Option<String>,
    pub(crate) student_id_number: Option<String>,
}

#[derive(Debug, Default)]
pub(crate) struct ResultFilter {
    pub(crate) user_id: Option<i64>,
    pub(crate) quiz_id: Option<i64>,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
    pub(crate) grade: Option<i32>,
}

impl ListFilter for ResultFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_eq(builder, "r.user_id", self.user_id);
        push_eq(builder, "r.quiz_id", self.quiz_id);
        push_eq(builder, "r.group_id", self.group_id);
        push_eq(builder, "r.subject_id", self.subject_id);
        push_eq(builder, "r.grade", self.grade);
    }
}

pub(crate) struct CreateResult {
    pub(crate) user_id: i64,
    pub(crate) quiz_id: i64,
    pub(crate) group_id: Option<i64>,
    pub(crate) subject_id: Option<i64>,
    pub(crate) correct_answers: i32,
    pub(crate) wrong_answers: i32,
    pub(crate) grade: i32,
}

pub(crate) async fn create(
    executor: impl PgExecutor<'_>,
    params: CreateResult,
) -> Result<QuizResult, sqlx::Error> {
    sqlx::query_as::<_, QuizResult>(
        "INSERT INTO results (
            user_id, quiz_id, group_id, subject_id, correct_answers, wrong_answers, grade
         ) VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING id, user_id, quiz_id, group_id, subject_id,
                   correct_answers, wrong_answers, grade, created_at, updated_at",
    )
    .bind(params.user_id)
    .bind(params.quiz_id)
    .bind(params.group_id)
    .bind(params.subject_id)
    .bind(params.correct_answers)
    .bind(params.wrong_answers)
    .bind(params.grade)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_row(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<ResultRow>, sqlx::Error> {
    sqlx::query_as::<_, ResultRow>(&format!("{SELECT} {FROM} WHERE r.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM results WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(
    pool: &PgPool,
    scope: &Scope,
    filter: &ResultFilter,
    window: PageWindow,
) -> Result<Listing<ResultRow>, sqlx::Error> {
    ListQuery {
        select: SELECT,
        from: FROM,
        order_by: "r.id",
        visibility: Some((scope, EntityKind::Result)),
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}
