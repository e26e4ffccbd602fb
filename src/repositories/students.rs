use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::db::models::Student;
use crate::services::listing::{push_contains, push_eq, ListFilter, ListQuery, Listing, PageWindow};

const COLUMNS: &str = "id, user_id, first_name, last_name, third_name, full_name, \
                       student_id_number, group_id, created_at, updated_at";

#[derive(Debug, Default)]
pub(crate) struct StudentFilter {
    pub(crate) full_name: Option<String>,
    pub(crate) group_id: Option<i64>,
}

impl ListFilter for StudentFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_contains(builder, "s.full_name", self.full_name.as_deref());
        push_eq(builder, "s.group_id", self.group_id);
    }
}

pub(crate) struct CreateStudent<'a> {
    pub(crate) user_id: i64,
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) third_name: &'a str,
    pub(crate) full_name: &'a str,
    pub(crate) student_id_number: Option<&'a str>,
    pub(crate) group_id: Option<i64>,
}

pub(crate) async fn create(
    executor: impl PgExecutor<'_>,
    params: CreateStudent<'_>,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (
            user_id, first_name, last_name, third_name, full_name, student_id_number, group_id
         ) VALUES ($1, $2, $3, $4, $5, $6, $7)
         RETURNING {COLUMNS}"
    ))
    .bind(params.user_id)
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.third_name)
    .bind(params.full_name)
    .bind(params.student_id_number)
    .bind(params.group_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn find_by_user_id(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("SELECT {COLUMNS} FROM students WHERE user_id = $1"))
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

/// The group of the student profile owned by `user_id`. `None` when there is no profile or
/// the profile has no group.
pub(crate) async fn group_id_for_user(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    let group_id = sqlx::query_scalar::<_, Option<i64>>(
        "SELECT group_id FROM students WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
    Ok(group_id.flatten())
}

pub(crate) async fn set_group(
    executor: impl PgExecutor<'_>,
    id: i64,
    group_id: Option<i64>,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "UPDATE students SET group_id = $1, updated_at = (NOW() AT TIME ZONE 'utc')
         WHERE id = $2
         RETURNING {COLUMNS}"
    ))
    .bind(group_id)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM students WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &StudentFilter,
    window: PageWindow,
) -> Result<Listing<Student>, sqlx::Error> {
    ListQuery {
        select: "SELECT s.id, s.user_id, s.first_name, s.last_name, s.third_name, s.full_name, \
                 s.student_id_number, s.group_id, s.created_at, s.updated_at",
        from: "FROM students s",
        order_by: "s.id",
        visibility: None,
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}
