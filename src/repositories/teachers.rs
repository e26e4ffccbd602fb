use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::db::models::Teacher;
use crate::services::listing::{push_contains, push_eq, ListFilter, ListQuery, Listing, PageWindow};

const COLUMNS: &str = "id, user_id, first_name, last_name, third_name, full_name, kafedra_id, \
                       created_at, updated_at";

#[derive(Debug, Default)]
pub(crate) struct TeacherFilter {
    pub(crate) full_name: Option<String>,
    pub(crate) kafedra_id: Option<i64>,
}

impl ListFilter for TeacherFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_contains(builder, "t.full_name", self.full_name.as_deref());
        push_eq(builder, "t.kafedra_id", self.kafedra_id);
    }
}

pub(crate) struct CreateTeacher<'a> {
    pub(crate) user_id: i64,
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) third_name: &'a str,
    pub(crate) full_name: &'a str,
    pub(crate) kafedra_id: Option<i64>,
}

/// Name change of an existing profile. `kafedra_id: None` keeps the current kafedra.
pub(crate) struct UpdateTeacher<'a> {
    pub(crate) first_name: &'a str,
    pub(crate) last_name: &'a str,
    pub(crate) third_name: &'a str,
    pub(crate) full_name: &'a str,
    pub(crate) kafedra_id: Option<i64>,
}

pub(crate) async fn create(
    executor: impl PgExecutor<'_>,
    params: CreateTeacher<'_>,
) -> Result<Teacher, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "INSERT INTO teachers (user_id, first_name, last_name, third_name, full_name, kafedra_id)
         VALUES ($1, $2, $3, $4, $5, $6)
         RETURNING {COLUMNS}"
    ))
    .bind(params.user_id)
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.third_name)
    .bind(params.full_name)
    .bind(params.kafedra_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn update(
    executor: impl PgExecutor<'_>,
    id: i64,
    params: UpdateTeacher<'_>,
) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "UPDATE teachers
         SET first_name = $1,
             last_name = $2,
             third_name = $3,
             full_name = $4,
             kafedra_id = COALESCE($5, kafedra_id),
             updated_at = (NOW() AT TIME ZONE 'utc')
         WHERE id = $6
         RETURNING {COLUMNS}"
    ))
    .bind(params.first_name)
    .bind(params.last_name)
    .bind(params.third_name)
    .bind(params.full_name)
    .bind(params.kafedra_id)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!("SELECT {COLUMNS} FROM teachers WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn find_by_user_id(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!("SELECT {COLUMNS} FROM teachers WHERE user_id = $1"))
        .bind(user_id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM teachers WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &TeacherFilter,
    window: PageWindow,
) -> Result<Listing<Teacher>, sqlx::Error> {
    ListQuery {
        select: "SELECT t.id, t.user_id, t.first_name, t.last_name, t.third_name, t.full_name, \
                 t.kafedra_id, t.created_at, t.updated_at",
        from: "FROM teachers t",
        order_by: "t.id",
        visibility: None,
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}

/// Group ids linked to the teacher account `user_id`.
pub(crate) async fn assigned_group_ids(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT group_id FROM group_teachers WHERE teacher_id = $1 ORDER BY group_id",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Subject ids linked to the teacher profile `teacher_id`.
pub(crate) async fn assigned_subject_ids(
    executor: impl PgExecutor<'_>,
    teacher_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT subject_id FROM subject_teachers WHERE teacher_id = $1 ORDER BY subject_id",
    )
    .bind(teacher_id)
    .fetch_all(executor)
    .await
}

/// Subject ids reached through the teacher profile owned by `user_id`.
pub(crate) async fn assigned_subject_ids_for_user(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(
        "SELECT st.subject_id
         FROM subject_teachers st
         JOIN teachers t ON t.id = st.teacher_id
         WHERE t.user_id = $1
         ORDER BY st.subject_id",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn clear_groups(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM group_teachers WHERE teacher_id = $1")
        .bind(user_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn insert_groups(
    executor: impl PgExecutor<'_>,
    user_id: i64,
    group_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO group_teachers (teacher_id, group_id)
         SELECT $1, UNNEST($2::BIGINT[])
         ON CONFLICT (teacher_id, group_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(group_ids)
    .execute(executor)
    .await?;
    Ok(())
}

/// Creates the (teacher account, group) link unless it already exists.
pub(crate) async fn ensure_group_link(
    executor: impl PgExecutor<'_>,
    user_id: i64,
    group_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO group_teachers (teacher_id, group_id)
         VALUES ($1, $2)
         ON CONFLICT (teacher_id, group_id) DO NOTHING",
    )
    .bind(user_id)
    .bind(group_id)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn clear_subjects(
    executor: impl PgExecutor<'_>,
    teacher_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM subject_teachers WHERE teacher_id = $1")
        .bind(teacher_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn insert_subjects(
    executor: impl PgExecutor<'_>,
    teacher_id: i64,
    subject_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO subject_teachers (teacher_id, subject_id)
         SELECT $1, UNNEST($2::BIGINT[])
         ON CONFLICT (teacher_id, subject_id) DO NOTHING",
    )
    .bind(teacher_id)
    .bind(subject_ids)
    .execute(executor)
    .await?;
    Ok(())
}
