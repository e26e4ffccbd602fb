use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::db::models::Kafedra;
use crate::services::listing::{push_contains, push_eq, ListFilter, ListQuery, Listing, PageWindow};

const COLUMNS: &str = "id, name, faculty_id, created_at, updated_at";

#[derive(Debug, Default)]
pub(crate) struct KafedraFilter {
    pub(crate) name: Option<String>,
    pub(crate) faculty_id: Option<i64>,
}

impl ListFilter for KafedraFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_contains(builder, "k.name", self.name.as_deref());
        push_eq(builder, "k.faculty_id", self.faculty_id);
    }
}

pub(crate) async fn create(
    executor: impl PgExecutor<'_>,
    name: &str,
    faculty_id: Option<i64>,
) -> Result<Kafedra, sqlx::Error> {
    sqlx::query_as::<_, Kafedra>(&format!(
        "INSERT INTO kafedras (name, faculty_id) VALUES ($1, $2) RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(faculty_id)
    .fetch_one(executor)
    .await
}

pub(crate) async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Kafedra>, sqlx::Error> {
    sqlx::query_as::<_, Kafedra>(&format!("SELECT {COLUMNS} FROM kafedras WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

/// Renames the kafedra and moves it to `faculty_id` (`None` detaches it).
pub(crate) async fn update(
    executor: impl PgExecutor<'_>,
    id: i64,
    name: &str,
    faculty_id: Option<i64>,
) -> Result<Option<Kafedra>, sqlx::Error> {
    sqlx::query_as::<_, Kafedra>(&format!(
        "UPDATE kafedras
         SET name = $1, faculty_id = $2, updated_at = (NOW() AT TIME ZONE 'utc')
         WHERE id = $3
         RETURNING {COLUMNS}"
    ))
    .bind(name)
    .bind(faculty_id)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM kafedras WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &KafedraFilter,
    window: PageWindow,
) -> Result<Listing<Kafedra>, sqlx::Error> {
    ListQuery {
        select: "SELECT k.id, k.name, k.faculty_id, k.created_at, k.updated_at",
        from: "FROM kafedras k",
        order_by: "k.id",
        visibility: None,
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}
