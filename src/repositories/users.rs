use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::db::models::User;
use crate::services::listing::{push_contains, ListFilter, ListQuery, Listing, PageWindow};

const COLUMNS: &str = "id, username, hashed_password, is_active, created_at, updated_at";

#[derive(Debug, Default)]
pub(crate) struct UserFilter {
    pub(crate) username: Option<String>,
}

impl ListFilter for UserFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_contains(builder, "u.username", self.username.as_deref());
    }
}

pub(crate) async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn find_by_username(
    executor: impl PgExecutor<'_>,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE username = $1"))
        .bind(username)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn create(
    executor: impl PgExecutor<'_>,
    username: &str,
    hashed_password: &str,
) -> Result<User, sqlx::Error> {
    sqlx::query_as::<_, User>(&format!(
        "INSERT INTO users (username, hashed_password) VALUES ($1, $2) RETURNING {COLUMNS}"
    ))
    .bind(username)
    .bind(hashed_password)
    .fetch_one(executor)
    .await
}

/// Replaces the password hash and re-activates the account.
pub(crate) async fn reset_credentials(
    executor: impl PgExecutor<'_>,
    id: i64,
    hashed_password: &str,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "UPDATE users
         SET hashed_password = $1, is_active = TRUE, updated_at = (NOW() AT TIME ZONE 'utc')
         WHERE id = $2",
    )
    .bind(hashed_password)
    .bind(id)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM users WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &UserFilter,
    window: PageWindow,
) -> Result<Listing<User>, sqlx::Error> {
    ListQuery {
        select: "SELECT u.id, u.username, u.hashed_password, u.is_active, u.created_at, u.updated_at",
        from: "FROM users u",
        order_by: "u.id",
        visibility: None,
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}
