use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::db::models::{NamedEntity, Role};
use crate::services::listing::{push_contains, ListFilter, ListQuery, Listing, PageWindow};

const COLUMNS: &str = "id, name, created_at, updated_at";

#[derive(Debug, Default)]
pub(crate) struct RoleFilter {
    pub(crate) name: Option<String>,
}

impl ListFilter for RoleFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_contains(builder, "r.name", self.name.as_deref());
    }
}

/// Returns the role called `name`, creating it when missing.
pub(crate) async fn ensure(executor: impl PgExecutor<'_>, name: &str) -> Result<Role, sqlx::Error> {
    sqlx::query_as::<_, Role>(&format!(
        "INSERT INTO roles (name) VALUES ($1)
         ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
         RETURNING {COLUMNS}"
    ))
    .bind(name)
    .fetch_one(executor)
    .await
}

pub(crate) async fn create(executor: impl PgExecutor<'_>, name: &str) -> Result<Role, sqlx::Error> {
    sqlx::query_as::<_, Role>(&format!("INSERT INTO roles (name) VALUES ($1) RETURNING {COLUMNS}"))
        .bind(name)
        .fetch_one(executor)
        .await
}

pub(crate) async fn delete(executor: impl PgExecutor<'_>, id: i64) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM roles WHERE id = $1").bind(id).execute(executor).await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn list(
    pool: &PgPool,
    filter: &RoleFilter,
    window: PageWindow,
) -> Result<Listing<Role>, sqlx::Error> {
    ListQuery {
        select: "SELECT r.id, r.name, r.created_at, r.updated_at",
        from: "FROM roles r",
        order_by: "r.id",
        visibility: None,
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}

pub(crate) async fn names_for_user(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT r.name
         FROM user_roles ur
         JOIN roles r ON r.id = ur.role_id
         WHERE ur.user_id = $1
         ORDER BY r.id",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn for_user(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Vec<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(
        "SELECT r.id, r.name, r.created_at, r.updated_at
         FROM user_roles ur
         JOIN roles r ON r.id = ur.role_id
         WHERE ur.user_id = $1
         ORDER BY r.id",
    )
    .bind(user_id)
    .fetch_all(executor)
    .await
}

/// Role ids among `names` that exist, in no particular order.
pub(crate) async fn ids_by_names(
    executor: impl PgExecutor<'_>,
    names: &[String],
) -> Result<Vec<i64>, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT id FROM roles WHERE name = ANY($1)")
        .bind(names)
        .fetch_all(executor)
        .await
}

pub(crate) async fn count_existing(
    executor: impl PgExecutor<'_>,
    ids: &[i64],
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM roles WHERE id = ANY($1)")
        .bind(ids)
        .fetch_one(executor)
        .await
}

pub(crate) async fn grant(
    executor: impl PgExecutor<'_>,
    user_id: i64,
    role_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2) ON CONFLICT DO NOTHING")
        .bind(user_id)
        .bind(role_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn grant_many(
    executor: impl PgExecutor<'_>,
    user_id: i64,
    role_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO user_roles (user_id, role_id)
         SELECT $1, UNNEST($2::BIGINT[])
         ON CONFLICT DO NOTHING",
    )
    .bind(user_id)
    .bind(role_ids)
    .execute(executor)
    .await?;
    Ok(())
}

pub(crate) async fn revoke_all(executor: impl PgExecutor<'_>, user_id: i64) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM user_roles WHERE user_id = $1").bind(user_id).execute(executor).await?;
    Ok(())
}

pub(crate) async fn find_by_id(
    executor: impl PgExecutor<'_>,
    id: i64,
) -> Result<Option<Role>, sqlx::Error> {
    sqlx::query_as::<_, Role>(&format!("SELECT {COLUMNS} FROM roles WHERE id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await
}

pub(crate) async fn permissions_for_role(
    executor: impl PgExecutor<'_>,
    role_id: i64,
) -> Result<Vec<NamedEntity>, sqlx::Error> {
    sqlx::query_as::<_, NamedEntity>(
        "SELECT p.id, p.name, p.created_at, p.updated_at
         FROM role_permissions rp
         JOIN permissions p ON p.id = rp.permission_id
         WHERE rp.role_id = $1
         ORDER BY p.id",
    )
    .bind(role_id)
    .fetch_all(executor)
    .await
}

pub(crate) async fn clear_permissions(
    executor: impl PgExecutor<'_>,
    role_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM role_permissions WHERE role_id = $1")
        .bind(role_id)
        .execute(executor)
        .await?;
    Ok(())
}

pub(crate) async fn insert_permissions(
    executor: impl PgExecutor<'_>,
    role_id: i64,
    permission_ids: &[i64],
) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO role_permissions (role_id, permission_id)
         SELECT $1, UNNEST($2::BIGINT[])
         ON CONFLICT DO NOTHING",
    )
    .bind(role_id)
    .bind(permission_ids)
    .execute(executor)
    .await?;
    Ok(())
}
