//! Tables that share the `id, name` shape: groups, subjects, faculties and permissions.

use sqlx::{PgExecutor, PgPool, Postgres, QueryBuilder};

use crate::db::models::NamedEntity;
use crate::services::listing::{push_contains, ListFilter, ListQuery, Listing, PageWindow};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dictionary {
    Groups,
    Subjects,
    Faculties,
    Permissions,
}

impl Dictionary {
    pub(crate) fn table(self) -> &'static str {
        match self {
            Dictionary::Groups => "groups",
            Dictionary::Subjects => "subjects",
            Dictionary::Faculties => "faculties",
            Dictionary::Permissions => "permissions",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Dictionary::Groups => "Group",
            Dictionary::Subjects => "Subject",
            Dictionary::Faculties => "Faculty",
            Dictionary::Permissions => "Permission",
        }
    }

    pub(crate) fn not_found(self) -> &'static str {
        match self {
            Dictionary::Groups => "Group not found",
            Dictionary::Subjects => "Subject not found",
            Dictionary::Faculties => "Faculty not found",
            Dictionary::Permissions => "Permission not found",
        }
    }

    /// Message for a bulk reference that names at least one unknown id.
    pub(crate) fn some_missing(self) -> &'static str {
        match self {
            Dictionary::Groups => "One or more groups not found",
            Dictionary::Subjects => "One or more subjects not found",
            Dictionary::Faculties => "One or more faculties not found",
            Dictionary::Permissions => "One or more permissions not found",
        }
    }

    fn select(self) -> &'static str {
        "SELECT d.id, d.name, d.created_at, d.updated_at"
    }

    fn from_clause(self) -> &'static str {
        match self {
            Dictionary::Groups => "FROM groups d",
            Dictionary::Subjects => "FROM subjects d",
            Dictionary::Faculties => "FROM faculties d",
            Dictionary::Permissions => "FROM permissions d",
        }
    }
}

#[derive(Debug, Default)]
pub(crate) struct NameFilter {
    pub(crate) name: Option<String>,
}

impl ListFilter for NameFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        push_contains(builder, "d.name", self.name.as_deref());
    }
}

pub(crate) async fn find_by_id(
    executor: impl PgExecutor<'_>,
    dictionary: Dictionary,
    id: i64,
) -> Result<Option<NamedEntity>, sqlx::Error> {
    sqlx::query_as::<_, NamedEntity>(&format!(
        "{} {} WHERE d.id = $1",
        dictionary.select(),
        dictionary.from_clause()
    ))
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn create(
    executor: impl PgExecutor<'_>,
    dictionary: Dictionary,
    name: &str,
) -> Result<NamedEntity, sqlx::Error> {
    sqlx::query_as::<_, NamedEntity>(&format!(
        "INSERT INTO {} (name) VALUES ($1) RETURNING id, name, created_at, updated_at",
        dictionary.table()
    ))
    .bind(name)
    .fetch_one(executor)
    .await
}

pub(crate) async fn rename(
    executor: impl PgExecutor<'_>,
    dictionary: Dictionary,
    id: i64,
    name: &str,
) -> Result<Option<NamedEntity>, sqlx::Error> {
    sqlx::query_as::<_, NamedEntity>(&format!(
        "UPDATE {} SET name = $1, updated_at = (NOW() AT TIME ZONE 'utc')
         WHERE id = $2
         RETURNING id, name, created_at, updated_at",
        dictionary.table()
    ))
    .bind(name)
    .bind(id)
    .fetch_optional(executor)
    .await
}

pub(crate) async fn delete(
    executor: impl PgExecutor<'_>,
    dictionary: Dictionary,
    id: i64,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", dictionary.table()))
        .bind(id)
        .execute(executor)
        .await?;
    Ok(result.rows_affected() > 0)
}

pub(crate) async fn count_existing(
    executor: impl PgExecutor<'_>,
    dictionary: Dictionary,
    ids: &[i64],
) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>(&format!(
        "SELECT COUNT(*) FROM {} WHERE id = ANY($1)",
        dictionary.table()
    ))
    .bind(ids)
    .fetch_one(executor)
    .await
}

pub(crate) async fn list(
    pool: &PgPool,
    dictionary: Dictionary,
    filter: &NameFilter,
    window: PageWindow,
) -> Result<Listing<NamedEntity>, sqlx::Error> {
    ListQuery {
        select: dictionary.select(),
        from: dictionary.from_clause(),
        order_by: "d.id",
        visibility: None,
        filters: filter,
    }
    .fetch_page(pool, window)
    .await
}

/// Rows of `dictionary` with the given ids, ordered by id.
pub(crate) async fn by_ids(
    executor: impl PgExecutor<'_>,
    dictionary: Dictionary,
    ids: &[i64],
) -> Result<Vec<NamedEntity>, sqlx::Error> {
    sqlx::query_as::<_, NamedEntity>(&format!(
        "{} {} WHERE d.id = ANY($1) ORDER BY d.id",
        dictionary.select(),
        dictionary.from_clause()
    ))
    .bind(ids)
    .fetch_all(executor)
    .await
}
