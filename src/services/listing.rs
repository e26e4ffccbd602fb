//! Filtered, paginated listings.
//!
//! Every list endpoint goes through [`ListQuery::fetch_page`]: the `WHERE` clause is built by
//! a single function and pushed into both the page query and the count query, so `total`
//! always describes exactly the scoped and filtered set.

use sqlx::postgres::PgRow;
use sqlx::{FromRow, PgPool, Postgres, QueryBuilder};

use crate::services::visibility::{EntityKind, Scope};

pub(crate) const MAX_LIMIT: i64 = 1000;

/// 1-indexed page plus page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub(crate) page: i64,
    pub(crate) limit: i64,
}

impl PageWindow {
    pub(crate) fn new(page: i64, limit: i64) -> Self {
        Self { page, limit: limit.clamp(1, MAX_LIMIT) }
    }

    /// `(page - 1) * limit`, never negative.
    pub(crate) fn offset(&self) -> i64 {
        (self.page - 1).max(0).saturating_mul(self.limit)
    }
}

#[derive(Debug)]
pub(crate) struct Listing<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total: i64,
}

impl<T> Listing<T> {
    pub(crate) fn map<U>(self, f: impl FnMut(T) -> U) -> Listing<U> {
        Listing { items: self.items.into_iter().map(f).collect(), total: self.total }
    }
}

/// User-supplied filters for one listing. Implementations push ` AND ...` fragments, one per
/// supplied value, and skip absent ones.
pub(crate) trait ListFilter {
    fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>);
}

/// Filters that never constrain anything.
impl ListFilter for () {
    fn push_conditions(&self, _builder: &mut QueryBuilder<'_, Postgres>) {}
}

/// ` AND <column> = <value>` when `value` is supplied. `Some(false)` and `Some(0)` still apply.
pub(crate) fn push_eq<'args, T>(
    builder: &mut QueryBuilder<'args, Postgres>,
    column: &str,
    value: Option<T>,
) where
    T: 'args + sqlx::Encode<'args, Postgres> + sqlx::Type<Postgres> + Send,
{
    if let Some(value) = value {
        builder.push(format!(" AND {column} = "));
        builder.push_bind(value);
    }
}

/// Case-insensitive substring match. Blank input is treated as absent.
pub(crate) fn push_contains(
    builder: &mut QueryBuilder<'_, Postgres>,
    column: &str,
    value: Option<&str>,
) {
    let Some(value) = value.map(str::trim).filter(|value| !value.is_empty()) else {
        return;
    };
    builder.push(format!(" AND {column} ILIKE "));
    builder.push_bind(format!("%{}%", escape_like(value)));
    builder.push(" ESCAPE '\\'");
}

pub(crate) fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        if matches!(ch, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Shape of one listing: what to select, where from, how to order, who may see what.
pub(crate) struct ListQuery<'a, F: ListFilter> {
    /// Column list including the leading `SELECT`.
    pub(crate) select: &'static str,
    /// `FROM` clause including joins.
    pub(crate) from: &'static str,
    pub(crate) order_by: &'static str,
    pub(crate) visibility: Option<(&'a Scope, EntityKind)>,
    pub(crate) filters: &'a F,
}

impl<F: ListFilter> ListQuery<'_, F> {
    fn push_where(&self, builder: &mut QueryBuilder<'_, Postgres>) {
        builder.push(" WHERE TRUE");
        if let Some((scope, kind)) = self.visibility {
            scope.push_predicate(builder, kind);
        }
        self.filters.push_conditions(builder);
    }

    pub(crate) fn page_builder(&self, window: PageWindow) -> QueryBuilder<'_, Postgres> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("{} {}", self.select, self.from));
        self.push_where(&mut builder);
        builder.push(format!(" ORDER BY {} LIMIT ", self.order_by));
        builder.push_bind(window.limit);
        builder.push(" OFFSET ");
        builder.push_bind(window.offset());
        builder
    }

    pub(crate) fn count_builder(&self) -> QueryBuilder<'_, Postgres> {
        let mut builder = QueryBuilder::<Postgres>::new(format!("SELECT COUNT(*) {}", self.from));
        self.push_where(&mut builder);
        builder
    }

    pub(crate) async fn fetch_page<T>(
        &self,
        pool: &PgPool,
        window: PageWindow,
    ) -> Result<Listing<T>, sqlx::Error>
    where
        T: for<'r> FromRow<'r, PgRow> + Send + Unpin,
    {
        let mut page = self.page_builder(window);
        let items = page.build_query_as::<T>().fetch_all(pool).await?;

        let mut count = self.count_builder();
        let total = count.build_query_scalar::<i64>().fetch_one(pool).await?;

        Ok(Listing { items, total })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TitleAndFlag {
        title: Option<String>,
        is_active: Option<bool>,
    }

    impl ListFilter for TitleAndFlag {
        fn push_conditions(&self, builder: &mut QueryBuilder<'_, Postgres>) {
            push_contains(builder, "q.title", self.title.as_deref());
            push_eq(builder, "q.is_active", self.is_active);
        }
    }

    fn query<'a>(
        scope: Option<(&'a Scope, EntityKind)>,
        filters: &'a TitleAndFlag,
    ) -> ListQuery<'a, TitleAndFlag> {
        ListQuery {
            select: "SELECT q.id",
            from: "FROM quizzes q",
            order_by: "q.id",
            visibility: scope,
            filters,
        }
    }

    #[test]
    fn offset_is_clamped_for_low_pages() {
        assert_eq!(PageWindow::new(0, 10).offset(), 0);
        assert_eq!(PageWindow::new(-3, 10).offset(), 0);
        assert_eq!(PageWindow::new(1, 10).offset(), 0);
        assert_eq!(PageWindow::new(3, 10).offset(), 20);
    }

    #[test]
    fn limit_is_clamped() {
        assert_eq!(PageWindow::new(1, 0).limit, 1);
        assert_eq!(PageWindow::new(1, 50_000).limit, MAX_LIMIT);
    }

    #[test]
    fn escape_like_escapes_wildcards() {
        assert_eq!(escape_like("100%_a\\b"), "100\\%\\_a\\\\b");
        assert_eq!(escape_like("plain"), "plain");
    }

    #[test]
    fn count_and_page_share_where_clause() {
        let scope = Scope::Group(4);
        let filters = TitleAndFlag { title: Some("alg".to_string()), is_active: Some(false) };
        let listing = query(Some((&scope, EntityKind::Quiz)), &filters);

        let page_sql = listing.page_builder(PageWindow::new(2, 5)).sql().to_string();
        let count_sql = listing.count_builder().sql().to_string();

        let where_clause =
            " WHERE TRUE AND q.group_id = $1 AND q.title ILIKE $2 ESCAPE '\\' AND q.is_active = $3";
        assert_eq!(count_sql, format!("SELECT COUNT(*) FROM quizzes q{where_clause}"));
        assert_eq!(
            page_sql,
            format!("SELECT q.id FROM quizzes q{where_clause} ORDER BY q.id LIMIT $4 OFFSET $5")
        );
    }

    #[test]
    fn absent_and_blank_filters_are_skipped() {
        let filters = TitleAndFlag { title: Some("   ".to_string()), is_active: None };
        let listing = query(None, &filters);
        assert_eq!(listing.count_builder().sql(), "SELECT COUNT(*) FROM quizzes q WHERE TRUE");
    }
}
