use sqlx::PgExecutor;

pub(crate) async fn ping(executor: impl PgExecutor<'_>) -> Result<(), sqlx::Error> {
    sqlx::query_scalar::<_, i32>("SELECT 1").fetch_one(executor).await?;
    Ok(())
}

/// Number of migrations recorded as applied.
pub(crate) async fn applied_migrations(executor: impl PgExecutor<'_>) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(executor)
        .await
}
