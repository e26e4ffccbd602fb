use sqlx::Row;

fn database_url() -> String {
    // Integration tests don't go through the app config, so read .env directly.
    dotenvy::dotenv().ok();

    for key in ["QUIZDESK_TEST_DATABASE_URL", "DATABASE_URL"] {
        if let Ok(url) = std::env::var(key) {
            if !url.trim().is_empty() {
                return url;
            }
        }
    }

    let server = std::env::var("POSTGRES_SERVER").unwrap_or_else(|_| "localhost".into());
    let port = std::env::var("POSTGRES_PORT").unwrap_or_else(|_| "5432".into());
    let user = std::env::var("POSTGRES_USER").unwrap_or_else(|_| "quizdesk".into());
    let password = std::env::var("POSTGRES_PASSWORD").unwrap_or_default();
    let db = std::env::var("POSTGRES_DB").unwrap_or_else(|_| "quizdesk".into());

    format!("postgresql://{user}:{password}@{server}:{port}/{db}")
}

#[tokio::test]
async fn migrations_apply_and_tables_exist() -> anyhow::Result<()> {
    let pool =
        sqlx::postgres::PgPoolOptions::new().max_connections(1).connect(&database_url()).await?;

    let migrations_dir =
        std::env::var("QUIZDESK_MIGRATIONS_DIR").unwrap_or_else(|_| "migrations".to_string());
    let migrator = sqlx::migrate::Migrator::new(std::path::Path::new(&migrations_dir)).await?;
    migrator.run(&pool).await?;

    let tables = [
        "roles",
        "permissions",
        "role_permissions",
        "users",
        "user_roles",
        "groups",
        "subjects",
        "faculties",
        "kafedras",
        "teachers",
        "students",
        "group_teachers",
        "subject_teachers",
        "questions",
        "quizzes",
        "quiz_questions",
        "results",
        "user_answers",
    ];

    for table in tables {
        let row = sqlx::query("SELECT to_regclass($1)::text").bind(table).fetch_one(&pool).await?;
        let regclass: Option<String> = row.try_get(0)?;
        assert!(regclass.is_some(), "expected table {table} to exist after migrations");
    }

    let association_unique: Option<String> = sqlx::query_scalar(
        "SELECT conname::text FROM pg_constraint
         WHERE conrelid = 'group_teachers'::regclass AND contype = 'u'",
    )
    .fetch_optional(&pool)
    .await?;
    assert!(association_unique.is_some(), "group_teachers needs a unique (teacher, group) pair");

    Ok(())
}
