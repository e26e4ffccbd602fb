use sqlx::PgExecutor;

/// Links every question `user_id` authored for `subject_id` to `quiz_id`. Returns the number
/// of links created.
pub(crate) async fn link_owned_questions(
    executor: impl PgExecutor<'_>,
    quiz_id: i64,
    user_id: i64,
    subject_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO quiz_questions (quiz_id, question_id)
         SELECT $1, qs.id
         FROM questions qs
         WHERE qs.user_id = $2 AND qs.subject_id = $3
         ORDER BY qs.id
         ON CONFLICT (quiz_id, question_id) DO NOTHING",
    )
    .bind(quiz_id)
    .bind(user_id)
    .bind(subject_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}

/// Copies the links of `source_quiz_id` whose question still exists onto `target_quiz_id`.
pub(crate) async fn copy_links(
    executor: impl PgExecutor<'_>,
    source_quiz_id: i64,
    target_quiz_id: i64,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO quiz_questions (quiz_id, question_id)
         SELECT $2, qq.question_id
         FROM quiz_questions qq
         JOIN questions qs ON qs.id = qq.question_id
         WHERE qq.quiz_id = $1
         ORDER BY qq.id
         ON CONFLICT (quiz_id, question_id) DO NOTHING",
    )
    .bind(source_quiz_id)
    .bind(target_quiz_id)
    .execute(executor)
    .await?;
    Ok(result.rows_affected())
}
