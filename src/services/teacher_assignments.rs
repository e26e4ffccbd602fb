//! Full-replace assignment of groups and subjects to teachers.
//!
//! Existing links are deleted and the requested set inserted in one transaction. An unknown
//! id anywhere in the request aborts the whole call before anything changes.

use sqlx::PgPool;

use crate::repositories::{self, dictionaries::Dictionary};
use crate::services::ServiceError;

/// Sorted, duplicate-free copy of `ids`.
pub(crate) fn normalize_ids(ids: &[i64]) -> Vec<i64> {
    let mut ids = ids.to_vec();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Replaces the groups linked to the teacher account `user_id`. Returns the stored set.
pub(crate) async fn assign_groups(
    pool: &PgPool,
    user_id: i64,
    group_ids: &[i64],
) -> Result<Vec<i64>, ServiceError> {
    let group_ids = normalize_ids(group_ids);
    let mut tx = pool.begin().await?;

    if repositories::users::find_by_id(&mut *tx, user_id).await?.is_none() {
        return Err(ServiceError::NotFound("User not found"));
    }
    ensure_all_exist(&mut tx, Dictionary::Groups, &group_ids).await?;

    repositories::teachers::clear_groups(&mut *tx, user_id).await?;
    repositories::teachers::insert_groups(&mut *tx, user_id, &group_ids).await?;
    let stored = repositories::teachers::assigned_group_ids(&mut *tx, user_id).await?;

    tx.commit().await?;
    tracing::info!(user_id, groups = stored.len(), "Teacher groups reassigned");
    Ok(stored)
}

/// Replaces the subjects linked to the teacher profile `teacher_id`. Returns the stored set.
pub(crate) async fn assign_subjects(
    pool: &PgPool,
    teacher_id: i64,
    subject_ids: &[i64],
) -> Result<Vec<i64>, ServiceError> {
    let subject_ids = normalize_ids(subject_ids);
    let mut tx = pool.begin().await?;

    if repositories::teachers::find_by_id(&mut *tx, teacher_id).await?.is_none() {
        return Err(ServiceError::NotFound("Teacher not found"));
    }
    ensure_all_exist(&mut tx, Dictionary::Subjects, &subject_ids).await?;

    repositories::teachers::clear_subjects(&mut *tx, teacher_id).await?;
    repositories::teachers::insert_subjects(&mut *tx, teacher_id, &subject_ids).await?;
    let stored = repositories::teachers::assigned_subject_ids(&mut *tx, teacher_id).await?;

    tx.commit().await?;
    tracing::info!(teacher_id, subjects = stored.len(), "Teacher subjects reassigned");
    Ok(stored)
}

pub(crate) async fn ensure_all_exist(
    conn: &mut sqlx::PgConnection,
    dictionary: Dictionary,
    ids: &[i64],
) -> Result<(), ServiceError> {
    if ids.is_empty() {
        return Ok(());
    }
    let found = repositories::dictionaries::count_existing(&mut *conn, dictionary, ids).await?;
    if found != ids.len() as i64 {
        return Err(ServiceError::InvalidReference(dictionary.some_missing()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_ids_sorts_and_dedups() {
        assert_eq!(normalize_ids(&[3, 1, 3, 2, 1]), vec![1, 2, 3]);
        assert!(normalize_ids(&[]).is_empty());
    }
}
