//! Full-replace assignment of permissions to roles.

use sqlx::PgPool;

use crate::db::models::NamedEntity;
use crate::repositories::{self, dictionaries::Dictionary};
use crate::services::teacher_assignments::{ensure_all_exist, normalize_ids};
use crate::services::ServiceError;

/// Replaces the permissions of `role_id` with `permission_ids`. Returns the stored set.
pub(crate) async fn assign(
    pool: &PgPool,
    role_id: i64,
    permission_ids: &[i64],
) -> Result<Vec<NamedEntity>, ServiceError> {
    let permission_ids = normalize_ids(permission_ids);
    let mut tx = pool.begin().await?;

    if repositories::roles::find_by_id(&mut *tx, role_id).await?.is_none() {
        return Err(ServiceError::NotFound("Role not found"));
    }
    ensure_all_exist(&mut tx, Dictionary::Permissions, &permission_ids).await?;

    repositories::roles::clear_permissions(&mut *tx, role_id).await?;
    repositories::roles::insert_permissions(&mut *tx, role_id, &permission_ids).await?;
    let stored = repositories::roles::permissions_for_role(&mut *tx, role_id).await?;

    tx.commit().await?;
    tracing::info!(role_id, permissions = stored.len(), "Role permissions reassigned");
    Ok(stored)
}
