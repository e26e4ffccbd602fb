use crate::core::security;
use crate::core::state::AppState;
use crate::db::types::RoleKind;
use crate::repositories;

/// Role names every deployment needs for the visibility rules to apply.
const BUILTIN_ROLES: &[RoleKind] = &[RoleKind::Admin, RoleKind::Teacher, RoleKind::Student];

pub(crate) async fn ensure_builtin_roles(state: &AppState) -> anyhow::Result<()> {
    for role in BUILTIN_ROLES {
        repositories::roles::ensure(state.db(), role.as_str()).await?;
    }
    Ok(())
}

pub(crate) async fn ensure_superuser(state: &AppState) -> anyhow::Result<()> {
    let admin = state.settings().admin();
    if admin.first_superuser_password.is_empty() {
        tracing::warn!("FIRST_SUPERUSER_PASSWORD not configured; skipping superuser creation");
        return Ok(());
    }

    let username = admin.first_superuser_username.trim().to_lowercase();
    let admin_role = repositories::roles::ensure(state.db(), RoleKind::Admin.as_str()).await?;

    let user = match repositories::users::find_by_username(state.db(), &username).await? {
        Some(user) => {
            let verified =
                security::verify_password(&admin.first_superuser_password, &user.hashed_password)
                    .unwrap_or(false);
            if !verified || !user.is_active {
                let hashed_password = security::hash_password(&admin.first_superuser_password)?;
                repositories::users::reset_credentials(state.db(), user.id, &hashed_password)
                    .await?;
                tracing::info!(username = %username, "Updated default superuser");
            } else {
                tracing::info!("Default superuser already up to date");
            }
            user
        }
        None => {
            let hashed_password = security::hash_password(&admin.first_superuser_password)?;
            let user = repositories::users::create(state.db(), &username, &hashed_password).await?;
            tracing::info!(username = %username, "Created default superuser");
            user
        }
    };

    repositories::roles::grant(state.db(), user.id, admin_role.id).await?;
    Ok(())
}
