//! Who the caller is and which groups / subjects it is tied to.

use sqlx::PgExecutor;

use crate::db::models::User;
use crate::db::types::RoleKind;
use crate::repositories;

#[derive(Debug, Clone)]
pub(crate) struct Actor {
    pub(crate) user: User,
    roles: Vec<RoleKind>,
}

/// Group and subject ids a teacher account is assigned to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct TeacherAssignments {
    pub(crate) group_ids: Vec<i64>,
    pub(crate) subject_ids: Vec<i64>,
}

impl Actor {
    pub(crate) fn new<I, S>(user: User, role_names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut roles: Vec<RoleKind> =
            role_names.into_iter().map(|name| RoleKind::from_name(name.as_ref())).collect();
        roles.sort();
        roles.dedup();
        Self { user, roles }
    }

    pub(crate) fn id(&self) -> i64 {
        self.user.id
    }

    pub(crate) fn has_role(&self, role: RoleKind) -> bool {
        self.roles.contains(&role)
    }

    /// The single role that decides row visibility: student, then teacher, then anything else.
    pub(crate) fn scoping_role(&self) -> RoleKind {
        self.roles.first().copied().unwrap_or(RoleKind::Other)
    }

    pub(crate) fn is_admin(&self) -> bool {
        self.has_role(RoleKind::Admin)
    }

    pub(crate) fn is_staff(&self) -> bool {
        self.is_admin() || self.has_role(RoleKind::Teacher)
    }
}

pub(crate) async fn load_actor(
    executor: impl PgExecutor<'_> + Copy,
    user_id: i64,
) -> Result<Option<Actor>, sqlx::Error> {
    let Some(user) = repositories::users::find_by_id(executor, user_id).await? else {
        return Ok(None);
    };
    let role_names = repositories::roles::names_for_user(executor, user_id).await?;
    Ok(Some(Actor::new(user, role_names)))
}

pub(crate) async fn student_group(
    executor: impl PgExecutor<'_>,
    user_id: i64,
) -> Result<Option<i64>, sqlx::Error> {
    repositories::students::group_id_for_user(executor, user_id).await
}

pub(crate) async fn teacher_assignments(
    executor: impl PgExecutor<'_> + Copy,
    user_id: i64,
) -> Result<TeacherAssignments, sqlx::Error> {
    let group_ids = repositories::teachers::assigned_group_ids(executor, user_id).await?;
    let subject_ids =
        repositories::teachers::assigned_subject_ids_for_user(executor, user_id).await?;
    Ok(TeacherAssignments { group_ids, subject_ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::time::primitive_now_utc;

    fn user() -> User {
        let now = primitive_now_utc();
        User {
            id: 9,
            username: "someone".to_string(),
            hashed_password: String::new(),
            is_active: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn student_role_wins_over_teacher() {
        let actor = Actor::new(user(), ["Teacher", "student"]);
        assert_eq!(actor.scoping_role(), RoleKind::Student);
        assert!(actor.is_staff());
    }

    #[test]
    fn actor_without_roles_is_unscoped() {
        let actor = Actor::new(user(), Vec::<String>::new());
        assert_eq!(actor.scoping_role(), RoleKind::Other);
        assert!(!actor.is_staff());
    }

    #[test]
    fn duplicate_role_names_collapse() {
        let actor = Actor::new(user(), ["admin", "ADMIN", "auditor"]);
        assert_eq!(actor.roles, vec![RoleKind::Admin, RoleKind::Other]);
        assert_eq!(actor.scoping_role(), RoleKind::Admin);
    }
}
