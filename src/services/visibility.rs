//! Read scopes for quiz and result listings.
//!
//! A [`Scope`] is derived once per request from the caller's role facts and then rendered
//! into SQL for whichever table is being listed, so quizzes and results share one policy:
//!
//! * students see rows of their own group, or nothing when they have no group;
//! * teachers see rows matching any assigned group OR any assigned subject, or nothing
//!   when they have no assignments;
//! * everyone else is unrestricted.

use sqlx::{PgPool, Postgres, QueryBuilder};

use crate::db::types::RoleKind;
use crate::services::identity::{self, Actor};

/// Primary key value no row can have. Used to express "empty result" without changing
/// the query shape.
pub(crate) const NO_MATCH_ID: i64 = -1;

/// Tables that carry the denormalized `group_id` / `subject_id` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntityKind {
    Quiz,
    Result,
}

impl EntityKind {
    /// Alias the listing queries give the table in their `FROM` clause.
    pub(crate) fn alias(self) -> &'static str {
        match self {
            EntityKind::Quiz => "q",
            EntityKind::Result => "r",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Scope {
    Unrestricted,
    Group(i64),
    Assigned { group_ids: Vec<i64>, subject_ids: Vec<i64> },
    Nothing,
}

impl Scope {
    pub(crate) fn for_student(group_id: Option<i64>) -> Self {
        match group_id {
            Some(group_id) => Scope::Group(group_id),
            None => Scope::Nothing,
        }
    }

    pub(crate) fn for_teacher(group_ids: Vec<i64>, subject_ids: Vec<i64>) -> Self {
        if group_ids.is_empty() && subject_ids.is_empty() {
            Scope::Nothing
        } else {
            Scope::Assigned { group_ids, subject_ids }
        }
    }

    /// Appends ` AND (<predicate>)` for the table aliased by `kind`. Unrestricted scopes
    /// append nothing.
    pub(crate) fn push_predicate(&self, builder: &mut QueryBuilder<'_, Postgres>, kind: EntityKind) {
        let alias = kind.alias();
        match self {
            Scope::Unrestricted => {}
            Scope::Group(group_id) => {
                builder.push(format!(" AND {alias}.group_id = "));
                builder.push_bind(*group_id);
            }
            Scope::Assigned { group_ids, subject_ids } => {
                builder.push(" AND (");
                let mut separated = builder.separated(" OR ");
                if !group_ids.is_empty() {
                    separated.push(format!("{alias}.group_id = ANY("));
                    separated.push_bind_unseparated(group_ids.clone());
                    separated.push_unseparated(")");
                }
                if !subject_ids.is_empty() {
                    separated.push(format!("{alias}.subject_id = ANY("));
                    separated.push_bind_unseparated(subject_ids.clone());
                    separated.push_unseparated(")");
                }
                builder.push(")");
            }
            Scope::Nothing => {
                builder.push(format!(" AND {alias}.id = "));
                builder.push_bind(NO_MATCH_ID);
            }
        }
    }

    /// In-memory counterpart of [`Scope::push_predicate`] for a single row.
    pub(crate) fn admits(&self, group_id: Option<i64>, subject_id: Option<i64>) -> bool {
        match self {
            Scope::Unrestricted => true,
            Scope::Group(expected) => group_id == Some(*expected),
            Scope::Assigned { group_ids, subject_ids } => {
                group_id.is_some_and(|id| group_ids.contains(&id))
                    || subject_id.is_some_and(|id| subject_ids.contains(&id))
            }
            Scope::Nothing => false,
        }
    }
}

/// Resolves the caller's scope, loading only the facts its deciding role needs.
pub(crate) async fn resolve_scope(pool: &PgPool, actor: &Actor) -> Result<Scope, sqlx::Error> {
    match actor.scoping_role() {
        RoleKind::Student => {
            let group_id = identity::student_group(pool, actor.id()).await?;
            Ok(Scope::for_student(group_id))
        }
        RoleKind::Teacher => {
            let assignments = identity::teacher_assignments(pool, actor.id()).await?;
            Ok(Scope::for_teacher(assignments.group_ids, assignments.subject_ids))
        }
        RoleKind::Admin | RoleKind::Other => Ok(Scope::Unrestricted),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rendered(scope: &Scope, kind: EntityKind) -> String {
        let mut builder = QueryBuilder::<Postgres>::new("SELECT 1 FROM quizzes q WHERE TRUE");
        scope.push_predicate(&mut builder, kind);
        builder.sql().to_string()
    }

    #[test]
    fn student_without_group_sees_nothing() {
        assert_eq!(Scope::for_student(None), Scope::Nothing);
        assert_eq!(Scope::for_student(Some(4)), Scope::Group(4));
    }

    #[test]
    fn teacher_without_assignments_sees_nothing() {
        assert_eq!(Scope::for_teacher(Vec::new(), Vec::new()), Scope::Nothing);
        assert!(matches!(Scope::for_teacher(vec![1], Vec::new()), Scope::Assigned { .. }));
    }

    #[test]
    fn unrestricted_scope_adds_no_predicate() {
        assert_eq!(
            rendered(&Scope::Unrestricted, EntityKind::Quiz),
            "SELECT 1 FROM quizzes q WHERE TRUE"
        );
    }

    #[test]
    fn group_scope_uses_entity_alias() {
        assert!(rendered(&Scope::Group(3), EntityKind::Result).ends_with(" AND r.group_id = $1"));
    }

    #[test]
    fn assigned_scope_ors_groups_and_subjects() {
        let scope = Scope::for_teacher(vec![1, 2], vec![7]);
        assert!(rendered(&scope, EntityKind::Quiz)
            .ends_with(" AND (q.group_id = ANY($1) OR q.subject_id = ANY($2))"));
    }

    #[test]
    fn assigned_scope_skips_empty_side() {
        let scope = Scope::for_teacher(Vec::new(), vec![7]);
        assert!(rendered(&scope, EntityKind::Quiz).ends_with(" AND (q.subject_id = ANY($1))"));
    }

    #[test]
    fn nothing_scope_uses_sentinel_id() {
        assert!(rendered(&Scope::Nothing, EntityKind::Quiz).ends_with(" AND q.id = $1"));
    }

    #[test]
    fn admits_mirrors_predicate() {
        let scope = Scope::for_teacher(vec![1], vec![7]);
        assert!(scope.admits(Some(1), None));
        assert!(scope.admits(Some(99), Some(7)));
        assert!(!scope.admits(Some(99), Some(8)));
        assert!(!scope.admits(None, None));
        assert!(Scope::Group(5).admits(Some(5), None));
        assert!(!Scope::Group(5).admits(None, Some(5)));
        assert!(!Scope::Nothing.admits(Some(1), Some(1)));
        assert!(Scope::Unrestricted.admits(None, None));
    }
}
