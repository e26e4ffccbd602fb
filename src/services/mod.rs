pub(crate) mod access_codes;
pub(crate) mod grading;
pub(crate) mod identity;
pub(crate) mod listing;
pub(crate) mod quiz_composition;
pub(crate) mod role_permissions;
pub(crate) mod teacher_assignments;
pub(crate) mod uploads;
pub(crate) mod visibility;

use thiserror::Error;

use crate::db;

/// Failures surfaced by the domain services. Storage details never reach the caller.
#[derive(Debug, Error)]
pub(crate) enum ServiceError {
    #[error("{0}")]
    NotFound(&'static str),
    #[error("{0}")]
    InvalidReference(&'static str),
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(&'static str),
    #[error("storage failure: {0}")]
    Storage(#[source] sqlx::Error),
}

impl From<sqlx::Error> for ServiceError {
    fn from(err: sqlx::Error) -> Self {
        if db::is_foreign_key_violation(&err) {
            return ServiceError::InvalidReference("Referenced entity does not exist");
        }
        if db::is_unique_violation(&err) {
            return ServiceError::Conflict("Entity already exists");
        }
        ServiceError::Storage(err)
    }
}
