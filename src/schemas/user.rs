use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Role, User};
use crate::schemas::dictionary::NamedEntityResponse;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct UserCreate {
    #[validate(length(min = 1, max = 150, message = "username must be 1-150 characters"))]
    pub(crate) username: String,
    #[validate(length(min = 1, message = "password must not be empty"))]
    pub(crate) password: String,
    /// Role names granted on creation. Unknown names are rejected.
    #[serde(default)]
    pub(crate) roles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct UserRolesUpdate {
    pub(crate) role_ids: Vec<i64>,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct RoleCreate {
    #[validate(length(min = 1, max = 64, message = "name must be 1-64 characters"))]
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RolePermissionsUpdate {
    #[serde(default)]
    pub(crate) permission_ids: Vec<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListUsersQuery {
    #[serde(default)]
    pub(crate) username: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListRolesQuery {
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RoleResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: String,
}

impl RoleResponse {
    pub(crate) fn from_db(role: Role) -> Self {
        Self { id: role.id, name: role.name, created_at: format_primitive(role.created_at) }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RolePermissionsResponse {
    pub(crate) role_id: i64,
    pub(crate) permissions: Vec<NamedEntityResponse>,
}

#[derive(Debug, Serialize)]
pub(crate) struct UserResponse {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
    pub(crate) roles: Vec<RoleResponse>,
}

impl UserResponse {
    pub(crate) fn from_db(user: User, roles: Vec<Role>) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
            roles: roles.into_iter().map(RoleResponse::from_db).collect(),
        }
    }
}

/// Row of `GET /users`; roles are left out to keep the listing to one query.
#[derive(Debug, Serialize)]
pub(crate) struct UserSummary {
    pub(crate) id: i64,
    pub(crate) username: String,
    pub(crate) is_active: bool,
    pub(crate) created_at: String,
}

impl UserSummary {
    pub(crate) fn from_db(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            is_active: user.is_active,
            created_at: format_primitive(user.created_at),
        }
    }
}
