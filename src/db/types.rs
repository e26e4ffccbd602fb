use serde::{Deserialize, Serialize};

/// Closed set of role kinds the visibility rules understand.
///
/// Variants are declared in scoping precedence order: when an account holds several
/// roles, the smallest one decides what it may see. `Admin` and `Other` are both
/// unrestricted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub(crate) enum RoleKind {
    Student,
    Teacher,
    Admin,
    Other,
}

impl RoleKind {
    pub(crate) fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "student" => RoleKind::Student,
            "teacher" => RoleKind::Teacher,
            "admin" => RoleKind::Admin,
            _ => RoleKind::Other,
        }
    }

    pub(crate) fn as_str(self) -> &'static str {
        match self {
            RoleKind::Student => "student",
            RoleKind::Teacher => "teacher",
            RoleKind::Admin => "admin",
            RoleKind::Other => "other",
        }
    }
}
