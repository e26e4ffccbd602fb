use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Kafedra, NamedEntity};

/// Body of create and rename for the name-only dictionaries.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct NamedEntityInput {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub(crate) name: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListNamedQuery {
    #[serde(default)]
    pub(crate) name: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct NamedEntityResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl NamedEntityResponse {
    pub(crate) fn from_db(entity: NamedEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            created_at: format_primitive(entity.created_at),
            updated_at: format_primitive(entity.updated_at),
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct KafedraInput {
    #[validate(length(min = 1, max = 255, message = "name must be 1-255 characters"))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) faculty_id: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ListKafedrasQuery {
    #[serde(default)]
    pub(crate) name: Option<String>,
    #[serde(default)]
    pub(crate) faculty_id: Option<i64>,
}

#[derive(Debug, Serialize)]
pub(crate) struct KafedraResponse {
    pub(crate) id: i64,
    pub(crate) name: String,
    pub(crate) faculty_id: Option<i64>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl KafedraResponse {
    pub(crate) fn from_db(kafedra: Kafedra) -> Self {
        Self {
            id: kafedra.id,
            name: kafedra.name,
            faculty_id: kafedra.faculty_id,
            created_at: format_primitive(kafedra.created_at),
            updated_at: format_primitive(kafedra.updated_at),
        }
    }
}
