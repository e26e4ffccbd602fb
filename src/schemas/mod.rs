use std::collections::HashMap;

use serde::Serialize;

pub(crate) mod auth;
pub(crate) mod dictionary;
pub(crate) mod people;
pub(crate) mod question;
pub(crate) mod quiz;
pub(crate) mod result;
pub(crate) mod user;

#[derive(Debug, Serialize)]
pub(crate) struct HealthResponse {
    pub(crate) service: String,
    pub(crate) status: String,
    pub(crate) components: HashMap<String, String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct RootResponse {
    pub(crate) message: String,
    pub(crate) version: String,
    pub(crate) api_prefix: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct DeletedResponse {
    pub(crate) id: i64,
    pub(crate) deleted: bool,
}

impl DeletedResponse {
    pub(crate) fn new(id: i64) -> Self {
        Self { id, deleted: true }
    }
}
