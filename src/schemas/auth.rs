use serde::{Deserialize, Serialize};

use crate::core::security::TokenPair;

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) username: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RefreshRequest {
    pub(crate) refresh_token: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    #[serde(rename = "type")]
    pub(crate) token_type: &'static str,
    pub(crate) access_token: String,
    pub(crate) refresh_token: String,
}

impl From<TokenPair> for TokenResponse {
    fn from(pair: TokenPair) -> Self {
        Self {
            token_type: "Bearer",
            access_token: pair.access_token,
            refresh_token: pair.refresh_token,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct MeResponse {
    #[serde(flatten)]
    pub(crate) user: crate::schemas::user::UserResponse,
    pub(crate) teacher: Option<crate::schemas::people::TeacherResponse>,
    pub(crate) student: Option<crate::schemas::people::StudentResponse>,
}
