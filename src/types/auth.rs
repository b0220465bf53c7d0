use serde::{Deserialize, Serialize};

pub const ROLE_AGENT: &str = "ROLE_AGENT_GUICHET";
pub const ROLE_CLIENT: &str = "ROLE_CLIENT";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    #[serde(default)]
    pub token: String,

    #[serde(default)]
    pub roles: Vec<String>,

    #[serde(default)]
    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Token lifetime in milliseconds, as announced by the server.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub current_password: String,
    pub new_password: String,
}

impl ChangePasswordRequest {
    pub const MIN_PASSWORD_LENGTH: usize = 6;
}
