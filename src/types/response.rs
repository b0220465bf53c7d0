use serde::{Deserialize, Serialize};

pub const MIME_JSON: &str = "application/json";

/// Body returned by the create/update endpoints, and by every error response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}
