use std::collections::BTreeSet;

use serde::{Deserialize, Deserializer, Serialize};

use super::auth::LoginResponse;

/// The signed-in user, as persisted next to the raw token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub token: String,

    /// Missing or `null` roles read as no roles.
    #[serde(default, deserialize_with = "deserialize_roles")]
    pub roles: BTreeSet<String>,

    pub username: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

fn deserialize_roles<'de, D>(deserializer: D) -> Result<BTreeSet<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let roles: Option<BTreeSet<String>> = Option::deserialize(deserializer)?;
    Ok(roles.unwrap_or_default())
}

impl From<LoginResponse> for Session {
    fn from(resp: LoginResponse) -> Self {
        Self {
            token: resp.token,
            roles: resp.roles.into_iter().collect(),
            username: resp.username,
            email: resp.email,
        }
    }
}
