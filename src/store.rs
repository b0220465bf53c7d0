use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, warn};

use crate::storage::Storage;
use crate::types::session::Session;

/// Storage key holding the raw bearer token.
pub const TOKEN_KEY: &str = "ebank_auth_token";

/// Storage key holding the JSON-serialized [`Session`].
pub const USER_KEY: &str = "ebank_user";

/// The only writer of the persisted session. Everything else reads through
/// it, so the two keys are always handled the same way.
#[derive(Clone)]
pub struct TokenStore {
    storage: Arc<dyn Storage>,
}

impl TokenStore {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Writes the token, then the session. The writes are independent: when
    /// the second one fails the new token stays next to whatever session was
    /// stored before.
    pub fn save(&self, token: &str, session: &Session) -> Result<()> {
        let data = serde_json::to_string(session).context("encode session")?;
        self.storage
            .set_item(TOKEN_KEY, token)
            .context("save token")?;
        self.storage
            .set_item(USER_KEY, &data)
            .context("save session")?;
        debug!("Saved session for user '{}'", session.username);
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        self.storage
            .remove_item(TOKEN_KEY)
            .context("remove token")?;
        self.storage
            .remove_item(USER_KEY)
            .context("remove session")?;
        Ok(())
    }

    pub fn read_token(&self) -> Option<String> {
        match self.storage.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|token| !token.is_empty()),
            Err(e) => {
                warn!("Read token from storage failed, treat as absent: {e:#}");
                None
            }
        }
    }

    pub fn read_session(&self) -> Option<Session> {
        let data = match self.storage.get_item(USER_KEY) {
            Ok(Some(data)) => data,
            Ok(None) => return None,
            Err(e) => {
                warn!("Read session from storage failed, treat as absent: {e:#}");
                return None;
            }
        };

        match serde_json::from_str(&data) {
            Ok(session) => Some(session),
            Err(_) => {
                warn!("Stored session has invalid data, we will ignore it");
                None
            }
        }
    }
}
