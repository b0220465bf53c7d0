pub mod token;

use crate::store::TokenStore;
use crate::time::current_timestamp;
use crate::types::session::Session;

/// Read-only decisions about the current session.
///
/// Nothing is cached: every call goes back to the [`TokenStore`], so a logout
/// done by another process is seen on the next check.
#[derive(Clone)]
pub struct Evaluator {
    store: TokenStore,
}

impl Evaluator {
    pub fn new(store: TokenStore) -> Self {
        Self { store }
    }

    pub fn is_authenticated(&self) -> bool {
        self.store.read_token().is_some() && !self.is_token_expired()
    }

    /// True when there is no token, or when its expiry is past or unreadable.
    pub fn is_token_expired(&self) -> bool {
        match self.store.read_token() {
            Some(token) => token::is_expired_at(&token, current_timestamp()),
            None => true,
        }
    }

    /// Exact match against the stored roles, there is no role hierarchy.
    pub fn has_role(&self, role: &str) -> bool {
        match self.store.read_session() {
            Some(session) => session.roles.contains(role),
            None => false,
        }
    }

    pub fn current_user(&self) -> Option<Session> {
        self.store.read_session()
    }
}
