//! Session store
//!
//! Holds the authenticated identity and bearer token. Explicitly
//! constructed and injected rather than ambient, so each test can own an
//! isolated instance. Every mutation writes through to durable storage
//! before touching memory: a crash in between leaves storage ahead of
//! memory, never behind it.

use crate::storage::{KeyValueStorage, AUTH_TOKEN_KEY, USER_KEY};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{info, warn};

/// The authenticated user as the client holds it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    pub id: String,
    pub username: String,
    pub role: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub token: Option<String>,
}

/// Process-wide session state backed by durable storage.
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
    current: RwLock<Option<SessionUser>>,
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self {
            storage,
            current: RwLock::new(None),
        }
    }

    /// Rehydrate the session from storage at process start.
    ///
    /// Corrupt persisted JSON is self-healing: the entries are deleted and
    /// the session stays anonymous. Never fails.
    pub fn initialize(&self) {
        let token = self.storage.get(AUTH_TOKEN_KEY);
        let raw_user = self.storage.get(USER_KEY);

        let (Some(_), Some(raw_user)) = (token, raw_user) else {
            return;
        };

        match serde_json::from_str::<SessionUser>(&raw_user) {
            Ok(user) => {
                info!(username = %user.username, "session restored");
                *self.current.write() = Some(user);
            }
            Err(err) => {
                warn!("clearing corrupt persisted session: {}", err);
                self.storage.remove(AUTH_TOKEN_KEY);
                self.storage.remove(USER_KEY);
            }
        }
    }

    /// Persist and activate a logged-in session.
    pub fn login(&self, user: SessionUser) {
        self.storage
            .set(AUTH_TOKEN_KEY, user.token.as_deref().unwrap_or(""));
        if let Ok(raw) = serde_json::to_string(&user) {
            self.storage.set(USER_KEY, &raw);
        }
        *self.current.write() = Some(user);
    }

    /// Clear the session. Purely local; no server-side invalidation.
    pub fn logout(&self) {
        self.storage.remove(AUTH_TOKEN_KEY);
        self.storage.remove(USER_KEY);
        *self.current.write() = None;
    }

    /// Replace the user record after a profile edit, keeping the stored
    /// token when the update does not carry one.
    pub fn set_user(&self, mut user: SessionUser) {
        if user.token.is_none() {
            user.token = self
                .storage
                .get(AUTH_TOKEN_KEY)
                .filter(|token| !token.is_empty());
        }
        if let Ok(raw) = serde_json::to_string(&user) {
            self.storage.set(USER_KEY, &raw);
        }
        *self.current.write() = Some(user);
    }

    pub fn current(&self) -> Option<SessionUser> {
        self.current.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.current.read().is_some()
    }

    /// Role gate for the admin views.
    pub fn is_admin(&self) -> bool {
        self.current
            .read()
            .as_ref()
            .is_some_and(|user| user.role.eq_ignore_ascii_case("admin"))
    }

    /// Persist just the token, ahead of fetching the profile it unlocks.
    /// Used by the login flows; a later `login` or `logout` supersedes it.
    pub fn set_token(&self, token: &str) {
        self.storage.set(AUTH_TOKEN_KEY, token);
    }

    pub fn token(&self) -> Option<String> {
        self.storage
            .get(AUTH_TOKEN_KEY)
            .filter(|token| !token.is_empty())
    }
}
