//! # Session Holder
//!
//! Tracks who is signed in: a `User` plus the opaque bearer token the backend
//! handed out. The pair round-trips through a `KeyValueStore` under two keys
//! (`user` as JSON, `token` as-is) so it survives a restart.
//!
//! ```text
//! unauthenticated ──authenticate()──▶ authenticated ──logout()──▶ unauthenticated
//! ```
//!
//! There is no refresh and no expiry check. A token is trusted until the
//! backend rejects it.

use std::io;
use std::sync::Arc;

use log::{debug, info, warn};

use crate::backend::User;
use crate::core::storage::KeyValueStore;

pub const USER_KEY: &str = "user";
pub const TOKEN_KEY: &str = "token";

/// An authenticated user and their bearer token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user: User,
    pub token: String,
}

pub struct SessionHolder {
    store: Arc<dyn KeyValueStore>,
    current: Option<Session>,
}

impl SessionHolder {
    /// Restores the session from `store`. Authenticated only if both keys are
    /// present, non-empty, and the user record parses.
    pub fn restore(store: Arc<dyn KeyValueStore>) -> Self {
        let current = match read_session(store.as_ref()) {
            Ok(session) => session,
            Err(e) => {
                warn!("Failed to restore session: {}", e);
                None
            }
        };

        match &current {
            Some(session) => info!("Restored session for user {}", session.user.id),
            None => debug!("No stored session"),
        }

        Self { store, current }
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.is_some()
    }

    pub fn user_id(&self) -> Option<i64> {
        self.current.as_ref().map(|s| s.user.id)
    }

    /// Stores `user` and `token` in memory and in the store.
    ///
    /// The in-memory session is set even if persisting fails; the error is
    /// returned so the caller can log it.
    pub fn authenticate(&mut self, user: User, token: String) -> io::Result<()> {
        info!("Authenticated as user {}", user.id);
        let user_json = serde_json::to_string(&user)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        let persisted = self
            .store
            .set(USER_KEY, &user_json)
            .and_then(|()| self.store.set(TOKEN_KEY, &token));
        self.current = Some(Session { user, token });
        persisted
    }

    /// Clears the session from memory and from the store.
    ///
    /// Memory is always cleared; both keys are removed even if the first
    /// removal fails.
    pub fn logout(&mut self) -> io::Result<()> {
        if let Some(session) = self.current.take() {
            info!("Logged out user {}", session.user.id);
        }
        let user_result = self.store.remove(USER_KEY);
        let token_result = self.store.remove(TOKEN_KEY);
        user_result.and(token_result)
    }
}

fn read_session(store: &dyn KeyValueStore) -> io::Result<Option<Session>> {
    let user_json = store.get(USER_KEY)?.filter(|v| !v.is_empty());
    let token = store.get(TOKEN_KEY)?.filter(|v| !v.is_empty());

    let (Some(user_json), Some(token)) = (user_json, token) else {
        return Ok(None);
    };

    let user: User = serde_json::from_str(&user_json)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    Ok(Some(Session { user, token }))
}
