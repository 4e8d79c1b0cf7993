use std::fmt;

use async_trait::async_trait;

use super::types::{AuthPayload, Chat, Credentials, Message, Registration};
use crate::core::session::Session;

/// Errors that can occur while talking to the backend.
/// There is no retry; the variants only decide how a failure is described.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendError {
    /// Network-level failure (timeout, DNS, connection refused).
    Network(String),
    /// The backend answered with a non-2xx status. `message` is the server's
    /// `error` string, or a fallback when the body carried none.
    Api { status: u16, message: String },
    /// The response body was not the JSON we expected.
    Parse(String),
}

impl BackendError {
    /// Text suitable for showing inline to the user.
    pub fn user_message(&self) -> String {
        match self {
            BackendError::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for BackendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendError::Network(msg) => write!(f, "network error: {msg}"),
            BackendError::Api { status, message } => {
                write!(f, "API error (HTTP {status}): {message}")
            }
            BackendError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for BackendError {}

/// The remote messaging service.
///
/// Every chat operation takes the `Session` so that no conversation or message
/// request can be issued without a known user id attached.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Returns the name of the backend (for logs).
    fn name(&self) -> &str;

    /// Exchanges credentials for a user record and token.
    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, BackendError>;

    /// Creates an account and signs it in.
    async fn register(&self, registration: &Registration) -> Result<AuthPayload, BackendError>;

    /// Lists every conversation the session user belongs to.
    async fn list_chats(&self, session: &Session) -> Result<Vec<Chat>, BackendError>;

    /// Lists the full message history of one conversation, oldest first.
    async fn list_messages(&self, session: &Session, chat_id: i64)
    -> Result<Vec<Message>, BackendError>;

    /// Posts a message and returns the stored copy.
    async fn send_message(
        &self,
        session: &Session,
        chat_id: i64,
        text: &str,
    ) -> Result<Message, BackendError>;

    /// Opens a direct conversation with another user. Returns the new chat id.
    async fn create_chat(&self, session: &Session, other_user_id: i64) -> Result<i64, BackendError>;
}
