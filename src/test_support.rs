//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::backend::{
    AuthPayload, Backend, BackendError, Chat, Credentials, Message, Registration, User,
};
use crate::core::session::{Session, SessionHolder};
use crate::core::state::App;
use crate::core::storage::MemoryStore;

/// A fresh, not yet created directory under the system temp dir.
pub fn scratch_dir() -> PathBuf {
    std::env::temp_dir().join(format!("courier-test-{}", uuid::Uuid::new_v4()))
}

pub fn sample_user(id: i64, name: &str) -> User {
    User {
        id,
        name: name.to_string(),
        email: format!("user{id}@example.com"),
        avatar_url: None,
    }
}

pub fn sample_session(user_id: i64) -> Session {
    Session {
        user: sample_user(user_id, &format!("User {user_id}")),
        token: format!("token-{user_id}"),
    }
}

pub fn sample_chat(id: i64, name: Option<&str>) -> Chat {
    Chat {
        id,
        name: name.map(str::to_string),
        is_group: false,
        avatar_url: None,
        last_message: None,
        last_message_time: None,
        unread_count: 0,
    }
}

pub fn sample_message(id: i64, user_id: i64, text: &str) -> Message {
    Message {
        id,
        text: text.to_string(),
        user_id,
        user_name: Some(format!("User {user_id}")),
        user_avatar: None,
        created_at: None,
    }
}

/// Creates a signed-out App over an in-memory store.
pub fn test_app() -> App {
    App::new(SessionHolder::restore(Arc::new(MemoryStore::new())))
}

/// Creates an App already signed in as `sample_session(user_id)`.
pub fn signed_in_app(user_id: i64) -> App {
    let mut app = test_app();
    let session = sample_session(user_id);
    app.session
        .authenticate(session.user, session.token)
        .expect("memory store never fails");
    app
}

/// Canned backend for tests that don't need real HTTP calls.
/// Records every call as a short string so tests can assert on them.
#[derive(Default)]
pub struct FakeBackend {
    pub chats: Vec<Chat>,
    pub messages: Vec<Message>,
    /// Returned by `login` and `register` when set.
    pub auth_error: Option<BackendError>,
    /// Returned by every chat operation when set.
    pub chat_error: Option<BackendError>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl FakeBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }

    fn record(&self, call: String) {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(call);
        }
    }

    fn chat_result<T>(&self, value: T) -> Result<T, BackendError> {
        match &self.chat_error {
            Some(e) => Err(e.clone()),
            None => Ok(value),
        }
    }

    fn auth_result(&self, name: &str) -> Result<AuthPayload, BackendError> {
        match &self.auth_error {
            Some(e) => Err(e.clone()),
            None => Ok(AuthPayload {
                user: sample_user(1, name),
                token: "fake-token".to_string(),
            }),
        }
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn name(&self) -> &str {
        "fake"
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, BackendError> {
        self.record(format!("login email={}", credentials.email));
        self.auth_result("Fake User")
    }

    async fn register(&self, registration: &Registration) -> Result<AuthPayload, BackendError> {
        self.record(format!("register email={}", registration.email));
        self.auth_result(&registration.name)
    }

    async fn list_chats(&self, session: &Session) -> Result<Vec<Chat>, BackendError> {
        self.record(format!("list_chats user={}", session.user.id));
        self.chat_result(self.chats.clone())
    }

    async fn list_messages(
        &self,
        session: &Session,
        chat_id: i64,
    ) -> Result<Vec<Message>, BackendError> {
        self.record(format!("list_messages user={} chat={}", session.user.id, chat_id));
        self.chat_result(self.messages.clone())
    }

    async fn send_message(
        &self,
        session: &Session,
        chat_id: i64,
        text: &str,
    ) -> Result<Message, BackendError> {
        self.record(format!("send_message user={} chat={}", session.user.id, chat_id));
        self.chat_result(Message {
            id: 1000,
            text: text.to_string(),
            user_id: session.user.id,
            user_name: None,
            user_avatar: None,
            created_at: None,
        })
    }

    async fn create_chat(&self, session: &Session, other_user_id: i64) -> Result<i64, BackendError> {
        self.record(format!(
            "create_chat user={} other={}",
            session.user.id, other_user_id
        ));
        self.chat_result(500)
    }
}
