//! HTTP implementation of the `Backend` trait.
//!
//! Two endpoints, both plain JSON:
//! - auth: `POST {action: "login" | "register", ...}`
//! - chats: `GET` (chat list), `GET ?chat_id=N` (messages), `POST {action: ...}`
//!
//! Chat requests identify the caller with `X-User-Id` and carry the bearer
//! token in `X-Auth-Token`.

use async_trait::async_trait;
use log::{debug, info, warn};
use reqwest::Method;
use serde::de::DeserializeOwned;

use crate::backend::types::{
    AuthPayload, AuthRequest, Chat, ChatRequest, ChatsEnvelope, CreatedChatEnvelope, Credentials,
    ErrorBody, Message, MessagesEnvelope, Registration, SentMessageEnvelope,
};
use crate::backend::{Backend, BackendError};
use crate::core::session::Session;

pub const USER_ID_HEADER: &str = "X-User-Id";
pub const AUTH_TOKEN_HEADER: &str = "X-Auth-Token";

const LOGIN_FALLBACK: &str = "Login failed";
const REGISTER_FALLBACK: &str = "Registration failed";
const REQUEST_FALLBACK: &str = "Request failed";

/// Backend reached over HTTP.
pub struct HttpBackend {
    auth_url: String,
    chats_url: String,
    client: reqwest::Client,
}

impl HttpBackend {
    /// Creates a backend for the given endpoint addresses.
    pub fn new(auth_url: String, chats_url: String) -> Self {
        Self {
            auth_url,
            chats_url,
            client: reqwest::Client::new(),
        }
    }

    async fn post_auth(
        &self,
        body: &AuthRequest<'_>,
        fallback: &str,
    ) -> Result<AuthPayload, BackendError> {
        let response = self
            .client
            .post(&self.auth_url)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        read_json(response, fallback).await
    }

    /// Starts a request to the chats endpoint with the identity headers set.
    fn chats_request(&self, method: Method, session: &Session) -> reqwest::RequestBuilder {
        self.client
            .request(method, &self.chats_url)
            .header(USER_ID_HEADER, session.user.id.to_string())
            .header(AUTH_TOKEN_HEADER, &session.token)
    }

    async fn post_chats<T: DeserializeOwned>(
        &self,
        session: &Session,
        body: &ChatRequest<'_>,
    ) -> Result<T, BackendError> {
        let response = self
            .chats_request(Method::POST, session)
            .json(body)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        read_json(response, REQUEST_FALLBACK).await
    }
}

/// Reads a response body as `T`, mapping non-2xx statuses to `BackendError::Api`
/// with the server's `error` string (or `fallback` when there is none).
async fn read_json<T: DeserializeOwned>(
    response: reqwest::Response,
    fallback: &str,
) -> Result<T, BackendError> {
    let status = response.status();
    debug!("Backend response status: {}", status);

    let body = response
        .text()
        .await
        .map_err(|e| BackendError::Network(e.to_string()))?;

    if !status.is_success() {
        let message = serde_json::from_str::<ErrorBody>(&body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| fallback.to_string());
        warn!("Backend error: {} - {}", status.as_u16(), message);
        return Err(BackendError::Api {
            status: status.as_u16(),
            message,
        });
    }

    serde_json::from_str(&body).map_err(|e| BackendError::Parse(e.to_string()))
}

#[async_trait]
impl Backend for HttpBackend {
    fn name(&self) -> &str {
        "http"
    }

    async fn login(&self, credentials: &Credentials) -> Result<AuthPayload, BackendError> {
        info!("Login request");
        let body = AuthRequest::Login {
            email: &credentials.email,
            password: &credentials.password,
        };
        self.post_auth(&body, LOGIN_FALLBACK).await
    }

    async fn register(&self, registration: &Registration) -> Result<AuthPayload, BackendError> {
        info!("Register request");
        let body = AuthRequest::Register {
            email: &registration.email,
            password: &registration.password,
            name: &registration.name,
        };
        self.post_auth(&body, REGISTER_FALLBACK).await
    }

    async fn list_chats(&self, session: &Session) -> Result<Vec<Chat>, BackendError> {
        info!("Fetching chats for user {}", session.user.id);
        let response = self
            .chats_request(Method::GET, session)
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let envelope: ChatsEnvelope = read_json(response, REQUEST_FALLBACK).await?;
        debug!("Fetched {} chats", envelope.chats.len());
        Ok(envelope.chats)
    }

    async fn list_messages(
        &self,
        session: &Session,
        chat_id: i64,
    ) -> Result<Vec<Message>, BackendError> {
        info!("Fetching messages for chat {} (user {})", chat_id, session.user.id);
        let response = self
            .chats_request(Method::GET, session)
            .query(&[("chat_id", chat_id)])
            .send()
            .await
            .map_err(|e| BackendError::Network(e.to_string()))?;

        let envelope: MessagesEnvelope = read_json(response, REQUEST_FALLBACK).await?;
        debug!("Fetched {} messages for chat {}", envelope.messages.len(), chat_id);
        Ok(envelope.messages)
    }

    async fn send_message(
        &self,
        session: &Session,
        chat_id: i64,
        text: &str,
    ) -> Result<Message, BackendError> {
        info!("Sending message to chat {} (len={})", chat_id, text.len());
        let envelope: SentMessageEnvelope = self
            .post_chats(session, &ChatRequest::SendMessage { chat_id, text })
            .await?;
        Ok(envelope.message)
    }

    async fn create_chat(&self, session: &Session, other_user_id: i64) -> Result<i64, BackendError> {
        info!("Creating direct chat with user {}", other_user_id);
        let envelope: CreatedChatEnvelope = self
            .post_chats(session, &ChatRequest::CreateChat { other_user_id })
            .await?;
        Ok(envelope.chat_id)
    }
}
