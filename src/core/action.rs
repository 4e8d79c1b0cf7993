//! # Actions
//!
//! Everything that can happen in Courier becomes an `Action`.
//! User submits the login form? That's `Action::SubmitLogin(credentials)`.
//! Backend answers? That's `Action::ChatsLoaded { .. }`.
//!
//! `update()` applies an action to the state and returns an `Effect`: the
//! network work the caller should start next. Network I/O never happens here;
//! the only side effect is the session holder writing to its store.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info, warn};

use crate::backend::{AuthPayload, BackendError, Chat, Credentials, Message, Registration};
use crate::core::auth::{validate_login, validate_registration};
use crate::core::session::Session;
use crate::core::state::{App, Tab};

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SubmitLogin(Credentials),
    SubmitRegister(Registration),
    ToggleAuthMode,
    AuthSucceeded(AuthPayload),
    AuthFailed(String),
    Logout,
    RefreshChats,
    ChatsLoaded { user_id: i64, chats: Vec<Chat> },
    ChatsFailed { user_id: i64, error: BackendError },
    SelectChat(i64),
    MessagesLoaded { chat_id: i64, messages: Vec<Message> },
    MessagesFailed { chat_id: i64, error: BackendError },
    /// Send whatever is in the composer.
    SendDraft,
    MessageSent { chat_id: i64, message: Message },
    SendFailed { chat_id: i64, error: BackendError },
    CreateChat { other_user_id: i64 },
    ChatCreated { chat_id: i64 },
    CreateChatFailed(BackendError),
    SelectTab(Tab),
    Quit,
}

/// Work requested by `update()`. Chat effects carry the session they were
/// issued under, so every request has a user id attached.
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    None,
    Quit,
    Login(Credentials),
    Register(Registration),
    FetchChats(Session),
    FetchMessages { session: Session, chat_id: i64 },
    SendMessage { session: Session, chat_id: i64, text: String },
    CreateChat { session: Session, other_user_id: i64 },
    /// Several independent effects, started together.
    Batch(Vec<Effect>),
}

impl Effect {
    /// The individual effects to run, with batches flattened and `None` dropped.
    pub fn into_parts(self) -> Vec<Effect> {
        match self {
            Effect::None => Vec::new(),
            Effect::Batch(effects) => effects.into_iter().flat_map(Effect::into_parts).collect(),
            other => vec![other],
        }
    }
}

pub fn update(app: &mut App, action: Action) -> Effect {
    match action {
        Action::SubmitLogin(credentials) => {
            if app.auth.is_loading {
                return Effect::None;
            }
            if let Err(e) = validate_login(&credentials) {
                app.auth.error = Some(e.to_string());
                return Effect::None;
            }
            app.auth.is_loading = true;
            app.auth.error = None;
            Effect::Login(credentials)
        }
        Action::SubmitRegister(registration) => {
            if app.auth.is_loading {
                return Effect::None;
            }
            if let Err(e) = validate_registration(&registration) {
                app.auth.error = Some(e.to_string());
                return Effect::None;
            }
            app.auth.is_loading = true;
            app.auth.error = None;
            Effect::Register(registration)
        }
        Action::ToggleAuthMode => {
            if !app.auth.is_loading {
                app.auth.mode = app.auth.mode.toggled();
                app.auth.error = None;
            }
            Effect::None
        }
        Action::AuthSucceeded(AuthPayload { user, token }) => {
            app.auth.is_loading = false;
            app.auth.error = None;
            app.clear_user_data();
            if let Err(e) = app.session.authenticate(user, token) {
                warn!("Failed to persist session: {}", e);
            }
            match app.session.current() {
                Some(session) => {
                    app.status_message = format!("Signed in as {}", session.user.name);
                    Effect::FetchChats(session.clone())
                }
                None => Effect::None,
            }
        }
        Action::AuthFailed(message) => {
            app.auth.is_loading = false;
            app.auth.error = Some(message);
            Effect::None
        }
        Action::Logout => {
            if let Err(e) = app.session.logout() {
                warn!("Failed to clear stored session: {}", e);
            }
            app.clear_user_data();
            app.auth = Default::default();
            app.status_message = String::from("Signed out");
            Effect::None
        }
        Action::RefreshChats => match app.session.current() {
            Some(session) => Effect::FetchChats(session.clone()),
            None => Effect::None,
        },
        Action::ChatsLoaded { user_id, chats } => {
            if app.session.user_id() != Some(user_id) {
                debug!("Discarding chats for user {} (no longer signed in)", user_id);
                return Effect::None;
            }
            info!("Loaded {} chats", chats.len());
            app.chats = chats;
            Effect::None
        }
        Action::ChatsFailed { user_id, error } => {
            warn!("Failed to load chats for user {}: {}", user_id, error);
            Effect::None
        }
        Action::SelectChat(chat_id) => {
            let Some(session) = app.session.current() else {
                return Effect::None;
            };
            if app.selected_chat_id == Some(chat_id) {
                return Effect::None;
            }
            let session = session.clone();
            app.selected_chat_id = Some(chat_id);
            app.messages.clear();
            Effect::FetchMessages { session, chat_id }
        }
        Action::MessagesLoaded { chat_id, messages } => {
            if app.selected_chat_id != Some(chat_id) {
                debug!("Discarding stale messages for chat {}", chat_id);
                return Effect::None;
            }
            info!("Loaded {} messages for chat {}", messages.len(), chat_id);
            app.messages = messages;
            Effect::None
        }
        Action::MessagesFailed { chat_id, error } => {
            warn!("Failed to load messages for chat {}: {}", chat_id, error);
            Effect::None
        }
        Action::SendDraft => {
            if app.is_sending || app.draft.trim().is_empty() {
                return Effect::None;
            }
            let (Some(session), Some(chat_id)) = (app.session.current(), app.selected_chat_id)
            else {
                return Effect::None;
            };
            let session = session.clone();
            app.is_sending = true;
            Effect::SendMessage {
                session,
                chat_id,
                text: app.draft.clone(),
            }
        }
        Action::MessageSent { chat_id, message } => {
            app.is_sending = false;
            if let Some(chat) = app.chats.iter_mut().find(|c| c.id == chat_id) {
                chat.last_message = Some(message.text.clone());
                chat.last_message_time = message.created_at;
            }
            if app.selected_chat_id == Some(chat_id) {
                app.messages.push(message);
                app.draft.clear();
            }
            Effect::None
        }
        Action::SendFailed { chat_id, error } => {
            app.is_sending = false;
            warn!("Failed to send message to chat {}: {}", chat_id, error);
            Effect::None
        }
        Action::CreateChat { other_user_id } => match app.session.current() {
            Some(session) => Effect::CreateChat {
                session: session.clone(),
                other_user_id,
            },
            None => Effect::None,
        },
        Action::ChatCreated { chat_id } => {
            let Some(session) = app.session.current() else {
                return Effect::None;
            };
            let session = session.clone();
            app.status_message = format!("Started chat #{chat_id}");
            app.active_tab = Tab::Chats;
            app.search.clear();
            app.selected_chat_id = Some(chat_id);
            app.messages.clear();
            Effect::Batch(vec![
                Effect::FetchChats(session.clone()),
                Effect::FetchMessages { session, chat_id },
            ])
        }
        Action::CreateChatFailed(error) => {
            warn!("Failed to create chat: {}", error);
            app.status_message = format!("Could not start chat: {}", error.user_message());
            Effect::None
        }
        Action::SelectTab(tab) => {
            app.active_tab = tab;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
