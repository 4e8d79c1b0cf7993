//! # Effect Execution
//!
//! Turns an `Effect` into a backend call and the call's outcome into the
//! `Action` that reports it. The TUI spawns one task per effect and feeds the
//! returned action back into `update()`.
//!
//! ```text
//! update() ──Effect──▶ execute() ──Backend──▶ HTTP
//!    ▲                     │
//!    └───────Action────────┘
//! ```

use log::info;

use crate::backend::Backend;
use crate::core::action::{Action, Effect};

/// Runs one effect against `backend`. Returns `None` for effects that do not
/// touch the network (`None`, `Quit`) and for `Batch`, which the caller splits
/// with `Effect::into_parts` first.
pub async fn execute(backend: &dyn Backend, effect: Effect) -> Option<Action> {
    let action = match effect {
        Effect::None | Effect::Quit | Effect::Batch(_) => return None,
        Effect::Login(credentials) => match backend.login(&credentials).await {
            Ok(payload) => Action::AuthSucceeded(payload),
            Err(e) => Action::AuthFailed(e.user_message()),
        },
        Effect::Register(registration) => match backend.register(&registration).await {
            Ok(payload) => Action::AuthSucceeded(payload),
            Err(e) => Action::AuthFailed(e.user_message()),
        },
        Effect::FetchChats(session) => {
            let user_id = session.user.id;
            match backend.list_chats(&session).await {
                Ok(chats) => Action::ChatsLoaded { user_id, chats },
                Err(error) => Action::ChatsFailed { user_id, error },
            }
        }
        Effect::FetchMessages { session, chat_id } => {
            match backend.list_messages(&session, chat_id).await {
                Ok(messages) => Action::MessagesLoaded { chat_id, messages },
                Err(error) => Action::MessagesFailed { chat_id, error },
            }
        }
        Effect::SendMessage {
            session,
            chat_id,
            text,
        } => match backend.send_message(&session, chat_id, &text).await {
            Ok(message) => Action::MessageSent { chat_id, message },
            Err(error) => Action::SendFailed { chat_id, error },
        },
        Effect::CreateChat {
            session,
            other_user_id,
        } => match backend.create_chat(&session, other_user_id).await {
            Ok(chat_id) => Action::ChatCreated { chat_id },
            Err(error) => Action::CreateChatFailed(error),
        },
    };
    info!("Effect on {} backend finished", backend.name());
    Some(action)
}
