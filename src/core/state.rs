//! # Application State
//!
//! Core business state for Courier. Domain data only; presentation state
//! (cursor positions, focus, list scroll) lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: SessionHolder        // who is signed in (persisted)
//! ├── auth: AuthState               // login/register form status
//! ├── active_tab: Tab               // navigation shell destination
//! ├── chats: Vec<Chat>              // conversations of the session user
//! ├── search: String                // chat list filter
//! ├── selected_chat_id: Option<i64> // open conversation
//! ├── messages: Vec<Message>        // history of the open conversation
//! ├── draft: String                 // composer text
//! ├── is_sending: bool              // send request outstanding
//! └── status_message: String        // status bar text
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use crate::backend::{Chat, Message};
use crate::core::action::Effect;
use crate::core::chats::filter_chats;
use crate::core::session::SessionHolder;

/// Top-level destinations of the navigation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Tab {
    #[default]
    Chats,
    Contacts,
    Groups,
    Profile,
    Settings,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Chats,
        Tab::Contacts,
        Tab::Groups,
        Tab::Profile,
        Tab::Settings,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Tab::Chats => "Chats",
            Tab::Contacts => "Contacts",
            Tab::Groups => "Groups",
            Tab::Profile => "Profile",
            Tab::Settings => "Settings",
        }
    }

    /// Zero-based position in `Tab::ALL`.
    pub fn index(self) -> usize {
        Tab::ALL.iter().position(|t| *t == self).unwrap_or(0)
    }

    pub fn from_index(index: usize) -> Option<Tab> {
        Tab::ALL.get(index).copied()
    }

    /// Only the chats destination does anything yet.
    pub fn is_functional(self) -> bool {
        self == Tab::Chats
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    #[default]
    Login,
    Register,
}

impl AuthMode {
    pub fn toggled(self) -> Self {
        match self {
            AuthMode::Login => AuthMode::Register,
            AuthMode::Register => AuthMode::Login,
        }
    }
}

/// Status of the auth view. Field contents stay in the form itself.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub mode: AuthMode,
    /// A login/register request is outstanding; submit is disabled.
    pub is_loading: bool,
    /// Inline error shown above the form.
    pub error: Option<String>,
}

pub struct App {
    pub session: SessionHolder,
    pub auth: AuthState,
    pub active_tab: Tab,
    pub chats: Vec<Chat>,
    pub search: String,
    pub selected_chat_id: Option<i64>,
    pub messages: Vec<Message>,
    pub draft: String,
    pub is_sending: bool,
    pub status_message: String,
}

impl App {
    pub fn new(session: SessionHolder) -> Self {
        Self {
            session,
            auth: AuthState::default(),
            active_tab: Tab::default(),
            chats: Vec::new(),
            search: String::new(),
            selected_chat_id: None,
            messages: Vec::new(),
            draft: String::new(),
            is_sending: false,
            status_message: String::from("Welcome to Courier!"),
        }
    }

    /// What to do right after startup: a restored session loads its chats.
    pub fn startup_effect(&self) -> Effect {
        match self.session.current() {
            Some(session) => Effect::FetchChats(session.clone()),
            None => Effect::None,
        }
    }

    /// Chats matching the current search, in backend order.
    pub fn visible_chats(&self) -> Vec<&Chat> {
        filter_chats(&self.chats, &self.search)
    }

    pub fn selected_chat(&self) -> Option<&Chat> {
        let id = self.selected_chat_id?;
        self.chats.iter().find(|c| c.id == id)
    }

    /// Drops everything that belonged to the previous user.
    pub(crate) fn clear_user_data(&mut self) {
        self.chats.clear();
        self.search.clear();
        self.selected_chat_id = None;
        self.messages.clear();
        self.draft.clear();
        self.is_sending = false;
        self.active_tab = Tab::Chats;
    }
}
