//! # TUI Components
//!
//! Every piece of the terminal interface lives here, one file per component.
//!
//! ## Two Kinds of Components
//!
//! ### Stateless (props only)
//!
//! Built each frame from borrowed data and thrown away after `render()`:
//! - `TitleBar`: app name, signed-in user, status text
//! - `Sidebar`: the five navigation destinations
//! - `Placeholder`: "coming soon" body for destinations that do nothing yet
//! - `TextField`: a single-line input (its caret lives in `FieldCursor`)
//!
//! ### Stateful (persistent state + transient wrapper)
//!
//! A `FooState` lives in `TuiState` and implements `EventHandler`; a `Foo<'a>`
//! wrapper borrows it together with props from `App` to draw:
//! - `AuthForm` / `AuthFormState`: login and registration fields
//! - `ChatList` / `ChatListState`: search box and conversation list
//! - `ChatWindow` / `ChatWindowState`: message history and composer
//! - `NewChatPrompt` / `NewChatPromptState`: overlay asking for a user id
//!
//! Domain data (chats, messages, draft, search text) stays in `core::App`.
//! Component state only holds presentation details: carets, highlight,
//! scroll offsets.
//!
//! ```text
//! components/
//! ├── mod.rs             (this file)
//! ├── text_field.rs      (single-line input + caret)
//! ├── auth_form.rs       (login / register)
//! ├── title_bar.rs       (top line)
//! ├── sidebar.rs         (navigation shell)
//! ├── chat_list.rs       (search + conversations)
//! ├── chat_window.rs     (history + composer)
//! ├── new_chat_prompt.rs (Ctrl+N overlay)
//! └── placeholder.rs     (non-functional destinations)
//! ```

pub mod auth_form;
pub mod chat_list;
pub mod chat_window;
pub mod new_chat_prompt;
pub mod placeholder;
pub mod sidebar;
pub mod text_field;
pub mod title_bar;

pub use auth_form::{AuthForm, AuthFormEvent, AuthFormState};
pub use chat_list::{ChatList, ChatListEvent, ChatListState};
pub use chat_window::{ChatWindow, ChatWindowEvent, ChatWindowState};
pub use new_chat_prompt::{NewChatEvent, NewChatPrompt, NewChatPromptState};
pub use placeholder::Placeholder;
pub use sidebar::Sidebar;
pub use title_bar::TitleBar;

use ratatui::layout::{Constraint, Flex, Layout, Rect};

/// A `width` x `height` rect centered in `outer`, shrunk to fit.
pub(crate) fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(outer.height))])
        .flex(Flex::Center)
        .areas(outer);
    let [center] = Layout::horizontal([Constraint::Length(width.min(outer.width))])
        .flex(Flex::Center)
        .areas(row);
    center
}

/// Collects a rendered buffer into one string (test helper).
#[cfg(test)]
pub(crate) fn buffer_text(buffer: &ratatui::buffer::Buffer) -> String {
    buffer.content().iter().map(|c| c.symbol()).collect()
}
