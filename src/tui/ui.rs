//! Frame layout: picks the auth screen or the main screen and hands each
//! area to its component.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │ Courier | Ann (#1) | status                          │ title bar
//! ├────────┬─────────────────┬───────────────────────────┤
//! │ Menu   │ Search          │ Chat history              │
//! │        │ Chats           │                           │
//! │        │                 │ Composer                  │
//! ├────────┴─────────────────┴───────────────────────────┤
//! │ key hints                                            │
//! └──────────────────────────────────────────────────────┘
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;

use crate::core::session::Session;
use crate::core::state::{App, Tab};
use crate::tui::component::Component;
use crate::tui::components::chat_window::render_empty;
use crate::tui::components::sidebar::SIDEBAR_WIDTH;
use crate::tui::components::{
    AuthForm, ChatList, ChatWindow, NewChatPrompt, Placeholder, Sidebar, TitleBar,
};
use crate::tui::{Focus, TuiState};

/// Width of the chat list pane.
const CHAT_LIST_WIDTH: u16 = 34;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    let area = frame.area();
    let Some(session) = app.session.current() else {
        AuthForm::new(&tui.auth_form, app.auth.error.as_deref()).render(frame, area);
        return;
    };

    let [title_area, body_area, hint_area] =
        Layout::vertical([Constraint::Length(1), Constraint::Min(0), Constraint::Length(1)])
            .areas(area);

    TitleBar::new(
        Some(session.user.name.as_str()),
        Some(session.user.id),
        &app.status_message,
    )
    .render(frame, title_area);

    let [sidebar_area, content_area] =
        Layout::horizontal([Constraint::Length(SIDEBAR_WIDTH), Constraint::Min(0)])
            .areas(body_area);
    Sidebar::new(app.active_tab).render(frame, sidebar_area);

    if app.active_tab == Tab::Chats {
        draw_chats(frame, content_area, app, session, tui);
    } else {
        Placeholder::new(app.active_tab).render(frame, content_area);
    }

    frame.render_widget(
        Line::styled(hint_text(app, tui), Style::default().fg(Color::DarkGray)),
        hint_area,
    );

    if let Some(prompt) = &tui.new_chat {
        NewChatPrompt::new(prompt).render(frame, area);
    }
}

fn draw_chats(frame: &mut Frame, area: Rect, app: &App, session: &Session, tui: &mut TuiState) {
    let [list_area, window_area] =
        Layout::horizontal([Constraint::Length(CHAT_LIST_WIDTH), Constraint::Min(0)]).areas(area);

    let visible = app.visible_chats();
    let mut list = ChatList::new(&mut tui.chat_list, &visible, &app.search);
    list.total = app.chats.len();
    list.open_chat_id = app.selected_chat_id;
    list.search_focused = tui.focus == Focus::Search && tui.new_chat.is_none();
    list.list_focused = tui.focus == Focus::ChatList;
    list.render(frame, list_area);

    match app.selected_chat_id {
        Some(chat_id) => {
            let mut window = ChatWindow::new(
                &mut tui.chat_window,
                chat_id,
                &app.messages,
                session,
                &app.draft,
            );
            window.chat = app.selected_chat();
            window.is_sending = app.is_sending;
            window.composer_focused = tui.focus == Focus::Composer && tui.new_chat.is_none();
            window.render(frame, window_area);
        }
        None => render_empty(frame, window_area),
    }
}

fn hint_text(app: &App, tui: &TuiState) -> &'static str {
    if tui.new_chat.is_some() {
        return " Enter start chat · Esc cancel";
    }
    if app.active_tab != Tab::Chats {
        return " Alt+1..5 switch · Ctrl+L sign out · Ctrl+C quit";
    }
    match tui.focus {
        Focus::Search => " Type to filter · ↓/Esc list · Tab next · Ctrl+N new chat · Ctrl+C quit",
        Focus::ChatList => {
            " ↑↓ move · Enter open · Tab next · Ctrl+R refresh · Ctrl+N new chat · Ctrl+L sign out"
        }
        Focus::Composer => " Enter send · PgUp/PgDn scroll · Esc list · Tab next · Ctrl+C quit",
    }
}
