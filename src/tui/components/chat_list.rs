//! # ChatList Component
//!
//! Left pane of the Chats destination: a search field over the list of the
//! signed-in user's conversations.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `ChatListState` lives in `TuiState` (highlight, search caret)
//! - `ChatList` is created each frame with the visible chats as props
//!
//! The search text and the opened conversation belong to `App`. Moving the
//! highlight does nothing until Enter opens the highlighted chat.
//!
//! ```text
//! ╭ Search ──────────────╮
//! │ des                  │
//! ╰──────────────────────╯
//! ╭ Chats (1/4) ─────────╮
//! │ DT Design Team  12:30│
//! │    See you then   (2)│
//! ╰──────────────────────╯
//! ```

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Paragraph, Wrap};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::backend::Chat;
use crate::core::chats::{initials, relative_time_label};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::{FieldCursor, FieldEdit, TextField};
use crate::tui::event::TuiEvent;

/// Avatar column: two initials and a space.
const AVATAR_WIDTH: usize = 3;

/// Events emitted by the chat list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatListEvent {
    /// Open the chat at this position of the visible list.
    Open(usize),
}

/// Persistent state for the chat list.
#[derive(Default)]
pub struct ChatListState {
    pub list_state: ListState,
    pub search_cursor: FieldCursor,
    /// Prop: number of chats currently visible (after filtering).
    visible_len: usize,
}

impl ChatListState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sync the visible-count prop and keep the highlight in range.
    pub fn set_visible_len(&mut self, len: usize) {
        self.visible_len = len;
        match (len, self.list_state.selected()) {
            (0, _) => self.list_state.select(None),
            (_, None) => self.list_state.select(Some(0)),
            (_, Some(i)) if i >= len => self.list_state.select(Some(len - 1)),
            _ => {}
        }
    }

    /// Highlight a specific row (e.g. the chat just opened elsewhere).
    pub fn highlight(&mut self, index: usize) {
        if index < self.visible_len {
            self.list_state.select(Some(index));
        }
    }

    /// Edit the search text. A changed query moves the highlight to the top.
    pub fn edit_search(&mut self, search: &mut String, event: &TuiEvent) -> Option<FieldEdit> {
        let edit = self.search_cursor.edit(search, event);
        if edit == Some(FieldEdit::Changed) {
            self.list_state.select(None);
        }
        edit
    }
}

impl EventHandler for ChatListState {
    type Event = ChatListEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        if self.visible_len == 0 {
            return None;
        }
        let last = self.visible_len - 1;
        let current = self.list_state.selected().unwrap_or(0);
        match event {
            TuiEvent::CursorUp => {
                self.list_state.select(Some(current.saturating_sub(1)));
                None
            }
            TuiEvent::CursorDown => {
                self.list_state.select(Some((current + 1).min(last)));
                None
            }
            TuiEvent::Home => {
                self.list_state.select(Some(0));
                None
            }
            TuiEvent::End => {
                self.list_state.select(Some(last));
                None
            }
            TuiEvent::Submit => Some(ChatListEvent::Open(current)),
            _ => None,
        }
    }
}

/// Transient render wrapper for the chat list pane.
pub struct ChatList<'a> {
    state: &'a mut ChatListState,
    /// Chats after filtering, in backend order.
    pub chats: &'a [&'a Chat],
    /// Total number of chats before filtering.
    pub total: usize,
    pub search: &'a str,
    /// Conversation currently open in the chat window.
    pub open_chat_id: Option<i64>,
    pub search_focused: bool,
    pub list_focused: bool,
    /// Reference point for relative time labels.
    pub now: DateTime<Local>,
}

impl<'a> ChatList<'a> {
    pub fn new(state: &'a mut ChatListState, chats: &'a [&'a Chat], search: &'a str) -> Self {
        Self {
            state,
            total: chats.len(),
            chats,
            search,
            open_chat_id: None,
            search_focused: false,
            list_focused: false,
            now: Local::now(),
        }
    }

    fn item(&self, chat: &Chat, width: usize) -> ListItem<'static> {
        let is_open = self.open_chat_id == Some(chat.id);
        let name = chat.display_name();

        let avatar = format!("{:<2} ", initials(&name));
        let time = chat
            .last_message_time
            .map(|ts| relative_time_label(ts, &self.now))
            .unwrap_or_default();
        let group = if chat.is_group { " ◆" } else { "" };

        let name_room = width
            .saturating_sub(AVATAR_WIDTH)
            .saturating_sub(group.width())
            .saturating_sub(time.width() + 1);
        let name_text = truncate_to_width(&name, name_room);
        let gap = name_room.saturating_sub(name_text.width()) + 1;

        let mut name_style = Style::default().add_modifier(Modifier::BOLD);
        if is_open {
            name_style = name_style.fg(Color::Cyan);
        }
        let first = Line::from(vec![
            Span::styled(avatar, Style::default().fg(Color::Magenta)),
            Span::styled(name_text, name_style),
            Span::styled(group, Style::default().fg(Color::Yellow)),
            Span::raw(" ".repeat(gap)),
            Span::styled(time, Style::default().fg(Color::DarkGray)),
        ]);

        let badge = if chat.unread_count > 0 {
            format!(" ({})", chat.unread_count)
        } else {
            String::new()
        };
        let preview_room = width
            .saturating_sub(AVATAR_WIDTH)
            .saturating_sub(badge.width());
        let preview = truncate_to_width(chat.last_message.as_deref().unwrap_or(""), preview_room);
        let pad = preview_room.saturating_sub(preview.width());
        let second = Line::from(vec![
            Span::raw(" ".repeat(AVATAR_WIDTH)),
            Span::styled(preview, Style::default().fg(Color::Gray)),
            Span::raw(" ".repeat(pad)),
            Span::styled(
                badge,
                Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
            ),
        ]);

        ListItem::new(vec![first, second])
    }
}

impl Component for ChatList<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [search_area, list_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(area);

        TextField::new("Search", self.search, &self.state.search_cursor)
            .focused(self.search_focused)
            .placeholder("type to filter")
            .render(frame, search_area);

        let border_style = if self.list_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let title = if self.search.is_empty() {
            format!(" Chats ({}) ", self.total)
        } else {
            format!(" Chats ({}/{}) ", self.chats.len(), self.total)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title);

        if self.chats.is_empty() {
            let message = if self.total == 0 {
                "No conversations yet. Ctrl+N starts one.".to_string()
            } else {
                format!("No chats match \"{}\"", self.search)
            };
            frame.render_widget(
                Paragraph::new(message)
                    .style(Style::default().fg(Color::DarkGray))
                    .wrap(Wrap { trim: true })
                    .block(block),
                list_area,
            );
            return;
        }

        let width = list_area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self.chats.iter().map(|c| self.item(c, width)).collect();
        let highlight = if self.list_focused {
            Style::default().bg(Color::DarkGray)
        } else {
            Style::default().add_modifier(Modifier::DIM)
        };
        let list = List::new(items).block(block).highlight_style(highlight);
        frame.render_stateful_widget(list, list_area, &mut self.state.list_state);
    }
}

/// Cut `text` to at most `max` display columns, ending in `…` when cut.
fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > max - 1 {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
