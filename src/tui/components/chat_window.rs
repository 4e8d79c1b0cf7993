//! # ChatWindow Component
//!
//! Right pane of the Chats destination: the history of the open conversation
//! in a scroll view, with the composer underneath.
//!
//! ## Layout
//!
//! Each message is wrapped with `textwrap` to three quarters of the pane.
//! `HistoryLayout` caches the resulting heights per message (recomputed only
//! for new messages or a width change), so a frame only builds the lines of
//! the messages near the viewport. Own messages sit on the right, everyone
//! else's on the left with the author's name.
//!
//! The scroll view canvas is at most `u16::MAX` rows. A longer history keeps
//! its newest messages on the canvas and drops the oldest ones from it.
//!
//! ## Scrolling
//!
//! The view sticks to the bottom until the user scrolls up, and re-pins once
//! they scroll back down to the end (or press End).

use std::ops::Range;

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::backend::{Chat, Message};
use crate::core::chats::{clock_label, is_mine};
use crate::core::session::Session;
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::text_field::{FieldCursor, FieldEdit, TextField};
use crate::tui::event::TuiEvent;

/// Narrowest bubble we wrap to, whatever the pane width.
const MIN_BUBBLE_WIDTH: u16 = 10;

/// Events emitted by the chat window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatWindowEvent {
    /// Enter in the composer.
    Send,
}

pub struct ChatWindowState {
    pub scroll_state: ScrollViewState,
    pub layout: HistoryLayout,
    /// When true, auto-scroll to the newest message on every frame
    pub stick_to_bottom: bool,
    pub composer_cursor: FieldCursor,
    /// Last known viewport and canvas heights (for re-pinning between frames)
    viewport_height: u16,
    content_height: u16,
}

impl Default for ChatWindowState {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatWindowState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: HistoryLayout::default(),
            stick_to_bottom: true,
            composer_cursor: FieldCursor::default(),
            viewport_height: 0,
            content_height: 0,
        }
    }

    /// Back to the bottom, for a freshly opened conversation.
    pub fn reset_scroll(&mut self) {
        self.scroll_state = ScrollViewState::default();
        self.layout = HistoryLayout::default();
        self.stick_to_bottom = true;
    }

    /// Edit the draft held in `App`.
    pub fn edit_draft(&mut self, draft: &mut String, event: &TuiEvent) -> Option<FieldEdit> {
        self.composer_cursor.edit(draft, event)
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        if self.scroll_state.offset().y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position { x: 0, y: max_y });
        }
    }
}

impl EventHandler for ChatWindowState {
    type Event = ChatWindowEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
                None
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
                None
            }
            TuiEvent::Submit => Some(ChatWindowEvent::Send),
            _ => None,
        }
    }
}

/// Cached message heights for the current bubble width.
#[derive(Debug, Default)]
pub struct HistoryLayout {
    bubble_width: u16,
    /// Message ids the heights were computed for, in order.
    ids: Vec<i64>,
    /// Rows per message, trailing blank row included.
    pub heights: Vec<usize>,
    /// Running sum of `heights`: `prefix_heights[i]` is the bottom row of message `i`.
    pub prefix_heights: Vec<usize>,
}

impl HistoryLayout {
    /// Bring the cache in line with `messages`. Heights of an unchanged
    /// prefix of the history are kept.
    pub fn update(&mut self, messages: &[Message], session: &Session, bubble_width: u16) {
        if self.bubble_width != bubble_width {
            self.bubble_width = bubble_width;
            self.ids.clear();
            self.heights.clear();
        }

        let reusable = self
            .ids
            .iter()
            .zip(messages)
            .take_while(|(id, m)| **id == m.id)
            .count();
        self.ids.truncate(reusable);
        self.heights.truncate(reusable);

        for message in &messages[reusable..] {
            let mine = is_mine(message, session);
            self.ids.push(message.id);
            self.heights
                .push(message_lines(message, mine, bubble_width).len() + 1);
        }
        self.rebuild_prefix_heights();
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0usize, |acc, &h| {
                *acc += h;
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> usize {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Top row of message `index`.
    fn top(&self, index: usize) -> usize {
        if index == 0 {
            0
        } else {
            self.prefix_heights[index - 1]
        }
    }

    /// First message on a canvas of at most `max_rows` rows, and its top row.
    /// Only the newest messages fit when the history is taller than that.
    pub fn canvas_start(&self, max_rows: usize) -> (usize, usize) {
        let total = self.total_height();
        if total <= max_rows || self.heights.is_empty() {
            return (0, 0);
        }
        let overflow = total - max_rows;
        let first = (self
            .prefix_heights
            .partition_point(|&end| end < overflow)
            + 1)
        .min(self.heights.len() - 1);
        (first, self.top(first))
    }

    /// Messages that intersect rows `scroll_offset..scroll_offset + viewport_height`
    /// (absolute rows), padded by half a viewport on each side.
    pub fn visible_range(&self, scroll_offset: usize, viewport_height: usize) -> Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}

/// Pre-wrapped lines for one message, author header first.
fn message_lines(message: &Message, mine: bool, bubble_width: u16) -> Vec<Line<'static>> {
    let author = if mine {
        "You".to_string()
    } else {
        message
            .user_name
            .clone()
            .unwrap_or_else(|| format!("User #{}", message.user_id))
    };
    let header = match message.created_at {
        Some(ts) => format!("{author} · {}", clock_label(ts, &Local)),
        None => author,
    };

    let header_style = Style::default()
        .fg(if mine { Color::Cyan } else { Color::Magenta })
        .add_modifier(Modifier::BOLD);
    let body_style = if mine {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let options = textwrap::Options::new(bubble_width.max(1) as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace);

    let mut lines = vec![Line::styled(header, header_style)];
    for wrapped in textwrap::wrap(message.text.trim_end(), options) {
        lines.push(Line::styled(wrapped.into_owned(), body_style));
    }
    lines
}

/// Transient render wrapper for the chat window.
pub struct ChatWindow<'a> {
    state: &'a mut ChatWindowState,
    /// Open conversation, when the list has it.
    pub chat: Option<&'a Chat>,
    pub chat_id: i64,
    pub messages: &'a [Message],
    pub session: &'a Session,
    pub draft: &'a str,
    pub is_sending: bool,
    pub composer_focused: bool,
}

impl<'a> ChatWindow<'a> {
    pub fn new(
        state: &'a mut ChatWindowState,
        chat_id: i64,
        messages: &'a [Message],
        session: &'a Session,
        draft: &'a str,
    ) -> Self {
        Self {
            state,
            chat: None,
            chat_id,
            messages,
            session,
            draft,
            is_sending: false,
            composer_focused: false,
        }
    }

    fn title(&self) -> String {
        match self.chat {
            Some(chat) if chat.is_group => format!(" {} ◆ group ", chat.display_name()),
            Some(chat) => format!(" {} ", chat.display_name()),
            None => format!(" Chat #{} ", self.chat_id),
        }
    }

    fn render_history(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(self.title());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if self.messages.is_empty() {
            frame.render_widget(
                Paragraph::new("No messages yet. Say hi!")
                    .style(Style::default().fg(Color::DarkGray))
                    .alignment(Alignment::Center),
                inner,
            );
            return;
        }

        // One column for the scrollbar
        let content_width = inner.width.saturating_sub(1);
        let bubble_width = (content_width * 3 / 4).max(MIN_BUBBLE_WIDTH).min(content_width);

        let layout = &mut self.state.layout;
        layout.update(self.messages, self.session, bubble_width);
        let (first, base) = layout.canvas_start(u16::MAX as usize);
        let canvas_height = (layout.total_height() - base).min(u16::MAX as usize) as u16;
        let canvas_rows = canvas_height as usize;

        self.state.viewport_height = inner.height;
        self.state.content_height = canvas_height;
        let max_y = self.state.max_offset();
        if self.state.stick_to_bottom || self.state.scroll_state.offset().y > max_y {
            self.state.scroll_state.set_offset(Position { x: 0, y: max_y });
        }

        let mut scroll_view = ScrollView::new(Size::new(content_width, canvas_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let offset = self.state.scroll_state.offset().y as usize;
        let layout = &self.state.layout;
        let range = layout.visible_range(base + offset, inner.height as usize);
        for i in range.start.max(first)..range.end {
            let y = layout.top(i) - base;
            if y >= canvas_rows {
                break;
            }
            // Bubble rows without the trailing blank, clipped to the canvas
            let rows = (layout.heights[i] - 1).min(canvas_rows - y);
            let message = &self.messages[i];
            let mine = is_mine(message, self.session);
            let alignment = if mine { Alignment::Right } else { Alignment::Left };
            scroll_view.render_widget(
                Paragraph::new(message_lines(message, mine, bubble_width)).alignment(alignment),
                Rect::new(0, y as u16, content_width, rows as u16),
            );
        }

        frame.render_stateful_widget(scroll_view, inner, &mut self.state.scroll_state);
    }
}

impl Component for ChatWindow<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let [history_area, composer_area] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(3)]).areas(area);

        self.render_history(frame, history_area);

        let label = if self.is_sending { "Sending..." } else { "Message" };
        TextField::new(label, self.draft, &self.state.composer_cursor)
            .focused(self.composer_focused && !self.is_sending)
            .placeholder("Type a message, Enter to send")
            .render(frame, composer_area);
    }
}

/// Shown in place of the chat window while no conversation is open.
pub fn render_empty(frame: &mut Frame, area: Rect) {
    let block = Block::bordered()
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(Color::DarkGray));
    let top_pad = area.height.saturating_sub(3) / 2;
    let mut lines = vec![Line::default(); top_pad as usize];
    lines.push(Line::from("Select a chat to start messaging"));
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(block),
        area,
    );
}
