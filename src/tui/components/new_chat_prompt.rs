//! # NewChatPrompt Component
//!
//! Small overlay asking for the id of the user to start a direct chat with.
//! Opened with Ctrl+N, dismissed with Esc.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `NewChatPromptState` lives in `TuiState` while the overlay is open
//! - `NewChatPrompt` is created each frame with borrowed state

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::components::centered_rect;
use crate::tui::components::text_field::{FieldCursor, TextField};
use crate::tui::event::TuiEvent;

/// Events emitted by the prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NewChatEvent {
    Create(i64),
    Dismiss,
}

#[derive(Default)]
pub struct NewChatPromptState {
    pub input: String,
    cursor: FieldCursor,
    pub error: Option<String>,
}

impl NewChatPromptState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parses a positive user id, ignoring surrounding whitespace.
fn parse_user_id(input: &str) -> Option<i64> {
    input.trim().parse::<i64>().ok().filter(|id| *id > 0)
}

impl EventHandler for NewChatPromptState {
    type Event = NewChatEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::Escape => Some(NewChatEvent::Dismiss),
            TuiEvent::Submit => match parse_user_id(&self.input) {
                Some(id) => Some(NewChatEvent::Create(id)),
                None => {
                    self.error = Some("Enter a numeric user id".to_string());
                    None
                }
            },
            other => {
                if self.cursor.edit(&mut self.input, other).is_some() {
                    self.error = None;
                }
                None
            }
        }
    }
}

/// Transient render wrapper for the new-chat overlay.
pub struct NewChatPrompt<'a> {
    state: &'a NewChatPromptState,
}

impl<'a> NewChatPrompt<'a> {
    pub fn new(state: &'a NewChatPromptState) -> Self {
        Self { state }
    }
}

impl Component for NewChatPrompt<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(44, 8, area);
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" New chat ")
            .title_bottom(Line::from(" Enter Start  Esc Cancel ").centered())
            .padding(Padding::horizontal(1));
        let inner = block.inner(overlay);
        frame.render_widget(block, overlay);

        let [field_area, message_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(0)]).areas(inner);

        TextField::new("User id", &self.state.input, &self.state.cursor)
            .focused(true)
            .render(frame, field_area);

        if let Some(error) = &self.state.error {
            frame.render_widget(
                Paragraph::new(error.as_str()).style(Style::default().fg(Color::Red)),
                message_area,
            );
        }
    }
}
