//! # TextField Component
//!
//! Single-line bordered input used by the auth form, the chat search, the
//! composer and the new-chat prompt.
//!
//! The text itself is owned elsewhere (form state or `App`); `FieldCursor`
//! only tracks where the caret is and applies edits to a borrowed buffer.
//! Rendering is a transient `TextField` built each frame from props.

use std::borrow::Cow;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::Component;
use crate::tui::event::TuiEvent;

const MASK_CHAR: char = '•';

/// What an edit did to the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEdit {
    /// The buffer content changed.
    Changed,
    /// Only the caret moved.
    Moved,
}

/// Caret position (byte offset) into an externally owned buffer.
#[derive(Debug, Default, Clone)]
pub struct FieldCursor {
    pos: usize,
}

impl FieldCursor {
    /// Caret position clamped to a char boundary of `buffer`. The buffer may
    /// have been changed behind our back (cleared after a send, for example).
    pub fn pos(&self, buffer: &str) -> usize {
        let mut pos = self.pos.min(buffer.len());
        while !buffer.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    pub fn move_to_end(&mut self, buffer: &str) {
        self.pos = buffer.len();
    }

    /// Apply an editing event to `buffer`. Returns `None` for events a
    /// single-line field does not handle.
    pub fn edit(&mut self, buffer: &mut String, event: &TuiEvent) -> Option<FieldEdit> {
        let pos = self.pos(buffer);
        match event {
            TuiEvent::InputChar(c) => {
                buffer.insert(pos, *c);
                self.pos = pos + c.len_utf8();
                Some(FieldEdit::Changed)
            }
            TuiEvent::Paste(text) => {
                let flat: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                buffer.insert_str(pos, &flat);
                self.pos = pos + flat.len();
                Some(FieldEdit::Changed)
            }
            TuiEvent::Backspace => {
                let prev = prev_char_boundary(buffer, pos)?;
                buffer.drain(prev..pos);
                self.pos = prev;
                Some(FieldEdit::Changed)
            }
            TuiEvent::Delete => {
                let next = next_char_boundary(buffer, pos)?;
                buffer.drain(pos..next);
                self.pos = pos;
                Some(FieldEdit::Changed)
            }
            TuiEvent::CursorLeft => {
                self.pos = prev_char_boundary(buffer, pos)?;
                Some(FieldEdit::Moved)
            }
            TuiEvent::CursorRight => {
                self.pos = next_char_boundary(buffer, pos)?;
                Some(FieldEdit::Moved)
            }
            TuiEvent::Home => {
                self.pos = 0;
                Some(FieldEdit::Moved)
            }
            TuiEvent::End => {
                self.pos = buffer.len();
                Some(FieldEdit::Moved)
            }
            _ => None,
        }
    }
}

fn prev_char_boundary(text: &str, pos: usize) -> Option<usize> {
    text[..pos].char_indices().next_back().map(|(i, _)| i)
}

fn next_char_boundary(text: &str, pos: usize) -> Option<usize> {
    text[pos..].chars().next().map(|c| pos + c.len_utf8())
}

/// Transient render wrapper for a single-line input.
pub struct TextField<'a> {
    pub label: &'a str,
    pub value: &'a str,
    /// Caret byte offset into `value`.
    pub cursor: usize,
    pub focused: bool,
    /// Render every character as a bullet (passwords).
    pub masked: bool,
    /// Shown dimmed while `value` is empty.
    pub placeholder: &'a str,
}

impl<'a> TextField<'a> {
    pub fn new(label: &'a str, value: &'a str, cursor: &FieldCursor) -> Self {
        Self {
            label,
            value,
            cursor: cursor.pos(value),
            focused: false,
            masked: false,
            placeholder: "",
        }
    }

    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    pub fn masked(mut self, masked: bool) -> Self {
        self.masked = masked;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = placeholder;
        self
    }
}

/// Text as it appears on screen: bullets when masked.
fn display_text(value: &str, masked: bool) -> Cow<'_, str> {
    if masked {
        Cow::Owned(MASK_CHAR.to_string().repeat(value.chars().count()))
    } else {
        Cow::Borrowed(value)
    }
}

/// Display column of the caret.
fn caret_column(value: &str, cursor: usize, masked: bool) -> u16 {
    let before = &value[..cursor];
    let width = if masked {
        before.chars().count()
    } else {
        before.width()
    };
    width.min(u16::MAX as usize) as u16
}

/// Horizontal scroll that keeps the caret inside `inner_width` columns.
fn scroll_offset(caret_col: u16, inner_width: u16) -> u16 {
    caret_col.saturating_sub(inner_width.saturating_sub(1))
}

impl Component for TextField<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(self.label);

        let inner_width = area.width.saturating_sub(2);
        let caret_col = caret_column(self.value, self.cursor, self.masked);
        let offset = scroll_offset(caret_col, inner_width);

        let paragraph = if self.value.is_empty() {
            Paragraph::new(self.placeholder).style(
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Paragraph::new(display_text(self.value, self.masked).into_owned())
        };
        frame.render_widget(paragraph.block(block).scroll((0, offset)), area);

        if self.focused && area.height >= 3 {
            frame.set_cursor_position((area.x + 1 + caret_col - offset, area.y + 1));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn type_str(cursor: &mut FieldCursor, buffer: &mut String, text: &str) {
        for c in text.chars() {
            cursor.edit(buffer, &TuiEvent::InputChar(c));
        }
    }

    #[test]
    fn test_typing_appends_at_caret() {
        let mut buffer = String::new();
        let mut cursor = FieldCursor::default();
        type_str(&mut cursor, &mut buffer, "helo");
        cursor.edit(&mut buffer, &TuiEvent::CursorLeft);
        cursor.edit(&mut buffer, &TuiEvent::InputChar('l'));
        assert_eq!(buffer, "hello");
        assert_eq!(cursor.pos(&buffer), 4);
    }

    #[test]
    fn test_backspace_and_delete_respect_multibyte_chars() {
        let mut buffer = String::new();
        let mut cursor = FieldCursor::default();
        type_str(&mut cursor, &mut buffer, "привет");
        assert_eq!(
            cursor.edit(&mut buffer, &TuiEvent::Backspace),
            Some(FieldEdit::Changed)
        );
        assert_eq!(buffer, "приве");

        cursor.edit(&mut buffer, &TuiEvent::Home);
        cursor.edit(&mut buffer, &TuiEvent::Delete);
        assert_eq!(buffer, "риве");
    }

    #[test]
    fn test_edges_are_ignored() {
        let mut buffer = String::from("ab");
        let mut cursor = FieldCursor::default();
        assert_eq!(cursor.edit(&mut buffer, &TuiEvent::Backspace), None);
        assert_eq!(cursor.edit(&mut buffer, &TuiEvent::CursorLeft), None);
        cursor.move_to_end(&buffer);
        assert_eq!(cursor.edit(&mut buffer, &TuiEvent::Delete), None);
        assert_eq!(cursor.edit(&mut buffer, &TuiEvent::CursorRight), None);
        assert_eq!(cursor.edit(&mut buffer, &TuiEvent::Submit), None);
    }

    #[test]
    fn test_paste_flattens_newlines() {
        let mut buffer = String::new();
        let mut cursor = FieldCursor::default();
        cursor.edit(&mut buffer, &TuiEvent::Paste("one\ntwo".to_string()));
        assert_eq!(buffer, "one two");
        assert_eq!(cursor.pos(&buffer), 7);
    }

    #[test]
    fn test_caret_clamps_after_external_clear() {
        let mut buffer = String::new();
        let mut cursor = FieldCursor::default();
        type_str(&mut cursor, &mut buffer, "hi there");
        buffer.clear();
        assert_eq!(cursor.pos(&buffer), 0);
        cursor.edit(&mut buffer, &TuiEvent::InputChar('x'));
        assert_eq!(buffer, "x");
    }

    #[test]
    fn test_scroll_keeps_caret_visible() {
        assert_eq!(scroll_offset(5, 10), 0);
        assert_eq!(scroll_offset(9, 10), 0);
        assert_eq!(scroll_offset(15, 10), 6);
        assert_eq!(scroll_offset(3, 0), 3);
    }

    #[test]
    fn test_masked_field_hides_text() {
        let backend = TestBackend::new(20, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let cursor = FieldCursor::default();
        terminal
            .draw(|f| {
                let area = f.area();
                TextField::new("Password", "secret", &cursor)
                    .masked(true)
                    .focused(true)
                    .render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Password"));
        assert!(text.contains("••••••"));
        assert!(!text.contains("secret"));
    }

    #[test]
    fn test_empty_field_shows_placeholder() {
        let backend = TestBackend::new(30, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let cursor = FieldCursor::default();
        terminal
            .draw(|f| {
                let area = f.area();
                TextField::new("Search", "", &cursor)
                    .placeholder("type to filter")
                    .render(f, area);
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("type to filter"));
    }
}
