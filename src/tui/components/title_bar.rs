//! # TitleBar Component
//!
//! Top line of the main screen: app name, who is signed in, and the latest
//! status message.
//!
//! Stateless: all three values are props copied from `App` each frame.
//!
//! ```text
//! Courier | Ann (#1) | Loaded 12 chats
//! ```
//!
//! Segments with nothing to say are dropped together with their separator,
//! so a narrow terminal still shows the app name first.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

use crate::tui::component::Component;

pub struct TitleBar<'a> {
    /// Display name of the signed-in user, if any.
    pub user_name: Option<&'a str>,
    pub user_id: Option<i64>,
    pub status_message: &'a str,
}

impl<'a> TitleBar<'a> {
    pub fn new(user_name: Option<&'a str>, user_id: Option<i64>, status_message: &'a str) -> Self {
        Self {
            user_name,
            user_id,
            status_message,
        }
    }

    fn segments(&self) -> Vec<String> {
        let mut parts = vec!["Courier".to_string()];
        match (self.user_name, self.user_id) {
            (Some(name), Some(id)) => parts.push(format!("{name} (#{id})")),
            (Some(name), None) => parts.push(name.to_string()),
            _ => {}
        }
        if !self.status_message.is_empty() {
            parts.push(self.status_message.to_string());
        }
        parts
    }
}

impl Component for TitleBar<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let separator = Span::styled(" | ", Style::default().fg(Color::DarkGray));
        let mut spans = Vec::new();
        for (i, part) in self.segments().into_iter().enumerate() {
            if i > 0 {
                spans.push(separator.clone());
            }
            let style = if i == 0 {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default()
            };
            spans.push(Span::styled(part, style));
        }
        frame.render_widget(Line::from(spans), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::components::buffer_text;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn render_text(mut bar: TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                bar.render(f, area);
            })
            .unwrap();
        buffer_text(terminal.backend().buffer())
    }

    #[test]
    fn test_title_bar_signed_in() {
        let text = render_text(TitleBar::new(Some("Ann"), Some(1), "Loaded 3 chats"));
        assert!(text.contains("Courier"));
        assert!(text.contains("Ann (#1)"));
        assert!(text.contains("Loaded 3 chats"));
    }

    #[test]
    fn test_title_bar_without_status_has_no_trailing_separator() {
        let bar = TitleBar::new(Some("Ann"), Some(1), "");
        assert_eq!(bar.segments(), vec!["Courier", "Ann (#1)"]);
    }

    #[test]
    fn test_title_bar_signed_out() {
        let text = render_text(TitleBar::new(None, None, ""));
        assert!(text.starts_with("Courier"));
        assert!(!text.contains('|'));
    }
}
