//! # Placeholder Component
//!
//! Body shown for navigation destinations that are not built yet.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::state::Tab;
use crate::tui::component::Component;

pub struct Placeholder {
    pub tab: Tab,
}

impl Placeholder {
    pub fn new(tab: Tab) -> Self {
        Self { tab }
    }
}

impl Component for Placeholder {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(format!(" {} ", self.tab.label()));

        // Push the text to the vertical middle
        let top_pad = area.height.saturating_sub(4) / 2;
        let mut lines = vec![Line::default(); top_pad as usize];
        lines.push(Line::from(format!("{} is coming soon.", self.tab.label())));
        lines.push(Line::styled(
            "Alt+1 goes back to Chats",
            Style::default().fg(Color::DarkGray),
        ));

        frame.render_widget(
            Paragraph::new(lines).alignment(Alignment::Center).block(block),
            area,
        );
    }
}
