//! # Sidebar Component
//!
//! Navigation shell: the five top-level destinations, one per line, with
//! their Alt+N shortcut. Stateless; the active tab is a prop.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::state::Tab;
use crate::tui::component::Component;

/// Columns the sidebar wants: longest label + shortcut + borders.
pub const SIDEBAR_WIDTH: u16 = 16;

pub struct Sidebar {
    pub active: Tab,
}

impl Sidebar {
    pub fn new(active: Tab) -> Self {
        Self { active }
    }

    fn line(&self, tab: Tab) -> Line<'static> {
        let shortcut = Span::styled(
            format!("{} ", tab.index() + 1),
            Style::default().fg(Color::DarkGray),
        );
        let mut style = Style::default();
        if !tab.is_functional() {
            style = style.fg(Color::DarkGray);
        }
        if tab == self.active {
            style = style.add_modifier(Modifier::BOLD | Modifier::REVERSED);
        }
        Line::from(vec![shortcut, Span::styled(tab.label(), style)])
    }
}

impl Component for Sidebar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = Tab::ALL.iter().map(|tab| self.line(*tab)).collect();
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" Menu ");
        frame.render_widget(Paragraph::new(lines).block(block), area);
    }
}
