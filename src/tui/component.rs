use ratatui::Frame;
use ratatui::layout::Rect;

use crate::tui::event::TuiEvent;

/// Something that draws itself into a `Rect`.
///
/// Props arrive as struct fields. Components that need persistent state
/// borrow it (`&'a mut FooState`) and are rebuilt every frame, so `render`
/// takes `&mut self` and may update that state (scroll offsets, cached
/// widths) during the draw.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Persistent component state that reacts to terminal input.
pub trait EventHandler {
    /// The high-level event this component reports to the loop.
    type Event;

    /// Consume a `TuiEvent`, optionally reporting something upward.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
