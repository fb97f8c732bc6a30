use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Inputs are struct fields set by the parent before each render. Taking
/// `&mut self` lets stateful views (the transcript) record measurements and
/// scroll position while drawing.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Something that consumes raw `TuiEvent`s and reports what they meant.
pub trait EventHandler {
    /// High-level outcome reported to the event loop.
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
