use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something drawable into a region of the frame.
///
/// Data arrives as struct fields (props). `render` takes `&mut self` so a
/// component can update borrowed presentation state, such as list
/// selection or scroll offsets, while it draws.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Turns raw key events into the component's own event type.
pub trait EventHandler {
    type Event;

    /// `None` means the key was consumed (or ignored) without anything for
    /// the caller to act on.
    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
