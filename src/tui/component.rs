use ratatui::Frame;
use ratatui::layout::Rect;

use super::event::TuiEvent;

/// Something that draws itself into a region of the frame.
///
/// Stateless components (`TitleBar`, `ProfileBar`, `Message`) are built per
/// frame from borrowed props. `MessageList` borrows its persistent state
/// mutably so the render pass can refresh cached heights and scroll position.
pub trait Component {
    fn render(&mut self, frame: &mut Frame, area: Rect);
}

/// Something that consumes terminal events and may emit a higher-level one.
pub trait EventHandler {
    type Event;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event>;
}
