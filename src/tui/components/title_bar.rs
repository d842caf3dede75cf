//! # TitleBar Component
//!
//! Single-line status bar at the top of the screen.
//!
//! Stateless: all data arrives as props. The text degrades gracefully:
//!
//! 1. **Unseen content**: `"Health Coach AI (model: x) | Thinking... | ↓ New"`
//!    (the status segment is skipped when there is no status)
//! 2. **Status message**: `"Health Coach AI (model: x) | Thinking..."`
//! 3. **Default**: `"Health Coach AI (model: x)"`

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::text::Span;

pub const APP_TITLE: &str = "Health Coach AI";

/// Top status bar component showing model name, status, and notifications.
pub struct TitleBar {
    /// Model label (e.g. "gpt-4o-mini", or "default" when the server picks)
    pub model_name: String,
    /// Transient status (e.g. "Thinking...", "Cancelled")
    pub status_message: String,
    /// Whether there's content below the current scroll position
    pub has_unseen_content: bool,
}

impl TitleBar {
    pub fn new(model_name: String, status_message: String, has_unseen_content: bool) -> Self {
        Self {
            model_name,
            status_message,
            has_unseen_content,
        }
    }

    fn title_text(&self) -> String {
        let base = format!("{APP_TITLE} (model: {})", self.model_name);
        match (self.status_message.is_empty(), self.has_unseen_content) {
            (true, true) => format!("{base} | ↓ New"),
            (false, true) => format!("{base} | {} | ↓ New", self.status_message),
            (true, false) => base,
            (false, false) => format!("{base} | {}", self.status_message),
        }
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Span::raw(self.title_text()), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(title_bar: &mut TitleBar) -> String {
        let backend = TestBackend::new(80, 1);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                title_bar.render(f, f.area());
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_title_bar_with_unseen_content() {
        let mut title_bar =
            TitleBar::new("gpt-4o-mini".to_string(), "Thinking...".to_string(), true);
        let text = rendered(&mut title_bar);

        assert!(text.contains("Health Coach AI"));
        assert!(text.contains("gpt-4o-mini"));
        assert!(text.contains("Thinking..."));
        assert!(text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_with_status_message() {
        let mut title_bar = TitleBar::new("default".to_string(), "Cancelled".to_string(), false);
        let text = rendered(&mut title_bar);

        assert!(text.contains("(model: default) | Cancelled"));
        assert!(!text.contains("↓ New"));
    }

    #[test]
    fn test_title_bar_default_no_status() {
        let title_bar = TitleBar::new("gpt-4o".to_string(), String::new(), false);
        assert_eq!(title_bar.title_text(), "Health Coach AI (model: gpt-4o)");
    }

    #[test]
    fn test_title_bar_unseen_content_without_status() {
        let title_bar = TitleBar::new("x".to_string(), String::new(), true);
        assert_eq!(title_bar.title_text(), "Health Coach AI (model: x) | ↓ New");
    }
}
