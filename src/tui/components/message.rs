use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::inference::Role;
use crate::tui::component::Component;
use crate::tui::emphasis;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;

/// Pulse intensity above which a pending message's border turns BOLD.
const PULSE_BOLD_THRESHOLD: f32 = 0.6;

/// A stateless component that renders a single chat bubble.
///
/// `Message` is created fresh each frame from borrowed content. Assistant
/// text goes through the underscore-emphasis renderer; user text is shown
/// verbatim, matching what was typed.
///
/// A `pending` message is the in-flight response: its border pulses while
/// the stream is still open.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    pub role: Role,
    pub content: &'a str,
    pub pending: bool,
    /// Current pulse intensity (0.0 to 1.0) for pending messages
    pub pulse_intensity: f32,
}

impl<'a> Message<'a> {
    pub fn new(role: Role, content: &'a str) -> Self {
        Self {
            role,
            content,
            pending: false,
            pulse_intensity: 0.0,
        }
    }

    /// An in-flight assistant message.
    pub fn pending(content: &'a str, pulse_intensity: f32) -> Self {
        Self {
            role: Role::Assistant,
            content,
            pending: true,
            pulse_intensity,
        }
    }

    /// Predict the rendered height for a given width without rendering.
    ///
    /// Uses `textwrap` with options matching `Paragraph` wrapping so the
    /// parent list can size its scroll canvas up front.
    pub fn calculate_height(role: Role, content: &str, width: u16) -> u16 {
        let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
        if content_width == 0 {
            return 1;
        }

        let shown = display_text(role, content);
        let shown = shown.trim();
        if shown.is_empty() {
            return VERTICAL_OVERHEAD + 1;
        }

        let options = textwrap::Options::new(content_width as usize)
            .break_words(true)
            .word_separator(textwrap::WordSeparator::AsciiSpace);

        let lines = textwrap::wrap(shown, options);
        (lines.len() as u16).max(1) + VERTICAL_OVERHEAD
    }
}

/// Text as it will appear: assistant delimiters removed.
fn display_text(role: Role, content: &str) -> String {
    match role {
        Role::Assistant => emphasis::visible_text(content),
        Role::User | Role::System => content.to_string(),
    }
}

pub fn role_title(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "coach",
        Role::System => "system",
    }
}

pub fn role_color(role: Role) -> Color {
    match role {
        Role::User => Color::Green,
        Role::Assistant => Color::Blue,
        Role::System => Color::Yellow,
    }
}

impl<'a> Widget for Message<'a> {
    fn render(self, area: Rect, buf: &mut ratatui::buffer::Buffer) {
        let color = role_color(self.role);
        let style = Style::default().fg(color);

        let mut border_style = style.add_modifier(Modifier::DIM);
        if self.pending && self.pulse_intensity > PULSE_BOLD_THRESHOLD {
            border_style = style.add_modifier(Modifier::BOLD);
        }

        let block = Block::bordered()
            .title(role_title(self.role))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let content = self.content.trim();
        let paragraph = match self.role {
            Role::Assistant => Paragraph::new(emphasis::render(content, color)),
            Role::User | Role::System => Paragraph::new(content.to_string()).style(style),
        };
        paragraph.wrap(Wrap { trim: true }).render(inner_area, buf);
    }
}

impl<'a> Component for Message<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}
