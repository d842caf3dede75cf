//! # InputBox Component
//!
//! Single-line message field.
//!
//! Captures typing, editing (backspace, delete, cursor movement, paste), and
//! submission. The buffer is internal state; `disabled` is a prop that the
//! parent sets while a response is streaming, during which Enter is ignored
//! but typing continues so the next message can be drafted.

mod cursor;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use cursor::{CursorState, next_char_boundary, prev_char_boundary};

pub const PLACEHOLDER: &str = "Type your message here...";

/// Borders (1 left + 1 right).
const HORIZONTAL_OVERHEAD: u16 = 2;

/// High-level events emitted by the InputBox
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// User submitted non-blank text (Enter pressed)
    Submit(String),
    ContentChanged,
}

pub struct InputBox {
    /// Text buffer (Internal State)
    pub buffer: String,
    /// Set while a response is in flight (Prop)
    pub disabled: bool,
    cursor: CursorState,
}

impl Default for InputBox {
    fn default() -> Self {
        Self::new()
    }
}

impl InputBox {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            disabled: false,
            cursor: CursorState::new(),
        }
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor.pos, text);
        self.cursor.pos += text.len();
    }
}

impl Component for InputBox {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = area.width.saturating_sub(HORIZONTAL_OVERHEAD) as usize;
        self.cursor.update_scroll(&self.buffer, width);

        let (title, border_style) = if self.disabled {
            (
                " Message (waiting for reply, Esc to cancel) ",
                Style::default().fg(Color::DarkGray),
            )
        } else {
            (" Message (Enter to send) ", Style::default().fg(Color::Green))
        };

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title(title);

        let content = if self.buffer.is_empty() {
            Span::styled(
                PLACEHOLDER,
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            )
        } else {
            Span::styled(
                self.cursor.visible(&self.buffer, width).to_string(),
                Style::default().fg(Color::Green),
            )
        };

        frame.render_widget(Paragraph::new(content).block(block), area);

        let col = self
            .cursor
            .column(&self.buffer)
            .saturating_sub(self.cursor.scroll_col);
        frame.set_cursor_position((area.x + 1 + col as u16, area.y + 1));
    }
}

impl EventHandler for InputBox {
    type Event = InputEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut encoded = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut encoded));
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Single-line field: pasted line breaks become spaces
                let flattened: String = text
                    .chars()
                    .filter(|c| *c != '\r')
                    .map(|c| if c == '\n' { ' ' } else { c })
                    .collect();
                self.insert_str(&flattened);
                Some(InputEvent::ContentChanged)
            }
            TuiEvent::Backspace => (self.cursor.pos > 0).then(|| {
                let prev = prev_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(prev..self.cursor.pos);
                self.cursor.pos = prev;
                InputEvent::ContentChanged
            }),
            TuiEvent::Delete => (self.cursor.pos < self.buffer.len()).then(|| {
                let next = next_char_boundary(&self.buffer, self.cursor.pos);
                self.buffer.drain(self.cursor.pos..next);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorLeft => (self.cursor.pos > 0).then(|| {
                self.cursor.pos = prev_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorRight => (self.cursor.pos < self.buffer.len()).then(|| {
                self.cursor.pos = next_char_boundary(&self.buffer, self.cursor.pos);
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorHome => (self.cursor.pos != 0).then(|| {
                self.cursor.pos = 0;
                InputEvent::ContentChanged
            }),
            TuiEvent::CursorEnd => (self.cursor.pos != self.buffer.len()).then(|| {
                self.cursor.pos = self.buffer.len();
                InputEvent::ContentChanged
            }),
            TuiEvent::Submit => {
                if self.disabled || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor.reset();
                Some(InputEvent::Submit(text))
            }
            _ => None,
        }
    }
}
