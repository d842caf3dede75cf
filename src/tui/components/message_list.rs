//! # MessageList Component
//!
//! Scrollable view of the conversation plus the in-flight response.
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and the borrowed transcript.
//! Since `Component::render` takes `&mut self`, the layout cache and scroll
//! state are updated during the render pass.
//!
//! Committed messages never change once they are in the transcript, so their
//! heights are cached. The pending bubble is re-measured every frame.

use ratatui::Frame;
use ratatui::layout::{Position, Rect, Size};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::inference::{Message as ChatMessage, Role};
use crate::tui::component::{Component, EventHandler};
use crate::tui::components::message::Message;
use crate::tui::event::TuiEvent;

/// Shown in the pending bubble before the first delta arrives.
pub const THINKING_PLACEHOLDER: &str = "Thinking...";

/// Layout and scroll state for the message list.
/// Must be persisted in the parent TuiState.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// When true, auto-scroll to bottom on new content
    pub stick_to_bottom: bool,
    /// Last known total content height (for the "new content" indicator)
    pub content_height: u16,
    /// Last known viewport height (for scroll clamping between frames)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            stick_to_bottom: true,
            content_height: 0,
            viewport_height: 0,
        }
    }

    fn max_offset(&self) -> u16 {
        self.content_height.saturating_sub(self.viewport_height)
    }

    /// Clamp scroll offset so it never exceeds the content bounds.
    pub fn clamp_scroll(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y > max_y {
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// Re-engage auto-scroll once the user has scrolled back to the bottom.
    pub fn repin_if_at_bottom(&mut self) {
        let max_y = self.max_offset();
        let current = self.scroll_state.offset();
        if current.y >= max_y {
            self.stick_to_bottom = true;
            self.scroll_state.set_offset(Position {
                x: current.x,
                y: max_y,
            });
        }
    }

    /// True when the user has scrolled away from content that is still below.
    pub fn has_unseen_content(&self) -> bool {
        !self.stick_to_bottom && self.scroll_state.offset().y < self.max_offset()
    }
}

/// Scrollable conversation view component.
/// Created fresh each frame with references to state and data.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub messages: &'a [ChatMessage],
    /// Accumulated text of the in-flight response, if one is open
    pub pending: Option<&'a str>,
    pub pulse_value: f32,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        messages: &'a [ChatMessage],
        pending: Option<&'a str>,
        pulse_value: f32,
    ) -> Self {
        Self {
            state,
            messages,
            pending,
            pulse_value,
        }
    }

    fn pending_text(&self) -> Option<&'a str> {
        self.pending.map(|text| {
            if text.is_empty() {
                THINKING_PLACEHOLDER
            } else {
                text
            }
        })
    }
}

/// System messages steer the model and are never shown.
fn is_visible(message: &ChatMessage) -> bool {
    message.role != Role::System
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area

        // 1. Update the layout cache for committed messages
        let layout = &mut self.state.layout;
        let reusable = layout.reusable_count(self.messages.len(), content_width);
        layout.heights.truncate(reusable.min(layout.heights.len()));
        for message in self.messages.iter().skip(layout.heights.len()) {
            let height = if is_visible(message) {
                Message::calculate_height(message.role, &message.content, content_width)
            } else {
                0
            };
            layout.heights.push(height);
        }
        layout.update_metadata(self.messages.len(), content_width);

        let pending_text = self.pending_text();
        let pending_height = pending_text.map_or(0, |text| {
            Message::calculate_height(Role::Assistant, text, content_width)
        });

        let committed_height: u16 = self.state.layout.heights.iter().sum();
        let total_height = committed_height.saturating_add(pending_height);

        self.state.content_height = total_height;
        self.state.viewport_height = area.height;
        if !self.state.stick_to_bottom {
            self.state.clamp_scroll();
        }

        // 2. Render into a ScrollView
        let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Always)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

        let mut y_offset: u16 = 0;
        for (message, &height) in self.messages.iter().zip(self.state.layout.heights.iter()) {
            if height == 0 {
                continue;
            }
            let rect = Rect::new(0, y_offset, content_width, height);
            scroll_view.render_widget(Message::new(message.role, &message.content), rect);
            y_offset = y_offset.saturating_add(height);
        }

        if let Some(text) = pending_text {
            let rect = Rect::new(0, y_offset, content_width, pending_height);
            scroll_view.render_widget(Message::pending(text, self.pulse_value), rect);
        }

        if self.state.stick_to_bottom {
            self.state.scroll_state.scroll_to_bottom();
        }

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

/// Event handling lives on the state because `MessageList` is rebuilt every frame.
impl EventHandler for MessageListState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::ScrollUp => {
                self.scroll_state.scroll_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollDown => {
                self.scroll_state.scroll_down();
                self.repin_if_at_bottom();
            }
            TuiEvent::ScrollPageUp => {
                self.scroll_state.scroll_page_up();
                self.stick_to_bottom = false;
            }
            TuiEvent::ScrollPageDown => {
                self.scroll_state.scroll_page_down();
                self.repin_if_at_bottom();
            }
            _ => {}
        }
        None
    }
}

/// Cached heights of committed messages.
pub struct LayoutCache {
    pub heights: Vec<u16>,
    message_count: usize,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            heights: Vec::new(),
            message_count: 0,
            content_width: 0,
        }
    }

    /// How many cached heights are still valid.
    pub fn reusable_count(&self, message_count: usize, content_width: u16) -> usize {
        if self.content_width != content_width || message_count < self.message_count {
            return 0;
        }
        self.message_count
    }

    pub fn update_metadata(&mut self, message_count: usize, content_width: u16) {
        self.message_count = message_count;
        self.content_width = content_width;
    }
}
