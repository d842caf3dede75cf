//! Cursor position and horizontal scrolling for the single-line InputBox.
//!
//! `CursorState` owns the cursor byte offset and the first visible column.
//! Methods take `buffer: &str` explicitly; the text itself is owned by `InputBox`.

/// Find the byte offset of the previous character boundary before `pos`.
pub(super) fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos`.
pub(super) fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

pub(super) struct CursorState {
    /// Cursor position as byte offset in buffer (0..=buffer.len())
    pub pos: usize,
    /// First visible character column
    pub scroll_col: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: 0,
            scroll_col: 0,
        }
    }

    pub fn reset(&mut self) {
        self.pos = 0;
        self.scroll_col = 0;
    }

    /// Cursor column in characters.
    pub fn column(&self, buffer: &str) -> usize {
        buffer[..self.pos].chars().count()
    }

    /// Shift the window so the cursor stays within `width` columns.
    pub fn update_scroll(&mut self, buffer: &str, width: usize) {
        if width == 0 {
            self.scroll_col = 0;
            return;
        }
        let col = self.column(buffer);
        if col < self.scroll_col {
            self.scroll_col = col;
        } else if col >= self.scroll_col + width {
            self.scroll_col = col + 1 - width;
        }
    }

    /// The slice of `buffer` visible in a window of `width` columns.
    pub fn visible<'b>(&self, buffer: &'b str, width: usize) -> &'b str {
        let mut indices = buffer.char_indices().map(|(i, _)| i);
        let start = indices.nth(self.scroll_col).unwrap_or(buffer.len());
        let end = buffer[start..]
            .char_indices()
            .nth(width)
            .map(|(i, _)| start + i)
            .unwrap_or(buffer.len());
        &buffer[start..end]
    }
}
