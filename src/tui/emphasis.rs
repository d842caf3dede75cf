//! Underscore emphasis → ratatui `Text` renderer.
//!
//! The coach is told to emphasize with single underscores (`_like this_`).
//! Rendering is a two-state tokenizer: every `_` toggles emphasis, and the
//! delimiter itself is never shown. An odd number of delimiters is fine;
//! whatever follows the last one simply stays in the toggled state.

use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};

pub const DELIMITER: char = '_';

/// A run of text with a single emphasis state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fragment<'a> {
    pub text: &'a str,
    pub emphasized: bool,
}

/// Splits `content` into alternating plain/emphasized runs. Empty runs are dropped.
pub fn tokenize(content: &str) -> Vec<Fragment<'_>> {
    let mut fragments = Vec::new();
    let mut emphasized = false;
    let mut start = 0;

    for (i, c) in content.char_indices() {
        if c == DELIMITER {
            if i > start {
                fragments.push(Fragment {
                    text: &content[start..i],
                    emphasized,
                });
            }
            emphasized = !emphasized;
            start = i + c.len_utf8();
        }
    }
    if start < content.len() {
        fragments.push(Fragment {
            text: &content[start..],
            emphasized,
        });
    }
    fragments
}

/// Renders message content into styled lines, emphasis as BOLD.
///
/// Emphasis state carries across line breaks, so a span opened on one line
/// and closed on the next is bold on both.
pub fn render(content: &str, base_fg: Color) -> Text<'static> {
    let base = Style::default().fg(base_fg);
    let bold = base.add_modifier(Modifier::BOLD);

    let mut lines = vec![Line::default()];
    for fragment in tokenize(content) {
        let style = if fragment.emphasized { bold } else { base };
        for (n, piece) in fragment.text.split('\n').enumerate() {
            if n > 0 {
                lines.push(Line::default());
            }
            if piece.is_empty() {
                continue;
            }
            let piece = expand_tabs(piece);
            if let Some(line) = lines.last_mut() {
                line.push_span(Span::styled(piece, style));
            }
        }
    }
    Text::from(lines)
}

/// Content with delimiters removed, as it appears on screen.
pub fn visible_text(content: &str) -> String {
    tokenize(content)
        .into_iter()
        .map(|f| expand_tabs(f.text))
        .collect()
}

/// ratatui renders `\t` as zero-width, so tabs become four spaces.
fn expand_tabs(text: &str) -> String {
    text.replace('\t', "    ")
}
