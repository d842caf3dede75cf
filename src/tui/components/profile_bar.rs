//! # ProfileBar Component
//!
//! The three profile selectors, side by side, each in a bordered box whose
//! title names the key that cycles it. Unset selectors show their placeholder
//! dimmed.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, BorderType, Paragraph};

use crate::core::profile::{ProfileField, UserProfile};
use crate::tui::component::Component;

const FIELDS: [ProfileField; 3] = [
    ProfileField::SkinType,
    ProfileField::FitnessGoal,
    ProfileField::ActivityLevel,
];

/// Key hint shown in each selector's border.
pub fn key_hint(field: ProfileField) -> &'static str {
    match field {
        ProfileField::SkinType => "Ctrl+T",
        ProfileField::FitnessGoal => "Ctrl+G",
        ProfileField::ActivityLevel => "Ctrl+L",
    }
}

pub struct ProfileBar<'a> {
    pub profile: &'a UserProfile,
}

impl<'a> ProfileBar<'a> {
    pub fn new(profile: &'a UserProfile) -> Self {
        Self { profile }
    }
}

impl<'a> Component for ProfileBar<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let columns = Layout::horizontal([Constraint::Ratio(1, 3); 3]).split(area);

        for (field, column) in FIELDS.into_iter().zip(columns.iter()) {
            let set = self.profile.is_set(field);
            let style = if set {
                Style::default().fg(Color::Cyan)
            } else {
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::DIM)
            };

            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(Color::DarkGray))
                .title(format!(" {} ", key_hint(field)));

            let paragraph =
                Paragraph::new(Span::styled(self.profile.label(field), style)).block(block);
            frame.render_widget(paragraph, *column);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::profile::SkinType;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn rendered(profile: &UserProfile) -> String {
        let backend = TestBackend::new(90, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                ProfileBar::new(profile).render(f, f.area());
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
    fn unset_profile_shows_placeholders() {
        let text = rendered(&UserProfile::default());
        assert!(text.contains("Select Skin Type"));
        assert!(text.contains("Ctrl+T"));
        assert!(text.contains("Ctrl+G"));
        assert!(text.contains("Ctrl+L"));
    }

    #[test]
    fn selected_value_replaces_placeholder() {
        let profile = UserProfile {
            skin_type: Some(SkinType::Oily),
            ..UserProfile::default()
        };
        let text = rendered(&profile);
        assert!(text.contains("Oily"));
        assert!(!text.contains("Select Skin Type"));
    }
}
