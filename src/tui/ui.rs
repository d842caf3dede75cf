use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{MessageList, ProfileBar, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Length(3), Min(0), Length(3)]);
    let [title_area, profile_area, main_area, input_area] = layout.areas(frame.area());

    MessageList::new(
        &mut tui.message_list,
        app.conversation.messages(),
        app.partial_text(),
        tui.pulse_value,
    )
    .render(frame, main_area);

    // Title bar reads the scroll state the list just updated
    TitleBar::new(
        app.model_name.clone(),
        app.status_message.clone(),
        tui.message_list.has_unseen_content(),
    )
    .render(frame, title_area);

    ProfileBar::new(&app.profile).render(frame, profile_area);

    tui.input_box.render(frame, input_area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::action::{Action, update};
    use crate::test_support::test_app;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn draw(app: &App, tui: &mut TuiState) -> String {
        let backend = TestBackend::new(80, 24);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| draw_ui(f, app, tui)).unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect::<String>()
    }

    #[test]
    fn test_draw_ui_initial_screen() {
        let app = test_app();
        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);

        assert!(text.contains("Health Coach AI (model: test-model)"));
        assert!(text.contains("Select Skin Type"));
        assert!(text.contains("your personal health"));
        assert!(text.contains("Type your message here..."));
    }

    #[test]
    fn test_draw_ui_while_streaming() {
        let mut app = test_app();
        update(&mut app, Action::Submit("How much water?".into()));
        let generation = app.active_generation().unwrap();
        update(
            &mut app,
            Action::ResponseChunk {
                generation,
                text: "About _2 liters_".into(),
            },
        );

        let mut tui = TuiState::new();
        let text = draw(&app, &mut tui);
        assert!(text.contains("How much water?"));
        assert!(text.contains("About 2 liters"));
        assert!(text.contains("Thinking..."));
    }
}
