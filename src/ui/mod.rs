pub mod components;
pub mod form;
pub mod table;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};

use crate::app::{AppState, InputMode};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(8),
            Constraint::Length(1),
        ])
        .split(f.area());

    components::render_header(f, root[0], app);
    table::render_vehicles_table(f, root[1], app);
    table::render_vehicle_details(f, root[2], app);
    components::render_status_bar(f, root[3], app);

    let area = f.area();
    match app.input_mode() {
        InputMode::Form => form::render_form_modal(f, area, app),
        InputMode::ConfirmDelete => form::render_delete_confirm(f, area, app),
        InputMode::Help => components::render_help_modal(f, area, app),
        InputMode::Normal | InputMode::Search => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::backend::ApiEvent;
    use crate::app::keymap::Keymap;
    use crate::app::settings::Role;
    use crate::app::theme::Theme;
    use crate::notify::{Notifier, ToastNotifier};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use std::sync::Arc;

    fn screen_text(app: &mut AppState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(140, 30)).expect("terminal");
        terminal.draw(|f| render(f, app)).expect("draw");
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn empty_list_shows_placeholder() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let mut app = AppState::new(
            tx,
            Arc::new(ToastNotifier::default()),
            Role::Staff,
            Theme::default(),
            Keymap::default(),
        );
        app.controller.fetch_all();
        assert!(screen_text(&mut app).contains(table::LOADING_PLACEHOLDER));

        crate::app::update::handle_api_event(&mut app, ApiEvent::Fetched(Ok(vec![])));
        assert!(screen_text(&mut app).contains(table::EMPTY_PLACEHOLDER));
    }

    #[test]
    fn help_lists_dismissed_notifications() {
        let (tx, _rx) = tokio::sync::mpsc::unbounded_channel();
        let notifier = Arc::new(ToastNotifier::default());
        let mut app = AppState::new(
            tx,
            notifier.clone(),
            Role::Staff,
            Theme::default(),
            Keymap::default(),
        );
        notifier.report_error("Failed to fetch external vehicles");
        notifier.dismiss();
        assert!(!screen_text(&mut app).contains("Failed to fetch"));

        app.help_open = true;
        let screen = screen_text(&mut app);
        assert!(screen.contains("Recent notifications"));
        assert!(screen.contains("Failed to fetch external vehicles"));
    }
}
