use std::io::Stdout;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::info;

use crate::api::ApiClient;
use crate::api::backend::{ApiEvent, spawn_backend};
use crate::app::keymap::{KeyAction, Keymap};
use crate::app::settings::Settings;
use crate::app::theme::Theme;
use crate::app::{AppState, InputMode, Intent};
use crate::notify::ToastNotifier;
use crate::ui;

const TICK: Duration = Duration::from_millis(100);

/// Build the app from `settings`, start the API worker and run until quit.
pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    settings: &Settings,
) -> Result<()> {
    let theme = Theme::load_or_init(&settings.config_file("theme.conf")?);
    let keymap = Keymap::load_or_init(&settings.config_file("keybinds.conf")?);
    let client = ApiClient::new(
        settings.api_url.clone(),
        settings.resource.clone(),
        settings.token.clone(),
    );
    let mut backend = spawn_backend(client).context("starting api worker")?;
    let notifier = Arc::new(ToastNotifier::new(Duration::from_secs(settings.toast_secs)));

    let mut app = AppState::new(
        backend.commands.clone(),
        notifier,
        settings.role,
        theme,
        keymap,
    );
    info!(api = %settings.api_url, role = ?settings.role, "starting");
    app.controller.fetch_all();

    let res = event_loop(terminal, &mut app, &mut backend.events);

    drop(app);
    backend.shutdown();
    res
}

fn event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    events: &mut UnboundedReceiver<ApiEvent>,
) -> Result<()> {
    loop {
        while let Ok(ev) = events.try_recv() {
            handle_api_event(app, ev);
        }

        terminal.draw(|f| ui::render(f, app))?;

        if event::poll(TICK)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key) {
                    break;
                }
            }
        }
    }
    Ok(())
}

/// Feed a completed request to the controller. A failed save goes back
/// into the form so it stays open with the message inline.
pub fn handle_api_event(app: &mut AppState, event: ApiEvent) {
    if let Err(err) = app.controller.handle_event(event) {
        app.form.submit_failed(err.message);
    }
    app.clamp_selection();
}

/// Route one key press. Returns `true` when the app should quit.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> bool {
    match app.input_mode() {
        InputMode::Normal => return handle_normal_key(app, key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Form => handle_form_key(app, key),
        InputMode::ConfirmDelete => handle_confirm_key(app, key),
        InputMode::Help => {
            if matches!(
                key.code,
                KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q')
            ) {
                app.help_open = false;
            }
        }
    }
    false
}

fn handle_normal_key(app: &mut AppState, key: KeyEvent) -> bool {
    let len = app.controller.filtered().len();
    let rpp = app.rows_per_page.max(1);
    match app.keymap.resolve(&key) {
        Some(KeyAction::Quit) => return true,
        Some(KeyAction::OpenHelp) => app.help_open = true,
        Some(KeyAction::StartSearch) => app.searching = true,
        Some(KeyAction::NewRecord) => app.dispatch(Intent::RequestAdd),
        // Row triggers are disabled while the list is reloading.
        Some(KeyAction::EditSelection) if !app.controller.is_loading() => {
            if let Some(v) = app.selected_vehicle().cloned() {
                app.dispatch(Intent::RequestEdit(v));
            }
        }
        Some(KeyAction::DeleteSelection) if !app.controller.is_loading() => {
            if let Some(v) = app.selected_vehicle().cloned() {
                app.dispatch(Intent::RequestDelete(v));
            }
        }
        Some(KeyAction::EditSelection | KeyAction::DeleteSelection) => {}
        Some(KeyAction::Refresh) => app.dispatch(Intent::Refresh),
        Some(KeyAction::MoveUp) => app.selected_index = app.selected_index.saturating_sub(1),
        Some(KeyAction::MoveDown) => {
            if app.selected_index + 1 < len {
                app.selected_index += 1;
            }
        }
        Some(KeyAction::PageUp) => app.selected_index = app.selected_index.saturating_sub(rpp),
        Some(KeyAction::PageDown) => {
            app.selected_index = app
                .selected_index
                .saturating_add(rpp)
                .min(len.saturating_sub(1));
        }
        Some(KeyAction::Ignore) | None => app.notifier.dismiss(),
    }
    false
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.searching = false,
        KeyCode::Esc => {
            app.searching = false;
            app.search_query.clear();
        }
        KeyCode::Backspace => {
            app.search_query.pop();
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.search_query.push(c);
        }
        _ => return,
    }
    let term = app.search_query.clone();
    app.controller.apply_filter(&term);
    app.selected_index = 0;
}

fn handle_form_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            if !app.form.is_busy() {
                app.controller.close_modal();
            }
        }
        KeyCode::Tab | KeyCode::Down => app.form.next_field(),
        KeyCode::BackTab | KeyCode::Up => app.form.prev_field(),
        KeyCode::Enter => {
            if let Some(intent) = app.form.submit() {
                app.dispatch(intent);
            }
        }
        KeyCode::Backspace => app.form.backspace(),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.form.insert_char(c)
        }
        _ => {}
    }
}

fn handle_confirm_key(app: &mut AppState, key: KeyEvent) {
    match key.code {
        KeyCode::Left | KeyCode::Right | KeyCode::Tab | KeyCode::Char('h') | KeyCode::Char('l') => {
            app.confirm_choice = 1 - app.confirm_choice.min(1);
        }
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.controller.confirm_delete(true);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.controller.confirm_delete(false);
        }
        KeyCode::Enter => {
            let accepted = app.confirm_choice == 0;
            app.controller.confirm_delete(accepted);
        }
        _ => {}
    }
}
