// Public-API tests for fleet-admin: config files and key-driven flows

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use fleet_admin::api::backend::{ApiCommand, ApiEvent, SaveKind};
use fleet_admin::app::controller::ModalKind;
use fleet_admin::app::keymap::{KeyAction, Keymap};
use fleet_admin::app::settings::Role;
use fleet_admin::app::theme::Theme;
use fleet_admin::app::update::{handle_api_event, handle_key};
use fleet_admin::app::{AppState, InputMode};
use fleet_admin::model::ExternalVehicle;
use fleet_admin::notify::{ToastKind, ToastNotifier};
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};

fn temp_path(name: &str) -> PathBuf {
    let nonce = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("fleet_{}_{}_{name}", std::process::id(), nonce))
}

fn key(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

fn type_text(app: &mut AppState, text: &str) {
    for c in text.chars() {
        handle_key(app, key(KeyCode::Char(c)));
    }
}

fn vehicle(id: &str, reg: &str, owner: &str) -> ExternalVehicle {
    ExternalVehicle {
        id: id.into(),
        reg_number: reg.into(),
        owner_name: owner.into(),
        owner_contact: "0770000000".into(),
        hire_rate: 2500.0,
        vehicle_usage: 4.0,
        advance: 0.0,
        balance: 10000.0,
        total_cost: 10000.0,
        payment_status: 1,
        created_at: None,
    }
}

fn app_with(role: Role) -> (AppState, UnboundedReceiver<ApiCommand>, Arc<ToastNotifier>) {
    let (tx, rx) = unbounded_channel();
    let notifier = Arc::new(ToastNotifier::new(Duration::from_secs(60)));
    let app = AppState::new(
        tx,
        notifier.clone(),
        role,
        Theme::default(),
        Keymap::default(),
    );
    (app, rx, notifier)
}

fn drain(rx: &mut UnboundedReceiver<ApiCommand>) -> Vec<ApiCommand> {
    let mut out = Vec::new();
    while let Ok(cmd) = rx.try_recv() {
        out.push(cmd);
    }
    out
}

// 1) Theme file is created on first run and read back on the next
#[test]
fn theme_load_or_init_creates_then_reads() {
    let path = temp_path("theme.conf");
    let _ = std::fs::remove_file(&path);

    let created = Theme::load_or_init(&path);
    assert!(path.exists());
    assert_eq!(created, Theme::mocha());

    std::fs::write(&path, "error = #ff0000\nnot_a_key = #00ff00\n").unwrap();
    let loaded = Theme::load_or_init(&path);
    assert_eq!(loaded.error, ratatui::style::Color::Rgb(255, 0, 0));
    assert_eq!(loaded.text, Theme::mocha().text);

    let _ = std::fs::remove_file(&path);
}

// 2) Keybinding overrides add to the defaults
#[test]
fn keymap_overrides_extend_defaults() {
    let path = temp_path("keybinds.conf");
    std::fs::write(&path, "# custom\nQuit = x\nBogus = y\n").unwrap();

    let km = Keymap::load_or_init(&path);
    assert_eq!(km.resolve(&key(KeyCode::Char('x'))), Some(KeyAction::Quit));
    assert_eq!(km.resolve(&key(KeyCode::Char('q'))), Some(KeyAction::Quit));
    assert_eq!(km.resolve(&key(KeyCode::Char('y'))), None);

    let _ = std::fs::remove_file(&path);
}

// 3) Adding a vehicle from the keyboard through to the resync fetch
#[test]
fn add_vehicle_flow_from_keys() {
    let (mut app, mut rx, notifier) = app_with(Role::Staff);
    app.controller.fetch_all();
    handle_api_event(&mut app, ApiEvent::Fetched(Ok(vec![])));
    drain(&mut rx);

    handle_key(&mut app, key(KeyCode::Char('n')));
    assert_eq!(app.input_mode(), InputMode::Form);
    assert_eq!(app.controller.modal(), ModalKind::Add);

    for text in ["CAB-1234", "Nimal", "0771234567", "5000", "100"] {
        type_text(&mut app, text);
        handle_key(&mut app, key(KeyCode::Tab));
    }
    handle_key(&mut app, key(KeyCode::Enter));
    assert!(app.form.is_busy());

    let sent = drain(&mut rx);
    assert_eq!(sent.len(), 1);
    let ApiCommand::Create { payload } = &sent[0] else {
        panic!("expected create, got {sent:?}");
    };
    assert_eq!(payload.reg_number, "CAB-1234");
    assert_eq!(payload.hire_rate, 5000.0);
    assert_eq!(payload.vehicle_usage, 100.0);
    assert_eq!(payload.advance, 0.0);
    assert_eq!(payload.id, None);

    handle_api_event(
        &mut app,
        ApiEvent::Saved {
            kind: SaveKind::Create,
            result: Ok(()),
        },
    );
    assert_eq!(app.input_mode(), InputMode::Normal);
    assert_eq!(drain(&mut rx), vec![ApiCommand::FetchAll]);
    let toast = notifier.current().expect("toast");
    assert_eq!(toast.kind, ToastKind::Success);
    assert_eq!(toast.message, "External vehicle added successfully");
}

// 4) Search narrows the list live; delete is refused for staff
#[test]
fn search_and_role_gated_delete() {
    let (mut app, mut rx, notifier) = app_with(Role::Staff);
    app.controller.fetch_all();
    handle_api_event(
        &mut app,
        ApiEvent::Fetched(Ok(vec![
            vehicle("v1", "CAB-1", "Nimal"),
            vehicle("v2", "WP-2", "Sunil"),
        ])),
    );
    drain(&mut rx);

    handle_key(&mut app, key(KeyCode::Char('/')));
    type_text(&mut app, "sun");
    assert_eq!(app.controller.filtered().len(), 1);
    handle_key(&mut app, key(KeyCode::Enter));
    assert_eq!(app.input_mode(), InputMode::Normal);

    handle_key(&mut app, key(KeyCode::Char('d')));
    assert_eq!(app.input_mode(), InputMode::Normal);
    assert_eq!(
        notifier.current().expect("toast").message,
        "Only administrators can delete vehicles"
    );
    assert!(drain(&mut rx).is_empty());
}
