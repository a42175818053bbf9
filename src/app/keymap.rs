//! Keybinding configuration: defaults plus overrides from `keybinds.conf`.
//!
//! Only list-screen actions are configurable. Keys inside the form, search
//! prompt and confirmation dialog are fixed.

use std::collections::HashMap;
use std::fmt::Write as _;
use std::path::Path;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use tracing::warn;

/// Semantic actions on the vehicles list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyAction {
    Quit,
    OpenHelp,
    StartSearch,
    NewRecord,
    EditSelection,
    DeleteSelection,
    Refresh,
    MoveUp,
    MoveDown,
    PageUp,
    PageDown,
    Ignore,
}

const ACTION_NAMES: [(KeyAction, &str); 12] = [
    (KeyAction::Quit, "Quit"),
    (KeyAction::OpenHelp, "OpenHelp"),
    (KeyAction::StartSearch, "StartSearch"),
    (KeyAction::NewRecord, "NewRecord"),
    (KeyAction::EditSelection, "EditSelection"),
    (KeyAction::DeleteSelection, "DeleteSelection"),
    (KeyAction::Refresh, "Refresh"),
    (KeyAction::MoveUp, "MoveUp"),
    (KeyAction::MoveDown, "MoveDown"),
    (KeyAction::PageUp, "PageUp"),
    (KeyAction::PageDown, "PageDown"),
    (KeyAction::Ignore, "Ignore"),
];

pub fn format_action(a: KeyAction) -> &'static str {
    ACTION_NAMES
        .iter()
        .find(|(action, _)| *action == a)
        .map(|(_, name)| *name)
        .unwrap_or("Ignore")
}

fn parse_action(s: &str) -> Option<KeyAction> {
    ACTION_NAMES
        .iter()
        .find(|(_, name)| *name == s.trim())
        .map(|(action, _)| *action)
}

type Binding = (KeyModifiers, KeyCode);

#[derive(Clone, Debug)]
pub struct Keymap {
    bindings: HashMap<Binding, KeyAction>,
}

impl Keymap {
    pub fn new_defaults() -> Self {
        use KeyCode::*;
        use KeyModifiers as M;
        let bindings = HashMap::from([
            ((M::NONE, Char('q')), KeyAction::Quit),
            ((M::CONTROL, Char('c')), KeyAction::Quit),
            ((M::NONE, Char('?')), KeyAction::OpenHelp),
            ((M::NONE, Char('/')), KeyAction::StartSearch),
            ((M::NONE, Char('n')), KeyAction::NewRecord),
            ((M::NONE, Char('a')), KeyAction::NewRecord),
            ((M::NONE, Enter), KeyAction::EditSelection),
            ((M::NONE, Char('e')), KeyAction::EditSelection),
            ((M::NONE, Delete), KeyAction::DeleteSelection),
            ((M::NONE, Char('d')), KeyAction::DeleteSelection),
            ((M::NONE, Char('r')), KeyAction::Refresh),
            ((M::NONE, Up), KeyAction::MoveUp),
            ((M::NONE, Char('k')), KeyAction::MoveUp),
            ((M::NONE, Down), KeyAction::MoveDown),
            ((M::NONE, Char('j')), KeyAction::MoveDown),
            ((M::NONE, PageUp), KeyAction::PageUp),
            ((M::NONE, Left), KeyAction::PageUp),
            ((M::NONE, PageDown), KeyAction::PageDown),
            ((M::NONE, Right), KeyAction::PageDown),
            ((M::NONE, Esc), KeyAction::Ignore),
        ]);
        Self { bindings }
    }

    /// Defaults overridden by `Action = KeySpec` lines. Lines that do not
    /// parse are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut map = Self::default();
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((lhs, rhs)) = line.split_once('=') else {
                continue;
            };
            match (parse_action(lhs), parse_key(rhs)) {
                (Some(action), Some(key)) => {
                    map.bindings.insert(key, action);
                }
                _ => warn!(%line, "ignoring keybinding"),
            }
        }
        map
    }

    pub fn load_or_init(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let km = Self::default();
                if let Err(e) = std::fs::write(path, km.to_config()) {
                    warn!(path = %path.display(), %e, "could not write default keybindings");
                }
                km
            }
            Err(e) => {
                warn!(path = %path.display(), %e, "could not read keybindings; using defaults");
                Self::default()
            }
        }
    }

    pub fn to_config(&self) -> String {
        let mut buf = String::new();
        buf.push_str("# fleet-admin keybindings\n");
        buf.push_str("# Format: <Action> = <KeySpec>\n");
        buf.push_str("# KeySpec: a single character, Ctrl+<char>, Enter, Esc, Tab, Up, Down, Left, Right, PageUp, PageDown, Delete\n");
        let names: Vec<&str> = ACTION_NAMES.iter().map(|(_, n)| *n).collect();
        let _ = writeln!(buf, "# Actions: {}\n", names.join(", "));
        let mut rows: Vec<(String, &str)> = self
            .bindings
            .iter()
            .map(|((m, c), a)| (Self::format_key(*m, *c), format_action(*a)))
            .collect();
        rows.sort_by(|a, b| a.1.cmp(b.1).then_with(|| a.0.cmp(&b.0)));
        for (key, action) in rows {
            let _ = writeln!(buf, "{action} = {key}");
        }
        buf
    }

    pub fn resolve(&self, key: &KeyEvent) -> Option<KeyAction> {
        self.bindings.get(&(key.modifiers, key.code)).copied().or_else(|| {
            // Some terminals report SHIFT alongside upper-case or symbol characters.
            match key.code {
                KeyCode::Char(_) if key.modifiers == KeyModifiers::SHIFT => self
                    .bindings
                    .get(&(KeyModifiers::NONE, key.code))
                    .copied(),
                _ => None,
            }
        })
    }

    /// All keys bound to `action`, formatted for the help screen.
    pub fn keys_for(&self, action: KeyAction) -> Vec<String> {
        let mut keys: Vec<String> = self
            .bindings
            .iter()
            .filter(|(_, a)| **a == action)
            .map(|((m, c), _)| Self::format_key(*m, *c))
            .collect();
        keys.sort();
        keys
    }

    pub fn format_key(mods: KeyModifiers, code: KeyCode) -> String {
        use KeyCode::*;
        let base = match code {
            Char(c) => c.to_string(),
            Enter => "Enter".into(),
            Esc => "Esc".into(),
            Tab => "Tab".into(),
            Delete => "Delete".into(),
            Up => "Up".into(),
            Down => "Down".into(),
            Left => "Left".into(),
            Right => "Right".into(),
            PageUp => "PageUp".into(),
            PageDown => "PageDown".into(),
            other => format!("{other:?}"),
        };
        if mods.contains(KeyModifiers::CONTROL) {
            format!("Ctrl+{base}")
        } else {
            base
        }
    }
}

impl Default for Keymap {
    fn default() -> Self {
        Self::new_defaults()
    }
}

fn parse_key(spec: &str) -> Option<Binding> {
    use KeyCode::*;
    let spec = spec.trim();
    let (mods, rest) = match spec.strip_prefix("Ctrl+") {
        Some(rest) => (KeyModifiers::CONTROL, rest),
        None => (KeyModifiers::NONE, spec),
    };
    let code = match rest {
        "Enter" => Enter,
        "Esc" | "Escape" => Esc,
        "Tab" => Tab,
        "Delete" => Delete,
        "Up" => Up,
        "Down" => Down,
        "Left" => Left,
        "Right" => Right,
        "PageUp" => PageUp,
        "PageDown" => PageDown,
        _ => {
            let mut chars = rest.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Char(c),
                _ => return None,
            }
        }
    };
    Some((mods, code))
}
