//! Shared UI components: header, status bar, toast, help modal.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode};
use crate::notify::ToastKind;

const RECENT_TOASTS: usize = 5;

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

pub fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let role = if app.role.is_elevated() { "admin" } else { "staff" };
    let search = if app.searching {
        format!("  Search: {}_", app.search_query)
    } else if !app.search_query.is_empty() {
        format!("  Filter: {}", app.search_query)
    } else {
        String::new()
    };
    let p = Paragraph::new(format!(
        "fleet-admin ({role}){search}  /: search  n: add  Enter: edit  r: refresh  ?: help  q: quit"
    ))
    .block(
        Block::default()
            .title("External Vehicles")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    )
    .style(
        Style::default()
            .fg(app.theme.header_fg)
            .bg(app.theme.header_bg),
    );
    f.render_widget(p, area);
}

/// Bottom line: the live toast if there is one, else mode and counts.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let base = Style::default()
        .fg(app.theme.status_fg)
        .bg(app.theme.status_bg);
    if let Some(toast) = app.notifier.current() {
        let color = match toast.kind {
            ToastKind::Success => app.theme.success,
            ToastKind::Error => app.theme.error,
        };
        let p = Paragraph::new(Line::from(Span::styled(
            toast.message,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )))
        .style(base);
        f.render_widget(p, area);
        return;
    }
    let mode = match app.input_mode() {
        InputMode::Normal => "NORMAL",
        InputMode::Search => "SEARCH",
        InputMode::Form => "FORM",
        InputMode::ConfirmDelete => "CONFIRM",
        InputMode::Help => "HELP",
    };
    let loading = if app.controller.is_loading() {
        "  loading..."
    } else {
        ""
    };
    let msg = format!(
        "mode: {mode}  vehicles: {}/{}  rows/page: {}{loading}",
        app.controller.filtered().len(),
        app.controller.all().len(),
        app.rows_per_page,
    );
    f.render_widget(Paragraph::new(msg).style(base), area);
}

pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let rect = centered_rect(width, 28, area);
    let entries = [
        ("Move", vec![KeyAction::MoveUp, KeyAction::MoveDown]),
        ("Page", vec![KeyAction::PageUp, KeyAction::PageDown]),
        ("Search", vec![KeyAction::StartSearch]),
        ("Add vehicle", vec![KeyAction::NewRecord]),
        ("Edit vehicle", vec![KeyAction::EditSelection]),
        ("Delete vehicle (admin)", vec![KeyAction::DeleteSelection]),
        ("Refresh", vec![KeyAction::Refresh]),
        ("Help", vec![KeyAction::OpenHelp]),
        ("Quit", vec![KeyAction::Quit]),
    ];
    let mut lines = vec![
        Line::from(Span::styled(
            "Vehicles list",
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::raw(""),
    ];
    for (label, actions) in entries {
        let keys: Vec<String> = actions
            .into_iter()
            .flat_map(|a| app.keymap.keys_for(a))
            .collect();
        lines.push(Line::from(vec![
            Span::raw(format!("{label:>24}: ")),
            Span::styled(keys.join(", "), Style::default().add_modifier(Modifier::ITALIC)),
        ]));
    }
    lines.push(Line::raw(""));
    lines.push(Line::raw(
        "Search filters by registration, owner or contact as you type.",
    ));
    lines.push(Line::raw("Form: Tab moves between fields, Enter saves, Esc cancels."));
    lines.push(Line::raw("Close help: Esc / Enter"));

    let history = app.notifier.history();
    if !history.is_empty() {
        lines.push(Line::raw(""));
        lines.push(Line::from(Span::styled(
            "Recent notifications",
            Style::default().add_modifier(Modifier::BOLD),
        )));
        for toast in history.iter().rev().take(RECENT_TOASTS) {
            let color = match toast.kind {
                ToastKind::Success => app.theme.success,
                ToastKind::Error => app.theme.error,
            };
            lines.push(Line::styled(
                format!("  {}", toast.message),
                Style::default().fg(color),
            ));
        }
    }

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Help")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
