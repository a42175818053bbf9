//! Add/edit form modal and delete confirmation.
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::AppState;
use crate::app::controller::ModalKind;
use crate::app::form::FormField;
use crate::ui::components::centered_rect;

pub fn render_form_modal(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = app.theme;
    let form = &app.form;
    let title = match app.controller.modal() {
        ModalKind::Edit => "Edit external vehicle",
        _ => "Add external vehicle",
    };
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let rect = centered_rect(width, 14, area);

    let label_w = FormField::ALL
        .iter()
        .map(|f| f.label().len() + 1)
        .max()
        .unwrap_or(0);
    let mut lines: Vec<Line> = FormField::ALL
        .iter()
        .map(|field| {
            let focused = *field == form.focused();
            let marker = if focused { "▶ " } else { "  " };
            let req = if field.is_required() { "*" } else { " " };
            let label = format!("{marker}{:>label_w$}: ", format!("{}{req}", field.label()));
            let mut value = form.draft.get(*field).to_string();
            if focused && !form.is_busy() {
                value.push('_');
            }
            let value_style = if focused {
                Style::default()
                    .fg(theme.highlight_fg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Line::from(vec![
                Span::styled(label, Style::default().fg(theme.muted)),
                Span::styled(value, value_style),
            ])
        })
        .collect();

    lines.push(Line::raw(""));
    if let Some(err) = form.error() {
        lines.push(Line::styled(err.to_string(), Style::default().fg(theme.error)));
    } else if form.is_busy() {
        lines.push(Line::styled("Saving...", Style::default().fg(theme.muted)));
    } else {
        lines.push(Line::raw(""));
    }
    lines.push(Line::styled(
        "Tab/Up/Down: field  Enter: save  Esc: cancel",
        Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
    ));

    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.border)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

pub fn render_delete_confirm(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(record) = app.controller.pending_delete() else {
        return;
    };
    let rect = centered_rect(52, 7, area);
    let yes = if app.confirm_choice == 0 { "[Yes]" } else { " Yes " };
    let no = if app.confirm_choice == 1 { "[No]" } else { " No " };
    let body = format!(
        "Delete vehicle {} ({})?\n\n  {}    {}",
        record.reg_number, record.owner_name, yes, no
    );
    let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("Confirm delete")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(app.theme.error)),
    );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
