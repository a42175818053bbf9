//! Vehicles table and details pane.
//!
//! [`table_rows`] is the pure part: it turns the filtered collection, the
//! loading flag and the operator's role into display rows. The render
//! functions only lay those rows out.
//!
use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};

use crate::app::AppState;
use crate::model::{ExternalVehicle, PaymentStatus};

pub const HEADERS: [&str; 10] = [
    "REG NO", "OWNER", "CONTACT", "RATE", "USAGE", "TOTAL", "ADVANCE", "BALANCE", "STATUS",
    "ACTIONS",
];

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum RowAction {
    Edit,
    Delete,
}

#[derive(Clone, Debug, PartialEq)]
pub struct VehicleRow {
    pub id: String,
    pub cells: [String; 8],
    pub status: PaymentStatus,
    pub actions: Vec<RowAction>,
    /// Triggers are shown but inert while a fetch is pending.
    pub actions_enabled: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum TableRow {
    Placeholder(&'static str),
    Vehicle(VehicleRow),
}

pub const EMPTY_PLACEHOLDER: &str = "No external vehicles found";
pub const LOADING_PLACEHOLDER: &str = "Loading external vehicles...";

fn money(n: f64) -> String {
    format!("{n:.2}")
}

/// Rows for `vehicles`. Delete is only offered to elevated roles; an empty
/// collection yields exactly one placeholder row.
pub fn table_rows(vehicles: &[ExternalVehicle], busy: bool, elevated: bool) -> Vec<TableRow> {
    if vehicles.is_empty() {
        let text = if busy {
            LOADING_PLACEHOLDER
        } else {
            EMPTY_PLACEHOLDER
        };
        return vec![TableRow::Placeholder(text)];
    }
    vehicles
        .iter()
        .map(|v| {
            let mut actions = vec![RowAction::Edit];
            if elevated {
                actions.push(RowAction::Delete);
            }
            TableRow::Vehicle(VehicleRow {
                id: v.id.clone(),
                cells: [
                    v.reg_number.clone(),
                    v.owner_name.clone(),
                    v.owner_contact.clone(),
                    money(v.hire_rate),
                    v.vehicle_usage.to_string(),
                    money(v.total_cost),
                    money(v.advance),
                    money(v.balance),
                ],
                status: v.payment_status(),
                actions,
                actions_enabled: !busy,
            })
        })
        .collect()
}

fn actions_label(row: &VehicleRow) -> String {
    row.actions
        .iter()
        .map(|a| match a {
            RowAction::Edit => "[e]dit",
            RowAction::Delete => "[d]el",
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Render the paged table around the current selection.
pub fn render_vehicles_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }
    let theme = app.theme;
    let rows = table_rows(
        app.controller.filtered(),
        app.controller.is_loading(),
        app.role.is_elevated(),
    );

    let rpp = app.rows_per_page.max(1);
    let start = (app.selected_index / rpp) * rpp;
    let end = (start + rpp).min(rows.len());
    let start = start.min(end);
    let selected = app.selected_index;

    let total = app.controller.all().len();
    let shown = app.controller.filtered().len();
    let title = if shown == total {
        format!("External Vehicles ({total})")
    } else {
        format!("External Vehicles ({shown} of {total})")
    };
    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border));

    // The placeholder spans the full width instead of the first column.
    if let [TableRow::Placeholder(text)] = rows.as_slice() {
        let p = Paragraph::new(Line::styled(
            *text,
            Style::default().fg(theme.muted).add_modifier(Modifier::ITALIC),
        ))
        .block(block);
        f.render_widget(p, area);
        return;
    }

    let body = rows[start..end].iter().enumerate().map(|(i, row)| match row {
        TableRow::Placeholder(text) => Row::new(vec![Cell::from(*text)]),
        TableRow::Vehicle(r) => {
            let mut cells: Vec<Cell> = r.cells.iter().map(|c| Cell::from(c.clone())).collect();
            cells.push(Cell::from(Span::styled(
                r.status.label(),
                Style::default().fg(theme.badge(r.status)),
            )));
            let action_style = if r.actions_enabled {
                Style::default().fg(theme.text)
            } else {
                Style::default().fg(theme.muted).add_modifier(Modifier::DIM)
            };
            cells.push(Cell::from(Span::styled(actions_label(r), action_style)));
            let style = if start + i == selected {
                Style::default()
                    .fg(theme.highlight_fg)
                    .bg(theme.highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(theme.text)
            };
            Row::new(cells).style(style)
        }
    });

    let widths = [
        Constraint::Length(12),
        Constraint::Percentage(20),
        Constraint::Length(14),
        Constraint::Length(10),
        Constraint::Length(7),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(11),
        Constraint::Length(12),
        Constraint::Length(14),
    ];
    let header = Row::new(HEADERS.to_vec()).style(
        Style::default()
            .fg(theme.title)
            .add_modifier(Modifier::BOLD),
    );
    let table = Table::new(body, widths)
        .header(header)
        .block(block)
        .column_spacing(1);
    f.render_widget(table, area);
}

/// Render every field of the selected vehicle, including server-derived ones.
pub fn render_vehicle_details(f: &mut Frame, area: Rect, app: &AppState) {
    let theme = app.theme;
    let lines: Vec<Line> = match app.selected_vehicle() {
        Some(v) => {
            let status = v.payment_status();
            let created = v
                .created_at
                .map(|t| t.format("%Y-%m-%d %H:%M").to_string())
                .unwrap_or_else(|| "-".to_string());
            vec![
                Line::raw(format!("Registration: {}", v.reg_number)),
                Line::raw(format!("Owner: {} ({})", v.owner_name, v.owner_contact)),
                Line::raw(format!(
                    "Hire rate: {}   Usage: {}",
                    money(v.hire_rate),
                    v.vehicle_usage
                )),
                Line::raw(format!(
                    "Total cost: {}   Advance: {}   Balance: {}",
                    money(v.total_cost),
                    money(v.advance),
                    money(v.balance)
                )),
                Line::from(vec![
                    Span::raw("Payment: "),
                    Span::styled(status.label(), Style::default().fg(theme.badge(status))),
                ]),
                Line::raw(format!("Created: {created}")),
            ]
        }
        None => vec![Line::styled(
            "Nothing selected",
            Style::default().fg(theme.muted),
        )],
    };
    let p = Paragraph::new(lines)
        .style(Style::default().fg(theme.text))
        .block(
            Block::default()
                .title("Details")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.border)),
        );
    f.render_widget(p, area);
}
