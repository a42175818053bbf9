//! Color theme, persisted as `theme.conf` (`key = #RRGGBB` lines).
//!
use std::fmt::Write as _;
use std::path::Path;

use ratatui::style::Color;
use tracing::warn;

use crate::model::PaymentStatus;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Theme {
    pub text: Color,
    pub muted: Color,
    pub title: Color,
    pub border: Color,
    pub header_fg: Color,
    pub header_bg: Color,
    pub status_fg: Color,
    pub status_bg: Color,
    pub highlight_fg: Color,
    pub highlight_bg: Color,
    pub success: Color,
    pub error: Color,
    pub pending: Color,
    pub advance_paid: Color,
    pub fully_paid: Color,
}

/// Config keys, in the order they are written.
const KEYS: [&str; 15] = [
    "text",
    "muted",
    "title",
    "border",
    "header_fg",
    "header_bg",
    "status_fg",
    "status_bg",
    "highlight_fg",
    "highlight_bg",
    "success",
    "error",
    "pending",
    "advance_paid",
    "fully_paid",
];

impl Theme {
    /// Catppuccin Mocha.
    pub fn mocha() -> Self {
        Self {
            text: Color::Rgb(0xcd, 0xd6, 0xf4),
            muted: Color::Rgb(0x7f, 0x84, 0x9c),
            title: Color::Rgb(0xcb, 0xa6, 0xf7),
            border: Color::Rgb(0x58, 0x5b, 0x70),
            header_fg: Color::Rgb(0xb4, 0xbe, 0xfe),
            header_bg: Color::Rgb(0x31, 0x32, 0x44),
            status_fg: Color::Rgb(0xcd, 0xd6, 0xf4),
            status_bg: Color::Rgb(0x45, 0x47, 0x5a),
            highlight_fg: Color::Rgb(0xf9, 0xe2, 0xaf),
            highlight_bg: Color::Rgb(0x45, 0x47, 0x5a),
            success: Color::Rgb(0xa6, 0xe3, 0xa1),
            error: Color::Rgb(0xf3, 0x8b, 0xa8),
            pending: Color::Rgb(0xf9, 0xe2, 0xaf),
            advance_paid: Color::Rgb(0x89, 0xb4, 0xfa),
            fully_paid: Color::Rgb(0xa6, 0xe3, 0xa1),
        }
    }

    pub fn badge(&self, status: PaymentStatus) -> Color {
        match status {
            PaymentStatus::Pending => self.pending,
            PaymentStatus::AdvancePaid => self.advance_paid,
            PaymentStatus::FullyPaid => self.fully_paid,
            PaymentStatus::Unknown => self.muted,
        }
    }

    fn slot(&mut self, key: &str) -> Option<&mut Color> {
        Some(match key {
            "text" => &mut self.text,
            "muted" => &mut self.muted,
            "title" => &mut self.title,
            "border" => &mut self.border,
            "header_fg" => &mut self.header_fg,
            "header_bg" => &mut self.header_bg,
            "status_fg" => &mut self.status_fg,
            "status_bg" => &mut self.status_bg,
            "highlight_fg" => &mut self.highlight_fg,
            "highlight_bg" => &mut self.highlight_bg,
            "success" => &mut self.success,
            "error" => &mut self.error,
            "pending" => &mut self.pending,
            "advance_paid" => &mut self.advance_paid,
            "fully_paid" => &mut self.fully_paid,
            _ => return None,
        })
    }

    /// Parse theme text on top of `mocha`; unknown keys and bad colors are skipped.
    pub fn parse(contents: &str) -> Self {
        let mut theme = Self::mocha();
        for line in contents.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let Some((key, val)) = line.split_once('=') else {
                continue;
            };
            if let (Some(color), Some(slot)) = (parse_color(val), theme.slot(key.trim())) {
                *slot = color;
            }
        }
        theme
    }

    pub fn to_config(&self) -> String {
        let mut copy = *self;
        let mut buf = String::from(
            "# fleet-admin theme\n# Colors: #RRGGBB, RRGGBB or 'reset'\n\n",
        );
        for key in KEYS {
            if let Some(c) = copy.slot(key) {
                let _ = writeln!(buf, "{key} = {}", format_color(*c));
            }
        }
        buf
    }

    /// Read `path`, or write the default theme there if it does not exist.
    pub fn load_or_init(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let theme = Self::mocha();
                if let Err(e) = std::fs::write(path, theme.to_config()) {
                    warn!(path = %path.display(), %e, "could not write default theme");
                }
                theme
            }
            Err(e) => {
                warn!(path = %path.display(), %e, "could not read theme; using defaults");
                Self::mocha()
            }
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::mocha()
    }
}

fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if s.eq_ignore_ascii_case("reset") {
        return Some(Color::Reset);
    }
    let hex = s.strip_prefix('#').unwrap_or(s);
    if hex.len() != 6 || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?))
}

fn format_color(c: Color) -> String {
    match c {
        Color::Rgb(r, g, b) => format!("#{r:02X}{g:02X}{b:02X}"),
        _ => "reset".to_string(),
    }
}
