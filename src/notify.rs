//! User-visible notifications.
//!
//! The list controller reports outcomes through the [`Notifier`] capability
//! instead of drawing anything itself. The TUI plugs in [`ToastNotifier`],
//! which keeps the latest toast for the footer and a short history.
//!
use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{error, info};

pub trait Notifier: Send + Sync {
    fn report_success(&self, message: &str);
    fn report_error(&self, message: &str);
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToastKind {
    Success,
    Error,
}

#[derive(Clone, Debug)]
pub struct Toast {
    pub kind: ToastKind,
    pub message: String,
    pub shown_at: Instant,
}

const HISTORY_LIMIT: usize = 50;

#[derive(Debug, Default)]
struct ToastLog {
    current: Option<Toast>,
    history: VecDeque<Toast>,
}

/// Notifier that backs the footer toast.
#[derive(Debug)]
pub struct ToastNotifier {
    ttl: Duration,
    log: Mutex<ToastLog>,
}

impl ToastNotifier {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            log: Mutex::new(ToastLog::default()),
        }
    }

    fn push(&self, kind: ToastKind, message: &str) {
        let toast = Toast {
            kind,
            message: message.to_string(),
            shown_at: Instant::now(),
        };
        let mut log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        if log.history.len() == HISTORY_LIMIT {
            log.history.pop_front();
        }
        log.history.push_back(toast.clone());
        log.current = Some(toast);
    }

    /// The toast to display now, if it has not expired.
    pub fn current(&self) -> Option<Toast> {
        let log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.current
            .as_ref()
            .filter(|t| t.shown_at.elapsed() < self.ttl)
            .cloned()
    }

    /// Drop the visible toast early (e.g. on keypress).
    pub fn dismiss(&self) {
        self.log.lock().unwrap_or_else(|e| e.into_inner()).current = None;
    }

    /// Every toast reported so far, oldest first, capped at the last 50.
    pub fn history(&self) -> Vec<Toast> {
        let log = self.log.lock().unwrap_or_else(|e| e.into_inner());
        log.history.iter().cloned().collect()
    }
}

impl Default for ToastNotifier {
    fn default() -> Self {
        Self::new(Duration::from_secs(4))
    }
}

impl Notifier for ToastNotifier {
    fn report_success(&self, message: &str) {
        info!(%message, "notify success");
        self.push(ToastKind::Success, message);
    }

    fn report_error(&self, message: &str) {
        error!(%message, "notify error");
        self.push(ToastKind::Error, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_toast_replaces_previous() {
        let n = ToastNotifier::new(Duration::from_secs(60));
        n.report_success("saved");
        n.report_error("boom");
        let t = n.current().expect("toast");
        assert_eq!(t.kind, ToastKind::Error);
        assert_eq!(t.message, "boom");
        assert_eq!(n.history().len(), 2);
    }

    #[test]
    fn expired_toast_is_hidden_but_kept_in_history() {
        let n = ToastNotifier::new(Duration::ZERO);
        n.report_success("saved");
        assert!(n.current().is_none());
        assert_eq!(n.history()[0].message, "saved");
    }

    #[test]
    fn history_is_bounded() {
        let n = ToastNotifier::default();
        for i in 0..(HISTORY_LIMIT + 5) {
            n.report_success(&format!("m{i}"));
        }
        let h = n.history();
        assert_eq!(h.len(), HISTORY_LIMIT);
        assert_eq!(h[0].message, "m5");
    }
}
