//! Application state and entry glue.
//!
//! [`AppState`] bundles the list controller, the edit form and the UI-only
//! state (cursor, search prompt, theme, keymap). The event loop lives in
//! [`update`] and is re-exported as `run`.
//!
pub mod controller;
pub mod form;
pub mod keymap;
pub mod settings;
pub mod theme;
pub mod update;

use std::sync::Arc;

use tokio::sync::mpsc::UnboundedSender;

use crate::api::backend::ApiCommand;
use crate::model::{ExternalVehicle, VehiclePayload};
use crate::notify::{Notifier, ToastNotifier};
use controller::{ListController, ModalKind};
use form::VehicleForm;
use keymap::Keymap;
use settings::Role;
use theme::Theme;

/// Typed requests emitted by the table and the form, handled by the
/// list controller.
#[derive(Clone, Debug, PartialEq)]
pub enum Intent {
    SubmitDraft {
        payload: VehiclePayload,
        is_editing: bool,
    },
    RequestAdd,
    RequestEdit(ExternalVehicle),
    RequestDelete(ExternalVehicle),
    Refresh,
}

/// Where key presses are routed.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Search,
    Form,
    ConfirmDelete,
    Help,
}

pub struct AppState {
    pub controller: ListController,
    pub form: VehicleForm,
    pub notifier: Arc<ToastNotifier>,
    pub selected_index: usize,
    pub rows_per_page: usize,
    pub search_query: String,
    pub searching: bool,
    pub help_open: bool,
    /// 0 = Yes, 1 = No in the delete confirmation.
    pub confirm_choice: usize,
    pub role: Role,
    pub theme: Theme,
    pub keymap: Keymap,
}

impl AppState {
    pub fn new(
        commands: UnboundedSender<ApiCommand>,
        notifier: Arc<ToastNotifier>,
        role: Role,
        theme: Theme,
        keymap: Keymap,
    ) -> Self {
        Self {
            controller: ListController::new(commands, notifier.clone()),
            form: VehicleForm::for_create(),
            notifier,
            selected_index: 0,
            rows_per_page: 10,
            search_query: String::new(),
            searching: false,
            help_open: false,
            confirm_choice: 1,
            role,
            theme,
            keymap,
        }
    }

    /// Derived from what is open; the delete confirmation wins over the form.
    pub fn input_mode(&self) -> InputMode {
        if self.controller.pending_delete().is_some() {
            InputMode::ConfirmDelete
        } else if self.controller.modal() != ModalKind::None {
            InputMode::Form
        } else if self.help_open {
            InputMode::Help
        } else if self.searching {
            InputMode::Search
        } else {
            InputMode::Normal
        }
    }

    pub fn selected_vehicle(&self) -> Option<&ExternalVehicle> {
        self.controller.filtered().get(self.selected_index)
    }

    /// Keep the cursor inside the filtered view after it changed size.
    pub fn clamp_selection(&mut self) {
        let len = self.controller.filtered().len();
        self.selected_index = self.selected_index.min(len.saturating_sub(1));
    }

    /// Hand an intent to the controller, resetting the form whenever a form
    /// modal opens and feeding submit failures back into it.
    pub fn dispatch(&mut self, intent: Intent) {
        match &intent {
            Intent::RequestAdd => self.form.reset(None),
            Intent::RequestEdit(record) => self.form.reset(Some(record)),
            Intent::RequestDelete(_) => {
                if !self.role.is_elevated() {
                    self.notifier_error("Only administrators can delete vehicles");
                    return;
                }
                self.confirm_choice = 1;
            }
            Intent::SubmitDraft { .. } | Intent::Refresh => {}
        }
        if let Err(err) = self.controller.handle_intent(intent) {
            self.form.submit_failed(err.message);
        }
    }

    fn notifier_error(&self, message: &str) {
        self.notifier.report_error(message);
    }
}

/// Re-export the application event loop entry function.
pub use update::run_app as run;
