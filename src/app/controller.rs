//! List controller for the external vehicles screen.
//!
//! Owns the canonical collection, the filtered view, the search term, which
//! modal is open and which record is selected for edit or pending delete.
//! It is the only component that talks to the API: operations queue
//! [`ApiCommand`]s and [`ListController::handle_event`] is the continuation
//! for every completed request.
//!
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

use super::Intent;
use crate::api::Operation;
use crate::api::backend::{ApiCommand, ApiEvent, SaveKind};
use crate::model::{ExternalVehicle, VehiclePayload};
use crate::notify::Notifier;
use crate::search::filter_vehicles;

/// Which form modal is open.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ModalKind {
    None,
    Add,
    Edit,
}

/// A create/update that did not go through. Handed back to the form so it
/// can stay open and show `message` inline.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("{message}")]
pub struct SubmitError {
    pub message: String,
}

impl SubmitError {
    fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub struct ListController {
    all: Vec<ExternalVehicle>,
    filtered: Vec<ExternalVehicle>,
    search_term: String,
    modal: ModalKind,
    selected: Option<ExternalVehicle>,
    pending_delete: Option<ExternalVehicle>,
    fetch_in_flight: bool,
    commands: UnboundedSender<ApiCommand>,
    notifier: Arc<dyn Notifier>,
}

impl ListController {
    pub fn new(commands: UnboundedSender<ApiCommand>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            all: Vec::new(),
            filtered: Vec::new(),
            search_term: String::new(),
            modal: ModalKind::None,
            selected: None,
            pending_delete: None,
            fetch_in_flight: false,
            commands,
            notifier,
        }
    }

    pub fn all(&self) -> &[ExternalVehicle] {
        &self.all
    }

    pub fn filtered(&self) -> &[ExternalVehicle] {
        &self.filtered
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn modal(&self) -> ModalKind {
        self.modal
    }

    pub fn selected(&self) -> Option<&ExternalVehicle> {
        self.selected.as_ref()
    }

    pub fn pending_delete(&self) -> Option<&ExternalVehicle> {
        self.pending_delete.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.fetch_in_flight
    }

    fn dispatch(&self, cmd: ApiCommand) -> bool {
        debug!(?cmd, "queue api command");
        if self.commands.send(cmd).is_err() {
            warn!("api worker channel closed");
            self.notifier
                .report_error(&crate::error::AppError::WorkerGone.to_string());
            return false;
        }
        true
    }

    /// Request the full collection. Returns `false` when a fetch is already
    /// pending (the call is dropped) or the worker is gone.
    pub fn fetch_all(&mut self) -> bool {
        if self.fetch_in_flight {
            debug!("fetch already in flight; ignoring");
            return false;
        }
        if !self.dispatch(ApiCommand::FetchAll) {
            return false;
        }
        self.fetch_in_flight = true;
        true
    }

    /// Recompute the filtered view for `term`.
    pub fn apply_filter(&mut self, term: &str) {
        self.search_term = term.to_string();
        self.filtered = filter_vehicles(&self.all, &self.search_term);
    }

    /// Queue a create, or an update addressed by `payload.id` when
    /// `is_editing`. The outcome arrives through [`handle_event`](Self::handle_event).
    pub fn submit(&mut self, payload: VehiclePayload, is_editing: bool) -> Result<(), SubmitError> {
        let (cmd, op) = if is_editing {
            let Some(id) = payload.id.clone() else {
                let msg = "Cannot update a vehicle without an identifier";
                self.notifier.report_error(msg);
                return Err(SubmitError::new(msg));
            };
            (ApiCommand::Update { id, payload }, Operation::Update)
        } else {
            let payload = VehiclePayload { id: None, ..payload };
            (ApiCommand::Create { payload }, Operation::Add)
        };
        if self.dispatch(cmd) {
            Ok(())
        } else {
            Err(SubmitError::new(op.fallback_message()))
        }
    }

    /// Ask for confirmation before deleting `record`.
    pub fn request_delete(&mut self, record: ExternalVehicle) {
        self.pending_delete = Some(record);
    }

    /// Resolve the pending confirmation. Declining is a silent no-op.
    /// Returns whether a delete request was issued.
    pub fn confirm_delete(&mut self, accepted: bool) -> bool {
        let Some(record) = self.pending_delete.take() else {
            return false;
        };
        if !accepted {
            debug!(id = %record.id, "delete declined");
            return false;
        }
        self.dispatch(ApiCommand::Delete { id: record.id })
    }

    pub fn open_add(&mut self) {
        self.selected = None;
        self.modal = ModalKind::Add;
    }

    pub fn open_edit(&mut self, record: ExternalVehicle) {
        self.selected = Some(record);
        self.modal = ModalKind::Edit;
    }

    pub fn close_modal(&mut self) {
        self.modal = ModalKind::None;
        self.selected = None;
    }

    /// Route an intent emitted by the table or the form.
    pub fn handle_intent(&mut self, intent: Intent) -> Result<(), SubmitError> {
        match intent {
            Intent::SubmitDraft {
                payload,
                is_editing,
            } => return self.submit(payload, is_editing),
            Intent::RequestAdd => self.open_add(),
            Intent::RequestEdit(record) => self.open_edit(record),
            Intent::RequestDelete(record) => self.request_delete(record),
            Intent::Refresh => {
                self.fetch_all();
            }
        }
        Ok(())
    }

    /// Apply a completed request. Failed saves are re-raised so the caller
    /// can keep the form open; every other failure ends here.
    pub fn handle_event(&mut self, event: ApiEvent) -> Result<(), SubmitError> {
        match event {
            ApiEvent::Fetched(result) => {
                self.fetch_in_flight = false;
                match result {
                    Ok(items) => {
                        info!(count = items.len(), "external vehicles loaded");
                        self.all = items;
                        self.filtered = filter_vehicles(&self.all, &self.search_term);
                    }
                    Err(err) => {
                        warn!(%err, "fetch failed");
                        self.notifier
                            .report_error(&err.user_message(Operation::Fetch.fallback_message()));
                    }
                }
                Ok(())
            }
            ApiEvent::Saved { kind, result } => {
                let op = match kind {
                    SaveKind::Create => Operation::Add,
                    SaveKind::Update => Operation::Update,
                };
                match result {
                    Ok(()) => {
                        self.close_modal();
                        self.fetch_all();
                        self.notifier.report_success(op.success_message());
                        Ok(())
                    }
                    Err(err) => {
                        warn!(%err, ?kind, "save failed");
                        let message = err.user_message(op.fallback_message());
                        self.notifier.report_error(&message);
                        Err(SubmitError::new(message))
                    }
                }
            }
            ApiEvent::Deleted { id, result } => {
                match result {
                    Ok(()) => {
                        info!(%id, "external vehicle deleted");
                        self.fetch_all();
                        self.notifier
                            .report_success(Operation::Delete.success_message());
                    }
                    Err(err) => {
                        warn!(%id, %err, "delete failed");
                        self.notifier
                            .report_error(&err.user_message(Operation::Delete.fallback_message()));
                    }
                }
                Ok(())
            }
        }
    }
}
