//! Add / edit form for a single external vehicle.
//!
//! The form edits text, not numbers: every field is kept as typed and only
//! normalized to `f64` after [`validate_draft`] passed. Submitting produces
//! an [`Intent::SubmitDraft`] for the list controller; the form never talks
//! to the API itself.
//!
use super::Intent;
use crate::model::{ExternalVehicle, VehiclePayload};

/// Editable fields, in validation and focus order.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum FormField {
    RegNumber,
    OwnerName,
    OwnerContact,
    HireRate,
    VehicleUsage,
    Advance,
}

impl FormField {
    pub const ALL: [FormField; 6] = [
        FormField::RegNumber,
        FormField::OwnerName,
        FormField::OwnerContact,
        FormField::HireRate,
        FormField::VehicleUsage,
        FormField::Advance,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FormField::RegNumber => "Registration Number",
            FormField::OwnerName => "Owner Name",
            FormField::OwnerContact => "Owner Contact",
            FormField::HireRate => "Hire Rate",
            FormField::VehicleUsage => "Vehicle Usage",
            FormField::Advance => "Advance",
        }
    }

    pub fn is_required(self) -> bool {
        !matches!(self, FormField::Advance)
    }

    fn rule(self) -> Rule {
        match self {
            FormField::RegNumber | FormField::OwnerName | FormField::OwnerContact => Rule::Text,
            FormField::HireRate | FormField::VehicleUsage => Rule::Positive,
            FormField::Advance => Rule::NonNegative,
        }
    }

    fn index(self) -> usize {
        FormField::ALL.iter().position(|f| *f == self).unwrap_or(0)
    }
}

#[derive(Copy, Clone)]
enum Rule {
    Text,
    Positive,
    NonNegative,
}

/// Text of each input as the user typed it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct VehicleDraft {
    pub reg_number: String,
    pub owner_name: String,
    pub owner_contact: String,
    pub hire_rate: String,
    pub vehicle_usage: String,
    pub advance: String,
}

impl VehicleDraft {
    pub fn from_vehicle(v: &ExternalVehicle) -> Self {
        Self {
            reg_number: v.reg_number.clone(),
            owner_name: v.owner_name.clone(),
            owner_contact: v.owner_contact.clone(),
            hire_rate: format_number(v.hire_rate),
            vehicle_usage: format_number(v.vehicle_usage),
            advance: format_number(v.advance),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::RegNumber => &self.reg_number,
            FormField::OwnerName => &self.owner_name,
            FormField::OwnerContact => &self.owner_contact,
            FormField::HireRate => &self.hire_rate,
            FormField::VehicleUsage => &self.vehicle_usage,
            FormField::Advance => &self.advance,
        }
    }

    pub fn get_mut(&mut self, field: FormField) -> &mut String {
        match field {
            FormField::RegNumber => &mut self.reg_number,
            FormField::OwnerName => &mut self.owner_name,
            FormField::OwnerContact => &mut self.owner_contact,
            FormField::HireRate => &mut self.hire_rate,
            FormField::VehicleUsage => &mut self.vehicle_usage,
            FormField::Advance => &mut self.advance,
        }
    }
}

fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}

fn parse_number(s: &str) -> Option<f64> {
    s.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Check fields in [`FormField::ALL`] order and return the message for the
/// first one that fails.
pub fn validate_draft(draft: &VehicleDraft) -> Result<(), String> {
    match first_invalid(draft) {
        Some((_, msg)) => Err(msg),
        None => Ok(()),
    }
}

fn first_invalid(draft: &VehicleDraft) -> Option<(FormField, String)> {
    for field in FormField::ALL {
        let raw = draft.get(field).trim();
        let label = field.label();
        if raw.is_empty() {
            if field.is_required() {
                return Some((field, format!("{label} is required")));
            }
            continue;
        }
        let msg = match field.rule() {
            Rule::Text => continue,
            Rule::Positive if !parse_number(raw).is_some_and(|n| n > 0.0) => {
                format!("{label} must be a valid positive number")
            }
            Rule::NonNegative if !parse_number(raw).is_some_and(|n| n >= 0.0) => {
                format!("{label} must be a valid non-negative number")
            }
            Rule::Positive | Rule::NonNegative => continue,
        };
        return Some((field, msg));
    }
    None
}

/// Form state: the draft, the record it edits (if any), focus, inline
/// error and the busy flag that blocks resubmission.
#[derive(Clone, Debug, Default)]
pub struct VehicleForm {
    pub draft: VehicleDraft,
    editing_id: Option<String>,
    focus: usize,
    error: Option<String>,
    busy: bool,
}

impl VehicleForm {
    pub fn for_create() -> Self {
        Self::default()
    }

    pub fn for_edit(vehicle: &ExternalVehicle) -> Self {
        let mut form = Self::default();
        form.reset(Some(vehicle));
        form
    }

    /// Start over from `source` (edit) or empty defaults (create).
    pub fn reset(&mut self, source: Option<&ExternalVehicle>) {
        *self = Self {
            draft: source.map(VehicleDraft::from_vehicle).unwrap_or_default(),
            editing_id: source.map(|v| v.id.clone()),
            ..Self::default()
        };
    }

    pub fn is_editing(&self) -> bool {
        self.editing_id.is_some()
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn focused(&self) -> FormField {
        FormField::ALL[self.focus]
    }

    pub fn focus(&mut self, field: FormField) {
        self.focus = field.index();
    }

    pub fn next_field(&mut self) {
        self.focus = (self.focus + 1) % FormField::ALL.len();
    }

    pub fn prev_field(&mut self) {
        self.focus = (self.focus + FormField::ALL.len() - 1) % FormField::ALL.len();
    }

    pub fn insert_char(&mut self, c: char) {
        if self.busy {
            return;
        }
        let field = self.focused();
        self.draft.get_mut(field).push(c);
    }

    pub fn backspace(&mut self) {
        if self.busy {
            return;
        }
        let field = self.focused();
        self.draft.get_mut(field).pop();
    }

    /// Run validation, keeping the first failure as the inline error and
    /// moving focus to the field it names.
    pub fn validate(&mut self) -> bool {
        match first_invalid(&self.draft) {
            None => {
                self.error = None;
                true
            }
            Some((field, msg)) => {
                self.focus(field);
                self.error = Some(msg);
                false
            }
        }
    }

    /// Build the request body from an already validated draft.
    fn payload(&self) -> VehiclePayload {
        let d = &self.draft;
        VehiclePayload {
            id: self.editing_id.clone(),
            reg_number: d.reg_number.trim().to_string(),
            owner_name: d.owner_name.trim().to_string(),
            owner_contact: d.owner_contact.trim().to_string(),
            hire_rate: parse_number(&d.hire_rate).unwrap_or_default(),
            vehicle_usage: parse_number(&d.vehicle_usage).unwrap_or_default(),
            advance: parse_number(&d.advance).unwrap_or_default(),
        }
    }

    /// Validate and, if the draft is good, mark busy and emit the submit
    /// intent. Returns `None` while busy or when validation fails.
    pub fn submit(&mut self) -> Option<Intent> {
        if self.busy || !self.validate() {
            return None;
        }
        self.busy = true;
        Some(Intent::SubmitDraft {
            payload: self.payload(),
            is_editing: self.is_editing(),
        })
    }

    /// The controller rejected or failed the submission.
    pub fn submit_failed(&mut self, message: impl Into<String>) {
        self.busy = false;
        self.error = Some(message.into());
    }
}
