//! Resource records exchanged with the REST API.
//!
//! `ExternalVehicle` is what the server returns; `VehiclePayload` is what
//! the edit form sends back on create/update.
//!
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// An external (hired) vehicle as returned by the API.
///
/// Optional and server-derived fields fall back to their `Default` when the
/// server omits them:
/// - `advance`, `balance`, `total_cost`: `0.0`
/// - `payment_status`: `0` (rendered as [`PaymentStatus::Unknown`])
/// - `created_at`: `None`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalVehicle {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    pub reg_number: String,
    pub owner_name: String,
    pub owner_contact: String,
    pub hire_rate: f64,
    pub vehicle_usage: f64,
    #[serde(default)]
    pub advance: f64,
    #[serde(default)]
    pub balance: f64,
    #[serde(default)]
    pub total_cost: f64,
    #[serde(default)]
    pub payment_status: i64,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

impl ExternalVehicle {
    /// Badge for the server-reported payment status code.
    pub fn payment_status(&self) -> PaymentStatus {
        PaymentStatus::from_code(self.payment_status)
    }
}

/// Body of a create or update request.
///
/// `id` is only set when editing; it addresses the PUT and is never
/// serialized into the body.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VehiclePayload {
    #[serde(skip_serializing)]
    pub id: Option<String>,
    pub reg_number: String,
    pub owner_name: String,
    pub owner_contact: String,
    pub hire_rate: f64,
    pub vehicle_usage: f64,
    pub advance: f64,
}

/// Payment state derived by the server from hire cost and advance.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PaymentStatus {
    Pending,
    AdvancePaid,
    FullyPaid,
    Unknown,
}

impl PaymentStatus {
    /// Map a raw status code. Every code outside 1..=3 is `Unknown`.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => PaymentStatus::Pending,
            2 => PaymentStatus::AdvancePaid,
            3 => PaymentStatus::FullyPaid,
            _ => PaymentStatus::Unknown,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            PaymentStatus::Pending => "Pending",
            PaymentStatus::AdvancePaid => "Advance Paid",
            PaymentStatus::FullyPaid => "Fully Paid",
            PaymentStatus::Unknown => "Unknown",
        }
    }
}
