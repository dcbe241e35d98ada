//! Appointment entity and its status lifecycle.
//!
//! ```text
//! pending ──► approved ──► completed
//!    │            │
//!    └──► cancelled ◄──┘
//! ```
//!
//! `cancelled` and `completed` are terminal.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::config::{STATUS_APPROVED, STATUS_CANCELLED, STATUS_COMPLETED, STATUS_PENDING};
use crate::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Approved,
    Cancelled,
    Completed,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => STATUS_PENDING,
            AppointmentStatus::Approved => STATUS_APPROVED,
            AppointmentStatus::Cancelled => STATUS_CANCELLED,
            AppointmentStatus::Completed => STATUS_COMPLETED,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, AppointmentStatus::Cancelled | AppointmentStatus::Completed)
    }

    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (*self, next),
            (Pending, Approved) | (Pending, Cancelled) | (Approved, Completed) | (Approved, Cancelled)
        )
    }

    /// Check a transition, returning the target status when it is allowed.
    pub fn transition_to(&self, next: AppointmentStatus) -> AppResult<AppointmentStatus> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(AppError::validation(format!(
                "Cannot change appointment status from {} to {}",
                self, next
            )))
        }
    }
}

impl FromStr for AppointmentStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            STATUS_PENDING => Ok(AppointmentStatus::Pending),
            STATUS_APPROVED => Ok(AppointmentStatus::Approved),
            STATUS_CANCELLED => Ok(AppointmentStatus::Cancelled),
            STATUS_COMPLETED => Ok(AppointmentStatus::Completed),
            other => Err(AppError::validation(format!(
                "Invalid appointment status: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Appointment {
    pub id: Uuid,
    /// Booking patient (a user id)
    pub patient_id: Uuid,
    /// Target doctor (a doctor profile id, not a user id)
    pub doctor_id: Uuid,
    pub date: DateTime<Utc>,
    pub status: AppointmentStatus,
    pub reason: String,
    pub created_at: DateTime<Utc>,
}

/// Booking input as sent by the client. Every field is required; they are
/// optional here so that absence is reported as a validation error.
#[derive(Debug, Clone, Default, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookAppointmentRequest {
    /// Doctor profile id
    pub doctor_id: Option<Uuid>,
    /// RFC 3339 timestamp, or a `datetime-local` / plain date taken as UTC
    #[schema(example = "2025-03-14T09:30:00Z")]
    pub date: Option<String>,
    #[validate(length(min = 1, message = "Please add all fields"))]
    #[schema(example = "checkup")]
    pub reason: Option<String>,
}

/// Parse the accepted appointment date formats.
pub fn parse_appointment_date(raw: &str) -> AppResult<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(date) = DateTime::parse_from_rfc3339(raw) {
        return Ok(date.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    if let Ok(day) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }

    Err(AppError::validation(format!("Invalid appointment date: {}", raw)))
}

#[derive(Debug, Clone)]
pub struct NewAppointment {
    pub patient_id: Uuid,
    pub doctor_id: Uuid,
    pub date: DateTime<Utc>,
    pub reason: String,
}

/// Doctor fields joined onto a patient's view of an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DoctorSummary {
    pub id: Uuid,
    pub user_id: Uuid,
    pub name: String,
    pub specialization: String,
}

/// Patient fields joined onto a doctor's view of an appointment.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct PatientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
}

/// An appointment with the counterpart details the caller's role needs.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct AppointmentView {
    #[serde(flatten)]
    pub appointment: Appointment,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doctor: Option<DoctorSummary>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub patient: Option<PatientSummary>,
}
