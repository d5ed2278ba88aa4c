// ABOUTME: Appointment row model, status enum and insert payload
// ABOUTME: Times are calendar date plus "HH:MM" start string, not full timestamps
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::EngineError;

/// Appointment lifecycle status.
///
/// Deliberately an open set: no transition graph is enforced, any value may
/// be set from any other. Only statuses in `{Scheduled, Confirmed}` occupy a
/// slot for availability purposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppointmentStatus {
    /// Booked, awaiting confirmation.
    Scheduled,
    /// Confirmed by the business.
    Confirmed,
    /// Service delivered.
    Completed,
    /// Cancelled by either side.
    Cancelled,
    /// Client did not show up.
    NoShow,
}

impl AppointmentStatus {
    /// Stable string form, as persisted.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Whether this status holds a slot against new bookings.
    #[must_use]
    pub const fn occupies_slot(self) -> bool {
        matches!(self, Self::Scheduled | Self::Confirmed)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(Self::Scheduled),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "no_show" => Ok(Self::NoShow),
            other => Err(EngineError::validation(
                "status",
                format!("unknown status '{other}', use: scheduled, confirmed, completed, cancelled, no_show"),
            )),
        }
    }
}

/// A stored appointment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    /// Surrogate id; also the basis of the confirmation code.
    pub id: i64,
    /// Owning client row, when one was linked.
    pub client_id: Option<i64>,
    /// Booked service.
    pub service_id: i64,
    /// Calendar date of the appointment.
    pub appointment_date: NaiveDate,
    /// Start time as "HH:MM".
    pub appointment_time: String,
    /// Client name, denormalized at booking time.
    pub client_name: String,
    /// Client phone, denormalized at booking time.
    pub client_phone: String,
    /// Price snapshot taken from the service when the booking was made.
    pub price: Decimal,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Whether a WhatsApp reminder has been sent.
    pub whatsapp_sent: bool,
    /// Message id of the sent reminder, if any.
    pub whatsapp_message_id: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Insert payload for a new appointment.
#[derive(Debug, Clone)]
pub struct NewAppointment {
    /// Linked client row.
    pub client_id: i64,
    /// Booked service.
    pub service_id: i64,
    /// Calendar date.
    pub appointment_date: NaiveDate,
    /// Start time "HH:MM".
    pub appointment_time: String,
    /// Denormalized client name.
    pub client_name: String,
    /// Denormalized client phone.
    pub client_phone: String,
    /// Price snapshot.
    pub price: Decimal,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Fully-resolved field set written back by the appointment mutator.
///
/// Unlike the caller-facing patch, every field here is concrete: the mutator
/// merges the patch over the stored row before handing it to storage.
#[derive(Debug, Clone)]
pub struct AppointmentChanges {
    /// Linked client row after any repointing.
    pub client_id: Option<i64>,
    /// Effective service.
    pub service_id: i64,
    /// Effective calendar date.
    pub appointment_date: NaiveDate,
    /// Effective start time "HH:MM".
    pub appointment_time: String,
    /// Denormalized client name.
    pub client_name: String,
    /// Denormalized client phone.
    pub client_phone: String,
    /// Effective price.
    pub price: Decimal,
    /// Effective status.
    pub status: AppointmentStatus,
    /// Free-text notes.
    pub notes: Option<String>,
}

/// Query filter for appointment listings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentFilter {
    /// Inclusive lower date bound.
    pub start_date: Option<NaiveDate>,
    /// Inclusive upper date bound.
    pub end_date: Option<NaiveDate>,
    /// Restrict to one status.
    pub status: Option<AppointmentStatus>,
    /// Restrict to one service.
    pub service_id: Option<i64>,
    /// Case-insensitive substring match on the denormalized client name.
    pub client_name: Option<String>,
    /// Pagination offset.
    pub offset: i64,
    /// Pagination page size.
    pub limit: i64,
}

impl AppointmentFilter {
    /// Filter with default pagination (offset 0, limit 50).
    #[must_use]
    pub fn paged(offset: i64, limit: i64) -> Self {
        Self {
            offset,
            limit,
            ..Self::default()
        }
    }
}
