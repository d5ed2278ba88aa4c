// ABOUTME: Booking policy settings with per-field documented defaults
// ABOUTME: PolicyRow is the all-optional stored form; BookingPolicy is what the engine consumes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

use serde::{Deserialize, Serialize};

/// Per-company booking policy consumed by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingPolicy {
    /// Slot granularity in minutes.
    pub slot_duration_minutes: u32,
    /// Per-day cap on total bookings.
    pub max_daily_appointments: u32,
    /// Minimum lead time before a same-day slot becomes unbookable.
    pub min_booking_lead_hours: u32,
    /// How far ahead a booking may be made, in days.
    pub max_booking_days_ahead: u32,
}

impl Default for BookingPolicy {
    fn default() -> Self {
        Self {
            slot_duration_minutes: 60,
            max_daily_appointments: 20,
            min_booking_lead_hours: 1,
            max_booking_days_ahead: 30,
        }
    }
}

/// Stored policy row; every field optional so a partially populated row
/// still yields sane values field-by-field.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PolicyRow {
    /// Stored slot duration, if set.
    pub slot_duration_minutes: Option<u32>,
    /// Stored daily cap, if set.
    pub max_daily_appointments: Option<u32>,
    /// Stored minimum lead hours, if set.
    pub min_booking_lead_hours: Option<u32>,
    /// Stored advance-booking horizon, if set.
    pub max_booking_days_ahead: Option<u32>,
}

impl From<PolicyRow> for BookingPolicy {
    fn from(row: PolicyRow) -> Self {
        let defaults = Self::default();
        Self {
            slot_duration_minutes: row
                .slot_duration_minutes
                .unwrap_or(defaults.slot_duration_minutes),
            max_daily_appointments: row
                .max_daily_appointments
                .unwrap_or(defaults.max_daily_appointments),
            min_booking_lead_hours: row
                .min_booking_lead_hours
                .unwrap_or(defaults.min_booking_lead_hours),
            max_booking_days_ahead: row
                .max_booking_days_ahead
                .unwrap_or(defaults.max_booking_days_ahead),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_row_defaults_field_by_field() {
        let row = PolicyRow {
            slot_duration_minutes: Some(30),
            max_daily_appointments: None,
            min_booking_lead_hours: Some(2),
            max_booking_days_ahead: None,
        };
        let policy = BookingPolicy::from(row);
        assert_eq!(policy.slot_duration_minutes, 30);
        assert_eq!(policy.max_daily_appointments, 20);
        assert_eq!(policy.min_booking_lead_hours, 2);
        assert_eq!(policy.max_booking_days_ahead, 30);
    }
}
