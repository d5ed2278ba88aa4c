// ABOUTME: Slot generator producing the ordered candidate start times for one day
// ABOUTME: Pure and deterministic given a frozen now; lead-time pruning applies to today only
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Candidate slot generation.
//!
//! Walks from the day's opening time in `slot_minutes` increments, keeping a
//! slot only if it ends on or before closing. When the target date is the
//! caller's current date, slots inside the minimum lead window are dropped.
//! The generator does not reject past or far-future dates; that guard lives
//! in the booking engine.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};

use crate::errors::{EngineError, Result};
use crate::models::DayHours;

/// Parse a "HH:MM" string, attributing failures to `field`.
pub(crate) fn parse_hhmm(field: &'static str, value: &str) -> Result<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| EngineError::validation(field, format!("'{value}' is not a valid HH:MM time")))
}

/// Render a time back to "HH:MM".
pub(crate) fn format_hhmm(time: NaiveTime) -> String {
    format!("{:02}:{:02}", time.hour(), time.minute())
}

/// Generate the ordered candidate slot start times for one day.
///
/// Returns an empty list for closed days (`open` or `close` absent) and for
/// days whose whole bookable window is already inside the lead-time cutoff.
pub fn generate_slots(
    day: &DayHours,
    slot_minutes: u32,
    target_date: NaiveDate,
    min_lead_hours: u32,
    now: NaiveDateTime,
) -> Result<Vec<String>> {
    let (Some(open_str), Some(close_str)) = (&day.open, &day.close) else {
        return Ok(Vec::new());
    };
    if slot_minutes == 0 {
        return Err(EngineError::validation(
            "slot_duration_minutes",
            "slot duration must be positive",
        ));
    }

    let open = parse_hhmm("business_hours.open", open_str)?;
    let close = parse_hhmm("business_hours.close", close_str)?;

    let open_minute = i64::from(open.hour()) * 60 + i64::from(open.minute());
    let close_minute = i64::from(close.hour()) * 60 + i64::from(close.minute());
    let step = i64::from(slot_minutes);

    // Same-day bookings must respect the minimum lead window; other dates
    // get no lead filtering at this layer.
    let min_start = if target_date == now.date() {
        let cutoff = now + Duration::hours(i64::from(min_lead_hours));
        if cutoff >= target_date.and_time(close) {
            return Ok(Vec::new());
        }
        Some(cutoff)
    } else {
        None
    };

    let mut slots = Vec::new();
    let mut minute = open_minute;
    while minute + step <= close_minute {
        let time = NaiveTime::from_hms_opt((minute / 60) as u32, (minute % 60) as u32, 0)
            .ok_or_else(|| {
                EngineError::validation("business_hours", "slot walk left the day boundary")
            })?;
        let keep = match min_start {
            Some(cutoff) => target_date.and_time(time) >= cutoff,
            None => true,
        };
        if keep {
            slots.push(format_hhmm(time));
        }
        minute += step;
    }
    Ok(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
    }

    fn noon_clock() -> NaiveDateTime {
        date(2025, 6, 2).and_hms_opt(12, 0, 0).expect("valid time")
    }

    #[test]
    fn trailing_slot_must_end_exactly_at_close() {
        // Scenario A: 09:00-12:00 with 60-minute slots.
        let day = DayHours::open_between("09:00", "12:00");
        let slots =
            generate_slots(&day, 60, date(2025, 6, 3), 1, noon_clock()).expect("generates");
        assert_eq!(slots, vec!["09:00", "10:00", "11:00"]);
    }

    #[test]
    fn closed_day_yields_nothing() {
        let slots = generate_slots(&DayHours::closed(), 60, date(2025, 6, 3), 1, noon_clock())
            .expect("generates");
        assert!(slots.is_empty());
    }

    #[test]
    fn partial_trailing_slot_is_pruned() {
        let day = DayHours::open_between("09:00", "10:30");
        let slots =
            generate_slots(&day, 60, date(2025, 6, 3), 1, noon_clock()).expect("generates");
        assert_eq!(slots, vec!["09:00"]);
    }

    #[test]
    fn today_drops_slots_inside_lead_window() {
        // Clock frozen at 12:00 with a 1h lead: 13:00 is the first legal slot.
        let day = DayHours::open_between("09:00", "18:00");
        let slots = generate_slots(&day, 60, date(2025, 6, 2), 1, noon_clock())
            .expect("generates");
        assert_eq!(slots, vec!["13:00", "14:00", "15:00", "16:00", "17:00"]);
    }

    #[test]
    fn today_fully_past_window_is_empty() {
        let day = DayHours::open_between("09:00", "13:00");
        let slots = generate_slots(&day, 60, date(2025, 6, 2), 1, noon_clock())
            .expect("generates");
        assert!(slots.is_empty());
    }

    #[test]
    fn other_dates_skip_lead_filtering() {
        let day = DayHours::open_between("09:00", "12:00");
        let past = generate_slots(&day, 60, date(2025, 6, 1), 1, noon_clock())
            .expect("generates");
        assert_eq!(past, vec!["09:00", "10:00", "11:00"]);
    }

    #[test]
    fn deterministic_for_a_frozen_clock() {
        let day = DayHours::open_between("08:00", "17:00");
        let first = generate_slots(&day, 45, date(2025, 6, 2), 2, noon_clock()).expect("generates");
        let second =
            generate_slots(&day, 45, date(2025, 6, 2), 2, noon_clock()).expect("generates");
        assert_eq!(first, second);
    }

    #[test]
    fn every_slot_fits_inside_business_hours() {
        let day = DayHours::open_between("09:15", "18:00");
        let slot_minutes = 50;
        let slots = generate_slots(&day, slot_minutes, date(2025, 6, 3), 1, noon_clock())
            .expect("generates");
        assert!(!slots.is_empty());
        for slot in &slots {
            let t = parse_hhmm("slot", slot).expect("well-formed output");
            let start = i64::from(t.hour()) * 60 + i64::from(t.minute());
            assert!(start >= 9 * 60 + 15);
            assert!(start + i64::from(slot_minutes) <= 18 * 60);
        }
    }

    #[test]
    fn malformed_hours_are_a_validation_error() {
        let day = DayHours::open_between("9am", "18:00");
        let err = generate_slots(&day, 60, date(2025, 6, 3), 1, noon_clock()).unwrap_err();
        assert_eq!(err.http_status(), 400);
    }

    #[test]
    fn zero_slot_duration_is_rejected() {
        let day = DayHours::open_between("09:00", "18:00");
        let err = generate_slots(&day, 0, date(2025, 6, 3), 1, noon_clock()).unwrap_err();
        assert_eq!(err.http_status(), 400);
    }
}
