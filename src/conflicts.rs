// ABOUTME: Conflict filter narrowing candidate slots against already-booked start times
// ABOUTME: Symmetric start-distance semantics plus the per-day booking cap
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Conflict filtering.
//!
//! A candidate is rejected when it equals a booked start time or when the
//! absolute start-distance to **any** booked time is smaller than the
//! requested service's duration. This is deliberately not a true
//! interval-overlap test against each booked appointment's own duration;
//! existing data and behavior rely on the start-distance semantic.
//!
//! `booked` is expected to hold the scheduled/confirmed start times for the
//! same service on the target day. Callers needing cross-service exclusivity
//! (a single shared staff resource) pre-merge booked slots across services
//! before calling in.

use chrono::Timelike;

use crate::errors::Result;
use crate::slots::parse_hhmm;

/// Filter `candidates` down to the bookable slots.
///
/// When the day already carries `max_daily` bookings the whole list is
/// rejected up front, independent of which slot is requested.
pub fn filter_available(
    candidates: &[String],
    booked: &[String],
    service_duration_minutes: u32,
    max_daily: u32,
) -> Result<Vec<String>> {
    if booked.len() >= max_daily as usize {
        return Ok(Vec::new());
    }

    let booked_minutes = booked
        .iter()
        .map(|time| parse_hhmm("booked_time", time).map(minute_of_day))
        .collect::<Result<Vec<i64>>>()?;
    let duration = i64::from(service_duration_minutes);

    let mut available = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        let minute = minute_of_day(parse_hhmm("candidate_time", candidate)?);
        let collides = booked_minutes
            .iter()
            .any(|&taken| minute == taken || (minute - taken).abs() < duration);
        if !collides {
            available.push(candidate.clone());
        }
    }
    Ok(available)
}

fn minute_of_day(time: chrono::NaiveTime) -> i64 {
    i64::from(time.hour()) * 60 + i64::from(time.minute())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| (*s).to_string()).collect()
    }

    #[test]
    fn proximity_and_exact_matches_are_excluded() {
        // Scenario B: 09:30 is 30 minutes from the booked 10:00 (< 60),
        // 10:00 is an exact match, 09:00 and 11:00 survive.
        let result = filter_available(
            &times(&["09:00", "09:30", "10:00", "11:00"]),
            &times(&["10:00"]),
            60,
            20,
        )
        .expect("filters");
        assert_eq!(result, times(&["09:00", "11:00"]));
    }

    #[test]
    fn daily_cap_empties_the_list_before_slot_checks() {
        // Scenario C: one booking with a cap of one.
        let result = filter_available(
            &times(&["09:00", "10:00", "11:00"]),
            &times(&["09:00"]),
            60,
            1,
        )
        .expect("filters");
        assert!(result.is_empty());

        let over = filter_available(&times(&["14:00"]), &times(&["09:00", "10:00"]), 30, 2)
            .expect("filters");
        assert!(over.is_empty());
    }

    #[test]
    fn no_bookings_passes_everything_through() {
        let candidates = times(&["09:00", "09:30", "10:00"]);
        let result = filter_available(&candidates, &[], 60, 20).expect("filters");
        assert_eq!(result, candidates);
    }

    #[test]
    fn distance_check_is_symmetric_around_each_booking() {
        // 30-minute service booked at 10:00: 09:31..10:29 all collide,
        // 09:30 and 10:30 are exactly at distance and stay.
        let result = filter_available(
            &times(&["09:30", "09:45", "10:15", "10:30"]),
            &times(&["10:00"]),
            30,
            20,
        )
        .expect("filters");
        assert_eq!(result, times(&["09:30", "10:30"]));
    }

    #[test]
    fn any_booked_slot_within_duration_excludes_a_candidate() {
        let result = filter_available(
            &times(&["12:00"]),
            &times(&["08:00", "12:45"]),
            60,
            20,
        )
        .expect("filters");
        assert!(result.is_empty());
    }

    #[test]
    fn malformed_booked_time_is_a_validation_error() {
        let err = filter_available(&times(&["09:00"]), &times(&["noonish"]), 60, 20).unwrap_err();
        assert_eq!(err.http_status(), 400);
    }
}
