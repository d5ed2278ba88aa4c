// ABOUTME: Schedule configuration loader for weekly hours and booking policy
// ABOUTME: Substitutes documented defaults when the blob or policy row is absent
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Hours and policy loading.
//!
//! Hours come from the blob on whichever concrete account record the handle
//! points to; the policy row lives in one shared table keyed by either owner
//! column. Both substitute documented defaults when data is absent, the
//! policy field-by-field, so a partially populated row still yields sane
//! values. No side effects.

use std::sync::Arc;

use crate::database_plugins::factory::Database;
use crate::database_plugins::DatabaseProvider;
use crate::errors::Result;
use crate::models::{BookingPolicy, BusinessHours, CompanyHandle, CompanyRef};

/// Loads schedule configuration for resolved companies.
#[derive(Clone)]
pub struct ScheduleConfig {
    database: Arc<Database>,
}

impl ScheduleConfig {
    /// Build a loader over the shared database handle.
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Weekly opening hours for a resolved company.
    ///
    /// Falls back to the default week (Mon–Fri 09:00–18:00, Sat 09:00–17:00,
    /// Sun closed) when the account never saved hours.
    #[must_use]
    pub fn business_hours(handle: &CompanyHandle) -> BusinessHours {
        handle.business_hours.clone().unwrap_or_default()
    }

    /// Booking policy for a company, defaults applied per field.
    pub async fn load_policy(&self, company: CompanyRef) -> Result<BookingPolicy> {
        let row = self.database.booking_policy(company).await?;
        Ok(row.map(BookingPolicy::from).unwrap_or_default())
    }
}
