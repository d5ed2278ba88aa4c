// ABOUTME: Booking transaction orchestrating resolver, schedule, slot generation and conflicts
// ABOUTME: Availability is always recomputed before an insert; the unique index is the final word
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Availability queries and the booking transaction.
//!
//! `available_times` runs the read pipeline (resolve → hours/policy → slot
//! generation → conflict filter). `book` re-runs that same pipeline for the
//! requested slot before writing anything; a client-supplied "available"
//! flag from an earlier read is never trusted. Failures before the insert
//! write nothing; the insert and the client counter increment share one
//! storage transaction.

use std::sync::Arc;

use chrono::{Datelike, Duration, Local, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::conflicts::filter_available;
use crate::database_plugins::factory::Database;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{EngineError, Result};
use crate::models::{
    AppointmentStatus, BookingPolicy, CompanyHandle, DayHours, NewAppointment, SearchKind,
    Service, ServiceSummary,
};
use crate::schedule::ScheduleConfig;
use crate::slots::{generate_slots, parse_hhmm};
use crate::tenant::TenantResolver;

/// A booking request from either the customer-facing or staff-facing side.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingRequest {
    /// Opaque company identifier (id, slug, username or business name).
    pub company_identifier: String,
    /// How to interpret the identifier.
    #[serde(default)]
    pub search_kind: SearchKind,
    /// Requested service.
    pub service_id: i64,
    /// Requested calendar date.
    pub appointment_date: NaiveDate,
    /// Requested start time "HH:MM".
    pub appointment_time: String,
    /// Client full name.
    pub client_name: String,
    /// Client phone; identity key within the company.
    pub client_phone: String,
    /// Optional free-text notes.
    pub notes: Option<String>,
}

/// Bookable slots for one company, service and day.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AvailabilityResult {
    /// The queried date.
    pub date: NaiveDate,
    /// The queried service.
    pub service: ServiceSummary,
    /// Opening hours applied for that weekday.
    pub business_hours_for_day: DayHours,
    /// Ordered bookable start times.
    pub available_times: Vec<String>,
    /// Convenience count of `available_times`.
    pub total_available: usize,
}

/// Result of a committed booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingConfirmation {
    /// New appointment id.
    pub appointment_id: i64,
    /// Human-facing reference: `AGD` + id zero-padded to 6 digits.
    pub confirmation_code: String,
    /// Company display name.
    pub company_name: String,
    /// Company contact phone.
    pub company_phone: String,
    /// Company WhatsApp contact, if any.
    pub company_whatsapp: Option<String>,
    /// Client name as booked.
    pub client_name: String,
    /// Client phone as booked.
    pub client_phone: String,
    /// Booked service summary.
    pub service: ServiceSummary,
    /// Booked date.
    pub appointment_date: NaiveDate,
    /// Booked start time.
    pub appointment_time: String,
    /// Price snapshot taken at booking time.
    pub price: Decimal,
    /// Initial status (always scheduled).
    pub status: AppointmentStatus,
    /// Human-readable confirmation message.
    pub message: String,
}

/// Orchestrates availability computation and booking commits.
#[derive(Clone)]
pub struct BookingEngine {
    database: Arc<Database>,
    resolver: TenantResolver,
    schedule: ScheduleConfig,
}

impl BookingEngine {
    /// Build an engine over the shared database handle.
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self {
            resolver: TenantResolver::new(Arc::clone(&database)),
            schedule: ScheduleConfig::new(Arc::clone(&database)),
            database,
        }
    }

    /// Resolver for callers that already hold an identifier.
    #[must_use]
    pub const fn resolver(&self) -> &TenantResolver {
        &self.resolver
    }

    /// Bookable start times for `(company, service, date)`.
    #[instrument(skip(self))]
    pub async fn available_times(
        &self,
        identifier: &str,
        kind: SearchKind,
        service_id: i64,
        date: NaiveDate,
    ) -> Result<AvailabilityResult> {
        let handle = self.resolver.resolve(identifier, kind).await?;
        let service = self.active_service(&handle, service_id).await?;
        self.compute_availability(&handle, &service, date).await
    }

    /// Validate and commit a booking.
    #[instrument(skip_all, fields(identifier = %request.company_identifier))]
    pub async fn book(&self, request: &BookingRequest) -> Result<BookingConfirmation> {
        parse_hhmm("appointment_time", &request.appointment_time)?;

        let handle = self
            .resolver
            .resolve(&request.company_identifier, request.search_kind)
            .await?;
        let service = self.active_service(&handle, request.service_id).await?;

        // Mandatory recomputation against the live pipeline; an earlier
        // availability read means nothing by the time the booking arrives.
        let availability = self
            .compute_availability(&handle, &service, request.appointment_date)
            .await?;
        if !availability
            .available_times
            .iter()
            .any(|t| t == &request.appointment_time)
        {
            return Err(EngineError::conflict(format!(
                "time {} on {} is not available",
                request.appointment_time, request.appointment_date
            )));
        }

        let client_id = self
            .upsert_client(&handle, &request.client_name, &request.client_phone)
            .await?;

        let new_appointment = NewAppointment {
            client_id,
            service_id: service.id,
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time.clone(),
            client_name: request.client_name.clone(),
            client_phone: request.client_phone.clone(),
            price: service.price,
            notes: request.notes.clone(),
        };
        let appointment_id = self
            .database
            .create_appointment(handle.company, &new_appointment)
            .await?;

        info!(
            appointment_id,
            company_id = handle.company.id,
            tenant_kind = handle.company.kind.as_str(),
            service_id = service.id,
            "booking committed"
        );

        let message = format!(
            "Booking confirmed!\nClient: {}\nService: {}\nDate: {} at {}\nPrice: {}",
            request.client_name,
            service.name,
            request.appointment_date.format("%d/%m/%Y"),
            request.appointment_time,
            service.price,
        );

        Ok(BookingConfirmation {
            appointment_id,
            confirmation_code: format!("AGD{appointment_id:06}"),
            company_name: handle.business_name.clone(),
            company_phone: handle.phone.clone(),
            company_whatsapp: handle.whatsapp.clone(),
            client_name: request.client_name.clone(),
            client_phone: request.client_phone.clone(),
            service: ServiceSummary::from(&service),
            appointment_date: request.appointment_date,
            appointment_time: request.appointment_time.clone(),
            price: service.price,
            status: AppointmentStatus::Scheduled,
            message,
        })
    }

    /// The full read pipeline for one day: hours, policy, slot generation,
    /// conflict filtering.
    pub async fn compute_availability(
        &self,
        handle: &CompanyHandle,
        service: &Service,
        date: NaiveDate,
    ) -> Result<AvailabilityResult> {
        let policy = self.schedule.load_policy(handle.company).await?;
        let now = Local::now().naive_local();
        check_booking_window(date, now.date(), &policy)?;

        let hours = ScheduleConfig::business_hours(handle);
        let day = hours.for_day(date.weekday()).clone();

        let candidates = generate_slots(
            &day,
            policy.slot_duration_minutes,
            date,
            policy.min_booking_lead_hours,
            now,
        )?;
        let booked = self
            .database
            .booked_times(handle.company, date, service.id)
            .await?;
        let available = filter_available(
            &candidates,
            &booked,
            service.duration_minutes,
            policy.max_daily_appointments,
        )?;

        Ok(AvailabilityResult {
            date,
            service: ServiceSummary::from(service),
            business_hours_for_day: day,
            total_available: available.len(),
            available_times: available,
        })
    }

    async fn active_service(&self, handle: &CompanyHandle, service_id: i64) -> Result<Service> {
        self.database
            .service_by_id(handle.company, service_id, true)
            .await?
            .ok_or_else(|| {
                EngineError::not_found(
                    "service",
                    format!(
                        "service {service_id} is not an active service of company {}",
                        handle.business_name
                    ),
                )
            })
    }

    /// Find-or-create the client roster entry for `(company, phone)`.
    ///
    /// An existing client gets its name refreshed when it changed; the
    /// appointment counter is incremented later, atomically with the insert.
    async fn upsert_client(
        &self,
        handle: &CompanyHandle,
        client_name: &str,
        client_phone: &str,
    ) -> Result<i64> {
        match self
            .database
            .find_client_by_phone(handle.company, client_phone)
            .await?
        {
            Some(client) => {
                if client.full_name != client_name {
                    self.database
                        .update_client_name(client.id, client_name)
                        .await?;
                }
                Ok(client.id)
            }
            None => {
                self.database
                    .create_client(handle.company, client_name, client_phone)
                    .await
            }
        }
    }
}

/// Engine-level date guard: the generator itself is date-agnostic, so past
/// dates and dates beyond the advance-booking horizon are rejected here.
fn check_booking_window(date: NaiveDate, today: NaiveDate, policy: &BookingPolicy) -> Result<()> {
    if date < today {
        return Err(EngineError::validation(
            "appointment_date",
            format!("{date} is in the past"),
        ));
    }
    let horizon = today + Duration::days(i64::from(policy.max_booking_days_ahead));
    if date > horizon {
        return Err(EngineError::validation(
            "appointment_date",
            format!(
                "{date} is more than {} days ahead",
                policy.max_booking_days_ahead
            ),
        ));
    }
    Ok(())
}
