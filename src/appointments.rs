// ABOUTME: Appointment mutator for staff-facing updates, status changes, deletion and listings
// ABOUTME: Reschedules use the exact-tuple duplicate check, not the full booking pipeline
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Mutations and queries on existing appointments.
//!
//! The update path's conflict check is deliberately narrower than the
//! booking path's: it only rejects an exact `(date, time, service)` tuple
//! already held by another scheduled/confirmed appointment, and does not
//! re-run slot generation or lead-time rules. A reschedule can therefore
//! legally land outside business hours; routing updates through the booking
//! pipeline is a product decision this engine does not take silently.

use std::sync::Arc;

use chrono::{DateTime, Local, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use crate::database_plugins::factory::Database;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{EngineError, Result};
use crate::models::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, CompanyHandle,
};
use crate::slots::parse_hhmm;

/// Largest page a single listing call will return.
const MAX_PAGE_SIZE: i64 = 200;
const DEFAULT_PAGE_SIZE: i64 = 50;

/// Partial update; only present fields are applied.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppointmentPatch {
    /// New client name.
    pub client_name: Option<String>,
    /// New client phone; triggers a roster find-or-create and repoint.
    pub client_phone: Option<String>,
    /// New service; must be an active service of the company.
    pub service_id: Option<i64>,
    /// New date.
    pub appointment_date: Option<NaiveDate>,
    /// New start time "HH:MM".
    pub appointment_time: Option<String>,
    /// Explicit price override; wins over the refreshed service price.
    pub price: Option<Decimal>,
    /// New status; any value may replace any other.
    pub status: Option<AppointmentStatus>,
    /// New notes.
    pub notes: Option<String>,
}

/// Client sub-view embedded in appointment views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClientInfo {
    /// Linked roster row, when one exists.
    pub id: Option<i64>,
    /// Denormalized name.
    pub name: String,
    /// Denormalized phone.
    pub phone: String,
}

/// Service sub-view embedded in appointment views.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceInfo {
    /// Service id.
    pub id: i64,
    /// Resolved service name.
    pub name: String,
    /// Price as stored on the appointment (snapshot, not the live price).
    pub price: Decimal,
}

/// Full appointment view returned to presentation collaborators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentView {
    /// Appointment id.
    pub id: i64,
    /// Calendar date.
    pub date: NaiveDate,
    /// Start time "HH:MM".
    pub time: String,
    /// Client details.
    pub client: ClientInfo,
    /// Service details.
    pub service: ServiceInfo,
    /// Lifecycle status.
    pub status: AppointmentStatus,
    /// Free-text notes.
    pub notes: Option<String>,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// One page of appointments plus the unpaginated total.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppointmentListResult {
    /// Appointments in page order (date desc, time desc).
    pub items: Vec<AppointmentView>,
    /// Total matching rows ignoring pagination.
    pub total: i64,
    /// Offset that produced this page.
    pub offset: i64,
    /// Limit that produced this page.
    pub limit: i64,
}

/// Staff-facing appointment operations, scoped to a resolved company.
#[derive(Clone)]
pub struct AppointmentManager {
    database: Arc<Database>,
}

impl AppointmentManager {
    /// Build a manager over the shared database handle.
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Apply a partial update to an appointment owned by this company.
    #[instrument(skip_all, fields(company_id = handle.company.id, appointment_id))]
    pub async fn update(
        &self,
        handle: &CompanyHandle,
        appointment_id: i64,
        patch: &AppointmentPatch,
    ) -> Result<AppointmentView> {
        let existing = self.require_appointment(handle, appointment_id).await?;

        if let Some(time) = &patch.appointment_time {
            parse_hhmm("appointment_time", time)?;
        }
        if let Some(price) = patch.price {
            if price <= Decimal::ZERO {
                return Err(EngineError::validation("price", "price must be positive"));
            }
        }

        // Service change re-validates the target service and refreshes the
        // price from it unless the patch overrides the price explicitly.
        let (service_id, price) = match patch.service_id {
            Some(service_id) => {
                let service = self
                    .database
                    .service_by_id(handle.company, service_id, true)
                    .await?
                    .ok_or_else(|| {
                        EngineError::not_found(
                            "service",
                            format!("service {service_id} is not an active service of this company"),
                        )
                    })?;
                (service_id, patch.price.unwrap_or(service.price))
            }
            None => (existing.service_id, patch.price.unwrap_or(existing.price)),
        };

        let date = patch.appointment_date.unwrap_or(existing.appointment_date);
        let time = patch
            .appointment_time
            .clone()
            .unwrap_or_else(|| existing.appointment_time.clone());

        if date != existing.appointment_date || time != existing.appointment_time {
            let taken = self
                .database
                .appointment_exists_at(handle.company, date, &time, service_id, Some(appointment_id))
                .await?;
            if taken {
                return Err(EngineError::conflict(format!(
                    "another appointment already occupies {time} on {date}"
                )));
            }
        }

        let client_name = patch
            .client_name
            .clone()
            .unwrap_or_else(|| existing.client_name.clone());
        let client_phone = patch
            .client_phone
            .clone()
            .unwrap_or_else(|| existing.client_phone.clone());

        // A phone change repoints the appointment at the roster entry for
        // the new phone; the old client row is left untouched.
        let client_id = if client_phone == existing.client_phone {
            existing.client_id
        } else {
            Some(
                self.find_or_create_client(handle, &client_name, &client_phone)
                    .await?,
            )
        };

        let changes = AppointmentChanges {
            client_id,
            service_id,
            appointment_date: date,
            appointment_time: time,
            client_name,
            client_phone,
            price,
            status: patch.status.unwrap_or(existing.status),
            notes: patch.notes.clone().or_else(|| existing.notes.clone()),
        };

        let affected = self
            .database
            .update_appointment(handle.company, appointment_id, &changes)
            .await?;
        if affected == 0 {
            return Err(EngineError::not_found(
                "appointment",
                format!("appointment {appointment_id} disappeared during update"),
            ));
        }

        info!(appointment_id, "appointment updated");
        let updated = self.require_appointment(handle, appointment_id).await?;
        self.view_of(handle, updated).await
    }

    /// Set only the status of an appointment.
    pub async fn set_status(
        &self,
        handle: &CompanyHandle,
        appointment_id: i64,
        status: AppointmentStatus,
    ) -> Result<()> {
        let affected = self
            .database
            .update_appointment_status(handle.company, appointment_id, status)
            .await?;
        if affected == 0 {
            return Err(EngineError::not_found(
                "appointment",
                format!("appointment {appointment_id} not found for this company"),
            ));
        }
        info!(appointment_id, status = status.as_str(), "status updated");
        Ok(())
    }

    /// Hard-delete an appointment (the explicit removal entry point).
    pub async fn delete(&self, handle: &CompanyHandle, appointment_id: i64) -> Result<()> {
        let affected = self
            .database
            .delete_appointment(handle.company, appointment_id)
            .await?;
        if affected == 0 {
            return Err(EngineError::not_found(
                "appointment",
                format!("appointment {appointment_id} not found for this company"),
            ));
        }
        info!(appointment_id, "appointment deleted");
        Ok(())
    }

    /// One appointment by id, as a full view.
    pub async fn get(&self, handle: &CompanyHandle, appointment_id: i64) -> Result<AppointmentView> {
        let appointment = self.require_appointment(handle, appointment_id).await?;
        self.view_of(handle, appointment).await
    }

    /// Filtered, paginated listing ordered by date desc then time desc.
    pub async fn list(
        &self,
        handle: &CompanyHandle,
        filter: &AppointmentFilter,
    ) -> Result<AppointmentListResult> {
        let mut filter = filter.clone();
        filter.limit = normalize_limit(filter.limit);
        filter.offset = filter.offset.max(0);

        let (rows, total) = self
            .database
            .list_appointments(handle.company, &filter)
            .await?;

        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(self.view_of(handle, row).await?);
        }
        Ok(AppointmentListResult {
            items,
            total,
            offset: filter.offset,
            limit: filter.limit,
        })
    }

    /// Today's appointments ordered by start time.
    pub async fn today(
        &self,
        handle: &CompanyHandle,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<AppointmentView>> {
        let today = Local::now().date_naive();
        let rows = self
            .database
            .appointments_on(handle.company, today, status)
            .await?;
        let mut items = Vec::with_capacity(rows.len());
        for row in rows {
            items.push(self.view_of(handle, row).await?);
        }
        Ok(items)
    }

    async fn require_appointment(
        &self,
        handle: &CompanyHandle,
        appointment_id: i64,
    ) -> Result<Appointment> {
        self.database
            .appointment_by_id(handle.company, appointment_id)
            .await?
            .ok_or_else(|| {
                EngineError::not_found(
                    "appointment",
                    format!("appointment {appointment_id} not found for this company"),
                )
            })
    }

    async fn find_or_create_client(
        &self,
        handle: &CompanyHandle,
        name: &str,
        phone: &str,
    ) -> Result<i64> {
        match self
            .database
            .find_client_by_phone(handle.company, phone)
            .await?
        {
            Some(client) => {
                if client.full_name != name {
                    self.database.update_client_name(client.id, name).await?;
                }
                Ok(client.id)
            }
            None => self.database.create_client(handle.company, name, phone).await,
        }
    }

    async fn view_of(
        &self,
        handle: &CompanyHandle,
        appointment: Appointment,
    ) -> Result<AppointmentView> {
        let service_name = self
            .database
            .service_by_id(handle.company, appointment.service_id, false)
            .await?
            .map_or_else(|| "unknown service".to_string(), |s| s.name);

        Ok(AppointmentView {
            id: appointment.id,
            date: appointment.appointment_date,
            time: appointment.appointment_time,
            client: ClientInfo {
                id: appointment.client_id,
                name: appointment.client_name,
                phone: appointment.client_phone,
            },
            service: ServiceInfo {
                id: appointment.service_id,
                name: service_name,
                price: appointment.price,
            },
            status: appointment.status,
            notes: appointment.notes,
            created_at: appointment.created_at,
            updated_at: appointment.updated_at,
        })
    }
}

const fn normalize_limit(limit: i64) -> i64 {
    if limit <= 0 {
        DEFAULT_PAGE_SIZE
    } else if limit > MAX_PAGE_SIZE {
        MAX_PAGE_SIZE
    } else {
        limit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn limits_are_normalized_into_range() {
        assert_eq!(normalize_limit(0), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_limit(-5), DEFAULT_PAGE_SIZE);
        assert_eq!(normalize_limit(25), 25);
        assert_eq!(normalize_limit(10_000), MAX_PAGE_SIZE);
    }
}
