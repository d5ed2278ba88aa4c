// ABOUTME: Storage abstraction for the booking engine
// ABOUTME: Plugin architecture with a SQLite backend behind a common async trait
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Storage collaborator contract.
//!
//! Every row kind owned by a company (service, client, appointment, policy)
//! is stored with two mutually exclusive nullable owner columns, so every
//! operation here takes a [`CompanyRef`] and filters on exactly one of them.
//! Update/delete operations return affected-row counts; the caller maps a
//! zero count to `NotFound`.

use async_trait::async_trait;
use chrono::NaiveDate;

use crate::errors::Result;
use crate::models::{
    AccountField, AccountRecord, Appointment, AppointmentChanges, AppointmentFilter,
    AppointmentStatus, Client, CompanyRef, NewAccount, NewAppointment, NewService, PolicyRow,
    Service,
};

pub mod factory;
pub mod sqlite;

/// Core storage abstraction trait.
///
/// All backends implement this to give the engine a consistent interface.
#[async_trait]
pub trait DatabaseProvider: Send + Sync + Clone {
    /// Open a connection pool for the given URL and run migrations.
    async fn new(database_url: &str) -> Result<Self>
    where
        Self: Sized;

    /// Create or upgrade the schema.
    async fn migrate(&self) -> Result<()>;

    // ================================
    // Account tables (both tenant kinds)
    // ================================

    /// Create a standard account row, returning its id.
    async fn create_standard_account(&self, account: &NewAccount) -> Result<i64>;

    /// Create a trial account row, returning its id.
    async fn create_trial_account(&self, account: &NewAccount) -> Result<i64>;

    /// Standard account by numeric id.
    async fn standard_account_by_id(&self, id: i64) -> Result<Option<AccountRecord>>;

    /// Trial account by numeric id.
    async fn trial_account_by_id(&self, id: i64) -> Result<Option<AccountRecord>>;

    /// Standard account by one searchable string column.
    async fn standard_account_by_field(
        &self,
        field: AccountField,
        value: &str,
    ) -> Result<Option<AccountRecord>>;

    /// Trial account by one searchable string column.
    async fn trial_account_by_field(
        &self,
        field: AccountField,
        value: &str,
    ) -> Result<Option<AccountRecord>>;

    // ================================
    // Booking policy
    // ================================

    /// Stored policy row for a company, if one exists.
    async fn booking_policy(&self, company: CompanyRef) -> Result<Option<PolicyRow>>;

    /// Insert or replace the policy row for a company.
    async fn upsert_booking_policy(&self, company: CompanyRef, policy: &PolicyRow) -> Result<()>;

    // ================================
    // Services
    // ================================

    /// Create a service for a company, returning its id.
    async fn create_service(&self, company: CompanyRef, service: &NewService) -> Result<i64>;

    /// Service by id within a company; `active_only` adds the soft-delete filter.
    async fn service_by_id(
        &self,
        company: CompanyRef,
        service_id: i64,
        active_only: bool,
    ) -> Result<Option<Service>>;

    /// Services of a company, optionally filtered by active flag, ordered by
    /// display order then name.
    async fn list_services(
        &self,
        company: CompanyRef,
        is_active: Option<bool>,
    ) -> Result<Vec<Service>>;

    /// Soft-delete a service (`is_active = false`); returns affected rows.
    async fn deactivate_service(&self, company: CompanyRef, service_id: i64) -> Result<u64>;

    // ================================
    // Clients
    // ================================

    /// Client by `(company, phone)`.
    async fn find_client_by_phone(
        &self,
        company: CompanyRef,
        phone: &str,
    ) -> Result<Option<Client>>;

    /// Client by id (owner check is the caller's concern where needed).
    async fn client_by_id(&self, client_id: i64) -> Result<Option<Client>>;

    /// Create a client with `total_appointments = 0`, returning its id.
    async fn create_client(&self, company: CompanyRef, full_name: &str, phone: &str)
        -> Result<i64>;

    /// Update a client's display name.
    async fn update_client_name(&self, client_id: i64, full_name: &str) -> Result<()>;

    // ================================
    // Appointments
    // ================================

    /// Scheduled/confirmed start times for `(company, date, service)`,
    /// ordered ascending.
    async fn booked_times(
        &self,
        company: CompanyRef,
        date: NaiveDate,
        service_id: i64,
    ) -> Result<Vec<String>>;

    /// Number of scheduled/confirmed appointments on a date across all
    /// services of the company.
    async fn count_appointments_on(&self, company: CompanyRef, date: NaiveDate) -> Result<i64>;

    /// Whether another scheduled/confirmed appointment occupies the exact
    /// `(date, time, service)` tuple; `exclude_id` skips the row being moved.
    async fn appointment_exists_at(
        &self,
        company: CompanyRef,
        date: NaiveDate,
        time: &str,
        service_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<bool>;

    /// Insert an appointment and increment the linked client's
    /// `total_appointments` in one transaction. A unique-index violation on
    /// the slot surfaces as `Conflict`.
    async fn create_appointment(
        &self,
        company: CompanyRef,
        appointment: &NewAppointment,
    ) -> Result<i64>;

    /// Appointment by id, scoped to the owning company.
    async fn appointment_by_id(&self, company: CompanyRef, id: i64) -> Result<Option<Appointment>>;

    /// Write back a fully-resolved field set; returns affected rows.
    async fn update_appointment(
        &self,
        company: CompanyRef,
        id: i64,
        changes: &AppointmentChanges,
    ) -> Result<u64>;

    /// Set only the status field; returns affected rows.
    async fn update_appointment_status(
        &self,
        company: CompanyRef,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<u64>;

    /// Hard-delete an appointment; returns affected rows.
    async fn delete_appointment(&self, company: CompanyRef, id: i64) -> Result<u64>;

    /// Filtered appointment page ordered by date desc, time desc, plus the
    /// unpaginated total.
    async fn list_appointments(
        &self,
        company: CompanyRef,
        filter: &AppointmentFilter,
    ) -> Result<(Vec<Appointment>, i64)>;

    /// All appointments on one date ordered by time asc, optionally
    /// restricted to a status.
    async fn appointments_on(
        &self,
        company: CompanyRef,
        date: NaiveDate,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>>;
}
