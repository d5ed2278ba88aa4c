// ABOUTME: Database factory selecting a storage backend from the connection URL
// ABOUTME: Unified Database enum delegating every DatabaseProvider call to the active backend
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Backend selection by connection string.
//!
//! SQLite is the only built-in backend today; the enum is the extension
//! point for additional backends (the engine itself only ever talks to
//! [`DatabaseProvider`]).

use async_trait::async_trait;
use chrono::NaiveDate;
use tracing::info;

use super::sqlite::SqliteDatabase;
use super::DatabaseProvider;
use crate::errors::{EngineError, Result};
use crate::models::{
    AccountField, AccountRecord, Appointment, AppointmentChanges, AppointmentFilter,
    AppointmentStatus, Client, CompanyRef, NewAccount, NewAppointment, NewService, PolicyRow,
    Service,
};

/// Supported database backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatabaseType {
    /// Embedded SQLite.
    Sqlite,
}

/// Database instance wrapper that delegates to the active backend.
#[derive(Debug, Clone)]
pub enum Database {
    /// Embedded SQLite backend.
    Sqlite(SqliteDatabase),
}

impl Database {
    /// The backend behind this handle.
    #[must_use]
    pub const fn database_type(&self) -> DatabaseType {
        match self {
            Self::Sqlite(_) => DatabaseType::Sqlite,
        }
    }

    /// Short backend description for logs.
    #[must_use]
    pub const fn backend_info(&self) -> &'static str {
        match self {
            Self::Sqlite(_) => "SQLite",
        }
    }
}

#[async_trait]
impl DatabaseProvider for Database {
    async fn new(database_url: &str) -> Result<Self> {
        if database_url.starts_with("sqlite:") {
            let db = SqliteDatabase::new(database_url).await?;
            info!(backend = "sqlite", "database backend initialized");
            Ok(Self::Sqlite(db))
        } else {
            Err(EngineError::validation(
                "database_url",
                format!("unsupported database URL scheme in '{database_url}'"),
            ))
        }
    }

    async fn migrate(&self) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.migrate().await,
        }
    }

    async fn create_standard_account(&self, account: &NewAccount) -> Result<i64> {
        match self {
            Self::Sqlite(db) => db.create_standard_account(account).await,
        }
    }

    async fn create_trial_account(&self, account: &NewAccount) -> Result<i64> {
        match self {
            Self::Sqlite(db) => db.create_trial_account(account).await,
        }
    }

    async fn standard_account_by_id(&self, id: i64) -> Result<Option<AccountRecord>> {
        match self {
            Self::Sqlite(db) => db.standard_account_by_id(id).await,
        }
    }

    async fn trial_account_by_id(&self, id: i64) -> Result<Option<AccountRecord>> {
        match self {
            Self::Sqlite(db) => db.trial_account_by_id(id).await,
        }
    }

    async fn standard_account_by_field(
        &self,
        field: AccountField,
        value: &str,
    ) -> Result<Option<AccountRecord>> {
        match self {
            Self::Sqlite(db) => db.standard_account_by_field(field, value).await,
        }
    }

    async fn trial_account_by_field(
        &self,
        field: AccountField,
        value: &str,
    ) -> Result<Option<AccountRecord>> {
        match self {
            Self::Sqlite(db) => db.trial_account_by_field(field, value).await,
        }
    }

    async fn booking_policy(&self, company: CompanyRef) -> Result<Option<PolicyRow>> {
        match self {
            Self::Sqlite(db) => db.booking_policy(company).await,
        }
    }

    async fn upsert_booking_policy(&self, company: CompanyRef, policy: &PolicyRow) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.upsert_booking_policy(company, policy).await,
        }
    }

    async fn create_service(&self, company: CompanyRef, service: &NewService) -> Result<i64> {
        match self {
            Self::Sqlite(db) => db.create_service(company, service).await,
        }
    }

    async fn service_by_id(
        &self,
        company: CompanyRef,
        service_id: i64,
        active_only: bool,
    ) -> Result<Option<Service>> {
        match self {
            Self::Sqlite(db) => db.service_by_id(company, service_id, active_only).await,
        }
    }

    async fn list_services(
        &self,
        company: CompanyRef,
        is_active: Option<bool>,
    ) -> Result<Vec<Service>> {
        match self {
            Self::Sqlite(db) => db.list_services(company, is_active).await,
        }
    }

    async fn deactivate_service(&self, company: CompanyRef, service_id: i64) -> Result<u64> {
        match self {
            Self::Sqlite(db) => db.deactivate_service(company, service_id).await,
        }
    }

    async fn find_client_by_phone(
        &self,
        company: CompanyRef,
        phone: &str,
    ) -> Result<Option<Client>> {
        match self {
            Self::Sqlite(db) => db.find_client_by_phone(company, phone).await,
        }
    }

    async fn client_by_id(&self, client_id: i64) -> Result<Option<Client>> {
        match self {
            Self::Sqlite(db) => db.client_by_id(client_id).await,
        }
    }

    async fn create_client(
        &self,
        company: CompanyRef,
        full_name: &str,
        phone: &str,
    ) -> Result<i64> {
        match self {
            Self::Sqlite(db) => db.create_client(company, full_name, phone).await,
        }
    }

    async fn update_client_name(&self, client_id: i64, full_name: &str) -> Result<()> {
        match self {
            Self::Sqlite(db) => db.update_client_name(client_id, full_name).await,
        }
    }

    async fn booked_times(
        &self,
        company: CompanyRef,
        date: NaiveDate,
        service_id: i64,
    ) -> Result<Vec<String>> {
        match self {
            Self::Sqlite(db) => db.booked_times(company, date, service_id).await,
        }
    }

    async fn count_appointments_on(&self, company: CompanyRef, date: NaiveDate) -> Result<i64> {
        match self {
            Self::Sqlite(db) => db.count_appointments_on(company, date).await,
        }
    }

    async fn appointment_exists_at(
        &self,
        company: CompanyRef,
        date: NaiveDate,
        time: &str,
        service_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        match self {
            Self::Sqlite(db) => {
                db.appointment_exists_at(company, date, time, service_id, exclude_id)
                    .await
            }
        }
    }

    async fn create_appointment(
        &self,
        company: CompanyRef,
        appointment: &NewAppointment,
    ) -> Result<i64> {
        match self {
            Self::Sqlite(db) => db.create_appointment(company, appointment).await,
        }
    }

    async fn appointment_by_id(&self, company: CompanyRef, id: i64) -> Result<Option<Appointment>> {
        match self {
            Self::Sqlite(db) => db.appointment_by_id(company, id).await,
        }
    }

    async fn update_appointment(
        &self,
        company: CompanyRef,
        id: i64,
        changes: &AppointmentChanges,
    ) -> Result<u64> {
        match self {
            Self::Sqlite(db) => db.update_appointment(company, id, changes).await,
        }
    }

    async fn update_appointment_status(
        &self,
        company: CompanyRef,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<u64> {
        match self {
            Self::Sqlite(db) => db.update_appointment_status(company, id, status).await,
        }
    }

    async fn delete_appointment(&self, company: CompanyRef, id: i64) -> Result<u64> {
        match self {
            Self::Sqlite(db) => db.delete_appointment(company, id).await,
        }
    }

    async fn list_appointments(
        &self,
        company: CompanyRef,
        filter: &AppointmentFilter,
    ) -> Result<(Vec<Appointment>, i64)> {
        match self {
            Self::Sqlite(db) => db.list_appointments(company, filter).await,
        }
    }

    async fn appointments_on(
        &self,
        company: CompanyRef,
        date: NaiveDate,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>> {
        match self {
            Self::Sqlite(db) => db.appointments_on(company, date, status).await,
        }
    }
}
