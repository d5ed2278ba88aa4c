// ABOUTME: SQLite storage backend for the booking engine
// ABOUTME: Schema creation, owner-column scoping and the authoritative slot uniqueness index
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! SQLite implementation of [`DatabaseProvider`].
//!
//! Money is stored as TEXT and parsed with `rust_decimal`; timestamps are
//! RFC 3339 TEXT; business hours are a JSON blob column. Slot exclusivity is
//! enforced by two partial unique indexes (one per owner column) over
//! `(owner, appointment_date, appointment_time, service_id)` restricted to
//! scheduled/confirmed rows; the application-level availability check is
//! only a pre-filter for a better error message.

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::{Pool, Row, Sqlite, SqlitePool};
use std::str::FromStr;

use super::DatabaseProvider;
use crate::errors::{EngineError, Result};
use crate::models::{
    AccountField, AccountRecord, Appointment, AppointmentChanges, AppointmentFilter,
    AppointmentStatus, BusinessHours, Client, CompanyRef, NewAccount, NewAppointment, NewService,
    PolicyRow, Service, TenantKind,
};

/// SQLite database backend.
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    pool: Pool<Sqlite>,
}

/// Owner column selected by the tenant kind of a company reference.
const fn owner_column(kind: TenantKind) -> &'static str {
    match kind {
        TenantKind::Standard => "user_id",
        TenantKind::Trial => "trial_account_id",
    }
}

const fn account_table(kind: TenantKind) -> &'static str {
    match kind {
        TenantKind::Standard => "users",
        TenantKind::Trial => "trial_accounts",
    }
}

const fn search_column(field: AccountField) -> &'static str {
    match field {
        AccountField::Slug => "business_slug",
        AccountField::Username => "username",
        AccountField::BusinessName => "business_name",
    }
}

#[async_trait]
impl DatabaseProvider for SqliteDatabase {
    async fn new(database_url: &str) -> Result<Self> {
        // Ensure SQLite creates the database file if it doesn't exist
        let connection_options = if database_url.starts_with("sqlite:")
            && !database_url.contains('?')
            && !database_url.contains(":memory:")
        {
            format!("{database_url}?mode=rwc")
        } else {
            database_url.to_string()
        };

        let pool = SqlitePool::connect(&connection_options)
            .await
            .map_err(|e| EngineError::Internal(anyhow!(e).context("connecting to sqlite")))?;

        let db = Self { pool };
        db.migrate().await?;
        Ok(db)
    }

    async fn migrate(&self) -> Result<()> {
        for kind in [TenantKind::Standard, TenantKind::Trial] {
            let table = account_table(kind);
            sqlx::query(&format!(
                r#"
                CREATE TABLE IF NOT EXISTS {table} (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    username TEXT NOT NULL,
                    email TEXT UNIQUE NOT NULL,
                    business_name TEXT NOT NULL,
                    business_type TEXT NOT NULL,
                    business_slug TEXT UNIQUE,
                    phone TEXT NOT NULL,
                    whatsapp TEXT,
                    business_hours TEXT, -- JSON blob, NULL means never saved
                    subscription_active BOOLEAN NOT NULL DEFAULT 1,
                    created_at TEXT NOT NULL,
                    updated_at TEXT NOT NULL
                )
                "#
            ))
            .execute(&self.pool)
            .await?;
        }

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS business_settings (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                trial_account_id INTEGER,
                slot_duration_minutes INTEGER,
                max_daily_appointments INTEGER,
                min_booking_lead_hours INTEGER,
                max_booking_days_ahead INTEGER,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id),
                FOREIGN KEY (trial_account_id) REFERENCES trial_accounts (id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS services (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                trial_account_id INTEGER,
                name TEXT NOT NULL,
                description TEXT,
                price TEXT NOT NULL,
                duration_minutes INTEGER NOT NULL,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                display_order INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id),
                FOREIGN KEY (trial_account_id) REFERENCES trial_accounts (id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS clients (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                trial_account_id INTEGER,
                full_name TEXT NOT NULL,
                phone TEXT NOT NULL,
                total_appointments INTEGER NOT NULL DEFAULT 0,
                is_active BOOLEAN NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id),
                FOREIGN KEY (trial_account_id) REFERENCES trial_accounts (id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS appointments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                user_id INTEGER,
                trial_account_id INTEGER,
                client_id INTEGER,
                service_id INTEGER NOT NULL,
                appointment_date TEXT NOT NULL,
                appointment_time TEXT NOT NULL,
                client_name TEXT NOT NULL,
                client_phone TEXT NOT NULL,
                price TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'scheduled',
                notes TEXT,
                whatsapp_sent BOOLEAN NOT NULL DEFAULT 0,
                whatsapp_message_id TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                FOREIGN KEY (user_id) REFERENCES users (id),
                FOREIGN KEY (trial_account_id) REFERENCES trial_accounts (id),
                FOREIGN KEY (client_id) REFERENCES clients (id),
                FOREIGN KEY (service_id) REFERENCES services (id)
            )
            "#,
        )
        .execute(&self.pool)
        .await?;

        for owner in ["user_id", "trial_account_id"] {
            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_services_{owner}_active \
                 ON services({owner}, is_active)"
            ))
            .execute(&self.pool)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_clients_{owner}_phone \
                 ON clients({owner}, phone)"
            ))
            .execute(&self.pool)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_appointments_{owner}_date_status \
                 ON appointments({owner}, appointment_date, status)"
            ))
            .execute(&self.pool)
            .await?;

            sqlx::query(&format!(
                "CREATE INDEX IF NOT EXISTS idx_appointments_{owner}_client_phone \
                 ON appointments({owner}, client_phone)"
            ))
            .execute(&self.pool)
            .await?;

            // Authoritative slot exclusivity: at most one scheduled/confirmed
            // appointment per (owner, date, time, service).
            sqlx::query(&format!(
                "CREATE UNIQUE INDEX IF NOT EXISTS idx_appointments_{owner}_slot \
                 ON appointments({owner}, appointment_date, appointment_time, service_id) \
                 WHERE status IN ('scheduled', 'confirmed') AND {owner} IS NOT NULL"
            ))
            .execute(&self.pool)
            .await?;
        }

        Ok(())
    }

    async fn create_standard_account(&self, account: &NewAccount) -> Result<i64> {
        self.insert_account(TenantKind::Standard, account).await
    }

    async fn create_trial_account(&self, account: &NewAccount) -> Result<i64> {
        self.insert_account(TenantKind::Trial, account).await
    }

    async fn standard_account_by_id(&self, id: i64) -> Result<Option<AccountRecord>> {
        self.account_by_id(TenantKind::Standard, id).await
    }

    async fn trial_account_by_id(&self, id: i64) -> Result<Option<AccountRecord>> {
        self.account_by_id(TenantKind::Trial, id).await
    }

    async fn standard_account_by_field(
        &self,
        field: AccountField,
        value: &str,
    ) -> Result<Option<AccountRecord>> {
        self.account_by_field(TenantKind::Standard, field, value)
            .await
    }

    async fn trial_account_by_field(
        &self,
        field: AccountField,
        value: &str,
    ) -> Result<Option<AccountRecord>> {
        self.account_by_field(TenantKind::Trial, field, value).await
    }

    async fn booking_policy(&self, company: CompanyRef) -> Result<Option<PolicyRow>> {
        let owner = owner_column(company.kind);
        let row = sqlx::query(&format!(
            "SELECT slot_duration_minutes, max_daily_appointments, \
                    min_booking_lead_hours, max_booking_days_ahead \
             FROM business_settings WHERE {owner} = ?1"
        ))
        .bind(company.id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(PolicyRow {
                slot_duration_minutes: row
                    .try_get::<Option<i64>, _>("slot_duration_minutes")
                    .map_err(EngineError::from)?
                    .map(|v| v as u32),
                max_daily_appointments: row
                    .try_get::<Option<i64>, _>("max_daily_appointments")
                    .map_err(EngineError::from)?
                    .map(|v| v as u32),
                min_booking_lead_hours: row
                    .try_get::<Option<i64>, _>("min_booking_lead_hours")
                    .map_err(EngineError::from)?
                    .map(|v| v as u32),
                max_booking_days_ahead: row
                    .try_get::<Option<i64>, _>("max_booking_days_ahead")
                    .map_err(EngineError::from)?
                    .map(|v| v as u32),
            })),
            None => Ok(None),
        }
    }

    async fn upsert_booking_policy(&self, company: CompanyRef, policy: &PolicyRow) -> Result<()> {
        let owner = owner_column(company.kind);
        let now = Utc::now().to_rfc3339();

        let mut tx = self.pool.begin().await?;
        sqlx::query(&format!(
            "DELETE FROM business_settings WHERE {owner} = ?1"
        ))
        .bind(company.id)
        .execute(&mut *tx)
        .await?;

        sqlx::query(&format!(
            "INSERT INTO business_settings \
                 ({owner}, slot_duration_minutes, max_daily_appointments, \
                  min_booking_lead_hours, max_booking_days_ahead, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)"
        ))
        .bind(company.id)
        .bind(policy.slot_duration_minutes.map(i64::from))
        .bind(policy.max_daily_appointments.map(i64::from))
        .bind(policy.min_booking_lead_hours.map(i64::from))
        .bind(policy.max_booking_days_ahead.map(i64::from))
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        tx.commit().await?;
        Ok(())
    }

    async fn create_service(&self, company: CompanyRef, service: &NewService) -> Result<i64> {
        let owner = owner_column(company.kind);
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(&format!(
            "INSERT INTO services \
                 ({owner}, name, description, price, duration_minutes, \
                  is_active, display_order, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?7, ?8)"
        ))
        .bind(company.id)
        .bind(&service.name)
        .bind(&service.description)
        .bind(service.price.to_string())
        .bind(i64::from(service.duration_minutes))
        .bind(i64::from(service.display_order))
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn service_by_id(
        &self,
        company: CompanyRef,
        service_id: i64,
        active_only: bool,
    ) -> Result<Option<Service>> {
        let owner = owner_column(company.kind);
        let active_clause = if active_only { " AND is_active = 1" } else { "" };
        let row = sqlx::query(&format!(
            "SELECT * FROM services WHERE id = ?1 AND {owner} = ?2{active_clause}"
        ))
        .bind(service_id)
        .bind(company.id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_service(&row)?)),
            None => Ok(None),
        }
    }

    async fn list_services(
        &self,
        company: CompanyRef,
        is_active: Option<bool>,
    ) -> Result<Vec<Service>> {
        let owner = owner_column(company.kind);
        let mut sql = format!("SELECT * FROM services WHERE {owner} = ?1");
        if is_active.is_some() {
            sql.push_str(" AND is_active = ?2");
        }
        sql.push_str(" ORDER BY display_order, name");

        let mut query = sqlx::query(&sql).bind(company.id);
        if let Some(active) = is_active {
            query = query.bind(active);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_service).collect()
    }

    async fn deactivate_service(&self, company: CompanyRef, service_id: i64) -> Result<u64> {
        let owner = owner_column(company.kind);
        let result = sqlx::query(&format!(
            "UPDATE services SET is_active = 0, updated_at = ?1 \
             WHERE id = ?2 AND {owner} = ?3"
        ))
        .bind(Utc::now().to_rfc3339())
        .bind(service_id)
        .bind(company.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn find_client_by_phone(
        &self,
        company: CompanyRef,
        phone: &str,
    ) -> Result<Option<Client>> {
        let owner = owner_column(company.kind);
        let row = sqlx::query(&format!(
            "SELECT * FROM clients WHERE {owner} = ?1 AND phone = ?2"
        ))
        .bind(company.id)
        .bind(phone)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_client(&row)?)),
            None => Ok(None),
        }
    }

    async fn client_by_id(&self, client_id: i64) -> Result<Option<Client>> {
        let row = sqlx::query("SELECT * FROM clients WHERE id = ?1")
            .bind(client_id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_client(&row)?)),
            None => Ok(None),
        }
    }

    async fn create_client(
        &self,
        company: CompanyRef,
        full_name: &str,
        phone: &str,
    ) -> Result<i64> {
        let owner = owner_column(company.kind);
        let now = Utc::now().to_rfc3339();
        let result = sqlx::query(&format!(
            "INSERT INTO clients \
                 ({owner}, full_name, phone, total_appointments, is_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, 0, 1, ?4, ?5)"
        ))
        .bind(company.id)
        .bind(full_name)
        .bind(phone)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn update_client_name(&self, client_id: i64, full_name: &str) -> Result<()> {
        sqlx::query("UPDATE clients SET full_name = ?1, updated_at = ?2 WHERE id = ?3")
            .bind(full_name)
            .bind(Utc::now().to_rfc3339())
            .bind(client_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn booked_times(
        &self,
        company: CompanyRef,
        date: NaiveDate,
        service_id: i64,
    ) -> Result<Vec<String>> {
        let owner = owner_column(company.kind);
        let rows = sqlx::query(&format!(
            "SELECT appointment_time FROM appointments \
             WHERE {owner} = ?1 AND appointment_date = ?2 AND service_id = ?3 \
               AND status IN ('scheduled', 'confirmed') \
             ORDER BY appointment_time"
        ))
        .bind(company.id)
        .bind(date.to_string())
        .bind(service_id)
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| row.try_get("appointment_time").map_err(EngineError::from))
            .collect()
    }

    async fn count_appointments_on(&self, company: CompanyRef, date: NaiveDate) -> Result<i64> {
        let owner = owner_column(company.kind);
        let count: i64 = sqlx::query_scalar(&format!(
            "SELECT COUNT(*) FROM appointments \
             WHERE {owner} = ?1 AND appointment_date = ?2 \
               AND status IN ('scheduled', 'confirmed')"
        ))
        .bind(company.id)
        .bind(date.to_string())
        .fetch_one(&self.pool)
        .await?;
        Ok(count)
    }

    async fn appointment_exists_at(
        &self,
        company: CompanyRef,
        date: NaiveDate,
        time: &str,
        service_id: i64,
        exclude_id: Option<i64>,
    ) -> Result<bool> {
        let owner = owner_column(company.kind);
        let mut sql = format!(
            "SELECT COUNT(*) FROM appointments \
             WHERE {owner} = ?1 AND appointment_date = ?2 AND appointment_time = ?3 \
               AND service_id = ?4 AND status IN ('scheduled', 'confirmed')"
        );
        if exclude_id.is_some() {
            sql.push_str(" AND id != ?5");
        }

        let mut query = sqlx::query_scalar::<_, i64>(&sql)
            .bind(company.id)
            .bind(date.to_string())
            .bind(time)
            .bind(service_id);
        if let Some(id) = exclude_id {
            query = query.bind(id);
        }
        let count = query.fetch_one(&self.pool).await?;
        Ok(count > 0)
    }

    async fn create_appointment(
        &self,
        company: CompanyRef,
        appointment: &NewAppointment,
    ) -> Result<i64> {
        let owner = owner_column(company.kind);
        let now = Utc::now().to_rfc3339();

        // Insert and counter increment share one transaction so a failed
        // increment cannot leave a stale client counter behind.
        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(&format!(
            "INSERT INTO appointments \
                 ({owner}, client_id, service_id, appointment_date, appointment_time, \
                  client_name, client_phone, price, status, notes, whatsapp_sent, \
                  created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 'scheduled', ?9, 0, ?10, ?11)"
        ))
        .bind(company.id)
        .bind(appointment.client_id)
        .bind(appointment.service_id)
        .bind(appointment.appointment_date.to_string())
        .bind(&appointment.appointment_time)
        .bind(&appointment.client_name)
        .bind(&appointment.client_phone)
        .bind(appointment.price.to_string())
        .bind(&appointment.notes)
        .bind(&now)
        .bind(&now)
        .execute(&mut *tx)
        .await?;
        let id = result.last_insert_rowid();

        sqlx::query(
            "UPDATE clients SET total_appointments = total_appointments + 1, updated_at = ?1 \
             WHERE id = ?2",
        )
        .bind(&now)
        .bind(appointment.client_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(id)
    }

    async fn appointment_by_id(&self, company: CompanyRef, id: i64) -> Result<Option<Appointment>> {
        let owner = owner_column(company.kind);
        let row = sqlx::query(&format!(
            "SELECT * FROM appointments WHERE id = ?1 AND {owner} = ?2"
        ))
        .bind(id)
        .bind(company.id)
        .fetch_optional(&self.pool)
        .await?;

        match row {
            Some(row) => Ok(Some(row_to_appointment(&row)?)),
            None => Ok(None),
        }
    }

    async fn update_appointment(
        &self,
        company: CompanyRef,
        id: i64,
        changes: &AppointmentChanges,
    ) -> Result<u64> {
        let owner = owner_column(company.kind);
        let result = sqlx::query(&format!(
            "UPDATE appointments SET \
                 client_id = ?1, service_id = ?2, appointment_date = ?3, \
                 appointment_time = ?4, client_name = ?5, client_phone = ?6, \
                 price = ?7, status = ?8, notes = ?9, updated_at = ?10 \
             WHERE id = ?11 AND {owner} = ?12"
        ))
        .bind(changes.client_id)
        .bind(changes.service_id)
        .bind(changes.appointment_date.to_string())
        .bind(&changes.appointment_time)
        .bind(&changes.client_name)
        .bind(&changes.client_phone)
        .bind(changes.price.to_string())
        .bind(changes.status.as_str())
        .bind(&changes.notes)
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(company.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn update_appointment_status(
        &self,
        company: CompanyRef,
        id: i64,
        status: AppointmentStatus,
    ) -> Result<u64> {
        let owner = owner_column(company.kind);
        let result = sqlx::query(&format!(
            "UPDATE appointments SET status = ?1, updated_at = ?2 \
             WHERE id = ?3 AND {owner} = ?4"
        ))
        .bind(status.as_str())
        .bind(Utc::now().to_rfc3339())
        .bind(id)
        .bind(company.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn delete_appointment(&self, company: CompanyRef, id: i64) -> Result<u64> {
        let owner = owner_column(company.kind);
        let result = sqlx::query(&format!(
            "DELETE FROM appointments WHERE id = ?1 AND {owner} = ?2"
        ))
        .bind(id)
        .bind(company.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    async fn list_appointments(
        &self,
        company: CompanyRef,
        filter: &AppointmentFilter,
    ) -> Result<(Vec<Appointment>, i64)> {
        let owner = owner_column(company.kind);
        let mut conditions = format!("{owner} = ?1");
        let mut next_param = 2;

        let mut params: Vec<String> = Vec::new();
        if let Some(start) = filter.start_date {
            conditions.push_str(&format!(" AND appointment_date >= ?{next_param}"));
            params.push(start.to_string());
            next_param += 1;
        }
        if let Some(end) = filter.end_date {
            conditions.push_str(&format!(" AND appointment_date <= ?{next_param}"));
            params.push(end.to_string());
            next_param += 1;
        }
        if let Some(status) = filter.status {
            conditions.push_str(&format!(" AND status = ?{next_param}"));
            params.push(status.as_str().to_string());
            next_param += 1;
        }
        if let Some(service_id) = filter.service_id {
            conditions.push_str(&format!(" AND service_id = ?{next_param}"));
            params.push(service_id.to_string());
            next_param += 1;
        }
        if let Some(name) = &filter.client_name {
            conditions.push_str(&format!(
                " AND LOWER(client_name) LIKE ?{next_param}"
            ));
            params.push(format!("%{}%", name.to_lowercase()));
            next_param += 1;
        }

        let count_sql = format!("SELECT COUNT(*) FROM appointments WHERE {conditions}");
        let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql).bind(company.id);
        for param in &params {
            count_query = count_query.bind(param.as_str());
        }
        let total = count_query.fetch_one(&self.pool).await?;

        let page_sql = format!(
            "SELECT * FROM appointments WHERE {conditions} \
             ORDER BY appointment_date DESC, appointment_time DESC \
             LIMIT ?{next_param} OFFSET ?{}",
            next_param + 1
        );
        let mut page_query = sqlx::query(&page_sql).bind(company.id);
        for param in &params {
            page_query = page_query.bind(param.as_str());
        }
        let rows = page_query
            .bind(filter.limit)
            .bind(filter.offset)
            .fetch_all(&self.pool)
            .await?;

        let items = rows
            .iter()
            .map(row_to_appointment)
            .collect::<Result<Vec<_>>>()?;
        Ok((items, total))
    }

    async fn appointments_on(
        &self,
        company: CompanyRef,
        date: NaiveDate,
        status: Option<AppointmentStatus>,
    ) -> Result<Vec<Appointment>> {
        let owner = owner_column(company.kind);
        let mut sql = format!(
            "SELECT * FROM appointments WHERE {owner} = ?1 AND appointment_date = ?2"
        );
        if status.is_some() {
            sql.push_str(" AND status = ?3");
        }
        sql.push_str(" ORDER BY appointment_time");

        let mut query = sqlx::query(&sql).bind(company.id).bind(date.to_string());
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.iter().map(row_to_appointment).collect()
    }
}

impl SqliteDatabase {
    async fn insert_account(&self, kind: TenantKind, account: &NewAccount) -> Result<i64> {
        let table = account_table(kind);
        let hours_blob = account
            .business_hours
            .as_ref()
            .map(serde_json::to_string)
            .transpose()
            .map_err(|e| EngineError::Internal(anyhow!(e).context("serializing business hours")))?;
        let now = Utc::now().to_rfc3339();

        let result = sqlx::query(&format!(
            "INSERT INTO {table} \
                 (username, email, business_name, business_type, business_slug, \
                  phone, whatsapp, business_hours, subscription_active, created_at, updated_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 1, ?9, ?10)"
        ))
        .bind(&account.username)
        .bind(&account.email)
        .bind(&account.business_name)
        .bind(&account.business_type)
        .bind(&account.business_slug)
        .bind(&account.phone)
        .bind(&account.whatsapp)
        .bind(hours_blob)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;
        Ok(result.last_insert_rowid())
    }

    async fn account_by_id(&self, kind: TenantKind, id: i64) -> Result<Option<AccountRecord>> {
        let table = account_table(kind);
        let row = sqlx::query(&format!("SELECT * FROM {table} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_account(&row)?)),
            None => Ok(None),
        }
    }

    async fn account_by_field(
        &self,
        kind: TenantKind,
        field: AccountField,
        value: &str,
    ) -> Result<Option<AccountRecord>> {
        let table = account_table(kind);
        let column = search_column(field);
        let row = sqlx::query(&format!("SELECT * FROM {table} WHERE {column} = ?1"))
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        match row {
            Some(row) => Ok(Some(row_to_account(&row)?)),
            None => Ok(None),
        }
    }
}

fn row_to_account(row: &sqlx::sqlite::SqliteRow) -> Result<AccountRecord> {
    let hours_blob: Option<String> = row.try_get("business_hours").map_err(EngineError::from)?;
    let business_hours: Option<BusinessHours> = hours_blob
        .map(|blob| serde_json::from_str(&blob))
        .transpose()
        .map_err(|e| EngineError::Internal(anyhow!(e).context("parsing business hours blob")))?;

    Ok(AccountRecord {
        id: row.try_get("id").map_err(EngineError::from)?,
        username: row.try_get("username").map_err(EngineError::from)?,
        business_name: row.try_get("business_name").map_err(EngineError::from)?,
        business_slug: row.try_get("business_slug").map_err(EngineError::from)?,
        phone: row.try_get("phone").map_err(EngineError::from)?,
        whatsapp: row.try_get("whatsapp").map_err(EngineError::from)?,
        business_hours,
        active: row
            .try_get("subscription_active")
            .map_err(EngineError::from)?,
    })
}

fn row_to_service(row: &sqlx::sqlite::SqliteRow) -> Result<Service> {
    Ok(Service {
        id: row.try_get("id").map_err(EngineError::from)?,
        name: row.try_get("name").map_err(EngineError::from)?,
        description: row.try_get("description").map_err(EngineError::from)?,
        price: parse_price(&row.try_get::<String, _>("price").map_err(EngineError::from)?)?,
        duration_minutes: row
            .try_get::<i64, _>("duration_minutes")
            .map_err(EngineError::from)? as u32,
        is_active: row.try_get("is_active").map_err(EngineError::from)?,
        display_order: row
            .try_get::<i64, _>("display_order")
            .map_err(EngineError::from)? as i32,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at").map_err(EngineError::from)?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at").map_err(EngineError::from)?)?,
    })
}

fn row_to_client(row: &sqlx::sqlite::SqliteRow) -> Result<Client> {
    Ok(Client {
        id: row.try_get("id").map_err(EngineError::from)?,
        full_name: row.try_get("full_name").map_err(EngineError::from)?,
        phone: row.try_get("phone").map_err(EngineError::from)?,
        total_appointments: row
            .try_get("total_appointments")
            .map_err(EngineError::from)?,
        is_active: row.try_get("is_active").map_err(EngineError::from)?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at").map_err(EngineError::from)?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at").map_err(EngineError::from)?)?,
    })
}

fn row_to_appointment(row: &sqlx::sqlite::SqliteRow) -> Result<Appointment> {
    let status_str: String = row.try_get("status").map_err(EngineError::from)?;
    let date_str: String = row.try_get("appointment_date").map_err(EngineError::from)?;
    let appointment_date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|e| EngineError::Internal(anyhow!(e).context("parsing stored appointment date")))?;

    Ok(Appointment {
        id: row.try_get("id").map_err(EngineError::from)?,
        client_id: row.try_get("client_id").map_err(EngineError::from)?,
        service_id: row.try_get("service_id").map_err(EngineError::from)?,
        appointment_date,
        appointment_time: row.try_get("appointment_time").map_err(EngineError::from)?,
        client_name: row.try_get("client_name").map_err(EngineError::from)?,
        client_phone: row.try_get("client_phone").map_err(EngineError::from)?,
        price: parse_price(&row.try_get::<String, _>("price").map_err(EngineError::from)?)?,
        status: status_str.parse()?,
        notes: row.try_get("notes").map_err(EngineError::from)?,
        whatsapp_sent: row.try_get("whatsapp_sent").map_err(EngineError::from)?,
        whatsapp_message_id: row
            .try_get("whatsapp_message_id")
            .map_err(EngineError::from)?,
        created_at: parse_timestamp(&row.try_get::<String, _>("created_at").map_err(EngineError::from)?)?,
        updated_at: parse_timestamp(&row.try_get::<String, _>("updated_at").map_err(EngineError::from)?)?,
    })
}

fn parse_price(value: &str) -> Result<Decimal> {
    Decimal::from_str(value)
        .with_context(|| format!("parsing stored price '{value}'"))
        .map_err(EngineError::Internal)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .with_context(|| format!("parsing stored timestamp '{value}'"))
        .map_err(EngineError::Internal)
}
