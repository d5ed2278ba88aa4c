// ABOUTME: Shared test utilities and setup functions for integration tests
// ABOUTME: Provides common database, account and service seeding helpers
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project
#![allow(
    dead_code,
    clippy::wildcard_in_or_patterns,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::must_use_candidate,
    clippy::module_name_repetitions
)]
//! Shared test utilities for `agendame`
//!
//! This module provides common test setup functions to reduce duplication
//! across integration tests.

use std::sync::{Arc, Once};

use anyhow::Result;
use chrono::{Duration, Local, NaiveDate};
use rust_decimal::Decimal;

use agendame::{
    database_plugins::{factory::Database, DatabaseProvider},
    models::{BusinessHours, CompanyRef, DayHours, NewAccount, NewService},
};

static INIT_LOGGER: Once = Once::new();

/// Initialize quiet logging for tests (call once per test process)
pub fn init_test_logging() {
    INIT_LOGGER.call_once(|| {
        let log_level = match std::env::var("TEST_LOG").as_deref() {
            Ok("TRACE") => tracing::Level::TRACE,
            Ok("DEBUG") => tracing::Level::DEBUG,
            Ok("INFO") => tracing::Level::INFO,
            Ok("WARN" | "ERROR") | _ => tracing::Level::WARN,
        };

        tracing_subscriber::fmt()
            .with_max_level(log_level)
            .with_test_writer()
            .init();
    });
}

/// Standard test database setup: in-memory SQLite with migrations applied
pub async fn create_test_database() -> Result<Arc<Database>> {
    init_test_logging();
    let database = Arc::new(Database::new("sqlite::memory:").await?);
    database.migrate().await?;
    Ok(database)
}

/// Weekly hours open every day 09:00–18:00 so tests are not weekday-sensitive
pub fn always_open_hours() -> BusinessHours {
    let day = DayHours::open_between("09:00", "18:00");
    BusinessHours {
        monday: day.clone(),
        tuesday: day.clone(),
        wednesday: day.clone(),
        thursday: day.clone(),
        friday: day.clone(),
        saturday: day.clone(),
        sunday: day,
    }
}

/// A future date safely inside the default 30-day booking horizon
pub fn future_date() -> NaiveDate {
    Local::now().date_naive() + Duration::days(7)
}

/// Account payload with unique identifying fields derived from `tag`
pub fn account_payload(tag: &str) -> NewAccount {
    NewAccount {
        username: format!("user_{tag}"),
        email: format!("{tag}@example.com"),
        business_name: format!("Salon {tag}"),
        business_type: "salon".into(),
        business_slug: Some(format!("salon-{tag}")),
        phone: "11988880000".into(),
        whatsapp: None,
        business_hours: Some(always_open_hours()),
    }
}

/// Seed a standard account open seven days a week
pub async fn seed_standard_account(database: &Database, tag: &str) -> Result<CompanyRef> {
    let id = database.create_standard_account(&account_payload(tag)).await?;
    Ok(CompanyRef::standard(id))
}

/// Seed a trial account open seven days a week
pub async fn seed_trial_account(database: &Database, tag: &str) -> Result<CompanyRef> {
    let id = database.create_trial_account(&account_payload(tag)).await?;
    Ok(CompanyRef::trial(id))
}

/// Seed an active service and return its id
pub async fn seed_service(
    database: &Database,
    company: CompanyRef,
    name: &str,
    duration_minutes: u32,
    price_cents: i64,
) -> Result<i64> {
    let service = NewService {
        name: name.into(),
        description: None,
        price: Decimal::new(price_cents, 2),
        duration_minutes,
        display_order: 0,
    };
    Ok(database.create_service(company, &service).await?)
}
