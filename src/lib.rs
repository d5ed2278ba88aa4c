// ABOUTME: Main library entry point for the Agendame availability and booking engine
// ABOUTME: Multi-tenant slot computation, conflict filtering and booking for service businesses
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! # Agendame Booking Engine
//!
//! A multi-tenant availability and booking engine for appointment-based
//! businesses (salons, barbershops and similar). The engine computes
//! bookable time slots from per-company weekly hours and booking policy,
//! filters them against existing appointments, and commits bookings with
//! duplicate-slot protection enforced by the storage layer.
//!
//! ## Architecture
//!
//! - **Tenant resolution** ([`tenant`]): maps an opaque identifier (id,
//!   slug, username or business name) onto one logical company backed by
//!   either the standard or the trial account table.
//! - **Schedule configuration** ([`schedule`]): weekly opening hours and
//!   booking policy, with documented defaults filled in per field.
//! - **Slot generation** ([`slots`]) and **conflict filtering**
//!   ([`conflicts`]): pure functions over candidate times.
//! - **Booking** ([`booking`]): the end-to-end pipeline from identifier to
//!   committed appointment; availability is always recomputed before an
//!   insert.
//! - **Appointment management** ([`appointments`]): staff-facing updates,
//!   status changes, deletion and listings.
//! - **Storage** ([`database_plugins`]): a [`DatabaseProvider`] trait with
//!   an embedded SQLite backend behind the [`Database`] factory enum.
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use agendame::database_plugins::factory::Database;
//! use agendame::database_plugins::DatabaseProvider;
//! use agendame::models::SearchKind;
//! use agendame::BookingEngine;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let database = Arc::new(Database::new("sqlite:agendame.db").await?);
//!     database.migrate().await?;
//!
//!     let engine = BookingEngine::new(database);
//!     let date = chrono::NaiveDate::from_ymd_opt(2026, 9, 1).unwrap();
//!     let availability = engine
//!         .available_times("corner-barber", SearchKind::Auto, 1, date)
//!         .await?;
//!     println!("{} open slots", availability.total_available);
//!     Ok(())
//! }
//! ```

#![deny(unsafe_code)]

pub mod appointments;
pub mod booking;
pub mod config;
pub mod conflicts;
pub mod database_plugins;
pub mod errors;
pub mod logging;
pub mod models;
pub mod schedule;
pub mod slots;
pub mod tenant;

pub use appointments::{
    AppointmentListResult, AppointmentManager, AppointmentPatch, AppointmentView,
};
pub use booking::{AvailabilityResult, BookingConfirmation, BookingEngine, BookingRequest};
pub use config::EngineConfig;
pub use database_plugins::factory::Database;
pub use database_plugins::DatabaseProvider;
pub use errors::{EngineError, Result};
pub use schedule::ScheduleConfig;
pub use tenant::TenantResolver;
