// ABOUTME: Domain model types for the availability and booking engine
// ABOUTME: Re-exports company identity, policy, service, client and appointment types
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Domain models shared by the engine and the storage collaborator.

/// Appointment row, status enum and insert payload.
pub mod appointment;
/// Client roster entry.
pub mod client;
/// Tenant identity, business hours and resolver input types.
pub mod company;
/// Booking policy settings and defaults.
pub mod policy;
/// Service catalog entry.
pub mod service;

pub use appointment::{
    Appointment, AppointmentChanges, AppointmentFilter, AppointmentStatus, NewAppointment,
};
pub use client::Client;
pub use company::{
    AccountField, AccountRecord, BusinessHours, CompanyHandle, CompanyRef, DayHours, NewAccount,
    SearchKind, TenantKind,
};
pub use policy::{BookingPolicy, PolicyRow};
pub use service::{NewService, Service, ServiceSummary};
