// ABOUTME: Client roster entry, keyed by phone within one company
// ABOUTME: Created on first booking, name and counter updated on repeat bookings
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A customer of one company, identified by `(company, phone)`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Client {
    /// Surrogate id.
    pub id: i64,
    /// Full name as last given at booking time.
    pub full_name: String,
    /// Phone number; the identity key within a company.
    pub phone: String,
    /// Lifetime count of appointments booked by this client.
    pub total_appointments: i64,
    /// Whether the client is active.
    pub is_active: bool,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}
