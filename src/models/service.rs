// ABOUTME: Service catalog entry offered by a company
// ABOUTME: Soft-deleted via is_active; price is a 2-place decimal snapshot source for bookings
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A bookable service belonging to exactly one company.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Service {
    /// Surrogate id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Price, 2 decimal places.
    pub price: Decimal,
    /// Duration in minutes, always positive.
    pub duration_minutes: u32,
    /// Soft-delete flag; the booking flow never hard-deletes services.
    pub is_active: bool,
    /// Display ordering within the company's catalog.
    pub display_order: i32,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last update time.
    pub updated_at: DateTime<Utc>,
}

/// Fields required to create a service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewService {
    /// Display name.
    pub name: String,
    /// Optional description.
    pub description: Option<String>,
    /// Price, 2 decimal places.
    pub price: Decimal,
    /// Duration in minutes, must be positive.
    pub duration_minutes: u32,
    /// Display ordering within the company's catalog.
    pub display_order: i32,
}

/// Compact service view embedded in availability and confirmation results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceSummary {
    /// Service id.
    pub id: i64,
    /// Display name.
    pub name: String,
    /// Duration in minutes.
    pub duration_minutes: u32,
    /// Current price.
    pub price: Decimal,
}

impl From<&Service> for ServiceSummary {
    fn from(service: &Service) -> Self {
        Self {
            id: service.id,
            name: service.name.clone(),
            duration_minutes: service.duration_minutes,
            price: service.price,
        }
    }
}
