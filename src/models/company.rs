// ABOUTME: Tenant identity types for the dual-table company model
// ABOUTME: TenantKind/CompanyRef tagged union, resolved handles and weekly business hours
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

use chrono::Weekday;
use serde::{Deserialize, Serialize};

/// Which physical account table a company lives in.
///
/// The two tables share no common id space, so the kind must travel with the
/// numeric id through every storage call (rows store the owner as two
/// mutually exclusive nullable foreign keys).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TenantKind {
    /// Paid/regular account (`users` table).
    Standard,
    /// Time-limited trial account (`trial_accounts` table).
    Trial,
}

impl TenantKind {
    /// Stable string tag, as persisted and logged.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Trial => "trial",
        }
    }
}

/// Tagged reference to one logical company.
///
/// Passed by value through every downstream call and storage filter; the
/// try-table-A-then-table-B probing lives only in the tenant resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompanyRef {
    /// Tenant kind tag selecting the owner column.
    pub kind: TenantKind,
    /// Numeric id, scoped per tenant kind (not globally unique).
    pub id: i64,
}

impl CompanyRef {
    /// Build a reference to a standard-account company.
    #[must_use]
    pub const fn standard(id: i64) -> Self {
        Self {
            kind: TenantKind::Standard,
            id,
        }
    }

    /// Build a reference to a trial-account company.
    #[must_use]
    pub const fn trial(id: i64) -> Self {
        Self {
            kind: TenantKind::Trial,
            id,
        }
    }
}

/// How an opaque company identifier should be interpreted by the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchKind {
    /// Try slug, then username, then business name.
    Auto,
    /// Match the URL slug only.
    Slug,
    /// Match the account username only.
    Username,
    /// Match the display business name only.
    Name,
    /// Numeric account id.
    Id,
}

impl Default for SearchKind {
    fn default() -> Self {
        Self::Auto
    }
}

/// Open/close pair for a single weekday; both `None` means closed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayHours {
    /// Opening time "HH:MM", or `None` when closed.
    pub open: Option<String>,
    /// Closing time "HH:MM", or `None` when closed.
    pub close: Option<String>,
}

impl DayHours {
    /// Hours for an open day.
    #[must_use]
    pub fn open_between(open: &str, close: &str) -> Self {
        Self {
            open: Some(open.to_string()),
            close: Some(close.to_string()),
        }
    }

    /// Hours for a closed day.
    #[must_use]
    pub const fn closed() -> Self {
        Self {
            open: None,
            close: None,
        }
    }

    /// Whether the day has no bookable window at all.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.open.is_none() || self.close.is_none()
    }
}

/// Weekly opening hours, stored as a JSON blob on the account record.
///
/// A partially populated blob deserializes with the documented default week
/// filling the missing days.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BusinessHours {
    /// Monday hours.
    pub monday: DayHours,
    /// Tuesday hours.
    pub tuesday: DayHours,
    /// Wednesday hours.
    pub wednesday: DayHours,
    /// Thursday hours.
    pub thursday: DayHours,
    /// Friday hours.
    pub friday: DayHours,
    /// Saturday hours.
    pub saturday: DayHours,
    /// Sunday hours.
    pub sunday: DayHours,
}

impl Default for BusinessHours {
    /// Documented default week: Mon–Fri 09:00–18:00, Sat 09:00–17:00, Sun closed.
    fn default() -> Self {
        let weekday = DayHours::open_between("09:00", "18:00");
        Self {
            monday: weekday.clone(),
            tuesday: weekday.clone(),
            wednesday: weekday.clone(),
            thursday: weekday.clone(),
            friday: weekday,
            saturday: DayHours::open_between("09:00", "17:00"),
            sunday: DayHours::closed(),
        }
    }
}

impl BusinessHours {
    /// Hours for the given weekday.
    #[must_use]
    pub const fn for_day(&self, day: Weekday) -> &DayHours {
        match day {
            Weekday::Mon => &self.monday,
            Weekday::Tue => &self.tuesday,
            Weekday::Wed => &self.wednesday,
            Weekday::Thu => &self.thursday,
            Weekday::Fri => &self.friday,
            Weekday::Sat => &self.saturday,
            Weekday::Sun => &self.sunday,
        }
    }
}

/// One of the three string-searchable account columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountField {
    /// `business_slug` column.
    Slug,
    /// `username` column.
    Username,
    /// `business_name` column.
    BusinessName,
}

/// Fields required to create an account row in either tenant table.
///
/// Signup itself is an external collaborator; this payload exists so the
/// storage layer is complete and seedable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAccount {
    /// Account username.
    pub username: String,
    /// Unique login email.
    pub email: String,
    /// Display business name.
    pub business_name: String,
    /// Business category (salon, barber, ...).
    pub business_type: String,
    /// URL-safe slug, optional.
    pub business_slug: Option<String>,
    /// Contact phone.
    pub phone: String,
    /// WhatsApp contact, optional.
    pub whatsapp: Option<String>,
    /// Weekly opening hours; `None` stores the blob as absent.
    pub business_hours: Option<BusinessHours>,
}

/// Raw account row from either tenant table.
///
/// The two tables have identical shapes for the fields the engine reads;
/// the resolver turns one of these plus its origin table into a handle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountRecord {
    /// Numeric id within the origin table.
    pub id: i64,
    /// Account username.
    pub username: String,
    /// Display business name.
    pub business_name: String,
    /// URL-safe slug, optional.
    pub business_slug: Option<String>,
    /// Contact phone.
    pub phone: String,
    /// WhatsApp contact, optional.
    pub whatsapp: Option<String>,
    /// Weekly opening hours blob; `None` when the account has never saved one.
    pub business_hours: Option<BusinessHours>,
    /// Whether the subscription/trial is currently active.
    pub active: bool,
}

/// Resolved company identity plus the display fields downstream code needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompanyHandle {
    /// Tagged company reference (threads the tenant kind through storage).
    pub company: CompanyRef,
    /// Display business name.
    pub business_name: String,
    /// URL-safe slug, optional.
    pub business_slug: Option<String>,
    /// Account username.
    pub username: String,
    /// Contact phone.
    pub phone: String,
    /// WhatsApp contact, optional.
    pub whatsapp: Option<String>,
    /// Weekly opening hours, when the account has saved them.
    pub business_hours: Option<BusinessHours>,
    /// Whether the account is active.
    pub active: bool,
}

impl CompanyHandle {
    /// Build a handle from a raw account row and the table it came from.
    #[must_use]
    pub fn from_record(kind: TenantKind, record: AccountRecord) -> Self {
        Self {
            company: CompanyRef {
                kind,
                id: record.id,
            },
            business_name: record.business_name,
            business_slug: record.business_slug,
            username: record.username,
            phone: record.phone,
            whatsapp: record.whatsapp,
            business_hours: record.business_hours,
            active: record.active,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_hours_blob_fills_missing_days_from_default_week() {
        let hours: BusinessHours =
            serde_json::from_str(r#"{"sunday":{"open":"10:00","close":"14:00"}}"#)
                .expect("valid blob");
        assert_eq!(hours.sunday, DayHours::open_between("10:00", "14:00"));
        assert_eq!(hours.monday, DayHours::open_between("09:00", "18:00"));
        assert_eq!(hours.saturday, DayHours::open_between("09:00", "17:00"));
    }

    #[test]
    fn default_week_closes_sunday() {
        let hours = BusinessHours::default();
        assert!(hours.for_day(Weekday::Sun).is_closed());
        assert!(!hours.for_day(Weekday::Sat).is_closed());
    }
}
