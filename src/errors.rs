// ABOUTME: Unified error taxonomy for the availability and booking engine
// ABOUTME: Maps NotFound/Conflict/Validation/Internal outcomes to transport status codes
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Engine error taxonomy.
//!
//! `NotFound`, `Conflict` and `Validation` are expected outcomes surfaced to
//! the caller with enough detail to act on; `Internal` wraps unexpected
//! storage failures and is surfaced opaquely. The engine never retries;
//! retries, if any, belong to the transport layer.

use thiserror::Error;

/// Result alias used across the engine and the storage collaborator.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Errors produced by the availability and booking engine.
#[derive(Debug, Error)]
pub enum EngineError {
    /// A company, service, client or appointment is absent or not owned by
    /// the caller.
    #[error("{resource} not found: {detail}")]
    NotFound {
        /// Kind of entity that was looked up (e.g. "company", "service").
        resource: &'static str,
        /// Lookup detail for the caller (identifier, scope).
        detail: String,
    },

    /// A requested slot is no longer (or never was) available.
    #[error("conflict: {detail}")]
    Conflict {
        /// What collided, human readable.
        detail: String,
    },

    /// Malformed or out-of-range caller input.
    #[error("invalid {field}: {detail}")]
    Validation {
        /// Field that failed validation.
        field: &'static str,
        /// Why it failed.
        detail: String,
    },

    /// Unexpected storage or infrastructure failure.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl EngineError {
    /// Shorthand for a `NotFound` error.
    pub fn not_found(resource: &'static str, detail: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            detail: detail.into(),
        }
    }

    /// Shorthand for a `Conflict` error.
    pub fn conflict(detail: impl Into<String>) -> Self {
        Self::Conflict {
            detail: detail.into(),
        }
    }

    /// Shorthand for a `Validation` error.
    pub fn validation(field: &'static str, detail: impl Into<String>) -> Self {
        Self::Validation {
            field,
            detail: detail.into(),
        }
    }

    /// Transport status code for this error.
    ///
    /// The engine carries no HTTP dependency; callers embedding it in a web
    /// layer map the taxonomy with this.
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        match self {
            Self::NotFound { .. } => 404,
            Self::Conflict { .. } => 409,
            Self::Validation { .. } => 400,
            Self::Internal(_) => 500,
        }
    }
}

impl From<sqlx::Error> for EngineError {
    fn from(err: sqlx::Error) -> Self {
        // A unique-index violation on the slot index is the authoritative
        // conflict signal (the in-engine availability check is only a fast
        // pre-filter with a better message).
        if let sqlx::Error::Database(db_err) = &err {
            if db_err.is_unique_violation() {
                return Self::Conflict {
                    detail: "slot already booked".into(),
                };
            }
        }
        Self::Internal(err.into())
    }
}
