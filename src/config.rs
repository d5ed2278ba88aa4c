// ABOUTME: Environment-driven runtime configuration for the booking engine
// ABOUTME: Reads DATABASE_URL and logging settings with documented defaults
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Runtime configuration.
//!
//! Configuration is environment-only; there is no config file layer. All
//! variables have defaults suitable for local development.

use std::env;

use serde::{Deserialize, Serialize};

use crate::logging::LoggingConfig;

/// Default SQLite database file used when `DATABASE_URL` is unset.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:agendame.db";

/// Engine runtime configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Database connection URL (`sqlite:` schemes only).
    pub database_url: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.into(),
        }
    }
}

impl EngineConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self {
            database_url: env::var("DATABASE_URL")
                .unwrap_or_else(|_| DEFAULT_DATABASE_URL.into()),
        }
    }

    /// Logging configuration companion, also environment-driven.
    #[must_use]
    pub fn logging(&self) -> LoggingConfig {
        LoggingConfig::from_env()
    }
}
