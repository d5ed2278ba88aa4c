// ABOUTME: Tenant resolver mapping opaque identifiers onto one logical company
// ABOUTME: Centralizes the standard-then-trial two-table probe behind a tagged CompanyHandle
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

//! Company identity resolution.
//!
//! A company is physically one of two account records (standard or trial).
//! This module is the only place that probes both tables; everything
//! downstream receives the tenant kind as part of the resolved handle and
//! threads it through storage calls. Read-only.

use std::sync::Arc;

use tracing::debug;

use crate::database_plugins::factory::Database;
use crate::database_plugins::DatabaseProvider;
use crate::errors::{EngineError, Result};
use crate::models::{AccountField, CompanyHandle, SearchKind, TenantKind};

/// Field probe order for `auto` and named string searches.
const AUTO_FIELD_ORDER: [AccountField; 3] = [
    AccountField::Slug,
    AccountField::Username,
    AccountField::BusinessName,
];

/// Resolves company identifiers against both tenant tables.
#[derive(Clone)]
pub struct TenantResolver {
    database: Arc<Database>,
}

impl TenantResolver {
    /// Build a resolver over the shared database handle.
    #[must_use]
    pub fn new(database: Arc<Database>) -> Self {
        Self { database }
    }

    /// Resolve `identifier` to a company handle.
    ///
    /// Standard accounts always win over trial accounts; within a string
    /// search the field order is slug, then username, then business name.
    pub async fn resolve(&self, identifier: &str, kind: SearchKind) -> Result<CompanyHandle> {
        let handle = match kind {
            SearchKind::Id => self.resolve_by_id(identifier).await?,
            SearchKind::Auto => self.resolve_by_fields(identifier, &AUTO_FIELD_ORDER).await?,
            SearchKind::Slug => {
                self.resolve_by_fields(identifier, &[AccountField::Slug])
                    .await?
            }
            SearchKind::Username => {
                self.resolve_by_fields(identifier, &[AccountField::Username])
                    .await?
            }
            SearchKind::Name => {
                self.resolve_by_fields(identifier, &[AccountField::BusinessName])
                    .await?
            }
        };

        match handle {
            Some(handle) => {
                debug!(
                    company_id = handle.company.id,
                    tenant_kind = handle.company.kind.as_str(),
                    "resolved company identifier"
                );
                Ok(handle)
            }
            None => Err(EngineError::not_found(
                "company",
                format!("no company matches identifier '{identifier}'"),
            )),
        }
    }

    async fn resolve_by_id(&self, identifier: &str) -> Result<Option<CompanyHandle>> {
        let id: i64 = identifier.parse().map_err(|_| {
            EngineError::validation(
                "identifier",
                format!("'{identifier}' is not a numeric company id"),
            )
        })?;

        if let Some(record) = self.database.standard_account_by_id(id).await? {
            return Ok(Some(CompanyHandle::from_record(TenantKind::Standard, record)));
        }
        if let Some(record) = self.database.trial_account_by_id(id).await? {
            return Ok(Some(CompanyHandle::from_record(TenantKind::Trial, record)));
        }
        Ok(None)
    }

    /// Probe the standard table across all requested fields before touching
    /// the trial table at all (a standard match on a later field beats a
    /// trial match on an earlier one).
    async fn resolve_by_fields(
        &self,
        identifier: &str,
        fields: &[AccountField],
    ) -> Result<Option<CompanyHandle>> {
        for &field in fields {
            if let Some(record) = self
                .database
                .standard_account_by_field(field, identifier)
                .await?
            {
                return Ok(Some(CompanyHandle::from_record(TenantKind::Standard, record)));
            }
        }
        for &field in fields {
            if let Some(record) = self
                .database
                .trial_account_by_field(field, identifier)
                .await?
            {
                return Ok(Some(CompanyHandle::from_record(TenantKind::Trial, record)));
            }
        }
        Ok(None)
    }
}
