// ABOUTME: Integration tests for company identifier resolution across both tenant tables
// ABOUTME: Covers field probe order, standard-over-trial precedence and id lookups
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use agendame::errors::EngineError;
use agendame::models::{NewAccount, SearchKind, TenantKind};
use agendame::{DatabaseProvider, TenantResolver};

use common::{account_payload, create_test_database, seed_standard_account, seed_trial_account};

#[tokio::test]
async fn trial_slug_resolves_when_no_standard_account_matches() {
    let database = create_test_database().await.unwrap();
    let company = seed_trial_account(&database, "trialonly").await.unwrap();

    let resolver = TenantResolver::new(database);
    let handle = resolver
        .resolve("salon-trialonly", SearchKind::Auto)
        .await
        .unwrap();

    assert_eq!(handle.company, company);
    assert_eq!(handle.company.kind, TenantKind::Trial);
    assert_eq!(handle.business_name, "Salon trialonly");
}

#[tokio::test]
async fn standard_match_on_later_field_beats_trial_match_on_earlier_field() {
    let database = create_test_database().await.unwrap();

    // Trial account whose slug is the shared identifier.
    let trial = NewAccount {
        business_slug: Some("shared-handle".into()),
        ..account_payload("trialside")
    };
    database.create_trial_account(&trial).await.unwrap();

    // Standard account matching only on username, the second probe field.
    let standard = NewAccount {
        username: "shared-handle".into(),
        business_slug: Some("elsewhere".into()),
        ..account_payload("standardside")
    };
    let standard_id = database.create_standard_account(&standard).await.unwrap();

    let resolver = TenantResolver::new(database);
    let handle = resolver
        .resolve("shared-handle", SearchKind::Auto)
        .await
        .unwrap();

    assert_eq!(handle.company.kind, TenantKind::Standard);
    assert_eq!(handle.company.id, standard_id);
}

#[tokio::test]
async fn slug_search_does_not_fall_through_to_other_fields() {
    let database = create_test_database().await.unwrap();

    let account = NewAccount {
        username: "only-a-username".into(),
        business_slug: None,
        ..account_payload("nofallthrough")
    };
    database.create_standard_account(&account).await.unwrap();

    let resolver = TenantResolver::new(database);
    let err = resolver
        .resolve("only-a-username", SearchKind::Slug)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));

    resolver
        .resolve("only-a-username", SearchKind::Username)
        .await
        .unwrap();
}

#[tokio::test]
async fn id_search_probes_standard_then_trial() {
    let database = create_test_database().await.unwrap();
    let standard = seed_standard_account(&database, "idstd").await.unwrap();

    let resolver = TenantResolver::new(database.clone());
    let handle = resolver
        .resolve(&standard.id.to_string(), SearchKind::Id)
        .await
        .unwrap();
    assert_eq!(handle.company, standard);

    // A fresh database with only a trial row still resolves by id.
    let database = create_test_database().await.unwrap();
    let trial = seed_trial_account(&database, "idtrial").await.unwrap();
    let resolver = TenantResolver::new(database);
    let handle = resolver
        .resolve(&trial.id.to_string(), SearchKind::Id)
        .await
        .unwrap();
    assert_eq!(handle.company.kind, TenantKind::Trial);
}

#[tokio::test]
async fn non_numeric_id_is_a_validation_error() {
    let database = create_test_database().await.unwrap();
    let resolver = TenantResolver::new(database);

    let err = resolver
        .resolve("not-a-number", SearchKind::Id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Validation { .. }));
}

#[tokio::test]
async fn unknown_identifier_is_not_found() {
    let database = create_test_database().await.unwrap();
    seed_standard_account(&database, "known").await.unwrap();

    let resolver = TenantResolver::new(database);
    let err = resolver
        .resolve("does-not-exist", SearchKind::Auto)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
    assert_eq!(err.http_status(), 404);
}
