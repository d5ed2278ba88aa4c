// ABOUTME: Integration tests for staff-facing appointment updates, status changes and listings
// ABOUTME: Covers patch semantics, price refresh, exact-tuple conflicts and company scoping
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Agendame Project

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

mod common;

use agendame::errors::EngineError;
use agendame::models::{
    AppointmentFilter, AppointmentStatus, CompanyHandle, NewAppointment, SearchKind,
};
use agendame::{
    AppointmentManager, AppointmentPatch, BookingEngine, BookingRequest, DatabaseProvider,
};
use rust_decimal::Decimal;
use std::sync::Arc;

use common::{create_test_database, future_date, seed_service, seed_standard_account};

struct Fixture {
    database: Arc<agendame::Database>,
    manager: AppointmentManager,
    engine: BookingEngine,
    handle: CompanyHandle,
    service_id: i64,
}

/// One company with a 60-minute service and a resolved handle.
async fn fixture(tag: &str) -> Fixture {
    let database = create_test_database().await.unwrap();
    let company = seed_standard_account(&database, tag).await.unwrap();
    let service_id = seed_service(&database, company, "Haircut", 60, 5000)
        .await
        .unwrap();

    let engine = BookingEngine::new(Arc::clone(&database));
    let handle = engine
        .resolver()
        .resolve(&format!("salon-{tag}"), SearchKind::Auto)
        .await
        .unwrap();

    Fixture {
        manager: AppointmentManager::new(Arc::clone(&database)),
        database,
        engine,
        handle,
        service_id,
    }
}

impl Fixture {
    async fn book_at(&self, time: &str, phone: &str) -> i64 {
        let request = BookingRequest {
            company_identifier: self.handle.business_slug.clone().unwrap(),
            search_kind: SearchKind::Auto,
            service_id: self.service_id,
            appointment_date: future_date(),
            appointment_time: time.into(),
            client_name: "Ana Souza".into(),
            client_phone: phone.into(),
            notes: None,
        };
        self.engine.book(&request).await.unwrap().appointment_id
    }
}

#[tokio::test]
async fn patching_only_the_time_leaves_everything_else_intact() {
    let fx = fixture("patchtime").await;
    let id = fx.book_at("10:00", "11999990001").await;

    let patch = AppointmentPatch {
        appointment_time: Some("15:00".into()),
        ..AppointmentPatch::default()
    };
    let view = fx.manager.update(&fx.handle, id, &patch).await.unwrap();

    assert_eq!(view.time, "15:00");
    assert_eq!(view.date, future_date());
    assert_eq!(view.client.name, "Ana Souza");
    assert_eq!(view.service.id, fx.service_id);
    assert_eq!(view.service.price, Decimal::new(5000, 2));
    assert_eq!(view.status, AppointmentStatus::Scheduled);
}

#[tokio::test]
async fn service_change_refreshes_the_price_unless_overridden() {
    let fx = fixture("patchservice").await;
    let premium = seed_service(&fx.database, fx.handle.company, "Premium Cut", 60, 9000)
        .await
        .unwrap();
    let id = fx.book_at("10:00", "11999990002").await;

    let patch = AppointmentPatch {
        service_id: Some(premium),
        ..AppointmentPatch::default()
    };
    let view = fx.manager.update(&fx.handle, id, &patch).await.unwrap();
    assert_eq!(view.service.id, premium);
    assert_eq!(view.service.price, Decimal::new(9000, 2));

    let patch = AppointmentPatch {
        price: Some(Decimal::new(7500, 2)),
        ..AppointmentPatch::default()
    };
    let view = fx.manager.update(&fx.handle, id, &patch).await.unwrap();
    assert_eq!(view.service.price, Decimal::new(7500, 2));
}

#[tokio::test]
async fn reschedule_onto_an_occupied_tuple_is_a_conflict() {
    let fx = fixture("patchconflict").await;
    let first = fx.book_at("10:00", "11999990003").await;
    let second = fx.book_at("14:00", "11999990004").await;

    let patch = AppointmentPatch {
        appointment_time: Some("10:00".into()),
        ..AppointmentPatch::default()
    };
    let err = fx
        .manager
        .update(&fx.handle, second, &patch)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::Conflict { .. }));

    // Writing the same values back onto itself is not a conflict.
    let patch = AppointmentPatch {
        appointment_time: Some("10:00".into()),
        ..AppointmentPatch::default()
    };
    fx.manager.update(&fx.handle, first, &patch).await.unwrap();
}

#[tokio::test]
async fn reschedule_skips_the_availability_pipeline() {
    let fx = fixture("patchoffgrid").await;
    let id = fx.book_at("10:00", "11999990005").await;

    // 19:30 is outside business hours and off the hourly grid; the update
    // path only checks the exact tuple, so this succeeds.
    let patch = AppointmentPatch {
        appointment_time: Some("19:30".into()),
        ..AppointmentPatch::default()
    };
    let view = fx.manager.update(&fx.handle, id, &patch).await.unwrap();
    assert_eq!(view.time, "19:30");
}

#[tokio::test]
async fn phone_change_repoints_the_appointment_at_a_new_client() {
    let fx = fixture("patchphone").await;
    let id = fx.book_at("10:00", "11999990006").await;
    let before = fx.manager.get(&fx.handle, id).await.unwrap();

    let patch = AppointmentPatch {
        client_phone: Some("11888880000".into()),
        ..AppointmentPatch::default()
    };
    let after = fx.manager.update(&fx.handle, id, &patch).await.unwrap();

    assert_eq!(after.client.phone, "11888880000");
    assert_ne!(after.client.id, before.client.id);
}

#[tokio::test]
async fn set_status_and_delete_report_missing_appointments() {
    let fx = fixture("patchstatus").await;
    let id = fx.book_at("10:00", "11999990007").await;

    fx.manager
        .set_status(&fx.handle, id, AppointmentStatus::Confirmed)
        .await
        .unwrap();
    let view = fx.manager.get(&fx.handle, id).await.unwrap();
    assert_eq!(view.status, AppointmentStatus::Confirmed);

    let err = fx
        .manager
        .set_status(&fx.handle, 9999, AppointmentStatus::Cancelled)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));

    fx.manager.delete(&fx.handle, id).await.unwrap();
    let err = fx.manager.delete(&fx.handle, id).await.unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}

#[tokio::test]
async fn listing_filters_by_status_and_paginates() {
    let fx = fixture("patchlist").await;
    let first = fx.book_at("09:00", "11999990008").await;
    fx.book_at("11:00", "11999990008").await;
    fx.book_at("13:00", "11999990008").await;

    fx.manager
        .set_status(&fx.handle, first, AppointmentStatus::Cancelled)
        .await
        .unwrap();

    let filter = AppointmentFilter {
        status: Some(AppointmentStatus::Scheduled),
        ..AppointmentFilter::default()
    };
    let page = fx.manager.list(&fx.handle, &filter).await.unwrap();
    assert_eq!(page.total, 2);
    assert_eq!(page.items.len(), 2);

    let page = fx
        .manager
        .list(&fx.handle, &AppointmentFilter::paged(1, 1))
        .await
        .unwrap();
    assert_eq!(page.total, 3);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.limit, 1);
    assert_eq!(page.offset, 1);
}

#[tokio::test]
async fn today_lists_only_the_current_date() {
    let fx = fixture("patchtoday").await;
    fx.book_at("10:00", "11999990011").await;

    // Insert a row dated today directly; the booking pipeline would reject
    // a same-day slot inside the lead window.
    let client_id = fx
        .database
        .create_client(fx.handle.company, "Bia Costa", "11999990012")
        .await
        .unwrap();
    let today = chrono::Local::now().date_naive();
    let new_appointment = NewAppointment {
        client_id,
        service_id: fx.service_id,
        appointment_date: today,
        appointment_time: "23:30".into(),
        client_name: "Bia Costa".into(),
        client_phone: "11999990012".into(),
        price: Decimal::new(5000, 2),
        notes: None,
    };
    fx.database
        .create_appointment(fx.handle.company, &new_appointment)
        .await
        .unwrap();

    let items = fx.manager.today(&fx.handle, None).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].date, today);
    assert_eq!(items[0].client.name, "Bia Costa");

    let cancelled = fx
        .manager
        .today(&fx.handle, Some(AppointmentStatus::Cancelled))
        .await
        .unwrap();
    assert!(cancelled.is_empty());
}

#[tokio::test]
async fn appointments_are_scoped_to_their_company() {
    // Two companies sharing one database; company B must not see or touch
    // company A's appointment.
    let database = create_test_database().await.unwrap();
    let company_a = seed_standard_account(&database, "sharedb-a").await.unwrap();
    let company_b = seed_standard_account(&database, "sharedb-b").await.unwrap();
    let service_a = seed_service(&database, company_a, "Haircut", 60, 5000)
        .await
        .unwrap();
    seed_service(&database, company_b, "Haircut", 60, 5000)
        .await
        .unwrap();

    let engine = BookingEngine::new(Arc::clone(&database));
    let handle_b = engine
        .resolver()
        .resolve("salon-sharedb-b", SearchKind::Auto)
        .await
        .unwrap();

    let request = BookingRequest {
        company_identifier: "salon-sharedb-a".into(),
        search_kind: SearchKind::Auto,
        service_id: service_a,
        appointment_date: future_date(),
        appointment_time: "10:00".into(),
        client_name: "Ana Souza".into(),
        client_phone: "11999990010".into(),
        notes: None,
    };
    let confirmation = engine.book(&request).await.unwrap();

    let manager = AppointmentManager::new(database);
    let err = manager
        .get(&handle_b, confirmation.appointment_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));

    let err = manager
        .delete(&handle_b, confirmation.appointment_id)
        .await
        .unwrap_err();
    assert!(matches!(err, EngineError::NotFound { .. }));
}
