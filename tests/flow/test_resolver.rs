// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Booking flow screen transitions against an in-memory store

use flow_endpoint_node::flow::{DecryptedBody, FlowError, ScheduleCatalog, ScreenResolver};
use flow_endpoint_node::storage::{
    AppointmentFilter, AppointmentStatus, MemoryStore, Store, DEFAULT_NOTES,
};
use serde_json::{json, Value};
use std::sync::Arc;

fn setup() -> (ScreenResolver, MemoryStore) {
    let store = MemoryStore::new();
    let resolver = ScreenResolver::new(Arc::new(store.clone()), ScheduleCatalog::default());
    (resolver, store)
}

fn body(value: Value) -> DecryptedBody {
    serde_json::from_value(value).unwrap()
}

fn schedule_submission(data: Value) -> DecryptedBody {
    body(json!({
        "version": "3.0",
        "action": "data_exchange",
        "screen": "SCHEDULE",
        "flow_token": "flow-token-42",
        "data": data
    }))
}

fn confirmation_message(response: &Value) -> &str {
    response["data"]["extension_message_response"]["params"]["message"]
        .as_str()
        .unwrap()
}

#[tokio::test]
async fn test_ping_and_health_check_report_active() {
    let (resolver, _) = setup();

    for action in ["ping", "health_check"] {
        let response = resolver
            .resolve(&body(json!({"version": "3.0", "action": action})))
            .await
            .unwrap();
        assert_eq!(response, json!({"data": {"status": "active"}}));
    }
}

#[tokio::test]
async fn test_client_error_is_acknowledged() {
    let (resolver, store) = setup();

    let response = resolver
        .resolve(&body(json!({
            "action": "data_exchange",
            "screen": "SCHEDULE",
            "data": {"error": "invalid-screen-transition"}
        })))
        .await
        .unwrap();

    assert_eq!(response, json!({"data": {"acknowledged": true}}));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_init_returns_schedule_screen() {
    let (resolver, _) = setup();

    let response = resolver
        .resolve(&body(json!({"version": "3.0", "action": "INIT", "flow_token": "t"})))
        .await
        .unwrap();

    assert_eq!(response["screen"], "SCHEDULE");
    let slots = response["data"]["appointment_time"].as_array().unwrap();
    assert_eq!(slots[0], json!({"id": "slot_09_10", "title": "09:00 - 10:00"}));
    assert!(response["data"]["appointment_type"].as_array().unwrap().len() >= 2);
    assert!(response["data"]["gender"].is_array());
}

#[tokio::test]
async fn test_back_matches_init() {
    let (resolver, _) = setup();

    let init = resolver
        .resolve(&body(json!({"action": "INIT"})))
        .await
        .unwrap();
    let back = resolver
        .resolve(&body(json!({"action": "BACK", "screen": "SUCCESS"})))
        .await
        .unwrap();
    assert_eq!(init, back);
}

#[tokio::test]
async fn test_online_booking_persists_and_confirms() {
    let (resolver, store) = setup();

    let response = resolver
        .resolve(&schedule_submission(json!({
            "appointment_type": "online",
            "gender": "female",
            "appointment_date": "2025-01-01",
            "appointment_time": "slot_09_10",
            "notes": "First visit"
        })))
        .await
        .unwrap();

    assert_eq!(response["screen"], "SUCCESS");
    let params = &response["data"]["extension_message_response"]["params"];
    assert_eq!(params["flow_token"], "flow-token-42");
    assert_eq!(params["appointment_confirmed"], true);

    let message = confirmation_message(&response);
    assert!(message.contains("online"));
    assert!(message.contains("2025-01-01"));
    assert!(message.contains("09:00 - 10:00"));
    assert!(message.contains("meeting link"));

    let saved = store.query(AppointmentFilter::default()).await.unwrap();
    assert_eq!(saved.len(), 1);
    let record = &saved[0].record;
    assert_eq!(record.appointment_type, "online");
    assert_eq!(record.gender.as_deref(), Some("female"));
    assert_eq!(record.appointment_time, "slot_09_10");
    assert_eq!(record.notes, "First visit");
    assert_eq!(record.flow_token.as_deref(), Some("flow-token-42"));
    assert_eq!(record.status, AppointmentStatus::Pending);
}

#[tokio::test]
async fn test_in_store_booking_has_no_meeting_link() {
    let (resolver, _) = setup();

    let response = resolver
        .resolve(&schedule_submission(json!({
            "appointment_type": "in_store",
            "appointment_date": "2025-02-14",
            "appointment_time": "slot_14_15"
        })))
        .await
        .unwrap();

    let message = confirmation_message(&response);
    assert!(message.contains("14:00 - 15:00"));
    assert!(!message.contains("meeting link"));
}

#[tokio::test]
async fn test_unknown_slot_falls_back_to_raw_id() {
    let (resolver, _) = setup();

    let response = resolver
        .resolve(&schedule_submission(json!({
            "appointment_type": "online",
            "appointment_date": "2025-03-03",
            "appointment_time": "slot_22_23"
        })))
        .await
        .unwrap();

    assert!(confirmation_message(&response).contains("slot_22_23"));
}

#[tokio::test]
async fn test_missing_notes_get_default() {
    let (resolver, store) = setup();

    resolver
        .resolve(&schedule_submission(json!({
            "appointment_type": "online",
            "appointment_date": "2025-01-01",
            "appointment_time": "slot_10_11"
        })))
        .await
        .unwrap();

    let saved = store.query(AppointmentFilter::default()).await.unwrap();
    assert_eq!(saved[0].record.notes, DEFAULT_NOTES);
}

#[tokio::test]
async fn test_missing_required_field_stores_nothing() {
    let (resolver, store) = setup();

    let result = resolver
        .resolve(&schedule_submission(json!({
            "appointment_type": "online",
            "appointment_time": "slot_10_11"
        })))
        .await;

    assert!(matches!(
        result,
        Err(FlowError::MissingField { ref field, .. }) if field == "appointment_date"
    ));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_data_exchange_on_other_screen_is_unhandled() {
    let (resolver, store) = setup();

    let result = resolver
        .resolve(&body(json!({
            "action": "data_exchange",
            "screen": "PAYMENT",
            "data": {"appointment_type": "online"}
        })))
        .await;

    assert!(matches!(result, Err(FlowError::UnhandledScreen { ref screen }) if screen == "PAYMENT"));
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn test_unknown_action_is_unhandled() {
    let (resolver, _) = setup();

    let result = resolver.resolve(&body(json!({"action": "navigate"}))).await;
    assert!(matches!(result, Err(FlowError::UnhandledAction { ref action }) if action == "navigate"));
}
