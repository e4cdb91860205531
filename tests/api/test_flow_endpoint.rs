// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! End-to-end encrypted exchanges through the router

use super::helpers::{endpoint, exchange};
use axum::http::StatusCode;
use flow_endpoint_node::storage::{AppointmentFilter, Store};
use serde_json::json;

#[tokio::test]
async fn test_ping_round_trip() {
    let endpoint = endpoint();

    let (status, reply) = exchange(&endpoint.app, &json!({"version": "3.0", "action": "ping"})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply.unwrap(), json!({"data": {"status": "active"}}));
}

#[tokio::test]
async fn test_init_then_schedule_booking() {
    let endpoint = endpoint();

    let (status, screen) = exchange(
        &endpoint.app,
        &json!({"version": "3.0", "action": "INIT", "flow_token": "ft-1"}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(screen.unwrap()["screen"], "SCHEDULE");

    let (status, success) = exchange(
        &endpoint.app,
        &json!({
            "version": "3.0",
            "action": "data_exchange",
            "screen": "SCHEDULE",
            "flow_token": "ft-1",
            "data": {
                "appointment_type": "online",
                "appointment_date": "2025-01-01",
                "appointment_time": "slot_09_10"
            }
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let success = success.unwrap();
    assert_eq!(success["screen"], "SUCCESS");
    let message = success["data"]["extension_message_response"]["params"]["message"]
        .as_str()
        .unwrap();
    assert!(message.contains("09:00 - 10:00"));
    assert!(message.contains("meeting link"));

    let stored = endpoint
        .store
        .query(AppointmentFilter::default().with_flow_token("ft-1"))
        .await
        .unwrap();
    assert_eq!(stored.len(), 1);
}

#[tokio::test]
async fn test_client_error_acknowledged() {
    let endpoint = endpoint();

    let (status, reply) = exchange(
        &endpoint.app,
        &json!({"action": "data_exchange", "screen": "SCHEDULE", "data": {"error": "boom"}}),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(reply.unwrap(), json!({"data": {"acknowledged": true}}));
    assert!(endpoint.store.is_empty().await);
}
