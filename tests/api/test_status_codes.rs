// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Failure classes and the status codes the flow platform acts on

use super::helpers::{
    endpoint, endpoint_key, endpoint_public_key, endpoint_with, foreign_public_key, seal, send,
    signed_post, APP_SECRET,
};
use axum::{body::Body, http::Request};
use serde_json::json;

fn ping() -> serde_json::Value {
    json!({"version": "3.0", "action": "ping"})
}

#[tokio::test]
async fn test_bad_signature_is_432() {
    let endpoint = endpoint();
    let (raw, _) = seal(&ping(), &endpoint_public_key());

    let (status, body) = send(&endpoint.app, signed_post(raw, "some-other-secret")).await;
    assert_eq!(status.as_u16(), 432);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_missing_signature_is_432() {
    let endpoint = endpoint();
    let (raw, _) = seal(&ping(), &endpoint_public_key());

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::from(raw))
        .unwrap();
    let (status, _) = send(&endpoint.app, request).await;
    assert_eq!(status.as_u16(), 432);
}

#[tokio::test]
async fn test_signature_checked_before_decryption() {
    // Undecryptable body with a bad signature still reports 432
    let endpoint = endpoint();
    let (status, _) = send(&endpoint.app, signed_post(b"not json".to_vec(), "wrong")).await;
    assert_eq!(status.as_u16(), 432);
}

#[tokio::test]
async fn test_foreign_key_is_421() {
    let endpoint = endpoint();
    let (raw, _) = seal(&ping(), &foreign_public_key());

    let (status, body) = send(&endpoint.app, signed_post(raw, APP_SECRET)).await;
    assert_eq!(status.as_u16(), 421);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_no_private_key_is_500() {
    let endpoint = endpoint_with(None, Some(APP_SECRET));
    let (raw, _) = seal(&ping(), &endpoint_public_key());

    let (status, body) = send(&endpoint.app, signed_post(raw, APP_SECRET)).await;
    assert_eq!(status.as_u16(), 500);
    assert!(body.is_empty());
}

#[tokio::test]
async fn test_malformed_envelope_is_500() {
    let endpoint = endpoint();
    let raw = serde_json::to_vec(&json!({"encrypted_flow_data": "abc"})).unwrap();

    let (status, _) = send(&endpoint.app, signed_post(raw, APP_SECRET)).await;
    assert_eq!(status.as_u16(), 500);
}

#[tokio::test]
async fn test_unhandled_screen_is_500_and_stores_nothing() {
    let endpoint = endpoint();
    let (raw, _) = seal(
        &json!({"action": "data_exchange", "screen": "REVIEW", "data": {}}),
        &endpoint_public_key(),
    );

    let (status, _) = send(&endpoint.app, signed_post(raw, APP_SECRET)).await;
    assert_eq!(status.as_u16(), 500);
    assert!(endpoint.store.is_empty().await);
}

#[tokio::test]
async fn test_without_app_secret_unsigned_requests_pass() {
    let endpoint = endpoint_with(Some(endpoint_key()), None);
    let (raw, _) = seal(&ping(), &endpoint_public_key());

    let request = Request::builder()
        .method("POST")
        .uri("/")
        .body(Body::from(raw))
        .unwrap();
    let (status, _) = send(&endpoint.app, request).await;
    assert_eq!(status.as_u16(), 200);
}
