// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Router fixtures and a counterparty that seals requests like the flow
//! platform does

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use flow_endpoint_node::api::{create_app, AppState, RequestHandler};
use flow_endpoint_node::crypto::{
    open_response, seal_request, signature_header_value, AesKeySize, FlowPrivateKey,
    SessionKeyMaterial, SIGNATURE_HEADER,
};
use flow_endpoint_node::flow::{ScheduleCatalog, ScreenResolver};
use flow_endpoint_node::storage::{MemoryStore, Store};
use rand::rngs::OsRng;
use rsa::{RsaPrivateKey, RsaPublicKey};
use serde_json::Value;
use std::sync::{Arc, OnceLock};
use tower::ServiceExt;

pub const APP_SECRET: &str = "test-app-secret";

static ENDPOINT_KEY: OnceLock<RsaPrivateKey> = OnceLock::new();
static FOREIGN_KEY: OnceLock<RsaPrivateKey> = OnceLock::new();

fn endpoint_rsa_key() -> &'static RsaPrivateKey {
    ENDPOINT_KEY.get_or_init(|| RsaPrivateKey::new(&mut OsRng, 1024).unwrap())
}

pub fn endpoint_key() -> FlowPrivateKey {
    FlowPrivateKey::from(endpoint_rsa_key().clone())
}

pub fn endpoint_public_key() -> RsaPublicKey {
    endpoint_rsa_key().to_public_key()
}

pub fn foreign_public_key() -> RsaPublicKey {
    FOREIGN_KEY
        .get_or_init(|| RsaPrivateKey::new(&mut OsRng, 1024).unwrap())
        .to_public_key()
}

pub struct TestEndpoint {
    pub app: Router,
    pub store: MemoryStore,
}

/// Endpoint holding the test key and `APP_SECRET`
pub fn endpoint() -> TestEndpoint {
    endpoint_with(Some(endpoint_key()), Some(APP_SECRET))
}

pub fn endpoint_with(private_key: Option<FlowPrivateKey>, app_secret: Option<&str>) -> TestEndpoint {
    let store = MemoryStore::new();
    TestEndpoint {
        app: app_with_store(private_key, app_secret, Arc::new(store.clone())),
        store,
    }
}

/// Router over an arbitrary store backend
pub fn app_with_store(
    private_key: Option<FlowPrivateKey>,
    app_secret: Option<&str>,
    store: Arc<dyn Store>,
) -> Router {
    let resolver = ScreenResolver::new(store.clone(), ScheduleCatalog::default());
    let handler = RequestHandler::new(
        private_key.map(Arc::new),
        app_secret.map(str::to_string),
        resolver,
    );
    create_app(AppState::new(handler, store))
}

/// Seal `body` for `public_key`; returns the raw envelope bytes and the
/// session needed to open the reply
pub fn seal(body: &Value, public_key: &RsaPublicKey) -> (Vec<u8>, SessionKeyMaterial) {
    let (envelope, session) = seal_request(body, public_key, AesKeySize::Aes128).unwrap();
    (serde_json::to_vec(&envelope).unwrap(), session)
}

pub fn signed_post(raw_body: Vec<u8>, secret: &str) -> Request<Body> {
    let signature = signature_header_value(&raw_body, secret).unwrap();
    Request::builder()
        .method("POST")
        .uri("/")
        .header("content-type", "application/json")
        .header(SIGNATURE_HEADER, signature)
        .body(Body::from(raw_body))
        .unwrap()
}

pub async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, bytes.to_vec())
}

/// Full counterparty exchange; returns the decrypted reply on 200
pub async fn exchange(app: &Router, body: &Value) -> (StatusCode, Option<Value>) {
    let (raw, session) = seal(body, &endpoint_public_key());
    let (status, bytes) = send(app, signed_post(raw, APP_SECRET)).await;
    if status != StatusCode::OK {
        return (status, None);
    }
    let reply: Value = serde_json::from_slice(&bytes).unwrap();
    let encrypted = reply["encrypted_response"].as_str().unwrap();
    (status, Some(open_response(encrypted, &session).unwrap()))
}
