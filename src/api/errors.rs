// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::crypto::CryptoError;
use crate::flow::FlowError;
use crate::storage::StoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Status the flow platform treats as "refresh the endpoint public key"
pub const KEY_ROTATION_STATUS: u16 = 421;
/// Status the flow platform expects for a bad request signature
pub const SIGNATURE_INVALID_STATUS: u16 = 432;

/// Failure of the webhook pipeline
///
/// Detail stays server-side: responses carry only the status code.
#[derive(Error, Debug)]
pub enum EndpointError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Request signature is invalid")]
    SignatureInvalid,

    #[error("Key decryption failed: {0}")]
    KeyDecryption(String),

    #[error("Payload decryption failed: {0}")]
    PayloadDecryption(String),

    #[error("Malformed body: {0}")]
    MalformedBody(String),

    #[error("Unhandled action: {0}")]
    UnhandledAction(String),

    #[error("Unhandled screen: {0}")]
    UnhandledScreen(String),

    #[error("Store error: {0}")]
    Store(String),

    #[error("Encryption failed: {0}")]
    Encryption(String),
}

impl EndpointError {
    pub fn status_code(&self) -> u16 {
        match self {
            EndpointError::SignatureInvalid => SIGNATURE_INVALID_STATUS,
            EndpointError::KeyDecryption(_) => KEY_ROTATION_STATUS,
            EndpointError::Configuration(_)
            | EndpointError::PayloadDecryption(_)
            | EndpointError::MalformedBody(_)
            | EndpointError::UnhandledAction(_)
            | EndpointError::UnhandledScreen(_)
            | EndpointError::Store(_)
            | EndpointError::Encryption(_) => 500,
        }
    }

    /// True when the message echoes decrypted request values
    pub fn carries_request_content(&self) -> bool {
        matches!(
            self,
            EndpointError::MalformedBody(_)
                | EndpointError::UnhandledAction(_)
                | EndpointError::UnhandledScreen(_)
        )
    }

    /// Short machine-readable kind for logs
    pub fn kind(&self) -> &'static str {
        match self {
            EndpointError::Configuration(_) => "configuration_error",
            EndpointError::SignatureInvalid => "signature_invalid",
            EndpointError::KeyDecryption(_) => "key_decryption_error",
            EndpointError::PayloadDecryption(_) => "payload_decryption_error",
            EndpointError::MalformedBody(_) => "malformed_body",
            EndpointError::UnhandledAction(_) => "unhandled_action",
            EndpointError::UnhandledScreen(_) => "unhandled_screen",
            EndpointError::Store(_) => "store_error",
            EndpointError::Encryption(_) => "encryption_error",
        }
    }
}

impl From<CryptoError> for EndpointError {
    fn from(err: CryptoError) -> Self {
        match err {
            CryptoError::KeyDecryption { .. } => EndpointError::KeyDecryption(err.to_string()),
            CryptoError::PayloadDecryption { .. } => {
                EndpointError::PayloadDecryption(err.to_string())
            }
            CryptoError::MalformedBody { .. } => EndpointError::MalformedBody(err.to_string()),
            CryptoError::Encryption { .. } => EndpointError::Encryption(err.to_string()),
            CryptoError::InvalidKey { .. } => EndpointError::Configuration(err.to_string()),
            CryptoError::InvalidSignature { .. } => EndpointError::SignatureInvalid,
        }
    }
}

impl From<FlowError> for EndpointError {
    fn from(err: FlowError) -> Self {
        match err {
            FlowError::UnhandledAction { action } => EndpointError::UnhandledAction(action),
            FlowError::UnhandledScreen { screen } => EndpointError::UnhandledScreen(screen),
            FlowError::MissingField { .. } => EndpointError::MalformedBody(err.to_string()),
            FlowError::Store(e) => EndpointError::Store(e.to_string()),
        }
    }
}

impl From<StoreError> for EndpointError {
    fn from(err: StoreError) -> Self {
        EndpointError::Store(err.to_string())
    }
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        status.into_response()
    }
}
