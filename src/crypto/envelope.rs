// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encrypted Flow Envelope
//!
//! Request side of the hybrid transport:
//!
//! 1. base64-decode `encrypted_aes_key`, unwrap with RSA-OAEP-SHA256
//! 2. base64-decode `initial_vector` (16 bytes)
//! 3. base64-decode `encrypted_flow_data`, split off the 16-byte GCM tag
//! 4. AES-GCM decrypt, parse JSON
//!
//! The response is sealed with the same AES key under the flipped IV and
//! returned as base64 of `ciphertext | tag`.

use super::aes_gcm::{decrypt_aes_gcm, encrypt_aes_gcm};
use super::error::CryptoError;
use super::private_key::FlowPrivateKey;
use super::session_keys::{InitialVector, SessionKeyMaterial};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{de::DeserializeOwned, Deserialize, Serialize};

/// Encrypted request body posted by the flow platform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedEnvelope {
    pub encrypted_flow_data: String,
    pub encrypted_aes_key: String,
    pub initial_vector: String,
}

/// Decrypted request plus the key material needed to seal its response
#[derive(Debug)]
pub struct DecryptedRequest<T = serde_json::Value> {
    pub body: T,
    pub session: SessionKeyMaterial,
}

/// Decrypt an envelope with the endpoint's private key
///
/// # Errors
///
/// - `KeyDecryption` if the AES key cannot be recovered (counterparty must
///   refresh our public key)
/// - `PayloadDecryption` if the IV or ciphertext is malformed or the tag fails
/// - `MalformedBody` if the plaintext is not JSON deserializable into `T`
pub fn decrypt_request<T: DeserializeOwned>(
    envelope: &EncryptedEnvelope,
    private_key: &FlowPrivateKey,
) -> Result<DecryptedRequest<T>, CryptoError> {
    let wrapped_key = STANDARD
        .decode(envelope.encrypted_aes_key.trim())
        .map_err(|e| CryptoError::KeyDecryption {
            reason: format!("encrypted_aes_key is not valid base64: {}", e),
        })?;
    let aes_key = private_key.unwrap_aes_key(&wrapped_key)?;

    let iv_bytes = decode_field("initial_vector", &envelope.initial_vector)?;
    let iv = InitialVector::from_slice(&iv_bytes)?;

    let sealed = decode_field("encrypted_flow_data", &envelope.encrypted_flow_data)?;
    let plaintext = decrypt_aes_gcm(&aes_key, &iv, &sealed)?;

    let body = parse_body(&plaintext)?;
    Ok(DecryptedRequest {
        body,
        session: SessionKeyMaterial::new(aes_key, iv),
    })
}

/// Seal a response for the request that produced `session`
///
/// Consumes the session so its key material cannot seal anything else.
pub fn encrypt_response<R: Serialize + ?Sized>(
    response: &R,
    session: SessionKeyMaterial,
) -> Result<String, CryptoError> {
    let plaintext = serde_json::to_vec(response).map_err(|e| CryptoError::Encryption {
        reason: format!("failed to serialize response: {}", e),
    })?;
    let sealed = encrypt_aes_gcm(session.aes_key(), &session.iv().flipped(), &plaintext)?;
    Ok(STANDARD.encode(sealed))
}

pub(crate) fn decode_field(field: &str, value: &str) -> Result<Vec<u8>, CryptoError> {
    STANDARD
        .decode(value.trim())
        .map_err(|e| CryptoError::payload(field, format!("invalid base64: {}", e)))
}

pub(crate) fn parse_body<T: DeserializeOwned>(plaintext: &[u8]) -> Result<T, CryptoError> {
    let text = std::str::from_utf8(plaintext).map_err(|e| CryptoError::MalformedBody {
        reason: format!("decrypted data is not valid UTF-8: {}", e),
    })?;
    Ok(serde_json::from_str(text)?)
}
