// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Counterparty Side of the Envelope Protocol
//!
//! What the flow platform does on its end: generate a fresh AES key and IV per
//! request, wrap the key with our RSA public key, and open our responses with
//! the flipped IV. Used by `flow-cli` and by the test suites.

use super::aes_gcm::{decrypt_aes_gcm, encrypt_aes_gcm};
use super::envelope::{decode_field, parse_body, EncryptedEnvelope};
use super::error::CryptoError;
use super::session_keys::{AesKeySize, SessionKeyMaterial};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use rand::rngs::OsRng;
use rsa::{pkcs8::DecodePublicKey, Oaep, RsaPublicKey};
use serde::{de::DeserializeOwned, Serialize};
use sha2::Sha256;

/// Parse an SPKI (`BEGIN PUBLIC KEY`) PEM
pub fn public_key_from_pem(pem: &str) -> Result<RsaPublicKey, CryptoError> {
    RsaPublicKey::from_public_key_pem(pem.trim()).map_err(|e| CryptoError::InvalidKey {
        key_type: "rsa_public_key".to_string(),
        reason: e.to_string(),
    })
}

/// Encrypt `body` into an envelope addressed to `public_key`
///
/// Returns the envelope and the session material the caller keeps to open
/// the response.
pub fn seal_request<T: Serialize + ?Sized>(
    body: &T,
    public_key: &RsaPublicKey,
    key_size: AesKeySize,
) -> Result<(EncryptedEnvelope, SessionKeyMaterial), CryptoError> {
    let session = SessionKeyMaterial::generate(key_size);

    let wrapped_key = public_key
        .encrypt(&mut OsRng, Oaep::new::<Sha256>(), session.aes_key().as_bytes())
        .map_err(|e| CryptoError::Encryption {
            reason: format!("RSA-OAEP key wrap failed: {}", e),
        })?;

    let plaintext = serde_json::to_vec(body).map_err(|e| CryptoError::Encryption {
        reason: format!("failed to serialize request: {}", e),
    })?;
    let sealed = encrypt_aes_gcm(session.aes_key(), session.iv(), &plaintext)?;

    let envelope = EncryptedEnvelope {
        encrypted_flow_data: STANDARD.encode(sealed),
        encrypted_aes_key: STANDARD.encode(wrapped_key),
        initial_vector: STANDARD.encode(session.iv().as_bytes()),
    };
    Ok((envelope, session))
}

/// Decrypt an `encrypted_response` produced for `session`
pub fn open_response<T: DeserializeOwned>(
    encrypted_response: &str,
    session: &SessionKeyMaterial,
) -> Result<T, CryptoError> {
    let sealed = decode_field("encrypted_response", encrypted_response)?;
    let plaintext = decrypt_aes_gcm(session.aes_key(), &session.iv().flipped(), &sealed)?;
    parse_body(&plaintext)
}
