// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! AES-GCM for Flow Payloads
//!
//! The flow protocol uses AES-GCM with a 128-bit (16-byte) IV rather than the
//! usual 96-bit nonce, and either a 128- or 256-bit key depending on what the
//! counterparty generated.
//!
//! **Encryption Format**:
//! ```text
//! [ciphertext (variable length) | tag (16 bytes)]
//! ```
//!
//! - IV: 16 bytes, carried separately in the envelope
//! - Tag: 16 bytes, appended to the ciphertext
//! - No Additional Authenticated Data (AAD)

use super::error::CryptoError;
use super::session_keys::{AesKey, InitialVector};
use aes_gcm::{
    aead::{consts::U16, generic_array::GenericArray, AeadInPlace, KeyInit},
    aes::{Aes128, Aes256},
    AesGcm,
};

/// GCM authentication tag length
pub const GCM_TAG_LEN: usize = 16;

type Aes128Gcm16 = AesGcm<Aes128, U16>;
type Aes256Gcm16 = AesGcm<Aes256, U16>;

enum FlowCipher {
    Aes128(Aes128Gcm16),
    Aes256(Aes256Gcm16),
}

impl FlowCipher {
    fn new(key: &AesKey) -> Result<Self, CryptoError> {
        let cipher = match key {
            AesKey::Aes128(k) => Aes128Gcm16::new_from_slice(k).map(FlowCipher::Aes128),
            AesKey::Aes256(k) => Aes256Gcm16::new_from_slice(k).map(FlowCipher::Aes256),
        };
        cipher.map_err(|e| CryptoError::Encryption {
            reason: format!("Failed to create AES-GCM cipher: {}", e),
        })
    }
}

/// Encrypt `plaintext` and append the 16-byte tag
pub fn encrypt_aes_gcm(
    key: &AesKey,
    iv: &InitialVector,
    plaintext: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    let cipher = FlowCipher::new(key)?;
    let nonce = GenericArray::from_slice(iv.as_bytes());

    let mut buffer = plaintext.to_vec();
    let tag = match &cipher {
        FlowCipher::Aes128(c) => c.encrypt_in_place_detached(nonce, b"", &mut buffer),
        FlowCipher::Aes256(c) => c.encrypt_in_place_detached(nonce, b"", &mut buffer),
    }
    .map_err(|e| CryptoError::Encryption {
        reason: format!("AES-GCM encryption failed: {}", e),
    })?;

    buffer.extend_from_slice(&tag);
    Ok(buffer)
}

/// Split the trailing tag off `sealed` and decrypt
///
/// # Errors
///
/// Returns `CryptoError::PayloadDecryption` if:
/// - `sealed` is shorter than the tag
/// - Authentication tag verification fails (wrong key, wrong IV or tampered data)
pub fn decrypt_aes_gcm(
    key: &AesKey,
    iv: &InitialVector,
    sealed: &[u8],
) -> Result<Vec<u8>, CryptoError> {
    if sealed.len() < GCM_TAG_LEN {
        return Err(CryptoError::payload(
            "encrypted_flow_data",
            format!(
                "expected at least {} bytes for the authentication tag, got {}",
                GCM_TAG_LEN,
                sealed.len()
            ),
        ));
    }

    let (ciphertext, tag) = sealed.split_at(sealed.len() - GCM_TAG_LEN);
    let cipher = FlowCipher::new(key)
        .map_err(|e| CryptoError::payload("encrypted_aes_key", e.to_string()))?;
    let nonce = GenericArray::from_slice(iv.as_bytes());
    let tag = GenericArray::from_slice(tag);

    let mut buffer = ciphertext.to_vec();
    match &cipher {
        FlowCipher::Aes128(c) => c.decrypt_in_place_detached(nonce, b"", &mut buffer, tag),
        FlowCipher::Aes256(c) => c.decrypt_in_place_detached(nonce, b"", &mut buffer, tag),
    }
    .map_err(|_| {
        CryptoError::payload(
            "encrypted_flow_data",
            "authentication tag mismatch (wrong key, wrong IV or corrupted data)",
        )
    })?;

    Ok(buffer)
}
