// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Per-request Session Key Material
//!
//! Every envelope carries its own AES key (wrapped with our RSA public key)
//! and IV. Both are recovered once, used to decrypt the request and then to
//! encrypt the response, and dropped with the request.
//!
//! ## Security Considerations
//!
//! - Key material is never persisted, cached or shared between requests
//! - `SessionKeyMaterial` is not `Clone`; sealing the response consumes it
//! - `Debug` output never contains key or IV bytes

use super::error::CryptoError;
use rand::{rngs::OsRng, RngCore};
use std::fmt;

/// IV size used by the flow protocol (AES-GCM with a 128-bit nonce)
pub const FLOW_IV_LEN: usize = 16;

/// Symmetric key recovered from `encrypted_aes_key`
#[derive(PartialEq, Eq)]
pub enum AesKey {
    Aes128([u8; 16]),
    Aes256([u8; 32]),
}

/// Key sizes a counterparty may generate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AesKeySize {
    Aes128,
    Aes256,
}

impl AesKey {
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        match bytes.len() {
            16 => {
                let mut key = [0u8; 16];
                key.copy_from_slice(bytes);
                Ok(AesKey::Aes128(key))
            }
            32 => {
                let mut key = [0u8; 32];
                key.copy_from_slice(bytes);
                Ok(AesKey::Aes256(key))
            }
            n => Err(CryptoError::KeyDecryption {
                reason: format!("AES key must be 16 or 32 bytes, got {}", n),
            }),
        }
    }

    pub fn generate(size: AesKeySize) -> Self {
        match size {
            AesKeySize::Aes128 => {
                let mut key = [0u8; 16];
                OsRng.fill_bytes(&mut key);
                AesKey::Aes128(key)
            }
            AesKeySize::Aes256 => {
                let mut key = [0u8; 32];
                OsRng.fill_bytes(&mut key);
                AesKey::Aes256(key)
            }
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            AesKey::Aes128(key) => key,
            AesKey::Aes256(key) => key,
        }
    }

    pub fn size(&self) -> AesKeySize {
        match self {
            AesKey::Aes128(_) => AesKeySize::Aes128,
            AesKey::Aes256(_) => AesKeySize::Aes256,
        }
    }
}

impl fmt::Debug for AesKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AesKey::{:?}(<redacted>)", self.size())
    }
}

/// 16-byte AES-GCM nonce from `initial_vector`
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct InitialVector([u8; FLOW_IV_LEN]);

impl InitialVector {
    pub fn new(bytes: [u8; FLOW_IV_LEN]) -> Self {
        Self(bytes)
    }

    pub fn from_slice(bytes: &[u8]) -> Result<Self, CryptoError> {
        if bytes.len() != FLOW_IV_LEN {
            return Err(CryptoError::payload(
                "initial_vector",
                format!("expected {} bytes, got {}", FLOW_IV_LEN, bytes.len()),
            ));
        }
        let mut iv = [0u8; FLOW_IV_LEN];
        iv.copy_from_slice(bytes);
        Ok(Self(iv))
    }

    pub fn generate() -> Self {
        let mut iv = [0u8; FLOW_IV_LEN];
        OsRng.fill_bytes(&mut iv);
        Self(iv)
    }

    /// One's complement of every byte. Responses are sealed under this IV so
    /// the same (key, IV) pair never encrypts two messages.
    pub fn flipped(&self) -> Self {
        let mut out = self.0;
        for byte in out.iter_mut() {
            *byte = !*byte;
        }
        Self(out)
    }

    pub fn as_bytes(&self) -> &[u8; FLOW_IV_LEN] {
        &self.0
    }
}

impl fmt::Debug for InitialVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InitialVector(<redacted>)")
    }
}

/// AES key and IV belonging to exactly one request
pub struct SessionKeyMaterial {
    aes_key: AesKey,
    iv: InitialVector,
}

impl SessionKeyMaterial {
    pub fn new(aes_key: AesKey, iv: InitialVector) -> Self {
        Self { aes_key, iv }
    }

    /// Build from raw bytes, e.g. values printed by `flow-cli seal`
    pub fn from_parts(aes_key: &[u8], iv: &[u8]) -> Result<Self, CryptoError> {
        Ok(Self {
            aes_key: AesKey::from_slice(aes_key)?,
            iv: InitialVector::from_slice(iv)?,
        })
    }

    /// Fresh random material, as generated by the counterparty for each request
    pub fn generate(size: AesKeySize) -> Self {
        Self {
            aes_key: AesKey::generate(size),
            iv: InitialVector::generate(),
        }
    }

    pub fn aes_key(&self) -> &AesKey {
        &self.aes_key
    }

    pub fn iv(&self) -> &InitialVector {
        &self.iv
    }
}

impl fmt::Debug for SessionKeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionKeyMaterial")
            .field("aes_key", &self.aes_key)
            .field("iv", &self.iv)
            .finish()
    }
}
