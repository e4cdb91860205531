// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Request Signature Validation
//!
//! The flow platform signs every webhook body with HMAC-SHA256 keyed by the
//! app secret and sends the hex digest as `x-hub-signature-256: sha256=<hex>`.
//! Digests are compared as fixed 32-byte values in constant time.

use super::error::CryptoError;
use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::{Choice, ConstantTimeEq};
use tracing::warn;

/// Header carrying the request HMAC
pub const SIGNATURE_HEADER: &str = "x-hub-signature-256";

const SIGNATURE_PREFIX: &str = "sha256=";

/// HMAC-SHA256 output; equality is constant-time
#[derive(Clone, Copy)]
pub struct Sha256Digest([u8; 32]);

impl Sha256Digest {
    pub fn from_hex(value: &str) -> Result<Self, CryptoError> {
        let bytes = hex::decode(value.trim()).map_err(|e| CryptoError::InvalidSignature {
            reason: format!("hex decode error: {}", e),
        })?;
        if bytes.len() != 32 {
            return Err(CryptoError::InvalidSignature {
                reason: format!("expected 32-byte digest, got {} bytes", bytes.len()),
            });
        }
        let mut digest = [0u8; 32];
        digest.copy_from_slice(&bytes);
        Ok(Self(digest))
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl ConstantTimeEq for Sha256Digest {
    fn ct_eq(&self, other: &Self) -> Choice {
        self.0[..].ct_eq(&other.0[..])
    }
}

impl PartialEq for Sha256Digest {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for Sha256Digest {}

impl std::fmt::Debug for Sha256Digest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sha256Digest({})", self.to_hex())
    }
}

/// HMAC-SHA256 of `body` keyed with `app_secret`
pub fn compute_signature(body: &[u8], app_secret: &str) -> Result<Sha256Digest, CryptoError> {
    let mut mac = <Hmac<Sha256> as Mac>::new_from_slice(app_secret.as_bytes()).map_err(|e| {
        CryptoError::InvalidSignature {
            reason: format!("failed to key HMAC: {}", e),
        }
    })?;
    mac.update(body);

    let mut digest = [0u8; 32];
    digest.copy_from_slice(&mac.finalize().into_bytes());
    Ok(Sha256Digest(digest))
}

/// Header value (`sha256=<hex>`) the platform would send for `body`
pub fn signature_header_value(body: &[u8], app_secret: &str) -> Result<String, CryptoError> {
    Ok(format!(
        "{}{}",
        SIGNATURE_PREFIX,
        compute_signature(body, app_secret)?.to_hex()
    ))
}

/// Validate the request signature over the raw body
///
/// - No app secret configured: validation is skipped and always succeeds
/// - App secret configured, header missing: fails
/// - Otherwise: HMAC-SHA256 of `raw_body` must equal the header digest
pub fn validate_signature(
    raw_body: &[u8],
    signature_header: Option<&str>,
    app_secret: Option<&str>,
) -> bool {
    let app_secret = match app_secret.filter(|s| !s.is_empty()) {
        Some(secret) => secret,
        None => {
            warn!("App secret is not set up. Skipping signature validation.");
            return true;
        }
    };

    let header = match signature_header {
        Some(header) => header,
        None => {
            warn!("Missing {} header", SIGNATURE_HEADER);
            return false;
        }
    };

    let provided = header.strip_prefix(SIGNATURE_PREFIX).unwrap_or(header);
    let provided = match Sha256Digest::from_hex(provided) {
        Ok(digest) => digest,
        Err(e) => {
            warn!("Rejecting malformed {} header: {}", SIGNATURE_HEADER, e);
            return false;
        }
    };

    match compute_signature(raw_body, app_secret) {
        Ok(expected) => expected == provided,
        Err(e) => {
            warn!("Failed to compute request signature: {}", e);
            false
        }
    }
}
