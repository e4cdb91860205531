// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Crypto Error Types
//!
//! Error taxonomy for the encrypted flow transport. The variants are split so
//! the request handler can tell a key-rotation condition apart from every
//! other failure:
//!
//! - **KeyDecryption**: the wrapped AES key could not be recovered with our
//!   RSA private key. The counterparty answers this by re-fetching our public
//!   key, so it maps to its own status code.
//! - **PayloadDecryption**: IV or ciphertext malformed, or the GCM tag did
//!   not verify.
//! - **MalformedBody**: the plaintext is not JSON of the expected shape.
//! - **Encryption**: the response could not be sealed.
//! - **InvalidKey**: the configured private key could not be loaded.
//! - **InvalidSignature**: the request HMAC could not be computed or parsed.
//!
//! ## Usage Example
//!
//! ```rust
//! use flow_endpoint_node::crypto::CryptoError;
//!
//! let err = CryptoError::KeyDecryption {
//!     reason: "OAEP decryption error".to_string(),
//! };
//! assert!(err.is_key_rotation_signal());
//! ```

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CryptoError {
    /// RSA-OAEP unwrapping of `encrypted_aes_key` failed
    #[error("Failed to decrypt AES key: {reason}")]
    KeyDecryption { reason: String },

    /// AES-GCM decryption of `encrypted_flow_data` failed
    ///
    /// Covers bad base64, a wrong-sized IV, a blob shorter than the tag and
    /// authentication tag mismatch.
    #[error("Failed to decrypt flow data ({field}): {reason}")]
    PayloadDecryption { field: String, reason: String },

    /// Decrypted bytes are not UTF-8 JSON of the expected shape
    #[error("Malformed request body: {reason}")]
    MalformedBody { reason: String },

    /// Response serialization or sealing failed
    #[error("Failed to encrypt response: {reason}")]
    Encryption { reason: String },

    /// Private or public key could not be parsed
    #[error("Invalid key ({key_type}): {reason}")]
    InvalidKey { key_type: String, reason: String },

    /// Request signature could not be computed or decoded
    #[error("Invalid signature: {reason}")]
    InvalidSignature { reason: String },
}

impl CryptoError {
    pub(crate) fn payload(field: &str, reason: impl Into<String>) -> Self {
        CryptoError::PayloadDecryption {
            field: field.to_string(),
            reason: reason.into(),
        }
    }

    /// True when the counterparty should refresh our public key and retry
    pub fn is_key_rotation_signal(&self) -> bool {
        matches!(self, CryptoError::KeyDecryption { .. })
    }
}

impl From<serde_json::Error> for CryptoError {
    fn from(err: serde_json::Error) -> Self {
        CryptoError::MalformedBody {
            reason: err.to_string(),
        }
    }
}

impl From<rsa::Error> for CryptoError {
    fn from(err: rsa::Error) -> Self {
        CryptoError::KeyDecryption {
            reason: err.to_string(),
        }
    }
}
