// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Encrypted Flow Transport
//!
//! Cryptographic primitives for the flow webhook:
//!
//! - **Private Key**: RSA private key loading and OAEP (SHA-256) key unwrap
//! - **AES-GCM**: payload encryption with a 16-byte IV and appended tag
//! - **Envelope**: request decryption and response sealing
//! - **Signature**: HMAC-SHA256 request authentication, constant-time compare
//! - **Counterparty**: the platform side of the protocol, for tooling and tests
//!
//! ## Security Considerations
//!
//! - AES key and IV are request-scoped and never persisted
//! - Responses are sealed under the bitwise-flipped request IV
//! - Signature digests are compared in constant time
//!
//! ## Protocol Flow
//!
//! 1. Platform generates a random AES key and 16-byte IV per request
//! 2. Platform wraps the AES key with our RSA public key (OAEP, SHA-256)
//! 3. Platform encrypts the flow payload with AES-GCM and signs the HTTP body
//! 4. Node verifies the HMAC, unwraps the key, decrypts the payload
//! 5. Node seals the response with the same key and the flipped IV

pub mod aes_gcm;
pub mod counterparty;
pub mod envelope;
pub mod error;
pub mod private_key;
pub mod session_keys;
pub mod signature;

pub use aes_gcm::{decrypt_aes_gcm, encrypt_aes_gcm, GCM_TAG_LEN};
pub use counterparty::{open_response, public_key_from_pem, seal_request};
pub use envelope::{decrypt_request, encrypt_response, DecryptedRequest, EncryptedEnvelope};
pub use error::CryptoError;
pub use private_key::FlowPrivateKey;
pub use session_keys::{AesKey, AesKeySize, InitialVector, SessionKeyMaterial, FLOW_IV_LEN};
pub use signature::{
    compute_signature, signature_header_value, validate_signature, Sha256Digest, SIGNATURE_HEADER,
};
