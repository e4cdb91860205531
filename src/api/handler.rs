// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Webhook Request Pipeline
//!
//! verify signature → decrypt → resolve → encrypt
//!
//! Each call works on request-scoped values only. The single await point is
//! the store write inside the resolver, so dropping the future between steps
//! leaves nothing half-done.

use super::errors::EndpointError;
use crate::crypto::{
    decrypt_request, encrypt_response, validate_signature, EncryptedEnvelope, FlowPrivateKey,
};
use crate::flow::{DecryptedBody, ScreenResolver};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Successful webhook response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EncryptedResponse {
    pub encrypted_response: String,
}

#[derive(Clone)]
pub struct RequestHandler {
    private_key: Option<Arc<FlowPrivateKey>>,
    app_secret: Option<String>,
    resolver: ScreenResolver,
}

impl RequestHandler {
    pub fn new(
        private_key: Option<Arc<FlowPrivateKey>>,
        app_secret: Option<String>,
        resolver: ScreenResolver,
    ) -> Self {
        if private_key.is_none() {
            warn!("⚠️ No private key configured - flow requests will be rejected");
        }
        if app_secret.as_deref().map_or(true, str::is_empty) {
            warn!("⚠️ APP_SECRET not set - request signature validation is disabled");
        }
        Self {
            private_key,
            app_secret: app_secret.filter(|s| !s.is_empty()),
            resolver,
        }
    }

    pub fn resolver(&self) -> &ScreenResolver {
        &self.resolver
    }

    /// Run the full pipeline over the raw request body
    pub async fn handle(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<EncryptedResponse, EndpointError> {
        let result = self.process(raw_body, signature_header).await;
        if let Err(e) = &result {
            match e {
                EndpointError::SignatureInvalid => warn!("❌ Rejected flow request: {}", e),
                EndpointError::KeyDecryption(_) => {
                    warn!("🔑 Key decryption failed, signalling key refresh: {}", e)
                }
                _ if e.carries_request_content() => {
                    error!("❌ Flow request failed ({})", e.kind());
                    debug!("Flow request failure detail: {}", e);
                }
                _ => error!("❌ Flow request failed ({}): {}", e.kind(), e),
            }
        }
        result
    }

    async fn process(
        &self,
        raw_body: &[u8],
        signature_header: Option<&str>,
    ) -> Result<EncryptedResponse, EndpointError> {
        let private_key = self
            .private_key
            .as_ref()
            .ok_or_else(|| EndpointError::Configuration("Private key is missing".to_string()))?;

        if !validate_signature(raw_body, signature_header, self.app_secret.as_deref()) {
            return Err(EndpointError::SignatureInvalid);
        }

        let envelope: EncryptedEnvelope = serde_json::from_slice(raw_body)
            .map_err(|e| EndpointError::MalformedBody(format!("invalid envelope: {}", e)))?;

        let decrypted = decrypt_request::<DecryptedBody>(&envelope, private_key)?;
        debug!(
            "🔓 Decrypted flow request: action={}, screen={:?}",
            decrypted.body.action, decrypted.body.screen
        );

        let response = self.resolver.resolve(&decrypted.body).await?;

        let encrypted_response = encrypt_response(&response, decrypted.session)?;
        info!("✅ Flow request handled");
        Ok(EncryptedResponse { encrypted_response })
    }
}

impl fmt::Debug for RequestHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestHandler")
            .field("private_key", &self.private_key.is_some())
            .field("signing_enabled", &self.app_secret.is_some())
            .finish()
    }
}
