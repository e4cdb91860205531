// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Counterparty simulation commands
//!
//! `sign`, `seal` and `open` reproduce what the flow platform does so an
//! operator can exercise a running endpoint with curl.

use crate::crypto::{
    open_response, public_key_from_pem, seal_request, signature_header_value, AesKeySize,
    EncryptedEnvelope, SessionKeyMaterial, SIGNATURE_HEADER,
};
use anyhow::{anyhow, Context, Result};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use clap::Args;
use serde::Serialize;
use std::path::PathBuf;

/// Arguments for sign command
#[derive(Args, Debug)]
pub struct SignArgs {
    #[arg(long, env = "APP_SECRET", hide_env_values = true)]
    pub app_secret: String,

    /// File holding the exact request body bytes
    #[arg(long)]
    pub body: PathBuf,
}

/// Arguments for seal command
#[derive(Args, Debug)]
pub struct SealArgs {
    /// Endpoint public key (SPKI PEM)
    #[arg(long)]
    pub public_key: PathBuf,

    /// Plaintext request JSON
    #[arg(long)]
    pub body: PathBuf,

    /// Use a 256-bit AES key instead of 128-bit
    #[arg(long)]
    pub aes_256: bool,

    /// Also print the signature header for the sealed envelope
    #[arg(long, env = "APP_SECRET", hide_env_values = true)]
    pub app_secret: Option<String>,
}

/// Arguments for open command
#[derive(Args, Debug)]
pub struct OpenArgs {
    /// `encrypted_response` value returned by the endpoint
    #[arg(long)]
    pub response: String,

    /// Session AES key printed by `seal` (base64)
    #[arg(long)]
    pub aes_key: String,

    /// Request IV printed by `seal` (base64)
    #[arg(long)]
    pub iv: String,
}

/// Output of `seal`
#[derive(Debug, Serialize)]
pub struct SealedRequest {
    pub envelope: EncryptedEnvelope,
    pub aes_key: String,
    pub iv: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

pub async fn sign(args: SignArgs) -> Result<()> {
    let body = tokio::fs::read(&args.body)
        .await
        .with_context(|| format!("Failed to read {}", args.body.display()))?;
    let header = signature_header_value(&body, &args.app_secret)?;
    println!("{}: {}", SIGNATURE_HEADER, header);
    Ok(())
}

pub async fn seal(args: SealArgs) -> Result<()> {
    let public_pem = tokio::fs::read_to_string(&args.public_key)
        .await
        .with_context(|| format!("Failed to read {}", args.public_key.display()))?;
    let body = tokio::fs::read(&args.body)
        .await
        .with_context(|| format!("Failed to read {}", args.body.display()))?;

    let key_size = if args.aes_256 {
        AesKeySize::Aes256
    } else {
        AesKeySize::Aes128
    };
    let sealed = seal_body(&public_pem, &body, key_size, args.app_secret.as_deref())?;
    println!("{}", serde_json::to_string_pretty(&sealed)?);
    Ok(())
}

pub async fn open(args: OpenArgs) -> Result<()> {
    let response = open_body(&args.response, &args.aes_key, &args.iv)?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

/// Seal a JSON request body for the endpoint holding `public_pem`
pub fn seal_body(
    public_pem: &str,
    body: &[u8],
    key_size: AesKeySize,
    app_secret: Option<&str>,
) -> Result<SealedRequest> {
    let request: serde_json::Value =
        serde_json::from_slice(body).context("Request body is not valid JSON")?;
    let public_key = public_key_from_pem(public_pem)?;
    let (envelope, session) = seal_request(&request, &public_key, key_size)?;

    let signature = match app_secret.filter(|s| !s.is_empty()) {
        Some(secret) => Some(signature_header_value(
            &serde_json::to_vec(&envelope)?,
            secret,
        )?),
        None => None,
    };

    Ok(SealedRequest {
        aes_key: STANDARD.encode(session.aes_key().as_bytes()),
        iv: STANDARD.encode(session.iv().as_bytes()),
        envelope,
        signature,
    })
}

/// Decrypt an endpoint response with base64 session material
pub fn open_body(response: &str, aes_key: &str, iv: &str) -> Result<serde_json::Value> {
    let aes_key = STANDARD
        .decode(aes_key.trim())
        .map_err(|e| anyhow!("--aes-key is not valid base64: {}", e))?;
    let iv = STANDARD
        .decode(iv.trim())
        .map_err(|e| anyhow!("--iv is not valid base64: {}", e))?;
    let session = SessionKeyMaterial::from_parts(&aes_key, &iv)?;
    Ok(open_response(response.trim(), &session)?)
}
