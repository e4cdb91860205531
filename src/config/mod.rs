// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Endpoint Configuration
//!
//! Read from command-line flags with environment fallbacks (a `.env` file is
//! loaded first by the binary). Empty values count as unset.
//!
//! | Variable | Purpose |
//! |---|---|
//! | `APP_SECRET` | HMAC key for `x-hub-signature-256`; unset disables validation |
//! | `PRIVATE_KEY` | RSA private key PEM (may use `\n` escapes) |
//! | `PRIVATE_KEY_PATH` | File holding the PEM, used when `PRIVATE_KEY` is unset |
//! | `PASSPHRASE` | Passphrase for an encrypted PKCS#8 key |
//! | `HOST` / `PORT` | Listen address (default `0.0.0.0:3000`) |
//! | `STORE_URL` | `memory://` (default) or `file://<path>` |
//! | `FLOW_CATALOG_PATH` | TOML file overriding the SCHEDULE form options |

use crate::crypto::FlowPrivateKey;
use crate::flow::ScheduleCatalog;
use anyhow::{anyhow, Context, Result};
use clap::Parser;
use std::fmt;
use std::net::{IpAddr, SocketAddr};
use tracing::info;

#[derive(Parser, Clone)]
#[command(name = "flow-endpoint-node")]
#[command(about = "Encrypted webhook endpoint for the appointment booking flow", long_about = None)]
pub struct EndpointConfig {
    /// App secret used to verify request signatures
    #[arg(long, env = "APP_SECRET", hide_env_values = true)]
    pub app_secret: Option<String>,

    /// RSA private key PEM
    #[arg(long, env = "PRIVATE_KEY", hide_env_values = true)]
    pub private_key: Option<String>,

    /// Path to the RSA private key PEM
    #[arg(long, env = "PRIVATE_KEY_PATH")]
    pub private_key_path: Option<String>,

    /// Passphrase protecting the private key
    #[arg(long, env = "PASSPHRASE", hide_env_values = true)]
    pub passphrase: Option<String>,

    #[arg(long, env = "HOST", default_value = "0.0.0.0")]
    pub host: IpAddr,

    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Appointment store connection string
    #[arg(long, env = "STORE_URL", default_value = "memory://")]
    pub store_url: String,

    /// TOML file with SCHEDULE screen options
    #[arg(long, env = "FLOW_CATALOG_PATH")]
    pub catalog_path: Option<String>,
}

impl EndpointConfig {
    pub fn listen_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    pub fn app_secret(&self) -> Option<String> {
        non_empty(self.app_secret.as_deref()).map(str::to_string)
    }

    /// PEM text from `PRIVATE_KEY`, else from `PRIVATE_KEY_PATH`
    pub fn private_key_pem(&self) -> Result<Option<String>> {
        if let Some(pem) = non_empty(self.private_key.as_deref()) {
            return Ok(Some(pem.to_string()));
        }
        match non_empty(self.private_key_path.as_deref()) {
            Some(path) => std::fs::read_to_string(path)
                .map(Some)
                .with_context(|| format!("Failed to read private key {}", path)),
            None => Ok(None),
        }
    }

    /// Parse the configured private key; `None` when none is configured
    pub fn load_private_key(&self) -> Result<Option<FlowPrivateKey>> {
        let pem = match self.private_key_pem()? {
            Some(pem) => pem,
            None => return Ok(None),
        };
        let key = FlowPrivateKey::from_pem(&pem, non_empty(self.passphrase.as_deref()))
            .map_err(|e| anyhow!("Failed to load private key: {}", e))?;
        Ok(Some(key))
    }

    pub fn load_catalog(&self) -> Result<ScheduleCatalog> {
        match non_empty(self.catalog_path.as_deref()) {
            Some(path) => {
                let catalog = ScheduleCatalog::from_toml_file(path)?;
                info!(
                    "📋 Loaded schedule catalog from {} ({} time slots)",
                    path,
                    catalog.time_slots.len()
                );
                Ok(catalog)
            }
            None => Ok(ScheduleCatalog::default()),
        }
    }
}

impl fmt::Debug for EndpointConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EndpointConfig")
            .field("app_secret", &redacted(&self.app_secret))
            .field("private_key", &redacted(&self.private_key))
            .field("private_key_path", &self.private_key_path)
            .field("passphrase", &redacted(&self.passphrase))
            .field("host", &self.host)
            .field("port", &self.port)
            .field("store_url", &self.store_url)
            .field("catalog_path", &self.catalog_path)
            .finish()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

fn redacted(value: &Option<String>) -> &'static str {
    match non_empty(value.as_deref()) {
        Some(_) => "<set>",
        None => "<unset>",
    }
}
