// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use thiserror::Error;

/// Errors raised by appointment store backends
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Invalid store connection string '{url}': {reason}")]
    InvalidConnectionString { url: String, reason: String },

    #[error("Store I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Store serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Corrupt record at line {line}: {reason}")]
    CorruptRecord { line: usize, reason: String },

    #[error("Store unavailable: {0}")]
    Unavailable(String),
}
