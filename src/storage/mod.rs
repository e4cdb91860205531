// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Appointment Storage
//!
//! The flow resolver persists submitted appointments through the [`Store`]
//! trait. A store is built once at start-up from a connection string and
//! injected into the request handler:
//!
//! - `memory://`: [`MemoryStore`], process-local
//! - `file://<path>`: [`JsonFileStore`], append-only JSON lines

pub mod appointment;
pub mod error;
pub mod file_store;
pub mod memory_store;

pub use appointment::{
    AppointmentFilter, AppointmentRecord, AppointmentStatus, StoreAck, StoredAppointment,
    DEFAULT_NOTES,
};
pub use error::StoreError;
pub use file_store::JsonFileStore;
pub use memory_store::MemoryStore;

use async_trait::async_trait;
use std::sync::Arc;

/// Durable keyed store for appointment records
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Store: Send + Sync {
    /// Persist a record and return the id it was stored under
    async fn save(&self, record: AppointmentRecord) -> Result<StoreAck, StoreError>;

    /// Records matching `filter`, in insertion order
    async fn query(&self, filter: AppointmentFilter) -> Result<Vec<StoredAppointment>, StoreError>;

    /// Short backend identifier for health output
    fn backend_name(&self) -> &'static str;
}

/// Build a store from its connection string
pub async fn open_store(url: &str) -> Result<Arc<dyn Store>, StoreError> {
    let url = url.trim();
    if url.is_empty() || url == "memory://" || url == "memory" {
        return Ok(Arc::new(MemoryStore::new()));
    }

    if let Some(path) = url.strip_prefix("file://") {
        if path.is_empty() {
            return Err(StoreError::InvalidConnectionString {
                url: url.to_string(),
                reason: "file path is empty".to_string(),
            });
        }
        return Ok(Arc::new(JsonFileStore::open(path).await?));
    }

    Err(StoreError::InvalidConnectionString {
        url: url.to_string(),
        reason: "expected memory:// or file://<path>".to_string(),
    })
}
