// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory appointment store
//!
//! Default backend for development and tests. Records live for the lifetime
//! of the process.

use super::{AppointmentFilter, AppointmentRecord, Store, StoreAck, StoreError, StoredAppointment};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;
use uuid::Uuid;

#[derive(Clone, Default)]
pub struct MemoryStore {
    records: Arc<RwLock<Vec<StoredAppointment>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn save(&self, record: AppointmentRecord) -> Result<StoreAck, StoreError> {
        let id = Uuid::new_v4().to_string();
        let mut records = self.records.write().await;
        records.push(StoredAppointment {
            id: id.clone(),
            record,
        });
        debug!("📥 Appointment {} stored in memory ({} total)", id, records.len());
        Ok(StoreAck { id })
    }

    async fn query(&self, filter: AppointmentFilter) -> Result<Vec<StoredAppointment>, StoreError> {
        let records = self.records.read().await;
        Ok(filter.apply(records.iter()))
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
