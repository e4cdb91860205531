// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Appointment Records
//!
//! Shape of the data persisted when a SCHEDULE screen is submitted, plus the
//! filter used to read it back.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Notes persisted when the user leaves the field empty
pub const DEFAULT_NOTES: &str = "No additional notes provided.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Cancelled,
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Cancelled => "cancelled",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentRecord {
    pub appointment_type: String,
    pub gender: Option<String>,
    pub appointment_date: String,
    pub appointment_time: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub flow_token: Option<String>,
    pub status: AppointmentStatus,
}

/// Record as returned by a store, with the id it was assigned on save
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredAppointment {
    pub id: String,
    #[serde(flatten)]
    pub record: AppointmentRecord,
}

/// Acknowledgement of a successful save
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreAck {
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentFilter {
    pub status: Option<AppointmentStatus>,
    pub flow_token: Option<String>,
    pub limit: Option<usize>,
}

impl AppointmentFilter {
    pub fn pending() -> Self {
        Self {
            status: Some(AppointmentStatus::Pending),
            ..Default::default()
        }
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn with_flow_token(mut self, flow_token: impl Into<String>) -> Self {
        self.flow_token = Some(flow_token.into());
        self
    }

    pub fn matches(&self, record: &AppointmentRecord) -> bool {
        if let Some(status) = self.status {
            if record.status != status {
                return false;
            }
        }
        if let Some(token) = &self.flow_token {
            if record.flow_token.as_deref() != Some(token.as_str()) {
                return false;
            }
        }
        true
    }

    /// Filter and truncate in insertion order
    pub fn apply<'a, I>(&self, records: I) -> Vec<StoredAppointment>
    where
        I: IntoIterator<Item = &'a StoredAppointment>,
    {
        let matching = records
            .into_iter()
            .filter(|stored| self.matches(&stored.record))
            .cloned();
        match self.limit {
            Some(limit) => matching.take(limit).collect(),
            None => matching.collect(),
        }
    }
}
