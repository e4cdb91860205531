// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Screen Descriptors
//!
//! Static response bodies for the SCHEDULE and SUCCESS screens, and the form
//! options the SCHEDULE screen offers. Options can be overridden from a TOML
//! file:
//!
//! ```toml
//! [[appointment_types]]
//! id = "online"
//! title = "Online"
//!
//! [[time_slots]]
//! id = "slot_09_10"
//! title = "09:00 - 10:00"
//! ```

use super::types::{SCHEDULE_SCREEN, SUCCESS_SCREEN};
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::path::Path;

/// Appointment type that gets an online meeting link
pub const ONLINE_APPOINTMENT: &str = "online";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionItem {
    pub id: String,
    pub title: String,
}

impl OptionItem {
    pub fn new(id: &str, title: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
        }
    }
}

/// Form options of the SCHEDULE screen
///
/// `time_slots` doubles as the lookup table for rendering slot ids in the
/// confirmation message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleCatalog {
    #[serde(default)]
    pub appointment_types: Vec<OptionItem>,
    #[serde(default)]
    pub genders: Vec<OptionItem>,
    #[serde(default)]
    pub time_slots: Vec<OptionItem>,
}

impl Default for ScheduleCatalog {
    fn default() -> Self {
        Self {
            appointment_types: vec![
                OptionItem::new("online", "Online"),
                OptionItem::new("in_store", "In-store"),
            ],
            genders: vec![
                OptionItem::new("male", "Male"),
                OptionItem::new("female", "Female"),
                OptionItem::new("other", "Prefer not to say"),
            ],
            time_slots: vec![
                OptionItem::new("slot_09_10", "09:00 - 10:00"),
                OptionItem::new("slot_10_11", "10:00 - 11:00"),
                OptionItem::new("slot_11_12", "11:00 - 12:00"),
                OptionItem::new("slot_13_14", "13:00 - 14:00"),
                OptionItem::new("slot_14_15", "14:00 - 15:00"),
                OptionItem::new("slot_15_16", "15:00 - 16:00"),
                OptionItem::new("slot_16_17", "16:00 - 17:00"),
            ],
        }
    }
}

impl ScheduleCatalog {
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse schedule catalog TOML")
    }

    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schedule catalog {}", path.display()))?;
        Self::from_toml_str(&contents)
    }

    /// Human label for a slot id, if the catalog knows it
    pub fn time_slot_label(&self, slot_id: &str) -> Option<&str> {
        self.time_slots
            .iter()
            .find(|slot| slot.id == slot_id)
            .map(|slot| slot.title.as_str())
    }

    pub fn schedule_screen(&self) -> Value {
        json!({
            "screen": SCHEDULE_SCREEN,
            "data": {
                "appointment_type": self.appointment_types,
                "gender": self.genders,
                "appointment_time": self.time_slots,
            }
        })
    }
}

pub fn success_screen(flow_token: Option<&str>, message: &str) -> Value {
    json!({
        "screen": SUCCESS_SCREEN,
        "data": {
            "extension_message_response": {
                "params": {
                    "flow_token": flow_token,
                    "appointment_confirmed": true,
                    "message": message,
                }
            }
        }
    })
}

pub fn active_status() -> Value {
    json!({ "data": { "status": "active" } })
}

pub fn acknowledged() -> Value {
    json!({ "data": { "acknowledged": true } })
}

pub fn location_text(appointment_type: &str) -> &'static str {
    if appointment_type == ONLINE_APPOINTMENT {
        "We'll send you the meeting link before the appointment."
    } else {
        "We look forward to seeing you at our store!"
    }
}
