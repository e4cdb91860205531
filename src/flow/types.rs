// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Screen the flow opens on and returns to on BACK
pub const SCHEDULE_SCREEN: &str = "SCHEDULE";
/// Terminal screen shown after a booking is stored
pub const SUCCESS_SCREEN: &str = "SUCCESS";

/// Plaintext of an `encrypted_flow_data` payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DecryptedBody {
    #[serde(default)]
    pub version: Option<String>,
    pub action: String,
    #[serde(default)]
    pub screen: Option<String>,
    #[serde(default)]
    pub data: Option<Map<String, Value>>,
    #[serde(default)]
    pub flow_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowAction {
    Ping,
    Init,
    Back,
    DataExchange,
    Unknown,
}

impl FlowAction {
    pub fn parse(action: &str) -> Self {
        match action {
            "ping" | "health_check" => FlowAction::Ping,
            "INIT" => FlowAction::Init,
            "BACK" => FlowAction::Back,
            "data_exchange" => FlowAction::DataExchange,
            _ => FlowAction::Unknown,
        }
    }
}

impl DecryptedBody {
    pub fn flow_action(&self) -> FlowAction {
        FlowAction::parse(&self.action)
    }

    /// `data.error`, set when the client reports a failure on its side
    ///
    /// Falsy values (null, false, 0, "") count as absent.
    pub fn client_error(&self) -> Option<&Value> {
        self.data
            .as_ref()
            .and_then(|data| data.get("error"))
            .filter(|err| is_truthy(err))
    }

    pub fn data_str(&self, field: &str) -> Option<&str> {
        self.data
            .as_ref()
            .and_then(|data| data.get(field))
            .and_then(Value::as_str)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map_or(true, |f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Fields submitted from the SCHEDULE screen
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleSubmission {
    pub appointment_type: String,
    pub gender: Option<String>,
    pub appointment_date: String,
    pub appointment_time: String,
    pub notes: Option<String>,
}
