// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Appointment Booking Flow
//!
//! Screen state machine for the booking flow:
//!
//! - `ping` / `health_check` → `{data: {status: "active"}}`
//! - client-reported `data.error` → `{data: {acknowledged: true}}`
//! - `INIT`, `BACK` → SCHEDULE screen with its form options
//! - `data_exchange` on SCHEDULE → persist booking, SUCCESS screen
//! - anything else → error

pub mod error;
pub mod resolver;
pub mod screens;
pub mod types;

pub use error::FlowError;
pub use resolver::ScreenResolver;
pub use screens::{OptionItem, ScheduleCatalog};
pub use types::{DecryptedBody, FlowAction, ScheduleSubmission, SCHEDULE_SCREEN, SUCCESS_SCREEN};
