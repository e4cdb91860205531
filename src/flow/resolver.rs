// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Next-screen Resolution
//!
//! Maps a decrypted flow request to the response the client should render.
//! The only side effect is persisting a booking when the SCHEDULE screen is
//! submitted; it happens before the SUCCESS payload is built so a failed
//! write never produces a confirmation.

use super::error::FlowError;
use super::screens::{acknowledged, active_status, location_text, success_screen, ScheduleCatalog};
use super::types::{DecryptedBody, FlowAction, ScheduleSubmission, SCHEDULE_SCREEN};
use crate::storage::{AppointmentRecord, AppointmentStatus, Store, DEFAULT_NOTES};
use chrono::Utc;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

#[derive(Clone)]
pub struct ScreenResolver {
    store: Arc<dyn Store>,
    catalog: Arc<ScheduleCatalog>,
}

impl ScreenResolver {
    pub fn new(store: Arc<dyn Store>, catalog: ScheduleCatalog) -> Self {
        Self {
            store,
            catalog: Arc::new(catalog),
        }
    }

    pub fn catalog(&self) -> &ScheduleCatalog {
        &self.catalog
    }

    pub async fn resolve(&self, body: &DecryptedBody) -> Result<Value, FlowError> {
        debug!(
            "Incoming flow request: action={}, screen={:?}, version={:?}",
            body.action, body.screen, body.version
        );

        let action = body.flow_action();
        if action == FlowAction::Ping {
            return Ok(active_status());
        }

        if let Some(client_error) = body.client_error() {
            warn!("Client reported an error, acknowledging");
            debug!("Client error payload: {}", client_error);
            return Ok(acknowledged());
        }

        match action {
            FlowAction::Init => {
                info!("Initializing flow with {} screen", SCHEDULE_SCREEN);
                Ok(self.catalog.schedule_screen())
            }
            FlowAction::Back => {
                info!("Handling back navigation to {} screen", SCHEDULE_SCREEN);
                Ok(self.catalog.schedule_screen())
            }
            FlowAction::DataExchange => match body.screen.as_deref() {
                Some(SCHEDULE_SCREEN) => self.submit_schedule(body).await,
                other => {
                    let screen = other.unwrap_or("<none>").to_string();
                    error!("Unhandled screen on data_exchange");
                    debug!("Unhandled screen: {}", screen);
                    Err(FlowError::UnhandledScreen { screen })
                }
            },
            FlowAction::Ping | FlowAction::Unknown => {
                error!("Unhandled request action");
                debug!("Unhandled request action: {}", body.action);
                Err(FlowError::UnhandledAction {
                    action: body.action.clone(),
                })
            }
        }
    }

    async fn submit_schedule(&self, body: &DecryptedBody) -> Result<Value, FlowError> {
        let submission = parse_submission(body)?;

        let record = AppointmentRecord {
            appointment_type: submission.appointment_type.clone(),
            gender: submission.gender.clone(),
            appointment_date: submission.appointment_date.clone(),
            appointment_time: submission.appointment_time.clone(),
            notes: submission
                .notes
                .clone()
                .filter(|notes| !notes.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_NOTES.to_string()),
            created_at: Utc::now(),
            flow_token: body.flow_token.clone(),
            status: AppointmentStatus::Pending,
        };

        let ack = self.store.save(record).await.map_err(|e| {
            error!("Error saving appointment: {}", e);
            FlowError::Store(e)
        })?;
        info!(
            "✅ Appointment {} saved to {} store",
            ack.id,
            self.store.backend_name()
        );

        let message = self.confirmation_message(&submission);
        Ok(success_screen(body.flow_token.as_deref(), &message))
    }

    fn confirmation_message(&self, submission: &ScheduleSubmission) -> String {
        let time = self
            .catalog
            .time_slot_label(&submission.appointment_time)
            .unwrap_or(submission.appointment_time.as_str());
        format!(
            "Your {} appointment has been scheduled for {} at {}. {}",
            submission.appointment_type,
            submission.appointment_date,
            time,
            location_text(&submission.appointment_type)
        )
    }
}

fn parse_submission(body: &DecryptedBody) -> Result<ScheduleSubmission, FlowError> {
    let required = |field: &str| {
        body.data_str(field)
            .filter(|value| !value.is_empty())
            .map(str::to_string)
            .ok_or_else(|| FlowError::MissingField {
                screen: SCHEDULE_SCREEN.to_string(),
                field: field.to_string(),
            })
    };

    Ok(ScheduleSubmission {
        appointment_type: required("appointment_type")?,
        gender: body.data_str("gender").map(str::to_string),
        appointment_date: required("appointment_date")?,
        appointment_time: required("appointment_time")?,
        notes: body.data_str("notes").map(str::to_string),
    })
}
