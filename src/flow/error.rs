// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use crate::storage::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlowError {
    #[error("Unhandled endpoint request: action '{action}'")]
    UnhandledAction { action: String },

    #[error("Unhandled screen type: {screen}")]
    UnhandledScreen { screen: String },

    #[error("Invalid {screen} submission: missing '{field}'")]
    MissingField { screen: String, field: String },

    #[error("Failed to save appointment: {0}")]
    Store(#[from] StoreError),
}
