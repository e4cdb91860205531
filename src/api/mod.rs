// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod errors;
pub mod handler;
pub mod http_server;

pub use errors::{EndpointError, KEY_ROTATION_STATUS, SIGNATURE_INVALID_STATUS};
pub use handler::{EncryptedResponse, RequestHandler};
pub use http_server::{create_app, start_server, AppState, AppointmentsQuery, HealthResponse};
