// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use super::handler::RequestHandler;
use crate::crypto::SIGNATURE_HEADER;
use crate::storage::{AppointmentFilter, AppointmentStatus, Store};
use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::{net::SocketAddr, sync::Arc};
use tower_http::trace::TraceLayer;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub handler: Arc<RequestHandler>,
    pub store: Arc<dyn Store>,
}

impl AppState {
    pub fn new(handler: RequestHandler, store: Arc<dyn Store>) -> Self {
        Self {
            handler: Arc::new(handler),
            store,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: String,
    pub store: String,
    pub version: String,
    pub build: serde_json::Value,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentsQuery {
    pub status: Option<AppointmentStatus>,
    pub flow_token: Option<String>,
    pub limit: Option<usize>,
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .route("/", post(flow_handler).get(root_handler))
        .route("/health", get(health_handler))
        .route("/appointments", get(list_appointments_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serve until ctrl-c
pub async fn start_server(addr: SocketAddr, state: AppState) -> anyhow::Result<()> {
    let app = create_app(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("🚀 Flow endpoint listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Flow endpoint stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

async fn flow_handler(State(state): State<AppState>, headers: HeaderMap, body: Bytes) -> Response {
    let signature = headers
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok());

    match state.handler.handle(&body, signature).await {
        Ok(response) => (StatusCode::OK, Json(response)).into_response(),
        Err(e) => e.into_response(),
    }
}

async fn root_handler() -> &'static str {
    "Appointment Booking Flow Endpoint - Running"
}

async fn health_handler(State(state): State<AppState>) -> Response {
    match state
        .store
        .query(AppointmentFilter::pending().with_limit(1))
        .await
    {
        Ok(_) => (
            StatusCode::OK,
            Json(HealthResponse {
                status: "healthy".to_string(),
                database: "connected".to_string(),
                store: state.store.backend_name().to_string(),
                version: crate::version::VERSION.to_string(),
                build: crate::version::get_version_info(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Health check error: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "unhealthy", "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

async fn list_appointments_handler(
    State(state): State<AppState>,
    Query(query): Query<AppointmentsQuery>,
) -> Response {
    let filter = AppointmentFilter {
        status: query.status,
        flow_token: query.flow_token,
        limit: query.limit,
    };

    match state.store.query(filter).await {
        Ok(appointments) => (StatusCode::OK, Json(appointments)).into_response(),
        Err(e) => {
            error!("Error fetching appointments: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response()
        }
    }
}
