//! Connection status and control.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use serde::Serialize;

use super::super::state::AppState;
use crate::connection::ConnectionState;

#[derive(Debug, Serialize, PartialEq)]
pub struct StatusResponse {
    pub state: ConnectionState,
    pub dialect: &'static str,
    pub link: String,
}

fn snapshot(state: &AppState) -> StatusResponse {
    StatusResponse {
        state: state.printer.state(),
        dialect: state.config.dialect.name,
        link: state.config.link.to_string(),
    }
}

/// Handle GET /api/status
pub async fn status(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    Json(snapshot(&state))
}

/// Handle POST /api/connect - (re)connect in the background.
pub async fn connect(State(state): State<Arc<AppState>>) -> (StatusCode, Json<StatusResponse>) {
    state.printer.connect();
    (StatusCode::ACCEPTED, Json(snapshot(&state)))
}

/// Handle POST /api/disconnect
pub async fn disconnect(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    state.printer.disconnect();
    Json(snapshot(&state))
}
