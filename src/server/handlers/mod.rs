//! HTTP handlers for the server.

pub mod json_api;
pub mod status;

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::error::{ErrorKind, PrintLinkError};

/// An error rendered as `{"success": false, "error": "..."}`.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

/// Printer I/O failures are a bad gateway; everything else is the request's fault.
impl From<PrintLinkError> for ApiError {
    fn from(e: PrintLinkError) -> Self {
        let status = match e.kind() {
            ErrorKind::Io => StatusCode::BAD_GATEWAY,
            ErrorKind::ResourceBusy => StatusCode::SERVICE_UNAVAILABLE,
            ErrorKind::InvalidParameter | ErrorKind::Encoding | ErrorKind::DeviceUnsupported => {
                StatusCode::BAD_REQUEST
            }
        };
        Self::new(status, e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (
            self.status,
            Json(json!({"success": false, "error": self.message})),
        )
            .into_response()
    }
}
