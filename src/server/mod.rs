//! # HTTP Server for Print Jobs
//!
//! Exposes one managed printer connection over HTTP.
//!
//! ## Usage
//!
//! ```bash
//! printlink serve --listen 0.0.0.0:8080 --serial /dev/rfcomm0
//! ```
//!
//! | Route | Method | Body | Response |
//! |-------|--------|------|----------|
//! | `/api/status` | GET | | `{"state", "dialect", "link"}` |
//! | `/api/connect` | POST | | 202 + status |
//! | `/api/disconnect` | POST | | status |
//! | `/api/encode` | POST | JSON job | `application/octet-stream` |
//! | `/api/print` | POST | JSON job | `{"success", "job_id", "bytes", "outcome"}` |
//!
//! Invalid jobs are answered with 400, printer I/O failures with 502, and a
//! print while disconnected with 409.

mod handlers;
mod state;

pub use state::{AppState, LinkTarget, PrinterSession, ServerConfig};

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::error::{PrintLinkError, Result};

/// Build the router around shared state.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/status", get(handlers::status::status))
        .route("/api/connect", post(handlers::status::connect))
        .route("/api/disconnect", post(handlers::status::disconnect))
        .route("/api/encode", post(handlers::json_api::encode))
        .route("/api/print", post(handlers::json_api::print))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the HTTP server.
///
/// ## Example
///
/// ```no_run
/// use printlink::printer::DialectProfile;
/// use printlink::server::{serve, LinkTarget, ServerConfig};
/// use printlink::transport::SerialDevice;
///
/// # async fn example() -> Result<(), printlink::error::PrintLinkError> {
/// let config = ServerConfig {
///     listen_addr: "0.0.0.0:8080".to_string(),
///     dialect: &DialectProfile::ESC_POS,
///     link: LinkTarget::Serial(SerialDevice::from_path("/dev/rfcomm0")),
/// };
///
/// serve(config).await?;
/// # Ok(())
/// # }
/// ```
pub async fn serve(config: ServerConfig) -> Result<()> {
    let state = Arc::new(AppState::new(config.clone())?);
    let app = router(Arc::clone(&state));

    println!("printlink HTTP server starting...");
    println!("Listening on: {}", config.listen_addr);
    println!("Printer: {} ({})", config.link, config.dialect.name);
    println!();

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .map_err(|e| {
            PrintLinkError::Transport(format!("Failed to bind to {}: {}", config.listen_addr, e))
        })?;

    axum::serve(listener, app)
        .await
        .map_err(|e| PrintLinkError::Transport(format!("Server error: {}", e)))?;

    state.printer.disconnect();
    Ok(())
}
