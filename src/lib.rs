//! # printlink - Thermal Receipt Printer Library
//!
//! printlink drives ESC/POS-style thermal receipt printers over Bluetooth SPP
//! and USB. It provides:
//!
//! - **Protocol implementation**: byte-exact command builders
//! - **Dialects**: parameter tables for generic ESC/POS, a compact-QR variant
//!   and the CSN OEM controller
//! - **Raster pipeline**: resizing, Bayer dithering, run-length and deflate
//!   compression
//! - **Connection management**: one background-connected link with a reader
//!   thread and state callbacks
//!
//! ## Quick Start
//!
//! ```no_run
//! use printlink::{
//!     connection::{self, ConnectionManager, ConnectionState},
//!     ir::{CutMode, PrintIntent, PrintJob},
//!     printer::DialectProfile,
//!     transport::{SerialConnector, SerialDevice},
//! };
//! use std::time::Duration;
//!
//! // Build a job
//! let mut job = PrintJob::with_init();
//! job.push(PrintIntent::text("Hello"));
//! job.push(PrintIntent::NewLine);
//! job.push(PrintIntent::CutPaper { mode: CutMode::Full });
//! let bytes = job.encode(&DialectProfile::ESC_POS)?;
//!
//! // Connect and send
//! let (observer, events) = connection::channel();
//! let manager = ConnectionManager::new(SerialConnector::default(), observer)?;
//! manager.connect(SerialDevice::from_path("/dev/rfcomm0"));
//! connection::wait_for_state(&events, ConnectionState::Connected, Duration::from_secs(10))?;
//! manager.write(&bytes)?;
//!
//! # Ok::<(), printlink::error::PrintLinkError>(())
//! ```
//!
//! ## Module Overview
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`protocol`] | Command builders |
//! | [`printer`] | Dialect tables and printer models |
//! | [`ir`] | Print intents and per-dialect encoding |
//! | [`render`] | Image binarization and compression |
//! | [`transport`] | Serial, USB and mock links |
//! | [`connection`] | Connection lifecycle |
//! | [`json_api`] | JSON print jobs |
//! | [`server`] | HTTP API |
//! | [`error`] | Error types |

pub mod connection;
pub mod error;
pub mod ir;
pub mod json_api;
pub mod printer;
pub mod protocol;
pub mod render;
pub mod server;
pub mod transport;

// Re-exports for convenience
pub use connection::{ConnectionManager, ConnectionState, WriteOutcome};
pub use error::PrintLinkError;
pub use ir::{PrintIntent, PrintJob};
pub use printer::{DialectProfile, PrinterModel};
