//! # Print Intents and Encoding
//!
//! This module is the layer between what a caller wants printed and the
//! bytes a particular printer understands.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌──────────────────┐     ┌──────────┐
//! │ PrintIntent │ ──► │ encode(dialect)  │ ──► │  bytes   │
//! │ (PrintJob)  │     │ DialectProfile   │     │          │
//! └─────────────┘     └──────────────────┘     └──────────┘
//! ```
//!
//! Intents are plain data: they can be inspected, serialized to JSON and
//! encoded for any dialect. Encoding is pure and all-or-nothing.
//!
//! ## Example
//!
//! ```
//! use printlink::ir::{PrintIntent, PrintJob};
//! use printlink::printer::DialectProfile;
//! use printlink::protocol::barcode::qr::QrErrorLevel;
//!
//! let mut job = PrintJob::with_init();
//! job.push(PrintIntent::text("RECEIPT"));
//! job.push(PrintIntent::NewLine);
//! job.push(PrintIntent::qr_code("https://example.com", 6, QrErrorLevel::M).unwrap());
//! job.push(PrintIntent::divider());
//!
//! let bytes = job.encode(&DialectProfile::ESC_POS).unwrap();
//! assert!(bytes.starts_with(&[0x1B, 0x40]));
//! ```

mod codegen;
mod ops;

pub use codegen::encode;
pub use ops::*;
