//! # JSON API
//!
//! Deserialize JSON print jobs into [`PrintJob`](crate::ir::PrintJob)s.
//!
//! Intents use the serde form of [`PrintIntent`](crate::ir::PrintIntent)
//! (internally tagged by `type`, snake_case), plus an `image` shorthand that
//! loads a picture from disk. Used by the CLI (`printlink encode job.json`)
//! and the HTTP server, which encodes with [`JsonJob::encode_inline`] and so
//! refuses that shorthand.
//!
//! ## Example
//!
//! ```
//! use printlink::json_api::JsonJob;
//! use printlink::printer::DialectProfile;
//!
//! let json = r#"{
//!     "dialect": "escpos",
//!     "intents": [
//!         {"type": "text", "content": "HELLO", "alignment": "center"},
//!         {"type": "new_line"},
//!         {"type": "divider"},
//!         {"type": "cut_paper"}
//!     ]
//! }"#;
//!
//! let job: JsonJob = serde_json::from_str(json).unwrap();
//! let bytes = job.encode(&DialectProfile::ESC_POS, std::path::Path::new("")).unwrap();
//! assert!(bytes.starts_with(&[0x1B, 0x40]));
//! ```

mod convert;
mod schema;

pub use convert::JsonApiError;
pub use schema::{JsonImage, JsonJob};
