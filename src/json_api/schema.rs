//! JSON schema types for print jobs.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::render::{Binarization, Compression};

fn default_true() -> bool {
    true
}

/// Top-level JSON job.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonJob {
    /// Dialect name (`escpos`, `escpos-compact-qr`, `csn`). Falls back to the
    /// caller's default when absent.
    #[serde(default)]
    pub dialect: Option<String>,
    /// Prepend an `Initialize` intent (default: true).
    #[serde(default = "default_true")]
    pub init: bool,
    /// Print intents in order. Each is either a serialized
    /// [`PrintIntent`](crate::ir::PrintIntent) or a [`JsonImage`]
    /// (`"type": "image"`).
    pub intents: Vec<serde_json::Value>,
}

/// Image loaded from disk: `{"type": "image", "path": "logo.png", "width": 384}`.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct JsonImage {
    /// Relative paths resolve against the job file's directory.
    pub path: PathBuf,
    /// Print width in dots. Defaults to the image's own width.
    #[serde(default)]
    pub width: Option<u32>,
    #[serde(default)]
    pub binarization: Binarization,
    #[serde(default)]
    pub compression: Compression,
}
