//! # Error Types
//!
//! This module defines error types used throughout the printlink library.
//!
//! Every failure maps onto one of five [`ErrorKind`]s so callers can branch on
//! the category without matching message strings:
//!
//! | Kind | Raised by |
//! |------|-----------|
//! | `InvalidParameter` | encoder range checks, builder constructors |
//! | `Encoding` | text that the dialect charset cannot represent |
//! | `DeviceUnsupported` | unknown vendor, missing printer interface, dialect lacks a command |
//! | `ResourceBusy` | USB interface already claimed |
//! | `Io` | transport failures |

use thiserror::Error;

/// Main error type for printlink operations
#[derive(Debug, Error)]
pub enum PrintLinkError {
    /// A field of a print intent is outside its allowed range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Text cannot be represented in the dialect's charset
    #[error("Encoding error: {0}")]
    Encoding(String),

    /// The device or dialect cannot do what was asked
    #[error("Device unsupported: {0}")]
    DeviceUnsupported(String),

    /// The device is held by someone else
    #[error("Resource busy: {0}")]
    ResourceBusy(String),

    /// Transport-level errors (connection, I/O)
    #[error("Transport error: {0}")]
    Transport(String),

    /// Malformed print job document
    #[error("Invalid job: {0}")]
    Json(String),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Coarse error category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    InvalidParameter,
    Encoding,
    DeviceUnsupported,
    ResourceBusy,
    Io,
}

impl PrintLinkError {
    /// The category this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidParameter(_) | Self::Json(_) => ErrorKind::InvalidParameter,
            Self::Encoding(_) => ErrorKind::Encoding,
            Self::DeviceUnsupported(_) => ErrorKind::DeviceUnsupported,
            Self::ResourceBusy(_) => ErrorKind::ResourceBusy,
            Self::Transport(_) | Self::Io(_) => ErrorKind::Io,
        }
    }

    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Self::InvalidParameter(msg.into())
    }

    pub(crate) fn unsupported(msg: impl Into<String>) -> Self {
        Self::DeviceUnsupported(msg.into())
    }
}

impl From<rusb::Error> for PrintLinkError {
    fn from(e: rusb::Error) -> Self {
        match e {
            rusb::Error::Busy => Self::ResourceBusy(e.to_string()),
            rusb::Error::NotSupported | rusb::Error::NotFound | rusb::Error::NoDevice => {
                Self::DeviceUnsupported(e.to_string())
            }
            other => Self::Transport(format!("USB: {}", other)),
        }
    }
}

impl From<serde_json::Error> for PrintLinkError {
    fn from(e: serde_json::Error) -> Self {
        Self::Json(e.to_string())
    }
}

/// Result type for printlink operations
pub type Result<T> = std::result::Result<T, PrintLinkError>;
