//! # Connection Lifecycle
//!
//! A [`ConnectionManager`] owns at most one live [`Link`](crate::transport::Link)
//! and moves through three states:
//!
//! ```text
//!                 connect()              established
//! Disconnected ─────────────▶ Connecting ─────────────▶ Connected
//!      ▲                          │                         │
//!      └──────── failed ──────────┘                         │
//!      └──────────── read error / remote close / disconnect()┘
//! ```
//!
//! Connects run on a background thread, and so does the reader loop that
//! forwards inbound bytes. The observer is called from a dedicated dispatcher
//! thread, never while the manager's lock is held.
//!
//! ```
//! use printlink::connection::{self, ConnectionEvent, ConnectionManager, ConnectionState};
//! use printlink::transport::MockConnector;
//! use std::time::Duration;
//!
//! let (observer, events) = connection::channel();
//! let manager = ConnectionManager::new(MockConnector::new(), observer)?;
//!
//! manager.connect("printer".to_string());
//! connection::wait_for_state(&events, ConnectionState::Connected, Duration::from_secs(1))?;
//!
//! assert!(manager.write(&[0x1B, 0x40])?.is_sent());
//! # Ok::<(), printlink::error::PrintLinkError>(())
//! ```

mod manager;
mod observer;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use manager::{ConnectionManager, ManagerConfig, WriteOutcome};
pub use observer::{
    ChannelObserver, ConnectionEvent, ConnectionObserver, TracingObserver, channel,
    wait_for_state,
};

/// Connection lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl fmt::Display for ConnectionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disconnected => "disconnected",
            Self::Connecting => "connecting",
            Self::Connected => "connected",
        })
    }
}
