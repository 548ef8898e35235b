//! Observer hooks for connection events.

use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::time::{Duration, Instant};

use super::ConnectionState;
use crate::error::{PrintLinkError, Result};

/// Something that happened on a connection, in the order it happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectionEvent {
    StateChanged(ConnectionState),
    /// Raw bytes from the printer (status reports), undecoded
    DataReceived(Vec<u8>),
}

/// Receives connection events on the manager's dispatcher thread.
///
/// Any `Fn(ConnectionState)` closure is an observer that ignores inbound data.
pub trait ConnectionObserver: Send + 'static {
    fn on_state_changed(&self, state: ConnectionState);

    fn on_data_received(&self, _data: &[u8]) {}
}

impl<F> ConnectionObserver for F
where
    F: Fn(ConnectionState) + Send + 'static,
{
    fn on_state_changed(&self, state: ConnectionState) {
        self(state)
    }
}

/// Logs every event through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl ConnectionObserver for TracingObserver {
    fn on_state_changed(&self, state: ConnectionState) {
        tracing::info!(%state, "printer connection");
    }

    fn on_data_received(&self, data: &[u8]) {
        tracing::debug!(bytes = data.len(), data = ?data, "printer status");
    }
}

/// Forwards events into an mpsc channel.
#[derive(Debug, Clone)]
pub struct ChannelObserver {
    tx: Sender<ConnectionEvent>,
}

impl ConnectionObserver for ChannelObserver {
    fn on_state_changed(&self, state: ConnectionState) {
        let _ = self.tx.send(ConnectionEvent::StateChanged(state));
    }

    fn on_data_received(&self, data: &[u8]) {
        let _ = self.tx.send(ConnectionEvent::DataReceived(data.to_vec()));
    }
}

/// An observer plus the receiving end of its events.
pub fn channel() -> (ChannelObserver, Receiver<ConnectionEvent>) {
    let (tx, rx) = mpsc::channel();
    (ChannelObserver { tx }, rx)
}

/// Block until `target` is reported, skipping other events.
///
/// Fails with a transport error when the connection instead settles in
/// `Disconnected`, or when `timeout` elapses.
pub fn wait_for_state(
    events: &Receiver<ConnectionEvent>,
    target: ConnectionState,
    timeout: Duration,
) -> Result<()> {
    let deadline = Instant::now() + timeout;
    loop {
        let remaining = deadline.saturating_duration_since(Instant::now());
        match events.recv_timeout(remaining) {
            Ok(ConnectionEvent::StateChanged(state)) if state == target => return Ok(()),
            Ok(ConnectionEvent::StateChanged(ConnectionState::Disconnected)) => {
                return Err(PrintLinkError::Transport(format!(
                    "disconnected while waiting for {}",
                    target
                )));
            }
            Ok(_) => continue,
            Err(RecvTimeoutError::Timeout) => {
                return Err(PrintLinkError::Transport(format!(
                    "timed out after {:?} waiting for {}",
                    timeout, target
                )));
            }
            Err(RecvTimeoutError::Disconnected) => {
                return Err(PrintLinkError::Transport(
                    "connection manager shut down".to_string(),
                ));
            }
        }
    }
}
