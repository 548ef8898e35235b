use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;

use serde::{Deserialize, Serialize};

use super::{ConnectionEvent, ConnectionObserver, ConnectionState};
use crate::error::Result;
use crate::transport::{Connector, Link};

/// Default reader buffer (bytes)
const READ_BUFFER_SIZE: usize = 1024;

/// Runtime knobs for a [`ConnectionManager`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ManagerConfig {
    /// Largest chunk the reader hands to `on_data_received`
    pub read_buffer_size: usize,
}

impl Default for ManagerConfig {
    fn default() -> Self {
        Self {
            read_buffer_size: READ_BUFFER_SIZE,
        }
    }
}

/// Result of [`ConnectionManager::write`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WriteOutcome {
    /// Handed to the link
    Sent { bytes: usize },
    /// No current connection; nothing was written
    Dropped,
}

impl WriteOutcome {
    pub fn is_sent(&self) -> bool {
        matches!(self, Self::Sent { .. })
    }
}

/// Everything guarded by the manager's single lock.
struct Inner<L> {
    state: ConnectionState,
    /// Bumped by every connect and disconnect; threads holding an older value
    /// are superseded and must exit without side effects.
    generation: u64,
    link: Option<Arc<L>>,
    events: Sender<ConnectionEvent>,
}

impl<L: Link> Inner<L> {
    /// Record a state change and queue it for the observer. Repeats are ignored.
    fn transition(&mut self, state: ConnectionState) {
        if self.state == state {
            return;
        }
        tracing::debug!(from = %self.state, to = %state, generation = self.generation, "state");
        self.state = state;
        let _ = self.events.send(ConnectionEvent::StateChanged(state));
    }

    fn release_link(&mut self) {
        if let Some(link) = self.link.take() {
            link.disconnect();
        }
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}

type Shared<L> = Arc<Mutex<Inner<L>>>;

fn lock<L>(shared: &Mutex<Inner<L>>) -> MutexGuard<'_, Inner<L>> {
    shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Owns a single printer connection and its background threads.
///
/// `connect` and `disconnect` return immediately. Writes go straight to the
/// current link from the calling thread.
pub struct ConnectionManager<C: Connector> {
    connector: Arc<C>,
    config: ManagerConfig,
    shared: Shared<C::Link>,
}

impl<C: Connector> ConnectionManager<C> {
    pub fn new(connector: C, observer: impl ConnectionObserver) -> Result<Self> {
        Self::with_config(connector, observer, ManagerConfig::default())
    }

    pub fn with_config(
        connector: C,
        observer: impl ConnectionObserver,
        config: ManagerConfig,
    ) -> Result<Self> {
        let (tx, rx) = mpsc::channel();
        thread::Builder::new()
            .name("printlink-events".to_string())
            .spawn(move || dispatch(rx, observer))?;

        Ok(Self {
            connector: Arc::new(connector),
            config,
            shared: Arc::new(Mutex::new(Inner {
                state: ConnectionState::Disconnected,
                generation: 0,
                link: None,
                events: tx,
            })),
        })
    }

    pub fn connector(&self) -> &C {
        &self.connector
    }

    pub fn state(&self) -> ConnectionState {
        lock(&self.shared).state
    }

    pub fn is_connected(&self) -> bool {
        self.state() == ConnectionState::Connected
    }

    /// Start connecting to `device`, abandoning any current link or pending
    /// attempt first.
    ///
    /// Reports `Connecting` now, then `Connected` or `Disconnected` from the
    /// connect thread. An attempt superseded by a later `connect` or
    /// `disconnect` closes its link silently.
    #[tracing::instrument(skip(self))]
    pub fn connect(&self, device: C::Device) {
        let generation = {
            let mut inner = lock(&self.shared);
            inner.release_link();
            inner.generation += 1;
            inner.transition(ConnectionState::Connecting);
            inner.generation
        };

        let connector = Arc::clone(&self.connector);
        let shared = Arc::clone(&self.shared);
        let buffer_size = self.config.read_buffer_size;
        let spawned = thread::Builder::new()
            .name("printlink-connect".to_string())
            .spawn(move || {
                let result = connector.connect(&device);
                establish(shared, generation, result, buffer_size);
            });

        if let Err(e) = spawned {
            tracing::warn!(error = %e, "failed to start connect thread");
            let mut inner = lock(&self.shared);
            if inner.is_current(generation) {
                inner.transition(ConnectionState::Disconnected);
            }
        }
    }

    /// Close the current link, if any. No-op when already disconnected.
    pub fn disconnect(&self) {
        let mut inner = lock(&self.shared);
        if inner.state == ConnectionState::Disconnected && inner.link.is_none() {
            return;
        }
        inner.release_link();
        inner.generation += 1;
        inner.transition(ConnectionState::Disconnected);
        tracing::info!("disconnected");
    }

    /// Write `bytes` to the current link.
    ///
    /// Returns [`WriteOutcome::Dropped`] when not connected, or when the link
    /// failed after being superseded. A failure on the current link is
    /// returned as an error and leaves the state alone; the reader notices a
    /// dead link on its own.
    pub fn write(&self, bytes: &[u8]) -> Result<WriteOutcome> {
        let (link, generation) = {
            let inner = lock(&self.shared);
            match (&inner.link, inner.state) {
                (Some(link), ConnectionState::Connected) => (Arc::clone(link), inner.generation),
                _ => {
                    tracing::debug!(bytes = bytes.len(), state = %inner.state, "write dropped");
                    return Ok(WriteOutcome::Dropped);
                }
            }
        };

        match link.write(bytes) {
            Ok(()) => {
                tracing::debug!(bytes = bytes.len(), "write");
                Ok(WriteOutcome::Sent { bytes: bytes.len() })
            }
            Err(_) if !lock(&self.shared).is_current(generation) => Ok(WriteOutcome::Dropped),
            Err(e) => {
                tracing::warn!(error = %e, "write failed");
                Err(e)
            }
        }
    }
}

impl<C: Connector> Drop for ConnectionManager<C> {
    fn drop(&mut self) {
        let mut inner = lock(&self.shared);
        inner.release_link();
        inner.generation += 1;
    }
}

/// Install the result of a connect attempt if it is still wanted.
fn establish<L: Link + 'static>(
    shared: Shared<L>,
    generation: u64,
    result: Result<L>,
    buffer_size: usize,
) {
    let mut inner = lock(&shared);
    if !inner.is_current(generation) {
        if let Ok(link) = result {
            link.disconnect();
        }
        tracing::debug!(generation, "superseded connect discarded");
        return;
    }

    let link = match result {
        Ok(link) => Arc::new(link),
        Err(e) => {
            tracing::warn!(error = %e, "connect failed");
            inner.transition(ConnectionState::Disconnected);
            return;
        }
    };

    inner.link = Some(Arc::clone(&link));
    inner.transition(ConnectionState::Connected);
    tracing::info!(generation, "connected");
    drop(inner);

    let reader_shared = Arc::clone(&shared);
    let spawned = thread::Builder::new()
        .name("printlink-reader".to_string())
        .spawn(move || read_loop(reader_shared, link, generation, buffer_size));

    if let Err(e) = spawned {
        tracing::warn!(error = %e, "failed to start reader thread");
        let mut inner = lock(&shared);
        if inner.is_current(generation) {
            inner.release_link();
            inner.transition(ConnectionState::Disconnected);
        }
    }
}

fn read_loop<L: Link>(shared: Shared<L>, link: Arc<L>, generation: u64, buffer_size: usize) {
    let mut buf = vec![0u8; buffer_size.max(1)];
    loop {
        {
            let inner = lock(&shared);
            if !inner.is_current(generation) || inner.state != ConnectionState::Connected {
                return;
            }
        }

        match link.read(&mut buf) {
            Ok(0) => {}
            Ok(n) => {
                let inner = lock(&shared);
                if !inner.is_current(generation) {
                    return;
                }
                tracing::debug!(bytes = n, "inbound");
                let _ = inner
                    .events
                    .send(ConnectionEvent::DataReceived(buf[..n].to_vec()));
            }
            Err(e) => {
                let mut inner = lock(&shared);
                if inner.is_current(generation) {
                    tracing::warn!(error = %e, "link lost");
                    inner.release_link();
                    inner.generation += 1;
                    inner.transition(ConnectionState::Disconnected);
                }
                return;
            }
        }
    }
}

/// Deliver events in order until every sender is gone.
fn dispatch(rx: Receiver<ConnectionEvent>, observer: impl ConnectionObserver) {
    for event in rx {
        match event {
            ConnectionEvent::StateChanged(state) => observer.on_state_changed(state),
            ConnectionEvent::DataReceived(data) => observer.on_data_received(&data),
        }
    }
}
