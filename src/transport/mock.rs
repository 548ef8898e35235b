//! In-memory transport.
//!
//! [`MockConnector`] opens [`MockLink`]s without touching hardware. Each
//! device name can be scripted to accept, refuse, or hold the connect until
//! the test releases it. Every link it hands out is also reachable through a
//! [`MockHandle`], which exposes the bytes written and lets the test inject
//! inbound data or simulate the remote end going away.

use std::collections::{HashMap, VecDeque};
use std::io;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::Receiver;
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

use super::{Connector, Link};
use crate::error::{PrintLinkError, Result};

const READ_POLL: Duration = Duration::from_millis(5);

/// What a connect to a given device name does.
#[derive(Debug, Default)]
pub enum MockBehavior {
    #[default]
    Accept,
    Refuse,
    /// Block until a value arrives: `true` accepts, `false` or a dropped
    /// sender refuses.
    Hold(Receiver<bool>),
}

#[derive(Debug, Default)]
struct Shared {
    written: Mutex<Vec<u8>>,
    writes: AtomicUsize,
    inbound: Mutex<VecDeque<u8>>,
    open: AtomicBool,
    severed: AtomicBool,
    fail_writes: AtomicBool,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

/// Test-side view of one opened [`MockLink`].
#[derive(Debug, Clone)]
pub struct MockHandle {
    shared: Arc<Shared>,
}

impl MockHandle {
    /// Everything written so far, concatenated.
    pub fn written(&self) -> Vec<u8> {
        lock(&self.shared.written).clone()
    }

    /// Number of `write` calls that succeeded.
    pub fn write_count(&self) -> usize {
        self.shared.writes.load(Ordering::SeqCst)
    }

    /// Queue bytes for the next `read`.
    pub fn push_inbound(&self, bytes: &[u8]) {
        lock(&self.shared.inbound).extend(bytes);
    }

    /// Simulate the remote end closing: reads and writes fail from now on.
    pub fn sever(&self) {
        self.shared.severed.store(true, Ordering::SeqCst);
    }

    /// Make writes fail while reads keep working.
    pub fn fail_writes(&self, fail: bool) {
        self.shared.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// False once the owner called `disconnect`.
    pub fn is_open(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }
}

/// Scriptable connector for tests and `--dry-run`.
#[derive(Debug, Default)]
pub struct MockConnector {
    scripts: Mutex<HashMap<String, MockBehavior>>,
    opened: Mutex<Vec<(String, MockHandle)>>,
    attempts: AtomicUsize,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the next connect to `name`. Unscripted names accept.
    pub fn script(&self, name: impl Into<String>, behavior: MockBehavior) {
        lock(&self.scripts).insert(name.into(), behavior);
    }

    /// The most recent link opened for `name`.
    pub fn handle(&self, name: &str) -> Option<MockHandle> {
        lock(&self.opened)
            .iter()
            .rev()
            .find(|(n, _)| n == name)
            .map(|(_, h)| h.clone())
    }

    /// Names of every link opened, in order.
    pub fn opened(&self) -> Vec<String> {
        lock(&self.opened).iter().map(|(n, _)| n.clone()).collect()
    }

    /// Number of connects started, including refused ones.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

impl Connector for MockConnector {
    type Device = String;
    type Link = MockLink;

    fn connect(&self, name: &String) -> Result<MockLink> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        let behavior = lock(&self.scripts).remove(name).unwrap_or_default();

        let accept = match behavior {
            MockBehavior::Accept => true,
            MockBehavior::Refuse => false,
            MockBehavior::Hold(rx) => rx.recv().unwrap_or(false),
        };
        if !accept {
            tracing::debug!(device = %name, "mock connect refused");
            return Err(PrintLinkError::Io(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                format!("{} refused the connection", name),
            )));
        }

        let shared = Arc::new(Shared::default());
        shared.open.store(true, Ordering::SeqCst);
        lock(&self.opened).push((
            name.clone(),
            MockHandle {
                shared: Arc::clone(&shared),
            },
        ));
        Ok(MockLink {
            name: name.clone(),
            shared,
        })
    }
}

/// Link produced by [`MockConnector`].
#[derive(Debug)]
pub struct MockLink {
    name: String,
    shared: Arc<Shared>,
}

impl MockLink {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn check(&self) -> Result<()> {
        if !self.is_connected() {
            return Err(PrintLinkError::Transport(format!("{} is closed", self.name)));
        }
        if self.shared.severed.load(Ordering::SeqCst) {
            return Err(PrintLinkError::Io(io::Error::new(
                io::ErrorKind::ConnectionReset,
                format!("{} went away", self.name),
            )));
        }
        Ok(())
    }
}

impl Link for MockLink {
    fn write(&self, data: &[u8]) -> Result<()> {
        self.check()?;
        if self.shared.fail_writes.load(Ordering::SeqCst) {
            return Err(PrintLinkError::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "scripted write failure",
            )));
        }
        lock(&self.shared.written).extend_from_slice(data);
        self.shared.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.check()?;
        {
            let mut inbound = lock(&self.shared.inbound);
            if !inbound.is_empty() {
                let n = buf.len().min(inbound.len());
                for (dst, src) in buf.iter_mut().zip(inbound.drain(..n)) {
                    *dst = src;
                }
                return Ok(n);
            }
        }
        thread::sleep(READ_POLL);
        Ok(0)
    }

    fn disconnect(&self) {
        self.shared.open.store(false, Ordering::SeqCst);
    }

    fn is_connected(&self) -> bool {
        self.shared.open.load(Ordering::SeqCst)
    }
}
