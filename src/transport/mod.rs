//! # Printer Transport Layer
//!
//! This module provides the duplex byte channels a
//! [`ConnectionManager`](crate::connection::ConnectionManager) drives.
//!
//! ## Available Transports
//!
//! - [`serial`]: Bluetooth SPP via an RFCOMM tty (Linux)
//! - [`usb`]: USB printer-class bulk endpoints (`rusb`)
//! - [`mock`]: in-memory link for tests and dry runs
//!
//! ## Traits
//!
//! A [`Connector`] turns a device description into a live [`Link`]. Links are
//! shared between the writer and the background reader, so every method takes
//! `&self` and implementations synchronise internally.

pub mod mock;
pub mod serial;
pub mod usb;

use std::fmt::Debug;
use std::thread;
use std::time::Duration;

use crate::error::{PrintLinkError, Result};

pub use mock::{MockBehavior, MockConnector, MockHandle, MockLink};
pub use serial::{SerialConnector, SerialDevice, SerialLink};
pub use usb::{UsbConnector, UsbDevice, UsbLink};

/// A connected byte channel to a printer.
pub trait Link: Send + Sync {
    /// Write all of `data`, blocking until accepted by the OS or device.
    fn write(&self, data: &[u8]) -> Result<()>;

    /// Read available bytes into `buf`.
    ///
    /// Blocks for at most one poll interval and returns `Ok(0)` when nothing
    /// arrived. Fails once the link is closed or the medium reports an error.
    fn read(&self, buf: &mut [u8]) -> Result<usize>;

    /// Close the link now: the OS channel is closed (or the USB interface
    /// released) before this returns. Idempotent. An in-flight write stops at
    /// the next chunk and fails; an in-flight read returns within one poll.
    fn disconnect(&self);

    fn is_connected(&self) -> bool;
}

/// Opens links for one kind of physical medium.
pub trait Connector: Send + Sync + 'static {
    /// Everything needed to address one printer on this medium.
    type Device: Clone + Debug + Send + Sync + 'static;
    type Link: Link + 'static;

    /// Blocking connect. Called from the manager's connect thread.
    fn connect(&self, device: &Self::Device) -> Result<Self::Link>;
}

/// Feed `data` to `send` one chunk at a time.
///
/// `open` is checked before every chunk, so a link closed mid-write stops
/// sending and the write fails. `send` may accept fewer bytes than offered;
/// the rest is resent. Returns the number of bytes sent.
pub(crate) fn write_chunked(
    data: &[u8],
    chunk_size: usize,
    delay: Duration,
    open: impl Fn() -> bool,
    mut send: impl FnMut(&[u8]) -> Result<usize>,
) -> Result<usize> {
    let chunk_size = chunk_size.max(1);
    let mut sent = 0;
    while sent < data.len() {
        if !open() {
            return Err(PrintLinkError::Transport(format!(
                "link closed after {} of {} bytes",
                sent,
                data.len()
            )));
        }
        let end = (sent + chunk_size).min(data.len());
        let n = send(&data[sent..end])?;
        if n == 0 {
            return Err(PrintLinkError::Transport(
                "link accepted no bytes".to_string(),
            ));
        }
        sent += n;
        if sent < data.len() && !delay.is_zero() {
            thread::sleep(delay);
        }
    }
    Ok(sent)
}
