//! Server state and configuration.

use std::fmt;

use crate::connection::{ConnectionManager, ConnectionState, TracingObserver, WriteOutcome};
use crate::error::Result;
use crate::printer::DialectProfile;
use crate::transport::{
    Connector, MockConnector, SerialConnector, SerialDevice, UsbConnector, UsbDevice,
};

/// Which printer the server drives.
#[derive(Debug, Clone)]
pub enum LinkTarget {
    Serial(SerialDevice),
    Usb(UsbDevice),
    /// In-memory link; writes are accepted and discarded
    DryRun,
}

impl fmt::Display for LinkTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkTarget::Serial(device) => write!(f, "serial {}", device.name),
            LinkTarget::Usb(device) => write!(f, "usb {}", device),
            LinkTarget::DryRun => f.write_str("dry run"),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to listen on (e.g., "0.0.0.0:8080")
    pub listen_addr: String,
    /// Dialect for jobs that don't name one
    pub dialect: &'static DialectProfile,
    pub link: LinkTarget,
}

/// The server's view of one managed printer, independent of the medium.
pub trait PrinterSession: Send + Sync {
    fn connect(&self);
    fn disconnect(&self);
    fn write(&self, bytes: &[u8]) -> Result<WriteOutcome>;
    fn state(&self) -> ConnectionState;
}

struct Session<C: Connector> {
    manager: ConnectionManager<C>,
    device: C::Device,
}

impl<C: Connector> PrinterSession for Session<C> {
    fn connect(&self) {
        self.manager.connect(self.device.clone());
    }

    fn disconnect(&self) {
        self.manager.disconnect();
    }

    fn write(&self, bytes: &[u8]) -> Result<WriteOutcome> {
        self.manager.write(bytes)
    }

    fn state(&self) -> ConnectionState {
        self.manager.state()
    }
}

fn session<C: Connector>(connector: C, device: C::Device) -> Result<Box<dyn PrinterSession>> {
    Ok(Box::new(Session {
        manager: ConnectionManager::new(connector, TracingObserver)?,
        device,
    }))
}

/// Application state shared across handlers.
pub struct AppState {
    pub config: ServerConfig,
    pub printer: Box<dyn PrinterSession>,
}

impl AppState {
    /// Build the session for `config.link` and start connecting.
    pub fn new(config: ServerConfig) -> Result<Self> {
        let printer = match &config.link {
            LinkTarget::Serial(device) => session(SerialConnector::default(), device.clone())?,
            LinkTarget::Usb(device) => session(UsbConnector::default(), *device)?,
            LinkTarget::DryRun => session(MockConnector::new(), "dry-run".to_string())?,
        };
        printer.connect();
        Ok(Self { config, printer })
    }
}
