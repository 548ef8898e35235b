//! # USB Printer-Class Transport
//!
//! Talks to printers over the bulk endpoints of a USB printer-class
//! interface (class 7, subclass 1) using `rusb`.
//!
//! Connecting:
//!
//! 1. Find the device by vendor/product id (and bus/address when given)
//! 2. Open it and scan the active configuration for a printer interface with
//!    one bulk-OUT and one bulk-IN endpoint
//! 3. Let libusb detach the kernel `usblp` driver, then claim the interface
//!
//! Writes go out in 4096-byte bulk transfers, checking the link before each.
//! `disconnect` releases the interface at once so the printer can be claimed
//! again; the handle itself closes when the [`UsbLink`] drops.

use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use rusb::{
    ConfigDescriptor, Device, DeviceHandle, Direction, GlobalContext, TransferType, UsbContext,
};
use serde::{Deserialize, Serialize};

use super::{Connector, Link};
use crate::error::{PrintLinkError, Result};

/// USB printer device class
pub const PRINTER_CLASS: u8 = 7;

/// Printer subclass
pub const PRINTER_SUBCLASS: u8 = 1;

/// Bulk transfer timeout (milliseconds)
const TIMEOUT_MS: u64 = 3000;

/// Read poll interval (milliseconds)
const READ_POLL_MS: u64 = 100;

/// Largest single bulk-OUT transfer (bytes)
const CHUNK_SIZE: usize = 4096;

/// A printer addressed by USB ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsbDevice {
    pub vendor_id: u16,
    pub product_id: u16,
    /// Narrow the match when several identical printers are attached
    pub bus: Option<u8>,
    pub address: Option<u8>,
}

impl UsbDevice {
    pub fn new(vendor_id: u16, product_id: u16) -> Self {
        Self {
            vendor_id,
            product_id,
            bus: None,
            address: None,
        }
    }

    fn matches<T: UsbContext>(&self, device: &Device<T>) -> bool {
        let Ok(desc) = device.device_descriptor() else {
            return false;
        };
        desc.vendor_id() == self.vendor_id
            && desc.product_id() == self.product_id
            && self.bus.is_none_or(|bus| bus == device.bus_number())
            && self.address.is_none_or(|addr| addr == device.address())
    }
}

impl fmt::Display for UsbDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04x}:{:04x}", self.vendor_id, self.product_id)?;
        if let (Some(bus), Some(address)) = (self.bus, self.address) {
            write!(f, "@{:03}:{:03}", bus, address)?;
        }
        Ok(())
    }
}

/// Parses `VID:PID` in hex, e.g. `0fe6:811e`.
impl FromStr for UsbDevice {
    type Err = PrintLinkError;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |part: &str| {
            u16::from_str_radix(part.trim_start_matches("0x"), 16)
                .map_err(|_| PrintLinkError::invalid(format!("invalid USB id '{}'", s)))
        };
        match s.split_once(':') {
            Some((vid, pid)) => Ok(Self::new(parse(vid)?, parse(pid)?)),
            None => Err(PrintLinkError::invalid(format!(
                "expected VID:PID, got '{}'",
                s
            ))),
        }
    }
}

/// The claimed interface and its endpoint pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PrinterInterface {
    number: u8,
    setting: u8,
    ep_out: u8,
    ep_in: u8,
}

fn find_printer_interface(config: &ConfigDescriptor) -> Option<PrinterInterface> {
    for interface in config.interfaces() {
        for desc in interface.descriptors() {
            if desc.class_code() != PRINTER_CLASS || desc.sub_class_code() != PRINTER_SUBCLASS {
                continue;
            }
            let bulk = |dir: Direction| {
                desc.endpoint_descriptors()
                    .find(|ep| ep.transfer_type() == TransferType::Bulk && ep.direction() == dir)
                    .map(|ep| ep.address())
            };
            if let (Some(ep_out), Some(ep_in)) = (bulk(Direction::Out), bulk(Direction::In)) {
                return Some(PrinterInterface {
                    number: desc.interface_number(),
                    setting: desc.setting_number(),
                    ep_out,
                    ep_in,
                });
            }
        }
    }
    None
}

/// Opens [`UsbLink`]s.
#[derive(Debug, Clone)]
pub struct UsbConnector {
    /// Per-transfer timeout for writes
    pub timeout: Duration,
    /// How long a read waits for data before returning `Ok(0)`
    pub read_poll: Duration,
}

impl Default for UsbConnector {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(TIMEOUT_MS),
            read_poll: Duration::from_millis(READ_POLL_MS),
        }
    }
}

impl Connector for UsbConnector {
    type Device = UsbDevice;
    type Link = UsbLink;

    #[tracing::instrument(skip(self), fields(device = %device))]
    fn connect(&self, device: &UsbDevice) -> Result<UsbLink> {
        let found = rusb::devices()?
            .iter()
            .find(|d| device.matches(d))
            .ok_or_else(|| PrintLinkError::Transport(format!("USB device {} not found", device)))?;

        let config = found.active_config_descriptor()?;
        let iface = find_printer_interface(&config).ok_or_else(|| {
            PrintLinkError::unsupported(format!(
                "{} has no printer interface with bulk endpoints",
                device
            ))
        })?;

        let handle = found.open()?;
        if let Err(e) = handle.set_auto_detach_kernel_driver(true) {
            // Not supported on every platform; claiming may still succeed.
            tracing::debug!(error = %e, "auto-detach unavailable");
        }
        handle.claim_interface(iface.number)?;
        if iface.setting != 0 {
            handle.set_alternate_setting(iface.number, iface.setting)?;
        }

        tracing::info!(
            interface = iface.number,
            ep_out = iface.ep_out,
            ep_in = iface.ep_in,
            "usb link open"
        );

        Ok(UsbLink {
            handle,
            iface,
            timeout: self.timeout,
            read_poll: self.read_poll,
            connected: AtomicBool::new(true),
        })
    }
}

/// A claimed printer interface.
pub struct UsbLink {
    handle: DeviceHandle<GlobalContext>,
    iface: PrinterInterface,
    timeout: Duration,
    read_poll: Duration,
    connected: AtomicBool,
}

impl UsbLink {
    fn ensure_open(&self) -> Result<()> {
        if self.is_connected() {
            Ok(())
        } else {
            Err(PrintLinkError::Transport("USB link is closed".to_string()))
        }
    }

    fn release(&self) {
        if let Err(e) = self.handle.release_interface(self.iface.number) {
            tracing::debug!(error = %e, "release_interface failed");
        }
    }
}

impl Link for UsbLink {
    fn write(&self, data: &[u8]) -> Result<()> {
        self.ensure_open()?;
        let sent = super::write_chunked(
            data,
            CHUNK_SIZE,
            Duration::ZERO,
            || self.is_connected(),
            |chunk| {
                self.handle
                    .write_bulk(self.iface.ep_out, chunk, self.timeout)
                    .map_err(|e| PrintLinkError::Transport(format!("bulk write failed: {}", e)))
            },
        )?;
        tracing::debug!(bytes = sent, "usb write");
        Ok(())
    }

    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.ensure_open()?;
        match self.handle.read_bulk(self.iface.ep_in, buf, self.read_poll) {
            Ok(n) => Ok(n),
            Err(rusb::Error::Timeout) => Ok(0),
            Err(e) => Err(PrintLinkError::Transport(format!("bulk read failed: {}", e))),
        }
    }

    fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.release();
            tracing::info!(interface = self.iface.number, "usb link closed");
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

impl Drop for UsbLink {
    fn drop(&mut self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            self.release();
        }
    }
}

impl fmt::Debug for UsbLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UsbLink")
            .field("iface", &self.iface)
            .field("connected", &self.is_connected())
            .finish()
    }
}
