//! # Bluetooth SPP Transport
//!
//! This module talks to printers exposing the Serial Port Profile over an
//! RFCOMM tty.
//!
//! ## Bluetooth Setup (Linux)
//!
//! Before connecting, the printer must be paired and bound to an RFCOMM
//! device:
//!
//! ```bash
//! # 1. Find and pair the printer
//! $ bluetoothctl
//! [bluetooth]# scan on
//! [bluetooth]# pair 00:11:62:XX:XX:XX
//!
//! # 2. Bind to RFCOMM device (or `printlink bind-rfcomm <MAC>`)
//! $ sudo rfcomm bind 0 00:11:62:XX:XX:XX 1
//! # This creates /dev/rfcomm0
//! ```
//!
//! A [`SerialDevice`] names either the tty path directly or the MAC address,
//! in which case the bound tty is looked up in `/proc/net/rfcomm`.
//!
//! ## TTY Configuration
//!
//! The device is opened read/write in raw mode so binary data passes
//! unmodified:
//!
//! - **No input processing**: IGNBRK, BRKINT, PARMRK, ISTRIP, ... cleared
//! - **No output processing**: OPOST cleared (no CR/LF translation)
//! - **8N1**: CS8, no parity
//! - **No echo, non-canonical**
//! - **Read poll**: each read first polls the fd for up to the connector's
//!   read poll (~100 ms). Nothing pending is `Ok(0)`; a hangup is an error.
//!
//! ## Chunked Writes
//!
//! Large blocks are written in 4096-byte chunks with a 2 ms gap so the
//! printer's Bluetooth buffer keeps up. `disconnect` closes the tty between
//! chunks, so a long job stops as soon as the link is dropped.

use std::fs::{self, File, OpenOptions};
use std::io::{self, ErrorKind, Read, Write};
use std::os::unix::fs::OpenOptionsExt;
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::{Mutex, RwLock};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::{Connector, Link};
use crate::error::{PrintLinkError, Result};

/// Default RFCOMM device path
pub const DEFAULT_DEVICE: &str = "/dev/rfcomm0";

/// Serial Port Profile service UUID
pub const SPP_UUID: &str = "00001101-0000-1000-8000-00805F9B34FB";

/// RFCOMM channel SPP printers listen on
pub const SPP_CHANNEL: u8 = 1;

/// Default chunk size for writes (bytes)
const CHUNK_SIZE: usize = 4096;

/// Delay between chunks (milliseconds)
const CHUNK_DELAY_MS: u64 = 2;

/// Read poll interval (milliseconds)
const READ_POLL_MS: u64 = 100;

/// A printer reachable over SPP.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerialDevice {
    /// Display name
    pub name: String,
    /// Explicit tty path, e.g. `/dev/rfcomm0`
    pub path: Option<PathBuf>,
    /// Bluetooth address, used when `path` is absent
    pub mac: Option<String>,
}

impl SerialDevice {
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path: Some(path),
            mac: None,
        }
    }

    pub fn from_mac(mac: impl Into<String>) -> Self {
        let mac = mac.into();
        Self {
            name: mac.clone(),
            path: None,
            mac: Some(mac),
        }
    }

    /// The tty to open: the explicit path, or the rfcomm device bound to the MAC.
    pub fn resolve(&self) -> Result<PathBuf> {
        if let Some(path) = &self.path {
            return Ok(path.clone());
        }
        let Some(mac) = &self.mac else {
            return Err(PrintLinkError::invalid(format!(
                "serial device '{}' has neither a path nor a MAC address",
                self.name
            )));
        };
        if !is_valid_mac(mac) {
            return Err(PrintLinkError::invalid(format!(
                "invalid MAC address: {}",
                mac
            )));
        }
        find_rfcomm_for_mac(mac)?.map(PathBuf::from).ok_or_else(|| {
            PrintLinkError::Transport(format!(
                "no rfcomm device bound to {} (try `printlink bind-rfcomm {}`)",
                mac, mac
            ))
        })
    }
}

/// Opens [`SerialLink`]s.
///
/// ## Example
///
/// ```no_run
/// use printlink::transport::{Connector, Link, SerialConnector, SerialDevice};
/// use printlink::protocol::commands;
///
/// let link = SerialConnector::default().connect(&SerialDevice::from_path("/dev/rfcomm0"))?;
/// link.write(&commands::init())?;
///
/// # Ok::<(), printlink::error::PrintLinkError>(())
/// ```
#[derive(Debug, Clone)]
pub struct SerialConnector {
    /// Larger chunks are faster but may overflow the Bluetooth buffer.
    pub chunk_size: usize,
    /// Longer delays give the printer more time to process data.
    pub chunk_delay: Duration,
    /// How long a read waits for data before returning `Ok(0)`.
    pub read_poll: Duration,
}

impl Default for SerialConnector {
    fn default() -> Self {
        Self {
            chunk_size: CHUNK_SIZE,
            chunk_delay: Duration::from_millis(CHUNK_DELAY_MS),
            read_poll: Duration::from_millis(READ_POLL_MS),
        }
    }
}

impl Connector for SerialConnector {
    type Device = SerialDevice;
    type Link = SerialLink;

    #[tracing::instrument(skip(self), fields(device = %device.name))]
    fn connect(&self, device: &SerialDevice) -> Result<SerialLink> {
        let path = device.resolve()?;

        // Never become the controlling terminal of this process.
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .custom_flags(libc::O_NOCTTY)
            .open(&path)
            .map_err(|e| {
                PrintLinkError::Transport(format!("Failed to open {}: {}", path.display(), e))
            })?;

        configure_tty_raw(file.as_raw_fd(), vtime_for(self.read_poll))?;
        tracing::info!(path = %path.display(), "serial link open");

        Ok(SerialLink {
            file: RwLock::new(Some(file)),
            path,
            write_lock: Mutex::new(()),
            chunk_size: self.chunk_size.max(1),
            chunk_delay: self.chunk_delay,
            read_poll: self.read_poll,
            connected: AtomicBool::new(true),
        })
    }
}

/// A raw-mode RFCOMM tty.
///
/// Reads and writes share the descriptor through a read lock; `disconnect`
/// takes the write lock and closes it, waiting at most for the chunk or poll
/// in progress.
#[derive(Debug)]
pub struct SerialLink {
    file: RwLock<Option<File>>,
    path: PathBuf,
    write_lock: Mutex<()>,
    chunk_size: usize,
    chunk_delay: Duration,
    read_poll: Duration,
    connected: AtomicBool,
}

impl SerialLink {
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn closed(&self) -> PrintLinkError {
        PrintLinkError::Transport(format!("{} is closed", self.path.display()))
    }

    fn hung_up(&self) -> PrintLinkError {
        PrintLinkError::Transport(format!("{} hung up", self.path.display()))
    }

    fn with_file<T>(&self, op: impl FnOnce(&File) -> Result<T>) -> Result<T> {
        let guard = self.file.read().unwrap_or_else(|poisoned| poisoned.into_inner());
        match guard.as_ref() {
            Some(file) if self.is_connected() => op(file),
            _ => Err(self.closed()),
        }
    }
}

impl Link for SerialLink {
    /// Writes in chunks, re-checking the link before each one.
    fn write(&self, data: &[u8]) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| PrintLinkError::Transport("serial writer poisoned".to_string()))?;

        let sent = super::write_chunked(
            data,
            self.chunk_size,
            self.chunk_delay,
            || self.is_connected(),
            |chunk| {
                self.with_file(|mut file| {
                    file.write_all(chunk)
                        .map_err(|e| PrintLinkError::Transport(format!("Write failed: {}", e)))?;
                    Ok(chunk.len())
                })
            },
        )?;
        tracing::debug!(bytes = sent, "serial write");
        Ok(())
    }

    /// Polls first so a hung-up tty is an error rather than an endless `Ok(0)`.
    fn read(&self, buf: &mut [u8]) -> Result<usize> {
        self.with_file(|mut file| {
            match wait_readable(file.as_raw_fd(), self.read_poll)? {
                Readiness::Idle => return Ok(0),
                Readiness::HungUp => return Err(self.hung_up()),
                Readiness::Readable => {}
            }
            match file.read(buf) {
                // Readable but nothing to read: end of file.
                Ok(0) => Err(self.hung_up()),
                Ok(n) => Ok(n),
                Err(e) if matches!(e.kind(), ErrorKind::Interrupted | ErrorKind::WouldBlock) => {
                    Ok(0)
                }
                // A tty whose other end is gone reads as EIO.
                Err(e) if e.raw_os_error() == Some(libc::EIO) => Err(self.hung_up()),
                Err(e) => Err(PrintLinkError::Transport(format!("Read failed: {}", e))),
            }
        })
    }

    fn disconnect(&self) {
        if self.connected.swap(false, Ordering::SeqCst) {
            let file = self
                .file
                .write()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .take();
            drop(file);
            tracing::info!(path = %self.path.display(), "serial link closed");
        }
    }

    fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }
}

/// What `poll` said about a descriptor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Readiness {
    Readable,
    Idle,
    HungUp,
}

/// Pending input wins over a hangup so buffered bytes are still delivered.
fn readiness(revents: i16) -> Readiness {
    if revents & libc::POLLIN != 0 {
        Readiness::Readable
    } else if revents & (libc::POLLHUP | libc::POLLERR | libc::POLLNVAL) != 0 {
        Readiness::HungUp
    } else {
        Readiness::Idle
    }
}

#[cfg(unix)]
fn wait_readable(fd: i32, timeout: Duration) -> Result<Readiness> {
    let mut pfd = libc::pollfd {
        fd,
        events: libc::POLLIN,
        revents: 0,
    };
    let millis = timeout.as_millis().clamp(1, i32::MAX as u128) as libc::c_int;
    let result = unsafe { libc::poll(&mut pfd, 1, millis) };
    if result < 0 {
        let err = io::Error::last_os_error();
        if err.kind() == ErrorKind::Interrupted {
            return Ok(Readiness::Idle);
        }
        return Err(PrintLinkError::Transport(format!("poll failed: {}", err)));
    }
    if result == 0 {
        return Ok(Readiness::Idle);
    }
    Ok(readiness(pfd.revents))
}

#[cfg(not(unix))]
fn wait_readable(_fd: i32, _timeout: Duration) -> Result<Readiness> {
    Ok(Readiness::Readable)
}

/// VTIME is in deciseconds, 1..=255.
fn vtime_for(poll: Duration) -> u8 {
    (poll.as_millis() / 100).clamp(1, 255) as u8
}

/// Configure a file descriptor for raw TTY mode.
///
/// This disables all input/output processing so binary data passes through
/// unmodified, and sets VMIN=0 / VTIME=`vtime` so reads time out.
///
/// ## What Gets Disabled
///
/// - **Input flags**: IGNBRK, BRKINT, PARMRK, ISTRIP, INLCR, IGNCR, ICRNL, IXON, IXOFF, IXANY
/// - **Output flags**: OPOST
/// - **Local flags**: ECHO, ECHONL, ICANON, ISIG, IEXTEN
/// - **Control flags**: CSIZE, PARENB (then CS8 is set)
///
/// Note: IXON/IXOFF/IXANY disable XON/XOFF software flow control. 0x11 and
/// 0x13 appear in raster data.
#[cfg(unix)]
fn configure_tty_raw(fd: i32, vtime: u8) -> Result<()> {
    use std::mem::MaybeUninit;

    let mut termios = MaybeUninit::uninit();
    let result = unsafe { libc::tcgetattr(fd, termios.as_mut_ptr()) };
    if result != 0 {
        return Err(PrintLinkError::Transport(format!(
            "tcgetattr failed: {}",
            io::Error::last_os_error()
        )));
    }
    let mut termios = unsafe { termios.assume_init() };

    termios.c_iflag &= !(libc::IGNBRK
        | libc::BRKINT
        | libc::PARMRK
        | libc::ISTRIP
        | libc::INLCR
        | libc::IGNCR
        | libc::ICRNL
        | libc::IXON
        | libc::IXOFF
        | libc::IXANY);

    termios.c_oflag &= !libc::OPOST;

    termios.c_lflag &= !(libc::ECHO | libc::ECHONL | libc::ICANON | libc::ISIG | libc::IEXTEN);

    termios.c_cflag &= !(libc::CSIZE | libc::PARENB);
    termios.c_cflag |= libc::CS8 | libc::CREAD | libc::CLOCAL;

    termios.c_cc[libc::VMIN] = 0;
    termios.c_cc[libc::VTIME] = vtime;

    let result = unsafe { libc::tcsetattr(fd, libc::TCSANOW, &termios) };
    if result != 0 {
        return Err(PrintLinkError::Transport(format!(
            "tcsetattr failed: {}",
            io::Error::last_os_error()
        )));
    }

    Ok(())
}

#[cfg(not(unix))]
fn configure_tty_raw(_fd: i32, _vtime: u8) -> Result<()> {
    Ok(())
}

// ============================================================================
// RFCOMM SETUP HELPERS
// ============================================================================

/// Validate a Bluetooth MAC address format (XX:XX:XX:XX:XX:XX).
pub fn is_valid_mac(mac: &str) -> bool {
    let parts: Vec<&str> = mac.split(':').collect();
    if parts.len() != 6 {
        return false;
    }
    parts
        .iter()
        .all(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_hexdigit()))
}

/// Device path for the first line of an rfcomm listing that mentions `mac`.
///
/// Lines look like `rfcomm0: 00:11:62:AA:BB:CC channel 1 clean`.
fn rfcomm_device_in(listing: &str, mac: &str) -> Option<String> {
    let mac_upper = mac.to_uppercase();
    listing
        .lines()
        .filter(|line| line.to_uppercase().contains(&mac_upper))
        .filter_map(|line| line.split(':').next())
        .map(|dev_name| format!("/dev/{}", dev_name.trim()))
        .find(|path| Path::new(path).exists())
}

/// Find an existing RFCOMM device bound to the given MAC address.
///
/// Checks `/proc/net/rfcomm` and falls back to `rfcomm -a`.
#[cfg(unix)]
pub fn find_rfcomm_for_mac(mac: &str) -> Result<Option<String>> {
    if let Ok(contents) = fs::read_to_string("/proc/net/rfcomm") {
        if let Some(path) = rfcomm_device_in(&contents, mac) {
            return Ok(Some(path));
        }
    }

    let output = Command::new("rfcomm")
        .arg("-a")
        .output()
        .map_err(|e| PrintLinkError::Transport(format!("Failed to run 'rfcomm -a': {}", e)))?;

    Ok(rfcomm_device_in(&String::from_utf8_lossy(&output.stdout), mac))
}

#[cfg(not(unix))]
pub fn find_rfcomm_for_mac(_mac: &str) -> Result<Option<String>> {
    Ok(None)
}

/// Arguments for `rfcomm` binding `/dev/rfcomm<index>` to `mac` on `channel`.
fn rfcomm_bind_args(index: u8, mac: &str, channel: u8) -> Vec<String> {
    vec![
        "bind".to_string(),
        index.to_string(),
        mac.to_uppercase(),
        channel.to_string(),
    ]
}

/// Bind `/dev/rfcomm<index>` to a Bluetooth MAC address.
///
/// Runs `bluetoothctl connect`, `l2ping -c 1` and
/// `rfcomm bind <index> <MAC> <channel>`. SPP printers normally listen on
/// [`SPP_CHANNEL`].
///
/// **Requires root privileges** for `rfcomm bind`.
#[cfg(unix)]
pub fn setup_rfcomm(mac: &str, index: u8, channel: u8) -> Result<String> {
    if !is_valid_mac(mac) {
        return Err(PrintLinkError::invalid(format!(
            "invalid MAC address: {}",
            mac
        )));
    }
    let mac_upper = mac.to_uppercase();
    let device_path = format!("/dev/rfcomm{}", index);

    // May fail if already connected; l2ping decides.
    tracing::info!(mac = %mac_upper, "connecting");
    let output = Command::new("bluetoothctl")
        .arg("connect")
        .arg(&mac_upper)
        .output()
        .map_err(|e| PrintLinkError::Transport(format!("Failed to run bluetoothctl: {}", e)))?;

    let stdout = String::from_utf8_lossy(&output.stdout);
    if !(stdout.contains("Connection successful") || stdout.contains("already connected")) {
        tracing::warn!(output = %stdout.trim(), "bluetoothctl did not confirm connection");
    }

    thread::sleep(Duration::from_millis(500));

    let output = Command::new("l2ping")
        .arg("-c")
        .arg("1")
        .arg(&mac_upper)
        .output()
        .map_err(|e| PrintLinkError::Transport(format!("Failed to run l2ping: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrintLinkError::Transport(format!(
            "Device {} not reachable: {}",
            mac_upper,
            stderr.trim()
        )));
    }

    tracing::info!(index, channel, "binding rfcomm");
    let output = Command::new("rfcomm")
        .args(rfcomm_bind_args(index, &mac_upper, channel))
        .output()
        .map_err(|e| PrintLinkError::Transport(format!("Failed to run rfcomm bind: {}", e)))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(PrintLinkError::Transport(format!(
            "rfcomm bind failed: {}",
            stderr.trim()
        )));
    }

    thread::sleep(Duration::from_millis(500));

    if !Path::new(&device_path).exists() {
        return Err(PrintLinkError::Transport(format!(
            "Device {} was not created",
            device_path
        )));
    }

    tracing::info!(path = %device_path, "rfcomm bound");
    Ok(device_path)
}

#[cfg(not(unix))]
pub fn setup_rfcomm(_mac: &str, _index: u8, _channel: u8) -> Result<String> {
    Err(PrintLinkError::unsupported(
        "RFCOMM setup not supported on this platform",
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_valid_mac_addresses() {
        assert!(is_valid_mac("00:11:22:33:44:55"));
        assert!(is_valid_mac("AA:BB:CC:DD:EE:FF"));
        assert!(is_valid_mac("aa:bb:cc:dd:ee:ff"));
    }

    #[test]
    fn test_invalid_mac_addresses() {
        assert!(!is_valid_mac("00:11:22:33:44")); // too short
        assert!(!is_valid_mac("00:11:22:33:44:55:66")); // too long
        assert!(!is_valid_mac("00-11-22-33-44-55")); // wrong separator
        assert!(!is_valid_mac("GG:HH:II:JJ:KK:LL")); // invalid hex
        assert!(!is_valid_mac(""));
    }

    #[test]
    fn test_connector_defaults() {
        let connector = SerialConnector::default();
        assert_eq!(connector.chunk_size, 4096);
        assert_eq!(connector.chunk_delay, Duration::from_millis(2));
        assert_eq!(vtime_for(connector.read_poll), 1);
    }

    #[test]
    fn test_vtime_clamped() {
        assert_eq!(vtime_for(Duration::ZERO), 1);
        assert_eq!(vtime_for(Duration::from_millis(350)), 3);
        assert_eq!(vtime_for(Duration::from_secs(60)), 255);
    }

    #[test]
    fn test_rfcomm_listing_parse() {
        // /dev/null stands in for a device node that exists
        let listing = "null: 00:11:62:AA:BB:CC channel 1 clean\n\
                       rfcomm9: 00:11:62:00:00:01 channel 1 closed\n";
        assert_eq!(
            rfcomm_device_in(listing, "00:11:62:aa:bb:cc"),
            Some("/dev/null".to_string())
        );
        assert_eq!(rfcomm_device_in(listing, "11:11:11:11:11:11"), None);
    }

    #[test]
    fn test_rfcomm_bind_args_keep_index_and_channel_apart() {
        assert_eq!(
            rfcomm_bind_args(2, "00:11:62:aa:bb:cc", 3),
            vec!["bind", "2", "00:11:62:AA:BB:CC", "3"]
        );
        assert_eq!(
            rfcomm_bind_args(0, "00:11:62:AA:BB:CC", SPP_CHANNEL),
            vec!["bind", "0", "00:11:62:AA:BB:CC", "1"]
        );
    }

    #[test]
    fn test_readiness_from_revents() {
        assert_eq!(readiness(0), Readiness::Idle);
        assert_eq!(readiness(libc::POLLIN), Readiness::Readable);
        assert_eq!(readiness(libc::POLLIN | libc::POLLHUP), Readiness::Readable);
        assert_eq!(readiness(libc::POLLHUP), Readiness::HungUp);
        assert_eq!(readiness(libc::POLLERR), Readiness::HungUp);
        assert_eq!(readiness(libc::POLLNVAL), Readiness::HungUp);
        assert_eq!(readiness(libc::POLLOUT), Readiness::Idle);
    }

    #[test]
    fn test_resolve_prefers_path() {
        let device = SerialDevice {
            name: "tsp".into(),
            path: Some(PathBuf::from("/dev/rfcomm3")),
            mac: Some("00:11:22:33:44:55".into()),
        };
        assert_eq!(device.resolve().unwrap(), PathBuf::from("/dev/rfcomm3"));
    }

    #[test]
    fn test_resolve_rejects_bad_mac() {
        let err = SerialDevice::from_mac("nope").resolve().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_connect_missing_tty_fails() {
        let device = SerialDevice::from_path("/dev/printlink-does-not-exist");
        let err = SerialConnector::default().connect(&device).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
    }

    /// A pseudo-terminal: the master end and the path of the slave tty.
    #[cfg(target_os = "linux")]
    fn open_pty() -> (File, PathBuf) {
        use std::ffi::CStr;
        use std::os::unix::io::FromRawFd;

        unsafe {
            let master = libc::posix_openpt(libc::O_RDWR | libc::O_NOCTTY);
            assert!(master >= 0, "posix_openpt: {}", io::Error::last_os_error());
            assert_eq!(libc::grantpt(master), 0);
            assert_eq!(libc::unlockpt(master), 0);
            let mut name = [0 as libc::c_char; 128];
            assert_eq!(libc::ptsname_r(master, name.as_mut_ptr(), name.len()), 0);
            let path = CStr::from_ptr(name.as_ptr()).to_string_lossy().into_owned();
            (File::from_raw_fd(master), PathBuf::from(path))
        }
    }

    #[cfg(target_os = "linux")]
    fn slow_connector() -> SerialConnector {
        SerialConnector {
            chunk_size: 1,
            chunk_delay: Duration::from_millis(25),
            read_poll: Duration::from_millis(100),
        }
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_disconnect_stops_chunked_write() {
        use std::sync::Arc;
        use std::time::Instant;

        let (_master, slave) = open_pty();
        let link = Arc::new(
            slow_connector()
                .connect(&SerialDevice::from_path(&slave))
                .unwrap(),
        );

        // 40 chunks at 25 ms each would take a second to finish.
        let writer = {
            let link = Arc::clone(&link);
            thread::spawn(move || {
                let started = Instant::now();
                let result = link.write(&[0x55; 40]);
                (result, started.elapsed())
            })
        };

        thread::sleep(Duration::from_millis(100));
        link.disconnect();
        let (result, elapsed) = writer.join().unwrap();

        let err = result.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(elapsed < Duration::from_millis(500), "write ran {:?}", elapsed);
        assert!(!link.is_connected());
        assert!(link.write(&[0x0A]).is_err());
        assert!(link.read(&mut [0u8; 8]).is_err());
    }

    #[cfg(target_os = "linux")]
    #[test]
    fn test_read_reports_hangup() {
        let (master, slave) = open_pty();
        let link = slow_connector()
            .connect(&SerialDevice::from_path(&slave))
            .unwrap();

        let mut buf = [0u8; 8];
        assert_eq!(link.read(&mut buf).unwrap(), 0);

        (&master).write_all(&[0x16]).unwrap();
        assert_eq!(link.read(&mut buf).unwrap(), 1);
        assert_eq!(buf[0], 0x16);

        drop(master);
        let err = link.read(&mut buf).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Io);
        assert!(err.to_string().contains("hung up"), "{}", err);
    }
}
