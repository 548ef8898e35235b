//! # ESC/POS Basic Commands
//!
//! This module holds the escape bytes shared by every dialect and the
//! commands whose encoding does not vary between printers: initialization,
//! feeds, line spacing, motion units and the cash drawer pulse.
//!
//! ## Escape Sequence Structure
//!
//! Commands follow these patterns:
//! - Single byte: `LF`, `CR`
//! - Two bytes: `ESC @`, `ESC 2`
//! - Multi-byte with parameters: `ESC d n`, `ESC p m t1 t2`
//!
//! ## Length Prefixes
//!
//! Variable-length payloads carry their size as two bytes, low byte first.
//! Some commands count a fixed number of header bytes into that size, so the
//! value sent is `payload + overhead`, split as `% 256` and `/ 256`.

use crate::error::{PrintLinkError, Result};

// ============================================================================
// ESCAPE SEQUENCE CONSTANTS
// ============================================================================

/// ESC (Escape) - Command prefix byte
pub const ESC: u8 = 0x1B;

/// GS (Group Separator) - Extended command prefix
///
/// Used for graphics, barcodes, character size and cutter commands.
pub const GS: u8 = 0x1D;

/// FS (File Separator) - Double-byte character commands
pub const FS: u8 = 0x1C;

/// US (Unit Separator) - Vendor extension prefix (dual QR on CSN controllers)
pub const US: u8 = 0x1F;

/// LF (Line Feed) - Print and advance one line
pub const LF: u8 = 0x0A;

/// CR (Carriage Return) - Print and return to line start
pub const CR: u8 = 0x0D;

/// NUL - Terminator for terminated barcode data
pub const NUL: u8 = 0x00;

// ============================================================================
// INITIALIZATION
// ============================================================================

/// # Initialize Printer (ESC @)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC @ |
/// | Hex     | 1B 40 |
///
/// Clears the print buffer and resets formatting to power-on defaults.
///
/// ```
/// use printlink::protocol::commands;
///
/// assert_eq!(commands::init(), vec![0x1B, 0x40]);
/// ```
#[inline]
pub fn init() -> Vec<u8> {
    vec![ESC, b'@']
}

// ============================================================================
// PAPER FEED AND SPACING
// ============================================================================

/// # Print and Feed n Lines (ESC d n)
#[inline]
pub fn feed_lines(n: u8) -> Vec<u8> {
    vec![ESC, b'd', n]
}

/// # Set Line Spacing (ESC 3 n)
///
/// Spacing in motion units (0-255).
#[inline]
pub fn line_spacing(n: u8) -> Vec<u8> {
    vec![ESC, b'3', n]
}

/// # Default Line Spacing (ESC 2)
#[inline]
pub fn default_line_spacing() -> Vec<u8> {
    vec![ESC, b'2']
}

/// # Set Motion Units (GS P x y)
///
/// Horizontal unit becomes `25.4 / x` mm, vertical `25.4 / y` mm.
#[inline]
pub fn motion_unit(x: u8, y: u8) -> Vec<u8> {
    vec![GS, b'P', x, y]
}

/// # Absolute Print Position (ESC $ nL nH)
///
/// Moves the print head to `offset` dots from the left margin.
///
/// ```
/// use printlink::protocol::commands;
///
/// assert_eq!(commands::absolute_position(300), vec![0x1B, 0x24, 44, 1]);
/// ```
#[inline]
pub fn absolute_position(offset: u16) -> Vec<u8> {
    let [low, high] = u16_le(offset);
    vec![ESC, b'$', low, high]
}

// ============================================================================
// CASH DRAWER
// ============================================================================

/// Drawer kick-out connector pin.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawerPin {
    #[default]
    Pin2 = 0,
    Pin5 = 1,
}

/// Longest on/off pulse expressible: 255 units of 2 ms.
pub const MAX_PULSE_MS: u16 = 510;

/// # Generate Pulse (ESC p m t1 t2)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC p m t1 t2 |
/// | Hex     | 1B 70 m t1 t2 |
///
/// `t1`/`t2` are in 2 ms units, so `on_ms`/`off_ms` are halved (rounding
/// down). Both must be at most [`MAX_PULSE_MS`].
///
/// ```
/// use printlink::protocol::commands::{self, DrawerPin};
///
/// let pulse = commands::drawer_pulse(DrawerPin::Pin2, 50, 500).unwrap();
/// assert_eq!(pulse, vec![0x1B, 0x70, 0, 25, 250]);
/// ```
pub fn drawer_pulse(pin: DrawerPin, on_ms: u16, off_ms: u16) -> Result<Vec<u8>> {
    check_range("cash drawer on time (ms)", on_ms as u32, 0, MAX_PULSE_MS as u32)?;
    check_range("cash drawer off time (ms)", off_ms as u32, 0, MAX_PULSE_MS as u32)?;
    Ok(vec![ESC, b'p', pin as u8, (on_ms / 2) as u8, (off_ms / 2) as u8])
}

// ============================================================================
// HELPER FUNCTIONS
// ============================================================================

/// Encode a u16 value as little-endian bytes [low, high]
///
/// ```
/// use printlink::protocol::commands::u16_le;
///
/// assert_eq!(u16_le(0x1234), [0x34, 0x12]);
/// assert_eq!(u16_le(576), [0x40, 0x02]);
/// ```
#[inline]
pub const fn u16_le(value: u16) -> [u8; 2] {
    [(value % 256) as u8, (value / 256) as u8]
}

/// Encode a u16 value as big-endian bytes [high, low]
#[inline]
pub const fn u16_be(value: u16) -> [u8; 2] {
    [(value / 256) as u8, (value % 256) as u8]
}

/// Compute the `[pL, pH]` prefix for a payload of `len` bytes.
///
/// The prefix encodes `len + overhead`. Fails when the total does not fit
/// in 16 bits.
///
/// ```
/// use printlink::protocol::commands::length_prefix;
///
/// // 100-byte QR payload stored with function 180 (3 header bytes)
/// assert_eq!(length_prefix(100, 3).unwrap(), [103, 0]);
/// assert_eq!(length_prefix(300, 3).unwrap(), [47, 1]);
/// ```
pub fn length_prefix(len: usize, overhead: u16) -> Result<[u8; 2]> {
    let total = len + overhead as usize;
    let total = u16::try_from(total).map_err(|_| {
        PrintLinkError::invalid(format!(
            "payload of {} bytes (+{} overhead) exceeds 65535",
            len, overhead
        ))
    })?;
    Ok(u16_le(total))
}

/// Fail with `InvalidParameter` unless `min <= value <= max`.
pub(crate) fn check_range(field: &str, value: u32, min: u32, max: u32) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(PrintLinkError::invalid(format!(
            "{} must be in {}..={}, got {}",
            field, min, max, value
        )))
    }
}

// ============================================================================
// TESTS
// ============================================================================
