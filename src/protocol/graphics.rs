//! # ESC/POS Raster Graphics Commands
//!
//! This module implements the raster bit image command and the band
//! splitting that long images need.
//!
//! ## Raster Format
//!
//! Each row is `ceil(width / 8)` bytes, 8 pixels per byte, MSB first.
//! A set bit prints a black dot.
//!
//! ```text
//! Byte:    0b10110000
//!          ││││││││
//! Pixel:   01234567
//!          █ ██
//! ```
//!
//! ## Compressed Raster
//!
//! Controllers that accept compressed images take a payload-length field after
//! the usual raster header. The opcode is dialect data; the frame is:
//!
//! ```text
//! opcode.. m xL xH yL yH l0 l1 l2 l3 payload..
//! ```
//!
//! where `l0..l3` is the payload length, little-endian.

use super::commands::{GS, u16_le};
use crate::error::{PrintLinkError, Result};

/// # Print Raster Bit Image (GS v 0 m xL xH yL yH d1...dk)
///
/// ## Protocol Details
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS v 0 m xL xH yL yH data |
/// | Hex     | 1D 76 30 m xL xH yL yH data |
///
/// - `m`: 0 = normal density
/// - `xL + xH × 256`: width in **bytes** (`ceil(dots / 8)`)
/// - `yL + yH × 256`: height in rows
///
/// ```
/// use printlink::protocol::graphics;
///
/// let data = vec![0xAA; 72 * 100]; // 576 dots wide
/// let cmd = graphics::raster(72, 100, &data);
///
/// assert_eq!(&cmd[0..4], &[0x1D, 0x76, 0x30, 0x00]);
/// assert_eq!(cmd[4], 72);  // xL
/// assert_eq!(cmd[5], 0);   // xH
/// assert_eq!(cmd[6], 100); // yL
/// assert_eq!(cmd[7], 0);   // yH
/// assert_eq!(cmd.len(), 8 + 72 * 100);
/// ```
pub fn raster(width_bytes: u16, height: u16, data: &[u8]) -> Vec<u8> {
    debug_assert_eq!(
        data.len(),
        width_bytes as usize * height as usize,
        "raster data length mismatch"
    );

    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(8 + data.len());
    cmd.extend([GS, b'v', b'0', 0, xl, xh, yl, yh]);
    cmd.extend_from_slice(data);
    cmd
}

/// Split packed image rows into raster commands of at most `max_rows` rows.
///
/// Printers with small receive buffers drop data when one raster command
/// carries too many rows. `max_rows = 1` yields one command per line.
///
/// ```
/// use printlink::protocol::graphics;
///
/// let data = vec![0u8; 2 * 600]; // 16 dots wide, 600 rows
/// let cmd = graphics::raster_bands(2, 600, &data, 256);
///
/// // 256 + 256 + 88 rows, 8 header bytes each
/// assert_eq!(cmd.len(), 3 * 8 + data.len());
/// ```
pub fn raster_bands(width_bytes: u16, height: u16, data: &[u8], max_rows: u16) -> Vec<u8> {
    let row_bytes = width_bytes as usize;
    let max_rows = max_rows.max(1) as usize;
    let mut out = Vec::with_capacity(data.len() + 8 * (height as usize).div_ceil(max_rows));

    if row_bytes == 0 {
        return out;
    }
    for (band, rows) in data.chunks(row_bytes * max_rows).enumerate() {
        let band_height = rows.len() / row_bytes;
        debug_assert!(band * max_rows + band_height <= height as usize);
        out.extend(raster(width_bytes, band_height as u16, rows));
    }
    out
}

/// Frame a compressed raster payload behind a dialect-supplied opcode.
pub fn compressed_raster(
    opcode: &[u8],
    width_bytes: u16,
    height: u16,
    payload: &[u8],
) -> Result<Vec<u8>> {
    let len = u32::try_from(payload.len()).map_err(|_| {
        PrintLinkError::invalid(format!(
            "compressed image of {} bytes is too large",
            payload.len()
        ))
    })?;
    let [xl, xh] = u16_le(width_bytes);
    let [yl, yh] = u16_le(height);

    let mut cmd = Vec::with_capacity(opcode.len() + 9 + payload.len());
    cmd.extend_from_slice(opcode);
    cmd.extend([0, xl, xh, yl, yh]);
    cmd.extend(len.to_le_bytes());
    cmd.extend_from_slice(payload);
    Ok(cmd)
}

// ============================================================================
// TESTS
// ============================================================================
