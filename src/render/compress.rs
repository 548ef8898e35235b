//! # Raster Compression
//!
//! Payload compression for controllers that accept compressed raster frames.
//!
//! - Run-length: PackBits, applied to each row independently so a row never
//!   shares a run with its neighbour.
//! - Symbol-table: zlib-wrapped deflate at the best compression level.
//!
//! Framing (opcode, dimensions, payload length) is done by
//! [`graphics::compressed_raster`](crate::protocol::graphics::compressed_raster).

use std::io::Write;

use flate2::Compression as Level;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Raster payload compression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Compression {
    /// Plain `GS v 0` raster
    #[default]
    None,
    /// PackBits per row
    RunLength,
    /// Deflate (zlib stream)
    Deflate,
}

const MAX_RUN: usize = 128;

/// PackBits-encode one row, appending to `out`.
///
/// Header byte `n`:
/// - `0..=127`: copy the next `n + 1` bytes literally
/// - `129..=255`: repeat the next byte `257 - n` times
pub fn pack_bits(row: &[u8], out: &mut Vec<u8>) {
    let mut i = 0;
    while i < row.len() {
        let run = row[i..]
            .iter()
            .take(MAX_RUN)
            .take_while(|&&b| b == row[i])
            .count();
        if run >= 2 {
            out.push((257 - run) as u8);
            out.push(row[i]);
            i += run;
            continue;
        }

        // Literal block: stop before the next repeat of two or more.
        let start = i;
        while i < row.len() && i - start < MAX_RUN {
            if i + 1 < row.len() && row[i] == row[i + 1] {
                break;
            }
            i += 1;
        }
        out.push((i - start - 1) as u8);
        out.extend_from_slice(&row[start..i]);
    }
}

/// PackBits-encode packed raster rows of `width_bytes` each.
pub fn run_length(data: &[u8], width_bytes: usize) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() / 2);
    if width_bytes == 0 {
        return out;
    }
    for row in data.chunks(width_bytes) {
        pack_bits(row, &mut out);
    }
    out
}

/// Deflate packed raster data into a zlib stream.
pub fn deflate(data: &[u8]) -> Result<Vec<u8>> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Level::best());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::ZlibDecoder;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    fn unpack_bits(mut input: &[u8]) -> Vec<u8> {
        let mut out = Vec::new();
        while let Some((&n, rest)) = input.split_first() {
            if n < 128 {
                let len = n as usize + 1;
                out.extend_from_slice(&rest[..len]);
                input = &rest[len..];
            } else {
                let len = 257 - n as usize;
                out.extend(std::iter::repeat_n(rest[0], len));
                input = &rest[1..];
            }
        }
        out
    }

    #[test]
    fn test_pack_bits_run() {
        let mut out = Vec::new();
        pack_bits(&[0xFF; 10], &mut out);
        assert_eq!(out, vec![247, 0xFF]);
    }

    #[test]
    fn test_pack_bits_literal() {
        let mut out = Vec::new();
        pack_bits(&[1, 2, 3], &mut out);
        assert_eq!(out, vec![2, 1, 2, 3]);
    }

    #[test]
    fn test_pack_bits_mixed() {
        let mut out = Vec::new();
        pack_bits(&[1, 2, 0, 0, 0, 3], &mut out);
        assert_eq!(out, vec![1, 1, 2, 254, 0, 0, 3]);
    }

    #[test]
    fn test_pack_bits_long_run_splits() {
        let mut out = Vec::new();
        pack_bits(&[0u8; 300], &mut out);
        // 128 + 128 + 44
        assert_eq!(out, vec![129, 0, 129, 0, 213, 0]);
    }

    #[test]
    fn test_run_length_rows_independent() {
        // Two rows of zeros must not merge into a single run
        let data = vec![0u8; 8];
        assert_eq!(run_length(&data, 4), vec![253, 0, 253, 0]);
    }

    #[test]
    fn test_run_length_decodes() {
        let data: Vec<u8> = (0..72 * 5).map(|i| if i % 9 < 4 { 0 } else { i as u8 }).collect();
        let encoded = run_length(&data, 72);
        assert_eq!(unpack_bits(&encoded), data);
    }

    #[test]
    fn test_deflate_decodes() {
        let data = vec![0xAAu8; 4096];
        let compressed = deflate(&data).unwrap();
        assert!(compressed.len() < 100);

        let mut decoded = Vec::new();
        ZlibDecoder::new(&compressed[..])
            .read_to_end(&mut decoded)
            .unwrap();
        assert_eq!(decoded, data);
    }
}
