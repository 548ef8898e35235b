//! # Image Binarization
//!
//! Thermal heads print black or nothing. This module turns an 8-bit grayscale
//! buffer into packed 1-bit raster rows using one of three policies.
//!
//! ## Policies
//!
//! | Policy | Best for | Notes |
//! |--------|----------|-------|
//! | [`Binarization::Dither`] | Photos, gradients | Bayer 8x8 ordered dither |
//! | [`Binarization::Threshold`] | Logos, line art | Fixed cut-off level |
//! | [`Binarization::AverageThreshold`] | Scanned text | Cut-off at the mean luma |
//!
//! ## Ordered Dithering
//!
//! For each pixel position (x, y):
//!
//! 1. Look up a threshold from the matrix using (x mod 8, y mod 8)
//! 2. Compare the pixel's intensity (`1 - luma / 255`) to the threshold
//! 3. If intensity > threshold, print black; otherwise leave white
//!
//! ```text
//!     0   1   2   3   4   5   6   7   (x mod 8)
//!   ┌───┬───┬───┬───┬───┬───┬───┬───┐
//! 0 │ 0 │32 │ 8 │40 │ 2 │34 │10 │42 │
//! 1 │48 │16 │56 │24 │50 │18 │58 │26 │
//! 2 │12 │44 │ 4 │36 │14 │46 │ 6 │38 │
//! 3 │60 │28 │52 │20 │62 │30 │54 │22 │
//! 4 │ 3 │35 │11 │43 │ 1 │33 │ 9 │41 │
//! 5 │51 │19 │59 │27 │49 │17 │57 │25 │
//! 6 │15 │47 │ 7 │39 │13 │45 │ 5 │37 │
//! 7 │63 │31 │55 │23 │61 │29 │53 │21 │
//!   └───┴───┴───┴───┴───┴───┴───┴───┘
//! (y mod 8)
//! ```
//!
//! Ordered dithering has no error diffusion, so every row depends only on its
//! own pixels. [`binarize`] exploits that and packs rows in parallel.
//!
//! ## Usage Example
//!
//! ```
//! use printlink::render::dither::{self, Binarization};
//!
//! // Two rows of 8 pixels: black then white
//! let gray = [[0u8; 8], [255u8; 8]].concat();
//! let packed = dither::binarize(&gray, 8, 2, Binarization::Dither);
//! assert_eq!(packed, vec![0xFF, 0x00]);
//! ```

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Bayer 8x8 dithering matrix
///
/// Values range from 0-63. Low values activate first at low intensities,
/// high values last.
pub const BAYER8: [[u8; 8]; 8] = [
    [0, 32, 8, 40, 2, 34, 10, 42],
    [48, 16, 56, 24, 50, 18, 58, 26],
    [12, 44, 4, 36, 14, 46, 6, 38],
    [60, 28, 52, 20, 62, 30, 54, 22],
    [3, 35, 11, 43, 1, 33, 9, 41],
    [51, 19, 59, 27, 49, 17, 57, 25],
    [15, 47, 7, 39, 13, 45, 5, 37],
    [63, 31, 55, 23, 61, 29, 53, 21],
];

/// Default cut-off for [`Binarization::Threshold`].
pub const DEFAULT_THRESHOLD: u8 = 128;

/// How grayscale pixels become printed dots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Binarization {
    /// Bayer 8x8 ordered dithering
    #[default]
    Dither,
    /// Pixels darker than `level` print black
    Threshold {
        #[serde(default = "default_level")]
        level: u8,
    },
    /// Pixels darker than the image's mean luma print black
    AverageThreshold,
}

fn default_level() -> u8 {
    DEFAULT_THRESHOLD
}

/// Get the dithering threshold for a pixel position.
///
/// Returns `(BAYER8[y mod 8][x mod 8] + 0.5) / 64`, which lies strictly
/// inside (0, 1): full black always prints and full white never does.
#[inline]
pub fn threshold(x: usize, y: usize) -> f32 {
    let matrix_value = BAYER8[y & 7][x & 7];
    (matrix_value as f32 + 0.5) / 64.0
}

/// Determine if a dot should be printed at the given position.
///
/// `intensity` runs from 0.0 (white) to 1.0 (black).
///
/// ```
/// use printlink::render::dither::should_print;
///
/// assert!(should_print(0, 0, 1.0));
/// assert!(!should_print(0, 0, 0.0));
/// ```
#[inline]
pub fn should_print(x: usize, y: usize, intensity: f32) -> bool {
    intensity > threshold(x, y)
}

/// Convert an 8-bit luma value (255 = white) to print intensity.
#[inline]
pub fn intensity(luma: u8) -> f32 {
    1.0 - (luma as f32 / 255.0)
}

/// Pack a row of boolean pixel values into bytes.
///
/// Bit 7 of each byte is the leftmost pixel; a set bit prints a dot. A row
/// whose length is not a multiple of 8 is padded with white on the right.
///
/// ```
/// use printlink::render::dither::pack_row;
///
/// let row = vec![true, true, true, true, false, false, false, false];
/// assert_eq!(pack_row(&row), vec![0xF0]);
///
/// let row = vec![true; 12];
/// assert_eq!(pack_row(&row), vec![0xFF, 0xF0]);
/// ```
pub fn pack_row(pixels: &[bool]) -> Vec<u8> {
    let mut bytes = vec![0u8; pixels.len().div_ceil(8)];
    pack_into(pixels.iter().copied(), &mut bytes);
    bytes
}

fn pack_into(pixels: impl Iterator<Item = bool>, bytes: &mut [u8]) {
    for (i, pixel) in pixels.enumerate() {
        if pixel {
            bytes[i / 8] |= 1 << (7 - (i % 8)); // MSB first
        }
    }
}

/// Mean luma of a buffer, clamped so uniform black still prints.
fn average_level(gray: &[u8]) -> u8 {
    if gray.is_empty() {
        return DEFAULT_THRESHOLD;
    }
    let sum: u64 = gray.par_iter().map(|&p| p as u64).sum();
    let mean = (sum + gray.len() as u64 / 2) / gray.len() as u64;
    mean.clamp(1, 255) as u8
}

/// Binarize a row-major grayscale buffer into packed raster rows.
///
/// ## Parameters
///
/// - `gray`: `width * height` luma bytes, 255 = white
/// - `width`, `height`: image dimensions in pixels
/// - `method`: binarization policy
///
/// ## Returns
///
/// `ceil(width / 8) * height` bytes, MSB first, row-major.
pub fn binarize(gray: &[u8], width: usize, height: usize, method: Binarization) -> Vec<u8> {
    debug_assert_eq!(gray.len(), width * height, "gray buffer size mismatch");

    let width_bytes = width.div_ceil(8);
    let mut data = vec![0u8; width_bytes * height];
    if width_bytes == 0 {
        return data;
    }

    let cutoff = match method {
        Binarization::Dither => None,
        Binarization::Threshold { level } => Some(level),
        Binarization::AverageThreshold => Some(average_level(gray)),
    };

    data.par_chunks_mut(width_bytes)
        .zip(gray.par_chunks(width))
        .enumerate()
        .for_each(|(y, (dst, row))| match cutoff {
            None => pack_into(
                row.iter()
                    .enumerate()
                    .map(|(x, &luma)| should_print(x, y, intensity(luma))),
                dst,
            ),
            Some(level) => pack_into(row.iter().map(|&luma| luma < level), dst),
        });

    data
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_bayer_matrix_values() {
        let mut seen = [false; 64];
        for row in &BAYER8 {
            for &val in row {
                assert!(val < 64, "Matrix value {} out of range", val);
                assert!(!seen[val as usize], "Duplicate value {}", val);
                seen[val as usize] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "Not all values 0-63 present");
    }

    #[test]
    fn test_threshold_range_and_period() {
        for y in 0..8 {
            for x in 0..8 {
                let t = threshold(x, y);
                assert!(t > 0.0 && t < 1.0);
                assert_eq!(t, threshold(x + 8, y + 8));
            }
        }
    }

    #[test]
    fn test_gray_distribution() {
        let count = (0..8)
            .flat_map(|y| (0..8).map(move |x| (x, y)))
            .filter(|&(x, y)| should_print(x, y, 0.5))
            .count();
        assert_eq!(count, 32);
    }

    #[test]
    fn test_intensity_endpoints() {
        assert_eq!(intensity(255), 0.0);
        assert_eq!(intensity(0), 1.0);
    }

    #[test]
    fn test_pack_row_padding() {
        assert_eq!(pack_row(&[true, true, true, true]), vec![0xF0]);
        assert_eq!(pack_row(&[true; 9]), vec![0xFF, 0x80]);
        assert_eq!(pack_row(&[]), Vec::<u8>::new());
    }

    #[test]
    fn test_binarize_dimensions() {
        let gray = vec![128u8; 20 * 3];
        let data = binarize(&gray, 20, 3, Binarization::Dither);
        assert_eq!(data.len(), 3 * 3);
        // Padding bits in the last byte of each row stay white
        for row in data.chunks(3) {
            assert_eq!(row[2] & 0x0F, 0);
        }
    }

    #[test]
    fn test_fixed_threshold() {
        let gray = vec![0, 100, 127, 128, 200, 255, 10, 250];
        let data = binarize(&gray, 8, 1, Binarization::Threshold { level: 128 });
        assert_eq!(data, vec![0b1110_0010]);
    }

    #[test]
    fn test_average_threshold() {
        // mean = 100: only pixels below 100 print
        let gray = vec![0, 0, 200, 200, 50, 150, 99, 101];
        let data = binarize(&gray, 8, 1, Binarization::AverageThreshold);
        assert_eq!(data, vec![0b1100_1010]);
    }

    #[test]
    fn test_average_threshold_uniform() {
        assert_eq!(
            binarize(&[0u8; 8], 8, 1, Binarization::AverageThreshold),
            vec![0xFF]
        );
        assert_eq!(
            binarize(&[255u8; 8], 8, 1, Binarization::AverageThreshold),
            vec![0x00]
        );
    }

    #[test]
    fn test_dither_matches_sequential() {
        let (w, h) = (37, 21);
        let gray: Vec<u8> = (0..w * h).map(|i| (i * 7 % 256) as u8).collect();
        let expected: Vec<u8> = (0..h)
            .flat_map(|y| {
                let row: Vec<bool> = (0..w)
                    .map(|x| should_print(x, y, intensity(gray[y * w + x])))
                    .collect();
                pack_row(&row)
            })
            .collect();
        assert_eq!(binarize(&gray, w, h, Binarization::Dither), expected);
    }

    #[test]
    fn test_binarization_serde() {
        let m: Binarization = serde_json::from_str(r#"{"mode":"threshold"}"#).unwrap();
        assert_eq!(m, Binarization::Threshold { level: 128 });
        let m: Binarization = serde_json::from_str(r#"{"mode":"average_threshold"}"#).unwrap();
        assert_eq!(m, Binarization::AverageThreshold);
    }
}
