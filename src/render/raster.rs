//! # Raster Image Preparation
//!
//! Turns a grayscale [`Bitmap`] into printer-ready packed rows: the target
//! width is rounded up to a multiple of 8 dots, the height follows the aspect
//! ratio, and the resized image is binarized.
//!
//! ```
//! use printlink::render::{Binarization, Bitmap, raster};
//!
//! let bitmap = Bitmap::new(10, 5, vec![0; 50]).unwrap();
//! let prepared = raster::prepare(&bitmap, 10, Binarization::Dither).unwrap();
//!
//! // 10 dots pad to 16: 2 bytes per row, height scales 5 * 16 / 10 = 8
//! assert_eq!(prepared.width_bytes, 2);
//! assert_eq!(prepared.height, 8);
//! assert!(prepared.data.iter().all(|&b| b == 0xFF));
//! ```

use std::path::Path;

use image::{DynamicImage, GrayImage, RgbImage, Rgba, imageops::FilterType};
use serde::{Deserialize, Serialize};

use super::dither::{self, Binarization};
use crate::error::{PrintLinkError, Result};

/// Maximum raster dimension the command header can carry.
pub const MAX_DIMENSION: u32 = u16::MAX as u32;

/// An 8-bit grayscale image, row-major, 255 = white.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl Bitmap {
    /// Create a bitmap, checking that `pixels` holds `width * height` bytes.
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<Self> {
        let bitmap = Self {
            width,
            height,
            pixels,
        };
        bitmap.validate()?;
        Ok(bitmap)
    }

    /// Check dimensions against the pixel buffer.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(PrintLinkError::invalid(format!(
                "bitmap must not be empty (got {}x{})",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize;
        if self.pixels.len() != expected {
            return Err(PrintLinkError::invalid(format!(
                "bitmap {}x{} needs {} pixels, got {}",
                self.width,
                self.height,
                expected,
                self.pixels.len()
            )));
        }
        Ok(())
    }

    /// Grayscale-reduce a decoded image. Transparent areas become white.
    pub fn from_image(image: &DynamicImage) -> Self {
        let rgba = image.to_rgba8();
        let mut flattened = RgbImage::new(rgba.width(), rgba.height());
        for (dst, &Rgba([r, g, b, a])) in flattened.pixels_mut().zip(rgba.pixels()) {
            let blend = |c: u8| ((c as u32 * a as u32 + 255 * (255 - a as u32)) / 255) as u8;
            dst.0 = [blend(r), blend(g), blend(b)];
        }
        let gray = DynamicImage::ImageRgb8(flattened).to_luma8();
        Self {
            width: gray.width(),
            height: gray.height(),
            pixels: gray.into_raw(),
        }
    }

    /// Load and grayscale-reduce an image file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let image = image::open(path).map_err(|e| {
            PrintLinkError::invalid(format!("failed to load image {}: {}", path.display(), e))
        })?;
        let bitmap = Self::from_image(&image);
        bitmap.validate()?;
        Ok(bitmap)
    }
}

/// Packed raster rows ready for a raster command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreparedRaster {
    /// Bytes per row (`padded width / 8`)
    pub width_bytes: u16,
    /// Number of rows
    pub height: u16,
    /// `width_bytes * height` bytes, MSB first
    pub data: Vec<u8>,
}

/// Output dimensions for a bitmap printed `target_width` dots wide.
///
/// Returns `(padded_width, height)` where `padded_width` is `target_width`
/// rounded up to a multiple of 8 and `height = source_height * padded_width /
/// source_width`, at least 1.
pub fn scaled_size(bitmap: &Bitmap, target_width: u32) -> Result<(u32, u32)> {
    if target_width == 0 || target_width > MAX_DIMENSION {
        return Err(PrintLinkError::invalid(format!(
            "raster width must be 1-{}, got {}",
            MAX_DIMENSION, target_width
        )));
    }
    bitmap.validate()?;

    let padded = target_width.div_ceil(8) * 8;
    let height = (bitmap.height as u64 * padded as u64 / bitmap.width as u64).max(1);
    if height > MAX_DIMENSION as u64 {
        return Err(PrintLinkError::invalid(format!(
            "image scales to {} rows, maximum is {}",
            height, MAX_DIMENSION
        )));
    }
    Ok((padded, height as u32))
}

/// Resize and binarize a bitmap for printing `target_width` dots wide.
#[tracing::instrument(skip(bitmap), fields(src_w = bitmap.width, src_h = bitmap.height))]
pub fn prepare(
    bitmap: &Bitmap,
    target_width: u32,
    binarization: Binarization,
) -> Result<PreparedRaster> {
    let (width, height) = scaled_size(bitmap, target_width)?;

    let resized = if (width, height) == (bitmap.width, bitmap.height) {
        bitmap.pixels.clone()
    } else {
        let source = GrayImage::from_raw(bitmap.width, bitmap.height, bitmap.pixels.clone())
            .ok_or_else(|| PrintLinkError::invalid("bitmap buffer size mismatch"))?;
        image::imageops::resize(&source, width, height, FilterType::Triangle).into_raw()
    };

    let data = dither::binarize(&resized, width as usize, height as usize, binarization);
    tracing::debug!(width, height, bytes = data.len(), "prepared raster");

    Ok(PreparedRaster {
        width_bytes: (width / 8) as u16,
        height: height as u16,
        data,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use image::RgbaImage;
    use pretty_assertions::assert_eq;

    fn solid(width: u32, height: u32, luma: u8) -> Bitmap {
        Bitmap::new(width, height, vec![luma; (width * height) as usize]).unwrap()
    }

    #[test]
    fn test_bitmap_size_mismatch() {
        let err = Bitmap::new(4, 4, vec![0; 15]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
        assert!(Bitmap::new(0, 4, vec![]).is_err());
    }

    #[test]
    fn test_scaled_size() {
        let bitmap = solid(100, 50, 255);
        assert_eq!(scaled_size(&bitmap, 576).unwrap(), (576, 288));
        assert_eq!(scaled_size(&bitmap, 570).unwrap(), (576, 288));
        assert_eq!(scaled_size(&bitmap, 1).unwrap(), (8, 4));
    }

    #[test]
    fn test_scaled_height_at_least_one() {
        let bitmap = solid(1000, 1, 0);
        assert_eq!(scaled_size(&bitmap, 8).unwrap(), (8, 1));
    }

    #[test]
    fn test_width_range() {
        let bitmap = solid(8, 8, 0);
        assert!(scaled_size(&bitmap, 0).is_err());
        assert!(scaled_size(&bitmap, 65536).is_err());
        // 65535 pads to 65536 dots = 8192 bytes, still representable
        let tall = solid(65535, 1, 0);
        assert_eq!(scaled_size(&tall, 65535).unwrap(), (65536, 1));
    }

    #[test]
    fn test_too_tall_rejected() {
        let bitmap = solid(1, 10_000, 0);
        let err = scaled_size(&bitmap, 8).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_prepare_no_resize_keeps_pixels() {
        let bitmap = Bitmap::new(8, 2, [[0u8; 8], [255u8; 8]].concat()).unwrap();
        let prepared = prepare(&bitmap, 8, Binarization::Threshold { level: 128 }).unwrap();
        assert_eq!(
            prepared,
            PreparedRaster {
                width_bytes: 1,
                height: 2,
                data: vec![0xFF, 0x00],
            }
        );
    }

    #[test]
    fn test_prepare_white_prints_nothing() {
        let prepared = prepare(&solid(30, 30, 255), 100, Binarization::Dither).unwrap();
        assert_eq!(prepared.width_bytes, 13);
        assert_eq!(prepared.height, 104);
        assert!(prepared.data.iter().all(|&b| b == 0));
    }

    #[test]
    fn test_transparent_becomes_white() {
        let mut img = RgbaImage::new(2, 1);
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(1, 0, Rgba([0, 0, 0, 255]));
        let bitmap = Bitmap::from_image(&DynamicImage::ImageRgba8(img));
        assert_eq!(bitmap.pixels, vec![255, 0]);
    }
}
