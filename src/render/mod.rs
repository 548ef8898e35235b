//! # Rendering Module
//!
//! Turns grayscale images into the packed 1-bit rows that raster commands
//! carry.
//!
//! ## Modules
//!
//! - [`dither`]: Bayer 8x8 ordered dithering and threshold binarization
//! - [`raster`]: Bitmap loading, resizing and width padding
//! - [`compress`]: PackBits and deflate payload compression
//!
//! ## Usage Example
//!
//! ```
//! use printlink::render::{Binarization, Bitmap, raster};
//! use printlink::protocol::graphics;
//!
//! // A 64x32 horizontal gradient
//! let pixels: Vec<u8> = (0..32).flat_map(|_| (0..64).map(|x| (x * 4) as u8)).collect();
//! let bitmap = Bitmap::new(64, 32, pixels).unwrap();
//!
//! let prepared = raster::prepare(&bitmap, 384, Binarization::Dither).unwrap();
//! let cmd = graphics::raster(prepared.width_bytes, prepared.height, &prepared.data);
//! assert_eq!(cmd.len(), 8 + 48 * 192);
//! ```

pub mod compress;
pub mod dither;
pub mod raster;

pub use compress::Compression;
pub use dither::Binarization;
pub use raster::{Bitmap, PreparedRaster};
