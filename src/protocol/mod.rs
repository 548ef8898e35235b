//! # ESC/POS Protocol Implementation
//!
//! This module provides low-level command builders for the ESC/POS family
//! of thermal printer command sets.
//!
//! ## Module Structure
//!
//! - [`commands`]: Basic printer commands (init, feed, spacing, drawer)
//! - [`text`]: Text styling (alignment, fonts, size, bold, underline, etc.)
//! - [`charset`]: Text encoding for GBK, Big5, Shift_JIS, EUC-KR, UTF-8
//! - [`barcode`]: 1D barcodes, QR codes, PDF417 and MaxiCode
//! - [`graphics`]: Raster bit images
//!
//! Builders here know nothing about printer models. Picking the right
//! builder and code points for a given printer is the job of
//! [`ir::encode`](crate::ir::encode) together with a
//! [`DialectProfile`](crate::printer::DialectProfile).
//!
//! ## Usage Example
//!
//! ```
//! use printlink::protocol::{commands, text, barcode::qr::function180};
//!
//! let mut data = Vec::new();
//! data.extend(commands::init());
//! data.extend(text::align(text::Alignment::Center));
//! data.extend(b"RECEIPT\n");
//! data.extend(function180::set_module_size(6));
//! data.extend(function180::store(b"https://example.com", 3).unwrap());
//! data.extend(function180::print());
//! ```

pub mod barcode;
pub mod charset;
pub mod commands;
pub mod graphics;
pub mod text;
