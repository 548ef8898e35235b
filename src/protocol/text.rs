//! # ESC/POS Text Styling Commands
//!
//! This module implements text formatting commands shared by the ESC/POS
//! family of dialects.
//!
//! ## Text Styling Overview
//!
//! | Style | Command | Effect |
//! |-------|---------|--------|
//! | Bold | ESC E n | **Emphasized** text |
//! | Underline | ESC - n | 1 or 2 dot underline |
//! | Double-byte underline | FS - n | Underline for CJK characters |
//! | Reverse | GS B n | White on black |
//! | Upside down | ESC { n | 180° rotation |
//! | Rotate 90 | ESC V n | Each character turned clockwise |
//! | Size | GS ! n | Width/height multipliers 1-8 |
//!
//! ## Text Alignment
//!
//! ```text
//! Left aligned (default)    |LEFT TEXT
//! Center aligned            |  CENTER TEXT
//! Right aligned             |      RIGHT TEXT
//! ```
//!
//! ## Font Selection
//!
//! | Font | Size |
//! |------|------|
//! | Font A | 12×24 dots |
//! | Font B | 9×17 dots (compressed) |

use serde::{Deserialize, Serialize};

use super::commands::{ESC, FS, GS, check_range};
use crate::error::Result;

// ============================================================================
// TEXT ALIGNMENT
// ============================================================================

/// Text alignment options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Alignment {
    #[default]
    Left = 0,
    Center = 1,
    Right = 2,
}

/// # Set Text Alignment (ESC a n)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | ESC a n |
/// | Hex     | 1B 61 n |
///
/// - `n = 0`: Left alignment (default)
/// - `n = 1`: Center alignment
/// - `n = 2`: Right alignment
///
/// Takes effect at the start of the next line.
///
/// ```
/// use printlink::protocol::text::{align, Alignment};
///
/// assert_eq!(align(Alignment::Center), vec![0x1B, 0x61, 0x01]);
/// ```
pub fn align(alignment: Alignment) -> Vec<u8> {
    vec![ESC, b'a', alignment as u8]
}

// ============================================================================
// FONT SELECTION
// ============================================================================

/// Available fonts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Font {
    /// Font A: 12×24 dots
    #[default]
    A = 0,
    /// Font B: 9×17 dots
    B = 1,
}

/// # Select Font (ESC M n)
pub fn font(f: Font) -> Vec<u8> {
    vec![ESC, b'M', f as u8]
}

// ============================================================================
// CHARACTER SIZE
// ============================================================================

/// Character magnification, each axis 1-8.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CharSize {
    pub width: u8,
    pub height: u8,
}

impl Default for CharSize {
    fn default() -> Self {
        Self::NORMAL
    }
}

impl CharSize {
    pub const NORMAL: Self = Self {
        width: 1,
        height: 1,
    };

    pub const DOUBLE: Self = Self {
        width: 2,
        height: 2,
    };

    /// Checked constructor.
    pub fn new(width: u8, height: u8) -> Result<Self> {
        let size = Self { width, height };
        size.validate()?;
        Ok(size)
    }

    pub fn validate(&self) -> Result<()> {
        check_range("character width", self.width as u32, 1, 8)?;
        check_range("character height", self.height as u32, 1, 8)
    }

    /// The GS ! parameter: width multiplier in the high nibble, height in the low.
    pub fn to_byte(self) -> u8 {
        ((self.width - 1) << 4) | (self.height - 1)
    }
}

/// # Select Character Size (GS ! n)
///
/// | Format  | Bytes |
/// |---------|-------|
/// | ASCII   | GS ! n |
/// | Hex     | 1D 21 n |
///
/// Bits 4-6 hold `width - 1`, bits 0-2 hold `height - 1`.
///
/// ```
/// use printlink::protocol::text::{size, CharSize};
///
/// assert_eq!(size(CharSize::NORMAL), vec![0x1D, 0x21, 0x00]);
/// assert_eq!(size(CharSize::DOUBLE), vec![0x1D, 0x21, 0x11]);
/// ```
pub fn size(size: CharSize) -> Vec<u8> {
    vec![GS, b'!', size.to_byte()]
}

// ============================================================================
// STYLE FLAGS
// ============================================================================

/// Underline thickness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Underline {
    #[default]
    None = 0,
    Single = 1,
    Double = 2,
}

/// # Emphasized Mode (ESC E n)
pub fn bold(enabled: bool) -> Vec<u8> {
    vec![ESC, b'E', enabled as u8]
}

/// # Underline Mode (ESC - n)
pub fn underline(mode: Underline) -> Vec<u8> {
    vec![ESC, b'-', mode as u8]
}

/// # Double-Byte Underline Mode (FS - n)
pub fn underline_double_byte(mode: Underline) -> Vec<u8> {
    vec![FS, b'-', mode as u8]
}

/// # White/Black Reverse (GS B n)
pub fn reverse(enabled: bool) -> Vec<u8> {
    vec![GS, b'B', enabled as u8]
}

/// # Upside-Down Mode (ESC { n)
pub fn upside_down(enabled: bool) -> Vec<u8> {
    vec![ESC, b'{', enabled as u8]
}

/// # 90° Clockwise Rotation (ESC V n)
pub fn rotate_90(enabled: bool) -> Vec<u8> {
    vec![ESC, b'V', enabled as u8]
}

/// # Double-Byte Character Mode On (FS &)
pub fn double_byte_on() -> Vec<u8> {
    vec![FS, b'&']
}

/// # Double-Byte Character Mode Off (FS .)
pub fn double_byte_off() -> Vec<u8> {
    vec![FS, b'.']
}

/// # Select Character Encoding (ESC 9 n)
///
/// `n` is a controller-specific charset code from the dialect table.
pub fn select_charset(code: u8) -> Vec<u8> {
    vec![ESC, b'9', code]
}

// ============================================================================
// STYLE BUILDER
// ============================================================================

/// Combined text style flags.
///
/// ```
/// use printlink::protocol::text::{TextStyle, Underline};
///
/// let style = TextStyle::new().bold(true).underline(Underline::Single);
/// assert_eq!(style.enable_commands(), vec![0x1B, 0x45, 1, 0x1B, 0x2D, 1]);
/// assert_eq!(style.disable_commands(), vec![0x1B, 0x45, 0, 0x1B, 0x2D, 0]);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyle {
    pub bold: bool,
    pub underline: Underline,
    pub reverse: bool,
    pub upside_down: bool,
    pub rotate_90: bool,
}

impl TextStyle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bold(mut self, enabled: bool) -> Self {
        self.bold = enabled;
        self
    }

    pub fn underline(mut self, mode: Underline) -> Self {
        self.underline = mode;
        self
    }

    pub fn reverse(mut self, enabled: bool) -> Self {
        self.reverse = enabled;
        self
    }

    pub fn upside_down(mut self, enabled: bool) -> Self {
        self.upside_down = enabled;
        self
    }

    pub fn rotate_90(mut self, enabled: bool) -> Self {
        self.rotate_90 = enabled;
        self
    }

    /// Commands turning on each flag that differs from the default.
    pub fn enable_commands(&self) -> Vec<u8> {
        let mut cmd = Vec::new();
        if self.bold {
            cmd.extend(bold(true));
        }
        if self.underline != Underline::None {
            cmd.extend(underline(self.underline));
        }
        if self.reverse {
            cmd.extend(reverse(true));
        }
        if self.upside_down {
            cmd.extend(upside_down(true));
        }
        if self.rotate_90 {
            cmd.extend(rotate_90(true));
        }
        cmd
    }

    /// Commands restoring the default for each flag `enable_commands` set.
    pub fn disable_commands(&self) -> Vec<u8> {
        let mut cmd = Vec::new();
        if self.bold {
            cmd.extend(bold(false));
        }
        if self.underline != Underline::None {
            cmd.extend(underline(Underline::None));
        }
        if self.reverse {
            cmd.extend(reverse(false));
        }
        if self.upside_down {
            cmd.extend(upside_down(false));
        }
        if self.rotate_90 {
            cmd.extend(rotate_90(false));
        }
        cmd
    }

    /// Every flag with its explicit value, in CSN controller order:
    /// bold, underline, double-byte underline, upside down, reverse, rotate.
    pub fn full_state_commands(&self) -> Vec<u8> {
        let mut cmd = Vec::new();
        cmd.extend(bold(self.bold));
        cmd.extend(underline(self.underline));
        cmd.extend(underline_double_byte(self.underline));
        cmd.extend(upside_down(self.upside_down));
        cmd.extend(reverse(self.reverse));
        cmd.extend(rotate_90(self.rotate_90));
        cmd
    }
}

// ============================================================================
// TESTS
// ============================================================================
