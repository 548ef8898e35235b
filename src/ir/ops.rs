//! # Print Intents
//!
//! A [`PrintIntent`] is one high-level thing to put on paper: a run of text,
//! a barcode, an image, a cut. Intents know nothing about bytes; the same
//! intent encodes differently per dialect (see [`encode`](super::encode)).
//!
//! Each variant carries only the fields meaningful to it. Ranges that do not
//! depend on the dialect are checked by the constructors and by
//! [`PrintIntent::validate`]; intents that arrive through deserialization are
//! validated again when encoded.

use serde::{Deserialize, Serialize};

use crate::error::{PrintLinkError, Result};
use crate::protocol::barcode::barcode1d::{BarcodeForm, HriFont, HriPosition, Symbology};
use crate::protocol::barcode::maxicode;
use crate::protocol::barcode::pdf417::Pdf417ErrorCorrection;
use crate::protocol::barcode::qr::QrErrorLevel;
use crate::protocol::commands::{DrawerPin, MAX_PULSE_MS, check_range};
use crate::protocol::text::{Alignment, CharSize, Font, TextStyle};
use crate::render::{Binarization, Bitmap, Compression, raster};

/// Columns in a default divider line: `- - - ... -`.
pub const DEFAULT_DIVIDER_COLUMNS: u8 = 31;

/// Barcode height used when none is given, in dots.
pub const DEFAULT_BARCODE_HEIGHT: u16 = 50;

/// QR module size used when none is given, in dots.
pub const DEFAULT_QR_MODULE_SIZE: u8 = 4;

/// Largest QR version a dual QR command accepts.
pub const MAX_DUAL_QR_VERSION: u8 = 40;

fn default_divider_columns() -> u8 {
    DEFAULT_DIVIDER_COLUMNS
}

fn default_barcode_height() -> u16 {
    DEFAULT_BARCODE_HEIGHT
}

fn default_module_width() -> u8 {
    2
}

fn default_qr_module_size() -> u8 {
    DEFAULT_QR_MODULE_SIZE
}

fn default_pdf417_module() -> u8 {
    3
}

/// How the cutter is driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CutMode {
    #[default]
    Full,
    Partial,
    /// Feed `lines` lines, then cut fully.
    FeedAndFull { lines: u8 },
}

/// Two-dimensional symbols stored in printer memory and printed from there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum TwoDimensionalSymbol {
    Pdf417 {
        data: String,
        /// Data columns, 0 = auto, 1-30
        #[serde(default)]
        columns: u8,
        /// Rows, 0 = auto, 3-90
        #[serde(default)]
        rows: u8,
        /// Module width in dots, 2-8
        #[serde(default = "default_pdf417_module")]
        module_width: u8,
        /// Row height as a multiple of module width, 2-8
        #[serde(default = "default_pdf417_module")]
        row_height: u8,
        #[serde(default)]
        error_correction: Pdf417ErrorCorrection,
        /// Omit the right-hand row indicators
        #[serde(default)]
        truncated: bool,
    },
    MaxiCode {
        /// Mode 2-6
        mode: u8,
        data: String,
    },
}

/// One symbol of a dual QR print.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DualQr {
    pub data: String,
    /// Horizontal position in dots
    #[serde(default)]
    pub position: u16,
    #[serde(default)]
    pub error_correction: QrErrorLevel,
    /// 0 = auto, 1-40
    #[serde(default)]
    pub version: u8,
}

/// High-level print operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrintIntent {
    // ========== Printer Control ==========
    /// Reset the printer to the dialect's initial state.
    Initialize,

    /// Print the buffer and feed `lines` lines (ESC d n).
    Feed { lines: u8 },

    /// Line spacing in motion units; `None` restores the default.
    LineSpacing {
        #[serde(default)]
        dots: Option<u8>,
    },

    /// Motion units: `25.4 / horizontal` and `25.4 / vertical` mm.
    MotionUnit { horizontal: u8, vertical: u8 },

    // ========== Text ==========
    /// A run of text. No line feed is appended.
    Text {
        content: String,
        #[serde(default)]
        alignment: Alignment,
        #[serde(default)]
        size: CharSize,
        #[serde(default)]
        style: TextStyle,
        #[serde(default)]
        font: Font,
        /// Left offset in dots, used by positioned-text dialects
        #[serde(default)]
        offset_x: u16,
    },

    /// Line feed.
    NewLine,

    /// Carriage return.
    CarriageReturn,

    /// A centered `- - - -` rule `columns` characters wide, then a line feed.
    Divider {
        #[serde(default = "default_divider_columns")]
        columns: u8,
    },

    // ========== Barcodes ==========
    /// 1D barcode.
    Barcode {
        data: String,
        symbology: Symbology,
        /// Module width in dots; allowed values depend on the dialect
        #[serde(default = "default_module_width")]
        module_width: u8,
        /// Height in dots, 1-255
        #[serde(default = "default_barcode_height")]
        height: u16,
        #[serde(default)]
        hri: HriPosition,
        #[serde(default)]
        hri_font: HriFont,
        /// Left offset in dots, used by positioned-barcode dialects
        #[serde(default)]
        offset_x: u16,
        /// NUL-terminated or length-counted command form
        #[serde(default)]
        form: BarcodeForm,
    },

    /// QR code printed in one step.
    QrCode {
        data: String,
        /// Module size in dots, 1-16
        #[serde(default = "default_qr_module_size")]
        module_size: u8,
        #[serde(default)]
        error_correction: QrErrorLevel,
        /// 0 = auto; only dialects with a version field accept other values
        #[serde(default)]
        version: u8,
    },

    /// Store QR data in printer memory without printing it.
    StoreQrCode {
        data: String,
        #[serde(default = "default_qr_module_size")]
        module_size: u8,
        #[serde(default)]
        error_correction: QrErrorLevel,
    },

    /// Print the QR symbol previously stored.
    PrintStoredQrCode,

    /// Two QR symbols side by side in one command.
    DualQrCode {
        first: DualQr,
        second: DualQr,
        #[serde(default = "default_qr_module_size")]
        module_size: u8,
    },

    /// PDF417 or MaxiCode.
    TwoDimensional { symbol: TwoDimensionalSymbol },

    // ========== Graphics ==========
    /// Grayscale image printed `target_width` dots wide.
    RasterImage {
        bitmap: Bitmap,
        target_width: u32,
        #[serde(default)]
        binarization: Binarization,
        #[serde(default)]
        compression: Compression,
    },

    // ========== Other ==========
    /// Bytes sent unchanged.
    RawBytes { bytes: Vec<u8> },

    /// Cut the paper.
    CutPaper {
        #[serde(default)]
        mode: CutMode,
    },

    /// Kick the cash drawer.
    CashDrawerPulse {
        #[serde(default)]
        pin: DrawerPin,
        on_ms: u16,
        off_ms: u16,
    },
}

impl PrintIntent {
    /// Plain left-aligned text.
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
            alignment: Alignment::Left,
            size: CharSize::NORMAL,
            style: TextStyle::default(),
            font: Font::A,
            offset_x: 0,
        }
    }

    /// Styled text.
    pub fn styled_text(
        content: impl Into<String>,
        alignment: Alignment,
        size: CharSize,
        style: TextStyle,
    ) -> Result<Self> {
        Self::Text {
            content: content.into(),
            alignment,
            size,
            style,
            font: Font::A,
            offset_x: 0,
        }
        .checked()
    }

    /// Default divider.
    pub fn divider() -> Self {
        Self::Divider {
            columns: DEFAULT_DIVIDER_COLUMNS,
        }
    }

    /// NUL-terminated barcode with HRI below.
    pub fn barcode(symbology: Symbology, data: impl Into<String>, height: u16) -> Result<Self> {
        Self::Barcode {
            data: data.into(),
            symbology,
            module_width: default_module_width(),
            height,
            hri: HriPosition::Below,
            hri_font: HriFont::A,
            offset_x: 0,
            form: BarcodeForm::Terminated,
        }
        .checked()
    }

    /// One-step QR code.
    pub fn qr_code(
        data: impl Into<String>,
        module_size: u8,
        error_correction: QrErrorLevel,
    ) -> Result<Self> {
        Self::QrCode {
            data: data.into(),
            module_size,
            error_correction,
            version: 0,
        }
        .checked()
    }

    /// Image intent.
    pub fn raster_image(
        bitmap: Bitmap,
        target_width: u32,
        binarization: Binarization,
        compression: Compression,
    ) -> Result<Self> {
        Self::RasterImage {
            bitmap,
            target_width,
            binarization,
            compression,
        }
        .checked()
    }

    /// Cash drawer pulse.
    pub fn cash_drawer_pulse(pin: DrawerPin, on_ms: u16, off_ms: u16) -> Result<Self> {
        Self::CashDrawerPulse { pin, on_ms, off_ms }.checked()
    }

    fn checked(self) -> Result<Self> {
        self.validate()?;
        Ok(self)
    }

    /// Short variant name, for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Initialize => "initialize",
            Self::Feed { .. } => "feed",
            Self::LineSpacing { .. } => "line_spacing",
            Self::MotionUnit { .. } => "motion_unit",
            Self::Text { .. } => "text",
            Self::NewLine => "new_line",
            Self::CarriageReturn => "carriage_return",
            Self::Divider { .. } => "divider",
            Self::Barcode { .. } => "barcode",
            Self::QrCode { .. } => "qr_code",
            Self::StoreQrCode { .. } => "store_qr_code",
            Self::PrintStoredQrCode => "print_stored_qr_code",
            Self::DualQrCode { .. } => "dual_qr_code",
            Self::TwoDimensional { .. } => "two_dimensional",
            Self::RasterImage { .. } => "raster_image",
            Self::RawBytes { .. } => "raw_bytes",
            Self::CutPaper { .. } => "cut_paper",
            Self::CashDrawerPulse { .. } => "cash_drawer_pulse",
        }
    }

    /// Check every range that holds regardless of dialect.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Text { size, .. } => size.validate(),
            Self::Divider { columns } => check_range("divider columns", *columns as u32, 1, 255),
            Self::Barcode {
                data, height, form, ..
            } => {
                check_range("barcode height", *height as u32, 1, 255)?;
                if data.is_empty() {
                    return Err(PrintLinkError::invalid("barcode data must not be empty"));
                }
                // NUL ends the terminated form early; the counted form carries it.
                if *form == BarcodeForm::Terminated && data.contains('\0') {
                    return Err(PrintLinkError::invalid(
                        "NUL-terminated barcode data must not contain NUL",
                    ));
                }
                Ok(())
            }
            Self::QrCode {
                data, module_size, ..
            }
            | Self::StoreQrCode {
                data, module_size, ..
            } => {
                check_range("QR module size", *module_size as u32, 1, 16)?;
                non_empty("QR data", data)
            }
            Self::DualQrCode {
                first,
                second,
                module_size,
            } => {
                check_range("QR module size", *module_size as u32, 1, 16)?;
                for part in [first, second] {
                    check_range(
                        "dual QR version",
                        part.version as u32,
                        0,
                        MAX_DUAL_QR_VERSION as u32,
                    )?;
                    non_empty("QR data", &part.data)?;
                }
                Ok(())
            }
            Self::TwoDimensional { symbol } => symbol.validate(),
            Self::RasterImage {
                bitmap,
                target_width,
                ..
            } => raster::scaled_size(bitmap, *target_width).map(|_| ()),
            Self::CashDrawerPulse { on_ms, off_ms, .. } => {
                check_range("cash drawer on time (ms)", *on_ms as u32, 0, MAX_PULSE_MS as u32)?;
                check_range("cash drawer off time (ms)", *off_ms as u32, 0, MAX_PULSE_MS as u32)
            }
            Self::Initialize
            | Self::Feed { .. }
            | Self::LineSpacing { .. }
            | Self::MotionUnit { .. }
            | Self::NewLine
            | Self::CarriageReturn
            | Self::PrintStoredQrCode
            | Self::RawBytes { .. }
            | Self::CutPaper { .. } => Ok(()),
        }
    }
}

impl TwoDimensionalSymbol {
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::Pdf417 {
                data,
                columns,
                rows,
                module_width,
                row_height,
                error_correction,
                ..
            } => {
                check_range("PDF417 columns", *columns as u32, 0, 30)?;
                if *rows != 0 {
                    check_range("PDF417 rows", *rows as u32, 3, 90)?;
                }
                check_range("PDF417 module width", *module_width as u32, 2, 8)?;
                check_range("PDF417 row height", *row_height as u32, 2, 8)?;
                match error_correction {
                    Pdf417ErrorCorrection::Level(n) => {
                        check_range("PDF417 error correction level", *n as u32, 0, 8)?
                    }
                    Pdf417ErrorCorrection::Ratio(n) => {
                        check_range("PDF417 error correction ratio", *n as u32, 1, 40)?
                    }
                }
                non_empty("PDF417 data", data)
            }
            Self::MaxiCode { mode, data } => {
                check_range("MaxiCode mode", *mode as u32, 2, 6)?;
                non_empty("MaxiCode data", data)?;
                check_range(
                    "MaxiCode payload length",
                    data.len() as u32,
                    1,
                    maxicode::MAX_PAYLOAD as u32,
                )
            }
        }
    }
}

fn non_empty(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(PrintLinkError::invalid(format!("{} must not be empty", field)));
    }
    Ok(())
}

/// An ordered list of intents encoded as one byte stream.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrintJob {
    pub intents: Vec<PrintIntent>,
}

impl PrintJob {
    /// Create an empty job.
    pub fn new() -> Self {
        Self {
            intents: Vec::new(),
        }
    }

    /// Create a job starting with an `Initialize` intent.
    pub fn with_init() -> Self {
        Self {
            intents: vec![PrintIntent::Initialize],
        }
    }

    /// Add an intent to the job.
    pub fn push(&mut self, intent: PrintIntent) {
        self.intents.push(intent);
    }

    /// Add multiple intents to the job.
    pub fn extend(&mut self, intents: impl IntoIterator<Item = PrintIntent>) {
        self.intents.extend(intents);
    }

    pub fn len(&self) -> usize {
        self.intents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intents.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &PrintIntent> {
        self.intents.iter()
    }
}

impl FromIterator<PrintIntent> for PrintJob {
    fn from_iter<T: IntoIterator<Item = PrintIntent>>(iter: T) -> Self {
        Self {
            intents: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a PrintJob {
    type Item = &'a PrintIntent;
    type IntoIter = std::slice::Iter<'a, PrintIntent>;

    fn into_iter(self) -> Self::IntoIter {
        self.intents.iter()
    }
}
