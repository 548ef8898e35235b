//! # Printer Dialects
//!
//! Printers that all claim "ESC/POS" disagree on a surprising number of
//! details: which byte selects Code128, whether QR data is stored first or
//! printed inline, how the HRI position is numbered, which charset text
//! arrives in. A [`DialectProfile`] records those choices as plain data so the
//! encoder stays a single code path.
//!
//! ## Built-in Dialects
//!
//! | Name | Charset | QR family | Text layout | Raster |
//! |------|---------|-----------|-------------|--------|
//! | `escpos` | GBK | function 180, +3 overhead | incremental | 256-row bands |
//! | `escpos-compact-qr` | Big5 | compact `GS ( k 48` | incremental | 256-row bands |
//! | `csn` | Big5 | inline `GS k 97` + dual | positioned | per-line, RLE or deflate |
//!
//! ## Usage
//!
//! ```
//! use printlink::printer::DialectProfile;
//!
//! let dialect = DialectProfile::by_name("csn").unwrap();
//! assert_eq!(dialect.raster.max_band_rows, 1);
//! ```

use crate::protocol::barcode::barcode1d::{BarcodeForm, Symbology};
use crate::protocol::charset::Charset;
use crate::protocol::commands::{ESC, GS};

/// How a text intent is framed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextLayout {
    /// `ESC a`, `GS !`, `ESC M`, styles that are on, text, then those styles off.
    Incremental,
    /// `ESC $` offset, `GS !`, `ESC M`, every style flag explicitly,
    /// double-byte mode, charset select, text.
    Positioned,
}

/// Text framing and charset selection.
#[derive(Debug, Clone, Copy)]
pub struct TextCommands {
    pub layout: TextLayout,
    /// `ESC 9 n` code per charset, for dialects that switch charset per run.
    pub charset_select: Option<&'static [(Charset, u8)]>,
}

/// 1D barcode code tables and limits.
#[derive(Debug, Clone, Copy)]
pub struct BarcodeCommands {
    /// Symbology codes for `GS k m data NUL`.
    pub terminated: &'static [(Symbology, u8)],
    /// Symbology codes for `GS k m n data`.
    pub counted: &'static [(Symbology, u8)],
    /// Allowed `GS w` module widths, inclusive.
    pub module_widths: (u8, u8),
    /// `GS H` codes for none, above, below, both.
    pub hri_codes: [u8; 4],
    /// Emit `ESC $` before every barcode.
    pub positioned: bool,
}

/// QR command family.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QrFamily {
    /// `GS ( k pL pH 49 80 48` store, `49 81 48` print
    Function180,
    /// `GS ( k 48 128 nL nH` store, `48 129` print
    Compact,
    /// `GS w n` then `GS k 97 v r nL nH data`
    Inline,
}

/// QR parameters.
#[derive(Debug, Clone, Copy)]
pub struct QrCommands {
    pub family: QrFamily,
    /// Code points for L, M, Q, H.
    pub ecc_codes: [u8; 4],
    /// Bytes counted into the length prefix on top of the payload.
    pub store_overhead: u16,
    /// Largest payload accepted, in bytes.
    pub max_payload: usize,
    /// Largest selectable version; 0 means the family has no version field.
    pub max_version: u8,
}

impl QrCommands {
    /// Whether data can be stored and printed as two separate operations.
    pub fn supports_storage(&self) -> bool {
        matches!(self.family, QrFamily::Function180 | QrFamily::Compact)
    }
}

/// Raster image parameters.
#[derive(Debug, Clone, Copy)]
pub struct RasterCommands {
    /// Rows per `GS v 0` command.
    pub max_band_rows: u16,
    /// Opcode framing a PackBits-compressed band, if supported.
    pub run_length: Option<&'static [u8]>,
    /// Opcode framing a deflate-compressed image, if supported.
    pub deflate: Option<&'static [u8]>,
}

/// Cutter opcodes.
#[derive(Debug, Clone, Copy)]
pub struct CutCommands {
    pub full: &'static [u8],
    pub partial: &'static [u8],
    /// Prefix of a "feed n lines then cut" command taking `n` as last byte.
    /// Without one, the encoder emits `ESC d n` followed by `full`.
    pub feed_full: Option<&'static [u8]>,
}

/// Everything the encoder needs to know about one command dialect.
#[derive(Debug, Clone, Copy)]
pub struct DialectProfile {
    pub name: &'static str,
    pub description: &'static str,
    /// Charset used for text.
    pub charset: Charset,
    /// Charset used for QR, dual QR, PDF417 and MaxiCode payloads.
    pub symbol_charset: Charset,
    /// Bytes sent by an `Initialize` intent.
    pub init_sequence: &'static [u8],
    pub text: TextCommands,
    pub barcode: BarcodeCommands,
    pub qr: QrCommands,
    /// PDF417 and MaxiCode through `GS ( k`.
    pub two_dimensional: bool,
    /// Two QR symbols in one `US Q` command.
    pub dual_qr: bool,
    pub raster: RasterCommands,
    pub cut: CutCommands,
}

// ============================================================================
// CODE TABLES
// ============================================================================

const TERMINATED_CODES: &[(Symbology, u8)] = &[
    (Symbology::UpcA, 0),
    (Symbology::UpcE, 1),
    (Symbology::Ean13, 2),
    (Symbology::Ean8, 3),
    (Symbology::Code39, 4),
    (Symbology::Itf, 5),
    (Symbology::Codabar, 6),
    (Symbology::Code93, 7),
    (Symbology::Code128, 8),
];

const TERMINATED_CODES_EXTENDED: &[(Symbology, u8)] = &[
    (Symbology::UpcA, 0),
    (Symbology::UpcE, 1),
    (Symbology::Ean13, 2),
    (Symbology::Ean8, 3),
    (Symbology::Code39, 4),
    (Symbology::Itf, 5),
    (Symbology::Codabar, 6),
    (Symbology::Code93, 7),
    (Symbology::Code128, 8),
    (Symbology::Code11, 9),
    (Symbology::Msi, 0x10),
];

const COUNTED_CODES: &[(Symbology, u8)] = &[
    (Symbology::UpcA, 65),
    (Symbology::UpcE, 66),
    (Symbology::Ean13, 67),
    (Symbology::Ean8, 68),
    (Symbology::Code39, 69),
    (Symbology::Itf, 70),
    (Symbology::Codabar, 71),
    (Symbology::Code93, 72),
    (Symbology::Code128, 73),
];

const CSN_CHARSET_CODES: &[(Charset, u8)] = &[
    (Charset::Gbk, 0),
    (Charset::Utf8, 1),
    (Charset::Big5, 3),
    (Charset::ShiftJis, 4),
    (Charset::EucKr, 5),
];

const ESC_POS_CUT: CutCommands = CutCommands {
    full: &[GS, b'V', 0],
    partial: &[GS, b'V', 1],
    feed_full: Some(&[GS, b'V', 66]),
};

const BANDED_RASTER: RasterCommands = RasterCommands {
    max_band_rows: 256,
    run_length: None,
    deflate: None,
};

// ============================================================================
// BUILT-IN DIALECTS
// ============================================================================

impl DialectProfile {
    /// Generic ESC/POS with GBK text and function-180 QR storage.
    ///
    /// This is what most Bluetooth SPP receipt printers speak. HRI positions
    /// on these controllers are numbered none/below/above/both.
    pub const ESC_POS: Self = Self {
        name: "escpos",
        description: "Generic ESC/POS, GBK text, function-180 QR",
        charset: Charset::Gbk,
        symbol_charset: Charset::Utf8,
        init_sequence: &[ESC, b'@', ESC, b'2', ESC, b'M', 0],
        text: TextCommands {
            layout: TextLayout::Incremental,
            charset_select: None,
        },
        barcode: BarcodeCommands {
            terminated: TERMINATED_CODES_EXTENDED,
            counted: COUNTED_CODES,
            module_widths: (2, 3),
            hri_codes: [0, 2, 1, 3],
            positioned: false,
        },
        qr: QrCommands {
            family: QrFamily::Function180,
            ecc_codes: [48, 49, 50, 51],
            store_overhead: 3,
            max_payload: 7089,
            max_version: 0,
        },
        two_dimensional: true,
        dual_qr: false,
        raster: BANDED_RASTER,
        cut: ESC_POS_CUT,
    };

    /// ESC/POS with Big5 text and the compact `GS ( k 48` QR commands.
    pub const ESC_POS_COMPACT_QR: Self = Self {
        name: "escpos-compact-qr",
        description: "ESC/POS, Big5 text, compact QR storage",
        charset: Charset::Big5,
        symbol_charset: Charset::Big5,
        init_sequence: &[ESC, b'@'],
        text: TextCommands {
            layout: TextLayout::Incremental,
            charset_select: None,
        },
        barcode: BarcodeCommands {
            terminated: TERMINATED_CODES,
            counted: COUNTED_CODES,
            module_widths: (2, 3),
            hri_codes: [0, 1, 2, 3],
            positioned: false,
        },
        qr: QrCommands {
            family: QrFamily::Compact,
            ecc_codes: [0x30, 0x31, 0x32, 0x33],
            store_overhead: 0,
            max_payload: 7089,
            max_version: 0,
        },
        two_dimensional: true,
        dual_qr: false,
        raster: BANDED_RASTER,
        cut: ESC_POS_CUT,
    };

    /// CSN OEM controller: positioned text, counted barcodes, inline and dual
    /// QR, line-at-a-time raster with optional compression.
    ///
    /// The compressed raster opcodes (`GS v 1` run-length, `GS v 2` deflate)
    /// frame payloads as described in [`graphics`](crate::protocol::graphics).
    pub const CSN: Self = Self {
        name: "csn",
        description: "CSN OEM controller, positioned text, inline/dual QR, compressed raster",
        charset: Charset::Big5,
        symbol_charset: Charset::Big5,
        init_sequence: &[ESC, b'@'],
        text: TextCommands {
            layout: TextLayout::Positioned,
            charset_select: Some(CSN_CHARSET_CODES),
        },
        barcode: BarcodeCommands {
            terminated: &[],
            counted: COUNTED_CODES,
            module_widths: (1, 6),
            hri_codes: [0, 1, 2, 3],
            positioned: true,
        },
        qr: QrCommands {
            family: QrFamily::Inline,
            ecc_codes: [1, 2, 3, 4],
            store_overhead: 0,
            max_payload: 7089,
            max_version: 16,
        },
        two_dimensional: false,
        dual_qr: true,
        raster: RasterCommands {
            max_band_rows: 1,
            run_length: Some(&[GS, b'v', b'1']),
            deflate: Some(&[GS, b'v', b'2']),
        },
        cut: CutCommands {
            full: &[ESC, b'i'],
            partial: &[ESC, b'm'],
            feed_full: None,
        },
    };

    /// All built-in dialects.
    pub const ALL: &'static [&'static DialectProfile] =
        &[&Self::ESC_POS, &Self::ESC_POS_COMPACT_QR, &Self::CSN];

    /// Look up a built-in dialect by name (case-insensitive, `_` = `-`).
    pub fn by_name(name: &str) -> Option<&'static DialectProfile> {
        let wanted = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.iter().copied().find(|d| d.name == wanted)
    }

    /// Symbology code for a barcode form, if this dialect has one.
    pub fn barcode_code(&self, form: BarcodeForm, symbology: Symbology) -> Option<u8> {
        let table = match form {
            BarcodeForm::Terminated => self.barcode.terminated,
            BarcodeForm::Counted => self.barcode.counted,
        };
        table
            .iter()
            .find(|(s, _)| *s == symbology)
            .map(|(_, code)| *code)
    }

    /// `ESC 9 n` code for `charset`, if this dialect can switch to it.
    pub fn charset_code(&self, charset: Charset) -> Option<u8> {
        self.text
            .charset_select?
            .iter()
            .find(|(c, _)| *c == charset)
            .map(|(_, code)| *code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_by_name() {
        assert_eq!(DialectProfile::by_name("escpos").unwrap().name, "escpos");
        assert_eq!(
            DialectProfile::by_name("ESCPOS_COMPACT_QR").unwrap().name,
            "escpos-compact-qr"
        );
        assert_eq!(DialectProfile::by_name(" csn ").unwrap().name, "csn");
        assert!(DialectProfile::by_name("starprnt").is_none());
    }

    #[test]
    fn test_names_unique() {
        let mut names: Vec<_> = DialectProfile::ALL.iter().map(|d| d.name).collect();
        names.sort();
        names.dedup();
        assert_eq!(names.len(), DialectProfile::ALL.len());
    }

    #[test]
    fn test_barcode_code_lookup() {
        let escpos = &DialectProfile::ESC_POS;
        assert_eq!(
            escpos.barcode_code(BarcodeForm::Terminated, Symbology::Code128),
            Some(8)
        );
        assert_eq!(
            escpos.barcode_code(BarcodeForm::Terminated, Symbology::Msi),
            Some(0x10)
        );
        assert_eq!(
            escpos.barcode_code(BarcodeForm::Counted, Symbology::Code39),
            Some(69)
        );
        assert_eq!(escpos.barcode_code(BarcodeForm::Counted, Symbology::Msi), None);

        let csn = &DialectProfile::CSN;
        assert_eq!(
            csn.barcode_code(BarcodeForm::Counted, Symbology::Code128),
            Some(0x49)
        );
        assert_eq!(csn.barcode_code(BarcodeForm::Terminated, Symbology::Code128), None);
    }

    #[test]
    fn test_charset_codes() {
        assert_eq!(DialectProfile::CSN.charset_code(Charset::ShiftJis), Some(4));
        assert_eq!(DialectProfile::CSN.charset_code(Charset::Utf8), Some(1));
        assert_eq!(DialectProfile::ESC_POS.charset_code(Charset::Gbk), None);
    }

    #[test]
    fn test_qr_storage_support() {
        assert!(DialectProfile::ESC_POS.qr.supports_storage());
        assert!(DialectProfile::ESC_POS_COMPACT_QR.qr.supports_storage());
        assert!(!DialectProfile::CSN.qr.supports_storage());
    }

    #[test]
    fn test_function180_total_limit() {
        let qr = DialectProfile::ESC_POS.qr;
        assert_eq!(qr.max_payload + qr.store_overhead as usize, 7092);
    }
}
