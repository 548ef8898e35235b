//! # ESC/POS Barcode Commands
//!
//! This module implements barcode command builders for the ESC/POS family.
//! Builders here take raw code points; which code point a symbology or error
//! correction level maps to is dialect data (see
//! [`DialectProfile`](crate::printer::DialectProfile)).
//!
//! ## Barcode Families
//!
//! | Family | Command | Notes |
//! |--------|---------|-------|
//! | 1D terminated | GS k m data NUL | Codes 0-9, 16 |
//! | 1D counted | GS k m n data | Codes 65-73 |
//! | QR (function 180) | GS ( k pL pH 49 80 48 data | Store, then print |
//! | QR (compact) | GS ( k 48 128 nL nH data | Store, then print |
//! | QR (inline) | GS k 97 v r nL nH data | Single command |
//! | Dual QR | US Q 2 n ... | Two symbols side by side |
//! | PDF417 | GS ( k pL pH 48 80 48 data | Store, then print |
//! | MaxiCode | GS ( k pL pH 50 80 48 data | Store, then print |
//!
//! ## Length Prefixes
//!
//! Stored-symbol commands count their three header bytes (`cn fn m`) into
//! `pL pH`, so a 100-byte payload is announced as 103.

use serde::{Deserialize, Serialize};

use super::commands::{GS, NUL, US, check_range, length_prefix, u16_be};
use crate::error::{PrintLinkError, Result};

// ============================================================================
// 1D BARCODE COMMANDS (GS k)
// ============================================================================

/// 1D Barcode command builders
pub mod barcode1d {
    use super::*;

    /// Linear barcode symbologies.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Symbology {
        /// UPC-A (11-12 digits)
        UpcA,
        /// UPC-E (6-8 digits, or 11-12 digits)
        UpcE,
        /// EAN-13 / JAN-13 (12-13 digits)
        Ean13,
        /// EAN-8 / JAN-8 (7-8 digits)
        Ean8,
        /// Code39 (A-Z, 0-9, space, -.$/+%*)
        Code39,
        /// ITF (Interleaved 2 of 5, even digit count)
        Itf,
        /// Codabar / NW-7
        Codabar,
        /// Code93 (full ASCII)
        Code93,
        /// Code128 (full ASCII)
        Code128,
        /// Code11 (digits and dash)
        Code11,
        /// MSI Plessey (digits)
        Msi,
    }

    /// HRI (Human Readable Interpretation) position
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum HriPosition {
        /// No HRI text printed
        None,
        /// HRI above barcode
        Above,
        /// HRI below barcode (default)
        #[default]
        Below,
        /// HRI both above and below
        Both,
    }

    impl HriPosition {
        /// Index into a dialect's `[none, above, below, both]` code table.
        pub fn index(self) -> usize {
            match self {
                HriPosition::None => 0,
                HriPosition::Above => 1,
                HriPosition::Below => 2,
                HriPosition::Both => 3,
            }
        }
    }

    /// HRI font selection
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub enum HriFont {
        /// Font A (12×24 dots)
        #[default]
        A = 0,
        /// Font B (9×17 dots)
        B = 1,
    }

    /// How the barcode data length is conveyed.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BarcodeForm {
        /// `GS k m data NUL`
        #[default]
        Terminated,
        /// `GS k m n data`
        Counted,
    }

    /// # Set Module Width (GS w n)
    pub fn set_module_width(n: u8) -> Vec<u8> {
        vec![GS, b'w', n]
    }

    /// # Set Barcode Height (GS h n)
    ///
    /// Height in dots, 1-255.
    pub fn set_height(n: u8) -> Vec<u8> {
        vec![GS, b'h', n]
    }

    /// # Select HRI Font (GS f n)
    pub fn set_hri_font(font: HriFont) -> Vec<u8> {
        vec![GS, b'f', font as u8]
    }

    /// # Select HRI Position (GS H n)
    pub fn set_hri_position(code: u8) -> Vec<u8> {
        vec![GS, b'H', code]
    }

    /// # Print Terminated Barcode (GS k m data NUL)
    ///
    /// ```
    /// use printlink::protocol::barcode::barcode1d;
    ///
    /// let cmd = barcode1d::print_terminated(4, b"ABC");
    /// assert_eq!(cmd, vec![0x1D, 0x6B, 4, b'A', b'B', b'C', 0x00]);
    /// ```
    pub fn print_terminated(code: u8, data: &[u8]) -> Vec<u8> {
        let mut cmd = Vec::with_capacity(data.len() + 4);
        cmd.extend([GS, b'k', code]);
        cmd.extend_from_slice(data);
        cmd.push(NUL);
        cmd
    }

    /// # Print Counted Barcode (GS k m n data)
    ///
    /// `data` must be 1-255 bytes.
    pub fn print_counted(code: u8, data: &[u8]) -> Result<Vec<u8>> {
        check_range("barcode data length", data.len() as u32, 1, 255)?;
        let mut cmd = Vec::with_capacity(data.len() + 4);
        cmd.extend([GS, b'k', code, data.len() as u8]);
        cmd.extend_from_slice(data);
        Ok(cmd)
    }

    /// Check that `data` is printable in `symbology`.
    ///
    /// Only the character set and digit counts are checked; check digits are
    /// left to the printer.
    pub fn validate_data(symbology: Symbology, data: &str) -> Result<()> {
        let invalid = |why: &str| {
            Err(PrintLinkError::invalid(format!(
                "{:?} barcode data {:?}: {}",
                symbology, data, why
            )))
        };

        if data.is_empty() {
            return invalid("must not be empty");
        }
        if !data.is_ascii() {
            return invalid("must be ASCII");
        }

        let digits = data.bytes().all(|b| b.is_ascii_digit());
        let len = data.len();
        match symbology {
            Symbology::UpcA if !(digits && (11..=12).contains(&len)) => {
                invalid("expected 11-12 digits")
            }
            Symbology::UpcE if !(digits && ((6..=8).contains(&len) || (11..=12).contains(&len))) => {
                invalid("expected 6-8 or 11-12 digits")
            }
            Symbology::Ean13 if !(digits && (12..=13).contains(&len)) => {
                invalid("expected 12-13 digits")
            }
            Symbology::Ean8 if !(digits && (7..=8).contains(&len)) => {
                invalid("expected 7-8 digits")
            }
            Symbology::Itf if !(digits && len % 2 == 0) => invalid("expected an even number of digits"),
            Symbology::Msi if !digits => invalid("expected digits"),
            Symbology::Code11 if !data.bytes().all(|b| b.is_ascii_digit() || b == b'-') => {
                invalid("expected digits and '-'")
            }
            Symbology::Code39
                if !data.bytes().all(|b| {
                    b.is_ascii_uppercase() || b.is_ascii_digit() || b" -.$/+%*".contains(&b)
                }) =>
            {
                invalid("expected A-Z, 0-9 and ' -.$/+%*'")
            }
            Symbology::Codabar
                if !data.bytes().all(|b| {
                    b.is_ascii_digit() || (b'A'..=b'D').contains(&b) || b"$+-./:".contains(&b)
                }) =>
            {
                invalid("expected 0-9, A-D and '$+-./:'")
            }
            _ => Ok(()),
        }
    }
}

// ============================================================================
// QR CODE COMMANDS
// ============================================================================

/// QR Code command builders
///
/// Three incompatible command families exist in the wild. Which one a printer
/// speaks is recorded in its dialect.
pub mod qr {
    use super::*;

    /// QR Code error correction level
    ///
    /// | Level | Recovery |
    /// |-------|----------|
    /// | L | ~7% |
    /// | M | ~15% |
    /// | Q | ~25% |
    /// | H | ~30% |
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
    pub enum QrErrorLevel {
        L,
        #[default]
        M,
        Q,
        H,
    }

    impl QrErrorLevel {
        /// Index into a dialect's `[L, M, Q, H]` code table.
        pub fn index(self) -> usize {
            self as usize
        }
    }

    /// Function-180 family (cn = 49)
    pub mod function180 {
        use super::*;

        /// Header bytes `cn fn m` counted into the store length prefix.
        pub const STORE_OVERHEAD: u16 = 3;

        /// # Set Module Size (GS ( k 3 0 49 67 n)
        pub fn set_module_size(n: u8) -> Vec<u8> {
            vec![GS, b'(', b'k', 3, 0, 49, 67, n]
        }

        /// # Set Error Correction (GS ( k 3 0 49 69 n)
        pub fn set_error_correction(code: u8) -> Vec<u8> {
            vec![GS, b'(', b'k', 3, 0, 49, 69, code]
        }

        /// # Store Symbol Data (GS ( k pL pH 49 80 48 data)
        ///
        /// ```
        /// use printlink::protocol::barcode::qr::function180;
        ///
        /// let cmd = function180::store(&[b'x'; 100], 3).unwrap();
        /// assert_eq!(&cmd[..8], &[0x1D, 0x28, 0x6B, 103, 0, 49, 80, 48]);
        /// assert_eq!(cmd.len(), 8 + 100);
        /// ```
        pub fn store(data: &[u8], overhead: u16) -> Result<Vec<u8>> {
            let [pl, ph] = length_prefix(data.len(), overhead)?;
            let mut cmd = Vec::with_capacity(data.len() + 8);
            cmd.extend([GS, b'(', b'k', pl, ph, 49, 80, 48]);
            cmd.extend_from_slice(data);
            Ok(cmd)
        }

        /// # Print Stored Symbol (GS ( k 3 0 49 81 48)
        pub fn print() -> Vec<u8> {
            vec![GS, b'(', b'k', 3, 0, 49, 81, 48]
        }
    }

    /// Compact family (`GS ( k 48 fn`, no parameter-length bytes)
    pub mod compact {
        use super::*;

        /// # Set Module Size (GS ( k 48 103 n)
        pub fn set_module_size(n: u8) -> Vec<u8> {
            vec![GS, b'(', b'k', 48, 103, n]
        }

        /// # Set Error Correction (GS ( k 48 105 n)
        pub fn set_error_correction(code: u8) -> Vec<u8> {
            vec![GS, b'(', b'k', 48, 105, code]
        }

        /// # Store Symbol Data (GS ( k 48 128 nL nH data)
        pub fn store(data: &[u8], overhead: u16) -> Result<Vec<u8>> {
            let [nl, nh] = length_prefix(data.len(), overhead)?;
            let mut cmd = Vec::with_capacity(data.len() + 7);
            cmd.extend([GS, b'(', b'k', 48, 0x80, nl, nh]);
            cmd.extend_from_slice(data);
            Ok(cmd)
        }

        /// # Print Stored Symbol (GS ( k 48 129)
        pub fn print() -> Vec<u8> {
            vec![GS, b'(', b'k', 48, 0x81]
        }
    }

    /// Inline family used by CSN controllers: module width plus one print command.
    pub mod inline {
        use super::*;
        use crate::protocol::barcode::barcode1d;

        /// `m` byte of `GS k m v r nL nH`
        pub const QR_CODE: u8 = 97;

        /// # Print QR (GS w n, GS k 97 v r nL nH data)
        ///
        /// ```
        /// use printlink::protocol::barcode::qr::inline;
        ///
        /// let cmd = inline::print(b"hi", 4, 0, 2, 0).unwrap();
        /// assert_eq!(cmd, vec![0x1D, 0x77, 4, 0x1D, 0x6B, 97, 0, 2, 2, 0, b'h', b'i']);
        /// ```
        pub fn print(
            data: &[u8],
            module_size: u8,
            version: u8,
            ecc_code: u8,
            overhead: u16,
        ) -> Result<Vec<u8>> {
            let [nl, nh] = length_prefix(data.len(), overhead)?;
            let mut cmd = barcode1d::set_module_width(module_size);
            cmd.extend([GS, b'k', QR_CODE, version, ecc_code, nl, nh]);
            cmd.extend_from_slice(data);
            Ok(cmd)
        }
    }

    /// One half of a dual QR print.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct DualQrPart<'a> {
        pub data: &'a [u8],
        pub position: u16,
        pub ecc_code: u8,
        pub version: u8,
    }

    /// # Print Two QR Codes (US Q 2 n [posH posL lenH lenL ecc ver data] ×2)
    ///
    /// Positions and lengths in this command are big-endian.
    pub fn dual(module_size: u8, first: &DualQrPart<'_>, second: &DualQrPart<'_>) -> Result<Vec<u8>> {
        let mut cmd = vec![US, b'Q', 2, module_size];
        for part in [first, second] {
            let len = u16::try_from(part.data.len()).map_err(|_| {
                PrintLinkError::invalid(format!(
                    "dual QR payload of {} bytes exceeds 65535",
                    part.data.len()
                ))
            })?;
            cmd.extend(u16_be(part.position));
            cmd.extend(u16_be(len));
            cmd.extend([part.ecc_code, part.version]);
            cmd.extend_from_slice(part.data);
        }
        Ok(cmd)
    }
}

// ============================================================================
// PDF417 COMMANDS
// ============================================================================

/// PDF417 command builders (GS ( k, cn = 48)
pub mod pdf417 {
    use super::*;

    /// Header bytes `cn fn m` counted into the store length prefix.
    pub const STORE_OVERHEAD: u16 = 3;

    /// PDF417 error correction: a fixed level or a ratio of the data size.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case", tag = "mode", content = "value")]
    pub enum Pdf417ErrorCorrection {
        /// Level 0-8
        Level(u8),
        /// Ratio 1-40 (×10%)
        Ratio(u8),
    }

    impl Default for Pdf417ErrorCorrection {
        fn default() -> Self {
            Self::Ratio(1)
        }
    }

    /// # Set Columns (GS ( k 3 0 48 65 n), 0 = auto, 1-30
    pub fn set_columns(n: u8) -> Result<Vec<u8>> {
        check_range("PDF417 columns", n as u32, 0, 30)?;
        Ok(vec![GS, b'(', b'k', 3, 0, 48, 65, n])
    }

    /// # Set Rows (GS ( k 3 0 48 66 n), 0 = auto, 3-90
    pub fn set_rows(n: u8) -> Result<Vec<u8>> {
        if n != 0 {
            check_range("PDF417 rows", n as u32, 3, 90)?;
        }
        Ok(vec![GS, b'(', b'k', 3, 0, 48, 66, n])
    }

    /// # Set Module Width (GS ( k 3 0 48 67 n), 2-8
    pub fn set_module_width(n: u8) -> Result<Vec<u8>> {
        check_range("PDF417 module width", n as u32, 2, 8)?;
        Ok(vec![GS, b'(', b'k', 3, 0, 48, 67, n])
    }

    /// # Set Row Height (GS ( k 3 0 48 68 n), 2-8
    pub fn set_row_height(n: u8) -> Result<Vec<u8>> {
        check_range("PDF417 row height", n as u32, 2, 8)?;
        Ok(vec![GS, b'(', b'k', 3, 0, 48, 68, n])
    }

    /// # Set Error Correction (GS ( k 4 0 48 69 m n)
    pub fn set_error_correction(ecc: Pdf417ErrorCorrection) -> Result<Vec<u8>> {
        let (m, n) = match ecc {
            Pdf417ErrorCorrection::Level(n) => {
                check_range("PDF417 error correction level", n as u32, 0, 8)?;
                (48, 48 + n)
            }
            Pdf417ErrorCorrection::Ratio(n) => {
                check_range("PDF417 error correction ratio", n as u32, 1, 40)?;
                (49, n)
            }
        };
        Ok(vec![GS, b'(', b'k', 4, 0, 48, 69, m, n])
    }

    /// # Select Options (GS ( k 3 0 48 70 m), 0 = standard, 1 = truncated
    pub fn set_truncated(truncated: bool) -> Vec<u8> {
        vec![GS, b'(', b'k', 3, 0, 48, 70, truncated as u8]
    }

    /// # Store Symbol Data (GS ( k pL pH 48 80 48 data)
    pub fn store(data: &[u8]) -> Result<Vec<u8>> {
        let [pl, ph] = length_prefix(data.len(), STORE_OVERHEAD)?;
        let mut cmd = Vec::with_capacity(data.len() + 8);
        cmd.extend([GS, b'(', b'k', pl, ph, 48, 80, 48]);
        cmd.extend_from_slice(data);
        Ok(cmd)
    }

    /// # Print Stored Symbol (GS ( k 3 0 48 81 48)
    pub fn print() -> Vec<u8> {
        vec![GS, b'(', b'k', 3, 0, 48, 81, 48]
    }
}

// ============================================================================
// MAXICODE COMMANDS
// ============================================================================

/// MaxiCode command builders (GS ( k, cn = 50)
pub mod maxicode {
    use super::*;

    /// Header bytes `cn fn m` counted into the store length prefix.
    pub const STORE_OVERHEAD: u16 = 3;

    /// Longest payload a MaxiCode symbol holds.
    pub const MAX_PAYLOAD: usize = 138;

    /// # Select Mode (GS ( k 3 0 50 65 n), 2-6
    pub fn set_mode(n: u8) -> Result<Vec<u8>> {
        check_range("MaxiCode mode", n as u32, 2, 6)?;
        Ok(vec![GS, b'(', b'k', 3, 0, 50, 65, n])
    }

    /// # Store Symbol Data (GS ( k pL pH 50 80 48 data)
    pub fn store(data: &[u8]) -> Result<Vec<u8>> {
        check_range("MaxiCode payload length", data.len() as u32, 1, MAX_PAYLOAD as u32)?;
        let [pl, ph] = length_prefix(data.len(), STORE_OVERHEAD)?;
        let mut cmd = Vec::with_capacity(data.len() + 8);
        cmd.extend([GS, b'(', b'k', pl, ph, 50, 80, 48]);
        cmd.extend_from_slice(data);
        Ok(cmd)
    }

    /// # Print Stored Symbol (GS ( k 3 0 50 81 48)
    pub fn print() -> Vec<u8> {
        vec![GS, b'(', b'k', 3, 0, 50, 81, 48]
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    mod barcode1d_tests {
        use super::barcode1d::*;
        use pretty_assertions::assert_eq;
        use super::*;

        #[test]
        fn test_terminated_layout() {
            let cmd = print_terminated(8, b"12345");
            assert_eq!(&cmd[..3], &[0x1D, 0x6B, 8]);
            assert_eq!(&cmd[3..8], b"12345");
            assert_eq!(cmd.last(), Some(&0x00));
        }

        #[test]
        fn test_counted_layout() {
            let cmd = print_counted(69, b"B12345789").unwrap();
            assert_eq!(&cmd[..4], &[0x1D, 0x6B, 69, 9]);
            assert_eq!(cmd.len(), 4 + 9);
        }

        #[test]
        fn test_counted_rejects_long_data() {
            assert!(print_counted(73, &[b'1'; 256]).is_err());
            assert!(print_counted(73, b"").is_err());
        }

        #[test]
        fn test_settings() {
            assert_eq!(set_module_width(3), vec![0x1D, 0x77, 3]);
            assert_eq!(set_height(162), vec![0x1D, 0x68, 162]);
            assert_eq!(set_hri_font(HriFont::B), vec![0x1D, 0x66, 1]);
            assert_eq!(set_hri_position(2), vec![0x1D, 0x48, 2]);
        }

        #[test]
        fn test_validate_digits() {
            assert!(validate_data(Symbology::Ean13, "590123412345").is_ok());
            assert!(validate_data(Symbology::Ean13, "59012341234X").is_err());
            assert!(validate_data(Symbology::UpcA, "123").is_err());
            assert!(validate_data(Symbology::Itf, "1234").is_ok());
            assert!(validate_data(Symbology::Itf, "123").is_err());
        }

        #[test]
        fn test_validate_code39_charset() {
            assert!(validate_data(Symbology::Code39, "B12345789").is_ok());
            assert!(validate_data(Symbology::Code39, "lower").is_err());
        }

        #[test]
        fn test_validate_rejects_non_ascii_and_empty() {
            assert!(validate_data(Symbology::Code128, "").is_err());
            assert!(validate_data(Symbology::Code128, "café").is_err());
            assert!(validate_data(Symbology::Code128, "Hello-128").is_ok());
        }
    }

    mod qr_tests {
        use super::qr::*;
        use pretty_assertions::assert_eq;
        use super::*;

        #[test]
        fn test_function180_settings() {
            assert_eq!(
                function180::set_module_size(6),
                vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x43, 6]
            );
            assert_eq!(
                function180::set_error_correction(48),
                vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x45, 48]
            );
            assert_eq!(
                function180::print(),
                vec![0x1D, 0x28, 0x6B, 0x03, 0x00, 0x31, 0x51, 0x30]
            );
        }

        #[test]
        fn test_function180_store_prefix_crosses_256() {
            let cmd = function180::store(&[0u8; 300], 3).unwrap();
            assert_eq!(cmd[3], (303 % 256) as u8);
            assert_eq!(cmd[4], (303 / 256) as u8);
        }

        #[test]
        fn test_compact_commands() {
            assert_eq!(compact::set_module_size(8), vec![29, 40, 107, 48, 103, 8]);
            assert_eq!(compact::set_error_correction(0x31), vec![29, 40, 107, 48, 105, 0x31]);
            assert_eq!(
                compact::store(b"abc", 0).unwrap(),
                vec![29, 40, 107, 48, 0x80, 3, 0, b'a', b'b', b'c']
            );
            assert_eq!(compact::print(), vec![29, 40, 107, 48, 0x81]);
        }

        #[test]
        fn test_dual_layout_is_big_endian() {
            let first = DualQrPart {
                data: b"AB",
                position: 0x0102,
                ecc_code: 4,
                version: 0,
            };
            let second = DualQrPart {
                data: b"C",
                position: 300,
                ecc_code: 1,
                version: 40,
            };
            let cmd = dual(3, &first, &second).unwrap();
            assert_eq!(
                cmd,
                vec![
                    31, 81, 2, 3, // header
                    0x01, 0x02, 0, 2, 4, 0, b'A', b'B', // first
                    1, 44, 0, 1, 1, 40, b'C', // second
                ]
            );
        }
    }

    mod pdf417_tests {
        use super::pdf417::*;
        use pretty_assertions::assert_eq;
        use super::*;

        #[test]
        fn test_ranges() {
            assert!(set_columns(30).is_ok());
            assert!(set_columns(31).is_err());
            assert!(set_rows(0).is_ok());
            assert!(set_rows(2).is_err());
            assert!(set_rows(90).is_ok());
            assert!(set_module_width(1).is_err());
            assert!(set_row_height(9).is_err());
        }

        #[test]
        fn test_error_correction_modes() {
            assert_eq!(
                set_error_correction(Pdf417ErrorCorrection::Level(2)).unwrap(),
                vec![29, 40, 107, 4, 0, 48, 69, 48, 50]
            );
            assert_eq!(
                set_error_correction(Pdf417ErrorCorrection::Ratio(5)).unwrap(),
                vec![29, 40, 107, 4, 0, 48, 69, 49, 5]
            );
            assert!(set_error_correction(Pdf417ErrorCorrection::Level(9)).is_err());
            assert!(set_error_correction(Pdf417ErrorCorrection::Ratio(0)).is_err());
        }

        #[test]
        fn test_store_and_print() {
            let cmd = store(b"PDF").unwrap();
            assert_eq!(cmd, vec![29, 40, 107, 6, 0, 48, 80, 48, b'P', b'D', b'F']);
            assert_eq!(print(), vec![29, 40, 107, 3, 0, 48, 81, 48]);
        }
    }

    mod maxicode_tests {
        use super::maxicode::*;
        use pretty_assertions::assert_eq;
        use super::*;

        #[test]
        fn test_mode_range() {
            assert_eq!(set_mode(2).unwrap(), vec![29, 40, 107, 3, 0, 50, 65, 2]);
            assert!(set_mode(1).is_err());
            assert!(set_mode(7).is_err());
        }

        #[test]
        fn test_store_limits() {
            assert!(store(&[b'9'; MAX_PAYLOAD]).is_ok());
            assert!(store(&[b'9'; MAX_PAYLOAD + 1]).is_err());
            assert!(store(b"").is_err());
        }
    }
}
