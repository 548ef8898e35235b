//! # Code Generation
//!
//! Converts print intents to command bytes for one dialect.
//!
//! Every intent is checked in full before its first byte is produced, so a
//! failed encode never leaves half a command behind.

use tracing::{debug, instrument};

use super::ops::{CutMode, DualQr, PrintIntent, PrintJob, TwoDimensionalSymbol};
use crate::error::{PrintLinkError, Result};
use crate::printer::DialectProfile;
use crate::printer::dialect::{QrFamily, TextLayout};
use crate::protocol::barcode::barcode1d::{self, BarcodeForm};
use crate::protocol::barcode::qr::{self, DualQrPart, QrErrorLevel, compact, function180, inline};
use crate::protocol::barcode::{maxicode, pdf417};
use crate::protocol::commands::{self, CR, LF, check_range};
use crate::protocol::text::{self, Alignment, CharSize};
use crate::protocol::{charset, graphics};
use crate::render::{Compression, compress, raster};

/// Encode one intent for `dialect`.
///
/// Deterministic: the same intent and dialect always give the same bytes.
///
/// ```
/// use printlink::ir::{PrintIntent, encode};
/// use printlink::printer::DialectProfile;
///
/// let bytes = encode(&PrintIntent::Initialize, &DialectProfile::CSN).unwrap();
/// assert_eq!(bytes, vec![0x1B, 0x40]);
/// ```
pub fn encode(intent: &PrintIntent, dialect: &DialectProfile) -> Result<Vec<u8>> {
    intent.validate()?;

    let mut out = Vec::new();
    match intent {
        // ===== Printer Control =====
        PrintIntent::Initialize => out.extend_from_slice(dialect.init_sequence),
        PrintIntent::Feed { lines } => out.extend(commands::feed_lines(*lines)),
        PrintIntent::LineSpacing { dots } => match dots {
            Some(n) => out.extend(commands::line_spacing(*n)),
            None => out.extend(commands::default_line_spacing()),
        },
        PrintIntent::MotionUnit {
            horizontal,
            vertical,
        } => out.extend(commands::motion_unit(*horizontal, *vertical)),

        // ===== Text =====
        PrintIntent::Text {
            content,
            alignment,
            size,
            style,
            font,
            offset_x,
        } => {
            let encoded = charset::encode(content, dialect.charset)?;
            match dialect.text.layout {
                TextLayout::Incremental => {
                    out.extend(text::align(*alignment));
                    out.extend(text::size(*size));
                    out.extend(text::font(*font));
                    if *offset_x != 0 {
                        out.extend(commands::absolute_position(*offset_x));
                    }
                    out.extend(style.enable_commands());
                    out.extend(encoded);
                    out.extend(style.disable_commands());
                }
                TextLayout::Positioned => {
                    let code = dialect.charset_code(dialect.charset).ok_or_else(|| {
                        PrintLinkError::unsupported(format!(
                            "dialect {} cannot select charset {}",
                            dialect.name,
                            dialect.charset.name()
                        ))
                    })?;
                    out.extend(text::align(*alignment));
                    out.extend(commands::absolute_position(*offset_x));
                    out.extend(text::size(*size));
                    out.extend(text::font(*font));
                    out.extend(style.full_state_commands());
                    out.extend(text::double_byte_on());
                    out.extend(text::select_charset(code));
                    out.extend(encoded);
                }
            }
        }
        PrintIntent::NewLine => out.push(LF),
        PrintIntent::CarriageReturn => out.push(CR),
        PrintIntent::Divider { columns } => {
            out.extend(text::align(Alignment::Center));
            out.extend(text::size(CharSize::NORMAL));
            out.extend((0..*columns).map(|i| if i % 2 == 0 { b'-' } else { b' ' }));
            out.push(LF);
        }

        // ===== Barcodes =====
        PrintIntent::Barcode {
            data,
            symbology,
            module_width,
            height,
            hri,
            hri_font,
            offset_x,
            form,
        } => {
            let (min_w, max_w) = dialect.barcode.module_widths;
            check_range("barcode module width", *module_width as u32, min_w as u32, max_w as u32)?;
            let code = dialect.barcode_code(*form, *symbology).ok_or_else(|| {
                PrintLinkError::unsupported(format!(
                    "dialect {} has no {:?} code for {:?}",
                    dialect.name, form, symbology
                ))
            })?;
            barcode1d::validate_data(*symbology, data)?;

            if dialect.barcode.positioned || *offset_x != 0 {
                out.extend(commands::absolute_position(*offset_x));
            }
            out.extend(barcode1d::set_module_width(*module_width));
            out.extend(barcode1d::set_height(*height as u8));
            out.extend(barcode1d::set_hri_font(*hri_font));
            out.extend(barcode1d::set_hri_position(
                dialect.barcode.hri_codes[hri.index()],
            ));
            match form {
                BarcodeForm::Terminated => {
                    out.extend(barcode1d::print_terminated(code, data.as_bytes()))
                }
                BarcodeForm::Counted => {
                    out.extend(barcode1d::print_counted(code, data.as_bytes())?)
                }
            }
        }
        PrintIntent::QrCode {
            data,
            module_size,
            error_correction,
            version,
        } => {
            let qr_cmds = &dialect.qr;
            if qr_cmds.max_version == 0 && *version != 0 {
                return Err(PrintLinkError::unsupported(format!(
                    "dialect {} cannot select a QR version",
                    dialect.name
                )));
            }
            check_range("QR version", *version as u32, 0, qr_cmds.max_version as u32)?;
            let payload = qr_payload(data, dialect)?;
            let ecc = ecc_code(dialect, *error_correction);

            match qr_cmds.family {
                QrFamily::Function180 | QrFamily::Compact => {
                    out.extend(store_qr(&payload, *module_size, ecc, dialect)?);
                    out.extend(print_stored_qr(dialect)?);
                }
                QrFamily::Inline => out.extend(inline::print(
                    &payload,
                    *module_size,
                    *version,
                    ecc,
                    qr_cmds.store_overhead,
                )?),
            }
        }
        PrintIntent::StoreQrCode {
            data,
            module_size,
            error_correction,
        } => {
            let payload = qr_payload(data, dialect)?;
            let ecc = ecc_code(dialect, *error_correction);
            out.extend(store_qr(&payload, *module_size, ecc, dialect)?);
        }
        PrintIntent::PrintStoredQrCode => out.extend(print_stored_qr(dialect)?),
        PrintIntent::DualQrCode {
            first,
            second,
            module_size,
        } => {
            if !dialect.dual_qr {
                return Err(PrintLinkError::unsupported(format!(
                    "dialect {} cannot print dual QR codes",
                    dialect.name
                )));
            }
            let first_data = charset::encode(&first.data, dialect.symbol_charset)?;
            let second_data = charset::encode(&second.data, dialect.symbol_charset)?;
            out.extend(qr::dual(
                *module_size,
                &dual_part(first, &first_data, dialect),
                &dual_part(second, &second_data, dialect),
            )?);
        }
        PrintIntent::TwoDimensional { symbol } => {
            if !dialect.two_dimensional {
                return Err(PrintLinkError::unsupported(format!(
                    "dialect {} cannot print PDF417 or MaxiCode",
                    dialect.name
                )));
            }
            out.extend(two_dimensional(symbol, dialect)?);
        }

        // ===== Graphics =====
        PrintIntent::RasterImage {
            bitmap,
            target_width,
            binarization,
            compression,
        } => {
            let opcode = match compression {
                Compression::None => None,
                Compression::RunLength => Some(dialect.raster.run_length),
                Compression::Deflate => Some(dialect.raster.deflate),
            };
            if let Some(None) = opcode {
                return Err(PrintLinkError::unsupported(format!(
                    "dialect {} has no {:?} raster command",
                    dialect.name, compression
                )));
            }

            let prepared = raster::prepare(bitmap, *target_width, *binarization)?;
            let (w, h) = (prepared.width_bytes, prepared.height);
            match (compression, opcode.flatten()) {
                (Compression::RunLength, Some(op)) => {
                    let payload = compress::run_length(&prepared.data, w as usize);
                    out.extend(graphics::compressed_raster(op, w, h, &payload)?);
                }
                (Compression::Deflate, Some(op)) => {
                    let payload = compress::deflate(&prepared.data)?;
                    out.extend(graphics::compressed_raster(op, w, h, &payload)?);
                }
                _ => out.extend(graphics::raster_bands(
                    w,
                    h,
                    &prepared.data,
                    dialect.raster.max_band_rows,
                )),
            }
        }

        // ===== Other =====
        PrintIntent::RawBytes { bytes } => out.extend_from_slice(bytes),
        PrintIntent::CutPaper { mode } => match mode {
            CutMode::Full => out.extend_from_slice(dialect.cut.full),
            CutMode::Partial => out.extend_from_slice(dialect.cut.partial),
            CutMode::FeedAndFull { lines } => match dialect.cut.feed_full {
                Some(prefix) => {
                    out.extend_from_slice(prefix);
                    out.push(*lines);
                }
                None => {
                    out.extend(commands::feed_lines(*lines));
                    out.extend_from_slice(dialect.cut.full);
                }
            },
        },
        PrintIntent::CashDrawerPulse { pin, on_ms, off_ms } => {
            out.extend(commands::drawer_pulse(*pin, *on_ms, *off_ms)?)
        }
    }

    Ok(out)
}

fn ecc_code(dialect: &DialectProfile, level: QrErrorLevel) -> u8 {
    dialect.qr.ecc_codes[level.index()]
}

/// Encode QR data in the symbol charset and check its size.
fn qr_payload(data: &str, dialect: &DialectProfile) -> Result<Vec<u8>> {
    let payload = charset::encode(data, dialect.symbol_charset)?;
    check_range(
        "QR payload length",
        payload.len() as u32,
        1,
        dialect.qr.max_payload as u32,
    )?;
    Ok(payload)
}

fn store_qr(payload: &[u8], module_size: u8, ecc: u8, dialect: &DialectProfile) -> Result<Vec<u8>> {
    let overhead = dialect.qr.store_overhead;
    let mut out = Vec::with_capacity(payload.len() + 24);
    match dialect.qr.family {
        QrFamily::Function180 => {
            out.extend(function180::set_module_size(module_size));
            out.extend(function180::set_error_correction(ecc));
            out.extend(function180::store(payload, overhead)?);
        }
        QrFamily::Compact => {
            out.extend(compact::set_module_size(module_size));
            out.extend(compact::set_error_correction(ecc));
            out.extend(compact::store(payload, overhead)?);
        }
        QrFamily::Inline => return Err(no_qr_storage(dialect)),
    }
    Ok(out)
}

fn print_stored_qr(dialect: &DialectProfile) -> Result<Vec<u8>> {
    match dialect.qr.family {
        QrFamily::Function180 => Ok(function180::print()),
        QrFamily::Compact => Ok(compact::print()),
        QrFamily::Inline => Err(no_qr_storage(dialect)),
    }
}

fn no_qr_storage(dialect: &DialectProfile) -> PrintLinkError {
    PrintLinkError::unsupported(format!(
        "dialect {} cannot store QR data in printer memory",
        dialect.name
    ))
}

fn dual_part<'a>(part: &DualQr, data: &'a [u8], dialect: &DialectProfile) -> DualQrPart<'a> {
    DualQrPart {
        data,
        position: part.position,
        ecc_code: ecc_code(dialect, part.error_correction),
        version: part.version,
    }
}

fn two_dimensional(symbol: &TwoDimensionalSymbol, dialect: &DialectProfile) -> Result<Vec<u8>> {
    let mut out = Vec::new();
    match symbol {
        TwoDimensionalSymbol::Pdf417 {
            data,
            columns,
            rows,
            module_width,
            row_height,
            error_correction,
            truncated,
        } => {
            let payload = charset::encode(data, dialect.symbol_charset)?;
            out.extend(pdf417::set_columns(*columns)?);
            out.extend(pdf417::set_rows(*rows)?);
            out.extend(pdf417::set_module_width(*module_width)?);
            out.extend(pdf417::set_row_height(*row_height)?);
            out.extend(pdf417::set_error_correction(*error_correction)?);
            out.extend(pdf417::set_truncated(*truncated));
            out.extend(pdf417::store(&payload)?);
            out.extend(pdf417::print());
        }
        TwoDimensionalSymbol::MaxiCode { mode, data } => {
            let payload = charset::encode(data, dialect.symbol_charset)?;
            out.extend(maxicode::set_mode(*mode)?);
            out.extend(maxicode::store(&payload)?);
            out.extend(maxicode::print());
        }
    }
    Ok(out)
}

impl PrintJob {
    /// Encode every intent in order into one byte stream.
    ///
    /// Fails on the first intent that cannot be encoded; nothing is returned
    /// for the intents before it.
    #[instrument(skip_all, fields(dialect = dialect.name, intents = self.len()))]
    pub fn encode(&self, dialect: &DialectProfile) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        for (index, intent) in self.iter().enumerate() {
            let bytes = encode(intent, dialect).inspect_err(|e| {
                debug!(index, intent = intent.name(), error = %e, "intent rejected");
            })?;
            out.extend(bytes);
        }
        debug!(bytes = out.len(), "encoded job");
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::protocol::barcode::barcode1d::{HriFont, HriPosition, Symbology};
    use crate::protocol::commands::DrawerPin;
    use crate::protocol::text::{Font, TextStyle, Underline};
    use crate::render::{Binarization, Bitmap};
    use pretty_assertions::assert_eq;

    const ESC_POS: &DialectProfile = &DialectProfile::ESC_POS;
    const COMPACT: &DialectProfile = &DialectProfile::ESC_POS_COMPACT_QR;
    const CSN: &DialectProfile = &DialectProfile::CSN;

    fn barcode(symbology: Symbology, data: &str, form: BarcodeForm) -> PrintIntent {
        PrintIntent::Barcode {
            data: data.into(),
            symbology,
            module_width: 2,
            height: 80,
            hri: HriPosition::Below,
            hri_font: HriFont::A,
            offset_x: 0,
            form,
        }
    }

    #[test]
    fn test_empty_job() {
        assert!(PrintJob::new().encode(ESC_POS).unwrap().is_empty());
    }

    #[test]
    fn test_init_sequences() {
        assert_eq!(
            PrintJob::with_init().encode(ESC_POS).unwrap(),
            vec![0x1B, 0x40, 0x1B, 0x32, 0x1B, 0x4D, 0x00]
        );
        assert_eq!(PrintJob::with_init().encode(CSN).unwrap(), vec![0x1B, 0x40]);
    }

    #[test]
    fn test_incremental_text() {
        let intent = PrintIntent::Text {
            content: "Hi".into(),
            alignment: Alignment::Center,
            size: CharSize::DOUBLE,
            style: TextStyle::new().bold(true),
            font: Font::A,
            offset_x: 0,
        };
        assert_eq!(
            encode(&intent, ESC_POS).unwrap(),
            vec![
                0x1B, 0x61, 1, // align center
                0x1D, 0x21, 0x11, // double size
                0x1B, 0x4D, 0, // font A
                0x1B, 0x45, 1, // bold on
                b'H', b'i', //
                0x1B, 0x45, 0, // bold off
            ]
        );
    }

    #[test]
    fn test_positioned_text() {
        let intent = PrintIntent::Text {
            content: "A".into(),
            alignment: Alignment::Left,
            size: CharSize::NORMAL,
            style: TextStyle::new().underline(Underline::Single),
            font: Font::B,
            offset_x: 300,
        };
        assert_eq!(
            encode(&intent, CSN).unwrap(),
            vec![
                0x1B, 0x61, 0, // align left
                0x1B, 0x24, 44, 1, // offset 300
                0x1D, 0x21, 0, // size
                0x1B, 0x4D, 1, // font B
                0x1B, 0x45, 0, // bold
                0x1B, 0x2D, 1, // underline
                0x1C, 0x2D, 1, // double-byte underline
                0x1B, 0x7B, 0, // upside down
                0x1D, 0x42, 0, // reverse
                0x1B, 0x56, 0, // rotate
                0x1C, 0x26, // double-byte on
                0x1B, 0x39, 3, // Big5
                b'A',
            ]
        );
    }

    #[test]
    fn test_text_charset() {
        let bytes = encode(&PrintIntent::text("中"), ESC_POS).unwrap();
        assert!(bytes.ends_with(&[0xD6, 0xD0]));

        let err = encode(&PrintIntent::text("\u{1F600}"), ESC_POS).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
    }

    #[test]
    fn test_divider() {
        let bytes = encode(&PrintIntent::Divider { columns: 5 }, ESC_POS).unwrap();
        assert_eq!(
            bytes,
            vec![0x1B, 0x61, 1, 0x1D, 0x21, 0, b'-', b' ', b'-', b' ', b'-', 0x0A]
        );
    }

    #[test]
    fn test_barcode_terminated() {
        let bytes = encode(&barcode(Symbology::Code39, "AB1", BarcodeForm::Terminated), ESC_POS)
            .unwrap();
        assert_eq!(
            bytes,
            vec![
                0x1D, 0x77, 2, // width
                0x1D, 0x68, 80, // height
                0x1D, 0x66, 0, // HRI font
                0x1D, 0x48, 1, // HRI below (ESC/POS numbering)
                0x1D, 0x6B, 4, b'A', b'B', b'1', 0,
            ]
        );
    }

    #[test]
    fn test_barcode_counted_positioned() {
        let bytes = encode(&barcode(Symbology::Code128, "{B12", BarcodeForm::Counted), CSN)
            .unwrap();
        assert_eq!(
            bytes,
            vec![
                0x1B, 0x24, 0, 0, // position
                0x1D, 0x77, 2, 0x1D, 0x68, 80, 0x1D, 0x66, 0, //
                0x1D, 0x48, 2, // HRI below (CSN numbering)
                0x1D, 0x6B, 0x49, 4, b'{', b'B', b'1', b'2',
            ]
        );
    }

    #[test]
    fn test_barcode_nul_only_in_counted_form() {
        let intent = barcode(Symbology::Code128, "{BA\0B", BarcodeForm::Terminated);
        assert_eq!(encode(&intent, ESC_POS).unwrap_err().kind(), ErrorKind::InvalidParameter);

        let bytes = encode(&barcode(Symbology::Code128, "{BA\0B", BarcodeForm::Counted), CSN)
            .unwrap();
        assert!(bytes.ends_with(&[0x1D, 0x6B, 0x49, 5, b'{', b'B', b'A', 0, b'B']));
    }

    #[test]
    fn test_barcode_form_unsupported() {
        let err = encode(&barcode(Symbology::Code128, "X", BarcodeForm::Terminated), CSN)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::DeviceUnsupported);
    }

    #[test]
    fn test_barcode_module_width_per_dialect() {
        let mut intent = barcode(Symbology::Code128, "X", BarcodeForm::Counted);
        if let PrintIntent::Barcode { module_width, .. } = &mut intent {
            *module_width = 5;
        }
        assert_eq!(encode(&intent, ESC_POS).unwrap_err().kind(), ErrorKind::InvalidParameter);
        assert!(encode(&intent, CSN).is_ok());
    }

    #[test]
    fn test_barcode_height_out_of_range() {
        let mut intent = barcode(Symbology::Code128, "X", BarcodeForm::Terminated);
        if let PrintIntent::Barcode { height, .. } = &mut intent {
            *height = 256;
        }
        assert_eq!(encode(&intent, ESC_POS).unwrap_err().kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_qr_function180() {
        let intent = PrintIntent::qr_code("abc", 6, QrErrorLevel::Q).unwrap();
        assert_eq!(
            encode(&intent, ESC_POS).unwrap(),
            vec![
                0x1D, 0x28, 0x6B, 3, 0, 49, 67, 6, // size
                0x1D, 0x28, 0x6B, 3, 0, 49, 69, 50, // ecc Q
                0x1D, 0x28, 0x6B, 6, 0, 49, 80, 48, b'a', b'b', b'c', // store
                0x1D, 0x28, 0x6B, 3, 0, 49, 81, 48, // print
            ]
        );
    }

    #[test]
    fn test_qr_compact() {
        let intent = PrintIntent::qr_code("ab", 3, QrErrorLevel::L).unwrap();
        assert_eq!(
            encode(&intent, COMPACT).unwrap(),
            vec![
                0x1D, 0x28, 0x6B, 48, 103, 3, //
                0x1D, 0x28, 0x6B, 48, 105, 0x30, //
                0x1D, 0x28, 0x6B, 48, 0x80, 2, 0, b'a', b'b', //
                0x1D, 0x28, 0x6B, 48, 0x81,
            ]
        );
    }

    #[test]
    fn test_qr_inline_version() {
        let intent = PrintIntent::QrCode {
            data: "ab".into(),
            module_size: 4,
            error_correction: QrErrorLevel::H,
            version: 5,
        };
        assert_eq!(
            encode(&intent, CSN).unwrap(),
            vec![0x1D, 0x77, 4, 0x1D, 0x6B, 97, 5, 4, 2, 0, b'a', b'b']
        );
        assert_eq!(encode(&intent, ESC_POS).unwrap_err().kind(), ErrorKind::DeviceUnsupported);

        let too_big = PrintIntent::QrCode {
            data: "ab".into(),
            module_size: 4,
            error_correction: QrErrorLevel::H,
            version: 17,
        };
        assert_eq!(encode(&too_big, CSN).unwrap_err().kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_qr_payload_limit() {
        let at_limit = PrintIntent::qr_code("x".repeat(7089), 4, QrErrorLevel::L).unwrap();
        let bytes = encode(&at_limit, ESC_POS).unwrap();
        // 7092 = 0x1BB4
        assert_eq!(&bytes[16..21], &[0x1D, 0x28, 0x6B, 0xB4, 0x1B]);

        let over = PrintIntent::qr_code("x".repeat(7090), 4, QrErrorLevel::L).unwrap();
        assert_eq!(encode(&over, ESC_POS).unwrap_err().kind(), ErrorKind::InvalidParameter);
    }

    #[test]
    fn test_stored_qr_split() {
        let store = PrintIntent::StoreQrCode {
            data: "x".into(),
            module_size: 4,
            error_correction: QrErrorLevel::M,
        };
        let bytes = encode(&store, ESC_POS).unwrap();
        assert!(bytes.ends_with(&[0x1D, 0x28, 0x6B, 4, 0, 49, 80, 48, b'x']));
        assert_eq!(
            encode(&PrintIntent::PrintStoredQrCode, ESC_POS).unwrap(),
            function180::print()
        );
        assert_eq!(
            encode(&PrintIntent::PrintStoredQrCode, CSN).unwrap_err().kind(),
            ErrorKind::DeviceUnsupported
        );
    }

    #[test]
    fn test_dual_qr() {
        let intent = PrintIntent::DualQrCode {
            first: DualQr {
                data: "ab".into(),
                position: 0x0102,
                error_correction: QrErrorLevel::H,
                version: 0,
            },
            second: DualQr {
                data: "c".into(),
                position: 300,
                error_correction: QrErrorLevel::L,
                version: 3,
            },
            module_size: 3,
        };
        assert_eq!(
            encode(&intent, CSN).unwrap(),
            vec![
                0x1F, 0x51, 2, 3, //
                1, 2, 0, 2, 4, 0, b'a', b'b', //
                1, 44, 0, 1, 1, 3, b'c',
            ]
        );
        assert_eq!(encode(&intent, ESC_POS).unwrap_err().kind(), ErrorKind::DeviceUnsupported);
    }

    #[test]
    fn test_pdf417() {
        let intent = PrintIntent::TwoDimensional {
            symbol: TwoDimensionalSymbol::Pdf417 {
                data: "PDF".into(),
                columns: 0,
                rows: 0,
                module_width: 3,
                row_height: 3,
                error_correction: pdf417::Pdf417ErrorCorrection::Level(2),
                truncated: false,
            },
        };
        let bytes = encode(&intent, ESC_POS).unwrap();
        assert_eq!(&bytes[32..41], &[0x1D, 0x28, 0x6B, 4, 0, 48, 69, 48, 50]);
        assert!(bytes.ends_with(&[
            0x1D, 0x28, 0x6B, 6, 0, 48, 80, 48, b'P', b'D', b'F', //
            0x1D, 0x28, 0x6B, 3, 0, 48, 81, 48,
        ]));
        assert_eq!(encode(&intent, CSN).unwrap_err().kind(), ErrorKind::DeviceUnsupported);
    }

    #[test]
    fn test_maxicode() {
        let intent = PrintIntent::TwoDimensional {
            symbol: TwoDimensionalSymbol::MaxiCode {
                mode: 4,
                data: "M".into(),
            },
        };
        assert_eq!(
            encode(&intent, ESC_POS).unwrap(),
            vec![
                0x1D, 0x28, 0x6B, 3, 0, 50, 65, 4, //
                0x1D, 0x28, 0x6B, 4, 0, 50, 80, 48, b'M', //
                0x1D, 0x28, 0x6B, 3, 0, 50, 81, 48,
            ]
        );
    }

    #[test]
    fn test_raster_plain() {
        let bitmap = Bitmap::new(8, 2, [[0u8; 8], [255u8; 8]].concat()).unwrap();
        let intent = PrintIntent::RasterImage {
            bitmap,
            target_width: 8,
            binarization: Binarization::Threshold { level: 128 },
            compression: Compression::None,
        };
        assert_eq!(
            encode(&intent, ESC_POS).unwrap(),
            vec![0x1D, 0x76, 0x30, 0, 1, 0, 2, 0, 0xFF, 0x00]
        );
        // One command per line on CSN
        assert_eq!(
            encode(&intent, CSN).unwrap(),
            vec![
                0x1D, 0x76, 0x30, 0, 1, 0, 1, 0, 0xFF, //
                0x1D, 0x76, 0x30, 0, 1, 0, 1, 0, 0x00,
            ]
        );
    }

    #[test]
    fn test_raster_run_length() {
        let bitmap = Bitmap::new(16, 1, vec![0u8; 16]).unwrap();
        let intent = PrintIntent::RasterImage {
            bitmap,
            target_width: 16,
            binarization: Binarization::Dither,
            compression: Compression::RunLength,
        };
        assert_eq!(
            encode(&intent, CSN).unwrap(),
            vec![0x1D, 0x76, 0x31, 0, 2, 0, 1, 0, 2, 0, 0, 0, 255, 0xFF]
        );
        assert_eq!(encode(&intent, ESC_POS).unwrap_err().kind(), ErrorKind::DeviceUnsupported);
    }

    #[test]
    fn test_cut_modes() {
        let cut = |mode| PrintIntent::CutPaper { mode };
        assert_eq!(encode(&cut(CutMode::Full), ESC_POS).unwrap(), vec![0x1D, 0x56, 0]);
        assert_eq!(encode(&cut(CutMode::Partial), CSN).unwrap(), vec![0x1B, 0x6D]);
        assert_eq!(
            encode(&cut(CutMode::FeedAndFull { lines: 4 }), ESC_POS).unwrap(),
            vec![0x1D, 0x56, 66, 4]
        );
        assert_eq!(
            encode(&cut(CutMode::FeedAndFull { lines: 4 }), CSN).unwrap(),
            vec![0x1B, 0x64, 4, 0x1B, 0x69]
        );
    }

    #[test]
    fn test_drawer_and_misc() {
        let pulse = PrintIntent::cash_drawer_pulse(DrawerPin::Pin5, 100, 200).unwrap();
        assert_eq!(encode(&pulse, CSN).unwrap(), vec![0x1B, 0x70, 1, 50, 100]);
        assert_eq!(
            encode(&PrintIntent::LineSpacing { dots: None }, CSN).unwrap(),
            vec![0x1B, 0x32]
        );
        assert_eq!(
            encode(&PrintIntent::MotionUnit { horizontal: 180, vertical: 90 }, CSN).unwrap(),
            vec![0x1D, 0x50, 180, 90]
        );
        assert_eq!(
            encode(&PrintIntent::RawBytes { bytes: vec![1, 2, 3] }, CSN).unwrap(),
            vec![1, 2, 3]
        );
    }

    #[test]
    fn test_job_is_all_or_nothing() {
        let mut job = PrintJob::with_init();
        job.push(PrintIntent::text("ok"));
        job.push(PrintIntent::PrintStoredQrCode);
        assert!(job.encode(CSN).is_err());
    }
}
