//! # Text Charsets
//!
//! Receipt printers sold in East Asia take text in a legacy multi-byte
//! encoding rather than UTF-8. Each dialect names the charset it expects;
//! this module converts Rust strings into those bytes with `encoding_rs`.
//!
//! Encoding is strict: a character the charset cannot represent is an error,
//! never a `?` or an HTML numeric escape.
//!
//! | Charset | Typical printers |
//! |---------|------------------|
//! | GBK | Mainland China ESC/POS |
//! | Big5 | Taiwan / Hong Kong |
//! | Shift_JIS | Japan |
//! | EUC-KR | Korea |
//! | UTF-8 | Newer firmware |

use encoding_rs::Encoding;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{PrintLinkError, Result};

/// Text encoding understood by a printer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Charset {
    Gbk,
    Big5,
    ShiftJis,
    EucKr,
    Utf8,
}

impl Charset {
    /// The `encoding_rs` encoder for this charset.
    pub fn encoding(self) -> &'static Encoding {
        match self {
            Charset::Gbk => encoding_rs::GBK,
            Charset::Big5 => encoding_rs::BIG5,
            Charset::ShiftJis => encoding_rs::SHIFT_JIS,
            Charset::EucKr => encoding_rs::EUC_KR,
            Charset::Utf8 => encoding_rs::UTF_8,
        }
    }

    pub fn name(self) -> &'static str {
        self.encoding().name()
    }
}

/// Encode `text` in `charset`.
///
/// ```
/// use printlink::protocol::charset::{encode, Charset};
///
/// assert_eq!(encode("AB", Charset::Gbk).unwrap(), b"AB".to_vec());
/// assert_eq!(encode("中", Charset::Gbk).unwrap(), vec![0xD6, 0xD0]);
/// assert!(encode("\u{1F600}", Charset::Big5).is_err());
/// ```
#[instrument(level = "trace", skip(text), fields(len = text.len()))]
pub fn encode(text: &str, charset: Charset) -> Result<Vec<u8>> {
    if charset == Charset::Utf8 {
        return Ok(text.as_bytes().to_vec());
    }

    let (bytes, _, had_errors) = charset.encoding().encode(text);
    if had_errors {
        let bad = first_unmappable(text, charset).unwrap_or('\u{FFFD}');
        return Err(PrintLinkError::Encoding(format!(
            "character {:?} (U+{:04X}) cannot be encoded in {}",
            bad,
            bad as u32,
            charset.name()
        )));
    }
    Ok(bytes.into_owned())
}

/// Find the first character `charset` has no mapping for.
fn first_unmappable(text: &str, charset: Charset) -> Option<char> {
    let mut buf = [0u8; 4];
    text.chars().find(|c| {
        let (_, _, had_errors) = charset.encoding().encode(c.encode_utf8(&mut buf));
        had_errors
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_ascii_passes_through_every_charset() {
        for charset in [
            Charset::Gbk,
            Charset::Big5,
            Charset::ShiftJis,
            Charset::EucKr,
            Charset::Utf8,
        ] {
            assert_eq!(encode("Total: 12.50", charset).unwrap(), b"Total: 12.50".to_vec());
        }
    }

    #[test]
    fn test_big5_traditional() {
        // 台 in Big5
        assert_eq!(encode("台", Charset::Big5).unwrap(), vec![0xA5, 0x78]);
    }

    #[test]
    fn test_shift_jis_kana() {
        // あ in Shift_JIS
        assert_eq!(encode("あ", Charset::ShiftJis).unwrap(), vec![0x82, 0xA0]);
    }

    #[test]
    fn test_utf8_is_identity() {
        assert_eq!(encode("é", Charset::Utf8).unwrap(), "é".as_bytes().to_vec());
    }

    #[test]
    fn test_unmappable_reports_character() {
        let err = encode("ok \u{1F600}", Charset::Gbk).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Encoding);
        assert!(err.to_string().contains("1F600"));
    }

    #[test]
    fn test_hangul_in_euc_kr() {
        assert_eq!(encode("한", Charset::EucKr).unwrap(), vec![0xC7, 0xD1]);
        assert!(encode("\u{1F600}", Charset::EucKr).is_err());
    }
}
