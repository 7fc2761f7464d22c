//! Decoding operator lines into search/replacement bytes.

use strum::{Display, EnumString};

use crate::error::{Error, Result};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum InputFormat {
    /// The line's bytes, verbatim
    #[default]
    Text,
    /// Hex byte pairs, e.g. `74 05` or `7405`
    Hex,
}

impl InputFormat {
    pub fn decode(self, line: &[u8]) -> Result<Vec<u8>> {
        let line = strip_line_ending(line);
        match self {
            InputFormat::Text => Ok(line.to_vec()),
            InputFormat::Hex => {
                let text = std::str::from_utf8(line)
                    .map_err(|e| Error::InvalidHex(format!("input is not ASCII: {}", e)))?;
                parse_hex_bytes(text)
            }
        }
    }
}

/// Remove a single trailing `\n` or `\r\n`.
pub fn strip_line_ending(line: &[u8]) -> &[u8] {
    line.strip_suffix(b"\n")
        .map(|l| l.strip_suffix(b"\r").unwrap_or(l))
        .unwrap_or(line)
}

/// Parse whitespace-separated byte tokens, or one contiguous run of hex digits.
pub fn parse_hex_bytes(input: &str) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    for token in input.split_whitespace() {
        let digits = token
            .strip_prefix("0x")
            .or_else(|| token.strip_prefix("0X"))
            .unwrap_or(token);

        if digits.is_empty() || digits.len() % 2 != 0 {
            return Err(Error::InvalidHex(format!(
                "'{}' is not a whole number of bytes",
                token
            )));
        }
        // from_str_radix alone would take a sign, e.g. "+1"
        if !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(Error::InvalidHex(format!("'{}' is not hex", token)));
        }

        for i in (0..digits.len()).step_by(2) {
            let pair = &digits[i..i + 2];
            let byte = u8::from_str_radix(pair, 16)
                .map_err(|e| Error::InvalidHex(format!("'{}': {}", pair, e)))?;
            bytes.push(byte);
        }
    }

    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_text_keeps_whitespace() {
        let bytes = InputFormat::Text.decode(b"  spaced out \r\n").unwrap();
        assert_eq!(bytes, b"  spaced out ");
    }

    #[test]
    fn test_text_empty_line() {
        assert!(InputFormat::Text.decode(b"\n").unwrap().is_empty());
    }

    #[test]
    fn test_hex_tokens() {
        let bytes = InputFormat::Hex.decode(b"48 65 6C 6c 6F\n").unwrap();
        assert_eq!(bytes, b"Hello");
    }

    #[test]
    fn test_hex_contiguous_and_prefixed() {
        assert_eq!(parse_hex_bytes("7405").unwrap(), vec![0x74, 0x05]);
        assert_eq!(parse_hex_bytes("0x74 0XEB").unwrap(), vec![0x74, 0xEB]);
    }

    #[test]
    fn test_hex_rejects_odd_and_invalid() {
        assert!(matches!(parse_hex_bytes("745"), Err(Error::InvalidHex(_))));
        assert!(matches!(parse_hex_bytes("ZZ"), Err(Error::InvalidHex(_))));
        assert!(matches!(parse_hex_bytes("0x"), Err(Error::InvalidHex(_))));
        assert!(matches!(parse_hex_bytes("é1"), Err(Error::InvalidHex(_))));
        assert!(matches!(parse_hex_bytes("+1"), Err(Error::InvalidHex(_))));
    }

    #[test]
    fn test_strip_line_ending() {
        assert_eq!(strip_line_ending(b"abc\r\n"), b"abc");
        assert_eq!(strip_line_ending(b"abc\n"), b"abc");
        assert_eq!(strip_line_ending(b"abc"), b"abc");
        assert_eq!(strip_line_ending(b"abc\r"), b"abc\r");
    }

    #[test]
    fn test_text_keeps_non_utf8_bytes() {
        let bytes = InputFormat::Text.decode(b"\xE9t\xE9\r\n").unwrap();
        assert_eq!(bytes, [0xE9, b't', 0xE9]);
    }

    #[test]
    fn test_hex_rejects_non_utf8_line() {
        assert!(matches!(
            InputFormat::Hex.decode(b"74 \xE9\n"),
            Err(Error::InvalidHex(_))
        ));
    }

    #[test]
    fn test_hex_mixed_case_pairs() {
        assert_eq!(parse_hex_bytes("fFa0 0b").unwrap(), vec![0xFF, 0xA0, 0x0B]);
    }

    #[test]
    fn test_format_from_str() {
        assert_eq!(InputFormat::from_str("hex").unwrap(), InputFormat::Hex);
        assert_eq!(InputFormat::Text.to_string(), "text");
    }
}
