//! Content-Transfer-Encoding and header word encoding.

use crate::error::{Error, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::fmt::Write as _;
use std::str::FromStr;

/// Longest encoded line RFC 2045 allows, excluding CRLF.
const MAX_LINE_LENGTH: usize = 76;

/// How part content is encoded on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TransferEncoding {
    /// `7bit`: content sent as is.
    SevenBit,
    /// `8bit`: content sent as is.
    EightBit,
    /// `base64`, wrapped at 76 columns.
    Base64,
    /// `quoted-printable`. Used for bodies unless overridden.
    #[default]
    QuotedPrintable,
    /// `binary`: content sent as is.
    Binary,
}

impl TransferEncoding {
    const ALL: [Self; 5] = [
        Self::SevenBit,
        Self::EightBit,
        Self::Base64,
        Self::QuotedPrintable,
        Self::Binary,
    ];

    /// The header token for this encoding.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SevenBit => "7bit",
            Self::EightBit => "8bit",
            Self::Base64 => "base64",
            Self::QuotedPrintable => "quoted-printable",
            Self::Binary => "binary",
        }
    }

    /// Reads a header token, ignoring case. Unknown tokens mean `7bit`.
    ///
    /// Use `str::parse` to reject unknown tokens instead.
    #[must_use]
    pub fn parse(token: &str) -> Self {
        token.parse().unwrap_or(Self::SevenBit)
    }

    /// True if content passes through untouched.
    #[must_use]
    pub const fn is_identity(self) -> bool {
        matches!(self, Self::SevenBit | Self::EightBit | Self::Binary)
    }

    /// Encodes `data` for the wire.
    #[must_use]
    pub fn encode(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Base64 => encode_base64_wrapped(data).into_bytes(),
            Self::QuotedPrintable => encode_quoted_printable(data).into_bytes(),
            Self::SevenBit | Self::EightBit | Self::Binary => data.to_vec(),
        }
    }
}

/// Strict form of [`TransferEncoding::parse`].
impl FromStr for TransferEncoding {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self> {
        let trimmed = token.trim();
        Self::ALL
            .into_iter()
            .find(|encoding| encoding.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| Error::InvalidEncoding(token.to_string()))
    }
}

impl fmt::Display for TransferEncoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standard-alphabet base64, unwrapped.
#[must_use]
pub fn encode_base64(data: &[u8]) -> String {
    STANDARD.encode(data)
}

/// Base64 broken into CRLF-terminated lines of at most 76 characters.
#[must_use]
pub fn encode_base64_wrapped(data: &[u8]) -> String {
    let encoded = encode_base64(data);
    let lines = encoded.len().div_ceil(MAX_LINE_LENGTH);
    let mut wrapped = String::with_capacity(encoded.len() + 2 * lines);
    let mut rest = encoded.as_str();
    while !rest.is_empty() {
        let (line, tail) = rest.split_at(rest.len().min(MAX_LINE_LENGTH));
        wrapped.push_str(line);
        wrapped.push_str("\r\n");
        rest = tail;
    }
    wrapped
}

/// Decodes base64, skipping any whitespace such as line breaks.
///
/// # Errors
///
/// [`Error::Base64Decode`](crate::Error::Base64Decode) on malformed input.
pub fn decode_base64(data: &str) -> Result<Vec<u8>> {
    let compact: Vec<u8> = data.bytes().filter(|b| !b.is_ascii_whitespace()).collect();
    Ok(STANDARD.decode(compact)?)
}

/// Encodes content using Quoted-Printable encoding (RFC 2045).
///
/// Line breaks in the input (`\n` or `\r\n`) are emitted as hard CRLF breaks;
/// longer lines get soft breaks.
#[must_use]
pub fn encode_quoted_printable(data: &[u8]) -> String {
    let mut result = String::new();
    let mut line_length = 0;
    let mut bytes = data.iter().copied().peekable();

    while let Some(byte) = bytes.next() {
        if byte == b'\r' && bytes.peek() == Some(&b'\n') {
            continue;
        }
        if byte == b'\n' {
            result.push_str("\r\n");
            line_length = 0;
            continue;
        }

        if line_length >= MAX_LINE_LENGTH - 3 {
            result.push_str("=\r\n");
            line_length = 0;
        }

        let at_line_end = matches!(bytes.peek(), None | Some(b'\r' | b'\n'));
        match byte {
            b'!'..=b'<' | b'>'..=b'~' => {
                result.push(char::from(byte));
                line_length += 1;
            }
            // Whitespace before a line break must be encoded
            b' ' | b'\t' if !at_line_end => {
                result.push(char::from(byte));
                line_length += 1;
            }
            _ => {
                let _ = write!(result, "={byte:02X}");
                line_length += 3;
            }
        }
    }

    result
}

/// Encodes a header value using RFC 2047 encoding.
///
/// Format: `=?charset?B?encoded-text?=`. Plain ASCII values are returned
/// unchanged.
#[must_use]
pub fn encode_rfc2047(text: &str, charset: &str) -> String {
    if text.chars().all(|c| c.is_ascii() && c != '=' && c != '?') {
        return text.to_string();
    }

    let encoded = encode_base64(text.as_bytes());
    format!("=?{charset}?B?{encoded}?=")
}
