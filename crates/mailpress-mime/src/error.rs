//! Errors raised while building or decoding message content.

use thiserror::Error;

/// Shorthand for results in this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures from the document model.
#[derive(Debug, Error)]
pub enum Error {
    /// A content type string had no `type/subtype`.
    #[error("malformed content type {0:?}")]
    InvalidContentType(String),

    /// A transfer-encoding token was not recognized.
    #[error("unknown transfer encoding {0:?}")]
    InvalidEncoding(String),

    /// Base64 input did not decode.
    #[error("base64 decoding failed")]
    Base64Decode(#[from] base64::DecodeError),

    /// A byte source could not be read.
    #[error("content source unreadable")]
    Io(#[from] std::io::Error),
}
