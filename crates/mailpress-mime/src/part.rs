//! Body parts: the primary body and its alternatives.

use crate::content_type::ContentType;
use crate::encoding::TransferEncoding;
use crate::writer::WriteFn;
use std::io::{self, Write};

/// Option customizing a body part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartOption {
    /// Overrides the transfer encoding.
    Encoding(TransferEncoding),
    /// Overrides the charset.
    Charset(String),
    /// Sets the Content-Description.
    Description(String),
}

/// A body part bound to a content type.
#[derive(Debug, Clone)]
pub struct Part {
    content_type: ContentType,
    charset: String,
    encoding: TransferEncoding,
    description: Option<String>,
    writer: WriteFn,
}

impl Part {
    /// Creates a part with the default charset (`utf-8`) and encoding
    /// (quoted-printable).
    #[must_use]
    pub fn new(content_type: ContentType, writer: WriteFn) -> Self {
        let charset = content_type.charset().unwrap_or("utf-8").to_string();
        Self {
            content_type,
            charset,
            encoding: TransferEncoding::default(),
            description: None,
            writer,
        }
    }

    /// Creates a part and applies the given options in order.
    #[must_use]
    pub fn with_options(content_type: ContentType, writer: WriteFn, opts: &[PartOption]) -> Self {
        let mut part = Self::new(content_type, writer);
        for opt in opts {
            part.apply(opt);
        }
        part
    }

    /// Applies a single option.
    pub fn apply(&mut self, opt: &PartOption) {
        match opt {
            PartOption::Encoding(encoding) => self.encoding = *encoding,
            PartOption::Charset(charset) => self.charset.clone_from(charset),
            PartOption::Description(description) => self.description = Some(description.clone()),
        }
    }

    /// Returns the declared content type.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Returns the charset.
    #[must_use]
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Returns the transfer encoding.
    #[must_use]
    pub const fn encoding(&self) -> TransferEncoding {
        self.encoding
    }

    /// Returns the Content-Description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the content writer.
    #[must_use]
    pub const fn writer(&self) -> &WriteFn {
        &self.writer
    }

    /// Writes the raw content to `sink`.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing.
    pub fn write_to(&self, sink: &mut dyn Write) -> io::Result<u64> {
        self.writer.write_to(sink)
    }

    /// Writes the content with the part's transfer encoding applied.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing.
    pub fn write_encoded_to(&self, sink: &mut dyn Write) -> io::Result<u64> {
        let encoded = self.encoding.encode(&self.writer.to_vec()?);
        sink.write_all(&encoded)?;
        Ok(encoded.len() as u64)
    }

    /// Returns the raw content.
    ///
    /// # Errors
    ///
    /// Returns any error raised by the content writer.
    pub fn content(&self) -> io::Result<Vec<u8>> {
        self.writer.to_vec()
    }
}
