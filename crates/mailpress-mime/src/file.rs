//! File parts: attachments and inline embeds.

use crate::content_type::ContentType;
use crate::encoding::TransferEncoding;
use crate::error::Result;
use crate::header::Headers;
use crate::writer::WriteFn;
use bytes::Bytes;
use std::fmt;
use std::io::{self, Read, Write};

/// How a file is presented by the receiving client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Disposition {
    /// Offered as a separate download.
    #[default]
    Attachment,
    /// Shown inline, typically referenced from HTML by Content-ID.
    Inline,
}

impl fmt::Display for Disposition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attachment => write!(f, "attachment"),
            Self::Inline => write!(f, "inline"),
        }
    }
}

/// Option customizing a file part.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOption {
    /// Overrides the file name.
    Name(String),
    /// Overrides the guessed content type.
    ContentType(ContentType),
    /// Sets the Content-Description.
    Description(String),
    /// Overrides the transfer encoding.
    Encoding(TransferEncoding),
    /// Sets the Content-ID.
    ContentId(String),
    /// Adds a custom header.
    Header(String, String),
}

/// A named, content-bearing file destined for the attachment or embed list.
#[derive(Debug, Clone)]
pub struct File {
    name: String,
    content_type: ContentType,
    disposition: Disposition,
    content_id: Option<String>,
    description: Option<String>,
    encoding: TransferEncoding,
    headers: Headers,
    writer: WriteFn,
}

impl File {
    /// Creates a file with a content type guessed from `name` and base64
    /// transfer encoding.
    #[must_use]
    pub fn new(name: impl Into<String>, writer: WriteFn) -> Self {
        let name = name.into();
        Self {
            content_type: ContentType::from_file_name(&name),
            name,
            disposition: Disposition::Attachment,
            content_id: None,
            description: None,
            encoding: TransferEncoding::Base64,
            headers: Headers::new(),
            writer,
        }
    }

    /// Applies a single option.
    pub fn apply(&mut self, opt: &FileOption) {
        match opt {
            FileOption::Name(name) => self.name.clone_from(name),
            FileOption::ContentType(content_type) => self.content_type = content_type.clone(),
            FileOption::Description(description) => self.description = Some(description.clone()),
            FileOption::Encoding(encoding) => self.encoding = *encoding,
            FileOption::ContentId(id) => self.content_id = Some(id.clone()),
            FileOption::Header(name, value) => self.headers.add(name.as_str(), value.as_str()),
        }
    }

    /// Sets the disposition.
    pub fn set_disposition(&mut self, disposition: Disposition) {
        self.disposition = disposition;
    }

    /// Returns the file name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the content type.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Returns the disposition.
    #[must_use]
    pub const fn disposition(&self) -> Disposition {
        self.disposition
    }

    /// Returns the Content-ID, if any.
    #[must_use]
    pub fn content_id(&self) -> Option<&str> {
        self.content_id.as_deref()
    }

    /// Returns the Content-Description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Returns the transfer encoding.
    #[must_use]
    pub const fn encoding(&self) -> TransferEncoding {
        self.encoding
    }

    /// Returns custom headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Writes the raw content to `sink`.
    ///
    /// # Errors
    ///
    /// Returns any error raised while writing.
    pub fn write_to(&self, sink: &mut dyn Write) -> io::Result<u64> {
        self.writer.write_to(sink)
    }

    /// Writes the content with the file's transfer encoding applied.
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

/// Builds a file from in-memory content.
#[must_use]
pub fn file_from_bytes(name: impl Into<String>, content: impl Into<Bytes>) -> File {
    File::new(name, WriteFn::from_bytes(content))
}

/// Builds a file by reading `source` to the end.
///
/// The content is buffered so the file can be written repeatedly.
///
/// # Errors
///
/// Returns [`Error::Io`](crate::Error::Io) if reading fails.
pub fn file_from_reader(name: impl Into<String>, mut source: impl Read) -> Result<File> {
    let mut buffer = Vec::new();
    source.read_to_end(&mut buffer)?;
    Ok(file_from_bytes(name, buffer))
}
