//! Content types for parts and files.

use crate::error::{Error, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Characters that force a parameter value to be quoted (RFC 2045 `tspecials`).
const TSPECIALS: &str = "()<>@,;:\\\"/[]?=";

/// A `type/subtype` pair with parameters.
///
/// Type and subtype are stored lowercase. Parameters are kept sorted by name,
/// so the rendered form is stable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentType {
    essence: String,
    split: usize,
    params: BTreeMap<String, String>,
}

impl ContentType {
    /// Builds `main/sub` with no parameters.
    #[must_use]
    pub fn new(main: &str, sub: &str) -> Self {
        let essence = format!("{}/{}", main.to_ascii_lowercase(), sub.to_ascii_lowercase());
        Self {
            split: main.len(),
            essence,
            params: BTreeMap::new(),
        }
    }

    /// `text/plain; charset=utf-8`
    #[must_use]
    pub fn text_plain() -> Self {
        Self::new("text", "plain").with_parameter("charset", "utf-8")
    }

    /// `text/html; charset=utf-8`
    #[must_use]
    pub fn text_html() -> Self {
        Self::new("text", "html").with_parameter("charset", "utf-8")
    }

    /// `application/octet-stream`
    #[must_use]
    pub fn octet_stream() -> Self {
        Self::new("application", "octet-stream")
    }

    /// Guesses a content type from a file name's extension.
    ///
    /// Unknown extensions give `application/octet-stream`.
    #[must_use]
    pub fn from_file_name(name: &str) -> Self {
        match mime_guess::from_path(name).first() {
            Some(mime) => Self::new(mime.type_().as_str(), mime.subtype().as_str()),
            None => Self::octet_stream(),
        }
    }

    /// Returns a copy with `name` set to `value`.
    #[must_use]
    pub fn with_parameter(mut self, name: &str, value: impl Into<String>) -> Self {
        self.params.insert(name.to_ascii_lowercase(), value.into());
        self
    }

    /// Looks up a parameter by name.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&str> {
        self.params
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    /// The `charset` parameter.
    #[must_use]
    pub fn charset(&self) -> Option<&str> {
        self.parameter("charset")
    }

    /// `type/subtype`, without parameters.
    #[must_use]
    pub fn essence(&self) -> &str {
        &self.essence
    }

    /// The part before the slash.
    #[must_use]
    pub fn main_type(&self) -> &str {
        &self.essence[..self.split]
    }

    /// The part after the slash.
    #[must_use]
    pub fn sub_type(&self) -> &str {
        &self.essence[self.split + 1..]
    }

    /// True for any `text/*` type.
    #[must_use]
    pub fn is_text(&self) -> bool {
        self.main_type() == "text"
    }

    /// True for `text/html`.
    #[must_use]
    pub fn is_html(&self) -> bool {
        self.essence == "text/html"
    }

    /// Parses `type/subtype; name=value; ...`.
    ///
    /// Parameter values may be quoted. Segments without `=` are skipped.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidContentType`] if the type or subtype is missing.
    pub fn parse(input: &str) -> Result<Self> {
        let mut segments = input.split(';');
        let head = segments.next().unwrap_or_default().trim();

        let Some((main, sub)) = head.split_once('/') else {
            return Err(Error::InvalidContentType(input.to_string()));
        };
        let (main, sub) = (main.trim(), sub.trim());
        if main.is_empty() || sub.is_empty() {
            return Err(Error::InvalidContentType(input.to_string()));
        }

        Ok(segments
            .filter_map(|segment| segment.split_once('='))
            .fold(Self::new(main, sub), |ct, (name, value)| {
                ct.with_parameter(name.trim(), value.trim().trim_matches('"'))
            }))
    }
}

impl FromStr for ContentType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.essence)?;
        for (name, value) in &self.params {
            let needs_quotes = value.is_empty()
                || value
                    .chars()
                    .any(|c| c.is_ascii_whitespace() || TSPECIALS.contains(c));
            if needs_quotes {
                write!(f, "; {name}=\"{value}\"")?;
            } else {
                write!(f, "; {name}={value}")?;
            }
        }
        Ok(())
    }
}
