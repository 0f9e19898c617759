//! The templating-engine capability.
//!
//! A [`Template`] evaluates itself against a data value and writes the output
//! to a sink. Its [`TemplateKind`] states whether output is HTML-escaped
//! ([`Escaped`]) or left as is ([`Raw`]); composer operations select the
//! kind they accept, so an unescaped template cannot end up in an HTML body.

use crate::error::BoxError;
use mailpress_mime::ContentType;
use serde_json::Value;
use std::io::Write;

mod sealed {
    pub trait Sealed {}
}

/// Output policy of a template.
pub trait TemplateKind: sealed::Sealed {
    /// Whether output is escaped for HTML.
    const ESCAPES_HTML: bool;

    /// Content type of bodies rendered with this kind.
    fn content_type() -> ContentType;
}

/// Plain output, used for `text/plain` content.
#[derive(Debug, Clone, Copy)]
pub enum Raw {}

/// HTML-escaped output, used for `text/html` content.
#[derive(Debug, Clone, Copy)]
pub enum Escaped {}

impl sealed::Sealed for Raw {}
impl sealed::Sealed for Escaped {}

impl TemplateKind for Raw {
    const ESCAPES_HTML: bool = false;

    fn content_type() -> ContentType {
        ContentType::text_plain()
    }
}

impl TemplateKind for Escaped {
    const ESCAPES_HTML: bool = true;

    fn content_type() -> ContentType {
        ContentType::text_html()
    }
}

/// A template handle.
///
/// Implementors with `Kind = Escaped` must escape interpolated data for HTML.
pub trait Template {
    /// Output policy.
    type Kind: TemplateKind;

    /// Returns true if the handle holds no template.
    fn is_empty(&self) -> bool;

    /// Evaluates the template against `data`, writing output to `sink`.
    ///
    /// # Errors
    ///
    /// Returns the engine's failure; `sink` may hold partial output.
    fn execute(&self, data: &Value, sink: &mut dyn Write) -> Result<(), BoxError>;
}
