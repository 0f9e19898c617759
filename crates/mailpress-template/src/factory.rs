//! Turning rendered output into body producers and files.

use crate::config::RenderConfig;
use crate::error::Result;
use crate::source::{Renderable, Rendered};
use crate::template::Template;
use bytes::Buf;
use mailpress_mime::{ContentType, File, WriteFn, file_from_reader};
use serde::Serialize;

/// A content writer bound to the content type it was declared with.
#[derive(Debug, Clone)]
pub struct Producer {
    content_type: ContentType,
    writer: WriteFn,
}

impl Producer {
    /// Returns the declared content type.
    #[must_use]
    pub const fn content_type(&self) -> &ContentType {
        &self.content_type
    }

    /// Returns the content writer.
    #[must_use]
    pub const fn writer(&self) -> &WriteFn {
        &self.writer
    }

    /// Splits into content type and writer.
    #[must_use]
    pub fn into_parts(self) -> (ContentType, WriteFn) {
        (self.content_type, self.writer)
    }
}

/// Wraps rendered output as a producer of `content_type` content.
///
/// The content type is taken as declared; it is not checked against the
/// content.
#[must_use]
pub fn to_producer(rendered: Rendered, content_type: ContentType) -> Producer {
    Producer {
        content_type,
        writer: WriteFn::from_bytes(rendered.into_bytes()),
    }
}

/// Renders `source` and builds a file named `name` from the output.
///
/// # Errors
///
/// Render failures are returned unchanged; a rejected byte source is
/// reported as [`Error::FileSource`](crate::Error::FileSource).
pub fn file_from_renderable<T, D>(
    name: impl Into<String>,
    source: &Renderable<'_, T, D>,
    config: &RenderConfig,
) -> Result<File>
where
    T: Template + ?Sized,
    D: Serialize + ?Sized,
{
    let rendered = source.render(config)?;
    Ok(file_from_reader(name, rendered.into_bytes().reader())?)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::engine::{HtmlTemplate, TextTemplate};
    use crate::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_producer_writes_rendered_bytes_every_time() {
        let template = TextTemplate::parse("Total: {{ total }}").unwrap();
        let rendered = Renderable::new(&template, &json!({ "total": 42 }))
            .render(&RenderConfig::default())
            .unwrap();
        let producer = to_producer(rendered, ContentType::text_plain());

        let mut first = Vec::new();
        let mut second = Vec::new();
        producer.writer().write_to(&mut first).unwrap();
        producer.writer().write_to(&mut second).unwrap();
        assert_eq!(first, b"Total: 42");
        assert_eq!(first, second);
        assert_eq!(producer.content_type(), &ContentType::text_plain());
    }

    #[test]
    fn test_file_from_renderable() {
        let template = HtmlTemplate::parse("<h1>{{ title }}</h1>").unwrap();
        let data = json!({ "title": "Report" });
        let file = file_from_renderable(
            "report.html",
            &Renderable::new(&template, &data),
            &RenderConfig::default(),
        )
        .unwrap();

        assert_eq!(file.name(), "report.html");
        assert_eq!(file.content_type().essence(), "text/html");
        assert_eq!(file.content().unwrap(), b"<h1>Report</h1>");
    }

    #[test]
    fn test_file_from_renderable_propagates_render_kind() {
        let template = TextTemplate::default();
        let err = file_from_renderable(
            "empty.txt",
            &Renderable::new(&template, &json!({})),
            &RenderConfig::default(),
        )
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::TemplateMissing);
    }
}
