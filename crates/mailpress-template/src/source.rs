//! Renderable sources and the render operation.

use crate::config::RenderConfig;
use crate::error::{Error, OutputLimitExceeded, Result};
use crate::template::Template;
use bytes::Bytes;
use serde::Serialize;
use std::io::{self, Write};
use tracing::trace;

/// A template paired with the data it is evaluated against.
#[derive(Debug)]
pub struct Renderable<'a, T: ?Sized, D: ?Sized> {
    template: &'a T,
    data: &'a D,
}

impl<'a, T, D> Renderable<'a, T, D>
where
    T: Template + ?Sized,
    D: Serialize + ?Sized,
{
    /// Pairs `template` with `data`.
    #[must_use]
    pub const fn new(template: &'a T, data: &'a D) -> Self {
        Self { template, data }
    }

    /// Renders into a fresh in-memory buffer.
    ///
    /// An empty template fails with [`Error::TemplateMissing`] before the
    /// engine is invoked. Any other failure, including `config`'s output cap
    /// being exceeded, is reported as [`Error::TemplateExecutionFailed`] and
    /// the partial output is dropped.
    ///
    /// # Errors
    ///
    /// See above.
    pub fn render(&self, config: &RenderConfig) -> Result<Rendered> {
        if self.template.is_empty() {
            return Err(Error::TemplateMissing);
        }

        let data = serde_json::to_value(self.data)
            .map_err(|e| Error::TemplateExecutionFailed(Box::new(e)))?;

        let mut buffer = RenderBuffer::new(config.max_output_bytes);
        let outcome = self.template.execute(&data, &mut buffer);

        // The engine may have swallowed the sink error, so check the buffer too
        if let Some(exceeded) = buffer.exceeded {
            return Err(Error::TemplateExecutionFailed(Box::new(exceeded)));
        }
        outcome.map_err(Error::TemplateExecutionFailed)?;

        trace!(bytes = buffer.data.len(), "Rendered template");
        Ok(Rendered {
            content: Bytes::from(buffer.data),
        })
    }
}

/// Output of one successful render. Immutable.
#[derive(Debug, PartialEq, Eq)]
pub struct Rendered {
    content: Bytes,
}

impl Rendered {
    /// Returns the rendered bytes.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.content
    }

    /// Returns the rendered length in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.content.len()
    }

    /// Returns true if the template produced no output.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    /// Consumes the buffer.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.content
    }
}

/// Sink that enforces an optional size cap.
struct RenderBuffer {
    data: Vec<u8>,
    limit: Option<usize>,
    exceeded: Option<OutputLimitExceeded>,
}

impl RenderBuffer {
    const fn new(limit: Option<usize>) -> Self {
        Self {
            data: Vec::new(),
            limit,
            exceeded: None,
        }
    }
}

impl Write for RenderBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if let Some(limit) = self.limit {
            if self.data.len() + buf.len() > limit {
                let exceeded = OutputLimitExceeded { limit };
                self.exceeded = Some(exceeded);
                return Err(io::Error::other(exceeded));
            }
        }
        self.data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
