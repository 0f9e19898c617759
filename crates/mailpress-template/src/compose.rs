//! Installing rendered templates into a message.
//!
//! Every operation renders completely before touching the message, so a
//! failed call leaves the body, alternatives, attachments and embeds exactly
//! as they were.

use crate::config::RenderConfig;
use crate::error::{FileTarget, Result};
use crate::factory::{file_from_renderable, to_producer};
use crate::source::Renderable;
use crate::template::{Escaped, Raw, Template, TemplateKind};
use mailpress_mime::{FileOption, Message, PartOption};
use serde::Serialize;
use tracing::debug;

/// Where rendered output goes.
enum Slot<'o> {
    Body(&'o [PartOption]),
    Alternative(&'o [PartOption]),
    File {
        target: FileTarget,
        name: &'o str,
        opts: &'o [FileOption],
    },
}

/// Renders templates into messages under a [`RenderConfig`].
#[derive(Debug, Clone, Copy, Default)]
pub struct Composer {
    config: RenderConfig,
}

impl Composer {
    /// Creates a composer with the given configuration.
    #[must_use]
    pub const fn new(config: RenderConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RenderConfig {
        &self.config
    }

    fn install<T, D>(
        &self,
        message: &mut Message,
        slot: Slot<'_>,
        template: &T,
        data: &D,
    ) -> Result<()>
    where
        T: Template + ?Sized,
        D: Serialize + ?Sized,
    {
        let source = Renderable::new(template, data);

        match slot {
            Slot::Body(opts) => {
                let rendered = source.render(&self.config)?;
                let producer = to_producer(rendered, <T::Kind as TemplateKind>::content_type());
                debug!(content_type = %producer.content_type(), "Setting body from template");
                let (content_type, writer) = producer.into_parts();
                message.set_body_writer(content_type, writer, opts);
            }
            Slot::Alternative(opts) => {
                let rendered = source.render(&self.config)?;
                let producer = to_producer(rendered, <T::Kind as TemplateKind>::content_type());
                debug!(
                    content_type = %producer.content_type(),
                    "Adding alternative body from template"
                );
                let (content_type, writer) = producer.into_parts();
                message.add_alternative_writer(content_type, writer, opts);
            }
            Slot::File { target, name, opts } => {
                let file = file_from_renderable(name, &source, &self.config)
                    .map_err(|e| e.for_target(target))?;
                debug!(
                    name,
                    ?target,
                    escaped = <T::Kind as TemplateKind>::ESCAPES_HTML,
                    "Adding file from template"
                );
                match target {
                    FileTarget::Attachment => message.attach_file_value(file, opts),
                    FileTarget::Embed => message.embed_file_value(file, opts),
                }
            }
        }

        Ok(())
    }

    /// Sets the message body to a rendered text template as `text/plain`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TemplateMissing`](crate::Error::TemplateMissing) for an
    /// empty template, or
    /// [`Error::TemplateExecutionFailed`](crate::Error::TemplateExecutionFailed)
    /// if evaluation fails. The body is unchanged on error.
    pub fn set_body_text_template<T, D>(
        &self,
        message: &mut Message,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized,
    {
        self.install(message, Slot::Body(opts), template, data)
    }

    /// Sets the message body to a rendered HTML template as `text/html`.
    ///
    /// # Errors
    ///
    /// As [`Composer::set_body_text_template`].
    pub fn set_body_html_template<T, D>(
        &self,
        message: &mut Message,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized,
    {
        self.install(message, Slot::Body(opts), template, data)
    }

    /// Appends a rendered text template as a `text/plain` alternative.
    ///
    /// # Errors
    ///
    /// As [`Composer::set_body_text_template`]; the alternatives are unchanged
    /// on error.
    pub fn add_alternative_text_template<T, D>(
        &self,
        message: &mut Message,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized,
    {
        self.install(message, Slot::Alternative(opts), template, data)
    }

    /// Appends a rendered HTML template as a `text/html` alternative.
    ///
    /// # Errors
    ///
    /// As [`Composer::add_alternative_text_template`].
    pub fn add_alternative_html_template<T, D>(
        &self,
        message: &mut Message,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized,
    {
        self.install(message, Slot::Alternative(opts), template, data)
    }

    /// Attaches a rendered text template as a file named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttachmentConstructionFailed`](crate::Error::AttachmentConstructionFailed)
    /// wrapping the underlying failure. The attachments are unchanged on error.
    pub fn attach_text_template<T, D>(
        &self,
        message: &mut Message,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized,
    {
        let slot = Slot::File {
            target: FileTarget::Attachment,
            name,
            opts,
        };
        self.install(message, slot, template, data)
    }

    /// Attaches a rendered HTML template as a file named `name`.
    ///
    /// # Errors
    ///
    /// As [`Composer::attach_text_template`].
    pub fn attach_html_template<T, D>(
        &self,
        message: &mut Message,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized,
    {
        let slot = Slot::File {
            target: FileTarget::Attachment,
            name,
            opts,
        };
        self.install(message, slot, template, data)
    }

    /// Embeds a rendered text template as an inline file named `name`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::AttachmentConstructionFailed`](crate::Error::AttachmentConstructionFailed)
    /// wrapping the underlying failure. The embeds are unchanged on error.
    pub fn embed_text_template<T, D>(
        &self,
        message: &mut Message,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized,
    {
        let slot = Slot::File {
            target: FileTarget::Embed,
            name,
            opts,
        };
        self.install(message, slot, template, data)
    }

    /// Embeds a rendered HTML template as an inline file named `name`.
    ///
    /// # Errors
    ///
    /// As [`Composer::embed_text_template`].
    pub fn embed_html_template<T, D>(
        &self,
        message: &mut Message,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized,
    {
        let slot = Slot::File {
            target: FileTarget::Embed,
            name,
            opts,
        };
        self.install(message, slot, template, data)
    }
}

/// Template operations on [`Message`] using the default [`RenderConfig`].
///
/// Use [`Composer`] directly to cap rendered output.
pub trait MessageTemplateExt {
    /// See [`Composer::set_body_text_template`].
    ///
    /// # Errors
    ///
    /// See [`Composer::set_body_text_template`].
    fn set_body_text_template<T, D>(
        &mut self,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized;

    /// See [`Composer::set_body_html_template`].
    ///
    /// # Errors
    ///
    /// See [`Composer::set_body_html_template`].
    fn set_body_html_template<T, D>(
        &mut self,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized;

    /// See [`Composer::add_alternative_text_template`].
    ///
    /// # Errors
    ///
    /// See [`Composer::add_alternative_text_template`].
    fn add_alternative_text_template<T, D>(
        &mut self,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized;

    /// See [`Composer::add_alternative_html_template`].
    ///
    /// # Errors
    ///
    /// See [`Composer::add_alternative_html_template`].
    fn add_alternative_html_template<T, D>(
        &mut self,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized;

    /// See [`Composer::attach_text_template`].
    ///
    /// # Errors
    ///
    /// See [`Composer::attach_text_template`].
    fn attach_text_template<T, D>(
        &mut self,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized;

    /// See [`Composer::attach_html_template`].
    ///
    /// # Errors
    ///
    /// See [`Composer::attach_html_template`].
    fn attach_html_template<T, D>(
        &mut self,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized;

    /// See [`Composer::embed_text_template`].
    ///
    /// # Errors
    ///
    /// See [`Composer::embed_text_template`].
    fn embed_text_template<T, D>(
        &mut self,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized;

    /// See [`Composer::embed_html_template`].
    ///
    /// # Errors
    ///
    /// See [`Composer::embed_html_template`].
    fn embed_html_template<T, D>(
        &mut self,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized;
}

impl MessageTemplateExt for Message {
    fn set_body_text_template<T, D>(
        &mut self,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized,
    {
        Composer::default().set_body_text_template(self, template, data, opts)
    }

    fn set_body_html_template<T, D>(
        &mut self,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized,
    {
        Composer::default().set_body_html_template(self, template, data, opts)
    }

    fn add_alternative_text_template<T, D>(
        &mut self,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized,
    {
        Composer::default().add_alternative_text_template(self, template, data, opts)
    }

    fn add_alternative_html_template<T, D>(
        &mut self,
        template: &T,
        data: &D,
        opts: &[PartOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized,
    {
        Composer::default().add_alternative_html_template(self, template, data, opts)
    }

    fn attach_text_template<T, D>(
        &mut self,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized,
    {
        Composer::default().attach_text_template(self, name, template, data, opts)
    }

    fn attach_html_template<T, D>(
        &mut self,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized,
    {
        Composer::default().attach_html_template(self, name, template, data, opts)
    }

    fn embed_text_template<T, D>(
        &mut self,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Raw> + ?Sized,
        D: Serialize + ?Sized,
    {
        Composer::default().embed_text_template(self, name, template, data, opts)
    }

    fn embed_html_template<T, D>(
        &mut self,
        name: &str,
        template: &T,
        data: &D,
        opts: &[FileOption],
    ) -> Result<()>
    where
        T: Template<Kind = Escaped> + ?Sized,
        D: Serialize + ?Sized,
    {
        Composer::default().embed_html_template(self, name, template, data, opts)
    }
}
