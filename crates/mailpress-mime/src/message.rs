//! The message document and its part collections.

use crate::content_type::ContentType;
use crate::error::Result;
use crate::file::{Disposition, File, FileOption, file_from_bytes, file_from_reader};
use crate::header::Headers;
use crate::part::{Part, PartOption};
use crate::writer::WriteFn;
use bytes::Bytes;
use std::io::Read;
use tracing::trace;

/// An email message under composition.
///
/// Owns a single primary body, an ordered list of alternative bodies, and
/// ordered attachment and embed lists. Setting the body replaces it;
/// everything else is appended.
#[derive(Debug, Clone, Default)]
pub struct Message {
    headers: Headers,
    body: Option<Part>,
    alternatives: Vec<Part>,
    attachments: Vec<File>,
    embeds: Vec<File>,
}

impl Message {
    /// Creates an empty message.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the message headers.
    #[must_use]
    pub const fn headers(&self) -> &Headers {
        &self.headers
    }

    /// Sets a header, replacing previous values.
    pub fn set_header(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.headers.set(name, value);
    }

    /// Sets the Subject header.
    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.headers.set("subject", subject);
    }

    /// Gets the Subject header.
    #[must_use]
    pub fn subject(&self) -> Option<&str> {
        self.headers.get("subject")
    }

    /// Returns the primary body, if set.
    #[must_use]
    pub const fn body(&self) -> Option<&Part> {
        self.body.as_ref()
    }

    /// Returns the alternative bodies in insertion order.
    #[must_use]
    pub fn alternatives(&self) -> &[Part] {
        &self.alternatives
    }

    /// Returns the attachments in insertion order.
    #[must_use]
    pub fn attachments(&self) -> &[File] {
        &self.attachments
    }

    /// Returns the embeds in insertion order.
    #[must_use]
    pub fn embeds(&self) -> &[File] {
        &self.embeds
    }

    /// Replaces the primary body with content produced by `writer`.
    pub fn set_body_writer(
        &mut self,
        content_type: ContentType,
        writer: WriteFn,
        opts: &[PartOption],
    ) {
        trace!(content_type = %content_type, "Setting message body");
        self.body = Some(Part::with_options(content_type, writer, opts));
    }

    /// Replaces the primary body with static content.
    pub fn set_body_string(
        &mut self,
        content_type: ContentType,
        content: impl Into<String>,
        opts: &[PartOption],
    ) {
        let content = Bytes::from(content.into());
        self.set_body_writer(content_type, WriteFn::from_bytes(content), opts);
    }

    /// Appends an alternative body produced by `writer`.
    pub fn add_alternative_writer(
        &mut self,
        content_type: ContentType,
        writer: WriteFn,
        opts: &[PartOption],
    ) {
        trace!(content_type = %content_type, "Adding alternative body");
        self.alternatives
            .push(Part::with_options(content_type, writer, opts));
    }

    /// Appends an alternative body with static content.
    pub fn add_alternative_string(
        &mut self,
        content_type: ContentType,
        content: impl Into<String>,
        opts: &[PartOption],
    ) {
        let content = Bytes::from(content.into());
        self.add_alternative_writer(content_type, WriteFn::from_bytes(content), opts);
    }

    /// Applies `opts` to `file` and appends it to the attachments.
    pub fn attach_file_value(&mut self, mut file: File, opts: &[FileOption]) {
        for opt in opts {
            file.apply(opt);
        }
        file.set_disposition(Disposition::Attachment);
        trace!(name = file.name(), "Attaching file");
        self.attachments.push(file);
    }

    /// Applies `opts` to `file` and appends it to the embeds.
    ///
    /// Embeds are inline and default their Content-ID to the file name.
    pub fn embed_file_value(&mut self, mut file: File, opts: &[FileOption]) {
        for opt in opts {
            file.apply(opt);
        }
        file.set_disposition(Disposition::Inline);
        if file.content_id().is_none() {
            let id = file.name().to_string();
            file.apply(&FileOption::ContentId(id));
        }
        trace!(name = file.name(), "Embedding file");
        self.embeds.push(file);
    }

    /// Attaches in-memory content.
    pub fn attach_bytes(
        &mut self,
        name: impl Into<String>,
        content: impl Into<Bytes>,
        opts: &[FileOption],
    ) {
        self.attach_file_value(file_from_bytes(name, content), opts);
    }

    /// Embeds in-memory content.
    pub fn embed_bytes(
        &mut self,
        name: impl Into<String>,
        content: impl Into<Bytes>,
        opts: &[FileOption],
    ) {
        self.embed_file_value(file_from_bytes(name, content), opts);
    }

    /// Attaches content read from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails; the attachments are left untouched.
    pub fn attach_reader(
        &mut self,
        name: impl Into<String>,
        source: impl Read,
        opts: &[FileOption],
    ) -> Result<()> {
        let file = file_from_reader(name, source)?;
        self.attach_file_value(file, opts);
        Ok(())
    }

    /// Embeds content read from `source`.
    ///
    /// # Errors
    ///
    /// Returns an error if reading fails; the embeds are left untouched.
    pub fn embed_reader(
        &mut self,
        name: impl Into<String>,
        source: impl Read,
        opts: &[FileOption],
    ) -> Result<()> {
        let file = file_from_reader(name, source)?;
        self.embed_file_value(file, opts);
        Ok(())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::redundant_clone,
    clippy::manual_string_new,
    clippy::needless_collect,
    clippy::unreadable_literal,
    clippy::used_underscore_items,
    clippy::similar_names
)]
mod tests {
    use super::*;
    use crate::encoding::TransferEncoding;
    use std::io;

    #[test]
    fn test_new_message_is_empty() {
        let message = Message::new();
        assert!(message.body().is_none());
        assert!(message.alternatives().is_empty());
        assert!(message.attachments().is_empty());
        assert!(message.embeds().is_empty());
        assert!(message.subject().is_none());
    }

    #[test]
    fn test_set_body_last_write_wins() {
        let mut message = Message::new();
        message.set_body_string(ContentType::text_plain(), "first", &[]);
        message.set_body_string(ContentType::text_html(), "<b>second</b>", &[]);

        let body = message.body().unwrap();
        assert!(body.content_type().is_html());
        assert_eq!(body.content().unwrap(), b"<b>second</b>");
        assert!(message.alternatives().is_empty());
    }

    #[test]
    fn test_alternatives_keep_order() {
        let mut message = Message::new();
        message.add_alternative_string(ContentType::text_plain(), "one", &[]);
        message.add_alternative_string(
            ContentType::text_html(),
            "two",
            &[PartOption::Encoding(TransferEncoding::Base64)],
        );

        let alternatives = message.alternatives();
        assert_eq!(alternatives.len(), 2);
        assert_eq!(alternatives[0].content().unwrap(), b"one");
        assert_eq!(alternatives[1].content().unwrap(), b"two");
        assert_eq!(alternatives[1].encoding(), TransferEncoding::Base64);
    }

    #[test]
    fn test_attach_and_embed() {
        let mut message = Message::new();
        message.attach_bytes("invoice.pdf", vec![0x25u8, 0x50], &[]);
        message.embed_bytes(
            "logo.png",
            vec![0x89u8, 0x50],
            &[FileOption::Description("company logo".into())],
        );

        let attachment = &message.attachments()[0];
        assert_eq!(attachment.disposition(), Disposition::Attachment);
        assert!(attachment.content_id().is_none());

        let embed = &message.embeds()[0];
        assert_eq!(embed.disposition(), Disposition::Inline);
        assert_eq!(embed.content_id(), Some("logo.png"));
        assert_eq!(embed.description(), Some("company logo"));
    }

    #[test]
    fn test_embed_keeps_explicit_content_id() {
        let mut message = Message::new();
        message.embed_bytes(
            "logo.png",
            vec![1u8],
            &[FileOption::ContentId("logo@mailpress".into())],
        );
        assert_eq!(message.embeds()[0].content_id(), Some("logo@mailpress"));
    }

    #[test]
    fn test_attach_reader_failure_leaves_list_untouched() {
        struct Failing;
        impl Read for Failing {
            fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::other("disk error"))
            }
        }

        let mut message = Message::new();
        message.attach_bytes("a.txt", "a", &[]);
        assert!(message.attach_reader("b.txt", Failing, &[]).is_err());
        assert!(message.embed_reader("c.txt", Failing, &[]).is_err());
        assert_eq!(message.attachments().len(), 1);
        assert!(message.embeds().is_empty());
    }

    #[test]
    fn test_subject_header() {
        let mut message = Message::new();
        message.set_subject("Quarterly report");
        message.set_header("X-Mailer", "mailpress");
        assert_eq!(message.subject(), Some("Quarterly report"));
        assert_eq!(message.headers().get("x-mailer"), Some("mailpress"));
    }
}
