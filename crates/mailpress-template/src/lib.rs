//! # mailpress-template
//!
//! Renders templates into the body, alternative bodies, attachments and
//! embeds of a [`mailpress_mime::Message`].
//!
//! ## Features
//!
//! - **Escaping by type**: text operations take [`Raw`] templates, HTML
//!   operations take [`Escaped`] ones; mixing them up does not compile
//! - **All or nothing**: templates are rendered into memory before the
//!   message is touched, so a failed call never leaves partial parts behind
//! - **Repeatable output**: installed parts replay the rendered bytes on
//!   every serialization
//! - **Output cap**: [`RenderConfig::max_output_bytes`] bounds rendered size
//!
//! ## Quick Start
//!
//! ```
//! use mailpress_mime::Message;
//! use mailpress_template::{HtmlTemplate, MessageTemplateExt, TextTemplate};
//! use serde_json::json;
//!
//! # fn main() -> mailpress_template::Result<()> {
//! let text = TextTemplate::parse("Hello {{ name }}")?;
//! let html = HtmlTemplate::parse("<p>Hello {{ name }}</p>")?;
//! let data = json!({ "name": "World" });
//!
//! let mut message = Message::new();
//! message.set_body_text_template(&text, &data, &[])?;
//! message.add_alternative_html_template(&html, &data, &[])?;
//! message.attach_text_template("greeting.txt", &text, &data, &[])?;
//!
//! let body = message.body().expect("body was set");
//! assert_eq!(body.content().unwrap(), b"Hello World");
//! assert_eq!(message.alternatives()[0].content().unwrap(), b"<p>Hello World</p>");
//! # Ok(())
//! # }
//! ```
//!
//! ### Capping output
//!
//! ```
//! use mailpress_mime::Message;
//! use mailpress_template::{Composer, ErrorKind, RenderConfig, TextTemplate};
//! use serde_json::json;
//!
//! let composer = Composer::new(RenderConfig::new().with_max_output_bytes(8));
//! let template = TextTemplate::parse("{{ body }}").unwrap();
//! let mut message = Message::new();
//!
//! let err = composer
//!     .set_body_text_template(&mut message, &template, &json!({ "body": "far too long" }), &[])
//!     .unwrap_err();
//! assert_eq!(err.kind(), ErrorKind::TemplateExecutionFailed);
//! assert!(message.body().is_none());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod compose;
mod config;
mod engine;
mod error;
mod factory;
mod source;
mod template;

pub use compose::{Composer, MessageTemplateExt};
pub use config::RenderConfig;
pub use engine::{DATA_KEY, HtmlTemplate, TeraTemplate, TextTemplate};
pub use error::{BoxError, Error, ErrorKind, FileTarget, OutputLimitExceeded, Result};
pub use factory::{Producer, file_from_renderable, to_producer};
pub use source::{Renderable, Rendered};
pub use template::{Escaped, Raw, Template, TemplateKind};
