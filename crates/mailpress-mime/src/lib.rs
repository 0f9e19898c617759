//! # mailpress-mime
//!
//! Document model for composing email messages.
//!
//! ## Features
//!
//! - **Body parts**: a primary body plus ordered alternative bodies
//! - **Files**: attachments and inline embeds with Content-ID support
//! - **Deferred content**: parts hold a repeatable [`WriteFn`] that is only
//!   invoked when the message is serialized
//! - **Encoding**: Base64, Quoted-Printable, RFC 2047 header encoding
//!
//! ## Quick Start
//!
//! ```
//! use mailpress_mime::{ContentType, Message};
//!
//! let mut message = Message::new();
//! message.set_subject("Welcome");
//! message.set_body_string(ContentType::text_plain(), "Hello, World!", &[]);
//! message.add_alternative_string(ContentType::text_html(), "<p>Hello, World!</p>", &[]);
//! message.attach_bytes("terms.txt", "Be nice.", &[]);
//!
//! assert_eq!(message.alternatives().len(), 1);
//! assert_eq!(message.attachments()[0].name(), "terms.txt");
//! ```
//!
//! ### Encoding
//!
//! ```
//! use mailpress_mime::encoding::{encode_base64, encode_quoted_printable};
//!
//! assert_eq!(encode_base64(b"Hello, World!"), "SGVsbG8sIFdvcmxkIQ==");
//! assert_eq!(encode_quoted_printable("Héllo".as_bytes()), "H=C3=A9llo");
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod content_type;
mod error;
mod file;
mod header;
mod message;
mod part;
mod writer;

pub mod encoding;

pub use content_type::ContentType;
pub use encoding::TransferEncoding;
pub use error::{Error, Result};
pub use file::{Disposition, File, FileOption, file_from_bytes, file_from_reader};
pub use header::Headers;
pub use message::Message;
pub use part::{Part, PartOption};
pub use writer::WriteFn;
