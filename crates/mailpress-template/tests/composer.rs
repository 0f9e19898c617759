//! Integration tests for template composition.
//!
//! A spy template counts engine invocations and can be told to write partial
//! output before failing, so atomicity can be checked without a real engine.

#![allow(clippy::unwrap_used)]

use std::cell::Cell;
use std::io::Write;
use std::marker::PhantomData;

use mailpress_mime::{Disposition, Message};
use mailpress_template::{
    BoxError, ErrorKind, Escaped, FileTarget, HtmlTemplate, MessageTemplateExt, Raw, Template,
    TemplateKind, TextTemplate,
};
use serde::Serialize;
use serde_json::{Value, json};

/// How the spy behaves when executed.
#[derive(Clone, Copy)]
enum Behavior {
    /// Reports itself as an empty handle.
    Empty,
    /// Writes the output and succeeds.
    Succeed(&'static str),
    /// Writes the output, then fails.
    FailAfter(&'static str),
}

struct Spy<K> {
    behavior: Behavior,
    calls: Cell<usize>,
    _kind: PhantomData<K>,
}

impl<K> Spy<K> {
    const fn new(behavior: Behavior) -> Self {
        Self {
            behavior,
            calls: Cell::new(0),
            _kind: PhantomData,
        }
    }

    fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl<K: TemplateKind> Template for Spy<K> {
    type Kind = K;

    fn is_empty(&self) -> bool {
        matches!(self.behavior, Behavior::Empty)
    }

    fn execute(&self, _data: &Value, sink: &mut dyn Write) -> Result<(), BoxError> {
        self.calls.set(self.calls.get() + 1);
        match self.behavior {
            Behavior::Empty => Ok(()),
            Behavior::Succeed(output) => {
                sink.write_all(output.as_bytes())?;
                Ok(())
            }
            Behavior::FailAfter(output) => {
                sink.write_all(output.as_bytes())?;
                Err("engine exploded".into())
            }
        }
    }
}

#[derive(Serialize)]
struct Recipient {
    name: String,
}

/// Snapshot of everything the composer may touch.
fn snapshot(message: &Message) -> (Option<Vec<u8>>, Vec<Vec<u8>>, Vec<String>, Vec<String>) {
    (
        message.body().map(|part| part.content().unwrap()),
        message
            .alternatives()
            .iter()
            .map(|part| part.content().unwrap())
            .collect(),
        message
            .attachments()
            .iter()
            .map(|file| file.name().to_string())
            .collect(),
        message
            .embeds()
            .iter()
            .map(|file| file.name().to_string())
            .collect(),
    )
}

/// A message with something in every collection.
fn populated_message() -> Message {
    let mut message = Message::new();
    let text = TextTemplate::parse("body {{ n }}").unwrap();
    let data = json!({ "n": 1 });
    message.set_body_text_template(&text, &data, &[]).unwrap();
    message.add_alternative_text_template(&text, &data, &[]).unwrap();
    message
        .attach_text_template("a.txt", &text, &data, &[])
        .unwrap();
    message.embed_text_template("e.txt", &text, &data, &[]).unwrap();
    message
}

#[test]
fn test_set_body_text_hello_world() {
    let template = TextTemplate::parse("Hello {{ name }}").unwrap();
    let mut message = Message::new();

    message
        .set_body_text_template(
            &template,
            &Recipient {
                name: "World".into(),
            },
            &[],
        )
        .unwrap();

    let body = message.body().unwrap();
    assert_eq!(body.content_type().essence(), "text/plain");
    assert_eq!(body.content().unwrap(), b"Hello World");
}

#[test]
fn test_set_body_last_write_wins() {
    let first = TextTemplate::parse("first {{ v }}").unwrap();
    let second = HtmlTemplate::parse("<b>second {{ v }}</b>").unwrap();
    let data = json!({ "v": "value" });
    let mut message = Message::new();

    message.set_body_text_template(&first, &data, &[]).unwrap();
    message.set_body_html_template(&second, &data, &[]).unwrap();

    let body = message.body().unwrap();
    assert_eq!(body.content_type().essence(), "text/html");
    assert_eq!(body.content().unwrap(), b"<b>second value</b>");
    assert!(message.alternatives().is_empty());
}

#[test]
fn test_alternatives_append_in_order() {
    let text = TextTemplate::parse("plain {{ v }}").unwrap();
    let html = HtmlTemplate::parse("<i>{{ v }}</i>").unwrap();
    let data = json!({ "v": 2 });
    let mut message = Message::new();

    message.add_alternative_text_template(&text, &data, &[]).unwrap();
    message.add_alternative_html_template(&html, &data, &[]).unwrap();

    let alternatives = message.alternatives();
    assert_eq!(alternatives.len(), 2);
    assert_eq!(alternatives[0].content_type().essence(), "text/plain");
    assert_eq!(alternatives[0].content().unwrap(), b"plain 2");
    assert_eq!(alternatives[1].content_type().essence(), "text/html");
    assert_eq!(alternatives[1].content().unwrap(), b"<i>2</i>");
}

#[test]
fn test_attachments_and_embeds_append() {
    let text = TextTemplate::parse("{{ v }}").unwrap();
    let html = HtmlTemplate::parse("<p>{{ v }}</p>").unwrap();
    let data = json!({ "v": "x" });
    let mut message = Message::new();

    message.attach_text_template("one.txt", &text, &data, &[]).unwrap();
    message.attach_html_template("two.html", &html, &data, &[]).unwrap();
    message.embed_html_template("three.html", &html, &data, &[]).unwrap();
    message.embed_text_template("four.txt", &text, &data, &[]).unwrap();

    let names: Vec<_> = message.attachments().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["one.txt", "two.html"]);
    let names: Vec<_> = message.embeds().iter().map(|f| f.name()).collect();
    assert_eq!(names, ["three.html", "four.txt"]);

    assert!(
        message
            .attachments()
            .iter()
            .all(|f| f.disposition() == Disposition::Attachment)
    );
    assert!(
        message
            .embeds()
            .iter()
            .all(|f| f.disposition() == Disposition::Inline)
    );
    assert_eq!(message.attachments()[1].content().unwrap(), b"<p>x</p>");
}

#[test]
fn test_missing_template_never_invokes_engine() {
    let raw = Spy::<Raw>::new(Behavior::Empty);
    let escaped = Spy::<Escaped>::new(Behavior::Empty);
    let data = json!({});
    let mut message = Message::new();

    let results = [
        message.set_body_text_template(&raw, &data, &[]),
        message.set_body_html_template(&escaped, &data, &[]),
        message.add_alternative_text_template(&raw, &data, &[]),
        message.add_alternative_html_template(&escaped, &data, &[]),
        message.attach_text_template("a.txt", &raw, &data, &[]),
        message.attach_html_template("a.html", &escaped, &data, &[]),
        message.embed_text_template("e.txt", &raw, &data, &[]),
        message.embed_html_template("e.html", &escaped, &data, &[]),
    ];

    for result in results {
        let err = result.unwrap_err();
        assert_eq!(err.root_kind(), ErrorKind::TemplateMissing);
    }
    assert_eq!(raw.calls(), 0);
    assert_eq!(escaped.calls(), 0);
    assert_eq!(snapshot(&message), snapshot(&Message::new()));
}

#[test]
fn test_default_tera_handles_are_missing() {
    let mut message = Message::new();
    let err = message
        .set_body_text_template(&TextTemplate::default(), &json!({}), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TemplateMissing);

    let err = message
        .embed_html_template("x.html", &HtmlTemplate::default(), &json!({}), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::AttachmentConstructionFailed);
    assert_eq!(err.root_kind(), ErrorKind::TemplateMissing);
}

#[test]
fn test_failed_render_leaves_message_untouched() {
    let raw = Spy::<Raw>::new(Behavior::FailAfter("partial output"));
    let escaped = Spy::<Escaped>::new(Behavior::FailAfter("<p>partial"));
    let data = json!({});
    let mut message = populated_message();
    let before = snapshot(&message);

    assert!(message.set_body_text_template(&raw, &data, &[]).is_err());
    assert!(message.set_body_html_template(&escaped, &data, &[]).is_err());
    assert!(message.add_alternative_text_template(&raw, &data, &[]).is_err());
    assert!(message.add_alternative_html_template(&escaped, &data, &[]).is_err());
    assert!(message.attach_text_template("b.txt", &raw, &data, &[]).is_err());
    assert!(message.attach_html_template("b.html", &escaped, &data, &[]).is_err());
    assert!(message.embed_text_template("f.txt", &raw, &data, &[]).is_err());
    assert!(message.embed_html_template("f.html", &escaped, &data, &[]).is_err());

    assert_eq!(raw.calls(), 4);
    assert_eq!(escaped.calls(), 4);
    assert_eq!(snapshot(&message), before);
}

#[test]
fn test_body_execution_failure_kind() {
    let spy = Spy::<Raw>::new(Behavior::FailAfter("half"));
    let mut message = Message::new();

    let err = message
        .set_body_text_template(&spy, &json!({}), &[])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::TemplateExecutionFailed);
    assert!(err.to_string().contains("engine exploded"));
    assert!(message.body().is_none());
}

#[test]
fn test_attach_html_undefined_field() {
    let template = HtmlTemplate::parse("<p>{{ customer.address }}</p>").unwrap();
    let mut message = populated_message();
    let attachments_before = message.attachments().len();

    let err = message
        .attach_html_template("invoice.html", &template, &json!({ "customer": {} }), &[])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::AttachmentConstructionFailed);
    assert_eq!(err.root_kind(), ErrorKind::TemplateExecutionFailed);
    assert_eq!(err.target(), Some(FileTarget::Attachment));
    assert!(err.to_string().starts_with("failed to attach template"));
    assert_eq!(message.attachments().len(), attachments_before);
}

#[test]
fn test_retry_after_failure() {
    let failing = Spy::<Raw>::new(Behavior::FailAfter("junk"));
    let working = Spy::<Raw>::new(Behavior::Succeed("clean"));
    let mut message = Message::new();

    assert!(message.add_alternative_text_template(&failing, &json!({}), &[]).is_err());
    message
        .add_alternative_text_template(&working, &json!({}), &[])
        .unwrap();

    assert_eq!(message.alternatives().len(), 1);
    assert_eq!(message.alternatives()[0].content().unwrap(), b"clean");
}

#[test]
fn test_producer_replays_identical_bytes() {
    let template = HtmlTemplate::parse("<h1>{{ title }}</h1>").unwrap();
    let mut message = Message::new();
    message
        .set_body_html_template(&template, &json!({ "title": "Release notes" }), &[])
        .unwrap();

    let body = message.body().unwrap();
    let mut first = Vec::new();
    let mut second = Vec::new();
    body.write_to(&mut first).unwrap();
    body.write_to(&mut second).unwrap();

    assert_eq!(first, b"<h1>Release notes</h1>");
    assert_eq!(first, second);

    // Cloned messages share the same immutable content
    let copy = message.clone();
    assert_eq!(copy.body().unwrap().content().unwrap(), first);
}

#[test]
fn test_html_operations_escape_and_text_operations_do_not() {
    let data = json!({ "payload": "<script>alert(1)</script>" });
    let text = TextTemplate::parse("{{ payload }}").unwrap();
    let html = HtmlTemplate::parse("{{ payload }}").unwrap();
    let mut message = Message::new();

    message.set_body_html_template(&html, &data, &[]).unwrap();
    message.add_alternative_html_template(&html, &data, &[]).unwrap();
    message.add_alternative_text_template(&text, &data, &[]).unwrap();
    message.attach_html_template("a.html", &html, &data, &[]).unwrap();
    message.attach_text_template("a.txt", &text, &data, &[]).unwrap();
    message.embed_html_template("e.html", &html, &data, &[]).unwrap();
    message.embed_text_template("e.txt", &text, &data, &[]).unwrap();

    let escaped = [
        message.body().unwrap().content().unwrap(),
        message.alternatives()[0].content().unwrap(),
        message.attachments()[0].content().unwrap(),
        message.embeds()[0].content().unwrap(),
    ];
    for content in escaped {
        let content = String::from_utf8(content).unwrap();
        assert!(content.contains("&lt;script&gt;"));
        assert!(!content.contains("<script>"));
    }

    let raw = [
        message.alternatives()[1].content().unwrap(),
        message.attachments()[1].content().unwrap(),
        message.embeds()[1].content().unwrap(),
    ];
    for content in raw {
        assert_eq!(content, b"<script>alert(1)</script>");
    }
}

#[test]
fn test_unserializable_data_is_execution_failure() {
    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("cannot serialize"))
        }
    }

    let spy = Spy::<Escaped>::new(Behavior::Succeed("never"));
    let mut message = Message::new();
    let err = message
        .set_body_html_template(&spy, &Unserializable, &[])
        .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::TemplateExecutionFailed);
    assert_eq!(spy.calls(), 0);
    assert!(message.body().is_none());
}

#[test]
fn test_scalar_and_sequence_data_render() {
    let text = TextTemplate::parse("Hello static").unwrap();
    let mut message = Message::new();

    message.set_body_text_template(&text, "World", &[]).unwrap();
    message
        .add_alternative_text_template(&text, &vec![1, 2, 3], &[])
        .unwrap();
    message.attach_text_template("n.txt", &text, &42, &[]).unwrap();
    assert_eq!(message.body().unwrap().content().unwrap(), b"Hello static");
    assert_eq!(message.alternatives()[0].content().unwrap(), b"Hello static");
    assert_eq!(message.attachments()[0].content().unwrap(), b"Hello static");

    let greeting = TextTemplate::parse("Hello {{ data }}").unwrap();
    message
        .set_body_text_template(&greeting, "World", &[])
        .unwrap();
    assert_eq!(message.body().unwrap().content().unwrap(), b"Hello World");
}
