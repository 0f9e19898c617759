//! Tera-backed template handles.

use crate::error::{BoxError, Result};
use crate::template::{Escaped, Raw, Template, TemplateKind};
use serde_json::Value;
use std::fmt;
use std::io::Write;
use std::marker::PhantomData;
use tera::{Context, Tera};

/// Name the source is registered under; the suffix drives Tera's autoescaping.
const HTML_TEMPLATE_NAME: &str = "template.html";
const TEXT_TEMPLATE_NAME: &str = "template.txt";

/// Context key that holds data which is not a JSON object.
pub const DATA_KEY: &str = "data";

/// A parsed Tera template of kind `K`.
///
/// Undefined variables fail evaluation. Object data exposes its fields as
/// top-level variables; any other non-null value (string, number, array,
/// bool) is available as [`DATA_KEY`], e.g. `{{ data }}`.
pub struct TeraTemplate<K> {
    tera: Option<Tera>,
    _kind: PhantomData<K>,
}

/// Unescaped template for `text/plain` content.
pub type TextTemplate = TeraTemplate<Raw>;

/// HTML-escaping template for `text/html` content.
pub type HtmlTemplate = TeraTemplate<Escaped>;

impl<K: TemplateKind> TeraTemplate<K> {
    const NAME: &'static str = if K::ESCAPES_HTML {
        HTML_TEMPLATE_NAME
    } else {
        TEXT_TEMPLATE_NAME
    };

    /// Parses template source.
    ///
    /// An empty source yields an empty handle.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidTemplate`](crate::Error::InvalidTemplate) if the
    /// source does not parse.
    pub fn parse(source: &str) -> Result<Self> {
        if source.is_empty() {
            return Ok(Self::default());
        }

        let mut tera = Tera::default();
        tera.autoescape_on(if K::ESCAPES_HTML {
            vec![".html"]
        } else {
            vec![]
        });
        tera.add_raw_template(Self::NAME, source)?;

        Ok(Self {
            tera: Some(tera),
            _kind: PhantomData,
        })
    }
}

impl<K> Default for TeraTemplate<K> {
    fn default() -> Self {
        Self {
            tera: None,
            _kind: PhantomData,
        }
    }
}

impl<K> Clone for TeraTemplate<K> {
    fn clone(&self) -> Self {
        Self {
            tera: self.tera.clone(),
            _kind: PhantomData,
        }
    }
}

impl<K: TemplateKind> fmt::Debug for TeraTemplate<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TeraTemplate")
            .field("escapes_html", &K::ESCAPES_HTML)
            .field("empty", &self.tera.is_none())
            .finish()
    }
}

impl<K: TemplateKind> Template for TeraTemplate<K> {
    type Kind = K;

    fn is_empty(&self) -> bool {
        self.tera.is_none()
    }

    fn execute(&self, data: &Value, sink: &mut dyn Write) -> std::result::Result<(), BoxError> {
        let Some(tera) = &self.tera else {
            return Err("template has no source".into());
        };

        let context = match data {
            Value::Null => Context::new(),
            Value::Object(_) => Context::from_value(data.clone())?,
            other => {
                let mut context = Context::new();
                context.insert(DATA_KEY, other);
                context
            }
        };
        tera.render_to(Self::NAME, &context, sink)?;
        Ok(())
    }
}
