//! Compose manifests: which templates go where, and the data they render.

use anyhow::{Context, Result};
use mailpress_mime::{Message, PartOption, TransferEncoding};
use mailpress_template::{Composer, HtmlTemplate, TextTemplate};
use serde::Deserialize;
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Template kind of a manifest entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// Rendered unescaped as `text/plain`.
    Text,
    /// Rendered with HTML escaping as `text/html`.
    Html,
}

/// Template source, inline or read from a file next to the manifest.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum Source {
    /// Inline template text.
    Inline(String),
    /// Path relative to the manifest.
    File {
        /// Template file.
        file: PathBuf,
    },
}

/// A body or alternative body.
#[derive(Debug, Clone, Deserialize)]
pub struct BodyEntry {
    /// Template kind.
    pub kind: Kind,
    /// Template source.
    pub template: Source,
    /// Transfer encoding, e.g. `base64`.
    #[serde(default)]
    pub encoding: Option<String>,
}

/// An attachment or embed.
#[derive(Debug, Clone, Deserialize)]
pub struct FileEntry {
    /// File name.
    pub name: String,
    /// Template kind.
    pub kind: Kind,
    /// Template source.
    pub template: Source,
}

/// A message described as templates plus data.
#[derive(Debug, Clone, Deserialize)]
pub struct Manifest {
    /// Subject line.
    #[serde(default)]
    pub subject: Option<String>,
    /// Data every template renders against.
    #[serde(default)]
    pub data: Value,
    /// Primary body.
    #[serde(default)]
    pub body: Option<BodyEntry>,
    /// Alternative bodies, in order.
    #[serde(default)]
    pub alternatives: Vec<BodyEntry>,
    /// Attachments, in order.
    #[serde(default)]
    pub attachments: Vec<FileEntry>,
    /// Embeds, in order.
    #[serde(default)]
    pub embeds: Vec<FileEntry>,
}

impl Manifest {
    /// Reads a manifest from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read manifest {}", path.display()))?;
        Self::parse(&contents).with_context(|| format!("invalid manifest {}", path.display()))
    }

    /// Parses a manifest from JSON text.
    pub fn parse(contents: &str) -> Result<Self> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Renders every entry into a new message.
    ///
    /// File sources are resolved relative to `base_dir`.
    pub fn compose(&self, composer: &Composer, base_dir: &Path) -> Result<Message> {
        let mut message = Message::new();
        if let Some(subject) = &self.subject {
            message.set_subject(subject.as_str());
        }

        if let Some(body) = &self.body {
            let opts = body.part_options().context("invalid body")?;
            let source = body.template.read(base_dir)?;
            match body.kind {
                Kind::Text => TextTemplate::parse(&source).and_then(|template| {
                    composer.set_body_text_template(&mut message, &template, &self.data, &opts)
                }),
                Kind::Html => HtmlTemplate::parse(&source).and_then(|template| {
                    composer.set_body_html_template(&mut message, &template, &self.data, &opts)
                }),
            }
            .context("failed to render body")?;
        }

        for (index, alternative) in self.alternatives.iter().enumerate() {
            let opts = alternative
                .part_options()
                .with_context(|| format!("invalid alternative #{index}"))?;
            let source = alternative.template.read(base_dir)?;
            let data = &self.data;
            match alternative.kind {
                Kind::Text => TextTemplate::parse(&source).and_then(|template| {
                    composer.add_alternative_text_template(&mut message, &template, data, &opts)
                }),
                Kind::Html => HtmlTemplate::parse(&source).and_then(|template| {
                    composer.add_alternative_html_template(&mut message, &template, data, &opts)
                }),
            }
            .with_context(|| format!("failed to render alternative #{index}"))?;
        }

        for entry in &self.attachments {
            let source = entry.template.read(base_dir)?;
            let name = entry.name.as_str();
            match entry.kind {
                Kind::Text => TextTemplate::parse(&source).and_then(|template| {
                    composer.attach_text_template(&mut message, name, &template, &self.data, &[])
                }),
                Kind::Html => HtmlTemplate::parse(&source).and_then(|template| {
                    composer.attach_html_template(&mut message, name, &template, &self.data, &[])
                }),
            }
            .with_context(|| format!("failed to render attachment {name:?}"))?;
        }

        for entry in &self.embeds {
            let source = entry.template.read(base_dir)?;
            let name = entry.name.as_str();
            match entry.kind {
                Kind::Text => TextTemplate::parse(&source).and_then(|template| {
                    composer.embed_text_template(&mut message, name, &template, &self.data, &[])
                }),
                Kind::Html => HtmlTemplate::parse(&source).and_then(|template| {
                    composer.embed_html_template(&mut message, name, &template, &self.data, &[])
                }),
            }
            .with_context(|| format!("failed to render embed {name:?}"))?;
        }

        Ok(message)
    }
}

impl BodyEntry {
    fn part_options(&self) -> Result<Vec<PartOption>> {
        match self.encoding.as_deref() {
            Some(token) => Ok(vec![PartOption::Encoding(token.parse::<TransferEncoding>()?)]),
            None => Ok(Vec::new()),
        }
    }
}

impl Source {
    fn read(&self, base_dir: &Path) -> Result<String> {
        match self {
            Self::Inline(source) => Ok(source.clone()),
            Self::File { file } => {
                let path = base_dir.join(file);
                std::fs::read_to_string(&path)
                    .with_context(|| format!("failed to read template {}", path.display()))
            }
        }
    }
}
