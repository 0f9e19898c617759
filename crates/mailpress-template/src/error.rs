//! Error types for template composition.

use std::fmt;

/// Boxed error raised by a template engine.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result type alias for template operations.
pub type Result<T> = std::result::Result<T, Error>;

/// The file list a failed attach or embed was aimed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileTarget {
    /// The attachment list.
    Attachment,
    /// The embed list.
    Embed,
}

impl fmt::Display for FileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Attachment => write!(f, "failed to attach template"),
            Self::Embed => write!(f, "failed to embed template"),
        }
    }
}

/// Stable classification of [`Error`] values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// No template was supplied.
    TemplateMissing,
    /// The template engine failed while evaluating.
    TemplateExecutionFailed,
    /// An attachment or embed could not be built.
    AttachmentConstructionFailed,
    /// A template handle could not be parsed.
    InvalidTemplate,
    /// Rendered content could not be turned into a file.
    FileSource,
}

/// Template composition errors.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The template handle is empty; the engine was not invoked.
    #[error("template is missing")]
    TemplateMissing,

    /// The template engine failed; any partial output was discarded.
    #[error("failed to execute template: {0}")]
    TemplateExecutionFailed(#[source] BoxError),

    /// Building an attachment or embed from a template failed.
    #[error("{target}: {source}")]
    AttachmentConstructionFailed {
        /// Which list the file was meant for.
        target: FileTarget,
        /// The underlying failure.
        #[source]
        source: Box<Error>,
    },

    /// Template source could not be parsed.
    #[error("invalid template: {0}")]
    InvalidTemplate(#[from] tera::Error),

    /// Rendered content was rejected while building a file.
    ///
    /// Composer operations report it wrapped in
    /// [`Error::AttachmentConstructionFailed`]. Rendered output is read from
    /// memory, so the in-memory file source does not currently produce it.
    #[error("failed to build file from rendered template: {0}")]
    FileSource(#[from] mailpress_mime::Error),
}

impl Error {
    /// Returns the kind of this error.
    #[must_use]
    pub const fn kind(&self) -> ErrorKind {
        match self {
            Self::TemplateMissing => ErrorKind::TemplateMissing,
            Self::TemplateExecutionFailed(_) => ErrorKind::TemplateExecutionFailed,
            Self::AttachmentConstructionFailed { .. } => ErrorKind::AttachmentConstructionFailed,
            Self::InvalidTemplate(_) => ErrorKind::InvalidTemplate,
            Self::FileSource(_) => ErrorKind::FileSource,
        }
    }

    /// Returns the kind of the underlying failure, looking through
    /// attach/embed wrappers.
    #[must_use]
    pub fn root_kind(&self) -> ErrorKind {
        match self {
            Self::AttachmentConstructionFailed { source, .. } => source.root_kind(),
            other => other.kind(),
        }
    }

    /// Returns the attach/embed target if this is a file construction error.
    #[must_use]
    pub const fn target(&self) -> Option<FileTarget> {
        match self {
            Self::AttachmentConstructionFailed { target, .. } => Some(*target),
            _ => None,
        }
    }

    pub(crate) fn for_target(self, target: FileTarget) -> Self {
        Self::AttachmentConstructionFailed {
            target,
            source: Box::new(self),
        }
    }
}

/// Rendered output grew past the configured cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("rendered output exceeds the limit of {limit} bytes")]
pub struct OutputLimitExceeded {
    /// The configured limit in bytes.
    pub limit: usize,
}
