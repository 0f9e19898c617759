//! Render configuration.

use serde::{Deserialize, Serialize};

/// Settings applied to every render.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Upper bound on rendered output in bytes. `None` means unbounded.
    pub max_output_bytes: Option<usize>,
}

impl RenderConfig {
    /// Creates an unbounded configuration.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_output_bytes: None,
        }
    }

    /// Caps rendered output at `limit` bytes.
    #[must_use]
    pub const fn with_max_output_bytes(mut self, limit: usize) -> Self {
        self.max_output_bytes = Some(limit);
        self
    }
}
