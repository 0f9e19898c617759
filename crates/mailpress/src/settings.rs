//! Persistent settings.

use anyhow::{Context, Result};
use mailpress_template::RenderConfig;
use std::path::{Path, PathBuf};

/// Settings read from `settings.json`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Render limits.
    pub render: RenderConfig,
}

/// Default settings location: `<config dir>/mailpress/settings.json`.
pub fn default_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mailpress")
        .join("settings.json")
}

/// Loads settings from `path`, or from the default location.
///
/// A missing default file yields default settings; a missing explicit file is
/// an error.
pub fn load(path: Option<&Path>) -> Result<Settings> {
    let (path, explicit) = match path {
        Some(path) => (path.to_path_buf(), true),
        None => (default_path(), false),
    };

    if !explicit && !path.exists() {
        tracing::debug!(path = %path.display(), "No settings file, using defaults");
        return Ok(Settings::default());
    }

    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read settings from {}", path.display()))?;
    parse(&contents).with_context(|| format!("invalid settings in {}", path.display()))
}

fn parse(contents: &str) -> Result<Settings> {
    Ok(serde_json::from_str(contents)?)
}
