//! Editor configuration.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::content::OutputFormat;
use crate::error::{MintapError, Result};
use crate::files::FileValidationOptions;
use crate::image_view::ImageSizing;

/// Settings for one editor instance. Every field has a default, so a config
/// file only needs to mention what it changes.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub output: OutputFormat,
    pub placeholder: String,
    /// Minimum spacing between `on_update` deliveries. Zero forwards every
    /// change.
    pub throttle_delay_ms: u64,
    pub image: ImageOptions,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ImageOptions {
    #[serde(flatten)]
    pub validation: FileValidationOptions,
    #[serde(flatten)]
    pub sizing: ImageSizing,
}

impl EditorConfig {
    pub fn throttle_delay(&self) -> Duration {
        Duration::from_millis(self.throttle_delay_ms)
    }

    /// Load from a `.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        ensure_json(path)?;
        let raw = std::fs::read_to_string(path).map_err(|e| MintapError::Config {
            message: format!("failed to read {}: {e}", path.display()),
            help: Some("check that the file exists and is readable".into()),
        })?;
        let config = serde_json::from_str(&raw)?;
        tracing::debug!(target: "mintap::config", path = %path.display(), "config loaded");
        Ok(config)
    }

    /// Write to a `.json` file.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_json(path)?;
        std::fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}

fn ensure_json(path: &Path) -> Result<()> {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("json") => Ok(()),
        _ => Err(MintapError::UnsupportedFormat {
            path: PathBuf::from(path),
        }),
    }
}
