//! Platform detection for platform-specific shortcut rendering.
//!
//! Detection runs once per process and is cached. Hosts that know better
//! (a browser reading `navigator.platform`, or tests) can inject the value
//! with [`init_platform`] before anything reads it.

use std::sync::OnceLock;

use crate::error::{MintapError, Result};

/// Cached platform detection results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Platform {
    pub mac: bool,
}

impl Platform {
    /// Classify a platform string (`std::env::consts::OS`, or a browser's
    /// `navigator.platform`).
    pub fn detect_from(platform: &str) -> Self {
        let platform = platform.to_lowercase();
        Self {
            mac: platform.contains("mac") || platform == "ios",
        }
    }
}

static PLATFORM: OnceLock<Platform> = OnceLock::new();

/// Get cached platform info. Detection runs once on first call.
pub fn platform() -> &'static Platform {
    PLATFORM.get_or_init(detect_platform)
}

/// Install platform info ahead of detection.
///
/// Fails if [`platform`] has already been read or a value was injected.
pub fn init_platform(platform: Platform) -> Result<()> {
    PLATFORM
        .set(platform)
        .map_err(|_| MintapError::PlatformInitialized)
}

fn detect_platform() -> Platform {
    let detected = Platform::detect_from(std::env::consts::OS);
    tracing::debug!(target: "mintap::platform", mac = detected.mac, "platform detected");
    detected
}
