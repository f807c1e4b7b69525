//! Error types for mintap operations.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Errors that can occur outside the pure geometry and throttling paths.
///
/// Resize math and the throttle state machine are infallible; errors only
/// come from configuration, trace loading and process-wide initialization.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum MintapError {
    /// Configuration could not be loaded or saved.
    #[error("configuration error: {message}")]
    #[diagnostic(code(mintap::config))]
    Config {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// The configuration file has an extension we cannot read.
    #[error("unsupported configuration format: {}", path.display())]
    #[diagnostic(code(mintap::config::format), help("use a .json file"))]
    UnsupportedFormat { path: PathBuf },

    /// IO error.
    #[error(transparent)]
    #[diagnostic(code(mintap::io))]
    Io(#[from] std::io::Error),

    /// JSON (de)serialization error.
    #[error(transparent)]
    #[diagnostic(code(mintap::json))]
    Json(#[from] serde_json::Error),

    /// Process-wide platform info was injected after it had been detected.
    #[error("platform already initialized")]
    #[diagnostic(
        code(mintap::platform),
        help("call init_platform before anything reads platform()")
    )]
    PlatformInitialized,

    /// A replay trace was malformed.
    #[error("invalid trace: {0}")]
    #[diagnostic(code(mintap::trace))]
    Trace(String),
}

impl MintapError {
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }
}

pub type Result<T, E = MintapError> = std::result::Result<T, E>;
