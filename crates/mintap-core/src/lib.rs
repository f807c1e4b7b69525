//! mintap-core: editor-kit logic without UI framework dependencies.
//!
//! This crate provides:
//! - `DragResize` - pointer-driven, aspect-locked resizing with grid snapping
//! - `ImageNodeView` - image node sizing built on the resize engine
//! - `Throttle` / `ThrottleState` - leading-and-trailing update throttling
//! - `ContentPipeline` - editor output wired through the throttle
//! - Shortcut labels, URL checks and file validation helpers

pub mod config;
pub mod content;
pub mod error;
pub mod files;
pub mod geometry;
pub mod image_view;
pub mod keys;
pub mod links;
pub mod platform;
pub mod resize;
pub mod shortcut;
pub mod throttle;

pub use config::{EditorConfig, ImageOptions};
pub use content::{Content, ContentPipeline, EditorContent, OutputFormat, get_output};
pub use error::{MintapError, Result};
pub use files::{
    FileError, FileErrorReason, FileInput, FileMeta, FileValidationOptions, filter_files,
    to_data_url,
};
pub use geometry::{DRAG_SENSITIVITY, Dimensions, ResizeDirection};
pub use image_view::{ImageAttrs, ImageNodeView, ImageSizing, LoadState, NodeAttributes};
pub use keys::{EventOutcome, Key, KeyCombo, KeyEvent, Modifiers};
pub use links::{UrlOptions, is_url, sanitize_url};
pub use platform::{Platform, init_platform, platform};
pub use resize::{
    DragResize, InputListeners, ListenerRegistry, PointerEvent, ResizeConfig, ResizeHandle,
    ResizeOutput, ResizeSession,
};
pub use shortcut::{ShortcutKey, shortcut_key, shortcut_key_for, shortcut_keys};
pub use smol_str::SmolStr;
pub use throttle::{PolledThrottle, Throttle, ThrottleState};
