//! Validation of files and base64 data URLs offered for insertion as images.
//!
//! Failures are collected into a list for the caller to report (toasts,
//! form errors) rather than raised.

use base64::engine::DecodePaddingMode;
use base64::engine::general_purpose::{GeneralPurpose, PAD, STANDARD};
use base64::{Engine, alphabet};
use serde::{Deserialize, Serialize};

/// Standard alphabet, padding optional on decode.
const LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    PAD.with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// 5 MiB, the default upload ceiling.
pub const DEFAULT_MAX_FILE_SIZE: u64 = 5 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct FileValidationOptions {
    /// Exact MIME types or `type/*` wildcards. Empty allows everything.
    pub allowed_mime_types: Vec<String>,
    /// Size limit in bytes. `None` (or zero) means unlimited.
    pub max_file_size: Option<u64>,
    pub allow_base64: bool,
}

impl Default for FileValidationOptions {
    fn default() -> Self {
        Self {
            allowed_mime_types: vec!["image/*".to_owned()],
            max_file_size: Some(DEFAULT_MAX_FILE_SIZE),
            allow_base64: true,
        }
    }
}

/// A file picked or dropped by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMeta {
    pub name: String,
    pub mime: String,
    pub size: u64,
}

/// Something offered as an image source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileInput {
    File(FileMeta),
    /// A URL, a `data:` URL or a bare base64 payload.
    Source(String),
}

impl FileInput {
    /// Name used when reporting errors.
    pub fn label(&self) -> &str {
        match self {
            Self::File(meta) => &meta.name,
            Self::Source(src) => src,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FileErrorReason {
    Type,
    Size,
    InvalidBase64,
    Base64NotAllowed,
}

impl std::fmt::Display for FileErrorReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Type => "file type is not allowed",
            Self::Size => "file is too large",
            Self::InvalidBase64 => "base64 data is invalid",
            Self::Base64NotAllowed => "base64 images are not allowed",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub input: String,
    pub reason: FileErrorReason,
}

/// Split `inputs` into accepted inputs and validation errors.
///
/// One input may produce both a `Type` and a `Size` error. Plain URLs are
/// accepted without inspection.
pub fn filter_files(
    inputs: Vec<FileInput>,
    options: &FileValidationOptions,
) -> (Vec<FileInput>, Vec<FileError>) {
    let mut valid = Vec::with_capacity(inputs.len());
    let mut errors = Vec::new();

    for input in inputs {
        let (mime, size) = match inspect(&input, options) {
            Inspection::Accept => {
                valid.push(input);
                continue;
            }
            Inspection::Reject(reason) => {
                errors.push(error(&input, reason));
                continue;
            }
            Inspection::Check { mime, size } => (mime, size),
        };

        let type_ok = mime_allowed(&mime, &options.allowed_mime_types);
        let size_ok = match options.max_file_size {
            Some(max) if max > 0 => size <= max,
            _ => true,
        };

        if type_ok && size_ok {
            valid.push(input);
            continue;
        }
        tracing::debug!(
            target: "mintap::files",
            input = input.label(),
            %mime,
            size,
            type_ok,
            size_ok,
            "rejected file"
        );
        if !type_ok {
            errors.push(error(&input, FileErrorReason::Type));
        }
        if !size_ok {
            errors.push(error(&input, FileErrorReason::Size));
        }
    }

    (valid, errors)
}

/// Encode bytes as a `data:` URL.
pub fn to_data_url(mime: &str, bytes: &[u8]) -> String {
    format!("data:{mime};base64,{}", STANDARD.encode(bytes))
}

fn error(input: &FileInput, reason: FileErrorReason) -> FileError {
    FileError {
        input: input.label().to_owned(),
        reason,
    }
}

/// Matches exactly or through a `type/*` wildcard.
fn mime_allowed(mime: &str, allowed: &[String]) -> bool {
    if allowed.is_empty() {
        return true;
    }
    let top_level = mime.split('/').next().unwrap_or(mime);
    let wildcard = format!("{top_level}/*");
    allowed.iter().any(|a| a == mime || *a == wildcard)
}

enum Inspection {
    Accept,
    Reject(FileErrorReason),
    Check { mime: String, size: u64 },
}

fn inspect(input: &FileInput, options: &FileValidationOptions) -> Inspection {
    match input {
        FileInput::File(meta) => Inspection::Check {
            mime: meta.mime.clone(),
            size: meta.size,
        },
        FileInput::Source(src) => match classify_source(src) {
            Source::Url => Inspection::Accept,
            Source::Undecodable => Inspection::Reject(FileErrorReason::InvalidBase64),
            Source::Base64 { .. } if !options.allow_base64 => {
                Inspection::Reject(FileErrorReason::Base64NotAllowed)
            }
            Source::Base64 { mime, size } => Inspection::Check { mime, size },
        },
    }
}

enum Source {
    Url,
    Undecodable,
    Base64 { mime: String, size: u64 },
}

fn classify_source(src: &str) -> Source {
    if let Some(rest) = src.strip_prefix("data:") {
        let Some((header, payload)) = rest.split_once(',') else {
            return Source::Url;
        };
        let Some(media_type) = header.strip_suffix(";base64") else {
            return Source::Url;
        };
        if media_type.is_empty() || media_type.contains(';') || payload.is_empty() {
            return Source::Url;
        }
        return match LENIENT.decode(payload) {
            Ok(bytes) => Source::Base64 {
                mime: data_url_mime(media_type),
                size: bytes.len() as u64,
            },
            Err(_) => Source::Undecodable,
        };
    }

    match LENIENT.decode(src) {
        Ok(bytes) => Source::Base64 {
            mime: "unknown".to_owned(),
            size: bytes.len() as u64,
        },
        Err(_) => Source::Url,
    }
}

/// `type/subtype` of a data URL header, or `unknown`.
fn data_url_mime(media_type: &str) -> String {
    match media_type.split_once('/') {
        Some((ty, sub))
            if !ty.is_empty()
                && !sub.is_empty()
                && ty.bytes().all(|b| b.is_ascii_alphanumeric())
                && sub
                    .bytes()
                    .all(|b| b.is_ascii_alphanumeric() || matches!(b, b'-' | b'.' | b'+')) =>
        {
            media_type.to_owned()
        }
        _ => "unknown".to_owned(),
    }
}
