//! Error types for loading, mutating and saving preferences

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the preferences store.
///
/// A missing file on load is not an error: it yields an empty store.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum PrefsError {
    /// The file exists but could not be read
    #[error("failed to read preferences file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be written (missing directory, permissions, ...)
    #[error("failed to write preferences file {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content is neither valid JSON nor a valid legacy XML document
    #[error(
        "failed to parse preferences file {}: not JSON ({native}) and not legacy XML ({legacy})",
        .path.display()
    )]
    Parse {
        path: PathBuf,
        native: serde_json::Error,
        #[source]
        legacy: roxmltree::Error,
    },

    /// Syntactically valid JSON whose shape is not a preferences document
    #[error("invalid preferences document in {}: {source}", .path.display())]
    InvalidNative {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Serialization to the native format failed
    #[error("failed to serialize preferences: {0}")]
    Serialize(#[source] serde_json::Error),

    /// `save()` was called on a store that was never given a path
    #[error("no path to save preferences to")]
    NoPath,

    /// Keys must not be empty
    #[error("preference keys must not be empty")]
    EmptyKey,

    /// Reserved keys are not reachable through attribute access
    #[error("key '{key}' uses the reserved prefix and cannot be set as an attribute")]
    ReservedKey { key: String },

    /// A nested document was required but the key holds another value
    #[error("key '{key}' holds a {found}, not a nested document")]
    NotADocument { key: String, found: &'static str },

    /// A preferences directory could not be determined
    #[error("could not resolve preferences directory: {reason}")]
    Unresolved { reason: String },
}

impl PrefsError {
    /// Check if this error means the file content was unreadable as preferences
    pub fn is_parse_error(&self) -> bool {
        matches!(
            self,
            PrefsError::Parse { .. } | PrefsError::InvalidNative { .. }
        )
    }

    /// Check if this error came from the filesystem
    pub fn is_io_error(&self) -> bool {
        matches!(self, PrefsError::Read { .. } | PrefsError::Write { .. })
    }

    /// Check if this error was caused by an unusable key
    pub fn is_key_error(&self) -> bool {
        matches!(
            self,
            PrefsError::EmptyKey | PrefsError::ReservedKey { .. } | PrefsError::NotADocument { .. }
        )
    }

    /// Get the file path involved, if any
    pub fn path(&self) -> Option<&std::path::Path> {
        match self {
            PrefsError::Read { path, .. }
            | PrefsError::Write { path, .. }
            | PrefsError::Parse { path, .. }
            | PrefsError::InvalidNative { path, .. } => Some(path.as_path()),
            _ => None,
        }
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PrefsError>;
