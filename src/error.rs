//! Error types for CAPL file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading, scanning, or editing a CAPL file.
///
/// Every failure here is a deterministic function of the input content, so
/// none of them is worth retrying; the messages carry enough context
/// (available names, offending bounds) for the caller to correct the request.
#[derive(Debug, Error)]
pub enum CaplError {
    /// The file could not be opened or decoded.
    #[error("could not read {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory line sequence could not be written back.
    #[error("could not write {}: {source}", .path.display())]
    FileWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The target file does not exist.
    #[error("file not found: {}", .0.display())]
    MissingFile(PathBuf),

    /// A requested line range is out of bounds or empty.
    #[error("Invalid line range: {start} to {end}")]
    InvalidRange { start: usize, end: usize },

    /// A `section:` target matched neither a section alias nor a derived
    /// group. The message enumerates everything that would have matched.
    #[error("Section or Group '{name}' not found. Available: {available}")]
    SectionNotFound { name: String, available: String },

    /// An `after:`/`before:` target matched no element, or the location
    /// descriptor itself was malformed.
    #[error("Location '{0}' not found")]
    LocationNotFound(String),
}

impl CaplError {
    /// Create a read error for a path.
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a write error for a path.
    pub fn file_write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileWrite {
            path: path.into(),
            source,
        }
    }

    /// Create a section-not-found error from the available names, joined in
    /// their enumeration order.
    pub fn section_not_found(name: impl Into<String>, available: &[String]) -> Self {
        Self::SectionNotFound {
            name: name.into(),
            available: available.join(", "),
        }
    }
}
