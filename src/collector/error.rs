//! Collector error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while building a bundle.
///
/// A missing source file is not an error; it becomes a `(NOT FOUND)` section.
#[derive(Debug, Error)]
pub enum CollectorError {
    /// A listed file exists but could not be read as UTF-8 text.
    #[error("failed to read '{}': {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A listed path exists but is not a regular file.
    #[error("'{}' is not a regular file", .0.display())]
    NotAFile(PathBuf),

    /// The output file could not be created, written, or moved into place.
    #[error("failed to write output '{}': {source}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
