//! Error handling types and utilities.

use std::path::PathBuf;
use std::time::Duration;

/// A specialized Result type for the binary and other top-level entry points.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods at the call sites.
pub type Result<T> = anyhow::Result<T>;

/// Errors surfaced by the library seams: document retrieval, blob storage and
/// configuration.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The document source could not produce the requested file.
    #[error("Failed to fetch '{file}': {reason}")]
    Fetch { file: String, reason: String },

    /// The document source did not answer within the configured timeout.
    #[error("Fetching '{file}' timed out after {elapsed:?}")]
    Timeout { file: String, elapsed: Duration },

    /// The blob store rejected a read or write.
    #[error("Storage error at {}: {source}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The in-memory index could not be encoded for persistence.
    #[error("Failed to encode search index: {0}")]
    Encode(#[from] serde_json::Error),

    /// The configuration failed validation.
    #[error("Invalid search configuration: {0}")]
    Config(String),
}
