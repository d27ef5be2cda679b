//! Artifact writing error types.

use std::path::PathBuf;

/// Errors that can occur while writing an artifact.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    /// Output directory could not be created
    #[error("failed to create output directory {}: {source}", .path.display())]
    CreateDir {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Artifact could not be serialized
    #[error("failed to serialize {}: {source}", .path.display())]
    Serialize {
        path: PathBuf,
        source: serde_json::Error,
    },

    /// Artifact could not be written or moved into place
    #[error("failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}
