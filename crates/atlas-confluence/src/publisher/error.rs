//! Error types for page publish operations.

use std::path::PathBuf;

use crate::error::ConfluenceError;

/// Error during page publish operation.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Missing or invalid configuration.
    #[error("{0}")]
    Config(String),

    /// Existing page lacks the managed label.
    #[error(
        "page {page_id} is not labeled '{label}'; refusing to overwrite (use --force to override)"
    )]
    Unmanaged {
        /// Page ID.
        page_id: String,
        /// Required label.
        label: String,
    },

    /// Image referenced by the document was not found on disk.
    #[error("image '{reference}' not found at {}", path.display())]
    MissingImage {
        /// Image URL or diagram view ID as written in markdown.
        reference: String,
        /// Resolved file path.
        path: PathBuf,
    },

    /// Confluence API error.
    #[error("Confluence API error: {0}")]
    Confluence(#[from] ConfluenceError),

    /// IO error (reading images).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Document serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
