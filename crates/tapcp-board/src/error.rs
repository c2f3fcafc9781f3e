//! Error types for opening boards

use thiserror::Error;

/// Errors while opening a board
#[derive(Debug, Error)]
pub enum BoardError {
    /// Board name is not compiled in
    #[error("Unknown board: {0} (available: {1})")]
    UnknownBoard(String, String),

    /// Parameter is not of the form key=value
    #[error("Invalid parameter format: '{0}' (expected key=value)")]
    InvalidFormat(String),

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: String, message: String },

    /// Failed to read an image file
    #[error("Failed to read '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Memory-mapped board failed to open
    #[cfg(feature = "physmap")]
    #[error(transparent)]
    Physmap(#[from] tapcp_physmap::PhysmapError),
}

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;
