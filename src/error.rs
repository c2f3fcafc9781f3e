//! CLI error types

use std::io;
use std::path::PathBuf;

use tapcp_board::BoardError;
use tapcp_core::registry::RegistryError;
use thiserror::Error;

/// Errors reported by the tapcp binary
#[derive(Debug, Error)]
pub enum CliError {
    /// The command layer rejected or aborted a transfer
    #[error("{path}: {source} (TFTP error code {code})")]
    Transfer {
        path: String,
        code: u16,
        #[source]
        source: tapcp_core::Error,
    },

    /// Device registry could not be loaded
    #[error("Failed to load device registry from {path:?}: {source}")]
    Registry {
        path: PathBuf,
        #[source]
        source: RegistryError,
    },

    /// Board could not be opened
    #[error(transparent)]
    Board(#[from] BoardError),

    /// Local file I/O failed
    #[error("{path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CliError {
    /// Wrap a command layer error for the transfer of `path`
    pub fn transfer(path: &str, source: tapcp_core::Error) -> Self {
        Self::Transfer {
            path: path.to_string(),
            code: source.tftp_code(),
            source,
        }
    }

    /// Wrap an I/O error on the local file `path`
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for CLI commands
pub type Result<T> = std::result::Result<T, CliError>;
