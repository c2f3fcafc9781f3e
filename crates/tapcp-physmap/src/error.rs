//! Error types for memory-mapped boards

use std::io;
use thiserror::Error;

/// Physmap board errors
#[derive(Debug, Error)]
pub enum PhysmapError {
    /// /dev/mem could not be opened
    #[error("Failed to open /dev/mem: {0}")]
    DevMem(#[source] io::Error),

    /// mmap of a register window failed
    #[error("Failed to map {size:#x} bytes at {address:#x}: {source}")]
    MemoryMap {
        address: u64,
        size: usize,
        #[source]
        source: io::Error,
    },

    /// Window size is zero or not a multiple of the register width
    #[error("Invalid window size {0:#x}: must be a non-zero multiple of 4")]
    InvalidSize(u64),

    /// Failed to read sysfs attribute
    #[error("Failed to read sysfs attribute '{path}': {source}")]
    SysfsRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Failed to parse sysfs attribute
    #[error("Failed to parse sysfs attribute '{path}': {value}")]
    SysfsParse { path: String, value: String },

    /// Missing required parameter
    #[error("Missing required parameter: {0}")]
    MissingParameter(&'static str),

    /// Invalid parameter value
    #[error("Invalid parameter '{name}': {message}")]
    InvalidParameter { name: &'static str, message: String },

    /// Platform has no /dev/mem
    #[error("Physical memory mapping is only supported on Linux")]
    NotSupported,
}

/// Result type for physmap operations
pub type Result<T> = std::result::Result<T, PhysmapError>;
