//! Error types for tapcp-core
//!
//! This module provides a no_std compatible error type. Every failure is
//! scoped to a single transfer; the TFTP engine reports it to the client
//! using [`Error::tftp_code`] and the `Display` text.

use core::fmt;

use crate::board::Space;

/// Details about a parse failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseFailure {
    /// Transfer filename is empty
    EmptyPath,
    /// First path component is empty
    EmptyCommand,
    /// A path component between two slashes is empty
    EmptyParameter,
    /// A required parameter is missing
    MissingParameter,
    /// More parameters than the command accepts
    TooManyParameters,
    /// Parameter is not a valid 32-bit hexadecimal number
    InvalidHex,
    /// Transfer mode string is not recognised
    InvalidMode,
    /// Text payload is not valid hexadecimal
    InvalidText,
}

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// Malformed path component, mode string, or text payload
    Parse(ParseFailure),
    /// Command name is not in the command table
    UnknownCommand,
    /// Device name is not in the device registry
    UnknownDevice,
    /// Write attempted on a read-only command
    ReadOnlyViolation,
    /// Range does not fit in the target device or address space
    OutOfRange {
        /// Requested start offset
        offset: u32,
        /// Requested length in bytes
        length: u64,
        /// Size of the target window in bytes
        bound: u64,
    },
    /// Reserved command that is not implemented yet
    NotSupported,
    /// Register access failed
    Bus {
        /// Address space of the failed access
        space: Space,
        /// Byte offset of the failed access
        offset: u32,
    },
    /// Temperature sensor could not be read
    Sensor,
    /// Session was aborted by an earlier error
    Aborted,
    /// Data arrived after the transfer completed
    Completed,
    /// Read on a write session or write on a read session
    WrongDirection,
}

impl Error {
    /// TFTP error code (RFC 1350) used to report this error to the client
    pub fn tftp_code(&self) -> u16 {
        match self {
            Self::UnknownCommand | Self::UnknownDevice => 1,
            Self::ReadOnlyViolation => 2,
            Self::OutOfRange { .. } => 3,
            Self::Parse(_) | Self::NotSupported | Self::WrongDirection | Self::Completed => 4,
            Self::Bus { .. } | Self::Sensor | Self::Aborted => 0,
        }
    }

    /// Whether this error was raised by untrusted client input
    pub fn is_client_error(&self) -> bool {
        !matches!(self, Self::Bus { .. } | Self::Sensor)
    }
}

impl From<ParseFailure> for Error {
    fn from(failure: ParseFailure) -> Self {
        Self::Parse(failure)
    }
}

impl fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyPath => write!(f, "empty filename"),
            Self::EmptyCommand => write!(f, "empty command"),
            Self::EmptyParameter => write!(f, "empty path component"),
            Self::MissingParameter => write!(f, "missing parameter"),
            Self::TooManyParameters => write!(f, "too many parameters"),
            Self::InvalidHex => write!(f, "invalid hex number"),
            Self::InvalidMode => write!(f, "invalid transfer mode"),
            Self::InvalidText => write!(f, "invalid hex text"),
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(failure) => write!(f, "parse error: {}", failure),
            Self::UnknownCommand => write!(f, "unknown command"),
            Self::UnknownDevice => write!(f, "unknown device"),
            Self::ReadOnlyViolation => write!(f, "read-only"),
            Self::OutOfRange {
                offset,
                length,
                bound,
            } => write!(
                f,
                "range 0x{:X}+0x{:X} exceeds 0x{:X} bytes",
                offset, length, bound
            ),
            Self::NotSupported => write!(f, "not supported"),
            Self::Bus { space, offset } => {
                write!(f, "{} access failed at 0x{:08X}", space, offset)
            }
            Self::Sensor => write!(f, "temperature sensor unavailable"),
            Self::Aborted => write!(f, "transfer aborted"),
            Self::Completed => write!(f, "transfer already complete"),
            Self::WrongDirection => write!(f, "wrong transfer direction"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ParseFailure {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::string::ToString;

    #[test]
    fn test_tftp_codes() {
        assert_eq!(Error::UnknownCommand.tftp_code(), 1);
        assert_eq!(Error::UnknownDevice.tftp_code(), 1);
        assert_eq!(Error::ReadOnlyViolation.tftp_code(), 2);
        assert_eq!(Error::Parse(ParseFailure::InvalidHex).tftp_code(), 4);
        assert_eq!(Error::NotSupported.tftp_code(), 4);
        assert_eq!(Error::Sensor.tftp_code(), 0);
        assert_eq!(Error::Completed.tftp_code(), 4);
    }

    #[test]
    fn test_client_errors() {
        assert!(Error::UnknownDevice.is_client_error());
        assert!(Error::Completed.is_client_error());
        assert!(!Error::Sensor.is_client_error());
    }

    #[test]
    fn test_display() {
        assert_eq!(Error::NotSupported.to_string(), "not supported");
        assert_eq!(
            Error::OutOfRange {
                offset: 0x10,
                length: 8,
                bound: 0x10
            }
            .to_string(),
            "range 0x10+0x8 exceeds 0x10 bytes"
        );
        assert!(!Error::Bus {
            space: Space::Fpga,
            offset: 0
        }
        .is_client_error());
    }
}
