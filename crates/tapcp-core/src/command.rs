//! Command table
//!
//! The first component of a transfer filename selects one of a fixed set
//! of commands. Each command declares which transfer directions it allows
//! and how its positional parameters are interpreted.

use alloc::string::{String, ToString};
use bitflags::bitflags;

use crate::error::{Error, ParseFailure, Result};
use crate::path::ParsedPath;

bitflags! {
    /// Transfer directions a command accepts
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Access: u8 {
        /// Client may read ("get")
        const READ  = 1 << 0;
        /// Client may write ("put")
        const WRITE = 1 << 1;

        /// Shorthand for read-write commands
        const READ_WRITE = Self::READ.bits() | Self::WRITE.bits();
    }
}

/// Command descriptor kinds, one per entry in the command table
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    /// List of commands
    Help,
    /// Devices of the running design
    ListDev,
    /// FPGA temperature
    Temp,
    /// Memory of a named gateware device
    Dev,
    /// FPGA address space
    Fpga,
    /// CPU address space
    Cpu,
    /// Bitstream upload (reserved)
    ProgDev,
    /// Configuration flash access (reserved)
    Flash,
}

impl CommandKind {
    /// All commands, in help order
    pub const ALL: [CommandKind; 8] = [
        CommandKind::Help,
        CommandKind::ListDev,
        CommandKind::Temp,
        CommandKind::Dev,
        CommandKind::Fpga,
        CommandKind::Cpu,
        CommandKind::ProgDev,
        CommandKind::Flash,
    ];

    /// Command name as it appears in paths
    pub fn name(&self) -> &'static str {
        match self {
            Self::Help => "help",
            Self::ListDev => "listdev",
            Self::Temp => "temp",
            Self::Dev => "dev",
            Self::Fpga => "fpga",
            Self::Cpu => "cpu",
            Self::ProgDev => "progdev",
            Self::Flash => "flash",
        }
    }

    /// Look up a command token (case-insensitive)
    pub fn from_token(token: &str) -> Result<Self> {
        Self::ALL
            .iter()
            .copied()
            .find(|kind| kind.name().eq_ignore_ascii_case(token))
            .ok_or(Error::UnknownCommand)
    }

    /// Directions this command accepts
    pub fn access(&self) -> Access {
        match self {
            Self::Help | Self::ListDev | Self::Temp => Access::READ,
            Self::Dev | Self::Fpga | Self::Cpu | Self::ProgDev | Self::Flash => {
                Access::READ_WRITE
            }
        }
    }

    /// Whether the command is implemented
    pub fn is_supported(&self) -> bool {
        !matches!(self, Self::ProgDev | Self::Flash)
    }

    /// Whether the command reaches into an address space
    pub fn is_memory(&self) -> bool {
        matches!(self, Self::Dev | Self::Fpga | Self::Cpu)
    }

    /// Maximum number of positional parameters
    pub fn max_params(&self) -> usize {
        match self {
            Self::Help | Self::ListDev | Self::Temp => 0,
            Self::Dev => 3,
            Self::Fpga | Self::Cpu => 2,
            Self::ProgDev | Self::Flash => usize::MAX,
        }
    }
}

/// A fully parsed command with its parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `help`
    Help,
    /// `listdev`
    ListDev,
    /// `temp`
    Temp,
    /// `dev/NAME[/OFFSET[/LENGTH]]`
    Dev {
        /// Device name
        name: String,
        /// Offset relative to the device, default 0
        offset: u32,
        /// Length in bytes, default depends on direction
        length: Option<u32>,
    },
    /// `fpga/OFFSET[/LENGTH]`
    Fpga {
        /// Offset in the FPGA space, default 0
        offset: u32,
        /// Length in bytes, default depends on direction
        length: Option<u32>,
    },
    /// `cpu/OFFSET[/LENGTH]`
    Cpu {
        /// Offset in the CPU space (always required)
        offset: u32,
        /// Length in bytes, default depends on direction
        length: Option<u32>,
    },
}

impl Command {
    /// Interpret the parameters of a path for an already looked-up command
    pub fn from_path(kind: CommandKind, path: &ParsedPath<'_>) -> Result<Self> {
        if !kind.is_supported() {
            return Err(Error::NotSupported);
        }
        path.check_max_params(kind.max_params())?;

        let command = match kind {
            CommandKind::Help => Command::Help,
            CommandKind::ListDev => Command::ListDev,
            CommandKind::Temp => Command::Temp,
            CommandKind::Dev => Command::Dev {
                name: path
                    .param(0)
                    .ok_or(ParseFailure::MissingParameter)?
                    .to_string(),
                offset: path.hex_param(1)?.unwrap_or(0),
                length: path.hex_param(2)?,
            },
            CommandKind::Fpga => Command::Fpga {
                offset: path.hex_param(0)?.unwrap_or(0),
                length: path.hex_param(1)?,
            },
            CommandKind::Cpu => Command::Cpu {
                offset: path.hex_param(0)?.ok_or(ParseFailure::MissingParameter)?,
                length: path.hex_param(1)?,
            },
            CommandKind::ProgDev | CommandKind::Flash => return Err(Error::NotSupported),
        };

        Ok(command)
    }

    /// The table entry this command belongs to
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Help => CommandKind::Help,
            Command::ListDev => CommandKind::ListDev,
            Command::Temp => CommandKind::Temp,
            Command::Dev { .. } => CommandKind::Dev,
            Command::Fpga { .. } => CommandKind::Fpga,
            Command::Cpu { .. } => CommandKind::Cpu,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::parse_path;

    fn parse(filename: &str) -> Result<Command> {
        let path = parse_path(filename)?;
        Command::from_path(CommandKind::from_token(path.command)?, &path)
    }

    #[test]
    fn test_lookup() {
        assert_eq!(CommandKind::from_token("help"), Ok(CommandKind::Help));
        assert_eq!(CommandKind::from_token("LISTDEV"), Ok(CommandKind::ListDev));
        assert_eq!(CommandKind::from_token("Fpga"), Ok(CommandKind::Fpga));
        assert_eq!(
            CommandKind::from_token("unknown_command"),
            Err(Error::UnknownCommand)
        );
        assert_eq!(CommandKind::from_token("hel"), Err(Error::UnknownCommand));
    }

    #[test]
    fn test_access() {
        for kind in [CommandKind::Help, CommandKind::ListDev, CommandKind::Temp] {
            assert!(!kind.access().contains(Access::WRITE));
        }
        for kind in [CommandKind::Dev, CommandKind::Fpga, CommandKind::Cpu] {
            assert_eq!(kind.access(), Access::READ_WRITE);
            assert!(kind.is_memory());
        }
        assert!(!CommandKind::Temp.is_memory());
        assert!(!CommandKind::Flash.is_memory());
    }

    #[test]
    fn test_parse_dev() {
        assert_eq!(
            parse("dev/adc/0x10/7").unwrap(),
            Command::Dev {
                name: "adc".into(),
                offset: 0x10,
                length: Some(7)
            }
        );
        assert_eq!(
            parse("dev/adc").unwrap(),
            Command::Dev {
                name: "adc".into(),
                offset: 0,
                length: None
            }
        );
        assert_eq!(
            parse("dev"),
            Err(Error::Parse(ParseFailure::MissingParameter))
        );
        assert_eq!(
            parse("dev/adc/1/2/3"),
            Err(Error::Parse(ParseFailure::TooManyParameters))
        );
        assert_eq!(
            parse("dev/adc/xyz"),
            Err(Error::Parse(ParseFailure::InvalidHex))
        );
    }

    #[test]
    fn test_parse_spaces() {
        assert_eq!(
            parse("fpga").unwrap(),
            Command::Fpga {
                offset: 0,
                length: None
            }
        );
        assert_eq!(
            parse("cpu/80000000/10").unwrap(),
            Command::Cpu {
                offset: 0x8000_0000,
                length: Some(0x10)
            }
        );
        assert_eq!(
            parse("cpu"),
            Err(Error::Parse(ParseFailure::MissingParameter))
        );
    }

    #[test]
    fn test_parse_diagnostics() {
        assert_eq!(parse("help").unwrap(), Command::Help);
        assert_eq!(parse("TEMP").unwrap(), Command::Temp);
        assert_eq!(
            parse("listdev/x"),
            Err(Error::Parse(ParseFailure::TooManyParameters))
        );
    }

    #[test]
    fn test_reserved() {
        assert_eq!(parse("progdev"), Err(Error::NotSupported));
        assert_eq!(parse("flash/0/100"), Err(Error::NotSupported));
    }
}
