//! Command dispatch
//!
//! The dispatcher is the entry point for the TFTP engine: it turns an open
//! request (filename, mode, direction) into a ready [`Session`], or rejects
//! it. All validation happens here, so a rejected request never leaves a
//! session behind.

use crate::board::{Board, Space};
use crate::command::{Access, Command, CommandKind};
use crate::diag;
use crate::error::{Error, Result};
use crate::path::parse_path;
use crate::range::Window;
use crate::registry::DeviceRegistry;
use crate::session::{Direction, Session, TransferMode};

/// Bytes read when a memory read gives no length
pub const DEFAULT_READ_LENGTH: u32 = 4;

/// Opens transfer sessions against a device registry
///
/// The dispatcher only holds a shared reference to the registry, so one
/// instance can serve any number of concurrent connections.
#[derive(Debug, Clone, Copy)]
pub struct Dispatcher<'r> {
    registry: &'r DeviceRegistry,
}

impl<'r> Dispatcher<'r> {
    /// Create a dispatcher for the given design
    pub fn new(registry: &'r DeviceRegistry) -> Self {
        Self { registry }
    }

    /// Device registry of the running design
    pub fn registry(&self) -> &'r DeviceRegistry {
        self.registry
    }

    /// Open a transfer
    ///
    /// `filename` is the untrusted path sent by the client. `temp` samples
    /// the sensor here; memory commands only validate their range and do not
    /// touch the board until the first block.
    pub fn open<B: Board + ?Sized>(
        &self,
        board: &mut B,
        filename: &str,
        mode: TransferMode,
        direction: Direction,
    ) -> Result<Session> {
        match self.open_session(board, filename, mode, direction) {
            Ok(session) => {
                match session.range() {
                    Some(range) => log::debug!(
                        "open {:?} ({}, {:?}): {} 0x{:08X}+0x{:X}",
                        filename,
                        mode,
                        direction,
                        range.space(),
                        range.address(),
                        range.length()
                    ),
                    None => log::debug!("open {:?} ({}, {:?})", filename, mode, direction),
                }
                Ok(session)
            }
            Err(e) => {
                let level = if e.is_client_error() {
                    log::Level::Warn
                } else {
                    log::Level::Error
                };
                log::log!(
                    level,
                    "open {:?} ({}, {:?}) rejected: {}",
                    filename,
                    mode,
                    direction,
                    e
                );
                Err(e)
            }
        }
    }

    fn open_session<B: Board + ?Sized>(
        &self,
        board: &mut B,
        filename: &str,
        mode: TransferMode,
        direction: Direction,
    ) -> Result<Session> {
        let path = parse_path(filename)?;
        let kind = CommandKind::from_token(path.command)?;

        if !kind.is_supported() {
            return Err(Error::NotSupported);
        }
        if direction == Direction::Write && !kind.access().contains(Access::WRITE) {
            return Err(Error::ReadOnlyViolation);
        }

        let session = match Command::from_path(kind, &path)? {
            Command::Help => Session::content(kind, mode, diag::help()),
            Command::ListDev => Session::content(kind, mode, diag::listdev(self.registry, mode)),
            Command::Temp => Session::content(kind, mode, diag::temp(board, mode)?),
            Command::Dev {
                name,
                offset,
                length,
            } => {
                let dev = self.registry.find(&name).ok_or(Error::UnknownDevice)?;
                let window = Window::device(dev, board.space_size(Space::Fpga));
                memory_session(kind, mode, direction, window, offset, length)?
            }
            Command::Fpga { offset, length } => {
                let window = Window::space(Space::Fpga, board.space_size(Space::Fpga));
                memory_session(kind, mode, direction, window, offset, length)?
            }
            Command::Cpu { offset, length } => {
                let window = Window::space(Space::Cpu, board.space_size(Space::Cpu));
                memory_session(kind, mode, direction, window, offset, length)?
            }
        };

        Ok(session)
    }
}

fn memory_session(
    kind: CommandKind,
    mode: TransferMode,
    direction: Direction,
    window: Window,
    offset: u32,
    length: Option<u32>,
) -> Result<Session> {
    let session = match (direction, length) {
        (Direction::Read, length) => {
            let length = length.unwrap_or(DEFAULT_READ_LENGTH);
            Session::memory_read(kind, mode, window.resolve(offset, length as u64)?)
        }
        (Direction::Write, Some(length)) => {
            let range = window.resolve(offset, length as u64)?;
            Session::memory_write(kind, mode, window, range, true)
        }
        (Direction::Write, None) => {
            let range = window.resolve_start(offset)?;
            Session::memory_write(kind, mode, window, range, false)
        }
    };
    Ok(session)
}
