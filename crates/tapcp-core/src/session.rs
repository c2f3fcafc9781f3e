//! Transfer sessions
//!
//! A session is the state of one open transfer. The TFTP engine creates it
//! through [`Dispatcher::open`](crate::Dispatcher::open), then calls
//! [`read`](Session::read) or [`write`](Session::write) once per block and
//! finally [`close`](Session::close) or [`abort`](Session::abort).
//!
//! ```text
//! Opened ──► Transferring ──► Completed
//!    │            │
//!    └────────────┴─────────► Aborted
//! ```
//!
//! A session never leaves `Completed` or `Aborted`. Sessions own all their
//! state; the board is only borrowed for the duration of each call.

use alloc::borrow::Cow;
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

use crate::board::{self, Board};
use crate::codec::{self, HexDecoder, WORDS_PER_ROW};
use crate::command::CommandKind;
use crate::error::{Error, ParseFailure, Result};
use crate::range::{AddressRange, Window, WORD_SIZE};

/// Transfer encoding negotiated by the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransferMode {
    /// TFTP `netascii`: human-readable text
    Text,
    /// TFTP `octet`: raw bytes in network byte order
    Binary,
}

impl TransferMode {
    /// TFTP mode name
    pub fn name(&self) -> &'static str {
        match self {
            TransferMode::Text => "netascii",
            TransferMode::Binary => "octet",
        }
    }
}

impl FromStr for TransferMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if ["netascii", "ascii", "text"]
            .iter()
            .any(|m| m.eq_ignore_ascii_case(s))
        {
            Ok(TransferMode::Text)
        } else if ["octet", "binary"].iter().any(|m| m.eq_ignore_ascii_case(s)) {
            Ok(TransferMode::Binary)
        } else {
            Err(ParseFailure::InvalidMode.into())
        }
    }
}

impl fmt::Display for TransferMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Direction of a transfer, from the client's point of view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Client reads from the server (TFTP RRQ, "get")
    Read,
    /// Client writes to the server (TFTP WRQ, "put")
    Write,
}

/// Lifecycle state of a session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, no block exchanged yet
    Opened,
    /// At least one block exchanged
    Transferring,
    /// All data transferred, or closed normally
    Completed,
    /// Stopped by an error or by the engine
    Aborted,
}

/// Streams a validated range out of the board
#[derive(Debug)]
struct MemoryReader {
    range: AddressRange,
    consumed: u32,
    staged: Vec<u8>,
    staged_pos: usize,
}

impl MemoryReader {
    fn remaining(&self) -> u32 {
        self.range.length() - self.consumed
    }

    fn is_done(&self) -> bool {
        self.remaining() == 0 && self.staged_pos == self.staged.len()
    }

    /// Read the next registers from the board into the staging buffer
    ///
    /// Every register is read exactly once, even when a block boundary
    /// falls in the middle of it.
    fn stage<B: Board + ?Sized>(
        &mut self,
        board: &mut B,
        mode: TransferMode,
        want: usize,
    ) -> Result<()> {
        self.staged.clear();
        self.staged_pos = 0;

        let space = self.range.space();
        let offset = self.range.offset() + self.consumed;
        let address = self.range.address().wrapping_add(self.consumed);
        let left = (self.remaining() / WORD_SIZE) as usize;

        let count = match mode {
            TransferMode::Binary => {
                let count = left.min(want.div_ceil(WORD_SIZE as usize));
                let mut addr = address;
                for _ in 0..count {
                    let value = board.read32(space, addr)?;
                    self.staged.extend_from_slice(&value.to_be_bytes());
                    addr = addr.wrapping_add(WORD_SIZE);
                }
                count
            }
            TransferMode::Text => {
                let count = left.min(WORDS_PER_ROW);
                let mut words = [0u32; WORDS_PER_ROW];
                board::read_words(board, space, address, &mut words[..count])?;
                codec::render_row(&mut self.staged, offset, &words[..count]);
                count
            }
        };

        self.consumed += count as u32 * WORD_SIZE;
        Ok(())
    }

    fn read<B: Board + ?Sized>(
        &mut self,
        board: &mut B,
        mode: TransferMode,
        buf: &mut [u8],
    ) -> Result<usize> {
        let mut n = 0;
        loop {
            let avail = &self.staged[self.staged_pos..];
            let take = avail.len().min(buf.len() - n);
            buf[n..n + take].copy_from_slice(&avail[..take]);
            n += take;
            self.staged_pos += take;

            if n == buf.len() || self.remaining() == 0 {
                return Ok(n);
            }
            self.stage(board, mode, buf.len() - n)?;
        }
    }
}

/// Stores client data into a validated range
#[derive(Debug)]
struct MemoryWriter {
    window: Window,
    range: AddressRange,
    /// Length was given in the path; otherwise the range grows with the data
    fixed_length: bool,
    cursor: u32,
    decoder: Option<HexDecoder>,
}

impl MemoryWriter {
    fn store<B: Board + ?Sized>(&mut self, board: &mut B, data: &[u8]) -> Result<()> {
        if data.is_empty() {
            return Ok(());
        }

        let end = self.cursor as u64 + data.len() as u64;
        if self.fixed_length {
            if end > self.range.length() as u64 {
                return Err(Error::OutOfRange {
                    offset: self.range.offset(),
                    length: end,
                    bound: self.range.length() as u64,
                });
            }
        } else {
            self.range = self.window.resolve(self.range.offset(), end)?;
        }

        let address = self.range.address().wrapping_add(self.cursor);
        log::trace!(
            "{}: write {} bytes at 0x{:08X}",
            self.range.space(),
            data.len(),
            address
        );
        board::write_bytes(board, self.range.space(), address, data)?;
        self.cursor = end as u32;
        Ok(())
    }

    fn write<B: Board + ?Sized>(&mut self, board: &mut B, data: &[u8]) -> Result<()> {
        // decode the whole block before touching the board
        let bytes: Cow<'_, [u8]> = match &mut self.decoder {
            Some(decoder) => Cow::Owned(decoder.push(data)?),
            None => Cow::Borrowed(data),
        };
        self.store(board, &bytes)
    }

    fn flush<B: Board + ?Sized>(&mut self, board: &mut B) -> Result<()> {
        let tail = match &mut self.decoder {
            Some(decoder) => decoder.finish()?,
            None => return Ok(()),
        };
        self.store(board, &tail)
    }
}

#[derive(Debug)]
enum Body {
    Content {
        data: Cow<'static, [u8]>,
        pos: usize,
    },
    Read(MemoryReader),
    Write(MemoryWriter),
}

/// State of one open transfer
#[derive(Debug)]
pub struct Session {
    command: CommandKind,
    mode: TransferMode,
    direction: Direction,
    state: SessionState,
    body: Body,
}

impl Session {
    /// Session streaming a ready-made buffer (diagnostic commands)
    pub(crate) fn content(
        command: CommandKind,
        mode: TransferMode,
        data: Cow<'static, [u8]>,
    ) -> Self {
        Self {
            command,
            mode,
            direction: Direction::Read,
            state: SessionState::Opened,
            body: Body::Content { data, pos: 0 },
        }
    }

    /// Session reading a validated range from the board
    pub(crate) fn memory_read(command: CommandKind, mode: TransferMode, range: AddressRange) -> Self {
        Self {
            command,
            mode,
            direction: Direction::Read,
            state: SessionState::Opened,
            body: Body::Read(MemoryReader {
                range,
                consumed: 0,
                staged: Vec::new(),
                staged_pos: 0,
            }),
        }
    }

    /// Session writing into a range of `window`
    ///
    /// With `fixed_length` the range is final; otherwise it starts empty and
    /// is re-resolved against the window as data arrives.
    pub(crate) fn memory_write(
        command: CommandKind,
        mode: TransferMode,
        window: Window,
        range: AddressRange,
        fixed_length: bool,
    ) -> Self {
        let decoder = match mode {
            TransferMode::Text => Some(HexDecoder::new()),
            TransferMode::Binary => None,
        };
        Self {
            command,
            mode,
            direction: Direction::Write,
            state: SessionState::Opened,
            body: Body::Write(MemoryWriter {
                window,
                range,
                fixed_length,
                cursor: 0,
                decoder,
            }),
        }
    }

    /// Command this session serves
    pub fn command(&self) -> CommandKind {
        self.command
    }

    /// Transfer mode
    pub fn mode(&self) -> TransferMode {
        self.mode
    }

    /// Transfer direction
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Current lifecycle state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Range being accessed, for memory commands
    ///
    /// For writes without an explicit length this grows as data arrives.
    pub fn range(&self) -> Option<AddressRange> {
        match &self.body {
            Body::Content { .. } => None,
            Body::Read(reader) => Some(reader.range),
            Body::Write(writer) => Some(writer.range),
        }
    }

    /// Bytes of source data already consumed (reads) or stored (writes)
    pub fn cursor(&self) -> u64 {
        match &self.body {
            Body::Content { pos, .. } => *pos as u64,
            Body::Read(reader) => reader.consumed as u64,
            Body::Write(writer) => writer.cursor as u64,
        }
    }

    /// Bytes of source data not yet consumed, for reads
    pub fn remaining_bytes(&self) -> u64 {
        match &self.body {
            Body::Content { data, pos } => (data.len() - pos) as u64,
            Body::Read(reader) => reader.remaining() as u64,
            Body::Write(_) => 0,
        }
    }

    /// Exact number of bytes a read session sends, for the TFTP `tsize`
    /// option
    pub fn transfer_size(&self) -> Option<u64> {
        match &self.body {
            Body::Content { data, .. } => Some(data.len() as u64),
            Body::Read(reader) => Some(match self.mode {
                TransferMode::Binary => reader.range.length() as u64,
                TransferMode::Text => codec::dump_len(reader.range.words()),
            }),
            Body::Write(_) => None,
        }
    }

    fn fail(&mut self, err: Error) -> Error {
        if err.is_client_error() {
            log::warn!("{}: transfer aborted: {}", self.command.name(), err);
        } else {
            log::error!("{}: transfer aborted: {}", self.command.name(), err);
        }
        self.state = SessionState::Aborted;
        err
    }

    /// Produce the next block of data
    ///
    /// Fills `buf` as far as possible. Returning fewer bytes than
    /// `buf.len()` means the data has ended. Reading a completed session
    /// returns 0.
    pub fn read<B: Board + ?Sized>(&mut self, board: &mut B, buf: &mut [u8]) -> Result<usize> {
        match self.state {
            SessionState::Aborted => return Err(Error::Aborted),
            SessionState::Completed => return Ok(0),
            SessionState::Opened | SessionState::Transferring => {}
        }

        let mode = self.mode;
        let result = match &mut self.body {
            Body::Content { data, pos } => {
                let n = buf.len().min(data.len() - *pos);
                buf[..n].copy_from_slice(&data[*pos..*pos + n]);
                *pos += n;
                Ok((n, *pos == data.len()))
            }
            Body::Read(reader) => reader
                .read(board, mode, buf)
                .map(|n| (n, reader.is_done())),
            Body::Write(_) => return Err(Error::WrongDirection),
        };

        match result {
            Ok((n, done)) => {
                log::trace!("{}: read {} bytes", self.command.name(), n);
                self.state = if done {
                    SessionState::Completed
                } else {
                    SessionState::Transferring
                };
                Ok(n)
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Consume the next block of client data
    ///
    /// A block that would overrun the range, or that is malformed text,
    /// aborts the session before any of its bytes reach the board. Blocks
    /// written before it stay written.
    pub fn write<B: Board + ?Sized>(&mut self, board: &mut B, data: &[u8]) -> Result<()> {
        if self.state == SessionState::Aborted {
            return Err(Error::Aborted);
        }

        let result = match &mut self.body {
            Body::Write(writer) if self.state != SessionState::Completed => {
                writer.write(board, data)
            }
            Body::Write(_) => return Err(Error::Completed),
            Body::Content { .. } | Body::Read(_) => return Err(Error::WrongDirection),
        };

        match result {
            Ok(()) => {
                self.state = SessionState::Transferring;
                Ok(())
            }
            Err(e) => Err(self.fail(e)),
        }
    }

    /// Finish the transfer normally
    ///
    /// For text writes this stores the token still held from the last
    /// block.
    pub fn close<B: Board + ?Sized>(&mut self, board: &mut B) -> Result<()> {
        match self.state {
            SessionState::Aborted => return Err(Error::Aborted),
            SessionState::Completed => return Ok(()),
            SessionState::Opened | SessionState::Transferring => {}
        }

        if let Body::Write(writer) = &mut self.body {
            if let Err(e) = writer.flush(board) {
                return Err(self.fail(e));
            }
        }

        log::debug!(
            "{}: transfer complete ({} bytes)",
            self.command.name(),
            self.cursor()
        );
        self.state = SessionState::Completed;
        Ok(())
    }

    /// Stop the transfer without touching the board again
    ///
    /// Consumes the session and returns the state it ended in: `Aborted`
    /// unless it had already completed.
    pub fn abort(self) -> SessionState {
        match self.state {
            SessionState::Opened | SessionState::Transferring => {
                log::warn!("{}: transfer aborted by engine", self.command.name());
                SessionState::Aborted
            }
            state => state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::mock::MockBoard;
    use crate::board::Space;

    fn fpga_window(board: &MockBoard) -> Window {
        Window::space(Space::Fpga, board.space_size(Space::Fpga))
    }

    #[test]
    fn test_mode_from_str() {
        assert_eq!("netascii".parse::<TransferMode>(), Ok(TransferMode::Text));
        assert_eq!("OCTET".parse::<TransferMode>(), Ok(TransferMode::Binary));
        assert_eq!("binary".parse::<TransferMode>(), Ok(TransferMode::Binary));
        assert_eq!(
            "mail".parse::<TransferMode>(),
            Err(Error::Parse(ParseFailure::InvalidMode))
        );
    }

    #[test]
    fn test_content_blocks() {
        let mut board = MockBoard::new();
        let mut s = Session::content(
            CommandKind::Help,
            TransferMode::Text,
            Cow::Borrowed(b"0123456789"),
        );
        assert_eq!(s.transfer_size(), Some(10));

        let mut buf = [0u8; 4];
        assert_eq!(s.read(&mut board, &mut buf).unwrap(), 4);
        assert_eq!(s.state(), SessionState::Transferring);
        assert_eq!(s.read(&mut board, &mut buf).unwrap(), 4);
        assert_eq!(s.read(&mut board, &mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"89");
        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(s.read(&mut board, &mut buf).unwrap(), 0);
        assert_eq!(s.write(&mut board, b"x"), Err(Error::WrongDirection));
    }

    #[test]
    fn test_binary_read_reads_each_register_once() {
        let mut board = MockBoard::new();
        for i in 0..8 {
            board.fpga[i] = 0x0101_0101 * i as u32;
        }
        let range = fpga_window(&board).resolve(0, 32).unwrap();
        let mut s = Session::memory_read(CommandKind::Fpga, TransferMode::Binary, range);

        // odd block size splits registers across blocks
        let mut out = Vec::new();
        let mut buf = [0u8; 6];
        loop {
            let n = s.read(&mut board, &mut buf).unwrap();
            out.extend_from_slice(&buf[..n]);
            if n < buf.len() {
                break;
            }
        }
        assert_eq!(out.len(), 32);
        assert_eq!(&out[4..8], &[1, 1, 1, 1]);
        assert_eq!(&out[28..32], &[7, 7, 7, 7]);
        assert_eq!(board.reads, 8);
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_text_read() {
        let mut board = MockBoard::new();
        board.fpga[4] = 0xDEAD_BEEF;
        board.fpga[8] = 0xCAFE;
        let range = fpga_window(&board).resolve(0x10, 0x14).unwrap();
        let mut s = Session::memory_read(CommandKind::Fpga, TransferMode::Text, range);
        let expected = "00000010: deadbeef 00000000 00000000 00000000\n00000020: 0000cafe\n";
        assert_eq!(s.transfer_size(), Some(expected.len() as u64));

        let mut buf = [0u8; 512];
        let n = s.read(&mut board, &mut buf).unwrap();
        assert_eq!(core::str::from_utf8(&buf[..n]).unwrap(), expected);
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_exact_fit_then_empty_block() {
        let mut board = MockBoard::new();
        let range = fpga_window(&board).resolve(0, 8).unwrap();
        let mut s = Session::memory_read(CommandKind::Fpga, TransferMode::Binary, range);
        let mut buf = [0u8; 8];
        assert_eq!(s.read(&mut board, &mut buf).unwrap(), 8);
        assert_eq!(s.state(), SessionState::Completed);
        assert_eq!(s.read(&mut board, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_read_bus_error_aborts() {
        let mut board = MockBoard::new();
        // window larger than the board's backing store
        let range = Window::space(Space::Fpga, 0x2000).resolve(0xFFC, 8).unwrap();
        let mut s = Session::memory_read(CommandKind::Fpga, TransferMode::Binary, range);
        let mut buf = [0u8; 16];
        assert!(matches!(
            s.read(&mut board, &mut buf),
            Err(Error::Bus { .. })
        ));
        assert_eq!(s.state(), SessionState::Aborted);
        assert_eq!(s.read(&mut board, &mut buf), Err(Error::Aborted));
    }

    #[test]
    fn test_fixed_write_overflow_not_applied() {
        let mut board = MockBoard::new();
        let window = fpga_window(&board);
        let range = window.resolve(0x20, 8).unwrap();
        let mut s =
            Session::memory_write(CommandKind::Fpga, TransferMode::Binary, window, range, true);

        s.write(&mut board, &[1, 2, 3, 4]).unwrap();
        assert_eq!(board.fpga[8], 0x0102_0304);
        let err = s.write(&mut board, &[5, 6, 7, 8, 9]).unwrap_err();
        assert!(matches!(err, Error::OutOfRange { .. }));
        assert_eq!(board.fpga[9], 0);
        assert_eq!(s.state(), SessionState::Aborted);
        assert_eq!(s.close(&mut board), Err(Error::Aborted));
    }

    #[test]
    fn test_deferred_write_grows_range() {
        let mut board = MockBoard::new();
        board.fpga[0x42] = 0xAAAA_AAAA;
        let window = fpga_window(&board);
        let range = window.resolve_start(0x100).unwrap();
        let mut s =
            Session::memory_write(CommandKind::Fpga, TransferMode::Binary, window, range, false);

        s.write(&mut board, &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]).unwrap();
        assert_eq!(s.range().unwrap().length(), 12);
        assert_eq!(board.fpga[0x40], 0x0001_0203);
        assert_eq!(board.fpga[0x41], 0x0405_0607);
        assert_eq!(board.fpga[0x42], 0x0809_AAAA);
        s.close(&mut board).unwrap();
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn test_deferred_write_past_window() {
        let mut board = MockBoard::new();
        let window = fpga_window(&board);
        let range = window.resolve_start(0xFF8).unwrap();
        let mut s =
            Session::memory_write(CommandKind::Fpga, TransferMode::Binary, window, range, false);
        s.write(&mut board, &[1; 8]).unwrap();
        let writes = board.writes;
        assert!(s.write(&mut board, &[2; 4]).is_err());
        assert_eq!(board.writes, writes);
        assert_eq!(s.state(), SessionState::Aborted);
    }

    #[test]
    fn test_text_write() {
        let mut board = MockBoard::new();
        let window = fpga_window(&board);
        let range = window.resolve_start(0).unwrap();
        let mut s =
            Session::memory_write(CommandKind::Fpga, TransferMode::Text, window, range, false);

        s.write(&mut board, b"00000000: 11223344 556").unwrap();
        assert_eq!(board.fpga[0], 0x1122_3344);
        s.write(&mut board, b"67788").unwrap();
        s.close(&mut board).unwrap();
        assert_eq!(board.fpga[1], 0x5566_7788);
    }

    #[test]
    fn test_text_write_malformed_untouched() {
        let mut board = MockBoard::new();
        let window = fpga_window(&board);
        let range = window.resolve_start(0).unwrap();
        let mut s =
            Session::memory_write(CommandKind::Fpga, TransferMode::Text, window, range, false);
        assert_eq!(
            s.write(&mut board, b"11223344 nothex "),
            Err(Error::Parse(ParseFailure::InvalidText))
        );
        assert_eq!(board.writes, 0);
        assert_eq!(s.state(), SessionState::Aborted);
    }

    #[test]
    fn test_abort_consumes_session() {
        let mut board = MockBoard::new();
        let range = fpga_window(&board).resolve(0, 4).unwrap();
        let s = Session::memory_read(CommandKind::Fpga, TransferMode::Binary, range);
        assert_eq!(s.abort(), SessionState::Aborted);
        assert_eq!(board.reads, 0);

        let mut buf = [0u8; 4];
        let mut done = Session::content(CommandKind::Help, TransferMode::Text, Cow::Borrowed(b""));
        assert_eq!(done.read(&mut board, &mut buf).unwrap(), 0);
        assert_eq!(done.abort(), SessionState::Completed);
    }

    #[test]
    fn test_write_after_close() {
        let mut board = MockBoard::new();
        let window = fpga_window(&board);
        let range = window.resolve(0, 4).unwrap();
        let mut s =
            Session::memory_write(CommandKind::Fpga, TransferMode::Binary, window, range, true);
        s.write(&mut board, &[1, 2, 3, 4]).unwrap();
        s.close(&mut board).unwrap();

        let writes = board.writes;
        assert_eq!(s.write(&mut board, &[5; 4]), Err(Error::Completed));
        assert_eq!(board.writes, writes);
        assert_eq!(s.state(), SessionState::Completed);
    }
}
