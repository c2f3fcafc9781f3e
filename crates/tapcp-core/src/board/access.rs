//! Byte and word level access built on aligned register operations

use super::{Board, Space};
use crate::error::Result;

/// Read consecutive registers starting at the aligned `offset`
pub fn read_words<B: Board + ?Sized>(
    board: &mut B,
    space: Space,
    offset: u32,
    words: &mut [u32],
) -> Result<()> {
    debug_assert!(offset & 3 == 0, "unaligned register read");
    let mut addr = offset;
    for word in words.iter_mut() {
        *word = board.read32(space, addr)?;
        addr = addr.wrapping_add(4);
    }
    Ok(())
}

/// Write an arbitrary byte span in network byte order
///
/// Registers only partially covered by `data` are read, merged, and written
/// back, so the bytes outside the span keep their previous contents.
pub fn write_bytes<B: Board + ?Sized>(
    board: &mut B,
    space: Space,
    offset: u32,
    data: &[u8],
) -> Result<()> {
    let mut addr = offset;
    let mut done = 0;

    while done < data.len() {
        let word_addr = addr & !3;
        let skip = (addr - word_addr) as usize;
        let n = core::cmp::min(4 - skip, data.len() - done);

        let mut bytes = if n == 4 {
            [0u8; 4]
        } else {
            log::trace!("{}: read-modify-write at 0x{:08X}", space, word_addr);
            board.read32(space, word_addr)?.to_be_bytes()
        };
        bytes[skip..skip + n].copy_from_slice(&data[done..done + n]);
        board.write32(space, word_addr, u32::from_be_bytes(bytes))?;

        done += n;
        addr = addr.wrapping_add(n as u32);
    }

    Ok(())
}
