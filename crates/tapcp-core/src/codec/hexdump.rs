//! Hex dump rendering for netascii memory reads
//!
//! One row per four registers, prefixed by the window offset of the row:
//!
//! ```text
//! 00000010: deadbeef 00000001 00000002 00000003
//! 00000020: 0000cafe
//! ```

use alloc::vec::Vec;
use core::fmt::Write;

/// Registers per hex dump row
pub const WORDS_PER_ROW: usize = 4;

/// "oooooooo:"
const ROW_PREFIX_LEN: u64 = 9;
/// " wwwwwwww"
const WORD_COLUMN_LEN: u64 = 9;

struct ByteSink<'a>(&'a mut Vec<u8>);

impl Write for ByteSink<'_> {
    fn write_str(&mut self, s: &str) -> core::fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

/// Append one hex dump row for `words` starting at window offset `offset`
pub fn render_row(out: &mut Vec<u8>, offset: u32, words: &[u32]) {
    debug_assert!(words.len() <= WORDS_PER_ROW);
    let mut sink = ByteSink(out);
    // ByteSink never fails
    let _ = write!(sink, "{:08x}:", offset);
    for word in words {
        let _ = write!(sink, " {:08x}", word);
    }
    sink.0.push(b'\n');
}

/// Exact size of the hex dump of `words` registers
pub fn dump_len(words: u32) -> u64 {
    let rows = (words as u64).div_ceil(WORDS_PER_ROW as u64);
    rows * (ROW_PREFIX_LEN + 1) + words as u64 * WORD_COLUMN_LEN
}
