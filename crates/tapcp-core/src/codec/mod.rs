//! Wire encodings
//!
//! Octet transfers carry memory verbatim in network byte order. Netascii
//! transfers carry human-readable text: a hex dump for memory reads, hex
//! text for memory writes, and formatted tables and numbers for the
//! diagnostic commands.

mod hexdump;
mod text;

pub use hexdump::{dump_len, render_row, WORDS_PER_ROW};
pub use text::{format_device_table, format_temperature, HexDecoder};
