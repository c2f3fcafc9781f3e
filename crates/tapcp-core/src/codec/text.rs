//! Netascii text encodings

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::error::{ParseFailure, Result};
use crate::registry::DeviceRegistry;

/// Longest token carried over between blocks
const MAX_PENDING: usize = 64 * 1024;

fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn decode_token(token: &[u8], out: &mut Vec<u8>) -> Result<()> {
    // Row labels from a hex dump ("00000010:") carry no data
    if let Some(label) = token.strip_suffix(b":") {
        if label.is_empty() || !label.iter().all(u8::is_ascii_hexdigit) {
            return Err(ParseFailure::InvalidText.into());
        }
        return Ok(());
    }

    if token.len() % 2 != 0 {
        return Err(ParseFailure::InvalidText.into());
    }
    for pair in token.chunks(2) {
        match (hex_value(pair[0]), hex_value(pair[1])) {
            (Some(hi), Some(lo)) => out.push(hi << 4 | lo),
            _ => return Err(ParseFailure::InvalidText.into()),
        }
    }
    Ok(())
}

fn decode(text: &[u8]) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(text.len() / 2);
    for token in text
        .split(u8::is_ascii_whitespace)
        .filter(|t| !t.is_empty())
    {
        decode_token(token, &mut out)?;
    }
    Ok(out)
}

/// Incremental decoder for hex text written in netascii mode
///
/// Input is whitespace-separated tokens of an even number of hex digits,
/// most significant byte first. Tokens ending in `:` are row labels and are
/// skipped, so the output of a netascii read can be written back as is. A
/// token cut by a block boundary is held until the next block or
/// [`finish`](HexDecoder::finish).
#[derive(Debug, Default)]
pub struct HexDecoder {
    pending: Vec<u8>,
}

impl HexDecoder {
    /// Create an empty decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode every complete token of `input`
    ///
    /// Nothing is consumed on error.
    pub fn push(&mut self, input: &[u8]) -> Result<Vec<u8>> {
        let Some(split) = input.iter().rposition(u8::is_ascii_whitespace) else {
            if self.pending.len() + input.len() > MAX_PENDING {
                return Err(ParseFailure::InvalidText.into());
            }
            self.pending.extend_from_slice(input);
            return Ok(Vec::new());
        };

        let (complete, tail) = input.split_at(split + 1);
        let mut text = Vec::with_capacity(self.pending.len() + complete.len());
        text.extend_from_slice(&self.pending);
        text.extend_from_slice(complete);

        let bytes = decode(&text)?;
        self.pending.clear();
        self.pending.extend_from_slice(tail);
        Ok(bytes)
    }

    /// Decode the token still held at the end of the transfer
    pub fn finish(&mut self) -> Result<Vec<u8>> {
        let bytes = decode(&self.pending)?;
        self.pending.clear();
        Ok(bytes)
    }

    /// Whether a partial token is being held
    pub fn has_pending(&self) -> bool {
        !self.pending.is_empty()
    }
}

/// Render a temperature rounded down to a tenth of a degree
pub fn format_temperature(celsius: f32) -> String {
    let scaled = celsius * 10.0;
    let mut tenths = scaled as i64;
    if (tenths as f32) > scaled {
        tenths -= 1;
    }
    let sign = if tenths < 0 { "-" } else { "" };
    let abs = tenths.unsigned_abs();
    format!("{}{}.{}\n", sign, abs / 10, abs % 10)
}

/// Render the device registry as a table
pub fn format_device_table(registry: &DeviceRegistry) -> String {
    let name_width = registry
        .iter()
        .map(|d| d.name.len())
        .max()
        .unwrap_or(0)
        .max("NAME".len());

    let mut out = format!(
        "{:<width$}  {:<10}  {:<10}  TYPE\n",
        "NAME",
        "OFFSET",
        "LENGTH",
        width = name_width
    );
    for dev in registry.iter() {
        out.push_str(&format!(
            "{:<width$}  0x{:08x}  0x{:08x}  {}\n",
            dev.name,
            dev.offset,
            dev.length,
            dev.type_tag,
            width = name_width
        ));
    }
    out
}
