//! Diagnostic providers for `help`, `listdev`, and `temp`
//!
//! These commands are read-only. Their whole content is produced when the
//! transfer is opened; the session then streams it out block by block.

use alloc::borrow::Cow;
use alloc::vec::Vec;

use crate::board::Board;
use crate::codec;
use crate::error::{Error, Result};
use crate::registry::DeviceRegistry;
use crate::session::TransferMode;

/// Text returned by `help`, identical in both transfer modes
pub const HELP_TEXT: &str = "\
Available commands:
  help    - this message
  listdev - list FPGA device info
  temp    - get FPGA temperature
  dev/DEVNAME[/OFFSET[/LENGTH]] - access DEVNAME
  fpga/OFFSET[/LENGTH] - access FPGA memory space
  cpu/OFFSET[/LENGTH]  - access CPU memory space
";

/// Content of `help`
pub fn help() -> Cow<'static, [u8]> {
    Cow::Borrowed(HELP_TEXT.as_bytes())
}

/// Content of `listdev`: a table in text mode, the compiled listing in
/// binary mode
pub fn listdev(registry: &DeviceRegistry, mode: TransferMode) -> Cow<'static, [u8]> {
    let content = match mode {
        TransferMode::Text => codec::format_device_table(registry).into_bytes(),
        TransferMode::Binary => registry.to_compiled(),
    };
    Cow::Owned(content)
}

/// Content of `temp`, sampled once
///
/// Text mode is the temperature rounded down to a tenth of a degree; binary
/// mode is the raw value as a big-endian IEEE-754 single.
pub fn temp<B: Board + ?Sized>(board: &mut B, mode: TransferMode) -> Result<Cow<'static, [u8]>> {
    let celsius = board.temperature()?;
    if !celsius.is_finite() {
        log::warn!("temperature sensor returned {}", celsius);
        return Err(Error::Sensor);
    }
    log::debug!("temp: {} C", celsius);

    let content: Vec<u8> = match mode {
        TransferMode::Text => codec::format_temperature(celsius).into_bytes(),
        TransferMode::Binary => celsius.to_be_bytes().to_vec(),
    };
    Ok(Cow::Owned(content))
}
