//! Address range resolution
//!
//! Every memory command resolves to an [`AddressRange`] inside a [`Window`]:
//! the whole FPGA or CPU space for `fpga`/`cpu`, or the extent of one
//! gateware device for `dev`. Requested spans are widened to the enclosing
//! 4-byte aligned range so the board only sees whole-register accesses.

use crate::board::Space;
use crate::error::{Error, Result};
use crate::registry::DeviceDescriptor;

/// Register width; ranges are aligned to this
pub const WORD_SIZE: u32 = 4;

/// Widen `(offset, length)` to the minimal enclosing 4-byte aligned span
///
/// Returns the aligned offset and length. The length is computed in 64 bits
/// so spans touching the top of the 32-bit space do not overflow.
pub fn align(offset: u32, length: u64) -> (u32, u64) {
    let start = offset & !(WORD_SIZE - 1);
    let end = (offset as u64 + length + (WORD_SIZE as u64 - 1)) & !(WORD_SIZE as u64 - 1);
    (start, end - start as u64)
}

/// The part of an address space a command may reach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Window {
    space: Space,
    base: u32,
    size: u64,
    space_size: u64,
}

impl Window {
    /// Window covering a whole address space
    pub fn space(space: Space, space_size: u64) -> Self {
        Self {
            space,
            base: 0,
            size: space_size,
            space_size,
        }
    }

    /// Window covering one gateware device in the FPGA space
    pub fn device(dev: &DeviceDescriptor, fpga_size: u64) -> Self {
        Self {
            space: Space::Fpga,
            base: dev.offset,
            size: dev.length as u64,
            space_size: fpga_size,
        }
    }

    fn out_of_range(&self, offset: u32, length: u64) -> Error {
        Error::OutOfRange {
            offset,
            length,
            bound: self.size,
        }
    }

    /// Resolve a window-relative span into a validated aligned range
    pub fn resolve(&self, offset: u32, length: u64) -> Result<AddressRange> {
        let (start, aligned_len) = align(offset, length);
        let end = start as u64 + aligned_len;

        if end > self.size
            || self.base as u64 + end > self.space_size
            || aligned_len > u32::MAX as u64
        {
            return Err(self.out_of_range(offset, length));
        }

        Ok(AddressRange {
            space: self.space,
            base: self.base,
            offset: start,
            length: aligned_len as u32,
        })
    }

    /// Resolve the start of a write whose length is not known yet
    ///
    /// The returned range is empty; it grows as data arrives and is
    /// re-resolved against this window for every block.
    pub fn resolve_start(&self, offset: u32) -> Result<AddressRange> {
        let start = offset & !(WORD_SIZE - 1);
        if start as u64 >= self.size || self.base as u64 + start as u64 >= self.space_size {
            return Err(self.out_of_range(offset, 0));
        }
        Ok(AddressRange {
            space: self.space,
            base: self.base,
            offset: start,
            length: 0,
        })
    }
}

/// A validated, 4-byte aligned byte range in an address space
///
/// Only [`Window`] constructs ranges, so `offset` and `length` are always
/// multiples of 4 and the range always fits its window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddressRange {
    space: Space,
    base: u32,
    offset: u32,
    length: u32,
}

impl AddressRange {
    /// Address space of this range
    pub fn space(&self) -> Space {
        self.space
    }

    /// Start offset relative to the window (device or space)
    pub fn offset(&self) -> u32 {
        self.offset
    }

    /// Length in bytes
    pub fn length(&self) -> u32 {
        self.length
    }

    /// Absolute start address in the address space
    pub fn address(&self) -> u32 {
        self.base.wrapping_add(self.offset)
    }

    /// Number of registers covered
    pub fn words(&self) -> u32 {
        self.length / WORD_SIZE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn adc() -> DeviceDescriptor {
        DeviceDescriptor::new("adc", 0x1000, 0x100, "xps:bram")
    }

    #[test]
    fn test_align() {
        assert_eq!(align(0x10, 7), (0x10, 8));
        assert_eq!(align(0x12, 4), (0x10, 8));
        assert_eq!(align(0x100, 10), (0x100, 12));
        assert_eq!(align(0x13, 1), (0x10, 4));
        assert_eq!(align(0x10, 0), (0x10, 0));
        assert_eq!(align(0xFFFF_FFFF, 1), (0xFFFF_FFFC, 4));
    }

    #[test]
    fn test_align_is_minimal_superset() {
        for offset in 0u32..16 {
            for length in 0u64..16 {
                let (start, len) = align(offset, length);
                assert_eq!(start % 4, 0);
                assert_eq!(len % 4, 0);
                assert!(start <= offset);
                assert!(start as u64 + len >= offset as u64 + length);
                // shrinking either end by a word would drop requested bytes
                assert!(start + 4 > offset);
                assert!(start as u64 + len < offset as u64 + length + 4);
            }
        }
    }

    #[test]
    fn test_resolve_device() {
        let w = Window::device(&adc(), 0x10_0000);
        let r = w.resolve(0x10, 7).unwrap();
        assert_eq!(r.offset(), 0x10);
        assert_eq!(r.length(), 8);
        assert_eq!(r.address(), 0x1010);
        assert_eq!(r.space(), Space::Fpga);

        let r = w.resolve(0x12, 4).unwrap();
        assert_eq!((r.offset(), r.length()), (0x10, 8));

        assert!(w.resolve(0xFC, 4).is_ok());
        assert!(matches!(
            w.resolve(0xFC, 5),
            Err(Error::OutOfRange { bound: 0x100, .. })
        ));
        assert!(w.resolve(0x100, 4).is_err());
    }

    #[test]
    fn test_resolve_device_past_space() {
        // device claims more than the board's FPGA space holds
        let w = Window::device(&adc(), 0x1080);
        assert!(w.resolve(0, 0x80).is_ok());
        assert!(w.resolve(0, 0x84).is_err());
    }

    #[test]
    fn test_resolve_full_space() {
        let w = Window::space(Space::Cpu, 1 << 32);
        let r = w.resolve(0xFFFF_FFFC, 4).unwrap();
        assert_eq!(r.address(), 0xFFFF_FFFC);
        assert!(w.resolve(0xFFFF_FFFC, 5).is_err());
        assert!(w.resolve(0, u32::MAX as u64 + 1).is_err());
    }

    #[test]
    fn test_resolve_start() {
        let w = Window::space(Space::Fpga, 0x400);
        let r = w.resolve_start(0x102).unwrap();
        assert_eq!((r.offset(), r.length()), (0x100, 0));
        assert!(w.resolve_start(0x3FC).is_ok());
        assert!(w.resolve_start(0x400).is_err());
    }
}
