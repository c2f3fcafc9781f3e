//! Board trait definitions

use core::fmt;

use alloc::boxed::Box;

use crate::error::Result;

/// Address spaces that can be accessed through TAPCP
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Space {
    /// FPGA (AXI/Wishbone) address space; gateware devices live here
    Fpga,
    /// CPU address space
    Cpu,
}

impl Space {
    /// Short lowercase name, matching the TAPCP command name
    pub fn name(&self) -> &'static str {
        match self {
            Space::Fpga => "fpga",
            Space::Cpu => "cpu",
        }
    }
}

impl fmt::Display for Space {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Register access and sensor primitives of a board
///
/// Offsets passed to [`read32`](Board::read32) and
/// [`write32`](Board::write32) are always 4-byte aligned and lie inside
/// `space_size(space)`; the command layer validates every range before it
/// touches the board.
///
/// Register values are plain `u32`s. On the wire a register is sent in
/// network byte order, so the byte at the lowest offset of a register is its
/// most significant byte.
pub trait Board {
    /// Size of an address space in bytes
    fn space_size(&self, space: Space) -> u64;

    /// Read the 32-bit register at `offset`
    fn read32(&mut self, space: Space, offset: u32) -> Result<u32>;

    /// Write the 32-bit register at `offset`
    fn write32(&mut self, space: Space, offset: u32, value: u32) -> Result<()>;

    /// Current FPGA die temperature in degrees Celsius
    fn temperature(&mut self) -> Result<f32>;
}

impl<B: Board + ?Sized> Board for &mut B {
    fn space_size(&self, space: Space) -> u64 {
        (**self).space_size(space)
    }

    fn read32(&mut self, space: Space, offset: u32) -> Result<u32> {
        (**self).read32(space, offset)
    }

    fn write32(&mut self, space: Space, offset: u32, value: u32) -> Result<()> {
        (**self).write32(space, offset, value)
    }

    fn temperature(&mut self) -> Result<f32> {
        (**self).temperature()
    }
}

impl<B: Board + ?Sized> Board for Box<B> {
    fn space_size(&self, space: Space) -> u64 {
        (**self).space_size(space)
    }

    fn read32(&mut self, space: Space, offset: u32) -> Result<u32> {
        (**self).read32(space, offset)
    }

    fn write32(&mut self, space: Space, offset: u32, value: u32) -> Result<()> {
        (**self).write32(space, offset, value)
    }

    fn temperature(&mut self) -> Result<f32> {
        (**self).temperature()
    }
}
