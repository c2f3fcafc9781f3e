//! Board abstraction
//!
//! A board exposes the address spaces reachable through TAPCP and the FPGA
//! temperature sensor. Implementations only have to provide aligned 32-bit
//! register accesses; the byte-level helpers in this module build arbitrary
//! spans on top of them.

mod access;
mod traits;

#[cfg(test)]
pub(crate) mod mock;

pub use access::{read_words, write_bytes};
pub use traits::{Board, Space};
