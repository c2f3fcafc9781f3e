//! tapcp-core - TAPCP virtual filesystem command layer
//!
//! A TAPCP server is a TFTP server that exposes the memory spaces of an FPGA
//! board, plus a handful of diagnostic services, as a virtual filesystem.
//! The first path component of a transfer filename is a command, the rest
//! are its parameters:
//!
//! - `help` - list of commands
//! - `listdev` - devices of the running gateware design
//! - `temp` - FPGA temperature
//! - `dev/NAME[/OFFSET[/LENGTH]]` - memory of gateware device `NAME`
//! - `fpga/OFFSET[/LENGTH]` - FPGA (AXI/Wishbone) address space
//! - `cpu/OFFSET[/LENGTH]` - CPU address space
//!
//! This crate implements everything between the TFTP engine and the bus:
//! path parsing, command dispatch, range resolution, and the netascii/octet
//! encodings. The TFTP engine itself and the register access primitives are
//! supplied by the caller (see [`board::Board`]).
//!
//! # Example
//!
//! ```ignore
//! use tapcp_core::{Direction, Dispatcher, TransferMode};
//!
//! let dispatcher = Dispatcher::new(&registry);
//! let mut session = dispatcher.open(&mut board, "dev/adc/0x10/0x8", TransferMode::Binary, Direction::Read)?;
//! let mut block = [0u8; 512];
//! let n = session.read(&mut board, &mut block)?;
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

extern crate alloc;

#[cfg(feature = "std")]
extern crate std;

pub mod board;
pub mod codec;
pub mod command;
pub mod diag;
pub mod dispatch;
pub mod error;
pub mod path;
pub mod range;
pub mod registry;
pub mod session;

pub use board::{Board, Space};
pub use dispatch::Dispatcher;
pub use error::{Error, ParseFailure, Result};
pub use registry::{DeviceDescriptor, DeviceRegistry};
pub use session::{Direction, Session, SessionState, TransferMode};
