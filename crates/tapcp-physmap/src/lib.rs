//! tapcp-physmap - Memory-mapped register access for TAPCP
//!
//! This crate provides a [`tapcp_core::Board`] for Linux systems where the
//! FPGA fabric and CPU peripherals are reachable through physical memory,
//! such as Zynq and Zynq UltraScale+ boards.
//!
//! # Usage with tapcp CLI
//!
//! ```bash
//! # Read the board ID register through the FPGA bridge
//! tapcp --board physmap:fpga=0x40000000,fpga_size=0x1000000 get fpga/0
//!
//! # With the XADC temperature sensor
//! tapcp --board physmap:fpga=0x40000000,fpga_size=0x1000000,temp=/sys/bus/iio/devices/iio:device0 get temp
//! ```
//!
//! # System Requirements
//!
//! - Root access (or CAP_SYS_RAWIO) to open /dev/mem
//! - A kernel without `CONFIG_STRICT_DEVMEM` restrictions on the mapped ranges

pub mod board;
pub mod error;
pub mod physmap;
pub mod sensor;

pub use board::{parse_options, PhysBoard, PhysBoardConfig};
pub use error::{PhysmapError, Result};
pub use sensor::IioTemperature;
