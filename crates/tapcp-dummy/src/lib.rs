//! tapcp-dummy - In-memory board emulator for testing
//!
//! This crate provides a dummy board whose FPGA and CPU address spaces are
//! plain memory and whose temperature sensor returns a fixed value. It's
//! useful for testing and development without real hardware.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

use alloc::vec;
use alloc::vec::Vec;

use tapcp_core::error::{Error, Result};
use tapcp_core::{Board, Space};

/// Configuration for the dummy board
#[derive(Debug, Clone)]
pub struct DummyConfig {
    /// FPGA address space size in bytes
    pub fpga_size: u32,
    /// CPU address space size in bytes
    pub cpu_size: u32,
    /// Temperature reported by the sensor, `None` for a failed sensor
    pub temperature: Option<f32>,
}

impl Default for DummyConfig {
    fn default() -> Self {
        Self {
            fpga_size: 1024 * 1024,
            cpu_size: 64 * 1024,
            temperature: Some(45.5),
        }
    }
}

/// Dummy board
///
/// Emulates the register spaces of a board in memory. Registers are
/// word-addressed and start out zeroed.
pub struct DummyBoard {
    config: DummyConfig,
    fpga: Vec<u32>,
    cpu: Vec<u32>,
    reads: usize,
    writes: usize,
}

impl DummyBoard {
    /// Create a new dummy board with the given configuration
    pub fn new(config: DummyConfig) -> Self {
        let fpga = vec![0; config.fpga_size as usize / 4];
        let cpu = vec![0; config.cpu_size as usize / 4];
        Self {
            config,
            fpga,
            cpu,
            reads: 0,
            writes: 0,
        }
    }

    /// Create a new dummy board with the default configuration
    pub fn new_default() -> Self {
        Self::new(DummyConfig::default())
    }

    /// Create a dummy board with a pre-filled FPGA space
    ///
    /// `image` is in network byte order, as an octet `fpga` read would
    /// return it. A trailing partial register is zero padded.
    pub fn with_fpga_image(config: DummyConfig, image: &[u8]) -> Self {
        let mut board = Self::new(config);
        for (word, chunk) in board.fpga.iter_mut().zip(image.chunks(4)) {
            let mut bytes = [0u8; 4];
            bytes[..chunk.len()].copy_from_slice(chunk);
            *word = u32::from_be_bytes(bytes);
        }
        if image.len() > board.fpga.len() * 4 {
            log::warn!(
                "dummy: FPGA image truncated from {} to {} bytes",
                image.len(),
                board.fpga.len() * 4
            );
        }
        board
    }

    /// Get the configuration
    pub fn config(&self) -> &DummyConfig {
        &self.config
    }

    /// Get the registers of an address space
    pub fn words(&self, space: Space) -> &[u32] {
        match space {
            Space::Fpga => &self.fpga,
            Space::Cpu => &self.cpu,
        }
    }

    /// Get mutable access to the registers of an address space
    pub fn words_mut(&mut self, space: Space) -> &mut [u32] {
        match space {
            Space::Fpga => &mut self.fpga,
            Space::Cpu => &mut self.cpu,
        }
    }

    /// Change the temperature the sensor reports
    pub fn set_temperature(&mut self, temperature: Option<f32>) {
        self.config.temperature = temperature;
    }

    /// Number of register reads performed so far
    pub fn reads(&self) -> usize {
        self.reads
    }

    /// Number of register writes performed so far
    pub fn writes(&self) -> usize {
        self.writes
    }

    fn index(&self, space: Space, offset: u32) -> Result<usize> {
        let index = offset as usize / 4;
        if offset % 4 != 0 || index >= self.words(space).len() {
            return Err(Error::Bus { space, offset });
        }
        Ok(index)
    }
}

impl Board for DummyBoard {
    fn space_size(&self, space: Space) -> u64 {
        self.words(space).len() as u64 * 4
    }

    fn read32(&mut self, space: Space, offset: u32) -> Result<u32> {
        let index = self.index(space, offset)?;
        self.reads += 1;
        Ok(self.words(space)[index])
    }

    fn write32(&mut self, space: Space, offset: u32, value: u32) -> Result<()> {
        let index = self.index(space, offset)?;
        self.writes += 1;
        self.words_mut(space)[index] = value;
        Ok(())
    }

    fn temperature(&mut self) -> Result<f32> {
        self.config.temperature.ok_or(Error::Sensor)
    }
}
