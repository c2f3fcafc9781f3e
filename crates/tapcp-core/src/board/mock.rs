//! Minimal in-crate board for unit tests

use alloc::vec;
use alloc::vec::Vec;

use super::{Board, Space};
use crate::error::{Error, Result};

pub(crate) struct MockBoard {
    pub fpga: Vec<u32>,
    pub cpu: Vec<u32>,
    pub temperature: Option<f32>,
    pub reads: usize,
    pub writes: usize,
}

impl MockBoard {
    pub fn new() -> Self {
        Self {
            fpga: vec![0; 0x400],
            cpu: vec![0; 0x100],
            temperature: Some(42.37),
            reads: 0,
            writes: 0,
        }
    }

    fn words(&mut self, space: Space) -> &mut Vec<u32> {
        match space {
            Space::Fpga => &mut self.fpga,
            Space::Cpu => &mut self.cpu,
        }
    }
}

impl Board for MockBoard {
    fn space_size(&self, space: Space) -> u64 {
        let words = match space {
            Space::Fpga => self.fpga.len(),
            Space::Cpu => self.cpu.len(),
        };
        words as u64 * 4
    }

    fn read32(&mut self, space: Space, offset: u32) -> Result<u32> {
        self.reads += 1;
        self.words(space)
            .get(offset as usize / 4)
            .copied()
            .ok_or(Error::Bus { space, offset })
    }

    fn write32(&mut self, space: Space, offset: u32, value: u32) -> Result<()> {
        self.writes += 1;
        let slot = self
            .words(space)
            .get_mut(offset as usize / 4)
            .ok_or(Error::Bus { space, offset })?;
        *slot = value;
        Ok(())
    }

    fn temperature(&mut self) -> Result<f32> {
        self.temperature.ok_or(Error::Sensor)
    }
}
