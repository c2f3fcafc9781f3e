//! Memory-mapped board implementation

use std::path::PathBuf;

use log::{debug, info, warn};
use tapcp_core::error::Error;
use tapcp_core::{Board, Space};

use crate::error::{PhysmapError, Result};
use crate::physmap::PhysMap;
use crate::sensor::IioTemperature;

/// Configuration for a memory-mapped board
#[derive(Debug, Clone, Default)]
pub struct PhysBoardConfig {
    /// Physical address of the FPGA bus bridge
    pub fpga_base: u64,
    /// Size of the FPGA address space in bytes
    pub fpga_size: u32,
    /// Physical address and size of the CPU window, if exposed
    pub cpu: Option<(u64, u32)>,
    /// IIO device directory of the die temperature sensor
    pub temp_dir: Option<PathBuf>,
}

/// Board whose address spaces are windows of physical memory
pub struct PhysBoard {
    fpga: PhysMap,
    cpu: Option<PhysMap>,
    sensor: Option<IioTemperature>,
}

impl PhysBoard {
    /// Map the windows described by `config`
    pub fn open(config: &PhysBoardConfig) -> Result<Self> {
        let fpga = PhysMap::new(config.fpga_base, config.fpga_size as usize)?;
        let cpu = match config.cpu {
            Some((base, size)) => Some(PhysMap::new(base, size as usize)?),
            None => None,
        };
        let sensor = match &config.temp_dir {
            Some(dir) => Some(IioTemperature::open(dir.clone())?),
            None => None,
        };

        info!(
            "physmap: FPGA {:#x}+{:#x}, CPU {}, sensor {}",
            config.fpga_base,
            config.fpga_size,
            config
                .cpu
                .map(|(base, size)| format!("{:#x}+{:#x}", base, size))
                .unwrap_or_else(|| "none".to_string()),
            sensor
                .as_ref()
                .map(|s| s.dir().display().to_string())
                .unwrap_or_else(|| "none".to_string()),
        );

        Ok(Self { fpga, cpu, sensor })
    }

    fn map(&self, space: Space, offset: u32) -> core::result::Result<&PhysMap, Error> {
        let map = match space {
            Space::Fpga => Some(&self.fpga),
            Space::Cpu => self.cpu.as_ref(),
        };
        match map {
            Some(map) if register_in_window(offset, map.len()) => Ok(map),
            _ => Err(Error::Bus { space, offset }),
        }
    }
}

/// Whether a 32-bit register at `offset` lies in a window of `len` bytes
fn register_in_window(offset: u32, len: usize) -> bool {
    offset % 4 == 0 && (offset as usize).checked_add(4).is_some_and(|end| end <= len)
}

impl Board for PhysBoard {
    fn space_size(&self, space: Space) -> u64 {
        match space {
            Space::Fpga => self.fpga.len() as u64,
            Space::Cpu => self.cpu.as_ref().map_or(0, |m| m.len() as u64),
        }
    }

    fn read32(&mut self, space: Space, offset: u32) -> tapcp_core::Result<u32> {
        Ok(self.map(space, offset)?.read32(offset as usize))
    }

    fn write32(&mut self, space: Space, offset: u32, value: u32) -> tapcp_core::Result<()> {
        self.map(space, offset)?.write32(offset as usize, value);
        Ok(())
    }

    fn temperature(&mut self) -> tapcp_core::Result<f32> {
        let sensor = self.sensor.as_ref().ok_or(Error::Sensor)?;
        sensor.read_celsius().map_err(|e| {
            warn!("physmap: {}", e);
            Error::Sensor
        })
    }
}

/// Parse a decimal or `0x`-prefixed hexadecimal number
fn parse_number(name: &'static str, value: &str) -> Result<u64> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u64::from_str_radix(hex, 16),
        None => value.parse::<u64>(),
    };
    parsed.map_err(|_| PhysmapError::InvalidParameter {
        name,
        message: format!("'{}' is not a valid number", value),
    })
}

fn parse_size(name: &'static str, value: &str) -> Result<u32> {
    let size = parse_number(name, value)?;
    u32::try_from(size).map_err(|_| PhysmapError::InvalidParameter {
        name,
        message: format!("{:#x} does not fit a 32-bit address space", size),
    })
}

/// Parse board options from key-value pairs
///
/// # Supported options
/// - `fpga=ADDR` - physical address of the FPGA bus bridge (required)
/// - `fpga_size=N` - size of the FPGA address space (required)
/// - `cpu=ADDR` - physical address of the CPU window
/// - `cpu_size=N` - size of the CPU window (required with `cpu`)
/// - `temp=DIR` - IIO device directory of the temperature sensor
///
/// # Example
/// ```ignore
/// let options = &[("fpga", "0x40000000"), ("fpga_size", "0x1000000")];
/// let config = parse_options(options)?;
/// ```
pub fn parse_options(options: &[(&str, &str)]) -> Result<PhysBoardConfig> {
    let mut fpga_base = None;
    let mut fpga_size = None;
    let mut cpu_base = None;
    let mut cpu_size = None;
    let mut temp_dir = None;

    for (key, value) in options {
        match *key {
            "fpga" => fpga_base = Some(parse_number("fpga", value)?),
            "fpga_size" => fpga_size = Some(parse_size("fpga_size", value)?),
            "cpu" => cpu_base = Some(parse_number("cpu", value)?),
            "cpu_size" => cpu_size = Some(parse_size("cpu_size", value)?),
            "temp" => temp_dir = Some(PathBuf::from(value)),
            _ => {
                warn!("Unknown physmap option: {}={}", key, value);
            }
        }
    }

    let cpu = match (cpu_base, cpu_size) {
        (Some(base), Some(size)) => Some((base, size)),
        (None, None) => None,
        (Some(_), None) => return Err(PhysmapError::MissingParameter("cpu_size")),
        (None, Some(_)) => return Err(PhysmapError::MissingParameter("cpu")),
    };

    let config = PhysBoardConfig {
        fpga_base: fpga_base.ok_or(PhysmapError::MissingParameter("fpga"))?,
        fpga_size: fpga_size.ok_or(PhysmapError::MissingParameter("fpga_size"))?,
        cpu,
        temp_dir,
    };
    debug!("physmap: {:?}", config);
    Ok(config)
}
