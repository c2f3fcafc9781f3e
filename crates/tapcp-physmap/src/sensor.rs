//! FPGA die temperature from an IIO sysfs channel
//!
//! The Xilinx XADC/SYSMON drivers expose the die sensor as an IIO device
//! under `/sys/bus/iio/devices/iio:deviceN`. The value in millidegrees
//! Celsius is `(in_temp0_raw + in_temp0_offset) * in_temp0_scale`.

use std::path::{Path, PathBuf};

use crate::error::{PhysmapError, Result};

/// IIO temperature channel
#[derive(Debug, Clone)]
pub struct IioTemperature {
    dir: PathBuf,
}

impl IioTemperature {
    /// Use the IIO device directory `dir`
    ///
    /// Fails if the directory has no `in_temp0_raw` attribute.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self> {
        let sensor = Self { dir: dir.into() };
        sensor.read_attr("in_temp0_raw")?;
        Ok(sensor)
    }

    /// Directory of the IIO device
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Sample the sensor, in degrees Celsius
    pub fn read_celsius(&self) -> Result<f32> {
        let raw = self.read_attr("in_temp0_raw")?;
        let offset = self.read_optional_attr("in_temp0_offset")?.unwrap_or(0.0);
        let scale = self.read_optional_attr("in_temp0_scale")?.unwrap_or(1.0);
        Ok(((raw + offset) * scale / 1000.0) as f32)
    }

    fn read_attr(&self, name: &str) -> Result<f64> {
        let path = self.dir.join(name);
        let content = std::fs::read_to_string(&path).map_err(|e| PhysmapError::SysfsRead {
            path: path.display().to_string(),
            source: e,
        })?;
        let value = content.trim();
        value.parse::<f64>().map_err(|_| PhysmapError::SysfsParse {
            path: path.display().to_string(),
            value: value.to_string(),
        })
    }

    fn read_optional_attr(&self, name: &str) -> Result<Option<f64>> {
        if self.dir.join(name).exists() {
            self.read_attr(name).map(Some)
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_celsius() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("in_temp0_raw"), "2620\n").unwrap();
        fs::write(dir.path().join("in_temp0_offset"), "-2219\n").unwrap();
        fs::write(dir.path().join("in_temp0_scale"), "123.040771484\n").unwrap();

        let sensor = IioTemperature::open(dir.path()).unwrap();
        let celsius = sensor.read_celsius().unwrap();
        assert!((celsius - 49.339).abs() < 0.01, "got {}", celsius);
    }

    #[test]
    fn test_optional_attrs() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("in_temp0_raw"), "42000").unwrap();
        let sensor = IioTemperature::open(dir.path()).unwrap();
        assert_eq!(sensor.read_celsius().unwrap(), 42.0);
    }

    #[test]
    fn test_errors() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            IioTemperature::open(dir.path()),
            Err(PhysmapError::SysfsRead { .. })
        ));

        fs::write(dir.path().join("in_temp0_raw"), "hot").unwrap();
        assert!(matches!(
            IioTemperature::open(dir.path()),
            Err(PhysmapError::SysfsParse { .. })
        ));
    }
}
