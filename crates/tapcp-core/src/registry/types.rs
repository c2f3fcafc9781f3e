//! Registry types

use core::fmt;

use alloc::string::String;
use alloc::vec::Vec;

/// A named device of the gateware design
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceDescriptor {
    /// Device name as used in `dev/NAME` paths
    pub name: String,
    /// Start of the device in the FPGA address space
    pub offset: u32,
    /// Size of the device in bytes
    pub length: u32,
    /// Block type, e.g. `xps:sw_reg` or `xps:bram`
    pub type_tag: String,
}

impl DeviceDescriptor {
    /// Create a new device descriptor
    pub fn new(
        name: impl Into<String>,
        offset: u32,
        length: u32,
        type_tag: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            offset,
            length,
            type_tag: type_tag.into(),
        }
    }

    /// Exclusive end of the device in the FPGA address space
    pub fn end(&self) -> u64 {
        self.offset as u64 + self.length as u64
    }
}

/// Registry errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// Device name is empty or contains `/` or whitespace
    InvalidName(String),
    /// Two devices share a name
    DuplicateName(String),
    /// Device offset is not 4-byte aligned
    Unaligned(String),
    /// Device extends past the 32-bit address space
    Overflow(String),
    /// Compiled listing is truncated or has a bad header
    Malformed,
    /// Compiled listing has an unsupported version
    UnsupportedVersion(u16),
    /// Device description could not be parsed
    ParseError(String),
    /// Device description could not be read
    IoError(String),
    /// More devices than the compiled listing can count
    TooManyDevices(usize),
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidName(name) => write!(f, "invalid device name '{}'", name),
            Self::DuplicateName(name) => write!(f, "duplicate device name '{}'", name),
            Self::Unaligned(name) => write!(f, "device '{}' is not 4-byte aligned", name),
            Self::Overflow(name) => {
                write!(f, "device '{}' extends past the address space", name)
            }
            Self::Malformed => write!(f, "malformed compiled device listing"),
            Self::UnsupportedVersion(v) => {
                write!(f, "unsupported compiled device listing version {}", v)
            }
            Self::ParseError(msg) => write!(f, "device description parse error: {}", msg),
            Self::IoError(msg) => write!(f, "failed to read device description: {}", msg),
            Self::TooManyDevices(n) => {
                write!(f, "{} devices exceed the limit of {}", n, MAX_DEVICES)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RegistryError {}

/// Most devices a registry can hold, bounded by the compiled listing count
pub const MAX_DEVICES: usize = u16::MAX as usize;

/// Immutable table of the devices of the running design
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<DeviceDescriptor>,
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name.len() <= u8::MAX as usize
        && !name.contains('/')
        && !name.chars().any(char::is_whitespace)
}

impl DeviceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a registry from a list of devices
    ///
    /// Devices keep the order they were given in, which is the order
    /// `listdev` reports them.
    pub fn from_devices(
        devices: impl IntoIterator<Item = DeviceDescriptor>,
    ) -> Result<Self, RegistryError> {
        let devices: Vec<DeviceDescriptor> = devices.into_iter().collect();
        if devices.len() > MAX_DEVICES {
            return Err(RegistryError::TooManyDevices(devices.len()));
        }

        for (i, dev) in devices.iter().enumerate() {
            if !is_valid_name(&dev.name) || dev.type_tag.len() > u8::MAX as usize {
                return Err(RegistryError::InvalidName(dev.name.clone()));
            }
            if dev.offset % 4 != 0 {
                return Err(RegistryError::Unaligned(dev.name.clone()));
            }
            if dev.end() > u32::MAX as u64 + 1 {
                return Err(RegistryError::Overflow(dev.name.clone()));
            }
            if devices[..i].iter().any(|other| other.name == dev.name) {
                return Err(RegistryError::DuplicateName(dev.name.clone()));
            }
        }

        log::debug!("device registry: {} devices", devices.len());
        Ok(Self { devices })
    }

    /// Find a device by name (exact match)
    pub fn find(&self, name: &str) -> Option<&DeviceDescriptor> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Iterate over all devices in listing order
    pub fn iter(&self) -> impl Iterator<Item = &DeviceDescriptor> {
        self.devices.iter()
    }

    /// Get the number of devices
    pub fn len(&self) -> usize {
        self.devices.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::format;

    #[test]
    fn test_find() {
        let reg = DeviceRegistry::from_devices([
            DeviceDescriptor::new("sys_board_id", 0x0, 4, "xps:sw_reg"),
            DeviceDescriptor::new("adc", 0x1000, 0x100, "xps:bram"),
        ])
        .unwrap();

        assert_eq!(reg.len(), 2);
        assert_eq!(reg.find("adc").unwrap().offset, 0x1000);
        assert!(reg.find("ADC").is_none());
        assert!(reg.find("nope").is_none());
    }

    #[test]
    fn test_validation() {
        let dup = DeviceRegistry::from_devices([
            DeviceDescriptor::new("a", 0, 4, "t"),
            DeviceDescriptor::new("a", 4, 4, "t"),
        ]);
        assert_eq!(dup.unwrap_err(), RegistryError::DuplicateName("a".into()));

        let slash = DeviceRegistry::from_devices([DeviceDescriptor::new("a/b", 0, 4, "t")]);
        assert!(matches!(slash, Err(RegistryError::InvalidName(_))));

        let empty = DeviceRegistry::from_devices([DeviceDescriptor::new("", 0, 4, "t")]);
        assert!(matches!(empty, Err(RegistryError::InvalidName(_))));

        let unaligned = DeviceRegistry::from_devices([DeviceDescriptor::new("a", 2, 4, "t")]);
        assert!(matches!(unaligned, Err(RegistryError::Unaligned(_))));

        let overflow =
            DeviceRegistry::from_devices([DeviceDescriptor::new("a", 0xFFFF_FFFC, 8, "t")]);
        assert!(matches!(overflow, Err(RegistryError::Overflow(_))));

        let top = DeviceRegistry::from_devices([DeviceDescriptor::new("a", 0xFFFF_FFFC, 4, "t")]);
        assert!(top.is_ok());
    }

    #[test]
    fn test_device_limit() {
        let devices =
            |n: u32| (0..n).map(|i| DeviceDescriptor::new(format!("d{}", i), i * 4, 4, "t"));

        assert_eq!(
            DeviceRegistry::from_devices(devices(MAX_DEVICES as u32 + 2)).unwrap_err(),
            RegistryError::TooManyDevices(MAX_DEVICES + 2)
        );
    }
}
