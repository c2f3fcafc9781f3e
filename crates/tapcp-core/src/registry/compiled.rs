//! Compiled device listing
//!
//! The compiled listing is the compact binary form of the registry that a
//! gateware build embeds in its image, and what `listdev` sends in octet
//! mode. All integers are big-endian.
//!
//! ```text
//! header:  "TPDV" | version: u16 | count: u16
//! entry:   offset: u32 | length: u32 | name_len: u8 | type_len: u8 | name | type
//! ```

use alloc::string::String;
use alloc::vec::Vec;

use super::{DeviceDescriptor, DeviceRegistry, RegistryError};

/// Compiled listing signature
pub const COMPILED_MAGIC: &[u8; 4] = b"TPDV";

/// Compiled listing format version
pub const COMPILED_VERSION: u16 = 1;

const HEADER_SIZE: usize = 8;
const ENTRY_HEADER_SIZE: usize = 10;

fn be_u16(data: &[u8]) -> u16 {
    u16::from_be_bytes([data[0], data[1]])
}

fn be_u32(data: &[u8]) -> u32 {
    u32::from_be_bytes([data[0], data[1], data[2], data[3]])
}

fn take_str(data: &[u8], pos: usize, len: usize) -> Result<String, RegistryError> {
    let bytes = data.get(pos..pos + len).ok_or(RegistryError::Malformed)?;
    String::from_utf8(bytes.to_vec()).map_err(|_| RegistryError::Malformed)
}

impl DeviceRegistry {
    /// Serialize the registry into its compiled listing
    pub fn to_compiled(&self) -> Vec<u8> {
        // from_devices caps the count at MAX_DEVICES
        let mut out = Vec::with_capacity(HEADER_SIZE + self.len() * 32);
        out.extend_from_slice(COMPILED_MAGIC);
        out.extend_from_slice(&COMPILED_VERSION.to_be_bytes());
        out.extend_from_slice(&(self.len() as u16).to_be_bytes());

        for dev in self.iter() {
            out.extend_from_slice(&dev.offset.to_be_bytes());
            out.extend_from_slice(&dev.length.to_be_bytes());
            out.push(dev.name.len() as u8);
            out.push(dev.type_tag.len() as u8);
            out.extend_from_slice(dev.name.as_bytes());
            out.extend_from_slice(dev.type_tag.as_bytes());
        }

        out
    }

    /// Build a registry from a compiled listing
    pub fn from_compiled(data: &[u8]) -> Result<Self, RegistryError> {
        if data.len() < HEADER_SIZE || &data[0..4] != COMPILED_MAGIC {
            return Err(RegistryError::Malformed);
        }

        let version = be_u16(&data[4..6]);
        if version != COMPILED_VERSION {
            return Err(RegistryError::UnsupportedVersion(version));
        }

        let count = be_u16(&data[6..8]) as usize;
        let mut devices = Vec::with_capacity(count);
        let mut pos = HEADER_SIZE;

        for _ in 0..count {
            let entry = data
                .get(pos..pos + ENTRY_HEADER_SIZE)
                .ok_or(RegistryError::Malformed)?;
            let offset = be_u32(&entry[0..4]);
            let length = be_u32(&entry[4..8]);
            let name_len = entry[8] as usize;
            let type_len = entry[9] as usize;
            pos += ENTRY_HEADER_SIZE;

            let name = take_str(data, pos, name_len)?;
            pos += name_len;
            let type_tag = take_str(data, pos, type_len)?;
            pos += type_len;

            devices.push(DeviceDescriptor {
                name,
                offset,
                length,
                type_tag,
            });
        }

        if pos != data.len() {
            log::error!(
                "compiled device listing has {} trailing bytes",
                data.len() - pos
            );
            return Err(RegistryError::Malformed);
        }

        Self::from_devices(devices)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DeviceRegistry {
        DeviceRegistry::from_devices([
            DeviceDescriptor::new("sys_clkcounter", 0x4, 4, "xps:sw_reg"),
            DeviceDescriptor::new("adc_snap", 0x1_0000, 0x800, "xps:bram"),
        ])
        .unwrap()
    }

    #[test]
    fn test_compiled_layout() {
        let blob = sample().to_compiled();
        assert_eq!(&blob[0..4], b"TPDV");
        assert_eq!(&blob[4..8], &[0, 1, 0, 2]);
        // first entry
        assert_eq!(&blob[8..12], &[0, 0, 0, 4]);
        assert_eq!(&blob[12..16], &[0, 0, 0, 4]);
        assert_eq!(blob[16], 14);
        assert_eq!(blob[17], 10);
        assert_eq!(&blob[18..32], b"sys_clkcounter");
        assert_eq!(&blob[32..42], b"xps:sw_reg");
    }

    #[test]
    fn test_from_compiled() {
        let reg = DeviceRegistry::from_compiled(&sample().to_compiled()).unwrap();
        let adc = reg.find("adc_snap").unwrap();
        assert_eq!(adc.offset, 0x1_0000);
        assert_eq!(adc.length, 0x800);
        assert_eq!(adc.type_tag, "xps:bram");
    }

    #[test]
    fn test_from_compiled_errors() {
        assert_eq!(
            DeviceRegistry::from_compiled(b"XXXX\0\x01\0\0").unwrap_err(),
            RegistryError::Malformed
        );
        assert_eq!(
            DeviceRegistry::from_compiled(b"TPDV\0\x09\0\0").unwrap_err(),
            RegistryError::UnsupportedVersion(9)
        );

        let mut blob = sample().to_compiled();
        blob.truncate(blob.len() - 3);
        assert_eq!(
            DeviceRegistry::from_compiled(&blob).unwrap_err(),
            RegistryError::Malformed
        );
    }

    #[test]
    fn test_from_compiled_trailing_bytes() {
        let mut blob = sample().to_compiled();
        blob.push(0);
        assert_eq!(
            DeviceRegistry::from_compiled(&blob).unwrap_err(),
            RegistryError::Malformed
        );

        // a count that undercounts the entries leaves them as trailing bytes
        let mut blob = sample().to_compiled();
        blob[7] = 1;
        assert_eq!(
            DeviceRegistry::from_compiled(&blob).unwrap_err(),
            RegistryError::Malformed
        );
    }
}
