//! TOML design description parsing
//!
//! Parses device descriptions in TOML format:
//!
//! ```toml
//! [design]
//! name = "snap_adc"
//!
//! [[device]]
//! name = "sys_board_id"
//! offset = 0x0
//! length = 4
//! type = "xps:sw_reg"
//!
//! [[device]]
//! name = "adc_snap"
//! offset = "0x10000"
//! length = "0x800"
//! type = "xps:bram"
//! ```

use std::format;
use std::fs;
use std::path::Path;
use std::string::{String, ToString};
use std::vec::Vec;

use super::{DeviceDescriptor, DeviceRegistry, RegistryError};

/// TOML design file structure
#[derive(Debug, serde::Deserialize)]
struct TomlDesignFile {
    design: Option<TomlDesignMeta>,
    #[serde(default)]
    device: Vec<TomlDevice>,
}

/// Design metadata
#[derive(Debug, serde::Deserialize)]
struct TomlDesignMeta {
    name: Option<String>,
}

/// Device definition in TOML
#[derive(Debug, serde::Deserialize)]
struct TomlDevice {
    name: String,
    #[serde(deserialize_with = "deserialize_hex_u32")]
    offset: u32,
    #[serde(deserialize_with = "deserialize_hex_u32")]
    length: u32,
    #[serde(rename = "type", default)]
    type_tag: String,
}

/// Deserialize a u32 that can be hex (0x...) or decimal
fn deserialize_hex_u32<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum HexOrInt {
        Int(u32),
        Str(String),
    }

    match HexOrInt::deserialize(deserializer)? {
        HexOrInt::Int(n) => Ok(n),
        HexOrInt::Str(s) => parse_number(&s).map_err(serde::de::Error::custom),
    }
}

/// Parse a number that can be hex (0x...) or decimal
fn parse_number(s: &str) -> Result<u32, String> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("invalid hex: {}", e))
    } else {
        s.parse().map_err(|e| format!("invalid number: {}", e))
    }
}

impl DeviceRegistry {
    /// Load a registry from a TOML design file
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, RegistryError> {
        let content =
            fs::read_to_string(path).map_err(|e| RegistryError::IoError(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse a registry from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self, RegistryError> {
        let file: TomlDesignFile =
            ::toml::from_str(content).map_err(|e| RegistryError::ParseError(e.to_string()))?;

        if let Some(name) = file.design.and_then(|d| d.name) {
            log::info!("Design: {} ({} devices)", name, file.device.len());
        }

        Self::from_devices(file.device.into_iter().map(|d| DeviceDescriptor {
            name: d.name,
            offset: d.offset,
            length: d.length,
            type_tag: d.type_tag,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("4096").unwrap(), 4096);
        assert_eq!(parse_number("0x1000").unwrap(), 4096);
        assert_eq!(parse_number(" 0X10 ").unwrap(), 16);
        assert!(parse_number("0xZZ").is_err());
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
[design]
name = "snap_adc"

[[device]]
name = "sys_board_id"
offset = 0x0
length = 4
type = "xps:sw_reg"

[[device]]
name = "adc_snap"
offset = "0x10000"
length = "0x800"
type = "xps:bram"
"#;
        let reg = DeviceRegistry::from_toml_str(toml).unwrap();
        assert_eq!(reg.len(), 2);
        let adc = reg.find("adc_snap").unwrap();
        assert_eq!(adc.offset, 0x10000);
        assert_eq!(adc.length, 0x800);
        assert_eq!(adc.type_tag, "xps:bram");
    }

    #[test]
    fn test_parse_toml_rejects_invalid() {
        let toml = r#"
[[device]]
name = "adc"
offset = 0x2
length = 4
"#;
        assert!(matches!(
            DeviceRegistry::from_toml_str(toml),
            Err(RegistryError::Unaligned(_))
        ));
        assert!(matches!(
            DeviceRegistry::from_toml_str("[[device]]\nname = 1"),
            Err(RegistryError::ParseError(_))
        ));
    }

    #[test]
    fn test_from_toml_file_missing() {
        match DeviceRegistry::from_toml_file("/nonexistent/design.toml") {
            Err(RegistryError::IoError(msg)) => assert!(!msg.is_empty()),
            other => panic!("expected IoError, got {:?}", other),
        }
    }
}
