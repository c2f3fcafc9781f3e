//! Board registry and initialization
//!
//! This module handles opening boards by name. Callers get a type-erased
//! [`Board`] and never see the backend types.

use std::collections::HashMap;

use tapcp_core::Board;

use crate::error::{BoardError, Result};

/// Information about a board backend
pub struct BoardInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
}

/// Get information about all available boards (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_boards() -> Vec<BoardInfo> {
    let mut boards = Vec::new();

    #[cfg(feature = "dummy")]
    boards.push(BoardInfo {
        name: "dummy",
        aliases: &[],
        description: "In-memory board emulator (fpga_size=,cpu_size=,temp=,image=<file>)",
    });

    #[cfg(feature = "physmap")]
    boards.push(BoardInfo {
        name: "physmap",
        aliases: &["devmem"],
        description: "Registers mapped from /dev/mem (fpga=,fpga_size=,cpu=,cpu_size=,temp=<iio dir>) - requires root",
    });

    boards
}

/// Comma-separated names of the available boards
pub fn board_names_short() -> String {
    let boards = available_boards();
    if boards.is_empty() {
        return "none (recompile with features)".to_string();
    }
    let names: Vec<&str> = boards.iter().map(|b| b.name).collect();
    names.join(", ")
}

/// Parsed board parameters
#[derive(Debug)]
pub struct BoardParams {
    /// Board name
    pub name: String,
    /// Key-value parameters
    pub params: HashMap<String, String>,
}

impl BoardParams {
    /// Parameters as key-value pairs, sorted by key
    pub fn options(&self) -> Vec<(&str, &str)> {
        let mut options: Vec<(&str, &str)> = self
            .params
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        options.sort_unstable();
        options
    }
}

/// Parse a board string into name and parameters
///
/// Format: "name" or "name:key1=value1,key2=value2"
///
/// # Example
/// ```ignore
/// let params = parse_board_params("dummy:temp=60")?;
/// assert_eq!(params.name, "dummy");
/// assert_eq!(params.params.get("temp"), Some(&"60".to_string()));
/// ```
pub fn parse_board_params(s: &str) -> Result<BoardParams> {
    let (name, opts_str) = s.split_once(':').unwrap_or((s, ""));

    let mut params = HashMap::new();
    if !opts_str.is_empty() {
        for opt in opts_str.split(',') {
            match opt.split_once('=') {
                Some((key, value)) => {
                    params.insert(key.to_string(), value.to_string());
                }
                None => return Err(BoardError::InvalidFormat(opt.to_string())),
            }
        }
    }

    Ok(BoardParams {
        name: name.to_string(),
        params,
    })
}

/// Open a board from its description string
///
/// # Example
/// ```ignore
/// let mut board = open_board("dummy:fpga_size=0x10000")?;
/// let size = board.space_size(Space::Fpga);
/// ```
pub fn open_board(spec: &str) -> Result<Box<dyn Board>> {
    let params = parse_board_params(spec)?;

    match params.name.as_str() {
        #[cfg(feature = "dummy")]
        "dummy" => open_dummy(&params),

        #[cfg(feature = "physmap")]
        "physmap" | "devmem" => open_physmap(&params),

        _ => Err(BoardError::UnknownBoard(params.name, board_names_short())),
    }
}

#[cfg(feature = "dummy")]
fn parse_size(name: &str, value: &str) -> Result<u32> {
    let parsed = match value.strip_prefix("0x").or_else(|| value.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => value.parse::<u32>(),
    };
    match parsed {
        Ok(size) if size > 0 && size % 4 == 0 => Ok(size),
        _ => Err(BoardError::InvalidParameter {
            name: name.to_string(),
            message: format!("'{}' is not a non-zero multiple of 4", value),
        }),
    }
}

#[cfg(feature = "dummy")]
fn open_dummy(params: &BoardParams) -> Result<Box<dyn Board>> {
    use tapcp_dummy::{DummyBoard, DummyConfig};

    let mut config = DummyConfig::default();
    let mut image = None;

    for (key, value) in params.options() {
        match key {
            "fpga_size" => config.fpga_size = parse_size(key, value)?,
            "cpu_size" => config.cpu_size = parse_size(key, value)?,
            "temp" => {
                let celsius = value
                    .parse::<f32>()
                    .map_err(|_| BoardError::InvalidParameter {
                        name: key.to_string(),
                        message: format!("'{}' is not a temperature", value),
                    })?;
                config.temperature = Some(celsius);
            }
            "image" => {
                let data = std::fs::read(value).map_err(|e| BoardError::Io {
                    path: value.to_string(),
                    source: e,
                })?;
                image = Some(data);
            }
            _ => log::warn!("Unknown dummy option: {}={}", key, value),
        }
    }

    log::info!(
        "Opening dummy board (FPGA {:#x} bytes, CPU {:#x} bytes)",
        config.fpga_size,
        config.cpu_size
    );

    let board = match image {
        Some(data) => DummyBoard::with_fpga_image(config, &data),
        None => DummyBoard::new(config),
    };
    Ok(Box::new(board))
}

#[cfg(feature = "physmap")]
fn open_physmap(params: &BoardParams) -> Result<Box<dyn Board>> {
    log::info!("Opening physmap board...");

    let config = tapcp_physmap::parse_options(&params.options())?;
    let board = tapcp_physmap::PhysBoard::open(&config)?;
    Ok(Box::new(board))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_board_params() {
        let params = parse_board_params("physmap:fpga=0x40000000,fpga_size=0x1000").unwrap();
        assert_eq!(params.name, "physmap");
        assert_eq!(params.params.len(), 2);
        assert_eq!(params.params.get("fpga"), Some(&"0x40000000".to_string()));
        assert_eq!(
            params.options(),
            vec![("fpga", "0x40000000"), ("fpga_size", "0x1000")]
        );

        let params = parse_board_params("dummy").unwrap();
        assert_eq!(params.name, "dummy");
        assert!(params.params.is_empty());
    }

    #[test]
    fn test_parse_board_params_invalid() {
        assert!(matches!(
            parse_board_params("dummy:temp"),
            Err(BoardError::InvalidFormat(opt)) if opt == "temp"
        ));
    }

    #[test]
    fn test_unknown_board() {
        assert!(matches!(
            open_board("ch341a"),
            Err(BoardError::UnknownBoard(name, _)) if name == "ch341a"
        ));
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy() {
        use tapcp_core::Space;

        let mut board = open_board("dummy:fpga_size=0x1000,cpu_size=256,temp=61.5").unwrap();
        assert_eq!(board.space_size(Space::Fpga), 0x1000);
        assert_eq!(board.space_size(Space::Cpu), 256);
        assert_eq!(board.temperature().unwrap(), 61.5);

        board.write32(Space::Fpga, 0xFFC, 0x1234_5678).unwrap();
        assert_eq!(board.read32(Space::Fpga, 0xFFC).unwrap(), 0x1234_5678);
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy_image() {
        use tapcp_core::Space;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fpga.bin");
        std::fs::write(&path, [0xDE, 0xAD, 0xBE, 0xEF]).unwrap();

        let spec = format!("dummy:image={}", path.display());
        let mut board = open_board(&spec).unwrap();
        assert_eq!(board.read32(Space::Fpga, 0).unwrap(), 0xDEAD_BEEF);

        assert!(matches!(
            open_board("dummy:image=/nonexistent/fpga.bin"),
            Err(BoardError::Io { .. })
        ));
    }

    #[cfg(feature = "dummy")]
    #[test]
    fn test_open_dummy_invalid() {
        assert!(matches!(
            open_board("dummy:fpga_size=6"),
            Err(BoardError::InvalidParameter { name, .. }) if name == "fpga_size"
        ));
        assert!(matches!(
            open_board("dummy:temp=warm"),
            Err(BoardError::InvalidParameter { name, .. }) if name == "temp"
        ));
    }
}
