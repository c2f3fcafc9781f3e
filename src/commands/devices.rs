//! Device registry commands

use std::fs;
use std::path::Path;

use tapcp_core::codec::format_device_table;
use tapcp_core::registry::{RegistryError, COMPILED_MAGIC};
use tapcp_core::DeviceRegistry;

use crate::error::{CliError, Result};

/// Load a registry file, detecting the compiled listing by its magic
pub fn load_registry(path: &Path) -> Result<DeviceRegistry> {
    let data = fs::read(path).map_err(|e| CliError::io(path, e))?;

    let registry = if data.starts_with(COMPILED_MAGIC) {
        DeviceRegistry::from_compiled(&data)
    } else {
        std::str::from_utf8(&data)
            .map_err(|e| RegistryError::ParseError(e.to_string()))
            .and_then(DeviceRegistry::from_toml_str)
    };

    let registry = registry.map_err(|source| CliError::Registry {
        path: path.to_path_buf(),
        source,
    })?;
    log::info!("Loaded {} devices from {:?}", registry.len(), path);
    Ok(registry)
}

/// Show a registry file
pub fn cmd_show(file: &Path) -> Result<()> {
    let registry = load_registry(file)?;
    if registry.is_empty() {
        println!("No devices");
    } else {
        print!("{}", format_device_table(&registry));
    }
    Ok(())
}

/// Compile a TOML description into the binary listing
pub fn cmd_compile(input: &Path, output: &Path) -> Result<()> {
    let registry = load_registry(input)?;
    let compiled = registry.to_compiled();
    fs::write(output, &compiled).map_err(|e| CliError::io(output, e))?;
    println!(
        "Compiled {} devices ({} bytes) to {:?}",
        registry.len(),
        compiled.len(),
        output
    );
    Ok(())
}
