//! tapcp - TAPCP virtual filesystem for FPGA boards
//!
//! Drives the TAPCP command layer from the command line, the same way a TFTP
//! server does for remote clients. Useful for poking at a board locally and
//! for exercising a design's device registry without a network.
//!
//! # Architecture
//!
//! - `tapcp-core` turns a filename into a transfer session and streams it
//!   block by block
//! - `tapcp-board` opens the board backend selected with `--board`
//! - this binary pumps sessions between the board and local files

mod cli;
mod commands;
mod error;

use clap::Parser;
use cli::{Cli, Commands, DevicesCommands};
use std::path::Path;
use tapcp_core::DeviceRegistry;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Get {
            path,
            output,
            transfer,
        } => {
            let registry = load_registry(cli.devices.as_deref())?;
            let mut board = tapcp_board::open_board(&cli.board)?;
            commands::run_get(
                board.as_mut(),
                &registry,
                &path,
                &transfer,
                output.as_deref(),
            )?;
        }
        Commands::Put {
            path,
            input,
            transfer,
        } => {
            let registry = load_registry(cli.devices.as_deref())?;
            let mut board = tapcp_board::open_board(&cli.board)?;
            commands::run_put(board.as_mut(), &registry, &path, &transfer, &input)?;
        }
        Commands::Boards => commands::list_boards(),
        Commands::Devices(subcmd) => match subcmd {
            DevicesCommands::Show { file } => commands::devices::cmd_show(&file)?,
            DevicesCommands::Compile { input, output } => {
                commands::devices::cmd_compile(&input, &output)?
            }
        },
    }

    Ok(())
}

/// Registry given with `--devices`, or an empty one
fn load_registry(devices: Option<&Path>) -> error::Result<DeviceRegistry> {
    match devices {
        Some(path) => commands::devices::load_registry(path),
        None => {
            log::debug!("No device registry given, dev/ paths will not resolve");
            Ok(DeviceRegistry::new())
        }
    }
}
