//! CLI argument parsing

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tapcp_core::TransferMode;

/// Parse a TFTP transfer mode name
fn parse_mode(s: &str) -> Result<TransferMode, String> {
    s.parse::<TransferMode>()
        .map_err(|_| format!("Invalid mode '{}' (expected octet or netascii)", s))
}

/// Generate dynamic help text for the board argument
fn board_help() -> String {
    format!(
        "Board to use, as name[:key=value,...] [available: {}]",
        tapcp_board::board_names_short()
    )
}

#[derive(Parser)]
#[command(name = "tapcp")]
#[command(author, version, about = "TAPCP virtual filesystem for FPGA boards", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Board to use
    #[arg(short, long, global = true, default_value = "dummy", help = board_help())]
    pub board: String,

    /// Device registry of the running design (TOML or compiled listing)
    #[arg(short, long, global = true)]
    pub devices: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

/// Transfer options shared by get and put
#[derive(clap::Args, Debug, Clone)]
pub struct TransferArgs {
    /// Transfer mode (octet or netascii)
    #[arg(short, long, default_value = "octet", value_parser = parse_mode)]
    pub mode: TransferMode,

    /// TFTP block size in bytes
    #[arg(long, default_value_t = 512, value_parser = clap::value_parser!(u16).range(8..=65464))]
    pub blksize: u16,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Read a file from the virtual filesystem (TFTP get)
    Get {
        /// Virtual path, e.g. help, temp, dev/adc/0x10/0x8, cpu/0x1000
        path: String,

        /// Output file path (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[command(flatten)]
        transfer: TransferArgs,
    },

    /// Write a file to the virtual filesystem (TFTP put)
    Put {
        /// Virtual path, e.g. dev/sys_scratchpad, fpga/0x100/0x10
        path: String,

        /// Input file path
        #[arg(short, long)]
        input: PathBuf,

        #[command(flatten)]
        transfer: TransferArgs,
    },

    /// List supported boards
    Boards,

    /// Device registry operations
    #[command(subcommand)]
    Devices(DevicesCommands),
}

/// Device registry subcommands
#[derive(Subcommand)]
pub enum DevicesCommands {
    /// Show a device registry file
    Show {
        /// Registry file (TOML or compiled listing)
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Compile a TOML device description into the binary listing
    Compile {
        /// Input file (TOML format)
        #[arg(short, long)]
        input: PathBuf,

        /// Output file (compiled listing)
        #[arg(short, long)]
        output: PathBuf,
    },
}
