//! Put command implementation

use std::path::Path;

use tapcp_core::{Board, DeviceRegistry, Direction, Dispatcher};

use crate::cli::TransferArgs;
use crate::error::{CliError, Result};

/// Run the put command
pub fn run_put(
    board: &mut dyn Board,
    registry: &DeviceRegistry,
    path: &str,
    transfer: &TransferArgs,
    input: &Path,
) -> Result<()> {
    let data = std::fs::read(input).map_err(|e| CliError::io(input, e))?;

    let mut session = Dispatcher::new(registry)
        .open(board, path, transfer.mode, Direction::Write)
        .map_err(|e| CliError::transfer(path, e))?;

    let pb = super::transfer_bar(data.len() as u64, "Writing");
    let blksize = transfer.blksize as usize;
    for block in data.chunks(blksize) {
        session
            .write(board, block)
            .map_err(|e| CliError::transfer(path, e))?;
        pb.inc(block.len() as u64);
    }
    // TFTP ends a transfer whose size is a multiple of the block size with an
    // empty block
    if data.len() % blksize == 0 {
        session
            .write(board, &[])
            .map_err(|e| CliError::transfer(path, e))?;
    }

    session
        .close(board)
        .map_err(|e| CliError::transfer(path, e))?;
    pb.finish_with_message("Write complete");

    log::info!(
        "Wrote {} bytes ({}) from {:?} to {}",
        data.len(),
        transfer.mode,
        input,
        path
    );
    Ok(())
}
