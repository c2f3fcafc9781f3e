//! Get command implementation

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use tapcp_core::{Board, DeviceRegistry, Direction, Dispatcher};

use crate::cli::TransferArgs;
use crate::error::{CliError, Result};

/// Run the get command
///
/// Writes to `output`, or to stdout when no file is given. The progress bar
/// is only shown for memory reads into a file, so it never mixes with the
/// data and never flashes up for a few bytes of diagnostics.
pub fn run_get(
    board: &mut dyn Board,
    registry: &DeviceRegistry,
    path: &str,
    transfer: &TransferArgs,
    output: Option<&Path>,
) -> Result<()> {
    let mut session = Dispatcher::new(registry)
        .open(board, path, transfer.mode, Direction::Read)
        .map_err(|e| CliError::transfer(path, e))?;

    let out_name = output.map_or_else(|| PathBuf::from("<stdout>"), Path::to_path_buf);
    let mut out: Box<dyn Write> = match output {
        Some(file) => Box::new(BufWriter::new(
            File::create(file).map_err(|e| CliError::io(file, e))?,
        )),
        None => Box::new(io::stdout().lock()),
    };

    let pb = output
        .filter(|_| session.command().is_memory())
        .map(|_| super::transfer_bar(session.transfer_size().unwrap_or(0), "Reading"));

    let mut block = vec![0u8; transfer.blksize as usize];
    let mut total = 0u64;
    let mut blocks = 0usize;
    loop {
        let n = session
            .read(board, &mut block)
            .map_err(|e| CliError::transfer(path, e))?;
        if let Err(e) = out.write_all(&block[..n]) {
            session.abort();
            return Err(CliError::io(out_name, e));
        }

        total += n as u64;
        blocks += 1;
        if let Some(pb) = &pb {
            pb.inc(n as u64);
        }
        if n < block.len() {
            break;
        }
    }

    out.flush().map_err(|e| CliError::io(&out_name, e))?;
    session
        .close(board)
        .map_err(|e| CliError::transfer(path, e))?;

    if let Some(pb) = pb {
        pb.finish_with_message("Read complete");
    }
    log::info!(
        "Read {} bytes ({} blocks, {}) from {}",
        total,
        blocks,
        transfer.mode,
        path
    );
    Ok(())
}
