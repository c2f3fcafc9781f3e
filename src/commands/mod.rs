//! CLI command implementations
//!
//! `get` and `put` drive a command layer session the way a TFTP engine
//! does: one call per block, a short block ends the transfer.

mod boards;
pub mod devices;
mod get;
mod put;

pub use boards::list_boards;
pub use get::run_get;
pub use put::run_put;

use indicatif::{ProgressBar, ProgressStyle};

/// Progress bar for a transfer of `total` bytes
fn transfer_bar(total: u64, phase: &'static str) -> ProgressBar {
    let pb = ProgressBar::new(total);
    pb.set_style(
        ProgressStyle::default_bar()
            .template(&format!(
                "{{spinner:.green}} [{{elapsed_precise}}] [{{bar:40.cyan/blue}}] {{bytes}}/{{total_bytes}} ({{bytes_per_sec}}, {{eta}}) {}",
                phase
            ))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}
