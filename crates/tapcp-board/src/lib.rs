//! tapcp-board - Board registry for TAPCP
//!
//! Opens a [`tapcp_core::Board`] from a board string such as
//! `dummy` or `physmap:fpga=0x40000000,fpga_size=0x1000000`. Board backends
//! are compiled in through cargo features.

pub mod error;
pub mod registry;

pub use error::{BoardError, Result};
pub use registry::{
    available_boards, board_names_short, open_board, parse_board_params, BoardInfo, BoardParams,
};
