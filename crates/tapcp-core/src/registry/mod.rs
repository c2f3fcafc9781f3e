//! Device registry
//!
//! The registry describes the named devices of the running gateware design:
//! where each one lives in the FPGA address space, how large it is, and what
//! kind of block it is. It is built once at startup and is read-only from
//! then on, so it can be shared by reference between concurrent transfers.
//!
//! Registries can be built:
//!
//! - From a list of [`DeviceDescriptor`]s
//! - From the compiled binary listing embedded in a gateware image
//! - From a TOML design description (with the `std` feature)

mod compiled;
mod types;

#[cfg(feature = "std")]
mod toml;

pub use compiled::{COMPILED_MAGIC, COMPILED_VERSION};
pub use types::*;
