//! Command implementations that are independent of CLI argument parsing.
//!
//! Commands in this module operate on paths and configuration directly so
//! they can be driven from tests as well as from the CLI layer.

pub mod import;
pub mod init;
