//! CLI command implementations
//!
//! Each command returns the process exit code.

pub mod init;
pub mod migrate;
pub mod reset;
pub mod status;
pub mod validate;
