//! CLI module
//!
//! Provides command-line interface for:
//! - init: Create directory structure
//! - put-mapping: Merge a partial mapping into a type
//! - get-mapping: Print a type's mapping
//! - index: Run a document through the write path

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{get_mapping, index, init, put_mapping, run, run_command};
pub use config::Config;
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{read_json, read_stdin_bytes, write_error, write_response};
