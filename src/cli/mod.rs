//! CLI for slabdb.
//!
//! - init: write a default configuration file
//! - start: boot the server loop
//! - exec: one-shot statement execution

mod args;
mod commands;
mod errors;

pub use args::{Cli, Command};
pub use commands::{exec, init, run_command, start};
pub use errors::{CliError, CliErrorCode, CliResult};

/// Entry point used by `main`.
pub fn run() -> CliResult<()> {
    run_command(Cli::parse_args())
}
