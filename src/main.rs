//! pathlock probe: a child process for exercising file locks across processes.
//!
//! This is the main entry point for the `pathlock` binary. It parses arguments,
//! dispatches to the appropriate command handler, and handles errors with
//! proper exit codes.

mod cli;
mod commands;

use cli::Cli;
use pathlock::{LockError, exit_codes};
use std::process::ExitCode;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse_args();

    match commands::dispatch(cli.command) {
        Ok(()) => ExitCode::from(exit_codes::SUCCESS as u8),
        Err(err) => {
            // Print user-actionable error message to stderr
            eprintln!("Error: {:#}", err);

            let code = err
                .downcast_ref::<LockError>()
                .map_or(exit_codes::USER_ERROR, LockError::exit_code);
            ExitCode::from(code as u8)
        }
    }
}
