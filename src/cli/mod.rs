//! CLI argument parsing for the `pathlock` probe.
//!
//! Uses clap derive macros for declarative argument definitions.
//! Every argument can also come from the environment so a parent process
//! can drive a child through its environment alone.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Probe for pathlock: take, hold, or wait for a file lock from a separate process.
///
/// Used to exercise cross-process contention and crash recovery.
#[derive(Parser, Debug)]
#[command(name = "pathlock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// Available probe commands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Take the lock without waiting, then release it.
    ///
    /// Exits with code 4 if another holder owns the lock.
    Try(TryArgs),

    /// Take the lock and hold it.
    ///
    /// Prints `locked <path>` once held. With --crash the process exits
    /// without releasing, leaving cleanup to the OS.
    Hold(HoldArgs),

    /// Wait up to a deadline for the lock, then release it.
    Wait(WaitArgs),
}

/// Arguments for the `try` command.
#[derive(Parser, Debug)]
pub struct TryArgs {
    /// Lock file path.
    #[arg(env = "PATHLOCK_FILE")]
    pub path: PathBuf,
}

/// Arguments for the `hold` command.
#[derive(Parser, Debug)]
pub struct HoldArgs {
    /// Lock file path.
    #[arg(env = "PATHLOCK_FILE")]
    pub path: PathBuf,

    /// How long to hold the lock, in milliseconds.
    #[arg(long, env = "PATHLOCK_HOLD_MS", default_value_t = 0)]
    pub hold_ms: u64,

    /// Exit without releasing the lock.
    #[arg(long, env = "PATHLOCK_CRASH")]
    pub crash: bool,
}

/// Arguments for the `wait` command.
#[derive(Parser, Debug)]
pub struct WaitArgs {
    /// Lock file path.
    #[arg(env = "PATHLOCK_FILE")]
    pub path: PathBuf,

    /// Give up after this many milliseconds.
    #[arg(long)]
    pub timeout_ms: u64,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_try() {
        let cli = Cli::try_parse_from(["pathlock", "try", "foo.lock"]).unwrap();
        if let Command::Try(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("foo.lock"));
        } else {
            panic!("Expected Try command");
        }
    }

    #[test]
    fn test_parse_hold_defaults() {
        let cli = Cli::try_parse_from(["pathlock", "hold", "foo.lock"]).unwrap();
        if let Command::Hold(args) = cli.command {
            assert_eq!(args.path, PathBuf::from("foo.lock"));
            assert_eq!(args.hold_ms, 0);
            assert!(!args.crash);
        } else {
            panic!("Expected Hold command");
        }
    }

    #[test]
    fn test_parse_hold_with_crash() {
        let cli = Cli::try_parse_from([
            "pathlock",
            "hold",
            "foo.lock",
            "--hold-ms",
            "250",
            "--crash",
        ])
        .unwrap();
        if let Command::Hold(args) = cli.command {
            assert_eq!(args.hold_ms, 250);
            assert!(args.crash);
        } else {
            panic!("Expected Hold command");
        }
    }

    #[test]
    fn test_wait_requires_timeout() {
        assert!(Cli::try_parse_from(["pathlock", "wait", "foo.lock"]).is_err());

        let cli =
            Cli::try_parse_from(["pathlock", "wait", "foo.lock", "--timeout-ms", "500"]).unwrap();
        assert!(matches!(cli.command, Command::Wait(WaitArgs { timeout_ms: 500, .. })));
    }
}
