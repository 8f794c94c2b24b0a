//! Command implementations for the `pathlock` probe.
//!
//! Each command prints one line per state change on stdout so a parent
//! process can follow along; diagnostics go to stderr through tracing.

use crate::cli::{Command, HoldArgs, TryArgs, WaitArgs};
use anyhow::{Context, Result};
use pathlock::{LockHandle, exit_codes};
use std::io::{self, Write};
use std::thread;
use std::time::Duration;
use tracing::info;

/// Dispatch a command to its implementation.
pub fn dispatch(command: Command) -> Result<()> {
    match command {
        Command::Try(args) => cmd_try(args),
        Command::Hold(args) => cmd_hold(args),
        Command::Wait(args) => cmd_wait(args),
    }
}

fn announce(event: &str, handle: &LockHandle) -> Result<()> {
    let mut stdout = io::stdout().lock();
    writeln!(stdout, "{} {}", event, handle.path().display())?;
    stdout.flush().context("failed to flush stdout")
}

fn cmd_try(args: TryArgs) -> Result<()> {
    let handle = LockHandle::new(&args.path)?;
    handle.try_acquire()?;
    announce("acquired", &handle)?;
    handle.release()?;
    Ok(())
}

fn cmd_hold(args: HoldArgs) -> Result<()> {
    let handle = LockHandle::new(&args.path)?;
    handle.try_acquire()?;
    announce("locked", &handle)?;

    if args.hold_ms > 0 {
        thread::sleep(Duration::from_millis(args.hold_ms));
    }

    if args.crash {
        // Leave without releasing; the OS reclaims the lock on exit.
        info!(path = %handle.path().display(), "exiting while holding lock");
        std::process::exit(exit_codes::SUCCESS);
    }

    handle.release()?;
    announce("released", &handle)
}

fn cmd_wait(args: WaitArgs) -> Result<()> {
    let handle = LockHandle::new(&args.path)?;
    handle.acquire_timeout(Duration::from_millis(args.timeout_ms))?;
    announce("acquired", &handle)?;
    handle.release()?;
    Ok(())
}
