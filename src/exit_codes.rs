//! Exit code constants for the `pathlock` probe binary.
//!
//! - 0: Success
//! - 1: User error (bad args, I/O failure, release without lock)
//! - 4: Lock contention or wait timeout

/// Successful execution.
pub const SUCCESS: i32 = 0;

/// User error: bad arguments, unresolvable path, or an I/O failure on the lock file.
pub const USER_ERROR: i32 = 1;

/// Lock acquisition failure: the lock is held by another holder.
pub const LOCK_FAILURE: i32 = 4;
