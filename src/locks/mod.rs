//! Locking subsystem for pathlock.
//!
//! A [`LockHandle`] names a lock by a file path. Taking the lock means taking
//! an exclusive OS-level lock on that backing file, so at most one cooperating
//! holder, across all processes on the machine, owns it at a time.
//!
//! # Platform strategies
//!
//! - **Unix**: the backing file is opened with mode `0600` and locked with a
//!   non-blocking `flock(LOCK_EX)`. The file outlives the lock. Locking is
//!   advisory and only binds processes that use the same mechanism.
//! - **Windows**: the backing file is created with no sharing and
//!   delete-on-close. The open handle is the lock; closing it releases the
//!   lock and deletes the file.
//!
//! In both cases the OS drops the lock when the holding process exits, so a
//! crashed holder never blocks later holders.
//!
//! # In-process access
//!
//! The handle's state (open file + locked flag) sits behind an `RwLock`.
//! Acquire and release take the writer side and are serialized; state queries
//! take the reader side.
//!
//! # RAII Guards
//!
//! [`LockHandle::try_lock`] returns a [`LockGuard`] that releases the lock
//! when dropped. If release fails during drop, a warning is logged but the
//! program does not crash.

mod guard;
mod handle;
mod strategy;
mod types;

#[cfg(unix)]
mod unix;
#[cfg(windows)]
mod windows;


// Re-export public API
pub use guard::LockGuard;
pub use handle::{DEFAULT_POLL_INTERVAL, LockHandle, lock};
pub use strategy::{LockStrategy, NativeStrategy};
pub use types::LockState;
#[cfg(unix)]
pub use unix::FlockStrategy;
#[cfg(windows)]
pub use windows::ExclusiveHandleStrategy;
