//! pathlock: cross-platform process-level advisory file lock.
//!
//! ```no_run
//! use pathlock::LockHandle;
//!
//! let handle = LockHandle::new("foo.lock")?;
//! handle.try_acquire()?;
//! // ... exclusive section ...
//! handle.release()?;
//! # Ok::<(), pathlock::LockError>(())
//! ```

pub mod error;
pub mod exit_codes;
pub mod locks;

pub use error::{LockError, Result};
pub use locks::{LockGuard, LockHandle, LockState, LockStrategy, NativeStrategy, lock};
