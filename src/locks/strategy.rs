//! Platform lock primitives.
//!
//! A [`LockStrategy`] knows how to open a backing file, take the exclusive
//! lock on it without waiting, and give the lock back. [`LockHandle`] owns the
//! state machine and calls into the strategy only while holding its writer lock.
//!
//! [`LockHandle`]: super::LockHandle

use crate::error::Result;
use std::path::Path;

/// The OS-specific half of a lock.
///
/// `path` arguments are the resolved absolute path. Errors must already carry
/// the caller's path, which is passed separately as `display`.
pub trait LockStrategy: Send + Sync {
    /// Open file type. Dropping it closes the OS handle.
    type File: Send + Sync;

    /// Open (creating if needed) the backing file.
    ///
    /// Strategies where opening is itself the lock attempt report contention here.
    fn open(&self, path: &Path, display: &Path) -> Result<Self::File>;

    /// Take the exclusive lock on an open file without waiting.
    fn try_lock(&self, file: &Self::File, display: &Path) -> Result<()>;

    /// Give the lock back. The handle closes `file` afterwards only if this succeeds.
    fn unlock(&self, file: &Self::File, display: &Path) -> Result<()>;
}

#[cfg(unix)]
pub use super::unix::FlockStrategy as NativeStrategy;

#[cfg(windows)]
pub use super::windows::ExclusiveHandleStrategy as NativeStrategy;
