//! RAII lock guard implementation.

use super::handle::LockHandle;
use super::strategy::LockStrategy;
use crate::error::Result;
use std::path::Path;
use tracing::warn;

/// RAII guard for a held lock.
///
/// When dropped, the lock is released through its handle.
/// If release fails, a warning is logged but no panic occurs.
#[must_use = "the lock is released as soon as the guard is dropped"]
pub struct LockGuard<'a, S: LockStrategy> {
    /// Handle that holds the lock.
    handle: &'a LockHandle<S>,

    /// Whether the lock has been released manually.
    released: bool,
}

impl<'a, S: LockStrategy> LockGuard<'a, S> {
    /// Create a new guard for a handle that has just been locked.
    pub(super) fn new(handle: &'a LockHandle<S>) -> Self {
        Self {
            handle,
            released: false,
        }
    }

    /// Get the path the lock was created with.
    pub fn path(&self) -> &Path {
        self.handle.path()
    }

    /// Manually release the lock.
    ///
    /// This is useful when you want to release the lock before the guard
    /// goes out of scope, and want to handle errors explicitly.
    pub fn release(mut self) -> Result<()> {
        self.released = true;
        self.handle.release()
    }
}

impl<S: LockStrategy> Drop for LockGuard<'_, S> {
    fn drop(&mut self) {
        if !self.released
            && let Err(e) = self.handle.release()
        {
            warn!(
                path = %self.handle.path().display(),
                error = %e,
                "failed to release lock"
            );
        }
    }
}

impl<S: LockStrategy> std::fmt::Debug for LockGuard<'_, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LockGuard")
            .field("path", &self.handle.path())
            .field("released", &self.released)
            .finish()
    }
}
