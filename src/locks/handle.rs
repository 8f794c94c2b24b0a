//! The lock handle and its state machine.

use super::guard::LockGuard;
use super::strategy::{LockStrategy, NativeStrategy};
use super::types::LockState;
use crate::error::{LockError, Result};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Backoff between attempts in [`LockHandle::acquire_timeout`].
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Open file and cached lock flag, always changed together.
struct Inner<F> {
    file: Option<F>,
    locked: bool,
}

/// A named, process-level exclusive lock backed by a file path.
///
/// `try_acquire` and `release` run under the writer side of an in-process
/// reader/writer lock, so callers sharing one handle across threads are
/// strictly serialized. `is_locked` only takes the reader side.
///
/// Crash behaviour differs by platform. On Unix the backing file stays on
/// disk after release or after a holder dies, and a new holder simply locks
/// it again. On Windows the file is deleted whenever the holding handle
/// closes, including when the OS reaps a crashed process.
pub struct LockHandle<S: LockStrategy = NativeStrategy> {
    path: PathBuf,
    absolute_path: PathBuf,
    strategy: S,
    inner: RwLock<Inner<S::File>>,
}

impl LockHandle<NativeStrategy> {
    /// Create an unlocked handle for `path` using the platform's native strategy.
    ///
    /// The path is resolved to an absolute form now. Nothing is opened until
    /// the first acquire.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::with_strategy(path, NativeStrategy::default())
    }
}

impl<S: LockStrategy> LockHandle<S> {
    /// Create an unlocked handle that drives `strategy`.
    pub fn with_strategy<P: AsRef<Path>>(path: P, strategy: S) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let absolute_path =
            std::path::absolute(&path).map_err(|source| LockError::Resolution {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            path,
            absolute_path,
            strategy,
            inner: RwLock::new(Inner {
                file: None,
                locked: false,
            }),
        })
    }

    /// The path as given at construction, unresolved.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The absolute path used for OS calls.
    pub fn absolute_path(&self) -> &Path {
        &self.absolute_path
    }

    /// Whether this handle currently believes it holds the lock.
    pub fn is_locked(&self) -> bool {
        self.read().locked
    }

    pub fn state(&self) -> LockState {
        LockState::from_flag(self.is_locked())
    }

    /// Try to take the exclusive lock without waiting.
    ///
    /// Succeeds immediately, without any OS call, if this handle is already
    /// locked. Otherwise opens the backing file if needed and makes one
    /// non-blocking lock attempt. Returns [`LockError::Contention`] if another
    /// holder owns the lock; nothing is retried.
    pub fn try_acquire(&self) -> Result<()> {
        let mut inner = self.write();

        if inner.locked {
            trace!(path = %self.path.display(), "lock already held by this handle");
            return Ok(());
        }

        self.lock_inner(&mut inner)
    }

    /// Release the lock and close the backing file.
    ///
    /// Unlike [`try_acquire`](Self::try_acquire), this is not idempotent:
    /// releasing a handle that is not locked returns
    /// [`LockError::AlreadyUnlocked`]. If the OS refuses to unlock, the handle
    /// stays locked with its file open and [`LockError::Release`] is returned.
    pub fn release(&self) -> Result<()> {
        let mut inner = self.write();

        let file = match inner.file.as_ref() {
            Some(file) if inner.locked => file,
            _ => {
                return Err(LockError::AlreadyUnlocked {
                    path: self.path.clone(),
                });
            }
        };

        self.strategy.unlock(file, &self.path)?;

        inner.file = None;
        inner.locked = false;
        debug!(path = %self.path.display(), "lock released");
        Ok(())
    }

    /// Keep retrying [`try_acquire`](Self::try_acquire) until it succeeds or
    /// `timeout` elapses, sleeping [`DEFAULT_POLL_INTERVAL`] between attempts.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<()> {
        self.acquire_timeout_with_interval(timeout, DEFAULT_POLL_INTERVAL)
    }

    /// Like [`acquire_timeout`](Self::acquire_timeout) with a custom poll interval.
    ///
    /// Errors other than contention are returned at once. The handle's
    /// in-process lock is not held while sleeping. A `timeout` too large to
    /// represent as a deadline (such as `Duration::MAX`) waits indefinitely.
    pub fn acquire_timeout_with_interval(&self, timeout: Duration, poll: Duration) -> Result<()> {
        let deadline = Instant::now().checked_add(timeout);

        loop {
            match self.try_acquire() {
                Ok(()) => return Ok(()),
                Err(LockError::Contention { .. }) => {
                    let sleep_for = match deadline {
                        Some(deadline) => {
                            let now = Instant::now();
                            if now >= deadline {
                                return Err(LockError::Timeout {
                                    path: self.path.clone(),
                                    timeout,
                                });
                            }
                            poll.min(deadline - now)
                        }
                        None => poll,
                    };
                    trace!(path = %self.path.display(), "lock contended, retrying");
                    thread::sleep(sleep_for);
                }
                Err(err) => return Err(err),
            }
        }
    }

    /// Acquire the lock and return a guard that releases it when dropped.
    ///
    /// Fails with [`LockError::AlreadyLocked`] if this handle is already
    /// locked, since the existing owner would lose the lock when the guard drops.
    pub fn try_lock(&self) -> Result<LockGuard<'_, S>> {
        let mut inner = self.write();
        if inner.locked {
            return Err(LockError::AlreadyLocked {
                path: self.path.clone(),
            });
        }

        self.lock_inner(&mut inner)?;
        drop(inner);
        Ok(LockGuard::new(self))
    }

    /// Unlocked to locked transition. Caller holds the writer lock.
    fn lock_inner(&self, inner: &mut Inner<S::File>) -> Result<()> {
        let file = match inner.file.take() {
            Some(file) => file,
            None => self.strategy.open(&self.absolute_path, &self.path)?,
        };

        // Keep the file open on contention so the next attempt reuses it.
        let attempt = self.strategy.try_lock(&file, &self.path);
        inner.file = Some(file);
        attempt?;

        inner.locked = true;
        debug!(path = %self.path.display(), "lock acquired");
        Ok(())
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner<S::File>> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner<S::File>> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<S: LockStrategy> fmt::Display for LockHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' {}", self.path.display(), self.state())
    }
}

impl<S: LockStrategy> fmt::Debug for LockHandle<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LockHandle")
            .field("path", &self.path)
            .field("absolute_path", &self.absolute_path)
            .field("locked", &self.is_locked())
            .finish()
    }
}

/// Create a native handle for `path` and take the lock in one step.
pub fn lock<P: AsRef<Path>>(path: P) -> Result<LockHandle> {
    let handle = LockHandle::new(path)?;
    handle.try_acquire()?;
    Ok(handle)
}
