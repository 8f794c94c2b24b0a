//! Error types for pathlock.
//!
//! Uses thiserror for derive macros. Every failure carries the caller-supplied
//! lock path so messages stay actionable without extra context.

use crate::exit_codes;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Main error type for lock operations.
///
/// Each variant maps to a process exit code used by the `pathlock` probe binary.
#[derive(Error, Debug)]
pub enum LockError {
    /// The lock path could not be made absolute.
    #[error("failed to resolve lock path '{}': {source}", .path.display())]
    Resolution { path: PathBuf, source: io::Error },

    /// The backing file could not be created or opened.
    #[error("failed to open lock file '{}': {source}", .path.display())]
    BackingFile { path: PathBuf, source: io::Error },

    /// Another holder owns the exclusive lock.
    #[error("lock '{}' is held by another process", .path.display())]
    Contention { path: PathBuf },

    /// The non-blocking lock call failed for a reason other than contention.
    #[error("failed to lock '{}': {source}", .path.display())]
    Acquire { path: PathBuf, source: io::Error },

    /// A guard was requested from a handle that already holds the lock.
    #[error("lock '{}' is already held by this handle", .path.display())]
    AlreadyLocked { path: PathBuf },

    /// Release was called on a handle that does not hold the lock.
    #[error("lock '{}' is already unlocked", .path.display())]
    AlreadyUnlocked { path: PathBuf },

    /// The OS refused to release the lock. The handle stays locked.
    #[error("failed to release lock '{}': {source}", .path.display())]
    Release { path: PathBuf, source: io::Error },

    /// The lock stayed contended for the whole wait.
    #[error("timed out after {timeout:?} waiting for lock '{}'", .path.display())]
    Timeout { path: PathBuf, timeout: Duration },
}

impl LockError {
    /// The lock path this error refers to, as supplied by the caller.
    pub fn path(&self) -> &Path {
        match self {
            LockError::Resolution { path, .. }
            | LockError::BackingFile { path, .. }
            | LockError::Contention { path }
            | LockError::Acquire { path, .. }
            | LockError::AlreadyLocked { path }
            | LockError::AlreadyUnlocked { path }
            | LockError::Release { path, .. }
            | LockError::Timeout { path, .. } => path,
        }
    }

    /// True when the lock is held elsewhere, whether reported at once or after waiting.
    pub fn is_contention(&self) -> bool {
        matches!(
            self,
            LockError::Contention { .. } | LockError::Timeout { .. }
        )
    }

    /// Returns the appropriate exit code for this error type.
    pub fn exit_code(&self) -> i32 {
        if self.is_contention() {
            exit_codes::LOCK_FAILURE
        } else {
            exit_codes::USER_ERROR
        }
    }
}

/// Result type alias for lock operations.
pub type Result<T> = std::result::Result<T, LockError>;

#[cfg(test)]
mod tests {
    use super::*;

    fn io_err() -> io::Error {
        io::Error::new(io::ErrorKind::PermissionDenied, "denied")
    }

    #[test]
    fn contention_error_has_lock_exit_code() {
        let err = LockError::Contention {
            path: PathBuf::from("foo.lock"),
        };
        assert!(err.is_contention());
        assert_eq!(err.exit_code(), exit_codes::LOCK_FAILURE);
    }

    #[test]
    fn timeout_counts_as_contention() {
        let err = LockError::Timeout {
            path: PathBuf::from("foo.lock"),
            timeout: Duration::from_millis(250),
        };
        assert!(err.is_contention());
        assert_eq!(err.exit_code(), exit_codes::LOCK_FAILURE);
    }

    #[test]
    fn io_failures_have_user_error_exit_code() {
        let errs = [
            LockError::Resolution {
                path: PathBuf::new(),
                source: io_err(),
            },
            LockError::BackingFile {
                path: PathBuf::from("a"),
                source: io_err(),
            },
            LockError::Acquire {
                path: PathBuf::from("a"),
                source: io_err(),
            },
            LockError::Release {
                path: PathBuf::from("a"),
                source: io_err(),
            },
            LockError::AlreadyLocked {
                path: PathBuf::from("a"),
            },
            LockError::AlreadyUnlocked {
                path: PathBuf::from("a"),
            },
        ];
        for err in &errs {
            assert!(!err.is_contention(), "{err} should not be contention");
            assert_eq!(err.exit_code(), exit_codes::USER_ERROR);
        }
    }

    #[test]
    fn error_messages_are_descriptive() {
        let err = LockError::AlreadyUnlocked {
            path: PathBuf::from("foo.lock"),
        };
        assert_eq!(err.to_string(), "lock 'foo.lock' is already unlocked");
        assert_eq!(err.path(), Path::new("foo.lock"));

        let err = LockError::AlreadyLocked {
            path: PathBuf::from("foo.lock"),
        };
        assert_eq!(
            err.to_string(),
            "lock 'foo.lock' is already held by this handle"
        );

        let err = LockError::BackingFile {
            path: PathBuf::from("dir/foo.lock"),
            source: io_err(),
        };
        assert_eq!(
            err.to_string(),
            "failed to open lock file 'dir/foo.lock': denied"
        );
    }
}
