//! Lock state definitions.

use std::fmt;

/// Cached belief about the external lock held through one handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LockState {
    /// No lock is held by this handle. Initial state.
    Unlocked,
    /// This handle holds the exclusive lock.
    Locked,
}

impl LockState {
    pub(super) fn from_flag(locked: bool) -> Self {
        if locked {
            LockState::Locked
        } else {
            LockState::Unlocked
        }
    }

    /// Get the lowercase name used in display output.
    pub fn as_str(&self) -> &'static str {
        match self {
            LockState::Unlocked => "unlocked",
            LockState::Locked => "locked",
        }
    }
}

impl fmt::Display for LockState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
