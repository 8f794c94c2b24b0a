//! Windows locking through an exclusive, delete-on-close handle.
//!
//! Opening the file with share mode 0 is the lock: any other open of the same
//! path fails with a sharing violation until the handle closes. The file is
//! created temporary and delete-on-close, so closing the handle (explicitly,
//! or by the OS when the process dies) both releases the lock and removes the
//! backing file.

use super::strategy::LockStrategy;
use crate::error::{LockError, Result};
use std::fs::{File, OpenOptions};
use std::io;
use std::os::windows::fs::OpenOptionsExt;
use std::path::Path;
use windows_sys::Win32::Foundation::{ERROR_LOCK_VIOLATION, ERROR_SHARING_VIOLATION};
use windows_sys::Win32::Storage::FileSystem::{
    FILE_ATTRIBUTE_TEMPORARY, FILE_FLAG_DELETE_ON_CLOSE, FILE_SHARE_NONE,
};

/// Exclusive handle with delete-on-close semantics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExclusiveHandleStrategy;

fn is_sharing_violation(err: &io::Error) -> bool {
    matches!(
        err.raw_os_error(),
        Some(code) if code == ERROR_SHARING_VIOLATION as i32 || code == ERROR_LOCK_VIOLATION as i32
    )
}

impl LockStrategy for ExclusiveHandleStrategy {
    type File = File;

    fn open(&self, path: &Path, display: &Path) -> Result<File> {
        // write + create + truncate maps to CREATE_ALWAYS
        OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .share_mode(FILE_SHARE_NONE)
            .attributes(FILE_ATTRIBUTE_TEMPORARY)
            .custom_flags(FILE_FLAG_DELETE_ON_CLOSE)
            .open(path)
            .map_err(|source| {
                if is_sharing_violation(&source) {
                    LockError::Contention {
                        path: display.to_path_buf(),
                    }
                } else {
                    LockError::BackingFile {
                        path: display.to_path_buf(),
                        source,
                    }
                }
            })
    }

    fn try_lock(&self, _file: &File, _display: &Path) -> Result<()> {
        // The open handle already excludes everyone else.
        Ok(())
    }

    fn unlock(&self, _file: &File, _display: &Path) -> Result<()> {
        // Closing the handle releases and deletes; the caller drops it.
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn second_open_is_contention() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pair.lock");

        let _first = ExclusiveHandleStrategy.open(&path, &path).unwrap();
        let err = ExclusiveHandleStrategy.open(&path, &path).unwrap_err();

        assert!(matches!(err, LockError::Contention { .. }));
    }

    #[test]
    fn closing_handle_deletes_backing_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("gone.lock");

        let file = ExclusiveHandleStrategy.open(&path, &path).unwrap();
        assert!(path.exists());
        drop(file);

        assert!(!path.exists());
    }
}
