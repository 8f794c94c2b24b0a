//! POSIX advisory locking through `flock(2)`.
//!
//! The backing file is opened once per lock cycle with mode `0600` and
//! truncated on open. Releasing drops the advisory lock and closes the
//! descriptor but leaves the file on disk. A holder that exits without
//! releasing loses its lock when the kernel closes its descriptors.

use super::strategy::LockStrategy;
use crate::error::{LockError, Result};
use fs2::FileExt;
use std::fs::{File, OpenOptions};
use std::io;
use std::os::unix::fs::OpenOptionsExt;
use std::path::Path;

/// Permissions for a newly created backing file.
const LOCK_FILE_MODE: u32 = 0o600;

/// Exclusive `flock` on a persistent backing file.
#[derive(Debug, Clone, Copy, Default)]
pub struct FlockStrategy;

impl LockStrategy for FlockStrategy {
    type File = File;

    fn open(&self, path: &Path, display: &Path) -> Result<File> {
        OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(true)
            .mode(LOCK_FILE_MODE)
            .open(path)
            .map_err(|source| LockError::BackingFile {
                path: display.to_path_buf(),
                source,
            })
    }

    fn try_lock(&self, file: &File, display: &Path) -> Result<()> {
        FileExt::try_lock_exclusive(file).map_err(|err| {
            if err.kind() == io::ErrorKind::WouldBlock {
                LockError::Contention {
                    path: display.to_path_buf(),
                }
            } else {
                LockError::Acquire {
                    path: display.to_path_buf(),
                    source: err,
                }
            }
        })
    }

    fn unlock(&self, file: &File, display: &Path) -> Result<()> {
        FileExt::unlock(file).map_err(|source| LockError::Release {
            path: display.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::os::unix::fs::PermissionsExt;
    use tempfile::TempDir;

    #[test]
    fn open_creates_owner_only_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("perm.lock");

        let _file = FlockStrategy.open(&path, &path).unwrap();

        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, LOCK_FILE_MODE);
    }

    #[test]
    fn open_truncates_existing_content() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("stale.lock");
        fs::write(&path, b"left over by a previous holder").unwrap();

        let _file = FlockStrategy.open(&path, &path).unwrap();

        assert_eq!(fs::metadata(&path).unwrap().len(), 0);
    }

    #[test]
    fn open_in_missing_directory_is_backing_file_error() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("missing").join("x.lock");

        let err = FlockStrategy
            .open(&path, Path::new("missing/x.lock"))
            .unwrap_err();

        assert!(matches!(err, LockError::BackingFile { .. }));
        assert_eq!(err.path(), Path::new("missing/x.lock"));
    }

    #[test]
    fn second_descriptor_sees_contention() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("pair.lock");

        let first = FlockStrategy.open(&path, &path).unwrap();
        let second = FlockStrategy.open(&path, &path).unwrap();
        FlockStrategy.try_lock(&first, &path).unwrap();

        let err = FlockStrategy.try_lock(&second, &path).unwrap_err();
        assert!(matches!(err, LockError::Contention { .. }));

        FlockStrategy.unlock(&first, &path).unwrap();
        FlockStrategy.try_lock(&second, &path).unwrap();
    }
}
