//! Advisory file locking, built on `fs2::FileExt` the way `robt::flush` and
//! `robt::reader` lock their index files.

use fs2::FileExt;
use std::{fs, path::Path};

use crate::{err_at, Result};

/// Held for the duration of a write session on a dataset. One writer at a
/// time is assumed (§5); this lock enforces it by blocking until acquired.
pub struct WriterLock {
    file: fs::File,
}

impl WriterLock {
    pub fn acquire(path: &Path) -> Result<WriterLock> {
        if let Some(parent) = path.parent() {
            err_at!(IOError, fs::create_dir_all(parent))?;
        }
        let file = err_at!(
            IOError,
            fs::OpenOptions::new().write(true).create(true).open(path)
        )?;
        err_at!(IOError, file.lock_exclusive())?;
        Ok(WriterLock { file })
    }

    pub fn try_acquire(path: &Path) -> Result<Option<WriterLock>> {
        if let Some(parent) = path.parent() {
            err_at!(IOError, fs::create_dir_all(parent))?;
        }
        let file = err_at!(
            IOError,
            fs::OpenOptions::new().write(true).create(true).open(path)
        )?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(WriterLock { file })),
            Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => Ok(None),
            Err(e) => err_at!(IOError, Err(e)),
        }
    }
}

impl Drop for WriterLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Used by the directory segment's `.sequence` file: hold the lock only for
/// the read-modify-write of the next numeric id (§4.4, §5).
pub fn with_sequence_lock<F, T>(path: &Path, f: F) -> Result<T>
where
    F: FnOnce(&mut fs::File) -> Result<T>,
{
    if let Some(parent) = path.parent() {
        err_at!(IOError, fs::create_dir_all(parent))?;
    }
    let mut file = err_at!(
        IOError,
        fs::OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .open(path)
    )?;
    err_at!(IOError, file.lock_exclusive())?;
    let result = f(&mut file);
    let _ = file.unlock();
    result
}

#[cfg(test)]
#[path = "lock_test.rs"]
mod lock_test;
